use clap::{Arg, Command, value_parser};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use ratecard_core::RateTable;
use ratecard_server::auth::{mint, now_secs, Claims};
use ratecard_server::config::{signing_key_from_hex, ServerConfig};
use ratecard_server::store::{DocumentStore, FileStore};
use ratecard_server::{router, AppState, TokenVerifier};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Command::new("ratecard-server")
        .version("0.1.0")
        .about("Rates configuration service")
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .default_value("info")
                .help("Log filter, e.g. info, ratecard_server=debug"),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the rates endpoints")
                .arg(
                    Arg::new("bind")
                        .long("bind")
                        .help("Listen address (default: $RATECARD_BIND or 127.0.0.1:8080)"),
                )
                .arg(
                    Arg::new("store")
                        .long("store")
                        .help("Rates document path (default: $RATECARD_STORE or rates.json)"),
                )
                .arg(
                    Arg::new("pubkey")
                        .long("pubkey")
                        .help("Provider verifying key, hex (default: $RATECARD_IDENTITY_PUBKEY)"),
                ),
        )
        .subcommand(
            Command::new("seed")
                .about("Write an initial rates document")
                .arg(
                    Arg::new("store")
                        .long("store")
                        .help("Rates document path (default: $RATECARD_STORE or rates.json)"),
                )
                .arg(
                    Arg::new("file")
                        .long("file")
                        .help("Seed from this JSON file instead of the starter table"),
                ),
        )
        .subcommand(
            Command::new("mint-token")
                .about("Mint a signed credential, standing in for the identity provider")
                .arg(
                    Arg::new("email")
                        .long("email")
                        .required(true)
                        .help("Account email to embed"),
                )
                .arg(
                    Arg::new("roles")
                        .long("roles")
                        .default_value("admin")
                        .help("Comma-separated role claims"),
                )
                .arg(
                    Arg::new("ttl-secs")
                        .long("ttl-secs")
                        .default_value("0")
                        .value_parser(value_parser!(u64))
                        .help("Lifetime in seconds; 0 mints a non-expiring credential"),
                )
                .arg(
                    Arg::new("key")
                        .long("key")
                        .help("Provider signing key, hex (default: $RATECARD_IDENTITY_KEY)"),
                ),
        )
        .subcommand(Command::new("keygen").about("Generate a provider key pair"));

    let matches = cli.get_matches();
    init_logging(matches.get_one::<String>("log-level").unwrap());

    match matches.subcommand() {
        Some(("serve", args)) => {
            let config = ServerConfig::resolve(
                args.get_one::<String>("bind").map(String::as_str),
                args.get_one::<String>("store").map(String::as_str),
                args.get_one::<String>("pubkey").map(String::as_str),
            )?;

            let store = Arc::new(FileStore::new(&config.store_path));
            let state = AppState::new(store, TokenVerifier::new(config.verifying_key));

            let listener = tokio::net::TcpListener::bind(config.bind).await?;
            println!(
                "ratecard-server listening on http://{} (store: {})",
                listener.local_addr()?,
                config.store_path.display()
            );
            axum::serve(listener, router(state)).await?;
        }
        Some(("seed", args)) => {
            let store_path = match args.get_one::<String>("store") {
                Some(path) => path.clone(),
                None => std::env::var("RATECARD_STORE").unwrap_or_else(|_| "rates.json".into()),
            };

            let rates = match args.get_one::<String>("file") {
                Some(file) => {
                    let raw = std::fs::read_to_string(file)?;
                    serde_json::from_str(&raw)?
                }
                None => starter_table(),
            };

            let store = FileStore::new(&store_path);
            store.put(&rates)?;
            println!("Seeded rates document at {store_path}");
        }
        Some(("mint-token", args)) => {
            let email = args.get_one::<String>("email").unwrap();
            let roles = args.get_one::<String>("roles").unwrap();
            let ttl_secs = *args.get_one::<u64>("ttl-secs").unwrap();

            let key_hex = match args.get_one::<String>("key") {
                Some(key) => key.clone(),
                None => std::env::var("RATECARD_IDENTITY_KEY").unwrap_or_default(),
            };
            let signing_key = signing_key_from_hex(&key_hex)?;

            let mut claims = Claims::new(email);
            for role in roles.split(',').map(str::trim).filter(|r| !r.is_empty()) {
                claims = claims.with_role(role);
            }
            if ttl_secs > 0 {
                claims = claims.with_expiry(now_secs() + ttl_secs);
            }

            println!("{}", mint(claims, &signing_key)?);
        }
        Some(("keygen", _)) => {
            let signing_key = SigningKey::generate(&mut OsRng);
            println!("signing key (hex):   {}", hex::encode(signing_key.to_bytes()));
            println!(
                "verifying key (hex): {}",
                hex::encode(signing_key.verifying_key().to_bytes())
            );
        }
        _ => {}
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Starter price list for fresh deployments.
fn starter_table() -> RateTable {
    RateTable::new()
        .with_hourly_rate(25.0)
        .with_project("landing", 40.0)
        .with_project("corporate", 80.0)
        .with_project("shop", 200.0)
        .with_design("template", 8.0)
        .with_design("custom", 40.0)
        .with_module("seo", 8.0)
        .with_module("analytics", 4.0)
        .with_module("payment", 32.0)
}

use clap::{Arg, ArgMatches, Command, value_parser};
use ratecard_client::{
    AdminGate, CalculatorSession, EstimateView, FileIdentityWidget, GateState, Identity,
    NoPreference, StateCache, SyncClient, SyncConfig, ADMIN_ROLE,
};
use ratecard_core::types::{RateTable, Theme};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_STATE_DIR: &str = ".ratecard";
const LOAD_APOLOGY: &str = "Oops! We couldn't load the calculator settings. Please try again.";

fn main() {
    let cli = Command::new("ratecard")
        .version("0.1.0")
        .about("Project cost calculator and rates admin console")
        .arg_required_else_help(true)
        .arg(
            Arg::new("state-dir")
                .long("state-dir")
                .help("Client state directory (default: $RATECARD_STATE_DIR or .ratecard)"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .help("Service base URL (default: $RATECARD_ENDPOINT or http://127.0.0.1:8080)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .default_value("warn")
                .help("Log filter, e.g. warn, info, ratecard_client=debug"),
        )
        .subcommand(Command::new("estimate").about("Show the estimate for the saved selection"))
        .subcommand(
            Command::new("select")
                .about("Change the saved selection")
                .subcommand_required(true)
                .subcommand(
                    Command::new("project").about("Pick a project type").arg(
                        Arg::new("key")
                            .required(true)
                            .help("Project type key, e.g. landing"),
                    ),
                )
                .subcommand(
                    Command::new("design").about("Pick a design tier").arg(
                        Arg::new("key")
                            .required(true)
                            .help("Design tier key, e.g. custom"),
                    ),
                )
                .subcommand(
                    Command::new("toggle").about("Toggle an add-on module").arg(
                        Arg::new("key")
                            .required(true)
                            .help("Module key, e.g. seo"),
                    ),
                )
                .subcommand(Command::new("clear").about("Reset the selection")),
        )
        .subcommand(
            Command::new("theme")
                .about("Read or set the color theme")
                .subcommand_required(true)
                .subcommand(Command::new("get").about("Show the active theme"))
                .subcommand(
                    Command::new("set").about("Persist a theme choice").arg(
                        Arg::new("theme")
                            .required(true)
                            .value_parser(value_parser!(Theme))
                            .help("light or dark"),
                    ),
                ),
        )
        .subcommand(
            Command::new("login")
                .about("Write a local identity snapshot (stand-in for the hosted widget)")
                .arg(
                    Arg::new("email")
                        .long("email")
                        .required(true)
                        .help("Account email"),
                )
                .arg(
                    Arg::new("roles")
                        .long("roles")
                        .default_value("")
                        .help("Comma-separated role claims; rates editing needs 'admin'"),
                )
                .arg(
                    Arg::new("token")
                        .long("token")
                        .help("Bearer credential for authenticated calls"),
                ),
        )
        .subcommand(Command::new("logout").about("Remove the local identity snapshot"))
        .subcommand(
            Command::new("admin")
                .about("Rates administration, admin role required")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Show the stored rate table"))
                .subcommand(
                    Command::new("set")
                        .about("Change one rate entry and push the whole table")
                        .arg(
                            Arg::new("entry")
                                .required(true)
                                .help("Entry path: hourlyRate, project.landing, modules.seo, ..."),
                        )
                        .arg(
                            Arg::new("value")
                                .required(true)
                                .value_parser(value_parser!(f64))
                                .help("New value in hours (or currency for hourlyRate)"),
                        ),
                )
                .subcommand(
                    Command::new("push")
                        .about("Push a full rate table from a JSON file")
                        .arg(
                            Arg::new("file")
                                .long("file")
                                .required(true)
                                .help("Path to the rate table JSON"),
                        ),
                ),
        );

    let matches = cli.get_matches();
    init_logging(matches.get_one::<String>("log-level").unwrap());

    let state_dir = resolve_state_dir(&matches);
    let client = resolve_client(&matches);

    match matches.subcommand() {
        Some(("estimate", _)) => {
            let session = open_session(&state_dir, &client);
            print_view(&session, &session.view());
        }
        Some(("select", sub)) => {
            let mut session = open_session(&state_dir, &client);
            let view = match sub.subcommand() {
                Some(("project", args)) => session.choose_project(key_arg(args)),
                Some(("design", args)) => session.choose_design(key_arg(args)),
                Some(("toggle", args)) => session.toggle_module(key_arg(args)),
                Some(("clear", _)) => session.clear(),
                _ => unreachable!("subcommand_required"),
            };
            print_view(&session, &view);
        }
        Some(("theme", sub)) => match sub.subcommand() {
            Some(("get", _)) => {
                let cache = StateCache::new(&state_dir);
                println!("{}", cache.resolve_theme(&NoPreference));
            }
            Some(("set", args)) => {
                let theme = *args.get_one::<Theme>("theme").unwrap();
                let cache = StateCache::new(&state_dir);
                if let Err(err) = cache.save_theme(theme) {
                    println!("Could not save the theme: {err}");
                    std::process::exit(1);
                }
                println!("Theme set to {theme}");
            }
            _ => unreachable!("subcommand_required"),
        },
        Some(("login", args)) => {
            let email = args.get_one::<String>("email").unwrap().clone();
            let roles = args.get_one::<String>("roles").unwrap().clone();

            let mut identity = Identity::new(email);
            for role in roles.split(',').map(str::trim).filter(|r| !r.is_empty()) {
                identity = identity.with_role(role);
            }
            if let Some(token) = args.get_one::<String>("token") {
                identity = identity.with_token(token.clone());
            }

            let widget = FileIdentityWidget::new(&state_dir);
            match write_snapshot(&widget, &identity) {
                Ok(()) => {
                    println!("Signed in as {}", identity.email);
                    if !identity.is_admin() {
                        println!("Note: no '{ADMIN_ROLE}' role, rates editing stays locked");
                    }
                }
                Err(err) => {
                    println!("Could not write the identity snapshot: {err}");
                    std::process::exit(1);
                }
            }
        }
        Some(("logout", _)) => {
            let widget = FileIdentityWidget::new(&state_dir);
            match std::fs::remove_file(widget.path()) {
                Ok(()) => println!("Signed out"),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    println!("Already signed out");
                }
                Err(err) => {
                    println!("Could not remove the identity snapshot: {err}");
                    std::process::exit(1);
                }
            }
        }
        Some(("admin", sub)) => {
            let (identity, mut rates) = open_editor(&state_dir, &client);
            match sub.subcommand() {
                Some(("show", _)) => match serde_json::to_string_pretty(&rates) {
                    Ok(doc) => println!("{doc}"),
                    Err(err) => {
                        println!("Could not render the rate table: {err}");
                        std::process::exit(1);
                    }
                },
                Some(("set", args)) => {
                    let entry = args.get_one::<String>("entry").unwrap();
                    let value = *args.get_one::<f64>("value").unwrap();

                    if let Err(err) = apply_rate(&mut rates, entry, value) {
                        println!("{err}");
                        std::process::exit(1);
                    }
                    submit_or_exit(&client, &rates, &identity);
                }
                Some(("push", args)) => {
                    let file = args.get_one::<String>("file").unwrap();
                    let rates = match read_table(file) {
                        Ok(rates) => rates,
                        Err(err) => {
                            println!("Could not read {file}: {err}");
                            std::process::exit(1);
                        }
                    };
                    submit_or_exit(&client, &rates, &identity);
                }
                _ => unreachable!("subcommand_required"),
            }
        }
        _ => {}
    }
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn resolve_state_dir(matches: &ArgMatches) -> PathBuf {
    if let Some(dir) = matches.get_one::<String>("state-dir") {
        return PathBuf::from(dir);
    }
    std::env::var("RATECARD_STATE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_DIR))
}

fn resolve_client(matches: &ArgMatches) -> SyncClient {
    match matches.get_one::<String>("endpoint") {
        Some(endpoint) => SyncClient::new(SyncConfig::new(endpoint.clone())),
        None => SyncClient::from_env_or_default(),
    }
}

fn key_arg(args: &ArgMatches) -> &str {
    args.get_one::<String>("key").unwrap()
}

fn open_session(state_dir: &std::path::Path, client: &SyncClient) -> CalculatorSession {
    match client.fetch_rates() {
        Ok(rates) => CalculatorSession::start(StateCache::new(state_dir), rates, &NoPreference),
        Err(err) => {
            tracing::warn!(error = %err, endpoint = client.endpoint(), "rates load failed");
            println!("{LOAD_APOLOGY}");
            std::process::exit(1);
        }
    }
}

/// Run the admin gate to completion and hand back the editor contents.
fn open_editor(state_dir: &std::path::Path, client: &SyncClient) -> (Identity, RateTable) {
    let mut widget = FileIdentityWidget::new(state_dir);
    let fetch_client = client.clone();
    let gate = AdminGate::initialize(&mut widget, Arc::new(move || fetch_client.fetch_rates()));

    match gate.state() {
        GateState::Editor { identity, rates } => (identity, rates),
        GateState::LoginPrompt => {
            println!("You must be logged in to update rates.");
            std::process::exit(1);
        }
        GateState::Forbidden { email } => {
            println!("{email} does not have permission to update rates. Admin access required.");
            std::process::exit(1);
        }
        GateState::LoadFailed { reason } => {
            println!("Could not load the rate table: {reason}");
            std::process::exit(1);
        }
        GateState::Loading => unreachable!("gate evaluation is synchronous"),
    }
}

fn submit_or_exit(client: &SyncClient, rates: &RateTable, identity: &Identity) {
    let Some(token) = identity.token.as_deref() else {
        println!("Authentication error - please log in again.");
        std::process::exit(1);
    };

    match client.submit_rates(rates, token) {
        Ok(()) => println!("Rates updated successfully!"),
        Err(err) => {
            println!("Failed to update rates: {err}");
            std::process::exit(1);
        }
    }
}

fn write_snapshot(widget: &FileIdentityWidget, identity: &Identity) -> anyhow::Result<()> {
    if let Some(parent) = widget.path().parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(identity)?;
    std::fs::write(widget.path(), content)?;
    Ok(())
}

fn read_table(path: &str) -> anyhow::Result<RateTable> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn apply_rate(rates: &mut RateTable, entry: &str, value: f64) -> Result<(), String> {
    if let Some((group, key)) = entry.split_once('.') {
        let map = match group {
            "project" => &mut rates.project,
            "design" => &mut rates.design,
            "modules" => &mut rates.modules,
            other => return Err(format!("Unknown rate group '{other}'")),
        };
        map.insert(key.to_string(), value);
        Ok(())
    } else if entry == "hourlyRate" {
        rates.hourly_rate = value;
        Ok(())
    } else {
        Err(format!(
            "Unknown rate entry '{entry}' (expected hourlyRate or group.key)"
        ))
    }
}

fn print_view(session: &CalculatorSession, view: &EstimateView) {
    let selection = session.selection();
    let modules: Vec<&str> = selection.modules.iter().map(String::as_str).collect();

    println!("Project: {}", selection.project_type.as_deref().unwrap_or("-"));
    println!("Design: {}", selection.design_type.as_deref().unwrap_or("-"));
    println!(
        "Modules: {}",
        if modules.is_empty() {
            "-".to_string()
        } else {
            modules.join(", ")
        }
    );
    println!();
    println!("Estimated cost: {}", view.cost_label);
    println!("Estimated hours: {}h", view.hours);
    println!("Timeline: {}", view.timeline_label);

    if let Some(badge) = &view.badge {
        println!("Change: {} on {}", badge.text, badge.control);
    }
}

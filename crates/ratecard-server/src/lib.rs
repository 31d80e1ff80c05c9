//! Ratecard Server - Rates configuration service
//!
//! Serves and stores the single rate-table document the calculator and
//! admin console work against:
//!
//! - **Store**: one JSON document, replaced wholesale on every write
//! - **Auth**: ed25519-signed provider credentials, verify-only
//! - **Routes**: open read, credentialed write, fixed response bodies
//! - **Config**: flag and environment resolution
//!
//! # Example
//!
//! ```
//! use ed25519_dalek::SigningKey;
//! use rand::rngs::OsRng;
//! use ratecard_server::{router, AppState, MemoryStore, TokenVerifier};
//! use std::sync::Arc;
//!
//! let provider = SigningKey::generate(&mut OsRng);
//! let state = AppState::new(
//!     Arc::new(MemoryStore::new()),
//!     TokenVerifier::new(provider.verifying_key()),
//! );
//! let app = router(state);
//! # let _ = app;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod store;

// Re-exports for convenience
pub use auth::{mint, AccessToken, Claims, TokenVerifier, ADMIN_ROLE};
pub use config::ServerConfig;
pub use error::{AuthError, ConfigError, StoreError};
pub use routes::{router, AppState, RATES_PATH, UPDATE_PATH};
pub use store::{DocumentStore, FileStore, MemoryStore};

/// Commonly used service types
pub mod prelude {
    pub use crate::auth::{mint, Claims, TokenVerifier};
    pub use crate::config::ServerConfig;
    pub use crate::error::{AuthError, ConfigError, StoreError};
    pub use crate::routes::{router, AppState};
    pub use crate::store::{DocumentStore, FileStore, MemoryStore};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

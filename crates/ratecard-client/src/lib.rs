//! Ratecard Client - Calculator runtime and admin console plumbing
//!
//! Client-side counterpart to `ratecard-core`:
//!
//! - **Session**: the interactive calculator controller, one per run
//! - **Cache**: durable selection snapshot and theme preference
//! - **Sync**: blocking HTTP fetch/submit of the rate table
//! - **Identity**: narrow interface over the external identity widget
//! - **Gate**: authorization state machine for the admin surface
//!
//! # Example
//!
//! ```
//! use ratecard_client::{CalculatorSession, NoPreference, StateCache};
//! use ratecard_core::RateTable;
//!
//! let dir = tempfile::tempdir()?;
//! let rates = RateTable::new()
//!     .with_hourly_rate(25.0)
//!     .with_project("landing", 40.0);
//!
//! let mut session =
//!     CalculatorSession::start(StateCache::new(dir.path()), rates, &NoPreference);
//! let view = session.choose_project("landing");
//! assert_eq!(view.cost_label, "$1,000");
//! assert_eq!(view.timeline_label, "1 week");
//! # Ok::<(), std::io::Error>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod cache;
pub mod error;
pub mod gate;
pub mod identity;
pub mod session;
pub mod sync;

// Re-exports for convenience
pub use cache::{ColorSchemeProbe, NoPreference, StateCache};
pub use error::{CacheError, FetchError, SubmitError};
pub use gate::{AdminGate, GateState};
pub use identity::{FileIdentityWidget, Identity, IdentityWidget, ADMIN_ROLE};
pub use session::{CalculatorSession, EstimateView};
pub use sync::{SyncClient, SyncConfig};

/// Commonly used client types
pub mod prelude {
    pub use crate::cache::{ColorSchemeProbe, NoPreference, StateCache};
    pub use crate::error::{CacheError, FetchError, SubmitError};
    pub use crate::gate::{AdminGate, GateState};
    pub use crate::identity::{FileIdentityWidget, Identity, IdentityWidget};
    pub use crate::session::{CalculatorSession, EstimateView};
    pub use crate::sync::{SyncClient, SyncConfig};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Ratecard Core - Pricing domain model and estimation engine
//!
//! The dependency-light heart of the estimator:
//! - Models the remotely stored rate table and a user's selection
//! - Prices a selection into hours and dollars
//! - Formats prices, timelines, and signed hour deltas for display
//! - Tracks recompute-to-recompute hour changes for transient badges
//! - Validates a table before it is submitted for writing
//!
//! # Example
//!
//! ```rust
//! use ratecard_core::{estimate, format_currency, format_timeline, RateTable, Selection};
//!
//! let rates = RateTable::new()
//!     .with_hourly_rate(25.0)
//!     .with_project("landing", 40.0)
//!     .with_module("seo", 8.0);
//!
//! let selection = Selection::new().with_project("landing").with_module("seo");
//! let result = estimate(&selection, &rates);
//!
//! assert_eq!(format_currency(result.total_cost), "$1,200");
//! assert_eq!(format_timeline(result.total_hours), "1-2 weeks");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod delta;
pub mod engine;
pub mod error;
pub mod format;
pub mod types;
pub mod validate;

// Re-exports for convenience
pub use delta::{hour_delta_annotation, DeltaAnnotation, DeltaTracker, Polarity, INDICATOR_TTL};
pub use engine::{estimate, EstimateResult};
pub use error::ValidationError;
pub use format::{format_currency, format_hour_delta, format_timeline, WORK_HOURS_PER_WEEK};
pub use types::{Control, RateTable, Selection, Theme};
pub use validate::validate_for_submission;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Ratecard Core
    pub use crate::{
        estimate, format_currency, format_timeline, validate_for_submission, Control,
        DeltaTracker, EstimateResult, RateTable, Selection, Theme,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn estimate_to_display_flow() {
        let rates = RateTable::new()
            .with_hourly_rate(30.0)
            .with_project("shop", 200.0)
            .with_design("custom", 40.0)
            .with_module("payment", 32.0);

        let selection = Selection::new()
            .with_project("shop")
            .with_design("custom")
            .with_module("payment");

        let result = estimate(&selection, &rates);
        assert_eq!(result.total_hours, 272.0);
        assert_eq!(format_currency(result.total_cost), "$8,160");
        assert_eq!(format_timeline(result.total_hours), "6-7 weeks");
    }

    #[test]
    fn recompute_with_tracker_produces_badge() {
        let rates = RateTable::new().with_hourly_rate(25.0).with_module("seo", 8.0);
        let mut selection = Selection::new();
        let mut tracker = DeltaTracker::new();

        tracker.observe(estimate(&selection, &rates).total_hours, None);

        selection.toggle_module("seo");
        let focused = Control::Module("seo".into());
        let badge = tracker
            .observe(estimate(&selection, &rates).total_hours, Some(&focused))
            .unwrap();
        assert_eq!(badge.text, "+8h");
    }

    #[test]
    fn validation_guards_submission() {
        let rates = RateTable::new().with_hourly_rate(-1.0);
        assert!(validate_for_submission(&rates).is_err());
    }
}

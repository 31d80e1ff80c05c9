//! Estimation engine
//!
//! Pure recompute over a selection and a rate table. Unknown identifiers
//! contribute 0 hours, so an estimate never fails; it only shrinks when
//! the table stops pricing something the selection still references.

use crate::types::{RateTable, Selection};

/// Output of one estimation pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EstimateResult {
    /// Total labor in hours
    pub total_hours: f64,
    /// Total price: hours multiplied by the base hourly rate
    pub total_cost: f64,
}

impl EstimateResult {
    /// True when the selection priced out to nothing
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.total_hours == 0.0
    }
}

/// Price a selection against a rate table
///
/// Hours are the sum of the chosen project type, the chosen design type,
/// and every chosen module; cost is that sum times `hourly_rate`. Absent
/// choices and identifiers the table does not know both contribute 0.
#[must_use]
pub fn estimate(selection: &Selection, rates: &RateTable) -> EstimateResult {
    let mut total_hours = 0.0;
    if let Some(key) = &selection.project_type {
        total_hours += rates.project_hours(key);
    }
    if let Some(key) = &selection.design_type {
        total_hours += rates.design_hours(key);
    }
    for key in &selection.modules {
        total_hours += rates.module_hours(key);
    }

    EstimateResult {
        total_hours,
        total_cost: total_hours * rates.hourly_rate,
    }
}

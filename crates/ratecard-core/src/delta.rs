//! Transient hour-delta annotations
//!
//! After every recompute the calculator may flash a short-lived `+Nh` or
//! `-Nh` badge next to an input. The badge appears only when some input
//! control holds interaction focus at recompute time, and it anchors to
//! that focused control even when the hours actually moved because of a
//! different one (rates refreshing underneath a focused input, for
//! example). A zero difference produces no badge.

use crate::format::format_hour_delta;
use crate::types::Control;
use std::time::Duration;

/// How long a delta badge stays visible
pub const INDICATOR_TTL: Duration = Duration::from_millis(1500);

/// Direction of an hour change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Hours went up
    Positive,
    /// Hours went down
    Negative,
}

impl Polarity {
    /// Stable style label (`"positive"` / `"negative"`)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

/// A badge to render next to a control for [`INDICATOR_TTL`]
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaAnnotation {
    /// The control the badge anchors to
    pub control: Control,
    /// Signed text, e.g. `"+8h"`
    pub text: String,
    /// Direction of the change
    pub polarity: Polarity,
    /// Time the badge remains visible
    pub ttl: Duration,
}

/// Compare two hour totals and build the badge for the focused control
///
/// Returns `None` when no control holds focus or when the totals are
/// equal.
#[must_use]
pub fn hour_delta_annotation(
    previous_hours: f64,
    new_hours: f64,
    focused: Option<&Control>,
) -> Option<DeltaAnnotation> {
    let control = focused?;
    let delta = new_hours - previous_hours;
    if delta == 0.0 {
        return None;
    }

    let polarity = if delta > 0.0 {
        Polarity::Positive
    } else {
        Polarity::Negative
    };

    Some(DeltaAnnotation {
        control: control.clone(),
        text: format_hour_delta(delta),
        polarity,
        ttl: INDICATOR_TTL,
    })
}

/// Remembers the previous total across recomputes
///
/// The stored total advances on every observation, including the ones
/// that produce no badge, so a later focused recompute is always
/// measured against the most recent total rather than the last one that
/// was annotated.
#[derive(Debug, Clone, Default)]
pub struct DeltaTracker {
    last_hours: f64,
}

impl DeltaTracker {
    /// Start tracking from zero hours
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently observed total
    #[inline]
    #[must_use]
    pub fn last_hours(&self) -> f64 {
        self.last_hours
    }

    /// Record a recompute and return the badge to show, if any
    pub fn observe(
        &mut self,
        total_hours: f64,
        focused: Option<&Control>,
    ) -> Option<DeltaAnnotation> {
        let annotation = hour_delta_annotation(self.last_hours, total_hours, focused);
        self.last_hours = total_hours;
        annotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seo() -> Control {
        Control::Module("seo".into())
    }

    #[test]
    fn increase_produces_positive_badge() {
        let control = seo();
        let badge = hour_delta_annotation(40.0, 48.0, Some(&control)).unwrap();
        assert_eq!(badge.text, "+8h");
        assert_eq!(badge.polarity, Polarity::Positive);
        assert_eq!(badge.ttl, INDICATOR_TTL);
        assert_eq!(badge.control, control);
    }

    #[test]
    fn decrease_produces_negative_badge() {
        let control = seo();
        let badge = hour_delta_annotation(48.0, 40.0, Some(&control)).unwrap();
        assert_eq!(badge.text, "-8h");
        assert_eq!(badge.polarity, Polarity::Negative);
    }

    #[test]
    fn equal_totals_produce_no_badge() {
        let control = seo();
        assert_eq!(hour_delta_annotation(40.0, 40.0, Some(&control)), None);
    }

    #[test]
    fn no_focus_produces_no_badge() {
        assert_eq!(hour_delta_annotation(40.0, 48.0, None), None);
    }

    #[test]
    fn badge_anchors_to_the_focused_control() {
        // Hours moved because the rate table refreshed, yet the badge
        // lands on whichever control the user happens to be focused on.
        let focused = Control::Project("landing".into());
        let badge = hour_delta_annotation(40.0, 56.0, Some(&focused)).unwrap();
        assert_eq!(badge.control, focused);
        assert_eq!(badge.text, "+16h");
    }

    #[test]
    fn tracker_advances_even_without_a_badge() {
        let mut tracker = DeltaTracker::new();
        assert_eq!(tracker.observe(40.0, None), None);
        assert_eq!(tracker.last_hours(), 40.0);

        // Same total with focus afterwards: measured against 40, not 0.
        let control = seo();
        assert_eq!(tracker.observe(40.0, Some(&control)), None);

        let badge = tracker.observe(44.0, Some(&control)).unwrap();
        assert_eq!(badge.text, "+4h");
    }

    #[test]
    fn fractional_deltas_keep_their_fraction() {
        let control = seo();
        let badge = hour_delta_annotation(10.0, 12.5, Some(&control)).unwrap();
        assert_eq!(badge.text, "+2.5h");
    }
}

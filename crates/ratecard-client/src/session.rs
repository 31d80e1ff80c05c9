//! Interactive calculator controller
//!
//! One `CalculatorSession` per run owns the rate table, the visitor's
//! selection, the interaction focus, and the delta tracker. Every
//! interactive mutation persists the selection and recomputes the
//! estimate; the returned view carries the formatted labels and, when
//! one applies, the transient hour-delta badge.

use crate::cache::{ColorSchemeProbe, StateCache};
use ratecard_core::delta::{DeltaAnnotation, DeltaTracker};
use ratecard_core::engine::estimate;
use ratecard_core::format::{format_currency, format_timeline};
use ratecard_core::types::{Control, RateTable, Selection, Theme};

/// Snapshot handed back after every recompute
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateView {
    /// Total estimated hours
    pub hours: f64,
    /// Total cost before formatting
    pub cost: f64,
    /// Cost as shown, e.g. `$1,235`
    pub cost_label: String,
    /// Timeline as shown, e.g. `1-2 weeks`
    pub timeline_label: String,
    /// Transient hour-delta badge, when a focused control earned one
    pub badge: Option<DeltaAnnotation>,
}

/// Calculator state for one run
pub struct CalculatorSession {
    rates: RateTable,
    selection: Selection,
    tracker: DeltaTracker,
    focus: Option<Control>,
    cache: StateCache,
    theme: Theme,
}

impl CalculatorSession {
    /// Start a session over fetched rates, restoring the persisted
    /// selection and theme
    ///
    /// The restore recompute carries no focus, so it never shows a
    /// badge; it only seeds the tracker with the restored total.
    pub fn start(cache: StateCache, rates: RateTable, probe: &dyn ColorSchemeProbe) -> Self {
        let selection = cache.load().unwrap_or_default();
        let theme = cache.resolve_theme(probe);
        let mut session = Self {
            rates,
            selection,
            tracker: DeltaTracker::new(),
            focus: None,
            cache,
            theme,
        };
        session.recompute();
        session
    }

    /// Current selection
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Rate table in effect
    #[must_use]
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Control currently holding interaction focus
    #[must_use]
    pub fn focused(&self) -> Option<&Control> {
        self.focus.as_ref()
    }

    /// Active theme
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Estimate for the current selection, badge-free
    #[must_use]
    pub fn view(&self) -> EstimateView {
        let result = estimate(&self.selection, &self.rates);
        EstimateView {
            hours: result.total_hours,
            cost: result.total_cost,
            cost_label: format_currency(result.total_cost),
            timeline_label: format_timeline(result.total_hours),
            badge: None,
        }
    }

    /// Select a project type; the radio takes focus
    pub fn choose_project(&mut self, key: &str) -> EstimateView {
        self.selection.project_type = Some(key.to_string());
        self.focus = Some(Control::Project(key.to_string()));
        self.persist();
        self.recompute()
    }

    /// Select a design tier; the radio takes focus
    pub fn choose_design(&mut self, key: &str) -> EstimateView {
        self.selection.design_type = Some(key.to_string());
        self.focus = Some(Control::Design(key.to_string()));
        self.persist();
        self.recompute()
    }

    /// Flip a module checkbox; the checkbox takes focus
    pub fn toggle_module(&mut self, key: &str) -> EstimateView {
        self.selection.toggle_module(key);
        self.focus = Some(Control::Module(key.to_string()));
        self.persist();
        self.recompute()
    }

    /// Reset the selection
    ///
    /// The reset control is not a rate control, so focus clears and the
    /// recompute shows no badge even though the total usually drops.
    pub fn clear(&mut self) -> EstimateView {
        self.selection = Selection::default();
        self.focus = None;
        self.persist();
        self.recompute()
    }

    /// Move interaction focus without changing the selection
    pub fn focus_control(&mut self, control: Option<Control>) {
        self.focus = control;
    }

    /// Swap in a newer rate table and recompute
    ///
    /// The selection is untouched, so nothing is persisted. Focus is
    /// left as-is, which means a badge from this recompute anchors to
    /// whichever control last held it.
    pub fn refresh_rates(&mut self, rates: RateTable) -> EstimateView {
        self.rates = rates;
        self.recompute()
    }

    /// Persist a theme choice and apply it
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(err) = self.cache.save_theme(theme) {
            tracing::warn!(error = %err, "theme preference not persisted");
        }
    }

    fn persist(&self) {
        if let Err(err) = self.cache.save(&self.selection) {
            tracing::warn!(error = %err, "selection not persisted, continuing");
        }
    }

    fn recompute(&mut self) -> EstimateView {
        let result = estimate(&self.selection, &self.rates);
        let badge = self.tracker.observe(result.total_hours, self.focus.as_ref());
        EstimateView {
            hours: result.total_hours,
            cost: result.total_cost,
            cost_label: format_currency(result.total_cost),
            timeline_label: format_timeline(result.total_hours),
            badge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoPreference;
    use pretty_assertions::assert_eq;
    use ratecard_core::delta::Polarity;
    use tempfile::TempDir;

    fn studio_rates() -> RateTable {
        RateTable::new()
            .with_hourly_rate(25.0)
            .with_project("landing", 40.0)
            .with_project("corporate", 80.0)
            .with_design("template", 8.0)
            .with_design("custom", 40.0)
            .with_module("seo", 8.0)
            .with_module("payment", 32.0)
    }

    fn fresh_session(dir: &TempDir) -> CalculatorSession {
        CalculatorSession::start(
            StateCache::new(dir.path()),
            studio_rates(),
            &NoPreference,
        )
    }

    #[test]
    fn restore_shows_no_badge_but_seeds_the_tracker() {
        let dir = TempDir::new().unwrap();
        let cache = StateCache::new(dir.path());
        cache
            .save(&Selection::new().with_project("landing"))
            .unwrap();

        let mut session = CalculatorSession::start(cache, studio_rates(), &NoPreference);
        assert_eq!(session.view().hours, 40.0);
        assert_eq!(session.view().badge, None);

        // The next change is measured against the restored total, not zero.
        let view = session.choose_design("template");
        let badge = view.badge.unwrap();
        assert_eq!(badge.text, "+8h");
    }

    #[test]
    fn choosing_a_project_persists_and_badges_the_radio() {
        let dir = TempDir::new().unwrap();
        let mut session = fresh_session(&dir);

        let view = session.choose_project("corporate");
        assert_eq!(view.hours, 80.0);
        assert_eq!(view.cost_label, "$2,000");
        assert_eq!(view.timeline_label, "2 weeks");

        let badge = view.badge.unwrap();
        assert_eq!(badge.control, Control::Project("corporate".into()));
        assert_eq!(badge.text, "+80h");
        assert_eq!(badge.polarity, Polarity::Positive);

        let reloaded = StateCache::new(dir.path()).load().unwrap();
        assert_eq!(reloaded.project_type.as_deref(), Some("corporate"));
    }

    #[test]
    fn toggling_a_module_off_shows_the_drop() {
        let dir = TempDir::new().unwrap();
        let mut session = fresh_session(&dir);

        session.toggle_module("payment");
        let view = session.toggle_module("payment");
        assert_eq!(view.hours, 0.0);

        let badge = view.badge.unwrap();
        assert_eq!(badge.text, "-32h");
        assert_eq!(badge.polarity, Polarity::Negative);
    }

    #[test]
    fn reselecting_the_same_project_changes_nothing_and_shows_nothing() {
        let dir = TempDir::new().unwrap();
        let mut session = fresh_session(&dir);

        session.choose_project("landing");
        let view = session.choose_project("landing");
        assert_eq!(view.hours, 40.0);
        assert_eq!(view.badge, None);
    }

    #[test]
    fn clear_resets_without_a_badge() {
        let dir = TempDir::new().unwrap();
        let mut session = fresh_session(&dir);

        session.choose_project("corporate");
        session.toggle_module("seo");
        let view = session.clear();

        assert_eq!(view.hours, 0.0);
        assert_eq!(view.cost_label, "$0");
        assert_eq!(view.badge, None);
        assert!(session.selection().is_empty());
        assert!(StateCache::new(dir.path()).load().unwrap().is_empty());
    }

    #[test]
    fn rates_refresh_badges_whichever_control_still_holds_focus() {
        let dir = TempDir::new().unwrap();
        let mut session = fresh_session(&dir);
        session.choose_project("landing");

        let mut richer = studio_rates();
        richer.project.insert("landing".into(), 60.0);
        let view = session.refresh_rates(richer);

        // The project radio kept focus, so the badge names it even though
        // the change came from the table.
        let badge = view.badge.unwrap();
        assert_eq!(badge.control, Control::Project("landing".into()));
        assert_eq!(badge.text, "+20h");
    }

    #[test]
    fn persist_failure_never_blocks_the_estimate() {
        let dir = TempDir::new().unwrap();
        let blocked = dir.path().join("occupied");
        std::fs::write(&blocked, b"not a directory").unwrap();

        let mut session =
            CalculatorSession::start(StateCache::new(&blocked), studio_rates(), &NoPreference);
        let view = session.choose_project("landing");
        assert_eq!(view.hours, 40.0);
        assert!(view.badge.is_some());
    }

    #[test]
    fn theme_choice_is_durable() {
        let dir = TempDir::new().unwrap();
        let mut session = fresh_session(&dir);
        assert_eq!(session.theme(), Theme::Light);

        session.set_theme(Theme::Dark);
        assert_eq!(session.theme(), Theme::Dark);

        let again = fresh_session(&dir);
        assert_eq!(again.theme(), Theme::Dark);
    }
}

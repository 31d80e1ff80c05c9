//! Functional plan for the client surface
//!
//! Exercises the crate the way the two front ends do: a calculator run
//! over cached state, and an admin run through the authorization gate.
//! Each test states the tenet it guards.

use ratecard_client::prelude::*;
use ratecard_core::types::{RateTable, Selection, Theme};
use std::sync::Arc;
use tempfile::TempDir;

fn studio_rates() -> RateTable {
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

fn admin_snapshot(dir: &TempDir) {
    std::fs::write(
        dir.path().join("session.json"),
        r#"{"email":"ops@studio.dev","app_metadata":{"roles":["admin"]},"token":"tok-1"}"#,
    )
    .unwrap();
}

/// Tenet: a returning visitor sees their saved selection priced, with
/// no change badge on the restore itself.
#[test]
fn returning_visitor_resumes_where_they_left_off() {
    let dir = TempDir::new().unwrap();

    {
        let mut session =
            CalculatorSession::start(StateCache::new(dir.path()), studio_rates(), &NoPreference);
        session.choose_project("shop");
        session.choose_design("custom");
        session.toggle_module("payment");
    }

    let session =
        CalculatorSession::start(StateCache::new(dir.path()), studio_rates(), &NoPreference);
    let view = session.view();
    assert_eq!(view.hours, 272.0);
    assert_eq!(view.cost_label, "$6,800");
    assert_eq!(view.timeline_label, "6-7 weeks");
    assert_eq!(view.badge, None);
}

/// Tenet: a corrupt selection snapshot heals to an empty selection and
/// the corrupt entry is gone afterwards.
#[test]
fn corrupt_selection_snapshot_heals_to_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("selection.json");
    std::fs::write(&path, "{ definitely not json").unwrap();

    let cache = StateCache::new(dir.path());
    assert_eq!(cache.load(), None);
    assert!(!path.exists());

    let session = CalculatorSession::start(cache, studio_rates(), &NoPreference);
    assert_eq!(session.selection(), &Selection::default());
    assert_eq!(session.view().cost_label, "$0");
}

/// Tenet: a stored theme wins over the OS probe; nothing stored falls
/// back to the probe.
#[test]
fn theme_resolution_prefers_the_stored_choice() {
    struct DarkOs;
    impl ColorSchemeProbe for DarkOs {
        fn prefers_dark(&self) -> bool {
            true
        }
    }

    let dir = TempDir::new().unwrap();
    let cache = StateCache::new(dir.path());
    assert_eq!(cache.resolve_theme(&DarkOs), Theme::Dark);

    cache.save_theme(Theme::Light).unwrap();
    assert_eq!(cache.resolve_theme(&DarkOs), Theme::Light);
}

/// Tenet: interacting with a control flashes a signed hour delta on
/// that control; programmatic resets stay quiet.
#[test]
fn change_badges_follow_the_interaction() {
    let dir = TempDir::new().unwrap();
    let mut session =
        CalculatorSession::start(StateCache::new(dir.path()), studio_rates(), &NoPreference);

    let badge = session.choose_project("corporate").badge.unwrap();
    assert_eq!(badge.text, "+80h");

    let badge = session.toggle_module("seo").badge.unwrap();
    assert_eq!(badge.text, "+8h");

    let badge = session.toggle_module("seo").badge.unwrap();
    assert_eq!(badge.text, "-8h");

    assert_eq!(session.clear().badge, None);
}

/// Tenet: the gate admits a file-backed admin snapshot straight into
/// the editor, carrying the fetched table.
#[test]
fn file_backed_admin_reaches_the_editor() {
    let dir = TempDir::new().unwrap();
    admin_snapshot(&dir);

    let mut widget = FileIdentityWidget::new(dir.path());
    let gate = AdminGate::initialize(&mut widget, Arc::new(|| Ok(studio_rates())));

    match gate.state() {
        GateState::Editor { identity, rates } => {
            assert_eq!(identity.email, "ops@studio.dev");
            assert_eq!(identity.token.as_deref(), Some("tok-1"));
            assert_eq!(rates, studio_rates());
        }
        other => panic!("expected the editor, got {other:?}"),
    }
}

/// Tenet: without a snapshot the gate asks for login and never fetches.
#[test]
fn missing_snapshot_stays_at_the_login_prompt() {
    let dir = TempDir::new().unwrap();
    let mut widget = FileIdentityWidget::new(dir.path());
    let gate = AdminGate::initialize(
        &mut widget,
        Arc::new(|| panic!("no fetch may happen before admission")),
    );
    assert_eq!(gate.state(), GateState::LoginPrompt);
}

/// Tenet: an invalid table is refused locally; nothing goes on the
/// wire, so even an unroutable endpoint reports the validation error.
#[test]
fn invalid_rates_never_reach_the_network() {
    let client = SyncClient::new(SyncConfig::new("http://127.0.0.1:1"));
    let mut rates = studio_rates();
    rates.hourly_rate = f64::NAN;

    match client.submit_rates(&rates, "tok-1") {
        Err(SubmitError::Invalid(_)) => {}
        other => panic!("expected the local validation error, got {other:?}"),
    }
}

/// Tenet: an unreachable service degrades to an error value, never a
/// panic, and the calculator path shows the apology instead.
#[test]
fn unreachable_service_is_a_value_not_a_crash() {
    let client = SyncClient::new(SyncConfig::new("http://127.0.0.1:1"));
    match client.fetch_rates() {
        Err(FetchError::Transport(reason)) => assert!(!reason.is_empty()),
        other => panic!("expected a transport error, got {other:?}"),
    }
}

//! Admin authorization gate
//!
//! Decides which admin surface is shown from the identity widget's
//! current-user snapshot. The first decision is computed synchronously
//! at initialization, so the surface never flashes a wrong state while
//! waiting for a provider event. Login and logout notifications restart
//! the gate from that same synchronous check.

use crate::error::FetchError;
use crate::identity::{Identity, IdentityWidget};
use parking_lot::Mutex;
use ratecard_core::RateTable;
use std::sync::Arc;

/// States the admin surface can be in
#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    /// No authenticated user; show the login prompt
    LoginPrompt,
    /// Authenticated user without the admin role; editor suppressed
    Forbidden {
        /// Who was refused
        email: String,
    },
    /// Admission granted, rate table fetch in flight
    Loading,
    /// Editor open over the fetched table
    Editor {
        /// The admitted admin, credential included
        identity: Identity,
        /// Table to edit
        rates: RateTable,
    },
    /// Fetch failed; persistent until a reload retries it
    LoadFailed {
        /// Why the load failed
        reason: String,
    },
}

impl GateState {
    /// Stable label for logs
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoginPrompt => "login_prompt",
            Self::Forbidden { .. } => "forbidden",
            Self::Loading => "loading",
            Self::Editor { .. } => "editor",
            Self::LoadFailed { .. } => "load_failed",
        }
    }

    /// True when the editor is open
    #[inline]
    #[must_use]
    pub fn is_editor(&self) -> bool {
        matches!(self, Self::Editor { .. })
    }
}

/// Admission decision from an identity snapshot
///
/// Grants only an authenticated user carrying the admin role; every
/// denial is the gate state to show instead.
pub fn screen(user: Option<Identity>) -> Result<Identity, GateState> {
    match user {
        None => Err(GateState::LoginPrompt),
        Some(identity) if !identity.is_admin() => Err(GateState::Forbidden {
            email: identity.email,
        }),
        Some(identity) => Ok(identity),
    }
}

type FetchFn = Arc<dyn Fn() -> Result<RateTable, FetchError> + Send + Sync>;
type SharedState = Arc<Mutex<GateState>>;

/// The gate itself: current state plus the wiring that keeps it fresh
///
/// Clones share one state; the widget subscriptions registered at
/// initialization keep every clone current.
#[derive(Clone)]
pub struct AdminGate {
    state: SharedState,
    fetch: FetchFn,
}

impl AdminGate {
    /// Evaluate once from the current snapshot and subscribe to
    /// login/logout notifications
    ///
    /// Subscriptions are registered exactly once. A login notification
    /// re-evaluates with the user the provider reported; a logout
    /// re-evaluates signed out. Both are full restarts of the
    /// synchronous check, not incremental transitions.
    pub fn initialize<W: IdentityWidget>(widget: &mut W, fetch: FetchFn) -> Self {
        let state: SharedState = Arc::new(Mutex::new(GateState::LoginPrompt));
        evaluate(&state, &fetch, widget.current_user());

        let login_state = Arc::clone(&state);
        let login_fetch = Arc::clone(&fetch);
        widget.on_login(Box::new(move |user: &Identity| {
            evaluate(&login_state, &login_fetch, Some(user.clone()));
        }));

        let logout_state = Arc::clone(&state);
        let logout_fetch = Arc::clone(&fetch);
        widget.on_logout(Box::new(move || {
            evaluate(&logout_state, &logout_fetch, None);
        }));

        Self { state, fetch }
    }

    /// Current gate state
    #[must_use]
    pub fn state(&self) -> GateState {
        self.state.lock().clone()
    }

    /// Restart from the synchronous check, as a page reload would
    ///
    /// This is the retry affordance for [`GateState::LoadFailed`].
    pub fn reload<W: IdentityWidget>(&self, widget: &W) {
        evaluate(&self.state, &self.fetch, widget.current_user());
    }

    /// Release the gate
    ///
    /// Deliberately does nothing: subscriber lifetime matches process
    /// lifetime, so there is nothing to unregister.
    pub fn teardown(self) {}
}

fn evaluate(state: &SharedState, fetch: &FetchFn, user: Option<Identity>) {
    let identity = match screen(user) {
        Ok(identity) => identity,
        Err(denied) => {
            tracing::info!(state = denied.name(), "admin gate decided");
            *state.lock() = denied;
            return;
        }
    };

    tracing::info!(email = %identity.email, "admin admitted, loading rates");
    *state.lock() = GateState::Loading;

    match fetch() {
        Ok(rates) => {
            *state.lock() = GateState::Editor { identity, rates };
        }
        Err(err) => {
            tracing::warn!(error = %err, "rates load failed, editor unavailable");
            *state.lock() = GateState::LoadFailed {
                reason: err.to_string(),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{LoginCallback, LogoutCallback, MockIdentityWidget};
    use pretty_assertions::assert_eq;

    fn admin() -> Identity {
        Identity::new("ops@studio.dev").with_role("admin").with_token("tok")
    }

    fn visitor() -> Identity {
        Identity::new("visitor@studio.dev")
    }

    fn sample_rates() -> RateTable {
        RateTable::new().with_hourly_rate(25.0).with_project("landing", 40.0)
    }

    fn ok_fetch() -> FetchFn {
        Arc::new(|| Ok(sample_rates()))
    }

    /// Widget fake that stores registrations and can fire them later.
    #[derive(Default)]
    struct ScriptedWidget {
        user: Option<Identity>,
        logins: Vec<LoginCallback>,
        logouts: Vec<LogoutCallback>,
    }

    impl ScriptedWidget {
        fn fire_login(&mut self, user: &Identity) {
            self.user = Some(user.clone());
            for callback in &mut self.logins {
                callback(user);
            }
        }

        fn fire_logout(&mut self) {
            self.user = None;
            for callback in &mut self.logouts {
                callback();
            }
        }
    }

    impl IdentityWidget for ScriptedWidget {
        fn current_user(&self) -> Option<Identity> {
            self.user.clone()
        }

        fn on_login(&mut self, callback: LoginCallback) {
            self.logins.push(callback);
        }

        fn on_logout(&mut self, callback: LogoutCallback) {
            self.logouts.push(callback);
        }
    }

    #[test]
    fn screen_requires_a_user() {
        assert_eq!(screen(None), Err(GateState::LoginPrompt));
    }

    #[test]
    fn screen_requires_the_admin_role() {
        assert_eq!(
            screen(Some(visitor())),
            Err(GateState::Forbidden {
                email: "visitor@studio.dev".into()
            })
        );
    }

    #[test]
    fn screen_admits_admins() {
        assert_eq!(screen(Some(admin())), Ok(admin()));
    }

    #[test]
    fn signed_out_widget_yields_login_prompt_without_fetching() {
        let mut widget = MockIdentityWidget::new();
        widget.expect_current_user().returning(|| None);
        widget.expect_on_login().returning(|_| ());
        widget.expect_on_logout().returning(|_| ());

        let fetch: FetchFn = Arc::new(|| panic!("fetch must not run for signed-out users"));
        let gate = AdminGate::initialize(&mut widget, fetch);
        assert_eq!(gate.state(), GateState::LoginPrompt);
    }

    #[test]
    fn non_admin_is_forbidden_without_fetching() {
        let mut widget = MockIdentityWidget::new();
        widget.expect_current_user().returning(|| Some(visitor()));
        widget.expect_on_login().returning(|_| ());
        widget.expect_on_logout().returning(|_| ());

        let fetch: FetchFn = Arc::new(|| panic!("fetch must not run for non-admins"));
        let gate = AdminGate::initialize(&mut widget, fetch);
        assert_eq!(
            gate.state(),
            GateState::Forbidden {
                email: "visitor@studio.dev".into()
            }
        );
    }

    #[test]
    fn admin_snapshot_opens_the_editor() {
        let mut widget = ScriptedWidget {
            user: Some(admin()),
            ..ScriptedWidget::default()
        };

        let gate = AdminGate::initialize(&mut widget, ok_fetch());
        assert_eq!(
            gate.state(),
            GateState::Editor {
                identity: admin(),
                rates: sample_rates()
            }
        );
    }

    #[test]
    fn failed_load_is_persistent_until_reload() {
        let mut widget = ScriptedWidget {
            user: Some(admin()),
            ..ScriptedWidget::default()
        };

        let attempts = Arc::new(Mutex::new(0u32));
        let counter = Arc::clone(&attempts);
        let fetch: FetchFn = Arc::new(move || {
            let mut attempts = counter.lock();
            *attempts += 1;
            if *attempts == 1 {
                Err(FetchError::Status {
                    status: 500,
                    reason: "storage offline".into(),
                })
            } else {
                Ok(sample_rates())
            }
        });

        let gate = AdminGate::initialize(&mut widget, fetch);
        match gate.state() {
            GateState::LoadFailed { reason } => assert!(reason.contains("storage offline")),
            other => panic!("expected LoadFailed, got {other:?}"),
        }

        gate.reload(&widget);
        assert!(gate.state().is_editor());
    }

    #[test]
    fn login_notification_reevaluates_from_scratch() {
        let mut widget = ScriptedWidget::default();
        let gate = AdminGate::initialize(&mut widget, ok_fetch());
        assert_eq!(gate.state(), GateState::LoginPrompt);

        widget.fire_login(&admin());
        assert!(gate.state().is_editor());

        widget.fire_logout();
        assert_eq!(gate.state(), GateState::LoginPrompt);

        widget.fire_login(&visitor());
        assert_eq!(
            gate.state(),
            GateState::Forbidden {
                email: "visitor@studio.dev".into()
            }
        );
    }

    #[test]
    fn loading_is_entered_before_the_fetch_runs() {
        let mut widget = ScriptedWidget::default();

        let slot: Arc<Mutex<Option<AdminGate>>> = Arc::new(Mutex::new(None));
        let seen: Arc<Mutex<Option<GateState>>> = Arc::new(Mutex::new(None));
        let fetch_slot = Arc::clone(&slot);
        let fetch_seen = Arc::clone(&seen);
        let fetch: FetchFn = Arc::new(move || {
            if let Some(gate) = fetch_slot.lock().as_ref() {
                *fetch_seen.lock() = Some(gate.state());
            }
            Ok(sample_rates())
        });

        let gate = AdminGate::initialize(&mut widget, fetch);
        *slot.lock() = Some(gate.clone());

        widget.fire_login(&admin());
        assert_eq!(*seen.lock(), Some(GateState::Loading));
        assert!(gate.state().is_editor());
    }
}

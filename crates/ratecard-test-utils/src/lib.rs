//! Testing utilities for the ratecard workspace
//!
//! Shared fixtures and fakes: a populated rate table, ready-made
//! identities, and a scriptable identity widget.

#![allow(missing_docs)]

use ratecard_client::identity::{Identity, IdentityWidget, LoginCallback, LogoutCallback};
use ratecard_core::types::RateTable;

/// The studio price list most tests price against.
pub fn sample_rate_table() -> RateTable {
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

pub fn admin_identity(token: impl Into<String>) -> Identity {
    Identity::new("ops@studio.dev")
        .with_role("admin")
        .with_token(token)
}

pub fn visitor_identity() -> Identity {
    Identity::new("visitor@studio.dev")
}

/// Identity widget fake whose events are driven by the test.
///
/// `fire_login`/`fire_logout` update the snapshot first, then invoke
/// every registered callback, matching how the hosted widget behaves.
#[derive(Default)]
pub struct ScriptedIdentityWidget {
    user: Option<Identity>,
    logins: Vec<LoginCallback>,
    logouts: Vec<LogoutCallback>,
}

impl ScriptedIdentityWidget {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(user: Identity) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    pub fn fire_login(&mut self, user: &Identity) {
        self.user = Some(user.clone());
        for callback in &mut self.logins {
            callback(user);
        }
    }

    pub fn fire_logout(&mut self) {
        self.user = None;
        for callback in &mut self.logouts {
            callback();
        }
    }
}

impl IdentityWidget for ScriptedIdentityWidget {
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

//! Identity widget interface
//!
//! The identity provider is an external system. This module defines the
//! narrow capability surface the client consumes: a synchronous
//! current-user snapshot plus login/logout notifications. The provider
//! itself is never reimplemented here; `FileIdentityWidget` only reads
//! the snapshot document the provider's widget maintains.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Role claim that unlocks the rates editor
pub const ADMIN_ROLE: &str = "admin";

/// File name of the widget's current-user snapshot
pub const SESSION_FILE: &str = "session.json";

/// Provider-managed metadata carrying role claims
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMetadata {
    /// Roles granted by the provider
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A signed-in user as the identity widget reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Account email
    pub email: String,
    /// Provider-managed metadata carrying role claims
    #[serde(default)]
    pub app_metadata: AppMetadata,
    /// Bearer credential for authenticated calls, when the widget holds one
    #[serde(default)]
    pub token: Option<String>,
}

impl Identity {
    /// Create an identity with no roles and no credential
    #[inline]
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            app_metadata: AppMetadata::default(),
            token: None,
        }
    }

    /// With a role claim added
    #[inline]
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.app_metadata.roles.push(role.into());
        self
    }

    /// With a bearer credential attached
    #[inline]
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Roles granted by the provider
    #[inline]
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.app_metadata.roles
    }

    /// Check for the admin role claim
    #[inline]
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.app_metadata.roles.iter().any(|role| role == ADMIN_ROLE)
    }
}

/// Callback fired when a user signs in, carrying the new user
pub type LoginCallback = Box<dyn FnMut(&Identity) + Send>;

/// Callback fired when the user signs out
pub type LogoutCallback = Box<dyn FnMut() + Send>;

/// Narrow view of the external identity widget
///
/// `current_user` is the synchronous snapshot; the two registrations
/// are made once at initialization and fire on provider events. There
/// is no unregistration: subscriber lifetime matches process lifetime.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityWidget {
    /// Current signed-in user, if any
    fn current_user(&self) -> Option<Identity>;

    /// Register a callback fired when a user signs in
    fn on_login(&mut self, callback: LoginCallback);

    /// Register a callback fired when the user signs out
    fn on_logout(&mut self, callback: LogoutCallback);
}

/// Widget backed by the provider's on-disk snapshot document
///
/// The snapshot file is owned by the provider's widget; this reader
/// never writes or heals it. A missing or unreadable snapshot reads as
/// signed out. The file emits no events, so login/logout registrations
/// are accepted and never fired.
#[derive(Debug, Clone)]
pub struct FileIdentityWidget {
    path: PathBuf,
}

impl FileIdentityWidget {
    /// Read the snapshot from `state_dir/session.json`
    #[must_use]
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(SESSION_FILE),
        }
    }

    /// Path of the snapshot document
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityWidget for FileIdentityWidget {
    fn current_user(&self) -> Option<Identity> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(identity) => Some(identity),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "identity snapshot unreadable, treating as signed out"
                );
                None
            }
        }
    }

    fn on_login(&mut self, _callback: LoginCallback) {}

    fn on_logout(&mut self, _callback: LogoutCallback) {}
}

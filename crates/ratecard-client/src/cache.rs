//! Local persistence cache
//!
//! Durable client state lives as one JSON document per concern inside
//! the state directory: the in-progress selection and the theme
//! preference. A selection document that fails to parse is discarded on
//! load and the caller proceeds empty; the discard is logged, never
//! surfaced as an error.

use crate::error::CacheError;
use ratecard_core::{Selection, Theme};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the persisted selection
pub const SELECTION_FILE: &str = "selection.json";

/// File name of the persisted theme preference
pub const THEME_FILE: &str = "theme.json";

/// Host-level color-scheme preference probe
///
/// The real probe is host-specific; [`NoPreference`] is the portable
/// default. The probe is only consulted when no theme has been stored.
pub trait ColorSchemeProbe {
    /// True when the host prefers a dark scheme
    fn prefers_dark(&self) -> bool;
}

/// Probe reporting no dark-scheme preference
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreference;

impl ColorSchemeProbe for NoPreference {
    fn prefers_dark(&self) -> bool {
        false
    }
}

/// Directory-backed cache for selection and theme state
#[derive(Debug, Clone)]
pub struct StateCache {
    dir: PathBuf,
}

impl StateCache {
    /// Cache rooted at `dir`; the directory is created on first save
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The state directory
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the persisted selection
    ///
    /// Absent state reads as `None`. A document that fails to parse is
    /// removed and also reads as `None`; the next save rebuilds it.
    #[must_use]
    pub fn load(&self) -> Option<Selection> {
        let path = self.dir.join(SELECTION_FILE);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "selection cache unreadable, starting empty"
                );
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(selection) => Some(selection),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "selection cache corrupt, discarding"
                );
                if let Err(err) = fs::remove_file(&path) {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "corrupt selection cache could not be removed"
                    );
                }
                None
            }
        }
    }

    /// Persist the selection, replacing any previous snapshot
    pub fn save(&self, selection: &Selection) -> Result<(), CacheError> {
        let content = serde_json::to_string_pretty(selection)?;
        self.write_file(SELECTION_FILE, &content)
    }

    /// The stored theme preference, if one is stored and parses
    #[must_use]
    pub fn saved_theme(&self) -> Option<Theme> {
        let raw = fs::read_to_string(self.dir.join(THEME_FILE)).ok()?;
        serde_json::from_str(&raw).ok()
    }

    /// Persist the theme preference
    pub fn save_theme(&self, theme: Theme) -> Result<(), CacheError> {
        let content = serde_json::to_string(&theme)?;
        self.write_file(THEME_FILE, &content)
    }

    /// Theme to apply at startup
    ///
    /// A stored value wins outright. With nothing stored the host probe
    /// decides. A stored value that does not parse suppresses the probe
    /// and falls back to light, matching a stored-but-unrecognized
    /// preference.
    #[must_use]
    pub fn resolve_theme(&self, probe: &dyn ColorSchemeProbe) -> Theme {
        let path = self.dir.join(THEME_FILE);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => {
                return if probe.prefers_dark() {
                    Theme::Dark
                } else {
                    Theme::Light
                };
            }
        };

        match serde_json::from_str(&raw) {
            Ok(theme) => theme,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "theme preference unrecognized, using light"
                );
                Theme::Light
            }
        }
    }

    fn write_file(&self, name: &str, content: &str) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(name);
        fs::write(&path, content).map_err(|source| CacheError::Io { path, source })
    }
}

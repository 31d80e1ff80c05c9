//! Core types for the estimator
//!
//! Defines the fundamental entities:
//! - The rate table (the single remotely stored configuration document)
//! - A user's in-progress selection
//! - Control identifiers for the inputs a selection is edited through
//! - Theme preference

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The rates configuration document
///
/// A flat base price plus three open mappings from identifier to hour
/// cost. Identifier sets are not fixed by any schema: unknown keys inside
/// the mappings are carried as-is, unknown top-level members of the
/// document are captured in `extra`, and both survive a round-trip
/// unchanged (insertion order included). Lookups for missing identifiers
/// cost 0 hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    /// Base price per hour
    #[serde(default)]
    pub hourly_rate: f64,
    /// Hours keyed by project-type identifier
    #[serde(default)]
    pub project: IndexMap<String, f64>,
    /// Hours keyed by design-type identifier
    #[serde(default)]
    pub design: IndexMap<String, f64>,
    /// Hours keyed by add-on module identifier
    #[serde(default)]
    pub modules: IndexMap<String, f64>,
    /// Top-level members this version does not model, preserved verbatim
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl RateTable {
    /// Create an empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a base hourly rate
    #[inline]
    #[must_use]
    pub fn with_hourly_rate(mut self, rate: f64) -> Self {
        self.hourly_rate = rate;
        self
    }

    /// With one project-type entry
    #[inline]
    #[must_use]
    pub fn with_project(mut self, key: impl Into<String>, hours: f64) -> Self {
        self.project.insert(key.into(), hours);
        self
    }

    /// With one design-type entry
    #[inline]
    #[must_use]
    pub fn with_design(mut self, key: impl Into<String>, hours: f64) -> Self {
        self.design.insert(key.into(), hours);
        self
    }

    /// With one module entry
    #[inline]
    #[must_use]
    pub fn with_module(mut self, key: impl Into<String>, hours: f64) -> Self {
        self.modules.insert(key.into(), hours);
        self
    }

    /// Hours for a project type; missing identifiers cost 0
    #[inline]
    #[must_use]
    pub fn project_hours(&self, key: &str) -> f64 {
        self.project.get(key).copied().unwrap_or(0.0)
    }

    /// Hours for a design type; missing identifiers cost 0
    #[inline]
    #[must_use]
    pub fn design_hours(&self, key: &str) -> f64 {
        self.design.get(key).copied().unwrap_or(0.0)
    }

    /// Hours for a module; missing identifiers cost 0
    #[inline]
    #[must_use]
    pub fn module_hours(&self, key: &str) -> f64 {
        self.modules.get(key).copied().unwrap_or(0.0)
    }
}

/// A user's in-progress choice of project type, design type, and modules
///
/// Project and design are mutually exclusive single choices; modules are
/// an unbounded set. The whole value is what the local persistence cache
/// stores between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Single project-type choice, if any
    #[serde(default)]
    pub project_type: Option<String>,
    /// Single design-type choice, if any
    #[serde(default)]
    pub design_type: Option<String>,
    /// Chosen add-on modules (serialized as a sorted array)
    #[serde(default)]
    pub modules: BTreeSet<String>,
}

impl Selection {
    /// Create an empty selection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With the project type set
    #[inline]
    #[must_use]
    pub fn with_project(mut self, key: impl Into<String>) -> Self {
        self.project_type = Some(key.into());
        self
    }

    /// With the design type set
    #[inline]
    #[must_use]
    pub fn with_design(mut self, key: impl Into<String>) -> Self {
        self.design_type = Some(key.into());
        self
    }

    /// With one module added
    #[inline]
    #[must_use]
    pub fn with_module(mut self, key: impl Into<String>) -> Self {
        self.modules.insert(key.into());
        self
    }

    /// True when nothing is chosen
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.project_type.is_none() && self.design_type.is_none() && self.modules.is_empty()
    }

    /// Flip a module on or off; returns whether it is on afterwards
    pub fn toggle_module(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.modules.remove(&key) {
            false
        } else {
            self.modules.insert(key);
            true
        }
    }
}

/// Identifier of the input control a selection edit went through
///
/// Used to anchor the transient hour-delta annotation next to whichever
/// control holds interaction focus when a recompute fires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Control {
    /// A project-type choice
    Project(String),
    /// A design-type choice
    Design(String),
    /// A module toggle
    Module(String),
}

impl std::fmt::Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project(key) => write!(f, "project:{key}"),
            Self::Design(key) => write!(f, "design:{key}"),
            Self::Module(key) => write!(f, "module:{key}"),
        }
    }
}

/// Theme preference for the calculator surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme
    #[default]
    Light,
    /// Dark theme
    Dark,
}

impl Theme {
    /// Stable storage label (`"light"` / `"dark"`)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

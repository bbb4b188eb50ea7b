//! Area-type registry capability.
//!
//! The engine never decides what renders inside an area, but a host can hand
//! it a registry so new areas are checked against known kinds and pick up
//! default roles and state.

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::tree::AreaRole;

/// Host-declared metadata for one area kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaTypeDescriptor {
    pub kind: String,
    pub display_name: String,
    #[serde(default)]
    pub default_role: AreaRole,
    #[serde(default)]
    pub default_state: serde_json::Value,
}

impl AreaTypeDescriptor {
    #[must_use]
    pub fn new(kind: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            display_name: display_name.into(),
            default_role: AreaRole::default(),
            default_state: serde_json::Value::Null,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: AreaRole) -> Self {
        self.default_role = role;
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: serde_json::Value) -> Self {
        self.default_state = state;
        self
    }
}

/// Lookup of area kinds.
pub trait AreaTypeRegistry: Debug + Send + Sync {
    /// Descriptor for `kind`, or `None` if the kind is unknown.
    fn lookup(&self, kind: &str) -> Option<AreaTypeDescriptor>;

    /// Whether `kind` is registered.
    fn contains(&self, kind: &str) -> bool {
        self.lookup(kind).is_some()
    }
}

/// In-memory registry with deterministic iteration order.
#[derive(Debug, Clone, Default)]
pub struct StaticAreaTypeRegistry {
    entries: BTreeMap<String, AreaTypeDescriptor>,
}

impl StaticAreaTypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Self::register`].
    #[must_use]
    pub fn with(mut self, descriptor: AreaTypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Add or replace a descriptor.
    pub fn register(&mut self, descriptor: AreaTypeDescriptor) {
        let _ = self.entries.insert(descriptor.kind.clone(), descriptor);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered kinds in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl AreaTypeRegistry for StaticAreaTypeRegistry {
    fn lookup(&self, kind: &str) -> Option<AreaTypeDescriptor> {
        self.entries.get(kind).cloned()
    }
}

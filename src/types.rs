//! Core types for the drag system.
//!
//! This module defines the identities, payloads and small enums shared by
//! items, zones, sessions and the events emitted to host listeners.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identities
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Stable identity of a draggable item.
    ItemId
);

string_id!(
    /// Stable identity of a drop zone.
    ZoneId
);

/// Identity of one drag session, unique per pick-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Drag Modes
// ============================================================================

/// How the item is previewed while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewStrategy {
    /// The original visual is detached and floats under the pointer
    #[default]
    Move,
    /// A placeholder stays in place while the original floats
    Duplicate,
}

/// What a committed drop does to the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragEffect {
    /// The payload leaves the source zone
    #[default]
    Move,
    /// The source keeps its payload; the target receives a copy
    Copy,
}

/// Terminal result of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragOutcome {
    Commit,
    Abort,
}

impl DragOutcome {
    pub fn is_commit(&self) -> bool {
        matches!(self, Self::Commit)
    }
}

// ============================================================================
// Payload
// ============================================================================

/// Caller-supplied description of what is being dragged.
///
/// `kind` and `id` identify the payload (e.g. `note` / `n1`); zones use that
/// pair to keep their collections free of duplicates. Extra key/value data
/// travels along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPayload {
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, Value>,
}

impl DragPayload {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            data: BTreeMap::new(),
        }
    }

    /// Attach an extra value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// True if both payloads describe the same thing.
    pub fn same_identity(&self, other: &DragPayload) -> bool {
        self.kind == other.kind && self.id == other.id
    }
}

//! Strongly-typed identifier wrappers.
//!
//! Content and world entities are keyed by stable string identifiers so that
//! ordering (and therefore every settlement pass) is deterministic: sorting
//! ids compares raw bytes, which is ordinal string order. Movement
//! transitions are the exception -- they are ephemeral tokens and use
//! UUID v7 like every other runtime-generated id.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from anything convertible into a `String`.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is the empty string.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an operative.
    AgentId
}

define_id! {
    /// Unique identifier for a city (map node).
    CityId
}

define_id! {
    /// Unique identifier for a live anomaly instance.
    ///
    /// This is the single canonical identity for rosters, transitions and
    /// events. It is distinct from the static [`AnomalyDefId`].
    AnomalyId
}

define_id! {
    /// Identifier of a static anomaly definition in the content registry.
    AnomalyDefId
}

/// Unique identifier for a movement transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TransitionId(pub Uuid);

impl TransitionId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TransitionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for TransitionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

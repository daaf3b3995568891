//! Per-field privacy redaction for contact attributes.
//!
//! A contact can mark individual attributes (name, address,
//! occupation) as private with an optional reason. Redaction is
//! evaluated once, at the sync transform boundary, so private values
//! can never leak into payloads pushed to the Hub.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marker substituted for a private value in synced payloads.
pub const WITHHELD_MARKER: &str = "(withheld)";

/// A value carrying its own visibility policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redactable<T> {
    /// The raw value.
    value: T,
    /// Whether the value is private.
    private: bool,
    /// Optional reason the value is private.
    reason: Option<String>,
}

impl<T> Redactable<T> {
    /// Creates a public value.
    pub const fn public(value: T) -> Self {
        Self {
            value,
            private: false,
            reason: None,
        }
    }

    /// Creates a private value with an optional reason.
    pub const fn private(value: T, reason: Option<String>) -> Self {
        Self {
            value,
            private: true,
            reason,
        }
    }

    /// Returns true if the value is private.
    pub const fn is_private(&self) -> bool {
        self.private
    }

    /// Returns the reason the value is private, if recorded.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns the raw value only when it is public.
    pub const fn visible(&self) -> Option<&T> {
        if self.private { None } else { Some(&self.value) }
    }
}

impl Redactable<String> {
    /// Resolves the value for an external payload: the raw value when
    /// public, the withheld marker when private.
    #[must_use]
    pub fn resolve(&self) -> String {
        if self.private {
            WITHHELD_MARKER.to_string()
        } else {
            self.value.clone()
        }
    }
}

/// A counterparty contact with per-field privacy flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: Redactable<String>,
    /// Postal address.
    pub address: Redactable<String>,
    /// Occupation.
    pub occupation: Redactable<String>,
}

impl Contact {
    /// Resolves the name for synced payloads, honoring its privacy flag.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.resolve()
    }
}

//! Capability and extension lookup keys.
//!
//! # Responsibility
//! - Define the two keys every resolution request carries: the capability
//!   kind being requested and the named implementation of it.
//!
//! # Invariants
//! - `CapabilityType` values for distinct Rust types never compare equal.
//! - An `ExtensionName` is always non-empty and charset-validated.

use once_cell::sync::Lazy;
use regex::Regex;
use std::any::TypeId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifies the kind of extension being requested.
///
/// Distinct from the specific named implementation: one capability usually
/// has several named implementations registered behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CapabilityType {
    id: TypeId,
    name: &'static str,
}

impl CapabilityType {
    /// Capability key for the Rust type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Human-readable type name for diagnostics and log events.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Display for CapabilityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-z0-9][a-z0-9_.-]*$").expect("extension name pattern"));

/// Validated string key selecting one implementation of a capability.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtensionName(String);

impl ExtensionName {
    /// Parses and validates one extension name.
    pub fn new(value: &str) -> Result<Self, IdentError> {
        let normalized = value.trim();
        if normalized.is_empty() {
            return Err(IdentError::EmptyName);
        }
        if !Self::is_valid(normalized) {
            return Err(IdentError::InvalidName(normalized.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }

    /// Returns whether `value` matches the name charset.
    ///
    /// Also used for provider and chain ids, which share the same discipline.
    pub fn is_valid(value: &str) -> bool {
        NAME_PATTERN.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ExtensionName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lookup-key validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentError {
    EmptyName,
    InvalidName(String),
}

impl Display for IdentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "extension name must not be empty"),
            Self::InvalidName(value) => write!(f, "extension name is invalid: {value}"),
        }
    }
}

impl Error for IdentError {}

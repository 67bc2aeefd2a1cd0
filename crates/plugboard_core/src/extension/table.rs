//! Explicit registration-table provider.
//!
//! # Responsibility
//! - Map `(capability, name)` keys to pre-built instances or constructors.
//! - Guard each constructor with a one-time latch so repeated lookups
//!   observe one instance.
//!
//! # Invariants
//! - A key is registered at most once.
//! - A constructor failure leaves the latch unset; the error surfaces as
//!   `ProviderError` and the next lookup retries the constructor.

use crate::extension::ident::{CapabilityType, ExtensionName};
use crate::extension::provider::{
    ExtensionInstance, ExtensionProvider, ProviderError, ProviderResult,
};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Constructor for one deferred table entry.
pub type InstanceFactory = Box<dyn Fn() -> Result<ExtensionInstance, String> + Send + Sync>;

enum TableEntry {
    Prebuilt(ExtensionInstance),
    Deferred {
        factory: InstanceFactory,
        latch: OnceCell<ExtensionInstance>,
    },
}

/// In-process lookup backend populated at startup by explicit registration.
pub struct ExtensionTable {
    provider_id: String,
    entries: BTreeMap<(CapabilityType, ExtensionName), TableEntry>,
}

impl ExtensionTable {
    /// Creates an empty table with a stable provider id.
    pub fn new(provider_id: &str) -> Result<Self, TableError> {
        let provider_id = provider_id.trim();
        if !ExtensionName::is_valid(provider_id) {
            return Err(TableError::InvalidProviderId(provider_id.to_string()));
        }
        Ok(Self {
            provider_id: provider_id.to_string(),
            entries: BTreeMap::new(),
        })
    }

    /// Registers one pre-built instance under a capability/name key.
    pub fn insert_instance(
        &mut self,
        capability: CapabilityType,
        name: ExtensionName,
        instance: ExtensionInstance,
    ) -> Result<(), TableError> {
        self.insert_entry(capability, name, TableEntry::Prebuilt(instance))
    }

    /// Registers one deferred constructor under a capability/name key.
    ///
    /// The constructor runs at most once on the first matching lookup.
    pub fn insert_factory<F>(
        &mut self,
        capability: CapabilityType,
        name: ExtensionName,
        factory: F,
    ) -> Result<(), TableError>
    where
        F: Fn() -> Result<ExtensionInstance, String> + Send + Sync + 'static,
    {
        self.insert_entry(
            capability,
            name,
            TableEntry::Deferred {
                factory: Box::new(factory),
                latch: OnceCell::new(),
            },
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_entry(
        &mut self,
        capability: CapabilityType,
        name: ExtensionName,
        entry: TableEntry,
    ) -> Result<(), TableError> {
        let key = (capability, name);
        if self.entries.contains_key(&key) {
            return Err(TableError::DuplicateEntry {
                capability: key.0.name().to_string(),
                name: key.1.as_str().to_string(),
            });
        }
        self.entries.insert(key, entry);
        Ok(())
    }
}

impl fmt::Debug for ExtensionTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionTable")
            .field("provider_id", &self.provider_id)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl ExtensionProvider for ExtensionTable {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn resolve(
        &self,
        capability: CapabilityType,
        name: &ExtensionName,
    ) -> ProviderResult<Option<ExtensionInstance>> {
        let Some(entry) = self.entries.get(&(capability, name.clone())) else {
            return Ok(None);
        };

        match entry {
            TableEntry::Prebuilt(instance) => Ok(Some(instance.clone())),
            TableEntry::Deferred { factory, latch } => {
                let instance = latch.get_or_try_init(|| {
                    factory().map_err(|message| {
                        ProviderError::new(&self.provider_id, "construct_failed", &message)
                    })
                })?;
                Ok(Some(instance.clone()))
            }
        }
    }
}

/// Table registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    InvalidProviderId(String),
    DuplicateEntry { capability: String, name: String },
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProviderId(value) => write!(f, "table provider id is invalid: {value}"),
            Self::DuplicateEntry { capability, name } => {
                write!(f, "table entry already registered: {capability}/{name}")
            }
        }
    }
}

impl Error for TableError {}

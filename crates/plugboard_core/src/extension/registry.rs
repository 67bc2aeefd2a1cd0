//! Ordered provider registry with per-entry singleton latches.
//!
//! # Responsibility
//! - Hold the ordered set of named provider registrations; registration
//!   order is the priority order consumed by chain construction.
//! - Construct and cache one singleton provider per id on first use.
//!
//! # Invariants
//! - A provider id is registered at most once, so listings never repeat.
//! - `provider` is idempotent per id: repeat calls return the same handle.
//! - A failing factory leaves the latch unset and surfaces `RegistryError`.

use crate::extension::ident::ExtensionName;
use crate::extension::provider::ExtensionProvider;
use log::debug;
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

type ProviderFactory = Box<dyn Fn() -> Result<Arc<dyn ExtensionProvider>, String> + Send + Sync>;

struct RegistryEntry {
    provider_id: String,
    factory: ProviderFactory,
    singleton: OnceCell<Arc<dyn ExtensionProvider>>,
}

/// Ordered registry of provider factories and their cached singletons.
#[derive(Default)]
pub struct ProviderRegistry {
    entries: Vec<RegistryEntry>,
    index: BTreeMap<String, usize>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one provider factory under a stable id.
    ///
    /// Position in the listing follows registration order; earlier
    /// registrations take priority when a chain is built from this registry.
    pub fn register<F>(&mut self, provider_id: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Result<Arc<dyn ExtensionProvider>, String> + Send + Sync + 'static,
    {
        let provider_id = provider_id.trim().to_string();
        if !ExtensionName::is_valid(&provider_id) {
            return Err(RegistryError::InvalidProviderId(provider_id));
        }
        if self.index.contains_key(provider_id.as_str()) {
            return Err(RegistryError::DuplicateProviderId(provider_id));
        }

        debug!(
            "event=provider_registered module=extension status=ok provider={} position={}",
            provider_id,
            self.entries.len()
        );
        self.index.insert(provider_id.clone(), self.entries.len());
        self.entries.push(RegistryEntry {
            provider_id,
            factory: Box::new(factory),
            singleton: OnceCell::new(),
        });
        Ok(())
    }

    /// Registers one pre-built provider under its own id.
    pub fn register_instance(
        &mut self,
        provider: Arc<dyn ExtensionProvider>,
    ) -> Result<(), RegistryError> {
        let provider_id = provider.provider_id().to_string();
        self.register(&provider_id, move || Ok(provider.clone()))
    }

    /// Returns provider ids in registration (priority) order.
    pub fn provider_ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.provider_id.clone())
            .collect()
    }

    /// Returns ids whose singleton has already been constructed.
    pub fn constructed_ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.singleton.get().is_some())
            .map(|entry| entry.provider_id.clone())
            .collect()
    }

    /// Returns the singleton provider for one id, constructing it on first use.
    pub fn provider(&self, provider_id: &str) -> Result<Arc<dyn ExtensionProvider>, RegistryError> {
        let normalized = provider_id.trim();
        let Some(&position) = self.index.get(normalized) else {
            return Err(RegistryError::ProviderNotFound(normalized.to_string()));
        };

        let entry = &self.entries[position];
        entry
            .singleton
            .get_or_try_init(|| {
                (entry.factory)().map_err(|message| RegistryError::ProviderInit {
                    provider_id: entry.provider_id.clone(),
                    message,
                })
            })
            .map(Arc::clone)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Provider registration and construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    InvalidProviderId(String),
    DuplicateProviderId(String),
    ProviderNotFound(String),
    ProviderInit { provider_id: String, message: String },
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProviderId(value) => write!(f, "provider id is invalid: {value}"),
            Self::DuplicateProviderId(value) => {
                write!(f, "provider id already registered: {value}")
            }
            Self::ProviderNotFound(value) => write!(f, "provider not found: {value}"),
            Self::ProviderInit {
                provider_id,
                message,
            } => write!(f, "provider `{provider_id}` failed to construct: {message}"),
        }
    }
}

impl Error for RegistryError {}

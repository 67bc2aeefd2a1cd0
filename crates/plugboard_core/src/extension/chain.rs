//! Frozen provider chain, the single resolution point over all backends.
//!
//! # Responsibility
//! - Snapshot the registry's provider listing once at construction time.
//! - Answer every lookup by walking that frozen sequence in priority order,
//!   first present result wins.
//!
//! # Invariants
//! - The chain never changes after construction; registry mutations made
//!   later are invisible to it.
//! - A provider error propagates unchanged and stops the walk; it is never
//!   downgraded to "not found".
//! - Exhausting the chain (or an empty chain) yields `Ok(None)`, not an
//!   error.

use crate::extension::ident::{CapabilityType, ExtensionName, IdentError};
use crate::extension::provider::{
    ExtensionInstance, ExtensionProvider, ProviderError, ProviderResult,
};
use crate::extension::registry::{ProviderRegistry, RegistryError};
use log::debug;
use std::any::Any;
use std::fmt::{self, Formatter};
use std::sync::Arc;

/// Provider id the chain reports when registered inside another chain.
pub const DEFAULT_CHAIN_ID: &str = "provider_chain";

/// Immutable, priority-ordered sequence of providers.
///
/// Implements [`ExtensionProvider`] itself, so a chain can be registered as
/// one provider of a higher-level chain.
pub struct ProviderChain {
    chain_id: String,
    providers: Vec<Arc<dyn ExtensionProvider>>,
}

impl ProviderChain {
    /// Builds a chain from the registry's current listing.
    ///
    /// Pulls the listing exactly once, then constructs every singleton in
    /// that order. Any registry failure aborts construction; no partial
    /// chain is built.
    pub fn from_registry(registry: &ProviderRegistry) -> Result<Self, RegistryError> {
        let mut providers: Vec<Arc<dyn ExtensionProvider>> = Vec::with_capacity(registry.len());
        for provider_id in registry.provider_ids() {
            providers.push(registry.provider(&provider_id)?);
        }
        debug!(
            "event=chain_built module=extension status=ok providers={}",
            providers.len()
        );
        Ok(Self::from_providers(providers))
    }

    /// Builds a chain from explicitly wired providers, earliest first.
    pub fn from_providers(providers: Vec<Arc<dyn ExtensionProvider>>) -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            providers,
        }
    }

    /// Overrides the id this chain reports as a provider.
    ///
    /// Chain ids share the provider-id charset discipline, so an invalid id
    /// is rejected here instead of failing later at registration.
    pub fn with_chain_id(mut self, chain_id: &str) -> Result<Self, IdentError> {
        let chain_id = chain_id.trim();
        if chain_id.is_empty() {
            return Err(IdentError::EmptyName);
        }
        if !ExtensionName::is_valid(chain_id) {
            return Err(IdentError::InvalidName(chain_id.to_string()));
        }
        self.chain_id = chain_id.to_string();
        Ok(self)
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Returns provider ids in priority order.
    pub fn provider_ids(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|provider| provider.provider_id().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Resolves one extension by walking the chain, first match wins.
    ///
    /// No result caching happens here; every call re-walks the chain and
    /// each backend applies its own singleton discipline.
    pub fn resolve(
        &self,
        capability: CapabilityType,
        name: &ExtensionName,
    ) -> ProviderResult<Option<ExtensionInstance>> {
        for provider in &self.providers {
            if let Some(instance) = provider.resolve(capability, name)? {
                debug!(
                    "event=extension_resolved module=extension status=ok provider={} capability={} name={}",
                    provider.provider_id(),
                    capability.name(),
                    name
                );
                return Ok(Some(instance));
            }
        }
        Ok(None)
    }

    /// Resolves and downcasts one extension to its concrete type.
    ///
    /// A present instance that is not a `T` is reported as a provider error
    /// rather than silently treated as "not found".
    pub fn resolve_as<T: Any + Send + Sync>(
        &self,
        name: &ExtensionName,
    ) -> ProviderResult<Option<Arc<T>>> {
        let capability = CapabilityType::of::<T>();
        match self.resolve(capability, name)? {
            None => Ok(None),
            Some(instance) => instance.downcast::<T>().map(Some).map_err(|_| {
                ProviderError::new(
                    &self.chain_id,
                    "type_mismatch",
                    &format!("instance resolved for `{name}` is not a `{}`", capability.name()),
                )
            }),
        }
    }
}

impl fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderChain")
            .field("chain_id", &self.chain_id)
            .field("provider_ids", &self.provider_ids())
            .finish()
    }
}

impl ExtensionProvider for ProviderChain {
    fn provider_id(&self) -> &str {
        &self.chain_id
    }

    fn resolve(
        &self,
        capability: CapabilityType,
        name: &ExtensionName,
    ) -> ProviderResult<Option<ExtensionInstance>> {
        ProviderChain::resolve(self, capability, name)
    }
}

#[cfg(test)]
mod tests {
    use super::ProviderChain;
    use crate::extension::ident::{CapabilityType, ExtensionName, IdentError};
    use crate::extension::provider::ExtensionProvider;
    use crate::extension::table::ExtensionTable;
    use std::sync::Arc;

    struct Codec {
        label: &'static str,
    }

    fn name(value: &str) -> ExtensionName {
        ExtensionName::new(value).expect("test name should parse")
    }

    fn table_with(provider_id: &str, entry_name: &str, label: &'static str) -> ExtensionTable {
        let mut table = ExtensionTable::new(provider_id).expect("table id");
        table
            .insert_instance(
                CapabilityType::of::<Codec>(),
                name(entry_name),
                Arc::new(Codec { label }),
            )
            .expect("insert should succeed");
        table
    }

    #[test]
    fn earlier_provider_wins_over_later_one() {
        let chain = ProviderChain::from_providers(vec![
            Arc::new(table_with("local_table", "json", "local")),
            Arc::new(table_with("managed_container", "json", "container")),
        ]);

        let codec = chain
            .resolve_as::<Codec>(&name("json"))
            .expect("resolve should succeed")
            .expect("entry should be present");
        assert_eq!(codec.label, "local");
    }

    #[test]
    fn falls_through_to_later_provider() {
        let chain = ProviderChain::from_providers(vec![
            Arc::new(table_with("local_table", "json", "local")),
            Arc::new(table_with("managed_container", "kryo", "container")),
        ]);

        let codec = chain
            .resolve_as::<Codec>(&name("kryo"))
            .expect("resolve should succeed")
            .expect("entry should be present");
        assert_eq!(codec.label, "container");
    }

    #[test]
    fn empty_chain_resolves_to_empty() {
        let chain = ProviderChain::from_providers(vec![]);
        let resolved = chain
            .resolve(CapabilityType::of::<Codec>(), &name("anything"))
            .expect("resolve should succeed");
        assert!(resolved.is_none());
        assert!(chain.is_empty());
    }

    #[test]
    fn reports_provider_ids_in_priority_order() {
        let chain = ProviderChain::from_providers(vec![
            Arc::new(table_with("local_table", "json", "local")),
            Arc::new(table_with("managed_container", "kryo", "container")),
        ]);
        assert_eq!(chain.provider_ids(), vec!["local_table", "managed_container"]);
        assert_eq!(chain.provider_id(), super::DEFAULT_CHAIN_ID);
    }

    #[test]
    fn rejects_invalid_chain_id() {
        for value in ["Inner Chain", "  ", "_inner"] {
            let err = ProviderChain::from_providers(vec![])
                .with_chain_id(value)
                .expect_err("invalid chain id must fail");
            assert!(matches!(
                err,
                IdentError::EmptyName | IdentError::InvalidName(_)
            ));
        }

        let chain = ProviderChain::from_providers(vec![])
            .with_chain_id("inner_chain")
            .expect("valid chain id should be accepted");
        assert_eq!(chain.chain_id(), "inner_chain");
    }

    #[test]
    fn downcast_mismatch_is_an_error_not_a_miss() {
        #[derive(Debug)]
        struct Transport;

        let mut table = ExtensionTable::new("local_table").expect("table id");
        // Entry registered under Transport's capability but built as a Codec.
        table
            .insert_instance(
                CapabilityType::of::<Transport>(),
                name("json"),
                Arc::new(Codec { label: "json" }),
            )
            .expect("insert should succeed");
        let chain = ProviderChain::from_providers(vec![Arc::new(table)]);

        let err = chain
            .resolve_as::<Transport>(&name("json"))
            .expect_err("mismatched instance must fail");
        assert_eq!(err.code, "type_mismatch");
    }
}

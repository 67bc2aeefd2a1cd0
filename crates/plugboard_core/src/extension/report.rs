//! Serializable wiring snapshots for diagnostics.

use crate::extension::chain::ProviderChain;
use crate::extension::registry::ProviderRegistry;
use serde::Serialize;

/// Point-in-time view of one registry's wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrySnapshot {
    /// Provider ids in priority order.
    pub provider_ids: Vec<String>,
    /// Ids whose singleton has been constructed so far.
    pub constructed: Vec<String>,
}

/// Point-in-time view of one chain's wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainSnapshot {
    pub chain_id: String,
    /// Provider ids in priority order.
    pub provider_ids: Vec<String>,
}

/// Captures the wiring of one registry.
pub fn registry_snapshot(registry: &ProviderRegistry) -> RegistrySnapshot {
    RegistrySnapshot {
        provider_ids: registry.provider_ids(),
        constructed: registry.constructed_ids(),
    }
}

/// Captures the wiring of one chain.
pub fn chain_snapshot(chain: &ProviderChain) -> ChainSnapshot {
    ChainSnapshot {
        chain_id: chain.chain_id().to_string(),
        provider_ids: chain.provider_ids(),
    }
}

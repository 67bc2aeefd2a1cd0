//! Provider-chain extension resolution for pluggable backends.
//! This crate is the single source of truth for resolution-order invariants.

pub mod extension;
pub mod logging;

pub use extension::chain::{ProviderChain, DEFAULT_CHAIN_ID};
pub use extension::ident::{CapabilityType, ExtensionName, IdentError};
pub use extension::provider::{
    ExtensionInstance, ExtensionProvider, ProviderError, ProviderResult,
};
pub use extension::registry::{ProviderRegistry, RegistryError};
pub use extension::report::{chain_snapshot, registry_snapshot, ChainSnapshot, RegistrySnapshot};
pub use extension::table::{ExtensionTable, TableError};
pub use logging::{default_log_level, init_logging, logging_status};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Provider resolution contract shared by lookup backends and the chain.

use crate::extension::ident::{CapabilityType, ExtensionName};
use std::any::Any;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Opaque resolved extension instance.
///
/// Backends decide the concrete type; callers downcast at the edge via
/// [`crate::extension::chain::ProviderChain::resolve_as`].
pub type ExtensionInstance = Arc<dyn Any + Send + Sync>;

/// Result alias for provider resolution calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// One lookup backend able to resolve extension instances.
///
/// `resolve` returning `Ok(None)` means "no matching entry in this backend"
/// and is never an error; a failing backend returns `Err` instead, and the
/// chain propagates it without consulting later providers.
pub trait ExtensionProvider: Send + Sync {
    /// Stable provider id used in registry listings and log events.
    fn provider_id(&self) -> &str;

    /// Resolves one extension instance for a capability/name pair.
    fn resolve(
        &self,
        capability: CapabilityType,
        name: &ExtensionName,
    ) -> ProviderResult<Option<ExtensionInstance>>;
}

/// Structured failure envelope raised by one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub provider_id: String,
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider_id: &str, code: &str, message: &str) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "provider `{}` failed with `{}`: {}",
            self.provider_id, self.code, self.message
        )
    }
}

impl Error for ProviderError {}

//! Registry listing order, singleton discipline, and chain construction.

use plugboard_core::{
    registry_snapshot, CapabilityType, ExtensionInstance, ExtensionName, ExtensionProvider,
    ExtensionTable, ProviderChain, ProviderRegistry, ProviderResult, RegistryError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Codec {
    label: &'static str,
}

struct TracingProvider {
    provider_id: String,
}

impl ExtensionProvider for TracingProvider {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn resolve(
        &self,
        _capability: CapabilityType,
        _name: &ExtensionName,
    ) -> ProviderResult<Option<ExtensionInstance>> {
        Ok(None)
    }
}

fn name(value: &str) -> ExtensionName {
    ExtensionName::new(value).expect("test name should parse")
}

#[test]
fn chain_construction_follows_registration_order() {
    let mut registry = ProviderRegistry::new();
    for provider_id in ["local_table", "managed_container"] {
        registry
            .register(provider_id, move || {
                Ok(Arc::new(TracingProvider {
                    provider_id: provider_id.to_string(),
                }) as Arc<dyn ExtensionProvider>)
            })
            .expect("provider should register");
    }

    let chain = ProviderChain::from_registry(&registry).expect("chain should build");
    assert_eq!(
        chain.provider_ids(),
        vec!["local_table", "managed_container"]
    );
}

#[test]
fn provider_factories_run_once_across_rebuilt_chains() {
    let mut registry = ProviderRegistry::new();
    let constructions = Arc::new(AtomicUsize::new(0));
    let counter = constructions.clone();
    registry
        .register("local_table", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let mut table = ExtensionTable::new("local_table").map_err(|err| err.to_string())?;
            table
                .insert_instance(
                    CapabilityType::of::<Codec>(),
                    ExtensionName::new("json").map_err(|err| err.to_string())?,
                    Arc::new(Codec { label: "json" }),
                )
                .map_err(|err| err.to_string())?;
            Ok(Arc::new(table) as Arc<dyn ExtensionProvider>)
        })
        .expect("provider should register");

    let first_chain = ProviderChain::from_registry(&registry).expect("first chain");
    let second_chain = ProviderChain::from_registry(&registry).expect("second chain");
    assert_eq!(constructions.load(Ordering::SeqCst), 1);

    // Rebuilt chains share the same singleton backend and agree on answers.
    let from_first = first_chain
        .resolve(CapabilityType::of::<Codec>(), &name("json"))
        .expect("first chain resolve")
        .expect("entry should be present");
    let from_second = second_chain
        .resolve(CapabilityType::of::<Codec>(), &name("json"))
        .expect("second chain resolve")
        .expect("entry should be present");
    assert!(Arc::ptr_eq(&from_first, &from_second));
    assert_eq!(
        from_first.downcast::<Codec>().expect("codec downcast").label,
        "json"
    );
}

#[test]
fn failing_factory_aborts_chain_construction() {
    let mut registry = ProviderRegistry::new();
    registry
        .register_instance(Arc::new(TracingProvider {
            provider_id: "local_table".to_string(),
        }))
        .expect("provider should register");
    registry
        .register("managed_container", || Err("container offline".to_string()))
        .expect("provider should register");

    let err = ProviderChain::from_registry(&registry)
        .expect_err("construction must fail, not degrade to a shorter chain");
    assert_eq!(
        err,
        RegistryError::ProviderInit {
            provider_id: "managed_container".to_string(),
            message: "container offline".to_string(),
        }
    );
}

#[test]
fn snapshot_reflects_lazy_construction_progress() {
    let mut registry = ProviderRegistry::new();
    registry
        .register("local_table", || {
            Ok(Arc::new(TracingProvider {
                provider_id: "local_table".to_string(),
            }) as Arc<dyn ExtensionProvider>)
        })
        .expect("provider should register");

    assert!(registry_snapshot(&registry).constructed.is_empty());
    ProviderChain::from_registry(&registry).expect("chain should build");
    assert_eq!(registry_snapshot(&registry).constructed, vec!["local_table"]);
}

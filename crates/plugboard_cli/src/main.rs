//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `plugboard_core` wiring.
//! - Keep output deterministic for quick local sanity checks.

use plugboard_core::{
    chain_snapshot, CapabilityType, ExtensionName, ExtensionTable, ProviderChain,
    ProviderRegistry,
};
use std::error::Error;
use std::sync::Arc;

struct Greeting {
    text: String,
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut table = ExtensionTable::new("builtin_table")?;
    table.insert_instance(
        CapabilityType::of::<Greeting>(),
        ExtensionName::new("hello")?,
        Arc::new(Greeting {
            text: "hello from plugboard".to_string(),
        }),
    )?;

    let mut registry = ProviderRegistry::new();
    registry.register_instance(Arc::new(table))?;
    let chain = ProviderChain::from_registry(&registry)?;

    println!("plugboard_core version={}", plugboard_core::core_version());
    println!("chain={}", serde_json::to_string(&chain_snapshot(&chain))?);
    match chain.resolve_as::<Greeting>(&ExtensionName::new("hello")?)? {
        Some(greeting) => println!("resolved greeting={}", greeting.text),
        None => println!("resolved greeting=<none>"),
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("plugboard_cli error: {err}");
        std::process::exit(1);
    }
}

//! Extension resolution contracts.
//!
//! This module defines the lookup keys, the provider SPI, the explicit
//! registration table, the provider registry, and the frozen provider chain
//! that composes registered backends into one resolution point.

pub mod chain;
pub mod ident;
pub mod provider;
pub mod registry;
pub mod report;
pub mod table;

//! # Type Loader Module
//!
//! Resolution of optional capability contracts at route-registration time.
//!
//! The capability prober classifies a route's declared result type against a
//! fixed set of contracts. Some of those contracts are defined by optional
//! streaming provider libraries that may or may not be linked into a given
//! deployment. The [`TypeLoader`] trait is how the prober asks "is this
//! contract available here?" — a missing provider answers `None` and the
//! corresponding probe branch is skipped. Absence is never an error.
//!
//! [`ProviderRegistry`] is the shipped implementation: each optional provider
//! integration registers the contract names it supplies once at startup, and
//! the prober consults the registry read-only afterwards.

use dashmap::DashSet;
use std::sync::Arc;
use tracing::debug;

use crate::capability::contract;

/// A resolved contract type handle.
///
/// Carries only the canonical contract name; the prober matches it against a
/// route's [`crate::capability::ResultTypeDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractType {
    name: Arc<str>,
}

impl ContractType {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Pluggable contract resolution used by the capability prober.
pub trait TypeLoader: Send + Sync {
    /// Resolve a contract type by its canonical name.
    ///
    /// Returns `None` when the providing library is absent from the
    /// deployment. Implementations must never fail for an unknown name.
    fn try_load(&self, name: &str) -> Option<ContractType>;
}

/// Registry of contract names supplied by the optional provider libraries
/// present in this deployment.
///
/// Providers register during startup, before routes are bound; the prober
/// only reads afterwards.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    contracts: DashSet<String>,
}

impl ProviderRegistry {
    /// Create an empty registry: no optional providers are available, so only
    /// core contracts will classify.
    #[must_use]
    pub fn new() -> Self {
        Self {
            contracts: DashSet::new(),
        }
    }

    /// Create a registry with every optional contract this crate knows about,
    /// as if all provider libraries were linked.
    #[must_use]
    pub fn with_default_providers() -> Self {
        let registry = Self::new();
        for name in contract::OPTIONAL {
            registry.register(name);
        }
        registry
    }

    /// Register a contract name supplied by a provider library.
    pub fn register(&self, name: &str) {
        debug!(contract = name, "provider contract registered");
        self.contracts.insert(name.to_string());
    }

    /// Number of registered optional contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

impl TypeLoader for ProviderRegistry {
    fn try_load(&self, name: &str) -> Option<ContractType> {
        if self.contracts.contains(name) {
            Some(ContractType::new(name))
        } else {
            None
        }
    }
}

use smallvec::SmallVec;
use std::sync::Arc;
use tracing::debug;

use crate::loader::TypeLoader;

/// Contract names recognized by the prober.
///
/// Core contracts are always resolvable; optional contracts belong to
/// provider libraries and are resolved through the active
/// [`TypeLoader`](crate::loader::TypeLoader) before being considered.
pub mod contract {
    /// Deferred value completed through a callback (core).
    pub const DEFERRED: &str = "core/deferred";
    /// Base-runtime broadcast channel primitive (core).
    pub const BROADCAST: &str = "core/broadcast";
    /// Context-passthrough marker: the handler writes the response itself (core).
    pub const EXCHANGE: &str = "core/exchange";
    /// Raw byte reader copied to the response sink (core).
    pub const BYTE_READER: &str = "core/byte-reader";
    /// File or path whose bytes are copied to the response sink (core).
    pub const FILE_SOURCE: &str = "core/file-source";

    /// Single async value (provider: rx).
    pub const RX_SINGLE: &str = "rx/single";
    /// Single async value (provider: flo).
    pub const FLO_ONCE: &str = "flo/once";
    /// Zero-or-one async value (provider: rx).
    pub const RX_MAYBE: &str = "rx/maybe";
    /// Ordered stream with backpressure (provider: rx).
    pub const RX_FLOWABLE: &str = "rx/flowable";
    /// Ordered stream without backpressure (provider: rx).
    pub const RX_OBSERVABLE: &str = "rx/observable";
    /// Cancellable handle with no payload (provider: rx).
    pub const RX_DISPOSABLE: &str = "rx/disposable";
    /// Generic reactive-streams publisher contract.
    pub const STREAMS_PUBLISHER: &str = "streams/publisher";

    /// Every optional contract, in no particular order. Used to seed a
    /// registry as if all provider libraries were present.
    pub const OPTIONAL: [&str; 7] = [
        RX_SINGLE,
        FLO_ONCE,
        RX_MAYBE,
        RX_FLOWABLE,
        RX_OBSERVABLE,
        RX_DISPOSABLE,
        STREAMS_PUBLISHER,
    ];
}

/// The classified shape of a handler's return value.
///
/// Exactly one capability is selected per route; selection is deterministic
/// and total, falling back to [`Capability::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Future-like value completed once through a callback.
    Deferred,
    /// Producer emitting exactly one value asynchronously.
    SingleAsync,
    /// Producer emitting zero or one value asynchronously.
    MaybeAsync,
    /// Producer emitting an ordered sequence of chunks.
    ManyAsync,
    /// Cancellable handle with no payload; the handler's own subscription
    /// completes the exchange.
    ManyAsyncZeroOrOne,
    /// File or path copied byte-for-byte to the response sink.
    RawStream,
    /// Byte reader copied to the response sink.
    RawInputStream,
    /// The handler already wrote the response through the exchange.
    PassthroughContext,
    /// Plain return value treated as an already-computed body.
    None,
}

impl Capability {
    /// True when response completion happens after the invoking coroutine
    /// returns. Async capabilities get the detach wrapper.
    #[must_use]
    pub fn is_async(self) -> bool {
        matches!(
            self,
            Capability::Deferred
                | Capability::SingleAsync
                | Capability::MaybeAsync
                | Capability::ManyAsync
                | Capability::ManyAsyncZeroOrOne
        )
    }

    /// True when consuming the result parks the calling coroutine. Blocking
    /// capabilities must never run on an event-loop coroutine.
    #[must_use]
    pub fn is_blocking(self) -> bool {
        matches!(
            self,
            Capability::RawStream
                | Capability::RawInputStream
                | Capability::PassthroughContext
                | Capability::None
        )
    }
}

/// Declared result type of a route handler, resolved once at registration.
///
/// Immutable; used only as a probe key, never at request time. Carries the
/// concrete type name plus the contract names the type satisfies.
#[derive(Debug, Clone)]
pub struct ResultTypeDescriptor {
    name: Arc<str>,
    contracts: SmallVec<[Arc<str>; 4]>,
}

impl ResultTypeDescriptor {
    /// Descriptor for a type satisfying no known contract. Such a route
    /// classifies as [`Capability::None`].
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            contracts: SmallVec::new(),
        }
    }

    /// Record a contract this type satisfies.
    #[must_use]
    pub fn with_contract(mut self, contract: &str) -> Self {
        self.contracts.push(Arc::from(contract));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn satisfies(&self, contract: &str) -> bool {
        self.contracts.iter().any(|c| c.as_ref() == contract)
    }
}

/// Whether a probe rule's contract is core or must resolve through the loader.
#[derive(Debug, Clone, Copy)]
enum Availability {
    Core,
    Loaded,
}

struct ProbeRule {
    contract: &'static str,
    capability: Capability,
    availability: Availability,
}

/// Ordered probe table; first match wins. Mirrors the priority order of the
/// capability contracts: deferred first, then the optional single/maybe/
/// stream providers, then the generic and base-runtime stream contracts,
/// then the synchronous core shapes.
static PROBE_TABLE: &[ProbeRule] = &[
    ProbeRule {
        contract: contract::DEFERRED,
        capability: Capability::Deferred,
        availability: Availability::Core,
    },
    ProbeRule {
        contract: contract::RX_SINGLE,
        capability: Capability::SingleAsync,
        availability: Availability::Loaded,
    },
    ProbeRule {
        contract: contract::FLO_ONCE,
        capability: Capability::SingleAsync,
        availability: Availability::Loaded,
    },
    ProbeRule {
        contract: contract::RX_MAYBE,
        capability: Capability::MaybeAsync,
        availability: Availability::Loaded,
    },
    ProbeRule {
        contract: contract::RX_FLOWABLE,
        capability: Capability::ManyAsync,
        availability: Availability::Loaded,
    },
    ProbeRule {
        contract: contract::RX_OBSERVABLE,
        capability: Capability::ManyAsync,
        availability: Availability::Loaded,
    },
    ProbeRule {
        contract: contract::RX_DISPOSABLE,
        capability: Capability::ManyAsyncZeroOrOne,
        availability: Availability::Loaded,
    },
    ProbeRule {
        contract: contract::STREAMS_PUBLISHER,
        capability: Capability::ManyAsync,
        availability: Availability::Loaded,
    },
    ProbeRule {
        contract: contract::BROADCAST,
        capability: Capability::ManyAsync,
        availability: Availability::Core,
    },
    ProbeRule {
        contract: contract::EXCHANGE,
        capability: Capability::PassthroughContext,
        availability: Availability::Core,
    },
    ProbeRule {
        contract: contract::BYTE_READER,
        capability: Capability::RawInputStream,
        availability: Availability::Core,
    },
    ProbeRule {
        contract: contract::FILE_SOURCE,
        capability: Capability::RawStream,
        availability: Availability::Core,
    },
];

/// Classify a result type against the probe table.
///
/// Deterministic for a given `(loader, descriptor)` pair. Optional contracts
/// that the loader cannot resolve are skipped; a descriptor matching nothing
/// classifies as [`Capability::None`].
#[must_use]
pub fn probe(loader: &dyn TypeLoader, descriptor: &ResultTypeDescriptor) -> Capability {
    for rule in PROBE_TABLE {
        if !descriptor.satisfies(rule.contract) {
            continue;
        }
        let available = match rule.availability {
            Availability::Core => true,
            Availability::Loaded => loader.try_load(rule.contract).is_some(),
        };
        if available {
            debug!(
                result_type = %descriptor.name(),
                contract = rule.contract,
                capability = ?rule.capability,
                "capability resolved"
            );
            return rule.capability;
        }
    }
    debug!(
        result_type = %descriptor.name(),
        "no capability contract matched, treating return value as body"
    );
    Capability::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_async_and_blocking_are_disjoint() {
        let all = [
            Capability::Deferred,
            Capability::SingleAsync,
            Capability::MaybeAsync,
            Capability::ManyAsync,
            Capability::ManyAsyncZeroOrOne,
            Capability::RawStream,
            Capability::RawInputStream,
            Capability::PassthroughContext,
            Capability::None,
        ];
        for capability in all {
            assert!(
                capability.is_async() != capability.is_blocking(),
                "{capability:?}"
            );
        }
    }

    #[test]
    fn test_descriptor_satisfies() {
        let descriptor =
            ResultTypeDescriptor::new("EventStream").with_contract(contract::RX_FLOWABLE);
        assert!(descriptor.satisfies(contract::RX_FLOWABLE));
        assert!(!descriptor.satisfies(contract::RX_OBSERVABLE));
        assert_eq!(descriptor.name(), "EventStream");
    }
}

use std::sync::Arc;

use crate::exchange::ExchangeRef;
use crate::producer::ReturnValue;

/// Result of invoking a chain node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Response fully produced on the calling coroutine.
    Completed,
    /// Completion deferred to a subscription callback or another executor.
    Pending,
    /// Failure already delivered to the error hand-off.
    Errored,
}

/// One node of a route's handler chain.
///
/// Chains are built once per route at startup and never change afterwards;
/// nodes hold no per-request state beyond the read-only `next` reference, so
/// one chain serves concurrent requests.
pub trait ChainHandler: Send + Sync {
    fn invoke(&self, exchange: &ExchangeRef) -> Outcome;
}

/// Head of a route's handler chain, stored on the route at startup.
pub type HandlerChain = Arc<dyn ChainHandler>;

/// The terminal handler a route exposes to the pipeline: application code
/// producing the route's declared result.
pub trait RouteHandler: Send + Sync {
    fn call(&self, exchange: &ExchangeRef) -> anyhow::Result<ReturnValue>;
}

impl<F> RouteHandler for F
where
    F: Fn(&ExchangeRef) -> anyhow::Result<ReturnValue> + Send + Sync,
{
    fn call(&self, exchange: &ExchangeRef) -> anyhow::Result<ReturnValue> {
        self(exchange)
    }
}

/// Wrap a closure as a shared terminal handler.
pub fn route_fn<F>(f: F) -> Arc<dyn RouteHandler>
where
    F: Fn(&ExchangeRef) -> anyhow::Result<ReturnValue> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Report a return value whose shape does not match the bound capability.
pub(crate) fn reject_mismatch(
    exchange: &ExchangeRef,
    expected: &'static str,
    got: &ReturnValue,
) -> Outcome {
    exchange.send_error(anyhow::anyhow!(
        "handler returned a {} result where the route is bound for {}",
        got.kind(),
        expected
    ));
    Outcome::Errored
}

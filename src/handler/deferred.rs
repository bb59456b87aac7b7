use std::sync::Arc;

use super::core::{reject_mismatch, ChainHandler, Outcome, RouteHandler};
use crate::exchange::ExchangeRef;
use crate::producer::ReturnValue;

/// Adapter for the `Deferred` capability.
///
/// Registers a completion callback on the deferred value: success writes the
/// resolved body, failure routes to the error hand-off. Never blocks the
/// calling coroutine.
pub struct DeferredHandler {
    next: Arc<dyn RouteHandler>,
}

impl DeferredHandler {
    pub fn new(next: Arc<dyn RouteHandler>) -> Self {
        Self { next }
    }
}

impl ChainHandler for DeferredHandler {
    fn invoke(&self, exchange: &ExchangeRef) -> Outcome {
        match self.next.call(exchange) {
            Ok(ReturnValue::Deferred(deferred)) => {
                let exchange = Arc::clone(exchange);
                deferred.on_complete(move |outcome| match outcome {
                    Ok(value) => exchange.write_body(value),
                    Err(cause) => exchange.send_error(cause),
                });
                Outcome::Pending
            }
            Ok(other) => reject_mismatch(exchange, "a deferred value", &other),
            Err(cause) => {
                exchange.send_error(cause);
                Outcome::Errored
            }
        }
    }
}

use std::sync::Arc;

use super::core::{reject_mismatch, ChainHandler, Outcome, RouteHandler};
use crate::exchange::ExchangeRef;
use crate::producer::ReturnValue;

/// Adapter for the `ManyAsyncZeroOrOne` capability: the handler returned a
/// cancellable handle and its own producer job writes the response, so there
/// is nothing to consume here.
pub struct NoopHandler {
    next: Arc<dyn RouteHandler>,
}

impl NoopHandler {
    pub fn new(next: Arc<dyn RouteHandler>) -> Self {
        Self { next }
    }
}

impl ChainHandler for NoopHandler {
    fn invoke(&self, exchange: &ExchangeRef) -> Outcome {
        match self.next.call(exchange) {
            Ok(ReturnValue::Handle(_handle)) => Outcome::Pending,
            Ok(other) => reject_mismatch(exchange, "a cancellable handle", &other),
            Err(cause) => {
                exchange.send_error(cause);
                Outcome::Errored
            }
        }
    }
}

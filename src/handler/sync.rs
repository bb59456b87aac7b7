use std::sync::Arc;

use super::core::{reject_mismatch, ChainHandler, Outcome, RouteHandler};
use crate::exchange::ExchangeRef;
use crate::producer::ReturnValue;

/// Adapter for the `None` capability: the return value is an
/// already-computed body and is written as-is.
pub struct DefaultHandler {
    next: Arc<dyn RouteHandler>,
}

impl DefaultHandler {
    pub fn new(next: Arc<dyn RouteHandler>) -> Self {
        Self { next }
    }
}

impl ChainHandler for DefaultHandler {
    fn invoke(&self, exchange: &ExchangeRef) -> Outcome {
        match self.next.call(exchange) {
            Ok(ReturnValue::Value(value)) => {
                exchange.write_body(value);
                Outcome::Completed
            }
            Ok(other) => reject_mismatch(exchange, "a plain body", &other),
            Err(cause) => {
                exchange.send_error(cause);
                Outcome::Errored
            }
        }
    }
}

/// Adapter for the `PassthroughContext` capability: the handler wrote the
/// response through the exchange itself; nothing is consumed here.
pub struct PassthroughHandler {
    next: Arc<dyn RouteHandler>,
}

impl PassthroughHandler {
    pub fn new(next: Arc<dyn RouteHandler>) -> Self {
        Self { next }
    }
}

impl ChainHandler for PassthroughHandler {
    fn invoke(&self, exchange: &ExchangeRef) -> Outcome {
        match self.next.call(exchange) {
            Ok(ReturnValue::Exchange) => Outcome::Completed,
            Ok(other) => reject_mismatch(exchange, "the exchange marker", &other),
            Err(cause) => {
                exchange.send_error(cause);
                Outcome::Errored
            }
        }
    }
}

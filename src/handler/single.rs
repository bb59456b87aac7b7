use std::sync::Arc;

use super::core::{reject_mismatch, ChainHandler, Outcome, RouteHandler};
use crate::exchange::ExchangeRef;
use crate::producer::ReturnValue;

/// Adapter for the `SingleAsync` capability: exactly one emitted value
/// completes the exchange; a producer error is handed off once. Subscribing
/// does not block.
pub struct SingleHandler {
    next: Arc<dyn RouteHandler>,
}

impl SingleHandler {
    pub fn new(next: Arc<dyn RouteHandler>) -> Self {
        Self { next }
    }
}

impl ChainHandler for SingleHandler {
    fn invoke(&self, exchange: &ExchangeRef) -> Outcome {
        match self.next.call(exchange) {
            Ok(ReturnValue::Single(single)) => {
                let exchange = Arc::clone(exchange);
                single.subscribe(move |outcome| match outcome {
                    Ok(value) => exchange.write_body(value),
                    Err(cause) => exchange.send_error(cause),
                });
                Outcome::Pending
            }
            Ok(other) => reject_mismatch(exchange, "a single async value", &other),
            Err(cause) => {
                exchange.send_error(cause);
                Outcome::Errored
            }
        }
    }
}

/// Adapter for the `MaybeAsync` capability: zero or one emitted value. An
/// empty completion ends the exchange with no body.
pub struct MaybeHandler {
    next: Arc<dyn RouteHandler>,
}

impl MaybeHandler {
    pub fn new(next: Arc<dyn RouteHandler>) -> Self {
        Self { next }
    }
}

impl ChainHandler for MaybeHandler {
    fn invoke(&self, exchange: &ExchangeRef) -> Outcome {
        match self.next.call(exchange) {
            Ok(ReturnValue::Maybe(maybe)) => {
                let exchange = Arc::clone(exchange);
                maybe.subscribe(move |outcome| match outcome {
                    Ok(Some(value)) => exchange.write_body(value),
                    Ok(None) => exchange.end_stream(),
                    Err(cause) => exchange.send_error(cause),
                });
                Outcome::Pending
            }
            Ok(other) => reject_mismatch(exchange, "a zero-or-one async value", &other),
            Err(cause) => {
                exchange.send_error(cause);
                Outcome::Errored
            }
        }
    }
}

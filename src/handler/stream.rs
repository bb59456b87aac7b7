use serde_json::Value;
use std::sync::Arc;

use super::core::{reject_mismatch, ChainHandler, Outcome, RouteHandler};
use crate::exchange::ExchangeRef;
use crate::producer::{ReturnValue, Subscriber, Subscription};

/// Adapter for the `ManyAsync` capability family.
///
/// Subscribes a bounded-demand subscriber that requests one item at a time,
/// writes each item as a response chunk in arrival order, and signals
/// end-of-body on completion. At most one terminal signal is forwarded.
pub struct StreamHandler {
    next: Arc<dyn RouteHandler>,
}

impl StreamHandler {
    pub fn new(next: Arc<dyn RouteHandler>) -> Self {
        Self { next }
    }
}

impl ChainHandler for StreamHandler {
    fn invoke(&self, exchange: &ExchangeRef) -> Outcome {
        match self.next.call(exchange) {
            Ok(ReturnValue::Stream(source)) => {
                source.subscribe(ChunkSubscriber {
                    exchange: Arc::clone(exchange),
                    terminated: false,
                });
                Outcome::Pending
            }
            Ok(other) => reject_mismatch(exchange, "a chunk stream", &other),
            Err(cause) => {
                exchange.send_error(cause);
                Outcome::Errored
            }
        }
    }
}

/// Writes stream items to the exchange with one-at-a-time demand.
struct ChunkSubscriber {
    exchange: ExchangeRef,
    terminated: bool,
}

impl ChunkSubscriber {
    /// Claim the terminal slot; only the first claim forwards a signal.
    fn take_terminal(&mut self) -> bool {
        if self.terminated {
            return false;
        }
        self.terminated = true;
        true
    }

    fn chunk_bytes(item: Value) -> Vec<u8> {
        match item {
            Value::String(s) => s.into_bytes(),
            other => other.to_string().into_bytes(),
        }
    }
}

impl Subscriber for ChunkSubscriber {
    fn on_subscribe(&mut self, subscription: &Subscription) {
        subscription.request(1);
    }

    fn on_next(&mut self, item: Value, subscription: &Subscription) {
        if self.exchange.is_closed() {
            subscription.cancel();
            return;
        }
        self.exchange.write_chunk(&Self::chunk_bytes(item));
        subscription.request(1);
    }

    fn on_error(&mut self, cause: anyhow::Error) {
        if self.take_terminal() {
            self.exchange.send_error(cause);
        }
    }

    fn on_complete(&mut self) {
        if self.take_terminal() {
            self.exchange.end_stream();
        }
    }
}

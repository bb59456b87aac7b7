use super::core::{ChainHandler, HandlerChain, Outcome};
use crate::exchange::ExchangeRef;

/// Marks the exchange detached before invoking the wrapped adapter.
///
/// Applied to every asynchronous adapter so the caller's synchronous return
/// path does not treat "handler returned" as "response finished"; completion
/// happens later, possibly on another coroutine. Transparent otherwise.
pub struct DetachHandler {
    next: HandlerChain,
}

impl DetachHandler {
    pub fn new(next: HandlerChain) -> Self {
        Self { next }
    }
}

impl ChainHandler for DetachHandler {
    fn invoke(&self, exchange: &ExchangeRef) -> Outcome {
        exchange.detach();
        self.next.invoke(exchange)
    }
}

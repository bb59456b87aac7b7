use std::sync::Arc;
use tracing::debug;

use super::core::{ChainHandler, HandlerChain, Outcome};
use crate::exchange::ExchangeRef;
use crate::executor::{Executor, WorkerPool};

/// Moves invocation of the wrapped chain onto the shared worker pool.
///
/// Used for blocking adapters under the default mode and for everything
/// under worker mode. The pool task owns clones of the chain and exchange
/// handles; the caller returns immediately.
pub struct WorkerHandler {
    next: HandlerChain,
    pool: Arc<WorkerPool>,
}

impl WorkerHandler {
    pub fn new(next: HandlerChain, pool: Arc<WorkerPool>) -> Self {
        Self { next, pool }
    }
}

impl ChainHandler for WorkerHandler {
    fn invoke(&self, exchange: &ExchangeRef) -> Outcome {
        let next = Arc::clone(&self.next);
        let exchange = Arc::clone(exchange);
        self.pool.execute(Box::new(move || {
            let outcome = next.invoke(&exchange);
            debug!(
                request_id = %exchange.request_id(),
                outcome = ?outcome,
                "worker dispatch finished"
            );
        }));
        Outcome::Pending
    }
}

/// Moves invocation of the wrapped chain onto a route-scoped executor.
/// Selected whenever the route supplies one, regardless of execution mode.
pub struct ExecHandler {
    next: HandlerChain,
    executor: Arc<dyn Executor>,
}

impl ExecHandler {
    pub fn new(next: HandlerChain, executor: Arc<dyn Executor>) -> Self {
        Self { next, executor }
    }
}

impl ChainHandler for ExecHandler {
    fn invoke(&self, exchange: &ExchangeRef) -> Outcome {
        let next = Arc::clone(&self.next);
        let exchange = Arc::clone(exchange);
        self.executor.execute(Box::new(move || {
            let outcome = next.invoke(&exchange);
            debug!(
                request_id = %exchange.request_id(),
                outcome = ?outcome,
                "route executor dispatch finished"
            );
        }));
        Outcome::Pending
    }
}

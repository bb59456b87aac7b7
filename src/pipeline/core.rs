use http::Method;
use std::sync::Arc;
use tracing::info;

use crate::capability::{probe, Capability, ResultTypeDescriptor};
use crate::executor::{ExecutionMode, Executor, WorkerPool};
use crate::handler::{
    DefaultHandler, DeferredHandler, DetachHandler, ExecHandler, FileHandler, HandlerChain,
    MaybeHandler, NoopHandler, PassthroughHandler, ReaderHandler, RouteHandler, SingleHandler,
    StreamHandler, WorkerHandler,
};
use crate::loader::TypeLoader;

/// A route as the pipeline sees it: the declared result type, an optional
/// route-scoped executor, and the terminal handler to wrap.
#[derive(Clone)]
pub struct RouteBinding {
    /// Handler name used in logs
    pub handler_name: Arc<str>,
    /// HTTP method, carried for logging only
    pub method: Method,
    /// Route path pattern, carried for logging only
    pub path: String,
    result_type: ResultTypeDescriptor,
    executor: Option<Arc<dyn Executor>>,
    handler: Arc<dyn RouteHandler>,
}

impl RouteBinding {
    pub fn new(
        handler_name: &str,
        method: Method,
        path: &str,
        result_type: ResultTypeDescriptor,
        handler: Arc<dyn RouteHandler>,
    ) -> Self {
        Self {
            handler_name: Arc::from(handler_name),
            method,
            path: path.to_string(),
            result_type,
            executor: None,
            handler,
        }
    }

    /// Attach a route-scoped executor; it overrides the execution mode for
    /// this route only.
    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = Some(executor);
        self
    }

    #[must_use]
    pub fn result_type(&self) -> &ResultTypeDescriptor {
        &self.result_type
    }

    #[must_use]
    pub fn executor(&self) -> Option<&Arc<dyn Executor>> {
        self.executor.as_ref()
    }

    /// The terminal/innermost handler the chain wraps.
    #[must_use]
    pub fn pipeline(&self) -> &Arc<dyn RouteHandler> {
        &self.handler
    }
}

/// Where a route's chain runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchChoice {
    /// Dispatched through the route-scoped executor.
    RouteExecutor,
    /// Dispatched through the shared worker pool.
    WorkerPool,
    /// Run directly on the invoking coroutine.
    Direct,
}

/// The decision made once per route at startup. Two computations for the
/// same route and mode always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchDecision {
    pub capability: Capability,
    pub blocking: bool,
    pub detached: bool,
    pub dispatch: DispatchChoice,
}

/// The dispatch facade: composes prober, adapter selection, detach wrapping,
/// and execution binding. Built once at startup.
pub struct Pipeline {
    loader: Arc<dyn TypeLoader>,
    mode: ExecutionMode,
    worker_pool: Arc<WorkerPool>,
}

impl Pipeline {
    pub fn new(
        loader: Arc<dyn TypeLoader>,
        mode: ExecutionMode,
        worker_pool: Arc<WorkerPool>,
    ) -> Self {
        Self {
            loader,
            mode,
            worker_pool,
        }
    }

    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Resolve the dispatch decision for a route without building the chain.
    #[must_use]
    pub fn decision(&self, route: &RouteBinding) -> DispatchDecision {
        let capability = probe(self.loader.as_ref(), route.result_type());
        let blocking = capability.is_blocking();
        let dispatch = if route.executor().is_some() {
            DispatchChoice::RouteExecutor
        } else {
            match self.mode {
                ExecutionMode::Worker => DispatchChoice::WorkerPool,
                ExecutionMode::EventLoop if blocking => DispatchChoice::WorkerPool,
                _ => DispatchChoice::Direct,
            }
        };
        DispatchDecision {
            capability,
            blocking,
            detached: capability.is_async(),
            dispatch,
        }
    }

    /// Build the handler chain for a route.
    ///
    /// Invoked once per route during startup; the returned head is stored on
    /// the route and reused for every matching request.
    #[must_use]
    pub fn compute(&self, route: &RouteBinding) -> HandlerChain {
        let decision = self.decision(route);
        info!(
            handler_name = %route.handler_name,
            method = %route.method,
            path = %route.path,
            capability = ?decision.capability,
            blocking = decision.blocking,
            dispatch = ?decision.dispatch,
            "handler chain bound"
        );

        let adapter = adapter_for(decision.capability, Arc::clone(route.pipeline()));
        let adapter: HandlerChain = if decision.detached {
            Arc::new(DetachHandler::new(adapter))
        } else {
            adapter
        };

        match decision.dispatch {
            DispatchChoice::RouteExecutor => match route.executor() {
                Some(executor) => Arc::new(ExecHandler::new(adapter, Arc::clone(executor))),
                // decision() only picks RouteExecutor when one is present
                None => adapter,
            },
            DispatchChoice::WorkerPool => Arc::new(WorkerHandler::new(
                adapter,
                Arc::clone(&self.worker_pool),
            )),
            DispatchChoice::Direct => adapter,
        }
    }
}

/// Select the adapter node for a capability.
fn adapter_for(capability: Capability, next: Arc<dyn RouteHandler>) -> HandlerChain {
    match capability {
        Capability::Deferred => Arc::new(DeferredHandler::new(next)),
        Capability::SingleAsync => Arc::new(SingleHandler::new(next)),
        Capability::MaybeAsync => Arc::new(MaybeHandler::new(next)),
        Capability::ManyAsync => Arc::new(StreamHandler::new(next)),
        Capability::ManyAsyncZeroOrOne => Arc::new(NoopHandler::new(next)),
        Capability::RawInputStream => Arc::new(ReaderHandler::new(next)),
        Capability::RawStream => Arc::new(FileHandler::new(next)),
        Capability::PassthroughContext => Arc::new(PassthroughHandler::new(next)),
        Capability::None => Arc::new(DefaultHandler::new(next)),
    }
}

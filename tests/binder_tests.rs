//! Tests for the execution binder decision table
//!
//! # Test Coverage
//!
//! - Route-scoped executor overrides every mode
//! - Worker mode always dispatches to the pool
//! - Event-loop mode offloads blocking chains and runs the rest directly
//! - Custom mode never dispatches
//! - Detach marking tracks the async capabilities

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use brrtpipe::capability::{contract, ResultTypeDescriptor};
use brrtpipe::exchange::{BufferedExchange, ExchangeRef, Terminal};
use brrtpipe::executor::{ExecutionMode, Executor, Task, WorkerPool, WorkerPoolConfig};
use brrtpipe::handler::route_fn;
use brrtpipe::pipeline::{DispatchChoice, Pipeline, RouteBinding};
use brrtpipe::producer::ReturnValue;
use brrtpipe::loader::ProviderRegistry;
use http::Method;
use serde_json::json;

mod tracing_util;
use tracing_util::set_stack_size;

/// Route-scoped executor that counts dispatches and runs tasks on a
/// coroutine, as a custom executor would.
struct CountingExecutor {
    dispatched: AtomicUsize,
}

impl CountingExecutor {
    fn new() -> Self {
        Self {
            dispatched: AtomicUsize::new(0),
        }
    }

    fn count(&self) -> usize {
        self.dispatched.load(Ordering::Relaxed)
    }
}

impl Executor for CountingExecutor {
    fn execute(&self, task: Task) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        may::go!(move || task());
    }
}

fn pipeline(mode: ExecutionMode) -> Pipeline {
    let registry = Arc::new(ProviderRegistry::with_default_providers());
    let pool = Arc::new(unsafe { WorkerPool::new("binder-test", WorkerPoolConfig::default()) });
    Pipeline::new(registry, mode, pool)
}

fn value_route(name: &str) -> RouteBinding {
    RouteBinding::new(
        name,
        Method::GET,
        "/items",
        ResultTypeDescriptor::new("ItemBody"),
        route_fn(|_ex| Ok(ReturnValue::Value(json!({ "ok": true })))),
    )
}

fn deferred_route(name: &str) -> RouteBinding {
    RouteBinding::new(
        name,
        Method::GET,
        "/deferred",
        ResultTypeDescriptor::new("DeferredBody").with_contract(contract::DEFERRED),
        route_fn(|_ex| {
            let (completer, deferred) = brrtpipe::producer::deferred();
            completer.complete(json!("later"));
            Ok(ReturnValue::Deferred(deferred))
        }),
    )
}

fn file_route(name: &str) -> RouteBinding {
    RouteBinding::new(
        name,
        Method::GET,
        "/download",
        ResultTypeDescriptor::new("ReportFile").with_contract(contract::FILE_SOURCE),
        route_fn(|_ex| Ok(ReturnValue::File(std::path::PathBuf::from("/dev/null")))),
    )
}

#[test]
fn test_route_executor_overrides_every_mode() {
    let _tracing = set_stack_size();
    for mode in [
        ExecutionMode::EventLoop,
        ExecutionMode::Worker,
        ExecutionMode::Custom,
    ] {
        let pipeline = pipeline(mode);
        let executor = Arc::new(CountingExecutor::new());
        let route = value_route("with_executor").with_executor(executor.clone());
        let decision = pipeline.decision(&route);
        assert_eq!(decision.dispatch, DispatchChoice::RouteExecutor, "{mode:?}");

        let chain = pipeline.compute(&route);
        let (exchange, done) = BufferedExchange::new();
        chain.invoke(&(exchange.clone() as ExchangeRef));
        assert_eq!(done.recv().unwrap(), Terminal::Completed);
        assert_eq!(executor.count(), 1, "{mode:?}");
    }
}

#[test]
fn test_worker_mode_dispatches_everything() {
    let _tracing = set_stack_size();
    let pipeline = pipeline(ExecutionMode::Worker);
    assert_eq!(
        pipeline.decision(&value_route("plain")).dispatch,
        DispatchChoice::WorkerPool
    );
    assert_eq!(
        pipeline.decision(&deferred_route("deferred")).dispatch,
        DispatchChoice::WorkerPool
    );
}

#[test]
fn test_event_loop_mode_offloads_blocking_only() {
    let _tracing = set_stack_size();
    let pipeline = pipeline(ExecutionMode::EventLoop);

    // Raw file copy parks the calling coroutine: never direct.
    let file = pipeline.decision(&file_route("download"));
    assert!(file.blocking);
    assert_eq!(file.dispatch, DispatchChoice::WorkerPool);

    // Plain handlers may run arbitrary user code: offloaded too.
    let plain = pipeline.decision(&value_route("plain"));
    assert!(plain.blocking);
    assert_eq!(plain.dispatch, DispatchChoice::WorkerPool);

    // Non-blocking async adapters stay on the event loop.
    let deferred = pipeline.decision(&deferred_route("deferred"));
    assert!(!deferred.blocking);
    assert_eq!(deferred.dispatch, DispatchChoice::Direct);
}

#[test]
fn test_custom_mode_never_dispatches() {
    let _tracing = set_stack_size();
    let pipeline = pipeline(ExecutionMode::Custom);
    assert_eq!(
        pipeline.decision(&value_route("plain")).dispatch,
        DispatchChoice::Direct
    );
    assert_eq!(
        pipeline.decision(&file_route("download")).dispatch,
        DispatchChoice::Direct
    );
}

#[test]
fn test_detach_tracks_async_capabilities() {
    let _tracing = set_stack_size();
    let pipeline = pipeline(ExecutionMode::Custom);
    assert!(pipeline.decision(&deferred_route("deferred")).detached);
    assert!(!pipeline.decision(&value_route("plain")).detached);
    assert!(!pipeline.decision(&file_route("download")).detached);
}

#[test]
fn test_decision_is_idempotent() {
    let _tracing = set_stack_size();
    for mode in [
        ExecutionMode::EventLoop,
        ExecutionMode::Worker,
        ExecutionMode::Custom,
    ] {
        let pipeline = pipeline(mode);
        let route = deferred_route("deferred");
        assert_eq!(pipeline.decision(&route), pipeline.decision(&route));
    }
}

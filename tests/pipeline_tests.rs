//! Tests for the dispatch facade
//!
//! # Test Coverage
//!
//! - End-to-end chain invocation for sync and async routes
//! - Detach marking on the exchange for async chains only
//! - Worker-pool offload under the default mode delivers the same body
//! - Recomputing a chain yields identical dispatch behavior

use std::sync::Arc;

use brrtpipe::capability::{contract, ResultTypeDescriptor};
use brrtpipe::exchange::{BufferedExchange, Exchange, ExchangeRef, Terminal};
use brrtpipe::executor::{ExecutionMode, WorkerPool, WorkerPoolConfig};
use brrtpipe::handler::route_fn;
use brrtpipe::loader::ProviderRegistry;
use brrtpipe::pipeline::{Pipeline, RouteBinding};
use brrtpipe::producer::{self, ReturnValue};
use http::Method;
use serde_json::json;

mod tracing_util;
use tracing_util::set_stack_size;

fn pipeline(mode: ExecutionMode) -> Pipeline {
    let registry = Arc::new(ProviderRegistry::with_default_providers());
    let pool = Arc::new(unsafe { WorkerPool::new("pipeline-test", WorkerPoolConfig::default()) });
    Pipeline::new(registry, mode, pool)
}

fn invoke(chain: &brrtpipe::handler::HandlerChain) -> (Arc<BufferedExchange>, Terminal) {
    let (exchange, done) = BufferedExchange::new();
    chain.invoke(&(exchange.clone() as ExchangeRef));
    let terminal = done.recv().unwrap();
    (exchange, terminal)
}

#[test]
fn test_plain_route_runs_direct_in_custom_mode() {
    let _tracing = set_stack_size();
    let pipeline = pipeline(ExecutionMode::Custom);
    let route = RouteBinding::new(
        "get_status",
        Method::GET,
        "/status",
        ResultTypeDescriptor::new("StatusBody"),
        route_fn(|_ex| Ok(ReturnValue::Value(json!({ "status": "ok" })))),
    );
    let chain = pipeline.compute(&route);
    let (exchange, terminal) = invoke(&chain);
    assert_eq!(terminal, Terminal::Completed);
    assert_eq!(exchange.body_string(), "{\"status\":\"ok\"}");
    assert!(!exchange.is_detached());
}

#[test]
fn test_plain_route_offloaded_in_event_loop_mode() {
    let _tracing = set_stack_size();
    let pipeline = pipeline(ExecutionMode::EventLoop);
    let route = RouteBinding::new(
        "get_status",
        Method::GET,
        "/status",
        ResultTypeDescriptor::new("StatusBody"),
        route_fn(|_ex| Ok(ReturnValue::Value(json!("offloaded")))),
    );
    let chain = pipeline.compute(&route);
    // The body arrives through the worker pool, not the invoking thread.
    let (exchange, terminal) = invoke(&chain);
    assert_eq!(terminal, Terminal::Completed);
    assert_eq!(exchange.body_string(), "offloaded");
}

#[test]
fn test_deferred_route_marks_detached() {
    let _tracing = set_stack_size();
    let pipeline = pipeline(ExecutionMode::EventLoop);
    let route = RouteBinding::new(
        "get_report",
        Method::GET,
        "/report",
        ResultTypeDescriptor::new("DeferredReport").with_contract(contract::DEFERRED),
        route_fn(|_ex| {
            let (completer, deferred) = producer::deferred();
            may::go!(move || completer.complete(json!("generated")));
            Ok(ReturnValue::Deferred(deferred))
        }),
    );
    let chain = pipeline.compute(&route);
    let (exchange, terminal) = invoke(&chain);
    assert_eq!(terminal, Terminal::Completed);
    assert!(exchange.is_detached());
    assert_eq!(exchange.body_string(), "generated");
}

#[test]
fn test_passthrough_route_leaves_handler_writes() {
    let _tracing = set_stack_size();
    let pipeline = pipeline(ExecutionMode::Custom);
    let route = RouteBinding::new(
        "render_page",
        Method::GET,
        "/page",
        ResultTypeDescriptor::new("PageWriter").with_contract(contract::EXCHANGE),
        route_fn(|ex| {
            ex.write_body(json!("written by handler"));
            Ok(ReturnValue::Exchange)
        }),
    );
    let chain = pipeline.compute(&route);
    let (exchange, terminal) = invoke(&chain);
    assert_eq!(terminal, Terminal::Completed);
    assert_eq!(exchange.body_string(), "written by handler");
    assert!(!exchange.is_detached());
}

#[test]
fn test_recomputed_chain_behaves_identically() {
    let _tracing = set_stack_size();
    let pipeline = pipeline(ExecutionMode::EventLoop);
    let route = RouteBinding::new(
        "get_status",
        Method::GET,
        "/status",
        ResultTypeDescriptor::new("StatusBody"),
        route_fn(|_ex| Ok(ReturnValue::Value(json!({ "n": 1 })))),
    );
    assert_eq!(pipeline.decision(&route), pipeline.decision(&route));

    let first = pipeline.compute(&route);
    let second = pipeline.compute(&route);
    let (ex1, t1) = invoke(&first);
    let (ex2, t2) = invoke(&second);
    assert_eq!(t1, t2);
    assert_eq!(ex1.body_string(), ex2.body_string());
}

#[test]
fn test_handler_failure_reaches_error_handoff() {
    let _tracing = set_stack_size();
    let pipeline = pipeline(ExecutionMode::Custom);
    let route = RouteBinding::new(
        "always_fails",
        Method::GET,
        "/fails",
        ResultTypeDescriptor::new("NeverBody"),
        route_fn(|_ex| Err(anyhow::anyhow!("database unavailable"))),
    );
    let chain = pipeline.compute(&route);
    let (exchange, terminal) = invoke(&chain);
    assert_eq!(
        terminal,
        Terminal::Errored("database unavailable".to_string())
    );
    assert_eq!(exchange.error().as_deref(), Some("database unavailable"));
    assert_eq!(exchange.body_string(), "");
}

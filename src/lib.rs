//! # brrtpipe
//!
//! **brrtpipe** is a response-type dispatch pipeline for coroutine HTTP
//! services built on the [`may`](https://docs.rs/may) runtime.
//!
//! ## Overview
//!
//! A route handler can produce its response in many shapes: a plain value, a
//! deferred value completed later, a single or zero-or-one async value, an
//! ordered stream of chunks, a raw byte source, or nothing because the
//! handler wrote the response itself. Delivering each shape correctly has
//! real concurrency consequences — the wrong wrapping blocks a shared
//! event-loop coroutine, double-dispatches a call, or fails to detach a
//! streaming producer from the request coroutine.
//!
//! brrtpipe makes that decision once per route at startup: it probes the
//! route's declared result type for the capability it satisfies, picks the
//! matching adapter, wraps asynchronous adapters with the detach marker, and
//! binds the chain to the right executor for the configured execution mode.
//! The resulting chain head is stored on the route and invoked unchanged for
//! every matching request.
//!
//! ## Architecture
//!
//! - **[`capability`]** - result type descriptors and the capability prober
//! - **[`loader`]** - optional provider contract resolution
//! - **[`producer`]** - channel-backed async value primitives
//! - **[`handler`]** - adapter handlers, detach wrapper, dispatch decorators
//! - **[`executor`]** - execution modes, executor trait, worker pool
//! - **[`pipeline`]** - the dispatch facade composing all of the above
//! - **[`exchange`]** - the response-side collaborator surface
//! - **[`runtime_config`]** - environment-based runtime configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use brrtpipe::capability::ResultTypeDescriptor;
//! use brrtpipe::exchange::BufferedExchange;
//! use brrtpipe::executor::{ExecutionMode, WorkerPool, WorkerPoolConfig};
//! use brrtpipe::handler::route_fn;
//! use brrtpipe::loader::ProviderRegistry;
//! use brrtpipe::pipeline::{Pipeline, RouteBinding};
//! use brrtpipe::producer::ReturnValue;
//!
//! // Startup: register available providers, build the shared worker pool.
//! let registry = Arc::new(ProviderRegistry::with_default_providers());
//! let pool = Arc::new(unsafe { WorkerPool::new("pipeline", WorkerPoolConfig::from_env()) });
//! let pipeline = Pipeline::new(registry, ExecutionMode::from_env(), pool);
//!
//! // Bind a route whose handler returns a plain JSON body.
//! let route = RouteBinding::new(
//!     "get_status",
//!     http::Method::GET,
//!     "/status",
//!     ResultTypeDescriptor::new("StatusBody"),
//!     route_fn(|_exchange| Ok(ReturnValue::Value(serde_json::json!({ "status": "ok" })))),
//! );
//! let chain = pipeline.compute(&route);
//!
//! // Per request: invoke the stored chain with the exchange.
//! let (exchange, done) = BufferedExchange::new();
//! chain.invoke(&(exchange.clone() as brrtpipe::exchange::ExchangeRef));
//! let _ = done.recv();
//! ```
//!
//! ## Runtime Considerations
//!
//! brrtpipe uses the `may` coroutine runtime, not tokio or async-std:
//!
//! - Worker pool tasks and producer subscriptions run in coroutines
//! - Stack size is configurable via the `BRRTP_STACK_SIZE` environment variable
//! - Blocking adapters (raw byte copies, plain handlers) are kept off the
//!   event loop by the execution binder

pub mod capability;
pub mod exchange;
pub mod executor;
pub mod handler;
pub mod ids;
pub mod loader;
pub mod pipeline;
pub mod producer;
pub mod runtime_config;

pub use capability::{probe, Capability, ResultTypeDescriptor};
pub use exchange::{BufferedExchange, Exchange, ExchangeRef, Terminal};
pub use executor::{ExecutionMode, Executor, Task, WorkerPool, WorkerPoolConfig};
pub use handler::{route_fn, ChainHandler, HandlerChain, Outcome, RouteHandler};
pub use ids::RequestId;
pub use loader::{ContractType, ProviderRegistry, TypeLoader};
pub use pipeline::{DispatchChoice, DispatchDecision, Pipeline, RouteBinding};
pub use producer::ReturnValue;

//! # Handler Module
//!
//! The adapter handlers and decorators that make up a route's handler chain.
//!
//! ## Overview
//!
//! Every node implements [`ChainHandler`]: invoked once per matching request
//! with the exchange, returning an [`Outcome`]. The innermost node wraps the
//! route's terminal [`RouteHandler`] with the adapter selected for the
//! route's capability:
//!
//! - [`DeferredHandler`] — registers a completion callback on a deferred value
//! - [`SingleHandler`] / [`MaybeHandler`] — subscribe to one / zero-or-one
//!   async value
//! - [`StreamHandler`] — bounded-demand chunk subscription
//! - [`NoopHandler`] — cancellable handle; the handler's own job writes
//! - [`ReaderHandler`] / [`FileHandler`] — blocking raw byte copy
//! - [`DefaultHandler`] — plain return value written as the body
//! - [`PassthroughHandler`] — the handler already wrote the response
//!
//! Decorators wrap adapters: [`DetachHandler`] marks async exchanges
//! detached; [`WorkerHandler`] and [`ExecHandler`] move invocation onto the
//! worker pool or a route-scoped executor.
//!
//! ## Error policy
//!
//! A failure from the terminal handler or from a producer is delivered to the
//! exchange's error hand-off exactly once, and the adapter returns
//! [`Outcome::Errored`] instead of propagating, so outer decorators still
//! finalize their bookkeeping.

mod core;
mod deferred;
mod detach;
mod dispatch;
mod noop;
mod raw;
mod single;
mod stream;
mod sync;

pub use core::{route_fn, ChainHandler, HandlerChain, Outcome, RouteHandler};
pub use deferred::DeferredHandler;
pub use detach::DetachHandler;
pub use dispatch::{ExecHandler, WorkerHandler};
pub use noop::NoopHandler;
pub use raw::{FileHandler, ReaderHandler};
pub use single::{MaybeHandler, SingleHandler};
pub use stream::StreamHandler;
pub use sync::{DefaultHandler, PassthroughHandler};

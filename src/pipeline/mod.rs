//! # Pipeline Module
//!
//! The dispatch facade: probe a route's result type, pick the adapter, wrap
//! it for detach and execution, and hand back the chain head.
//!
//! ## Overview
//!
//! [`Pipeline::compute`] is invoked exactly once per route during startup,
//! before traffic begins; the returned [`HandlerChain`](crate::handler::HandlerChain)
//! is stored on the route and reused for every subsequent matching request.
//! Construction only inspects static type and configuration information, so
//! it needs no synchronization and has no effect on in-flight requests.
//!
//! The dispatch decision — capability, blocking flag, detach, executor
//! choice — is exposed as [`DispatchDecision`] for logging and tests.

mod core;

pub use core::{DispatchChoice, DispatchDecision, Pipeline, RouteBinding};

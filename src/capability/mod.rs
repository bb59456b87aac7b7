//! # Capability Module
//!
//! Classification of a route handler's declared result type into the
//! capability that drives adapter selection.
//!
//! ## Overview
//!
//! A route handler can produce its response in several shapes: a plain value,
//! a deferred value completed later, a single/zero-or-one async value, an
//! ordered stream of chunks, a raw byte source, or nothing at all because the
//! handler wrote the response itself. The prober inspects the route's
//! [`ResultTypeDescriptor`] once, at registration time, and resolves exactly
//! one [`Capability`] for it.
//!
//! ## Probe order
//!
//! Classification walks a fixed, ordered table of contract checks and returns
//! on the first match. Core contracts (deferred values, raw byte sources, the
//! context-passthrough marker, the base-runtime broadcast primitive) are
//! checked directly. Contracts defined by optional provider libraries are
//! first resolved through the [`crate::loader::TypeLoader`]; a provider that
//! is not present simply removes its branches from consideration. A type that
//! matches nothing classifies as [`Capability::None`] and its return value is
//! treated as an already-computed body.
//!
//! The result is deterministic for a given `(loader, descriptor)` pair and is
//! computed at most once per route.

mod core;

pub use core::{contract, probe, Capability, ResultTypeDescriptor};

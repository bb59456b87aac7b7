//! # Producer Module
//!
//! Channel-backed async value primitives consumed by the adapter handlers.
//!
//! ## Overview
//!
//! The pipeline does not reimplement any reactive library; it only needs
//! concrete producer shapes for its own adapters, tests, and embedders that
//! do not pull a full provider. Each primitive is a channel pair in the
//! spirit of an SSE channel: the producing side is handed to application
//! code, the consuming side travels through the handler chain.
//!
//! - [`deferred()`](deferred::deferred) — complete or fail exactly once;
//!   consumption registers a completion callback.
//! - [`single()`](single::single) / [`maybe()`](single::maybe) — one
//!   (respectively zero-or-one) async value with a by-value terminal
//!   observer.
//! - [`bounded()`](stream::bounded) / [`eager()`](stream::eager) — ordered
//!   chunk streams; the bounded flavor parks the emitter until the
//!   subscriber signals demand, the eager flavor buffers.
//! - [`CancelHandle`](handle::CancelHandle) — cancellable handle with no
//!   payload, for handlers that arrange their own response writes.
//!
//! Producing sides are consumed by value on their terminal operations, so a
//! producer cannot signal completion twice by construction.

pub mod deferred;
pub mod handle;
pub mod single;
pub mod stream;

pub use deferred::{deferred, Deferred, DeferredCompleter};
pub use handle::CancelHandle;
pub use single::{maybe, single, Maybe, MaybeCompleter, Single, SingleCompleter};
pub use stream::{bounded, eager, StreamEmitter, StreamSource, Subscriber, Subscription};

use serde_json::Value;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;

/// The closed set of runtime shapes a terminal route handler may return.
///
/// The variant a route actually produces must line up with the capability
/// probed from its declared result type; a mismatch is handed to the error
/// hand-off by the adapter.
pub enum ReturnValue {
    /// Already-computed body.
    Value(Value),
    /// Deferred value completed later through a callback.
    Deferred(Deferred),
    /// Exactly one async value.
    Single(Single),
    /// Zero or one async value.
    Maybe(Maybe),
    /// Ordered stream of chunks.
    Stream(StreamSource),
    /// Cancellable handle; the handler's own subscription writes the response.
    Handle(CancelHandle),
    /// Raw byte reader copied to the response sink.
    Reader(Box<dyn Read + Send>),
    /// File whose bytes are copied to the response sink.
    File(PathBuf),
    /// The handler wrote the response through the exchange itself.
    Exchange,
}

impl ReturnValue {
    /// Short shape name used in logs and mismatch errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ReturnValue::Value(_) => "value",
            ReturnValue::Deferred(_) => "deferred",
            ReturnValue::Single(_) => "single",
            ReturnValue::Maybe(_) => "maybe",
            ReturnValue::Stream(_) => "stream",
            ReturnValue::Handle(_) => "handle",
            ReturnValue::Reader(_) => "reader",
            ReturnValue::File(_) => "file",
            ReturnValue::Exchange => "exchange",
        }
    }
}

// Manual impl: boxed readers are not Debug.
impl fmt::Debug for ReturnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

//! # Exchange Module
//!
//! The response-side collaborator adapters write through.
//!
//! ## Overview
//!
//! The [`Exchange`] trait is the pipeline's view of a request/response
//! exchange: body and chunk writes, the error hand-off, the detach marker,
//! and the connection-close signal. The surrounding server owns the real
//! implementation; [`BufferedExchange`] is the in-memory one used by tests
//! and by embedders that collect the response before flushing it.
//!
//! ## Write discipline
//!
//! The exchange is single-writer-at-a-time: an adapter fully completes one
//! write before another may begin, even across an async hand-off. Exactly one
//! terminal signal (completed or errored) is accepted per exchange; duplicate
//! terminals are dropped with a warning. Writes after the connection closed
//! are dropped.

use may::sync::mpsc;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{error, warn};

use crate::ids::RequestId;

/// Terminal event observed by the request lifecycle manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// Body fully written.
    Completed,
    /// Cause handed off to error rendering.
    Errored(String),
}

/// Response-side operations the handler chain performs on an exchange.
pub trait Exchange: Send + Sync {
    fn request_id(&self) -> RequestId;

    /// Write the complete response body. Terminal.
    ///
    /// String values are written raw; anything else is written as its JSON
    /// text.
    fn write_body(&self, body: Value);

    /// Write one body chunk. Chunks appear in call order.
    fn write_chunk(&self, chunk: &[u8]);

    /// Signal end-of-body after chunked writes. Terminal.
    fn end_stream(&self);

    /// Hand the cause to error rendering. Terminal; delivered at most once.
    fn send_error(&self, cause: anyhow::Error);

    /// Mark the request as completing asynchronously relative to the
    /// invoking coroutine.
    fn detach(&self);

    fn is_detached(&self) -> bool;

    /// True once the client connection is gone. Producers must stop writing.
    fn is_closed(&self) -> bool;
}

/// Shared exchange handle passed through the chain.
pub type ExchangeRef = Arc<dyn Exchange>;

/// In-memory [`Exchange`] collecting the response body.
///
/// Construction returns the exchange together with a terminal-event receiver,
/// mirroring the reply-channel convention used for handler responses: the
/// lifecycle side blocks on the receiver to learn when the response finished.
pub struct BufferedExchange {
    request_id: RequestId,
    body: Mutex<Vec<u8>>,
    error: Mutex<Option<String>>,
    detached: AtomicBool,
    closed: AtomicBool,
    terminal: AtomicBool,
    terminal_tx: mpsc::Sender<Terminal>,
}

impl BufferedExchange {
    #[must_use]
    pub fn new() -> (Arc<Self>, mpsc::Receiver<Terminal>) {
        let (terminal_tx, terminal_rx) = mpsc::channel();
        let exchange = Arc::new(Self {
            request_id: RequestId::new(),
            body: Mutex::new(Vec::new()),
            error: Mutex::new(None),
            detached: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            terminal: AtomicBool::new(false),
            terminal_tx,
        });
        (exchange, terminal_rx)
    }

    /// Snapshot of the body written so far.
    #[must_use]
    pub fn body(&self) -> Vec<u8> {
        self.body.lock().map(|b| b.clone()).unwrap_or_default()
    }

    /// Body as a UTF-8 string (lossy).
    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body()).into_owned()
    }

    /// The error handed off, if any.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.error.lock().ok().and_then(|e| e.clone())
    }

    /// Simulate the transport closing the connection.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Relaxed);
    }

    /// Claim the terminal slot. Returns `false` on a duplicate.
    fn mark_terminal(&self) -> bool {
        let first = self
            .terminal
            .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok();
        if !first {
            warn!(
                request_id = %self.request_id,
                "duplicate terminal signal dropped"
            );
        }
        first
    }
}

impl Exchange for BufferedExchange {
    fn request_id(&self) -> RequestId {
        self.request_id
    }

    fn write_body(&self, body: Value) {
        if !self.mark_terminal() {
            return;
        }
        let bytes = match body {
            Value::String(s) => s.into_bytes(),
            other => other.to_string().into_bytes(),
        };
        if !self.is_closed() {
            if let Ok(mut buffer) = self.body.lock() {
                buffer.extend_from_slice(&bytes);
            }
        }
        let _ = self.terminal_tx.send(Terminal::Completed);
    }

    fn write_chunk(&self, chunk: &[u8]) {
        if self.is_closed() {
            warn!(request_id = %self.request_id, "chunk write after close dropped");
            return;
        }
        if self.terminal.load(Ordering::Relaxed) {
            warn!(request_id = %self.request_id, "chunk write after terminal dropped");
            return;
        }
        if let Ok(mut buffer) = self.body.lock() {
            buffer.extend_from_slice(chunk);
        }
    }

    fn end_stream(&self) {
        if !self.mark_terminal() {
            return;
        }
        let _ = self.terminal_tx.send(Terminal::Completed);
    }

    fn send_error(&self, cause: anyhow::Error) {
        if !self.mark_terminal() {
            return;
        }
        let message = cause.to_string();
        error!(
            request_id = %self.request_id,
            error = %message,
            "error handed off to renderer"
        );
        if let Ok(mut slot) = self.error.lock() {
            *slot = Some(message.clone());
        }
        let _ = self.terminal_tx.send(Terminal::Errored(message));
    }

    fn detach(&self) {
        self.detached.store(true, Ordering::Relaxed);
    }

    fn is_detached(&self) -> bool {
        self.detached.load(Ordering::Relaxed)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_body_written_raw() {
        let (exchange, rx) = BufferedExchange::new();
        exchange.write_body(Value::String("plain text".to_string()));
        assert_eq!(exchange.body_string(), "plain text");
        assert_eq!(rx.recv().unwrap(), Terminal::Completed);
    }

    #[test]
    fn test_json_body_written_as_text() {
        let (exchange, _rx) = BufferedExchange::new();
        exchange.write_body(json!({ "ok": true }));
        assert_eq!(exchange.body_string(), "{\"ok\":true}");
    }

    #[test]
    fn test_second_terminal_dropped() {
        let (exchange, rx) = BufferedExchange::new();
        exchange.write_body(json!("done"));
        exchange.send_error(anyhow::anyhow!("late failure"));
        assert_eq!(rx.recv().unwrap(), Terminal::Completed);
        assert!(exchange.error().is_none());
    }

    #[test]
    fn test_chunks_dropped_after_close() {
        let (exchange, _rx) = BufferedExchange::new();
        exchange.write_chunk(b"a");
        exchange.close();
        exchange.write_chunk(b"b");
        assert_eq!(exchange.body_string(), "a");
    }
}

use std::fs::File;
use std::io::Read;
use std::sync::Arc;

use super::core::{reject_mismatch, ChainHandler, Outcome, RouteHandler};
use crate::exchange::ExchangeRef;
use crate::producer::ReturnValue;

const COPY_BUF: usize = 8 * 1024;

/// Copy a byte source to the exchange chunk sink. Parks the calling
/// coroutine until the source is drained.
fn copy_to_exchange<R: Read>(mut reader: R, exchange: &ExchangeRef) -> Outcome {
    let mut buf = [0u8; COPY_BUF];
    loop {
        if exchange.is_closed() {
            return Outcome::Completed;
        }
        match reader.read(&mut buf) {
            Ok(0) => {
                exchange.end_stream();
                return Outcome::Completed;
            }
            Ok(n) => exchange.write_chunk(&buf[..n]),
            Err(cause) => {
                exchange.send_error(cause.into());
                return Outcome::Errored;
            }
        }
    }
}

/// Adapter for the `RawInputStream` capability: copies reader bytes to the
/// response sink. Blocking; the binder never runs it on an event-loop
/// coroutine.
pub struct ReaderHandler {
    next: Arc<dyn RouteHandler>,
}

impl ReaderHandler {
    pub fn new(next: Arc<dyn RouteHandler>) -> Self {
        Self { next }
    }
}

impl ChainHandler for ReaderHandler {
    fn invoke(&self, exchange: &ExchangeRef) -> Outcome {
        match self.next.call(exchange) {
            Ok(ReturnValue::Reader(reader)) => copy_to_exchange(reader, exchange),
            Ok(other) => reject_mismatch(exchange, "a byte reader", &other),
            Err(cause) => {
                exchange.send_error(cause);
                Outcome::Errored
            }
        }
    }
}

/// Adapter for the `RawStream` capability: opens the file and copies its
/// bytes to the response sink. Blocking, like [`ReaderHandler`].
pub struct FileHandler {
    next: Arc<dyn RouteHandler>,
}

impl FileHandler {
    pub fn new(next: Arc<dyn RouteHandler>) -> Self {
        Self { next }
    }
}

impl ChainHandler for FileHandler {
    fn invoke(&self, exchange: &ExchangeRef) -> Outcome {
        match self.next.call(exchange) {
            Ok(ReturnValue::File(path)) => match File::open(&path) {
                Ok(file) => copy_to_exchange(file, exchange),
                Err(cause) => {
                    exchange.send_error(anyhow::Error::new(cause).context(format!(
                        "failed to open response file {}",
                        path.display()
                    )));
                    Outcome::Errored
                }
            },
            Ok(other) => reject_mismatch(exchange, "a file source", &other),
            Err(cause) => {
                exchange.send_error(cause);
                Outcome::Errored
            }
        }
    }
}

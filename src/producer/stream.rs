use may::sync::mpsc;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

enum StreamEvent {
    Next(Value),
    Error(anyhow::Error),
    Complete,
}

/// Producing side of a chunk stream.
///
/// In bounded mode [`emit`](StreamEmitter::emit) parks the calling coroutine
/// until the subscriber has requested another item; in eager mode items
/// buffer and `emit` never waits. Terminal operations consume the emitter.
pub struct StreamEmitter {
    items: mpsc::Sender<StreamEvent>,
    demand: Option<mpsc::Receiver<()>>,
    cancelled: Arc<AtomicBool>,
}

impl StreamEmitter {
    /// Emit one item. Returns `false` once the subscription is cancelled or
    /// gone; the producer must stop emitting then.
    pub fn emit(&self, item: Value) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return false;
        }
        if let Some(demand) = &self.demand {
            if demand.recv().is_err() {
                return false;
            }
            // A cancel wakes parked emitters with a token; re-check.
            if self.cancelled.load(Ordering::Relaxed) {
                return false;
            }
        }
        self.items.send(StreamEvent::Next(item)).is_ok()
    }

    /// Signal end-of-stream.
    pub fn complete(self) {
        let _ = self.items.send(StreamEvent::Complete);
    }

    /// Signal failure.
    pub fn fail(self, cause: anyhow::Error) {
        let _ = self.items.send(StreamEvent::Error(cause));
    }
}

/// Bounded-demand subscription control handed to a [`Subscriber`].
pub struct Subscription {
    demand_tx: Option<mpsc::Sender<()>>,
    cancelled: Arc<AtomicBool>,
}

impl Subscription {
    /// Request `n` more items. On an eager stream this is a no-op; items are
    /// already buffered.
    pub fn request(&self, n: usize) {
        if let Some(tx) = &self.demand_tx {
            for _ in 0..n {
                let _ = tx.send(());
            }
        }
    }

    /// Cancel the subscription. The producer observes this on its next emit;
    /// no further items are delivered.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
        // Wake an emitter parked on demand so it can observe the flag.
        if let Some(tx) = &self.demand_tx {
            let _ = tx.send(());
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Subscriber contract for chunk streams.
///
/// `on_subscribe` runs before any item; a subscriber that wants items must
/// request initial demand there. At most one terminal callback (`on_error`
/// or `on_complete`) is delivered.
pub trait Subscriber: Send + 'static {
    fn on_subscribe(&mut self, subscription: &Subscription);
    fn on_next(&mut self, item: Value, subscription: &Subscription);
    fn on_error(&mut self, cause: anyhow::Error);
    fn on_complete(&mut self);
}

/// Consuming side of a chunk stream.
pub struct StreamSource {
    items: mpsc::Receiver<StreamEvent>,
    demand_tx: Option<mpsc::Sender<()>>,
    cancelled: Arc<AtomicBool>,
}

impl StreamSource {
    /// Drive the subscription on a spawned coroutine; the caller returns
    /// immediately. Items are delivered to the subscriber one at a time, in
    /// emission order. A producer dropped without a terminal signal is
    /// reported through `on_error`.
    pub fn subscribe<S: Subscriber>(self, mut subscriber: S) {
        let subscription = Subscription {
            demand_tx: self.demand_tx,
            cancelled: self.cancelled,
        };
        let items = self.items;
        may::go!(move || {
            subscriber.on_subscribe(&subscription);
            loop {
                if subscription.is_cancelled() {
                    break;
                }
                match items.recv() {
                    Ok(StreamEvent::Next(item)) => subscriber.on_next(item, &subscription),
                    Ok(StreamEvent::Error(cause)) => {
                        subscriber.on_error(cause);
                        break;
                    }
                    Ok(StreamEvent::Complete) => {
                        subscriber.on_complete();
                        break;
                    }
                    Err(_) => {
                        subscriber.on_error(anyhow::anyhow!(
                            "stream producer dropped without a terminal signal"
                        ));
                        break;
                    }
                }
            }
        });
    }
}

fn channel(bounded: bool) -> (StreamEmitter, StreamSource) {
    let (items_tx, items_rx) = mpsc::channel();
    let cancelled = Arc::new(AtomicBool::new(false));
    let (demand_tx, demand_rx) = if bounded {
        let (tx, rx) = mpsc::channel();
        (Some(tx), Some(rx))
    } else {
        (None, None)
    };
    (
        StreamEmitter {
            items: items_tx,
            demand: demand_rx,
            cancelled: Arc::clone(&cancelled),
        },
        StreamSource {
            items: items_rx,
            demand_tx,
            cancelled,
        },
    )
}

/// Create a backpressure-aware stream pair: `emit` waits for demand.
#[must_use]
pub fn bounded() -> (StreamEmitter, StreamSource) {
    channel(true)
}

/// Create a stream pair without backpressure: `emit` never waits, items
/// buffer until consumed.
#[must_use]
pub fn eager() -> (StreamEmitter, StreamSource) {
    channel(false)
}

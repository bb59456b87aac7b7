use may::sync::mpsc;
use serde_json::Value;

/// Producing side of a deferred value. Complete or fail exactly once; both
/// operations consume the completer.
pub struct DeferredCompleter {
    tx: mpsc::Sender<Result<Value, anyhow::Error>>,
}

impl DeferredCompleter {
    pub fn complete(self, value: Value) {
        let _ = self.tx.send(Ok(value));
    }

    pub fn fail(self, cause: anyhow::Error) {
        let _ = self.tx.send(Err(cause));
    }
}

/// Consuming side of a deferred value.
pub struct Deferred {
    rx: mpsc::Receiver<Result<Value, anyhow::Error>>,
}

impl Deferred {
    /// Register the completion callback.
    ///
    /// The callback is serviced on a spawned coroutine; the caller returns
    /// immediately. Dropping the completer without completing delivers an
    /// error to the callback, so the callback runs exactly once either way.
    pub fn on_complete<F>(self, callback: F)
    where
        F: FnOnce(Result<Value, anyhow::Error>) + Send + 'static,
    {
        let rx = self.rx;
        may::go!(move || {
            match rx.recv() {
                Ok(outcome) => callback(outcome),
                Err(_) => callback(Err(anyhow::anyhow!(
                    "deferred value dropped before completion"
                ))),
            }
        });
    }
}

/// Create a deferred value pair.
#[must_use]
pub fn deferred() -> (DeferredCompleter, Deferred) {
    let (tx, rx) = mpsc::channel();
    (DeferredCompleter { tx }, Deferred { rx })
}

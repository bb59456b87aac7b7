use may::sync::mpsc;
use serde_json::Value;

/// Producing side of a single async value.
pub struct SingleCompleter {
    tx: mpsc::Sender<Result<Value, anyhow::Error>>,
}

impl SingleCompleter {
    pub fn success(self, value: Value) {
        let _ = self.tx.send(Ok(value));
    }

    pub fn fail(self, cause: anyhow::Error) {
        let _ = self.tx.send(Err(cause));
    }
}

/// Consuming side of a single async value. Subscribing never blocks the
/// caller; the observer runs on a spawned coroutine when the value arrives.
pub struct Single {
    rx: mpsc::Receiver<Result<Value, anyhow::Error>>,
}

impl Single {
    pub fn subscribe<F>(self, observer: F)
    where
        F: FnOnce(Result<Value, anyhow::Error>) + Send + 'static,
    {
        let rx = self.rx;
        may::go!(move || {
            match rx.recv() {
                Ok(outcome) => observer(outcome),
                Err(_) => observer(Err(anyhow::anyhow!(
                    "single producer dropped before emitting"
                ))),
            }
        });
    }
}

/// Create a single-value pair.
#[must_use]
pub fn single() -> (SingleCompleter, Single) {
    let (tx, rx) = mpsc::channel();
    (SingleCompleter { tx }, Single { rx })
}

/// Producing side of a zero-or-one async value.
pub struct MaybeCompleter {
    tx: mpsc::Sender<Result<Option<Value>, anyhow::Error>>,
}

impl MaybeCompleter {
    /// Complete with a value, or with `None` for an empty result.
    pub fn complete(self, value: Option<Value>) {
        let _ = self.tx.send(Ok(value));
    }

    pub fn fail(self, cause: anyhow::Error) {
        let _ = self.tx.send(Err(cause));
    }
}

/// Consuming side of a zero-or-one async value.
pub struct Maybe {
    rx: mpsc::Receiver<Result<Option<Value>, anyhow::Error>>,
}

impl Maybe {
    pub fn subscribe<F>(self, observer: F)
    where
        F: FnOnce(Result<Option<Value>, anyhow::Error>) + Send + 'static,
    {
        let rx = self.rx;
        may::go!(move || {
            match rx.recv() {
                Ok(outcome) => observer(outcome),
                Err(_) => observer(Err(anyhow::anyhow!(
                    "maybe producer dropped before completing"
                ))),
            }
        });
    }
}

/// Create a zero-or-one value pair.
#[must_use]
pub fn maybe() -> (MaybeCompleter, Maybe) {
    let (tx, rx) = mpsc::channel();
    (MaybeCompleter { tx }, Maybe { rx })
}

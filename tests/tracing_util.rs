use tracing_subscriber::EnvFilter;

/// Scoped tracing default for tests. Keep the guard alive for the duration
/// of the test; output goes to the libtest capture buffer.
pub struct TestTracing {
    _guard: tracing::subscriber::DefaultGuard,
}

impl TestTracing {
    pub fn init() -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        Self { _guard: guard }
    }
}

/// Apply the configured coroutine stack size before spawning anything.
pub fn set_stack_size() -> TestTracing {
    let size = std::env::var("BRRTP_STACK_SIZE")
        .ok()
        .and_then(|v| {
            if let Some(hex) = v.strip_prefix("0x") {
                usize::from_str_radix(hex, 16).ok()
            } else {
                v.parse().ok()
            }
        })
        .unwrap_or(0x10000);
    may::config().set_stack_size(size);
    TestTracing::init()
}

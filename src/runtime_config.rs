//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for the pipeline runtime.
//!
//! ## Environment Variables
//!
//! ### `BRRTP_STACK_SIZE`
//!
//! Sets the stack size for coroutines spawned by the pipeline (worker pool
//! tasks, producer subscriptions). Accepts values in:
//! - Decimal: `65536` (64 KB)
//! - Hexadecimal: `0x10000` (64 KB)
//!
//! Default: `0x10000` (64 KB)
//!
//! ### `BRRTP_EXECUTION_MODE`
//!
//! Process-wide execution mode: `event_loop`, `worker`, or `custom`. See
//! [`crate::executor::ExecutionMode`]. Default: `event_loop`.
//!
//! ### `BRRTP_WORKERS` / `BRRTP_QUEUE_BOUND`
//!
//! Worker pool size and advisory queue depth, consumed by
//! [`crate::executor::WorkerPoolConfig::from_env`].
//!
//! ## Usage
//!
//! ```rust
//! use brrtpipe::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Stack size: {} bytes", config.stack_size);
//! ```

use std::env;

/// Parse a size value that may be decimal (`65536`) or hex (`0x10000`).
pub fn parse_size(val: &str) -> Option<usize> {
    if let Some(hex) = val.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}

/// Runtime configuration loaded from environment variables.
///
/// Load this at startup using [`RuntimeConfig::from_env()`] to configure
/// the coroutine runtime behavior.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes (default: 64 KB / 0x10000)
    pub stack_size: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let stack_size = env::var("BRRTP_STACK_SIZE")
            .ok()
            .and_then(|val| parse_size(&val))
            .unwrap_or(0x10000);
        RuntimeConfig { stack_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_decimal_and_hex() {
        assert_eq!(parse_size("65536"), Some(65536));
        assert_eq!(parse_size("0x10000"), Some(65536));
        assert_eq!(parse_size("0xzz"), None);
        assert_eq!(parse_size("not a number"), None);
    }
}

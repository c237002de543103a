//! Logger bootstrap plus module-gated logging macros.
//!
//! Modules that want to be silenceable at compile time declare
//! `const ENABLE_LOGS: bool = ...;` and use `log_info!`, `log_warn!` or
//! `log_debug!` instead of the plain `log` macros:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//! cogspan::log_warn!("dropping event");
//! ```

use log::LevelFilter;

/// Install an `env_logger` reading `RUST_LOG`, defaulting to `info`.
///
/// Returns `false` when a logger was already installed by the host.
pub fn init() -> bool {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .try_init()
        .is_ok()
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_safe_to_repeat() {
        init();
        assert!(!init());
    }
}

//! Logging macros gated by a per-module `ENABLE_LOGS` switch.
//!
//! A module opts in by declaring the switch and importing the macros it uses:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_info, log_warn};
//!
//! log_info!("catalog replaced: {} items", count);
//! ```
//! Setting the const to `false` silences the module without touching
//! `RUST_LOG`, which still filters everything that gets through.

#[doc(hidden)]
#[macro_export]
macro_rules! __gated_log {
    ($level:expr, $($arg:tt)*) => {
        if ENABLE_LOGS {
            log::log!($level, $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::__gated_log!(log::Level::Debug, $($arg)*) };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::__gated_log!(log::Level::Info, $($arg)*) };
}

/// Used for rejected user input and other recoverable conditions.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::__gated_log!(log::Level::Warn, $($arg)*) };
}

/// Used for storage and import failures; the session keeps running.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::__gated_log!(log::Level::Error, $($arg)*) };
}

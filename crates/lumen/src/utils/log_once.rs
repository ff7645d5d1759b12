/// Logs a warning the first time a call site is hit, then stays quiet.
/// Meant for anomalies in the render hot loop that would otherwise flood the
/// log at millions of samples per frame.
#[macro_export]
macro_rules! warn_once {
    ($($arg:tt)*) => {{
        static FIRED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
        if !FIRED.swap(true, std::sync::atomic::Ordering::Relaxed) {
            log::warn!($($arg)*);
        }
    }};
}

/// Like [`warn_once`], at error level.
#[macro_export]
macro_rules! error_once {
    ($($arg:tt)*) => {{
        static FIRED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
        if !FIRED.swap(true, std::sync::atomic::Ordering::Relaxed) {
            log::error!($($arg)*);
        }
    }};
}

pub use {error_once, warn_once};

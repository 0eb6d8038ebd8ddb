//! Progress reporting for long-running conversions.
//!
//! Progress is an injected side channel: the gateway hands a completion
//! fraction and a human-readable label to whatever [`Progress`] sink the
//! caller supplied. Nothing here affects results.

use tracing::info;

/// Receives completion updates.
///
/// `fraction` is in `[0, 1]`. Any `FnMut(f64, &str)` closure is a sink.
pub trait Progress {
    fn update(&mut self, fraction: f64, label: &str);
}

impl<F: FnMut(f64, &str)> Progress for F {
    fn update(&mut self, fraction: f64, label: &str) {
        self(fraction, label)
    }
}

/// Sink that forwards every update to `tracing` at INFO level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn update(&mut self, fraction: f64, label: &str) {
        info!(fraction, "{}", label);
    }
}

/// Render a completion fraction as text, e.g. `[========            ] 40%`.
///
/// `fraction` is clamped to `[0, 1]`. With `show_bar = false` only the
/// percentage is returned.
///
/// # Example
///
/// ```
/// use blockmat::progress::progress_bar_str;
///
/// assert_eq!(progress_bar_str(0.5, 10, true), "[=====     ] 50%");
/// assert_eq!(progress_bar_str(0.5, 10, false), "50%");
/// ```
pub fn progress_bar_str(fraction: f64, bar_length: usize, show_bar: bool) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let percent = (fraction * 100.0) as u32;
    if !show_bar {
        return format!("{}%", percent);
    }
    let filled = (fraction * bar_length as f64) as usize;
    format!(
        "[{:<width$}] {}%",
        "=".repeat(filled),
        percent,
        width = bar_length
    )
}

/// Human-readable byte count: `bytes`, `KB`, `MB`, `GB`, then `TB`.
///
/// ```
/// use blockmat::progress::bytes_str;
///
/// assert_eq!(bytes_str(512), "512.00 bytes");
/// assert_eq!(bytes_str(1536), "1.50 KB");
/// ```
pub fn bytes_str(bytes: usize) -> String {
    let mut num = bytes as f64;
    for unit in ["bytes", "KB", "MB", "GB"] {
        if num < 1024.0 {
            return format!("{:.2} {}", num, unit);
        }
        num /= 1024.0;
    }
    format!("{:.2} TB", num)
}

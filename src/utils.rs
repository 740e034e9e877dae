use std::io::{self, Write};
use std::sync::Once;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};

/// ANSI escape codes for terminal control
const ATTR_RESET: &str = "\x1B[0m";
const BELL: &str = "\x07";

static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Restore terminal to a clean state: cooked mode, default attributes.
pub fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    // Ignore errors - we're cleaning up, best effort
    let _ = stdout.write_all(ATTR_RESET.as_bytes());
    let _ = stdout.flush();
}

/// Install a panic hook that restores terminal state before panicking.
///
/// Safe to call multiple times - only installs once.
pub fn install_terminal_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            cleanup_terminal();
            default_hook(panic_info);
        }));
    });
}

/// Run `f` with raw mode temporarily switched off so ordinary `println!`
/// output renders normally while keys are being polled.
pub fn with_cooked_terminal<T>(f: impl FnOnce() -> T) -> T {
    let was_raw = is_raw_mode_enabled().unwrap_or(false);
    if was_raw {
        let _ = disable_raw_mode();
    }
    let result = f();
    if was_raw {
        let _ = enable_raw_mode();
    }
    result
}

/// Ring the terminal bell.
pub fn ring_bell() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(BELL.as_bytes());
    let _ = stdout.flush();
}

/// Format cumulative compute time as `12.345 seconds (0:00:12.345)`.
pub fn format_elapsed(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    // Split whole milliseconds so rounding carries into the minutes.
    let millis = (seconds * 1000.0).round() as u64;
    let hours = millis / 3_600_000;
    let minutes = (millis % 3_600_000) / 60_000;
    let secs = (millis % 60_000) / 1000;
    let frac = millis % 1000;
    format!("{seconds:.3} seconds ({hours}:{minutes:02}:{secs:02}.{frac:03})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed_short() {
        assert_eq!(format_elapsed(0.0), "0.000 seconds (0:00:00.000)");
        assert_eq!(format_elapsed(7.25), "7.250 seconds (0:00:07.250)");
    }

    #[test]
    fn test_format_elapsed_minutes_and_hours() {
        assert_eq!(format_elapsed(75.5), "75.500 seconds (0:01:15.500)");
        assert_eq!(
            format_elapsed(3_723.125),
            "3723.125 seconds (1:02:03.125)"
        );
    }

    #[test]
    fn test_format_elapsed_many_hours() {
        assert_eq!(
            format_elapsed(90_000.0),
            "90000.000 seconds (25:00:00.000)"
        );
    }

    #[test]
    fn test_format_elapsed_rounding_carries() {
        assert_eq!(format_elapsed(59.9996), "60.000 seconds (0:01:00.000)");
        assert_eq!(
            format_elapsed(3_599.9999),
            "3600.000 seconds (1:00:00.000)"
        );
    }

    #[test]
    fn test_format_elapsed_clamps_negative() {
        assert_eq!(format_elapsed(-3.0), "0.000 seconds (0:00:00.000)");
    }
}

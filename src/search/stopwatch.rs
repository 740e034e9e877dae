//! Compute time accumulated across sessions

use std::time::Instant;

/// Elapsed seconds carried over from earlier sessions plus the time since
/// this session started.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    banked: f64,
    started: Instant,
}

impl Stopwatch {
    /// Start timing, counting `banked` seconds from previous sessions.
    pub fn resume(banked: f64) -> Self {
        Self {
            banked,
            started: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.banked + self.started.elapsed().as_secs_f64()
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::resume(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_counts_banked_time() {
        let watch = Stopwatch::resume(3_600.5);
        let elapsed = watch.elapsed_secs();
        assert!(elapsed >= 3_600.5);
        assert!(elapsed < 3_700.0);
    }

    #[test]
    fn test_elapsed_is_monotonic() {
        let watch = Stopwatch::default();
        let first = watch.elapsed_secs();
        let second = watch.elapsed_secs();
        assert!(second >= first);
    }
}

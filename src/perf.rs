//! Performance monitoring for the tracking loop.
//!
//! Tracking runs once per frame for the whole drag, so it is the hot path of
//! the engine. This module provides:
//!
//! - **Frame timing**: [`FrameStats`] keeps a rolling window of tracking-frame
//!   durations and warns about frames over budget
//! - **Scoped timers**: RAII-style timing for code blocks
//! - **Conditional compilation**: `profile_scope!` is zero-cost without the
//!   `profiling` feature
//!
//! ```ignore
//! fn track_frame() {
//!     profile_scope!("track_frame");
//!     // ...
//! }
//! ```

use crate::constants::TARGET_FRAME_MS;
use std::collections::VecDeque;
use std::time::Instant;
use tracing::warn;
#[cfg(feature = "profiling")]
use tracing::trace;

/// Number of samples to keep for rolling averages
const SAMPLE_COUNT: usize = 60;

/// Threshold multiplier for warning (e.g., 2.0 = warn if frame takes 2x target)
const WARN_THRESHOLD: f64 = 2.0;

// ============================================================================
// Profiling Macros (zero-cost when disabled)
// ============================================================================

/// Profile a scope with the given name. Zero-cost when profiling is disabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::for_profiling($name);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
    ($name:expr, $threshold_ms:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
        #[cfg(not(feature = "profiling"))]
        let _ = ($name, $threshold_ms);
    };
}

pub use profile_scope;

// ============================================================================
// Frame Statistics
// ============================================================================

/// Rolling statistics over tracking frames.
#[derive(Debug)]
pub struct FrameStats {
    /// Recent frame durations in milliseconds
    frame_times: VecDeque<f64>,
    frame_start: Option<Instant>,
    slow_frame_count: u64,
    total_frames: u64,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(SAMPLE_COUNT),
            frame_start: None,
            slow_frame_count: 0,
            total_frames: 0,
        }
    }

    /// Mark the start of a tracking frame.
    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Mark the end of a tracking frame and record its duration.
    pub fn end_frame(&mut self) -> Option<f64> {
        let start = self.frame_start.take()?;
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        self.record(ms);
        Some(ms)
    }

    /// Record a frame duration measured elsewhere.
    pub fn record(&mut self, ms: f64) {
        if self.frame_times.len() >= SAMPLE_COUNT {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(ms);
        self.total_frames += 1;

        if ms > TARGET_FRAME_MS * WARN_THRESHOLD {
            self.slow_frame_count += 1;
            warn!(
                frame_time_ms = format!("{:.2}", ms),
                target_ms = format!("{:.2}", TARGET_FRAME_MS),
                "Slow tracking frame"
            );
        }
    }

    pub fn average_frame_time(&self) -> f64 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64
    }

    pub fn max_frame_time(&self) -> f64 {
        self.frame_times.iter().copied().fold(0.0, f64::max)
    }

    pub fn slow_frame_percentage(&self) -> f64 {
        if self.total_frames == 0 {
            return 0.0;
        }
        (self.slow_frame_count as f64 / self.total_frames as f64) * 100.0
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn slow_frames(&self) -> u64 {
        self.slow_frame_count
    }

    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.frame_start = None;
        self.slow_frame_count = 0;
        self.total_frames = 0;
    }
}

// ============================================================================
// Scoped Timer
// ============================================================================

/// A scoped timer that logs its duration on drop when over threshold.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    /// Timer for profiling builds (1ms threshold).
    pub fn for_profiling(name: &'static str) -> Self {
        Self::new(name, 1.0)
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        if elapsed_ms <= self.threshold_ms {
            return;
        }

        #[cfg(feature = "profiling")]
        trace!("[PERF] {}: {:.2}ms", self.name, elapsed_ms);

        #[cfg(not(feature = "profiling"))]
        warn!(
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            threshold_ms = format!("{:.2}", self.threshold_ms),
            "Slow operation"
        );
    }
}

/// Measure execution time of a closure and return both the result and elapsed time.
#[inline]
pub fn measure<T, F: FnOnce() -> T>(f: F) -> (T, f64) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed().as_secs_f64() * 1000.0)
}

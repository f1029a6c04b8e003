//! Wall-clock instrumentation for both call paths.
//!
//! Every call owns its own collector or timer; nothing here is shared
//! between requests. All measurements use the monotonic clock.

use std::time::{Duration, Instant};

/// Start/end/duration of one call, measured on the monotonic clock.
///
/// Created at call entry and closed at completion or failure, so it is
/// attached to errors as well as successful results.
#[derive(Debug, Clone, Copy)]
pub struct TimingInfo {
    pub started_at: Instant,
    pub ended_at: Instant,
    pub duration: Duration,
}

impl TimingInfo {
    /// Duration in fractional milliseconds, for display and logging.
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Timing and throughput statistics for one streaming call.
///
/// Finalized exactly once at stream end or error, never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamingMetrics {
    /// Elapsed time from call start to the first observed delta. Defaults
    /// to `total_response_time` when the stream produced no delta at all.
    pub time_to_first_token: Duration,
    /// Average observed deltas per second; 0 when no time elapsed.
    pub tokens_per_second: f64,
    /// Elapsed time from call start to stream end.
    pub total_response_time: Duration,
    /// Number of deltas observed, each counted as one token unit.
    pub total_tokens: u64,
}

/// Finalized outcome of a streaming call: overall timing plus stream stats.
#[derive(Debug, Clone, Copy)]
pub struct StreamReport {
    pub timing: TimingInfo,
    pub streaming: StreamingMetrics,
}

/// Per-call metrics accumulator for the streaming path.
///
/// Created synchronously at call entry; `finalize` consumes the collector
/// so metrics cannot be computed twice.
pub struct MetricsCollector {
    started_at: Instant,
    first_token_at: Option<Instant>,
    token_count: u64,
}

impl MetricsCollector {
    /// Starts the clock for one call.
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
            first_token_at: None,
            token_count: 0,
        }
    }

    /// Records the first-token timestamp. Idempotent: only the first
    /// invocation is kept.
    pub fn mark_first_token(&mut self) {
        if self.first_token_at.is_none() {
            self.first_token_at = Some(Instant::now());
        }
    }

    /// Accumulates `count` observed token units.
    pub fn add_tokens(&mut self, count: u64) {
        self.token_count += count;
    }

    /// Closes the clock and computes the final report.
    pub fn finalize(self) -> StreamReport {
        let ended_at = Instant::now();
        let streaming = compute(
            self.started_at,
            self.first_token_at,
            self.token_count,
            ended_at,
        );
        StreamReport {
            timing: TimingInfo {
                started_at: self.started_at,
                ended_at,
                duration: ended_at - self.started_at,
            },
            streaming,
        }
    }
}

fn compute(
    started_at: Instant,
    first_token_at: Option<Instant>,
    token_count: u64,
    ended_at: Instant,
) -> StreamingMetrics {
    let total_response_time = ended_at - started_at;
    let time_to_first_token = first_token_at
        .map(|at| at - started_at)
        .unwrap_or(total_response_time);
    let elapsed_seconds = total_response_time.as_secs_f64();
    let tokens_per_second = if elapsed_seconds > 0.0 {
        token_count as f64 / elapsed_seconds
    } else {
        0.0
    };
    StreamingMetrics {
        time_to_first_token,
        tokens_per_second,
        total_response_time,
        total_tokens: token_count,
    }
}

/// Minimal start/stop timer for the non-streaming path.
pub struct CallTimer {
    started_at: Instant,
}

impl CallTimer {
    /// Starts the clock.
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    /// Closes the clock. May be called more than once; each call reflects
    /// the elapsed time at that moment.
    pub fn stop(&self) -> TimingInfo {
        let ended_at = Instant::now();
        TimingInfo {
            started_at: self.started_at,
            ended_at,
            duration: ended_at - self.started_at,
        }
    }
}

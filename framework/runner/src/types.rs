use latency_bench_model::{Observation, RunStatus};

/// Recommended error type for the harness binaries. Compatible with `?` over the typed
/// errors produced by the corpus loader, the probe client and the recorder.
pub type BenchResult<T> = anyhow::Result<T>;

/// Terminal state of a measurement run, handed off to the summariser.
#[derive(Debug)]
pub struct RunOutcome {
    /// Observations in recording order, identical in content to the durable log
    pub observations: Vec<Observation>,
    /// Payloads whose probe failed and was skipped
    pub failure_count: usize,
    /// Whether the corpus was exhausted or the run was interrupted
    pub status: RunStatus,
    /// Unix timestamp of the start of the run, in seconds
    pub started_at: i64,
}

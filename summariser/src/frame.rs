use latency_bench_model::Observation;
use polars::prelude::*;

/// Column names match the durable log header so the frame reads the same as the CSV.
pub(crate) const ELAPSED_COLUMN: &str = "elapsed_time_sec";
pub(crate) const LATENCY_COLUMN: &str = "inference_time_ms";

pub(crate) fn observations_frame(observations: &[Observation]) -> PolarsResult<DataFrame> {
    let elapsed: Vec<f64> = observations.iter().map(|o| o.elapsed_sec).collect();
    let latencies: Vec<f64> = observations.iter().map(|o| o.latency_ms).collect();

    df!(
        ELAPSED_COLUMN => elapsed,
        LATENCY_COLUMN => latencies,
    )
}

use anyhow::Context;
use log::debug;
use std::path::PathBuf;

/// Environment variable name to set a custom observation log path
const LATENCY_LOG_PATH_ENV: &str = "LATENCY_LOG_PATH";
/// Default path for the observation log
const DEFAULT_LATENCY_LOG_PATH: &str = "inference_latency_log.csv";
/// Environment variable name to set the artifact output directory
const ARTIFACTS_DIR_ENV: &str = "LATENCY_ARTIFACTS_DIR";

/// Regenerate the summary and chart artifacts from an existing observation log, for
/// re-analysis of a completed or interrupted run.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let log_path = std::env::var(LATENCY_LOG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LATENCY_LOG_PATH));
    let out_dir = std::env::var(ARTIFACTS_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));

    debug!("Loading observations from {}", log_path.display());
    let observations = latency_bench_model::load_observation_log(&log_path)
        .with_context(|| format!("Failed to load the observation log at {}", log_path.display()))?;

    latency_summariser::summarize(&observations, &out_dir)?;

    Ok(())
}

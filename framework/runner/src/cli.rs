use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct Cli {
    /// URL of the inference endpoint to probe, for example
    /// `http://127.0.0.1:31818/feedback/analyse`
    #[clap(short, long)]
    pub endpoint: String,

    /// Path to the JSON corpus of feedback payloads to send
    #[clap(short, long, default_value = "feedback_input_text_unique_variations.json")]
    pub corpus: PathBuf,

    /// Path of the durable observation log written incrementally during the run
    #[clap(long, default_value = "inference_latency_log.csv")]
    pub log_path: PathBuf,

    /// Directory where the chart artifacts and the summary JSON are written
    #[clap(long, default_value = ".")]
    pub artifacts_dir: PathBuf,

    /// Path of the append-only run report file
    #[clap(long, default_value = "run_reports.jsonl")]
    pub run_report_path: PathBuf,

    /// Per-request timeout in seconds
    #[clap(long, default_value_t = 100)]
    pub timeout: u64,

    /// Delay between consecutive probes in milliseconds, to throttle the request rate
    /// against the target service
    #[clap(long, default_value_t = 500)]
    pub pacing_ms: u64,

    /// Do not show a progress bar on the CLI.
    ///
    /// This is recommended for CI/CD environments where the progress bar isn't being looked at by anyone and is just adding noise to the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,
}

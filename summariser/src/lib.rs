use anyhow::Context;
use chrono::Utc;
use latency_bench_model::Observation;
use std::path::Path;

mod analyze;
mod chart;
mod frame;
pub mod model;

pub use analyze::{cumulative_average, empirical_cdf, five_number_summary, histogram, HistogramBin};
pub use chart::HISTOGRAM_BINS;

use model::SummaryOutput;

/// File names of the four chart artifacts.
pub const TREND_ARTIFACT: &str = "latency_lineplot.png";
pub const HISTOGRAM_ARTIFACT: &str = "latency_histogram.png";
pub const CDF_ARTIFACT: &str = "latency_cdf.png";
pub const BOXPLOT_ARTIFACT: &str = "latency_boxplot.png";

/// Produce the chart artifacts and the summary JSON for a completed, possibly partial,
/// observation series.
///
/// An empty series is a valid terminal state: one notice is logged, nothing is written
/// and `Ok(None)` is returned. The four charts are independent; a renderer failure is
/// logged and the remaining charts are still attempted.
pub fn summarize(
    observations: &[Observation],
    out_dir: &Path,
) -> anyhow::Result<Option<SummaryOutput>> {
    if observations.is_empty() {
        log::info!("No observations recorded, skipping artifact generation");
        return Ok(None);
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let latencies: Vec<f64> = observations.iter().map(|o| o.latency_ms).collect();

    let data_frame = frame::observations_frame(observations)?;
    let stats = analyze::latency_stats(&data_frame, frame::LATENCY_COLUMN)?;
    let five_number =
        analyze::five_number_summary(&latencies).context("Empty latency series")?;

    let renders: [(&str, anyhow::Result<()>); 4] = [
        (
            TREND_ARTIFACT,
            chart::render_trend(observations, &out_dir.join(TREND_ARTIFACT)),
        ),
        (
            HISTOGRAM_ARTIFACT,
            chart::render_histogram(&latencies, &out_dir.join(HISTOGRAM_ARTIFACT)),
        ),
        (
            CDF_ARTIFACT,
            chart::render_cdf(&latencies, &out_dir.join(CDF_ARTIFACT)),
        ),
        (
            BOXPLOT_ARTIFACT,
            chart::render_boxplot(&latencies, &out_dir.join(BOXPLOT_ARTIFACT)),
        ),
    ];

    let mut artifacts = Vec::new();
    for (name, result) in renders {
        let path = out_dir.join(name);
        match result {
            Ok(()) => {
                log::info!("Saved {}", path.display());
                artifacts.push(path.display().to_string());
            }
            Err(e) => {
                log::error!("Failed to render {}: {e:?}", path.display());
            }
        }
    }

    let output = SummaryOutput {
        samples: observations.len(),
        stats,
        five_number,
        artifacts,
    };

    let report_path = out_dir.join(format!(
        "latency-summary-{}.json",
        Utc::now().format("%Y-%m-%dT%H.%M.%S%.fZ")
    ));
    let report = std::fs::File::create_new(&report_path)
        .with_context(|| format!("Failed to create {}", report_path.display()))?;
    serde_json::to_writer_pretty(report, &output)?;
    log::info!("Wrote summary to {}", report_path.display());

    Ok(Some(output))
}

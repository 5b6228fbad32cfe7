use serde::{Deserialize, Serialize};

/// Mean and spread of the latency series, plus the share of samples within one, two and
/// three standard deviations of the mean.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LatencyStats {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub within_std: f64,
    pub within_2std: f64,
    pub within_3std: f64,
}

/// Minimum, first quartile, median, third quartile and maximum of the latency series,
/// with linearly interpolated quartiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Machine-readable output of a summarised run, written next to the chart artifacts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryOutput {
    pub samples: usize,
    pub stats: LatencyStats,
    pub five_number: FiveNumberSummary,
    /// Paths of the artifacts that rendered successfully
    pub artifacts: Vec<String>,
}

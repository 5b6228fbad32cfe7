use crate::model::{FiveNumberSummary, LatencyStats};
use anyhow::Context;
use itertools::{Itertools, MinMaxResult};
use polars::frame::DataFrame;
use polars::prelude::*;

/// One bar of the latency frequency histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

pub(crate) fn latency_stats(frame: &DataFrame, column: &str) -> anyhow::Result<LatencyStats> {
    let value_series = frame.column(column)?.as_materialized_series().clone();

    let mean = value_series.mean().context("Mean")?;
    let std = value_series.std(0).context("Std")?;
    let min = value_series
        .min::<f64>()
        .context("Min")?
        .context("Missing min")?;
    let max = value_series
        .max::<f64>()
        .context("Max")?
        .context("Missing max")?;

    let out = frame
        .clone()
        .lazy()
        .select([
            col(column)
                .gt_eq(lit(mean - std))
                .and(col(column).lt_eq(lit(mean + std)))
                .alias("within_std"),
            col(column)
                .gt_eq(lit(mean - 2.0 * std))
                .and(col(column).lt_eq(lit(mean + 2.0 * std)))
                .alias("within_2std"),
            col(column)
                .gt_eq(lit(mean - 3.0 * std))
                .and(col(column).lt_eq(lit(mean + 3.0 * std)))
                .alias("within_3std"),
        ])
        .collect()?;

    let samples = frame.column(column)?.len() as f64;
    let count = out
        .column("within_std")?
        .as_materialized_series()
        .sum::<usize>()
        .context("Within std sum")?;
    let within_std = count as f64 / samples;

    let count = out
        .column("within_2std")?
        .as_materialized_series()
        .sum::<usize>()
        .context("Within 2std sum")?;
    let within_2std = count as f64 / samples;

    let count = out
        .column("within_3std")?
        .as_materialized_series()
        .sum::<usize>()
        .context("Within 3std sum")?;
    let within_3std = count as f64 / samples;

    Ok(LatencyStats {
        mean,
        std,
        min,
        max,
        within_std,
        within_2std,
        within_3std,
    })
}

/// Cumulative average over recording order: element `i` is the mean of the first
/// `i + 1` latencies.
///
/// The curve must be computed left to right over the recording order, not a sorted
/// order, so that it reads as a trend line over the run.
pub fn cumulative_average(values: &[f64]) -> Vec<f64> {
    let mut sum = 0.0;
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            sum += v;
            sum / (i + 1) as f64
        })
        .collect()
}

/// Empirical CDF: each sorted value paired with the fraction of the sample at or below
/// it. The last point always reaches exactly 1.
pub fn empirical_cdf(values: &[f64]) -> Vec<(f64, f64)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len() as f64;
    sorted
        .into_iter()
        .enumerate()
        .map(|(k, v)| (v, (k + 1) as f64 / n))
        .collect()
}

/// Frequency counts over `bins` equal-width intervals spanning `[min, max]`.
///
/// A sample equal to the overall maximum falls into the last bin. When every sample has
/// the same value, the whole series lands in the first bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let (min, max) = match values.iter().copied().minmax() {
        MinMaxResult::NoElements => return Vec::new(),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(min, max) => (min, max),
    };

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &value in values {
        let index = if width == 0.0 {
            0
        } else {
            (((value - min) / width) as usize).min(bins - 1)
        };
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: if i == bins - 1 {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count,
        })
        .collect()
}

/// Five-number summary of a non-empty series, with linearly interpolated quartiles.
pub fn five_number_summary(values: &[f64]) -> Option<FiveNumberSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Some(FiveNumberSummary {
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

fn quantile_sorted(sorted: &[f64], quantile: f64) -> f64 {
    let position = quantile * (sorted.len() - 1) as f64;
    let low = position.floor() as usize;
    let high = position.ceil() as usize;
    let weight = position - low as f64;

    sorted[low] * (1.0 - weight) + sorted[high] * weight
}

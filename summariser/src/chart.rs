use crate::analyze;
use anyhow::Context;
use itertools::{Itertools, MinMaxResult};
use latency_bench_model::Observation;
use plotters::prelude::*;
use std::path::Path;

/// Number of equal-width bins in the latency histogram.
pub const HISTOGRAM_BINS: usize = 30;

/// Scatter of the raw samples over elapsed run time, overlaid with the cumulative
/// average curve computed in recording order.
pub(crate) fn render_trend(observations: &[Observation], path: &Path) -> anyhow::Result<()> {
    let latencies: Vec<f64> = observations.iter().map(|o| o.latency_ms).collect();
    let cumulative = analyze::cumulative_average(&latencies);

    let root = BitMapBackend::new(path, (1400, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = padded_range(observations.iter().map(|o| o.elapsed_sec));
    let (y_min, y_max) = padded_range(latencies.iter().copied());

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Inference Latency Over Time with Cumulative Average",
            ("sans-serif", 24),
        )
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Elapsed Time (s)")
        .y_desc("Latency (ms)")
        .draw()?;

    chart
        .draw_series(
            observations
                .iter()
                .map(|o| Circle::new((o.elapsed_sec, o.latency_ms), 4, BLUE.mix(0.4).filled())),
        )?
        .label("Latency Samples")
        .legend(|(x, y)| Circle::new((x, y), 4, BLUE.mix(0.4).filled()));
    chart
        .draw_series(LineSeries::new(
            observations
                .iter()
                .zip(&cumulative)
                .map(|(o, c)| (o.elapsed_sec, *c)),
            RED.stroke_width(2),
        ))?
        .label("Cumulative Avg Latency")
        .legend(|(x, y)| PathElement::new(vec![(x - 10, y), (x + 10, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;
    root.present()?;
    Ok(())
}

/// Frequency histogram of the latency series.
pub(crate) fn render_histogram(latencies: &[f64], path: &Path) -> anyhow::Result<()> {
    let bins = analyze::histogram(latencies, HISTOGRAM_BINS);
    let (x_min, x_max) = padded_range(latencies.iter().copied());
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.1;

    let root = BitMapBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Histogram of Inference Latency", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Latency (ms)")
        .y_desc("Frequency")
        .draw()?;

    // A constant series produces zero-width bins; stretch the single occupied bar over
    // the padded range so it stays visible.
    let bar_bounds = |bin: &analyze::HistogramBin| {
        if bin.upper > bin.lower {
            (bin.lower, bin.upper)
        } else {
            (x_min, x_max)
        }
    };

    chart.draw_series(bins.iter().filter(|b| b.count > 0).map(|b| {
        let (lower, upper) = bar_bounds(b);
        Rectangle::new([(lower, 0.0), (upper, b.count as f64)], CYAN.mix(0.5).filled())
    }))?;
    chart.draw_series(bins.iter().filter(|b| b.count > 0).map(|b| {
        let (lower, upper) = bar_bounds(b);
        Rectangle::new([(lower, 0.0), (upper, b.count as f64)], &BLACK)
    }))?;

    root.present()?;
    Ok(())
}

/// Empirical CDF of the latency series.
pub(crate) fn render_cdf(latencies: &[f64], path: &Path) -> anyhow::Result<()> {
    let points = analyze::empirical_cdf(latencies);
    let (x_min, x_max) = padded_range(latencies.iter().copied());

    let root = BitMapBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("CDF of Inference Latency", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..1.05)?;
    chart
        .configure_mesh()
        .x_desc("Latency (ms)")
        .y_desc("Cumulative Probability")
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &GREEN))?;
    chart.draw_series(
        points
            .iter()
            .map(|(x, y)| Circle::new((*x, *y), 3, GREEN.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// Horizontal box plot of the latency series, latency on the measured axis.
pub(crate) fn render_boxplot(latencies: &[f64], path: &Path) -> anyhow::Result<()> {
    let summary = analyze::five_number_summary(latencies)
        .context("Cannot draw a box plot for an empty series")?;
    let (x_min, x_max) = padded_range(latencies.iter().copied());

    let root = BitMapBackend::new(path, (1000, 250)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Box Plot of Inference Latency", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(20)
        .build_cartesian_2d(x_min..x_max, 0.0..1.0f64)?;
    chart
        .configure_mesh()
        .x_desc("Latency (ms)")
        .y_labels(0)
        .disable_y_mesh()
        .draw()?;

    chart.draw_series(std::iter::once(Rectangle::new(
        [(summary.q1, 0.25), (summary.q3, 0.75)],
        CYAN.mix(0.4).filled(),
    )))?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [(summary.q1, 0.25), (summary.q3, 0.75)],
        &BLACK,
    )))?;

    let whiskers = [
        // Whisker lines out to the extremes, with end caps
        vec![(summary.min, 0.5), (summary.q1, 0.5)],
        vec![(summary.q3, 0.5), (summary.max, 0.5)],
        vec![(summary.min, 0.4), (summary.min, 0.6)],
        vec![(summary.max, 0.4), (summary.max, 0.6)],
    ];
    chart.draw_series(whiskers.into_iter().map(|line| PathElement::new(line, &BLACK)))?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(summary.median, 0.25), (summary.median, 0.75)],
        RED.stroke_width(2),
    )))?;

    root.present()?;
    Ok(())
}

/// Axis bounds with a little headroom, widened to a unit span when the series is
/// constant so the chart ranges stay non-degenerate.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = match values.minmax() {
        MinMaxResult::NoElements => (0.0, 1.0),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(min, max) => (min, max),
    };

    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}

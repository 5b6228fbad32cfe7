use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::path::Path;
use thiserror::Error;

/// Header row of the durable observation log.
pub const LOG_HEADER: &str = "elapsed_time_sec,inference_time_ms";

/// One successfully measured latency sample.
///
/// Created exactly once per successful probe and never mutated. Within a run,
/// observations are produced in non-decreasing `elapsed_sec` order because there is
/// never more than one probe in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Wall-clock offset since the start of the run, in seconds
    pub elapsed_sec: f64,
    /// Latency reported by the probed service, in milliseconds
    pub latency_ms: f64,
}

impl Observation {
    pub fn new(elapsed_sec: f64, latency_ms: f64) -> Self {
        Self {
            elapsed_sec,
            latency_ms,
        }
    }
}

/// Terminal state of the measurement loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Cancelled,
    Completed,
}

/// Report of a single run
///
/// Appended as one JSON line to the run report file at the end of every run, whether it
/// completed or was interrupted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    /// The unique run id
    ///
    /// Chosen by the runner. Unique for each run.
    pub run_id: String,
    /// The endpoint that was probed
    pub endpoint: String,
    /// The time the run started
    ///
    /// This is a Unix timestamp in seconds.
    pub started_at: i64,
    /// Number of observations recorded before the run ended
    pub observation_count: usize,
    /// Number of payloads whose probe failed and was skipped
    pub failure_count: usize,
    /// How the run ended
    pub status: RunStatus,
    /// The version of the harness that produced this report
    pub harness_version: String,
}

#[derive(Debug, Error)]
pub enum LogFormatError {
    #[error("observation log does not start with the `{LOG_HEADER}` header, found `{found}`")]
    BadHeader { found: String },
    #[error("malformed observation log row on line {line}: `{row}`")]
    BadRow { line: usize, row: String },
}

/// Write the fixed two-column header of the observation log.
pub fn write_log_header<W: Write>(writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "{LOG_HEADER}")
}

/// Write one observation as a log row, both values rounded to two decimal places.
pub fn write_log_row<W: Write>(writer: &mut W, observation: &Observation) -> std::io::Result<()> {
    writeln!(
        writer,
        "{:.2},{:.2}",
        observation.elapsed_sec, observation.latency_ms
    )
}

/// Load a complete observation log from a file.
///
/// The log is append-only, so a file cut short by an interrupted run is still a valid
/// prefix of the full result and loads cleanly.
pub fn load_observation_log(path: impl AsRef<Path>) -> anyhow::Result<Vec<Observation>> {
    let file = std::fs::File::open(path.as_ref())?;
    let mut lines = std::io::BufReader::new(file).lines();

    let header = lines.next().transpose()?.unwrap_or_default();
    if header != LOG_HEADER {
        return Err(LogFormatError::BadHeader { found: header }.into());
    }

    let mut observations = Vec::new();
    for (index, line) in lines.enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let bad_row = || LogFormatError::BadRow {
            // Line 1 is the header
            line: index + 2,
            row: line.clone(),
        };

        let (elapsed, latency) = line.split_once(',').ok_or_else(|| bad_row())?;
        let elapsed = elapsed.trim().parse::<f64>().map_err(|_| bad_row())?;
        let latency = latency.trim().parse::<f64>().map_err(|_| bad_row())?;
        observations.push(Observation::new(elapsed, latency));
    }

    Ok(observations)
}

/// Append the run report to a file
///
/// The report is serialized to JSON and output as a single line followed by a newline.
/// The recommended file extension is `.jsonl`.
pub fn append_run_report(run_report: &RunReport, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path.as_ref())?;
    serde_json::to_writer(&mut file, run_report)?;
    let _ = file.write("\n".as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_rows_round_trip_at_two_decimal_places() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observations.csv");

        let mut file = std::fs::File::create(&path).unwrap();
        write_log_header(&mut file).unwrap();
        write_log_row(&mut file, &Observation::new(1.2345, 50.0)).unwrap();
        write_log_row(&mut file, &Observation::new(2.5, 81.239)).unwrap();

        let loaded = load_observation_log(&path).unwrap();
        assert_eq!(
            vec![Observation::new(1.23, 50.0), Observation::new(2.5, 81.24)],
            loaded
        );
    }

    #[test]
    fn empty_log_is_just_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observations.csv");

        let mut file = std::fs::File::create(&path).unwrap();
        write_log_header(&mut file).unwrap();

        assert!(load_observation_log(&path).unwrap().is_empty());
    }

    #[test]
    fn rejects_a_missing_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observations.csv");
        std::fs::write(&path, "1.00,50.00\n").unwrap();

        let err = load_observation_log(&path).unwrap_err();
        assert!(err.downcast_ref::<LogFormatError>().is_some());
    }

    #[test]
    fn rejects_a_non_numeric_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observations.csv");
        std::fs::write(&path, format!("{LOG_HEADER}\n1.00,fast\n")).unwrap();

        let err = load_observation_log(&path).unwrap_err();
        let err = err.downcast_ref::<LogFormatError>().unwrap();
        assert!(matches!(err, LogFormatError::BadRow { line: 2, .. }));
    }

    #[test]
    fn run_reports_append_one_line_each() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_reports.jsonl");

        let report = RunReport {
            run_id: "run-1".to_string(),
            endpoint: "http://localhost:31818/feedback/analyse".to_string(),
            started_at: 1_700_000_000,
            observation_count: 2,
            failure_count: 1,
            status: RunStatus::Completed,
            harness_version: "0.1.0".to_string(),
        };
        append_run_report(&report, &path).unwrap();
        append_run_report(&report, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(2, lines.len());

        let loaded: RunReport = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(report, loaded);
    }
}

use latency_bench_model::{write_log_header, write_log_row, Observation};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to write the observation log at {path}")]
pub struct RecorderWriteError {
    path: PathBuf,
    #[source]
    source: std::io::Error,
}

/// Owns the in-memory observation series and its durable log for the duration of a run.
///
/// Every recorded observation is written and flushed before `record` returns, so the log
/// file is always a valid prefix of the final result, even if the run is cut short. A
/// write failure is fatal for the run: the log is the ground truth for later analysis
/// and must not silently diverge from the in-memory series.
pub struct Recorder {
    file: File,
    path: PathBuf,
    observations: Vec<Observation>,
}

impl Recorder {
    /// Create (or truncate) the log file and write the fixed two-column header.
    pub fn create(path: &Path) -> Result<Self, RecorderWriteError> {
        let write_error = |source| RecorderWriteError {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::create(path).map_err(write_error)?;
        write_log_header(&mut file).map_err(write_error)?;
        file.flush().map_err(write_error)?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            observations: Vec::new(),
        })
    }

    /// Append one observation to the series and write its log row.
    ///
    /// The row reaches the file before this returns, so an interruption immediately
    /// afterwards never loses it. The in-memory series is only extended once the row is
    /// durable, keeping the two views in agreement at every point in time.
    pub fn record(&mut self, elapsed_sec: f64, latency_ms: f64) -> Result<(), RecorderWriteError> {
        let observation = Observation::new(elapsed_sec, latency_ms);

        write_log_row(&mut self.file, &observation).map_err(|source| RecorderWriteError {
            path: self.path.clone(),
            source,
        })?;
        self.file.flush().map_err(|source| RecorderWriteError {
            path: self.path.clone(),
            source,
        })?;

        self.observations.push(observation);
        Ok(())
    }

    /// Build a recorder over an already-open file, skipping the header write. Lets tests
    /// hand in a file whose writes fail.
    #[cfg(test)]
    pub(crate) fn over_file(file: File, path: &Path) -> Self {
        Self {
            file,
            path: path.to_path_buf(),
            observations: Vec::new(),
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Hand the recorded series off once the loop has terminated.
    pub fn into_observations(self) -> Vec<Observation> {
        self.observations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latency_bench_model::load_observation_log;

    #[test]
    fn log_rows_match_the_series_after_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observations.csv");
        let mut recorder = Recorder::create(&path).unwrap();

        assert!(load_observation_log(&path).unwrap().is_empty());

        recorder.record(0.5, 50.0).unwrap();
        assert_eq!(1, load_observation_log(&path).unwrap().len());
        assert_eq!(1, recorder.observations().len());

        recorder.record(1.0, 80.0).unwrap();
        let rows = load_observation_log(&path).unwrap();
        assert_eq!(2, rows.len());
        assert_eq!(recorder.observations(), rows.as_slice());
    }

    #[test]
    fn rows_are_rounded_to_two_decimal_places() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observations.csv");
        let mut recorder = Recorder::create(&path).unwrap();

        recorder.record(1.23456, 78.91234).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("1.23,78.91\n"), "unexpected log: {content}");
    }

    #[test]
    fn a_failed_row_write_leaves_the_series_untouched() {
        // Writes to /dev/full fail with ENOSPC, standing in for a full disk.
        let path = Path::new("/dev/full");
        let file = std::fs::OpenOptions::new().write(true).open(path).unwrap();
        let mut recorder = Recorder::over_file(file, path);

        recorder
            .record(0.5, 50.0)
            .expect_err("A row write to a full device must fail");
        assert!(recorder.observations().is_empty());
    }

    #[test]
    fn create_truncates_a_previous_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observations.csv");

        let mut recorder = Recorder::create(&path).unwrap();
        recorder.record(0.5, 50.0).unwrap();
        drop(recorder);

        let recorder = Recorder::create(&path).unwrap();
        assert!(load_observation_log(&path).unwrap().is_empty());
        assert!(recorder.observations().is_empty());
    }
}

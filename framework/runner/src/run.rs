use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use latency_bench_core::prelude::InterruptListener;
use latency_bench_model::{append_run_report, RunReport, RunStatus};

use crate::cli::Cli;
use crate::corpus::{load_corpus, Payload};
use crate::executor::Executor;
use crate::probe::{HttpProbe, Probe};
use crate::progress::ProgressReporter;
use crate::recorder::Recorder;
use crate::shutdown::start_interrupt_listener;
use crate::types::{BenchResult, RunOutcome};

/// Drive a full benchmarking run: load the corpus, probe every payload while persisting
/// observations as they arrive, then hand the collected series to the summariser.
pub fn run(cli: Cli) -> BenchResult<()> {
    let corpus = load_corpus(&cli.corpus)?;
    log::info!("Loaded {} feedback entries", corpus.len());

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let executor = Arc::new(Executor::new(runtime));
    let interrupt_handle = start_interrupt_listener(&executor);

    let endpoint = reqwest::Url::parse(&cli.endpoint)
        .with_context(|| format!("Invalid endpoint URL: {}", cli.endpoint))?;
    let probe = HttpProbe::new(executor, endpoint, Duration::from_secs(cli.timeout))?;

    let recorder = Recorder::create(&cli.log_path)?;
    let progress = ProgressReporter::new(corpus.len() as u64, cli.no_progress);
    let mut interrupt = interrupt_handle.new_listener();

    let outcome = run_loop(
        &probe,
        &corpus,
        recorder,
        &mut interrupt,
        Duration::from_millis(cli.pacing_ms),
        &progress,
    )?;

    log::info!(
        "Run {:?} with {} observations and {} failures",
        outcome.status,
        outcome.observations.len(),
        outcome.failure_count
    );

    let report = RunReport {
        run_id: nanoid::nanoid!(),
        endpoint: cli.endpoint.clone(),
        started_at: outcome.started_at,
        observation_count: outcome.observations.len(),
        failure_count: outcome.failure_count,
        status: outcome.status,
        harness_version: env!("CARGO_PKG_VERSION").to_string(),
    };
    append_run_report(&report, &cli.run_report_path).context("Failed to append the run report")?;

    latency_summariser::summarize(&outcome.observations, &cli.artifacts_dir)?;

    Ok(())
}

/// The resilient measurement loop.
///
/// Per-item failure isolation: a probe error is counted, logged and skipped, while a
/// recorder write error ends the run. The interrupt is sampled only at the top of each
/// iteration, so an in-flight probe always completes or errors before cancellation takes
/// effect.
pub fn run_loop<P: Probe>(
    probe: &P,
    corpus: &[Payload],
    mut recorder: Recorder,
    interrupt: &mut InterruptListener,
    pacing: Duration,
    progress: &ProgressReporter,
) -> BenchResult<RunOutcome> {
    let started = Instant::now();
    let started_at = chrono::Utc::now().timestamp();
    let mut failure_count = 0;
    let mut status = RunStatus::Running;

    for (index, payload) in corpus.iter().enumerate() {
        if interrupt.is_interrupted() {
            status = RunStatus::Cancelled;
            break;
        }

        match probe.probe(payload) {
            Ok(latency_ms) => {
                let elapsed_sec = started.elapsed().as_secs_f64();
                recorder.record(elapsed_sec, latency_ms)?;
                progress.on_success(index, elapsed_sec, latency_ms);
            }
            Err(cause) => {
                failure_count += 1;
                progress.on_failure(index, &cause);
            }
        }

        // Pace the loop whether the probe succeeded or not, to throttle the request
        // rate against the target service.
        std::thread::sleep(pacing);
    }
    progress.finish();

    if status == RunStatus::Running {
        status = RunStatus::Completed;
    }

    Ok(RunOutcome {
        observations: recorder.into_observations(),
        failure_count,
        status,
        started_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeError;
    use latency_bench_core::prelude::InterruptHandle;
    use latency_bench_model::load_observation_log;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct ScriptedProbe {
        results: RefCell<VecDeque<Result<f64, ProbeError>>>,
        interrupt_on_probe: Option<InterruptHandle>,
    }

    impl ScriptedProbe {
        fn new(results: Vec<Result<f64, ProbeError>>) -> Self {
            Self {
                results: RefCell::new(results.into()),
                interrupt_on_probe: None,
            }
        }
    }

    impl Probe for ScriptedProbe {
        fn probe(&self, _payload: &Payload) -> Result<f64, ProbeError> {
            if let Some(handle) = &self.interrupt_on_probe {
                handle.interrupt();
            }
            self.results
                .borrow_mut()
                .pop_front()
                .expect("probe invoked more times than scripted")
        }
    }

    fn corpus_of(len: usize) -> Vec<Payload> {
        (0..len).map(|i| json!({"text": format!("entry {i}")})).collect()
    }

    #[test]
    fn probe_failures_are_isolated_and_counted() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("observations.csv");
        let recorder = Recorder::create(&log_path).unwrap();

        let probe = ScriptedProbe::new(vec![
            Ok(50.0),
            Err(ProbeError::MissingLatency),
            Ok(80.0),
        ]);
        let handle = InterruptHandle::new();
        let mut interrupt = handle.new_listener();
        let progress = ProgressReporter::new(3, true);

        let outcome = run_loop(
            &probe,
            &corpus_of(3),
            recorder,
            &mut interrupt,
            Duration::ZERO,
            &progress,
        )
        .unwrap();

        assert_eq!(RunStatus::Completed, outcome.status);
        assert_eq!(1, outcome.failure_count);

        let latencies: Vec<f64> = outcome.observations.iter().map(|o| o.latency_ms).collect();
        assert_eq!(vec![50.0, 80.0], latencies);
        assert!(outcome.observations[0].elapsed_sec <= outcome.observations[1].elapsed_sec);

        // The durable log agrees with the in-memory series: two rows, the failed entry
        // was never recorded.
        assert_eq!(2, load_observation_log(&log_path).unwrap().len());
    }

    #[test]
    fn interrupt_is_observed_at_the_next_iteration_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("observations.csv");
        let recorder = Recorder::create(&log_path).unwrap();

        // The signal lands while the first probe is in flight. That probe still
        // completes and is recorded; no further payload is ever probed.
        let handle = InterruptHandle::new();
        let mut probe = ScriptedProbe::new(vec![Ok(50.0)]);
        probe.interrupt_on_probe = Some(handle.clone());
        let mut interrupt = handle.new_listener();
        let progress = ProgressReporter::new(5, true);

        let outcome = run_loop(
            &probe,
            &corpus_of(5),
            recorder,
            &mut interrupt,
            Duration::ZERO,
            &progress,
        )
        .unwrap();

        assert_eq!(RunStatus::Cancelled, outcome.status);
        assert_eq!(1, outcome.observations.len());
        assert_eq!(0, outcome.failure_count);
        assert_eq!(1, load_observation_log(&log_path).unwrap().len());
    }

    #[test]
    fn a_recorder_write_failure_ends_the_run() {
        // A recorder over /dev/full fails every row write with ENOSPC.
        let log_path = std::path::Path::new("/dev/full");
        let file = std::fs::OpenOptions::new()
            .write(true)
            .open(log_path)
            .unwrap();
        let recorder = Recorder::over_file(file, log_path);

        let probe = ScriptedProbe::new(vec![Ok(50.0), Ok(60.0), Ok(70.0)]);
        let handle = InterruptHandle::new();
        let mut interrupt = handle.new_listener();
        let progress = ProgressReporter::new(3, true);

        let error = run_loop(
            &probe,
            &corpus_of(3),
            recorder,
            &mut interrupt,
            Duration::ZERO,
            &progress,
        )
        .expect_err("A failed row write must terminate the run");
        assert!(error.downcast_ref::<crate::recorder::RecorderWriteError>().is_some());

        // Only the first payload was probed; the loop never reached the rest.
        assert_eq!(2, probe.results.borrow().len());
    }

    #[test]
    fn an_exhausted_empty_corpus_completes() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Recorder::create(&dir.path().join("observations.csv")).unwrap();

        let probe = ScriptedProbe::new(vec![]);
        let handle = InterruptHandle::new();
        let mut interrupt = handle.new_listener();
        let progress = ProgressReporter::new(0, true);

        let outcome = run_loop(
            &probe,
            &[],
            recorder,
            &mut interrupt,
            Duration::ZERO,
            &progress,
        )
        .unwrap();

        assert_eq!(RunStatus::Completed, outcome.status);
        assert!(outcome.observations.is_empty());
        assert_eq!(0, outcome.failure_count);
    }
}

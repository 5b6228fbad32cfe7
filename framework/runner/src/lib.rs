mod cli;
mod corpus;
mod executor;
mod probe;
mod progress;
mod recorder;
mod run;
mod shutdown;
mod types;

pub mod prelude {
    pub use crate::cli::Cli;
    pub use crate::corpus::{load_corpus, CorpusError, Payload};
    pub use crate::executor::Executor;
    pub use crate::probe::{HttpProbe, Probe, ProbeError};
    pub use crate::progress::ProgressReporter;
    pub use crate::recorder::{Recorder, RecorderWriteError};
    pub use crate::run::{run, run_loop};
    pub use crate::types::{BenchResult, RunOutcome};
}

use std::path::Path;
use thiserror::Error;

/// One request record from the corpus, sent verbatim to the probed endpoint.
pub type Payload = serde_json::Value;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file {path}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("corpus file {path} does not decode into a sequence of records")]
    Undecodable {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Load the full corpus before the measurement loop starts.
///
/// All or nothing: a file that cannot be read, or that does not decode into a sequence
/// of records, fails the run before any probe is sent.
pub fn load_corpus(path: &Path) -> Result<Vec<Payload>, CorpusError> {
    let content = std::fs::read(path).map_err(|source| CorpusError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_slice(&content).map_err(|source| CorpusError::Undecodable {
        path: path.display().to_string(),
        source,
    })
}

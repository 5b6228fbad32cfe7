use crate::corpus::Payload;
use crate::executor::Executor;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request failed")]
    Request(#[source] reqwest::Error),
    #[error("unexpected response status: {0}")]
    Status(reqwest::StatusCode),
    #[error("response body is not valid JSON")]
    MalformedBody(#[source] reqwest::Error),
    #[error("response is missing a numeric `inference_time` field")]
    MissingLatency,
}

/// A single measurement attempt against the target service.
///
/// One invocation performs exactly one network attempt. There are no retries at this
/// seam; the run controller decides what to do with a failure.
pub trait Probe {
    fn probe(&self, payload: &Payload) -> Result<f64, ProbeError>;
}

/// Probes the configured endpoint with one POST per payload, bounded by a fixed
/// per-request timeout, and reads the service-reported latency from the reply.
pub struct HttpProbe {
    executor: Arc<Executor>,
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpProbe {
    pub fn new(
        executor: Arc<Executor>,
        endpoint: reqwest::Url,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the HTTP client")?;

        Ok(Self {
            executor,
            client,
            endpoint,
        })
    }
}

impl Probe for HttpProbe {
    fn probe(&self, payload: &Payload) -> Result<f64, ProbeError> {
        self.executor.execute_in_place(async {
            let response = self
                .client
                .post(self.endpoint.clone())
                .json(payload)
                .send()
                .await
                .map_err(ProbeError::Request)?;

            let status = response.status();
            if !status.is_success() {
                return Err(ProbeError::Status(status));
            }

            let body: serde_json::Value =
                response.json().await.map_err(ProbeError::MalformedBody)?;
            extract_latency(&body)
        })
    }
}

/// Pull the latency figure, in milliseconds, out of the service reply.
pub(crate) fn extract_latency(body: &serde_json::Value) -> Result<f64, ProbeError> {
    body.get("inference_time")
        .and_then(serde_json::Value::as_f64)
        .ok_or(ProbeError::MissingLatency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_a_numeric_latency_field() {
        let body = json!({"inference_time": 42.5, "sentiment": "positive"});
        assert_eq!(42.5, extract_latency(&body).unwrap());
    }

    #[test]
    fn integer_latency_values_are_accepted() {
        let body = json!({"inference_time": 42});
        assert_eq!(42.0, extract_latency(&body).unwrap());
    }

    #[test]
    fn missing_field_is_rejected() {
        let body = json!({"sentiment": "positive"});
        assert!(matches!(
            extract_latency(&body),
            Err(ProbeError::MissingLatency)
        ));
    }

    #[test]
    fn non_numeric_latency_is_rejected() {
        let body = json!({"inference_time": "42.5"});
        assert!(matches!(
            extract_latency(&body),
            Err(ProbeError::MissingLatency)
        ));
    }
}

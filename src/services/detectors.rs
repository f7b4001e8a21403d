// External Detection Services
// HTTP clients for the AI-detection and plagiarism backends

use crate::models::{AiDetectionResponse, PlagiarismResponse, ServiceRequest};
use crate::services::config_store::AppConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Service error: {status} - {message}")]
    Status { status: u16, message: String },
    #[error("JSON parse error: {0}")]
    Decode(String),
    #[error("{0} timed out after {1}s")]
    Timeout(&'static str, u64),
}

pub struct DetectorClient {
    client: Client,
    detection_url: String,
    plagiarism_url: String,
    detection_timeout: Duration,
    plagiarism_timeout: Duration,
}

impl Default for DetectorClient {
    fn default() -> Self {
        Self::from_config(&AppConfig::default().with_env_overrides())
    }
}

impl DetectorClient {
    pub fn from_config(config: &AppConfig) -> Self {
        // Per-request timeouts are set below; the builder only bounds connecting.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            detection_url: config.detection_api_url.clone(),
            plagiarism_url: config.plagiarism_api_url.clone(),
            detection_timeout: Duration::from_secs(config.timeouts.detection_secs),
            plagiarism_timeout: Duration::from_secs(config.timeouts.plagiarism_secs),
        }
    }

    pub fn detection_url(&self) -> &str {
        &self.detection_url
    }

    pub fn plagiarism_url(&self) -> &str {
        &self.plagiarism_url
    }

    pub async fn detect_ai(&self, text: &str) -> Result<AiDetectionResponse, ServiceError> {
        self.post("ai-detection", &self.detection_url, text, self.detection_timeout)
            .await
    }

    pub async fn check_plagiarism(&self, text: &str) -> Result<PlagiarismResponse, ServiceError> {
        self.post("plagiarism", &self.plagiarism_url, text, self.plagiarism_timeout)
            .await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        text: &str,
        timeout: Duration,
    ) -> Result<T, ServiceError> {
        let start = Instant::now();

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .timeout(timeout)
            .json(&ServiceRequest { text })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout(service, timeout.as_secs())
                } else {
                    ServiceError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let latency_ms = start.elapsed().as_millis() as i64;
        info!(service, latency_ms, bytes = body.len(), "service.response");

        decode(&body)
    }
}

/// Decode a service body, keeping the serde message for the log.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ServiceError> {
    serde_json::from_str(body).map_err(|e| {
        debug!(error = %e, "service.decode_failed");
        ServiceError::Decode(e.to_string())
    })
}

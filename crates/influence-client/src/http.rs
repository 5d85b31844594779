//! HTTP/JSON transport to the influence service.

use std::time::Duration;

use board_editor::wire::{InfluenceRequest, InfluenceResponse};
use tracing::debug;

use crate::{InfluenceService, TransportError};

/// Path of the influence endpoint below the service base URL.
const ENDPOINT: &str = "retrieve_colors";

/// POSTs requests to `{base_url}/retrieve_colors`.
#[derive(Debug, Clone)]
pub struct HttpInfluenceService {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpInfluenceService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}/{ENDPOINT}", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl InfluenceService for HttpInfluenceService {
    async fn fetch(&self, request: InfluenceRequest) -> Result<InfluenceResponse, TransportError> {
        debug!(url = %self.url, pieces = request.data.pieces.len(), "POST influence request");
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        Ok(InfluenceResponse::from_json(&body)?)
    }
}

impl HttpInfluenceService {
    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout.as_millis() as u64)
        } else {
            TransportError::Http(err)
        }
    }
}

//! Blocking HTTP client for the rollup server.

use std::time::Duration;

use alpen_oracle_engine::{FinishStatus, Output, RollupRequest, RollupTransport, TransportError};
use reqwest::{blocking::Client, StatusCode};
use serde_json::json;
use tracing::*;

#[derive(Debug)]
pub(crate) struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// `timeout` bounds each request, including the long-polling `finish`.
    pub(crate) fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }
}

fn http_err(err: reqwest::Error) -> TransportError {
    TransportError::Http(err.to_string())
}

impl RollupTransport for HttpTransport {
    fn finish(&mut self, status: FinishStatus) -> Result<Option<RollupRequest>, TransportError> {
        let resp = self
            .client
            .post(self.url("finish"))
            .json(&json!({ "status": status }))
            .send()
            .map_err(http_err)?;

        let code = resp.status();
        trace!(%code, "finish answered");
        if code == StatusCode::ACCEPTED || code == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !code.is_success() {
            return Err(TransportError::UnexpectedStatus(code.as_u16()));
        }

        let body = resp.text().map_err(http_err)?;
        let request = serde_json::from_str(&body)
            .map_err(|e| TransportError::MalformedRequest(e.to_string()))?;
        Ok(Some(request))
    }

    fn post(&mut self, output: &Output) -> Result<(), TransportError> {
        let endpoint = output.endpoint();
        let resp = self
            .client
            .post(self.url(endpoint))
            .json(&output.to_json())
            .send()
            .map_err(http_err)?;

        let code = resp.status();
        debug!(%endpoint, %code, "posted output");
        if !code.is_success() {
            return Err(TransportError::UnexpectedStatus(code.as_u16()));
        }
        Ok(())
    }
}

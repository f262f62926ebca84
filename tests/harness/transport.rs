//! In-memory rollup server.

use std::collections::VecDeque;

use alpen_oracle_common::retry::RetryConfig;
use alpen_oracle_engine::{FinishStatus, Output, RollupRequest, RollupTransport, TransportError};
use serde_json::Value;

/// Replays queued `finish` replies and records everything the runner sends.
///
/// Once the script runs out every `finish` answers with "no pending request".
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: VecDeque<Result<Option<RollupRequest>, TransportError>>,
    finishes: Vec<FinishStatus>,
    posted: Vec<(&'static str, Value)>,
    failing_posts: usize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_requests(requests: impl IntoIterator<Item = RollupRequest>) -> Self {
        let mut transport = Self::new();
        for request in requests {
            transport.push_request(request);
        }
        transport
    }

    pub fn push_request(&mut self, request: RollupRequest) {
        self.script.push_back(Ok(Some(request)));
    }

    pub fn push_idle(&mut self) {
        self.script.push_back(Ok(None));
    }

    pub fn push_failure(&mut self, err: TransportError) {
        self.script.push_back(Err(err));
    }

    /// Makes the next `count` posts fail with a 500.
    pub fn fail_next_posts(&mut self, count: usize) {
        self.failing_posts = count;
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Statuses sent with each `finish`, in order.
    pub fn finishes(&self) -> &[FinishStatus] {
        &self.finishes
    }

    /// Successfully posted outputs as `(endpoint, body)`.
    pub fn posted(&self) -> &[(&'static str, Value)] {
        &self.posted
    }

    pub fn posted_to(&self, endpoint: &str) -> Vec<&Value> {
        self.posted
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .map(|(_, body)| body)
            .collect()
    }
}

impl RollupTransport for ScriptedTransport {
    fn finish(&mut self, status: FinishStatus) -> Result<Option<RollupRequest>, TransportError> {
        self.finishes.push(status);
        self.script.pop_front().unwrap_or(Ok(None))
    }

    fn post(&mut self, output: &Output) -> Result<(), TransportError> {
        if self.failing_posts > 0 {
            self.failing_posts -= 1;
            return Err(TransportError::UnexpectedStatus(500));
        }
        self.posted.push((output.endpoint(), output.to_json()));
        Ok(())
    }
}

/// Backoff that keeps failing tests fast.
pub fn fast_backoff() -> RetryConfig {
    RetryConfig {
        max_retries: 0,
        base_delay_ms: 1,
        multiplier: 1.0,
        max_delay_ms: 1,
    }
}

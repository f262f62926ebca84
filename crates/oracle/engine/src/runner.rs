//! The finish/dispatch/post loop.

use std::thread;

use alpen_oracle_common::retry::RetryConfig;
use tracing::*;

use crate::{
    dispatcher::RequestHandler,
    errors::TransportError,
    request::{FinishStatus, Output, Report, Response},
    transport::RollupTransport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The server had no pending request.
    Idle,
    /// A request was handled with this status.
    Processed(FinishStatus),
}

/// Drives a [`RequestHandler`] with requests pulled from a [`RollupTransport`].
#[derive(Debug)]
pub struct RollupRunner<T, H> {
    transport: T,
    handler: H,
    status: FinishStatus,
    backoff: RetryConfig,
}

impl<T: RollupTransport, H: RequestHandler> RollupRunner<T, H> {
    pub fn new(transport: T, handler: H) -> Self {
        Self {
            transport,
            handler,
            status: FinishStatus::Accept,
            backoff: RetryConfig::default(),
        }
    }

    /// Delay policy applied after consecutive `finish` failures.
    pub fn with_backoff(mut self, backoff: RetryConfig) -> Self {
        self.backoff = backoff;
        self
    }

    /// Status sent with the next `finish`.
    pub fn status(&self) -> FinishStatus {
        self.status
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_parts(self) -> (T, H) {
        (self.transport, self.handler)
    }

    /// Sends `finish`, handles the returned request and posts its outputs.
    ///
    /// Output post failures are logged and skipped. A request body that does
    /// not parse is answered with a report and a `reject`. Any other failed
    /// `finish` is returned as an error.
    pub fn step(&mut self) -> Result<StepOutcome, TransportError> {
        trace!(status = %self.status, "sending finish");
        let request = match self.transport.finish(self.status) {
            Ok(Some(request)) => request,
            Ok(None) => {
                debug!("no pending rollup request");
                return Ok(StepOutcome::Idle);
            }
            Err(err @ TransportError::MalformedRequest(_)) => {
                warn!(%err, "rejecting unparsable rollup request");
                let report = Report::from_text(&format!("error processing request: {err}"));
                let response = Response::reject(vec![Output::Report(report)]);
                self.post_all(response.outputs());
                self.status = response.status();
                return Ok(StepOutcome::Processed(self.status));
            }
            Err(err) => return Err(err),
        };

        let response = self.handler.handle(&request);
        self.post_all(response.outputs());

        self.status = response.status();
        info!(
            kind = request.kind(),
            status = %self.status,
            outputs = response.outputs().len(),
            "request processed"
        );
        Ok(StepOutcome::Processed(self.status))
    }

    fn post_all(&mut self, outputs: &[Output]) {
        for output in outputs {
            if let Err(err) = self.transport.post(output) {
                warn!(%err, endpoint = output.endpoint(), "failed to post output");
            }
        }
    }

    /// Steps while `keep_running` returns true, backing off after transport
    /// failures.
    pub fn run_while(&mut self, mut keep_running: impl FnMut() -> bool) {
        let mut failures = 0u32;
        while keep_running() {
            match self.step() {
                Ok(_) => failures = 0,
                Err(err) => {
                    let delay = self.backoff.calculate_delay(failures);
                    warn!(%err, failures, ?delay, "finish failed, backing off");
                    thread::sleep(delay);
                    failures = failures.saturating_add(1);
                }
            }
        }
    }
}

use crate::{
    errors::TransportError,
    request::{FinishStatus, Output, RollupRequest},
};

/// Connection to the rollup HTTP server.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
pub trait RollupTransport {
    /// Reports the outcome of the previous request and waits for the next
    /// one. Returns `None` when the server has nothing pending.
    fn finish(&mut self, status: FinishStatus) -> Result<Option<RollupRequest>, TransportError>;

    /// Posts one output of the request being processed.
    fn post(&mut self, output: &Output) -> Result<(), TransportError>;
}

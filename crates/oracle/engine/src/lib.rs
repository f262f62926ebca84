//! Request engine of the rollup oracle.
//!
//! The [`Dispatcher`] routes each rollup request by sender, drives the
//! [`ComplianceMachine`] with validated evidence and produces vouchers,
//! notices and reports. The [`RollupRunner`] pumps requests from a
//! [`RollupTransport`] into any [`RequestHandler`].

mod addresses;
mod compliance;
mod dispatcher;
mod errors;
mod evidence;
mod request;
mod runner;
mod transport;

pub use addresses::{KnownAddresses, RewardConfig};
pub use compliance::{ComplianceMachine, CompliancePolicy, ComplianceState, EvidenceOutcome};
#[cfg(any(test, feature = "test-utils"))]
pub use dispatcher::MockRequestHandler;
pub use dispatcher::{Dispatcher, RequestHandler};
pub use errors::{DispatchError, DispatchResult, Mismatch, TransportError};
pub use evidence::{EvidenceSummary, EvidenceVerifier};
pub use request::{
    AdvanceMetadata, AdvanceRequest, FinishStatus, InspectRequest, Notice, Output, Report,
    Response, RollupRequest,
};
pub use runner::{RollupRunner, StepOutcome};
#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockRollupTransport;
pub use transport::RollupTransport;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceState {
    #[default]
    NonCompliant,
    Compliant,
}

impl ComplianceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceState::NonCompliant => "NON_COMPLIANT",
            ComplianceState::Compliant => "COMPLIANT",
        }
    }
}

impl fmt::Display for ComplianceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How failed evidence affects an already compliant oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompliancePolicy {
    /// Every evidence submission re-derives the state.
    #[default]
    PerRequest,
    /// Compliance, once reached, is never revoked.
    Sticky,
}

/// Result of validating one evidence submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceOutcome {
    Accepted,
    Rejected,
}

/// Single-writer holder of the compliance state.
#[derive(Debug, Clone)]
pub struct ComplianceMachine {
    state: ComplianceState,
    policy: CompliancePolicy,
}

impl ComplianceMachine {
    pub fn new(policy: CompliancePolicy) -> Self {
        Self {
            state: ComplianceState::default(),
            policy,
        }
    }

    pub fn state(&self) -> ComplianceState {
        self.state
    }

    pub fn policy(&self) -> CompliancePolicy {
        self.policy
    }

    /// Applies an evidence outcome and returns the new state.
    pub fn record(&mut self, outcome: EvidenceOutcome) -> ComplianceState {
        let next = match (outcome, self.policy) {
            (EvidenceOutcome::Accepted, _) => ComplianceState::Compliant,
            (EvidenceOutcome::Rejected, CompliancePolicy::PerRequest) => {
                ComplianceState::NonCompliant
            }
            (EvidenceOutcome::Rejected, CompliancePolicy::Sticky) => self.state,
        };
        if next != self.state {
            info!(from = %self.state, to = %next, policy = ?self.policy, "compliance state changed");
        }
        self.state = next;
        next
    }
}

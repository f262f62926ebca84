//! Routing of rollup requests by sender.

use alpen_oracle_codec::{
    decode_address, decode_deposit, decode_verifier_input, erc20_transfer_voucher,
    erc721_safe_transfer_voucher, ether_withdrawal_voucher, hex_to_str, reward_voucher, Address,
    DepositKind, DepositPayload, SelectorRegistry, VerifierPayload, Voucher, VoucherTemplate,
};
use alpen_oracle_perception::{InferenceBackend, OutlierClassifier};
use serde_json::json;
use tracing::*;

use crate::{
    addresses::{KnownAddresses, RewardConfig},
    compliance::{ComplianceMachine, CompliancePolicy, ComplianceState, EvidenceOutcome},
    errors::{DispatchError, DispatchResult, Mismatch},
    evidence::{EvidenceSummary, EvidenceVerifier},
    request::{AdvanceRequest, InspectRequest, Notice, Output, Report, Response, RollupRequest},
};

/// Turns one rollup request into a finish status and outputs.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
pub trait RequestHandler {
    fn handle(&mut self, request: &RollupRequest) -> Response;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Relay,
    Deposit(DepositKind),
    Verifier,
    Unrecognized,
}

/// The oracle's request handler. Owns the compliance state and the current
/// dapp address.
#[derive(Debug)]
pub struct Dispatcher<B, C> {
    addresses: KnownAddresses,
    reward: RewardConfig,
    selectors: SelectorRegistry,
    verifier: EvidenceVerifier<B, C>,
    compliance: ComplianceMachine,
    dapp_address: Option<Address>,
}

impl<B: InferenceBackend, C: OutlierClassifier> Dispatcher<B, C> {
    pub fn new(
        addresses: KnownAddresses,
        reward: RewardConfig,
        verifier: EvidenceVerifier<B, C>,
        policy: CompliancePolicy,
    ) -> Self {
        let dapp_address = addresses.voucher_destination;
        Self {
            addresses,
            reward,
            selectors: SelectorRegistry::new(),
            verifier,
            compliance: ComplianceMachine::new(policy),
            dapp_address,
        }
    }

    pub fn compliance_state(&self) -> ComplianceState {
        self.compliance.state()
    }

    /// Current destination for Ether withdrawals.
    pub fn dapp_address(&self) -> Option<Address> {
        self.dapp_address
    }

    pub fn selectors(&self) -> &SelectorRegistry {
        &self.selectors
    }

    fn route(&self, sender: Address) -> Route {
        let known = &self.addresses;
        if sender == known.relay {
            Route::Relay
        } else if sender == known.ether_portal {
            Route::Deposit(DepositKind::Ether)
        } else if sender == known.erc20_portal {
            Route::Deposit(DepositKind::Erc20)
        } else if sender == known.erc721_portal {
            Route::Deposit(DepositKind::Erc721)
        } else if sender == known.trusted_verifier_sender {
            Route::Verifier
        } else {
            Route::Unrecognized
        }
    }

    fn handle_advance(&mut self, request: &AdvanceRequest) -> DispatchResult<Vec<Output>> {
        let sender = request.sender()?;
        let payload = request.payload_bytes()?;
        let route = self.route(sender);
        debug!(%sender, ?route, len = payload.len(), "routing advance request");

        match route {
            Route::Relay => self.handle_relay(&payload),
            Route::Deposit(kind) => self.handle_deposit(kind, &payload),
            Route::Verifier => self.handle_verifier(&payload),
            Route::Unrecognized => Err(DispatchError::UnknownSender(sender)),
        }
    }

    fn handle_relay(&mut self, payload: &[u8]) -> DispatchResult<Vec<Output>> {
        let dapp = decode_address(payload)?;
        if let Some(prev) = self.dapp_address.replace(dapp) {
            if prev != dapp {
                warn!(%prev, %dapp, "relay replaced dapp address");
            }
        }
        info!(%dapp, "dapp address relayed");

        let notice = json!({ "dapp_address": dapp.to_string().to_lowercase() });
        Ok(vec![Output::Notice(Notice::from_text(&notice.to_string()))])
    }

    fn handle_deposit(&self, kind: DepositKind, payload: &[u8]) -> DispatchResult<Vec<Output>> {
        let deposit = decode_deposit(kind, payload)?;
        let voucher = match deposit {
            DepositPayload::Ether(d) => {
                let dapp = self.dapp_address.ok_or(DispatchError::DappAddressUnknown)?;
                ether_withdrawal_voucher(&self.selectors, dapp, d.depositor, d.amount)?
            }
            DepositPayload::Erc20(d) => {
                if !d.success {
                    return Err(DispatchError::DepositTransferFailed {
                        token: d.token,
                        depositor: d.depositor,
                        amount: d.amount,
                    });
                }
                erc20_transfer_voucher(&self.selectors, d.token, d.depositor, d.amount)?
            }
            DepositPayload::Erc721(d) => {
                let dapp = self.dapp_address.ok_or(DispatchError::DappAddressUnknown)?;
                erc721_safe_transfer_voucher(
                    &self.selectors,
                    d.token,
                    dapp,
                    d.depositor,
                    d.token_id,
                )?
            }
        };
        info!(%kind, destination = %voucher.destination(), "refunding deposit");
        Ok(vec![Output::Voucher(voucher)])
    }

    fn handle_verifier(&mut self, payload: &[u8]) -> DispatchResult<Vec<Output>> {
        let input = decode_verifier_input(payload)?;
        let expected = self.selectors.verifier();
        if input.selector != expected {
            return Err(DispatchError::SelectorMismatch(Mismatch {
                expected,
                got: input.selector,
            }));
        }

        // Past the selector check, every failure counts against compliance.
        let (reward, summary) = match self.verify_evidence(&input) {
            Ok(verified) => verified,
            Err(err) => {
                self.compliance.record(EvidenceOutcome::Rejected);
                return Err(err);
            }
        };
        let state = self.compliance.record(EvidenceOutcome::Accepted);
        info!(
            %state,
            detections = summary.detections.len(),
            recipient = %self.reward.recipient,
            "evidence verified, issuing reward"
        );

        let notice = json!({
            "compliance_state": state.as_str(),
            "detections": summary.detections.len(),
        });
        Ok(vec![
            Output::Voucher(reward),
            Output::Notice(Notice::from_text(&notice.to_string())),
        ])
    }

    fn verify_evidence(
        &self,
        input: &VerifierPayload<'_>,
    ) -> DispatchResult<(Voucher, EvidenceSummary)> {
        let reward = reward_voucher(
            &self.selectors,
            self.reward.contract,
            self.reward.recipient,
            self.reward.amount,
        )?;
        let summary = self.verifier.verify(input.real_world_data()?)?;
        Ok((reward, summary))
    }

    fn handle_inspect(&self, request: &InspectRequest) -> Response {
        let state = json!({ "compliance_state": self.compliance.state().as_str() });
        let mut outputs = vec![Output::Report(Report::from_text(&state.to_string()))];

        match self.preview_template(request) {
            Ok(None) => Response::accept(outputs),
            Ok(Some(preview)) => {
                outputs.push(Output::Report(Report::from_text(&preview)));
                Response::accept(outputs)
            }
            Err(err) => {
                warn!(%err, "inspect payload is not a usable voucher template");
                outputs.push(Output::Report(Report::from_text(&format!(
                    "error processing inspect request: {err}"
                ))));
                Response::reject(outputs)
            }
        }
    }

    /// Resolves a non-empty inspect payload as a voucher template.
    fn preview_template(&self, request: &InspectRequest) -> DispatchResult<Option<String>> {
        let text = hex_to_str(&request.payload)?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let voucher = VoucherTemplate::from_json(&text)?.resolve()?;
        let preview = json!({
            "destination": voucher.destination().to_string().to_lowercase(),
            "payload": voucher.payload_hex(),
        });
        Ok(Some(preview.to_string()))
    }
}

impl<B: InferenceBackend, C: OutlierClassifier> RequestHandler for Dispatcher<B, C> {
    fn handle(&mut self, request: &RollupRequest) -> Response {
        match request {
            RollupRequest::AdvanceState(advance) => match self.handle_advance(advance) {
                Ok(outputs) => Response::accept(outputs),
                Err(err) => {
                    warn!(
                        %err,
                        sender = %advance.metadata.msg_sender,
                        input_index = advance.metadata.input_index,
                        "rejecting advance request"
                    );
                    let text = format!(
                        "error processing input {} from {}: {err}",
                        advance.metadata.input_index, advance.metadata.msg_sender
                    );
                    Response::reject(vec![Output::Report(Report::from_text(&text))])
                }
            },
            RollupRequest::InspectState(inspect) => self.handle_inspect(inspect),
        }
    }
}

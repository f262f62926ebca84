//! Inspect request integration tests
//!
//! Inspect requests are read-only: they report the compliance state and can
//! preview the voucher a JSON template would produce.

#![allow(
    unused_crate_dependencies,
    reason = "test dependencies shared across test suite"
)]

use alpen_oracle_codec::{erc20_transfer_voucher, hex_encode, str_to_hex, SelectorRegistry, U256};
use alpen_oracle_engine::{CompliancePolicy, ComplianceState, FinishStatus, Output, RequestHandler};
use harness::fixtures::*;
use integration_tests::harness;
use serde_json::{json, Value};

fn report_bodies(outputs: &[Output]) -> Vec<String> {
    outputs
        .iter()
        .map(|o| match o {
            Output::Report(r) => r.text().into_owned(),
            other => panic!("inspect produced a non-report output {other:?}"),
        })
        .collect()
}

/// Verifies an empty inspect reports the current state.
#[test]
fn test_inspect_reports_state() {
    let mut d = dispatcher(CompliancePolicy::PerRequest);

    let response = d.handle(&inspect(&[]));
    assert_eq!(response.status(), FinishStatus::Accept);
    assert_eq!(
        report_bodies(response.outputs()),
        vec![r#"{"compliance_state":"NON_COMPLIANT"}"#.to_owned()]
    );

    d.handle(&advance(VERIFIER, 0, &evidence(NORMAL_TEMPERATURE, GREEN)));
    let response = d.handle(&inspect(&[]));
    assert_eq!(
        report_bodies(response.outputs()),
        vec![r#"{"compliance_state":"COMPLIANT"}"#.to_owned()]
    );
}

/// Verifies repeated inspects never move the state machine.
#[test]
fn test_inspect_is_read_only() {
    let mut d = dispatcher(CompliancePolicy::PerRequest);
    d.handle(&advance(VERIFIER, 0, &evidence(NORMAL_TEMPERATURE, GREEN)));

    for _ in 0..3 {
        d.handle(&inspect(&[]));
        d.handle(&inspect(b"{}"));
    }

    assert_eq!(d.compliance_state(), ComplianceState::Compliant);
    assert_eq!(d.dapp_address(), None);
}

/// Verifies a template naming an ABI entry resolves to the canonical voucher.
#[test]
fn test_template_preview_with_abi() {
    let mut d = dispatcher(CompliancePolicy::PerRequest);
    let template = json!({
        "address": hex_encode(TOKEN),
        "functionName": "transfer",
        "parameters": [hex_encode(DEPOSITOR), 250],
        "abi": [{
            "type": "function",
            "name": "transfer",
            "inputs": [
                { "name": "to", "type": "address" },
                { "name": "amount", "type": "uint256" }
            ],
            "outputs": [{ "name": "", "type": "bool" }],
            "stateMutability": "nonpayable"
        }]
    })
    .to_string();

    let response = d.handle(&inspect(template.as_bytes()));

    assert_eq!(response.status(), FinishStatus::Accept);
    let reports = report_bodies(response.outputs());
    assert_eq!(reports.len(), 2);
    let preview: Value = serde_json::from_str(&reports[1]).unwrap();
    let expected =
        erc20_transfer_voucher(&SelectorRegistry::new(), TOKEN, DEPOSITOR, U256::from(250))
            .unwrap();
    assert_eq!(
        preview,
        json!({
            "destination": hex_encode(TOKEN),
            "payload": expected.payload_hex(),
        })
    );
}

/// Verifies the inspect payload is hex of the UTF-8 template text.
#[test]
fn test_template_payload_is_hex_text() {
    let template = r#"{"address":"0x00000000000000000000000000000000000000aa","functionName":"withdrawEther","signature":"withdrawEther(address,uint256)","parameters":["0x00000000000000000000000000000000000000bb","5"]}"#;
    assert_eq!(
        hex_encode(template.as_bytes()),
        str_to_hex(template),
        "fixtures encode inspect payloads the same way clients do"
    );

    let mut d = dispatcher(CompliancePolicy::PerRequest);
    let response = d.handle(&inspect(template.as_bytes()));

    assert_eq!(response.status(), FinishStatus::Accept);
    let reports = report_bodies(response.outputs());
    let preview: Value = serde_json::from_str(&reports[1]).unwrap();
    let payload = preview["payload"].as_str().unwrap();
    assert!(payload.starts_with("0x522f6815"));
}

/// Verifies an unusable template rejects but still reports the state.
#[test]
fn test_bad_template_rejects() {
    let mut d = dispatcher(CompliancePolicy::PerRequest);

    let response = d.handle(&inspect(b"not json at all"));

    assert_eq!(response.status(), FinishStatus::Reject);
    let reports = report_bodies(response.outputs());
    assert_eq!(reports.len(), 2);
    assert!(reports[0].contains("NON_COMPLIANT"));
    assert!(reports[1].starts_with("error processing inspect request"));
}

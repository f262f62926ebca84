//! Deposit refund integration tests
//!
//! Portal deposits arrive as rollup-server JSON and must come back out as
//! vouchers whose posted bodies match the ABI the destination contracts expect.

#![allow(
    unused_crate_dependencies,
    reason = "test dependencies shared across test suite"
)]

use alpen_oracle_codec::{
    erc20_transfer_voucher, erc721_safe_transfer_voucher, ether_withdrawal_voucher, hex_encode,
    SelectorRegistry, U256,
};
use alpen_oracle_engine::{CompliancePolicy, FinishStatus, Output, RequestHandler, Response};
use harness::fixtures::*;
use integration_tests::harness;
use serde_json::json;

fn report_text(response: &Response) -> String {
    match response.outputs() {
        [Output::Report(r)] => r.text().into_owned(),
        other => panic!("expected a single report, got {other:?}"),
    }
}

// ============================================================================
// ERC-20
// ============================================================================

/// Verifies a successful ERC-20 deposit is sent straight back to the depositor.
#[test]
fn test_erc20_refund_voucher_body() {
    let mut d = dispatcher(CompliancePolicy::PerRequest);
    let response = d.handle(&advance(
        ERC20_PORTAL,
        0,
        &erc20_deposit(true, TOKEN, DEPOSITOR, 1_000_000),
    ));

    assert_eq!(response.status(), FinishStatus::Accept);
    let [output @ Output::Voucher(voucher)] = response.outputs() else {
        panic!("expected one voucher, got {:?}", response.outputs());
    };

    let expected =
        erc20_transfer_voucher(d.selectors(), TOKEN, DEPOSITOR, U256::from(1_000_000)).unwrap();
    assert_eq!(voucher, &expected);
    assert_eq!(output.endpoint(), "voucher");
    assert_eq!(
        output.to_json(),
        json!({
            "destination": hex_encode(TOKEN),
            "payload": expected.payload_hex(),
        })
    );
    assert!(expected.payload_hex().starts_with("0xa9059cbb"));
}

/// Verifies a deposit the portal flagged as failed produces no voucher.
#[test]
fn test_failed_erc20_deposit_is_not_refunded() {
    let mut d = dispatcher(CompliancePolicy::PerRequest);
    let response = d.handle(&advance(
        ERC20_PORTAL,
        3,
        &erc20_deposit(false, TOKEN, DEPOSITOR, 5),
    ));

    assert_eq!(response.status(), FinishStatus::Reject);
    let report = report_text(&response);
    assert!(report.contains("input 3"));
    assert!(report.contains("not transferred"));
}

/// Verifies trailing bytes after the fixed header are tolerated.
#[test]
fn test_erc20_deposit_with_exec_layer_data() {
    let mut d = dispatcher(CompliancePolicy::PerRequest);
    let mut payload = erc20_deposit(true, TOKEN, DEPOSITOR, 7);
    payload.extend_from_slice(b"extra exec-layer data");

    let response = d.handle(&advance(ERC20_PORTAL, 0, &payload));

    assert_eq!(response.status(), FinishStatus::Accept);
    assert!(matches!(response.outputs(), [Output::Voucher(_)]));
}

/// Verifies a truncated header is rejected with the expected length.
#[test]
fn test_truncated_erc20_deposit() {
    let mut d = dispatcher(CompliancePolicy::PerRequest);
    let payload = erc20_deposit(true, TOKEN, DEPOSITOR, 7);

    let response = d.handle(&advance(ERC20_PORTAL, 0, &payload[..60]));

    assert_eq!(response.status(), FinishStatus::Reject);
    let report = report_text(&response);
    assert!(report.contains("erc20"));
    assert!(report.contains("73"));
}

// ============================================================================
// Ether and ERC-721
// ============================================================================

/// Verifies Ether and ERC-721 refunds wait for the relayed dapp address.
#[test]
fn test_refunds_after_relay() {
    let mut d = dispatcher(CompliancePolicy::PerRequest);

    let early = d.handle(&advance(ETHER_PORTAL, 0, &ether_deposit(DEPOSITOR, 9)));
    assert_eq!(early.status(), FinishStatus::Reject);
    assert!(report_text(&early).contains("dapp address unknown"));

    let relay = d.handle(&advance(RELAY, 1, DAPP.as_slice()));
    assert_eq!(relay.status(), FinishStatus::Accept);
    let [Output::Notice(notice)] = relay.outputs() else {
        panic!("expected relay notice, got {:?}", relay.outputs());
    };
    let body: serde_json::Value = serde_json::from_str(&notice.text()).unwrap();
    assert_eq!(body, json!({ "dapp_address": hex_encode(DAPP) }));

    let ether = d.handle(&advance(ETHER_PORTAL, 2, &ether_deposit(DEPOSITOR, 9)));
    assert_eq!(ether.status(), FinishStatus::Accept);
    let [Output::Voucher(voucher)] = ether.outputs() else {
        panic!("expected ether voucher, got {:?}", ether.outputs());
    };
    assert_eq!(
        voucher,
        &ether_withdrawal_voucher(d.selectors(), DAPP, DEPOSITOR, U256::from(9)).unwrap()
    );
    assert_eq!(voucher.destination(), DAPP);

    let nft = d.handle(&advance(ERC721_PORTAL, 3, &erc721_deposit(TOKEN, DEPOSITOR, 77)));
    assert_eq!(nft.status(), FinishStatus::Accept);
    let [Output::Voucher(voucher)] = nft.outputs() else {
        panic!("expected erc721 voucher, got {:?}", nft.outputs());
    };
    assert_eq!(
        voucher,
        &erc721_safe_transfer_voucher(d.selectors(), TOKEN, DAPP, DEPOSITOR, U256::from(77))
            .unwrap()
    );
    assert_eq!(voucher.selector(), SelectorRegistry::new().erc721_safe_transfer());
}

/// Verifies deposits never touch the compliance state.
#[test]
fn test_deposits_do_not_change_compliance() {
    let mut d = dispatcher(CompliancePolicy::PerRequest);
    let before = d.compliance_state();

    d.handle(&advance(ERC20_PORTAL, 0, &erc20_deposit(true, TOKEN, DEPOSITOR, 1)));
    d.handle(&advance(ERC20_PORTAL, 1, &erc20_deposit(false, TOKEN, DEPOSITOR, 1)));

    assert_eq!(d.compliance_state(), before);
}

/// Verifies portal payloads from an unknown sender are refused.
#[test]
fn test_deposit_from_unknown_sender() {
    let mut d = dispatcher(CompliancePolicy::PerRequest);
    let response = d.handle(&advance(
        STRANGER,
        0,
        &erc20_deposit(true, TOKEN, DEPOSITOR, 1),
    ));

    assert_eq!(response.status(), FinishStatus::Reject);
    assert!(report_text(&response).contains("unrecognized sender"));
}

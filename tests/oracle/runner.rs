//! Runner integration tests
//!
//! Replays a session of rollup-server replies through the runner and a real
//! dispatcher, checking what is posted and which status each `finish` carries.

#![allow(
    unused_crate_dependencies,
    reason = "test dependencies shared across test suite"
)]

use alpen_oracle_codec::{hex_encode, hex_to_str};
use alpen_oracle_engine::{
    CompliancePolicy, ComplianceState, FinishStatus, RollupRunner, StepOutcome, TransportError,
};
use harness::{
    fixtures::*,
    transport::{fast_backoff, ScriptedTransport},
};
use integration_tests::harness;
use serde_json::json;

/// Verifies each `finish` carries the status of the request before it.
#[test]
fn test_session_statuses_and_posts() {
    let transport = ScriptedTransport::with_requests([
        advance(RELAY, 0, DAPP.as_slice()),
        advance(ETHER_PORTAL, 1, &ether_deposit(DEPOSITOR, 3)),
        advance(STRANGER, 2, b"hi"),
        advance(VERIFIER, 3, &evidence(NORMAL_TEMPERATURE, GREEN)),
        inspect(&[]),
    ]);
    let mut runner = RollupRunner::new(transport, dispatcher(CompliancePolicy::PerRequest))
        .with_backoff(fast_backoff());

    let outcomes: Vec<_> = (0..6).map(|_| runner.step().unwrap()).collect();

    assert_eq!(
        outcomes,
        vec![
            StepOutcome::Processed(FinishStatus::Accept),
            StepOutcome::Processed(FinishStatus::Accept),
            StepOutcome::Processed(FinishStatus::Reject),
            StepOutcome::Processed(FinishStatus::Accept),
            StepOutcome::Processed(FinishStatus::Accept),
            StepOutcome::Idle,
        ]
    );

    let (transport, dispatcher) = runner.into_parts();
    assert_eq!(
        transport.finishes(),
        &[
            FinishStatus::Accept,
            FinishStatus::Accept,
            FinishStatus::Accept,
            FinishStatus::Reject,
            FinishStatus::Accept,
            FinishStatus::Accept,
        ]
    );

    let endpoints: Vec<_> = transport.posted().iter().map(|(e, _)| *e).collect();
    assert_eq!(
        endpoints,
        vec!["notice", "voucher", "report", "voucher", "notice", "report"]
    );

    let vouchers = transport.posted_to("voucher");
    assert_eq!(vouchers[0]["destination"], json!(hex_encode(DAPP)));
    assert_eq!(vouchers[1]["destination"], json!(hex_encode(REWARD_CONTRACT)));
    assert_eq!(dispatcher.compliance_state(), ComplianceState::Compliant);
}

/// Verifies a failed post is skipped and the request still completes.
#[test]
fn test_post_failure_does_not_block_finish() {
    let mut transport = ScriptedTransport::with_requests([advance(
        ERC20_PORTAL,
        0,
        &erc20_deposit(true, TOKEN, DEPOSITOR, 1),
    )]);
    transport.fail_next_posts(1);
    let mut runner = RollupRunner::new(transport, dispatcher(CompliancePolicy::PerRequest));

    assert_eq!(
        runner.step().unwrap(),
        StepOutcome::Processed(FinishStatus::Accept)
    );
    assert_eq!(runner.status(), FinishStatus::Accept);
    assert!(runner.transport().posted().is_empty());
}

/// Verifies transport failures are retried and the session then continues.
#[test]
fn test_run_while_recovers_from_finish_failures() {
    let mut transport = ScriptedTransport::new();
    transport.push_failure(TransportError::Http("connection reset".to_owned()));
    transport.push_failure(TransportError::UnexpectedStatus(503));
    transport.push_request(advance(VERIFIER, 0, &evidence(NORMAL_TEMPERATURE, GREY)));
    transport.push_idle();
    transport.push_request(inspect(&[]));

    let mut runner = RollupRunner::new(transport, dispatcher(CompliancePolicy::PerRequest))
        .with_backoff(fast_backoff());

    let mut budget = 5;
    runner.run_while(|| {
        budget -= 1;
        budget >= 0
    });

    let (transport, dispatcher) = runner.into_parts();
    assert_eq!(transport.remaining(), 0);
    assert_eq!(
        transport.finishes(),
        &[
            FinishStatus::Accept,
            FinishStatus::Accept,
            FinishStatus::Accept,
            FinishStatus::Reject,
            FinishStatus::Reject,
        ]
    );
    let reports = transport.posted_to("report");
    assert_eq!(reports.len(), 2);
    assert_eq!(
        reports[1]["payload"],
        json!(hex_encode(r#"{"compliance_state":"NON_COMPLIANT"}"#))
    );
    assert_eq!(dispatcher.compliance_state(), ComplianceState::NonCompliant);
}

/// Verifies an unparsable request is answered with a report and the next
/// `finish` carries `reject`.
#[test]
fn test_malformed_request_is_rejected() {
    let mut transport = ScriptedTransport::new();
    transport.push_request(inspect(&[]));
    transport.push_failure(TransportError::MalformedRequest(
        "unknown variant `bogus`".to_owned(),
    ));
    let mut runner = RollupRunner::new(transport, dispatcher(CompliancePolicy::PerRequest))
        .with_backoff(fast_backoff());

    let outcomes: Vec<_> = (0..3).map(|_| runner.step().unwrap()).collect();

    assert_eq!(
        outcomes,
        vec![
            StepOutcome::Processed(FinishStatus::Accept),
            StepOutcome::Processed(FinishStatus::Reject),
            StepOutcome::Idle,
        ]
    );
    let (transport, _) = runner.into_parts();
    assert_eq!(
        transport.finishes(),
        &[
            FinishStatus::Accept,
            FinishStatus::Accept,
            FinishStatus::Reject,
        ]
    );
    let reports = transport.posted_to("report");
    assert_eq!(reports.len(), 2);
    let text = hex_to_str(reports[1]["payload"].as_str().unwrap()).unwrap();
    assert!(text.contains("malformed rollup request: unknown variant `bogus`"));
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! End-to-end behaviour of the dealer and banker chaincodes against the
//! in-memory ledger, with callers identified by their X.509 certificates.

use std::sync::Arc;

use loan_chaincode::chaincode::{BankerChaincode, Chaincode, DealerChaincode, Response};
use loan_chaincode::identity::X509IdentityResolver;
use loan_chaincode::ledger::MockStub;
use loan_chaincode::records::LoanRecord;
use serde_json::Value;
use tracing::Span;

const DMV_PEM: &str = include_str!("fixtures/dmv.pem");
const BANKER_PEM: &str = include_str!("fixtures/banker.pem");
const DEALER_PEM: &str = include_str!("fixtures/dealer.pem");
const INSURER_PEM: &str = include_str!("fixtures/insurer.pem");

const VIN: &str = "1HGCM82633A004352";
const SSN: &str = "123-45-6789";

/// Creator bytes as the platform delivers them: MSP id framing, then the PEM.
fn creator(msp_id: &str, pem: &str) -> Vec<u8> {
    let mut bytes = vec![0x0a, msp_id.len() as u8];
    bytes.extend_from_slice(msp_id.as_bytes());
    bytes.extend_from_slice(&[0x12, 0x80, 0x05]);
    bytes.extend_from_slice(pem.as_bytes());
    bytes
}

fn banker() -> BankerChaincode {
    BankerChaincode::new(Arc::new(X509IdentityResolver::new()), Span::none())
}

fn dealer() -> DealerChaincode {
    DealerChaincode::new(Arc::new(X509IdentityResolver::new()), Span::none())
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn as_dmv(stub: &mut MockStub) {
    stub.set_creator(creator("DMVMSP", DMV_PEM));
}

fn as_banker(stub: &mut MockStub) {
    stub.set_creator(creator("BankerMSP", BANKER_PEM));
}

fn submit_loan(stub: &mut MockStub) -> Response {
    as_dmv(stub);
    banker().invoke(
        stub,
        "loan",
        &args(&["L-100", VIN, "18000", "60", "4", "330"]),
    )
}

#[test]
fn dmv_submission_is_readable_by_dmv_and_banker() {
    let mut stub = MockStub::new();
    assert_eq!(submit_loan(&mut stub), Response::success(Vec::new()));

    as_dmv(&mut stub);
    let by_dmv = banker().invoke(&mut stub, "query", &args(&[VIN]));
    assert_eq!(by_dmv.status, 200);

    let loan: LoanRecord = serde_json::from_slice(&by_dmv.payload).unwrap();
    assert_eq!(loan.loan_id, "L-100");
    assert_eq!(loan.ssn, SSN);
    assert_eq!(loan.amount, 18000);
    assert_eq!(loan.loan_period, 60);
    assert_eq!(loan.apr, 4);
    assert_eq!(loan.monthly_payment, 330);
    assert_eq!(loan.status, "Applied");
    assert_eq!(loan.org, "dmv");

    as_banker(&mut stub);
    let by_banker = banker().invoke(&mut stub, "query", &args(&[SSN, VIN]));
    assert_eq!(by_banker.payload, by_dmv.payload);
}

#[test]
fn banker_status_update_preserves_other_fields() {
    let mut stub = MockStub::new();
    submit_loan(&mut stub);
    let key = format!("{SSN}@{VIN}");
    let before: LoanRecord = serde_json::from_slice(stub.state(&key).unwrap()).unwrap();

    as_banker(&mut stub);
    let response = banker().invoke(&mut stub, "loan", &args(&[SSN, VIN, "Approved"]));
    assert!(response.is_success());

    let after: LoanRecord = serde_json::from_slice(stub.state(&key).unwrap()).unwrap();
    assert_eq!(after.status, "Approved");
    assert_eq!(after, before.with_status("Approved"));
}

#[test]
fn loan_arity_is_checked_per_organization() {
    let mut stub = MockStub::new();

    as_dmv(&mut stub);
    for count in [0, 3, 5, 7] {
        let values: Vec<String> = (0..count).map(|i| i.to_string()).collect();
        let response = banker().invoke(&mut stub, "loan", &values);
        assert_eq!(response.status, 403, "dmv with {count} arguments");
    }

    as_banker(&mut stub);
    for count in [0, 2, 4, 6] {
        let values: Vec<String> = (0..count).map(|i| i.to_string()).collect();
        let response = banker().invoke(&mut stub, "loan", &values);
        assert_eq!(response.status, 403, "banker with {count} arguments");
    }

    assert_eq!(stub.put_count(), 0);
}

#[test]
fn non_integer_amount_is_an_argument_error() {
    let mut stub = MockStub::new();
    as_dmv(&mut stub);

    let response = banker().invoke(
        &mut stub,
        "loan",
        &args(&["L-1", VIN, "lots", "60", "4", "330"]),
    );
    assert_eq!(response.status, 500);
    assert!(response.message.contains("amount"));
    assert_eq!(stub.put_count(), 0);
}

#[test]
fn banker_update_of_missing_application_writes_nothing() {
    let mut stub = MockStub::new();
    as_banker(&mut stub);

    let response = banker().invoke(&mut stub, "loan", &args(&[SSN, VIN, "Approved"]));
    assert_eq!(response.status, 500);
    assert!(!response.message.is_empty());
    assert_eq!(stub.put_count(), 0);
}

#[test]
fn loan_from_other_organization_is_forbidden() {
    let mut stub = MockStub::new();
    stub.set_creator(creator("InsurerMSP", INSURER_PEM));

    let response = banker().invoke(&mut stub, "loan", &args(&[SSN, VIN, "Approved"]));
    assert_eq!(response.status, 403);
    assert_eq!(stub.put_count(), 0);
}

#[test]
fn health_probe_needs_no_identity() {
    let mut stub = MockStub::new();

    assert_eq!(
        banker().invoke(&mut stub, "query", &args(&["health"])),
        Response::success(Vec::new())
    );
    assert_eq!(
        dealer().invoke(&mut stub, "query", &args(&["health"])),
        Response::success(Vec::new())
    );
}

#[test]
fn identity_failure_precedes_state_access() {
    let mut stub = MockStub::new();
    stub.set_creator(b"no certificate here".to_vec());
    stub.seed(format!("{SSN}@{VIN}"), "{}");

    let response = banker().invoke(&mut stub, "query", &args(&[VIN]));
    assert_eq!(response.status, 500);
    assert!(response.payload.is_empty());
}

#[test]
fn negotiation_is_stored_under_caller_and_vin() {
    let mut stub = MockStub::new();
    stub.set_creator(creator("DealerMSP", DEALER_PEM));

    let response = dealer().invoke(&mut stub, "negotiate", &args(&[VIN, "18000"]));
    assert!(response.is_success());

    let stored = stub.state(&format!("{SSN}@{VIN}")).unwrap();
    assert_eq!(
        stored,
        br#"{"ssn":"123-45-6789","vin":"1HGCM82633A004352","price":18000,"org":"dealer"}"#
    );
}

#[test]
fn price_query_returns_matching_negotiations_in_order() {
    let mut stub = MockStub::new();
    stub.set_creator(creator("DealerMSP", DEALER_PEM));

    for (vin, price) in [("VIN-1", "100"), ("VIN-2", "200"), ("VIN-3", "100")] {
        let response = dealer().invoke(&mut stub, "negotiate", &args(&[vin, price]));
        assert!(response.is_success());
    }

    let response = dealer().invoke(&mut stub, "qryNegotiate", &args(&["100"]));
    assert!(response.is_success());

    let results: Value = serde_json::from_slice(&response.payload).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["Key"], format!("{SSN}@VIN-1"));
    assert_eq!(results[1]["Key"], format!("{SSN}@VIN-3"));
    assert_eq!(results[0]["Record"]["price"], 100);
    assert_eq!(stub.open_cursors(), 0);

    let response = dealer().invoke(&mut stub, "qryNegotiate", &args(&["300"]));
    assert_eq!(response.payload, b"[]".to_vec());
}

#[test]
fn unknown_function_is_rejected() {
    let mut stub = MockStub::new();
    as_dmv(&mut stub);

    let (banker, dealer) = (banker(), dealer());
    let chaincodes: [&dyn Chaincode; 2] = [&banker, &dealer];
    for chaincode in chaincodes {
        let response = chaincode.invoke(&mut stub, "delete", &args(&[VIN]));
        assert_eq!(response.status, 403);
        assert_eq!(response.message, "unknown function name");
    }
}

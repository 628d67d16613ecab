//! # Driver Tests

use dutcheck_core::HarnessError;
use dutcheck_core::driver::Driver;
use dutcheck_core::dut::RequestPins;
use dutcheck_core::transaction::{Transaction, TxnId};
use pretty_assertions::assert_eq;

fn txn(id: u64, valid: bool, data: u32) -> Transaction {
    Transaction::new(TxnId(id), valid, data)
}

#[test]
fn presents_in_order_one_per_tick() {
    let mut driver = Driver::new();
    driver.drive([txn(0, true, 0xA), txn(1, true, 0xB)]);
    driver.drive([txn(2, true, 0xC)]);
    assert_eq!(driver.pending(), 3);

    let mut seen = Vec::new();
    while !driver.is_exhausted() {
        let issue = driver.drive_tick().unwrap();
        seen.push(issue.pins.request_data);
        driver.acknowledge();
    }
    assert_eq!(seen, vec![0xA, 0xB, 0xC]);
    assert_eq!(driver.driven(), 3);
    assert_eq!(driver.idle_ticks(), 0);
}

#[test]
fn invalid_transaction_drives_deasserted_strobe() {
    let mut driver = Driver::new();
    driver.drive([txn(0, false, 0x55)]);
    let issue = driver.drive_tick().unwrap();
    assert_eq!(
        issue.pins,
        RequestPins {
            request_valid: false,
            request_data: 0x55,
        }
    );
    assert_eq!(issue.transaction, Some(txn(0, false, 0x55)));
}

#[test]
fn second_present_before_sample_is_violation() {
    let mut driver = Driver::new();
    driver.drive([txn(0, true, 1), txn(1, true, 2)]);
    let _ = driver.drive_tick().unwrap();
    let err = driver.drive_tick().unwrap_err();
    assert!(matches!(err, HarnessError::ProtocolViolation(_)));
    assert!(err.is_contract_violation());
    assert_eq!(driver.pending(), 1);
}

#[test]
fn idle_after_exhaustion() {
    let mut driver = Driver::new();
    driver.drive([txn(0, true, 1)]);
    let _ = driver.drive_tick().unwrap();
    driver.acknowledge();
    for _ in 0..3 {
        let issue = driver.drive_tick().unwrap();
        assert_eq!(issue.pins, RequestPins::IDLE);
        assert!(issue.transaction.is_none());
    }
    assert_eq!(driver.idle_ticks(), 3);
    assert_eq!(driver.driven(), 1);
}

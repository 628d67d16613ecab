//! # Monitor Tests

use std::sync::{Arc, Mutex};

use dutcheck_core::dut::ResponsePins;
use dutcheck_core::monitor::Monitor;
use dutcheck_core::transaction::Transaction;
use pretty_assertions::assert_eq;

fn recorder(monitor: &mut Monitor) -> Arc<Mutex<Vec<Transaction>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    monitor.subscribe(move |t| sink.lock().unwrap().push(t.clone()));
    log
}

#[test]
fn observations_are_stamped_and_numbered() {
    let mut monitor = Monitor::new();
    let log = recorder(&mut monitor);

    let pins = [
        ResponsePins::IDLE,
        ResponsePins::valid(0x10),
        ResponsePins::IDLE,
        ResponsePins::valid(0x20),
    ];
    for (now, pins) in pins.into_iter().enumerate() {
        let _ = monitor.sample(pins, now as u64).unwrap();
    }

    let log = log.lock().unwrap();
    let seen: Vec<_> = log
        .iter()
        .map(|t| (t.id().0, t.response_data(), t.response_observed_at()))
        .collect();
    assert_eq!(seen, vec![(0, Some(0x10), Some(1)), (1, Some(0x20), Some(3))]);
    assert!(log.iter().all(Transaction::is_observed));
    assert!(log.iter().all(|t| !t.request_valid()));
    assert_eq!(monitor.observed(), 2);
}

#[test]
fn every_subscriber_sees_every_observation() {
    let mut monitor = Monitor::new();
    let a = recorder(&mut monitor);
    let b = recorder(&mut monitor);
    for now in 0..5 {
        let _ = monitor.sample(ResponsePins::valid(now as u32), now).unwrap();
    }
    assert_eq!(a.lock().unwrap().len(), 5);
    assert_eq!(*a.lock().unwrap(), *b.lock().unwrap());
}

#[test]
fn late_subscriber_misses_earlier_observations() {
    let mut monitor = Monitor::new();
    let _ = monitor.sample(ResponsePins::valid(1), 0).unwrap();
    let log = recorder(&mut monitor);
    let _ = monitor.sample(ResponsePins::valid(2), 1).unwrap();
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].response_data(), Some(2));
}

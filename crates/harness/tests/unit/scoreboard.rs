//! # Scoreboard Tests
//!
//! Pairing, findings, lifecycle and concurrent use of the two input streams.

use std::sync::Arc;
use std::thread;

use dutcheck_core::config::{ModelKind, ScoreboardConfig};
use dutcheck_core::scoreboard::{
    CircularBuffer, CloseCause, MismatchReason, Phase, Scoreboard, Verdict,
};
use dutcheck_core::transaction::{Tick, Transaction, TxnId};
use dutcheck_core::HarnessError;
use pretty_assertions::assert_eq;

fn untimed(model: ModelKind) -> ScoreboardConfig {
    ScoreboardConfig {
        model,
        enforce_response_deadline: false,
        ..ScoreboardConfig::default()
    }
}

fn req(id: u64, data: u32) -> Transaction {
    Transaction::new(TxnId(id), true, data)
}

fn rsp(id: u64, data: u32, at: Tick) -> Transaction {
    let mut t = Transaction::new(TxnId(id), false, 0);
    t.fill_response(data, at).unwrap();
    t
}

#[test]
fn corrupted_response_is_data_mismatch() {
    let sb = Scoreboard::new(&untimed(ModelKind::IdentityEcho));
    sb.on_expected(req(0, 0x10)).unwrap();
    sb.on_observed(rsp(0, 0x11, 1)).unwrap();

    let summary = sb.summary();
    assert_eq!(summary.verdict(), Verdict::Fail);
    assert_eq!(summary.records.len(), 1);
    let record = &summary.records[0];
    assert_eq!(record.reason, MismatchReason::DataMismatch);
    assert_eq!(record.expected_response, Some(0x10));
    assert_eq!(record.expected.as_ref().map(Transaction::request_data), Some(0x10));
    assert_eq!(record.actual.as_ref().and_then(Transaction::response_data), Some(0x11));
    assert_eq!(record.at, 1);
}

#[test]
fn reordered_responses_are_never_repaired() {
    let sb = Scoreboard::new(&untimed(ModelKind::IdentityEcho));
    sb.on_expected(req(0, 0x10)).unwrap();
    sb.on_expected(req(1, 0x20)).unwrap();
    sb.on_observed(rsp(0, 0x20, 1)).unwrap();
    sb.on_observed(rsp(1, 0x10, 2)).unwrap();

    let summary = sb.summary();
    assert_eq!(summary.matched, 0);
    assert_eq!(summary.count(MismatchReason::DataMismatch), 2);
}

#[test]
fn response_with_nothing_expected_is_unexpected() {
    let sb = Scoreboard::new(&ScoreboardConfig::default());
    sb.on_expected(Transaction::new(TxnId(0), false, 0)).unwrap();
    sb.on_observed(rsp(0, 0xDEAD_BEEF, 1)).unwrap();

    let summary = sb.summary();
    assert_eq!(summary.count(MismatchReason::UnexpectedResponse), 1);
    assert_eq!(summary.records[0].expected, None);
    assert_eq!(summary.records[0].expected_response, None);
}

#[test]
fn drain_timeout_retires_pending_as_missing() {
    let sb = Scoreboard::new(&untimed(ModelKind::IdentityEcho));
    sb.on_expected(req(0, 0x10)).unwrap();
    sb.on_expected(req(1, 0x20)).unwrap();
    sb.on_observed(rsp(0, 0x10, 1)).unwrap();
    sb.begin_drain(1).unwrap();

    for now in 2..=5 {
        assert_eq!(sb.advance(now), Phase::Draining { deadline: 5 });
    }
    assert_eq!(sb.advance(6), Phase::Closed(CloseCause::TimedOut));

    let summary = sb.summary();
    assert_eq!(summary.matched, 1);
    assert_eq!(summary.pending, 0);
    assert_eq!(summary.count(MismatchReason::MissingResponse), 1);
    assert_eq!(summary.records[0].expected.as_ref().map(Transaction::id), Some(TxnId(1)));
}

#[test]
fn explicit_drain_timeout_is_honoured() {
    let config = ScoreboardConfig {
        drain_timeout_ticks: Some(1),
        ..untimed(ModelKind::IdentityEcho)
    };
    let sb = Scoreboard::new(&config);
    sb.on_expected(req(0, 1)).unwrap();
    sb.begin_drain(10).unwrap();
    assert_eq!(sb.advance(11), Phase::Draining { deadline: 11 });
    assert_eq!(sb.advance(12), Phase::Closed(CloseCause::TimedOut));
}

#[test]
fn response_on_drain_deadline_still_matches() {
    let config = ScoreboardConfig {
        drain_timeout_ticks: Some(1),
        ..untimed(ModelKind::IdentityEcho)
    };
    let sb = Scoreboard::new(&config);
    sb.on_expected(req(0, 9)).unwrap();
    sb.begin_drain(10).unwrap();
    assert_eq!(sb.advance(11), Phase::Draining { deadline: 11 });
    sb.on_observed(rsp(0, 9, 11)).unwrap();
    assert_eq!(sb.advance(12), Phase::Closed(CloseCause::Drained));
    assert_eq!(sb.verdict(), Verdict::Pass);
}

#[test]
fn expected_while_draining_is_violation() {
    let sb = Scoreboard::new(&ScoreboardConfig::default());
    sb.begin_drain(0).unwrap();
    sb.begin_drain(1).unwrap();
    let err = sb.on_expected(req(0, 1)).unwrap_err();
    assert!(matches!(err, HarnessError::ProtocolViolation(_)));
    assert!(matches!(sb.take_fatal(), Some(HarnessError::ProtocolViolation(_))));
}

#[test]
fn close_and_abort_turn_pending_into_missing() {
    for (cause, shut) in [
        (CloseCause::EndOfTest, Scoreboard::close as fn(&Scoreboard, Tick) -> Phase),
        (CloseCause::Aborted, Scoreboard::abort),
    ] {
        let sb = Scoreboard::new(&untimed(ModelKind::IdentityEcho));
        sb.on_expected(req(0, 1)).unwrap();
        sb.on_expected(req(1, 2)).unwrap();
        assert_eq!(shut(&sb, 7), Phase::Closed(cause));
        let summary = sb.summary();
        assert_eq!(summary.count(MismatchReason::MissingResponse), 2);
        assert!(summary.records.iter().all(|r| r.at == 7));
        // Closing again keeps the first cause.
        assert_eq!(sb.abort(8), Phase::Closed(cause));
    }
}

#[test]
fn circular_model_sees_overwritten_slot() {
    // Three requests outstanding against two slots: the first slot is
    // overwritten before its response is paired, as it is in the device.
    let config = untimed(ModelKind::CircularBuffer { depth: 2 });
    let sb = Scoreboard::new(&config);
    sb.on_expected(req(0, 0xA)).unwrap();
    sb.on_expected(req(1, 0xB)).unwrap();
    sb.on_expected(req(2, 0xC)).unwrap();
    sb.on_observed(rsp(0, 0xC, 3)).unwrap();
    sb.on_observed(rsp(1, 0xB, 4)).unwrap();
    sb.on_observed(rsp(2, 0xC, 5)).unwrap();
    assert_eq!(sb.verdict(), Verdict::Pass);
}

#[test]
fn caller_supplied_model() {
    let sb = Scoreboard::with_model(
        &untimed(ModelKind::IdentityEcho),
        Box::new(CircularBuffer::new(4)),
    );
    assert_eq!(sb.summary().model, "circular-buffer");
}

#[test]
fn late_response_within_tolerance_matches() {
    let config = ScoreboardConfig {
        latency_tolerance_ticks: 2,
        ..ScoreboardConfig::default()
    };
    let sb = Scoreboard::new(&config);
    let _ = sb.advance(0);
    sb.on_expected(req(0, 5)).unwrap();
    for now in 1..=3 {
        assert_eq!(sb.advance(now), Phase::Running);
    }
    sb.on_observed(rsp(0, 5, 3)).unwrap();
    assert_eq!(sb.verdict(), Verdict::Pass);
}

#[test]
fn concurrent_streams_keep_fifo_order() {
    const N: u64 = 500;
    let sb = Arc::new(Scoreboard::new(&untimed(ModelKind::IdentityEcho)));

    thread::scope(|scope| {
        let expected = Arc::clone(&sb);
        let _ = scope.spawn(move || {
            for id in 0..N {
                expected.on_expected(req(id, id as u32 * 3)).unwrap();
            }
        });
        let observed = Arc::clone(&sb);
        let _ = scope.spawn(move || {
            for id in 0..N {
                while observed.summary().expected <= id {
                    thread::yield_now();
                }
                observed.on_observed(rsp(id, id as u32 * 3, id + 1)).unwrap();
            }
        });
    });

    let summary = sb.summary();
    assert_eq!(summary.matched, N);
    assert_eq!(summary.observed, N);
    assert_eq!(summary.pending, 0);
    assert!(summary.records.is_empty());
}

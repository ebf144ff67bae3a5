/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! End-to-end flows through the session state machine.

use fixp_core::document::Document;
use fixp_core::error::SessionError;
use fixp_core::types::{OrdType, Side, TimeInForce, Timestamp};
use fixp_message::application::OrderParams;
use fixp_session::{
    Command, Outbox, Session, SessionConfig, SessionConfigBuilder, SessionState, TaskRunner,
    TimerKind, Worker,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const NEGOTIATION_RESPONSE: &str = r#"{"MessageType":"NegotiationResponse","SessionId":"x"}"#;
const ESTABLISHMENT_ACK: &str = r#"{"MessageType":"EstablishmentAck","KeepaliveInterval":30000}"#;
const ESTABLISHMENT_REJECT: &str = r#"{"MessageType":"EstablishmentReject","Reason":"bad token"}"#;
const EXECUTION_REPORT: &str = r#"{"MsgType":"ExecutionReport","ClOrdID":"1-0","OrdStatus":"Filled"}"#;
const HEARTBEAT: &str = r#"{"MessageType":"UnsequencedHeartbeat"}"#;

#[derive(Debug, Default)]
struct Counters {
    stops: AtomicUsize,
    joins: AtomicUsize,
}

struct MockWorker {
    counters: Arc<Counters>,
    finishes: bool,
}

impl Worker for MockWorker {
    fn request_stop(&self) {
        self.counters.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn join_timeout(&mut self, _timeout: Duration) -> bool {
        self.counters.joins.fetch_add(1, Ordering::SeqCst);
        self.finishes
    }
}

fn order() -> OrderParams {
    OrderParams::new(
        "1",
        "CS.D.AEURGBP.CZD.IP",
        Side::Buy,
        Decimal::ONE,
        OrdType::Market,
        "GBP",
        TimeInForce::ImmediateOrCancel,
    )
}

fn session_with_worker(finishes: bool) -> (Session, Arc<Counters>) {
    let config = SessionConfigBuilder::new()
        .user_name("trader")
        .password("secret")
        .heartbeat_interval_secs(3)
        .order(order())
        .build()
        .unwrap();
    let counters = Arc::new(Counters::default());
    let mut session = Session::new(config);
    session.attach_worker(Box::new(MockWorker {
        counters: Arc::clone(&counters),
        finishes,
    }));
    (session, counters)
}

fn sent_kinds(io: &Outbox) -> Vec<String> {
    io.sent()
        .map(|frame| Document::from_json(frame).unwrap())
        .map(|doc| doc.kind().unwrap().to_string())
        .collect()
}

fn establish(session: &mut Session, io: &mut Outbox) {
    session.on_open(io);
    session.on_text(NEGOTIATION_RESPONSE, io);
    session.on_text(ESTABLISHMENT_ACK, io);
}

#[test]
fn test_handshake_produces_one_order_and_one_heartbeat_timer() {
    let (mut session, _) = session_with_worker(true);
    let mut io = Outbox::new();

    assert_eq!(session.state(), SessionState::Connecting);
    session.on_open(&mut io);
    assert_eq!(session.state(), SessionState::Negotiating);
    session.on_text(NEGOTIATION_RESPONSE, &mut io);
    assert_eq!(session.state(), SessionState::Negotiating);
    session.on_text(ESTABLISHMENT_ACK, &mut io);
    assert_eq!(session.state(), SessionState::Established);

    assert_eq!(sent_kinds(&io), vec!["Negotiate", "Establish", "NewOrderSingle"]);
    assert_eq!(io.scheduled_count(TimerKind::Heartbeat), 1);
    assert_eq!(io.scheduled_count(TimerKind::Shutdown), 0);

    let order = Document::from_json(io.sent().last().unwrap()).unwrap();
    assert_eq!(order.get_str("Account"), Some("1"));
    assert_eq!(order.get_str("SecurityID"), Some("CS.D.AEURGBP.CZD.IP"));
    assert!(order.get_str("ClOrdID").unwrap().starts_with("1-"));
    assert!(!order.contains("Price"));
}

#[test]
fn test_repeated_ack_does_not_resubmit() {
    let (mut session, _) = session_with_worker(true);
    let mut io = Outbox::new();
    establish(&mut session, &mut io);
    session.on_text(ESTABLISHMENT_ACK, &mut io);

    assert_eq!(session.orders_submitted(), 1);
    assert_eq!(io.scheduled_count(TimerKind::Heartbeat), 1);
}

#[test]
fn test_reject_runs_shutdown_once() {
    let (mut session, counters) = session_with_worker(true);
    let mut io = Outbox::new();
    session.on_open(&mut io);
    session.on_text(NEGOTIATION_RESPONSE, &mut io);
    session.on_text(ESTABLISHMENT_REJECT, &mut io);

    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(io.close_count(), 1);
    assert_eq!(counters.stops.load(Ordering::SeqCst), 1);
    assert_eq!(counters.joins.load(Ordering::SeqCst), 1);
    assert!(!session.has_worker());

    session.on_text(ESTABLISHMENT_REJECT, &mut io);
    assert!(!session.shutdown(&mut io));

    assert_eq!(io.close_count(), 1);
    assert_eq!(counters.stops.load(Ordering::SeqCst), 1);
    assert_eq!(session.orders_submitted(), 0);
}

#[test]
fn test_reject_records_counterparty_reason() {
    let (mut session, _) = session_with_worker(true);
    let mut io = Outbox::new();
    session.on_open(&mut io);
    assert!(session.rejection().is_none());

    session.on_text(ESTABLISHMENT_REJECT, &mut io);
    assert_eq!(
        session.rejection(),
        Some(&SessionError::EstablishmentRejected {
            reason: "bad token".to_string()
        })
    );
    assert_eq!(
        session.rejection().map(ToString::to_string).as_deref(),
        Some("establishment rejected: bad token")
    );
}

#[test]
fn test_reject_without_reason_is_unspecified() {
    let (mut session, _) = session_with_worker(true);
    let mut io = Outbox::new();
    session.on_open(&mut io);
    session.on_text(r#"{"MessageType":"NegotiationReject"}"#, &mut io);

    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(
        session.rejection(),
        Some(&SessionError::EstablishmentRejected {
            reason: "unspecified".to_string()
        })
    );
}

#[test]
fn test_established_session_has_no_rejection() {
    let (mut session, _) = session_with_worker(true);
    let mut io = Outbox::new();
    establish(&mut session, &mut io);
    session.shutdown(&mut io);
    assert!(session.rejection().is_none());
}

#[test]
fn test_shutdown_from_timer_and_reject_closes_once() {
    let (mut session, counters) = session_with_worker(true);
    let mut io = Outbox::new();
    session.on_open(&mut io);
    session.on_text(ESTABLISHMENT_REJECT, &mut io);
    session.on_timer(TimerKind::Shutdown, &mut io);
    session.on_close("closed by peer");

    assert_eq!(io.close_count(), 1);
    assert_eq!(counters.stops.load(Ordering::SeqCst), 1);
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn test_document_without_type_is_ignored() {
    let (mut session, _) = session_with_worker(true);
    let mut io = Outbox::new();
    session.on_open(&mut io);
    io.drain();

    let discriminator = session.on_text(r#"{"SessionId":"abc","Timestamp":1}"#, &mut io);
    assert!(discriminator.is_none());
    assert!(io.is_empty());
    assert_eq!(session.state(), SessionState::Negotiating);
}

#[test]
fn test_unknown_type_is_ignored() {
    let (mut session, _) = session_with_worker(true);
    let mut io = Outbox::new();
    session.on_open(&mut io);
    io.drain();

    let discriminator = session.on_text(r#"{"MessageType":"Sequence"}"#, &mut io);
    assert!(discriminator.unwrap().kind.is_other());
    assert!(io.is_empty());
}

#[test]
fn test_heartbeat_echoed_while_connected() {
    let (mut session, _) = session_with_worker(true);
    let mut io = Outbox::new();

    session.on_text(HEARTBEAT, &mut io);
    assert!(io.is_empty());

    session.on_open(&mut io);
    session.on_text(HEARTBEAT, &mut io);
    establish(&mut session, &mut io);
    session.on_text(HEARTBEAT, &mut io);

    let echoes = io
        .sent()
        .filter(|frame| *frame == r#"{"MessageType":"UnsequencedHeartbeat"}"#)
        .count();
    assert_eq!(echoes, 2);
}

#[test]
fn test_execution_report_schedules_single_shutdown() {
    let (mut session, counters) = session_with_worker(true);
    let mut io = Outbox::new();
    establish(&mut session, &mut io);

    session.on_text(EXECUTION_REPORT, &mut io);
    session.on_text(EXECUTION_REPORT, &mut io);
    assert!(session.is_shutdown_scheduled());
    assert_eq!(io.scheduled_count(TimerKind::Shutdown), 1);
    assert!(io.commands().contains(&Command::Schedule {
        delay: Duration::from_secs(10),
        timer: TimerKind::Shutdown,
    }));
    assert_eq!(session.state(), SessionState::Established);

    session.on_timer(TimerKind::Shutdown, &mut io);
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(io.close_count(), 1);
    assert_eq!(counters.joins.load(Ordering::SeqCst), 1);
}

#[test]
fn test_execution_report_before_establishment_is_ignored() {
    let (mut session, _) = session_with_worker(true);
    let mut io = Outbox::new();
    session.on_open(&mut io);
    session.on_text(EXECUTION_REPORT, &mut io);
    assert!(!session.is_shutdown_scheduled());
    assert_eq!(io.scheduled_count(TimerKind::Shutdown), 0);
}

#[test]
fn test_shutdown_proceeds_when_worker_does_not_stop() {
    let (mut session, counters) = session_with_worker(false);
    let mut io = Outbox::new();
    establish(&mut session, &mut io);

    assert!(session.shutdown(&mut io));
    assert_eq!(counters.joins.load(Ordering::SeqCst), 1);
    assert_eq!(io.close_count(), 1);
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn test_transport_close_stops_worker_without_closing_again() {
    let (mut session, counters) = session_with_worker(true);
    let mut io = Outbox::new();
    establish(&mut session, &mut io);
    io.drain();

    session.on_close("connection reset");
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(counters.stops.load(Ordering::SeqCst), 1);

    session.on_timer(TimerKind::Heartbeat, &mut io);
    assert!(!session.shutdown(&mut io));
    assert!(io.is_empty());
}

#[test]
fn test_client_order_ids_unique_across_sessions() {
    let mut first_ids = Vec::new();
    for _ in 0..2 {
        let (mut session, _) = session_with_worker(true);
        let mut io = Outbox::new();
        establish(&mut session, &mut io);
        let order = Document::from_json(io.sent().last().unwrap()).unwrap();
        first_ids.push(order.get_str("ClOrdID").unwrap().to_string());
    }
    for id in &first_ids {
        assert!(id.starts_with("1-"));
    }
}

#[test]
fn test_dated_order_carries_price_and_expiry() {
    let expire: Timestamp = "20300101-12:00:00.000".parse().unwrap();
    let config = SessionConfig::new(
        "trader",
        "secret",
        order()
            .with_price(Decimal::new(8_512, 4))
            .with_expire_time(expire),
    );
    let mut session = Session::new(config);
    let mut io = Outbox::new();
    establish(&mut session, &mut io);

    let order = Document::from_json(io.sent().last().unwrap()).unwrap();
    assert_eq!(order.get_str("Price"), Some("0.8512"));
    assert_eq!(order.get_str("ExpireTime"), Some("20300101-12:00:00.000"));
}

#[test]
fn test_real_runner_stops_on_shutdown() {
    let config = SessionConfig::new("trader", "secret", order())
        .with_worker_join_timeout(Duration::from_secs(2));
    let mut session = Session::new(config);
    let runner = TaskRunner::spawn("flow-runner", Duration::from_millis(5), |_| {}).unwrap();
    session.attach_worker(Box::new(runner));

    let mut io = Outbox::new();
    establish(&mut session, &mut io);
    std::thread::sleep(Duration::from_millis(20));
    assert!(session.shutdown(&mut io));
    assert!(!session.has_worker());
    assert_eq!(io.close_count(), 1);
}

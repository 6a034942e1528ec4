use super::*;
use crate::channel::ChannelEvent;
use crate::test_support::{FakeConnector, item};

fn request() -> ChannelRequest {
    ChannelRequest {
        url: "ws://list.example.test/ws".to_string(),
        cookie: Some("sid=abc".to_string()),
    }
}

fn manager(connector: &FakeConnector) -> (ConnectionManager, mpsc::UnboundedReceiver<EngineEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ConnectionManager::new(Box::new(connector.clone()), tx), rx)
}

#[test]
fn lifecycle_follows_state_machine() {
    let connector = FakeConnector::default();
    let (mut conn, _rx) = manager(&connector);
    assert_eq!(conn.state(), ConnectionState::Idle);

    assert!(conn.open(request()));
    assert_eq!(conn.state(), ConnectionState::Connecting);
    assert_eq!(connector.last_request(), Some(request()));

    conn.on_connected();
    assert_eq!(conn.state(), ConnectionState::Connected);

    conn.on_disconnected();
    assert_eq!(conn.state(), ConnectionState::Disconnected);
    assert!(!conn.has_channel());
}

#[test]
fn second_open_is_a_no_op() {
    let connector = FakeConnector::default();
    let (mut conn, _rx) = manager(&connector);
    assert!(conn.open(request()));
    let epoch = conn.epoch();
    assert!(!conn.open(request()));
    assert_eq!(connector.open_count(), 1);
    assert_eq!(conn.epoch(), epoch);
}

#[test]
fn close_returns_to_idle_and_bumps_epoch() {
    let connector = FakeConnector::default();
    let (mut conn, _rx) = manager(&connector);
    conn.open(request());
    conn.on_connected();
    let epoch = conn.epoch();

    conn.close();
    assert_eq!(conn.state(), ConnectionState::Idle);
    assert!(!conn.has_channel());
    assert!(conn.epoch() > epoch);
}

#[test]
fn send_without_channel_is_dropped() {
    let connector = FakeConnector::default();
    let (mut conn, _rx) = manager(&connector);
    assert!(!conn.send(ClientFrame::ItemDel(item("1", "x"))));

    conn.open(request());
    assert!(conn.send(ClientFrame::ItemDel(item("1", "x"))));
    assert_eq!(connector.take_sent().len(), 1);
}

#[test]
fn sink_stamps_events_with_epoch() {
    let connector = FakeConnector::default();
    let (mut conn, mut rx) = manager(&connector);
    conn.open(request());
    let sink = connector.last_sink().expect("sink");
    assert!(sink.emit(ChannelEvent::Connect));
    match rx.try_recv() {
        Ok(EngineEvent::Channel { epoch, event }) => {
            assert_eq!(epoch, conn.epoch());
            assert_eq!(event, ChannelEvent::Connect);
        }
        other => panic!("unexpected {:?}", other),
    }
}

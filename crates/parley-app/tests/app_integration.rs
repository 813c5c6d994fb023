//! Integration tests for the App driven by raw stream text.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - The outbound action sequence matches what the relay expects
//! - The rendered view reflects every inbound and local message
//! - Connection status follows the stream lifecycle

use parley_app::{App, AppAction, AppEvent, KeyInput};
use parley_core::{ConnectionStatus, MessageSender};
use parley_proto::{MessageKind, OutboundMessage, SseParser};

/// Create a connected App ready for testing.
fn connected_app() -> App {
    let mut app = App::default();
    app.handle(AppEvent::Connecting, 0);
    app.handle(AppEvent::Connected, 0);
    app
}

/// Feed raw stream text through a parser into the App.
fn feed(app: &mut App, parser: &mut SseParser, chunk: &str, now_ms: u64) {
    for message in parser.parse(chunk) {
        app.handle(AppEvent::MessageReceived(message), now_ms);
    }
}

fn sent_messages(actions: &[AppAction]) -> Vec<&OutboundMessage> {
    actions
        .iter()
        .filter_map(|a| match a {
            AppAction::Send(m) => Some(m),
            _ => None,
        })
        .collect()
}

#[test]
fn type_and_submit_sequence() {
    let mut app = connected_app();
    let mut actions = Vec::new();

    for (i, c) in "hey".chars().enumerate() {
        actions.extend(app.handle(AppEvent::Key(KeyInput::Char(c)), 100 + i as u64));
    }
    actions.extend(app.handle(AppEvent::Key(KeyInput::Enter), 200));

    let kinds: Vec<_> = sent_messages(&actions).iter().map(|m| m.kind()).collect();
    assert_eq!(kinds, [MessageKind::Typing, MessageKind::Clear, MessageKind::Message]);

    let sent = sent_messages(&actions);
    assert_eq!(sent[2].base().text, "hey");
    assert_eq!(sent[2].base().timestamp, Some(200));

    // Oracle: local message shown from the CLI, input reset
    let view = app.messages(300);
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].sender, MessageSender::Cli);
    assert!(app.input().is_empty());
    assert!(!app.typing_indicator_sent());
}

#[test]
fn typing_then_message_split_mid_line() {
    let mut app = connected_app();
    let mut parser = SseParser::new();

    feed(&mut app, &mut parser, "data: {\"type\":\"typing\",\"text\":\"\",\"timestamp\":1}\n\ndata: {\"type\":\"mes", 10);
    assert!(app.messages(10).iter().any(|m| m.is_typing()));

    feed(&mut app, &mut parser, "sage\",\"text\":\"hi\",\"timestamp\":2}\n\n", 20);

    // Oracle: the message superseded the typing indicator
    let log = app.log();
    assert_eq!(log.len(), 1);
    assert_eq!(log.entries()[0].kind(), MessageKind::Message);
    assert_eq!(log.entries()[0].text(), "hi");

    let view = app.messages(20);
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].sender, MessageSender::Web);
}

#[test]
fn connection_established_is_not_shown() {
    let mut app = App::default();
    let mut parser = SseParser::new();

    feed(&mut app, &mut parser, "data: {\"type\":\"connection-established\",\"timestamp\":5}\n\n", 5);

    assert!(app.messages(5).is_empty());
}

#[test]
fn exhausted_stream_surfaces_error() {
    let mut app = connected_app();

    app.handle(AppEvent::Disconnected, 10);
    for attempt in 1..=5 {
        app.handle(
            AppEvent::Reconnecting { attempt, delay: std::time::Duration::from_secs(1) },
            10,
        );
        assert_eq!(app.connection_status(), ConnectionStatus::Connecting);
        app.handle(AppEvent::Disconnected, 11);
    }
    app.handle(AppEvent::StreamFailed { message: "HTTP 500: Internal Server Error".into() }, 50);

    // Oracle: error status plus a system error entry
    assert_eq!(app.connection_status(), ConnectionStatus::Error);
    assert!(!app.is_listening());

    let view = app.messages(60);
    let last = view.last().map(|m| (m.sender, m.kind(), m.text().to_owned()));
    assert_eq!(
        last,
        Some((
            MessageSender::System,
            MessageKind::Error,
            "Connection error: HTTP 500: Internal Server Error".to_owned()
        ))
    );
}

#[test]
fn clear_all_from_stream_keeps_local_messages() {
    let mut app = connected_app();
    let mut parser = SseParser::new();

    feed(&mut app, &mut parser, "data: {\"type\":\"message\",\"text\":\"web\",\"timestamp\":1}\n\n", 1);
    app.handle(AppEvent::Key(KeyInput::Char('x')), 2);
    app.handle(AppEvent::Key(KeyInput::Enter), 3);
    feed(&mut app, &mut parser, "data: {\"type\":\"clear\",\"text\":\"\",\"clearScope\":\"all\"}\n\n", 4);

    // Oracle: inbound log emptied, local send survives
    assert!(app.log().is_empty());
    let texts: Vec<_> = app.messages(5).iter().map(|m| m.text().to_owned()).collect();
    assert_eq!(texts, ["x"]);
}

#[test]
fn unrecognised_type_from_stream_is_shown() {
    let mut app = connected_app();
    let mut parser = SseParser::new();

    feed(&mut app, &mut parser, "data: {\"type\":\"typing\",\"text\":\"\",\"timestamp\":1}\n\n", 1);
    feed(&mut app, &mut parser, "data: {\"type\":\"reaction\",\"timestamp\":2}\n\n", 2);

    // Oracle: appended like a command, typing left in place
    let kinds: Vec<_> = app.log().iter().map(|m| m.kind()).collect();
    assert_eq!(kinds, [MessageKind::Typing, MessageKind::Other]);

    let last = app.messages(3).last().map(|m| (m.sender, m.display_text().into_owned()));
    assert_eq!(last, Some((MessageSender::Web, "[reaction]".to_owned())));
}

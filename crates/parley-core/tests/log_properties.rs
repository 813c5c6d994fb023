//! Property-based tests for the message reducer and the unified view.
//!
//! Arbitrary inbound sequences are folded through the reducer; bounds and
//! ordering must hold after every single step, not only at the end.

use parley_core::{
    MessageLog, SentMessage,
    log::MAX_STORED_MESSAGES,
    view::{self, MAX_DISPLAY_MESSAGES},
};
use parley_proto::{ClearScope, ConnectionEstablished, InboundMessage, OutboundMessage};
use proptest::prelude::*;

fn clear_scope() -> impl Strategy<Value = ClearScope> {
    prop_oneof![
        Just(ClearScope::All),
        Just(ClearScope::Typing),
        Just(ClearScope::Session),
        Just(ClearScope::Unknown),
    ]
}

/// Inbound messages with small timestamps so ties are common.
fn inbound() -> impl Strategy<Value = InboundMessage> {
    let ts = 0u64..50;
    prop_oneof![
        3 => ts.clone().prop_map(|t| InboundMessage::from(OutboundMessage::typing(t))),
        4 => ("[a-z]{1,8}", ts.clone())
            .prop_map(|(text, t)| InboundMessage::from(OutboundMessage::message(text, t))),
        1 => ("[a-z]{1,8}", ts.clone())
            .prop_map(|(cmd, t)| InboundMessage::from(OutboundMessage::command(cmd, None, t))),
        1 => ("[a-z]{1,8}", ts.clone())
            .prop_map(|(text, t)| InboundMessage::from(OutboundMessage::error(text, None, t))),
        2 => (clear_scope(), ts.clone())
            .prop_map(|(scope, t)| InboundMessage::from(OutboundMessage::clear(scope, t))),
        1 => proptest::option::of(ts)
            .prop_map(|timestamp| InboundMessage::ConnectionEstablished(ConnectionEstablished { timestamp })),
    ]
}

fn sent() -> impl Strategy<Value = Vec<SentMessage>> {
    prop::collection::vec(
        ("[a-z]{1,8}", 0u64..50).prop_map(|(text, timestamp)| SentMessage { text, timestamp }),
        0..25,
    )
}

proptest! {
    #[test]
    fn prop_log_is_bounded_with_single_indicator(messages in prop::collection::vec(inbound(), 0..80)) {
        let mut log = MessageLog::new();
        for message in messages {
            log = log.apply(message);

            // PROPERTY: Bounded after every update
            prop_assert!(log.len() <= MAX_STORED_MESSAGES);

            // PROPERTY: At most one typing indicator
            prop_assert!(log.iter().filter(|m| m.is_typing()).count() <= 1);
        }
    }

    #[test]
    fn prop_clear_all_empties(
        messages in prop::collection::vec(inbound(), 0..40),
        ts in any::<u64>(),
    ) {
        let log = messages.into_iter().fold(MessageLog::new(), MessageLog::apply);

        let cleared = log.apply(InboundMessage::from(OutboundMessage::clear(ClearScope::All, ts)));

        prop_assert!(cleared.is_empty());
    }

    #[test]
    fn prop_clear_typing_only_removes_typing(messages in prop::collection::vec(inbound(), 0..40)) {
        let log = messages.into_iter().fold(MessageLog::new(), MessageLog::apply);
        let expected: Vec<_> = log.iter().filter(|m| !m.is_typing()).cloned().collect();

        let cleared = log.apply(InboundMessage::from(OutboundMessage::clear(ClearScope::Typing, 0)));

        prop_assert_eq!(cleared.entries(), expected.as_slice());
    }

    #[test]
    fn prop_view_is_sorted_and_bounded(
        messages in prop::collection::vec(inbound(), 0..60),
        sent in sent(),
        now in 0u64..100,
    ) {
        let log = messages.into_iter().fold(MessageLog::new(), MessageLog::apply);

        let unified = view::build(&log, &sent, now);

        // PROPERTY: Never more than the display cap
        prop_assert!(unified.len() <= MAX_DISPLAY_MESSAGES);

        // PROPERTY: Non-decreasing timestamps
        prop_assert!(unified.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

        // PROPERTY: Lifecycle signals never reach the view
        prop_assert!(unified.iter().all(|m| m.display_text() != "Connected to web stream"));
    }
}

#[test]
fn typing_then_message_leaves_only_message() {
    let log = MessageLog::new()
        .apply(InboundMessage::from(OutboundMessage::typing(999)))
        .apply(InboundMessage::from(OutboundMessage::message("hi", 1000)));

    assert_eq!(log.len(), 1);
    assert_eq!(log.entries().first().map(InboundMessage::text), Some("hi"));
    assert_eq!(log.entries().first().and_then(InboundMessage::timestamp), Some(1000));
}

//! Property-based tests for the SSE frame parser.
//!
//! The parser must produce the same messages regardless of how the transport
//! chunks the stream, including when chunk boundaries fall inside a frame,
//! inside a line, or between the two newlines of a boundary.

use parley_proto::{
    ClearScope, InboundMessage, MessageKind, OutboundMessage, SseParser, encode_frame,
};
use proptest::prelude::*;

/// Strategy for generating arbitrary inbound messages.
fn arbitrary_message() -> impl Strategy<Value = InboundMessage> {
    let text = "[a-zA-Z0-9 ,.!?é]{0,24}";
    prop_oneof![
        any::<u64>().prop_map(|ts| InboundMessage::from(OutboundMessage::typing(ts))),
        (text, any::<u64>())
            .prop_map(|(t, ts)| InboundMessage::from(OutboundMessage::message(t, ts))),
        (text, any::<u64>())
            .prop_map(|(t, ts)| InboundMessage::from(OutboundMessage::error(t, None, ts))),
        any::<u64>()
            .prop_map(|ts| InboundMessage::from(OutboundMessage::clear(ClearScope::Typing, ts))),
        any::<u64>().prop_map(|ts| InboundMessage::from(OutboundMessage::clear(ClearScope::All, ts))),
    ]
}

/// A stream segment: either a valid frame or noise the parser must skip.
#[derive(Debug, Clone)]
enum Segment {
    Frame(InboundMessage),
    Malformed,
    KeepAlive,
}

fn arbitrary_segment() -> impl Strategy<Value = Segment> {
    prop_oneof![
        8 => arbitrary_message().prop_map(Segment::Frame),
        1 => Just(Segment::Malformed),
        1 => Just(Segment::KeepAlive),
    ]
}

fn render(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Frame(message) => encode_frame(message).unwrap(),
            Segment::Malformed => "data: {\"type\":\n\n".to_string(),
            Segment::KeepAlive => ": ping\n\n".to_string(),
        })
        .collect()
}

/// Split `stream` at the given fractional cut points, respecting char
/// boundaries.
fn split_stream(stream: &str, cuts: &[usize]) -> Vec<String> {
    let mut points: Vec<usize> = cuts
        .iter()
        .map(|c| c % (stream.len() + 1))
        .filter(|&p| stream.is_char_boundary(p))
        .collect();
    points.sort_unstable();
    points.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for point in points {
        chunks.push(stream[start..point].to_string());
        start = point;
    }
    chunks.push(stream[start..].to_string());
    chunks
}

proptest! {
    #[test]
    fn prop_chunking_does_not_change_output(
        segments in prop::collection::vec(arbitrary_segment(), 0..12),
        cuts in prop::collection::vec(any::<usize>(), 0..16),
    ) {
        let stream = render(&segments);

        let whole = SseParser::new().parse(&stream);

        let mut parser = SseParser::new();
        let chunked: Vec<InboundMessage> = split_stream(&stream, &cuts)
            .iter()
            .flat_map(|chunk| parser.parse(chunk))
            .collect();

        // PROPERTY: Chunk boundaries are invisible to the consumer
        prop_assert_eq!(&chunked, &whole);
        prop_assert!(parser.buffered().is_empty(), "complete stream must leave nothing buffered");
    }

    #[test]
    fn prop_valid_frames_survive_noise(segments in prop::collection::vec(arbitrary_segment(), 0..12)) {
        let expected: Vec<InboundMessage> = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Frame(m) => Some(m.clone()),
                Segment::Malformed | Segment::KeepAlive => None,
            })
            .collect();

        let parsed = SseParser::new().parse(&render(&segments));

        // PROPERTY: Malformed and empty frames drop out without disturbing order
        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn prop_byte_at_a_time(segments in prop::collection::vec(arbitrary_segment(), 0..6)) {
        let stream = render(&segments);
        let whole = SseParser::new().parse(&stream);

        let mut parser = SseParser::new();
        let mut chunked = Vec::new();
        let mut buf = [0u8; 4];
        for ch in stream.chars() {
            chunked.extend(parser.parse(ch.encode_utf8(&mut buf)));
        }

        prop_assert_eq!(chunked, whole);
    }
}

#[test]
fn typing_then_message_split_mid_line() {
    let stream = concat!(
        "data: {\"type\":\"typing\",\"text\":\"\",\"isIncremental\":true}\n\n",
        "data: {\"type\":\"message\",\"text\":\"hi\",\"timestamp\":1000}\n\n",
    );
    let split = stream.find("\"text\":\"hi\"").unwrap();

    let mut parser = SseParser::new();
    let mut messages = parser.parse(&stream[..split]);
    messages.extend(parser.parse(&stream[split..]));

    let kinds: Vec<_> = messages.iter().map(InboundMessage::kind).collect();
    assert_eq!(kinds, [MessageKind::Typing, MessageKind::Message]);
    assert_eq!(messages.get(1).map(InboundMessage::text), Some("hi"));
    assert_eq!(messages.get(1).and_then(InboundMessage::timestamp), Some(1000));
}

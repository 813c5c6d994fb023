//! Fuzz target for SSE chunk boundaries
//!
//! # Strategy
//!
//! - Frames: valid messages of every kind, keep-alive comments, frames with
//!   malformed JSON, unknown `type` values, and raw arbitrary text
//! - Chunking: the same text cut at arbitrary char boundaries
//!
//! # Invariants
//!
//! - Parsing MUST never panic
//! - Chunked parsing MUST yield exactly the messages of one-shot parsing
//!   (inputs stay well under `MAX_BUFFERED_BYTES`)
//! - The buffered remainder MUST be identical either way
//! - The reduced log MUST hold at most `MAX_STORED_MESSAGES` entries and at
//!   most one typing indicator

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use parley_core::{MessageLog, log::MAX_STORED_MESSAGES};
use parley_proto::SseParser;

#[derive(Debug, Clone, Arbitrary)]
enum FuzzFrame {
    Typing(u64),
    Message(String, u64),
    ClearTyping,
    ClearAll,
    Error(String),
    ConnectionEstablished(u64),
    KeepAlive,
    BadJson(String),
    UnknownType(String),
    Raw(String),
}

impl FuzzFrame {
    fn render(&self) -> String {
        match self {
            Self::Typing(ts) => {
                format!("data: {{\"type\":\"typing\",\"text\":\"\",\"timestamp\":{ts}}}\n\n")
            },
            Self::Message(text, ts) => format!(
                "data: {{\"type\":\"message\",\"text\":{},\"timestamp\":{ts}}}\n\n",
                json_string(text)
            ),
            Self::ClearTyping => "data: {\"type\":\"clear\",\"clearScope\":\"typing\"}\n\n".into(),
            Self::ClearAll => "data: {\"type\":\"clear\",\"clearScope\":\"all\"}\n\n".into(),
            Self::Error(text) => {
                format!("data: {{\"type\":\"error\",\"text\":{}}}\n\n", json_string(text))
            },
            Self::ConnectionEstablished(ts) => {
                format!("data: {{\"type\":\"connection-established\",\"timestamp\":{ts}}}\n\n")
            },
            Self::KeepAlive => ": keep-alive\n\n".into(),
            Self::BadJson(text) => format!("data: {{{text}\n\n"),
            Self::UnknownType(kind) => {
                format!("data: {{\"type\":{}}}\n\n", json_string(kind))
            },
            Self::Raw(text) => text.clone(),
        }
    }
}

fn json_string(text: &str) -> String {
    let escaped: String = text
        .chars()
        .filter(|c| !c.is_control())
        .flat_map(|c| match c {
            '"' => vec!['\\', '"'],
            '\\' => vec!['\\', '\\'],
            c => vec![c],
        })
        .collect();
    format!("\"{escaped}\"")
}

#[derive(Debug, Arbitrary)]
struct Input {
    frames: Vec<FuzzFrame>,
    cuts: Vec<u16>,
}

fuzz_target!(|input: Input| {
    let text: String = input.frames.iter().map(FuzzFrame::render).collect();

    let mut whole = SseParser::new();
    let expected = whole.parse(&text);

    let mut boundaries: Vec<usize> = input
        .cuts
        .iter()
        .map(|&c| usize::from(c) % (text.len() + 1))
        .filter(|&i| text.is_char_boundary(i))
        .collect();
    boundaries.push(0);
    boundaries.push(text.len());
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut chunked = SseParser::new();
    let mut actual = Vec::new();
    for pair in boundaries.windows(2) {
        actual.extend(chunked.parse(&text[pair[0]..pair[1]]));
    }

    assert_eq!(actual, expected, "chunking changed the parsed messages");
    assert_eq!(chunked.buffered(), whole.buffered(), "chunking changed the remainder");

    let mut log = MessageLog::new();
    for message in actual {
        log = log.apply(message);
        assert!(log.len() <= MAX_STORED_MESSAGES);
        assert!(log.iter().filter(|m| m.is_typing()).count() <= 1);
    }
});

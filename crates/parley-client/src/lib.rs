//! Parley client transport
//!
//! I/O half of the relay client. Everything here is a thin driver around the
//! pure pieces in [`parley_core`] and [`parley_proto`]: bytes come in, are
//! decoded and parsed, and leave as [`StreamEvent`]s on a channel; outbound
//! messages go in on a channel and leave as HTTP POSTs.
//!
//! # Components
//!
//! - [`StreamClient`]: Reconnecting SSE reader with exponential backoff
//! - [`StreamHandle`]: Event receiver plus cancel switch for a spawned stream
//! - [`HttpSender`]: Fire-and-forget JSON POST with a boolean outcome
//! - [`OutboundQueue`]: Ordered background delivery through an [`HttpSender`]
//! - [`Utf8Decoder`]: Chunk-boundary-safe UTF-8 decoding
//! - [`SystemEnv`]: Production [`parley_core::Environment`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod errors;
pub mod sender;
pub mod stream;
pub mod system_env;
pub mod text;

pub use config::ClientConfig;
pub use errors::{SendError, StreamError};
pub use sender::{HttpSender, OutboundQueue};
pub use stream::{StreamClient, StreamEvent, StreamHandle};
pub use system_env::SystemEnv;
pub use text::Utf8Decoder;

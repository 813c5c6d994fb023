//! Terminal UI for Parley
//!
//! A thin shell over [`parley_app::App`] that owns the terminal, the stream
//! client and the outbound queue. All conversation logic lives in the app
//! and core crates.
//!
//! This crate only handles terminal I/O, timers and rendering.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod runtime;
pub mod terminal;
pub mod ui;

pub use parley_app::{App, AppAction, AppEvent, KeyInput};
pub use runtime::{Runtime, RuntimeError};

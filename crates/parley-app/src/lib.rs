//! Application layer for Parley
//!
//! Pure state machine behind the terminal client. The same code runs in the
//! production runtime and in tests: terminal keys and stream notifications go
//! in as [`AppEvent`]s together with the current time, and side effects come
//! out as [`AppAction`]s for the runtime to execute.
//!
//! # Components
//!
//! - [`App`]: Connection status, message log, typing indicator, input line
//! - [`InputState`]: Editable input buffer with a character cursor
//! - [`KeyInput`]: Terminal-agnostic key codes

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod event;
mod input;

pub use action::AppAction;
pub use app::App;
pub use event::AppEvent;
pub use input::{InputState, KeyInput};

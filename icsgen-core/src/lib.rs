//! Core of icsgen: turn a loosely-typed event description into an
//! iCalendar document.
//!
//! - `event` holds the input record (`EventAttributes`)
//! - `ics` is the encoder and its timezone table
//! - `source` provides the UID and clock seams the encoder reads from
//! - `writer` persists finished documents as `.ics` files

pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod source;
pub mod writer;

pub use error::{IcsError, IcsResult};
pub use event::*;
pub use ics::{Encoder, build_event, build_event_lines};
pub use writer::{IcsWriter, WriterOptions};

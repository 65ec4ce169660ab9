//! # fileshare-shared
//!
//! Data model, wire protocol and constants shared by every fileshare crate.
//!
//! A "tab" in fileshare is an independent chat session on the same machine.
//! Sessions exchange [`protocol::Message`] values over a local broadcast
//! channel; this crate defines those values and the invariants the rest of
//! the workspace relies on (globally unique message ids, millisecond
//! timestamps, the `+1` offset that keeps a derived summary ordered after
//! the message that triggered it).

pub mod constants;
pub mod error;
pub mod protocol;
pub mod types;

pub use error::SharedError;
pub use protocol::{FileAttachment, Message, Payload};
pub use types::User;

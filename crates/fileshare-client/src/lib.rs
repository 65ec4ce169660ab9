//! # fileshare-client
//!
//! The chat session: identity and settings persistence plus the session
//! controller that owns the message log, deduplicates and orders inbound
//! events, and drives the link-summarization side flow.

pub mod error;
pub mod events;
pub mod identity;
pub mod session;
pub mod settings;

pub use error::ClientError;
pub use events::SessionEvent;
pub use identity::IdentityStore;
pub use session::ChatSession;
pub use settings::{Settings, SettingsStore};

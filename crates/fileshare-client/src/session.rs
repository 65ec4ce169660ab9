//! The chat session controller.
//!
//! Owns the message log and is the sole synchronization point between local
//! intents and peer deliveries: every message, self-originated or not, goes
//! through [`ChatSession::on_inbound`], whose idempotent-insert contract is
//! what makes concurrent arrival from several sessions safe without any
//! further coordination.

use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use regex::Regex;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use fileshare_ai::Summarizer;
use fileshare_bus::{BusHandle, Inbound};
use fileshare_shared::constants::MAX_FILE_SIZE;
use fileshare_shared::{FileAttachment, Message, User};

use crate::error::{ClientError, Result};
use crate::events::SessionEvent;
use crate::settings::{Settings, SettingsStore};

struct SessionState {
    log: Vec<Message>,
    summarizing: bool,
    url_summary_enabled: bool,
}

/// One chat session ("tab"). Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct ChatSession {
    user: User,
    state: Arc<Mutex<SessionState>>,
    bus: BusHandle,
    summarizer: Arc<dyn Summarizer>,
    settings: SettingsStore,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChatSession {
    /// Start a session on an attached bus endpoint.
    ///
    /// Loads the persisted settings, announces the user with an `info`
    /// message (merged locally and broadcast), and spawns the inbound pump
    /// that merges peer deliveries for the lifetime of the endpoint.
    pub async fn start(
        user: User,
        bus: BusHandle,
        mut inbound: Inbound,
        summarizer: Arc<dyn Summarizer>,
        settings: SettingsStore,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SessionEvent>)> {
        let url_summary_enabled = settings.load()?.url_summary_enabled;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let session = Self {
            user: user.clone(),
            state: Arc::new(Mutex::new(SessionState {
                log: Vec::new(),
                summarizing: false,
                url_summary_enabled,
            })),
            bus,
            summarizer,
            settings,
            events_tx,
        };

        let welcome = Message::info(user.clone(), format!("{} has joined the chat.", user.name));
        session.on_inbound(welcome.clone());
        session.publish(welcome).await?;
        info!(user_id = %user.id, "Chat session started");

        let pump = session.clone();
        tokio::spawn(async move {
            while let Some(message) = inbound.recv().await {
                pump.on_inbound(message);
            }
            debug!("Inbound pump finished, bus endpoint closed");
        });

        Ok((session, events_rx))
    }

    /// Idempotent merge into the log.
    ///
    /// A message whose id is already present is a no-op; otherwise it is
    /// inserted and the log re-sorted by timestamp. The sort is stable, so
    /// equal timestamps keep insertion order. Returns whether the message
    /// was new.
    pub fn on_inbound(&self, message: Message) -> bool {
        {
            let mut state = self.state.lock().expect("session state poisoned");
            if state.log.iter().any(|m| m.id == message.id) {
                return false;
            }
            state.log.push(message.clone());
            state.log.sort_by_key(|m| m.timestamp);
        }
        let _ = self.events_tx.send(SessionEvent::MessageAdded(message));
        true
    }

    /// Send a text message. Blank or whitespace-only input is a no-op.
    ///
    /// If URL summaries are enabled and the content contains a URL, a
    /// summarization of the FIRST one is spawned in the background;
    /// subsequent URLs in the same message are ignored.
    pub async fn send_text(&self, content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Ok(());
        }

        let message = Message::text(self.user.clone(), content);
        let trigger_timestamp = message.timestamp;
        self.publish(message.clone()).await?;
        self.on_inbound(message);

        let enabled = {
            let state = self.state.lock().expect("session state poisoned");
            state.url_summary_enabled
        };
        if enabled {
            if let Some(url) = first_url(content) {
                let session = self.clone();
                tokio::spawn(async move {
                    session.summarize_and_publish(url, trigger_timestamp).await;
                });
            }
        }
        Ok(())
    }

    /// Send a file attachment, embedding the bytes as a data URL.
    ///
    /// Files over 5 MiB are rejected before reading; an unreadable file is
    /// an error. In both cases nothing is published.
    pub async fn send_file(&self, path: &Path) -> Result<()> {
        let size = tokio::fs::metadata(path).await?.len();
        if size > MAX_FILE_SIZE {
            return Err(ClientError::FileTooLarge { size });
        }

        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        let attachment = FileAttachment {
            name: name.clone(),
            mime_type: mime.essence_str().to_string(),
            size: bytes.len() as u64,
            url: format!("data:{};base64,{}", mime.essence_str(), BASE64.encode(&bytes)),
        };
        let message = Message::file(self.user.clone(), attachment);
        self.publish(message.clone()).await?;
        self.on_inbound(message);

        info!(file = %name, size, "File sent");
        Ok(())
    }

    /// Run the summarization side flow for a detected URL.
    ///
    /// On success the summary message is attributed to the assistant and
    /// stamped `trigger_timestamp + 1` so it sorts directly after its
    /// trigger. On any failure a single notice is emitted and nothing is
    /// produced or broadcast; there is no retry. The busy flag is cleared
    /// on every path. Overlapping invocations are permitted; the flag is a
    /// UX hint, not an exclusion.
    pub async fn summarize_and_publish(&self, url: String, trigger_timestamp: i64) {
        self.set_summarizing(true);

        match self.summarizer.summarize(&url).await {
            Ok(summary) => {
                let message = Message::summary(url, summary, trigger_timestamp);
                if let Err(e) = self.publish(message.clone()).await {
                    warn!(error = %e, "Failed to broadcast summary");
                }
                self.on_inbound(message);
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Summarization failed");
                self.notify("Could not summarize the provided URL.");
            }
        }

        self.set_summarizing(false);
    }

    /// Toggle URL summaries and persist the choice. Takes effect for
    /// subsequently sent messages only.
    pub fn set_url_summaries(&self, enabled: bool) -> Result<()> {
        {
            let mut state = self.state.lock().expect("session state poisoned");
            state.url_summary_enabled = enabled;
        }
        self.settings.save(&Settings {
            url_summary_enabled: enabled,
        })?;
        info!(enabled, "URL summaries toggled");
        Ok(())
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Snapshot of the message log, sorted ascending by timestamp.
    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().expect("session state poisoned").log.clone()
    }

    pub fn is_summarizing(&self) -> bool {
        self.state.lock().expect("session state poisoned").summarizing
    }

    pub fn url_summaries_enabled(&self) -> bool {
        self.state
            .lock()
            .expect("session state poisoned")
            .url_summary_enabled
    }

    async fn publish(&self, message: Message) -> Result<()> {
        self.bus.publish(message).await.map_err(ClientError::Bus)
    }

    fn set_summarizing(&self, on: bool) {
        {
            let mut state = self.state.lock().expect("session state poisoned");
            state.summarizing = on;
        }
        let _ = self.events_tx.send(SessionEvent::SummarizingChanged(on));
    }

    fn notify(&self, text: &str) {
        let _ = self
            .events_tx
            .send(SessionEvent::Notice(text.to_string()));
    }
}

/// First URL in a text, matched by a permissive scheme://non-whitespace
/// pattern.
fn first_url(content: &str) -> Option<String> {
    static URL: OnceLock<Regex> = OnceLock::new();
    let url = URL.get_or_init(|| Regex::new(r"https?://\S+").expect("valid url regex"));
    url.find(content).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_url_picks_first_only() {
        let text = "see http://a.example and http://b.example";
        assert_eq!(first_url(text), Some("http://a.example".to_string()));
    }

    #[test]
    fn test_first_url_none_without_scheme() {
        assert_eq!(first_url("no links here, just www.example.com"), None);
    }

    #[test]
    fn test_first_url_stops_at_whitespace() {
        assert_eq!(
            first_url("https://example.com/a?b=c trailing words"),
            Some("https://example.com/a?b=c".to_string())
        );
    }
}

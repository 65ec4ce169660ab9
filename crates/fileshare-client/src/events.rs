use fileshare_shared::Message;

/// Notifications sent from the session to the presentation layer.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A message entered the log (local echo or peer delivery).
    MessageAdded(Message),
    /// A summarization started or finished; the UI uses this to disable the
    /// send control. A pending summarization cannot be cancelled.
    SummarizingChanged(bool),
    /// One-shot user-visible failure notice (toast-style).
    Notice(String),
}

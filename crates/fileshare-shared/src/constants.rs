/// Application name (used for platform data directories)
pub const APP_NAME: &str = "fileshare";

/// Name of the broadcast channel all chat sessions attach to
pub const CHANNEL_NAME: &str = "fileshare-chat";

/// Maximum attachment size in bytes (5 MiB)
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Fixed id of the synthetic assistant user that authors summary messages
pub const ASSISTANT_ID: &str = "ai-bot";

/// Display name of the assistant user
pub const ASSISTANT_NAME: &str = "AI";

/// Avatar color of the assistant user
pub const ASSISTANT_COLOR: &str = "#77B5FE";

/// Palette a fresh profile picks its avatar color from
pub const AVATAR_COLORS: [&str; 6] = [
    "#e57373", "#81c784", "#64b5f6", "#f06292", "#ffb74d", "#ba68c8",
];

/// Placeholder returned when content extraction fails for any reason
pub const EXTRACTION_PLACEHOLDER: &str = "Could not retrieve content from the URL.";

/// Cap on extracted page text handed to the generation backend, in chars.
/// The fetch itself is unbounded; only the prompt payload is truncated.
pub const MAX_EXTRACT_CHARS: usize = 16_000;

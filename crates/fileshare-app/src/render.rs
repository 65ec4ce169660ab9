//! Terminal rendering of the message log: pure presentation over the
//! session's events, no chat logic.

use chrono::{Local, TimeZone};

use fileshare_client::SessionEvent;
use fileshare_shared::{FileAttachment, Message, Payload, User};

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";

pub fn render_event(event: &SessionEvent, me: &User) {
    match event {
        SessionEvent::MessageAdded(message) => render_message(message, me),
        SessionEvent::SummarizingChanged(true) => {
            println!("{DIM}  … summarizing link …{RESET}");
        }
        SessionEvent::SummarizingChanged(false) => {}
        SessionEvent::Notice(text) => println!("{DIM}  ! {text}{RESET}"),
    }
}

fn render_message(message: &Message, me: &User) {
    let time = clock(message.timestamp);
    let name = if message.sender.id == me.id {
        "you".to_string()
    } else {
        colored_name(&message.sender)
    };

    match &message.payload {
        Payload::Info { content } => println!("{DIM}  — {content} —{RESET}"),
        Payload::Text { content } => println!("[{time}] {name}: {content}"),
        Payload::File { file } => {
            println!("[{time}] {name} shared a file: {}", describe_file(file));
        }
        Payload::Summary { url, summary } => {
            println!("[{time}] {name} · Summary of {url}");
            println!("        {summary}");
        }
    }
}

fn describe_file(file: &FileAttachment) -> String {
    format!("{} ({}, {})", file.name, file.mime_type, format_size(file.size))
}

/// Human file size, binary units.
pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < MIB {
        format!("{:.2} KB", b / KIB)
    } else {
        format!("{:.2} MB", b / MIB)
    }
}

fn clock(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "??:??".to_string())
}

/// Render a user name in its avatar color (truecolor escape).
pub fn colored_name(user: &User) -> String {
    match parse_hex(&user.avatar_color) {
        Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m{}{RESET}", user.name),
        None => user.name.clone(),
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    // The color arrives over the wire; `get` keeps a multibyte value from
    // panicking on a non-char-boundary slice.
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some((r, g, b))
}

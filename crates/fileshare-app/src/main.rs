mod cli;
mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use directories::ProjectDirs;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use fileshare_ai::{GenerationConfig, UrlSummarizer};
use fileshare_client::{ChatSession, IdentityStore, SettingsStore};
use fileshare_shared::constants::{APP_NAME, CHANNEL_NAME};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fileshare_client=warn,fileshare_bus=warn,fileshare_ai=warn,warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args = cli::Cli::parse();
    let data_dir = resolve_data_dir(args.data_dir)?;
    let socket = args
        .socket
        .unwrap_or_else(|| std::env::temp_dir().join(format!("{CHANNEL_NAME}.sock")));

    let user = IdentityStore::in_dir(&data_dir).load_or_create()?;
    let (handle, inbound) = fileshare_bus::attach_socket(&socket).await?;
    let summarizer = Arc::new(UrlSummarizer::new(GenerationConfig::from_env()));
    let (session, mut events) = ChatSession::start(
        user.clone(),
        handle,
        inbound,
        summarizer,
        SettingsStore::in_dir(&data_dir),
    )
    .await?;

    println!(
        "fileshare — chatting as {} on {}",
        render::colored_name(&user),
        socket.display()
    );
    println!("  /file <path> to share a file, /summaries on|off, /quit to leave\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => render::render_event(&event, session.user()),
                None => break,
            },
            line = lines.next_line() => match line? {
                Some(line) => {
                    if !handle_input(&session, line.trim()).await {
                        break;
                    }
                }
                None => break,
            },
        }
    }

    Ok(())
}

/// One parsed line of input. Slash commands that do not match a known form
/// become `Usage` so a typo is never broadcast as chat text.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Summaries(bool),
    File(&'a str),
    Text(&'a str),
    Usage(&'static str),
}

fn parse_input(input: &str) -> Input<'_> {
    if !input.starts_with('/') {
        return Input::Text(input);
    }
    let (command, rest) = input.split_once(' ').unwrap_or((input, ""));
    match (command, rest.trim()) {
        ("/quit", "") => Input::Quit,
        ("/summaries", "on") => Input::Summaries(true),
        ("/summaries", "off") => Input::Summaries(false),
        ("/summaries", _) => Input::Usage("usage: /summaries on|off"),
        ("/file", "") => Input::Usage("usage: /file <path>"),
        ("/file", path) => Input::File(path),
        _ => Input::Usage("unknown command (try /file <path>, /summaries on|off, /quit)"),
    }
}

/// Dispatch one line of input. Returns `false` to quit.
async fn handle_input(session: &ChatSession, input: &str) -> bool {
    match parse_input(input) {
        Input::Quit => return false,
        Input::Summaries(enabled) => {
            if let Err(e) = session.set_url_summaries(enabled) {
                println!("  ! could not save settings: {e}");
            } else {
                println!("  url summaries {}", if enabled { "enabled" } else { "disabled" });
            }
        }
        Input::File(path) => {
            if let Err(e) = session.send_file(Path::new(path)).await {
                println!("  ! {e}");
            }
        }
        Input::Text(text) => {
            if let Err(e) = session.send_text(text).await {
                println!("  ! {e}");
            }
        }
        Input::Usage(usage) => println!("  ! {usage}"),
    }
    true
}

fn resolve_data_dir(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let dir = match explicit {
        Some(dir) => dir,
        None => ProjectDirs::from("", "", APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("could not determine a data directory"))?
            .data_dir()
            .to_path_buf(),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

use clap::Parser;
use std::path::PathBuf;

/// Local multi-session chat with file sharing and AI link summaries.
///
/// Every terminal running `fileshare` on the same machine joins the same
/// conversation through a local socket; nothing leaves the machine except
/// the optional summarization calls.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Socket path of the shared channel (defaults to the temp dir).
    #[arg(long)]
    pub socket: Option<PathBuf>,

    /// Data directory for the profile and settings (defaults to the
    /// platform data dir). Separate dirs give separate identities.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

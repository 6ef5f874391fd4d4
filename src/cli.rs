// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::verdict::TargetKind;

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[arg(long = "log-level", default_value = "warn", global = true)]
    pub log_level: String,

    #[arg(
        long = "api-key",
        help = "Reputation service API key (falls back to VT_API_KEY)",
        global = true
    )]
    pub api_key: Option<String>,

    #[arg(
        long = "api-base",
        help = "Override the reputation service endpoint",
        global = true
    )]
    pub api_base: Option<String>,

    #[arg(
        short = 't',
        long = "timeout",
        default_value_t = 30,
        help = "Reputation service request timeout in seconds",
        global = true
    )]
    pub timeout: u64,

    #[arg(
        short = 'r',
        long = "rate-limit",
        default_value_t = 4,
        help = "Reputation service requests per minute",
        global = true
    )]
    pub rate_limit: u32,

    #[arg(
        long = "ttl-hours",
        default_value_t = 24,
        help = "Hours a cached verdict stays valid",
        global = true
    )]
    pub ttl_hours: i64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(subcommand, about = "Scan a URL, file, or message text")]
    Scan(ScanCommands),
    #[command(subcommand, about = "Inspect or purge the verdict cache")]
    Cache(CacheCommands),
}

#[derive(Subcommand, Debug)]
pub enum ScanCommands {
    Url(ScanUrlArgs),
    File(ScanFileArgs),
    Message(ScanMessageArgs),
}

#[derive(Args, Debug)]
pub struct ScanUrlArgs {
    #[arg(help = "URL to scan")]
    pub url: String,

    #[arg(long = "format", default_value = "table")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct ScanFileArgs {
    #[arg(help = "Path to the file to scan")]
    pub path: PathBuf,

    #[arg(long = "hash", help = "Precomputed SHA-256; skips local hashing")]
    pub hash: Option<String>,

    #[arg(
        long = "allow-upload",
        help = "Consent to upload file bytes when the hash is unknown to the service"
    )]
    pub allow_upload: bool,

    #[arg(long = "format", default_value = "table")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct ScanMessageArgs {
    #[arg(help = "Message text to extract and scan URLs from")]
    pub text: String,

    #[arg(long = "format", default_value = "table")]
    pub format: String,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    Stats(CacheStatsArgs),
    Purge(CachePurgeArgs),
}

#[derive(Args, Debug)]
pub struct CacheStatsArgs {
    #[arg(long = "format", default_value = "table")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct CachePurgeArgs {
    #[arg(long = "kind", help = "Limit the purge to one target kind: url or file")]
    pub kind: Option<String>,

    #[arg(long = "confirm", help = "Skip the interactive confirmation prompt")]
    pub confirm: bool,
}

impl CachePurgeArgs {
    pub fn parse_kind(&self) -> Option<TargetKind> {
        self.kind
            .as_ref()
            .and_then(|s| match s.to_lowercase().as_str() {
                "url" => Some(TargetKind::Url),
                "file" => Some(TargetKind::File),
                _ => None,
            })
    }
}

// File: main.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use std::num::NonZeroU32;
use std::sync::Arc;

use msgscan::cache::VerdictCache;
use msgscan::cli::{Cli, Commands};
use msgscan::client::ReputationClient;
use msgscan::commands;
use msgscan::config::ScannerConfig;
use msgscan::enrich::ScanEnricher;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Warn,
    };
    simple_logger::SimpleLogger::new().with_level(level).init().ok();

    let mut config = ScannerConfig::from_env();
    if cli.api_key.is_some() {
        config.set_api_key(cli.api_key.clone());
    }
    if let Some(ref api_base) = cli.api_base {
        config.set_api_base(api_base.clone());
    }
    config.set_timeout(cli.timeout);
    if let Some(rate_limit) = NonZeroU32::new(cli.rate_limit) {
        config.set_rate_limit(rate_limit);
    }
    config.set_cache_ttl(chrono::Duration::hours(cli.ttl_hours));

    let cache = Arc::new(VerdictCache::new(cli.data_dir.clone(), config.cache_ttl())?);

    match &cli.command {
        Commands::Scan(cmd) => {
            let client = ReputationClient::new(config.clone());
            let enricher = ScanEnricher::new(Arc::clone(&cache), client);
            commands::handle_scan_command(cmd, &enricher).await
        }
        Commands::Cache(cmd) => commands::handle_cache_command(cmd, &cache).await,
    }
}

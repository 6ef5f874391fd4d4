// File: cache.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use colored::*;
use std::io::{self, Write};

use super::{format_file_size, print_error, print_success, print_warning};
use crate::cache::VerdictCache;
use crate::cli::{CacheCommands, CachePurgeArgs, CacheStatsArgs};

pub async fn execute(cmd: &CacheCommands, cache: &VerdictCache) -> Result<()> {
    match cmd {
        CacheCommands::Stats(args) => show_stats(args, cache),
        CacheCommands::Purge(args) => purge(args, cache),
    }
}

fn show_stats(args: &CacheStatsArgs, cache: &VerdictCache) -> Result<()> {
    let stats = cache.stats()?;

    if args.format.eq_ignore_ascii_case("json") {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "VERDICT CACHE".bold());
    println!(
        "  url entries:  {}",
        stats.get("url_entries").unwrap_or(&0).to_string().cyan()
    );
    println!(
        "  file entries: {}",
        stats.get("file_entries").unwrap_or(&0).to_string().cyan()
    );
    println!(
        "  size on disk: {}",
        format_file_size(*stats.get("size_bytes").unwrap_or(&0))
    );

    Ok(())
}

fn purge(args: &CachePurgeArgs, cache: &VerdictCache) -> Result<()> {
    if args.kind.is_some() && args.parse_kind().is_none() {
        print_error(&format!(
            "Unknown target kind: {} (expected url or file)",
            args.kind.as_deref().unwrap_or("")
        ));
        return Ok(());
    }

    if !args.confirm && !confirm_purge(args)? {
        print_warning("Operation cancelled by user");
        return Ok(());
    }

    let removed = cache.purge(args.parse_kind())?;

    if removed > 0 {
        print_success(&format!("Purged {} cached verdicts", removed));
    } else {
        print_warning("Cache was already empty");
    }

    Ok(())
}

fn confirm_purge(args: &CachePurgeArgs) -> Result<bool> {
    let scope = match args.parse_kind() {
        Some(kind) => format!("all {} verdicts", kind),
        None => "ALL cached verdicts".to_string(),
    };
    print_warning(&format!(
        "This will delete {}; next scans will re-query the reputation service",
        scope
    ));

    loop {
        print!("Are you sure you want to continue? [y/N]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" | "" => return Ok(false),
            _ => {
                println!("Please enter 'y' for yes or 'n' for no");
                continue;
            }
        }
    }
}

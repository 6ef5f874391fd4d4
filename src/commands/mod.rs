// File: mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use colored::*;

use crate::cache::VerdictCache;
use crate::cli::{CacheCommands, ScanCommands};
use crate::enrich::ScanEnricher;

pub mod cache;
pub mod scan;

pub async fn handle_scan_command(cmd: &ScanCommands, enricher: &ScanEnricher) -> Result<()> {
    scan::execute(cmd, enricher).await
}

pub async fn handle_cache_command(cmd: &CacheCommands, cache: &VerdictCache) -> Result<()> {
    cache::execute(cmd, cache).await
}

fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

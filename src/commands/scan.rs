// File: scan.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::{Context, Result};
use colored::*;
use sha2::{Digest, Sha256};
use std::path::Path;

use super::{print_info, print_warning};
use crate::cli::ScanCommands;
use crate::enrich::ScanEnricher;
use crate::target::extract_urls;
use crate::verdict::Verdict;

pub async fn execute(cmd: &ScanCommands, enricher: &ScanEnricher) -> Result<()> {
    match cmd {
        ScanCommands::Url(args) => {
            let verdict = enricher.enrich_url_scan(&args.url).await?;
            render(&args.url, &verdict, &args.format)
        }
        ScanCommands::File(args) => {
            let hash = match &args.hash {
                Some(hash) => hash.to_ascii_lowercase(),
                None => hash_file(&args.path)?,
            };
            print_info(&format!("sha256: {}", hash));

            let verdict = enricher
                .enrich_file_scan(&hash, Some(&args.path), args.allow_upload)
                .await?;
            render(&args.path.display().to_string(), &verdict, &args.format)
        }
        ScanCommands::Message(args) => {
            let urls = extract_urls(&args.text);
            if urls.is_empty() {
                print_warning("No URLs found in message text");
                return Ok(());
            }

            for url in &urls {
                let verdict = enricher.enrich_url_scan(url).await?;
                render(url, &verdict, &args.format)?;
            }
            Ok(())
        }
    }
}

fn hash_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

fn render(target: &str, verdict: &Verdict, format: &str) -> Result<()> {
    if format.eq_ignore_ascii_case("json") {
        println!("{}", serde_json::to_string_pretty(verdict)?);
        return Ok(());
    }

    let headline = if verdict.is_error() {
        format!("{}: scan unavailable, delivered fail-open", target).yellow()
    } else if verdict.is_unknown() {
        format!("{}: unknown to the reputation service", target).yellow()
    } else if verdict.is_safe {
        format!("{}: clean ({}/{})", target, verdict.positives, verdict.total).green()
    } else {
        format!(
            "{}: {} detections ({} malicious, {} suspicious) of {}",
            target, verdict.positives, verdict.malicious, verdict.suspicious, verdict.total
        )
        .red()
        .bold()
    };
    println!("{}", headline);

    let mut annotations = vec![format!("source: {}", verdict.source)];
    if let Some(cached) = verdict.cached {
        annotations.push(format!("cached: {}", cached));
    }
    if let Some(ref scan_url) = verdict.scan_url {
        annotations.push(format!("report: {}", scan_url));
    }
    println!("  {}", annotations.join("  ").dimmed());

    if let Some(ref vendors) = verdict.vendors {
        let flagged: Vec<_> = vendors
            .iter()
            .filter(|f| f.category == "malicious" || f.category == "suspicious")
            .collect();

        if !flagged.is_empty() {
            println!("  {}", "flagged by:".bold());
            for finding in flagged {
                println!(
                    "    {:<24} {:<12} {}",
                    finding.vendor,
                    finding.category,
                    finding.result.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

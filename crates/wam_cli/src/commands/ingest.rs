//! Replay of a JSON-lines capture feed.
//!
//! Events of one transaction are routed to the same worker and replayed in
//! file order. Different transactions run concurrently, as they would when
//! delivered live by a proxy.

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;
use wam_core::CaptureEvent;

use super::open_repo;

/// Parses a capture feed. Blank lines and `#` comments are skipped.
fn parse_feed(content: &str) -> Result<Vec<CaptureEvent>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(n, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}: invalid event", n + 1))
        })
        .collect()
}

/// Splits events into per-worker queues, keeping each transaction on one queue.
fn shard(events: Vec<CaptureEvent>, workers: usize) -> Vec<Vec<CaptureEvent>> {
    let workers = workers.max(1);
    let mut queues: Vec<Vec<CaptureEvent>> = (0..workers).map(|_| Vec::new()).collect();
    for event in events {
        let mut hasher = DefaultHasher::new();
        event.tx_id().hash(&mut hasher);
        let slot = (hasher.finish() % workers as u64) as usize;
        queues[slot].push(event);
    }
    queues
}

/// Replay `file` into the repository in the current directory.
pub fn run(file: &Path, workers: Option<usize>) -> Result<()> {
    let repo = open_repo()?;
    let repository = repo.repository();

    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let events = parse_feed(&content)?;
    let total = events.len();

    let active = repository.active_project_name()?;
    if active.is_none() {
        println!(
            "{} No active project: requests will be stored but not grouped into pages.",
            style("⚠").yellow()
        );
    }
    let pages_before = match &active {
        Some(name) => repository.project(name)?.map(|p| p.pages.len()).unwrap_or(0),
        None => 0,
    };

    let workers = workers.unwrap_or(repo.config().capture.workers);
    info!(events = total, workers, file = %file.display(), "replaying capture");
    let queues = shard(events, workers);

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg:12} [{bar:40.cyan/blue}] {pos}/{len}")?
            .progress_chars("█▓▒░  "),
    );
    pb.set_message("replaying");

    let finalized = AtomicUsize::new(0);
    let dropped = AtomicUsize::new(0);

    std::thread::scope(|s| {
        for queue in queues.into_iter().filter(|q| !q.is_empty()) {
            let correlator = repo.correlator();
            let pb = pb.clone();
            let finalized = &finalized;
            let dropped = &dropped;
            s.spawn(move || {
                for event in queue {
                    let completes = matches!(event, CaptureEvent::Completed(_));
                    match correlator.dispatch(event) {
                        Some(_) => {
                            finalized.fetch_add(1, Ordering::Relaxed);
                        }
                        None if completes => {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                        None => {}
                    }
                    pb.inc(1);
                }
            });
        }
    });

    pb.finish_and_clear();

    let pages_after = match &active {
        Some(name) => repository.project(name)?.map(|p| p.pages.len()).unwrap_or(0),
        None => 0,
    };

    println!("{}", style("Ingest Report:").bold());
    println!("  Events replayed:    {}", style(total).cyan());
    println!(
        "  Requests finalized: {}",
        style(finalized.load(Ordering::Relaxed)).green()
    );
    let dropped = dropped.load(Ordering::Relaxed);
    println!(
        "  Transactions lost:  {}",
        if dropped > 0 {
            style(dropped).yellow()
        } else {
            style(dropped).green()
        }
    );
    if let Some(name) = active {
        println!(
            "  New pages in {}: {}",
            name,
            style(pages_after.saturating_sub(pages_before)).cyan()
        );
    }

    Ok(())
}

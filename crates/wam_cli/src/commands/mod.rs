//! CLI commands.

pub mod ingest;
pub mod init;
pub mod page;
pub mod project;
pub mod request;
pub mod status;

use anyhow::{anyhow, Result};
use chrono::DateTime;
use console::style;
use std::path::Path;
use std::sync::Arc;
use wam_core::{Config, Repository, WamError, WamRepo, WAM_DIR};

use crate::presenter::ConsolePresenter;

/// Filter directive from `.wam/config.toml`, or the default when there is
/// no readable repository here.
pub fn logging_filter() -> String {
    Config::load(&Path::new(".").join(WAM_DIR))
        .unwrap_or_default()
        .logging
        .filter
}

/// Opens the repository in the current directory with console notifications.
pub fn open_repo() -> Result<WamRepo> {
    let repo = WamRepo::open(".").map_err(explain)?;
    Ok(repo.with_presenter(Arc::new(ConsolePresenter)))
}

/// Resolves an explicit project name or falls back to the active project.
pub fn project_or_active(repo: &Repository, name: Option<&str>) -> Result<String> {
    match name {
        Some(name) => Ok(name.to_string()),
        None => repo
            .active_project_name()?
            .ok_or_else(|| explain(WamError::NoActiveProject)),
    }
}

/// Attaches the recovery suggestion, if any, to a core error.
pub fn explain(err: WamError) -> anyhow::Error {
    match err.recovery_suggestion() {
        Some(hint) => anyhow!("{}\n  {} {}", err, style("hint:").cyan(), hint),
        None => anyhow::Error::new(err),
    }
}

/// Renders Unix milliseconds as UTC wall time.
pub fn format_ms(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .unwrap_or_default()
        .format("%Y-%m-%d %H:%M:%S%.3f UTC")
        .to_string()
}

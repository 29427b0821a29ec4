//! Initialize a new WAM repository.

use anyhow::{Context, Result};
use wam_core::WamRepo;

use super::explain;

/// Initialize a new WAM repository in the current directory.
pub fn run() -> Result<()> {
    let repo = WamRepo::init(".")
        .map_err(explain)
        .context("Failed to initialize WAM repository")?;
    let config = repo.config();

    println!("Initialized WAM repository in .wam/");
    println!();
    println!("  .wam/config.toml       - Configuration");
    println!("  .wam/{:<17} - Capture database (gitignored)", config.storage.file);
    println!();
    println!("Next: create a project with 'wam project create <name>'");

    Ok(())
}

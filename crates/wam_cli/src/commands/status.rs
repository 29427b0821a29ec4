//! Repository summary.

use anyhow::Result;
use console::style;
use std::collections::BTreeMap;
use wam_core::KeyKind;

use super::open_repo;

/// Print projects, the active project and record counts per partition.
pub fn run() -> Result<()> {
    let repo = open_repo()?;
    let repository = repo.repository();

    let projects = repository.project_list()?;
    let active = repository.active_project_name()?;

    println!("{}", style("Repository:").bold());
    println!("  Backend:  {:?}", repo.config().storage.backend);
    println!("  Projects: {}", style(projects.len()).cyan());
    match &active {
        Some(name) => println!("  Active:   {}", style(name).green()),
        None => println!("  Active:   {}", style("(none)").dim()),
    }

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for key in repository.storage().keys()? {
        *counts.entry(key.kind().tag()).or_default() += 1;
    }

    println!();
    println!("{}", style("Records:").bold());
    for kind in [
        KeyKind::Project,
        KeyKind::Page,
        KeyKind::Request,
        KeyKind::Builder,
    ] {
        let count = counts.get(kind.tag()).copied().unwrap_or(0);
        println!("  {:<10} {}", kind.tag(), count);
    }

    let pending = counts.get(KeyKind::Builder.tag()).copied().unwrap_or(0);
    if pending > 0 {
        println!();
        println!(
            "{} {} transaction(s) never completed",
            style("⚠").yellow(),
            pending
        );
    }

    Ok(())
}

//! Page inspection and annotation.

use anyhow::Result;
use console::style;
use wam_core::WamError;

use super::{explain, format_ms, open_repo, project_or_active};
use crate::presenter::page_label;

pub fn list(project: Option<&str>) -> Result<()> {
    let repo = open_repo()?;
    let repository = repo.repository();
    let name = project_or_active(&repository, project)?;
    let pages = repository
        .pages(&name)?
        .ok_or_else(|| explain(WamError::ProjectNotFound(name.clone())))?;

    if pages.is_empty() {
        println!("No pages captured in {} yet.", name);
        return Ok(());
    }
    for page in pages {
        println!(
            "{} {}",
            style(format!("{:>4}", page.requests.len())).cyan(),
            page_label(&page)
        );
    }
    Ok(())
}

pub fn show(id: &str) -> Result<()> {
    let repo = open_repo()?;
    let repository = repo.repository();
    let page = repository
        .page(id)?
        .ok_or_else(|| explain(WamError::PageNotFound(id.to_string())))?;

    println!("{}", style(page_label(&page)).bold());
    if !page.notes.is_empty() {
        println!("  Notes: {}", page.notes);
    }

    let requests = repository.requests(id)?.unwrap_or_default();
    println!("  Requests: {}", requests.len());
    for request in requests {
        let marker = if request.custom {
            style("custom").magenta()
        } else {
            style("      ")
        };
        println!(
            "    {} {} {:>3} {:<7} {} {}",
            request.id,
            format_ms(request.timestamp_ms),
            request.response.status_code,
            request.method,
            request.destination,
            marker
        );
    }
    Ok(())
}

pub fn update(id: &str, nickname: Option<String>, notes: Option<String>) -> Result<()> {
    let repo = open_repo()?;
    let repository = repo.repository();
    let mut page = repository
        .page(id)?
        .ok_or_else(|| explain(WamError::PageNotFound(id.to_string())))?;

    if let Some(nickname) = nickname {
        page.nickname = nickname;
    }
    if let Some(notes) = notes {
        page.notes = notes;
    }
    let saved = repository.update_page(&page).map_err(explain)?;

    println!("{} Updated {}", style("✓").green(), page_label(&saved));
    Ok(())
}

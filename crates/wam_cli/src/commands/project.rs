//! Project management commands.

use anyhow::Result;
use console::style;
use wam_core::{Project, WamError};

use super::{explain, open_repo, project_or_active};

pub fn create(name: &str, scope: Vec<String>) -> Result<()> {
    let repo = open_repo()?;
    let project = repo
        .repository()
        .create_project(Project::new(name, scope))
        .map_err(explain)?;

    println!("{} Created project {}", style("✓").green(), project.name);
    for pattern in &project.scope {
        println!("  scope: {}", pattern);
    }
    Ok(())
}

pub fn list() -> Result<()> {
    let repo = open_repo()?;
    let repository = repo.repository();
    let active = repository.active_project_name()?;
    let names = repository.project_list()?;

    if names.is_empty() {
        println!("No projects. Use 'wam project create <name>' to start one.");
        return Ok(());
    }

    for name in names {
        let pages = repository
            .project(&name)?
            .map(|p| p.pages.len())
            .unwrap_or(0);
        let marker = if active.as_deref() == Some(name.as_str()) {
            style("*").green()
        } else {
            style(" ")
        };
        println!("{} {:<30} {:>5} page(s)", marker, name, pages);
    }
    Ok(())
}

pub fn show(name: Option<&str>) -> Result<()> {
    let repo = open_repo()?;
    let repository = repo.repository();
    let name = project_or_active(&repository, name)?;
    let project = repository
        .project(&name)?
        .ok_or_else(|| explain(WamError::ProjectNotFound(name.clone())))?;

    println!("{}", style(&project.name).bold());
    if project.scope.is_empty() {
        println!("  Scope: {}", style("(everything)").dim());
    } else {
        println!("  Scope:");
        for pattern in &project.scope {
            println!("    {}", pattern);
        }
    }
    if !project.notes.is_empty() {
        println!("  Notes: {}", project.notes);
    }
    println!("  Pages: {}", project.pages.len());
    for page in repository.pages(&project.name)?.unwrap_or_default() {
        println!(
            "    {} {}",
            style(format!("{:>4}", page.requests.len())).cyan(),
            crate::presenter::page_label(&page)
        );
    }
    Ok(())
}

pub fn update(name: &str, scope: Vec<String>, notes: Option<String>) -> Result<()> {
    let repo = open_repo()?;
    let repository = repo.repository();
    let mut project = repository
        .project(name)?
        .ok_or_else(|| explain(WamError::ProjectNotFound(name.to_string())))?;

    if !scope.is_empty() {
        project.scope = scope;
    }
    if let Some(notes) = notes {
        project.notes = notes;
    }
    let saved = repository.update_project(&project).map_err(explain)?;

    println!("{} Updated project {}", style("✓").green(), saved.name);
    Ok(())
}

pub fn activate(name: &str) -> Result<()> {
    let repo = open_repo()?;
    if repo.repository().set_active_project(name)?.is_none() {
        return Err(explain(WamError::ProjectNotFound(name.to_string())));
    }
    Ok(())
}

//! Console notifications for repository changes.

use console::style;
use wam_core::{Page, Presenter, Project};

/// Prints change notifications to stderr so stdout stays parseable.
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn page_added(&self, project: &str, page_id: &str) {
        eprintln!(
            "{} new page {} in {}",
            style("+").green(),
            style(page_id).cyan(),
            project
        );
    }

    fn project_activated(&self, project: &Project) {
        eprintln!(
            "{} capturing into {}",
            style("→").cyan(),
            style(&project.name).bold()
        );
    }
}

/// Nickname with the URL, or just the URL.
pub fn page_label(page: &Page) -> String {
    if page.nickname.is_empty() {
        page.id.clone()
    } else {
        format!("{} ({})", page.nickname, page.id)
    }
}

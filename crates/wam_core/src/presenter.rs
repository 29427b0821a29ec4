//! Callbacks into the presentation layer.

use crate::types::{Page, Project};

/// Receives explicit notifications when records the UI shows have changed.
///
/// Calls happen after the change is persisted, sometimes while a named lock is
/// held, so implementations must not call back into the repository.
pub trait Presenter: Send + Sync {
    /// A page was created and registered under `project`.
    fn page_added(&self, _project: &str, _page_id: &str) {}

    /// `project` became the active project.
    fn project_activated(&self, _project: &Project) {}

    /// A project record was saved.
    fn project_saved(&self, _project: &Project) {}

    /// A page record was saved by a user edit.
    fn page_saved(&self, _page: &Page) {}
}

/// Presenter that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPresenter;

impl Presenter for NoopPresenter {}

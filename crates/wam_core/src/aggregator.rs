//! Attaches finalized requests to pages and pages to projects.

use crate::error::{Result, WamError};
use crate::keys::StoreKey;
use crate::repository::Repository;
use crate::types::{Page, Project, Request, RequestId};
use std::collections::HashMap;
use tracing::debug;

/// What a single [`Aggregator::attach`] changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AttachReport {
    /// The page record did not exist and was created.
    pub page_created: bool,
    /// The page id was appended to the project's page list.
    pub page_registered: bool,
    /// Older organic duplicates removed from the page and deleted.
    pub replaced: Vec<RequestId>,
    /// Listed ids whose request record no longer exists.
    pub pruned: Vec<RequestId>,
}

/// Groups finalized requests into pages.
#[derive(Clone)]
pub struct Aggregator {
    repo: Repository,
}

impl Aggregator {
    /// Creates an aggregator writing through `repo`.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Attaches `request_id` to page `page_id` and registers the page under
    /// `project_name`.
    ///
    /// Runs under the page's lock, taking the project lock inside it when the
    /// project's page list must grow. Re-running with the same arguments
    /// converges to the same state.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if the request isn't saved, `ProjectNotFound`
    /// if the project doesn't exist, or any storage error. A failed attach
    /// may leave the project listing the page before the page exists; a retry
    /// completes it.
    pub fn attach(
        &self,
        page_id: &str,
        request_id: RequestId,
        project_name: &str,
    ) -> Result<AttachReport> {
        let storage = self.repo.storage();
        let _page_guard = self.repo.locks().page(page_id);

        let incoming = self
            .repo
            .request(request_id)?
            .ok_or_else(|| WamError::RequestNotFound(request_id.to_string()))?;

        let page_key = StoreKey::Page(page_id.to_string());
        let existing: Option<Page> = storage.get(&page_key)?;

        let mut report = AttachReport {
            page_registered: self.register_page(project_name, page_id)?,
            ..AttachReport::default()
        };

        let page = match existing {
            None => {
                report.page_created = true;
                Page::new(page_id, request_id)
            }
            Some(mut page) => {
                let kept = self.deduplicate(&page, &incoming, &mut report)?;
                page.requests = kept;
                page.requests.push(request_id);
                page
            }
        };
        storage.put(&page_key, &page)?;

        if !report.replaced.is_empty() {
            let doomed: Vec<StoreKey> = report
                .replaced
                .iter()
                .map(|id| StoreKey::Request(*id))
                .collect();
            storage.delete_many(&doomed)?;
        }

        debug!(
            page = page_id,
            request = %request_id,
            created = report.page_created,
            replaced = report.replaced.len(),
            pruned = report.pruned.len(),
            "request attached"
        );

        if report.page_registered {
            self.repo.presenter().page_added(project_name, page_id);
        }
        Ok(report)
    }

    /// Single filtering pass over the page's request list.
    ///
    /// Keeps an entry iff it is not the incoming request itself, its record
    /// still exists, and it is not an organic duplicate of the incoming one.
    fn deduplicate(
        &self,
        page: &Page,
        incoming: &Request,
        report: &mut AttachReport,
    ) -> Result<Vec<RequestId>> {
        let keys: Vec<StoreKey> = page
            .requests
            .iter()
            .filter(|id| **id != incoming.id)
            .map(|id| StoreKey::Request(*id))
            .collect();
        let existing: HashMap<StoreKey, Request> = self.repo.storage().get_many(&keys)?;

        let mut kept = Vec::with_capacity(page.requests.len());
        for id in &page.requests {
            if *id == incoming.id {
                continue;
            }
            match existing.get(&StoreKey::Request(*id)) {
                None => report.pruned.push(*id),
                Some(old) if old.is_duplicate_of(incoming) => report.replaced.push(*id),
                Some(_) => kept.push(*id),
            }
        }
        Ok(kept)
    }

    /// Appends `page_id` to the project's page list unless already there.
    ///
    /// Returns whether the list changed.
    fn register_page(&self, project_name: &str, page_id: &str) -> Result<bool> {
        let storage = self.repo.storage();
        let key = StoreKey::Project(project_name.to_string());

        let listed = |project: &Project| project.pages.iter().any(|p| p == page_id);

        // Unlocked fast path: pages are never removed from a project.
        if let Some(project) = storage.get::<Project>(&key)? {
            if listed(&project) {
                return Ok(false);
            }
        }

        let _project_guard = self.repo.locks().projects();
        let mut project: Project = storage
            .get(&key)?
            .ok_or_else(|| WamError::ProjectNotFound(project_name.to_string()))?;
        if listed(&project) {
            return Ok(false);
        }
        project.pages.push(page_id.to_string());
        storage.put(&key, &project)?;
        Ok(true)
    }
}

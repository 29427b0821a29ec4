//! Project, page and request accessors.
//!
//! Reads are unlocked snapshots. Every read-modify-write of a project or page
//! runs under the matching named lock so user edits and in-flight attaches
//! can't lose each other's updates.

use crate::error::{Result, WamError};
use crate::keys::StoreKey;
use crate::locks::NamedLocks;
use crate::presenter::Presenter;
use crate::storage::Storage;
use crate::types::{Page, Project, Request, RequestId};
use std::sync::Arc;
use tracing::debug;

/// CRUD surface shared by the aggregator and the presentation layer.
#[derive(Clone)]
pub struct Repository {
    storage: Storage,
    locks: Arc<NamedLocks>,
    presenter: Arc<dyn Presenter>,
}

impl Repository {
    /// Creates a repository over `storage`, sharing `locks` with every other
    /// component that mutates the same store.
    pub fn new(storage: Storage, locks: Arc<NamedLocks>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            storage,
            locks,
            presenter,
        }
    }

    /// Typed storage handle.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub(crate) fn locks(&self) -> &NamedLocks {
        &self.locks
    }

    pub(crate) fn presenter(&self) -> &dyn Presenter {
        self.presenter.as_ref()
    }

    // ===== Singletons =====

    /// Names of all projects in creation order.
    pub fn project_list(&self) -> Result<Vec<String>> {
        Ok(self
            .storage
            .get::<Vec<String>>(&StoreKey::ProjectList)?
            .unwrap_or_default())
    }

    /// Name of the active project, if one was ever set.
    pub fn active_project_name(&self) -> Result<Option<String>> {
        self.storage.get(&StoreKey::ActiveProject)
    }

    /// The active project record.
    pub fn active_project(&self) -> Result<Option<Project>> {
        let Some(name) = self.active_project_name()? else {
            debug!("no active project set");
            return Ok(None);
        };
        self.project(&name)
    }

    /// Makes `name` the active project.
    ///
    /// Returns `None` and changes nothing if the project doesn't exist.
    pub fn set_active_project(&self, name: &str) -> Result<Option<Project>> {
        let Some(project) = self.project(name)? else {
            return Ok(None);
        };
        self.storage
            .put(&StoreKey::ActiveProject, &project.name)?;
        self.presenter.project_activated(&project);
        Ok(Some(project))
    }

    // ===== Projects =====

    /// Loads a project by name.
    pub fn project(&self, name: &str) -> Result<Option<Project>> {
        self.storage.get(&StoreKey::Project(name.to_string()))
    }

    /// Registers a new project and makes it active.
    ///
    /// The stored page list always starts empty, whatever `project.pages` holds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProjectName` for a blank name and `ProjectNameTaken` if
    /// a project with this name exists. Neither changes any stored state.
    pub fn create_project(&self, project: Project) -> Result<Project> {
        if project.name.trim().is_empty() {
            return Err(WamError::InvalidProjectName(project.name));
        }

        let project = Project {
            pages: Vec::new(),
            ..project
        };
        let key = StoreKey::Project(project.name.clone());

        {
            let _guard = self.locks.projects();

            if self.storage.get::<Project>(&key)?.is_some() {
                return Err(WamError::ProjectNameTaken(project.name));
            }

            let mut list = self.project_list()?;
            if !list.contains(&project.name) {
                list.push(project.name.clone());
            }
            self.storage.put(&StoreKey::ProjectList, &list)?;
            self.storage.put(&key, &project)?;
            self.storage
                .put(&StoreKey::ActiveProject, &project.name)?;
        }

        debug!(project = %project.name, "project created");
        self.presenter.project_saved(&project);
        self.presenter.project_activated(&project);
        Ok(project)
    }

    /// Replaces a project's scope and notes. The page list is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if no project has this name.
    pub fn update_project(&self, project: &Project) -> Result<Project> {
        let key = StoreKey::Project(project.name.clone());

        let stored = {
            let _guard = self.locks.projects();

            let mut stored: Project = self
                .storage
                .get(&key)?
                .ok_or_else(|| WamError::ProjectNotFound(project.name.clone()))?;
            stored.scope = project.scope.clone();
            stored.notes = project.notes.clone();
            self.storage.put(&key, &stored)?;
            stored
        };

        self.presenter.project_saved(&stored);
        Ok(stored)
    }

    /// Pages registered under a project, in registration order.
    ///
    /// Returns `None` if the project doesn't exist. Page ids without a record
    /// are skipped.
    pub fn pages(&self, project_name: &str) -> Result<Option<Vec<Page>>> {
        let Some(project) = self.project(project_name)? else {
            return Ok(None);
        };

        let keys: Vec<StoreKey> = project
            .pages
            .iter()
            .map(|id| StoreKey::Page(id.clone()))
            .collect();
        let mut found = self.storage.get_many::<Page>(&keys)?;

        Ok(Some(keys.iter().filter_map(|k| found.remove(k)).collect()))
    }

    // ===== Pages =====

    /// Loads a page by URL.
    pub fn page(&self, id: &str) -> Result<Option<Page>> {
        self.storage.get(&StoreKey::Page(id.to_string()))
    }

    /// Replaces a page's nickname and notes. The request list is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `PageNotFound` if no page has this id.
    pub fn update_page(&self, page: &Page) -> Result<Page> {
        let key = StoreKey::Page(page.id.clone());

        let stored = {
            let _guard = self.locks.page(&page.id);

            let mut stored: Page = self
                .storage
                .get(&key)?
                .ok_or_else(|| WamError::PageNotFound(page.id.clone()))?;
            stored.nickname = page.nickname.clone();
            stored.notes = page.notes.clone();
            self.storage.put(&key, &stored)?;
            stored
        };

        self.presenter.page_saved(&stored);
        Ok(stored)
    }

    /// Requests listed on a page, in attach order.
    ///
    /// Returns `None` if the page doesn't exist. Ids without a record are
    /// skipped.
    pub fn requests(&self, page_id: &str) -> Result<Option<Vec<Request>>> {
        let Some(page) = self.page(page_id)? else {
            return Ok(None);
        };

        let keys: Vec<StoreKey> = page.requests.iter().map(|id| StoreKey::Request(*id)).collect();
        let mut found = self.storage.get_many::<Request>(&keys)?;

        Ok(Some(keys.iter().filter_map(|k| found.remove(k)).collect()))
    }

    // ===== Requests =====

    /// Loads a finalized request.
    pub fn request(&self, id: RequestId) -> Result<Option<Request>> {
        self.storage.get(&StoreKey::Request(id))
    }

    pub(crate) fn save_request(&self, request: &Request) -> Result<()> {
        self.storage.put(&StoreKey::Request(request.id), request)
    }
}

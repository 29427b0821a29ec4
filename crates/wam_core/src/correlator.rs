//! Assembles finalized requests from the three lifecycle phases.
//!
//! The event source delivers start, headers and completed callbacks for a
//! transaction in that order and never overlaps them. Different transactions
//! may interleave freely. Entry points never fail from the caller's point of
//! view: errors are logged and the transaction is dropped.

use crate::aggregator::Aggregator;
use crate::error::{Result, WamError};
use crate::keys::StoreKey;
use crate::repository::Repository;
use crate::types::{
    CaptureEvent, CompletedEvent, CustomEdit, HeadersEvent, Request, RequestBuilder, RequestId,
    StartEvent,
};
use crate::{IdGenerator, TimeProvider};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Turns lifecycle callbacks into finalized, attached requests.
#[derive(Clone)]
pub struct Correlator {
    repo: Repository,
    aggregator: Aggregator,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn TimeProvider>,
}

impl Correlator {
    /// Creates a correlator. `ids` mints permanent request ids, `clock`
    /// timestamps custom requests in Unix milliseconds.
    pub fn new(
        repo: Repository,
        aggregator: Aggregator,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            repo,
            aggregator,
            ids,
            clock,
        }
    }

    /// Routes any lifecycle event to its entry point.
    pub fn dispatch(&self, event: CaptureEvent) -> Option<RequestId> {
        match event {
            CaptureEvent::Started(e) => {
                self.on_request_started(e);
                None
            }
            CaptureEvent::Headers(e) => {
                self.on_headers_ready(e);
                None
            }
            CaptureEvent::Completed(e) => self.on_completed(e),
        }
    }

    /// Start phase: stores a new builder keyed by the transaction id.
    pub fn on_request_started(&self, event: StartEvent) {
        let tx_id = event.tx_id.clone();
        match self.start(event) {
            Ok(id) => debug!(tx = %tx_id, request = %id, "request started"),
            Err(e) => log_dropped(&tx_id, "started", &e),
        }
    }

    /// Headers phase: merges the final request headers into the builder.
    pub fn on_headers_ready(&self, event: HeadersEvent) {
        let tx_id = event.tx_id.clone();
        if let Err(e) = self.merge_headers(event) {
            log_dropped(&tx_id, "headers", &e);
        }
    }

    /// Completed phase: finalizes the request, persists it, drops the builder
    /// and attaches the request to its destination and source pages in the
    /// active project.
    ///
    /// Returns the finalized id, or `None` if the transaction was dropped.
    pub fn on_completed(&self, event: CompletedEvent) -> Option<RequestId> {
        let tx_id = event.tx_id.clone();
        let request = match self.finalize(event) {
            Ok(request) => request,
            Err(e) => {
                log_dropped(&tx_id, "completed", &e);
                return None;
            }
        };

        match self.repo.active_project_name() {
            Ok(Some(project)) => self.attach_everywhere(&request, &project),
            Ok(None) => error!(
                request = %request.id,
                "request completed while capturing but no project is active"
            ),
            Err(e) => error!(request = %request.id, error = %e, "failed to read active project"),
        }
        Some(request.id)
    }

    /// Derives a user-modified copy of a captured request and attaches it to
    /// the active project. Custom requests are never deduplicated.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` for an unknown `base`, `NoActiveProject` if
    /// nothing is capturing, or the first attach/storage failure.
    pub fn record_custom(&self, base: RequestId, edit: CustomEdit) -> Result<Request> {
        let captured = self
            .repo
            .request(base)?
            .ok_or_else(|| WamError::RequestNotFound(base.to_string()))?;
        let project = self
            .repo
            .active_project_name()?
            .ok_or(WamError::NoActiveProject)?;

        let request = Request {
            id: self.ids.next_id(),
            method: edit.method.unwrap_or(captured.method),
            destination: edit.destination.unwrap_or(captured.destination),
            request_headers: edit.request_headers.unwrap_or(captured.request_headers),
            timestamp_ms: self.clock.now_ms(),
            custom: true,
            ..captured
        };
        self.repo.save_request(&request)?;

        for page_id in unique_pages(&request) {
            self.aggregator.attach(page_id, request.id, &project)?;
        }
        debug!(request = %request.id, base = %base, "custom request recorded");
        Ok(request)
    }

    fn start(&self, event: StartEvent) -> Result<RequestId> {
        let key = StoreKey::Builder(event.tx_id.clone());
        let builder = RequestBuilder::start(self.ids.next_id(), event);
        self.repo.storage().put(&key, &builder)?;
        Ok(builder.id)
    }

    fn merge_headers(&self, event: HeadersEvent) -> Result<()> {
        let key = StoreKey::Builder(event.tx_id.clone());
        let mut builder = self.load_builder(&key, &event.tx_id)?;
        builder.request_headers = Some(event.headers);
        self.repo.storage().put(&key, &builder)
    }

    fn finalize(&self, event: CompletedEvent) -> Result<Request> {
        let key = StoreKey::Builder(event.tx_id.clone());
        let builder = self.load_builder(&key, &event.tx_id)?;
        let request = builder.finalize(event.into_response());

        self.repo.save_request(&request)?;
        // Only drop the transient record once the permanent one is stored.
        // A stale builder is harmless, so its removal never blocks attaching.
        if let Err(e) = self.repo.storage().delete_many(&[key]) {
            warn!(request = %request.id, error = %e, "failed to remove builder");
        }
        Ok(request)
    }

    fn load_builder(&self, key: &StoreKey, tx_id: &str) -> Result<RequestBuilder> {
        self.repo
            .storage()
            .get(key)?
            .ok_or_else(|| WamError::MissingBuilder(tx_id.to_string()))
    }

    fn attach_everywhere(&self, request: &Request, project: &str) {
        for page_id in unique_pages(request) {
            if let Err(e) = self.aggregator.attach(page_id, request.id, project) {
                error!(
                    request = %request.id,
                    page = page_id,
                    error = %e,
                    "failed to attach request to page"
                );
            }
        }
    }
}

/// Destination then source, skipping a source equal to the destination.
fn unique_pages(request: &Request) -> impl Iterator<Item = &str> {
    let destination = request.destination.as_str();
    request
        .page_ids()
        .enumerate()
        .filter(move |(i, id)| *i == 0 || *id != destination)
        .map(|(_, id)| id)
}

fn log_dropped(tx_id: &str, phase: &str, err: &WamError) {
    match err {
        WamError::MissingBuilder(_) => {
            warn!(tx = tx_id, phase, "no builder for transaction, event dropped")
        }
        other => error!(tx = tx_id, phase, error = %other, "transaction dropped"),
    }
}

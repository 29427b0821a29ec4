//! WAM Core Library
//!
//! Storage and aggregation engine for a web application mapper:
//! - Correlates the start, headers and completed phases of captured HTTP
//!   transactions into finalized requests
//! - Groups requests into pages and pages into projects
//! - Collapses organic repeat visits so a page keeps the latest copy
//! - Persists everything in a partitioned key-value store
//!
//! # Quick Start
//!
//! ```
//! use wam_core::{CaptureEvent, CompletedEvent, Project, StartEvent, WamRepo};
//!
//! let repo = WamRepo::in_memory();
//! repo.repository()
//!     .create_project(Project::new("shop", vec!["https://shop.test/".into()]))
//!     .unwrap();
//!
//! let correlator = repo.correlator();
//! correlator.dispatch(CaptureEvent::Started(StartEvent {
//!     tx_id: "1".into(),
//!     url: "https://shop.test/cart".into(),
//!     initiator: Some("https://shop.test/".into()),
//!     method: "GET".into(),
//!     timestamp_ms: 0,
//!     body_size: None,
//! }));
//! let id = correlator
//!     .dispatch(CaptureEvent::Completed(CompletedEvent {
//!         tx_id: "1".into(),
//!         status_code: 200,
//!         status_line: "HTTP/1.1 200 OK".into(),
//!         headers: vec![],
//!         request_size: 0,
//!         response_size: 0,
//!     }))
//!     .unwrap();
//!
//! let page = repo.repository().page("https://shop.test/cart").unwrap().unwrap();
//! assert_eq!(page.requests, vec![id]);
//! ```
//!
//! # Features
//!
//! ## Deduplication
//!
//! A page holds at most one organic request per method and destination. The
//! newest one wins and the older records are deleted. Custom requests are
//! always kept:
//!
//! ```
//! use wam_core::Request;
//!
//! # fn req(custom: bool) -> Request {
//! #     serde_json::from_value(serde_json::json!({
//! #         "id": "00000000-0000-0000-0000-000000000001",
//! #         "destination": "https://a/", "source": null, "method": "GET",
//! #         "timestamp_ms": 0, "body_size": null,
//! #         "response": {"status_code": 200, "status_line": "", "headers": [],
//! #                      "request_size": 0, "response_size": 0},
//! #         "custom": custom
//! #     })).unwrap()
//! # }
//! assert!(req(false).is_duplicate_of(&req(false)));
//! assert!(!req(true).is_duplicate_of(&req(false)));
//! ```

mod aggregator;
mod config;
mod correlator;
mod error;
mod keys;
mod locks;
mod presenter;
mod redb_store;
mod repo;
mod repository;
mod storage;
mod store;
mod types;

pub use aggregator::{Aggregator, AttachReport};
pub use config::{Backend, CaptureConfig, Config, LoggingConfig, StorageConfig, CONFIG_FILE};
pub use correlator::Correlator;
pub use error::{Result, WamError};
pub use keys::{KeyKind, StoreKey};
pub use locks::{LockName, NamedLockGuard, NamedLocks};
pub use presenter::{NoopPresenter, Presenter};
pub use redb_store::RedbStore;
pub use repo::{WamRepo, WAM_DIR};
pub use repository::Repository;
pub use storage::Storage;
pub use store::{KvStore, MemoryStore};
pub use types::*;

/// Time provider trait for testing.
///
/// Allows injecting controlled time wherever the engine stamps a record
/// itself. Captured requests carry the event source's own timestamp.
pub trait TimeProvider: Send + Sync {
    /// Returns the current Unix timestamp in milliseconds.
    fn now_ms(&self) -> i64;
}

impl<F> TimeProvider for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn now_ms(&self) -> i64 {
        self()
    }
}

/// Wall-clock [`TimeProvider`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl TimeProvider for SystemClock {
    fn now_ms(&self) -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Source of permanent request ids.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh id, never handed out before.
    fn next_id(&self) -> RequestId;
}

impl<F> IdGenerator for F
where
    F: Fn() -> RequestId + Send + Sync,
{
    fn next_id(&self) -> RequestId {
        self()
    }
}

/// Random v4 UUID ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> RequestId {
        RequestId::from_uuid(uuid::Uuid::new_v4())
    }
}

//! Record and event types shared by the correlator, aggregator and repository.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Permanent identifier of a request, minted when its transaction starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Wraps an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parses the hyphenated textual form.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single HTTP header as reported by the event source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name, as sent.
    pub name: String,
    /// Header value. Sources may omit values they cannot represent as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Header {
    /// Creates a header with a text value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// A user-defined capture scope with its aggregated pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique name, also the record's primary key.
    pub name: String,
    /// URL match patterns handed to the event source.
    #[serde(default)]
    pub scope: Vec<String>,
    /// Page ids in first-seen order. Never contains duplicates.
    #[serde(default)]
    pub pages: Vec<String>,
    /// Free-form user notes.
    #[serde(default)]
    pub notes: String,
}

impl Project {
    /// Creates an empty project with the given scope.
    pub fn new(name: impl Into<String>, scope: Vec<String>) -> Self {
        Self {
            name: name.into(),
            scope,
            pages: Vec::new(),
            notes: String::new(),
        }
    }
}

/// All requests observed for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// The page URL, also the record's primary key.
    pub id: String,
    /// User-assigned display name.
    #[serde(default)]
    pub nickname: String,
    /// Request ids in attach order.
    #[serde(default)]
    pub requests: Vec<RequestId>,
    /// Free-form user notes.
    #[serde(default)]
    pub notes: String,
}

impl Page {
    /// Creates a page holding a single request.
    pub fn new(id: impl Into<String>, first_request: RequestId) -> Self {
        Self {
            id: id.into(),
            nickname: String::new(),
            requests: vec![first_request],
            notes: String::new(),
        }
    }
}

/// Final response metadata merged in by the completed phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// HTTP status code.
    pub status_code: u16,
    /// Raw status line, e.g. `HTTP/1.1 200 OK`.
    pub status_line: String,
    /// Response headers.
    #[serde(default)]
    pub headers: Vec<Header>,
    /// Bytes sent, headers included.
    pub request_size: u64,
    /// Bytes received, headers included.
    pub response_size: u64,
}

/// An in-progress request, keyed by its transaction id until it completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBuilder {
    /// Permanent id the finalized request will carry.
    pub id: RequestId,
    /// Transient transaction id from the event source.
    pub tx_id: String,
    /// Target URL.
    pub destination: String,
    /// URL of the document that initiated the request, if any.
    pub source: Option<String>,
    /// HTTP method.
    pub method: String,
    /// Start time in Unix milliseconds.
    pub timestamp_ms: i64,
    /// Request body size hint from the start phase.
    pub body_size: Option<u64>,
    /// Request headers, once the headers phase has been observed.
    pub request_headers: Option<Vec<Header>>,
}

impl RequestBuilder {
    /// Starts a builder from a start event.
    pub fn start(id: RequestId, event: StartEvent) -> Self {
        Self {
            id,
            tx_id: event.tx_id,
            destination: event.url,
            source: event.initiator,
            method: event.method,
            timestamp_ms: event.timestamp_ms,
            body_size: event.body_size,
            request_headers: None,
        }
    }

    /// Merges response metadata and produces the finalized, organic request.
    pub fn finalize(self, response: ResponseMeta) -> Request {
        Request {
            id: self.id,
            destination: self.destination,
            source: self.source,
            method: self.method,
            timestamp_ms: self.timestamp_ms,
            body_size: self.body_size,
            request_headers: self.request_headers.unwrap_or_default(),
            response,
            custom: false,
        }
    }
}

/// A finalized request. Immutable once saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Permanent id.
    pub id: RequestId,
    /// Target URL.
    pub destination: String,
    /// Initiating document URL, if any.
    pub source: Option<String>,
    /// HTTP method.
    pub method: String,
    /// Start time in Unix milliseconds.
    pub timestamp_ms: i64,
    /// Request body size hint.
    pub body_size: Option<u64>,
    /// Request headers.
    #[serde(default)]
    pub request_headers: Vec<Header>,
    /// Response metadata.
    pub response: ResponseMeta,
    /// Set for user-modified or replayed requests, which are never deduplicated.
    #[serde(default)]
    pub custom: bool,
}

impl Request {
    /// True when `other` is an organic repeat of this request.
    pub fn is_duplicate_of(&self, other: &Request) -> bool {
        !self.custom
            && !other.custom
            && self.method == other.method
            && self.destination == other.destination
    }

    /// The pages this request is attached to: destination first, then source.
    pub fn page_ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.destination.as_str()).chain(self.source.as_deref())
    }
}

/// Edits applied when deriving a custom request from a captured one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomEdit {
    /// Replacement method.
    pub method: Option<String>,
    /// Replacement destination URL.
    pub destination: Option<String>,
    /// Replacement request headers.
    pub request_headers: Option<Vec<Header>>,
}

/// Start phase of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartEvent {
    /// Transient transaction id.
    pub tx_id: String,
    /// Target URL.
    pub url: String,
    /// Initiating document URL.
    #[serde(default)]
    pub initiator: Option<String>,
    /// HTTP method.
    pub method: String,
    /// Start time in Unix milliseconds.
    pub timestamp_ms: i64,
    /// Request body size hint.
    #[serde(default)]
    pub body_size: Option<u64>,
}

/// Headers phase of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadersEvent {
    /// Transient transaction id.
    pub tx_id: String,
    /// Request headers as finally sent.
    #[serde(default)]
    pub headers: Vec<Header>,
}

/// Completed phase of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedEvent {
    /// Transient transaction id.
    pub tx_id: String,
    /// HTTP status code.
    pub status_code: u16,
    /// Raw status line.
    #[serde(default)]
    pub status_line: String,
    /// Response headers.
    #[serde(default)]
    pub headers: Vec<Header>,
    /// Bytes sent.
    #[serde(default)]
    pub request_size: u64,
    /// Bytes received.
    #[serde(default)]
    pub response_size: u64,
}

impl CompletedEvent {
    /// Splits off the response metadata.
    pub fn into_response(self) -> ResponseMeta {
        ResponseMeta {
            status_code: self.status_code,
            status_line: self.status_line,
            headers: self.headers,
            request_size: self.request_size,
            response_size: self.response_size,
        }
    }
}

/// Any lifecycle notification, as found in a JSON-lines capture feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum CaptureEvent {
    /// See [`StartEvent`].
    Started(StartEvent),
    /// See [`HeadersEvent`].
    Headers(HeadersEvent),
    /// See [`CompletedEvent`].
    Completed(CompletedEvent),
}

impl CaptureEvent {
    /// Transaction id shared by all phases of one transaction.
    pub fn tx_id(&self) -> &str {
        match self {
            Self::Started(e) => &e.tx_id,
            Self::Headers(e) => &e.tx_id,
            Self::Completed(e) => &e.tx_id,
        }
    }
}

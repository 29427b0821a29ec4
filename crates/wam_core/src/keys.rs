//! Storage keys, partitioned by record kind.
//!
//! Every key is `<tag>\0<identifier>`. Tags are fixed and distinct, so a
//! project named like a page URL, a reserved singleton or a transaction id
//! still maps to its own key.

use crate::types::RequestId;
use std::fmt;

const SEPARATOR: char = '\0';

/// Kind tag of a storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Singletons (`project_list`, `active_project`).
    Meta,
    /// Project records, by name.
    Project,
    /// Page records, by URL.
    Page,
    /// In-progress request builders, by transaction id.
    Builder,
    /// Finalized requests, by permanent id.
    Request,
}

impl KeyKind {
    /// Partition tag used in the encoded key.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Meta => "meta",
            Self::Project => "project",
            Self::Page => "page",
            Self::Builder => "builder",
            Self::Request => "request",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "meta" => Some(Self::Meta),
            "project" => Some(Self::Project),
            "page" => Some(Self::Page),
            "builder" => Some(Self::Builder),
            "request" => Some(Self::Request),
            _ => None,
        }
    }
}

/// A typed storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Ordered list of project names.
    ProjectList,
    /// Name of the project receiving captured traffic.
    ActiveProject,
    /// A project record.
    Project(String),
    /// A page record.
    Page(String),
    /// An in-progress request builder.
    Builder(String),
    /// A finalized request.
    Request(RequestId),
}

impl StoreKey {
    /// Record kind of this key.
    pub fn kind(&self) -> KeyKind {
        match self {
            Self::ProjectList | Self::ActiveProject => KeyKind::Meta,
            Self::Project(_) => KeyKind::Project,
            Self::Page(_) => KeyKind::Page,
            Self::Builder(_) => KeyKind::Builder,
            Self::Request(_) => KeyKind::Request,
        }
    }

    /// Encodes the key for the underlying store.
    pub fn encode(&self) -> String {
        let tag = self.kind().tag();
        match self {
            Self::ProjectList => format!("{tag}{SEPARATOR}project_list"),
            Self::ActiveProject => format!("{tag}{SEPARATOR}active_project"),
            Self::Project(name) => format!("{tag}{SEPARATOR}{name}"),
            Self::Page(url) => format!("{tag}{SEPARATOR}{url}"),
            Self::Builder(tx_id) => format!("{tag}{SEPARATOR}{tx_id}"),
            Self::Request(id) => format!("{tag}{SEPARATOR}{id}"),
        }
    }

    /// Decodes a raw key. Returns `None` for keys this crate never writes.
    pub fn decode(raw: &str) -> Option<Self> {
        let (tag, rest) = raw.split_once(SEPARATOR)?;
        match KeyKind::from_tag(tag)? {
            KeyKind::Meta => match rest {
                "project_list" => Some(Self::ProjectList),
                "active_project" => Some(Self::ActiveProject),
                _ => None,
            },
            KeyKind::Project => Some(Self::Project(rest.to_string())),
            KeyKind::Page => Some(Self::Page(rest.to_string())),
            KeyKind::Builder => Some(Self::Builder(rest.to_string())),
            KeyKind::Request => RequestId::parse(rest).map(Self::Request),
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProjectList => f.write_str("meta:project_list"),
            Self::ActiveProject => f.write_str("meta:active_project"),
            Self::Project(name) => write!(f, "project:{name}"),
            Self::Page(url) => write!(f, "page:{url}"),
            Self::Builder(tx_id) => write!(f, "builder:{tx_id}"),
            Self::Request(id) => write!(f, "request:{id}"),
        }
    }
}

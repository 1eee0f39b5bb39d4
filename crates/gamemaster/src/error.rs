//! Error types for ingestion.
//!
//! Errors come in two layers. [`IngestError`] aborts the whole run and no
//! tables are returned. [`EntryError`] rejects a single template entry; it is
//! wrapped in a [`Rejection`] and collected into the ingest report while the
//! remaining entries are processed.

use thiserror::Error;

/// Fatal ingestion error. Nothing built so far survives one of these.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to compile template pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("malformed document at line {line}, column {column}: {message}")]
    Tokenize {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("document has no `{0}` template list")]
    MissingTemplates(String),

    #[error("iteration stack depth {depth} exceeded")]
    ScopeOverflow { depth: usize },

    #[error("deferred entry stack overflow (capacity {capacity})")]
    DeferredOverflow { capacity: usize },

    #[error("{rejected} rejected entries exceed the limit of {limit}")]
    TooManyRejections { rejected: usize, limit: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::Tokenize {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Why a single entry was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has the wrong kind, expected {expected}")]
    WrongKind {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{field}` has an out of range value `{value}`")]
    BadValue { field: &'static str, value: String },

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("malformed template id `{0}`")]
    BadTemplateId(String),

    #[error("unknown move `{0}`")]
    UnknownMove(String),

    #[error("duplicate name `{0}`")]
    DuplicateName(String),

    #[error("duplicate id {0}")]
    DuplicateId(u16),

    #[error("family reference `{0}` never resolved")]
    UnresolvedFamily(String),
}

impl EntryError {
    /// Referential errors are the ones left over after resolution passes.
    pub fn is_referential(&self) -> bool {
        matches!(self, EntryError::UnresolvedFamily(_))
    }
}

/// A rejected entry, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Template identifier of the rejected entry.
    pub template_id: String,
    /// Token index of the entry's object in the token tape.
    pub token: usize,
    pub error: EntryError,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (token {}): {}", self.template_id, self.token, self.error)
    }
}

/// Either kind of failure, so extraction code can use `?` on both.
#[derive(Debug)]
pub(crate) enum Failure {
    Fatal(IngestError),
    Entry(EntryError),
}

impl From<IngestError> for Failure {
    fn from(err: IngestError) -> Self {
        Failure::Fatal(err)
    }
}

impl From<EntryError> for Failure {
    fn from(err: EntryError) -> Self {
        Failure::Entry(err)
    }
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;

//! Session collaborator contract and result-set metadata types.
//!
//! The SQL execution layer (pooling, transactions, wire protocols) lives
//! outside this crate. Discovery only needs the minimal surface defined
//! here: open a session, prepare a capped query, execute it, and read the
//! column metadata of the result. Engine bindings implement these traits;
//! tests script them.
//!
//! Statements and result sets release their engine resources on `Drop`,
//! so every exit path of a probe, including error paths, cleans up.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse, engine-independent classification of a column's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Boolean,
    Numeric,
    String,
    DateTime,
    Binary,
    /// Large content (LOB/CLOB-style values).
    Content,
    Struct,
    Array,
    Object,
    /// Implicit row identifier.
    RowId,
    Unknown,
}

/// Column metadata as reported by an executed result set, in result order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Column name.
    pub name: String,

    /// Ordinal position (1-based).
    pub ordinal: u32,

    /// Declared type name (e.g., "TEXT", "INTEGER").
    pub type_name: String,

    /// Full type name including modifiers (e.g., "VARCHAR(30)").
    pub full_type_name: String,

    /// Engine-specific numeric type code.
    pub type_code: i32,

    /// Engine-independent data kind.
    pub data_kind: DataKind,

    /// Numeric scale, if the type carries one.
    pub scale: Option<i32>,

    /// Numeric precision, if the type carries one.
    pub precision: Option<i32>,

    /// Maximum length for string/binary types (-1 for unbounded).
    pub max_length: i64,

    /// Engine-specific type modifier bitmask.
    pub type_modifiers: u64,
}

/// Row window hint for a prepared statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLimit {
    /// Rows to skip.
    pub offset: u64,
    /// Maximum rows to materialize.
    pub limit: u64,
}

impl RowLimit {
    /// Cap for metadata-only probes: at most one row, enough to obtain
    /// column metadata without materializing the object's contents.
    pub const fn metadata_only() -> Self {
        Self { offset: 0, limit: 1 }
    }
}

/// Failure kind reported by the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    /// The queried relation does not exist in the current session.
    MissingObject,
    /// The session lacks privileges for the queried relation.
    PermissionDenied,
    /// The engine is unreachable or the session is broken.
    Connection,
    /// Anything else the engine reported.
    Other,
}

/// Error reported by the session collaborator.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct SessionError {
    /// Classified failure kind.
    pub kind: SessionErrorKind,
    /// Engine-provided message.
    pub message: String,
}

impl SessionError {
    fn new(kind: SessionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The relation does not exist (expected during probing).
    pub fn missing_object(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::MissingObject, message)
    }

    /// The session lacks privileges for the relation.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::PermissionDenied, message)
    }

    /// The engine is unreachable.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::Connection, message)
    }

    /// Unclassified engine failure.
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::Other, message)
    }

    /// Whether this failure means the relation simply does not exist.
    pub fn is_missing_object(&self) -> bool {
        self.kind == SessionErrorKind::MissingObject
    }
}

/// Opens sessions against a live engine.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Open a session for the given purpose (shown in engine-side logs).
    ///
    /// This is the only call whose failure aborts a discovery pass.
    async fn open_session(&self, purpose: &str) -> Result<Box<dyn Session>, SessionError>;
}

/// A live session. Statements on a single session must not be interleaved.
#[async_trait]
pub trait Session: Send + Sync {
    /// Prepare a statement with a row window hint.
    async fn prepare(&self, sql: &str, limit: RowLimit) -> Result<Box<dyn Statement>, SessionError>;
}

/// A prepared statement. Engine resources are released on drop.
#[async_trait]
pub trait Statement: Send {
    /// Execute the statement.
    ///
    /// `Ok(None)` means the engine produced no result surface for the
    /// query, which discovery treats the same as a missing relation.
    async fn execute(&mut self) -> Result<Option<Box<dyn ResultSet>>, SessionError>;
}

/// An open result set. Engine resources are released on drop.
pub trait ResultSet: Send {
    /// Column metadata in result order.
    fn metadata(&self) -> &[ColumnMeta];
}

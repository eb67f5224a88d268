//! Engine dialect strategies for system object discovery.
//!
//! The set of well-known system objects and the SQL used to probe them vary
//! per engine. Both are expressed through the [`Dialect`] strategy rather
//! than runtime type checks, so new engines plug in without touching the
//! discovery loop.

use crate::catalog::{PseudoAttribute, SystemObject};
use crate::session::DataKind;

/// SQL syntax and candidate registry strategy for a database engine.
pub trait Dialect: Send + Sync {
    /// Get the dialect identifier (e.g., "sqlite").
    fn name(&self) -> &str;

    /// Fixed, ordered list of well-known system object candidates.
    ///
    /// Pure data: no I/O, deterministic. Discovery probes these in order,
    /// and the probe order defines display order.
    fn system_object_candidates(&self) -> &[&str];

    /// Build the minimal existence/metadata probe query for one candidate.
    fn probe_query(&self, object_name: &str) -> String;

    /// Quote an identifier for this engine.
    fn quote_identifier(&self, name: &str) -> String;
}

/// Computes engine-intrinsic pseudo-columns for discovered objects.
///
/// Invoked at most once per object; the result is cached on the object.
/// May return an empty list for objects without intrinsic columns.
pub trait PseudoAttributeProvider: Send + Sync {
    /// Resolve the pseudo-attributes of a discovered object.
    fn resolve_pseudo_attributes(&self, object: &SystemObject) -> Vec<PseudoAttribute>;
}

/// Well-known SQLite system table names, in display order.
///
/// Presence of each depends on engine version, compile options, and what
/// the user has already created (`sqlite_sequence` only appears once an
/// AUTOINCREMENT table exists, the `sqlite_stat*` tables only after
/// ANALYZE), so each must be probed live.
const SQLITE_SYSTEM_TABLES: &[&str] = &[
    "sqlite_master",
    "sqlite_schema",
    "sqlite_temp_master",
    "sqlite_temp_schema",
    "dbstat",
    "sqlite_sequence",
    "sqlite_stat1",
    "sqlite_stat2",
    "sqlite_stat3",
    "sqlite_stat4",
];

/// SQLite dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn system_object_candidates(&self) -> &[&str] {
        SQLITE_SYSTEM_TABLES
    }

    fn probe_query(&self, object_name: &str) -> String {
        format!("select * from {}", self.quote_identifier(object_name))
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

impl PseudoAttributeProvider for SqliteDialect {
    /// Every SQLite table carries an implicit `rowid` unless a declared
    /// column already shadows the name.
    fn resolve_pseudo_attributes(&self, object: &SystemObject) -> Vec<PseudoAttribute> {
        if object.attribute("rowid").is_some() {
            return Vec::new();
        }
        vec![PseudoAttribute {
            name: "rowid".to_string(),
            type_name: "INTEGER".to_string(),
            data_kind: DataKind::RowId,
        }]
    }
}

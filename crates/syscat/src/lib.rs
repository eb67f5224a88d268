//! # syscat
//!
//! System catalog discovery and read-only schema object model for database
//! tooling.
//!
//! Database engines expose synthetic "system" objects (catalog views,
//! virtual tables) whose presence and shape depend on engine version,
//! compile options, and what the user has already created. This crate
//! probes a fixed per-dialect list of well-known candidates against a live
//! session, collects column metadata from the ones that exist, and exposes
//! the result as an immutable, name-indexed catalog:
//!
//! - **Partial-failure tolerant**: a missing or failing candidate never
//!   aborts discovery of the rest; unexpected failures are logged and the
//!   candidate is simply excluded.
//! - **Order-stable**: discovered objects keep the registry's probe order.
//! - **Read-safe**: after construction the catalog and its objects are
//!   immutable and safe for unsynchronized concurrent reads; the per-object
//!   pseudo-attribute cache is computed exactly once.
//!
//! ## Example
//!
//! ```rust,ignore
//! use syscat::{SqliteDialect, SystemCatalog};
//!
//! let catalog = SystemCatalog::discover("main", &factory, &SqliteDialect, None).await?;
//! for object in catalog.children() {
//!     println!("{} ({} columns)", object.name(), object.attributes().len());
//! }
//! let master = catalog.child("SQLITE_MASTER");
//! ```
//!
//! The SQL execution layer is an external collaborator: engine bindings
//! implement the [`session`] traits and are otherwise opaque to discovery.

pub mod catalog;
pub mod config;
pub mod dialect;
pub mod error;
pub mod probe;
pub mod session;

// Re-exports for convenient access
pub use catalog::{
    map_attributes, Attribute, DiscoveryOptions, ObjectType, PseudoAttribute, SystemCatalog,
    SystemObject,
};
pub use config::{ConnectionConfiguration, VariableResolver};
pub use dialect::{Dialect, PseudoAttributeProvider, SqliteDialect};
pub use error::{CatalogError, Result};
pub use probe::{probe_system_object, ProbeOutcome};
pub use session::{
    ColumnMeta, DataKind, ResultSet, RowLimit, Session, SessionError, SessionErrorKind,
    SessionFactory, Statement,
};

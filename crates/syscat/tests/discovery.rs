//! End-to-end discovery scenarios over a scripted session layer.
//!
//! These tests verify the container contract: discovered subsets keep
//! registry order, per-candidate failures are swallowed after a single
//! diagnostic, and only connection-level failures abort a pass.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use syscat::{
    CatalogError, ColumnMeta, DataKind, Dialect, DiscoveryOptions, ObjectType, ResultSet, RowLimit,
    Session, SessionError, SessionErrorKind, SessionFactory, SqliteDialect, Statement,
    SystemCatalog,
};

// =============================================================================
// Scripted session layer
// =============================================================================

#[derive(Clone)]
enum Behavior {
    /// Candidate exists with the given columns, optionally after a delay.
    Found(Vec<ColumnMeta>, Duration),
    /// Candidate does not exist.
    Missing,
    /// Probe fails with an unexpected error.
    Fail(SessionError),
    /// Probe never completes.
    Hang,
}

struct MockFactory {
    behaviors: HashMap<String, Behavior>,
    fail_open: Option<SessionError>,
    sessions_opened: AtomicUsize,
}

impl MockFactory {
    fn new(behaviors: Vec<(&str, Behavior)>) -> Self {
        Self {
            behaviors: behaviors
                .into_iter()
                .map(|(name, behavior)| (name.to_string(), behavior))
                .collect(),
            fail_open: None,
            sessions_opened: AtomicUsize::new(0),
        }
    }

    fn unreachable_engine() -> Self {
        Self {
            behaviors: HashMap::new(),
            fail_open: Some(SessionError::connection("engine unreachable")),
            sessions_opened: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SessionFactory for MockFactory {
    async fn open_session(&self, _purpose: &str) -> Result<Box<dyn Session>, SessionError> {
        if let Some(err) = &self.fail_open {
            return Err(err.clone());
        }
        self.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            behaviors: self.behaviors.clone(),
        }))
    }
}

struct MockSession {
    behaviors: HashMap<String, Behavior>,
}

#[async_trait]
impl Session for MockSession {
    async fn prepare(&self, sql: &str, _limit: RowLimit) -> Result<Box<dyn Statement>, SessionError> {
        // Probe queries are "select * from <name>", possibly quoted.
        let name = sql
            .rsplit(' ')
            .next()
            .unwrap_or_default()
            .trim_matches('"');
        let behavior = self
            .behaviors
            .get(name)
            .cloned()
            .unwrap_or(Behavior::Missing);
        Ok(Box::new(MockStatement {
            name: name.to_string(),
            behavior,
        }))
    }
}

struct MockStatement {
    name: String,
    behavior: Behavior,
}

#[async_trait]
impl Statement for MockStatement {
    async fn execute(&mut self) -> Result<Option<Box<dyn ResultSet>>, SessionError> {
        match self.behavior.clone() {
            Behavior::Found(columns, delay) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(Some(Box::new(MockResultSet { columns })))
            }
            Behavior::Missing => Err(SessionError::missing_object(format!(
                "no such table: {}",
                self.name
            ))),
            Behavior::Fail(err) => Err(err),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
        }
    }
}

struct MockResultSet {
    columns: Vec<ColumnMeta>,
}

impl ResultSet for MockResultSet {
    fn metadata(&self) -> &[ColumnMeta] {
        &self.columns
    }
}

fn column(name: &str, ordinal: u32) -> ColumnMeta {
    ColumnMeta {
        name: name.to_string(),
        ordinal,
        type_name: "TEXT".to_string(),
        full_type_name: "TEXT".to_string(),
        type_code: 12,
        data_kind: DataKind::String,
        scale: None,
        precision: None,
        max_length: -1,
        type_modifiers: 0,
    }
}

fn found(columns: Vec<ColumnMeta>) -> Behavior {
    Behavior::Found(columns, Duration::ZERO)
}

/// Three-candidate test dialect.
struct AbcDialect;

impl Dialect for AbcDialect {
    fn name(&self) -> &str {
        "abc"
    }

    fn system_object_candidates(&self) -> &[&str] {
        &["a", "b", "c"]
    }

    fn probe_query(&self, object_name: &str) -> String {
        format!("select * from {}", object_name)
    }

    fn quote_identifier(&self, name: &str) -> String {
        name.to_string()
    }
}

// =============================================================================
// Diagnostic capture
// =============================================================================

/// Minimal subscriber collecting formatted events for assertions.
struct CollectingSubscriber {
    events: Arc<Mutex<Vec<String>>>,
}

impl tracing::Subscriber for CollectingSubscriber {
    fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _attrs: &tracing::span::Attributes<'_>) -> tracing::span::Id {
        tracing::span::Id::from_u64(1)
    }

    fn record(&self, _id: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}

    fn record_follows_from(&self, _id: &tracing::span::Id, _follows: &tracing::span::Id) {}

    fn event(&self, event: &tracing::Event<'_>) {
        struct Collector(String);
        impl tracing::field::Visit for Collector {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                let _ = write!(self.0, " {}={:?}", field.name(), value);
            }
        }
        let mut collector = Collector(format!("{}", event.metadata().level()));
        event.record(&mut collector);
        self.events.lock().unwrap().push(collector.0);
    }

    fn enter(&self, _id: &tracing::span::Id) {}

    fn exit(&self, _id: &tracing::span::Id) {}
}

fn capture_events() -> (Arc<Mutex<Vec<String>>>, tracing::subscriber::DefaultGuard) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let guard = tracing::subscriber::set_default(CollectingSubscriber {
        events: Arc::clone(&events),
    });
    (events, guard)
}

// =============================================================================
// Sequential discovery
// =============================================================================

#[tokio::test]
async fn discovers_existing_subset_in_registry_order() {
    let factory = MockFactory::new(vec![
        ("a", found(vec![column("x", 1), column("y", 2)])),
        ("b", Behavior::Missing),
        ("c", found(vec![column("z", 1)])),
    ]);

    let catalog = SystemCatalog::discover("main", &factory, &AbcDialect, None)
        .await
        .unwrap();

    let names: Vec<&str> = catalog.children().iter().map(|o| o.name()).collect();
    assert_eq!(names, ["a", "c"]);
    assert_eq!(catalog.name(), "main");
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.primary_child_type(), ObjectType::SystemTable);

    let a = catalog.child("a").unwrap();
    assert_eq!(a.attributes().len(), 2);
    assert_eq!(a.attributes()[0].name, "x");
    assert_eq!(a.container_name(), "main");
}

#[tokio::test]
async fn child_lookup_is_case_insensitive() {
    let factory = MockFactory::new(vec![("a", found(vec![column("x", 1)]))]);
    let catalog = SystemCatalog::discover("main", &factory, &AbcDialect, None)
        .await
        .unwrap();

    let lower = catalog.child("a").unwrap();
    let upper = catalog.child("A").unwrap();
    assert!(std::ptr::eq(lower, upper));
    assert!(catalog.child("B").is_none());
}

#[tokio::test]
async fn missing_objects_are_silent() {
    let (events, _guard) = capture_events();
    let factory = MockFactory::new(vec![
        ("a", Behavior::Missing),
        ("b", Behavior::Missing),
        ("c", Behavior::Missing),
    ]);

    let catalog = SystemCatalog::discover("main", &factory, &AbcDialect, None)
        .await
        .unwrap();

    assert!(catalog.is_empty());
    let warnings: Vec<String> = events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.starts_with("WARN") || e.starts_with("ERROR"))
        .cloned()
        .collect();
    assert!(warnings.is_empty(), "unexpected diagnostics: {:?}", warnings);
}

#[tokio::test]
async fn unexpected_failure_logs_once_and_excludes_candidate() {
    let (events, _guard) = capture_events();
    let factory = MockFactory::new(vec![
        ("a", Behavior::Fail(SessionError::permission_denied("access denied to a"))),
        ("b", found(vec![column("x", 1)])),
        ("c", found(vec![column("y", 1)])),
    ]);

    let catalog = SystemCatalog::discover("main", &factory, &AbcDialect, None)
        .await
        .unwrap();

    let names: Vec<&str> = catalog.children().iter().map(|o| o.name()).collect();
    assert_eq!(names, ["b", "c"]);

    let warnings: Vec<String> = events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.starts_with("WARN") && e.contains("candidate=\"a\""))
        .cloned()
        .collect();
    assert_eq!(warnings.len(), 1, "diagnostics: {:?}", warnings);
}

#[tokio::test]
async fn fatal_connection_failure_propagates() {
    let factory = MockFactory::unreachable_engine();
    let err = SystemCatalog::discover("main", &factory, &AbcDialect, None)
        .await
        .unwrap_err();
    match err {
        CatalogError::Session(session_err) => {
            assert_eq!(session_err.kind, SessionErrorKind::Connection);
        }
        other => panic!("expected session error, got {:?}", other),
    }
}

#[tokio::test]
async fn cancellation_is_honored_between_candidates() {
    let factory = MockFactory::new(vec![("a", found(vec![column("x", 1)]))]);
    let (_tx, rx) = watch::channel(true);

    let err = SystemCatalog::discover("main", &factory, &AbcDialect, Some(rx))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Cancelled));
}

#[tokio::test]
async fn full_sqlite_registry_pass() {
    let factory = MockFactory::new(vec![
        (
            "sqlite_master",
            found(vec![
                column("type", 1),
                column("name", 2),
                column("tbl_name", 3),
                column("rootpage", 4),
                column("sql", 5),
            ]),
        ),
        ("sqlite_sequence", found(vec![column("name", 1), column("seq", 2)])),
    ]);

    let catalog = SystemCatalog::discover("main", &factory, &SqliteDialect, None)
        .await
        .unwrap();

    let names: Vec<&str> = catalog.children().iter().map(|o| o.name()).collect();
    assert_eq!(names, ["sqlite_master", "sqlite_sequence"]);

    // Engine capability: implicit rowid pseudo-column, cached on the object.
    let master = catalog.child("SQLITE_MASTER").unwrap();
    let pseudo = master.pseudo_attributes(&SqliteDialect);
    assert_eq!(pseudo.len(), 1);
    assert_eq!(pseudo[0].name, "rowid");
    assert_eq!(pseudo[0].data_kind, DataKind::RowId);
}

// =============================================================================
// Bounded-parallel discovery
// =============================================================================

fn fast_options() -> DiscoveryOptions {
    DiscoveryOptions {
        parallelism: 4,
        probe_timeout: Duration::from_millis(200),
    }
}

#[tokio::test]
async fn parallel_discovery_preserves_candidate_order() {
    // "a" finishes last; order must still follow the registry.
    let factory = MockFactory::new(vec![
        ("a", Behavior::Found(vec![column("x", 1)], Duration::from_millis(80))),
        ("b", Behavior::Missing),
        ("c", found(vec![column("y", 1)])),
    ]);

    let catalog = SystemCatalog::discover_parallel("main", &factory, &AbcDialect, &fast_options())
        .await
        .unwrap();

    let names: Vec<&str> = catalog.children().iter().map(|o| o.name()).collect();
    assert_eq!(names, ["a", "c"]);
}

#[tokio::test]
async fn parallel_discovery_uses_one_session_per_probe() {
    let factory = MockFactory::new(vec![
        ("a", found(vec![column("x", 1)])),
        ("b", found(vec![column("y", 1)])),
        ("c", found(vec![column("z", 1)])),
    ]);

    SystemCatalog::discover_parallel("main", &factory, &AbcDialect, &fast_options())
        .await
        .unwrap();

    // One connectivity check plus one session per candidate.
    assert_eq!(factory.sessions_opened.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn hung_probe_degrades_to_absent_after_timeout() {
    let (events, _guard) = capture_events();
    let factory = MockFactory::new(vec![
        ("a", found(vec![column("x", 1)])),
        ("b", Behavior::Hang),
        ("c", found(vec![column("y", 1)])),
    ]);

    let catalog = SystemCatalog::discover_parallel("main", &factory, &AbcDialect, &fast_options())
        .await
        .unwrap();

    let names: Vec<&str> = catalog.children().iter().map(|o| o.name()).collect();
    assert_eq!(names, ["a", "c"]);

    let timeouts: Vec<String> = events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.contains("timed out") && e.contains("candidate=\"b\""))
        .cloned()
        .collect();
    assert_eq!(timeouts.len(), 1);
}

#[tokio::test]
async fn parallel_discovery_fails_fast_on_unreachable_engine() {
    let factory = MockFactory::unreachable_engine();
    let err = SystemCatalog::discover_parallel("main", &factory, &AbcDialect, &fast_options())
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Session(_)));
}

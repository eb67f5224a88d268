//! Per-candidate existence probe.
//!
//! A probe issues the dialect's minimal metadata query for one candidate
//! name and classifies the outcome. Probes are side-effect-free and
//! isolated: a failing candidate never affects the others.

use crate::dialect::Dialect;
use crate::session::{ColumnMeta, RowLimit, Session, SessionError};

/// Outcome of probing a single candidate system object.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The object exists; column metadata in result order.
    Found(Vec<ColumnMeta>),

    /// The object does not currently exist. Expected and silent: it may
    /// still appear later depending on what the user creates.
    Absent,

    /// The probe failed for a reason other than absence. The caller logs
    /// it with the candidate name; the candidate is still not discovered.
    Failed(SessionError),
}

/// Probe one candidate on an open session.
///
/// Prepares `select * from <name>` capped to a single row, so the engine
/// reports column metadata without materializing the object's contents.
/// Statement and result-set resources are dropped on every exit path.
pub async fn probe_system_object(
    session: &dyn Session,
    dialect: &dyn Dialect,
    name: &str,
) -> ProbeOutcome {
    let sql = dialect.probe_query(name);
    let mut stmt = match session.prepare(&sql, RowLimit::metadata_only()).await {
        Ok(stmt) => stmt,
        Err(err) => return classify(err),
    };
    match stmt.execute().await {
        Ok(Some(rs)) => ProbeOutcome::Found(rs.metadata().to_vec()),
        Ok(None) => ProbeOutcome::Absent,
        Err(err) => classify(err),
    }
}

fn classify(err: SessionError) -> ProbeOutcome {
    if err.is_missing_object() {
        ProbeOutcome::Absent
    } else {
        ProbeOutcome::Failed(err)
    }
}

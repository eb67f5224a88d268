//! System catalog container and discovery passes.

use std::collections::HashMap;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::catalog::attribute::map_attributes;
use crate::catalog::object::{ObjectType, SystemObject};
use crate::dialect::Dialect;
use crate::error::{CatalogError, Result};
use crate::probe::{probe_system_object, ProbeOutcome};
use crate::session::SessionFactory;

/// Purpose string passed to the session layer for discovery sessions.
const DISCOVERY_PURPOSE: &str = "System objects discovery";

/// Options for the bounded-parallel discovery pass.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Maximum candidates probed at once. Each probe runs on its own
    /// session; statements on a single session are not safely interleaved.
    pub parallelism: usize,

    /// Per-probe deadline. A hung probe degrades to Absent rather than
    /// blocking the whole pass.
    pub probe_timeout: Duration,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            parallelism: 4,
            probe_timeout: Duration::from_secs(10),
        }
    }
}

/// Name-indexed, order-preserving collection of discovered system objects.
///
/// Built once per connection; immutable afterwards and safe for
/// unsynchronized concurrent reads. Candidates that probed Absent or failed
/// are never re-probed within the container's lifetime; reopening the
/// connection and discovering a fresh container is the only refresh path.
#[derive(Debug)]
pub struct SystemCatalog {
    name: String,
    objects: Vec<SystemObject>,
    by_name: HashMap<String, usize>,
}

impl SystemCatalog {
    fn assemble(name: String, objects: Vec<SystemObject>) -> Self {
        let by_name = objects
            .iter()
            .enumerate()
            .map(|(idx, obj)| (obj.name().to_lowercase(), idx))
            .collect();
        Self {
            name,
            objects,
            by_name,
        }
    }

    /// Discover system objects sequentially, in registry order.
    ///
    /// Opens a single session and probes each candidate of the dialect's
    /// registry on it. Absent candidates are skipped silently; unexpected
    /// probe failures are logged with the candidate name and skipped.
    /// Only a failure to open the session at all propagates: a partial
    /// catalog without a live connection is not meaningful.
    ///
    /// The cancellation signal, if supplied, is honored between candidates
    /// and never mid-probe.
    pub async fn discover(
        name: impl Into<String>,
        factory: &dyn SessionFactory,
        dialect: &dyn Dialect,
        cancel: Option<watch::Receiver<bool>>,
    ) -> Result<Self> {
        let name = name.into();
        let session = factory.open_session(DISCOVERY_PURPOSE).await?;

        let candidates = dialect.system_object_candidates();
        let mut objects = Vec::new();
        for &candidate in candidates {
            if let Some(ref cancel) = cancel {
                if *cancel.borrow() {
                    return Err(CatalogError::Cancelled);
                }
            }
            match probe_system_object(session.as_ref(), dialect, candidate).await {
                ProbeOutcome::Found(meta) => {
                    objects.push(SystemObject::new(
                        name.clone(),
                        candidate,
                        map_attributes(&meta),
                    ));
                }
                ProbeOutcome::Absent => {
                    debug!(candidate, "system object not present");
                }
                ProbeOutcome::Failed(err) => {
                    warn!(candidate, error = %err, "error reflecting system object");
                }
            }
        }

        info!(
            container = %name,
            discovered = objects.len(),
            candidates = candidates.len(),
            "system object discovery complete"
        );
        Ok(Self::assemble(name, objects))
    }

    /// Discover system objects with bounded parallelism.
    ///
    /// Each probe runs on its own session. Results land in the final
    /// sequence by original candidate index, so the catalog order matches
    /// the registry regardless of arrival order. A probe that exceeds
    /// `options.probe_timeout` degrades to Absent.
    ///
    /// One session is opened (and dropped) up front so an unreachable
    /// engine still fails the pass as a whole; after that point a
    /// per-probe session-open failure only excludes that candidate.
    pub async fn discover_parallel(
        name: impl Into<String>,
        factory: &dyn SessionFactory,
        dialect: &dyn Dialect,
        options: &DiscoveryOptions,
    ) -> Result<Self> {
        let name = name.into();
        drop(factory.open_session(DISCOVERY_PURPOSE).await?);

        let candidates = dialect.system_object_candidates();
        let parallelism = options.parallelism.max(1);

        let mut slots: Vec<Option<SystemObject>> = Vec::new();
        slots.resize_with(candidates.len(), || None);

        let mut probes = stream::iter(candidates.iter().enumerate())
            .map(|(index, &candidate)| {
                let name = name.clone();
                async move {
                    let session = match factory.open_session(DISCOVERY_PURPOSE).await {
                        Ok(session) => session,
                        Err(err) => {
                            warn!(candidate, error = %err, "error opening probe session");
                            return (index, None);
                        }
                    };
                    let probe = probe_system_object(session.as_ref(), dialect, candidate);
                    match tokio::time::timeout(options.probe_timeout, probe).await {
                        Ok(ProbeOutcome::Found(meta)) => {
                            (index, Some(SystemObject::new(name, candidate, map_attributes(&meta))))
                        }
                        Ok(ProbeOutcome::Absent) => {
                            debug!(candidate, "system object not present");
                            (index, None)
                        }
                        Ok(ProbeOutcome::Failed(err)) => {
                            warn!(candidate, error = %err, "error reflecting system object");
                            (index, None)
                        }
                        Err(_) => {
                            warn!(candidate, "system object probe timed out");
                            (index, None)
                        }
                    }
                }
            })
            .buffer_unordered(parallelism);

        while let Some((index, object)) = probes.next().await {
            slots[index] = object;
        }
        drop(probes);

        let objects: Vec<SystemObject> = slots.into_iter().flatten().collect();
        info!(
            container = %name,
            discovered = objects.len(),
            candidates = candidates.len(),
            "system object discovery complete"
        );
        Ok(Self::assemble(name, objects))
    }

    /// Container name (usually the data source name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Discovered objects, in probe order. Order-stable for deterministic
    /// display.
    pub fn children(&self) -> &[SystemObject] {
        &self.objects
    }

    /// Look up a discovered object by name, case-insensitively.
    pub fn child(&self, name: &str) -> Option<&SystemObject> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&idx| &self.objects[idx])
    }

    /// Kind of object this container yields.
    pub fn primary_child_type(&self) -> ObjectType {
        ObjectType::SystemTable
    }

    /// Number of discovered objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no candidate was discovered.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_options_defaults() {
        let options = DiscoveryOptions::default();
        assert!(options.parallelism >= 1);
        assert!(options.probe_timeout > Duration::ZERO);
    }

    #[test]
    fn test_empty_catalog_contract() {
        let catalog = SystemCatalog::assemble("main".to_string(), Vec::new());
        assert_eq!(catalog.name(), "main");
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert!(catalog.children().is_empty());
        assert!(catalog.child("sqlite_master").is_none());
        assert_eq!(catalog.primary_child_type(), ObjectType::SystemTable);
    }
}

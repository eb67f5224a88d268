//! Discovered system objects.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::catalog::attribute::{Attribute, PseudoAttribute};
use crate::dialect::PseudoAttributeProvider;

/// Kind of schema object a container yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    /// Synthetic engine-maintained table (catalog view, virtual table).
    SystemTable,
}

/// Index metadata. System objects never report any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed column names.
    pub columns: Vec<String>,
    /// Whether the index is unique.
    pub is_unique: bool,
}

/// Constraint metadata. System objects never report any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Constraint name.
    pub name: String,
    /// Constraint definition (SQL expression).
    pub definition: String,
}

/// Trigger metadata. System objects never report any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    /// Trigger name.
    pub name: String,
    /// Trigger body.
    pub definition: String,
}

/// A discovered system object: fixed name, fixed ordered attribute list,
/// and a lazily computed pseudo-attribute cache.
///
/// Immutable after construction apart from the pseudo-attribute cache,
/// which transitions Uncomputed → Computed exactly once. Safe for
/// unsynchronized concurrent reads.
#[derive(Debug)]
pub struct SystemObject {
    container: String,
    name: String,
    attributes: Vec<Attribute>,
    attributes_by_name: HashMap<String, usize>,
    pseudo_attributes: OnceLock<Vec<PseudoAttribute>>,
}

impl SystemObject {
    /// Build an object from probed attributes, in probe order.
    ///
    /// `container` is the owning container's name, kept as a plain
    /// identifier rather than a reference cycle.
    pub fn new(
        container: impl Into<String>,
        name: impl Into<String>,
        attributes: Vec<Attribute>,
    ) -> Self {
        let attributes_by_name = attributes
            .iter()
            .enumerate()
            .map(|(idx, attr)| (attr.name.to_lowercase(), idx))
            .collect();
        Self {
            container: container.into(),
            name: name.into(),
            attributes,
            attributes_by_name,
            pseudo_attributes: OnceLock::new(),
        }
    }

    /// Object name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the owning container.
    pub fn container_name(&self) -> &str {
        &self.container
    }

    /// Fully qualified name. System objects are session-global, so this is
    /// the plain object name.
    pub fn full_name(&self) -> &str {
        &self.name
    }

    /// Attributes in probe order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up an attribute by name, case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes_by_name
            .get(&name.to_lowercase())
            .map(|&idx| &self.attributes[idx])
    }

    /// Engine-intrinsic pseudo-columns, computed on first access via the
    /// capability collaborator and cached for the object's lifetime.
    ///
    /// Under concurrent first access exactly one computation wins and all
    /// readers observe the same value.
    pub fn pseudo_attributes(&self, provider: &dyn PseudoAttributeProvider) -> &[PseudoAttribute] {
        self.pseudo_attributes
            .get_or_init(|| provider.resolve_pseudo_attributes(self))
    }

    /// Kind of this object.
    pub fn object_type(&self) -> ObjectType {
        ObjectType::SystemTable
    }

    /// System objects are never views.
    pub fn is_view(&self) -> bool {
        false
    }

    /// System objects are persistent engine artifacts.
    pub fn is_persisted(&self) -> bool {
        true
    }

    /// Always empty: index introspection does not apply to synthetic objects.
    pub fn indexes(&self) -> &[Index] {
        &[]
    }

    /// Always empty: constraint introspection does not apply to synthetic objects.
    pub fn constraints(&self) -> &[Constraint] {
        &[]
    }

    /// Always empty: trigger introspection does not apply to synthetic objects.
    pub fn triggers(&self) -> &[Trigger] {
        &[]
    }
}

//! Catalog object model: discovered system objects and their container.
//!
//! - [`container`]: the name-indexed, order-preserving [`SystemCatalog`]
//! - [`object`]: immutable [`SystemObject`] entities with a once-only
//!   pseudo-attribute cache
//! - [`attribute`]: the typed [`Attribute`] model built from probed
//!   result-set metadata

pub mod attribute;
pub mod container;
pub mod object;

pub use attribute::{map_attributes, Attribute, PseudoAttribute};
pub use container::{DiscoveryOptions, SystemCatalog};
pub use object::{Constraint, Index, ObjectType, SystemObject, Trigger};

//! # Buildings
//!
//! Flyweight slice: many [`Building`]s, few [`BuildingType`]s.
//!
//! A [`TypeRegistry`] deduplicates building types by their attribute triple
//! (name, texture, color). Each building keeps only its own position plus an
//! [`Arc`](std::sync::Arc) handle to the shared type, so two buildings with equal
//! attributes point at one instance. That sharing is observable through
//! [`BuildingType::id`] and [`BuildingType::same_instance`].
//!
//! ## Example
//! ```rust
//! use skyline_buildings::{Building, TypeRegistry};
//!
//! let mut registry = TypeRegistry::new();
//! let a = Building::new(10, 20, registry.get_or_create("House", "Brick", "Red"));
//! let b = Building::new(15, 25, registry.get_or_create("House", "Brick", "Red"));
//!
//! assert!(a.shares_type_with(&b));
//! assert_eq!(a.kind().id(), b.kind().id());
//! ```

mod building;
mod error;
mod kind;
mod registry;

pub use crate::building::Building;
pub use crate::error::{BuildingsError, BuildingsErrorExt};
pub use crate::kind::BuildingType;
pub use crate::registry::{RegistryStats, TypeRegistry};

use skyline_domain::config::BuildingSpec;
use std::io::Write;
use tracing::info;

/// Places one building per spec, resolving every type through `registry`.
pub fn place(registry: &mut TypeRegistry, specs: &[BuildingSpec]) -> Vec<Building> {
    let buildings: Vec<_> = specs
        .iter()
        .map(|spec| {
            let kind = registry.get_or_create(&spec.name, &spec.texture, &spec.color);
            Building::new(spec.x, spec.y, kind)
        })
        .collect();

    info!(buildings = buildings.len(), types = registry.len(), "Buildings placed");
    buildings
}

/// Writes the record of every building, in order.
///
/// # Errors
/// Returns [`BuildingsError::Io`] on the first failed write.
pub fn display_all<'a>(
    buildings: impl IntoIterator<Item = &'a Building>,
    out: &mut impl Write,
) -> Result<(), BuildingsError> {
    buildings.into_iter().try_for_each(|building| building.display(out))?;
    out.flush().context("Flushing building records")
}

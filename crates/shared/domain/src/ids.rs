use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix used when rendering a [`BuildingTypeId`].
pub const BUILDING_TYPE_PREFIX: &str = "bt";

/// Identity token of a shared building type.
///
/// Combines the process-unique number of the owning registry with the type's slot in
/// that registry, so two handles carrying the same token denote the same instance even
/// when several registries coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingTypeId {
    registry: u32,
    slot: u32,
}

impl BuildingTypeId {
    #[must_use]
    pub const fn new(registry: u32, slot: u32) -> Self {
        Self { registry, slot }
    }

    /// Number of the registry that created the type.
    #[must_use]
    pub const fn registry(self) -> u32 {
        self.registry
    }

    /// Position of the type within its registry, in creation order.
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.slot
    }
}

impl fmt::Display for BuildingTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{BUILDING_TYPE_PREFIX}-{}-{}", self.registry, self.slot)
    }
}

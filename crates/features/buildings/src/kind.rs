//! The shared, immutable building type and the structural key it is registered under.

use skyline_domain::ids::BuildingTypeId;
use std::borrow::Borrow;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Shared visual attributes of every building of one kind.
///
/// Instances are only created by [`TypeRegistry`](crate::TypeRegistry) and are never
/// mutated afterwards; buildings hold them behind an [`Arc`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct BuildingType {
    id: BuildingTypeId,
    name: String,
    texture: String,
    color: String,
}

impl BuildingType {
    pub(crate) const fn new(
        id: BuildingTypeId,
        name: String,
        texture: String,
        color: String,
    ) -> Self {
        Self { id, name, texture, color }
    }

    /// Identity token assigned by the owning registry.
    #[must_use]
    pub const fn id(&self) -> BuildingTypeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn texture(&self) -> &str {
        &self.texture
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns `true` if both handles point at the same shared instance.
    ///
    /// This is identity, not value equality.
    #[must_use]
    pub fn same_instance(a: &Arc<Self>, b: &Arc<Self>) -> bool {
        Arc::ptr_eq(a, b)
    }

    pub(crate) fn key(&self) -> BuildingKey {
        BuildingKey {
            name: self.name.clone(),
            texture: self.texture.clone(),
            color: self.color.clone(),
        }
    }
}

/// Owned structural key: the attribute triple itself, never a joined string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BuildingKey {
    name: String,
    texture: String,
    color: String,
}

/// Borrowed view over an attribute triple, so lookups need no allocation.
pub(crate) trait KeyView {
    fn parts(&self) -> (&str, &str, &str);
}

impl KeyView for BuildingKey {
    fn parts(&self) -> (&str, &str, &str) {
        (&self.name, &self.texture, &self.color)
    }
}

impl KeyView for (&str, &str, &str) {
    fn parts(&self) -> (&str, &str, &str) {
        *self
    }
}

// Hash and Eq of the owned key and of the borrowed view must agree.
impl Hash for BuildingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts().hash(state);
    }
}

impl Hash for dyn KeyView + '_ {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts().hash(state);
    }
}

impl PartialEq for dyn KeyView + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.parts() == other.parts()
    }
}

impl Eq for dyn KeyView + '_ {}

impl<'a> Borrow<dyn KeyView + 'a> for BuildingKey {
    fn borrow(&self) -> &(dyn KeyView + 'a) {
        self
    }
}

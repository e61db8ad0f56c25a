use crate::error::BuildingsError;
use crate::kind::{BuildingKey, BuildingType, KeyView};
use fxhash::FxHashMap;
use skyline_domain::ids::BuildingTypeId;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, trace};

/// Source of process-unique registry numbers.
static NEXT_REGISTRY: AtomicU32 = AtomicU32::new(0);

/// Lookup counters of a [`TypeRegistry`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    /// Distinct building types stored.
    pub types: usize,
    /// `get_or_create` calls answered from the cache.
    pub hits: u64,
    /// `get_or_create` calls that created a new type.
    pub misses: u64,
}

/// Flyweight factory for [`BuildingType`]s.
///
/// Equal attribute triples always resolve to the same shared instance. The registry only
/// grows: there is no removal and no eviction. It is an ordinary owned value with no global
/// state, so every creation site receives it explicitly (`&mut TypeRegistry`).
///
/// # Example
/// ```rust
/// use skyline_buildings::{BuildingType, TypeRegistry};
///
/// let mut registry = TypeRegistry::new();
/// let a = registry.get_or_create("House", "Brick", "Red");
/// let b = registry.get_or_create("House", "Brick", "Red");
/// let c = registry.get_or_create("Shop", "Wood", "Blue");
///
/// assert!(BuildingType::same_instance(&a, &b));
/// assert!(!BuildingType::same_instance(&a, &c));
/// assert_eq!(registry.len(), 2);
/// ```
#[derive(Debug)]
pub struct TypeRegistry {
    /// Process-unique number, part of every id this registry hands out.
    number: u32,
    /// Arena in creation order; a type's position equals its id.
    types: Vec<Arc<BuildingType>>,
    index: FxHashMap<BuildingKey, BuildingTypeId>,
    hits: u64,
    misses: u64,
}

impl TypeRegistry {
    /// Creates a new, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            number: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            types: Vec::new(),
            index: FxHashMap::default(),
            hits: 0,
            misses: 0,
        }
    }

    /// Process-unique number of this registry.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Returns the shared type for the triple, creating it on first request.
    ///
    /// Never fails. Empty strings are ordinary values: `("", "", "")` is a valid type,
    /// distinct from every other triple.
    pub fn get_or_create(&mut self, name: &str, texture: &str, color: &str) -> Arc<BuildingType> {
        if let Some(id) = self.lookup(name, texture, color) {
            self.hits += 1;
            trace!(%id, name, texture, color, "Building type cache hit");
            return Arc::clone(&self.types[Self::slot(id)]);
        }

        self.misses += 1;
        self.insert(name, texture, color)
    }

    /// Like [`get_or_create`](Self::get_or_create), but rejects a blank `name`.
    ///
    /// # Errors
    /// Returns [`BuildingsError::Validation`] if `name` is empty or whitespace only.
    /// Nothing is stored in that case.
    pub fn try_get_or_create(
        &mut self,
        name: &str,
        texture: &str,
        color: &str,
    ) -> Result<Arc<BuildingType>, BuildingsError> {
        if name.trim().is_empty() {
            return Err(BuildingsError::Validation {
                message: "building type name cannot be blank".into(),
                context: Some(format!("texture '{texture}', color '{color}'").into()),
            });
        }

        Ok(self.get_or_create(name, texture, color))
    }

    /// Looks up an existing type without creating one.
    #[must_use]
    pub fn get(&self, name: &str, texture: &str, color: &str) -> Option<Arc<BuildingType>> {
        self.lookup(name, texture, color).map(|id| Arc::clone(&self.types[Self::slot(id)]))
    }

    /// Number of distinct types stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates stored types in creation order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Arc<BuildingType>> {
        self.types.iter()
    }

    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        RegistryStats { types: self.types.len(), hits: self.hits, misses: self.misses }
    }

    fn lookup(&self, name: &str, texture: &str, color: &str) -> Option<BuildingTypeId> {
        let probe = (name, texture, color);
        self.index.get(&probe as &dyn KeyView).copied()
    }

    fn insert(&mut self, name: &str, texture: &str, color: &str) -> Arc<BuildingType> {
        let slot = u32::try_from(self.types.len())
            .unwrap_or_else(|_| unreachable!("more than u32::MAX building types"));
        let id = BuildingTypeId::new(self.number, slot);

        let kind = Arc::new(BuildingType::new(
            id,
            name.to_owned(),
            texture.to_owned(),
            color.to_owned(),
        ));

        self.index.insert(kind.key(), id);
        self.types.push(Arc::clone(&kind));

        debug!(%id, name, texture, color, types = self.types.len(), "Building type created");
        kind
    }

    fn slot(id: BuildingTypeId) -> usize {
        id.slot() as usize
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a TypeRegistry {
    type Item = &'a Arc<BuildingType>;
    type IntoIter = std::slice::Iter<'a, Arc<BuildingType>>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_triples_share_one_instance() {
        let mut registry = TypeRegistry::new();

        let first = registry.get_or_create("House", "Brick", "Red");
        let second = registry.get_or_create("House", "Brick", "Red");

        assert!(BuildingType::same_instance(&first, &second));
        assert_eq!(first.id(), second.id());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_ids_follow_creation_order() {
        let mut registry = TypeRegistry::new();

        let house = registry.get_or_create("House", "Brick", "Red");
        let shop = registry.get_or_create("Shop", "Wood", "Blue");
        let again = registry.get_or_create("House", "Brick", "Red");

        let number = registry.number();
        assert_eq!(house.id(), BuildingTypeId::new(number, 0));
        assert_eq!(shop.id(), BuildingTypeId::new(number, 1));
        assert_eq!(again.id(), BuildingTypeId::new(number, 0));

        let names: Vec<_> = registry.iter().map(|kind| kind.name().to_owned()).collect();
        assert_eq!(names, ["House", "Shop"]);
    }

    #[test]
    fn test_get_does_not_create() {
        let mut registry = TypeRegistry::new();
        assert!(registry.get("House", "Brick", "Red").is_none());
        assert!(registry.is_empty());

        let created = registry.get_or_create("House", "Brick", "Red");
        let found = registry.get("House", "Brick", "Red").expect("type should exist");

        assert!(BuildingType::same_instance(&created, &found));
        assert_eq!(registry.stats(), RegistryStats { types: 1, hits: 0, misses: 1 });
    }

    #[test]
    fn test_stats_count_hits_and_misses() {
        let mut registry = TypeRegistry::new();
        for _ in 0..3 {
            let _ = registry.get_or_create("House", "Brick", "Red");
        }
        let _ = registry.get_or_create("Shop", "Wood", "Blue");

        assert_eq!(registry.stats(), RegistryStats { types: 2, hits: 2, misses: 2 });
    }

    #[test]
    fn test_separate_registries_hand_out_distinct_tokens() {
        let mut left = TypeRegistry::new();
        let mut right = TypeRegistry::new();

        let a = left.get_or_create("House", "Brick", "Red");
        let b = right.get_or_create("House", "Brick", "Red");

        assert_ne!(left.number(), right.number());
        assert!(!BuildingType::same_instance(&a, &b));
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id().slot(), b.id().slot());
    }

    #[test]
    fn test_try_get_or_create_rejects_blank_name() {
        let mut registry = TypeRegistry::new();

        let err = registry.try_get_or_create("  ", "Brick", "Red").expect_err("blank name");
        assert!(matches!(err, BuildingsError::Validation { .. }));
        assert!(registry.is_empty(), "rejected requests must not be stored");

        let ok = registry.try_get_or_create("House", "", "").expect("valid name");
        assert_eq!(ok.texture(), "");
        assert_eq!(registry.len(), 1);
    }
}

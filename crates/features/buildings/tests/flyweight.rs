use skyline_buildings::{Building, BuildingType, TypeRegistry, display_all, place};
use skyline_domain::config::{BuildingSpec, TownConfig};
use std::sync::Arc;

#[test]
fn repeated_triple_shares_and_new_triple_is_independent() {
    let mut registry = TypeRegistry::new();

    let first = registry.get_or_create("House", "Brick", "Red");
    let second = registry.get_or_create("House", "Brick", "Red");
    let third = registry.get_or_create("Shop", "Wood", "Blue");

    assert_eq!(registry.len(), 2);
    assert!(BuildingType::same_instance(&first, &second));
    assert!(!BuildingType::same_instance(&first, &third));
    assert_ne!(first.id(), third.id());
}

#[test]
fn buildings_with_same_type_report_same_token_and_own_positions() {
    let mut registry = TypeRegistry::new();
    let kind = registry.get_or_create("House", "Brick", "Red");

    let left = Building::new(10, 20, Arc::clone(&kind));
    let right = Building::new(15, 25, Arc::clone(&kind));

    assert!(left.shares_type_with(&right));
    assert_eq!(left.kind().name(), right.kind().name());
    assert_eq!(left.kind().texture(), right.kind().texture());
    assert_eq!(left.kind().color(), right.kind().color());
    assert_eq!(left.kind().id(), right.kind().id());
    assert_ne!(left.position(), right.position());
}

#[test]
fn all_empty_triple_is_a_valid_distinct_type() {
    let mut registry = TypeRegistry::new();

    let empty = registry.get_or_create("", "", "");
    let house = registry.get_or_create("House", "Brick", "Red");

    assert_eq!((empty.name(), empty.texture(), empty.color()), ("", "", ""));
    assert!(!BuildingType::same_instance(&empty, &house));
    assert!(BuildingType::same_instance(&empty, &registry.get_or_create("", "", "")));
    assert_eq!(registry.len(), 2);
}

#[test]
fn separator_in_values_does_not_merge_types() {
    let mut registry = TypeRegistry::new();

    let left = registry.get_or_create("House|Brick", "Red", "");
    let right = registry.get_or_create("House", "Brick|Red", "");

    assert!(!BuildingType::same_instance(&left, &right));
    assert_eq!(registry.len(), 2);
}

#[test]
fn dropping_buildings_leaves_registry_intact() {
    let mut registry = TypeRegistry::new();
    let kind = registry.get_or_create("House", "Brick", "Red");

    {
        let _a = Building::new(1, 1, Arc::clone(&kind));
        let _b = Building::new(2, 2, Arc::clone(&kind));
        assert_eq!(Arc::strong_count(&kind), 4);
    }

    assert_eq!(Arc::strong_count(&kind), 2);
    assert!(registry.get("House", "Brick", "Red").is_some());
}

#[test]
fn default_town_renders_three_records() {
    let mut registry = TypeRegistry::new();
    let buildings = place(&mut registry, &TownConfig::default().buildings);

    let mut out = Vec::new();
    display_all(&buildings, &mut out).expect("writing to a Vec cannot fail");

    let n = registry.number();
    let expected = format!(
        "Displaying House at (10,20) with Brick texture and Red color\n shared type id: bt-{n}-0\n\
         Displaying House at (15,25) with Brick texture and Red color\n shared type id: bt-{n}-0\n\
         Displaying Shop at (5,10) with Wood texture and Blue color\n shared type id: bt-{n}-1\n"
    );
    assert_eq!(String::from_utf8(out).expect("utf-8 output"), expected);
    assert_eq!(registry.len(), 2);
    assert!(buildings[0].shares_type_with(&buildings[1]));
    assert!(!buildings[0].shares_type_with(&buildings[2]));
}

#[test]
fn equal_attributes_in_separate_registries_render_different_tokens() {
    let mut first = TypeRegistry::new();
    let mut second = TypeRegistry::new();

    let a = Building::new(10, 20, first.get_or_create("House", "Brick", "Red"));
    let b = Building::new(10, 20, second.get_or_create("House", "Brick", "Red"));

    let render = |building: &Building| {
        let mut out = Vec::new();
        building.display(&mut out).expect("writing to a Vec cannot fail");
        String::from_utf8(out).expect("utf-8 output")
    };

    assert!(!a.shares_type_with(&b));
    assert_ne!(render(&a), render(&b));
    assert_eq!(a.shares_type_with(&b), a.kind().id() == b.kind().id());
}

#[test]
fn place_reuses_types_already_in_registry() {
    let mut registry = TypeRegistry::new();
    let existing = registry.get_or_create("Shop", "Wood", "Blue");

    let buildings = place(&mut registry, &[BuildingSpec::new(0, 0, "Shop", "Wood", "Blue")]);

    assert!(BuildingType::same_instance(buildings[0].kind(), &existing));
    assert_eq!(registry.stats().hits, 1);
}

use sc2_state_core::{IdCategory, UnitTypeId};
use sc2_state_registry::{IdRegistry, RawEntry, RawTable, RegistryError};

const STABLE_ID_JSON: &str = r#"{
    "Units": [
        {"id": 45, "name": "SCV"},
        {"id": 48, "name": "Marine", "index": 0, "friendlyname": "Marine"},
        {"id": 48, "name": "Marine Variant", "index": 1},
        {"id": 18, "name": "CommandCenter"},
        {"id": 0, "name": ""}
    ],
    "Abilities": [
        {"id": 3674, "name": "Attack", "index": 0},
        {"id": 23, "name": "Attack", "index": 0},
        {"id": 1, "name": "Smart", "index": 1}
    ],
    "Upgrades": [{"id": 15, "name": "Stimpack"}],
    "Buffs": [{"id": 27, "name": "Stimpack"}],
    "Effects": [{"id": 1, "name": "PsiStormPersistent"}]
}"#;

fn registry() -> IdRegistry {
    IdRegistry::from_json(STABLE_ID_JSON).expect("table is complete")
}

#[test]
fn marine_resolves_and_variant_is_dropped() {
    let registry = registry();

    assert_eq!(registry.lookup(IdCategory::UnitType, 48), Some("MARINE"));
    assert_eq!(registry.unit_type("MARINE"), Some(UnitTypeId::new(48)));
    assert_eq!(registry.unit_type("MARINE_VARIANT"), None);
    assert_eq!(
        registry
            .entries(IdCategory::UnitType)
            .filter(|(id, _)| *id == 48)
            .count(),
        1,
        "only the base variant survives"
    );
}

#[test]
fn single_marine_table_round_trips_through_lookup() {
    let table = RawTable::default()
        .with_section(IdCategory::UnitType, vec![RawEntry::new("Marine", 48)])
        .with_section(
            IdCategory::UnitType,
            vec![RawEntry::new("Marine", 48).with_index(1)],
        )
        .with_section(IdCategory::Ability, Vec::new())
        .with_section(IdCategory::Upgrade, Vec::new())
        .with_section(IdCategory::Buff, Vec::new())
        .with_section(IdCategory::Effect, Vec::new());
    let registry = IdRegistry::from_table(&table).expect("builds");

    assert_eq!(registry.lookup(IdCategory::UnitType, 48), Some("MARINE"));
    assert_eq!(registry.len(IdCategory::UnitType), 1);
}

#[test]
fn later_duplicates_overwrite_earlier_ones() {
    let registry = registry();

    assert_eq!(registry.resolve(IdCategory::Ability, "ATTACK"), Some(23));
    assert_eq!(registry.lookup(IdCategory::Ability, 3674), None);
}

#[test]
fn smart_is_pinned_even_when_the_table_only_has_a_variant() {
    let registry = registry();

    assert_eq!(registry.ability("SMART").map(|id| id.get()), Some(1));
}

#[test]
fn empty_names_are_skipped() {
    let registry = registry();

    assert_eq!(registry.lookup(IdCategory::UnitType, 0), None);
    assert_eq!(registry.len(IdCategory::UnitType), 3);
}

#[test]
fn entries_are_sorted_by_id() {
    let registry = registry();
    let ids: Vec<u32> = registry
        .entries(IdCategory::UnitType)
        .map(|(id, _)| id)
        .collect();

    assert_eq!(ids, vec![18, 45, 48]);
}

#[test]
fn missing_category_fails_without_partial_registry() {
    let json = r#"{"Units": [], "Abilities": [], "Upgrades": [], "Buffs": []}"#;

    assert!(matches!(
        IdRegistry::from_json(json),
        Err(RegistryError::MissingCategory(IdCategory::Effect))
    ));
}

#[test]
fn regeneration_is_byte_identical() {
    let first = registry().render();
    let second = registry().render();
    assert_eq!(first, second);

    let restored = IdRegistry::from_published(&first).expect("artifact parses");
    assert_eq!(restored, registry());
    assert_eq!(restored.render(), first);
}

#[test]
fn published_artifact_is_versioned_with_quoted_keys() {
    let rendered = registry().render();

    assert!(rendered.starts_with('#'));
    assert!(rendered.contains("version = 1\n"));
    assert!(rendered.contains("[Units]\n\"COMMANDCENTER\" = 18\n\"SCV\" = 45\n\"MARINE\" = 48\n"));
    assert!(rendered.contains("[Abilities]\n\"SMART\" = 1\n\"ATTACK\" = 23\n"));
}

#[test]
fn shared_ids_keep_source_order_through_the_artifact() {
    let json = r#"{
        "Units": [
            {"id": 9, "name": "Widow Mine"},
            {"id": 4, "name": "Hellion"},
            {"id": 9, "name": "Arming Mine"}
        ],
        "Abilities": [], "Upgrades": [], "Buffs": [], "Effects": []
    }"#;
    let registry = IdRegistry::from_json(json).expect("table is complete");

    assert_eq!(registry.lookup(IdCategory::UnitType, 9), Some("WIDOW_MINE"));
    let rendered = registry.render();
    assert!(rendered.contains("[Units]\n\"HELLION\" = 4\n\"WIDOW_MINE\" = 9\n\"ARMING_MINE\" = 9\n"));

    let restored = IdRegistry::from_published(&rendered).expect("artifact parses");
    assert_eq!(restored.lookup(IdCategory::UnitType, 9), Some("WIDOW_MINE"));
    assert_eq!(restored.render(), rendered);
}

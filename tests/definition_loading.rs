//! Integration tests for loading definition and instance files from disk.

use pixeldelve::{
    load_behaviours, load_characteristics, AppearanceDefinitions, BehaviourDefinitions,
    CharacteristicDefinitions, DefinitionTable, DelveError, DelveResult, GrowthType, PixelPoint,
    Property, PropertyType, Sprite, SpriteType,
};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_json(value: &serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", value).unwrap();
    file
}

fn characteristic_file() -> NamedTempFile {
    write_json(&json!({
        "characteristics": [
            {
                "index": 12,
                "name": "Health",
                "description": "Hit points",
                "defaults": { "required": true, "growth": "variable" }
            },
            {
                "index": 13,
                "name": "Material",
                "description": "What the thing is made of",
                "defaults": { "required": false, "growth": "fixed" },
                "subProperties": [
                    { "value": 1, "name": "stone", "description": "Grey stone" },
                    { "value": 2, "name": "wood", "description": "Old oak" }
                ]
            }
        ]
    }))
}

#[test]
fn test_characteristic_table_from_disk() -> DelveResult<()> {
    let file = characteristic_file();
    let table: CharacteristicDefinitions = DefinitionTable::from_path(file.path())?;

    assert_eq!(table.len(), 2);
    let health = table.require(12)?;
    assert_eq!(health.name, "Health");
    assert_eq!(health.defaults.growth, GrowthType::Variable);
    assert!(health.sub_properties.is_none());

    let material = table.require(13)?;
    assert_eq!(material.sub_properties.as_ref().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn test_instances_resolve_against_the_table() -> DelveResult<()> {
    let file = characteristic_file();
    let table: CharacteristicDefinitions = DefinitionTable::from_path(file.path())?;

    let instances = json!({
        "characteristics": [
            { "index": 12, "currentValue": 8, "maximumValue": 10 },
            { "index": 13, "currentValue": 2 }
        ]
    });
    let properties = load_characteristics(&instances, &table)?;

    assert_eq!(properties[0], Property::new(12, 8, 10));
    assert_eq!(properties[1].current_value, 2);
    assert_eq!(properties[1].maximum_value, 2);
    assert_eq!(
        properties[1].sub_property.as_ref().map(|s| s.name.as_str()),
        Some("wood")
    );

    let unknown = json!({
        "characteristics": [{ "index": 14, "currentValue": 1, "maximumValue": 1 }]
    });
    assert!(matches!(
        load_characteristics(&unknown, &table),
        Err(DelveError::Validation(_))
    ));
    Ok(())
}

#[test]
fn test_behaviours_load_typed() -> DelveResult<()> {
    let table = BehaviourDefinitions::from_json(&json!({
        "behaviours": [
            {
                "index": 200,
                "name": "Wander",
                "description": "Moves at random",
                "defaults": { "required": false, "growth": "fixed" }
            }
        ]
    }))?;

    let properties = load_behaviours(
        &json!({ "behaviours": [{ "index": 200, "currentValue": 3, "maximumValue": 5 }] }),
        &table,
    )?;
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].property_type, PropertyType::Behaviour);
    Ok(())
}

#[test]
fn test_loaded_appearance_shapes_a_sprite() -> DelveResult<()> {
    let file = write_json(&json!({
        "appearances": [
            {
                "index": 5,
                "name": "Chest",
                "description": "A small chest",
                "defaults": { "required": true, "growth": "fixed" },
                "visualization": [
                    [true, true, true],
                    [true, false, true],
                    [true, false, false]
                ]
            }
        ]
    }));
    let appearances: AppearanceDefinitions = DefinitionTable::from_path(file.path())?;
    let chest = appearances.for_sprite(SpriteType::Item)?;
    assert_eq!(chest.data_capacity(), 3);

    let mut sprite = Sprite::new(SpriteType::Item, PixelPoint::origin(), chest);
    let stored = sprite.persist_characteristics(&[
        Property::new(12, 1, 1),
        Property::new(13, 2, 2),
        Property::new(14, 3, 3),
        Property::new(15, 4, 4),
    ]);
    assert_eq!(stored, 3);
    assert_eq!(sprite.read_data_from_pixels(), vec![12, 1, 1, 13, 2, 2, 14, 3, 3]);
    Ok(())
}

#[test]
fn test_malformed_files_report_their_path() {
    let file = write_json(&json!({
        "appearances": [
            {
                "index": 5,
                "name": "Broken",
                "description": "Bad mask",
                "defaults": { "required": true, "growth": "fixed" },
                "visualization": [[true, "yes"]]
            }
        ]
    }));

    let error = AppearanceDefinitions::from_path(file.path()).unwrap_err();
    let message = error.to_string();
    assert!(message.contains(&file.path().display().to_string()));
    assert!(message.contains("is not a valid boolean in 'visualization'"));
}

#[test]
fn test_invalid_json_is_a_serde_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    let result = CharacteristicDefinitions::from_path(file.path());
    assert!(matches!(result, Err(DelveError::Serde(_))));
}

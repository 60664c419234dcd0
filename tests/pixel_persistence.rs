//! Integration tests for encoding properties into sprite pixels and back.

use pixeldelve::{
    builtin_appearances, AppearanceDefinition, DelveResult, PixelKind, PixelPoint, Property,
    Sprite, SpriteType,
};

fn checker_appearance() -> AppearanceDefinition {
    let mask = (0..16)
        .map(|row| (0..16).map(|col| (row + col) % 2 == 0).collect())
        .collect();
    AppearanceDefinition::new(5, "Checker", "Alternating pixels").with_visualization(mask)
}

#[test]
fn test_properties_survive_an_rgba_export() -> DelveResult<()> {
    let appearance = checker_appearance();
    let mut sprite = Sprite::new(SpriteType::Item, PixelPoint::new(32, 48), &appearance);

    let characteristics = vec![Property::new(1, 10, 20), Property::new(0, 0, 0)];
    let behaviours = vec![Property::new(200, 1, 1), Property::new(230, 4, 9)];
    assert_eq!(sprite.persist_properties(&characteristics, &behaviours), (2, 2));

    let rgba = sprite.to_rgba();
    assert_eq!(rgba.len(), 16 * 16 * 4);

    let restored = Sprite::from_rgba(
        SpriteType::Item,
        sprite.position,
        sprite.appearance_index,
        16,
        &rgba,
    )?;
    assert_eq!(restored.visualization_mask(), appearance.visualization);
    assert_eq!(restored.read_behaviours(), behaviours);
    // The all-zero characteristic is indistinguishable from an empty pixel
    // once exported.
    assert_eq!(restored.read_characteristics(), vec![Property::new(1, 10, 20)]);
    Ok(())
}

#[test]
fn test_zero_property_reads_back_in_memory() {
    let appearance = checker_appearance();
    let mut sprite = Sprite::new(SpriteType::Item, PixelPoint::origin(), &appearance);

    sprite.persist_characteristics(&[Property::new(0, 0, 0)]);
    assert_eq!(sprite.read_data_from_pixels(), vec![0, 0, 0]);
    assert_eq!(sprite.read_characteristics(), vec![Property::new(0, 0, 0)]);
}

#[test]
fn test_capacity_limits_what_is_stored() {
    let appearances = builtin_appearances();
    let character = appearances.get(SpriteType::Character.index()).unwrap();
    let mut sprite = Sprite::new(SpriteType::Character, PixelPoint::origin(), character);
    assert_eq!(sprite.data_pixel_count(), 14 * 14);

    let characteristics: Vec<Property> = (0..100).map(|i| Property::new(i, 1, 1)).collect();
    let behaviours: Vec<Property> = (200..250).map(|i| Property::new(i, 2, 2)).collect();

    assert_eq!(sprite.persist_properties(&characteristics, &behaviours), (60, 30));
    assert_eq!(sprite.read_characteristics(), characteristics[..60].to_vec());
    assert_eq!(sprite.read_behaviours(), behaviours[..30].to_vec());
}

#[test]
fn test_visual_pixels_are_never_written() {
    let appearance = checker_appearance();
    let mut sprite = Sprite::new(SpriteType::Item, PixelPoint::origin(), &appearance);
    sprite.persist_characteristics(&vec![Property::new(3, 4, 5); 10]);

    for row in sprite.pixels() {
        for pixel in row {
            if pixel.kind() == PixelKind::Visual {
                assert_eq!(pixel.rgba(), [0xFF; 4]);
            }
        }
    }
}

#[test]
fn test_malformed_rgba_is_rejected() {
    assert!(Sprite::from_rgba(SpriteType::Floor, PixelPoint::origin(), 4, 4, &[0; 10]).is_err());
    assert!(
        Sprite::from_rgba(SpriteType::Floor, PixelPoint::origin(), 4, 1, &[1, 2, 3, 0x80]).is_err()
    );
}

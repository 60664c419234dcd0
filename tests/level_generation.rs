//! Integration tests for end-to-end level generation.

use pixeldelve::config::{DEFAULT_BLOCK_SIZE, MAX_ROOMS_PER_LEVEL};
use pixeldelve::{
    builtin_appearances, utils, CharacterType, DelveResult, EntityKind, GenerationConfig,
    Generator, HallwayRouting, Level, LevelGenerator, LevelSummary, PropertySet, Quadrilateral,
    Room, RoomStage, SpriteType,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn generate(seed: u64) -> DelveResult<Level> {
    let generator = LevelGenerator::new(1024, 768);
    let config = GenerationConfig::for_testing(seed);
    let mut rng = utils::create_rng(&config);
    generator.generate(&config, &mut rng)
}

#[test]
fn test_generated_rooms_obey_placement_rules() -> DelveResult<()> {
    for seed in [1, 2, 3, 42, 1000] {
        let level = generate(seed)?;
        let rooms = level.rooms();

        assert!(!rooms.is_empty());
        assert!(rooms.len() <= MAX_ROOMS_PER_LEVEL);
        assert!(level.calculate_total_room_area_in_pixels() <= level.max_room_area());

        for (i, a) in rooms.iter().enumerate() {
            let block = DEFAULT_BLOCK_SIZE;
            assert_eq!(a.bounds.top_left_x % block, 0);
            assert_eq!(a.bounds.top_left_y % block, 0);
            assert!(a.bounds.bottom_right_x <= level.width());
            assert!(a.bounds.bottom_right_y <= level.height());
            for b in &rooms[i + 1..] {
                assert!(!a.bounds.intersects(&b.bounds));
                assert!(Level::place_room_far_apart(&a.bounds, &b.bounds));
            }
        }
    }
    Ok(())
}

#[test]
fn test_same_seed_same_level() -> DelveResult<()> {
    let first = generate(777)?;
    let second = generate(777)?;

    let bounds = |level: &Level| -> Vec<Quadrilateral<u16>> {
        level.rooms().iter().map(|room| room.bounds).collect()
    };
    assert_eq!(bounds(&first), bounds(&second));
    assert_eq!(LevelSummary::of(&first), LevelSummary::of(&second));

    let points = |level: &Level| {
        level
            .hallways()
            .iter()
            .map(|hallway| hallway.points())
            .collect::<Vec<_>>()
    };
    assert_eq!(points(&first), points(&second));
    Ok(())
}

#[test]
fn test_hallways_connect_consecutive_doors() -> DelveResult<()> {
    let level = generate(31)?;
    let rooms = level.rooms();
    let step = DEFAULT_BLOCK_SIZE as i32;

    for hallway in level.hallways() {
        let start = rooms
            .iter()
            .find_map(|room| room.door(hallway.start_door))
            .unwrap();
        let end = rooms
            .iter()
            .find_map(|room| room.door(hallway.end_door))
            .unwrap();
        let points = hallway.points();

        assert_eq!(points[0], start.position().offset(step, 0));
        assert_eq!(*points.last().unwrap(), end.position().offset(-step, 0));
        assert!(points
            .windows(2)
            .all(|pair| pair[0].manhattan_distance(pair[1]) == step as u32));
        assert!(hallway
            .tiles()
            .iter()
            .all(|tile| tile.kind == EntityKind::HallwayTile));
    }
    Ok(())
}

#[test]
fn test_avoid_rooms_routing_keeps_out_of_interiors() -> DelveResult<()> {
    let generator = LevelGenerator::new(1024, 768);
    let config = GenerationConfig {
        hallway_routing: HallwayRouting::AvoidRooms,
        ..GenerationConfig::for_testing(8)
    };
    let mut rng = utils::create_rng(&config);
    let level = generator.generate(&config, &mut rng)?;

    assert!(!level.hallways().is_empty());
    for hallway in level.hallways() {
        let points = hallway.points();
        let interior = &points[1..points.len().saturating_sub(1)];
        for point in interior {
            assert!(level
                .rooms()
                .iter()
                .all(|room| !room.bounds.contains_strictly(*point)));
        }
    }
    Ok(())
}

#[test]
fn test_manual_room_furnishing() -> DelveResult<()> {
    let appearances = builtin_appearances();
    let mut rng = StdRng::seed_from_u64(4);
    let mut room = Room::new(
        Quadrilateral::new(160, 160, 320, 320),
        &appearances,
        Vec::new(),
        Vec::new(),
        Vec::new(),
    )?;

    room.setup_static_room_elements(&mut rng)?;
    room.place_items(3, &PropertySet::default(), &mut rng)?;
    room.place_npcs(2, 2, &PropertySet::npc(), &mut rng)?;
    let player = room.place_player(&PropertySet::player(), &mut rng)?;
    assert_eq!(room.stage(), RoomStage::PlayerPlaced);

    let count = |sprite_type: SpriteType| {
        room.entities()
            .filter(|entity| entity.sprite_type() == sprite_type)
            .count()
    };
    // 10 x 10 blocks: 100 / 16 = 6 pillars and 6 traps.
    assert_eq!(count(SpriteType::Pillar), 6);
    assert_eq!(count(SpriteType::Trap), 6);
    assert_eq!(count(SpriteType::Item), 3);
    assert_eq!(count(SpriteType::Door), 2);
    assert_eq!(count(SpriteType::Character), 5);

    let adversaries = room
        .entities()
        .filter(|entity| entity.kind == EntityKind::Character(CharacterType::Adversary))
        .count();
    assert_eq!(adversaries, 2);

    let placed = room.entities().find(|entity| entity.id == player).unwrap();
    assert_eq!(placed.kind, EntityKind::Character(CharacterType::Player));
    assert_eq!(placed.sprite.read_characteristics(), PropertySet::player().characteristics);
    assert_eq!(placed.sprite.read_behaviours(), PropertySet::player().behaviours);
    Ok(())
}

//! # Rooms
//!
//! A room is a block grid inside its bounds. It starts as floor and is then
//! furnished in a fixed order: walls and doors, pillars and traps, items,
//! NPCs, and finally the player. Each step checks that the previous one has
//! completed.

use crate::config::DEFAULT_BLOCK_SIZE;
use crate::{
    AppearanceDefinitions, CharacterType, DelveError, DelveResult, EntityId, EntityKind,
    GameEntity, PixelPoint, Property, PropertySet, Quadrilateral, SpriteType,
};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::fmt;

/// Column of the door placed in the top wall.
const TOP_DOOR_COLUMN: usize = 2;
/// Column of the door placed in the bottom wall.
const BOTTOM_DOOR_COLUMN: usize = 3;

/// Furnishing progress of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoomStage {
    Initialized,
    WallsAndDoorsBuilt,
    PillarsAndTrapsPlaced,
    ItemsPlaced,
    NpcsPlaced,
    PlayerPlaced,
}

impl RoomStage {
    pub fn name(self) -> &'static str {
        match self {
            RoomStage::Initialized => "Initialized",
            RoomStage::WallsAndDoorsBuilt => "WallsAndDoorsBuilt",
            RoomStage::PillarsAndTrapsPlaced => "PillarsAndTrapsPlaced",
            RoomStage::ItemsPlaced => "ItemsPlaced",
            RoomStage::NpcsPlaced => "NpcsPlaced",
            RoomStage::PlayerPlaced => "PlayerPlaced",
        }
    }
}

impl fmt::Display for RoomStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A walled room: bounds, a block grid of entities and the property lists its
/// structure carries.
#[derive(Debug, Clone)]
pub struct Room {
    pub bounds: Quadrilateral<u16>,
    grid: Vec<Vec<GameEntity>>,
    appearances: AppearanceDefinitions,
    wall_characteristics: Vec<Property>,
    floor_characteristics: Vec<Property>,
    door_characteristics: Vec<Property>,
    stage: RoomStage,
    max_placement_attempts: u32,
}

impl Room {
    /// Creates a room whose grid is all floor.
    ///
    /// The grid is `height_in_blocks` rows of `width_in_blocks` cells. Fails
    /// when the table has no floor appearance.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldelve::{builtin_appearances, Quadrilateral, Room, RoomStage, SpriteType};
    ///
    /// let room = Room::new(
    ///     Quadrilateral::new(0, 0, 96, 64),
    ///     &builtin_appearances(),
    ///     Vec::new(),
    ///     Vec::new(),
    ///     Vec::new(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(room.rows(), 4);
    /// assert_eq!(room.cols(), 6);
    /// assert_eq!(room.stage(), RoomStage::Initialized);
    /// assert_eq!(room.entity(1, 1).unwrap().sprite_type(), SpriteType::Floor);
    /// ```
    pub fn new(
        bounds: Quadrilateral<u16>,
        appearances: &AppearanceDefinitions,
        wall_characteristics: Vec<Property>,
        floor_characteristics: Vec<Property>,
        door_characteristics: Vec<Property>,
    ) -> DelveResult<Self> {
        let floor = appearances.for_sprite(SpriteType::Floor)?;
        let rows = bounds.height_in_blocks() as usize;
        let cols = bounds.width_in_blocks() as usize;
        let origin = bounds.top_left();

        let grid = (0..rows)
            .map(|row| {
                (0..cols)
                    .map(|col| {
                        let mut tile = GameEntity::tile(
                            SpriteType::Floor,
                            block_position(origin, row, col),
                            floor,
                        )
                        .with_properties(PropertySet::new(
                            floor_characteristics.clone(),
                            Vec::new(),
                        ));
                        tile.persist_properties();
                        tile
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            bounds,
            grid,
            appearances: appearances.clone(),
            wall_characteristics,
            floor_characteristics,
            door_characteristics,
            stage: RoomStage::Initialized,
            max_placement_attempts: 1000,
        })
    }

    /// Caps the samples drawn per random placement.
    pub fn with_max_placement_attempts(mut self, attempts: u32) -> Self {
        self.max_placement_attempts = attempts;
        self
    }

    pub fn stage(&self) -> RoomStage {
        self.stage
    }

    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn cols(&self) -> usize {
        self.grid.first().map_or(0, Vec::len)
    }

    pub fn grid(&self) -> &[Vec<GameEntity>] {
        &self.grid
    }

    pub fn entity(&self, row: usize, col: usize) -> Option<&GameEntity> {
        self.grid.get(row).and_then(|r| r.get(col))
    }

    /// Every entity in the room, row-major.
    pub fn entities(&self) -> impl Iterator<Item = &GameEntity> {
        self.grid.iter().flatten()
    }

    pub fn wall_characteristics(&self) -> &[Property] {
        &self.wall_characteristics
    }

    pub fn floor_characteristics(&self) -> &[Property] {
        &self.floor_characteristics
    }

    pub fn door_characteristics(&self) -> &[Property] {
        &self.door_characteristics
    }

    /// Doors in row-major order.
    pub fn doors(&self) -> impl Iterator<Item = &GameEntity> {
        self.entities().filter(|e| e.kind == EntityKind::Door)
    }

    pub fn door(&self, id: EntityId) -> Option<&GameEntity> {
        self.doors().find(|door| door.id == id)
    }

    /// Number of cells currently holding plain floor.
    pub fn floor_cell_count(&self) -> usize {
        self.entities()
            .filter(|e| e.sprite_type() == SpriteType::Floor)
            .count()
    }

    /// Rooms need at least two blocks on each side.
    pub fn is_valid_dimension_in_pixels(&self) -> bool {
        is_valid_room_size(&self.bounds)
    }

    /// Structural classification of a cell by position alone.
    pub fn sprite_type_at(&self, row: usize, col: usize) -> SpriteType {
        let last_row = self.rows().saturating_sub(1);
        let last_col = self.cols().saturating_sub(1);
        let edge_row = row == 0 || row == last_row;
        let edge_col = col == 0 || col == last_col;

        match (edge_row, edge_col) {
            (true, true) => SpriteType::Corner,
            (true, false) => SpriteType::HorizontalWall,
            (false, true) => SpriteType::VerticalWall,
            (false, false) => SpriteType::Floor,
        }
    }

    /// Replaces the entity at `(row, col)`. Returns false when out of bounds.
    pub fn add_sprite(&mut self, entity: GameEntity, row: usize, col: usize) -> bool {
        match self.grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = entity;
                true
            }
            None => {
                warn!("Invalid location: ({}, {}) is out of bounds", row, col);
                false
            }
        }
    }

    /// Tiles the perimeter with corners and walls, then places the two doors.
    ///
    /// Returns the number of doors placed.
    pub fn build_walls_and_doors(&mut self) -> DelveResult<usize> {
        self.require_stage(RoomStage::Initialized, "build walls and doors")?;

        let origin = self.bounds.top_left();
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                let sprite_type = self.sprite_type_at(row, col);
                if sprite_type == SpriteType::Floor {
                    continue;
                }
                let appearance = self.appearances.for_sprite(sprite_type)?;
                let mut wall =
                    GameEntity::tile(sprite_type, block_position(origin, row, col), appearance)
                        .with_properties(PropertySet::new(
                            self.wall_characteristics.clone(),
                            Vec::new(),
                        ));
                wall.persist_properties();
                self.grid[row][col] = wall;
            }
        }

        let mut doors = 0;
        if self.cols() >= 3 {
            let last_interior = self.cols() - 2;
            let top = TOP_DOOR_COLUMN.clamp(1, last_interior);
            let bottom = BOTTOM_DOOR_COLUMN.clamp(1, last_interior);
            let last_row = self.rows() - 1;
            for (row, col) in [(0, top), (last_row, bottom)] {
                if self.add_door(row, col)? {
                    doors += 1;
                }
            }
        } else {
            warn!("Room {} is too narrow for doors", self.bounds.id());
        }

        self.stage = RoomStage::WallsAndDoorsBuilt;
        debug!("Built walls and {} doors for room {}", doors, self.bounds.id());
        Ok(doors)
    }

    /// Puts a door on a wall cell. Corners, floor and out-of-bounds cells are
    /// refused with `Ok(false)`.
    pub fn add_door(&mut self, row: usize, col: usize) -> DelveResult<bool> {
        if row >= self.rows() || col >= self.cols() {
            warn!("Invalid door location: ({}, {}) is out of bounds", row, col);
            return Ok(false);
        }
        match self.sprite_type_at(row, col) {
            SpriteType::HorizontalWall | SpriteType::VerticalWall => {}
            other => {
                warn!(
                    "Invalid position for a door at ({}, {}): {} is not a perimeter wall",
                    row, col, other
                );
                return Ok(false);
            }
        }
        if self.grid[row][col].kind == EntityKind::Door {
            return Ok(false);
        }

        let appearance = self.appearances.for_sprite(SpriteType::Door)?;
        let mut door = GameEntity::new(
            EntityKind::Door,
            SpriteType::Door,
            block_position(self.bounds.top_left(), row, col),
            appearance,
        )
        .with_properties(PropertySet::new(self.door_characteristics.clone(), Vec::new()));
        door.persist_properties();
        Ok(self.add_sprite(door, row, col))
    }

    /// Places `max(1, area_in_blocks / 16)` pillars and as many traps.
    pub fn place_pillars_and_traps(&mut self, rng: &mut StdRng) -> DelveResult<()> {
        self.require_stage(RoomStage::WallsAndDoorsBuilt, "place pillars and traps")?;

        let count = ((self.bounds.area_in_blocks() / 16) as usize).max(1);
        self.ensure_floor_capacity(count * 2, "pillars and traps")?;
        for sprite_type in [SpriteType::Pillar, SpriteType::Trap] {
            let appearance = self.appearances.for_sprite(sprite_type)?.clone();
            self.place_random(count, rng, |position| {
                GameEntity::tile(sprite_type, position, &appearance)
            })?;
        }

        self.stage = RoomStage::PillarsAndTrapsPlaced;
        Ok(())
    }

    /// Places `count` items carrying `properties`.
    pub fn place_items(
        &mut self,
        count: usize,
        properties: &PropertySet,
        rng: &mut StdRng,
    ) -> DelveResult<()> {
        self.require_stage(RoomStage::PillarsAndTrapsPlaced, "place items")?;
        self.ensure_floor_capacity(count, "items")?;

        let appearance = self.appearances.for_sprite(SpriteType::Item)?.clone();
        self.place_random(count, rng, |position| {
            let mut item =
                GameEntity::new(EntityKind::Item, SpriteType::Item, position, &appearance)
                    .with_properties(properties.clone());
            item.persist_properties();
            item
        })?;

        self.stage = RoomStage::ItemsPlaced;
        Ok(())
    }

    /// Places adversaries, then neutral characters.
    pub fn place_npcs(
        &mut self,
        adversaries: usize,
        neutrals: usize,
        properties: &PropertySet,
        rng: &mut StdRng,
    ) -> DelveResult<()> {
        self.require_stage(RoomStage::ItemsPlaced, "place NPCs")?;
        self.ensure_floor_capacity(adversaries + neutrals, "NPCs")?;

        let appearance = self.appearances.for_sprite(SpriteType::Character)?.clone();
        for (character_type, count) in [
            (CharacterType::Adversary, adversaries),
            (CharacterType::Neutral, neutrals),
        ] {
            self.place_random(count, rng, |position| {
                GameEntity::character(character_type, position, &appearance, properties.clone())
            })?;
        }

        self.stage = RoomStage::NpcsPlaced;
        Ok(())
    }

    /// Places the player character and returns its id.
    pub fn place_player(
        &mut self,
        properties: &PropertySet,
        rng: &mut StdRng,
    ) -> DelveResult<EntityId> {
        self.require_stage(RoomStage::NpcsPlaced, "place the player")?;
        self.ensure_floor_capacity(1, "the player")?;

        let (row, col) = self.random_floor_cell(rng)?;
        let appearance = self.appearances.for_sprite(SpriteType::Character)?;
        let player = GameEntity::character(
            CharacterType::Player,
            block_position(self.bounds.top_left(), row, col),
            appearance,
            properties.clone(),
        );
        let id = player.id;
        self.grid[row][col] = player;

        self.stage = RoomStage::PlayerPlaced;
        debug!("Placed player {} at ({}, {})", id, row, col);
        Ok(id)
    }

    /// Walls, doors, pillars and traps in one call.
    pub fn setup_static_room_elements(&mut self, rng: &mut StdRng) -> DelveResult<()> {
        self.build_walls_and_doors()?;
        self.place_pillars_and_traps(rng)
    }

    /// True when every non-player step fits in the current free floor.
    pub fn can_host(&self, placements: usize) -> bool {
        self.floor_cell_count() >= placements
    }

    fn require_stage(&self, expected: RoomStage, action: &str) -> DelveResult<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(DelveError::InvalidState(format!(
                "cannot {} while room is {}; expected {}",
                action, self.stage, expected
            )))
        }
    }

    fn ensure_floor_capacity(&self, needed: usize, what: &str) -> DelveResult<()> {
        let available = self.floor_cell_count();
        if needed > available {
            return Err(DelveError::PlacementFailed(format!(
                "room {} has {} free floor cells but {} {} were requested",
                self.bounds.id(),
                available,
                needed,
                what
            )));
        }
        Ok(())
    }

    fn is_valid_floor_tile(&self, row: usize, col: usize) -> bool {
        self.entity(row, col)
            .is_some_and(|e| e.sprite_type() == SpriteType::Floor)
    }

    /// Samples cells uniformly until one holds plain floor.
    fn random_floor_cell(&self, rng: &mut StdRng) -> DelveResult<(usize, usize)> {
        let (rows, cols) = (self.rows(), self.cols());
        if rows > 0 && cols > 0 {
            for _ in 0..self.max_placement_attempts {
                let row = rng.gen_range(0..rows);
                let col = rng.gen_range(0..cols);
                if self.is_valid_floor_tile(row, col) {
                    return Ok((row, col));
                }
            }
        }

        warn!(
            "No free floor cell found in room {} after {} attempts",
            self.bounds.id(),
            self.max_placement_attempts
        );
        Err(DelveError::PlacementFailed(format!(
            "no free floor cell found in room {} within {} attempts",
            self.bounds.id(),
            self.max_placement_attempts
        )))
    }

    /// Fills `count` random floor cells with entities built by `make`.
    fn place_random<F>(&mut self, count: usize, rng: &mut StdRng, mut make: F) -> DelveResult<()>
    where
        F: FnMut(PixelPoint) -> GameEntity,
    {
        let origin = self.bounds.top_left();
        for _ in 0..count {
            let (row, col) = self.random_floor_cell(rng)?;
            self.grid[row][col] = make(block_position(origin, row, col));
        }
        debug!("Placed {} entities in room {}", count, self.bounds.id());
        Ok(())
    }
}

/// Absolute pixel position of a grid cell.
fn block_position(origin: PixelPoint, row: usize, col: usize) -> PixelPoint {
    let block = DEFAULT_BLOCK_SIZE as i32;
    origin.offset(col as i32 * block, row as i32 * block)
}

/// Rooms need at least two blocks on each side.
pub fn is_valid_room_size(bounds: &Quadrilateral<u16>) -> bool {
    let minimum = 2 * DEFAULT_BLOCK_SIZE as u32;
    bounds.width_in_pixels() >= minimum && bounds.height_in_pixels() >= minimum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builtin_appearances, DefinitionTable};
    use rand::SeedableRng;

    fn room(width: u16, height: u16) -> Room {
        Room::new(
            Quadrilateral::new(32, 48, 32 + width, 48 + height),
            &builtin_appearances(),
            vec![Property::new(3, 9, 9)],
            Vec::new(),
            vec![Property::new(4, 1, 1)],
        )
        .unwrap()
    }

    fn count(room: &Room, sprite_type: SpriteType) -> usize {
        room.entities().filter(|e| e.sprite_type() == sprite_type).count()
    }

    #[test]
    fn test_new_room_is_all_floor() {
        let room = room(128, 96);
        assert_eq!(room.rows(), 6);
        assert_eq!(room.cols(), 8);
        assert_eq!(room.floor_cell_count(), 48);
        assert_eq!(room.entity(2, 3).unwrap().position(), PixelPoint::new(32 + 48, 48 + 32));
    }

    #[test]
    fn test_missing_floor_appearance() {
        let result = Room::new(
            Quadrilateral::new(0, 0, 64, 64),
            &DefinitionTable::default(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        assert!(matches!(
            result,
            Err(DelveError::DefinitionNotFound { index: 4, .. })
        ));
    }

    #[test]
    fn test_sprite_type_classification() {
        let room = room(80, 64);
        assert_eq!(room.sprite_type_at(0, 0), SpriteType::Corner);
        assert_eq!(room.sprite_type_at(0, 4), SpriteType::Corner);
        assert_eq!(room.sprite_type_at(3, 0), SpriteType::Corner);
        assert_eq!(room.sprite_type_at(3, 4), SpriteType::Corner);
        assert_eq!(room.sprite_type_at(0, 2), SpriteType::HorizontalWall);
        assert_eq!(room.sprite_type_at(3, 1), SpriteType::HorizontalWall);
        assert_eq!(room.sprite_type_at(1, 0), SpriteType::VerticalWall);
        assert_eq!(room.sprite_type_at(2, 4), SpriteType::VerticalWall);
        assert_eq!(room.sprite_type_at(1, 1), SpriteType::Floor);
    }

    #[test]
    fn test_walls_and_doors() {
        let mut room = room(96, 80);
        assert_eq!(room.build_walls_and_doors().unwrap(), 2);

        assert_eq!(count(&room, SpriteType::Corner), 4);
        assert_eq!(room.entity(0, 2).unwrap().kind, EntityKind::Door);
        assert_eq!(room.entity(4, 3).unwrap().kind, EntityKind::Door);
        assert_eq!(room.doors().count(), 2);
        assert_eq!(room.floor_cell_count(), 4 * 3);

        let wall = room.entity(2, 0).unwrap();
        assert_eq!(wall.sprite.read_characteristics(), vec![Property::new(3, 9, 9)]);
        let door = room.entity(0, 2).unwrap();
        assert_eq!(door.sprite.read_characteristics(), vec![Property::new(4, 1, 1)]);
        assert!(room.door(door.id).is_some());
    }

    #[test]
    fn test_door_columns_are_clamped() {
        let mut narrow = room(48, 48);
        assert_eq!(narrow.build_walls_and_doors().unwrap(), 2);
        assert_eq!(narrow.entity(0, 1).unwrap().kind, EntityKind::Door);
        assert_eq!(narrow.entity(2, 1).unwrap().kind, EntityKind::Door);

        let mut too_narrow = room(32, 64);
        assert_eq!(too_narrow.build_walls_and_doors().unwrap(), 0);
        assert_eq!(too_narrow.stage(), RoomStage::WallsAndDoorsBuilt);
    }

    #[test]
    fn test_add_door_only_on_walls() {
        let mut room = room(96, 96);
        room.build_walls_and_doors().unwrap();
        assert!(!room.add_door(0, 0).unwrap());
        assert!(!room.add_door(2, 2).unwrap());
        assert!(!room.add_door(40, 2).unwrap());
        assert!(room.add_door(2, 0).unwrap());
        assert_eq!(room.doors().count(), 3);
    }

    #[test]
    fn test_add_sprite_bounds() {
        let mut room = room(64, 64);
        let appearance = builtin_appearances();
        let item = GameEntity::tile(
            SpriteType::Item,
            PixelPoint::origin(),
            appearance.for_sprite(SpriteType::Item).unwrap(),
        );
        assert!(!room.add_sprite(item.clone(), 4, 0));
        assert!(room.add_sprite(item, 3, 3));
        assert_eq!(room.entity(3, 3).unwrap().sprite_type(), SpriteType::Item);
    }

    #[test]
    fn test_full_furnishing_sequence() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut room = room(128, 128);
        room.setup_static_room_elements(&mut rng).unwrap();
        // 8 x 8 blocks: 64 / 16 = 4 of each
        assert_eq!(count(&room, SpriteType::Pillar), 4);
        assert_eq!(count(&room, SpriteType::Trap), 4);

        room.place_items(3, &PropertySet::default(), &mut rng).unwrap();
        assert_eq!(count(&room, SpriteType::Item), 3);

        room.place_npcs(2, 2, &PropertySet::npc(), &mut rng).unwrap();
        let adversaries = room
            .entities()
            .filter(|e| e.kind == EntityKind::Character(CharacterType::Adversary))
            .count();
        assert_eq!(adversaries, 2);
        assert_eq!(count(&room, SpriteType::Character), 4);

        let player_id = room.place_player(&PropertySet::player(), &mut rng).unwrap();
        assert_eq!(room.stage(), RoomStage::PlayerPlaced);

        let player = room.entities().find(|e| e.id == player_id).unwrap();
        assert_eq!(player.kind, EntityKind::Character(CharacterType::Player));
        assert_eq!(player.sprite.read_characteristics(), PropertySet::player().characteristics);

        // Nothing random lands on the perimeter.
        for col in 0..room.cols() {
            assert!(!room.entity(0, col).unwrap().is_character());
            assert!(!room.entity(room.rows() - 1, col).unwrap().is_character());
        }
    }

    #[test]
    fn test_small_room_gets_one_pillar_and_trap() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut room = room(64, 64);
        room.setup_static_room_elements(&mut rng).unwrap();
        assert_eq!(count(&room, SpriteType::Pillar), 1);
        assert_eq!(count(&room, SpriteType::Trap), 1);
        assert_eq!(room.floor_cell_count(), 2);
    }

    #[test]
    fn test_steps_out_of_order_fail() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut room = room(128, 128);

        assert!(matches!(
            room.place_items(1, &PropertySet::default(), &mut rng),
            Err(DelveError::InvalidState(_))
        ));
        assert!(matches!(
            room.place_player(&PropertySet::player(), &mut rng),
            Err(DelveError::InvalidState(_))
        ));

        room.build_walls_and_doors().unwrap();
        assert!(matches!(
            room.build_walls_and_doors(),
            Err(DelveError::InvalidState(_))
        ));
        assert!(room.place_npcs(1, 1, &PropertySet::npc(), &mut rng).is_err());
        assert_eq!(room.stage(), RoomStage::WallsAndDoorsBuilt);
    }

    #[test]
    fn test_overfull_request_fails_instead_of_looping() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut room = room(64, 64);
        room.setup_static_room_elements(&mut rng).unwrap();

        let result = room.place_items(3, &PropertySet::default(), &mut rng);
        assert!(matches!(result, Err(DelveError::PlacementFailed(_))));
        assert_eq!(room.stage(), RoomStage::PillarsAndTrapsPlaced);
    }

    #[test]
    fn test_attempt_budget_is_enforced() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut room = room(256, 256).with_max_placement_attempts(0);
        room.build_walls_and_doors().unwrap();

        let result = room.place_pillars_and_traps(&mut rng);
        assert!(matches!(result, Err(DelveError::PlacementFailed(_))));
    }

    #[test]
    fn test_valid_dimension() {
        assert!(room(32, 32).is_valid_dimension_in_pixels());
        assert!(!room(16, 64).is_valid_dimension_in_pixels());
        assert!(is_valid_room_size(&Quadrilateral::new(0, 0, 32, 48)));
        assert!(!is_valid_room_size(&Quadrilateral::new(0, 0, 31, 48)));
    }
}

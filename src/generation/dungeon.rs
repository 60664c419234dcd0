//! # Level Generation
//!
//! Ties rooms, furnishing and hallways together into a complete level.

use super::{GenerationConfig, Generator, Level, Room, RoomStage};
use crate::{
    builtin_appearances, AppearanceDefinitions, DelveError, DelveResult, EntityId, Property,
    PropertySet, SpriteType,
};
use log::{info, warn};
use rand::rngs::StdRng;

/// Primary level generator.
///
/// This generator creates levels by:
/// 1. Placing rooms randomly under the spacing and coverage rules
/// 2. Furnishing every room with walls, doors, pillars, traps, items and NPCs
/// 3. Placing the player in the first room with space left
/// 4. Connecting consecutive rooms with hallways
#[derive(Debug, Clone)]
pub struct LevelGenerator {
    /// Level width in pixels
    pub width: u16,
    /// Level height in pixels
    pub height: u16,
    /// Appearances every sprite is drawn with
    pub appearances: AppearanceDefinitions,
    /// Characteristics persisted into every hallway tile
    pub hallway_characteristics: Vec<Property>,
    /// Properties carried by every item
    pub item_properties: PropertySet,
    /// Properties carried by every NPC
    pub npc_properties: PropertySet,
    /// Properties carried by the player
    pub player_properties: PropertySet,
}

/// What a generated level contains, for logging and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelSummary {
    pub rooms: usize,
    pub furnished_rooms: usize,
    pub hallways: usize,
    pub hallway_tiles: usize,
    pub characters: usize,
    pub has_player: bool,
}

impl LevelSummary {
    pub fn of(level: &Level) -> Self {
        let rooms = level.rooms();
        Self {
            rooms: rooms.len(),
            furnished_rooms: rooms
                .iter()
                .filter(|room| room.stage() >= RoomStage::NpcsPlaced)
                .count(),
            hallways: level.hallways().len(),
            hallway_tiles: level.hallways().iter().map(|h| h.len()).sum(),
            characters: rooms
                .iter()
                .flat_map(|room| room.entities())
                .filter(|entity| entity.is_character())
                .count(),
            has_player: rooms
                .iter()
                .any(|room| room.stage() == RoomStage::PlayerPlaced),
        }
    }
}

impl LevelGenerator {
    /// Creates a generator for a level of the given size with the built-in
    /// appearances.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldelve::{utils, GenerationConfig, Generator, LevelGenerator};
    ///
    /// let generator = LevelGenerator::new(640, 480);
    /// let config = GenerationConfig::for_testing(7);
    /// let mut rng = utils::create_rng(&config);
    ///
    /// let level = generator.generate(&config, &mut rng).unwrap();
    /// assert!(level.room_count() > 0);
    /// ```
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            appearances: builtin_appearances(),
            hallway_characteristics: Vec::new(),
            item_properties: PropertySet::default(),
            npc_properties: PropertySet::npc(),
            player_properties: PropertySet::player(),
        }
    }

    /// Creates a small generator suited to tests.
    pub fn for_testing() -> Self {
        Self::new(640, 480)
    }

    pub fn with_appearances(mut self, appearances: AppearanceDefinitions) -> Self {
        self.appearances = appearances;
        self
    }

    pub fn with_hallway_characteristics(mut self, characteristics: Vec<Property>) -> Self {
        self.hallway_characteristics = characteristics;
        self
    }

    /// Furnishes every room up to and including its NPCs.
    ///
    /// Rooms too small for a step are left at the last stage they reached.
    fn furnish_rooms(
        &self,
        level: &mut Level,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<usize> {
        let mut furnished = 0;
        for room in level.rooms_mut() {
            let result = self.furnish_room(room, config, rng);
            match result {
                Ok(()) => furnished += 1,
                Err(DelveError::PlacementFailed(reason)) => {
                    warn!(
                        "Room {} left at stage {}: {}",
                        room.bounds.id(),
                        room.stage(),
                        reason
                    );
                }
                Err(error) => return Err(error),
            }
        }
        Ok(furnished)
    }

    fn furnish_room(
        &self,
        room: &mut Room,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<()> {
        room.setup_static_room_elements(rng)?;
        room.place_items(config.items_per_room as usize, &self.item_properties, rng)?;
        room.place_npcs(
            config.adversaries_per_room as usize,
            config.neutrals_per_room as usize,
            &self.npc_properties,
            rng,
        )
    }

    /// Places the player in the first furnished room with a free floor cell.
    fn place_player(&self, level: &mut Level, rng: &mut StdRng) -> DelveResult<Option<EntityId>> {
        for room in level.rooms_mut() {
            if room.stage() == RoomStage::NpcsPlaced && room.can_host(1) {
                return room.place_player(&self.player_properties, rng).map(Some);
            }
        }
        warn!("No room has space for the player");
        Ok(None)
    }
}

impl Generator<Level> for LevelGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Level> {
        let mut level = Level::new(self.width, self.height);

        // Place rooms
        level.build_level(&self.appearances, config, rng)?;

        // Furnish them
        self.furnish_rooms(&mut level, config, rng)?;

        // Drop the player in
        self.place_player(&mut level, rng)?;

        // Connect consecutive rooms
        let hallway_appearance = self.appearances.for_sprite(SpriteType::HallwayTile)?;
        level.connect_rooms(
            hallway_appearance,
            &self.hallway_characteristics,
            config.hallway_routing,
        )?;

        self.validate(&level, config)?;

        let summary = LevelSummary::of(&level);
        info!(
            "Generated {} with {} rooms ({} furnished), {} hallways and {} characters",
            level.id(),
            summary.rooms,
            summary.furnished_rooms,
            summary.hallways,
            summary.characters
        );
        Ok(level)
    }

    fn validate(&self, level: &Level, _config: &GenerationConfig) -> DelveResult<()> {
        if level.room_count() == 0 {
            return Err(DelveError::GenerationFailed(format!(
                "{} has no rooms",
                level.id()
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "LevelGenerator"
    }
}

impl Default for LevelGenerator {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

//! # Entities Module
//!
//! Everything that occupies a block on the map is a [`GameEntity`]: a sprite
//! plus a kind tag plus the entity's own characteristic and behaviour lists.
//! The lists are the source of truth; the sprite's data pixels hold their
//! encoded copy after [`GameEntity::persist_properties`].

use crate::{AppearanceDefinition, PixelPoint, Property, Sprite, SpriteType};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for entities.
pub type EntityId = Uuid;

/// Generates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

/// Allegiance of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterType {
    /// The player-controlled character ("Self")
    Player = 0,
    Ally = 1,
    Neutral = 2,
    Adversary = 3,
}

impl CharacterType {
    pub const ALL: [CharacterType; 4] = [
        CharacterType::Player,
        CharacterType::Ally,
        CharacterType::Neutral,
        CharacterType::Adversary,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            CharacterType::Player => "Self",
            CharacterType::Ally => "Ally",
            CharacterType::Neutral => "Neutral",
            CharacterType::Adversary => "Adversary",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            CharacterType::Player => 'S',
            CharacterType::Ally => 'A',
            CharacterType::Neutral => 'N',
            CharacterType::Adversary => 'E',
        }
    }
}

impl fmt::Display for CharacterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an entity is, beyond its sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Static room structure: floor, walls, corners, pillars, traps
    Tile,
    Item,
    Door,
    HallwayTile,
    Character(CharacterType),
}

/// A characteristic list paired with a behaviour list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySet {
    pub characteristics: Vec<Property>,
    pub behaviours: Vec<Property>,
}

impl PropertySet {
    pub fn new(characteristics: Vec<Property>, behaviours: Vec<Property>) -> Self {
        Self {
            characteristics,
            behaviours,
        }
    }

    /// Placeholder stats handed to every non-player character.
    pub fn npc() -> Self {
        Self::new(vec![Property::new(1, 10, 10)], vec![Property::new(200, 1, 1)])
    }

    /// Placeholder stats for the player character.
    pub fn player() -> Self {
        Self::new(vec![Property::new(1, 15, 15)], vec![Property::new(200, 2, 2)])
    }

    pub fn is_empty(&self) -> bool {
        self.characteristics.is_empty() && self.behaviours.is_empty()
    }
}

/// A sprite with an identity, a kind and properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub sprite: Sprite,
    pub characteristics: Vec<Property>,
    pub behaviours: Vec<Property>,
}

impl GameEntity {
    /// Creates an entity with no properties.
    pub fn new(
        kind: EntityKind,
        sprite_type: SpriteType,
        position: PixelPoint,
        appearance: &AppearanceDefinition,
    ) -> Self {
        Self {
            id: new_entity_id(),
            kind,
            sprite: Sprite::new(sprite_type, position, appearance),
            characteristics: Vec::new(),
            behaviours: Vec::new(),
        }
    }

    /// A static structural tile.
    pub fn tile(
        sprite_type: SpriteType,
        position: PixelPoint,
        appearance: &AppearanceDefinition,
    ) -> Self {
        Self::new(EntityKind::Tile, sprite_type, position, appearance)
    }

    /// A character with its properties already persisted into its pixels.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldelve::{
    ///     builtin_appearances, CharacterType, GameEntity, PixelPoint, PropertySet, SpriteType,
    /// };
    ///
    /// let appearances = builtin_appearances();
    /// let appearance = appearances.get(SpriteType::Character.index()).unwrap();
    /// let npc = GameEntity::character(
    ///     CharacterType::Adversary,
    ///     PixelPoint::new(16, 16),
    ///     appearance,
    ///     PropertySet::npc(),
    /// );
    ///
    /// assert_eq!(npc.sprite.read_characteristics(), PropertySet::npc().characteristics);
    /// assert_eq!(npc.symbol(), 'E');
    /// ```
    pub fn character(
        character_type: CharacterType,
        position: PixelPoint,
        appearance: &AppearanceDefinition,
        properties: PropertySet,
    ) -> Self {
        let mut entity = Self::new(
            EntityKind::Character(character_type),
            SpriteType::Character,
            position,
            appearance,
        )
        .with_properties(properties);
        entity.persist_properties();
        entity
    }

    /// Replaces the entity's property lists without persisting them.
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.characteristics = properties.characteristics;
        self.behaviours = properties.behaviours;
        self
    }

    pub fn sprite_type(&self) -> SpriteType {
        self.sprite.sprite_type
    }

    pub fn position(&self) -> PixelPoint {
        self.sprite.position
    }

    /// Map glyph. Characters show their allegiance instead of their sprite.
    pub fn symbol(&self) -> char {
        match self.kind {
            EntityKind::Character(character_type) => character_type.symbol(),
            _ => self.sprite.sprite_type.symbol(),
        }
    }

    pub fn is_character(&self) -> bool {
        matches!(self.kind, EntityKind::Character(_))
    }

    /// Encodes both property lists into the sprite.
    ///
    /// Returns how many characteristics and behaviours fit.
    pub fn persist_properties(&mut self) -> (usize, usize) {
        if self.characteristics.is_empty() && self.behaviours.is_empty() {
            debug!("Entity {} has no properties to persist", self.id);
            return (0, 0);
        }
        self.sprite
            .persist_properties(&self.characteristics, &self.behaviours)
    }

    /// Reloads both property lists from the sprite's data pixels.
    pub fn read_properties(&mut self) {
        self.characteristics = self.sprite.read_characteristics();
        self.behaviours = self.sprite.read_behaviours();
    }
}

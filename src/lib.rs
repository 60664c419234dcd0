//! # Pixeldelve
//!
//! The content core of a tile-based dungeon game.
//!
//! ## Architecture Overview
//!
//! Pixeldelve is built around two ideas:
//!
//! - **Pixel-encoded properties**: every game entity is a [`Sprite`], a grid of
//!   RGBA [`Pixel`]s. Opaque pixels are purely visual, transparent pixels each
//!   carry one [`Property`] in their red/green/blue channels.
//! - **Procedural levels**: a [`Level`] is filled with non-overlapping [`Room`]s,
//!   each room is walled, given doors, stocked with pillars, traps, items and
//!   characters, and consecutive rooms are joined by [`Hallway`]s.
//!
//! Definitions (appearances, characteristics, behaviours) are loaded from JSON
//! into validated [`DefinitionTable`]s which the rest of the crate consumes by
//! index.

pub mod definitions;
pub mod entities;
pub mod generation;
pub mod geometry;
pub mod properties;

pub use definitions::*;
pub use entities::*;
pub use generation::*;
pub use geometry::*;
pub use properties::*;

/// Core error type for pixeldelve.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Definition or instance data failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A definition table has no entry for the requested index
    #[error("{kind} definition with index {index} not found")]
    DefinitionNotFound { kind: &'static str, index: u8 },

    /// A property index outside the characteristic/behaviour/appearance bands
    #[error("Invalid property index: {0}")]
    InvalidPropertyIndex(i64),

    /// A pixel operation was attempted on the wrong kind of pixel
    #[error("Expected a {expected} pixel, found a {found} pixel")]
    WrongPixelKind {
        expected: PixelKind,
        found: PixelKind,
    },

    /// An operation was invoked in the wrong lifecycle stage
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Random placement gave up after its attempt budget
    #[error("Placement failed: {0}")]
    PlacementFailed(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the pixeldelve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed layout and encoding constants.
pub mod config {
    /// Side of a square block (one sprite) in pixels
    pub const DEFAULT_BLOCK_SIZE: u16 = 16;

    /// First characteristic property index
    pub const CHARACTERISTICS_PROPERTY_MIN_INDEX: u8 = 0;

    /// Last characteristic property index
    pub const CHARACTERISTICS_PROPERTY_MAX_INDEX: u8 = 199;

    /// First behaviour property index
    pub const BEHAVIOUR_PROPERTY_MIN_INDEX: u8 = 200;

    /// Last behaviour property index
    pub const BEHAVIOUR_PROPERTY_MAX_INDEX: u8 = 254;

    /// The single appearance property index
    pub const APPEARANCE_PROPERTY_INDEX: u8 = 255;

    pub const MAX_COLOR_VALUE: u8 = 0xFF;
    pub const MIN_COLOR_VALUE: u8 = 0x00;

    /// Alpha of a data pixel (fully transparent)
    pub const DATA_PIXEL_ALPHA_VALUE: u8 = 0x00;

    /// Alpha of a visual pixel (fully opaque)
    pub const VISUAL_PIXEL_ALPHA_VALUE: u8 = 0xFF;

    /// Maximum data pixels used for characteristic properties
    pub const MAX_STORED_CHARACTERISTICS: usize = 60;

    /// Maximum data pixels used for behaviour properties
    pub const MAX_STORED_BEHAVIOURS: usize = 30;

    /// Minimum room area, in sprites
    pub const MIN_ROOM_AREA_IN_SPRITES: u16 = 16;

    /// Maximum number of rooms per level
    pub const MAX_ROOMS_PER_LEVEL: usize = 12;

    /// Number of sprites one room must keep from another
    pub const ROOM_PERIMETER_SPRITES: u16 = 4;

    /// Maximum room extent relative to the level, per axis
    pub const MAX_ROOM_SIZE_PERCENTAGE: f32 = 0.25;

    /// Share of the level area that rooms may cover, in percent
    pub const MAX_ROOM_COVERAGE_PERCENT: u32 = 80;
}

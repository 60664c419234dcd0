//! # Generation Module
//!
//! Procedural level generation: rooms placed into a level under size and
//! spacing constraints, furnished in a fixed order, then chained together by
//! hallways.
//!
//! All randomness flows through a caller-supplied [`StdRng`], so a level is
//! fully determined by [`GenerationConfig::seed`]. Every random retry loop is
//! bounded by an attempt budget from the configuration.

pub mod dungeon;
pub mod hallway;
pub mod level;
pub mod room;

pub use dungeon::*;
pub use hallway::*;
pub use level::*;
pub use room::*;

use crate::DelveResult;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// How hallways find their way between two doors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HallwayRouting {
    /// Along X first, then along Y, ignoring anything in the way
    #[default]
    LShaped,
    /// Breadth-first search over the block lattice that steers around rooms
    AvoidRooms,
}

/// Configuration for procedural generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Samples a room may draw when looking for a free floor cell
    pub max_placement_attempts: u32,
    /// Room candidates a level may try before giving up
    pub max_level_attempts: u32,
    /// Items placed in every room
    pub items_per_room: u16,
    /// Adversaries placed in every room
    pub adversaries_per_room: u16,
    /// Neutral characters placed in every room
    pub neutrals_per_room: u16,
    /// Routing used when connecting rooms
    pub hallway_routing: HallwayRouting,
}

impl GenerationConfig {
    /// Creates the standard configuration for `seed`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldelve::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert_eq!(config.items_per_room, 3);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_placement_attempts: 1000,
            max_level_attempts: 500,
            items_per_room: 3,
            adversaries_per_room: 2,
            neutrals_per_room: 2,
            hallway_routing: HallwayRouting::LShaped,
        }
    }

    /// A configuration with tighter budgets for tests.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            max_placement_attempts: 200,
            max_level_attempts: 200,
            ..Self::new(seed)
        }
    }

    /// Number of random placements one fully furnished room needs besides
    /// its pillars and traps.
    pub fn population_per_room(&self) -> usize {
        self.items_per_room as usize
            + self.adversaries_per_room as usize
            + self.neutrals_per_room as usize
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}

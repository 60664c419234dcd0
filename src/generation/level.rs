//! # Levels
//!
//! A level is a rectangle filled with up to [`MAX_ROOMS_PER_LEVEL`] rooms.
//! Rooms may not overlap, must keep a buffer of
//! [`ROOM_PERIMETER_SPRITES`] blocks from each other on at least one axis,
//! and together may cover at most [`MAX_ROOM_COVERAGE_PERCENT`] of the level.

use super::{GenerationConfig, Hallway, HallwayRouting, Room};
use crate::config::{
    DEFAULT_BLOCK_SIZE, MAX_ROOMS_PER_LEVEL, MAX_ROOM_COVERAGE_PERCENT, MAX_ROOM_SIZE_PERCENTAGE,
    ROOM_PERIMETER_SPRITES,
};
use crate::{AppearanceDefinition, AppearanceDefinitions, DelveResult, Property, Quadrilateral};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::fmt;

/// Why a room was not added to a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementRejection {
    /// The level already holds the maximum number of rooms
    RoomLimitReached,
    /// The room is smaller than two blocks on some side
    InvalidDimensions,
    /// The room overlaps an existing room
    Intersects,
    /// The room is within the buffer of an existing room on both axes
    TooClose,
    /// The room would push total coverage past the budget
    AreaLimitExceeded,
}

impl fmt::Display for PlacementRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            PlacementRejection::RoomLimitReached => "maximum rooms per level reached",
            PlacementRejection::InvalidDimensions => "room size is invalid",
            PlacementRejection::Intersects => "room overlaps an existing room",
            PlacementRejection::TooClose => "room is too close to an existing room",
            PlacementRejection::AreaLimitExceeded => "room would exceed the area limit",
        };
        f.write_str(reason)
    }
}

/// A dungeon level: its bounds, rooms and the hallways between them.
#[derive(Debug, Clone)]
pub struct Level {
    pub bounds: Quadrilateral<u16>,
    rooms: Vec<Room>,
    hallways: Vec<Hallway>,
    max_room_area: u64,
}

impl Level {
    /// Creates an empty level with its top-left corner at the origin.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldelve::Level;
    ///
    /// let level = Level::new(1000, 500);
    /// assert_eq!(level.max_room_area(), 400_000);
    /// assert_eq!(level.room_count(), 0);
    /// ```
    pub fn new(width: u16, height: u16) -> Self {
        let bounds = Quadrilateral::new(0, 0, width, height);
        let max_room_area = bounds.area_in_pixels() * MAX_ROOM_COVERAGE_PERCENT as u64 / 100;
        Self {
            bounds,
            rooms: Vec::new(),
            hallways: Vec::new(),
            max_room_area,
        }
    }

    pub fn width(&self) -> u16 {
        self.bounds.bottom_right_x
    }

    pub fn height(&self) -> u16 {
        self.bounds.bottom_right_y
    }

    pub fn max_room_area(&self) -> u64 {
        self.max_room_area
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn rooms_mut(&mut self) -> &mut [Room] {
        &mut self.rooms
    }

    pub fn hallways(&self) -> &[Hallway] {
        &self.hallways
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Largest block-aligned room extent along an axis of `level_dimension`.
    pub fn calculate_max_room_dimension(level_dimension: u16) -> u16 {
        let block = DEFAULT_BLOCK_SIZE as f32;
        ((level_dimension as f32 * MAX_ROOM_SIZE_PERCENTAGE) / block).floor() as u16
            * DEFAULT_BLOCK_SIZE
    }

    /// A random block multiple between one block and `max_dimension`.
    pub fn generate_room_dimension(max_dimension: u16, rng: &mut StdRng) -> u16 {
        let blocks = max_dimension / DEFAULT_BLOCK_SIZE;
        if blocks == 0 {
            return DEFAULT_BLOCK_SIZE;
        }
        rng.gen_range(0..blocks) * DEFAULT_BLOCK_SIZE + DEFAULT_BLOCK_SIZE
    }

    /// A random block-aligned offset at which a room of `room_dimension`
    /// still fits inside `level_dimension`.
    pub fn generate_random_position(
        level_dimension: u16,
        room_dimension: u16,
        rng: &mut StdRng,
    ) -> u16 {
        let slots = level_dimension.saturating_sub(room_dimension) / DEFAULT_BLOCK_SIZE;
        rng.gen_range(0..=slots) * DEFAULT_BLOCK_SIZE
    }

    /// True unless the rooms are within the buffer on both axes at once.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldelve::{Level, Quadrilateral};
    ///
    /// // A gap of exactly 64 pixels is not "too close".
    /// let a = Quadrilateral::new(0, 0, 32, 32);
    /// let b = Quadrilateral::new(96, 0, 128, 32);
    /// assert!(Level::place_room_far_apart(&a, &b));
    /// ```
    pub fn place_room_far_apart(
        new_room: &Quadrilateral<u16>,
        existing: &Quadrilateral<u16>,
    ) -> bool {
        let buffer = (ROOM_PERIMETER_SPRITES * DEFAULT_BLOCK_SIZE) as u32;
        let gap = |a: u16, b: u16| (a as u32).abs_diff(b as u32);

        let too_close_horizontally = gap(new_room.top_left_x, existing.bottom_right_x) < buffer
            || gap(new_room.bottom_right_x, existing.top_left_x) < buffer;
        let too_close_vertically = gap(new_room.top_left_y, existing.bottom_right_y) < buffer
            || gap(new_room.bottom_right_y, existing.top_left_y) < buffer;

        !(too_close_horizontally && too_close_vertically)
    }

    pub fn calculate_total_room_area_in_pixels(&self) -> u64 {
        self.rooms.iter().map(|room| room.bounds.area_in_pixels()).sum()
    }

    pub fn is_within_area_limit(&self, bounds: &Quadrilateral<u16>) -> bool {
        self.calculate_total_room_area_in_pixels() + bounds.area_in_pixels() <= self.max_room_area
    }

    /// Runs every placement rule against `bounds` without adding anything.
    pub fn check_placement(&self, bounds: &Quadrilateral<u16>) -> Result<(), PlacementRejection> {
        if self.rooms.len() >= MAX_ROOMS_PER_LEVEL {
            return Err(PlacementRejection::RoomLimitReached);
        }
        if !super::is_valid_room_size(bounds) {
            return Err(PlacementRejection::InvalidDimensions);
        }
        for existing in &self.rooms {
            if bounds.intersects(&existing.bounds) {
                return Err(PlacementRejection::Intersects);
            }
            if !Self::place_room_far_apart(bounds, &existing.bounds) {
                return Err(PlacementRejection::TooClose);
            }
        }
        if !self.is_within_area_limit(bounds) {
            return Err(PlacementRejection::AreaLimitExceeded);
        }
        Ok(())
    }

    /// Adds `room` if it passes every placement rule.
    pub fn add_room(&mut self, room: Room) -> Result<(), PlacementRejection> {
        self.check_placement(&room.bounds)?;
        debug!("Room added at {}", room.bounds.id());
        self.rooms.push(room);
        Ok(())
    }

    /// Fills the level with random rooms.
    ///
    /// Stops once the room cap or the area budget is reached, or after
    /// `config.max_level_attempts` candidates. Returns the number of rooms
    /// added by this call.
    pub fn build_level(
        &mut self,
        appearances: &AppearanceDefinitions,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<usize> {
        let max_width = Self::calculate_max_room_dimension(self.width());
        let max_height = Self::calculate_max_room_dimension(self.height());
        let starting_rooms = self.rooms.len();
        let mut attempts = 0;

        while self.rooms.len() < MAX_ROOMS_PER_LEVEL
            && self.calculate_total_room_area_in_pixels() < self.max_room_area
        {
            if attempts >= config.max_level_attempts {
                warn!(
                    "Stopped placing rooms after {} attempts with {} rooms",
                    attempts,
                    self.rooms.len()
                );
                break;
            }
            attempts += 1;

            let room_width = Self::generate_room_dimension(max_width, rng);
            let room_height = Self::generate_room_dimension(max_height, rng);
            let x = Self::generate_random_position(self.width(), room_width, rng);
            let y = Self::generate_random_position(self.height(), room_height, rng);
            let bounds = Quadrilateral::new(x, y, x + room_width, y + room_height);

            if let Err(rejection) = self.check_placement(&bounds) {
                debug!("Failed to add room at {}: {}", bounds.id(), rejection);
                continue;
            }

            let room = Room::new(bounds, appearances, Vec::new(), Vec::new(), Vec::new())?
                .with_max_placement_attempts(config.max_placement_attempts);
            if let Err(rejection) = self.add_room(room) {
                debug!("Failed to add room at {}: {}", bounds.id(), rejection);
            }
        }

        let added = self.rooms.len() - starting_rooms;
        info!(
            "Placed {} rooms covering {} of {} pixels in {} attempts",
            added,
            self.calculate_total_room_area_in_pixels(),
            self.max_room_area,
            attempts
        );
        Ok(added)
    }

    /// Chains consecutive rooms with hallways between their first doors.
    ///
    /// Pairs where either room has no door are skipped. Returns the number of
    /// hallways built.
    pub fn connect_rooms(
        &mut self,
        appearance: &AppearanceDefinition,
        characteristics: &[Property],
        routing: HallwayRouting,
    ) -> DelveResult<usize> {
        let obstacles: Vec<Quadrilateral<u16>> = self.rooms.iter().map(|r| r.bounds).collect();
        let mut built = Vec::new();

        for (index, pair) in self.rooms.windows(2).enumerate() {
            let (Some(start), Some(end)) = (pair[0].doors().next(), pair[1].doors().next()) else {
                warn!("Rooms {} and {} have no door to connect", index, index + 1);
                continue;
            };
            let hallway = Hallway::build(
                start,
                end,
                appearance,
                characteristics.to_vec(),
                routing,
                &self.bounds,
                &obstacles,
            )?;
            debug!(
                "Connected room {} to room {} with {} tiles",
                index,
                index + 1,
                hallway.len()
            );
            built.push(hallway);
        }

        let count = built.len();
        self.hallways.extend(built);
        Ok(count)
    }

    pub fn id(&self) -> String {
        format!("Level-{}", self.bounds.id())
    }
}

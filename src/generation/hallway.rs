//! # Hallways
//!
//! A hallway is a chain of block-sized tiles running between the doors of two
//! rooms. It starts one block to the right of the start door and ends one
//! block to the left of the end door.

use super::HallwayRouting;
use crate::config::DEFAULT_BLOCK_SIZE;
use crate::{
    AppearanceDefinition, DelveError, DelveResult, EntityId, EntityKind, GameEntity, PixelPoint,
    Property, PropertySet, Quadrilateral, SpriteType,
};
use log::debug;
use pathfinding::prelude::bfs;

/// Tiles connecting two doors.
#[derive(Debug, Clone)]
pub struct Hallway {
    pub start_door: EntityId,
    pub end_door: EntityId,
    tiles: Vec<GameEntity>,
    characteristics: Vec<Property>,
}

impl Hallway {
    /// Builds the L-shaped hallway between two doors.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldelve::{builtin_appearances, GameEntity, Hallway, PixelPoint, SpriteType};
    ///
    /// let appearances = builtin_appearances();
    /// let door = appearances.for_sprite(SpriteType::Door).unwrap();
    /// let start = GameEntity::tile(SpriteType::Door, PixelPoint::new(0, 0), door);
    /// let end = GameEntity::tile(SpriteType::Door, PixelPoint::new(96, 32), door);
    ///
    /// let tile = appearances.for_sprite(SpriteType::HallwayTile).unwrap();
    /// let hallway = Hallway::new(&start, &end, tile, Vec::new()).unwrap();
    ///
    /// // (16, 0) to (80, 32): four steps along X, two along Y.
    /// assert_eq!(hallway.len(), 7);
    /// assert_eq!(hallway.start_door, start.id);
    /// ```
    pub fn new(
        start_door: &GameEntity,
        end_door: &GameEntity,
        appearance: &AppearanceDefinition,
        characteristics: Vec<Property>,
    ) -> DelveResult<Self> {
        let (source, destination) = Self::endpoints(start_door, end_door);
        let points = Self::calculate_path(source, destination)?;
        Ok(Self::from_points(start_door, end_door, &points, appearance, characteristics))
    }

    /// Builds a hallway with the requested routing.
    ///
    /// `obstacles` are only consulted by [`HallwayRouting::AvoidRooms`].
    pub fn build(
        start_door: &GameEntity,
        end_door: &GameEntity,
        appearance: &AppearanceDefinition,
        characteristics: Vec<Property>,
        routing: HallwayRouting,
        level_bounds: &Quadrilateral<u16>,
        obstacles: &[Quadrilateral<u16>],
    ) -> DelveResult<Self> {
        let (source, destination) = Self::endpoints(start_door, end_door);
        let points = match routing {
            HallwayRouting::LShaped => Self::calculate_path(source, destination)?,
            HallwayRouting::AvoidRooms => {
                Self::calculate_avoiding_path(source, destination, level_bounds, obstacles)?
            }
        };
        Ok(Self::from_points(start_door, end_door, &points, appearance, characteristics))
    }

    /// The first and last tile positions for a start and end door.
    pub fn endpoints(start_door: &GameEntity, end_door: &GameEntity) -> (PixelPoint, PixelPoint) {
        let step = DEFAULT_BLOCK_SIZE as i32;
        (
            start_door.position().offset(step, 0),
            end_door.position().offset(-step, 0),
        )
    }

    /// Walks from `source` to `destination` along X, then along Y.
    ///
    /// Both endpoints are included. Fails when the two points are not on the
    /// same block lattice.
    pub fn calculate_path(
        source: PixelPoint,
        destination: PixelPoint,
    ) -> DelveResult<Vec<PixelPoint>> {
        check_alignment(source, destination)?;
        let step = DEFAULT_BLOCK_SIZE as i32;
        let step_x = step * (destination.x - source.x).signum();
        let step_y = step * (destination.y - source.y).signum();

        let mut points = Vec::new();
        let mut current = source;
        while current.x != destination.x {
            points.push(current);
            current = current.offset(step_x, 0);
        }
        while current.y != destination.y {
            points.push(current);
            current = current.offset(0, step_y);
        }
        points.push(destination);
        Ok(points)
    }

    /// Shortest block path from `source` to `destination` that stays inside
    /// `level_bounds` and never enters the interior of an obstacle.
    pub fn calculate_avoiding_path(
        source: PixelPoint,
        destination: PixelPoint,
        level_bounds: &Quadrilateral<u16>,
        obstacles: &[Quadrilateral<u16>],
    ) -> DelveResult<Vec<PixelPoint>> {
        check_alignment(source, destination)?;

        let walkable = |point: &PixelPoint| {
            *point == destination
                || (within(level_bounds, *point)
                    && !obstacles.iter().any(|room| room.contains_strictly(*point)))
        };

        bfs(
            &source,
            |point| {
                point
                    .block_neighbours()
                    .into_iter()
                    .filter(|next| walkable(next))
                    .collect::<Vec<_>>()
            },
            |point| *point == destination,
        )
        .ok_or_else(|| {
            DelveError::GenerationFailed(format!(
                "No hallway route from {} to {}",
                source, destination
            ))
        })
    }

    fn from_points(
        start_door: &GameEntity,
        end_door: &GameEntity,
        points: &[PixelPoint],
        appearance: &AppearanceDefinition,
        characteristics: Vec<Property>,
    ) -> Self {
        let tiles = points
            .iter()
            .map(|&point| {
                let mut tile = GameEntity::new(
                    EntityKind::HallwayTile,
                    SpriteType::HallwayTile,
                    point,
                    appearance,
                )
                .with_properties(PropertySet::new(characteristics.clone(), Vec::new()));
                tile.persist_properties();
                tile
            })
            .collect::<Vec<_>>();

        debug!(
            "Hallway from door {} to door {} has {} tiles",
            start_door.id,
            end_door.id,
            tiles.len()
        );

        Self {
            start_door: start_door.id,
            end_door: end_door.id,
            tiles,
            characteristics,
        }
    }

    pub fn tiles(&self) -> &[GameEntity] {
        &self.tiles
    }

    pub fn points(&self) -> Vec<PixelPoint> {
        self.tiles.iter().map(GameEntity::position).collect()
    }

    pub fn characteristics(&self) -> &[Property] {
        &self.characteristics
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

fn check_alignment(source: PixelPoint, destination: PixelPoint) -> DelveResult<()> {
    let block = DEFAULT_BLOCK_SIZE as i32;
    if (destination.x - source.x) % block != 0 || (destination.y - source.y) % block != 0 {
        return Err(DelveError::Validation(format!(
            "Hallway endpoints {} and {} are not block aligned",
            source, destination
        )));
    }
    Ok(())
}

/// The block at `point` lies entirely inside `bounds`.
fn within(bounds: &Quadrilateral<u16>, point: PixelPoint) -> bool {
    let block = DEFAULT_BLOCK_SIZE as i64;
    let (x, y) = (point.x as i64, point.y as i64);
    x >= bounds.top_left_x as i64
        && y >= bounds.top_left_y as i64
        && x + block <= bounds.bottom_right_x as i64
        && y + block <= bounds.bottom_right_y as i64
}

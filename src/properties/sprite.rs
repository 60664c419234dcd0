//! # Sprites
//!
//! A sprite is the pixel grid behind one tile or entity. Its shape comes from
//! an appearance's visualization mask: `true` cells become visual pixels and
//! `false` cells become data pixels, which act as storage for properties.

use super::{Pixel, PixelKind, Property, PropertyType};
use crate::config::{DEFAULT_BLOCK_SIZE, MAX_STORED_BEHAVIOURS, MAX_STORED_CHARACTERISTICS};
use crate::{AppearanceDefinition, DelveError, DelveResult, PixelPoint};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a sprite represents on the map.
///
/// The discriminant doubles as the appearance index the sprite is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteType {
    /// The player-controlled character ("Self")
    Player = 0,
    Void = 1,
    HorizontalWall = 2,
    VerticalWall = 3,
    Floor = 4,
    Item = 5,
    Character = 6,
    Corner = 7,
    Door = 8,
    Pillar = 9,
    Trap = 10,
    HallwayTile = 11,
}

impl SpriteType {
    pub const ALL: [SpriteType; 12] = [
        SpriteType::Player,
        SpriteType::Void,
        SpriteType::HorizontalWall,
        SpriteType::VerticalWall,
        SpriteType::Floor,
        SpriteType::Item,
        SpriteType::Character,
        SpriteType::Corner,
        SpriteType::Door,
        SpriteType::Pillar,
        SpriteType::Trap,
        SpriteType::HallwayTile,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            SpriteType::Player => "Self",
            SpriteType::Void => "Void",
            SpriteType::HorizontalWall => "HorizontalWall",
            SpriteType::VerticalWall => "VerticalWall",
            SpriteType::Floor => "Floor",
            SpriteType::Item => "Item",
            SpriteType::Character => "Character",
            SpriteType::Corner => "Corner",
            SpriteType::Door => "Door",
            SpriteType::Pillar => "Pillar",
            SpriteType::Trap => "Trap",
            SpriteType::HallwayTile => "HallwayTile",
        }
    }

    /// Map glyph used by ASCII dumps.
    pub fn symbol(self) -> char {
        match self {
            SpriteType::Player => 'S',
            SpriteType::Void => ' ',
            SpriteType::HorizontalWall => '-',
            SpriteType::VerticalWall => '|',
            SpriteType::Floor => '.',
            SpriteType::Item => 'I',
            SpriteType::Character => 'C',
            SpriteType::Corner => '+',
            SpriteType::Door => '*',
            SpriteType::Pillar => 'P',
            SpriteType::Trap => 'T',
            SpriteType::HallwayTile => 'H',
        }
    }
}

impl fmt::Display for SpriteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed, positioned grid of pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    /// What this sprite represents
    pub sprite_type: SpriteType,
    /// Absolute top-left corner in level pixels
    pub position: PixelPoint,
    /// Index of the appearance the grid was built from
    pub appearance_index: u8,
    pixels: Vec<Vec<Pixel>>,
}

impl Sprite {
    /// Builds the pixel grid from the appearance's visualization mask.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldelve::{AppearanceDefinition, PixelKind, PixelPoint, Sprite, SpriteType};
    ///
    /// let appearance = AppearanceDefinition::new(5, "Checker", "Two by two")
    ///     .with_visualization(vec![vec![true, false], vec![false, true]]);
    /// let sprite = Sprite::new(SpriteType::Item, PixelPoint::new(0, 0), &appearance);
    ///
    /// assert_eq!(sprite.pixel(0, 0).unwrap().kind(), PixelKind::Visual);
    /// assert_eq!(sprite.pixel(0, 1).unwrap().kind(), PixelKind::Data);
    /// ```
    pub fn new(
        sprite_type: SpriteType,
        position: PixelPoint,
        appearance: &AppearanceDefinition,
    ) -> Self {
        let pixels = appearance
            .visualization
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&visible| Pixel::new(PixelKind::from_mask(visible)))
                    .collect()
            })
            .collect();

        Self {
            sprite_type,
            position,
            appearance_index: appearance.index,
            pixels,
        }
    }

    /// Rebuilds a sprite from a row-major RGBA buffer `width` pixels wide.
    pub fn from_rgba(
        sprite_type: SpriteType,
        position: PixelPoint,
        appearance_index: u8,
        width: usize,
        rgba: &[u8],
    ) -> DelveResult<Self> {
        let row_bytes = width * 4;
        if width == 0 || rgba.len() % row_bytes != 0 {
            return Err(DelveError::Validation(format!(
                "RGBA buffer of {} bytes does not hold rows of {} pixels",
                rgba.len(),
                width
            )));
        }

        let mut pixels = Vec::with_capacity(rgba.len() / row_bytes);
        for (row_index, row) in rgba.chunks_exact(row_bytes).enumerate() {
            let mut pixel_row = Vec::with_capacity(width);
            for (col, chunk) in row.chunks_exact(4).enumerate() {
                let bytes = [chunk[0], chunk[1], chunk[2], chunk[3]];
                let pixel = Pixel::from_rgba(bytes).ok_or_else(|| {
                    DelveError::Validation(format!(
                        "Pixel at ({}, {}) has alpha {} which is neither visual nor data",
                        row_index, col, bytes[3]
                    ))
                })?;
                pixel_row.push(pixel);
            }
            pixels.push(pixel_row);
        }

        Ok(Self {
            sprite_type,
            position,
            appearance_index,
            pixels,
        })
    }

    pub fn pixels(&self) -> &[Vec<Pixel>] {
        &self.pixels
    }

    pub fn pixel(&self, row: usize, col: usize) -> Option<&Pixel> {
        self.pixels.get(row).and_then(|r| r.get(col))
    }

    pub fn pixel_mut(&mut self, row: usize, col: usize) -> Option<&mut Pixel> {
        self.pixels.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Number of pixel rows.
    pub fn height(&self) -> usize {
        self.pixels.len()
    }

    /// Length of the longest pixel row.
    pub fn width(&self) -> usize {
        self.pixels.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Number of data pixels, i.e. the property capacity of the grid.
    pub fn data_pixel_count(&self) -> usize {
        self.pixels
            .iter()
            .flatten()
            .filter(|p| p.kind() == PixelKind::Data)
            .count()
    }

    /// Writes characteristics into the data pixels, row-major.
    ///
    /// At most [`MAX_STORED_CHARACTERISTICS`] are stored; anything beyond the
    /// cap or the grid's capacity is dropped. Returns the number written.
    pub fn persist_characteristics(&mut self, characteristics: &[Property]) -> usize {
        let written = self.persist_into(characteristics, MAX_STORED_CHARACTERISTICS, 0);
        debug!("Persisted {} characteristics to data pixels", written);
        written
    }

    /// Writes behaviours into the data pixels, row-major.
    ///
    /// At most [`MAX_STORED_BEHAVIOURS`] are stored. Returns the number written.
    pub fn persist_behaviours(&mut self, behaviours: &[Property]) -> usize {
        let written = self.persist_into(behaviours, MAX_STORED_BEHAVIOURS, 0);
        debug!("Persisted {} behaviours to data pixels", written);
        written
    }

    /// Writes characteristics, then behaviours into the data pixels after them.
    ///
    /// Returns `(characteristics_written, behaviours_written)`.
    pub fn persist_properties(
        &mut self,
        characteristics: &[Property],
        behaviours: &[Property],
    ) -> (usize, usize) {
        let characteristics_written =
            self.persist_into(characteristics, MAX_STORED_CHARACTERISTICS, 0);
        let behaviours_written =
            self.persist_into(behaviours, MAX_STORED_BEHAVIOURS, characteristics_written);
        debug!(
            "Persisted {} characteristics and {} behaviours to data pixels",
            characteristics_written, behaviours_written
        );
        (characteristics_written, behaviours_written)
    }

    fn persist_into(&mut self, properties: &[Property], cap: usize, skip: usize) -> usize {
        let limit = properties.len().min(cap);
        let slots = self
            .pixels
            .iter_mut()
            .flatten()
            .filter(|p| p.kind() == PixelKind::Data)
            .skip(skip);

        let mut written = 0;
        for (pixel, property) in slots.zip(&properties[..limit]) {
            *pixel = Pixel::from_property(property);
            written += 1;
        }
        written
    }

    /// Reads every initialized data pixel as a flat `[index, current, max]`
    /// stream.
    ///
    /// Only the top-left block-sized window is scanned; sprites are expected
    /// to be exactly one block. Smaller grids are scanned in full.
    pub fn read_data_from_pixels(&self) -> Vec<u8> {
        let block = DEFAULT_BLOCK_SIZE as usize;
        let mut data = Vec::new();

        for row in self.pixels.iter().take(block) {
            for pixel in row.iter().take(block) {
                if pixel.is_initialized_data() {
                    data.extend_from_slice(&pixel.rgb());
                }
            }
        }
        data
    }

    /// Characteristics read back from the data pixels, capped.
    pub fn read_characteristics(&self) -> Vec<Property> {
        self.read_band(PropertyType::Characteristic, MAX_STORED_CHARACTERISTICS)
    }

    /// Behaviours read back from the data pixels, capped.
    pub fn read_behaviours(&self) -> Vec<Property> {
        self.read_band(PropertyType::Behaviour, MAX_STORED_BEHAVIOURS)
    }

    fn read_band(&self, band: PropertyType, cap: usize) -> Vec<Property> {
        let properties: Vec<Property> = self
            .read_data_from_pixels()
            .chunks_exact(3)
            .map(|triple| Property::new(triple[0], triple[1], triple[2]))
            .filter(|property| property.property_type == band)
            .take(cap)
            .collect();
        debug!("Read {} {} properties from data pixels", properties.len(), band);
        properties
    }

    /// Row-major RGBA bytes, four per pixel.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flatten()
            .flat_map(|pixel| pixel.rgba())
            .collect()
    }

    /// The visualization mask this grid corresponds to.
    pub fn visualization_mask(&self) -> Vec<Vec<bool>> {
        self.pixels
            .iter()
            .map(|row| row.iter().map(|p| p.kind() == PixelKind::Visual).collect())
            .collect()
    }
}

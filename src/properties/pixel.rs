//! # Pixels
//!
//! A pixel is four bytes. Visual pixels are opaque and only describe how a
//! sprite looks. Data pixels are fully transparent and carry one property in
//! their colour channels: red is the index, green the current value and blue
//! the maximum value.

use super::Property;
use crate::config::{
    DATA_PIXEL_ALPHA_VALUE, MAX_COLOR_VALUE, MIN_COLOR_VALUE, VISUAL_PIXEL_ALPHA_VALUE,
};
use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a pixel is decorative or a property slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelKind {
    Visual,
    Data,
}

impl PixelKind {
    /// Maps a visualization mask cell to a pixel kind.
    pub fn from_mask(visible: bool) -> Self {
        if visible {
            PixelKind::Visual
        } else {
            PixelKind::Data
        }
    }

    /// The alpha value every pixel of this kind carries.
    pub fn canonical_alpha(self) -> u8 {
        match self {
            PixelKind::Visual => VISUAL_PIXEL_ALPHA_VALUE,
            PixelKind::Data => DATA_PIXEL_ALPHA_VALUE,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            PixelKind::Visual => 'V',
            PixelKind::Data => 'D',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PixelKind::Visual => "Visual",
            PixelKind::Data => "Data",
        }
    }
}

impl fmt::Display for PixelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One RGBA cell of a sprite.
///
/// `occupied` records whether visual data or a property has been written.
/// It keeps a property of all zeroes distinguishable from an empty slot.
///
/// Channels are only written through the kind-checked setters, so alpha
/// always matches the pixel's kind:
///
/// ```compile_fail
/// use pixeldelve::{Pixel, PixelKind};
///
/// let mut pixel = Pixel::new(PixelKind::Visual);
/// pixel.a = 0x80;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pixel {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
    kind: PixelKind,
    occupied: bool,
}

impl Pixel {
    /// Creates a pixel with the defaults of its kind.
    ///
    /// Visual pixels start white and opaque, data pixels start black and
    /// transparent.
    pub fn new(kind: PixelKind) -> Self {
        let mut pixel = Self {
            r: MIN_COLOR_VALUE,
            g: MIN_COLOR_VALUE,
            b: MIN_COLOR_VALUE,
            a: MIN_COLOR_VALUE,
            kind,
            occupied: false,
        };
        pixel.reset();
        pixel
    }

    /// Creates a data pixel holding `property`.
    pub fn from_property(property: &Property) -> Self {
        let [r, g, b] = property.channels();
        Self {
            r,
            g,
            b,
            a: DATA_PIXEL_ALPHA_VALUE,
            kind: PixelKind::Data,
            occupied: true,
        }
    }

    /// Rebuilds a pixel from raw RGBA bytes, deriving its kind from alpha.
    ///
    /// Returns `None` for alpha values that are neither opaque nor
    /// transparent. A data pixel with all-zero channels comes back empty.
    pub fn from_rgba(rgba: [u8; 4]) -> Option<Self> {
        let [r, g, b, a] = rgba;
        let kind = match a {
            VISUAL_PIXEL_ALPHA_VALUE => PixelKind::Visual,
            DATA_PIXEL_ALPHA_VALUE => PixelKind::Data,
            _ => return None,
        };
        Some(Self {
            r,
            g,
            b,
            a,
            kind,
            occupied: kind == PixelKind::Visual || (r, g, b) != (0, 0, 0),
        })
    }

    pub fn kind(&self) -> PixelKind {
        self.kind
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    pub fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// The red, green and blue channels.
    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn alpha(&self) -> u8 {
        self.a
    }

    /// Re-types the pixel and restores that kind's defaults.
    pub fn set_kind(&mut self, kind: PixelKind) {
        self.kind = kind;
        self.reset();
    }

    /// Restores the defaults of the current kind.
    pub fn reset(&mut self) {
        let channel = match self.kind {
            PixelKind::Visual => MAX_COLOR_VALUE,
            PixelKind::Data => MIN_COLOR_VALUE,
        };
        self.r = channel;
        self.g = channel;
        self.b = channel;
        self.a = self.kind.canonical_alpha();
        self.occupied = false;
    }

    /// Paints a visual pixel. Alpha stays fully opaque.
    pub fn set_visual_data(&mut self, red: u8, green: u8, blue: u8) -> DelveResult<()> {
        self.require(PixelKind::Visual)?;
        self.r = red;
        self.g = green;
        self.b = blue;
        self.a = VISUAL_PIXEL_ALPHA_VALUE;
        self.occupied = true;
        Ok(())
    }

    /// Stores a property in a data pixel.
    pub fn set_data_packet(&mut self, property: &Property) -> DelveResult<()> {
        self.require(PixelKind::Data)?;
        *self = Self::from_property(property);
        Ok(())
    }

    /// Reads the property stored in a data pixel.
    pub fn data_packet(&self) -> DelveResult<Property> {
        self.require(PixelKind::Data)?;
        Ok(Property::new(self.r, self.g, self.b))
    }

    /// True for a data pixel that holds a property.
    pub fn is_initialized_data(&self) -> bool {
        self.kind == PixelKind::Data && self.a == DATA_PIXEL_ALPHA_VALUE && self.occupied
    }

    /// True for an opaque visual pixel with colour in it.
    ///
    /// A fresh visual pixel is white, so it counts as initialized until it is
    /// painted black.
    pub fn is_initialized_visual(&self) -> bool {
        self.kind == PixelKind::Visual
            && self.a == VISUAL_PIXEL_ALPHA_VALUE
            && (self.r, self.g, self.b) != (MIN_COLOR_VALUE, MIN_COLOR_VALUE, MIN_COLOR_VALUE)
    }

    fn require(&self, expected: PixelKind) -> DelveResult<()> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(DelveError::WrongPixelKind {
                expected,
                found: self.kind,
            })
        }
    }
}

//! # Properties Module
//!
//! The atomic data of the game and its pixel encoding.
//!
//! A [`Property`] is an indexed `(current, maximum)` pair. Its index decides
//! what it describes: indices 0-199 are characteristics (health, strength...),
//! 200-254 are behaviours and 255 is the appearance slot. Properties are stored
//! one per data pixel inside a [`Sprite`].

pub mod pixel;
pub mod sprite;

pub use pixel::*;
pub use sprite::*;

use crate::config::{
    APPEARANCE_PROPERTY_INDEX, BEHAVIOUR_PROPERTY_MAX_INDEX, BEHAVIOUR_PROPERTY_MIN_INDEX,
    CHARACTERISTICS_PROPERTY_MAX_INDEX,
};
use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three families a property index can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Characteristic,
    Behaviour,
    Appearance,
}

impl PropertyType {
    /// Classifies a byte index. Every byte falls into exactly one band.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldelve::PropertyType;
    ///
    /// assert_eq!(PropertyType::from_index(12), PropertyType::Characteristic);
    /// assert_eq!(PropertyType::from_index(200), PropertyType::Behaviour);
    /// assert_eq!(PropertyType::from_index(255), PropertyType::Appearance);
    /// ```
    pub fn from_index(index: u8) -> Self {
        match index {
            0..=CHARACTERISTICS_PROPERTY_MAX_INDEX => PropertyType::Characteristic,
            BEHAVIOUR_PROPERTY_MIN_INDEX..=BEHAVIOUR_PROPERTY_MAX_INDEX => PropertyType::Behaviour,
            APPEARANCE_PROPERTY_INDEX => PropertyType::Appearance,
        }
    }

    /// Single-character code used in compact dumps.
    pub fn symbol(self) -> char {
        match self {
            PropertyType::Characteristic => 'C',
            PropertyType::Behaviour => 'B',
            PropertyType::Appearance => 'A',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PropertyType::Characteristic => "Characteristic",
            PropertyType::Behaviour => "Behaviour",
            PropertyType::Appearance => "Appearance",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifies an index that has not yet been narrowed to a byte.
///
/// Indices arriving from outside the crate (JSON, raw buffers) go through
/// here so that anything outside 0-255 is rejected instead of truncated.
pub fn determine_property_type(index: i64) -> DelveResult<PropertyType> {
    u8::try_from(index)
        .map(PropertyType::from_index)
        .map_err(|_| DelveError::InvalidPropertyIndex(index))
}

/// How a definition's values evolve over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthType {
    #[default]
    Fixed,
    Variable,
}

impl GrowthType {
    pub fn symbol(self) -> char {
        match self {
            GrowthType::Fixed => 'F',
            GrowthType::Variable => 'V',
        }
    }

    /// The lowercase name used in definition files.
    pub fn name(self) -> &'static str {
        match self {
            GrowthType::Fixed => "fixed",
            GrowthType::Variable => "variable",
        }
    }

    /// Parses the definition-file spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fixed" => Some(GrowthType::Fixed),
            "variable" => Some(GrowthType::Variable),
            _ => None,
        }
    }
}

/// A named refinement of a property value.
///
/// Definitions with sub-properties use the property's value to select one of
/// them, e.g. a "material" characteristic whose value 3 means "iron".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubProperty {
    pub value: u8,
    pub name: String,
    pub description: String,
}

impl SubProperty {
    pub fn new(value: u8, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            value,
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Looks up a sub-property by value. The first match wins.
pub fn find_sub_property(sub_properties: &[SubProperty], value: u8) -> Option<&SubProperty> {
    sub_properties.iter().find(|sub| sub.value == value)
}

/// An indexed, ranged game value.
///
/// Properties are immutable once built. The type is derived from the index
/// unless given explicitly with [`Property::with_type`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    pub property_type: PropertyType,
    pub index: u8,
    pub current_value: u8,
    pub maximum_value: u8,
    pub sub_property: Option<SubProperty>,
}

impl Property {
    /// Creates a property whose type follows from its index.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldelve::{Property, PropertyType};
    ///
    /// let health = Property::new(1, 10, 20);
    /// assert_eq!(health.property_type, PropertyType::Characteristic);
    /// assert_eq!(health.current_value, 10);
    /// assert_eq!(health.maximum_value, 20);
    /// ```
    pub fn new(index: u8, current_value: u8, maximum_value: u8) -> Self {
        Self::with_type(
            index,
            current_value,
            maximum_value,
            PropertyType::from_index(index),
        )
    }

    /// Creates a property with an explicit type.
    pub fn with_type(
        index: u8,
        current_value: u8,
        maximum_value: u8,
        property_type: PropertyType,
    ) -> Self {
        Self {
            property_type,
            index,
            current_value,
            maximum_value,
            sub_property: None,
        }
    }

    /// Creates a property from unvalidated integers.
    ///
    /// Every field must fit in a byte; the index is checked first.
    pub fn try_new(index: i64, current_value: i64, maximum_value: i64) -> DelveResult<Self> {
        let property_type = determine_property_type(index)?;
        let current = u8::try_from(current_value).map_err(|_| {
            DelveError::Validation(format!(
                "Current value {} out of range (0-255) for property {}",
                current_value, index
            ))
        })?;
        let maximum = u8::try_from(maximum_value).map_err(|_| {
            DelveError::Validation(format!(
                "Maximum value {} out of range (0-255) for property {}",
                maximum_value, index
            ))
        })?;

        Ok(Self::with_type(index as u8, current, maximum, property_type))
    }

    /// Attaches a sub-property refinement.
    pub fn with_sub_property(mut self, sub_property: SubProperty) -> Self {
        self.sub_property = Some(sub_property);
        self
    }

    /// The `(r, g, b)` triple this property occupies in a data pixel.
    pub fn channels(&self) -> [u8; 3] {
        [self.index, self.current_value, self.maximum_value]
    }

    /// Encodes this property into a fresh data pixel.
    pub fn to_pixel(&self) -> Pixel {
        Pixel::from_property(self)
    }

    /// Decodes a property from a data pixel.
    pub fn from_pixel(pixel: &Pixel) -> DelveResult<Self> {
        pixel.data_packet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_property_band_boundaries() {
        assert_eq!(PropertyType::from_index(0), PropertyType::Characteristic);
        assert_eq!(PropertyType::from_index(199), PropertyType::Characteristic);
        assert_eq!(PropertyType::from_index(200), PropertyType::Behaviour);
        assert_eq!(PropertyType::from_index(254), PropertyType::Behaviour);
        assert_eq!(PropertyType::from_index(255), PropertyType::Appearance);
    }

    #[test]
    fn test_determine_property_type_rejects_out_of_range() {
        assert!(matches!(
            determine_property_type(256),
            Err(DelveError::InvalidPropertyIndex(256))
        ));
        assert!(matches!(
            determine_property_type(-1),
            Err(DelveError::InvalidPropertyIndex(-1))
        ));
        assert_eq!(
            determine_property_type(255).unwrap(),
            PropertyType::Appearance
        );
    }

    #[test]
    fn test_try_new_validates_all_fields() {
        assert!(Property::try_new(300, 1, 1).is_err());
        assert!(Property::try_new(1, 256, 1).is_err());
        assert!(Property::try_new(1, 1, -4).is_err());

        let property = Property::try_new(210, 3, 9).unwrap();
        assert_eq!(property.property_type, PropertyType::Behaviour);
        assert_eq!(property.channels(), [210, 3, 9]);
    }

    #[test]
    fn test_explicit_type_is_kept() {
        let property = Property::with_type(5, 1, 1, PropertyType::Behaviour);
        assert_eq!(property.property_type, PropertyType::Behaviour);
    }

    #[test]
    fn test_sub_property_lookup_first_match_wins() {
        let subs = vec![
            SubProperty::new(3, "iron", "Cold iron"),
            SubProperty::new(3, "steel", "Never reached"),
            SubProperty::new(4, "wood", "Oak"),
        ];

        assert_eq!(find_sub_property(&subs, 3).unwrap().name, "iron");
        assert_eq!(find_sub_property(&subs, 4).unwrap().name, "wood");
        assert!(find_sub_property(&subs, 9).is_none());
    }

    #[test]
    fn test_growth_names() {
        assert_eq!(GrowthType::from_name("fixed"), Some(GrowthType::Fixed));
        assert_eq!(GrowthType::from_name("variable"), Some(GrowthType::Variable));
        assert_eq!(GrowthType::from_name("Fixed"), None);
        assert_eq!(GrowthType::Variable.symbol(), 'V');
    }

    proptest! {
        #[test]
        fn every_byte_index_has_a_band(index in any::<u8>()) {
            let expected = if index <= 199 {
                PropertyType::Characteristic
            } else if index <= 254 {
                PropertyType::Behaviour
            } else {
                PropertyType::Appearance
            };
            prop_assert_eq!(PropertyType::from_index(index), expected);
            prop_assert_eq!(determine_property_type(index as i64).unwrap(), expected);
        }

        #[test]
        fn indices_above_a_byte_are_rejected(index in 256_i64..100_000) {
            prop_assert!(determine_property_type(index).is_err());
        }

        #[test]
        fn property_survives_pixel_encoding(
            index in any::<u8>(),
            current in any::<u8>(),
            maximum in any::<u8>(),
        ) {
            let property = Property::new(index, current, maximum);
            let decoded = Property::from_pixel(&property.to_pixel()).unwrap();
            prop_assert_eq!(decoded, property);
        }
    }
}

//! # Definitions Module
//!
//! Validated, index-keyed lookup tables describing what the game's things
//! look like and which characteristics and behaviours exist.
//!
//! Definitions are loaded from JSON documents of the form
//! `{ "appearances": [ ... ] }`, `{ "characteristics": [ ... ] }` or
//! `{ "behaviours": [ ... ] }`. Loading stops at the first malformed field and
//! reports it with its context; nothing is partially constructed.

pub mod instances;
pub mod json;

pub use instances::*;
pub use json::{get_bool, get_string, get_u8, load_array, parse_bool_grid};

use crate::config::DEFAULT_BLOCK_SIZE;
use crate::{DelveError, DelveResult, GrowthType, PropertyType, SpriteType, SubProperty};
use json::{as_object, get_optional_array, JsonObject};
use log::debug;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

/// Default settings shared by every definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Defaults {
    pub required: bool,
    pub growth: GrowthType,
}

impl Defaults {
    pub fn new(required: bool, growth: GrowthType) -> Self {
        Self { required, growth }
    }

    /// Parses the `defaults` object of a definition of kind `kind`.
    pub fn from_json(value: Option<&Value>, kind: &str) -> DelveResult<Self> {
        let obj = value.and_then(Value::as_object).ok_or_else(|| {
            DelveError::Validation(format!(
                "'defaults' field is missing or is not an object in {}.",
                kind
            ))
        })?;

        let context = format!("{}.defaults", kind);
        let growth_name = get_string(obj, "growth", &context)?;
        let growth = GrowthType::from_name(&growth_name).ok_or_else(|| {
            DelveError::Validation(format!(
                "Invalid 'growth' value '{}'. Expected 'fixed' or 'variable'.",
                growth_name
            ))
        })?;

        let required = get_bool(obj, "required", &context)?;

        Ok(Self { required, growth })
    }

    pub fn to_json(&self) -> Value {
        json!({ "required": self.required, "growth": self.growth.name() })
    }
}

impl SubProperty {
    /// Parses one sub-property entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldelve::SubProperty;
    /// use serde_json::json;
    ///
    /// let iron = json!({ "value": 3, "name": "iron", "description": "Cold" });
    /// assert_eq!(SubProperty::from_json(&iron).unwrap().value, 3);
    ///
    /// let huge = json!({ "value": 300, "name": "x", "description": "y" });
    /// assert!(SubProperty::from_json(&huge).is_err());
    /// ```
    pub fn from_json(value: &Value) -> DelveResult<Self> {
        let obj = as_object(value, "SubProperty")?;

        let raw = obj.get("value").and_then(Value::as_i64).ok_or_else(|| {
            DelveError::Validation("Value not specified in SubProperty.".to_string())
        })?;
        let value = u8::try_from(raw).map_err(|_| {
            DelveError::Validation(format!(
                "Value {} out of range for u8 in SubProperty (0-255).",
                raw
            ))
        })?;

        let name = obj.get("name").and_then(Value::as_str).ok_or_else(|| {
            DelveError::Validation("Name not specified in SubProperty.".to_string())
        })?;
        let description = obj.get("description").and_then(Value::as_str).ok_or_else(|| {
            DelveError::Validation("Description not specified in SubProperty.".to_string())
        })?;

        Ok(SubProperty::new(value, name, description))
    }

    pub fn to_json(&self) -> Value {
        json!({
            "value": self.value,
            "name": self.name,
            "description": self.description,
        })
    }
}

/// Fields every definition kind carries.
struct CommonFields {
    index: u8,
    name: String,
    description: String,
    defaults: Defaults,
    sub_properties: Option<Vec<SubProperty>>,
}

impl CommonFields {
    fn from_json(obj: &JsonObject, kind: &str) -> DelveResult<Self> {
        let index = get_u8(obj, "index", kind)?;
        let name = get_string(obj, "name", kind)?;
        let description = get_string(obj, "description", kind)?;
        let defaults = Defaults::from_json(obj.get("defaults"), kind)?;

        // Table files spell the list "subProperties", item files "properties".
        let listed = match get_optional_array(obj, "properties", kind)? {
            Some(items) => Some(items),
            None => get_optional_array(obj, "subProperties", kind)?,
        };
        let sub_properties = listed
            .map(|items| load_array(items, SubProperty::from_json, kind))
            .transpose()?;

        Ok(Self {
            index,
            name,
            description,
            defaults,
            sub_properties,
        })
    }

    fn to_json(
        index: u8,
        name: &str,
        description: &str,
        defaults: &Defaults,
        sub_properties: Option<&[SubProperty]>,
    ) -> JsonObject {
        let properties = match sub_properties {
            Some(subs) => Value::Array(subs.iter().map(SubProperty::to_json).collect()),
            None => Value::Null,
        };

        let mut obj = JsonObject::new();
        obj.insert("index".into(), json!(index));
        obj.insert("name".into(), json!(name));
        obj.insert("description".into(), json!(description));
        obj.insert("defaults".into(), defaults.to_json());
        obj.insert("properties".into(), properties);
        obj
    }
}

/// Behaviour shared by the three definition kinds.
pub trait Definition: Sized {
    /// Name used in error messages.
    const KIND: &'static str;
    /// Key of the array holding this kind in a table document.
    const TABLE_KEY: &'static str;
    /// How instances resolved against this kind are typed.
    const PROPERTY_TYPE: PropertyType;

    fn index(&self) -> u8;
    fn name(&self) -> &str;
    fn sub_properties(&self) -> Option<&[SubProperty]>;
    fn from_json(value: &Value) -> DelveResult<Self>;
    fn to_json(&self) -> Value;

    /// Looks up one of this definition's sub-properties. First match wins.
    fn sub_property(&self, value: u8) -> Option<&SubProperty> {
        self.sub_properties()
            .and_then(|subs| crate::find_sub_property(subs, value))
    }
}

/// How an entity looks: a boolean mask plus descriptive fields.
///
/// `true` cells of the mask become visual pixels, `false` cells data pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppearanceDefinition {
    pub index: u8,
    pub name: String,
    pub description: String,
    pub defaults: Defaults,
    pub visualization: Vec<Vec<bool>>,
    pub sub_properties: Option<Vec<SubProperty>>,
}

impl AppearanceDefinition {
    pub fn new(index: u8, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            description: description.into(),
            defaults: Defaults::default(),
            visualization: Vec::new(),
            sub_properties: None,
        }
    }

    pub fn with_visualization(mut self, visualization: Vec<Vec<bool>>) -> Self {
        self.visualization = visualization;
        self
    }

    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_sub_properties(mut self, sub_properties: Vec<SubProperty>) -> Self {
        self.sub_properties = Some(sub_properties);
        self
    }

    /// Number of `false` cells, i.e. how many properties a sprite of this
    /// appearance can store.
    pub fn data_capacity(&self) -> usize {
        self.visualization.iter().flatten().filter(|v| !**v).count()
    }
}

impl Definition for AppearanceDefinition {
    const KIND: &'static str = "AppearanceDefinition";
    const TABLE_KEY: &'static str = "appearances";
    const PROPERTY_TYPE: PropertyType = PropertyType::Appearance;

    fn index(&self) -> u8 {
        self.index
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn sub_properties(&self) -> Option<&[SubProperty]> {
        self.sub_properties.as_deref()
    }

    fn from_json(value: &Value) -> DelveResult<Self> {
        let obj = as_object(value, Self::KIND)?;
        let common = CommonFields::from_json(obj, Self::KIND)?;

        let visualization = obj.get("visualization").ok_or_else(|| {
            DelveError::Validation(format!(
                "'visualization' field is missing or is not an array in {}.",
                Self::KIND
            ))
        })?;
        let visualization = parse_bool_grid(visualization)?;

        Ok(Self {
            index: common.index,
            name: common.name,
            description: common.description,
            defaults: common.defaults,
            visualization,
            sub_properties: common.sub_properties,
        })
    }

    fn to_json(&self) -> Value {
        let mut obj = CommonFields::to_json(
            self.index,
            &self.name,
            &self.description,
            &self.defaults,
            self.sub_properties.as_deref(),
        );
        obj.insert("visualization".into(), json!(self.visualization));
        Value::Object(obj)
    }
}

/// A numeric trait such as health or strength.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacteristicDefinition {
    pub index: u8,
    pub name: String,
    pub description: String,
    pub defaults: Defaults,
    pub sub_properties: Option<Vec<SubProperty>>,
}

/// Something an entity does, such as wandering or guarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviourDefinition {
    pub index: u8,
    pub name: String,
    pub description: String,
    pub defaults: Defaults,
    pub sub_properties: Option<Vec<SubProperty>>,
}

impl CharacteristicDefinition {
    pub fn new(index: u8, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            description: description.into(),
            defaults: Defaults::default(),
            sub_properties: None,
        }
    }

    pub fn with_sub_properties(mut self, sub_properties: Vec<SubProperty>) -> Self {
        self.sub_properties = Some(sub_properties);
        self
    }
}

impl BehaviourDefinition {
    pub fn new(index: u8, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            description: description.into(),
            defaults: Defaults::default(),
            sub_properties: None,
        }
    }

    pub fn with_sub_properties(mut self, sub_properties: Vec<SubProperty>) -> Self {
        self.sub_properties = Some(sub_properties);
        self
    }
}

impl Definition for CharacteristicDefinition {
    const KIND: &'static str = "CharacteristicDefinition";
    const TABLE_KEY: &'static str = "characteristics";
    const PROPERTY_TYPE: PropertyType = PropertyType::Characteristic;

    fn index(&self) -> u8 {
        self.index
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn sub_properties(&self) -> Option<&[SubProperty]> {
        self.sub_properties.as_deref()
    }

    fn from_json(value: &Value) -> DelveResult<Self> {
        let common = CommonFields::from_json(as_object(value, Self::KIND)?, Self::KIND)?;
        Ok(Self {
            index: common.index,
            name: common.name,
            description: common.description,
            defaults: common.defaults,
            sub_properties: common.sub_properties,
        })
    }

    fn to_json(&self) -> Value {
        Value::Object(CommonFields::to_json(
            self.index,
            &self.name,
            &self.description,
            &self.defaults,
            self.sub_properties.as_deref(),
        ))
    }
}

impl Definition for BehaviourDefinition {
    const KIND: &'static str = "BehaviourDefinition";
    const TABLE_KEY: &'static str = "behaviours";
    const PROPERTY_TYPE: PropertyType = PropertyType::Behaviour;

    fn index(&self) -> u8 {
        self.index
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn sub_properties(&self) -> Option<&[SubProperty]> {
        self.sub_properties.as_deref()
    }

    fn from_json(value: &Value) -> DelveResult<Self> {
        let common = CommonFields::from_json(as_object(value, Self::KIND)?, Self::KIND)?;
        Ok(Self {
            index: common.index,
            name: common.name,
            description: common.description,
            defaults: common.defaults,
            sub_properties: common.sub_properties,
        })
    }

    fn to_json(&self) -> Value {
        Value::Object(CommonFields::to_json(
            self.index,
            &self.name,
            &self.description,
            &self.defaults,
            self.sub_properties.as_deref(),
        ))
    }
}

/// A definition whose kind is decided by its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameItemDefinition {
    Appearance(AppearanceDefinition),
    Characteristic(CharacteristicDefinition),
    Behaviour(BehaviourDefinition),
}

impl GameItemDefinition {
    /// Parses a single definition, dispatching on `index`: 0-11 are
    /// appearances, 12-199 characteristics and 200-255 behaviours.
    pub fn from_json(value: &Value) -> DelveResult<Self> {
        let obj = as_object(value, "GameItemDefinition")?;
        let index = get_u8(obj, "index", "GameItemDefinition.fromJSON")?;

        match index {
            0..=11 => AppearanceDefinition::from_json(value).map(Self::Appearance),
            12..=199 => CharacteristicDefinition::from_json(value).map(Self::Characteristic),
            _ => BehaviourDefinition::from_json(value).map(Self::Behaviour),
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            Self::Appearance(definition) => definition.index,
            Self::Characteristic(definition) => definition.index,
            Self::Behaviour(definition) => definition.index,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Appearance(definition) => definition.to_json(),
            Self::Characteristic(definition) => definition.to_json(),
            Self::Behaviour(definition) => definition.to_json(),
        }
    }
}

/// An ordered, index-keyed table of definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionTable<T> {
    definitions: Vec<T>,
}

pub type AppearanceDefinitions = DefinitionTable<AppearanceDefinition>;
pub type CharacteristicDefinitions = DefinitionTable<CharacteristicDefinition>;
pub type BehaviourDefinitions = DefinitionTable<BehaviourDefinition>;

impl<T> Default for DefinitionTable<T> {
    fn default() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }
}

impl<T: Definition> DefinitionTable<T> {
    pub fn new(definitions: Vec<T>) -> Self {
        Self { definitions }
    }

    /// Loads the table array (`appearances`, `characteristics` or
    /// `behaviours`) out of a JSON document.
    pub fn from_json(value: &Value) -> DelveResult<Self> {
        let context = format!("{}s", T::KIND);
        let obj = as_object(value, &context)?;
        let items = obj
            .get(T::TABLE_KEY)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                DelveError::Validation(format!(
                    "'{}' field is missing or is not an array. Context: {}",
                    T::TABLE_KEY,
                    context
                ))
            })?;

        let definitions = load_array(items, T::from_json, &context)?;
        debug!("Loaded {} {} entries", definitions.len(), T::KIND);
        Ok(Self { definitions })
    }

    pub fn from_json_str(text: &str) -> DelveResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }

    /// Reads and loads a table file.
    pub fn from_path(path: impl AsRef<Path>) -> DelveResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text).map_err(|error| match error {
            DelveError::Validation(message) => {
                DelveError::Validation(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// The first definition with `index`.
    pub fn get(&self, index: u8) -> Option<&T> {
        self.definitions.iter().find(|d| d.index() == index)
    }

    /// Like [`get`](Self::get) but missing entries are an error.
    pub fn require(&self, index: u8) -> DelveResult<&T> {
        self.get(index).ok_or(DelveError::DefinitionNotFound {
            kind: T::KIND,
            index,
        })
    }

    pub fn push(&mut self, definition: T) {
        self.definitions.push(definition);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.definitions.iter()
    }

    /// Serializes the table into the document shape [`from_json`](Self::from_json) reads.
    pub fn to_json(&self) -> Value {
        let mut obj = JsonObject::new();
        obj.insert(
            T::TABLE_KEY.into(),
            Value::Array(self.definitions.iter().map(T::to_json).collect()),
        );
        Value::Object(obj)
    }
}

impl AppearanceDefinitions {
    /// The appearance a sprite of `sprite_type` is drawn with.
    pub fn for_sprite(&self, sprite_type: SpriteType) -> DelveResult<&AppearanceDefinition> {
        self.require(sprite_type.index())
    }
}

/// Block-sized appearances for every sprite type, used when no appearance
/// file is supplied.
pub fn builtin_appearances() -> AppearanceDefinitions {
    let size = DEFAULT_BLOCK_SIZE as usize;
    let last = size - 1;
    let mask = |visible: &dyn Fn(usize, usize) -> bool| -> Vec<Vec<bool>> {
        (0..size)
            .map(|row| (0..size).map(|col| visible(row, col)).collect())
            .collect()
    };
    let border = |row: usize, col: usize| row == 0 || col == 0 || row == last || col == last;

    let definitions = SpriteType::ALL
        .iter()
        .map(|&sprite_type| {
            let visualization = match sprite_type {
                SpriteType::Player | SpriteType::Character => mask(&border),
                SpriteType::Void => mask(&|_, _| false),
                SpriteType::HorizontalWall => mask(&|row, _| row % 4 == 0),
                SpriteType::VerticalWall => mask(&|_, col| col % 4 == 0),
                SpriteType::Floor => mask(&|row, col| (row + col) % 8 == 0),
                SpriteType::Item => mask(&|row, col| row.abs_diff(col) <= 1),
                SpriteType::Corner => mask(&|row, col| row % 4 == 0 || col % 4 == 0),
                SpriteType::Door => mask(&|row, col| border(row, col) || col == size / 2),
                SpriteType::Pillar => mask(&|_, col| (5..=10).contains(&col)),
                SpriteType::Trap => mask(&|row, col| row == col || row + col == last),
                SpriteType::HallwayTile => mask(&|row, _| row == 0 || row == last),
            };
            AppearanceDefinition::new(
                sprite_type.index(),
                sprite_type.name(),
                format!("Built-in {} appearance", sprite_type.name()),
            )
            .with_visualization(visualization)
            .with_defaults(Defaults::new(true, GrowthType::Fixed))
        })
        .collect();

    DefinitionTable::new(definitions)
}

//! Instance loading: property lists resolved against definition tables.
//!
//! An instance document lists `{ "index", "currentValue", "maximumValue" }`
//! entries under a `characteristics` or `behaviours` key. Each index must
//! exist in the table. When the matching definition has sub-properties,
//! `currentValue` names one of them and becomes both values of the property.

use super::json::{as_object, get_u8, load_array};
use super::{BehaviourDefinitions, CharacteristicDefinitions, Definition, DefinitionTable};
use crate::{DelveError, DelveResult, Property};
use serde_json::Value;

/// Resolves one instance entry.
pub fn load_property<T: Definition>(
    value: &Value,
    table: &DefinitionTable<T>,
) -> DelveResult<Property> {
    let obj = as_object(value, T::KIND)?;
    let index = get_u8(obj, "index", T::KIND)?;
    let definition = table.get(index).ok_or_else(|| {
        DelveError::Validation(format!("{} with index {} not found.", T::KIND, index))
    })?;

    match definition.sub_properties() {
        Some(subs) if !subs.is_empty() => {
            let selected = get_u8(obj, "currentValue", T::KIND)?;
            let sub_property = definition.sub_property(selected).ok_or_else(|| {
                DelveError::Validation(format!(
                    "SubProperty with value {} not found for {} index {}.",
                    selected,
                    T::PROPERTY_TYPE.name().to_lowercase(),
                    index
                ))
            })?;
            Ok(
                Property::with_type(index, selected, selected, T::PROPERTY_TYPE)
                    .with_sub_property(sub_property.clone()),
            )
        }
        _ => {
            let current = get_u8(obj, "currentValue", T::KIND)?;
            let maximum = get_u8(obj, "maximumValue", T::KIND)?;
            Ok(Property::with_type(index, current, maximum, T::PROPERTY_TYPE))
        }
    }
}

/// Resolves the array under `T::TABLE_KEY` in `value`.
pub fn load_properties<T: Definition>(
    value: &Value,
    table: &DefinitionTable<T>,
) -> DelveResult<Vec<Property>> {
    let obj = as_object(value, T::TABLE_KEY)?;
    let items = obj.get(T::TABLE_KEY).and_then(Value::as_array).ok_or_else(|| {
        DelveError::Validation(format!(
            "'{}' field is missing or is not an array.",
            T::TABLE_KEY
        ))
    })?;

    load_array(items, |item| load_property(item, table), T::TABLE_KEY)
}

pub fn load_characteristics(
    value: &Value,
    table: &CharacteristicDefinitions,
) -> DelveResult<Vec<Property>> {
    load_properties(value, table)
}

pub fn load_behaviours(
    value: &Value,
    table: &BehaviourDefinitions,
) -> DelveResult<Vec<Property>> {
    load_properties(value, table)
}

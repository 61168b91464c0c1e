//! Reading attribute values back out of a layer.

use crate::error::LayerError;
use crate::model::{Layer, Value};

/// Collects the value of `key` from every feature that carries it.
///
/// Each feature contributes at most one value: the first tag pair with the
/// key wins. Features without the key are skipped, and a key missing from
/// the dictionary yields an empty result.
///
/// Fails with [`LayerError::ValueNotFound`] as soon as a matching tag points
/// past the end of the value dictionary.
pub fn get_values<'a>(layer: &'a Layer, key: &str) -> Result<Vec<&'a Value>, LayerError> {
    let Some(key_index) = layer.keys.position(key) else {
        return Ok(Vec::new());
    };

    let mut values = Vec::new();
    for feature in &layer.features {
        if let Some(value_index) = feature.tag_value(key_index) {
            let value = layer
                .values
                .get(value_index)
                .ok_or_else(|| LayerError::ValueNotFound {
                    key: key.to_string(),
                    index: value_index,
                    size: layer.values.len(),
                })?;
            values.push(value);
        }
    }

    Ok(values)
}

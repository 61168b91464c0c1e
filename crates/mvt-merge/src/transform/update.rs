//! Bulk property updates.

use crate::error::LayerError;
use crate::model::{append_tag, intern_key, intern_value, Layer, Value};

/// Appends externally supplied properties to each feature of a layer.
///
/// `new_props` holds one property set per feature, in feature order. Keys
/// and values are interned into the layer dictionaries and the resulting
/// tag pairs are appended, so a property whose key the feature already
/// carries is added alongside the existing tag rather than replacing it.
/// Tags are appended in the iteration order of each property set.
///
/// Fails with [`LayerError::ArityMismatch`] before touching the layer when
/// the number of property sets differs from the number of features.
pub fn update_properties<P, K, V>(
    layer: &mut Layer,
    new_props: Vec<P>,
) -> Result<&mut Layer, LayerError>
where
    P: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Value>,
{
    if new_props.len() != layer.features.len() {
        return Err(LayerError::ArityMismatch {
            props: new_props.len(),
            features: layer.features.len(),
        });
    }

    let mut added = 0usize;
    for (feature, props) in layer.features.iter_mut().zip(new_props) {
        for (name, value) in props {
            let k = intern_key(&mut layer.keys, name.as_ref());
            let v = intern_value(&mut layer.values, value.into());
            append_tag(&mut feature.tags, k, v);
            added += 1;
        }
    }

    tracing::debug!(
        layer = %layer.name,
        added,
        keys = layer.keys.len(),
        values = layer.values.len(),
        "updated layer properties"
    );
    Ok(layer)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::{GeomType, LayerBuilder, Tag};

    fn make_layer() -> Layer {
        LayerBuilder::new("buildings")
            .feature(GeomType::Polygon, |f| f.tag("height", 10))
            .feature(GeomType::Polygon, |f| f.tag("height", 12))
            .build()
    }

    #[test]
    fn test_update_appends_tags() {
        let mut layer = make_layer();
        let props = vec![
            vec![("height", Value::Int(20)), ("color", Value::from("red"))],
            vec![("color", Value::from("red"))],
        ];

        update_properties(&mut layer, props).unwrap();

        assert_eq!(layer.keys.as_slice(), &["height".to_string(), "color".to_string()]);
        assert_eq!(
            layer.features[0].tags,
            vec![
                Tag { key: 0, value: 0 },
                Tag { key: 0, value: 2 },
                Tag { key: 1, value: 3 },
            ]
        );
        assert_eq!(
            layer.features[1].tags,
            vec![Tag { key: 0, value: 1 }, Tag { key: 1, value: 3 }]
        );
        // the original tag still wins lookups
        assert_eq!(layer.feature_value(&layer.features[0], "height"), Some(&Value::Int(10)));
    }

    #[test]
    fn test_update_reuses_numeric_slot() {
        let mut layer = make_layer();
        let props = vec![vec![("ratio", 10.0)], vec![("ratio", 0.5)]];

        update_properties(&mut layer, props).unwrap();

        // 10.0 shares the slot of the integer 10
        assert_eq!(layer.features[0].tags[1], Tag { key: 1, value: 0 });
        assert_eq!(layer.values.len(), 3);
    }

    #[test]
    fn test_update_accepts_maps() {
        let mut layer = make_layer();
        let mut first = BTreeMap::new();
        first.insert("b".to_string(), Value::Bool(true));
        first.insert("a".to_string(), Value::Bool(false));

        update_properties(&mut layer, vec![first, BTreeMap::new()]).unwrap();
        assert_eq!(
            layer.keys.as_slice(),
            &["height".to_string(), "a".to_string(), "b".to_string()]
        );
        assert_eq!(layer.features[1].tags.len(), 1);
    }

    #[test]
    fn test_update_arity_mismatch_leaves_layer_unchanged() {
        let mut layer = make_layer();
        let before = layer.clone();

        let result = update_properties(&mut layer, vec![vec![("color", "red")]]);

        assert_eq!(result.unwrap_err(), LayerError::ArityMismatch { props: 1, features: 2 });
        assert_eq!(layer, before);
    }
}

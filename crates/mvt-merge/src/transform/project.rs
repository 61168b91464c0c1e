//! Restricting a layer to a subset of its keys.

use rustc_hash::FxHashSet;

use crate::model::{append_tag, intern_key, intern_value, Dictionary, Layer};

/// Rebuilds the layer dictionaries from the tags whose key is in `keys_to_keep`.
///
/// Every feature's tags are rewritten in order against fresh dictionaries,
/// so the result holds exactly the keys and values still referenced and
/// tag indices are renumbered. Geometry, type and id are untouched.
///
/// Tag pairs pointing outside the original dictionaries are dropped.
pub fn project_keys<'a, S: AsRef<str>>(layer: &'a mut Layer, keys_to_keep: &[S]) -> &'a mut Layer {
    let keep: FxHashSet<u32> = keys_to_keep
        .iter()
        .filter_map(|key| layer.keys.position(key.as_ref()))
        .collect();

    let old_keys = std::mem::take(&mut layer.keys);
    let old_values = std::mem::take(&mut layer.values);
    let mut keys = Dictionary::new();
    let mut values = Dictionary::new();
    let mut dangling = 0usize;

    for feature in &mut layer.features {
        let tags = std::mem::take(&mut feature.tags);
        for tag in tags.into_iter().filter(|t| keep.contains(&t.key)) {
            let (Some(key), Some(value)) = (old_keys.get(tag.key), old_values.get(tag.value)) else {
                dangling += 1;
                continue;
            };
            let k = intern_key(&mut keys, key);
            let v = intern_value(&mut values, value.clone());
            append_tag(&mut feature.tags, k, v);
        }
    }

    if dangling > 0 {
        tracing::warn!(layer = %layer.name, dangling, "dropped tags with out-of-range indices");
    }
    tracing::debug!(
        layer = %layer.name,
        keys_before = old_keys.len(),
        keys_after = keys.len(),
        values_before = old_values.len(),
        values_after = values.len(),
        "projected layer keys"
    );

    layer.keys = keys;
    layer.values = values;
    layer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GeomType, LayerBuilder, Point, Tag, Value};

    #[test]
    fn test_project_renumbers_tags() {
        let mut layer = LayerBuilder::new("roads")
            .feature(GeomType::LineString, |f| f
                .id(1)
                .tag("class", "primary")
                .tag("name", "Main")
                .tag("lanes", 4)
                .ring([(0, 0), (1, 1)]))
            .feature(GeomType::LineString, |f| f.id(2).tag("lanes", 2).tag("name", "Side"))
            .build();

        project_keys(&mut layer, &["lanes", "name"]);

        // first-seen order during the rewrite
        assert_eq!(layer.keys.as_slice(), &["name".to_string(), "lanes".to_string()]);
        assert_eq!(
            layer.values.as_slice(),
            &[Value::from("Main"), Value::Int(4), Value::Int(2), Value::from("Side")]
        );
        assert_eq!(
            layer.features[0].tags,
            vec![Tag { key: 0, value: 0 }, Tag { key: 1, value: 1 }]
        );
        assert_eq!(
            layer.features[1].tags,
            vec![Tag { key: 1, value: 2 }, Tag { key: 0, value: 3 }]
        );
        assert_eq!(layer.features[0].geometry, vec![vec![Point::new(0, 0), Point::new(1, 1)]]);
        assert_eq!(layer.features[0].id, Some(1));
    }

    #[test]
    fn test_project_drops_unreferenced_keys() {
        let mut layer = LayerBuilder::new("t")
            .feature(GeomType::Point, |f| f.tag("a", 1))
            .build();
        layer.keys.intern_str("b");

        project_keys(&mut layer, &["a", "b", "c"]);
        assert_eq!(layer.keys.as_slice(), &["a".to_string()]);
    }

    #[test]
    fn test_project_to_nothing() {
        let mut layer = LayerBuilder::new("t")
            .feature(GeomType::Point, |f| f.tag("a", 1).tag("b", true))
            .build();

        project_keys::<&str>(&mut layer, &[]);
        assert!(layer.keys.is_empty());
        assert!(layer.values.is_empty());
        assert!(layer.features[0].tags.is_empty());
        assert_eq!(layer.features.len(), 1);
    }

    #[test]
    fn test_project_merges_numeric_slots() {
        let mut layer = LayerBuilder::new("t").build();
        layer.keys = Dictionary::from_entries(vec!["n".to_string()]);
        layer.values = Dictionary::from_entries(vec![Value::Int(1), Value::Double(1.0)]);
        let mut feature = crate::model::Feature::new(GeomType::Point);
        feature.tags = vec![Tag { key: 0, value: 0 }, Tag { key: 0, value: 1 }];
        layer.features.push(feature);

        project_keys(&mut layer, &["n"]);
        assert_eq!(layer.values.as_slice(), &[Value::Int(1)]);
        assert_eq!(
            layer.features[0].tags,
            vec![Tag { key: 0, value: 0 }, Tag { key: 0, value: 0 }]
        );
    }

    #[test]
    fn test_project_drops_dangling_tags() {
        let mut layer = LayerBuilder::new("t")
            .feature(GeomType::Point, |f| f.tag("a", 1))
            .build();
        layer.features[0].tags.push(Tag { key: 0, value: 5 });

        project_keys(&mut layer, &["a"]);
        assert_eq!(layer.features[0].tags, vec![Tag { key: 0, value: 0 }]);
    }
}

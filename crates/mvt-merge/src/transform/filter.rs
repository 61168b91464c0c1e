//! Dropping features that lack required keys.

use crate::model::{Layer, Tag};

/// Retains only features carrying every key in `required_keys`.
///
/// Only key presence is checked, never the value. Repeated keys in
/// `required_keys` are tested once. A required key absent from the layer's
/// dictionary resolves to no index and can match no tag, so it removes
/// every feature. Dictionaries are left as they are, including entries no
/// remaining feature references.
pub fn filter_by_keys<'a, S: AsRef<str>>(
    layer: &'a mut Layer,
    required_keys: &[S],
) -> &'a mut Layer {
    let mut required: Vec<Option<u32>> = required_keys
        .iter()
        .map(|key| layer.keys.position(key.as_ref()))
        .collect();
    required.sort_unstable();
    required.dedup();

    let before = layer.features.len();
    layer.features.retain(|feature| has_all_keys(&feature.tags, &required));

    tracing::debug!(
        layer = %layer.name,
        required = required.len(),
        before,
        after = layer.features.len(),
        "filtered features by keys"
    );
    layer
}

fn has_all_keys(tags: &[Tag], required: &[Option<u32>]) -> bool {
    required
        .iter()
        .all(|index| index.is_some_and(|key| tags.iter().any(|tag| tag.key == key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GeomType, LayerBuilder};

    fn make_layer() -> Layer {
        LayerBuilder::new("roads")
            .feature(GeomType::LineString, |f| f.id(1).tag("class", "primary").tag("name", "Main"))
            .feature(GeomType::LineString, |f| f.id(2).tag("class", "service"))
            .feature(GeomType::LineString, |f| f.id(3).tag("name", "Side").tag("class", "minor"))
            .feature(GeomType::LineString, |f| f.id(4))
            .build()
    }

    fn ids(layer: &Layer) -> Vec<u64> {
        layer.features.iter().filter_map(|f| f.id).collect()
    }

    #[test]
    fn test_filter_keeps_order() {
        let mut layer = make_layer();
        filter_by_keys(&mut layer, &["class", "name"]);
        assert_eq!(ids(&layer), vec![1, 3]);
        // dictionaries are not compacted
        assert_eq!(layer.keys.len(), 2);
        assert_eq!(layer.values.len(), 5);
    }

    #[test]
    fn test_filter_repeated_key_tested_once() {
        let mut layer = make_layer();
        filter_by_keys(&mut layer, &["class", "class"]);
        assert_eq!(ids(&layer), vec![1, 2, 3]);
    }

    #[test]
    fn test_filter_ignores_duplicate_tags() {
        let mut layer = LayerBuilder::new("t")
            .feature(GeomType::Point, |f| f.id(1).tag("a", 1).tag("a", 2))
            .feature(GeomType::Point, |f| f.id(2).tag("b", 1))
            .build();
        filter_by_keys(&mut layer, &["a", "b"]);
        assert!(layer.features.is_empty());
    }

    #[test]
    fn test_filter_empty_requirement_keeps_all() {
        let mut layer = make_layer();
        filter_by_keys::<&str>(&mut layer, &[]);
        assert_eq!(layer.features.len(), 4);
    }

    #[test]
    fn test_filter_missing_key_removes_everything() {
        // an unknown key can never be matched, which is the same outcome
        // as every feature failing the presence check
        let mut layer = make_layer();
        filter_by_keys(&mut layer, &["class", "missing_key"]);
        assert!(layer.features.is_empty());
    }
}

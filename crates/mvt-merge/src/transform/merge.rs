//! Merging attribute-identical features.

use std::cmp::Ordering;

use crate::model::{Feature, GeomType, Layer};
use crate::transform::stitch::stitch_lines;

/// Total order used to group attribute-identical features.
///
/// Compares geometry type first, then tag count, then the tag pairs
/// element-wise. Feature ids and geometry do not take part.
pub fn compare_features(a: &Feature, b: &Feature) -> Ordering {
    a.geom_type
        .cmp(&b.geom_type)
        .then_with(|| a.tags.len().cmp(&b.tags.len()))
        .then_with(|| a.tags.cmp(&b.tags))
}

/// Collapses features with the same type and tags into one feature each.
///
/// Features are stably sorted by [`compare_features`]; each run of equal
/// features becomes its first member carrying the rings of the whole run in
/// order. LineString results are then passed through
/// [`stitch_lines`](crate::transform::stitch_lines). Point and Polygon
/// rings are only concatenated: split polygon boundaries are not rejoined.
pub fn merge_layer(layer: &mut Layer) -> &mut Layer {
    let before = layer.features.len();
    let mut features = std::mem::take(&mut layer.features);
    features.sort_by(compare_features);

    let mut merged: Vec<Feature> = Vec::with_capacity(features.len());
    for feature in features {
        match merged.last_mut() {
            Some(last) if compare_features(&feature, last) == Ordering::Equal => {
                last.geometry.extend(feature.geometry);
            }
            _ => merged.push(feature),
        }
    }

    let mut joins = 0usize;
    for feature in merged.iter_mut().filter(|f| f.geom_type == GeomType::LineString) {
        let rings = std::mem::take(&mut feature.geometry);
        let count = rings.len();
        feature.geometry = stitch_lines(rings);
        joins += count - feature.geometry.len();
    }

    tracing::debug!(
        layer = %layer.name,
        before,
        after = merged.len(),
        joins,
        "merged layer features"
    );

    layer.features = merged;
    layer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LayerBuilder, Point, Tag};

    fn ring(points: &[(i32, i32)]) -> Vec<Point> {
        points.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn test_compare_features_order() {
        let mut a = Feature::new(GeomType::Point);
        let mut b = Feature::new(GeomType::Point);
        assert_eq!(compare_features(&a, &b), Ordering::Equal);

        b.tags = vec![Tag { key: 0, value: 0 }];
        assert_eq!(compare_features(&a, &b), Ordering::Less);

        a.tags = vec![Tag { key: 0, value: 1 }, Tag { key: 0, value: 0 }];
        assert_eq!(compare_features(&a, &b), Ordering::Greater);

        b.tags = vec![Tag { key: 0, value: 1 }, Tag { key: 1, value: 0 }];
        assert_eq!(compare_features(&a, &b), Ordering::Less);

        let line = Feature::new(GeomType::LineString);
        assert_eq!(compare_features(&a, &line), Ordering::Less);
    }

    #[test]
    fn test_merge_points_concatenates() {
        let mut layer = LayerBuilder::new("poi")
            .feature(GeomType::Point, |f| f.id(1).tag("a", 1).ring([(1, 1)]))
            .feature(GeomType::Point, |f| f.id(2).tag("a", 1).ring([(2, 2)]))
            .build();

        merge_layer(&mut layer);

        assert_eq!(layer.features.len(), 1);
        assert_eq!(layer.features[0].id, Some(1));
        assert_eq!(layer.features[0].tags, vec![Tag { key: 0, value: 0 }]);
        assert_eq!(layer.features[0].geometry, vec![ring(&[(1, 1)]), ring(&[(2, 2)])]);
    }

    #[test]
    fn test_merge_groups_and_sorts() {
        let mut layer = LayerBuilder::new("mixed")
            .feature(GeomType::Polygon, |f| f.id(1).tag("k", "x").ring([(0, 0), (1, 0), (1, 1)]))
            .feature(GeomType::Point, |f| f.id(2).tag("k", "y").ring([(5, 5)]))
            .feature(GeomType::Point, |f| f.id(3).ring([(6, 6)]))
            .feature(GeomType::Polygon, |f| f.id(4).tag("k", "x").ring([(1, 0), (2, 0), (2, 1)]))
            .feature(GeomType::Point, |f| f.id(5).tag("k", "x").ring([(7, 7)]))
            .build();

        merge_layer(&mut layer);

        let ids: Vec<_> = layer.features.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![Some(3), Some(5), Some(2), Some(1)]);
        // polygons are concatenated, never stitched
        assert_eq!(layer.features[3].geometry.len(), 2);
    }

    #[test]
    fn test_merge_stitches_lines() {
        let mut layer = LayerBuilder::new("roads")
            .feature(GeomType::LineString, |f| f.tag("class", "main").ring([(2, 2), (4, 4)]))
            .feature(GeomType::LineString, |f| f.tag("class", "side").ring([(9, 9), (8, 8)]))
            .feature(GeomType::LineString, |f| f.tag("class", "main").ring([(0, 0), (2, 2)]))
            .build();

        merge_layer(&mut layer);

        assert_eq!(layer.features.len(), 2);
        assert_eq!(layer.features[0].geometry, vec![ring(&[(0, 0), (2, 2), (4, 4)])]);
        assert_eq!(layer.features[1].geometry, vec![ring(&[(9, 9), (8, 8)])]);
    }

    #[test]
    fn test_merge_stable_for_equal_features() {
        let mut layer = LayerBuilder::new("poi")
            .feature(GeomType::Point, |f| f.id(10).ring([(3, 3)]))
            .feature(GeomType::Point, |f| f.id(11).ring([(1, 1)]))
            .feature(GeomType::Point, |f| f.id(12).ring([(2, 2)]))
            .build();

        merge_layer(&mut layer);

        assert_eq!(layer.features[0].id, Some(10));
        assert_eq!(
            layer.features[0].geometry,
            vec![ring(&[(3, 3)]), ring(&[(1, 1)]), ring(&[(2, 2)])]
        );
    }

    #[test]
    fn test_merge_empty_layer() {
        let mut layer = Layer::new("empty");
        merge_layer(&mut layer);
        assert!(layer.features.is_empty());
    }
}

//! Structural validation of layers before they are transformed.
//!
//! The decoder guarantees in-bounds tags but accepts any ring the command
//! stream describes, so a decoded LineString may still hold a single point.
//! Layers assembled or edited by hand can break either rule. Run
//! [`validate_layer`] before transforming layers of unknown origin.

use crate::error::ValidationError;
use crate::model::{GeomType, Layer, Tile};

/// Validates every layer of a tile.
pub fn validate_tile(tile: &Tile) -> Result<(), ValidationError> {
    tile.layers.iter().try_for_each(validate_layer)
}

/// Validates tag indices and ring shapes of a layer.
///
/// - Tag key/value indices must fall inside the dictionaries
/// - Rings must not be empty
/// - LineString rings need at least 2 points, Polygon rings at least 3
pub fn validate_layer(layer: &Layer) -> Result<(), ValidationError> {
    for (i, feature) in layer.features.iter().enumerate() {
        for tag in &feature.tags {
            if tag.key as usize >= layer.keys.len() {
                return Err(ValidationError::TagOutOfBounds {
                    feature: i,
                    dict: "keys",
                    index: tag.key,
                    size: layer.keys.len(),
                });
            }
            if tag.value as usize >= layer.values.len() {
                return Err(ValidationError::TagOutOfBounds {
                    feature: i,
                    dict: "values",
                    index: tag.value,
                    size: layer.values.len(),
                });
            }
        }

        let min = min_ring_len(feature.geom_type);
        for (r, ring) in feature.geometry.iter().enumerate() {
            if ring.is_empty() {
                return Err(ValidationError::EmptyRing { feature: i, ring: r });
            }
            if ring.len() < min {
                return Err(ValidationError::RingTooShort {
                    feature: i,
                    ring: r,
                    geom_type: feature.geom_type.name(),
                    points: ring.len(),
                    min,
                });
            }
        }
    }
    Ok(())
}

fn min_ring_len(geom_type: GeomType) -> usize {
    match geom_type {
        GeomType::LineString => 2,
        GeomType::Polygon => 3,
        GeomType::Point | GeomType::Unknown => 1,
    }
}

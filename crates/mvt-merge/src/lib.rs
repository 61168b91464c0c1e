//! Mapbox Vector Tile layer transformations.
//!
//! This crate decodes and encodes MVT 2.1 tiles and provides in-place
//! transformations over their layers: key projection, key filtering, bulk
//! property updates, and merging of attribute-identical features with
//! stitching of line geometry across tile-internal seams.
//!
//! # Quick Start
//!
//! ```rust
//! use mvt_merge::{decode_tile, encode_tile, merge_layer, GeomType, LayerBuilder, Tile};
//!
//! let layer = LayerBuilder::new("roads")
//!     .feature(GeomType::LineString, |f| f.tag("class", "main").ring([(0, 0), (2, 2)]))
//!     .feature(GeomType::LineString, |f| f.tag("class", "main").ring([(2, 2), (4, 4)]))
//!     .build();
//! let bytes = encode_tile(&Tile { layers: vec![layer] }).unwrap();
//!
//! let mut tile = decode_tile(&bytes).unwrap();
//! for layer in &mut tile.layers {
//!     merge_layer(layer);
//! }
//!
//! assert_eq!(tile.layers[0].features.len(), 1);
//! assert_eq!(tile.layers[0].features[0].geometry.len(), 1);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Core data types (Tile, Layer, Feature, Value, Dictionary)
//! - [`codec`]: Binary encoding/decoding with compression support
//! - [`transform`]: Layer transformations
//! - [`validate`]: Structural validation
//! - [`error`]: Error types
//! - [`limits`]: Security limits for decoding
//!
//! # Logging
//!
//! Transformations emit `tracing` events at debug level. The crate never
//! installs a subscriber.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod transform;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    decode_tile, decompress, encode_tile, encode_tile_compressed, encode_tile_with_options,
    EncodeOptions,
};
pub use error::{DecodeError, EncodeError, LayerError, ValidationError};
pub use model::{
    Dictionary, Feature, FeatureBuilder, GeomType, Layer, LayerBuilder, Point, Ring, Tag, Tile,
    Value, ValueKey,
};
pub use transform::{
    filter_by_keys, get_values, merge_layer, project_keys, stitch_lines, update_properties,
};
pub use validate::{validate_layer, validate_tile};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Data model types for decoded vector tiles.
//!
//! This module contains the logical shape of a tile:
//! - Values (typed attribute instances) and their canonical keys
//! - Dictionaries (deduplicated key and value tables)
//! - Tiles, layers, features, tags and geometry rings
//! - Builders (ergonomic construction)

pub mod builder;
pub mod dictionary;
pub mod layer;
pub mod value;

pub use builder::{FeatureBuilder, LayerBuilder};
pub use dictionary::{append_tag, intern_key, intern_value, Dictionary, DictionaryEntry};
pub use layer::{Feature, GeomType, Layer, Point, Ring, Tag, Tile};
pub use value::{Value, ValueKey};

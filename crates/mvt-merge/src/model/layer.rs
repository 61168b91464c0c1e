//! Tile, layer and feature structures.

use crate::limits::{CURRENT_VERSION, DEFAULT_EXTENT};
use crate::model::{Dictionary, Value};

/// Geometry type of a feature (MVT `GeomType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum GeomType {
    #[default]
    Unknown = 0,
    Point = 1,
    LineString = 2,
    Polygon = 3,
}

impl GeomType {
    /// Creates a GeomType from its wire representation.
    pub fn from_u64(v: u64) -> Option<GeomType> {
        match v {
            0 => Some(GeomType::Unknown),
            1 => Some(GeomType::Point),
            2 => Some(GeomType::LineString),
            3 => Some(GeomType::Polygon),
            _ => None,
        }
    }

    /// Returns the type name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            GeomType::Unknown => "unknown",
            GeomType::Point => "point",
            GeomType::LineString => "linestring",
            GeomType::Polygon => "polygon",
        }
    }
}

/// A tile-space coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point { x, y }
    }
}

/// One line string, polygon ring, or cluster of points.
pub type Ring = Vec<Point>;

/// A (key index, value index) pair referencing the layer dictionaries.
///
/// Ordering compares the key index first, then the value index, which is
/// the element-wise order of the flat `[k0, v0, k1, v1, ...]` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag {
    pub key: u32,
    pub value: u32,
}

/// One map object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    pub id: Option<u64>,
    pub geom_type: GeomType,
    /// Tag pairs in wire order. Duplicate keys are legal; lookups take the
    /// first match.
    pub tags: Vec<Tag>,
    pub geometry: Vec<Ring>,
}

impl Feature {
    /// Creates an untagged feature with no geometry.
    pub fn new(geom_type: GeomType) -> Self {
        Self {
            geom_type,
            ..Self::default()
        }
    }

    /// Returns the total number of points across all rings.
    pub fn point_count(&self) -> usize {
        self.geometry.iter().map(Vec::len).sum()
    }

    /// Returns the value index of the first tag with the given key index.
    pub fn tag_value(&self, key: u32) -> Option<u32> {
        self.tags.iter().find(|t| t.key == key).map(|t| t.value)
    }
}

/// A named collection of features sharing one key/value dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub version: u32,
    pub name: String,
    pub extent: u32,
    pub keys: Dictionary<String>,
    pub values: Dictionary<Value>,
    pub features: Vec<Feature>,
}

impl Layer {
    /// Creates an empty layer with the default extent.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: CURRENT_VERSION,
            name: name.into(),
            extent: DEFAULT_EXTENT,
            keys: Dictionary::new(),
            values: Dictionary::new(),
            features: Vec::new(),
        }
    }

    /// Resolves the first value a feature carries for `key`.
    pub fn feature_value(&self, feature: &Feature, key: &str) -> Option<&Value> {
        let key_index = self.keys.position(key)?;
        self.values.get(feature.tag_value(key_index)?)
    }

    /// Iterates a feature's properties as resolved `(key, value)` pairs.
    ///
    /// Pairs with dangling indices are skipped.
    pub fn properties<'a>(
        &'a self,
        feature: &'a Feature,
    ) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        feature.tags.iter().filter_map(move |tag| {
            let key = self.keys.get(tag.key)?;
            let value = self.values.get(tag.value)?;
            Some((key.as_str(), value))
        })
    }

    /// Returns the total number of points across all features.
    pub fn point_count(&self) -> usize {
        self.features.iter().map(Feature::point_count).sum()
    }
}

/// A decoded vector tile: an ordered sequence of layers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tile {
    pub layers: Vec<Layer>,
}

impl Tile {
    /// Creates an empty tile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the first layer with the given name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Looks up the first layer with the given name, mutably.
    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.name == name)
    }
}

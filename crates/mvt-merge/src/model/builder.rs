//! Builder API for ergonomic layer construction.
//!
//! # Example
//!
//! ```rust
//! use mvt_merge::model::builder::LayerBuilder;
//! use mvt_merge::GeomType;
//!
//! let layer = LayerBuilder::new("roads")
//!     .extent(4096)
//!     .feature(GeomType::LineString, |f| f
//!         .id(1)
//!         .tag("class", "primary")
//!         .ring([(0, 0), (10, 10)])
//!     )
//!     .build();
//!
//! assert_eq!(layer.features.len(), 1);
//! assert_eq!(layer.keys.len(), 1);
//! ```

use crate::model::dictionary::{append_tag, intern_key, intern_value};
use crate::model::{Dictionary, Feature, GeomType, Layer, Point, Value};

/// Builder for constructing a Layer with features.
#[derive(Debug, Clone)]
pub struct LayerBuilder {
    layer: Layer,
}

impl LayerBuilder {
    /// Creates a new LayerBuilder with the given layer name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            layer: Layer::new(name),
        }
    }

    /// Sets the layer version.
    pub fn version(mut self, version: u32) -> Self {
        self.layer.version = version;
        self
    }

    /// Sets the layer extent.
    pub fn extent(mut self, extent: u32) -> Self {
        self.layer.extent = extent;
        self
    }

    /// Adds a feature, interning its tags into the layer dictionaries.
    pub fn feature<F>(mut self, geom_type: GeomType, f: F) -> Self
    where
        F: FnOnce(FeatureBuilder<'_>) -> FeatureBuilder<'_>,
    {
        let builder = FeatureBuilder {
            keys: &mut self.layer.keys,
            values: &mut self.layer.values,
            feature: Feature::new(geom_type),
        };
        let feature = f(builder).feature;
        self.layer.features.push(feature);
        self
    }

    /// Builds the layer.
    pub fn build(self) -> Layer {
        self.layer
    }
}

/// Builder for one feature of a layer.
#[derive(Debug)]
pub struct FeatureBuilder<'l> {
    keys: &'l mut Dictionary<String>,
    values: &'l mut Dictionary<Value>,
    feature: Feature,
}

impl FeatureBuilder<'_> {
    /// Sets the feature ID.
    pub fn id(mut self, id: u64) -> Self {
        self.feature.id = Some(id);
        self
    }

    /// Appends a property tag.
    pub fn tag(mut self, key: &str, value: impl Into<Value>) -> Self {
        let k = intern_key(self.keys, key);
        let v = intern_value(self.values, value.into());
        append_tag(&mut self.feature.tags, k, v);
        self
    }

    /// Appends a ring of points.
    pub fn ring<P: Into<Point>>(mut self, points: impl IntoIterator<Item = P>) -> Self {
        self.feature
            .geometry
            .push(points.into_iter().map(Into::into).collect());
        self
    }
}

//! Layer transformations.
//!
//! Every transformation takes the layer by mutable reference, rewrites it in
//! place and hands the same reference back, so calls compose:
//!
//! ```rust
//! use mvt_merge::transform::{filter_by_keys, merge_layer, project_keys};
//! use mvt_merge::{GeomType, LayerBuilder};
//!
//! let mut layer = LayerBuilder::new("roads")
//!     .feature(GeomType::LineString, |f| {
//!         f.tag("class", "main").tag("ref", "A1").ring([(0, 0), (2, 2)])
//!     })
//!     .feature(GeomType::LineString, |f| {
//!         f.tag("class", "main").tag("ref", "A2").ring([(2, 2), (4, 4)])
//!     })
//!     .feature(GeomType::LineString, |f| f.tag("ref", "B7").ring([(9, 9), (9, 0)]))
//!     .build();
//!
//! merge_layer(project_keys(filter_by_keys(&mut layer, &["class"]), &["class"]));
//!
//! assert_eq!(layer.features.len(), 1);
//! assert_eq!(layer.features[0].geometry[0].len(), 3);
//! ```
//!
//! Layers are independent: different layers of one tile may be transformed
//! on different threads, but a single layer must not be shared.

pub mod filter;
pub mod merge;
pub mod project;
pub mod stitch;
pub mod update;
pub mod values;

pub use filter::filter_by_keys;
pub use merge::{compare_features, merge_layer};
pub use project::project_keys;
pub use stitch::{compare_lines, stitch_lines, z_order};
pub use update::update_properties;
pub use values::get_values;

//! Binary encoding/decoding for Mapbox Vector Tiles.
//!
//! This module implements the MVT 2.1 protobuf wire format with optional
//! zstd compression.

pub mod geometry;
pub mod primitives;
pub mod tile;

pub use geometry::{decode_geometry, encode_geometry};
pub use primitives::{Reader, WireType, Writer, zigzag_decode, zigzag_encode};
pub use tile::{
    decode_tile, decompress, encode_tile, encode_tile_compressed, encode_tile_with_options,
    EncodeOptions,
};

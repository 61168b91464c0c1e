//! Security limits and format defaults for MVT decoding.
//!
//! The decoder bounds every allocation by these values so that untrusted
//! tiles cannot request unbounded memory.

/// Maximum size of an uncompressed tile in bytes (16 MiB).
pub const MAX_TILE_SIZE: usize = 16 * 1024 * 1024;

/// Maximum number of layers in one tile.
pub const MAX_LAYERS: usize = 1_024;

/// Maximum number of features in one layer.
pub const MAX_FEATURES_PER_LAYER: usize = 1_000_000;

/// Maximum number of entries in a key or value dictionary.
pub const MAX_DICT_SIZE: usize = 1_000_000;

/// Maximum length of a string (layer name, key, string value) in bytes.
pub const MAX_STRING_LEN: usize = 1024 * 1024;

/// Maximum number of integers in a feature's packed geometry.
pub const MAX_GEOMETRY_LEN: usize = 4 * 1024 * 1024;

/// Maximum number of integers in a feature's packed tags.
pub const MAX_TAGS_LEN: usize = 2 * MAX_DICT_SIZE;

/// Maximum varint length in bytes.
pub const MAX_VARINT_BYTES: usize = 10;

/// Layer extent used when the field is absent on the wire.
pub const DEFAULT_EXTENT: u32 = 4096;

/// Layer version used when the field is absent on the wire.
pub const DEFAULT_VERSION: u32 = 1;

/// Version written by the encoder for newly built layers.
pub const CURRENT_VERSION: u32 = 2;

/// Magic bytes opening a zstd frame.
pub const ZSTD_MAGIC: &[u8; 4] = &[0x28, 0xB5, 0x2F, 0xFD];

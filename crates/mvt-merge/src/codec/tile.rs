//! Tile encoding/decoding for the Mapbox Vector Tile 2.1 wire format.
//!
//! Message layout (protobuf field numbers):
//! - `Tile`: layers = 3
//! - `Layer`: name = 1, features = 2, keys = 3, values = 4, extent = 5, version = 15
//! - `Feature`: id = 1, tags = 2 (packed), type = 3, geometry = 4 (packed)
//! - `Value`: string = 1, float = 2, double = 3, int = 4, uint = 5, sint = 6, bool = 7

use std::io::Read;

use rustc_hash::FxHashSet;

use crate::codec::geometry::{decode_geometry, encode_geometry};
use crate::codec::primitives::{Reader, WireType, Writer, zigzag_decode, zigzag_encode};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{
    DEFAULT_EXTENT, DEFAULT_VERSION, MAX_DICT_SIZE, MAX_FEATURES_PER_LAYER, MAX_GEOMETRY_LEN,
    MAX_LAYERS, MAX_STRING_LEN, MAX_TAGS_LEN, MAX_TILE_SIZE, ZSTD_MAGIC,
};
use crate::model::{Dictionary, Feature, GeomType, Layer, Tag, Tile, Value};

const TILE_LAYERS: u32 = 3;

const LAYER_NAME: u32 = 1;
const LAYER_FEATURES: u32 = 2;
const LAYER_KEYS: u32 = 3;
const LAYER_VALUES: u32 = 4;
const LAYER_EXTENT: u32 = 5;
const LAYER_VERSION: u32 = 15;

const FEATURE_ID: u32 = 1;
const FEATURE_TAGS: u32 = 2;
const FEATURE_TYPE: u32 = 3;
const FEATURE_GEOMETRY: u32 = 4;

const VALUE_STRING: u32 = 1;
const VALUE_FLOAT: u32 = 2;
const VALUE_DOUBLE: u32 = 3;
const VALUE_INT: u32 = 4;
const VALUE_UINT: u32 = 5;
const VALUE_SINT: u32 = 6;
const VALUE_BOOL: u32 = 7;

// =============================================================================
// DECODING
// =============================================================================

/// Decompresses a zstd-compressed tile, returning the raw protobuf bytes.
///
/// The output is bounded by [`MAX_TILE_SIZE`].
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let decoder = zstd::Decoder::new(input)
        .map_err(|e| DecodeError::DecompressionFailed(e.to_string()))?;

    let mut decompressed = Vec::new();
    decoder
        .take(MAX_TILE_SIZE as u64 + 1)
        .read_to_end(&mut decompressed)
        .map_err(|e| DecodeError::DecompressionFailed(e.to_string()))?;

    if decompressed.len() > MAX_TILE_SIZE {
        return Err(DecodeError::LengthExceedsLimit {
            field: "tile",
            len: decompressed.len(),
            max: MAX_TILE_SIZE,
        });
    }

    tracing::trace!(
        compressed = input.len(),
        decompressed = decompressed.len(),
        "decompressed tile"
    );
    Ok(decompressed)
}

/// Decodes a Tile from binary data.
///
/// Handles both raw protobuf and zstd-compressed input; compression is
/// detected from the zstd frame magic.
pub fn decode_tile(input: &[u8]) -> Result<Tile, DecodeError> {
    if input.starts_with(ZSTD_MAGIC) {
        let decompressed = decompress(input)?;
        return decode_tile_raw(&decompressed);
    }
    if input.len() > MAX_TILE_SIZE {
        return Err(DecodeError::LengthExceedsLimit {
            field: "tile",
            len: input.len(),
            max: MAX_TILE_SIZE,
        });
    }
    decode_tile_raw(input)
}

fn decode_tile_raw(input: &[u8]) -> Result<Tile, DecodeError> {
    let mut reader = Reader::new(input);
    let mut layers = Vec::new();

    while !reader.is_empty() {
        match reader.read_key()? {
            (TILE_LAYERS, WireType::LengthDelimited) => {
                if layers.len() >= MAX_LAYERS {
                    return Err(DecodeError::LengthExceedsLimit {
                        field: "layers",
                        len: layers.len() + 1,
                        max: MAX_LAYERS,
                    });
                }
                let bytes = reader.read_bytes_prefixed(MAX_TILE_SIZE, "layer")?;
                layers.push(decode_layer(bytes)?);
            }
            (TILE_LAYERS, wire_type) => return Err(wire_type_error(TILE_LAYERS, wire_type)),
            (_, wire_type) => reader.skip(wire_type)?,
        }
    }

    Ok(Tile { layers })
}

/// Decodes a single Layer message.
fn decode_layer(input: &[u8]) -> Result<Layer, DecodeError> {
    let mut reader = Reader::new(input);

    let mut name = None;
    let mut version = DEFAULT_VERSION;
    let mut extent = DEFAULT_EXTENT;
    let mut keys = Vec::new();
    let mut values = Vec::new();
    // Features may precede the dictionaries they reference, so their
    // decoding waits until the whole layer has been read.
    let mut raw_features = Vec::new();

    while !reader.is_empty() {
        match reader.read_key()? {
            (LAYER_NAME, WireType::LengthDelimited) => {
                name = Some(reader.read_string(MAX_STRING_LEN, "layer name")?);
            }
            (LAYER_FEATURES, WireType::LengthDelimited) => {
                if raw_features.len() >= MAX_FEATURES_PER_LAYER {
                    return Err(DecodeError::LengthExceedsLimit {
                        field: "features",
                        len: raw_features.len() + 1,
                        max: MAX_FEATURES_PER_LAYER,
                    });
                }
                raw_features.push(reader.read_bytes_prefixed(MAX_TILE_SIZE, "feature")?);
            }
            (LAYER_KEYS, WireType::LengthDelimited) => {
                check_dict_size("keys", keys.len())?;
                keys.push(reader.read_string(MAX_STRING_LEN, "key")?);
            }
            (LAYER_VALUES, WireType::LengthDelimited) => {
                check_dict_size("values", values.len())?;
                let bytes = reader.read_bytes_prefixed(MAX_TILE_SIZE, "value")?;
                values.push(decode_value(bytes)?);
            }
            (LAYER_EXTENT, WireType::Varint) => {
                extent = reader.read_varint_u32("extent")?;
            }
            (LAYER_VERSION, WireType::Varint) => {
                version = reader.read_varint_u32("version")?;
            }
            (
                field @ (LAYER_NAME | LAYER_FEATURES | LAYER_KEYS | LAYER_VALUES | LAYER_EXTENT
                | LAYER_VERSION),
                wire_type,
            ) => return Err(wire_type_error(field, wire_type)),
            (_, wire_type) => reader.skip(wire_type)?,
        }
    }

    let name = name.ok_or(DecodeError::MissingLayerName)?;

    let mut seen = FxHashSet::with_capacity_and_hasher(keys.len(), Default::default());
    for key in &keys {
        if !seen.insert(key.as_str()) {
            return Err(DecodeError::DuplicateKey {
                layer: name,
                key: key.clone(),
            });
        }
    }

    let mut features = Vec::with_capacity(raw_features.len());
    for bytes in raw_features {
        features.push(decode_feature(bytes, keys.len(), values.len())?);
    }

    Ok(Layer {
        version,
        name,
        extent,
        keys: Dictionary::from_entries(keys),
        values: Dictionary::from_entries(values),
        features,
    })
}

fn check_dict_size(field: &'static str, len: usize) -> Result<(), DecodeError> {
    if len >= MAX_DICT_SIZE {
        return Err(DecodeError::LengthExceedsLimit {
            field,
            len: len + 1,
            max: MAX_DICT_SIZE,
        });
    }
    Ok(())
}

fn wire_type_error(field: u32, wire_type: WireType) -> DecodeError {
    DecodeError::InvalidWireType {
        field,
        wire_type: wire_type as u8,
    }
}

/// Decodes a single Feature message, bounds-checking its tags.
fn decode_feature(
    input: &[u8],
    key_count: usize,
    value_count: usize,
) -> Result<Feature, DecodeError> {
    let mut reader = Reader::new(input);

    let mut id = None;
    let mut geom_type = GeomType::Unknown;
    let mut raw_tags = Vec::new();
    let mut commands = Vec::new();

    while !reader.is_empty() {
        match reader.read_key()? {
            (FEATURE_ID, WireType::Varint) => {
                id = Some(reader.read_varint("feature id")?);
            }
            (FEATURE_TAGS, WireType::LengthDelimited) => {
                reader.read_packed_varints(&mut raw_tags, MAX_TAGS_LEN, "tags")?;
            }
            (FEATURE_TAGS, WireType::Varint) => {
                raw_tags.push(reader.read_varint_u32("tags")?);
            }
            (FEATURE_TYPE, WireType::Varint) => {
                let v = reader.read_varint("type")?;
                geom_type =
                    GeomType::from_u64(v).ok_or(DecodeError::InvalidGeomType { geom_type: v })?;
            }
            (FEATURE_GEOMETRY, WireType::LengthDelimited) => {
                reader.read_packed_varints(&mut commands, MAX_GEOMETRY_LEN, "geometry")?;
            }
            (FEATURE_GEOMETRY, WireType::Varint) => {
                commands.push(reader.read_varint_u32("geometry")?);
            }
            (field @ (FEATURE_ID | FEATURE_TAGS | FEATURE_TYPE | FEATURE_GEOMETRY), wire_type) => {
                return Err(wire_type_error(field, wire_type));
            }
            (_, wire_type) => reader.skip(wire_type)?,
        }
    }

    if raw_tags.len() % 2 != 0 {
        return Err(DecodeError::OddTagCount { len: raw_tags.len() });
    }
    let mut tags = Vec::with_capacity(raw_tags.len() / 2);
    for pair in raw_tags.chunks_exact(2) {
        let (key, value) = (pair[0], pair[1]);
        if key as usize >= key_count {
            return Err(DecodeError::IndexOutOfBounds {
                dict: "keys",
                index: key as usize,
                size: key_count,
            });
        }
        if value as usize >= value_count {
            return Err(DecodeError::IndexOutOfBounds {
                dict: "values",
                index: value as usize,
                size: value_count,
            });
        }
        tags.push(Tag { key, value });
    }

    let geometry = decode_geometry(&commands, geom_type)?;

    Ok(Feature {
        id,
        geom_type,
        tags,
        geometry,
    })
}

/// Decodes a single Value message. The last value field present wins.
fn decode_value(input: &[u8]) -> Result<Value, DecodeError> {
    let mut reader = Reader::new(input);
    let mut value = None;

    while !reader.is_empty() {
        match reader.read_key()? {
            (VALUE_STRING, WireType::LengthDelimited) => {
                value = Some(Value::String(reader.read_string(MAX_STRING_LEN, "string value")?));
            }
            (VALUE_FLOAT, WireType::Fixed32) => {
                value = Some(Value::Float(f32::from_bits(reader.read_fixed32("float value")?)));
            }
            (VALUE_DOUBLE, WireType::Fixed64) => {
                value = Some(Value::Double(f64::from_bits(reader.read_fixed64("double value")?)));
            }
            (VALUE_INT, WireType::Varint) => {
                value = Some(Value::Int(reader.read_varint("int value")? as i64));
            }
            (VALUE_UINT, WireType::Varint) => {
                value = Some(Value::UInt(reader.read_varint("uint value")?));
            }
            (VALUE_SINT, WireType::Varint) => {
                value = Some(Value::SInt(zigzag_decode(reader.read_varint("sint value")?)));
            }
            (VALUE_BOOL, WireType::Varint) => {
                value = Some(Value::Bool(reader.read_varint("bool value")? != 0));
            }
            (field @ VALUE_STRING..=VALUE_BOOL, wire_type) => {
                return Err(wire_type_error(field, wire_type));
            }
            (_, wire_type) => reader.skip(wire_type)?,
        }
    }

    value.ok_or(DecodeError::EmptyValue)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Options for encoding tiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// zstd compression level, or `None` for raw protobuf output.
    pub compression_level: Option<i32>,
}

impl EncodeOptions {
    /// Creates default (uncompressed) encoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options producing a zstd frame at the given level.
    pub fn compressed(level: i32) -> Self {
        Self {
            compression_level: Some(level),
        }
    }
}

fn validate_tile_inputs(tile: &Tile) -> Result<(), EncodeError> {
    if tile.layers.len() > MAX_LAYERS {
        return Err(EncodeError::LengthExceedsLimit {
            field: "layers",
            len: tile.layers.len(),
            max: MAX_LAYERS,
        });
    }
    for layer in &tile.layers {
        let checks = [
            ("features", layer.features.len(), MAX_FEATURES_PER_LAYER),
            ("keys", layer.keys.len(), MAX_DICT_SIZE),
            ("values", layer.values.len(), MAX_DICT_SIZE),
            ("layer name", layer.name.len(), MAX_STRING_LEN),
        ];
        for (field, len, max) in checks {
            if len > max {
                return Err(EncodeError::LengthExceedsLimit { field, len, max });
            }
        }
    }
    Ok(())
}

/// Encodes a Tile to binary format (uncompressed).
pub fn encode_tile(tile: &Tile) -> Result<Vec<u8>, EncodeError> {
    encode_tile_with_options(tile, EncodeOptions::default())
}

/// Encodes a Tile to binary format with zstd compression.
pub fn encode_tile_compressed(tile: &Tile, level: i32) -> Result<Vec<u8>, EncodeError> {
    encode_tile_with_options(tile, EncodeOptions::compressed(level))
}

/// Encodes a Tile to binary format with the given options.
pub fn encode_tile_with_options(
    tile: &Tile,
    options: EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    validate_tile_inputs(tile)?;

    let mut writer = Writer::with_capacity(1024);
    for layer in &tile.layers {
        let mut layer_writer = Writer::new();
        encode_layer(&mut layer_writer, layer)?;
        writer.write_bytes_field(TILE_LAYERS, layer_writer.as_bytes());
    }
    let raw = writer.into_bytes();

    match options.compression_level {
        None => Ok(raw),
        Some(level) => zstd::encode_all(raw.as_slice(), level)
            .map_err(|e| EncodeError::CompressionFailed(e.to_string())),
    }
}

fn encode_layer(writer: &mut Writer, layer: &Layer) -> Result<(), EncodeError> {
    writer.write_string_field(LAYER_NAME, &layer.name);

    let mut flat = Vec::new();
    for feature in &layer.features {
        let mut feature_writer = Writer::new();
        if let Some(id) = feature.id {
            feature_writer.write_varint_field(FEATURE_ID, id);
        }

        flat.clear();
        flat.extend(feature.tags.iter().flat_map(|t| [t.key, t.value]));
        feature_writer.write_packed_field(FEATURE_TAGS, &flat);

        feature_writer.write_varint_field(FEATURE_TYPE, feature.geom_type as u64);

        flat.clear();
        encode_geometry(&feature.geometry, feature.geom_type, &layer.name, &mut flat)?;
        feature_writer.write_packed_field(FEATURE_GEOMETRY, &flat);

        writer.write_bytes_field(LAYER_FEATURES, feature_writer.as_bytes());
    }

    for key in &layer.keys {
        writer.write_string_field(LAYER_KEYS, key);
    }

    for value in &layer.values {
        let mut value_writer = Writer::with_capacity(16);
        encode_value(&mut value_writer, value);
        writer.write_bytes_field(LAYER_VALUES, value_writer.as_bytes());
    }

    writer.write_varint_field(LAYER_EXTENT, layer.extent as u64);
    writer.write_varint_field(LAYER_VERSION, layer.version as u64);
    Ok(())
}

fn encode_value(writer: &mut Writer, value: &Value) {
    match value {
        Value::String(s) => writer.write_string_field(VALUE_STRING, s),
        Value::Float(v) => writer.write_fixed32_field(VALUE_FLOAT, v.to_bits()),
        Value::Double(v) => writer.write_fixed64_field(VALUE_DOUBLE, v.to_bits()),
        Value::Int(v) => writer.write_varint_field(VALUE_INT, *v as u64),
        Value::UInt(v) => writer.write_varint_field(VALUE_UINT, *v),
        Value::SInt(v) => writer.write_varint_field(VALUE_SINT, zigzag_encode(*v)),
        Value::Bool(v) => writer.write_varint_field(VALUE_BOOL, *v as u64),
    }
}

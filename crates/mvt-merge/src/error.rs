//! Error types for MVT decoding/encoding, layer transformations and validation.

use thiserror::Error;

/// Stable error codes for decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Index out of bounds
    IndexOutOfBounds,
    /// E002: Invalid UTF-8 encoding
    InvalidUtf8,
    /// E003: Malformed varint/field/geometry encoding
    MalformedEncoding,
    /// E004: Compression framing failure
    Compression,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::IndexOutOfBounds => "E001",
            ErrorCode::InvalidUtf8 => "E002",
            ErrorCode::MalformedEncoding => "E003",
            ErrorCode::Compression => "E004",
        }
    }
}

/// Error during tile decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === E001: Index out of bounds ===
    #[error("[E001] {dict} index {index} out of bounds (size: {size})")]
    IndexOutOfBounds {
        dict: &'static str,
        index: usize,
        size: usize,
    },

    // === E002: Invalid UTF-8 ===
    #[error("[E002] invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    // === E003: Malformed encoding ===
    #[error("[E003] unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("[E003] varint exceeds maximum length (10 bytes)")]
    VarintTooLong,

    #[error("[E003] varint overflow (value exceeds u64)")]
    VarintOverflow,

    #[error("[E003] {field} value {value} exceeds u32")]
    VarintExceedsU32 { field: &'static str, value: u64 },

    #[error("[E003] {field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("[E003] unsupported wire type {wire_type} for field {field}")]
    InvalidWireType { field: u32, wire_type: u8 },

    #[error("[E003] invalid geometry type: {geom_type}")]
    InvalidGeomType { geom_type: u64 },

    #[error("[E003] invalid geometry command {command} at offset {offset}")]
    InvalidCommand { command: u32, offset: usize },

    #[error("[E003] geometry command at offset {offset} is missing parameters")]
    TruncatedCommand { offset: usize },

    #[error("[E003] geometry coordinate overflows 32 bits")]
    CoordinateOverflow,

    #[error("[E003] feature tags have odd length {len}")]
    OddTagCount { len: usize },

    #[error("[E003] layer {layer:?} has duplicate key {key:?}")]
    DuplicateKey { layer: String, key: String },

    #[error("[E003] value message carries no value field")]
    EmptyValue,

    #[error("[E003] layer is missing its name")]
    MissingLayerName,

    // === E004: Compression ===
    #[error("[E004] zstd decompression failed: {0}")]
    DecompressionFailed(String),
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::IndexOutOfBounds { .. } => ErrorCode::IndexOutOfBounds,
            DecodeError::InvalidUtf8 { .. } => ErrorCode::InvalidUtf8,
            DecodeError::DecompressionFailed(_) => ErrorCode::Compression,
            _ => ErrorCode::MalformedEncoding,
        }
    }
}

/// Error during tile encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("geometry delta overflows 32 bits in layer {layer:?}")]
    CoordinateOverflow { layer: String },

    #[error("zstd compression failed: {0}")]
    CompressionFailed(String),
}

/// Error raised by a layer transformation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayerError {
    #[error("value for key {key:?} not found (value index {index}, dictionary size {size})")]
    ValueNotFound {
        key: String,
        index: u32,
        size: usize,
    },

    #[error("properties length {props} does not match the number of features {features}")]
    ArityMismatch { props: usize, features: usize },
}

/// Error during layer validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("feature {feature} references {dict} index {index} out of bounds (size: {size})")]
    TagOutOfBounds {
        feature: usize,
        dict: &'static str,
        index: u32,
        size: usize,
    },

    #[error("feature {feature} has an empty ring at position {ring}")]
    EmptyRing { feature: usize, ring: usize },

    #[error(
        "feature {feature} ring {ring} has {points} points, {geom_type} rings need at least {min}"
    )]
    RingTooShort {
        feature: usize,
        ring: usize,
        geom_type: &'static str,
        points: usize,
        min: usize,
    },
}

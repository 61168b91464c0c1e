//! Primitive encoding/decoding for the protobuf wire format.
//!
//! Implements varints, zigzag, field keys, fixed-width scalars and
//! length-delimited payloads.

use crate::error::DecodeError;
use crate::limits::MAX_VARINT_BYTES;

/// Protobuf wire types used by the vector tile schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl WireType {
    /// Creates a WireType from the low three bits of a field key.
    pub fn from_u8(v: u8) -> Option<WireType> {
        match v {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::LengthDelimited),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding binary data.
///
/// Wraps a byte slice and provides methods for reading primitives
/// with bounds checking and error handling.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the remaining bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        if self.pos >= self.data.len() {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.data.len() - self.pos {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads an unsigned varint (LEB128).
    #[inline]
    pub fn read_varint(&mut self, context: &'static str) -> Result<u64, DecodeError> {
        let mut result: u64 = 0;
        let mut shift = 0;

        for i in 0..MAX_VARINT_BYTES {
            let byte = self.read_byte(context)?;
            let value = (byte & 0x7F) as u64;

            // Check for overflow
            if shift >= 64 || (shift == 63 && value > 1) {
                return Err(DecodeError::VarintOverflow);
            }

            result |= value << shift;

            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;

            if i == MAX_VARINT_BYTES - 1 {
                return Err(DecodeError::VarintTooLong);
            }
        }

        Err(DecodeError::VarintTooLong)
    }

    /// Reads an unsigned varint that must fit in 32 bits.
    pub fn read_varint_u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        let value = self.read_varint(field)?;
        u32::try_from(value).map_err(|_| DecodeError::VarintExceedsU32 { field, value })
    }

    /// Reads a signed varint (zigzag encoded).
    pub fn read_signed_varint(&mut self, context: &'static str) -> Result<i64, DecodeError> {
        let unsigned = self.read_varint(context)?;
        Ok(zigzag_decode(unsigned))
    }

    /// Reads a field key, returning `(field number, wire type)`.
    pub fn read_key(&mut self) -> Result<(u32, WireType), DecodeError> {
        let key = self.read_varint("field key")?;
        let field = (key >> 3) as u32;
        let wire = (key & 0x7) as u8;
        let wire_type = WireType::from_u8(wire).ok_or(DecodeError::InvalidWireType {
            field,
            wire_type: wire,
        })?;
        Ok((field, wire_type))
    }

    /// Reads a little-endian u32.
    #[inline]
    pub fn read_fixed32(&mut self, context: &'static str) -> Result<u32, DecodeError> {
        let bytes = self.read_bytes(4, context)?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(bytes);
        Ok(u32::from_le_bytes(buf))
    }

    /// Reads a little-endian u64.
    #[inline]
    pub fn read_fixed64(&mut self, context: &'static str) -> Result<u64, DecodeError> {
        let bytes = self.read_bytes(8, context)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(buf))
    }

    /// Reads a length-prefixed byte slice without copying.
    pub fn read_bytes_prefixed(
        &mut self,
        max_len: usize,
        field: &'static str,
    ) -> Result<&'a [u8], DecodeError> {
        let len = self.read_varint(field)? as usize;
        if len > max_len {
            return Err(DecodeError::LengthExceedsLimit {
                field,
                len,
                max: max_len,
            });
        }
        self.read_bytes(len, field)
    }

    /// Reads a length-prefixed UTF-8 string.
    #[inline]
    pub fn read_string(
        &mut self,
        max_len: usize,
        field: &'static str,
    ) -> Result<String, DecodeError> {
        let bytes = self.read_bytes_prefixed(max_len, field)?;
        std::str::from_utf8(bytes)
            .map(|s| s.to_string())
            .map_err(|_| DecodeError::InvalidUtf8 { field })
    }

    /// Reads a packed repeated varint field, appending to `out`.
    ///
    /// `max_len` bounds the total number of elements in `out`.
    pub fn read_packed_varints(
        &mut self,
        out: &mut Vec<u32>,
        max_len: usize,
        field: &'static str,
    ) -> Result<(), DecodeError> {
        let bytes = self.read_bytes_prefixed(usize::MAX, field)?;
        let mut inner = Reader::new(bytes);
        while !inner.is_empty() {
            if out.len() >= max_len {
                return Err(DecodeError::LengthExceedsLimit {
                    field,
                    len: out.len() + 1,
                    max: max_len,
                });
            }
            out.push(inner.read_varint_u32(field)?);
        }
        Ok(())
    }

    /// Skips over a field value of the given wire type.
    pub fn skip(&mut self, wire_type: WireType) -> Result<(), DecodeError> {
        match wire_type {
            WireType::Varint => {
                self.read_varint("skipped field")?;
            }
            WireType::Fixed64 => {
                self.read_bytes(8, "skipped field")?;
            }
            WireType::LengthDelimited => {
                self.read_bytes_prefixed(usize::MAX, "skipped field")?;
            }
            WireType::Fixed32 => {
                self.read_bytes(4, "skipped field")?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes an unsigned varint (LEB128).
    #[inline]
    pub fn write_varint(&mut self, mut value: u64) {
        // Use stack buffer to batch writes (faster than multiple push calls)
        let mut buf = [0u8; 10]; // Max 10 bytes for 64-bit varint
        let mut len = 0;
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            buf[len] = byte;
            len += 1;
            if value == 0 {
                break;
            }
        }
        self.buf.extend_from_slice(&buf[..len]);
    }

    /// Writes a signed varint (zigzag encoded).
    pub fn write_signed_varint(&mut self, value: i64) {
        self.write_varint(zigzag_encode(value));
    }

    /// Writes a field key.
    #[inline]
    pub fn write_key(&mut self, field: u32, wire_type: WireType) {
        self.write_varint(((field as u64) << 3) | wire_type as u64);
    }

    /// Writes a varint field.
    pub fn write_varint_field(&mut self, field: u32, value: u64) {
        self.write_key(field, WireType::Varint);
        self.write_varint(value);
    }

    /// Writes a little-endian u32 field.
    pub fn write_fixed32_field(&mut self, field: u32, value: u32) {
        self.write_key(field, WireType::Fixed32);
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian u64 field.
    pub fn write_fixed64_field(&mut self, field: u32, value: u64) {
        self.write_key(field, WireType::Fixed64);
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a length-delimited field.
    pub fn write_bytes_field(&mut self, field: u32, bytes: &[u8]) {
        self.write_key(field, WireType::LengthDelimited);
        self.write_varint(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a string field.
    pub fn write_string_field(&mut self, field: u32, s: &str) {
        self.write_bytes_field(field, s.as_bytes());
    }

    /// Writes a packed repeated varint field. Empty slices are omitted.
    pub fn write_packed_field(&mut self, field: u32, values: &[u32]) {
        if values.is_empty() {
            return;
        }
        let mut packed = Writer::with_capacity(values.len() * 2);
        for &v in values {
            packed.write_varint(v as u64);
        }
        self.write_bytes_field(field, packed.as_bytes());
    }
}

// =============================================================================
// ZIGZAG ENCODING
// =============================================================================

/// Encodes a signed integer using zigzag encoding.
///
/// Maps negative numbers to odd positive numbers:
/// 0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, 2 -> 4, ...
#[inline]
pub fn zigzag_encode(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Decodes a zigzag-encoded unsigned integer back to signed.
#[inline]
pub fn zigzag_decode(n: u64) -> i64 {
    ((n >> 1) as i64) ^ (-((n & 1) as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_values() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(-2), 3);
        assert_eq!(zigzag_encode(2), 4);
        assert_eq!(zigzag_decode(zigzag_encode(i64::MIN)), i64::MIN);
    }

    #[test]
    fn test_varint_roundtrip() {
        let test_values = [0u64, 1, 127, 128, 255, 256, 16383, 16384, u64::MAX];

        for v in test_values {
            let mut writer = Writer::new();
            writer.write_varint(v);

            let mut reader = Reader::new(writer.as_bytes());
            let decoded = reader.read_varint("test").unwrap();
            assert_eq!(v, decoded, "failed for {}", v);
        }
    }

    #[test]
    fn test_field_key() {
        let mut writer = Writer::new();
        writer.write_string_field(1, "roads");
        // field 1, wire type 2
        assert_eq!(writer.as_bytes()[0], 0x0A);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_key().unwrap(), (1, WireType::LengthDelimited));
        assert_eq!(reader.read_string(100, "name").unwrap(), "roads");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_invalid_wire_type() {
        // field 1, wire type 3 (start group)
        let data = [0x0Bu8];
        let mut reader = Reader::new(&data);
        assert!(matches!(
            reader.read_key(),
            Err(DecodeError::InvalidWireType { field: 1, wire_type: 3 })
        ));
    }

    #[test]
    fn test_fixed_fields() {
        let mut writer = Writer::new();
        writer.write_fixed32_field(2, 1.5f32.to_bits());
        writer.write_fixed64_field(3, 2.25f64.to_bits());

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_key().unwrap(), (2, WireType::Fixed32));
        assert_eq!(f32::from_bits(reader.read_fixed32("f").unwrap()), 1.5);
        assert_eq!(reader.read_key().unwrap(), (3, WireType::Fixed64));
        assert_eq!(f64::from_bits(reader.read_fixed64("d").unwrap()), 2.25);
    }

    #[test]
    fn test_packed_varints() {
        let mut writer = Writer::new();
        writer.write_packed_field(2, &[0, 300, 1]);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_key().unwrap(), (2, WireType::LengthDelimited));
        let mut out = Vec::new();
        reader.read_packed_varints(&mut out, 10, "tags").unwrap();
        assert_eq!(out, vec![0, 300, 1]);
    }

    #[test]
    fn test_varint_u32_range() {
        let mut writer = Writer::new();
        writer.write_varint(u32::MAX as u64);
        writer.write_varint(u32::MAX as u64 + 1);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_varint_u32("tags").unwrap(), u32::MAX);
        assert!(matches!(
            reader.read_varint_u32("tags"),
            Err(DecodeError::VarintExceedsU32 { field: "tags", value: 0x1_0000_0000 })
        ));
    }

    #[test]
    fn test_packed_varints_limit() {
        let mut writer = Writer::new();
        writer.write_packed_field(4, &[1, 2, 3]);

        let mut reader = Reader::new(writer.as_bytes());
        reader.read_key().unwrap();
        let mut out = Vec::new();
        let result = reader.read_packed_varints(&mut out, 2, "geometry");
        assert!(matches!(result, Err(DecodeError::LengthExceedsLimit { max: 2, .. })));
    }

    #[test]
    fn test_skip_unknown_fields() {
        let mut writer = Writer::new();
        writer.write_varint_field(9, 42);
        writer.write_fixed64_field(10, 7);
        writer.write_string_field(11, "ignored");
        writer.write_fixed32_field(12, 1);
        writer.write_varint_field(1, 5);

        let mut reader = Reader::new(writer.as_bytes());
        loop {
            let (field, wire_type) = reader.read_key().unwrap();
            if field == 1 {
                assert_eq!(reader.read_varint("v").unwrap(), 5);
                break;
            }
            reader.skip(wire_type).unwrap();
        }
        assert!(reader.is_empty());
    }

    #[test]
    fn test_varint_too_long() {
        // 11 continuation bytes should fail
        let data = [0x80u8; 11];
        let mut reader = Reader::new(&data);
        let result = reader.read_varint("test");
        assert!(matches!(result, Err(DecodeError::VarintTooLong)));
    }

    #[test]
    fn test_unexpected_eof() {
        let data = [0u8; 5];
        let mut reader = Reader::new(&data);
        let result = reader.read_bytes(10, "test");
        assert!(matches!(result, Err(DecodeError::UnexpectedEof { .. })));
    }
}

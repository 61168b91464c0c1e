//! Geometry command stream encoding/decoding.
//!
//! Feature geometry is a packed sequence of command integers
//! `(id & 0x7) | (count << 3)` followed by zigzag-encoded coordinate deltas.
//! The cursor starts at `(0, 0)` and persists across all rings of a feature.

use crate::codec::primitives::{zigzag_decode, zigzag_encode};
use crate::error::{DecodeError, EncodeError};
use crate::model::{GeomType, Point, Ring};

pub const CMD_MOVE_TO: u32 = 1;
pub const CMD_LINE_TO: u32 = 2;
pub const CMD_CLOSE_PATH: u32 = 7;

/// Largest repeat count a command integer can carry.
const MAX_COMMAND_COUNT: usize = (1 << 29) - 1;

#[inline]
fn command(id: u32, count: usize) -> u32 {
    (id & 0x7) | ((count as u32) << 3)
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a command stream into rings.
///
/// Point features get one ring per MoveTo command holding all of its points.
/// Every other type starts a new ring at each MoveTo point. Polygon rings do
/// not repeat their first point; a ClosePath on any other type does.
pub fn decode_geometry(commands: &[u32], geom_type: GeomType) -> Result<Vec<Ring>, DecodeError> {
    let mut rings: Vec<Ring> = Vec::new();
    let mut current: Option<Ring> = None;
    let mut x: i64 = 0;
    let mut y: i64 = 0;
    let mut i = 0;

    while i < commands.len() {
        let offset = i;
        let cmd = commands[i];
        i += 1;
        let id = cmd & 0x7;
        let count = (cmd >> 3) as usize;

        match id {
            CMD_MOVE_TO | CMD_LINE_TO => {
                if (commands.len() - i) / 2 < count {
                    return Err(DecodeError::TruncatedCommand { offset });
                }
                if id == CMD_LINE_TO && current.is_none() {
                    return Err(DecodeError::InvalidCommand { command: cmd, offset });
                }
                if id == CMD_MOVE_TO && geom_type == GeomType::Point {
                    rings.extend(current.take());
                    current = Some(Vec::with_capacity(count));
                }
                for _ in 0..count {
                    x += zigzag_decode(commands[i] as u64);
                    y += zigzag_decode(commands[i + 1] as u64);
                    i += 2;
                    let point = Point::new(
                        i32::try_from(x).map_err(|_| DecodeError::CoordinateOverflow)?,
                        i32::try_from(y).map_err(|_| DecodeError::CoordinateOverflow)?,
                    );
                    if id == CMD_MOVE_TO && geom_type != GeomType::Point {
                        rings.extend(current.take());
                    }
                    current.get_or_insert_with(Vec::new).push(point);
                }
            }
            CMD_CLOSE_PATH => {
                let ring = current
                    .as_mut()
                    .ok_or(DecodeError::InvalidCommand { command: cmd, offset })?;
                if geom_type != GeomType::Polygon {
                    if let Some(&first) = ring.first() {
                        ring.push(first);
                    }
                }
            }
            _ => return Err(DecodeError::InvalidCommand { command: cmd, offset }),
        }
    }

    rings.extend(current);
    Ok(rings)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes rings into a command stream, appending to `out`.
///
/// Empty rings are skipped.
pub fn encode_geometry(
    rings: &[Ring],
    geom_type: GeomType,
    layer: &str,
    out: &mut Vec<u32>,
) -> Result<(), EncodeError> {
    let mut cursor = Cursor::default();

    for ring in rings.iter().filter(|r| !r.is_empty()) {
        if ring.len() > MAX_COMMAND_COUNT {
            return Err(EncodeError::LengthExceedsLimit {
                field: "ring",
                len: ring.len(),
                max: MAX_COMMAND_COUNT,
            });
        }

        if geom_type == GeomType::Point {
            out.push(command(CMD_MOVE_TO, ring.len()));
            for &p in ring {
                cursor.push_delta(p, layer, out)?;
            }
            continue;
        }

        out.push(command(CMD_MOVE_TO, 1));
        cursor.push_delta(ring[0], layer, out)?;
        if ring.len() > 1 {
            out.push(command(CMD_LINE_TO, ring.len() - 1));
            for &p in &ring[1..] {
                cursor.push_delta(p, layer, out)?;
            }
        }
        if geom_type == GeomType::Polygon {
            out.push(command(CMD_CLOSE_PATH, 1));
        }
    }

    Ok(())
}

#[derive(Debug, Default)]
struct Cursor {
    x: i64,
    y: i64,
}

impl Cursor {
    fn push_delta(&mut self, p: Point, layer: &str, out: &mut Vec<u32>) -> Result<(), EncodeError> {
        let dx = p.x as i64 - self.x;
        let dy = p.y as i64 - self.y;
        let overflow = || EncodeError::CoordinateOverflow {
            layer: layer.to_string(),
        };
        let dx = i32::try_from(dx).map_err(|_| overflow())?;
        let dy = i32::try_from(dy).map_err(|_| overflow())?;
        out.push(zigzag_encode(dx as i64) as u32);
        out.push(zigzag_encode(dy as i64) as u32);
        self.x = p.x as i64;
        self.y = p.y as i64;
        Ok(())
    }
}

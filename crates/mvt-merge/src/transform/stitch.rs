//! Joining line strings that meet end to start.
//!
//! Rings are visited in Morton (Z-order) order of their first point so the
//! result is reproducible. Matching itself is exact: endpoints are looked up
//! by their full coordinates, so distinct points never collide whatever the
//! tile extent.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use crate::model::{Point, Ring};

/// Interleaves the bits of `x` and `y` into a Morton code.
///
/// For coordinates in `0..=65535` this is the classic 16-bit interleave
/// widened to `u64`; the full 32-bit range is interleaved without loss.
pub fn z_order(x: u32, y: u32) -> u64 {
    spread_bits(x) | (spread_bits(y) << 1)
}

#[inline]
fn spread_bits(v: u32) -> u64 {
    let mut v = v as u64;
    v = (v | (v << 16)) & 0x0000_FFFF_0000_FFFF;
    v = (v | (v << 8)) & 0x00FF_00FF_00FF_00FF;
    v = (v | (v << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    v = (v | (v << 2)) & 0x3333_3333_3333_3333;
    v = (v | (v << 1)) & 0x5555_5555_5555_5555;
    v
}

#[inline]
fn morton(p: Point) -> u64 {
    // negative coordinates (tile buffer) order after the positive range
    z_order(p.x as u32, p.y as u32)
}

/// Orders rings by the Morton code of their first point, then by raw x and y.
///
/// Empty rings sort first.
pub fn compare_lines(a: &Ring, b: &Ring) -> Ordering {
    match (a.first(), b.first()) {
        (Some(pa), Some(pb)) => morton(*pa)
            .cmp(&morton(*pb))
            .then(pa.x.cmp(&pb.x))
            .then(pa.y.cmp(&pb.y)),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

/// Concatenates line strings that share an endpoint into longer chains.
///
/// A ring starting where an earlier chain ends is appended to it, and a
/// ring ending where an earlier chain starts is prepended to it; the shared
/// point is kept once. A ring doing both bridges the two chains into one.
/// A join is skipped when the ring would immediately retrace the chain's
/// last segment. Rings with fewer than two points pass through unchanged.
///
/// Chains are returned in the order their first ring was visited.
pub fn stitch_lines(mut rings: Vec<Ring>) -> Vec<Ring> {
    rings.sort_by(compare_lines);

    let mut chains: Vec<Option<Ring>> = Vec::with_capacity(rings.len());
    let mut starts: FxHashMap<Point, usize> = FxHashMap::default();
    let mut ends: FxHashMap<Point, usize> = FxHashMap::default();

    for ring in rings {
        let n = ring.len();
        if n < 2 {
            chains.push(Some(ring));
            continue;
        }
        let start = ring[0];
        let end = ring[n - 1];

        let chain_at = |idx: usize| chains.get(idx).and_then(Option::as_ref);

        // chain ending where the ring starts
        let head = ends
            .get(&start)
            .copied()
            .filter(|&a| chain_at(a).is_some_and(|c| c[c.len() - 2] != ring[1]));
        // chain starting where the ring ends
        let tail = starts
            .get(&end)
            .copied()
            .filter(|&b| chain_at(b).is_some_and(|c| c[1] != ring[n - 2]));

        match (head, tail) {
            (Some(a), Some(b)) if a == b => {
                // the ring closes the chain into a loop
                if let Some(chain) = chains[a].as_mut() {
                    chain.extend_from_slice(&ring[1..]);
                }
                ends.remove(&start);
                starts.remove(&end);
            }
            (Some(a), Some(b)) => {
                ends.remove(&start);
                starts.remove(&end);
                let tail_chain = chains[b].take().unwrap_or_default();
                if let Some(chain) = chains[a].as_mut() {
                    chain.extend_from_slice(&ring[1..]);
                    chain.extend_from_slice(&tail_chain[1..]);
                }
                if let Some(&tail_end) = tail_chain.last() {
                    if ends.get(&tail_end) == Some(&b) {
                        ends.insert(tail_end, a);
                    }
                }
            }
            (Some(a), None) => {
                ends.remove(&start);
                if let Some(chain) = chains[a].as_mut() {
                    chain.extend_from_slice(&ring[1..]);
                }
                ends.insert(end, a);
            }
            (None, Some(b)) => {
                starts.remove(&end);
                if let Some(chain) = chains[b].as_mut() {
                    let mut joined = ring;
                    joined.pop();
                    joined.extend_from_slice(chain);
                    *chain = joined;
                }
                starts.insert(start, b);
            }
            (None, None) => {
                let idx = chains.len();
                starts.insert(start, idx);
                ends.insert(end, idx);
                chains.push(Some(ring));
            }
        }
    }

    chains.into_iter().flatten().collect()
}

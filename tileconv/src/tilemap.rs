//! Tilemap resolution against an existing tileset lookup.

use itertools::Itertools;

use crate::color::Ramp;
use crate::convert::ConversionError;
use crate::extract::{extract_tiles, ScanOrder};
use crate::grid::PixelGrid;
use crate::lookup::TileLookup;

/// Map every whole tile of `grid` (row-major) to its ordinal in `lookup` plus `offset`.
///
/// Indices wrap on overflow; only their low byte reaches the tilemap string.
/// Fails on the first tile that is not in the lookup.
pub fn resolve<G: PixelGrid + ?Sized>(
    grid: &G,
    lookup: &TileLookup,
    offset: i64,
) -> Result<Vec<i64>, ConversionError> {
    extract_tiles(grid, ScanOrder::RowMajor, Ramp::Tileset)
        .map(|tile| match lookup.get(&tile) {
            Some(ordinal) => Ok((ordinal as i64).wrapping_add(offset)),
            None => Err(ConversionError::MissingTile(tile)),
        })
        .collect()
}

/// Format a tilemap entry as a `0xHH` byte, wrapping into 0..=255
pub fn dec_hex(value: i64) -> String {
    format!("0x{:02X}", value.rem_euclid(256))
}

/// Comma-joined `dec_hex` tokens, no trailing separator
pub fn tilemap_string(indices: &[i64]) -> String {
    indices.iter().map(|&v| dec_hex(v)).join(",")
}

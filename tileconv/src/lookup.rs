//! Deduplicating tile lookups.
//!
//! A `TileLookup` maps each distinct encoded tile to an ordinal. Ordinals are
//! handed out on first sight, starting at 0, so they always form the dense
//! range `0..len()` and enumerating the lookup yields tiles in ordinal order.

use std::collections::HashMap;

use crate::color::Ramp;
use crate::convert::ConversionError;
use crate::extract::{extract_tiles, ScanOrder};
use crate::grid::PixelGrid;
use crate::tile::{join_tiles, split_tiles, EncodedTile};

/// Insertion-ordered map from encoded tile to ordinal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileLookup {
    /// Tiles in ordinal order
    tiles: Vec<EncodedTile>,
    /// Ordinal of each tile
    ordinals: HashMap<EncodedTile, usize>,
}

impl TileLookup {
    /// Create an empty lookup
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a lookup from a tile sequence, in sequence order
    pub fn build<I>(tiles: I) -> Self
    where
        I: IntoIterator<Item = EncodedTile>,
    {
        let mut lookup = Self::new();
        lookup.extend(tiles);
        lookup
    }

    /// Build the lookup of a grid's tiles in row-major order with the tileset ramp
    pub fn from_grid<G: PixelGrid + ?Sized>(grid: &G) -> Self {
        let lookup = Self::build(extract_tiles(grid, ScanOrder::RowMajor, Ramp::Tileset));
        log::debug!(
            "{}x{} grid has {} unique tiles",
            grid.width(),
            grid.height(),
            lookup.len()
        );
        lookup
    }

    /// Rebuild a lookup from a tileset string, ordinals following the order
    /// of the tiles in the string
    pub fn from_tiles_string(s: &str) -> Result<Self, ConversionError> {
        Ok(Self::build(split_tiles(s)?))
    }

    /// Merge lookups into one.
    ///
    /// Lookups are visited in sequence order and each one in its own ordinal
    /// order. A tile keeps the ordinal it was first given; later duplicates
    /// are coalesced.
    pub fn merge<'a, I>(lookups: I) -> Self
    where
        I: IntoIterator<Item = &'a TileLookup>,
    {
        let mut merged = Self::new();
        for lookup in lookups {
            merged.extend(lookup.tiles.iter().cloned());
        }
        merged
    }

    /// Add a tile if it has not been seen, returning its ordinal
    pub fn insert(&mut self, tile: EncodedTile) -> usize {
        if let Some(&ordinal) = self.ordinals.get(&tile) {
            return ordinal;
        }
        let ordinal = self.tiles.len();
        self.ordinals.insert(tile.clone(), ordinal);
        self.tiles.push(tile);
        ordinal
    }

    /// Ordinal of a tile, if present
    pub fn get(&self, tile: &EncodedTile) -> Option<usize> {
        self.ordinals.get(tile).copied()
    }

    /// Number of distinct tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles in ordinal order
    pub fn tiles(&self) -> &[EncodedTile] {
        &self.tiles
    }

    /// (ordinal, tile) pairs in ordinal order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &EncodedTile)> {
        self.tiles.iter().enumerate()
    }

    /// All tiles concatenated in ordinal order, final separator trimmed
    pub fn tiles_string(&self) -> String {
        join_tiles(&self.tiles)
    }
}

impl Extend<EncodedTile> for TileLookup {
    fn extend<T: IntoIterator<Item = EncodedTile>>(&mut self, iter: T) {
        for tile in iter {
            self.insert(tile);
        }
    }
}

impl FromIterator<EncodedTile> for TileLookup {
    fn from_iter<T: IntoIterator<Item = EncodedTile>>(iter: T) -> Self {
        Self::build(iter)
    }
}

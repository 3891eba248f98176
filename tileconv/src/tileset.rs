//! Renders a tile lookup back into a grayscale tileset image.

use image::{GrayImage, Luma};

use crate::color::color_from_index;
use crate::convert::ConversionError;
use crate::lookup::TileLookup;
use crate::tile::TILE_SIZE;

/// Tiles per row of a rendered tileset
pub const TILESET_COLUMNS: u32 = 16;

/// Size in pixels of a tileset image holding `tile_count` tiles laid out
/// `columns` to a row
pub fn tileset_dimensions(tile_count: usize, columns: u32) -> (u32, u32) {
    let tile_count = tile_count as u32;
    let columns = columns.max(1);
    let width = (tile_count * TILE_SIZE).min(columns * TILE_SIZE);
    let height = TILE_SIZE * tile_count.div_ceil(columns);
    (width, height)
}

/// Pixel offset of the tile with the given ordinal
pub fn tile_offset(ordinal: usize, columns: u32) -> (u32, u32) {
    let ordinal = ordinal as u32;
    let columns = columns.max(1);
    (
        TILE_SIZE * (ordinal % columns),
        TILE_SIZE * (ordinal / columns),
    )
}

/// Lay out every tile of the lookup in ordinal order, left to right and top
/// to bottom, decoding each back into samples.
pub fn render(lookup: &TileLookup, columns: u32) -> Result<GrayImage, ConversionError> {
    let (width, height) = tileset_dimensions(lookup.len(), columns);
    let mut img = GrayImage::new(width, height);

    for (ordinal, tile) in lookup.iter() {
        let (offset_x, offset_y) = tile_offset(ordinal, columns);
        let block = tile.decode()?;

        for (y, row) in block.iter().enumerate() {
            for (x, index) in row.iter().enumerate() {
                img.put_pixel(
                    offset_x + x as u32,
                    offset_y + y as u32,
                    Luma([color_from_index(*index)]),
                );
            }
        }
    }

    log::debug!(
        "rendered {} tiles into a {}x{} tileset",
        lookup.len(),
        width,
        height
    );
    Ok(img)
}

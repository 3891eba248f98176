//! Walks a pixel grid tile by tile.
//!
//! Only whole tiles are visited. Any trailing pixels narrower or shorter than
//! a tile are ignored.

use itertools::Itertools;

use crate::color::Ramp;
use crate::grid::PixelGrid;
use crate::tile::{encode_tile, join_tiles, EncodedTile, TILE_SIZE};

/// Order in which tiles of a grid are visited
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ScanOrder {
    /// Tile rows outer, tile columns inner (tilesets and tilemaps)
    #[default]
    RowMajor,
    /// Tile columns outer, tile rows inner (sprite data)
    ColumnMajor,
}

/// Number of whole tiles across and down the grid
pub fn tile_counts<G: PixelGrid + ?Sized>(grid: &G) -> (u32, u32) {
    (grid.width() / TILE_SIZE, grid.height() / TILE_SIZE)
}

/// Pixel origins of every whole tile, in the given order
pub fn tile_origins(
    x_tiles: u32,
    y_tiles: u32,
    order: ScanOrder,
) -> impl Iterator<Item = (u32, u32)> {
    let origins: Box<dyn Iterator<Item = (u32, u32)>> = match order {
        ScanOrder::RowMajor => Box::new(
            (0..y_tiles)
                .cartesian_product(0..x_tiles)
                .map(|(ty, tx)| (tx, ty)),
        ),
        ScanOrder::ColumnMajor => Box::new((0..x_tiles).cartesian_product(0..y_tiles)),
    };
    origins.map(|(tx, ty)| (tx * TILE_SIZE, ty * TILE_SIZE))
}

/// Encode every whole tile of the grid
pub fn extract_tiles<'a, G: PixelGrid + ?Sized>(
    grid: &'a G,
    order: ScanOrder,
    ramp: Ramp,
) -> impl Iterator<Item = EncodedTile> + 'a {
    let (x_tiles, y_tiles) = tile_counts(grid);
    tile_origins(x_tiles, y_tiles, order).map(move |(x, y)| encode_tile(grid, x, y, ramp))
}

/// Linear sprite data: every tile, column-major, encoded with the sprite ramp
/// and without deduplication.
pub fn sprite_data<G: PixelGrid + ?Sized>(grid: &G) -> String {
    let tiles: Vec<EncodedTile> =
        extract_tiles(grid, ScanOrder::ColumnMajor, Ramp::Sprite).collect();
    join_tiles(&tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_row_major_origins() {
        let origins: Vec<_> = tile_origins(2, 2, ScanOrder::RowMajor).collect();
        assert_eq!(origins, vec![(0, 0), (8, 0), (0, 8), (8, 8)]);
    }

    #[test]
    fn test_column_major_origins() {
        let origins: Vec<_> = tile_origins(2, 2, ScanOrder::ColumnMajor).collect();
        assert_eq!(origins, vec![(0, 0), (0, 8), (8, 0), (8, 8)]);
    }

    #[test]
    fn test_partial_tiles_are_ignored() {
        let img = GrayImage::new(23, 9);
        assert_eq!(tile_counts(&img), (2, 1));
        assert_eq!(extract_tiles(&img, ScanOrder::RowMajor, Ramp::Tileset).count(), 2);

        let tiny = GrayImage::new(7, 7);
        assert_eq!(extract_tiles(&tiny, ScanOrder::RowMajor, Ramp::Tileset).count(), 0);
        assert_eq!(sprite_data(&tiny), "");
    }

    #[test]
    fn test_sprite_data_is_column_major_with_sprite_ramp() {
        // 2x2 tiles: only the bottom-left tile is white
        let mut img = GrayImage::from_pixel(16, 16, Luma([0]));
        for y in 8..16 {
            for x in 0..8 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        let data = sprite_data(&img);
        let black = "0xFF,".repeat(16);
        // white is index 1 on the sprite ramp: low plane set, high plane clear
        let white = "0xFF,0x00,".repeat(8);

        let expected = format!("{black}{white}{black}{black}");
        assert_eq!(data, expected[..expected.len() - 1]);
    }

    #[test]
    fn test_mid_gray_differs_between_ramps() {
        let img = GrayImage::from_pixel(8, 8, Luma([80]));
        let tileset: Vec<_> = extract_tiles(&img, ScanOrder::RowMajor, Ramp::Tileset).collect();
        let sprite: Vec<_> = extract_tiles(&img, ScanOrder::RowMajor, Ramp::Sprite).collect();

        assert_eq!(tileset[0].as_str(), "0x00,0xFF,".repeat(8));
        assert_eq!(sprite[0].as_str(), "0x00,".repeat(16));
    }
}

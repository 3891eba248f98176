//! Converts images to and from packed 2 bit per pixel 8x8 tile data.
//!
//! - tileset strings: the deduplicated tiles of an image
//! - sprite data: every tile, column-major, on the sprite color ramp
//! - tilemaps: indices of an image's tiles within a separate tileset image
//! - tileset images: several images' tiles merged and laid out 16 to a row

pub mod color;
pub mod convert;
pub mod extract;
pub mod grid;
pub mod lookup;
pub mod tile;
pub mod tilemap;
pub mod tileset;

pub use color::{color_from_index, quantize_sprite, quantize_tileset, ColorIndex, Ramp};
pub use convert::{
    load_pixels, load_pixels_from_memory, write_png, Config, ConversionError, TileConverter,
    TilesetOutput, TilesetReport,
};
pub use extract::{extract_tiles, sprite_data, ScanOrder};
pub use grid::PixelGrid;
pub use lookup::TileLookup;
pub use tile::{decode_bytes, encode_block, encode_tile, EncodedTile, TileBlock, TILE_SIZE};
pub use tilemap::{dec_hex, resolve, tilemap_string};
pub use tileset::{render, TILESET_COLUMNS};

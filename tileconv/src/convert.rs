//! Image conversion module for converting images to tiles, sprites, tilemaps and tilesets
//!
//! This module wires the tile codec to the image decode/encode collaborators
//! and exposes the four end-to-end conversions.

use std::fs::{self, File};
use std::io::{self, BufReader, Cursor};
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, ImageFormat};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extract::sprite_data;
use crate::grid::PixelGrid;
use crate::lookup::TileLookup;
use crate::tile::{EncodedTile, TILE_SIZE};
use crate::tilemap::{resolve, tilemap_string};
use crate::tileset::{render, TILESET_COLUMNS};

/// Errors that can occur during image conversion
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Tile is missing from tileset: {0}")]
    MissingTile(EncodedTile),

    #[error("Malformed tile data: {0}")]
    MalformedTile(String),

    #[error("No input images given")]
    NoInputs,

    #[error("No whole {0}x{0} tile found in the input images")]
    EmptyTileset(u32),

    #[error("Failed to read image: {0}")]
    ImageReadError(#[from] image::ImageError),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Configuration for the conversion process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Added to every tilemap index before formatting
    pub tilemap_offset: i64,
    /// Tiles per row of a rendered tileset image
    pub tileset_columns: u32,
    /// Decode independent input images in parallel
    pub parallel_decode: bool,
    /// Output JSON report of a merged tileset (optional)
    pub output_json: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tilemap_offset: 0,
            tileset_columns: TILESET_COLUMNS,
            parallel_decode: true,
            output_json: None,
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConversionError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// One tile of a merged tileset, as written to the JSON report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileEntry {
    pub index: usize,
    pub encoding: EncodedTile,
}

/// Structured description of a rendered tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetReport {
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<TileEntry>,
}

impl TilesetReport {
    fn new(lookup: &TileLookup, img: &GrayImage) -> Self {
        TilesetReport {
            width: img.width(),
            height: img.height(),
            tiles: lookup
                .iter()
                .map(|(index, tile)| TileEntry {
                    index,
                    encoding: tile.clone(),
                })
                .collect(),
        }
    }
}

/// Result of building a tileset image
#[derive(Debug, Clone)]
pub struct TilesetOutput {
    /// The merged lookup the image was rendered from
    pub lookup: TileLookup,
    /// PNG-encoded tileset image
    pub png: Vec<u8>,
}

/// Decode an image file into a pixel grid
pub fn load_pixels(path: &Path) -> Result<DynamicImage, ConversionError> {
    let img = image::open(path)?;
    log::info!(
        "read {} ({}x{})",
        path.display(),
        PixelGrid::width(&img),
        PixelGrid::height(&img)
    );
    warn_partial_tiles(&img);
    Ok(img)
}

/// Decode an in-memory image into a pixel grid
pub fn load_pixels_from_memory(bytes: &[u8]) -> Result<DynamicImage, ConversionError> {
    let img = image::load_from_memory(bytes)?;
    warn_partial_tiles(&img);
    Ok(img)
}

fn warn_partial_tiles<G: PixelGrid + ?Sized>(grid: &G) {
    let (width, height) = (grid.width(), grid.height());
    if width % TILE_SIZE != 0 || height % TILE_SIZE != 0 {
        log::warn!(
            "image size {}x{} is not a multiple of {}; trailing pixels are ignored",
            width,
            height,
            TILE_SIZE
        );
    }
}

/// Encode a grayscale image as PNG, optionally writing it to `out_file` as well
pub fn write_png(img: &GrayImage, out_file: Option<&Path>) -> Result<Vec<u8>, ConversionError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;

    if let Some(path) = out_file {
        fs::write(path, &buf)?;
        log::info!("wrote {} ({} bytes)", path.display(), buf.len());
    }
    Ok(buf)
}

/// Main struct for the conversion process
pub struct TileConverter {
    config: Config,
}

impl TileConverter {
    /// Create a new converter with the given configuration
    pub fn new(config: Config) -> Self {
        TileConverter { config }
    }

    /// Deduplicated tileset string of a single image
    pub fn image_to_tiles_string(&self, path: &Path) -> Result<String, ConversionError> {
        let img = load_pixels(path)?;
        let lookup = TileLookup::from_grid(&img);
        log::info!("{} unique tiles", lookup.len());
        Ok(lookup.tiles_string())
    }

    /// Linear sprite data of a single image
    pub fn image_to_sprite_string(&self, path: &Path) -> Result<String, ConversionError> {
        let img = load_pixels(path)?;
        Ok(sprite_data(&img))
    }

    /// Tilemap string of `path`, indexing into the tiles of `tileset_path`
    pub fn image_and_tileset_to_tilemap(
        &self,
        path: &Path,
        tileset_path: &Path,
    ) -> Result<String, ConversionError> {
        let (img, tileset) = if self.config.parallel_decode {
            rayon::join(|| load_pixels(path), || load_pixels(tileset_path))
        } else {
            (load_pixels(path), load_pixels(tileset_path))
        };
        let lookup = TileLookup::from_grid(&tileset?);

        let tilemap = resolve(&img?, &lookup, self.config.tilemap_offset)?;
        log::info!(
            "resolved {} tilemap entries against {} tiles",
            tilemap.len(),
            lookup.len()
        );
        Ok(tilemap_string(&tilemap))
    }

    /// Merge the tiles of every input image, in input order, into one tileset image.
    ///
    /// The PNG is returned and also written to `out_file` when given.
    pub fn images_to_tileset_image<P>(
        &self,
        paths: &[P],
        out_file: Option<&Path>,
    ) -> Result<TilesetOutput, ConversionError>
    where
        P: AsRef<Path> + Sync,
    {
        if paths.is_empty() {
            return Err(ConversionError::NoInputs);
        }

        let lookups = self.read_lookups(paths)?;
        let lookup = TileLookup::merge(&lookups);
        if lookup.is_empty() {
            return Err(ConversionError::EmptyTileset(TILE_SIZE));
        }
        log::info!(
            "merged {} images into {} unique tiles",
            lookups.len(),
            lookup.len()
        );

        let img = render(&lookup, self.config.tileset_columns)?;
        let png = write_png(&img, out_file)?;

        if let Some(json_path) = &self.config.output_json {
            self.write_json_file(json_path, &TilesetReport::new(&lookup, &img))?;
        }

        Ok(TilesetOutput { lookup, png })
    }

    /// Build one lookup per input, keeping input order even when decoding in parallel
    fn read_lookups<P>(&self, paths: &[P]) -> Result<Vec<TileLookup>, ConversionError>
    where
        P: AsRef<Path> + Sync,
    {
        let read = |path: &P| load_pixels(path.as_ref()).map(|img| TileLookup::from_grid(&img));

        if self.config.parallel_decode {
            paths.par_iter().map(read).collect()
        } else {
            paths.iter().map(read).collect()
        }
    }

    /// Write JSON output file
    fn write_json_file(&self, path: &Path, report: &TilesetReport) -> Result<(), ConversionError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, report)?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.tilemap_offset, 0);
        assert_eq!(config.tileset_columns, 16);
        assert!(config.parallel_decode);
        assert!(config.output_json.is_none());
    }

    #[test]
    fn test_partial_config_json() {
        let config: Config = serde_json::from_str(r#"{ "tilemap_offset": -4 }"#).unwrap();
        assert_eq!(config.tilemap_offset, -4);
        assert_eq!(config.tileset_columns, 16);
    }

    #[test]
    fn test_png_round_trip_in_memory() {
        let img = GrayImage::from_pixel(8, 8, Luma([200]));
        let png = write_png(&img, None).unwrap();
        let decoded = load_pixels_from_memory(&png).unwrap();

        assert_eq!(PixelGrid::width(&decoded), 8);
        assert_eq!(decoded.red(3, 3), 200);
    }

    #[test]
    fn test_no_inputs() {
        let converter = TileConverter::new(Config::default());
        let paths: [&Path; 0] = [];
        assert!(matches!(
            converter.images_to_tileset_image(&paths, None),
            Err(ConversionError::NoInputs)
        ));
    }

    #[test]
    fn test_missing_tile_message() {
        let tile = EncodedTile::try_from("0x00,".repeat(16).as_str()).unwrap();
        let err = ConversionError::MissingTile(tile);
        assert_eq!(
            err.to_string(),
            format!("Tile is missing from tileset: {}", "0x00,".repeat(16))
        );
    }
}

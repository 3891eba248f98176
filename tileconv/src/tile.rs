//! Tile codec: 8x8 blocks of color indices to and from the hex bitplane text format.
//!
//! An encoded tile is 8 rows of two `0xHH` tokens (low bitplane, then high
//! bitplane), every token followed by a comma:
//!
//! ```text
//! 0xFF,0xFF,0xFF,0xFF,0xFF,0xFF,0xFF,0xFF,0xFF,0xFF,0xFF,0xFF,0xFF,0xFF,0xFF,0xFF,
//! ```
//!
//! The text is the tile's identity: equal blocks always encode to equal
//! strings, so it doubles as the deduplication key.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{ColorIndex, Ramp};
use crate::convert::ConversionError;
use crate::grid::PixelGrid;

/// Width and height of a tile in pixels
pub const TILE_SIZE: u32 = 8;
/// Number of bytes in an encoded tile (two bitplanes per row)
pub const BYTES_PER_TILE: usize = 2 * TILE_SIZE as usize;
/// Separator written after every token
pub const TOKEN_SEPARATOR: char = ',';
/// Prefix of every hex token
const HEX_PREFIX: &str = "0x";
/// Length of one token including its separator, e.g. `0x3C,`
const TOKEN_LEN: usize = HEX_PREFIX.len() + 2 + 1;

/// Color indices of a single tile, indexed `[row][column]`
pub type TileBlock = [[ColorIndex; TILE_SIZE as usize]; TILE_SIZE as usize];

/// Canonical text form of a tile, always ending in a separator
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedTile(String);

impl EncodedTile {
    /// The encoding, including its trailing separator
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the 16 tokens back into raw bitplane bytes
    pub fn to_bytes(&self) -> Result<[u8; BYTES_PER_TILE], ConversionError> {
        parse_tile_bytes(&self.0)
    }

    /// Decode back into color indices
    pub fn decode(&self) -> Result<TileBlock, ConversionError> {
        Ok(decode_bytes(&self.to_bytes()?))
    }
}

impl fmt::Display for EncodedTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for EncodedTile {
    type Error = ConversionError;

    /// Accepts a single tile's tokens with or without the trailing separator
    /// and normalizes them to the canonical form.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(encode_bytes(&parse_tile_bytes(value)?))
    }
}

impl TryFrom<String> for EncodedTile {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        EncodedTile::try_from(value.as_str())
    }
}

impl From<EncodedTile> for String {
    fn from(tile: EncodedTile) -> Self {
        tile.0
    }
}

/// Read the 8x8 block at (origin_x, origin_y) and quantize it with `ramp`.
///
/// The caller guarantees the block lies inside the grid.
pub fn read_block<G: PixelGrid + ?Sized>(
    grid: &G,
    origin_x: u32,
    origin_y: u32,
    ramp: Ramp,
) -> TileBlock {
    let mut block = TileBlock::default();
    for (y, row) in block.iter_mut().enumerate() {
        for (x, index) in row.iter_mut().enumerate() {
            *index = ramp.quantize(grid.red(origin_x + x as u32, origin_y + y as u32));
        }
    }
    block
}

/// Encode the 8x8 block at (origin_x, origin_y) of `grid`
pub fn encode_tile<G: PixelGrid + ?Sized>(
    grid: &G,
    origin_x: u32,
    origin_y: u32,
    ramp: Ramp,
) -> EncodedTile {
    encode_block(&read_block(grid, origin_x, origin_y, ramp))
}

/// Pack a block into bitplane bytes and format them.
///
/// Bits are shifted in as x increases, so column 0 ends up in the most
/// significant bit of each row byte.
pub fn encode_block(block: &TileBlock) -> EncodedTile {
    let mut bytes = [0u8; BYTES_PER_TILE];
    for (row, planes) in block.iter().zip(bytes.chunks_exact_mut(2)) {
        let (low, high) = row.iter().fold((0u8, 0u8), |(low, high), index| {
            ((low << 1) | index.low_bit(), (high << 1) | index.high_bit())
        });
        planes[0] = low;
        planes[1] = high;
    }
    encode_bytes(&bytes)
}

/// Format raw bitplane bytes as an encoded tile
pub fn encode_bytes(bytes: &[u8; BYTES_PER_TILE]) -> EncodedTile {
    let mut out = String::with_capacity(BYTES_PER_TILE * TOKEN_LEN);
    for byte in bytes {
        out.push_str(HEX_PREFIX);
        out.push_str(&hex::encode_upper([*byte]));
        out.push(TOKEN_SEPARATOR);
    }
    EncodedTile(out)
}

/// Unpack bitplane bytes into color indices.
///
/// Bit j of a row byte is written to column 7 - j.
pub fn decode_bytes(bytes: &[u8; BYTES_PER_TILE]) -> TileBlock {
    let mut block = TileBlock::default();
    for (row, planes) in block.iter_mut().zip(bytes.chunks_exact(2)) {
        let (low, high) = (planes[0], planes[1]);
        for j in 0..TILE_SIZE as usize {
            let mask = 1u8 << j;
            row[TILE_SIZE as usize - 1 - j] =
                ColorIndex::from_planes(low & mask != 0, high & mask != 0);
        }
    }
    block
}

/// Concatenate encoded tiles, trimming the single separator at the very end
pub fn join_tiles<'a, I>(tiles: I) -> String
where
    I: IntoIterator<Item = &'a EncodedTile>,
{
    let mut out: String = tiles.into_iter().map(EncodedTile::as_str).collect();
    if out.ends_with(TOKEN_SEPARATOR) {
        out.pop();
    }
    out
}

/// Split a concatenated tile string (as produced by `join_tiles`) back into tiles
pub fn split_tiles(s: &str) -> Result<Vec<EncodedTile>, ConversionError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Vec::new());
    }

    let tokens: Vec<&str> = s
        .strip_suffix(TOKEN_SEPARATOR)
        .unwrap_or(s)
        .split(TOKEN_SEPARATOR)
        .collect();
    if tokens.len() % BYTES_PER_TILE != 0 {
        return Err(ConversionError::MalformedTile(format!(
            "expected a multiple of {} tokens, found {}",
            BYTES_PER_TILE,
            tokens.len()
        )));
    }

    tokens
        .chunks(BYTES_PER_TILE)
        .map(|chunk| {
            let mut bytes = [0u8; BYTES_PER_TILE];
            for (byte, token) in bytes.iter_mut().zip(chunk) {
                *byte = parse_token(token)?;
            }
            Ok(encode_bytes(&bytes))
        })
        .collect()
}

fn parse_tile_bytes(s: &str) -> Result<[u8; BYTES_PER_TILE], ConversionError> {
    let s = s.trim();
    let tokens: Vec<&str> = s
        .strip_suffix(TOKEN_SEPARATOR)
        .unwrap_or(s)
        .split(TOKEN_SEPARATOR)
        .collect();
    if tokens.len() != BYTES_PER_TILE {
        return Err(ConversionError::MalformedTile(format!(
            "expected {} tokens, found {} in {:?}",
            BYTES_PER_TILE,
            tokens.len(),
            s
        )));
    }

    let mut bytes = [0u8; BYTES_PER_TILE];
    for (byte, token) in bytes.iter_mut().zip(tokens) {
        *byte = parse_token(token)?;
    }
    Ok(bytes)
}

fn parse_token(token: &str) -> Result<u8, ConversionError> {
    let token = token.trim();
    let digits = token
        .strip_prefix(HEX_PREFIX)
        .or_else(|| token.strip_prefix("0X"))
        .ok_or_else(|| ConversionError::MalformedTile(format!("missing 0x prefix: {token:?}")))?;

    let mut byte = [0u8; 1];
    hex::decode_to_slice(digits, &mut byte)
        .map_err(|e| ConversionError::MalformedTile(format!("bad hex token {token:?}: {e}")))?;
    Ok(byte[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn block_with(f: impl Fn(usize, usize) -> u8) -> TileBlock {
        let mut block = TileBlock::default();
        for (y, row) in block.iter_mut().enumerate() {
            for (x, index) in row.iter_mut().enumerate() {
                *index = ColorIndex::new(f(x, y));
            }
        }
        block
    }

    #[test]
    fn test_solid_black_tile() {
        let img = GrayImage::from_pixel(8, 8, Luma([0]));
        let tile = encode_tile(&img, 0, 0, Ramp::Tileset);
        assert_eq!(tile.as_str(), "0xFF,".repeat(16));
    }

    #[test]
    fn test_solid_white_tile() {
        let img = GrayImage::from_pixel(8, 8, Luma([255]));
        let tile = encode_tile(&img, 0, 0, Ramp::Tileset);
        assert_eq!(tile.as_str(), "0x00,".repeat(16));
    }

    #[test]
    fn test_column_zero_is_most_significant_bit() {
        // index 1 only sets the low plane, at column 0 of row 0
        let block = block_with(|x, y| if x == 0 && y == 0 { 1 } else { 0 });
        let bytes = encode_block(&block).to_bytes().unwrap();
        assert_eq!(bytes[0], 0x80);
        assert_eq!(bytes[1], 0x00);
        assert!(bytes[2..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_planes_are_low_then_high() {
        // index 2 only sets the high plane
        let block = block_with(|x, _| if x == 7 { 2 } else { 0 });
        let tile = encode_block(&block);
        assert!(tile.as_str().starts_with("0x00,0x01,0x00,0x01,"));
    }

    #[test]
    fn test_tokens_are_zero_padded_uppercase() {
        let block = block_with(|x, _| if x >= 4 { 3 } else { 0 });
        assert_eq!(encode_block(&block).as_str(), "0x0F,".repeat(16));
    }

    #[test]
    fn test_decode_writes_bit_j_to_column_7_minus_j() {
        let mut bytes = [0u8; BYTES_PER_TILE];
        bytes[0] = 0x01; // low plane, bit 0
        bytes[3] = 0x80; // high plane of row 1, bit 7
        let block = decode_bytes(&bytes);

        assert_eq!(block[0][7].value(), 1);
        assert_eq!(block[1][0].value(), 2);
        let set = block.iter().flatten().filter(|i| i.value() != 0).count();
        assert_eq!(set, 2);
    }

    #[test]
    fn test_round_trip_restores_block() {
        let block = block_with(|x, y| ((x * 3 + y * 5) % 4) as u8);
        let decoded = encode_block(&block).decode().unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn test_round_trip_single_corner_pixel() {
        let block = block_with(|x, y| if x == 0 && y == 0 { 3 } else { 0 });
        let decoded = encode_block(&block).decode().unwrap();
        assert_eq!(decoded[0][0].value(), 3);
        assert_eq!(decoded[0][7].value(), 0);
    }

    #[test]
    fn test_encode_reads_from_origin() {
        let mut img = GrayImage::from_pixel(16, 8, Luma([255]));
        img.put_pixel(8, 0, Luma([0]));
        let left = encode_tile(&img, 0, 0, Ramp::Tileset);
        let right = encode_tile(&img, 8, 0, Ramp::Tileset);

        assert_eq!(left.as_str(), "0x00,".repeat(16));
        assert!(right.as_str().starts_with("0x80,0x80,0x00,"));
    }

    #[test]
    fn test_join_trims_one_separator() {
        let a = encode_block(&block_with(|_, _| 3));
        let b = encode_block(&block_with(|_, _| 0));
        let joined = join_tiles([&a, &b]);

        assert!(joined.starts_with("0xFF,"));
        assert!(joined.ends_with("0x00"));
        assert_eq!(joined.len(), a.as_str().len() + b.as_str().len() - 1);
        assert_eq!(join_tiles(std::iter::empty()), "");
    }

    #[test]
    fn test_split_inverts_join() {
        let a = encode_block(&block_with(|x, _| (x % 4) as u8));
        let b = encode_block(&block_with(|_, y| (y % 4) as u8));
        let joined = join_tiles([&a, &b]);
        assert_eq!(split_tiles(&joined).unwrap(), vec![a, b]);
        assert!(split_tiles("").unwrap().is_empty());
    }

    #[test]
    fn test_try_from_normalizes() {
        let tile = EncodedTile::try_from("0xff,0xff,0xff,0xff,0xff,0xff,0xff,0xff,0xff,0xff,0xff,0xff,0xff,0xff,0xff,0xff").unwrap();
        assert_eq!(tile.as_str(), "0xFF,".repeat(16));
    }

    #[test]
    fn test_deserialize_normalizes() {
        let lower = format!("\"{}\"", "0xff,".repeat(16));
        let tile: EncodedTile = serde_json::from_str(&lower).unwrap();
        assert_eq!(tile.as_str(), "0xFF,".repeat(16));
        assert_eq!(serde_json::to_string(&tile).unwrap(), format!("\"{}\"", tile));

        assert!(serde_json::from_str::<EncodedTile>(r#""0xFF,0xZZ""#).is_err());
    }

    #[test]
    fn test_malformed_tiles_are_rejected() {
        assert!(matches!(
            EncodedTile::try_from("0xFF,0xFF"),
            Err(ConversionError::MalformedTile(_))
        ));
        let bad = "0xZZ,".repeat(16);
        assert!(matches!(
            EncodedTile::try_from(bad.as_str()),
            Err(ConversionError::MalformedTile(_))
        ));
        let unprefixed = "FF,".repeat(16);
        assert!(EncodedTile::try_from(unprefixed.as_str()).is_err());
        assert!(split_tiles("0xFF,0xFF,0xFF").is_err());
    }
}

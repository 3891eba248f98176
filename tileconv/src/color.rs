//! Color types and utilities for 2 bit per pixel tile data.
//!
//! This module contains color-related functionality including:
//! - `ColorIndex`, the quantized 2 bit color of a single pixel
//! - `Ramp`, the two sample-to-index quantization ramps
//! - `color_from_index`, the sample written back when rendering a tileset

/// Number of bits per color index in tile data
pub const BITS_PER_COLOR: usize = 2;
/// Number of distinct color indices
pub const NUM_COLORS: u8 = 1 << BITS_PER_COLOR;

/// Sample value below which a pixel is considered black
const BLACK_THRESHOLD: u8 = 40;
/// Sample value below which a pixel is considered dark gray
const DARK_THRESHOLD: u8 = 120;
/// Sample value below which a pixel is considered light gray
const LIGHT_THRESHOLD: u8 = 220;

/// A quantized color index in the range 0..=3
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ColorIndex(u8);

impl ColorIndex {
    /// Create a color index, keeping only the low two bits
    pub const fn new(value: u8) -> Self {
        ColorIndex(value & (NUM_COLORS - 1))
    }

    /// Build a color index from its two bitplane bits
    pub const fn from_planes(low: bool, high: bool) -> Self {
        ColorIndex(low as u8 | (high as u8) << 1)
    }

    /// The raw index value
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Bit 0, which lands in the low bitplane
    pub const fn low_bit(self) -> u8 {
        self.0 & 1
    }

    /// Bit 1, which lands in the high bitplane
    pub const fn high_bit(self) -> u8 {
        (self.0 >> 1) & 1
    }
}

impl From<ColorIndex> for u8 {
    fn from(index: ColorIndex) -> Self {
        index.0
    }
}

/// Quantization ramp used to map a raw sample to a color index.
///
/// The sprite ramp is not monotonic with brightness. It is the ramp the
/// sprite hardware expects and must not be re-derived from the tileset ramp.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Ramp {
    /// Darkest samples map to the highest index
    #[default]
    Tileset,
    /// Alternate ramp used for linear sprite data
    Sprite,
}

impl Ramp {
    /// Quantize a raw 0..=255 sample to a color index
    pub fn quantize(self, sample: u8) -> ColorIndex {
        match self {
            Ramp::Tileset => quantize_tileset(sample),
            Ramp::Sprite => quantize_sprite(sample),
        }
    }
}

/// Tileset and tilemap ramp: [0,40) -> 3, [40,120) -> 2, [120,220) -> 1, [220,256) -> 0
pub fn quantize_tileset(sample: u8) -> ColorIndex {
    ColorIndex::new(match sample {
        s if s < BLACK_THRESHOLD => 3,
        s if s < DARK_THRESHOLD => 2,
        s if s < LIGHT_THRESHOLD => 1,
        _ => 0,
    })
}

/// Sprite ramp: [0,40) -> 3, [40,120) -> 0, [120,220) -> 2, [220,256) -> 1
pub fn quantize_sprite(sample: u8) -> ColorIndex {
    ColorIndex::new(match sample {
        s if s < BLACK_THRESHOLD => 3,
        s if s < DARK_THRESHOLD => 0,
        s if s < LIGHT_THRESHOLD => 2,
        _ => 1,
    })
}

/// Sample value written for a color index when rendering a tileset image.
///
/// This is not the inverse of either ramp. A sample of 180 quantizes to 1 and
/// renders back as 200, so only the index survives a render/extract cycle.
pub fn color_from_index(index: ColorIndex) -> u8 {
    match index.value() {
        0 => 255,
        1 => 200,
        2 => 100,
        _ => 0,
    }
}

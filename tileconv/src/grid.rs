//! The pixel grid abstraction consumed by the tile codec.
//!
//! Conversions only ever read channel 0 of each pixel, so anything that can
//! report its dimensions and hand out a sample per channel can be converted.

use std::ops::Deref;

use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel};

/// Channel read by every conversion (red, or luma for grayscale images)
pub const SAMPLE_CHANNEL: usize = 0;

/// A borrowed, read-only 2D grid of 8 bit samples
pub trait PixelGrid {
    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Sample at (x, y) for the given channel. Channels the pixel does not
    /// have read as 0.
    fn sample(&self, x: u32, y: u32, channel: usize) -> u8;

    /// The channel 0 sample used for quantization
    fn red(&self, x: u32, y: u32) -> u8 {
        self.sample(x, y, SAMPLE_CHANNEL)
    }
}

impl<G: PixelGrid + ?Sized> PixelGrid for &G {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn sample(&self, x: u32, y: u32, channel: usize) -> u8 {
        (**self).sample(x, y, channel)
    }
}

impl<P, C> PixelGrid for ImageBuffer<P, C>
where
    P: Pixel<Subpixel = u8>,
    C: Deref<Target = [u8]>,
{
    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }

    fn sample(&self, x: u32, y: u32, channel: usize) -> u8 {
        self.get_pixel(x, y)
            .channels()
            .get(channel)
            .copied()
            .unwrap_or(0)
    }
}

impl PixelGrid for DynamicImage {
    fn width(&self) -> u32 {
        GenericImageView::dimensions(self).0
    }

    fn height(&self) -> u32 {
        GenericImageView::dimensions(self).1
    }

    fn sample(&self, x: u32, y: u32, channel: usize) -> u8 {
        GenericImageView::get_pixel(self, x, y)
            .channels()
            .get(channel)
            .copied()
            .unwrap_or(0)
    }
}

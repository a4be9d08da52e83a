// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Getting buffers in and out of the `image` crate, and a couple of
//! ways of looking at what the carver sees.

use crate::buffer::{ImportanceBuffer, PixelBuffer};
use crate::error::CarveError;
use image::{GrayImage, ImageBuffer, Luma, RgbImage};

impl PixelBuffer<u8> {
    /// Take over the samples of a decoded RGB image.
    pub fn from_rgb_image(image: RgbImage) -> Result<Self, CarveError> {
        let (width, height) = image.dimensions();
        PixelBuffer::from_raw(width, height, 3, image.into_raw())
    }

    pub fn into_rgb_image(self) -> Result<RgbImage, CarveError> {
        self.into_image(3)
    }

    pub fn into_gray_image(self) -> Result<GrayImage, CarveError> {
        self.into_image(1)
    }

    fn into_image<P>(self, channels: u32) -> Result<ImageBuffer<P, Vec<u8>>, CarveError>
    where
        P: image::Pixel<Subpixel = u8>,
    {
        if self.channels() != channels {
            return Err(CarveError::ChannelMismatch {
                expected: channels,
                actual: self.channels(),
            });
        }
        let (width, height) = self.dimensions();
        let expected = width as usize * height as usize * channels as usize;
        let actual = self.as_slice().len();
        ImageBuffer::from_raw(width, height, self.into_raw())
            .ok_or(CarveError::BufferLength { expected, actual })
    }
}

/// Stretch an importance plane over the full 0..=255 range so the
/// structure is visible; raw gradient sums are quite dark.
pub fn importance_to_image(importance: &ImportanceBuffer) -> GrayImage {
    let (width, height) = importance.dimensions();
    let factor = u32::from(importance.as_slice().iter().copied().max().unwrap_or(0)).max(1);
    ImageBuffer::from_fn(width, height, |x, y| {
        let c = u32::from(importance[(x, y)]) * 255 / factor;
        Luma([num_traits::cast::<u32, u8>(c).unwrap_or(u8::MAX)])
    })
}

/// Paint a seam into a single-channel plane.  Seam columns past the
/// plane's right edge are skipped, so a seam can be drawn on a plane it
/// has already been removed from.
pub fn fill_seam(plane: &mut PixelBuffer<u8>, seam: &[u32], value: u8) {
    let (width, height) = plane.dimensions();
    for (y, &x) in seam.iter().enumerate().take(height as usize) {
        if x < width {
            plane[(x, y as u32)] = value;
        }
    }
}

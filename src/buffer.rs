// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Dense row-major sample buffers.
//!
//! The carver works on three kinds of planes: the RGB image itself,
//! single-channel intensity and importance planes, and a wide
//! cumulative-cost plane.  They are all the same shape of thing, a
//! width, a height, a channel count, and a flat vector of samples, so
//! they share one type.

use crate::error::CarveError;
use std::mem;
use std::ops::{Index, IndexMut};

/// An addressable two-dimensional field of `channels` samples per
/// pixel, stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer<P: Default + Copy> {
    width: u32,
    height: u32,
    channels: u32,
    data: Vec<P>,
}

/// Accumulated gradient magnitude, one sample per pixel.
pub type ImportanceBuffer = PixelBuffer<u8>;

/// Minimal path sum to the bottom row, one sample per pixel.
pub type CumulativeBuffer = PixelBuffer<u32>;

// The one place sample counts are computed; overflow is reported as an
// allocation that could never succeed.
fn sample_count<P>(width: u32, height: u32, channels: u32) -> Result<usize, CarveError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels as usize))
        .filter(|n| n.checked_mul(mem::size_of::<P>()).is_some())
        .ok_or(CarveError::AllocationFailure { bytes: usize::MAX })
}

impl<P: Default + Copy> PixelBuffer<P> {
    /// Allocate a zeroed (well, defaulted) buffer.  Allocation failure
    /// is reported rather than aborting the process.
    pub fn new(width: u32, height: u32, channels: u32) -> Result<Self, CarveError> {
        let len = sample_count::<P>(width, height, channels)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| CarveError::AllocationFailure {
                bytes: len * mem::size_of::<P>(),
            })?;
        data.resize(len, P::default());
        Ok(PixelBuffer {
            width,
            height,
            channels,
            data,
        })
    }

    /// Wrap an existing sample vector.
    pub fn from_raw(width: u32, height: u32, channels: u32, data: Vec<P>) -> Result<Self, CarveError> {
        let expected = sample_count::<P>(width, height, channels)?;
        if data.len() != expected {
            return Err(CarveError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(PixelBuffer {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Samples in one row.
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<P> {
        self.data
    }

    /// The samples of row `y`.
    pub fn row(&self, y: u32) -> &[P] {
        let len = self.row_len();
        let start = y as usize * len;
        &self.data[start..start + len]
    }

    /// The samples of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[P] {
        let start = self.get_index(x, y);
        &self.data[start..start + self.channels as usize]
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [P] {
        &mut self.data
    }

    // Seam removal compacts the samples itself and then tells the
    // buffer how wide it has become.
    pub(crate) fn shrink_to_width(&mut self, width: u32) {
        debug_assert!(width <= self.width);
        self.width = width;
        let len = self.row_len() * self.height as usize;
        self.data.truncate(len);
    }

    // Re-shape to `width` × `height` and default every sample.  The
    // carver only ever shrinks buffers, so this reuses the allocation.
    pub(crate) fn reset(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        let len = self.row_len() * height as usize;
        self.data.clear();
        self.data.resize(len, P::default());
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.
    fn get_index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * self.channels as usize
    }
}

impl<P: Default + Copy> Index<(u32, u32)> for PixelBuffer<P> {
    type Output = P;

    /// The first sample of the pixel at `(x, y)`; for single-channel
    /// planes, the value.
    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl<P: Default + Copy> IndexMut<(u32, u32)> for PixelBuffer<P> {
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}

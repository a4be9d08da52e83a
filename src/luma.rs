// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! RGB to intensity.
//!
//! The gradient kernels run over a single channel, so the first step of
//! every carve is to collapse the RGB image into luma using the
//! ITU-R BT.601 weights.

use crate::buffer::PixelBuffer;
use crate::error::CarveError;
use crate::parallel::{for_each_band_with, worker_count};
use num_traits::clamp;

const RED: f32 = 0.2989;
const GREEN: f32 = 0.5870;
const BLUE: f32 = 0.1140;

// Rows per pass below which threads cost more than they save.
const MIN_PARALLEL_ROWS: usize = 64;

/// (R, G, B) -> Luma, rounded to the nearest 8-bit value.
#[inline]
pub fn luma_of(r: u8, g: u8, b: u8) -> u8 {
    let grey = RED * f32::from(r) + GREEN * f32::from(g) + BLUE * f32::from(b);
    clamp(grey.round(), 0.0, 255.0) as u8
}

/// Convert an RGB buffer into a freshly allocated intensity buffer.
pub fn to_luma(rgb: &PixelBuffer<u8>) -> Result<PixelBuffer<u8>, CarveError> {
    let mut out = PixelBuffer::new(rgb.width(), rgb.height(), 1)?;
    to_luma_into(rgb, &mut out)?;
    Ok(out)
}

/// Convert an RGB buffer into `out`, which is re-shaped to match.
/// `out` must have been allocated at least as large as `rgb`.
pub fn to_luma_into(rgb: &PixelBuffer<u8>, out: &mut PixelBuffer<u8>) -> Result<(), CarveError> {
    to_luma_with(worker_count(), rgb, out)
}

pub(crate) fn to_luma_with(
    workers: usize,
    rgb: &PixelBuffer<u8>,
    out: &mut PixelBuffer<u8>,
) -> Result<(), CarveError> {
    if rgb.channels() != 3 {
        return Err(CarveError::ChannelMismatch {
            expected: 3,
            actual: rgb.channels(),
        });
    }
    if out.channels() != 1 {
        return Err(CarveError::ChannelMismatch {
            expected: 1,
            actual: out.channels(),
        });
    }

    let (width, height) = rgb.dimensions();
    out.reset(width, height);
    if width == 0 {
        return Ok(());
    }
    let width = width as usize;
    for_each_band_with(workers, out.samples_mut(), width, MIN_PARALLEL_ROWS, |first_row, band| {
        for (i, row) in band.chunks_mut(width).enumerate() {
            let source = rgb.row((first_row + i) as u32);
            for (grey, px) in row.iter_mut().zip(source.chunks(3)) {
                *grey = luma_of(px[0], px[1], px[2]);
            }
        }
    });
    Ok(())
}

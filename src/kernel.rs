// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the importance of every pixel in an intensity plane.
//!
//! Importance is gradient magnitude, estimated by running a pair of
//! directional 3×3 kernels over the plane.  Each kernel pass *adds* its
//! absolute response to an accumulator and then multiplies the cell by
//! the kernel's scale, so the second pass scales the first pass's
//! contribution too:
//!
//! ```text
//! acc = |Gx| · 1.0
//! acc = (|Gy| + acc) · 0.5
//! ```
//!
//! The order of the two passes therefore matters.  Neighbors that fall
//! outside the image are left out of the sum entirely.

use crate::buffer::{ImportanceBuffer, PixelBuffer};
use crate::error::CarveError;
use crate::parallel::{for_each_band_with, worker_count};
use itertools::iproduct;

// Rows per pass below which threads cost more than they save.
const MIN_PARALLEL_ROWS: usize = 32;

/// A 3×3 convolution kernel and the scale applied to the accumulator
/// after it has been added in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    /// Indexed `[row][column]`, centered on the pixel.
    pub weights: [[f32; 3]; 3],
    pub scale: f32,
}

/// Horizontal gradient: Sobel, divided by eight.
pub const SOBEL_X: Kernel = Kernel {
    weights: [
        [-0.125, 0.0, 0.125],
        [-0.25, 0.0, 0.25],
        [-0.125, 0.0, 0.125],
    ],
    scale: 1.0,
};

/// Vertical gradient: Sobel, divided by eight, halving the total.
pub const SOBEL_Y: Kernel = Kernel {
    weights: [
        [-0.125, -0.25, -0.125],
        [0.0, 0.0, 0.0],
        [0.125, 0.25, 0.125],
    ],
    scale: 0.5,
};

/// The kernels an importance estimate runs, in order.
pub const DIRECTIONAL_PAIR: [Kernel; 2] = [SOBEL_X, SOBEL_Y];

impl Kernel {
    /// The absolute weighted sum of the neighborhood of `(x, y)`.
    #[inline]
    fn response(&self, image: &PixelBuffer<u8>, x: usize, y: usize) -> f32 {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let samples = image.as_slice();
        let mut sum = 0.0f32;
        for (j, i) in iproduct!(0..3, 0..3) {
            // (x + i - 1, y + j - 1) must land inside the image.
            if x + i == 0 || x + i > width || y + j == 0 || y + j > height {
                continue;
            }
            sum += f32::from(samples[(y + j - 1) * width + (x + i - 1)]) * self.weights[j][i];
        }
        sum.abs()
    }
}

/// Add the kernel's response to every cell of `acc`, then scale the
/// cell.  `acc` must have the same shape as `image`.
pub fn apply_kernel(
    image: &PixelBuffer<u8>,
    acc: &mut ImportanceBuffer,
    kernel: &Kernel,
) -> Result<(), CarveError> {
    apply_kernel_with(worker_count(), image, acc, kernel)
}

pub(crate) fn apply_kernel_with(
    workers: usize,
    image: &PixelBuffer<u8>,
    acc: &mut ImportanceBuffer,
    kernel: &Kernel,
) -> Result<(), CarveError> {
    if image.channels() != 1 || acc.channels() != 1 {
        return Err(CarveError::ChannelMismatch {
            expected: 1,
            actual: cq!(image.channels() != 1, image.channels(), acc.channels()),
        });
    }
    if image.dimensions() != acc.dimensions() {
        return Err(CarveError::DimensionMismatch {
            expected_width: image.width(),
            expected_height: image.height(),
            width: acc.width(),
            height: acc.height(),
        });
    }

    let width = image.width() as usize;
    if width == 0 {
        return Ok(());
    }
    for_each_band_with(workers, acc.samples_mut(), width, MIN_PARALLEL_ROWS, |first_row, band| {
        for (i, row) in band.chunks_mut(width).enumerate() {
            let y = first_row + i;
            for (x, cell) in row.iter_mut().enumerate() {
                let sum = kernel.response(image, x, y);
                // Truncating, saturating store, as for any 8-bit plane.
                *cell = ((sum + f32::from(*cell)) * kernel.scale) as u8;
            }
        }
    });
    Ok(())
}

/// Estimate the importance of every pixel: zero the accumulator, then
/// apply each kernel in turn.  `importance` is re-shaped to match
/// `intensity`.
pub fn estimate_importance(
    intensity: &PixelBuffer<u8>,
    importance: &mut ImportanceBuffer,
    kernels: &[Kernel],
) -> Result<(), CarveError> {
    estimate_importance_with(worker_count(), intensity, importance, kernels)
}

pub(crate) fn estimate_importance_with(
    workers: usize,
    intensity: &PixelBuffer<u8>,
    importance: &mut ImportanceBuffer,
    kernels: &[Kernel],
) -> Result<(), CarveError> {
    importance.reset(intensity.width(), intensity.height());
    for kernel in kernels {
        apply_kernel_with(workers, intensity, importance, kernel)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(width: u32, height: u32, value: u8) -> PixelBuffer<u8> {
        PixelBuffer::from_raw(width, height, 1, vec![value; (width * height) as usize]).unwrap()
    }

    #[test]
    fn flat_image_has_no_interior_gradient() {
        let image = flat(3, 3, 100);
        let mut acc = PixelBuffer::new(3, 3, 1).unwrap();
        estimate_importance(&image, &mut acc, &DIRECTIONAL_PAIR).unwrap();
        // The borders see a one-sided neighborhood.
        assert_eq!(acc.as_slice(), &[37, 25, 37, 25, 0, 25, 37, 25, 37]);
    }

    #[test]
    fn second_pass_scales_the_first() {
        // A vertical edge: Gx only.
        let image = PixelBuffer::from_raw(3, 3, 1, vec![0, 0, 200, 0, 0, 200, 0, 0, 200]).unwrap();
        let mut acc = PixelBuffer::new(3, 3, 1).unwrap();
        apply_kernel(&image, &mut acc, &SOBEL_X).unwrap();
        assert_eq!(acc[(1, 1)], 100);
        apply_kernel(&image, &mut acc, &SOBEL_Y).unwrap();
        assert_eq!(acc[(1, 1)], 50);
    }

    #[test]
    fn estimate_zeroes_the_accumulator() {
        let image = flat(3, 3, 100);
        let mut acc = flat(3, 3, 255);
        estimate_importance(&image, &mut acc, &DIRECTIONAL_PAIR).unwrap();
        assert_eq!(acc[(1, 1)], 0);
    }

    #[test]
    fn banded_estimate_matches_single_band() {
        let (width, height) = (37u32, 150u32);
        let data: Vec<u8> = (0..width * height).map(|i| (i * 97 % 256) as u8).collect();
        let image = PixelBuffer::from_raw(width, height, 1, data).unwrap();
        let mut single = PixelBuffer::new(width, height, 1).unwrap();
        let mut banded = PixelBuffer::new(width, height, 1).unwrap();
        estimate_importance_with(1, &image, &mut single, &DIRECTIONAL_PAIR).unwrap();
        estimate_importance_with(4, &image, &mut banded, &DIRECTIONAL_PAIR).unwrap();
        assert!(single.as_slice().iter().any(|v| *v != 0));
        assert_eq!(banded, single);
    }

    #[test]
    fn mismatched_accumulator_is_refused() {
        let image = flat(4, 3, 0);
        let mut acc = flat(3, 3, 0);
        assert_eq!(
            apply_kernel(&image, &mut acc, &SOBEL_X).unwrap_err(),
            CarveError::DimensionMismatch {
                expected_width: 4,
                expected_height: 3,
                width: 3,
                height: 3
            }
        );
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The ways a carve can fail.
//!
//! Every one of these is fatal to the call that raised it.  Nothing
//! here is transient, and the carver checks its inputs before it
//! touches any buffer the caller can see.

use failure::Fail;

/// Everything that can go wrong while carving an image.
#[derive(Debug, Fail, Clone, PartialEq, Eq)]
pub enum CarveError {
    /// The image is too small for a 3×3 neighborhood.
    #[fail(display = "image of {}x{} is too small; both sides must be at least 3", width, height)]
    InvalidDimensions { width: u32, height: u32 },

    /// More seams were requested than the image has columns to give.
    #[fail(
        display = "cannot remove {} seams from an image {} pixels wide; at most width - 1 are possible",
        iterations, width
    )]
    IterationCountTooLarge { iterations: u32, width: u32 },

    /// A buffer could not be allocated.
    #[fail(display = "could not allocate a buffer of {} bytes", bytes)]
    AllocationFailure { bytes: usize },

    /// A raw sample vector does not have width × height × channels entries.
    #[fail(display = "expected {} samples in buffer, got {}", expected, actual)]
    BufferLength { expected: usize, actual: usize },

    /// The buffer has the wrong number of samples per pixel.
    #[fail(display = "expected {} channels per pixel, got {}", expected, actual)]
    ChannelMismatch { expected: u32, actual: u32 },

    /// Two buffers that must share a shape do not.
    #[fail(
        display = "expected a {}x{} buffer, got {}x{}",
        expected_width, expected_height, width, height
    )]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    /// The seam does not have one entry per row.
    #[fail(display = "seam has {} entries for an image {} rows tall", actual, expected)]
    SeamLength { expected: usize, actual: usize },

    /// A seam entry points outside the buffer.
    #[fail(display = "seam column {} on row {} is outside a buffer {} wide", column, row, width)]
    InvalidSeam { row: u32, column: u32, width: u32 },
}

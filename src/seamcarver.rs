// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - The main routine
//!
//! The carver owns an RGB image and the single-channel planes derived
//! from it, and narrows all of them together, one seam at a time.

use crate::buffer::{CumulativeBuffer, ImportanceBuffer, PixelBuffer};
use crate::energy::{calculate_cumulative, energy_to_vertical_seam, Seam};
use crate::error::CarveError;
use crate::kernel::{estimate_importance, Kernel, DIRECTIONAL_PAIR};
use crate::luma::{to_luma, to_luma_into};
use crate::parallel::worker_count;
use log::{debug, info, trace};

/// Smallest width or height the kernels and the cumulative map accept.
pub const MIN_DIMENSION: u32 = 3;

// How often to report progress.
const PROGRESS_INTERVAL: u32 = 50;

/// Remove one column per row from `buffer`, the column named by `seam`
/// for that row.  Everything right of the seam shifts left by one
/// pixel.  The same seam can be applied to buffers with any number of
/// channels, so the RGB image and its planes stay aligned.
///
/// The work is done in place: row `y` of the narrower buffer starts at
/// or before row `y` of the wider one and ends before row `y + 1`, so
/// no row is overwritten before it has been read.
pub fn remove_vertical_seam<P: Default + Copy>(
    buffer: &mut PixelBuffer<P>,
    seam: &[u32],
) -> Result<(), CarveError> {
    let (width, height) = buffer.dimensions();
    if width < 2 {
        return Err(CarveError::InvalidDimensions { width, height });
    }
    if seam.len() != height as usize {
        return Err(CarveError::SeamLength {
            expected: height as usize,
            actual: seam.len(),
        });
    }
    if let Some((row, &column)) = seam.iter().enumerate().find(|(_, x)| **x >= width) {
        return Err(CarveError::InvalidSeam {
            row: row as u32,
            column,
            width,
        });
    }

    let channels = buffer.channels() as usize;
    let old_row = buffer.row_len();
    let new_row = old_row - channels;
    let samples = buffer.samples_mut();
    for (y, &x) in seam.iter().enumerate() {
        let (src, dst) = (y * old_row, y * new_row);
        let cut = x as usize * channels;
        samples.copy_within(src..src + cut, dst);
        samples.copy_within(src + cut + channels..src + old_row, dst + cut);
    }
    buffer.shrink_to_width(width - 1);
    Ok(())
}

/// Whether importance is re-estimated for every seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Re-estimate importance from the narrowed intensity plane before
    /// every seam.
    Exact,
    /// Estimate importance once and carve the same plane down with the
    /// image.  Faster, but the plane grows stale and artifacts appear.
    Greedy,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Exact
    }
}

/// What to carve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarveOptions {
    pub iterations: u32,
    pub mode: Mode,
}

/// The narrowed image, and an intensity plane of the same shape for
/// anyone who wants a greyscale preview.
#[derive(Debug, Clone)]
pub struct Carved {
    pub rgb: PixelBuffer<u8>,
    pub intensity: PixelBuffer<u8>,
}

/// A struct for holding the image being carved, and every plane that
/// has to be carved along with it.
#[derive(Debug)]
pub struct SeamCarver {
    rgb: PixelBuffer<u8>,
    intensity: PixelBuffer<u8>,
    importance: ImportanceBuffer,
    cumulative: CumulativeBuffer,
    kernels: [Kernel; 2],
    mode: Mode,
}

impl SeamCarver {
    /// Take ownership of an RGB image and estimate its importance with
    /// the Sobel pair.
    pub fn new(rgb: PixelBuffer<u8>, mode: Mode) -> Result<Self, CarveError> {
        Self::with_kernels(rgb, mode, DIRECTIONAL_PAIR)
    }

    /// As `new`, with a different pair of directional kernels.
    pub fn with_kernels(rgb: PixelBuffer<u8>, mode: Mode, kernels: [Kernel; 2]) -> Result<Self, CarveError> {
        let (width, height) = rgb.dimensions();
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(CarveError::InvalidDimensions { width, height });
        }
        if rgb.channels() != 3 {
            return Err(CarveError::ChannelMismatch {
                expected: 3,
                actual: rgb.channels(),
            });
        }

        let intensity = to_luma(&rgb)?;
        let mut importance = ImportanceBuffer::new(width, height, 1)?;
        let cumulative = CumulativeBuffer::new(width, height, 1)?;
        estimate_importance(&intensity, &mut importance, &kernels)?;

        Ok(SeamCarver {
            rgb,
            intensity,
            importance,
            cumulative,
            kernels,
            mode,
        })
    }

    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    pub fn height(&self) -> u32 {
        self.rgb.height()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The image as carved so far.
    pub fn image(&self) -> &PixelBuffer<u8> {
        &self.rgb
    }

    /// The importance plane the last seam was chosen from (or, before
    /// any carving, the initial estimate).
    pub fn importance(&self) -> &ImportanceBuffer {
        &self.importance
    }

    /// The seam the next carve would remove.  In exact mode this
    /// refreshes the importance plane first.
    pub fn next_seam(&mut self) -> Result<Seam, CarveError> {
        if self.mode == Mode::Exact {
            estimate_importance(&self.intensity, &mut self.importance, &self.kernels)?;
        }
        calculate_cumulative(&self.importance, &mut self.cumulative);
        Ok(energy_to_vertical_seam(&self.cumulative))
    }

    /// Remove one seam from the image and whichever plane carries over
    /// to the next seam, and return it.
    pub fn carve_once(&mut self) -> Result<Seam, CarveError> {
        let width = self.width();
        if width < 2 {
            return Err(CarveError::IterationCountTooLarge { iterations: 1, width });
        }
        let seam = self.next_seam()?;
        trace!("seam {:?}", seam);

        // Greedy mode reuses importance; exact mode rebuilds it from
        // intensity.
        match self.mode {
            Mode::Greedy => remove_vertical_seam(&mut self.importance, &seam)?,
            Mode::Exact => remove_vertical_seam(&mut self.intensity, &seam)?,
        }
        remove_vertical_seam(&mut self.rgb, &seam)?;
        Ok(seam)
    }

    /// Carve `iterations` seams and return the last one removed.  Asking
    /// for as many seams as there are columns fails before anything is
    /// carved.
    pub fn carve(&mut self, iterations: u32) -> Result<Option<Seam>, CarveError> {
        let width = self.width();
        if iterations >= width {
            return Err(CarveError::IterationCountTooLarge { iterations, width });
        }

        info!(
            "carving {} seams from {}x{} ({:?}, {} workers)",
            iterations,
            width,
            self.height(),
            self.mode,
            worker_count()
        );
        let mut last = None;
        for i in 0..iterations {
            if i % PROGRESS_INTERVAL == 0 {
                debug!("iteration {}, width {}", i, self.width());
            }
            last = Some(self.carve_once()?);
        }
        info!("carved to {}x{}", self.width(), self.height());
        Ok(last)
    }

    /// Hand back the image, with a fresh intensity plane derived from it.
    pub fn finish(self) -> Result<Carved, CarveError> {
        let SeamCarver {
            rgb, mut intensity, ..
        } = self;
        to_luma_into(&rgb, &mut intensity)?;
        Ok(Carved { rgb, intensity })
    }
}

/// Carve `options.iterations` seams from `rgb`.  The iteration count is
/// checked before any plane is allocated.
pub fn seamcarve(rgb: PixelBuffer<u8>, options: &CarveOptions) -> Result<Carved, CarveError> {
    let (width, height) = rgb.dimensions();
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(CarveError::InvalidDimensions { width, height });
    }
    if options.iterations >= width {
        return Err(CarveError::IterationCountTooLarge {
            iterations: options.iterations,
            width,
        });
    }
    let mut carver = SeamCarver::new(rgb, options.mode)?;
    carver.carve(options.iterations)?;
    carver.finish()
}

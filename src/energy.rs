// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! From importance to seam.
//!
//! Given an importance plane, build the cumulative map: for every
//! pixel, the cheapest total importance of any 8-connected path from
//! that pixel down to the bottom row.  Then walk it from the top to get
//! a vertical seam.
//!
//! The walk is greedy.  Only the starting column is globally optimal;
//! below that, every row takes the cheapest of the three cells under
//! the previous choice, and never reconsiders.  Ties go to the cell
//! straight down, then left, then right, both when building the map
//! and when walking it.

use crate::buffer::{CumulativeBuffer, ImportanceBuffer};
use crate::error::CarveError;
use crate::parallel::{for_each_band_with, worker_count};

/// One column index per row, top to bottom.
pub type Seam = Vec<u32>;

// Columns per row below which threads cost more than they save.  Rows
// have to be processed one at a time, so the fan-out happens per row.
const MIN_PARALLEL_COLUMNS: usize = 8192;

// The cheapest of the (up to) three cells at `x - 1`, `x`, `x + 1` in
// `row`, as (column, value).  Straight down wins ties, then left.
#[inline]
fn cheapest_of_three(row: &[u32], x: usize) -> (usize, u32) {
    let mut best = (x, row[x]);
    if x > 0 && row[x - 1] < best.1 {
        best = (x - 1, row[x - 1]);
    }
    if x + 1 < row.len() && row[x + 1] < best.1 {
        best = (x + 1, row[x + 1]);
    }
    best
}

// Costs pile up one row at a time; a cost that cannot grow any further
// still compares correctly against its neighbors.
#[inline]
fn cumulative_cell(energy: u8, below: &[u32], x: usize) -> u32 {
    u32::from(energy).saturating_add(cheapest_of_three(below, x).1)
}

/// Build the cumulative map for `importance` into `target`, which is
/// re-shaped to match.  The bottom row is copied, then each row above
/// is the importance plus the cheapest reachable cell below it.
pub fn calculate_cumulative(importance: &ImportanceBuffer, target: &mut CumulativeBuffer) {
    calculate_cumulative_with(worker_count(), importance, target)
}

pub(crate) fn calculate_cumulative_with(
    workers: usize,
    importance: &ImportanceBuffer,
    target: &mut CumulativeBuffer,
) {
    let (width, height) = importance.dimensions();
    target.reset(width, height);
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return;
    }

    let source = importance.as_slice();
    let cells = target.samples_mut();
    for (cell, erg) in cells[(h - 1) * w..].iter_mut().zip(&source[(h - 1) * w..]) {
        *cell = u32::from(*erg);
    }

    // Row `y` reads only row `y + 1`, so each row is a barrier.
    for y in (0..h - 1).rev() {
        let (upper, lower) = cells.split_at_mut((y + 1) * w);
        let row = &mut upper[y * w..];
        let below = &lower[..w];
        let energies = &source[y * w..(y + 1) * w];
        for_each_band_with(workers, row, 1, MIN_PARALLEL_COLUMNS, |first, span| {
            for (i, cell) in span.iter_mut().enumerate() {
                let x = first + i;
                *cell = cumulative_cell(energies[x], below, x);
            }
        });
    }
}

/// Convenience wrapper: allocate and build a cumulative map.
pub fn cumulative_energy(importance: &ImportanceBuffer) -> Result<CumulativeBuffer, CarveError> {
    let mut target = CumulativeBuffer::new(importance.width(), importance.height(), 1)?;
    calculate_cumulative(importance, &mut target);
    Ok(target)
}

/// Given a cumulative map, return the list of x-coordinates that, when
/// mapped with the range (0..height), give the XY coordinates for each
/// pixel in the seam to be removed.
pub fn energy_to_vertical_seam(energy: &CumulativeBuffer) -> Seam {
    let (width, height) = energy.dimensions();
    let mut seam = Seam::with_capacity(height as usize);
    if width == 0 || height == 0 {
        return seam;
    }

    // The leftmost of the cheapest cells on the top row.
    let mut seam_col = (0..width).min_by_key(|x| energy[(*x, 0)]).unwrap_or(0);
    seam.push(seam_col);
    for y in 1..height {
        seam_col = cheapest_of_three(energy.row(y), seam_col as usize).0 as u32;
        seam.push(seam_col);
    }
    seam
}

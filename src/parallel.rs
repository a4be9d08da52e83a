// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Intra-pass fan-out.
//!
//! Every parallel pass in the carver has the same shape: a read-only
//! input, and an output slice in which each cell depends only on that
//! input.  So the output is broken up by `chunks_mut` into contiguous
//! bands, one per worker, and each band is handed to a scoped thread
//! along with the index of its first unit.  No locks, nothing unsafe.
//!
//! Without the `threaded` feature the whole slice is one band.

/// Number of workers a pass may fan out to.
#[cfg(feature = "threaded")]
pub fn worker_count() -> usize {
    num_cpus::get().max(1)
}

#[cfg(not(feature = "threaded"))]
pub fn worker_count() -> usize {
    1
}

/// Run `f(first_unit, band)` over disjoint bands of `data` on at most
/// `workers` threads, where a unit is `unit` consecutive samples (a
/// row, or a single column).  Passes with fewer than `min_units` units
/// run inline.  Callers pass `worker_count()` unless they need to pin
/// the fan-out.
#[cfg(feature = "threaded")]
pub(crate) fn for_each_band_with<T, F>(workers: usize, data: &mut [T], unit: usize, min_units: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    let units = if unit == 0 { 0 } else { data.len() / unit };
    let workers = workers.min(units);
    if workers < 2 || units < min_units {
        f(0, data);
        return;
    }

    let per_band = (units + workers - 1) / workers;
    let f = &f;
    let result = crossbeam::scope(|scope| {
        for (band, chunk) in data.chunks_mut(per_band * unit).enumerate() {
            scope.spawn(move |_| f(band * per_band, chunk));
        }
    });
    if let Err(panic) = result {
        std::panic::resume_unwind(panic);
    }
}

#[cfg(not(feature = "threaded"))]
pub(crate) fn for_each_band_with<T, F>(_workers: usize, data: &mut [T], _unit: usize, _min_units: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    f(0, data)
}

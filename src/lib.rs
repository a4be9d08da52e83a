// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam carving for Rust.
//!
//! Narrow an RGB image one column at a time by removing the vertical
//! path of least gradient energy, rather than scaling or cropping it.
//! Decoding and encoding image files is left to the caller (the
//! `preview` module bridges to the `image` crate).

#[macro_use]
mod ternary;

pub mod buffer;
pub mod energy;
pub mod error;
pub mod kernel;
pub mod luma;
pub mod parallel;
pub mod preview;
pub mod seamcarver;

pub use buffer::{CumulativeBuffer, ImportanceBuffer, PixelBuffer};
pub use energy::{calculate_cumulative, energy_to_vertical_seam, Seam};
pub use error::CarveError;
pub use kernel::{estimate_importance, Kernel, DIRECTIONAL_PAIR};
pub use seamcarver::{remove_vertical_seam, seamcarve, CarveOptions, Carved, Mode, SeamCarver};

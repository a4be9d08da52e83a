// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use seamcarve::energy::cumulative_energy;
use seamcarve::kernel::estimate_importance;
use seamcarve::luma::to_luma;
use seamcarve::{
    energy_to_vertical_seam, seamcarve, CarveError, CarveOptions, Mode, PixelBuffer, SeamCarver,
    DIRECTIONAL_PAIR,
};

// A cheap, repeatable noise image.
fn noisy(width: u32, height: u32, seed: u32) -> PixelBuffer<u8> {
    let mut state = seed;
    let data = (0..width * height * 3)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            (state >> 16) as u8
        })
        .collect();
    PixelBuffer::from_raw(width, height, 3, data).unwrap()
}

fn assert_connected(seam: &[u32], width: u32, height: u32) {
    assert_eq!(seam.len(), height as usize);
    assert!(seam.iter().all(|x| *x < width), "{:?} escapes width {}", seam, width);
    for pair in seam.windows(2) {
        let step = i64::from(pair[0]) - i64::from(pair[1]);
        assert!(step.abs() <= 1, "{:?} is not connected", seam);
    }
}

#[test]
fn every_seam_is_connected_and_in_bounds() {
    for &mode in &[Mode::Exact, Mode::Greedy] {
        let mut carver = SeamCarver::new(noisy(24, 17, 7), mode).unwrap();
        while carver.width() > 1 {
            let width = carver.width();
            let seam = carver.carve_once().unwrap();
            assert_connected(&seam, width, 17);
            assert_eq!(carver.width(), width - 1);
        }
    }
}

#[test]
fn output_is_narrowed_by_the_iteration_count() {
    for &mode in &[Mode::Exact, Mode::Greedy] {
        let carved = seamcarve(noisy(40, 12, 3), &CarveOptions { iterations: 15, mode }).unwrap();
        assert_eq!(carved.rgb.dimensions(), (25, 12));
        assert_eq!(carved.rgb.channels(), 3);
        assert_eq!(carved.intensity.dimensions(), (25, 12));
    }
}

#[test]
fn flat_images_stay_flat() {
    let (width, height) = (11, 6);
    let rgb = PixelBuffer::from_raw(width, height, 3, vec![42u8; (width * height * 3) as usize]).unwrap();
    let options = CarveOptions {
        iterations: width - 3,
        mode: Mode::Exact,
    };
    let carved = seamcarve(rgb, &options).unwrap();
    assert_eq!(carved.rgb.dimensions(), (3, height));
    assert!(carved.rgb.as_slice().iter().all(|v| *v == 42));
}

#[test]
fn grey_converts_to_itself() {
    let rgb = PixelBuffer::from_raw(3, 3, 3, (0..27).map(|i| (i / 3 * 25) as u8).collect()).unwrap();
    let luma = to_luma(&rgb).unwrap();
    let expected: Vec<u8> = (0..9).map(|i| (i * 25) as u8).collect();
    assert_eq!(luma.as_slice(), expected.as_slice());
}

#[test]
fn too_many_iterations_produce_nothing() {
    let err = seamcarve(noisy(8, 5, 1), &CarveOptions { iterations: 8, mode: Mode::Greedy }).unwrap_err();
    assert_eq!(err, CarveError::IterationCountTooLarge { iterations: 8, width: 8 });

    let mut carver = SeamCarver::new(noisy(8, 5, 1), Mode::Exact).unwrap();
    let before = carver.image().clone();
    assert!(carver.carve(9).is_err());
    assert_eq!(carver.image(), &before);
}

#[test]
fn low_importance_path_is_followed() {
    let importance = PixelBuffer::from_raw(4, 3, 1, vec![9, 1, 9, 9, 9, 9, 1, 9, 9, 1, 9, 9]).unwrap();
    let cumulative = cumulative_energy(&importance).unwrap();
    assert_eq!(cumulative.row(0), &[19, 3, 11, 11]);
    assert_eq!(energy_to_vertical_seam(&cumulative), [1, 2, 1]);
}

#[test]
fn carver_starts_from_the_sobel_estimate() {
    let rgb = noisy(9, 8, 11);
    let intensity = to_luma(&rgb).unwrap();
    let mut importance = PixelBuffer::new(9, 8, 1).unwrap();
    estimate_importance(&intensity, &mut importance, &DIRECTIONAL_PAIR).unwrap();

    let mut carver = SeamCarver::new(rgb, Mode::Exact).unwrap();
    assert_eq!(carver.importance(), &importance);
    let expected = energy_to_vertical_seam(&cumulative_energy(&importance).unwrap());
    assert_eq!(carver.next_seam().unwrap(), expected);
}

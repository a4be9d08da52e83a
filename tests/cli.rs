// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn write_fixture(path: &Path, width: u32, height: u32) {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 13 % 256) as u8, (y * 29 % 256) as u8, ((x + y) * 7 % 256) as u8])
    })
    .save(path)
    .unwrap();
}

#[test]
fn carves_and_writes_both_outputs() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    let gray = dir.path().join("gray.png");
    let energy = dir.path().join("energy.png");
    write_fixture(&input, 20, 10);

    Command::cargo_bin("seamcarve")
        .unwrap()
        .arg(&input)
        .arg("5")
        .arg("-o")
        .arg(&output)
        .arg("-g")
        .arg(&gray)
        .arg("--energy")
        .arg(&energy)
        .arg("--mark-seam")
        .assert()
        .success();

    assert_eq!(image::image_dimensions(&output).unwrap(), (15, 10));
    assert_eq!(image::image_dimensions(&gray).unwrap(), (15, 10));
    assert_eq!(image::image_dimensions(&energy).unwrap(), (20, 10));
}

#[test]
fn greedy_mode_narrows_too() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    let gray = dir.path().join("gray.png");
    write_fixture(&input, 12, 6);

    Command::cargo_bin("seamcarve")
        .unwrap()
        .arg(&input)
        .arg("9")
        .arg("--greedy")
        .arg("--output")
        .arg(&output)
        .arg("--gray")
        .arg(&gray)
        .assert()
        .success();

    assert_eq!(image::image_dimensions(&output).unwrap(), (3, 6));
}

#[test]
fn refuses_too_many_iterations() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    write_fixture(&input, 8, 8);

    Command::cargo_bin("seamcarve")
        .unwrap()
        .arg(&input)
        .arg("8")
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot remove 8 seams"));

    assert!(!output.exists());
}

#[test]
fn reports_missing_input() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("seamcarve")
        .unwrap()
        .arg(dir.path().join("nope.png"))
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not load"));
}

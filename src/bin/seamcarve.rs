// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use seamcarve::preview::{fill_seam, importance_to_image};
use seamcarve::{Mode, PixelBuffer, SeamCarver};
use std::process;

extern crate clap;
extern crate image;

use clap::{value_t, App, Arg, ArgMatches};
use failure::{Error, ResultExt};
use image::ColorType;
use log::{error, info, warn};

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let path = matches.value_of("image").unwrap_or_default();
    let iterations = value_t!(matches, "iterations", u32)?;
    let mode = if matches.is_present("greedy") {
        Mode::Greedy
    } else {
        Mode::Exact
    };

    info!("loading image {}", path);
    let decoded = image::open(path).with_context(|_| format!("could not load {}", path))?;
    if decoded.color() != ColorType::Rgb8 {
        warn!(
            "image is {:?}; it will be carved as 8-bit RGB",
            decoded.color()
        );
    }

    let rgb = PixelBuffer::from_rgb_image(decoded.to_rgb8())?;
    let mut carver = SeamCarver::new(rgb, mode)?;

    if let Some(energy) = matches.value_of("energy") {
        importance_to_image(carver.importance())
            .save(energy)
            .with_context(|_| format!("could not write {}", energy))?;
    }

    carver.carve(iterations)?;
    let next = if matches.is_present("mark-seam") {
        Some(carver.next_seam()?)
    } else {
        None
    };

    let carved = carver.finish()?;
    let mut gray = carved.intensity;
    if let Some(seam) = next {
        fill_seam(&mut gray, &seam, u8::MAX);
    }

    let output = matches.value_of("output").unwrap_or("out_rgb.jpg");
    carved
        .rgb
        .into_rgb_image()?
        .save(output)
        .with_context(|_| format!("could not write {}", output))?;
    let gray_output = matches.value_of("gray").unwrap_or("out.jpg");
    gray.into_gray_image()?
        .save(gray_output)
        .with_context(|_| format!("could not write {}", gray_output))?;
    info!("wrote {} and {}", output, gray_output);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("seamcarve")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Content-aware image narrowing by seam carving")
        .arg(
            Arg::with_name("image")
                .help("The image to carve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("iterations")
                .help("How many columns to remove")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("greedy")
                .long("greedy")
                .help("Estimate importance once instead of before every seam"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .default_value("out_rgb.jpg")
                .help("Where to write the carved image"),
        )
        .arg(
            Arg::with_name("gray")
                .short("g")
                .long("gray")
                .takes_value(true)
                .default_value("out.jpg")
                .help("Where to write the greyscale preview"),
        )
        .arg(
            Arg::with_name("energy")
                .long("energy")
                .takes_value(true)
                .help("Also write the initial importance map"),
        )
        .arg(
            Arg::with_name("mark-seam")
                .long("mark-seam")
                .help("Paint the next seam onto the greyscale preview"),
        )
        .get_matches();

    if let Err(err) = run(&matches) {
        for cause in err.iter_chain() {
            error!("{}", cause);
        }
        process::exit(1);
    }
}

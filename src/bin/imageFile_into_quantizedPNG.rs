#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	clap::Parser,
	pixelwar_painter::{
		prepare::{loadImage, prepare, writePNG, ResizeFilter},
		stdoutRaw,
	},
	std::{io::BufWriter, path::PathBuf, process::ExitCode},
};

/// Offline dry run: resizes and quantizes an image exactly as a paint run would, and writes the
/// preview PNG to stdout.
fn main() -> ExitCode {
	#[derive(Parser)]
	struct Args {
		imagePath: PathBuf,
		#[clap(value_parser = clap::value_parser!(u32).range(1..))]
		width: u32,
		#[clap(value_parser = clap::value_parser!(u32).range(1..))]
		height: u32,
		#[clap(long, value_enum)]
		resizeFilter: Option<ResizeFilter>,
	}
	let Args { imagePath, width, height, resizeFilter } = Args::parse();
	let result = loadImage(&imagePath).and_then(|image| {
		let prepared = prepare(&image, [width, height], resizeFilter.unwrap_or_default());
		eprintln!("{} colors", prepared.colors.len());
		writePNG(&prepared.preview, BufWriter::new(stdoutRaw()))
	});
	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("{err}");
			ExitCode::FAILURE
		}
	}
}

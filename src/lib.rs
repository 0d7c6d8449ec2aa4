#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

pub mod canvas;
pub mod config;
mod error;
pub mod geometry;
pub mod pipeline;
pub mod prepare;
pub mod prompt;
pub mod writer;

pub use error::{Error, ValidationError, WriteFailure};

pub const RGB_SIZE: usize = 3;

pub mod palette {
	use {
		super::{DotExt, RGB_SIZE},
		core::fmt,
		glam::IVec3,
		serde::{Serialize, Serializer},
	};

	#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
	pub struct PaletteColor(pub [u8; RGB_SIZE]);

	pub const PALETTE_LEN: usize = 16;

	/// The only colors the canvas accepts, in declaration order. Ties in [`nearest`] go to the
	/// earlier entry.
	pub const PALETTE: [PaletteColor; PALETTE_LEN] = [
		PaletteColor([0xFF, 0xFF, 0xFF]),
		PaletteColor([0xE4, 0xE4, 0xE4]),
		PaletteColor([0x88, 0x88, 0x88]),
		PaletteColor([0x22, 0x22, 0x22]),
		PaletteColor([0xFF, 0xA7, 0xD1]),
		PaletteColor([0xE5, 0x00, 0x00]),
		PaletteColor([0xE5, 0x95, 0x00]),
		PaletteColor([0xA0, 0x6A, 0x42]),
		PaletteColor([0xE5, 0xD9, 0x00]),
		PaletteColor([0x94, 0xE0, 0x44]),
		PaletteColor([0x02, 0xBE, 0x01]),
		PaletteColor([0x00, 0xD3, 0xDD]),
		PaletteColor([0x00, 0x83, 0xC7]),
		PaletteColor([0x00, 0x00, 0xEA]),
		PaletteColor([0xCD, 0x6E, 0xEA]),
		PaletteColor([0x82, 0x00, 0x80]),
	];

	#[inline(always)]
	fn ivec3(rgb: [u8; RGB_SIZE]) -> IVec3 {
		IVec3::from_array(rgb.map(|colorComponent| colorComponent as _))
	}

	pub fn nearest(rgb: [u8; RGB_SIZE]) -> PaletteColor {
		let (mut nearestSquaredDist, mut nearestColor, color) = (i32::MAX, PALETTE[0], ivec3(rgb));
		for palColor in PALETTE {
			let squaredDist = (color - ivec3(palColor.0)).lengthSquared();
			if squaredDist < nearestSquaredDist {
				(nearestSquaredDist, nearestColor) = (squaredDist, palColor);
			}
		}
		nearestColor
	}

	impl fmt::Display for PaletteColor {
		fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			let [red, green, blue] = self.0;
			write!(f, "#{red:02X}{green:02X}{blue:02X}")
		}
	}

	impl Serialize for PaletteColor {
		fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
			serializer.collect_str(self)
		}
	}

}

pub trait DotExt {
	fn lengthSquared(self) -> i32;
}
impl DotExt for glam::IVec3 {
	#[inline(always)]
	fn lengthSquared(self) -> i32 {
		self.dot(self)
	}
}

use std::fs::File;

#[cfg(unix)]
pub fn stdoutRaw() -> File {
	use std::os::unix::io::FromRawFd;
	unsafe { File::from_raw_fd(1) }
}

#[cfg(windows)]
pub fn stdoutRaw() -> File {
	use std::{
		io,
		os::windows::io::{AsRawHandle, FromRawHandle},
	};
	unsafe { File::from_raw_handle(io::stdout().as_raw_handle()) }
}

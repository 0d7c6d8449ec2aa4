use {
	crate::geometry::{Vec2, HEIGHT, WIDTH, X, Y},
	std::{io, path::PathBuf},
	thiserror::Error,
};

/// Fatal errors. Each one ends the run; [`Error::exitCode`] picks the process exit status.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	#[error("error fetching {endpoint}: {reason}")]
	RemoteUnavailable { endpoint: String, reason: String },

	#[error("the pixel war is not active")]
	Inactive,

	#[error("no .png or .jpg image found in {}", dir.display())]
	NoImageFound { dir: PathBuf },

	#[error("too many invalid inputs for the {what} ({attempts} attempts)")]
	TooManyInvalidInputs { what: &'static str, attempts: u32 },

	#[error("{actual} colors prepared for a rectangle of {expected} pixels")]
	ColorCountMismatch { expected: usize, actual: usize },

	#[error("aborted")]
	Aborted,

	#[error("{}: {source}", path.display())]
	Image { path: PathBuf, source: image::ImageError },

	#[error("{}: {source}", path.display())]
	Config { path: PathBuf, source: toml::de::Error },

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error(transparent)]
	Png(#[from] png::EncodingError),

	#[error(transparent)]
	Io(#[from] io::Error),
}

impl Error {
	pub fn exitCode(&self) -> u8 {
		match self {
			Self::RemoteUnavailable { .. } => 2,
			Self::Inactive => 3,
			Self::NoImageFound { .. } => 4,
			Self::TooManyInvalidInputs { .. } => 5,
			Self::Aborted => 6,
			Self::Config { .. } | Self::InvalidConfig(_) => 78,
			Self::ColorCountMismatch { .. } | Self::Image { .. } | Self::Png(_) | Self::Io(_) => 1,
		}
	}
}

/// Rejected coordinate input. Recoverable: the caller asks again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
	#[error("{0:?} is not an integer")]
	NotANumber(String),

	#[error("expected {expected} coordinates, got {actual}")]
	WrongArity { expected: usize, actual: usize },

	#[error("({}, {}) is out of the {}x{} canvas bounds", point[X], point[Y], dimensions[WIDTH], dimensions[HEIGHT])]
	OutOfBounds { point: [i64; 2], dimensions: Vec2 },

	#[error(
		"({}, {}) is not below and to the right of the first pixel ({}, {}). If this is not a mistake press ctrl+c to retry from 0",
		last[X], last[Y], first[X], first[Y]
	)]
	NotAfterFirst { first: Vec2, last: [i64; 2] },
}

/// A single pixel write that did not go through. Logged and skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WriteFailure {
	#[error("status code: {0}")]
	Status(u16),

	#[error("transport error: {0}")]
	Transport(String),
}

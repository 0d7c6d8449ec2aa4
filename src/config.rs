use {
	crate::{canvas::PayloadAxes, prepare::ResizeFilter, Error},
	serde::Deserialize,
	std::{fs, path::Path, path::PathBuf, time::Duration},
};

pub const DEFAULT_BASE_URL: &str = "https://pixelwar.rezoleo.fr";

/// Run settings, read from a TOML file with camelCase keys. Missing keys keep their defaults.
#[derive(Deserialize, Clone, PartialEq, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub baseUrl: String,
	pub imageDir: PathBuf,
	/// Written next to the source image when unset.
	pub preview: Option<PathBuf>,
	/// Added on top of the delay the service reports.
	pub delayBufferSeconds: f64,
	/// Attempts allowed per rectangle corner.
	pub maxInputAttempts: u32,
	pub payloadAxes: PayloadAxes,
	pub resizeFilter: ResizeFilter,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			baseUrl: DEFAULT_BASE_URL.to_owned(),
			imageDir: PathBuf::from("."),
			preview: None,
			delayBufferSeconds: 0.1,
			maxInputAttempts: 3,
			payloadAxes: PayloadAxes::default(),
			resizeFilter: ResizeFilter::default(),
		}
	}
}

impl Config {
	pub fn load(path: &Path) -> Result<Self, Error> {
		let config: Self = toml::from_str(&fs::read_to_string(path)?)
			.map_err(|source| Error::Config { path: path.to_owned(), source })?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), Error> {
		self.delayBuffer()?;
		if self.maxInputAttempts == 0 {
			return Err(Error::InvalidConfig("maxInputAttempts must be at least 1".to_owned()));
		}
		Ok(())
	}

	pub fn delayBuffer(&self) -> Result<Duration, Error> {
		Duration::try_from_secs_f64(self.delayBufferSeconds).map_err(|err| {
			Error::InvalidConfig(format!("delayBufferSeconds = {}: {err}", self.delayBufferSeconds))
		})
	}
}

#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	clap::Parser,
	pixelwar_painter::{
		canvas::{HttpCanvas, PayloadAxes},
		config::Config,
		pipeline::paint,
		prepare::ResizeFilter,
		Error,
	},
	std::{io, path::PathBuf, process::ExitCode},
	tracing::error,
	tracing_subscriber::EnvFilter,
};

/// Paints the image found in a directory onto a rectangle of the shared pixel war canvas.
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
	/// TOML file with camelCase keys; flags override it
	#[clap(long)]
	config: Option<PathBuf>,

	#[clap(long)]
	baseUrl: Option<String>,

	/// Directory holding the .png/.jpg to paint
	#[clap(long)]
	imageDir: Option<PathBuf>,

	/// Where to write the quantized preview
	#[clap(long)]
	preview: Option<PathBuf>,

	#[clap(long, value_enum)]
	payloadAxes: Option<PayloadAxes>,

	#[clap(long, value_enum)]
	resizeFilter: Option<ResizeFilter>,

	/// Start writing without confirming the preview
	#[clap(long)]
	yes: bool,

	/// trace, debug, info, warn, error or a full filter such as `pixelwar_painter=debug`
	#[clap(long, default_value = "info", value_parser = logFilter)]
	logLevel: String,
}

fn logFilter(directives: &str) -> Result<String, String> {
	EnvFilter::try_new(directives).map(|_| directives.to_owned()).map_err(|err| err.to_string())
}

fn main() -> ExitCode {
	let args = Args::parse();
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::new(&args.logLevel))
		.with_writer(io::stderr)
		.init();
	match run(args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			error!("{err}. Exiting.");
			ExitCode::from(err.exitCode())
		}
	}
}

fn run(args: Args) -> Result<(), Error> {
	let config = {
		let mut config = match &args.config {
			Some(path) => Config::load(path)?,
			None => Config::default(),
		};
		macro_rules! override_ {
			($($field: ident),*) => {
				$(if let Some($field) = args.$field {
					config.$field = $field;
				})*
			};
		}
		override_!(baseUrl, imageDir, payloadAxes, resizeFilter);
		if args.preview.is_some() {
			config.preview = args.preview;
		}
		config
	};
	let canvas = HttpCanvas::new(&config.baseUrl)?;
	let (stdin, stdout) = (&mut io::stdin().lock(), &mut io::stdout().lock());
	paint(&canvas, &config, stdin, stdout, args.yes)?;
	Ok(())
}

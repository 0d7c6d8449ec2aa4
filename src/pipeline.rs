use {
	crate::{
		canvas::{CanvasApi, CanvasConstraints},
		config::Config,
		geometry::{HEIGHT, WIDTH},
		prepare::{defaultPreviewPath, findSourceImage, loadImage, prepare, savePreview},
		prompt::{confirm, promptPoint},
		writer::{formatMinutesSeconds, PacedWriter, WriteSummary},
		Error,
	},
	std::io::{BufRead, Write},
	tracing::info,
};

/// One full run: canvas constraints, source image, rectangle, preview, confirmation, writes.
/// Nothing is asked or loaded until the canvas is known to be active.
pub fn paint<C: CanvasApi + ?Sized>(
	canvas: &C,
	config: &Config,
	input: &mut impl BufRead,
	output: &mut impl Write,
	assumeYes: bool,
) -> Result<WriteSummary, Error> {
	let constraints = CanvasConstraints::fetch(canvas, config.delayBuffer()?)?;

	let source = findSourceImage(&config.imageDir, config.preview.as_deref())?;
	writeln!(output, "Processing with {:?}", source.path)?;
	if !source.ignored.is_empty() {
		writeln!(
			output,
			"If this is not the right image, please remove the other images from the directory: {:?}",
			source.ignored
		)?;
	}
	let image = loadImage(&source.path)?;

	let dimensions = constraints.dimensions;
	writeln!(output, "Canva's size: ({}, {})", dimensions[WIDTH], dimensions[HEIGHT])?;
	let first = promptPoint(input, output, "first pixel", config.maxInputAttempts, |point| {
		constraints.validateFirstPixel(point)
	})?;
	let rectangle = promptPoint(input, output, "last pixel", config.maxInputAttempts, |point| {
		constraints.validateLastPixel(first, point)
	})?;

	let prepared = prepare(&image, rectangle.dimensions(), config.resizeFilter);
	let previewPath = config.preview.clone().unwrap_or_else(|| defaultPreviewPath(&source.path));
	savePreview(&prepared.preview, &previewPath)?;
	writeln!(output, "Preview written to {previewPath:?}")?;
	if !assumeYes && !confirm(input, output, "Is the preview as expected?")? {
		return Err(Error::Aborted);
	}

	let writer = PacedWriter::new(canvas, &rectangle, &prepared.colors, constraints.delay, config.payloadAxes)?;
	writeln!(
		output,
		"The total time taken for placing pixels is {}",
		formatMinutesSeconds(writer.estimatedDuration())
	)?;
	let mut summary = WriteSummary::default();
	for result in writer {
		summary.record(&result);
	}
	info!(submitted = summary.submitted, failed = summary.failed, "all pixels processed");
	Ok(summary)
}

use {
	crate::{
		canvas::{CanvasApi, PayloadAxes},
		geometry::{ScanOrder, TargetRectangle, Vec2, X, Y},
		palette::PaletteColor,
		Error, WriteFailure,
	},
	core::slice,
	std::{thread, time::Duration},
	tracing::{info, warn},
};

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum WriteOutcome {
	Submitted,
	Failed(WriteFailure),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct WriteResult {
	pub position: Vec2,
	pub color: PaletteColor,
	pub outcome: WriteOutcome,
}

/// Submits one pixel per `next()` call, then blocks for `delay`. Failed writes are reported
/// and skipped. Dropping the iterator is the only way to stop early.
pub struct PacedWriter<'a, C: ?Sized> {
	canvas: &'a C,
	positions: ScanOrder,
	colors: slice::Iter<'a, PaletteColor>,
	delay: Duration,
	axes: PayloadAxes,
}

impl<'a, C: CanvasApi + ?Sized> PacedWriter<'a, C> {
	pub fn new(
		canvas: &'a C,
		rectangle: &TargetRectangle,
		colors: &'a [PaletteColor],
		delay: Duration,
		axes: PayloadAxes,
	) -> Result<Self, Error> {
		if colors.len() != rectangle.pixelCount() {
			return Err(Error::ColorCountMismatch { expected: rectangle.pixelCount(), actual: colors.len() });
		}
		Ok(Self { canvas, positions: rectangle.positions(), colors: colors.iter(), delay, axes })
	}

	/// `delay` times the pixels still to write.
	pub fn estimatedDuration(&self) -> Duration {
		self.delay.saturating_mul(u32::try_from(self.positions.len()).unwrap_or(u32::MAX))
	}
}

impl<C: CanvasApi + ?Sized> Iterator for PacedWriter<'_, C> {
	type Item = WriteResult;

	fn next(&mut self) -> Option<WriteResult> {
		let (position, &color) = (self.positions.next()?, self.colors.next()?);
		let outcome = match self.canvas.putPixel(&self.axes.pixelWrite(position, color)) {
			Ok(()) => {
				info!("Successfully posted pixel at ({}, {}) with color {color}", position[X], position[Y]);
				WriteOutcome::Submitted
			}
			Err(failure) => {
				warn!("Failed to post pixel at ({}, {}) with color {color}. {failure}", position[X], position[Y]);
				WriteOutcome::Failed(failure)
			}
		};
		thread::sleep(self.delay);
		Some(WriteResult { position, color, outcome })
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.positions.size_hint()
	}
}

impl<C: CanvasApi + ?Sized> ExactSizeIterator for PacedWriter<'_, C> {}

/// Same as [`PacedWriter::new`].
pub fn run<'a, C: CanvasApi + ?Sized>(
	canvas: &'a C,
	rectangle: &TargetRectangle,
	colors: &'a [PaletteColor],
	delay: Duration,
	axes: PayloadAxes,
) -> Result<PacedWriter<'a, C>, Error> {
	PacedWriter::new(canvas, rectangle, colors, delay, axes)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct WriteSummary {
	pub submitted: usize,
	pub failed: usize,
}

impl WriteSummary {
	pub fn record(&mut self, result: &WriteResult) {
		match result.outcome {
			WriteOutcome::Submitted => self.submitted += 1,
			WriteOutcome::Failed(_) => self.failed += 1,
		}
	}
}

/// `<minutes>min <seconds>s`, seconds rounded.
pub fn formatMinutesSeconds(duration: Duration) -> String {
	let seconds = duration.as_secs_f64().round() as u64;
	format!("{}min {}s", seconds / 60, seconds % 60)
}

use crate::ValidationError;

/// `[x, y]` for points, `[width, height]` for extents.
pub type Vec2 = [u32; 2];

pub const X: usize = 0;
pub const Y: usize = 1;
pub const WIDTH: usize = 0;
pub const HEIGHT: usize = 1;

/// Inclusive first/last pixel pair that passed validation against the canvas extent.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TargetRectangle {
	first: Vec2,
	last: Vec2,
}

impl TargetRectangle {
	pub fn first(&self) -> Vec2 {
		self.first
	}

	pub fn last(&self) -> Vec2 {
		self.last
	}

	pub fn dimensions(&self) -> Vec2 {
		[self.last[X] - self.first[X] + 1, self.last[Y] - self.first[Y] + 1]
	}

	pub fn pixelCount(&self) -> usize {
		let [width, height] = self.dimensions();
		width as usize * height as usize
	}

	/// Canvas positions in write order.
	pub fn positions(&self) -> ScanOrder {
		scanOrder(self.first, self.dimensions())
	}
}

/// Row-major walk over a `dimensions`-sized block anchored at `origin`: rows top to bottom,
/// columns left to right inside each row. Both the color sequence and the writes are produced
/// from this iterator, so the i-th color always lands on the i-th position.
pub fn scanOrder(origin: Vec2, dimensions: Vec2) -> ScanOrder {
	ScanOrder { origin, width: dimensions[WIDTH], i: 0, len: dimensions[WIDTH] as usize * dimensions[HEIGHT] as usize }
}

#[derive(Clone, Debug)]
pub struct ScanOrder {
	origin: Vec2,
	width: u32,
	i: usize,
	len: usize,
}

impl Iterator for ScanOrder {
	type Item = Vec2;

	fn next(&mut self) -> Option<Vec2> {
		if self.i == self.len {
			return None;
		}
		let width = self.width as usize;
		let (row, column) = (self.i / width, self.i % width);
		self.i += 1;
		Some([self.origin[X] + column as u32, self.origin[Y] + row as u32])
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.len - self.i;
		(remaining, Some(remaining))
	}
}

impl ExactSizeIterator for ScanOrder {}

fn onCanvas(point: [i64; 2], dimensions: Vec2) -> Option<Vec2> {
	let mut canvasPoint = [0; 2];
	for i in [X, Y] {
		canvasPoint[i] = u32::try_from(point[i]).ok().filter(|&coord| coord < dimensions[i])?;
	}
	Some(canvasPoint)
}

pub fn validateFirstPixel(point: [i64; 2], dimensions: Vec2) -> Result<Vec2, ValidationError> {
	onCanvas(point, dimensions).ok_or(ValidationError::OutOfBounds { point, dimensions })
}

/// The last pixel must be on the canvas and strictly past `first` on both axes, so a rectangle
/// is always at least 2x2.
pub fn validateLastPixel(
	first: Vec2,
	point: [i64; 2],
	dimensions: Vec2,
) -> Result<TargetRectangle, ValidationError> {
	let last = onCanvas(point, dimensions).ok_or(ValidationError::OutOfBounds { point, dimensions })?;
	if last[X] <= first[X] || last[Y] <= first[Y] {
		return Err(ValidationError::NotAfterFirst { first, last: point });
	}
	Ok(TargetRectangle { first, last })
}

pub fn validateRectangle(
	first: [i64; 2],
	last: [i64; 2],
	dimensions: Vec2,
) -> Result<TargetRectangle, ValidationError> {
	validateLastPixel(validateFirstPixel(first, dimensions)?, last, dimensions)
}

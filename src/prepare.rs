use {
	crate::{
		geometry::{scanOrder, Vec2, HEIGHT, WIDTH},
		palette::{self, PaletteColor},
		Error,
	},
	image::{imageops, DynamicImage, Rgb, RgbImage},
	png::{BitDepth, ColorType},
	serde::Deserialize,
	std::{
		fs::{self, File},
		io::{BufWriter, Write},
		path::{Path, PathBuf},
	},
	tracing::warn,
};

pub const IMAGE_EXTENSIONS: [&str; 2] = ["png", "jpg"];
pub const PREVIEW_SUFFIX: &str = ".preview.png";

pub struct SourceImage {
	pub path: PathBuf,
	/// Other candidates that were passed over.
	pub ignored: Vec<PathBuf>,
}

/// Picks the first `.png`/`.jpg` (any case) of `dir` by file name. Previews written by
/// [`savePreview`], including one at the explicit `preview` path, are not candidates.
pub fn findSourceImage(dir: &Path, preview: Option<&Path>) -> Result<SourceImage, Error> {
	let preview = preview.and_then(|preview| fs::canonicalize(preview).ok());
	let mut candidates = Vec::new();
	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && isCandidate(&path) && (preview.is_none() || fs::canonicalize(&path).ok() != preview) {
			candidates.push(path);
		}
	}
	candidates.sort();
	if candidates.is_empty() {
		return Err(Error::NoImageFound { dir: dir.to_owned() });
	}
	let path = candidates.remove(0);
	if !candidates.is_empty() {
		warn!(
			"Processing with {:?}; if this is not the right image, remove the other images from the directory: {:?}",
			path, candidates
		);
	}
	Ok(SourceImage { path, ignored: candidates })
}

fn isCandidate(path: &Path) -> bool {
	let isImage = path.extension().and_then(|extension| extension.to_str()).map_or(false, |extension| {
		IMAGE_EXTENSIONS.iter().any(|imageExtension| extension.eq_ignore_ascii_case(imageExtension))
	});
	let isPreview = path
		.file_name()
		.and_then(|name| name.to_str())
		.map_or(false, |name| name.to_ascii_lowercase().ends_with(PREVIEW_SUFFIX));
	isImage && !isPreview
}

pub fn loadImage(path: &Path) -> Result<RgbImage, Error> {
	let image = image::open(path).map_err(|source| Error::Image { path: path.to_owned(), source })?;
	Ok(normalize(image))
}

/// Every decoded layout (indexed, gray, 16-bit, with or without alpha) ends up as 8-bit RGB.
/// Alpha is dropped, not composited.
pub fn normalize(image: DynamicImage) -> RgbImage {
	DynamicImage::ImageRgba8(image.into_rgba8()).into_rgb8()
}

#[derive(Deserialize, clap::ValueEnum, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub enum ResizeFilter {
	#[default]
	Nearest,
	Triangle,
	CatmullRom,
	Gaussian,
	Lanczos3,
}

impl From<ResizeFilter> for imageops::FilterType {
	fn from(filter: ResizeFilter) -> Self {
		match filter {
			ResizeFilter::Nearest => Self::Nearest,
			ResizeFilter::Triangle => Self::Triangle,
			ResizeFilter::CatmullRom => Self::CatmullRom,
			ResizeFilter::Gaussian => Self::Gaussian,
			ResizeFilter::Lanczos3 => Self::Lanczos3,
		}
	}
}

pub struct Prepared {
	/// The resized image repainted with palette colors only.
	pub preview: RgbImage,
	/// One color per pixel, in [`scanOrder`].
	pub colors: Vec<PaletteColor>,
}

pub fn prepare(image: &RgbImage, targetDimensions: Vec2, filter: ResizeFilter) -> Prepared {
	let mut preview =
		imageops::resize(image, targetDimensions[WIDTH], targetDimensions[HEIGHT], filter.into());
	let mut colors = Vec::with_capacity(targetDimensions[WIDTH] as usize * targetDimensions[HEIGHT] as usize);
	for [x, y] in scanOrder([0, 0], targetDimensions) {
		let pixel = preview.get_pixel_mut(x, y);
		let color = palette::nearest(pixel.0);
		*pixel = Rgb(color.0);
		colors.push(color);
	}
	Prepared { preview, colors }
}

pub fn defaultPreviewPath(source: &Path) -> PathBuf {
	let stem = source.file_stem().map_or_else(|| "image".into(), |stem| stem.to_string_lossy());
	source.with_file_name(format!("{stem}{PREVIEW_SUFFIX}"))
}

pub fn savePreview(preview: &RgbImage, path: &Path) -> Result<(), Error> {
	writePNG(preview, BufWriter::new(File::create(path)?))
}

pub fn writePNG(preview: &RgbImage, writer: impl Write) -> Result<(), Error> {
	let mut png = png::Encoder::new(writer, preview.width(), preview.height());
	png.set_color(ColorType::Rgb);
	png.set_depth(BitDepth::Eight);
	png.write_header()?.write_image_data(preview.as_raw())?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::palette::PALETTE,
		image::{GrayImage, Luma, Rgba, RgbaImage},
		std::io,
		tempfile::tempdir,
	};

	fn gradient(width: u32, height: u32) -> RgbImage {
		RgbImage::from_fn(width, height, |x, y| Rgb([(x * 37 % 256) as u8, (y * 53 % 256) as u8, ((x + y) * 11 % 256) as u8]))
	}

	#[test]
	fn colorSequenceFollowsPreviewInScanOrder() {
		let prepared = prepare(&gradient(40, 30), [7, 5], ResizeFilter::Triangle);
		assert_eq!(prepared.preview.dimensions(), (7, 5));
		assert_eq!(prepared.colors.len(), 35);
		for (i, [x, y]) in scanOrder([0, 0], [7, 5]).enumerate() {
			assert_eq!(prepared.preview.get_pixel(x, y).0, prepared.colors[i].0);
			assert!(PALETTE.contains(&prepared.colors[i]));
		}
	}

	#[test]
	fn sameInputPreparesSameColors() {
		let image = gradient(13, 17);
		assert_eq!(prepare(&image, [4, 6], ResizeFilter::Nearest).colors, prepare(&image, [4, 6], ResizeFilter::Nearest).colors);
	}

	#[test]
	fn rowMajorColorLayout() {
		// Left half white, right half red, so a row-major walk alternates every two colors.
		let image = RgbImage::from_fn(4, 2, |x, _| if x < 2 { Rgb([250, 250, 250]) } else { Rgb([230, 10, 5]) });
		let [white, red] = [PALETTE[0], PALETTE[5]];
		assert_eq!(prepare(&image, [4, 2], ResizeFilter::Nearest).colors, [white, white, red, red, white, white, red, red]);
	}

	#[test]
	fn normalizesGrayAndAlpha() {
		let gray = normalize(DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([0x88]))));
		assert_eq!(gray.get_pixel(1, 1), &Rgb([0x88, 0x88, 0x88]));
		let translucent = normalize(DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 0]))));
		assert_eq!(translucent.get_pixel(0, 0), &Rgb([1, 2, 3]));
	}

	#[test]
	fn findsFirstCandidateByName() -> io::Result<()> {
		let dir = tempdir()?;
		for name in ["notes.txt", "b.JPG", "a.png.bak", "c.png", "a.preview.png"] {
			File::create(dir.path().join(name))?;
		}
		let source = findSourceImage(dir.path(), None).unwrap();
		assert_eq!(source.path, dir.path().join("b.JPG"));
		assert_eq!(source.ignored, [dir.path().join("c.png")]);
		Ok(())
	}

	#[test]
	fn configuredPreviewIsNotACandidate() -> io::Result<()> {
		let dir = tempdir()?;
		for name in ["a_out.png", "photo.jpg"] {
			File::create(dir.path().join(name))?;
		}
		let source = findSourceImage(dir.path(), Some(&dir.path().join("a_out.png"))).unwrap();
		assert_eq!(source.path, dir.path().join("photo.jpg"));
		assert!(source.ignored.is_empty());
		let source = findSourceImage(dir.path(), Some(&dir.path().join("missing.png"))).unwrap();
		assert_eq!(source.path, dir.path().join("a_out.png"));
		Ok(())
	}

	#[test]
	fn emptyDirectoryHasNoImage() -> io::Result<()> {
		let dir = tempdir()?;
		File::create(dir.path().join("readme.md"))?;
		assert!(matches!(findSourceImage(dir.path(), None), Err(Error::NoImageFound { .. })));
		Ok(())
	}

	#[test]
	fn previewRoundTripsThroughDisk() -> io::Result<()> {
		let dir = tempdir()?;
		let source = dir.path().join("cat.jpg");
		let prepared = prepare(&gradient(9, 9), [3, 3], ResizeFilter::Nearest);
		let previewPath = defaultPreviewPath(&source);
		assert_eq!(previewPath, dir.path().join("cat.preview.png"));
		savePreview(&prepared.preview, &previewPath).unwrap();
		assert_eq!(loadImage(&previewPath).unwrap(), prepared.preview);
		Ok(())
	}
}

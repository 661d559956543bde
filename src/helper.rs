use crate::compositor::Compositor;
use crate::config::{QrOptions, RenderConfig};
use crate::error::{RenderError, Result};
use crate::matrix::ModuleMatrix;
use crate::surface::PixmapSurface;

use image::{DynamicImage, ImageFormat, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/*---- Utilities ----*/

/// Output encodings supported by [`save_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
	Png,
	Jpeg,
	Webp,
}

impl ExportFormat {
	pub fn extension(self) -> &'static str {
		match self {
			ExportFormat::Png => "png",
			ExportFormat::Jpeg => "jpg",
			ExportFormat::Webp => "webp",
		}
	}

	/// Picks the format from a file extension (`png`, `jpg`/`jpeg`, `webp`).
	pub fn from_path(path: &Path) -> Option<Self> {
		let extension = path.extension()?.to_str()?.to_ascii_lowercase();
		match extension.as_str() {
			"png" => Some(ExportFormat::Png),
			"jpg" | "jpeg" => Some(ExportFormat::Jpeg),
			"webp" => Some(ExportFormat::Webp),
			_ => None,
		}
	}

	fn image_format(self) -> ImageFormat {
		match self {
			ExportFormat::Png => ImageFormat::Png,
			ExportFormat::Jpeg => ImageFormat::Jpeg,
			ExportFormat::Webp => ImageFormat::WebP,
		}
	}
}

/// Renders a styled QR code and waits for its logo, if any.
///
/// The config hook runs after validation, which is where a logo callback can
/// be attached with [`RenderConfig::with_logo_on_load`].
///
/// # Example
///
/// ```
/// use qistyle::config::QrOptions;
/// use qistyle::helper::render_image_with;
///
/// let options = QrOptions::new("Hello, World!");
/// let img = render_image_with(&options, |config| config).unwrap();
/// assert_eq!(img.dimensions(), (170, 170));
/// ```
pub fn render_image_with(
	options: &QrOptions,
	hook: impl FnOnce(RenderConfig) -> RenderConfig,
) -> Result<RgbaImage> {
	let config = hook(RenderConfig::from_options(options)?);
	let matrix = ModuleMatrix::encode(&options.value, options.ec_level)?;

	let mut compositor = Compositor::new(PixmapSurface::new());
	if let Some(pending) = compositor.render(&matrix, &config)? {
		// a failed load leaves the QR code without its logo
		if let Some(loaded) = pending.wait() {
			compositor.complete_logo(loaded);
		}
	}

	let surface = compositor.into_surface();
	surface.to_rgba_image().ok_or(RenderError::Surface { width: 0, height: 0 })
}

/// Renders a styled QR code from host options.
pub fn render_image(options: &QrOptions) -> Result<RgbaImage> {
	render_image_with(options, |config| config)
}

/// Generates a plain black-on-white QR code image buffer from the provided content.
///
/// # Example
///
/// ```
/// use qistyle::helper::generate_image_buffer;
///
/// let img_buffer = generate_image_buffer("Hello, World!").unwrap();
/// ```
pub fn generate_image_buffer(content: &str) -> Result<RgbaImage> {
	render_image(&QrOptions::new(content))
}

/// Saves a rendered image to a file.
///
/// # Arguments
///
/// * `image` - The rendered QR code.
/// * `directory_path` - Optional. The directory path where the image will be saved.
///   If not provided, the default directory is "generated".
/// * `filename` - Optional. The file name without extension. If not provided, a
///   timestamp-based filename will be used.
/// * `format` - Encoding; JPEG has no alpha channel, so transparency is dropped.
///
/// Returns the path that was written.
pub fn save_image(
	image: &RgbaImage,
	directory_path: Option<&str>,
	filename: Option<&str>,
	format: ExportFormat,
) -> Result<PathBuf> {
	let directory_path = directory_path.unwrap_or("generated");
	let filename = match filename {
		Some(name) => name.to_string(),
		None => {
			let since_the_epoch = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
			since_the_epoch.as_millis().to_string()
		},
	};

	// Check if the directory exists, create it if it doesn't
	if !Path::new(directory_path).exists() {
		fs::create_dir_all(directory_path)?;
	}

	let file_path = Path::new(directory_path).join(format!("{}.{}", filename, format.extension()));
	write_image(image, &file_path, format)?;
	log::info!("saved {}", file_path.display());
	Ok(file_path)
}

/// Encodes `image` into `path` with the given format.
pub fn write_image(image: &RgbaImage, path: &Path, format: ExportFormat) -> Result<()> {
	match format {
		ExportFormat::Jpeg => {
			let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
			rgb.save_with_format(path, format.image_format())?
		},
		_ => image.save_with_format(path, format.image_format())?,
	}
	Ok(())
}

//! Logo overlay: placement, background clearing and compositing.
//!
//! Decoding runs off the paint path. [`spawn_load`] returns a [`PendingLogo`]
//! straight away; the host later feeds the finished [`LoadedLogo`] back to the
//! compositor, which paints it only if no newer pass has started meanwhile.
//! A logo that fails to load is dropped without an error and its callback
//! never runs.

use std::fmt;
use std::str::FromStr;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::task::Poll;
use std::thread;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::RgbaImage;
use tiny_skia::{PathBuilder, Pixmap, Rect};

use crate::color::Rgba;
use crate::config::{LogoConfig, LogoPaddingStyle};
use crate::error::{RenderError, Result};
use crate::geometry::Geometry;
use crate::surface::{pixmap_from_image, rect_path, DrawCommand, StrokeStyle};

/// Where the logo image comes from.
#[derive(Clone, PartialEq)]
pub enum LogoSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

impl fmt::Debug for LogoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogoSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            LogoSource::Bytes(bytes) => write!(f, "Bytes(<{} bytes>)", bytes.len()),
        }
    }
}

/// Parses a `logoImage` reference: a `data:` URI carrying the image inline,
/// or anything else as a file path.
impl FromStr for LogoSource {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        let Some(uri) = s.strip_prefix("data:") else {
            return Ok(LogoSource::Path(PathBuf::from(s)));
        };

        let (header, data) = uri
            .split_once(',')
            .ok_or_else(|| RenderError::config("data URI for logoImage has no ',' separator"))?;
        let bytes = if header.ends_with(";base64") {
            STANDARD.decode(data.trim()).map_err(|err| {
                RenderError::config(format!("logoImage is not valid base64: {}", err))
            })?
        } else {
            data.as_bytes().to_vec()
        };
        if bytes.is_empty() {
            return Err(RenderError::config("data URI for logoImage is empty"));
        }
        Ok(LogoSource::Bytes(bytes.into()))
    }
}

/// Fetches and decodes a logo. Runs on a background thread.
pub trait ImageLoader: Send + Sync {
    /// `cross_origin` mirrors the `enableCORS` option; loaders that fetch from
    /// other origins decide what it means.
    fn load(&self, source: &LogoSource, cross_origin: bool) -> Result<RgbaImage>;
}

/// Decodes local files and in-memory bytes with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecodingLoader;

impl ImageLoader for DecodingLoader {
    fn load(&self, source: &LogoSource, cross_origin: bool) -> Result<RgbaImage> {
        if cross_origin {
            log::debug!("cross-origin flag has no effect on local logo sources");
        }
        let image = match source {
            LogoSource::Path(path) => image::open(path)?,
            LogoSource::Bytes(bytes) => image::load_from_memory(bytes)?,
        };
        Ok(image.to_rgba8())
    }
}

/// Width of the bg-colored outline around the background patch.
pub const PATCH_STROKE: f32 = 1.0;

/// Logo rectangle in logical pixels, centered on the drawable area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoPlacement {
    /// Offset from the drawable area's left edge, `(size - width) / 2`.
    pub dx: f32,
    /// Offset from the drawable area's top edge, `(size - height) / 2`.
    pub dy: f32,
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    geometry: Geometry,
}

impl LogoPlacement {
    pub fn new(geometry: &Geometry, logo: &LogoConfig) -> Self {
        LogoPlacement {
            dx: (geometry.size - logo.width) / 2.0,
            dy: (geometry.size - logo.height) / 2.0,
            width: logo.width,
            height: logo.height,
            padding: logo.padding,
            geometry: *geometry,
        }
    }

    /// `(x, y, w, h)` on the canvas, quiet zone included.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let offset = self.geometry.offset();
        (self.dx + offset, self.dy + offset, self.width, self.height)
    }

    /// The logo rectangle grown by `padding` on every side.
    pub fn padded_rect(&self) -> (f32, f32, f32, f32) {
        let (x, y, w, h) = self.rect();
        let p = self.padding;
        (x - p, y - p, w + 2.0 * p, h + 2.0 * p)
    }

    /// Whether the module at `(row, col)` overlaps the padded logo area.
    ///
    /// Not consulted while painting: modules under the logo are always drawn
    /// and only disappear when the background patch covers them.
    pub fn occludes(&self, row: usize, col: usize) -> bool {
        let cell = self.geometry.cell_size();
        let offset = self.geometry.offset();
        let (mx, my) = (col as f32 * cell + offset, row as f32 * cell + offset);
        let (x, y, w, h) = self.padded_rect();
        mx < x + w && mx + cell > x && my < y + h && my + cell > y
    }
}

/// Paint commands for the background patch (if any) and the logo itself.
pub fn overlay_commands(
    placement: &LogoPlacement,
    logo: &LogoConfig,
    bg_color: Rgba,
    image: Arc<Pixmap>,
) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(2);

    if logo.clears_background() {
        let (x, y, w, h) = placement.padded_rect();
        let patch = match logo.padding_style {
            LogoPaddingStyle::Square => rect_path(x, y, w, h),
            LogoPaddingStyle::Circle => {
                Rect::from_xywh(x, y, w, h).and_then(PathBuilder::from_oval)
            }
        };
        match patch {
            Some(path) => commands.push(DrawCommand::Path {
                path,
                fill: Some(bg_color),
                stroke: Some(StrokeStyle { color: bg_color, width: PATCH_STROKE }),
            }),
            None => log::trace!("skipping degenerate logo background patch"),
        }
    }

    let (x, y, w, h) = placement.rect();
    match Rect::from_xywh(x, y, w, h) {
        Some(rect) => commands.push(DrawCommand::Image { image, rect, opacity: logo.opacity }),
        None => log::trace!("skipping logo with degenerate rect {}x{}", w, h),
    }
    commands
}

/// A decoded logo, tagged with the pass that requested it.
#[derive(Debug, Clone)]
pub struct LoadedLogo {
    pub generation: u64,
    pub image: Arc<Pixmap>,
    pub logo: LogoConfig,
    pub placement: LogoPlacement,
    pub bg_color: Rgba,
}

/// A logo still being decoded.
#[derive(Debug)]
pub struct PendingLogo {
    generation: u64,
    receiver: Receiver<Option<Pixmap>>,
    logo: LogoConfig,
    placement: LogoPlacement,
    bg_color: Rgba,
}

impl PendingLogo {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Checks for completion without blocking. `Ready(None)` means the load failed.
    pub fn poll(&self) -> Poll<Option<LoadedLogo>> {
        match self.receiver.try_recv() {
            Ok(image) => Poll::Ready(image.map(|image| self.finish(image))),
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => Poll::Ready(None),
        }
    }

    /// Blocks until decoding finishes. `None` means the load failed.
    pub fn wait(self) -> Option<LoadedLogo> {
        let image = self.receiver.recv().ok().flatten()?;
        Some(self.finish(image))
    }

    fn finish(&self, image: Pixmap) -> LoadedLogo {
        LoadedLogo {
            generation: self.generation,
            image: Arc::new(image),
            logo: self.logo.clone(),
            placement: self.placement,
            bg_color: self.bg_color,
        }
    }
}

/// Starts decoding `logo` on a background thread.
pub fn spawn_load(
    loader: Arc<dyn ImageLoader>,
    logo: &LogoConfig,
    placement: LogoPlacement,
    bg_color: Rgba,
    generation: u64,
) -> PendingLogo {
    let (sender, receiver) = mpsc::channel();
    let source = logo.source.clone();
    let cross_origin = logo.cross_origin;

    thread::spawn(move || {
        let decoded = loader
            .load(&source, cross_origin)
            .and_then(|image| pixmap_from_image(&image));
        let image = match decoded {
            Ok(image) => Some(image),
            Err(err) => {
                log::warn!("logo {:?} not painted: {}", source, err);
                None
            }
        };
        // the pass may have been dropped already
        let _ = sender.send(image);
    });

    PendingLogo { generation, receiver, logo: logo.clone(), placement, bg_color }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Arc<[u8]> {
        let image = RgbaImage::from_pixel(width, height, image::Rgba(color));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner().into()
    }

    fn logo(width: f32, height: f32) -> LogoConfig {
        LogoConfig {
            source: LogoSource::Bytes(png_bytes(2, 2, [255, 0, 0, 255])),
            width,
            height,
            opacity: 0.5,
            padding: 0.0,
            padding_style: LogoPaddingStyle::Square,
            remove_behind: false,
            cross_origin: false,
            on_load: None,
        }
    }

    #[test]
    fn test_logo_is_centered() {
        let geometry = Geometry::new(150.0, 10.0, 1.0, 21);
        let placement = LogoPlacement::new(&geometry, &logo(30.0, 20.0));
        assert_eq!((placement.dx, placement.dy), (60.0, 65.0));
        assert_eq!(placement.rect(), (70.0, 75.0, 30.0, 20.0));
    }

    #[test]
    fn test_no_patch_without_padding_or_removal() {
        let geometry = Geometry::new(150.0, 10.0, 1.0, 21);
        let config = logo(30.0, 30.0);
        let placement = LogoPlacement::new(&geometry, &config);
        let image = Arc::new(Pixmap::new(2, 2).unwrap());
        let commands = overlay_commands(&placement, &config, Rgba::WHITE, image);

        assert_eq!(commands.len(), 1);
        match &commands[0] {
            DrawCommand::Image { rect, opacity, .. } => {
                assert_eq!((rect.x(), rect.y(), rect.width()), (70.0, 70.0, 30.0));
                assert_eq!(*opacity, 0.5);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_circle_patch_under_logo() {
        let geometry = Geometry::new(150.0, 10.0, 1.0, 21);
        let config = LogoConfig {
            padding: 5.0,
            padding_style: LogoPaddingStyle::Circle,
            remove_behind: true,
            ..logo(30.0, 30.0)
        };
        let placement = LogoPlacement::new(&geometry, &config);
        let image = Arc::new(Pixmap::new(2, 2).unwrap());
        let commands = overlay_commands(&placement, &config, Rgba::rgb(1, 2, 3), image);

        assert_eq!(commands.len(), 2);
        match &commands[0] {
            DrawCommand::Path { path, fill, stroke } => {
                let bounds = path.bounds();
                assert!((bounds.x() - 65.0).abs() < 1e-3);
                assert!((bounds.width() - 40.0).abs() < 1e-3);
                assert_eq!(*fill, Some(Rgba::rgb(1, 2, 3)));
                assert_eq!(
                    *stroke,
                    Some(StrokeStyle { color: Rgba::rgb(1, 2, 3), width: PATCH_STROKE })
                );
                // an ellipse, not a rectangle
                assert!(path.segments().count() > 5);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(matches!(commands[1], DrawCommand::Image { .. }));
    }

    #[test]
    fn test_occlusion_predicate() {
        let geometry = Geometry::new(210.0, 0.0, 1.0, 21);
        let placement = LogoPlacement::new(&geometry, &logo(30.0, 30.0));
        assert!(placement.occludes(10, 10));
        assert!(placement.occludes(9, 11));
        assert!(!placement.occludes(8, 10));
        assert!(!placement.occludes(0, 0));
    }

    #[test]
    fn test_load_and_wait() {
        let geometry = Geometry::new(150.0, 10.0, 1.0, 21);
        let config = logo(30.0, 30.0);
        let placement = LogoPlacement::new(&geometry, &config);
        let pending = spawn_load(Arc::new(DecodingLoader), &config, placement, Rgba::WHITE, 7);
        assert_eq!(pending.generation(), 7);

        let loaded = pending.wait().unwrap();
        assert_eq!(loaded.generation, 7);
        assert_eq!((loaded.image.width(), loaded.image.height()), (2, 2));
    }

    #[test]
    fn test_undecodable_logo_yields_nothing() {
        let geometry = Geometry::new(150.0, 10.0, 1.0, 21);
        let config = LogoConfig {
            source: LogoSource::Bytes(Arc::from(&b"not an image"[..])),
            ..logo(30.0, 30.0)
        };
        let placement = LogoPlacement::new(&geometry, &config);
        let pending = spawn_load(Arc::new(DecodingLoader), &config, placement, Rgba::WHITE, 1);
        assert!(pending.wait().is_none());
    }

    #[test]
    fn test_missing_file_yields_nothing() {
        let geometry = Geometry::new(150.0, 10.0, 1.0, 21);
        let config = LogoConfig {
            source: LogoSource::Path("does/not/exist.png".into()),
            ..logo(30.0, 30.0)
        };
        let placement = LogoPlacement::new(&geometry, &config);
        let pending = spawn_load(Arc::new(DecodingLoader), &config, placement, Rgba::WHITE, 1);
        assert!(pending.wait().is_none());
    }

    #[test]
    fn test_source_from_path() {
        let source: LogoSource = "assets/logo.png".parse().unwrap();
        assert_eq!(source, LogoSource::Path(PathBuf::from("assets/logo.png")));
    }

    #[test]
    fn test_source_from_base64_data_uri() {
        let png = png_bytes(3, 3, [0, 0, 255, 255]);
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(&png[..]));
        let source: LogoSource = uri.parse().unwrap();
        assert_eq!(source, LogoSource::Bytes(png));

        let decoded = DecodingLoader.load(&source, false).unwrap();
        assert_eq!(decoded.dimensions(), (3, 3));
    }

    #[test]
    fn test_malformed_data_uri_rejected() {
        assert!("data:image/png;base64,@@@".parse::<LogoSource>().is_err());
        assert!("data:image/png;base64".parse::<LogoSource>().is_err());
        assert!("data:image/png;base64,".parse::<LogoSource>().is_err());
    }
}

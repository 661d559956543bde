//! Raster surfaces and the draw commands they accept.
//!
//! Every paint is a self-contained [`DrawCommand`]: geometry plus the colors,
//! stroke width and opacity it needs. A surface never carries pen state from
//! one command to the next, so eye, module and logo paints can interleave
//! without leaking alpha or line widths into each other.

use std::sync::Arc;

use image::{Rgba as ImageRgba, RgbaImage};
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke,
    Transform,
};

use crate::color::Rgba;
use crate::error::{RenderError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
}

/// One immutable paint operation, in logical pixels.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Fill the whole canvas.
    Background(Rgba),
    /// Fill and/or stroke a path. Fill happens first.
    Path { path: Path, fill: Option<Rgba>, stroke: Option<StrokeStyle> },
    /// Composite an image scaled into `rect` at `opacity`.
    Image { image: Arc<Pixmap>, rect: Rect, opacity: f32 },
}

impl DrawCommand {
    pub fn fill(path: Path, color: Rgba) -> Self {
        DrawCommand::Path { path, fill: Some(color), stroke: None }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            DrawCommand::Path { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// An immediate-mode drawing target exclusively owned by one render pass.
pub trait Surface {
    /// (Re)creates the backing store for a `width`×`height` logical canvas,
    /// scaled uniformly by `pixel_ratio`. Discards any previous paint.
    fn begin(&mut self, width: f32, height: f32, pixel_ratio: f32) -> Result<()>;

    fn draw(&mut self, command: &DrawCommand);
}

/// Anti-aliased rasterization into a tiny-skia pixmap.
#[derive(Debug, Default)]
pub struct PixmapSurface {
    pixmap: Option<Pixmap>,
    transform: Transform,
    extent: (f32, f32),
}

impl PixmapSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Physical pixel at `(x, y)`, demultiplied.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let color = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some(Rgba::new(color.red(), color.green(), color.blue(), color.alpha()))
    }

    /// Copies the physical pixels into a non-premultiplied `image` buffer.
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        let pixmap = self.pixmap.as_ref()?;
        let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
        for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
            let color = src.demultiply();
            *dst = ImageRgba([color.red(), color.green(), color.blue(), color.alpha()]);
        }
        Some(image)
    }

    fn paint(color: Rgba) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        paint
    }
}

impl Surface for PixmapSurface {
    fn begin(&mut self, width: f32, height: f32, pixel_ratio: f32) -> Result<()> {
        let physical_width = (width * pixel_ratio).ceil() as u32;
        let physical_height = (height * pixel_ratio).ceil() as u32;
        let pixmap = Pixmap::new(physical_width, physical_height).ok_or(RenderError::Surface {
            width: physical_width,
            height: physical_height,
        })?;

        self.pixmap = Some(pixmap);
        self.transform = Transform::from_scale(pixel_ratio, pixel_ratio);
        self.extent = (width, height);
        Ok(())
    }

    fn draw(&mut self, command: &DrawCommand) {
        let transform = self.transform;
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };

        match command {
            DrawCommand::Background(color) => {
                if let Some(rect) = Rect::from_xywh(0.0, 0.0, self.extent.0, self.extent.1) {
                    pixmap.fill_rect(rect, &Self::paint(*color), transform, None);
                }
            }
            DrawCommand::Path { path, fill, stroke } => {
                if let Some(color) = fill {
                    let paint = Self::paint(*color);
                    pixmap.fill_path(path, &paint, FillRule::Winding, transform, None);
                }
                if let Some(style) = stroke {
                    let stroke = Stroke { width: style.width, ..Stroke::default() };
                    pixmap.stroke_path(path, &Self::paint(style.color), &stroke, transform, None);
                }
            }
            DrawCommand::Image { image, rect, opacity } => {
                let source: &Pixmap = image;
                let sx = rect.width() / source.width() as f32;
                let sy = rect.height() / source.height() as f32;
                let placement = transform.pre_translate(rect.x(), rect.y()).pre_scale(sx, sy);
                let paint = PixmapPaint {
                    opacity: *opacity,
                    quality: FilterQuality::Bilinear,
                    ..PixmapPaint::default()
                };
                pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, placement, None);
            }
        }
    }
}

/// Keeps every command of the current pass, in paint order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl Surface for RecordingSurface {
    fn begin(&mut self, width: f32, height: f32, pixel_ratio: f32) -> Result<()> {
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
        self.commands.clear();
        Ok(())
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.commands.push(command.clone());
    }
}

/// Converts a decoded image into a premultiplied pixmap.
pub fn pixmap_from_image(image: &RgbaImage) -> Result<Pixmap> {
    let (width, height) = image.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Surface { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Axis-aligned rectangle path, `None` when the rectangle is empty or not finite.
pub fn rect_path(x: f32, y: f32, width: f32, height: f32) -> Option<Path> {
    Rect::from_xywh(x, y, width, height).map(PathBuilder::from_rect)
}

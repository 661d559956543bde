//! Rounded-square paths, used by the finder eyes and the fluid module style.

use serde::Deserialize;
use tiny_skia::{Path, PathBuilder};

use crate::color::Rgba;
use crate::surface::{DrawCommand, StrokeStyle};

/// Corner radii, either one value for all corners or four values in
/// top-left, top-right, bottom-right, bottom-left order.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CornerRadii {
    Uniform(f32),
    PerCorner([f32; 4]),
}

impl Default for CornerRadii {
    fn default() -> Self {
        CornerRadii::Uniform(0.0)
    }
}

impl CornerRadii {
    /// Expands to four corners, each clamped independently into `[0, size / 2]`.
    pub fn normalize(&self, size: f32) -> [f32; 4] {
        let limit = (size / 2.0).max(0.0);
        let corners = match *self {
            CornerRadii::Uniform(r) => [r; 4],
            CornerRadii::PerCorner(corners) => corners,
        };
        // NaN collapses to 0
        corners.map(|r| if r > 0.0 { r.min(limit) } else { 0.0 })
    }
}

/// Closed rectangle path with a quadratic curve at every corner whose radius
/// is non-zero. Radii are used as given.
pub fn rounded_rect_path(x: f32, y: f32, width: f32, height: f32, radii: [f32; 4]) -> Option<Path> {
    let [tl, tr, br, bl] = radii;
    let (right, bottom) = (x + width, y + height);

    let mut pb = PathBuilder::new();
    pb.move_to(x + tl, y);

    pb.line_to(right - tr, y);
    if tr > 0.0 {
        pb.quad_to(right, y, right, y + tr);
    } else {
        pb.line_to(right, y);
    }

    pb.line_to(right, bottom - br);
    if br > 0.0 {
        pb.quad_to(right, bottom, right - br, bottom);
    } else {
        pb.line_to(right, bottom);
    }

    pb.line_to(x + bl, bottom);
    if bl > 0.0 {
        pb.quad_to(x, bottom, x, bottom - bl);
    } else {
        pb.line_to(x, bottom);
    }

    pb.line_to(x, y + tl);
    if tl > 0.0 {
        pb.quad_to(x, y, x + tl, y);
    }

    pb.close();
    pb.finish()
}

/// A stroked, optionally filled rounded square whose stroke sits inside the
/// nominal box: the outer edge of the line, not its centerline, touches the
/// `size`×`size` square at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRect {
    pub line_width: f32,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgba,
    pub radii: CornerRadii,
    pub fill: bool,
}

impl RoundedRect {
    /// Box of the stroke centerline: `(x, y, size)`.
    pub fn centerline(&self) -> (f32, f32, f32) {
        let half = self.line_width / 2.0;
        (self.x + half, self.y + half, self.size - self.line_width)
    }

    /// Builds the draw command, or `None` when the geometry cannot form a path.
    /// A box no larger than the line width still yields a (degenerate) path.
    pub fn to_command(&self) -> Option<DrawCommand> {
        let (x, y, size) = self.centerline();
        let radii = self.radii.normalize(size);
        let path = rounded_rect_path(x, y, size, size, radii)?;
        Some(DrawCommand::Path {
            path,
            fill: self.fill.then_some(self.color),
            stroke: Some(StrokeStyle { color: self.color, width: self.line_width }),
        })
    }
}

//! Module painting: one shape per dark module outside the finder zones.
//!
//! Each [`QrStyle`] maps to a shape function with the same signature, so the
//! dispatch is an exhaustive `match` and every style can be tested alone.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use serde::Deserialize;
use tiny_skia::{Path, PathBuilder};

use crate::color::Rgba;
use crate::geometry::Geometry;
use crate::matrix::ModuleMatrix;
use crate::path::{rounded_rect_path, CornerRadii};
use crate::surface::{rect_path, DrawCommand};

/// Shape drawn for each dark module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrStyle {
    #[default]
    Squares,
    Dots,
    Hearts,
    Stars,
    Diamonds,
    Octagons,
    Pentagons,
    Triangles,
    Fluid,
}

impl QrStyle {
    pub const ALL: [QrStyle; 9] = [
        QrStyle::Squares,
        QrStyle::Dots,
        QrStyle::Hearts,
        QrStyle::Stars,
        QrStyle::Diamonds,
        QrStyle::Octagons,
        QrStyle::Pentagons,
        QrStyle::Triangles,
        QrStyle::Fluid,
    ];

    pub fn shape(self) -> ShapeFn {
        match self {
            QrStyle::Squares => square,
            QrStyle::Dots => dot,
            QrStyle::Hearts => heart,
            QrStyle::Stars => star,
            QrStyle::Diamonds => diamond,
            QrStyle::Octagons => octagon,
            QrStyle::Pentagons => pentagon,
            QrStyle::Triangles => triangle,
            QrStyle::Fluid => fluid,
        }
    }
}

/// Everything a shape function may look at for one module.
pub struct Cell<'a> {
    pub matrix: &'a ModuleMatrix,
    pub geometry: &'a Geometry,
    pub row: usize,
    pub col: usize,
}

impl Cell<'_> {
    fn center(&self) -> (f32, f32) {
        self.geometry.cell_center(self.row, self.col)
    }

    fn dark_at(&self, d_row: isize, d_col: isize) -> bool {
        self.matrix.get(self.row as isize + d_row, self.col as isize + d_col)
    }
}

pub type ShapeFn = fn(&Cell<'_>) -> Option<Path>;

/// Paint commands for every dark module for which `excluded(row, col)` is false.
pub fn module_commands(
    style: QrStyle,
    matrix: &ModuleMatrix,
    geometry: &Geometry,
    color: Rgba,
    excluded: &dyn Fn(usize, usize) -> bool,
) -> Vec<DrawCommand> {
    let shape = style.shape();
    let n = matrix.size();
    let mut commands = Vec::new();

    for row in 0..n {
        for col in 0..n {
            if excluded(row, col) || !matrix.get(row as isize, col as isize) {
                continue;
            }
            let cell = Cell { matrix, geometry, row, col };
            match shape(&cell) {
                Some(path) => commands.push(DrawCommand::fill(path, color)),
                None => log::trace!("skipping degenerate {:?} module at ({}, {})", style, row, col),
            }
        }
    }
    commands
}

fn square(cell: &Cell<'_>) -> Option<Path> {
    let (x, y, w, h) = cell.geometry.cell_rect(cell.row, cell.col);
    rect_path(x, y, w, h)
}

fn dot(cell: &Cell<'_>) -> Option<Path> {
    let (cx, cy) = cell.center();
    let radius = cell.geometry.cell_size() / 2.0;
    PathBuilder::from_circle(cx, cy, radius * 0.75)
}

fn heart(cell: &Cell<'_>) -> Option<Path> {
    let (cx, cy) = cell.center();
    let s = cell.geometry.cell_size() / 4.0;

    let mut pb = PathBuilder::new();
    pb.move_to(cx, cy + 1.8 * s);
    pb.cubic_to(cx - 2.0 * s, cy + 0.4 * s, cx - 2.0 * s, cy - 2.0 * s, cx, cy - 0.9 * s);
    pb.cubic_to(cx + 2.0 * s, cy - 2.0 * s, cx + 2.0 * s, cy + 0.4 * s, cx, cy + 1.8 * s);
    pb.close();
    pb.finish()
}

fn star(cell: &Cell<'_>) -> Option<Path> {
    let (cx, cy) = cell.center();
    let outer = cell.geometry.cell_size() / 2.0;
    let inner = outer / 2.0;
    let points = (0..10).map(|i| {
        let radius = if i % 2 == 0 { outer } else { inner };
        let angle = -FRAC_PI_2 + i as f32 * PI / 5.0;
        (cx + radius * angle.cos(), cy + radius * angle.sin())
    });
    polygon(points)
}

fn diamond(cell: &Cell<'_>) -> Option<Path> {
    let (cx, cy) = cell.center();
    let half = cell.geometry.cell_size() / 2.0;
    polygon([(cx, cy - half), (cx + half, cy), (cx, cy + half), (cx - half, cy)])
}

fn octagon(cell: &Cell<'_>) -> Option<Path> {
    regular_polygon(cell, 8)
}

fn pentagon(cell: &Cell<'_>) -> Option<Path> {
    regular_polygon(cell, 5)
}

fn triangle(cell: &Cell<'_>) -> Option<Path> {
    regular_polygon(cell, 3)
}

/// Cell rectangle with a corner rounded only where both edges meeting there
/// face light modules. Corners next to a dark neighbour stay square so
/// touching modules fuse into one region.
fn fluid(cell: &Cell<'_>) -> Option<Path> {
    let (x, y, w, h) = cell.geometry.cell_rect(cell.row, cell.col);
    let radius = cell.geometry.cell_size() / 1.5;

    let up = cell.dark_at(-1, 0);
    let down = cell.dark_at(1, 0);
    let left = cell.dark_at(0, -1);
    let right = cell.dark_at(0, 1);
    let corner = |a: bool, b: bool| if a || b { 0.0 } else { radius };

    let radii = CornerRadii::PerCorner([
        corner(up, left),
        corner(up, right),
        corner(down, right),
        corner(down, left),
    ]);
    rounded_rect_path(x, y, w, h, radii.normalize(w.min(h)))
}

/// `n` vertices on a circle of radius `cell / 2`, starting at angle 0.
fn regular_polygon(cell: &Cell<'_>, n: usize) -> Option<Path> {
    let (cx, cy) = cell.center();
    let radius = cell.geometry.cell_size() / 2.0;
    let step = TAU / n as f32;
    polygon((0..n).map(|i| {
        let angle = i as f32 * step;
        (cx + radius * angle.cos(), cy + radius * angle.sin())
    }))
}

fn polygon(points: impl IntoIterator<Item = (f32, f32)>) -> Option<Path> {
    let mut points = points.into_iter();
    let (x, y) = points.next()?;
    let mut pb = PathBuilder::new();
    pb.move_to(x, y);
    for (x, y) in points {
        pb.line_to(x, y);
    }
    pb.close();
    pb.finish()
}

//! Finder pattern ("eye") painting.
//!
//! Each eye is two rounded squares: a stroked 7-module ring and a filled
//! 3-module pupil inset by 2 modules. Ring and pupil have their own radii
//! and colors.

use crate::color::Rgba;
use crate::geometry::{Geometry, FINDER_SPAN};
use crate::path::{CornerRadii, RoundedRect};
use crate::surface::DrawCommand;

const PUPIL_SPAN: f32 = 3.0;
const PUPIL_INSET: f32 = 2.0;

/// Fully resolved appearance of one eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeStyle {
    pub outer_radius: CornerRadii,
    pub inner_radius: CornerRadii,
    pub outer_color: Rgba,
    pub inner_color: Rgba,
}

impl EyeStyle {
    /// Square corners, single color.
    pub fn plain(color: Rgba) -> Self {
        EyeStyle {
            outer_radius: CornerRadii::default(),
            inner_radius: CornerRadii::default(),
            outer_color: color,
            inner_color: color,
        }
    }
}

/// The ring and pupil of one eye anchored at module `(row, col)`.
pub fn eye_rects(
    geometry: &Geometry,
    row: usize,
    col: usize,
    style: &EyeStyle,
) -> [RoundedRect; 2] {
    let cell = geometry.cell_size();
    let line_width = cell.ceil();
    let x = geometry.offset() + col as f32 * cell;
    let y = geometry.offset() + row as f32 * cell;

    let ring = RoundedRect {
        line_width,
        x,
        y,
        size: FINDER_SPAN as f32 * cell,
        color: style.outer_color,
        radii: style.outer_radius,
        fill: false,
    };
    let pupil = RoundedRect {
        line_width,
        x: x + PUPIL_INSET * cell,
        y: y + PUPIL_INSET * cell,
        size: PUPIL_SPAN * cell,
        color: style.inner_color,
        radii: style.inner_radius,
        fill: true,
    };
    [ring, pupil]
}

/// Paint commands for all three eyes, in eye index order, ring before pupil.
pub fn eye_commands(geometry: &Geometry, styles: &[EyeStyle; 3]) -> Vec<DrawCommand> {
    geometry
        .finder_zones()
        .iter()
        .zip(styles)
        .flat_map(|(zone, style)| eye_rects(geometry, zone.row, zone.col, style))
        .filter_map(|rect| {
            let command = rect.to_command();
            if command.is_none() {
                log::trace!("skipping degenerate eye square at ({}, {})", rect.x, rect.y);
            }
            command
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::StrokeStyle;

    fn fg() -> Rgba {
        Rgba::rgb(17, 17, 17)
    }

    #[test]
    fn test_ring_and_pupil_spans() {
        let geometry = Geometry::new(210.0, 10.0, 1.0, 21);
        for zone in geometry.finder_zones() {
            let [ring, pupil] = eye_rects(&geometry, zone.row, zone.col, &EyeStyle::plain(fg()));
            assert_eq!(ring.size, 70.0);
            assert_eq!(pupil.size, 30.0);
            assert_eq!(pupil.x - ring.x, 20.0);
            assert_eq!(pupil.y - ring.y, 20.0);
            assert_eq!(ring.line_width, 10.0);
            assert!(!ring.fill);
            assert!(pupil.fill);
        }
    }

    #[test]
    fn test_line_width_rounds_up() {
        let geometry = Geometry::new(150.0, 10.0, 1.0, 21);
        let [ring, _] = eye_rects(&geometry, 0, 0, &EyeStyle::plain(fg()));
        assert_eq!(ring.line_width, 8.0);
    }

    #[test]
    fn test_eyes_anchor_at_three_corners() {
        let geometry = Geometry::new(210.0, 10.0, 1.0, 21);
        let commands = eye_commands(&geometry, &[EyeStyle::plain(fg()); 3]);
        assert_eq!(commands.len(), 6);

        let origin = |i: usize| {
            let b = commands[i].path().unwrap().bounds();
            (b.x(), b.y())
        };
        // rings are inset by half the 10px stroke
        assert_eq!(origin(0), (15.0, 15.0));
        assert_eq!(origin(2), (155.0, 15.0));
        assert_eq!(origin(4), (15.0, 155.0));
    }

    #[test]
    fn test_per_ring_colors() {
        let geometry = Geometry::new(210.0, 10.0, 1.0, 21);
        let red = Rgba::rgb(255, 0, 0);
        let blue = Rgba::rgb(0, 0, 255);
        let first = EyeStyle { outer_color: blue, inner_color: red, ..EyeStyle::plain(fg()) };
        let styles = [first, EyeStyle::plain(fg()), EyeStyle::plain(fg())];
        let commands = eye_commands(&geometry, &styles);

        let paint = |i: usize| match &commands[i] {
            DrawCommand::Path { fill, stroke, .. } => (*fill, stroke.map(|s: StrokeStyle| s.color)),
            other => panic!("unexpected command {:?}", other),
        };
        assert_eq!(paint(0), (None, Some(blue)));
        assert_eq!(paint(1), (Some(red), Some(red)));
        for i in 2..6 {
            assert_eq!(paint(i).1, Some(fg()));
        }
    }
}

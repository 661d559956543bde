//! Pixel geometry of one render pass and the three finder zones.

/// Side of a finder pattern, in modules.
pub const FINDER_SPAN: usize = 7;

/// Logical-pixel layout derived from the configured size, quiet zone and grid size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Drawable extent of the grid, excluding the quiet zone.
    pub size: f32,
    pub quiet_zone: f32,
    pub pixel_ratio: f32,
    /// Modules per side.
    pub modules: usize,
}

impl Geometry {
    pub fn new(size: f32, quiet_zone: f32, pixel_ratio: f32, modules: usize) -> Self {
        Geometry { size, quiet_zone, pixel_ratio, modules }
    }

    /// `size / N`. NaN or infinite when the grid is empty; painting then degenerates.
    pub fn cell_size(&self) -> f32 {
        self.size / self.modules as f32
    }

    pub fn offset(&self) -> f32 {
        self.quiet_zone
    }

    /// Logical side of the whole canvas, quiet zone included.
    pub fn canvas_extent(&self) -> f32 {
        self.size + 2.0 * self.quiet_zone
    }

    /// Center of the module at `(row, col)` in logical pixels.
    pub fn cell_center(&self, row: usize, col: usize) -> (f32, f32) {
        let cell = self.cell_size();
        let offset = self.offset();
        (col as f32 * cell + cell / 2.0 + offset, row as f32 * cell + cell / 2.0 + offset)
    }

    /// Seam-free rectangle `(x, y, w, h)` for the module at `(row, col)`.
    ///
    /// Origins are rounded and extents run from the floor of the cell start to
    /// the ceiling of the next cell start, so neighbouring cells always overlap
    /// on whole pixels.
    pub fn cell_rect(&self, row: usize, col: usize) -> (f32, f32, f32, f32) {
        let cell = self.cell_size();
        let offset = self.offset();
        let span = |i: usize| ((i + 1) as f32 * cell).ceil() - (i as f32 * cell).floor();
        (
            (col as f32 * cell).round() + offset,
            (row as f32 * cell).round() + offset,
            span(col),
            span(row),
        )
    }

    pub fn finder_zones(&self) -> [FinderZone; 3] {
        FinderZone::all(self.modules)
    }
}

/// A 7×7 block of modules owned by the eye renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinderZone {
    pub row: usize,
    pub col: usize,
}

impl FinderZone {
    /// Top-left, top-right and bottom-left zones of an `n`×`n` grid, in eye index order.
    pub fn all(n: usize) -> [FinderZone; 3] {
        let far = n.saturating_sub(FINDER_SPAN);
        [
            FinderZone { row: 0, col: 0 },
            FinderZone { row: 0, col: far },
            FinderZone { row: far, col: 0 },
        ]
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row..self.row + FINDER_SPAN).contains(&row)
            && (self.col..self.col + FINDER_SPAN).contains(&col)
    }
}

/// Whether `(row, col)` belongs to any of `zones`.
pub fn in_finder_zone(zones: &[FinderZone], row: usize, col: usize) -> bool {
    zones.iter().any(|zone| zone.contains(row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_extent_includes_quiet_zone() {
        let geometry = Geometry::new(150.0, 10.0, 1.0, 21);
        assert_eq!(geometry.canvas_extent(), 170.0);
        assert!((geometry.cell_size() - 150.0 / 21.0).abs() < 1e-6);
    }

    #[test]
    fn test_cell_rects_overlap_on_whole_pixels() {
        let geometry = Geometry::new(150.0, 10.0, 1.0, 21);
        for i in 0..20 {
            let (x, _, w, _) = geometry.cell_rect(0, i);
            let (next_x, _, _, _) = geometry.cell_rect(0, i + 1);
            assert_eq!(x.fract(), 0.0);
            assert_eq!(w.fract(), 0.0);
            assert!(x + w >= next_x, "gap between column {} and {}", i, i + 1);
        }
    }

    #[test]
    fn test_finder_zones_of_version_one() {
        let zones = FinderZone::all(21);
        assert_eq!(zones[1], FinderZone { row: 0, col: 14 });
        assert_eq!(zones[2], FinderZone { row: 14, col: 0 });

        assert!(in_finder_zone(&zones, 6, 6));
        assert!(in_finder_zone(&zones, 0, 20));
        assert!(in_finder_zone(&zones, 20, 6));
        assert!(!in_finder_zone(&zones, 7, 7));
        assert!(!in_finder_zone(&zones, 20, 20));
        assert!(!in_finder_zone(&zones, 6, 13));
    }
}

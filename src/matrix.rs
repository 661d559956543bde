//! The module grid handed to the renderer, and the encoder that produces it.
//!
//! Encoding (payload segmentation, error correction, masking) is not done
//! here; any type implementing [`Encoder`] can feed the renderer. The bundled
//! [`QrEncoder`] delegates to the `qrcode` crate.

use serde::Deserialize;

use crate::error::Result;

/// QR error correction level, from lowest (L, ~7%) to highest (H, ~30%) redundancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum EcLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// A square grid of dark and light modules.
pub trait Encoder {
    /// Side length of the grid, in modules.
    fn module_count(&self) -> usize;

    /// Whether the module at `(row, col)` is dark. Both indices are `< module_count()`.
    fn is_dark(&self, row: usize, col: usize) -> bool;
}

/// Encodes a payload with the `qrcode` crate.
pub struct QrEncoder {
    width: usize,
    colors: Vec<qrcode::Color>,
}

impl QrEncoder {
    /// Encodes `value` at the given error correction level. The smallest
    /// version that fits is picked by the `qrcode` crate.
    pub fn new(value: &str, ec_level: EcLevel) -> Result<Self> {
        let code = qrcode::QrCode::with_error_correction_level(value.as_bytes(), ec_level.into())?;
        Ok(QrEncoder { width: code.width(), colors: code.to_colors() })
    }
}

impl Encoder for QrEncoder {
    fn module_count(&self) -> usize {
        self.width
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        self.colors[row * self.width + col] == qrcode::Color::Dark
    }
}

/// An immutable snapshot of an encoder's grid, owned by one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    size: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    pub fn from_encoder<E: Encoder + ?Sized>(encoder: &E) -> Self {
        Self::from_fn(encoder.module_count(), |row, col| encoder.is_dark(row, col))
    }

    /// Builds an `size`×`size` grid where `dark(row, col)` decides each module.
    pub fn from_fn(size: usize, mut dark: impl FnMut(usize, usize) -> bool) -> Self {
        let mut modules = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                modules.push(dark(row, col));
            }
        }
        ModuleMatrix { size, modules }
    }

    /// Encodes `value` with [`QrEncoder`] and snapshots the result.
    pub fn encode(value: &str, ec_level: EcLevel) -> Result<Self> {
        Ok(Self::from_encoder(&QrEncoder::new(value, ec_level)?))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether `(row, col)` is dark. Coordinates outside the grid are light,
    /// so neighbour lookups at the border need no special casing.
    pub fn get(&self, row: isize, col: isize) -> bool {
        if row < 0 || col < 0 || row as usize >= self.size || col as usize >= self.size {
            return false;
        }
        self.modules[row as usize * self.size + col as usize]
    }
}

impl Encoder for ModuleMatrix {
    fn module_count(&self) -> usize {
        self.size
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        self.modules[row * self.size + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_one_is_21_modules() {
        let matrix = ModuleMatrix::encode("HELLO WORLD", EcLevel::L).unwrap();
        assert_eq!(matrix.size(), 21);
    }

    #[test]
    fn test_finder_corner_is_dark() {
        let matrix = ModuleMatrix::encode("https://example.com", EcLevel::M).unwrap();
        let n = matrix.size() as isize;
        assert!(matrix.get(0, 0));
        assert!(matrix.get(0, n - 1));
        assert!(matrix.get(n - 1, 0));
        // separator between the finder pattern and the data area
        assert!(!matrix.get(7, 7));
    }

    #[test]
    fn test_out_of_bounds_reads_light() {
        let matrix = ModuleMatrix::from_fn(3, |_, _| true);
        assert!(matrix.get(2, 2));
        assert!(!matrix.get(-1, 0));
        assert!(!matrix.get(0, 3));
    }

    #[test]
    fn test_higher_ec_level_needs_more_modules() {
        let text = "The quick brown fox jumps over the lazy dog";
        let low = ModuleMatrix::encode(text, EcLevel::L).unwrap();
        let high = ModuleMatrix::encode(text, EcLevel::H).unwrap();
        assert!(high.size() > low.size());
    }
}

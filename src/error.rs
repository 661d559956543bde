//! Error type shared by every stage of a render pass.

use thiserror::Error;

/// Errors reported by configuration, encoding, surface allocation and export.
///
/// Painting itself never fails: degenerate geometry produces an empty or
/// malformed paint, and a logo that cannot be decoded is silently skipped.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("QR encoding failed: {0}")]
    Encode(qrcode::types::QrError),

    #[error("cannot allocate a {width}x{height} surface")]
    Surface { width: u32, height: u32 },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed options: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<qrcode::types::QrError> for RenderError {
    fn from(err: qrcode::types::QrError) -> Self {
        RenderError::Encode(err)
    }
}

impl RenderError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        RenderError::InvalidConfig(message.into())
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

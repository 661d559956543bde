//! Options as a host supplies them, and the validated form the renderer uses.
//!
//! [`QrOptions`] accepts the loose shapes hosts tend to send (numbers as
//! strings, one eye spec or three). [`RenderConfig::from_options`] is the only
//! place those are coerced and checked; nothing downstream re-validates.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::color::Rgba;
use crate::error::{RenderError, Result};
use crate::eyes::EyeStyle;
use crate::logo::LogoSource;
use crate::matrix::EcLevel;
use crate::modules::QrStyle;
use crate::path::CornerRadii;

pub const DEFAULT_SIZE: f32 = 150.0;
pub const DEFAULT_QUIET_ZONE: f32 = 10.0;
/// Logo width as a fraction of `size` when none is given.
pub const DEFAULT_LOGO_FRACTION: f32 = 0.2;

/// A number that may arrive as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn coerce(&self, field: &str) -> Result<f32> {
        let value = match self {
            Numeric::Number(n) => *n as f32,
            Numeric::Text(text) => text
                .trim()
                .parse::<f32>()
                .map_err(|_| RenderError::config(format!("{field} is not a number: {text:?}")))?,
        };
        if !value.is_finite() {
            return Err(RenderError::config(format!("{} must be finite", field)));
        }
        Ok(value)
    }
}

/// Either one value shared by all three eyes, or one per eye
/// (top-left, top-right, bottom-left).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PerEye<T> {
    Each([T; 3]),
    All(T),
}

impl<T: Clone> PerEye<T> {
    fn expand(&self) -> [T; 3] {
        match self {
            PerEye::Each(each) => each.clone(),
            PerEye::All(all) => [all.clone(), all.clone(), all.clone()],
        }
    }
}

/// Radius of one eye: shared by ring and pupil, or given per ring.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EyeRadius {
    Both(CornerRadii),
    Split {
        #[serde(default)]
        inner: Option<CornerRadii>,
        #[serde(default)]
        outer: Option<CornerRadii>,
    },
}

/// Color of one eye: shared by ring and pupil, or given per ring.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EyeColor {
    Both(String),
    Split {
        #[serde(default)]
        inner: Option<String>,
        #[serde(default)]
        outer: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoPaddingStyle {
    #[default]
    Square,
    Circle,
}

/// Host-facing options, deserializable from camelCase JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QrOptions {
    pub value: String,
    pub ec_level: EcLevel,
    pub size: Option<Numeric>,
    pub quiet_zone: Option<Numeric>,
    pub bg_color: Option<String>,
    pub fg_color: Option<String>,
    pub qr_style: QrStyle,
    pub eye_radius: Option<PerEye<EyeRadius>>,
    pub eye_color: Option<PerEye<EyeColor>>,
    /// File path, or a `data:image/...;base64,` URI carrying the image inline.
    pub logo_image: Option<String>,
    pub logo_width: Option<Numeric>,
    pub logo_height: Option<Numeric>,
    pub logo_opacity: Option<Numeric>,
    pub logo_padding: Option<Numeric>,
    pub logo_padding_style: LogoPaddingStyle,
    pub remove_qr_code_behind_logo: bool,
    #[serde(rename = "enableCORS")]
    pub enable_cors: bool,
    pub device_pixel_ratio: Option<Numeric>,
    pub id: Option<String>,
    pub style: Option<serde_json::Value>,
}

impl QrOptions {
    pub fn new(value: impl Into<String>) -> Self {
        QrOptions { value: value.into(), ..Self::default() }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Invoked once the logo has been composited.
pub type LogoCallback = Arc<dyn Fn() + Send + Sync>;

/// Validated logo settings.
#[derive(Clone)]
pub struct LogoConfig {
    pub source: LogoSource,
    pub width: f32,
    pub height: f32,
    pub opacity: f32,
    pub padding: f32,
    pub padding_style: LogoPaddingStyle,
    pub remove_behind: bool,
    pub cross_origin: bool,
    pub on_load: Option<LogoCallback>,
}

impl LogoConfig {
    /// Whether a background patch is painted under the logo.
    pub fn clears_background(&self) -> bool {
        self.remove_behind || self.padding > 0.0
    }
}

impl fmt::Debug for LogoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogoConfig")
            .field("source", &self.source)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("opacity", &self.opacity)
            .field("padding", &self.padding)
            .field("padding_style", &self.padding_style)
            .field("remove_behind", &self.remove_behind)
            .field("cross_origin", &self.cross_origin)
            .field("on_load", &self.on_load.is_some())
            .finish()
    }
}

/// Attributes forwarded to the host surface untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceAttributes {
    pub id: Option<String>,
    pub style: Option<serde_json::Value>,
}

/// Everything one render pass needs, already checked.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub size: f32,
    pub quiet_zone: f32,
    pub pixel_ratio: f32,
    pub bg_color: Rgba,
    pub fg_color: Rgba,
    pub style: QrStyle,
    pub eyes: [EyeStyle; 3],
    pub logo: Option<LogoConfig>,
    pub attributes: SurfaceAttributes,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            size: DEFAULT_SIZE,
            quiet_zone: DEFAULT_QUIET_ZONE,
            pixel_ratio: 1.0,
            bg_color: Rgba::WHITE,
            fg_color: Rgba::BLACK,
            style: QrStyle::default(),
            eyes: [EyeStyle::plain(Rgba::BLACK); 3],
            logo: None,
            attributes: SurfaceAttributes::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_options(options: &QrOptions) -> Result<Self> {
        let size = number(&options.size, "size")?.unwrap_or(DEFAULT_SIZE);
        if size <= 0.0 {
            return Err(RenderError::config(format!("size must be positive, got {}", size)));
        }
        let quiet_zone = number(&options.quiet_zone, "quietZone")?.unwrap_or(DEFAULT_QUIET_ZONE);
        if quiet_zone < 0.0 {
            let message = format!("quietZone must not be negative, got {quiet_zone}");
            return Err(RenderError::config(message));
        }
        let pixel_ratio = number(&options.device_pixel_ratio, "devicePixelRatio")?.unwrap_or(1.0);
        if pixel_ratio <= 0.0 {
            let message = format!("devicePixelRatio must be positive, got {pixel_ratio}");
            return Err(RenderError::config(message));
        }

        let bg_color = color(&options.bg_color, Rgba::WHITE)?;
        let fg_color = color(&options.fg_color, Rgba::BLACK)?;
        let eyes = eye_styles(options, fg_color)?;
        let logo = logo_config(options, size)?;

        Ok(RenderConfig {
            size,
            quiet_zone,
            pixel_ratio,
            bg_color,
            fg_color,
            style: options.qr_style,
            eyes,
            logo,
            attributes: SurfaceAttributes { id: options.id.clone(), style: options.style.clone() },
        })
    }

    /// Attaches a callback fired after the logo is composited. No-op without a logo.
    pub fn with_logo_on_load(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        if let Some(logo) = self.logo.as_mut() {
            logo.on_load = Some(Arc::new(callback));
        }
        self
    }
}

fn number(value: &Option<Numeric>, field: &str) -> Result<Option<f32>> {
    value.as_ref().map(|n| n.coerce(field)).transpose()
}

fn color(value: &Option<String>, default: Rgba) -> Result<Rgba> {
    value.as_deref().map_or(Ok(default), |text| text.parse())
}

fn eye_styles(options: &QrOptions, fg_color: Rgba) -> Result<[EyeStyle; 3]> {
    let radii = options.eye_radius.as_ref().map(PerEye::expand);
    let colors = options.eye_color.as_ref().map(PerEye::expand);

    let mut styles = [EyeStyle::plain(fg_color); 3];
    for (i, style) in styles.iter_mut().enumerate() {
        match radii.as_ref().map(|r| r[i]) {
            Some(EyeRadius::Both(radius)) => {
                style.outer_radius = radius;
                style.inner_radius = radius;
            }
            Some(EyeRadius::Split { inner, outer }) => {
                style.outer_radius = outer.unwrap_or_default();
                style.inner_radius = inner.unwrap_or_default();
            }
            None => {}
        }
        match colors.as_ref().map(|c| &c[i]) {
            Some(EyeColor::Both(spec)) => {
                let parsed: Rgba = spec.parse()?;
                style.outer_color = parsed;
                style.inner_color = parsed;
            }
            Some(EyeColor::Split { inner, outer }) => {
                style.outer_color = color(outer, fg_color)?;
                style.inner_color = color(inner, fg_color)?;
            }
            None => {}
        }
    }
    Ok(styles)
}

fn logo_config(options: &QrOptions, size: f32) -> Result<Option<LogoConfig>> {
    let Some(reference) = options.logo_image.as_deref() else {
        return Ok(None);
    };
    let source: LogoSource = reference.parse()?;

    let width = number(&options.logo_width, "logoWidth")?.unwrap_or(size * DEFAULT_LOGO_FRACTION);
    let height = number(&options.logo_height, "logoHeight")?.unwrap_or(width);
    if width <= 0.0 || height <= 0.0 {
        let message = format!("logo dimensions must be positive, got {width}x{height}");
        return Err(RenderError::config(message));
    }
    let padding = number(&options.logo_padding, "logoPadding")?.unwrap_or(0.0);
    if padding < 0.0 {
        return Err(RenderError::config(format!("logoPadding must not be negative, got {padding}")));
    }
    let opacity = number(&options.logo_opacity, "logoOpacity")?.unwrap_or(1.0).clamp(0.0, 1.0);

    Ok(Some(LogoConfig {
        source,
        width,
        height,
        opacity,
        padding,
        padding_style: options.logo_padding_style,
        remove_behind: options.remove_qr_code_behind_logo,
        cross_origin: options.enable_cors,
        on_load: None,
    }))
}

//! # qistyle
//!
//! A Rust library for rendering QR codes as branded, customizable images.
//!
//! `qistyle` takes a finished QR module grid and paints it onto a raster surface with
//! selectable module shapes, independently styled finder patterns ("eyes") and an optional
//! logo overlay. Encoding itself is delegated to the `qrcode` crate behind the
//! [`matrix::Encoder`] trait, so any grid source can be plugged in.
//!
//! ## Features
//!
//! - Nine module shapes: squares, dots, hearts, stars, diamonds, octagons, pentagons,
//!   triangles and an adjacency-aware "fluid" style that merges neighbouring modules.
//! - Per-eye, per-ring corner radii and colors.
//! - Centered logo with opacity, padding and a rectangular or elliptical clearing patch.
//! - Device pixel ratio scaling, quiet zone, PNG/JPEG/WEBP export.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qistyle = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Render a fluid-style QR code with colored eyes:
//!
//! ```rust
//! use qistyle::config::QrOptions;
//! use qistyle::helper::render_image;
//!
//! let options = QrOptions::from_json(r##"{
//!     "value": "https://example.com",
//!     "qrStyle": "fluid",
//!     "fgColor": "#1B1F3B",
//!     "eyeRadius": [{"outer": 10, "inner": 4}, 10, 10],
//!     "eyeColor": {"outer": "#E4572E", "inner": "#1B1F3B"}
//! }"##).unwrap();
//!
//! let img = render_image(&options).unwrap();
//! assert_eq!(img.dimensions(), (170, 170));
//! ```
//!
//! Drive the passes yourself when the logo should arrive asynchronously:
//!
//! ```rust
//! use qistyle::compositor::Compositor;
//! use qistyle::config::{QrOptions, RenderConfig};
//! use qistyle::matrix::{EcLevel, ModuleMatrix};
//! use qistyle::surface::PixmapSurface;
//!
//! let matrix = ModuleMatrix::encode("Hello, World!", EcLevel::M).unwrap();
//! let config = RenderConfig::from_options(&QrOptions::new("Hello, World!")).unwrap();
//!
//! let mut compositor = Compositor::new(PixmapSurface::new());
//! if let Some(pending) = compositor.render(&matrix, &config).unwrap() {
//!     if let Some(logo) = pending.wait() {
//!         compositor.complete_logo(logo);
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`compositor`]: the full render pass and logo completion.
//! - [`modules`], [`eyes`], [`logo`]: the three painters.
//! - [`path`]: the rounded-square primitive shared by eyes and fluid modules.
//! - [`config`]: host options and their validated form.
//! - [`helper`]: one-call rendering and file export.

#![forbid(unsafe_code)]

pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod eyes;
pub mod geometry;
pub mod helper;
pub mod logo;
pub mod matrix;
pub mod modules;
pub mod path;
pub mod surface;

pub use color::Rgba;
pub use compositor::Compositor;
pub use config::{QrOptions, RenderConfig};
pub use error::{RenderError, Result};
pub use matrix::{EcLevel, Encoder, ModuleMatrix};
pub use modules::QrStyle;

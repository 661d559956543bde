//! One full render pass: background, modules, eyes, then the logo.
//!
//! The synchronous part paints straight through with no suspension. The logo
//! decode is the only deferred step; each pass bumps a generation counter
//! and a logo only lands on the surface if it belongs to the latest pass.

use std::sync::Arc;

use log::debug;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::eyes::eye_commands;
use crate::geometry::{in_finder_zone, Geometry};
use crate::logo::{
    overlay_commands, spawn_load, DecodingLoader, ImageLoader, LoadedLogo, LogoPlacement,
    PendingLogo,
};
use crate::matrix::ModuleMatrix;
use crate::modules::module_commands;
use crate::surface::{DrawCommand, Surface};

/// Owns a surface and paints complete passes onto it.
pub struct Compositor<S> {
    surface: S,
    generation: u64,
    loader: Arc<dyn ImageLoader>,
}

impl<S: Surface> Compositor<S> {
    pub fn new(surface: S) -> Self {
        Self::with_loader(surface, Arc::new(DecodingLoader))
    }

    pub fn with_loader(surface: S, loader: Arc<dyn ImageLoader>) -> Self {
        Compositor { surface, generation: 0, loader }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Number of passes started so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Repaints the surface from scratch.
    ///
    /// Returns the pending logo load when a logo is configured; hand its
    /// result to [`Compositor::complete_logo`] once it is ready.
    pub fn render(
        &mut self,
        matrix: &ModuleMatrix,
        config: &RenderConfig,
    ) -> Result<Option<PendingLogo>> {
        self.generation += 1;
        let geometry =
            Geometry::new(config.size, config.quiet_zone, config.pixel_ratio, matrix.size());
        debug!(
            "pass {}: {} modules, cell {:.3}px, style {:?}",
            self.generation,
            matrix.size(),
            geometry.cell_size(),
            config.style
        );

        let extent = geometry.canvas_extent();
        self.surface.begin(extent, extent, config.pixel_ratio)?;
        self.surface.draw(&DrawCommand::Background(config.bg_color));

        let zones = geometry.finder_zones();
        let excluded = |row, col| in_finder_zone(&zones, row, col);
        let modules = module_commands(config.style, matrix, &geometry, config.fg_color, &excluded);
        for command in modules {
            self.surface.draw(&command);
        }
        for command in eye_commands(&geometry, &config.eyes) {
            self.surface.draw(&command);
        }

        let pending = config.logo.as_ref().map(|logo| {
            let placement = LogoPlacement::new(&geometry, logo);
            spawn_load(Arc::clone(&self.loader), logo, placement, config.bg_color, self.generation)
        });
        Ok(pending)
    }

    /// Paints a finished logo and fires its callback. Returns `false`, painting
    /// nothing, when a newer pass has started since the logo was requested.
    pub fn complete_logo(&mut self, loaded: LoadedLogo) -> bool {
        if loaded.generation != self.generation {
            debug!(
                "discarding logo of pass {}, current pass is {}",
                loaded.generation, self.generation
            );
            return false;
        }

        let overlay =
            overlay_commands(&loaded.placement, &loaded.logo, loaded.bg_color, loaded.image);
        for command in overlay {
            self.surface.draw(&command);
        }
        if let Some(on_load) = &loaded.logo.on_load {
            on_load();
        }
        true
    }
}

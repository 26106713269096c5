//! Presentation surface
//!
//! Draws the world and applies the view model. The browser build uses a
//! canvas 2D context plus DOM overlay panels.

use crate::sim::World;
use crate::view::ViewModel;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

/// Something that can show a world snapshot
pub trait PresentationSurface {
    /// Called once per tick, after the world has been updated
    fn present(&mut self, world: &World, view: &ViewModel);
}

/// Draws nothing; for headless runs
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    pub frames: u64,
}

impl PresentationSurface for HeadlessSurface {
    fn present(&mut self, _world: &World, _view: &ViewModel) {
        self.frames += 1;
    }
}

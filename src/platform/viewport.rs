//! Canvas sizing
//!
//! The simulation always runs in a 400x600 logical field. On resize the canvas
//! is fitted into 70% of the window at that aspect ratio and drawing is scaled.

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// Fraction of the window the canvas may occupy
pub const WINDOW_FILL: f32 = 0.7;

/// Canvas size in pixels and the logical-to-pixel scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Viewport {
    /// Fit the field into a window of the given size.
    ///
    /// Width-limited first; if that is too tall, height-limited instead.
    pub fn fit(window_width: f32, window_height: f32) -> Self {
        let aspect = FIELD_HEIGHT / FIELD_WIDTH;
        let target_width = window_width * WINDOW_FILL;
        let target_height = window_height * WINDOW_FILL;

        let mut width = target_width;
        let mut height = width * aspect;
        if height > target_height {
            height = target_height;
            width = height / aspect;
        }

        Self {
            width,
            height,
            scale_x: width / FIELD_WIDTH,
            scale_y: height / FIELD_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tall_window_is_width_limited() {
        let vp = Viewport::fit(400.0, 2000.0);
        assert!((vp.width - 280.0).abs() < 1e-3);
        assert!((vp.height - 420.0).abs() < 1e-3);
        assert!((vp.scale_x - 0.7).abs() < 1e-6);
        assert!((vp.scale_y - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_wide_window_is_height_limited() {
        let vp = Viewport::fit(1920.0, 1080.0);
        assert!((vp.height - 756.0).abs() < 1e-3);
        assert!((vp.width - 504.0).abs() < 1e-3);
        assert!((vp.width / vp.height - FIELD_WIDTH / FIELD_HEIGHT).abs() < 1e-5);
    }
}

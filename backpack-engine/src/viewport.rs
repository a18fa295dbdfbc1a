//! Mapping between device pixels and the fixed logical canvas.

use log::warn;
use nalgebra::Vector2;

/// The logical canvas as currently shown on screen. The canvas is scaled down to fit the display
/// but never scaled up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    logical: Vector2<f32>,
    display: Vector2<f32>,
    scale: f32,
}

impl Viewport {
    /// A viewport shown at its logical size
    pub fn new(logical_width: f32, logical_height: f32) -> Self {
        let logical = Vector2::new(logical_width, logical_height);
        Self {
            logical,
            display: logical,
            scale: 1.0,
        }
    }

    /// Recompute the scale for a new display size. Degenerate sizes (a minimized window, say) are
    /// ignored and the previous scale is kept.
    pub fn resize(&mut self, display_width: f32, display_height: f32) {
        if !(display_width > 0.0 && display_height > 0.0) {
            warn!(
                "Ignoring resize to {}x{}, keeping scale {}",
                display_width, display_height, self.scale
            );
            return;
        }

        self.display = Vector2::new(display_width, display_height);
        self.scale = (display_width / self.logical.x)
            .min(display_height / self.logical.y)
            .min(1.0);
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn display_size(&self) -> Vector2<f32> {
        self.display
    }

    pub fn logical_size(&self) -> Vector2<f32> {
        self.logical
    }

    /// Screen position to logical canvas position
    pub fn to_logical(&self, screen: Vector2<f32>) -> Vector2<f32> {
        screen / self.scale
    }

    pub fn to_screen(&self, logical: Vector2<f32>) -> Vector2<f32> {
        logical * self.scale
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn never_scales_up() {
        let mut view = Viewport::new(1600.0, 900.0);
        view.resize(3200.0, 1800.0);
        assert_eq!(view.scale(), 1.0);
        assert_eq!(view.to_logical(Vector2::new(10.0, 20.0)), Vector2::new(10.0, 20.0));
    }

    #[test]
    fn limited_by_the_tighter_axis() {
        let mut view = Viewport::new(1600.0, 900.0);

        view.resize(800.0, 900.0);
        assert_relative_eq!(view.scale(), 0.5);
        let p = view.to_logical(Vector2::new(400.0, 100.0));
        assert_relative_eq!(p.x, 800.0);
        assert_relative_eq!(p.y, 200.0);

        view.resize(1600.0, 450.0);
        assert_relative_eq!(view.scale(), 0.5);

        let back = view.to_screen(view.to_logical(Vector2::new(123.0, 45.0)));
        assert_relative_eq!(back.x, 123.0, epsilon = 1e-4);
        assert_relative_eq!(back.y, 45.0, epsilon = 1e-4);
    }

    #[test]
    fn degenerate_sizes_keep_the_scale() {
        let mut view = Viewport::new(1600.0, 900.0);
        view.resize(800.0, 450.0);
        view.resize(0.0, 450.0);
        view.resize(f32::NAN, 10.0);
        assert_relative_eq!(view.scale(), 0.5);
        assert_eq!(view.display_size(), Vector2::new(800.0, 450.0));
    }
}

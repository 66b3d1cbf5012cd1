use eframe::egui::{Pos2, Rect, Vec2};

use super::error::ArtError;

/// Viewport extent in pixels, origin at the top-left corner. Always positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    width: f32,
    height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Result<Self, ArtError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ArtError::InvalidBounds { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn from_size(size: Vec2) -> Result<Self, ArtError> {
        Self::new(size.x, size.y)
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// The viewport shrunk by `margin` on every side, collapsing to the center when too small.
    pub fn inset(self, margin: f32) -> Rect {
        let margin_x = margin.clamp(0.0, self.width * 0.5);
        let margin_y = margin.clamp(0.0, self.height * 0.5);
        Rect::from_min_max(
            Pos2::new(margin_x, margin_y),
            Pos2::new(self.width - margin_x, self.height - margin_y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_sizes() {
        assert!(Bounds::new(0.0, 10.0).is_err());
        assert!(Bounds::new(10.0, -1.0).is_err());
        assert!(Bounds::new(f32::NAN, 10.0).is_err());
        assert_eq!(
            Bounds::new(-5.0, 3.0).unwrap_err(),
            ArtError::InvalidBounds {
                width: -5.0,
                height: 3.0
            }
        );
    }

    #[test]
    fn inset_never_inverts() {
        let bounds = Bounds::new(20.0, 400.0).unwrap();
        let inner = bounds.inset(16.0);
        assert_eq!(inner.left(), 10.0);
        assert_eq!(inner.right(), 10.0);
        assert_eq!(inner.top(), 16.0);
        assert_eq!(inner.bottom(), 384.0);
    }
}

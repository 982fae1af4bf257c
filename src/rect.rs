//! Rectangles.

use cgmath::{EuclideanSpace, Point2, Vector2, VectorSpace, Zero};

/// A rectangle.
///
/// Bounds of a view are always expressed in the coordinate system of its superview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Rectangle origin.
    pub origin: Point2<f64>,

    /// Rectangle size.
    pub size: Vector2<f64>,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(origin: Point2<f64>, size: Vector2<f64>) -> Rect {
        Rect { origin, size }
    }

    /// Creates a new rectangle from its components.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            origin: Point2::new(x, y),
            size: Vector2::new(width, height),
        }
    }

    /// Returns a zero-sized rectangle at the origin.
    pub fn zero() -> Rect {
        Rect {
            origin: Point2::new(0., 0.),
            size: Vector2::zero(),
        }
    }

    pub fn x(&self) -> f64 {
        self.origin.x
    }

    pub fn y(&self) -> f64 {
        self.origin.y
    }

    pub fn width(&self) -> f64 {
        self.size.x
    }

    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Returns true if the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0. || self.size.y <= 0.
    }

    /// Returns true if the size is finite and non-negative and the origin is finite.
    pub fn is_valid(&self) -> bool {
        self.origin.x.is_finite()
            && self.origin.y.is_finite()
            && self.size.x.is_finite()
            && self.size.y.is_finite()
            && self.size.x >= 0.
            && self.size.y >= 0.
    }

    /// Returns a new rectangle with the given origin.
    pub fn with_origin(&self, origin: Point2<f64>) -> Rect {
        Rect {
            origin,
            size: self.size,
        }
    }

    /// Linearly interpolates origin and size componentwise.
    ///
    /// `t` is not clamped. At `t == 1` the result is `to` only up to rounding; callers that need
    /// the exact destination should assign it directly.
    pub fn lerp(self, to: Rect, t: f64) -> Rect {
        Rect {
            origin: Point2::from_vec(self.origin.to_vec().lerp(to.origin.to_vec(), t)),
            size: self.size.lerp(to.size, t),
        }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Rect::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_midpoint() {
        let a = Rect::from_xywh(0., 0., 100., 100.);
        let b = Rect::from_xywh(10., 10., 800., 600.);
        assert_eq!(a.lerp(b, 0.5), Rect::from_xywh(5., 5., 450., 350.));
        assert_eq!(a.lerp(b, 0.), a);
    }

    #[test]
    fn validity() {
        assert!(Rect::zero().is_valid());
        assert!(Rect::zero().is_empty());
        assert!(!Rect::from_xywh(0., 0., -1., 4.).is_valid());
        assert!(!Rect::from_xywh(f64::NAN, 0., 1., 4.).is_valid());
    }
}

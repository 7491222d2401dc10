//! Rectangles.

use cgmath::{Point2, Vector2};

/// A rectangle.
///
/// The y-axis points down, so `origin.y` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Rectangle origin.
    pub origin: Point2<f64>,

    /// Rectangle size.
    pub size: Vector2<f64>,
}

impl Rect {
    /// A horizontal band spanning `top..top + height`, as wide as anything can be.
    ///
    /// Used for vertical-only questions like “is this row in the viewport?”.
    pub fn band(top: f64, height: f64) -> Rect {
        Rect {
            origin: Point2::new(0., top),
            size: Vector2::new(f64::MAX, height),
        }
    }

    pub fn top(&self) -> f64 {
        self.origin.y
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.y
    }

    /// Returns true if the two rectangles intersect.
    pub fn intersects(&self, rect: Rect) -> bool {
        let own_opposite = self.origin + self.size;
        let rect_opposite = rect.origin + rect.size;

        self.origin.x < rect_opposite.x
            && self.origin.y < rect_opposite.y
            && rect.origin.x < own_opposite.x
            && rect.origin.y < own_opposite.y
    }
}

#[test]
fn test_band_intersection() {
    let viewport = Rect::band(100., 50.);
    assert!(viewport.intersects(Rect::band(140., 20.)));
    assert!(!viewport.intersects(Rect::band(150., 20.)), "touching edges do not intersect");
    assert!(!viewport.intersects(Rect::band(80., 20.)));
    assert_eq!(viewport.top(), 100.);
    assert_eq!(viewport.bottom(), 150.);
}

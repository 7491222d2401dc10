//! Element positioning.

use crate::config::Capabilities;
use cgmath::Point2;
use escalator_core::{Document, ElementId};
use std::collections::HashMap;
use std::fmt;

const TRANSFORM: &str = "transform";
const WEBKIT_TRANSFORM: &str = "-webkit-transform";
const LEFT: &str = "left";
const TOP: &str = "top";

/// Places elements at absolute coordinates.
///
/// Implementations are interchangeable; containers don't care which one is in use.
pub trait PositionFunction: fmt::Debug + Send + Sync {
    /// Moves the element to `(x, y)`.
    fn set(&self, doc: &mut Document, element: ElementId, x: f64, y: f64);

    /// Removes any positioning from the element.
    fn reset(&self, doc: &mut Document, element: ElementId);
}

/// Picks the best position function for the host.
pub fn detect(capabilities: Capabilities) -> Box<dyn PositionFunction> {
    if capabilities.transform_quirks {
        Box::new(Absolute)
    } else if capabilities.transform && capabilities.transform_style {
        Box::new(Translate3D)
    } else if capabilities.transform {
        Box::new(Translate)
    } else if capabilities.webkit_transform {
        Box::new(WebkitTranslate3D)
    } else {
        Box::new(Absolute)
    }
}

/// `transform: translate3d(..)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translate3D;

impl PositionFunction for Translate3D {
    fn set(&self, doc: &mut Document, element: ElementId, x: f64, y: f64) {
        doc.set_style(element, TRANSFORM, format!("translate3d({}px, {}px, 0)", x, y));
    }

    fn reset(&self, doc: &mut Document, element: ElementId) {
        doc.clear_style(element, TRANSFORM);
    }
}

/// `transform: translate(..)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translate;

impl PositionFunction for Translate {
    fn set(&self, doc: &mut Document, element: ElementId, x: f64, y: f64) {
        doc.set_style(element, TRANSFORM, format!("translate({}px, {}px)", x, y));
    }

    fn reset(&self, doc: &mut Document, element: ElementId) {
        doc.clear_style(element, TRANSFORM);
    }
}

/// `-webkit-transform: translate3d(..)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebkitTranslate3D;

impl PositionFunction for WebkitTranslate3D {
    fn set(&self, doc: &mut Document, element: ElementId, x: f64, y: f64) {
        doc.set_style(
            element,
            WEBKIT_TRANSFORM,
            format!("translate3d({}px, {}px, 0)", x, y),
        );
    }

    fn reset(&self, doc: &mut Document, element: ElementId) {
        doc.clear_style(element, WEBKIT_TRANSFORM);
    }
}

/// `left` and `top` offsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Absolute;

impl PositionFunction for Absolute {
    fn set(&self, doc: &mut Document, element: ElementId, x: f64, y: f64) {
        doc.set_px(element, LEFT, x);
        doc.set_px(element, TOP, y);
    }

    fn reset(&self, doc: &mut Document, element: ElementId) {
        doc.clear_style(element, LEFT);
        doc.clear_style(element, TOP);
    }
}

/// Applies a position function and remembers where everything was put.
#[derive(Debug)]
pub struct PositionBookkeeper {
    function: Box<dyn PositionFunction>,
    positions: HashMap<ElementId, Point2<f64>>,
}

impl PositionBookkeeper {
    pub fn new(function: Box<dyn PositionFunction>) -> PositionBookkeeper {
        PositionBookkeeper {
            function,
            positions: HashMap::new(),
        }
    }

    pub fn set(&mut self, doc: &mut Document, element: ElementId, x: f64, y: f64) {
        self.function.set(doc, element, x, y);
        self.positions.insert(element, Point2::new(x, y));
    }

    pub fn reset(&mut self, doc: &mut Document, element: ElementId) {
        self.function.reset(doc, element);
        self.positions.remove(&element);
    }

    /// Where the element was last put.
    pub fn position(&self, element: ElementId) -> Option<Point2<f64>> {
        self.positions.get(&element).copied()
    }

    pub fn top(&self, element: ElementId) -> Option<f64> {
        self.position(element).map(|p| p.y)
    }

    /// Forgets about an element, e.g. after it has been destroyed.
    pub fn remove(&mut self, element: ElementId) {
        self.positions.remove(&element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escalator_core::Tag;

    #[test]
    fn test_detect() {
        let mut caps = Capabilities::default();
        assert_eq!(format!("{:?}", detect(caps)), "Translate3D");
        caps.transform_style = false;
        assert_eq!(format!("{:?}", detect(caps)), "Translate");
        caps.transform = false;
        caps.webkit_transform = true;
        assert_eq!(format!("{:?}", detect(caps)), "WebkitTranslate3D");
        caps.transform_quirks = true;
        assert_eq!(format!("{:?}", detect(caps)), "Absolute");
        assert_eq!(format!("{:?}", detect(Capabilities::none())), "Absolute");
    }

    #[test]
    fn test_functions() {
        let mut doc = Document::new();
        let el = doc.create_element(Tag::Row);

        Translate3D.set(&mut doc, el, 0., 40.);
        assert_eq!(doc.style(el, TRANSFORM), Some("translate3d(0px, 40px, 0)"));
        Translate.set(&mut doc, el, 1.5, 2.);
        assert_eq!(doc.style(el, TRANSFORM), Some("translate(1.5px, 2px)"));
        Translate.reset(&mut doc, el);
        assert_eq!(doc.style(el, TRANSFORM), None);

        WebkitTranslate3D.set(&mut doc, el, 3., 4.);
        assert_eq!(doc.style(el, WEBKIT_TRANSFORM), Some("translate3d(3px, 4px, 0)"));
        WebkitTranslate3D.reset(&mut doc, el);

        let mut positions = PositionBookkeeper::new(Box::new(Absolute));
        positions.set(&mut doc, el, 5., 60.);
        assert_eq!(doc.px(el, LEFT), Some(5.));
        assert_eq!(doc.px(el, TOP), Some(60.));
        assert_eq!(positions.top(el), Some(60.));
        positions.reset(&mut doc, el);
        assert_eq!(doc.style(el, TOP), None);
        assert_eq!(positions.position(el), None);
        assert_eq!(doc.style(el, WEBKIT_TRANSFORM), None);
    }
}

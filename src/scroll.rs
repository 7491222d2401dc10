//! Programmatic scrolling.

use escalator_core::{Error, Result};

/// Where a scrolled-to target should end up in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDestination {
    /// Scroll as little as possible to bring the target into view, or not at all if it's
    /// already there.
    Any,

    /// The target's top edge lines up with the top of the viewport.
    Start,

    /// The target is centered in the viewport.
    Middle,

    /// The target's bottom edge lines up with the bottom of the viewport.
    End,
}

impl ScrollDestination {
    /// Padding has to be finite, and a centered target can't have any.
    pub fn check_padding(self, padding: f64) -> Result<()> {
        if !padding.is_finite() {
            return Err(Error::InvalidPadding(padding));
        }
        if self == ScrollDestination::Middle && padding != 0. {
            return Err(Error::PaddingWithMiddle(padding));
        }
        Ok(())
    }

    /// The scroll position that puts `target_start..target_end` at this destination, with
    /// `padding` pixels of space around it.
    ///
    /// The result isn't clamped to the scrollable range.
    pub fn scroll_pos(
        self,
        target_start: f64,
        target_end: f64,
        viewport_start: f64,
        viewport_end: f64,
        padding: f64,
    ) -> f64 {
        let viewport_length = viewport_end - viewport_start;
        match self {
            ScrollDestination::Any => {
                if target_start - padding < viewport_start {
                    target_start - padding
                } else if target_end + padding > viewport_end {
                    target_end + padding - viewport_length
                } else {
                    viewport_start
                }
            }
            ScrollDestination::Start => target_start - padding,
            ScrollDestination::Middle => {
                target_start + (target_end - target_start) / 2. - viewport_length / 2.
            }
            ScrollDestination::End => target_end + padding - viewport_length,
        }
    }
}

#[test]
fn test_scroll_pos() {
    use ScrollDestination::*;

    // viewport 100..200, target 300..320
    assert_eq!(Start.scroll_pos(300., 320., 100., 200., 0.), 300.);
    assert_eq!(Start.scroll_pos(300., 320., 100., 200., 5.), 295.);
    assert_eq!(End.scroll_pos(300., 320., 100., 200., 0.), 220.);
    assert_eq!(End.scroll_pos(300., 320., 100., 200., 5.), 225.);
    assert_eq!(Middle.scroll_pos(300., 320., 100., 200., 0.), 260.);

    assert_eq!(Any.scroll_pos(300., 320., 100., 200., 5.), 225., "below: align the end");
    assert_eq!(Any.scroll_pos(40., 60., 100., 200., 5.), 35., "above: align the start");
    assert_eq!(Any.scroll_pos(120., 140., 100., 200., 5.), 100., "already visible");
    assert_eq!(Any.scroll_pos(102., 140., 100., 200., 5.), 97., "padding reaches above");
}

#[test]
fn test_check_padding() {
    assert_eq!(ScrollDestination::Start.check_padding(-3.), Ok(()));
    assert_eq!(ScrollDestination::Middle.check_padding(0.), Ok(()));
    assert_eq!(
        ScrollDestination::Middle.check_padding(2.),
        Err(Error::PaddingWithMiddle(2.))
    );
    assert_eq!(
        ScrollDestination::End.check_padding(f64::INFINITY),
        Err(Error::InvalidPadding(f64::INFINITY))
    );
    assert!(matches!(
        ScrollDestination::Any.check_padding(f64::NAN),
        Err(Error::InvalidPadding(p)) if p.is_nan()
    ));
}

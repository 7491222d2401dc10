//! Engine configuration.

/// Default height of a row, in pixels.
pub const DEFAULT_ROW_HEIGHT: f64 = 20.;

/// What the host surface can do when it comes to positioning elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capabilities {
    /// `transform` is supported.
    pub transform: bool,

    /// `transform-style` is supported, which implies 3D transforms.
    pub transform_style: bool,

    /// `-webkit-transform` is supported.
    pub webkit_transform: bool,

    /// The host mis-renders transformed table rows, so only left/top offsets can be used.
    pub transform_quirks: bool,
}

impl Default for Capabilities {
    /// A modern host: 3D transforms without quirks.
    fn default() -> Self {
        Capabilities {
            transform: true,
            transform_style: true,
            webkit_transform: false,
            transform_quirks: false,
        }
    }
}

impl Capabilities {
    /// A host that supports nothing but left/top offsets.
    pub fn none() -> Self {
        Capabilities {
            transform: false,
            transform_style: false,
            webkit_transform: false,
            transform_quirks: false,
        }
    }
}

/// Escalator configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EscalatorConfig {
    /// Row height used by all sections until changed.
    pub default_row_height: f64,

    /// Height of the body viewport, in pixels.
    pub viewport_height: f64,

    /// Prefix for the class names of section, row and cell elements.
    pub style_primary_name: String,

    /// Used to pick a position function.
    pub capabilities: Capabilities,
}

impl Default for EscalatorConfig {
    fn default() -> Self {
        EscalatorConfig {
            default_row_height: DEFAULT_ROW_HEIGHT,
            viewport_height: 0.,
            style_primary_name: "v-escalator".into(),
            capabilities: Capabilities::default(),
        }
    }
}

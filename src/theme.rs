//! Display configuration shared with the chart collaborator.

use serde::Serialize;

/// Immutable display constants: the chart color scheme, the accent color
/// for bar charts and highlights, and the credit unit label.
///
/// The host passes this to its chart calls; nothing in this crate mutates
/// it. [`Theme::DEFAULT`] matches the original dashboard's palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    /// Vega color scheme name for time-histogram cells.
    pub color_scheme: &'static str,
    /// Accent color for bar charts and underlined headline figures.
    pub bar_color: &'static str,
    /// Unit label appended by credit formatting.
    pub credits_label: &'static str,
}

impl Theme {
    pub const DEFAULT: Theme = Theme {
        color_scheme: "lightmulti",
        bar_color: "#0091EA",
        credits_label: "credits",
    };
}

impl Default for Theme {
    fn default() -> Self {
        Theme::DEFAULT
    }
}

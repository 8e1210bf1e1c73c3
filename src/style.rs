//! Styling for the table and card views.
//!
//! All defaults use `AdaptiveColor` so the widget reads well on both light
//! and dark terminals. Every style can be replaced through the builder
//! methods on [`Styles`] or by assigning the public fields directly.

use lipgloss_extras::prelude::*;

/// Toggle indicator shown on a collapsed card row.
pub const COLLAPSED_GLYPH: &str = "▼";

/// Toggle indicator shown on an expanded card row.
pub const EXPANDED_GLYPH: &str = "▲";

/// Style set for the generated output.
///
/// # Examples
///
/// ```rust
/// use viewtable::style::Styles;
/// use lipgloss_extras::prelude::*;
///
/// let styles = Styles::default()
///     .with_header(Style::new().bold(true))
///     .with_toggle(Style::new().foreground(Color::from("212")));
/// ```
#[derive(Debug, Clone)]
pub struct Styles {
    /// Column header labels, in both the table view and the card view.
    pub header: Style,
    /// Body cells in the table view and card main segments.
    pub cell: Style,
    /// The card title line, when a title column is configured.
    pub title: Style,
    /// Marker for the focused card row.
    pub cursor: Style,
    /// The expand/collapse indicator glyph.
    pub toggle: Style,
    /// Detail labels inside an expanded card.
    pub detail_label: Style,
    /// Detail values inside an expanded card.
    pub detail_value: Style,
}

impl Default for Styles {
    fn default() -> Self {
        let subdued = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };

        Self {
            header: Style::new().bold(true).foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            cell: Style::new(),
            title: Style::new()
                .bold(true)
                .foreground(Color::from("230"))
                .background(Color::from("62"))
                .padding(0, 1, 0, 1),
            cursor: Style::new().foreground(Color::from("212")),
            toggle: Style::new().foreground(subdued.clone()),
            detail_label: Style::new().foreground(subdued),
            detail_value: Style::new(),
        }
    }
}

impl Styles {
    /// Creates the default style set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the header style (builder pattern).
    pub fn with_header(mut self, style: Style) -> Self {
        self.header = style;
        self
    }

    /// Sets the cell style (builder pattern).
    pub fn with_cell(mut self, style: Style) -> Self {
        self.cell = style;
        self
    }

    /// Sets the card title style (builder pattern).
    pub fn with_title(mut self, style: Style) -> Self {
        self.title = style;
        self
    }

    /// Sets the focused-row marker style (builder pattern).
    pub fn with_cursor(mut self, style: Style) -> Self {
        self.cursor = style;
        self
    }

    /// Sets the toggle glyph style (builder pattern).
    pub fn with_toggle(mut self, style: Style) -> Self {
        self.toggle = style;
        self
    }

    /// Sets the detail label style (builder pattern).
    pub fn with_detail_label(mut self, style: Style) -> Self {
        self.detail_label = style;
        self
    }

    /// Sets the detail value style (builder pattern).
    pub fn with_detail_value(mut self, style: Style) -> Self {
        self.detail_value = style;
        self
    }
}

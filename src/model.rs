//! The responsive table widget.
//!
//! [`Model`] owns one table source and renders exactly one of two views at a
//! time: the native table view, or the condensed card view with per-row
//! expand/collapse. Which view is shown is a pure function of the last
//! observed viewport width and the configured breakpoint. Card content is
//! generated lazily on the first transition into card mode and cached;
//! leaving card mode hides the cards without discarding them, so switching
//! back is cheap.
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Model as BubbleTeaModel, Msg, Cmd};
//! use viewtable::prelude::*;
//!
//! struct App {
//!     table: ViewTable,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let source = TableSource::new("people", vec!["Name", "Age", "City", "Country"])
//!             .with_attr("visible-columns", "2")
//!             .with_rows(vec![
//!                 vec!["Ada".into(), "30".into(), "London".into(), "UK".into()],
//!             ]);
//!         (Self { table: ViewTable::new(source) }, None)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         // WindowSizeMsg is debounced internally; key presses drive the
//!         // cursor and row toggling while the card view is active.
//!         self.table.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.table.view()
//!     }
//! }
//! ```

use crate::card::CardView;
use crate::config::{Config, ConfigPatch};
use crate::key::ViewTableKeyMap;
use crate::source::TableSource;
use crate::style::{Styles, COLLAPSED_GLYPH, EXPANDED_GLYPH};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Msg, WindowSizeMsg};
use lipgloss_extras::lipgloss;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

// Internal ID management for widget instances, so resize messages can be
// routed when several widgets coexist in one program.
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Which of the two views is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The native table view (viewport wider than the breakpoint).
    Table,
    /// The condensed card view (viewport at or below the breakpoint).
    Cards,
}

impl Mode {
    /// Decides the mode for a viewport width against a breakpoint.
    ///
    /// This is the whole mode-switch policy: width at or below the
    /// breakpoint means cards, anything wider means the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use viewtable::model::Mode;
    ///
    /// assert_eq!(Mode::for_width(80, 80), Mode::Cards);
    /// assert_eq!(Mode::for_width(81, 80), Mode::Table);
    /// ```
    pub fn for_width(width: u16, breakpoint: u16) -> Self {
        if width <= breakpoint {
            Self::Cards
        } else {
            Self::Table
        }
    }
}

/// Message sent after the resize quiet period elapses.
///
/// A `WindowSizeMsg` does not re-evaluate the mode immediately; it bumps the
/// widget's resize tag and schedules one of these. A newer resize bumps the
/// tag again, so the older pending message is discarded on arrival.
#[derive(Debug)]
pub struct ResizeMsg {
    /// The widget instance this message belongs to.
    pub id: i64,
    /// Discriminates the latest scheduled evaluation from stale ones.
    pub tag: i64,
    /// The viewport width observed when the resize arrived.
    pub width: u16,
}

/// A responsive table widget instance.
#[derive(Debug, Clone)]
pub struct Model {
    id: i64,
    source: TableSource,
    config: Config,
    styles: Styles,
    keymap: ViewTableKeyMap,
    width: u16,
    mode: Mode,
    cards: Option<CardView>,
    expanded: Vec<bool>,
    cursor: usize,
    resize_tag: i64,
    generation: u64,
}

impl Model {
    /// Creates a widget for a source, resolving configuration from the
    /// source's declarative attributes.
    pub fn new(source: TableSource) -> Self {
        let config = Config::from_attrs(&source);
        Self::with_config(source, config)
    }

    /// Creates a widget with an explicit configuration, ignoring the
    /// source's attributes.
    pub fn with_config(source: TableSource, config: Config) -> Self {
        // Until the runtime reports a real size, assume a viewport just wide
        // enough to show the native table.
        let width = config.breakpoint.saturating_add(1);
        let mut model = Self {
            id: next_id(),
            source,
            config,
            styles: Styles::default(),
            keymap: ViewTableKeyMap::default(),
            width,
            mode: Mode::Table,
            cards: None,
            expanded: Vec::new(),
            cursor: 0,
            resize_tag: 0,
            generation: 0,
        };
        model.evaluate_mode();
        model
    }

    /// Sets the style set (builder pattern).
    pub fn with_styles(mut self, styles: Styles) -> Self {
        self.styles = styles;
        self
    }

    /// Sets the key bindings (builder pattern).
    pub fn with_keymap(mut self, keymap: ViewTableKeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Sets the initial viewport width (builder pattern).
    pub fn with_width(mut self, width: u16) -> Self {
        self.set_width(width);
        self
    }

    /// The widget's unique instance identifier.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The managed source.
    pub fn source(&self) -> &TableSource {
        &self.source
    }

    /// The resolved configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The currently displayed view.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The last observed viewport width.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// The focused row index in card mode.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// How many times the card view content has been generated. Stays flat
    /// while the cached view is reused across mode switches.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true if the given row's detail section is expanded.
    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.get(index).copied().unwrap_or(false)
    }

    /// Number of rows whose detail section is currently expanded.
    pub fn expanded_count(&self) -> usize {
        self.expanded.iter().filter(|open| **open).count()
    }

    /// The generated card content, if it has been generated.
    pub fn cards(&self) -> Option<&CardView> {
        self.cards.as_ref()
    }

    /// Consumes the widget and returns the source, untouched.
    pub fn into_source(self) -> TableSource {
        self.source
    }

    /// Applies a new viewport width and re-evaluates the mode.
    pub fn set_width(&mut self, width: u16) {
        self.width = width;
        self.evaluate_mode();
    }

    /// Re-evaluates which view to display, generating card content lazily on
    /// the first transition into card mode.
    fn evaluate_mode(&mut self) {
        let mode = Mode::for_width(self.width, self.config.breakpoint);
        if mode == Mode::Cards && self.cards.is_none() {
            self.generate();
        }
        self.mode = mode;
    }

    fn generate(&mut self) {
        let view = CardView::generate(&self.source, &self.config);
        self.expanded = vec![false; view.rows.len()];
        self.cursor = self.cursor.min(view.rows.len().saturating_sub(1));
        self.generation += 1;
        debug!(
            source = self.source.name(),
            rows = view.rows.len(),
            generation = self.generation,
            "generated card view"
        );
        self.cards = Some(view);
    }

    /// Discards the cached card content and regenerates it from the current
    /// source content if the card view is active. All rows collapse.
    pub fn refresh(&mut self) {
        self.cards = None;
        self.expanded.clear();
        if self.mode == Mode::Cards {
            self.generate();
        }
    }

    /// Merges configuration overrides and refreshes.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        patch.apply(&mut self.config);
        self.cards = None;
        self.expanded.clear();
        self.evaluate_mode();
    }

    /// Replaces the source's body rows and refreshes.
    pub fn set_rows(&mut self, rows: Vec<Vec<String>>) {
        self.source.set_rows(rows);
        self.refresh();
    }

    /// Flips a row's detail section between collapsed and expanded.
    ///
    /// In exclusive mode, expanding a row collapses every other row. Indices
    /// beyond the row count are ignored.
    pub fn toggle_row(&mut self, index: usize) {
        if index >= self.expanded.len() {
            return;
        }
        let opening = !self.expanded[index];
        if opening && self.config.exclusive {
            self.expanded.fill(false);
        }
        self.expanded[index] = opening;
    }

    /// Routes a rendered-line coordinate to the enclosing card block and
    /// toggles that row, focusing it. Returns true if a row was hit.
    ///
    /// Line 0 is the first line of the card view output, so callers can feed
    /// pointer coordinates relative to wherever they placed the widget.
    pub fn click_at(&mut self, line: usize) -> bool {
        match self.row_at_line(line) {
            Some(index) => {
                self.cursor = index;
                self.toggle_row(index);
                true
            }
            None => false,
        }
    }

    /// Maps a rendered-line coordinate of the card view to the row whose
    /// block encloses it. Returns `None` outside card mode, on the header
    /// line, or past the last block.
    pub fn row_at_line(&self, line: usize) -> Option<usize> {
        if self.mode != Mode::Cards {
            return None;
        }
        let view = self.cards.as_ref()?;
        let mut next = usize::from(!view.headers.is_empty());
        for card in &view.rows {
            let height = self.card_height(card);
            if line >= next && line < next + height {
                return Some(card.index);
            }
            next += height;
        }
        None
    }

    fn card_height(&self, card: &crate::card::CardRow) -> usize {
        let base = if card.title.is_some() { 2 } else { 1 };
        if self.is_expanded(card.index) {
            base + card.details.len()
        } else {
            base
        }
    }

    /// Processes messages: debounced viewport resizes, and key presses while
    /// the card view is active.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            // Coalesce: only the most recently scheduled evaluation survives.
            self.resize_tag += 1;
            let (id, tag) = (self.id, self.resize_tag);
            let width = size.width as u16;
            return Some(bubbletea_tick(self.config.debounce, move |_| {
                Box::new(ResizeMsg { id, tag, width }) as Msg
            }));
        }

        if let Some(resize) = msg.downcast_ref::<ResizeMsg>() {
            if resize.id != 0 && resize.id != self.id {
                return None;
            }
            // A stale tag means a newer resize replaced this evaluation.
            if resize.tag > 0 && resize.tag != self.resize_tag {
                return None;
            }
            self.set_width(resize.width);
            return None;
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.mode != Mode::Cards {
                return None;
            }
            let rows = self.cards.as_ref().map_or(0, |view| view.rows.len());
            if self.keymap.cursor_up.matches(key_msg) {
                self.cursor = self.cursor.saturating_sub(1);
            } else if self.keymap.cursor_down.matches(key_msg) {
                if self.cursor + 1 < rows {
                    self.cursor += 1;
                }
            } else if self.keymap.toggle_row.matches(key_msg) {
                self.toggle_row(self.cursor);
            }
        }

        None
    }

    /// Renders the currently active view.
    pub fn view(&self) -> String {
        match (self.mode, &self.cards) {
            (Mode::Cards, Some(view)) => self.cards_view(view),
            _ => self.table_view(),
        }
    }

    fn table_view(&self) -> String {
        let headers = self.source.headers();
        let widths = self.column_widths();
        let mut output = String::new();

        for (i, header) in headers.iter().enumerate() {
            if i > 0 {
                output.push_str("  ");
            }
            output.push_str(&self.styles.header.render(&pad(header.trim(), widths[i])));
        }
        output.push('\n');

        for (i, &width) in widths.iter().enumerate() {
            if i > 0 {
                output.push_str("  ");
            }
            output.push_str(&"-".repeat(width));
        }
        output.push('\n');

        for row in self.source.rows() {
            for (i, _) in headers.iter().enumerate() {
                if i > 0 {
                    output.push_str("  ");
                }
                let cell = row.get(i).map(String::as_str).unwrap_or_default();
                output.push_str(&self.styles.cell.render(&pad(cell.trim(), widths[i])));
            }
            output.push('\n');
        }

        output
    }

    fn cards_view(&self, view: &CardView) -> String {
        let widths = main_column_widths(view);
        let label_width = view
            .rows
            .iter()
            .flat_map(|card| card.details.iter())
            .map(|(label, _)| label.width())
            .max()
            .unwrap_or(0);
        let mut output = String::new();

        if !view.headers.is_empty() {
            output.push_str("  ");
            for (i, header) in view.headers.iter().enumerate() {
                if i > 0 {
                    output.push_str("  ");
                }
                output.push_str(&self.styles.header.render(&pad(header, widths[i])));
            }
            output.push('\n');
        }

        for card in &view.rows {
            let focused = card.index == self.cursor;
            let marker = if focused {
                self.styles.cursor.render(">")
            } else {
                " ".to_string()
            };
            let glyph = if self.is_expanded(card.index) {
                EXPANDED_GLYPH
            } else {
                COLLAPSED_GLYPH
            };
            let glyph = self.styles.toggle.render(glyph);

            match &card.title {
                Some(title) => {
                    output.push_str(&marker);
                    output.push(' ');
                    output.push_str(&self.styles.title.render(title));
                    output.push(' ');
                    output.push_str(&glyph);
                    output.push('\n');
                    output.push_str("  ");
                    self.push_main_cells(&mut output, card, &widths);
                    output.push('\n');
                }
                None => {
                    output.push_str(&marker);
                    output.push(' ');
                    self.push_main_cells(&mut output, card, &widths);
                    output.push(' ');
                    output.push_str(&glyph);
                    output.push('\n');
                }
            }

            if self.is_expanded(card.index) {
                for (label, value) in &card.details {
                    output.push_str("    ");
                    output.push_str(
                        &self
                            .styles
                            .detail_label
                            .render(&format!("{}:", pad(label, label_width))),
                    );
                    output.push(' ');
                    output.push_str(&self.styles.detail_value.render(value));
                    output.push('\n');
                }
            }
        }

        output
    }

    fn push_main_cells(&self, output: &mut String, card: &crate::card::CardRow, widths: &[usize]) {
        for (i, cell) in card.main.iter().enumerate() {
            if i > 0 {
                output.push_str("  ");
            }
            let width = widths.get(i).copied().unwrap_or(0);
            output.push_str(&self.styles.cell.render(&pad(cell, width)));
        }
    }

    fn column_widths(&self) -> Vec<usize> {
        let headers = self.source.headers();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.trim().width()).collect();
        for row in self.source.rows() {
            for (i, width) in widths.iter_mut().enumerate() {
                if let Some(cell) = row.get(i) {
                    *width = (*width).max(lipgloss::width_visible(cell.trim()));
                }
            }
        }
        widths
    }
}

/// Column widths for the card main segment: the wider of each visible header
/// label and the cells beneath it, measured in display cells with ANSI
/// styling ignored.
fn main_column_widths(view: &CardView) -> Vec<usize> {
    let mut widths: Vec<usize> = view.headers.iter().map(|h| h.width()).collect();
    for card in &view.rows {
        for (i, cell) in card.main.iter().enumerate() {
            let cell_width = lipgloss::width_visible(cell);
            if i < widths.len() {
                widths[i] = widths[i].max(cell_width);
            } else {
                widths.push(cell_width);
            }
        }
    }
    widths
}

/// Right-pads plain text to the given display width.
fn pad(text: &str, width: usize) -> String {
    let text_width = lipgloss::width_visible(text);
    if text_width >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - text_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigPatch;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn source() -> TableSource {
        TableSource::new("people", vec!["Name", "Age", "City", "Country"]).with_rows(vec![
            vec!["Ada".into(), "30".into(), "London".into(), "UK".into()],
            vec!["Grace".into(), "36".into(), "Washington".into(), "USA".into()],
            vec!["Edsger".into(), "41".into(), "Nuenen".into(), "NL".into()],
        ])
    }

    fn cards_model() -> Model {
        let config = Config::default().with_visible_count(2).with_breakpoint(60);
        Model::with_config(source(), config).with_width(40)
    }

    fn key(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_mode_is_pure_function_of_width() {
        assert_eq!(Mode::for_width(79, 80), Mode::Cards);
        assert_eq!(Mode::for_width(80, 80), Mode::Cards);
        assert_eq!(Mode::for_width(81, 80), Mode::Table);
        assert_eq!(Mode::for_width(0, 0), Mode::Cards);
    }

    #[test]
    fn test_starts_in_table_mode_without_generating() {
        let model = Model::with_config(source(), Config::default().with_breakpoint(60));
        assert_eq!(model.mode(), Mode::Table);
        assert!(model.cards().is_none());
        assert_eq!(model.generation(), 0);
    }

    #[test]
    fn test_lazy_generation_and_cache_reuse() {
        let mut model = Model::with_config(
            source(),
            Config::default().with_visible_count(2).with_breakpoint(60),
        );
        assert_eq!(model.generation(), 0);

        model.set_width(40);
        assert_eq!(model.mode(), Mode::Cards);
        assert_eq!(model.generation(), 1);

        // Flapping the width back and forth reuses the cached content.
        model.set_width(100);
        assert_eq!(model.mode(), Mode::Table);
        model.set_width(40);
        model.set_width(100);
        model.set_width(30);
        assert_eq!(model.generation(), 1);
    }

    #[test]
    fn test_exactly_one_view_rendered() {
        let mut model = cards_model();
        let cards = model.view();
        assert!(cards.contains(COLLAPSED_GLYPH));
        assert!(cards.contains("Ada"));
        assert!(!cards.contains("London")); // detail stays hidden while collapsed

        model.set_width(100);
        let table = model.view();
        assert!(!table.contains(COLLAPSED_GLYPH));
        assert!(table.contains("London"));
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let mut model = cards_model();
        assert!(!model.is_expanded(1));
        model.toggle_row(1);
        assert!(model.is_expanded(1));
        model.toggle_row(1);
        assert!(!model.is_expanded(1));
    }

    #[test]
    fn test_expanded_row_renders_detail_pairs() {
        let mut model = cards_model();
        model.toggle_row(0);
        let output = model.view();
        assert!(output.contains("City"));
        assert!(output.contains("London"));
        assert!(output.contains(EXPANDED_GLYPH));
    }

    #[test]
    fn test_exclusive_expansion_keeps_at_most_one_row_open() {
        let config = Config::default()
            .with_visible_count(2)
            .with_breakpoint(60)
            .with_exclusive(true);
        let mut model = Model::with_config(source(), config).with_width(40);

        model.toggle_row(0);
        model.toggle_row(2);
        assert!(!model.is_expanded(0));
        assert!(model.is_expanded(2));
        assert_eq!(model.expanded_count(), 1);

        // Collapsing the open row by toggling leaves none open.
        model.toggle_row(2);
        assert_eq!(model.expanded_count(), 0);
    }

    #[test]
    fn test_toggle_out_of_range_is_ignored() {
        let mut model = cards_model();
        model.toggle_row(99);
        assert_eq!(model.expanded_count(), 0);
    }

    #[test]
    fn test_click_routes_to_enclosing_card_block() {
        let mut model = cards_model();
        // Line 0 is the card header; blocks are one line each while collapsed.
        assert_eq!(model.row_at_line(0), None);
        assert_eq!(model.row_at_line(1), Some(0));
        assert_eq!(model.row_at_line(3), Some(2));

        assert!(model.click_at(1));
        assert!(model.is_expanded(0));
        assert_eq!(model.cursor(), 0);

        // Row 0 now occupies its detail lines too; clicking one of them
        // routes back to row 0 and collapses it.
        assert_eq!(model.row_at_line(2), Some(0));
        assert!(model.click_at(2));
        assert!(!model.is_expanded(0));

        assert!(!model.click_at(99));
    }

    #[test]
    fn test_click_ignored_in_table_mode() {
        let mut model = cards_model();
        model.set_width(100);
        assert!(!model.click_at(1));
    }

    #[test]
    fn test_key_navigation_and_toggle() {
        let mut model = cards_model();
        assert_eq!(model.cursor(), 0);

        model.update(key(KeyCode::Down));
        model.update(key(KeyCode::Down));
        assert_eq!(model.cursor(), 2);
        model.update(key(KeyCode::Down));
        assert_eq!(model.cursor(), 2); // clamped at the last row

        model.update(key(KeyCode::Enter));
        assert!(model.is_expanded(2));

        model.update(key(KeyCode::Up));
        assert_eq!(model.cursor(), 1);
    }

    #[test]
    fn test_keys_ignored_in_table_mode() {
        let mut model = cards_model();
        model.set_width(100);
        model.update(key(KeyCode::Down));
        model.update(key(KeyCode::Enter));
        model.set_width(40);
        assert_eq!(model.cursor(), 0);
        assert_eq!(model.expanded_count(), 0);
    }

    #[test]
    fn test_resize_msg_applies_current_tag_and_skips_stale() {
        let mut model = cards_model();
        let id = model.id();

        // A tag from an older schedule is discarded.
        model.update(Box::new(ResizeMsg {
            id,
            tag: 7,
            width: 100,
        }));
        assert_eq!(model.mode(), Mode::Cards);

        // A message addressed to another instance is rejected.
        model.update(Box::new(ResizeMsg {
            id: id + 1,
            tag: 0,
            width: 100,
        }));
        assert_eq!(model.mode(), Mode::Cards);

        // An untagged message for this instance applies.

        model.update(Box::new(ResizeMsg {
            id,
            tag: 0,
            width: 100,
        }));
        assert_eq!(model.mode(), Mode::Table);
    }

    #[test]
    fn test_window_size_is_debounced_into_a_command() {
        let mut model = cards_model();
        let cmd = model.update(Box::new(WindowSizeMsg {
            width: 100,
            height: 24,
        }));
        // The mode does not change until the scheduled evaluation arrives.
        assert!(cmd.is_some());
        assert_eq!(model.mode(), Mode::Cards);
    }

    #[test]
    fn test_refresh_regenerates_and_collapses() {
        let mut model = cards_model();
        model.toggle_row(0);
        assert_eq!(model.generation(), 1);

        model.refresh();
        assert_eq!(model.generation(), 2);
        assert_eq!(model.expanded_count(), 0);
    }

    #[test]
    fn test_set_rows_refreshes_content() {
        let mut model = cards_model();
        model.set_rows(vec![vec!["Alan".into(), "41".into()]]);
        let view = model.cards().expect("card view should be generated");
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].main, vec!["Alan", "41"]);
    }

    #[test]
    fn test_apply_patch_re_evaluates_mode() {
        let mut model = cards_model();
        assert_eq!(model.mode(), Mode::Cards);

        // Lowering the breakpoint below the current width switches back to
        // the table; the discarded cache is not regenerated while hidden.
        model.apply(&ConfigPatch::new().breakpoint(20));
        assert_eq!(model.mode(), Mode::Table);
        assert!(model.cards().is_none());

        model.apply(&ConfigPatch::new().breakpoint(60).visible_count(1));
        assert_eq!(model.mode(), Mode::Cards);
        let view = model.cards().expect("card view should be generated");
        assert_eq!(view.headers, vec!["Name"]);
    }

    #[test]
    fn test_into_source_returns_source_untouched() {
        let model = cards_model();
        let restored = model.into_source();
        assert_eq!(restored, source());
    }

    #[test]
    fn test_title_column_renders_title_line() {
        let config = Config::default()
            .with_visible_count(2)
            .with_breakpoint(60)
            .with_title_column(0);
        let model = Model::with_config(source(), config).with_width(40);
        let output = model.view();
        assert!(output.contains("Ada"));
        // Title blocks are two lines tall, after the header line.
        assert_eq!(model.row_at_line(1), Some(0));
        assert_eq!(model.row_at_line(2), Some(0));
        assert_eq!(model.row_at_line(3), Some(1));
    }
}

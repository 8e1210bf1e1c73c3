//! Card view generation: projecting a table source into the condensed layout.
//!
//! The card view is the alternate rendering shown at or below the breakpoint
//! width. Generation is a pure function of the source content and the
//! configuration: it partitions the header list into a visible subset and a
//! detail remainder, then produces one [`CardRow`] per source row. Rendering
//! (and the per-row expanded state) lives in [`crate::model`]; this module
//! only builds content.

use crate::config::Config;
use crate::source::TableSource;
use lipgloss_extras::lipgloss;
use tracing::debug;

/// Splits header indices into the visible subset and the detail remainder.
///
/// The visible subset is either the configured explicit name list (in the
/// order the list declares, with names missing from the header list skipped
/// and duplicates ignored) or the first `visible_count` headers. The detail
/// subset is every remaining header index, in header order. Together the two
/// always cover each header index exactly once.
///
/// # Examples
///
/// ```rust
/// use viewtable::card::partition;
/// use viewtable::config::Config;
///
/// let headers: Vec<String> = ["Name", "Age", "City", "Country"]
///     .iter().map(|s| s.to_string()).collect();
///
/// let by_count = Config::default().with_visible_count(2);
/// assert_eq!(partition(&headers, &by_count), (vec![0, 1], vec![2, 3]));
///
/// let by_name = Config::default().with_visible_columns(vec!["Name", "Country"]);
/// assert_eq!(partition(&headers, &by_name), (vec![0, 3], vec![1, 2]));
/// ```
pub fn partition(headers: &[String], config: &Config) -> (Vec<usize>, Vec<usize>) {
    let visible: Vec<usize> = match &config.visible_columns {
        Some(names) => {
            let mut indices = Vec::with_capacity(names.len());
            for name in names {
                match headers.iter().position(|h| h.trim() == name.trim()) {
                    Some(index) if !indices.contains(&index) => indices.push(index),
                    Some(_) => {}
                    None => debug!(column = name.as_str(), "column not in header list, skipped"),
                }
            }
            indices
        }
        None => (0..headers.len().min(config.visible_count)).collect(),
    };
    let detail = (0..headers.len())
        .filter(|index| !visible.contains(index))
        .collect();
    (visible, detail)
}

/// One generated card: the condensed rendering of a single source row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRow {
    /// Stable index of the originating source row.
    pub index: usize,
    /// Addressable identifier for the card block (`{prefix}-row-{index}`).
    pub id: String,
    /// Addressable identifier for the detail panel (`{prefix}-details-{index}`).
    pub details_id: String,
    /// Title text for the card header line, when a title column is configured.
    /// Always plain text.
    pub title: Option<String>,
    /// Cells of the main (always visible) segment, in visible-column order.
    /// Rich content is preserved verbatim.
    pub main: Vec<String>,
    /// Label/value pairs of the detail segment, in header order. Labels are
    /// plain text, values preserve rich content.
    pub details: Vec<(String, String)>,
}

/// The generated card view content for a whole table.
///
/// Produced lazily on the first transition into card mode and cached until
/// explicitly invalidated (refresh, configuration update). Generation is
/// idempotent given unchanged source content and configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardView {
    /// Plain-text labels of the visible columns, in display order.
    pub headers: Vec<String>,
    /// One card per source row.
    pub rows: Vec<CardRow>,
}

impl CardView {
    /// Generates the card view content for a source under a configuration.
    ///
    /// Every source row yields exactly one card. A row shorter than the
    /// header list degrades to empty values for its missing cells.
    pub fn generate(source: &TableSource, config: &Config) -> Self {
        let headers = source.headers();
        let (visible, detail) = partition(headers, config);

        let rows = source
            .rows()
            .iter()
            .enumerate()
            .map(|(index, cells)| {
                let cell =
                    |i: usize| cells.get(i).map(|c| c.trim().to_string()).unwrap_or_default();
                CardRow {
                    index,
                    id: format!("{}-row-{}", config.prefix, index),
                    details_id: format!("{}-details-{}", config.prefix, index),
                    title: config
                        .title_column
                        .map(|i| lipgloss::strip_ansi(&cell(i))),
                    main: visible.iter().map(|&i| cell(i)).collect(),
                    details: detail
                        .iter()
                        .map(|&i| (lipgloss::strip_ansi(headers[i].trim()), cell(i)))
                        .collect(),
                }
            })
            .collect();

        Self {
            headers: visible
                .iter()
                .map(|&i| lipgloss::strip_ansi(headers[i].trim()))
                .collect(),
            rows,
        }
    }
}

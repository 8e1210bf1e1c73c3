//! Configuration resolution from declarative source attributes.
//!
//! A [`Config`] is resolved once when a widget instance is constructed, by
//! reading the source's attributes and falling back to defaults for anything
//! missing or malformed. Malformed values never raise an error; they are
//! reported through `tracing` and replaced by the default.
//!
//! Recognized attribute keys:
//!
//! | Key               | Effect                                             |
//! |-------------------|----------------------------------------------------|
//! | `visible-columns` | number of leading columns shown outside detail     |
//! | `mobile-columns`  | comma-separated column names, overrides the count  |
//! | `breakpoint`      | width (terminal columns) at or below which the card view activates |
//! | `title-column`    | index of the column supplying the card title       |
//! | `prefix`          | identifier prefix for generated row/detail ids     |
//! | `exclusive`       | expanding a row collapses every other expanded row |
//! | `debounce-ms`     | resize quiet period in milliseconds                |

use crate::source::TableSource;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Default number of leading columns shown outside the detail section.
pub const DEFAULT_VISIBLE_COUNT: usize = 3;

/// Default breakpoint, in terminal columns.
pub const DEFAULT_BREAKPOINT: u16 = 80;

/// Default identifier prefix for generated markup ids.
pub const DEFAULT_PREFIX: &str = "viewtable";

/// Default resize debounce window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Resolved widget configuration.
///
/// Construct with [`Config::default`] and builder methods, or resolve from a
/// source's declarative attributes with [`Config::from_attrs`].
///
/// # Examples
///
/// ```rust
/// use viewtable::config::Config;
///
/// let config = Config::default()
///     .with_visible_count(2)
///     .with_breakpoint(60)
///     .with_exclusive(true);
///
/// assert_eq!(config.visible_count, 2);
/// assert_eq!(config.breakpoint, 60);
/// assert!(config.exclusive);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of leading columns rendered in each card's main segment.
    pub visible_count: usize,
    /// Explicit visible column names, in display order. Overrides
    /// `visible_count` when set; names not present in the header list are
    /// skipped.
    pub visible_columns: Option<Vec<String>>,
    /// Width at or below which the card view is shown, in terminal columns.
    pub breakpoint: u16,
    /// Index of the column whose cell supplies the card title line, if any.
    pub title_column: Option<usize>,
    /// Prefix for generated row and detail identifiers.
    pub prefix: String,
    /// When true, expanding a row collapses every other expanded row.
    pub exclusive: bool,
    /// Quiet period for coalescing viewport resizes.
    pub debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            visible_count: DEFAULT_VISIBLE_COUNT,
            visible_columns: None,
            breakpoint: DEFAULT_BREAKPOINT,
            title_column: None,
            prefix: DEFAULT_PREFIX.to_string(),
            exclusive: false,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl Config {
    /// Resolves a configuration from a source's declarative attributes.
    ///
    /// Missing attributes fall back to defaults. Malformed numeric values are
    /// reported via `tracing::warn!` and fall back to defaults as well; this
    /// method never fails.
    pub fn from_attrs(source: &TableSource) -> Self {
        let mut config = Self::default();

        if let Some(count) = parse_attr(source, "visible-columns") {
            config.visible_count = count;
        }
        if let Some(raw) = source.attr("mobile-columns") {
            let names: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            if !names.is_empty() {
                config.visible_columns = Some(names);
            }
        }
        if let Some(breakpoint) = parse_attr(source, "breakpoint") {
            config.breakpoint = breakpoint;
        }
        if let Some(index) = parse_attr(source, "title-column") {
            config.title_column = Some(index);
        }
        if let Some(prefix) = source.attr("prefix") {
            if !prefix.trim().is_empty() {
                config.prefix = prefix.trim().to_string();
            }
        }
        if let Some(raw) = source.attr("exclusive") {
            // Boolean-style attribute: presence alone means true.
            config.exclusive = raw.trim().is_empty() || parse_bool(source.name(), raw);
        }
        if let Some(ms) = parse_attr::<u64>(source, "debounce-ms") {
            config.debounce = Duration::from_millis(ms);
        }

        config
    }

    /// Sets the visible column count (builder pattern).
    pub fn with_visible_count(mut self, count: usize) -> Self {
        self.visible_count = count;
        self
    }

    /// Sets the explicit visible column name list (builder pattern).
    pub fn with_visible_columns<S: Into<String>>(mut self, names: Vec<S>) -> Self {
        self.visible_columns = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the breakpoint width (builder pattern).
    pub fn with_breakpoint(mut self, breakpoint: u16) -> Self {
        self.breakpoint = breakpoint;
        self
    }

    /// Sets the title column index (builder pattern).
    pub fn with_title_column(mut self, index: usize) -> Self {
        self.title_column = Some(index);
        self
    }

    /// Sets the identifier prefix (builder pattern).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets exclusive row expansion (builder pattern).
    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    /// Sets the resize debounce window (builder pattern).
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// Partial configuration overrides, merged into an existing [`Config`] by the
/// update-configuration operation.
///
/// Every field defaults to "leave unchanged". Setting `visible_columns` to an
/// empty list clears an explicit column selection, reverting to count-based
/// selection.
///
/// # Examples
///
/// ```rust
/// use viewtable::config::{Config, ConfigPatch};
///
/// let mut config = Config::default();
/// ConfigPatch::default()
///     .visible_count(2)
///     .exclusive(true)
///     .apply(&mut config);
///
/// assert_eq!(config.visible_count, 2);
/// assert!(config.exclusive);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    visible_count: Option<usize>,
    visible_columns: Option<Vec<String>>,
    breakpoint: Option<u16>,
    title_column: Option<usize>,
    prefix: Option<String>,
    exclusive: Option<bool>,
    debounce: Option<Duration>,
}

impl ConfigPatch {
    /// Creates an empty patch that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the visible column count.
    pub fn visible_count(mut self, count: usize) -> Self {
        self.visible_count = Some(count);
        self
    }

    /// Overrides the explicit visible column list. An empty list clears it.
    pub fn visible_columns<S: Into<String>>(mut self, names: Vec<S>) -> Self {
        self.visible_columns = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Overrides the breakpoint width.
    pub fn breakpoint(mut self, breakpoint: u16) -> Self {
        self.breakpoint = Some(breakpoint);
        self
    }

    /// Overrides the title column index.
    pub fn title_column(mut self, index: usize) -> Self {
        self.title_column = Some(index);
        self
    }

    /// Overrides the identifier prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Overrides exclusive row expansion.
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = Some(exclusive);
        self
    }

    /// Overrides the resize debounce window.
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = Some(debounce);
        self
    }

    /// Merges this patch into a configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(count) = self.visible_count {
            config.visible_count = count;
        }
        if let Some(names) = &self.visible_columns {
            config.visible_columns = if names.is_empty() {
                None
            } else {
                Some(names.clone())
            };
        }
        if let Some(breakpoint) = self.breakpoint {
            config.breakpoint = breakpoint;
        }
        if let Some(index) = self.title_column {
            config.title_column = Some(index);
        }
        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        if let Some(exclusive) = self.exclusive {
            config.exclusive = exclusive;
        }
        if let Some(debounce) = self.debounce {
            config.debounce = debounce;
        }
    }
}

/// Parses a numeric attribute, warning and returning `None` on malformed
/// input so the caller keeps its default.
fn parse_attr<T: FromStr>(source: &TableSource, key: &str) -> Option<T> {
    let raw = source.attr(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(
                source = source.name(),
                attr = key,
                value = raw,
                "malformed attribute, using default"
            );
            None
        }
    }
}

fn parse_bool(source_name: &str, raw: &str) -> bool {
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                source = source_name,
                attr = "exclusive",
                value = raw,
                "malformed attribute, using default"
            );
            false
        }
    }
}

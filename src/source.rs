//! Table sources: the structured input rendered by the widget.
//!
//! A [`TableSource`] is an ordered list of header labels plus ordered body
//! rows, along with a flat set of declarative string attributes that drive
//! configuration resolution (see [`crate::config`]). Sources are plain data;
//! the widget reads them but never mutates their content.

use std::collections::BTreeMap;

/// Attribute that marks a source as managed by [`crate::registry::Registry::scan`].
pub const ACTIVATION_ATTR: &str = "viewtable";

/// A structured table: named, with ordered headers and ordered body rows.
///
/// Cells are "rich" strings and may carry ANSI styling, which the card view
/// preserves verbatim. Header labels are treated as plain text. Rows may be
/// shorter than the header list; missing cells render as empty values.
///
/// # Examples
///
/// ```rust
/// use viewtable::source::TableSource;
///
/// let source = TableSource::new("people", vec!["Name", "Age", "City", "Country"])
///     .with_attr("viewtable", "")
///     .with_attr("visible-columns", "2");
/// let source = source.with_rows(vec![
///     vec!["Ada".into(), "30".into(), "London".into(), "UK".into()],
/// ]);
///
/// assert_eq!(source.headers().len(), 4);
/// assert!(source.marked());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSource {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    attrs: BTreeMap<String, String>,
}

impl TableSource {
    /// Creates a source with the given name and header labels.
    ///
    /// The name identifies the source to the registry (instance lookup, and
    /// the "already managed" check during a scan).
    pub fn new<S: Into<String>>(name: impl Into<String>, headers: Vec<S>) -> Self {
        Self {
            name: name.into(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            attrs: BTreeMap::new(),
        }
    }

    /// Sets the body rows (builder pattern).
    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows = rows;
        self
    }

    /// Appends a single body row.
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Replaces the body rows.
    pub fn set_rows(&mut self, rows: Vec<Vec<String>>) {
        self.rows = rows;
    }

    /// Sets a declarative attribute (builder pattern).
    ///
    /// Attributes are the analogue of `data-*` attributes: string key/value
    /// pairs read once when configuration is resolved. An empty value is
    /// valid and, for boolean-style attributes, means "present".
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Returns the value of a declarative attribute, if present.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Returns true if the source carries the activation marker.
    pub fn marked(&self) -> bool {
        self.attrs.contains_key(ACTIVATION_ATTR)
    }

    /// The source's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered header labels.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The ordered body rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

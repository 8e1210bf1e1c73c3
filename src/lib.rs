#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/viewtable/")]

//! # viewtable
//!
//! A responsive table widget for [bubbletea-rs](https://github.com/joshka/bubbletea-rs):
//! render a table normally on wide viewports and collapse it into an
//! expandable card list when the viewport shrinks to or below a configurable
//! breakpoint.
//!
//! ## Overview
//!
//! A [`ViewTable`] wraps a [`TableSource`] (ordered headers, ordered rows,
//! declarative attributes) and shows exactly one of two views:
//!
//! - **Table view** above the breakpoint: the familiar aligned-column layout.
//! - **Card view** at or below it: one block per row showing only the
//!   configured "visible" columns, with the remaining columns tucked into a
//!   per-row detail section that expands and collapses.
//!
//! Card content is generated lazily the first time the widget enters card
//! mode and cached until refreshed, so switching back and forth on resize is
//! cheap. Resizes themselves are debounced: a burst of `WindowSizeMsg`
//! notifications results in a single re-evaluation after a quiet period.
//!
//! ## Configuration
//!
//! Options are resolved once from the source's declarative attributes
//! (`visible-columns`, `mobile-columns`, `breakpoint`, `title-column`,
//! `prefix`, `exclusive`, `debounce-ms`), with safe parsing: malformed
//! values fall back to defaults and are reported via `tracing`. See
//! [`config`] for the full table.
//!
//! ## Quick Start
//!
//! ```rust
//! use viewtable::prelude::*;
//!
//! let source = TableSource::new("people", vec!["Name", "Age", "City", "Country"])
//!     .with_attr("visible-columns", "2")
//!     .with_attr("breakpoint", "60")
//!     .with_rows(vec![
//!         vec!["Ada".into(), "30".into(), "London".into(), "UK".into()],
//!     ]);
//!
//! let mut table = ViewTable::new(source).with_width(40);
//! assert_eq!(table.mode(), Mode::Cards);
//!
//! table.toggle_row(0);
//! assert!(table.view().contains("London")); // detail pair now visible
//! ```
//!
//! ## Managing several tables
//!
//! The [`Registry`] is the auto-initialization entry point: it scans a set of
//! sources, attaches every one carrying the `viewtable` activation marker,
//! and owns a single debounced resize scheduler for all of them. See
//! [`registry`] for lifecycle operations (lookup, refresh, configuration
//! update, destroy).

pub mod card;
pub mod config;
pub mod key;
pub mod model;
pub mod registry;
pub mod source;
pub mod style;

pub use card::{partition, CardRow, CardView};
pub use config::{Config, ConfigPatch};
pub use key::{Binding, ViewTableKeyMap};
pub use model::{Mode, Model as ViewTable, ResizeMsg};
pub use registry::{InstanceId, Registry, RegistryResizeMsg};
pub use source::{TableSource, ACTIVATION_ATTR};
pub use style::{Styles, COLLAPSED_GLYPH, EXPANDED_GLYPH};

/// Prelude module for convenient imports.
///
/// ```rust
/// use viewtable::prelude::*;
///
/// let registry = Registry::new();
/// assert!(registry.is_empty());
/// ```
pub mod prelude {
    pub use crate::card::{CardRow, CardView};
    pub use crate::config::{Config, ConfigPatch};
    pub use crate::key::ViewTableKeyMap;
    pub use crate::model::{Mode, Model as ViewTable, ResizeMsg};
    pub use crate::registry::{InstanceId, Registry, RegistryResizeMsg};
    pub use crate::source::TableSource;
    pub use crate::style::Styles;
}

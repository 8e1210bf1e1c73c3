//! The public lifecycle API: managing a set of widget instances.
//!
//! A [`Registry`] owns one [`Model`] per managed source, keyed by a stable
//! [`InstanceId`] assigned at attach time. It is the analogue of the
//! original auto-initialization entry point: scan a set of sources, attach
//! the marked ones, and offer lookup, refresh, configuration update, and
//! destroy operations per instance.
//!
//! The registry also owns a single debounced resize scheduler: one viewport
//! resize notification fans out to every managed instance after the quiet
//! period, instead of each instance debouncing on its own.
//!
//! # Examples
//!
//! ```rust
//! use viewtable::prelude::*;
//!
//! let mut registry = Registry::new();
//! let ids = registry.scan(vec![
//!     TableSource::new("people", vec!["Name", "Age"]).with_attr("viewtable", ""),
//!     TableSource::new("ignored", vec!["X"]), // no activation marker
//! ]);
//! assert_eq!(ids.len(), 1);
//!
//! registry.set_width(40);
//! registry.refresh_all();
//!
//! let source = registry.destroy(ids[0]).expect("managed instance");
//! assert_eq!(source.name(), "people");
//! assert!(registry.is_empty());
//! ```

use crate::config::ConfigPatch;
use crate::model::Model;
use crate::source::TableSource;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg, WindowSizeMsg};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

static LAST_INSTANCE: AtomicU64 = AtomicU64::new(0);

/// Stable identifier for a managed widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        Self(LAST_INSTANCE.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Message sent after the registry's resize quiet period elapses.
#[derive(Debug)]
pub struct RegistryResizeMsg {
    /// The registry this message belongs to.
    pub id: i64,
    /// Discriminates the latest scheduled evaluation from stale ones.
    pub tag: i64,
    /// The viewport width observed when the resize arrived.
    pub width: u16,
}

static LAST_REGISTRY: std::sync::atomic::AtomicI64 = std::sync::atomic::AtomicI64::new(0);

/// An explicit map of managed widget instances.
#[derive(Debug)]
pub struct Registry {
    instances: BTreeMap<InstanceId, Model>,
    focus: Option<InstanceId>,
    id: i64,
    resize_tag: i64,
    debounce: Duration,
}

impl Registry {
    /// Creates an empty registry with the default debounce window.
    pub fn new() -> Self {
        Self {
            instances: BTreeMap::new(),
            focus: None,
            id: LAST_REGISTRY.fetch_add(1, Ordering::SeqCst) + 1,
            resize_tag: 0,
            debounce: crate::config::DEFAULT_DEBOUNCE,
        }
    }

    /// Sets the resize debounce window (builder pattern).
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Attaches every source carrying the activation marker, skipping any
    /// whose name is already managed. Returns the ids of the attached
    /// instances, in input order.
    pub fn scan(&mut self, sources: Vec<TableSource>) -> Vec<InstanceId> {
        sources
            .into_iter()
            .filter_map(|source| self.attach(source).ok())
            .collect()
    }

    /// Attaches a single source, taking ownership of it.
    ///
    /// Returns the source unchanged if it lacks the activation marker or a
    /// source with the same name is already managed.
    pub fn attach(&mut self, source: TableSource) -> Result<InstanceId, TableSource> {
        if !source.marked() || self.find(source.name()).is_some() {
            return Err(source);
        }
        let id = InstanceId::next();
        debug!(source = source.name(), instance = id.0, "attached");
        self.instances.insert(id, Model::new(source));
        if self.focus.is_none() {
            self.focus = Some(id);
        }
        Ok(id)
    }

    /// Looks up the managed instance for a source name.
    pub fn find(&self, name: &str) -> Option<InstanceId> {
        self.instances
            .iter()
            .find(|(_, model)| model.source().name() == name)
            .map(|(id, _)| *id)
    }

    /// Returns a managed instance.
    pub fn get(&self, id: InstanceId) -> Option<&Model> {
        self.instances.get(&id)
    }

    /// Returns a managed instance mutably.
    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut Model> {
        self.instances.get_mut(&id)
    }

    /// Which instance receives forwarded key messages.
    pub fn focused(&self) -> Option<InstanceId> {
        self.focus
    }

    /// Directs forwarded key messages at an instance. Ignored if the id is
    /// not managed.
    pub fn focus(&mut self, id: InstanceId) {
        if self.instances.contains_key(&id) {
            self.focus = Some(id);
        }
    }

    /// Regenerates one instance's card content from its current source.
    /// Returns false if the id is not managed.
    pub fn refresh(&mut self, id: InstanceId) -> bool {
        match self.instances.get_mut(&id) {
            Some(model) => {
                model.refresh();
                true
            }
            None => false,
        }
    }

    /// Regenerates every managed instance's card content.
    pub fn refresh_all(&mut self) {
        for model in self.instances.values_mut() {
            model.refresh();
        }
    }

    /// Merges configuration overrides into one instance and refreshes it.
    /// Returns false if the id is not managed.
    pub fn update_config(&mut self, id: InstanceId, patch: &ConfigPatch) -> bool {
        match self.instances.get_mut(&id) {
            Some(model) => {
                model.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Removes an instance and returns its source to the caller.
    pub fn destroy(&mut self, id: InstanceId) -> Option<TableSource> {
        let model = self.instances.remove(&id)?;
        if self.focus == Some(id) {
            self.focus = self.instances.keys().next().copied();
        }
        debug!(source = model.source().name(), instance = id.0, "destroyed");
        Some(model.into_source())
    }

    /// Applies a viewport width to every managed instance immediately.
    pub fn set_width(&mut self, width: u16) {
        for model in self.instances.values_mut() {
            model.set_width(width);
        }
    }

    /// Processes messages for the whole set of instances.
    ///
    /// Viewport resizes are debounced once here and fanned out to every
    /// instance; any other message is forwarded to the focused instance.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.resize_tag += 1;
            let (id, tag) = (self.id, self.resize_tag);
            let width = size.width as u16;
            return Some(bubbletea_tick(self.debounce, move |_| {
                Box::new(RegistryResizeMsg { id, tag, width }) as Msg
            }));
        }

        if let Some(resize) = msg.downcast_ref::<RegistryResizeMsg>() {
            if resize.id != 0 && resize.id != self.id {
                return None;
            }
            if resize.tag > 0 && resize.tag != self.resize_tag {
                return None;
            }
            self.set_width(resize.width);
            return None;
        }

        let focus = self.focus?;
        self.instances.get_mut(&focus)?.update(msg)
    }

    /// Renders one managed instance.
    pub fn view(&self, id: InstanceId) -> Option<String> {
        self.get(id).map(Model::view)
    }

    /// Ids of every managed instance.
    pub fn ids(&self) -> Vec<InstanceId> {
        self.instances.keys().copied().collect()
    }

    /// Number of managed instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if no instance is managed.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mode;
    use crate::source::ACTIVATION_ATTR;

    fn marked(name: &str) -> TableSource {
        TableSource::new(name, vec!["Name", "Age", "City", "Country"])
            .with_attr(ACTIVATION_ATTR, "")
            .with_attr("breakpoint", "60")
            .with_rows(vec![vec![
                "Ada".into(),
                "30".into(),
                "London".into(),
                "UK".into(),
            ]])
    }

    #[test]
    fn test_scan_attaches_only_marked_sources() {
        let mut registry = Registry::new();
        let ids = registry.scan(vec![
            marked("a"),
            TableSource::new("plain", vec!["X"]),
            marked("b"),
        ]);
        assert_eq!(ids.len(), 2);
        assert_eq!(registry.len(), 2);
        assert!(registry.find("plain").is_none());
    }

    #[test]
    fn test_scan_skips_already_managed_names() {
        let mut registry = Registry::new();
        registry.scan(vec![marked("a")]);
        let ids = registry.scan(vec![marked("a"), marked("b")]);
        assert_eq!(ids.len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_attach_returns_unmarked_source() {
        let mut registry = Registry::new();
        let source = TableSource::new("plain", vec!["X"]);
        let rejected = registry.attach(source.clone());
        assert_eq!(rejected, Err(source));
    }

    #[test]
    fn test_find_and_lookup() {
        let mut registry = Registry::new();
        let ids = registry.scan(vec![marked("a"), marked("b")]);
        assert_eq!(registry.find("b"), Some(ids[1]));
        assert_eq!(registry.get(ids[0]).map(|m| m.source().name()), Some("a"));
    }

    #[test]
    fn test_destroy_returns_source_and_forgets_instance() {
        let mut registry = Registry::new();
        let ids = registry.scan(vec![marked("a")]);
        registry.set_width(40); // generate some card content first

        let restored = registry.destroy(ids[0]).expect("managed instance");
        assert_eq!(restored.name(), "a");
        assert_eq!(restored.rows().len(), 1);
        assert!(registry.is_empty());
        assert!(registry.destroy(ids[0]).is_none());
    }

    #[test]
    fn test_set_width_fans_out_to_every_instance() {
        let mut registry = Registry::new();
        let ids = registry.scan(vec![marked("a"), marked("b")]);

        registry.set_width(40);
        for id in &ids {
            assert_eq!(registry.get(*id).map(|m| m.mode()), Some(Mode::Cards));
        }

        registry.set_width(100);
        for id in &ids {
            assert_eq!(registry.get(*id).map(|m| m.mode()), Some(Mode::Table));
        }
    }

    #[test]
    fn test_registry_resize_msg_applies_to_all() {
        let mut registry = Registry::new();
        let ids = registry.scan(vec![marked("a"), marked("b")]);

        registry.update(Box::new(RegistryResizeMsg {
            id: 0,
            tag: 0,
            width: 40,
        }));
        for id in &ids {
            assert_eq!(registry.get(*id).map(|m| m.mode()), Some(Mode::Cards));
        }

        // Stale tag: a newer resize replaced this evaluation.
        registry.update(Box::new(RegistryResizeMsg {
            id: 0,
            tag: 3,
            width: 100,
        }));
        for id in &ids {
            assert_eq!(registry.get(*id).map(|m| m.mode()), Some(Mode::Cards));
        }
    }

    #[test]
    fn test_update_config_refreshes_instance() {
        let mut registry = Registry::new();
        let ids = registry.scan(vec![marked("a")]);
        registry.set_width(40);

        assert!(registry.update_config(ids[0], &ConfigPatch::new().visible_count(1)));
        let model = registry.get(ids[0]).expect("managed instance");
        let view = model.cards().expect("card view should be generated");
        assert_eq!(view.headers, vec!["Name"]);
    }

    #[test]
    fn test_focus_follows_destroy() {
        let mut registry = Registry::new();
        let ids = registry.scan(vec![marked("a"), marked("b")]);
        assert_eq!(registry.focused(), Some(ids[0]));

        registry.destroy(ids[0]);
        assert_eq!(registry.focused(), Some(ids[1]));

        registry.destroy(ids[1]);
        assert_eq!(registry.focused(), None);
    }
}

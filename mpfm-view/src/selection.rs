//! The single "what is in focus" state shared by the sidebar, charts, tables
//! and alarm list.
//!
//! A [`SelectionStore`] holds either nothing, one hierarchy node or one device.
//! Selecting a node clears the device and the other way round. Every real
//! transition bumps [`SelectionStore::revision`] and notifies subscribers so
//! dependent views refetch with the new [`ScopeFilter`].

use mpfm_model::device::Device;
use mpfm_model::hierarchy::{ArenaNode, Hierarchy, Level};
use std::fmt;

/// Snapshot of a selected hierarchy node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedNode {
    pub id: String,
    pub name: String,
    pub level: Level,
}

impl From<&ArenaNode> for SelectedNode {
    fn from(node: &ArenaNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            level: node.level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    #[default]
    Empty,
    Hierarchy(SelectedNode),
    Device(Device),
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty)
    }

    pub fn hierarchy(&self) -> Option<&SelectedNode> {
        match self {
            Selection::Hierarchy(node) => Some(node),
            _ => None,
        }
    }

    pub fn device(&self) -> Option<&Device> {
        match self {
            Selection::Device(device) => Some(device),
            _ => None,
        }
    }

    pub fn is_node_selected(&self, id: &str) -> bool {
        self.hierarchy().is_some_and(|node| node.id == id)
    }

    pub fn is_device_selected(&self, id: &str) -> bool {
        self.device().is_some_and(|device| device.id == id)
    }

    /// Query filter dependent views use when refetching.
    pub fn filter(&self) -> ScopeFilter {
        match self {
            Selection::Empty => ScopeFilter::default(),
            Selection::Hierarchy(node) => ScopeFilter {
                hierarchy_id: Some(node.id.clone()),
                device_id: None,
            },
            Selection::Device(device) => ScopeFilter {
                hierarchy_id: None,
                device_id: Some(device.id.clone()),
            },
        }
    }

    /// Same kind and same id; payload differences are ignored.
    fn same_target(&self, other: &Selection) -> bool {
        match (self, other) {
            (Selection::Empty, Selection::Empty) => true,
            (Selection::Hierarchy(a), Selection::Hierarchy(b)) => a.id == b.id,
            (Selection::Device(a), Selection::Device(b)) => a.id == b.id,
            _ => false,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Empty => f.write_str("nothing selected"),
            Selection::Hierarchy(node) => write!(f, "{} {}", node.level, node.name),
            Selection::Device(device) => write!(f, "device {}", device.serial_number),
        }
    }
}

/// Filter parameters derived from the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeFilter {
    pub hierarchy_id: Option<String>,
    pub device_id: Option<String>,
}

impl ScopeFilter {
    pub fn is_unscoped(&self) -> bool {
        self.hierarchy_id.is_none() && self.device_id.is_none()
    }

    /// `(name, value)` query parameters for list endpoints.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = &self.hierarchy_id {
            pairs.push(("hierarchyId", id.clone()));
        }
        if let Some(id) = &self.device_id {
            pairs.push(("deviceId", id.clone()));
        }
        pairs
    }
}

/// Handle returned by [`SelectionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Selection, u64)>;

#[derive(Default)]
pub struct SelectionStore {
    current: Selection,
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    /// Incremented on every transition; starts at 0.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn filter(&self) -> ScopeFilter {
        self.current.filter()
    }

    /// Focus a hierarchy node, clearing any selected device.
    pub fn select_hierarchy(&mut self, node: SelectedNode) -> bool {
        self.transition(Selection::Hierarchy(node))
    }

    /// Focus a device, clearing any selected hierarchy node.
    pub fn select_device(&mut self, device: Device) -> bool {
        self.transition(Selection::Device(device))
    }

    pub fn clear(&mut self) -> bool {
        self.transition(Selection::Empty)
    }

    /// Select the tree's default node after the first successful load.
    ///
    /// Only applies while nothing is selected, so a user's choice is never
    /// overridden by a refetch of the tree.
    pub fn auto_select(&mut self, hierarchy: &Hierarchy) -> bool {
        if !self.current.is_empty() {
            return false;
        }
        match hierarchy.default_selection() {
            Some(index) => self.select_hierarchy(SelectedNode::from(&hierarchy[index])),
            None => false,
        }
    }

    /// Register a callback run after every transition with the new selection
    /// and revision.
    pub fn subscribe(&mut self, listener: impl FnMut(&Selection, u64) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn transition(&mut self, next: Selection) -> bool {
        if self.current.same_target(&next) {
            // Refresh the payload (e.g. a device's status) without a new revision.
            self.current = next;
            return false;
        }
        self.current = next;
        self.revision += 1;
        log::debug!("Selection -> {} (revision {})", self.current, self.revision);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.current, self.revision);
        }
        true
    }
}

impl fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionStore")
            .field("current", &self.current)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpfm_model::hierarchy::HierarchyNode;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn node(id: &str) -> SelectedNode {
        SelectedNode {
            id: id.to_string(),
            name: id.to_uppercase(),
            level: Level::Field,
        }
    }

    fn device(id: &str) -> Device {
        Device::new(id, format!("SN-{id}"), Some("W1"))
    }

    #[test]
    fn hierarchy_and_device_are_mutually_exclusive() {
        let mut store = SelectionStore::new();
        let priors = [
            Selection::Empty,
            Selection::Hierarchy(node("f1")),
            Selection::Device(device("d1")),
        ];
        for prior in priors {
            store.transition(prior.clone());
            store.select_device(device("d2"));
            assert!(store.current().hierarchy().is_none());
            assert!(store.current().is_device_selected("d2"));

            store.transition(prior);
            store.select_hierarchy(node("f2"));
            assert!(store.current().device().is_none());
            assert!(store.current().is_node_selected("f2"));
        }
    }

    #[test]
    fn revision_bumps_only_on_real_transitions() {
        let mut store = SelectionStore::new();
        assert_eq!(store.revision(), 0);
        assert!(store.select_hierarchy(node("f1")));
        assert!(!store.select_hierarchy(node("f1")));
        assert_eq!(store.revision(), 1);
        assert!(store.select_device(device("d1")));
        assert_eq!(store.revision(), 2);
        assert!(store.clear());
        assert!(!store.clear());
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn reselecting_device_refreshes_payload() {
        let mut store = SelectionStore::new();
        store.select_device(device("d1"));
        let mut updated = device("d1");
        updated.serial_number = "SN-NEW".into();
        assert!(!store.select_device(updated));
        assert_eq!(store.current().device().unwrap().serial_number, "SN-NEW");
    }

    #[test]
    fn subscribers_see_every_transition() {
        let seen: Rc<RefCell<Vec<(ScopeFilter, u64)>>> = Rc::default();
        let mut store = SelectionStore::new();
        let sink = seen.clone();
        let id = store.subscribe(move |selection, revision| {
            sink.borrow_mut().push((selection.filter(), revision));
        });

        store.select_hierarchy(node("f1"));
        store.select_device(device("d9"));
        assert!(store.unsubscribe(id));
        store.clear();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0.hierarchy_id.as_deref(), Some("f1"));
        assert_eq!(seen[1].0.device_id.as_deref(), Some("d9"));
        assert_eq!(seen[1].1, 2);
    }

    #[test]
    fn auto_select_only_when_empty() {
        let h = Hierarchy::from_roots(vec![HierarchyNode::new("c1", "Acme", Level::Company)
            .with_child(HierarchyNode::new("r1", "East", Level::Region))])
        .unwrap();

        let mut store = SelectionStore::new();
        assert!(store.auto_select(&h));
        assert!(store.current().is_node_selected("r1"));

        let mut picked = SelectionStore::new();
        picked.select_device(device("d1"));
        assert!(!picked.auto_select(&h));
        assert!(picked.current().is_device_selected("d1"));

        assert!(!SelectionStore::new().auto_select(&Hierarchy::default()));
    }

    #[test]
    fn filter_query_pairs() {
        assert!(Selection::Empty.filter().is_unscoped());
        let pairs = Selection::Hierarchy(node("f1")).filter().query_pairs();
        assert_eq!(pairs, vec![("hierarchyId", "f1".to_string())]);
        let pairs = Selection::Device(device("d1")).filter().query_pairs();
        assert_eq!(pairs, vec![("deviceId", "d1".to_string())]);
    }
}

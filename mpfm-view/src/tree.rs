//! Sidebar tree rendering.
//!
//! [`TreeView::rows`] turns the hierarchy, the device groups, the set of
//! expanded node ids and the current selection into the flat list of visible
//! rows. It holds no state of its own: the same inputs always produce the
//! same rows, and the walk uses an explicit stack rather than recursion.

use crate::grouping::DeviceGroups;
use crate::selection::{SelectedNode, Selection, SelectionStore};
use mpfm_model::device::Device;
use mpfm_model::hierarchy::{ArenaNode, Hierarchy, NodeIndex};
use std::collections::HashSet;

/// Icon key for device rows.
pub const DEVICE_ICON: &str = "cpu";

/// Ids of the nodes whose children are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedSet(HashSet<String>);

impl ExpandedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Flip a node between expanded and collapsed; returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.to_string());
            true
        }
    }

    pub fn expand(&mut self, id: &str) {
        self.0.insert(id.to_string());
    }

    pub fn collapse(&mut self, id: &str) {
        self.0.remove(id);
    }

    pub fn expand_all(&mut self, hierarchy: &Hierarchy) {
        self.0.extend(hierarchy.iter().map(|(_, node)| node.id.clone()));
    }

    pub fn collapse_all(&mut self) {
        self.0.clear();
    }

    /// Expand every ancestor of `index` so that its row becomes visible.
    pub fn reveal(&mut self, hierarchy: &Hierarchy, index: NodeIndex) {
        let path = hierarchy.ancestors(index);
        if let Some((_, ancestors)) = path.split_last() {
            for &ancestor in ancestors {
                self.expand(&hierarchy[ancestor].id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowKind<'a> {
    Node {
        index: NodeIndex,
        node: &'a ArenaNode,
    },
    /// A device nested under its well.
    Device {
        well: NodeIndex,
        device: &'a Device,
    },
}

/// One visible line of the sidebar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeRow<'a> {
    pub depth: usize,
    pub kind: RowKind<'a>,
    pub expandable: bool,
    pub expanded: bool,
    pub selected: bool,
}

impl<'a> TreeRow<'a> {
    /// Node id or device id.
    pub fn id(&self) -> &'a str {
        match self.kind {
            RowKind::Node { node, .. } => &node.id,
            RowKind::Device { device, .. } => &device.id,
        }
    }

    pub fn label(&self) -> &'a str {
        match self.kind {
            RowKind::Node { node, .. } => &node.name,
            RowKind::Device { device, .. } => &device.serial_number,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.kind {
            RowKind::Node { node, .. } => node.level.icon(),
            RowKind::Device { .. } => DEVICE_ICON,
        }
    }

    pub fn is_device(&self) -> bool {
        matches!(self.kind, RowKind::Device { .. })
    }

    /// Click on the row body.
    pub fn select_action(&self) -> TreeAction {
        match self.kind {
            RowKind::Node { node, .. } => TreeAction::SelectNode(node.id.clone()),
            RowKind::Device { device, .. } => TreeAction::SelectDevice(device.id.clone()),
        }
    }
}

/// Everything needed to lay out the sidebar for one render.
#[derive(Debug, Clone, Copy)]
pub struct TreeView<'a> {
    hierarchy: &'a Hierarchy,
    groups: &'a DeviceGroups,
    expanded: &'a ExpandedSet,
    selection: &'a Selection,
}

impl<'a> TreeView<'a> {
    pub fn new(
        hierarchy: &'a Hierarchy,
        groups: &'a DeviceGroups,
        expanded: &'a ExpandedSet,
        selection: &'a Selection,
    ) -> Self {
        Self {
            hierarchy,
            groups,
            expanded,
            selection,
        }
    }

    /// A node can be expanded when it has children or, for a well, devices.
    pub fn is_expandable(&self, node: &ArenaNode) -> bool {
        node.has_children() || !self.groups.for_well(node).is_empty()
    }

    /// Visible rows in display order.
    pub fn rows(&self) -> Rows<'a> {
        Rows {
            view: *self,
            stack: self
                .hierarchy
                .roots()
                .iter()
                .rev()
                .map(|&index| Pending::Node(index))
                .collect(),
        }
    }
}

enum Pending {
    Node(NodeIndex),
    Device { well: NodeIndex, position: usize },
}

/// Iterator returned by [`TreeView::rows`].
pub struct Rows<'a> {
    view: TreeView<'a>,
    stack: Vec<Pending>,
}

impl<'a> Iterator for Rows<'a> {
    type Item = TreeRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let view = self.view;
        match self.stack.pop()? {
            Pending::Node(index) => {
                let node = &view.hierarchy[index];
                let expandable = view.is_expandable(node);
                let expanded = expandable && view.expanded.contains(&node.id);
                if expanded {
                    // Child nodes first, then the well's own devices.
                    let devices = view.groups.for_well(node).len();
                    self.stack
                        .extend((0..devices).rev().map(|position| Pending::Device { well: index, position }));
                    self.stack
                        .extend(node.children().iter().rev().map(|&child| Pending::Node(child)));
                }
                Some(TreeRow {
                    depth: node.depth,
                    kind: RowKind::Node { index, node },
                    expandable,
                    expanded,
                    selected: view.selection.is_node_selected(&node.id),
                })
            }
            Pending::Device { well, position } => {
                let well_node = &view.hierarchy[well];
                let device = &view.groups.for_well(well_node)[position];
                Some(TreeRow {
                    depth: well_node.depth + 1,
                    kind: RowKind::Device { well, device },
                    expandable: false,
                    expanded: false,
                    selected: view.selection.is_device_selected(&device.id),
                })
            }
        }
    }
}

/// User interaction with a sidebar row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeAction {
    /// Disclosure control: expansion only.
    Toggle(String),
    /// Row body of a hierarchy node: selection only.
    SelectNode(String),
    /// Row body of a device.
    SelectDevice(String),
}

impl TreeAction {
    /// Whether the action targets the selection. Paged views restart at their
    /// first page when such an action applies.
    pub fn changes_selection(&self) -> bool {
        !matches!(self, TreeAction::Toggle(_))
    }
}

/// Apply a sidebar interaction. Returns whether anything changed.
pub fn apply_action(
    action: &TreeAction,
    hierarchy: &Hierarchy,
    groups: &DeviceGroups,
    expanded: &mut ExpandedSet,
    store: &mut SelectionStore,
) -> bool {
    match action {
        TreeAction::Toggle(id) => {
            if hierarchy.find(id).is_none() {
                return false;
            }
            expanded.toggle(id);
            true
        }
        TreeAction::SelectNode(id) => match hierarchy.find_node(id) {
            Some(node) => store.select_hierarchy(SelectedNode::from(node)),
            None => false,
        },
        TreeAction::SelectDevice(id) => match groups.find_device(id) {
            Some(device) => store.select_device(device.clone()),
            None => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::JoinKey;
    use mpfm_model::hierarchy::{HierarchyNode, Level};

    fn acme() -> Hierarchy {
        Hierarchy::from_roots(vec![HierarchyNode::new("c1", "Acme", Level::Company)
            .with_child(
                HierarchyNode::new("r1", "East", Level::Region)
                    .with_child(HierarchyNode::new("w1", "W1", Level::Well))
                    .with_child(HierarchyNode::new("w2", "W2", Level::Well)),
            )])
        .unwrap()
    }

    fn devices() -> DeviceGroups {
        DeviceGroups::build(
            vec![
                Device::new("1", "SN-1", Some("W1")),
                Device::new("2", "SN-2", Some("W1")),
            ],
            JoinKey::WellName,
        )
    }

    fn labels(view: &TreeView<'_>) -> Vec<(usize, String)> {
        view.rows().map(|row| (row.depth, row.label().to_string())).collect()
    }

    #[test]
    fn collapsed_tree_shows_only_roots() {
        let h = acme();
        let groups = devices();
        let expanded = ExpandedSet::new();
        let selection = Selection::Empty;
        let view = TreeView::new(&h, &groups, &expanded, &selection);
        assert_eq!(labels(&view), vec![(0, "Acme".to_string())]);
    }

    #[test]
    fn expanded_well_nests_its_devices() {
        let h = acme();
        let groups = devices();
        let mut expanded = ExpandedSet::new();
        expanded.expand_all(&h);
        let mut store = SelectionStore::new();
        apply_action(&TreeAction::SelectNode("w1".into()), &h, &groups, &mut expanded, &mut store);

        let view = TreeView::new(&h, &groups, &expanded, store.current());
        let rows: Vec<TreeRow<'_>> = view.rows().collect();
        let shape: Vec<(usize, &str)> = rows.iter().map(|r| (r.depth, r.label())).collect();
        assert_eq!(
            shape,
            vec![(0, "Acme"), (1, "East"), (2, "W1"), (3, "SN-1"), (3, "SN-2"), (2, "W2")]
        );

        let w1 = rows.iter().find(|r| r.id() == "w1").unwrap();
        assert!(w1.selected && w1.expandable && w1.expanded);
        let device_rows: Vec<_> = rows
            .iter()
            .filter(|r| matches!(r.kind, RowKind::Device { well, .. } if h[well].id == "w1"))
            .collect();
        assert_eq!(device_rows.len(), 2);
        assert!(device_rows.iter().all(|r| r.icon() == DEVICE_ICON));
    }

    #[test]
    fn well_without_devices_is_a_leaf() {
        let h = acme();
        let groups = devices();
        let mut expanded = ExpandedSet::new();
        expanded.expand_all(&h);
        let selection = Selection::Empty;
        let view = TreeView::new(&h, &groups, &expanded, &selection);
        let w2 = view.rows().find(|r| r.id() == "w2").unwrap();
        assert!(!w2.expandable);
        assert!(!w2.expanded);
    }

    #[test]
    fn rendering_is_deterministic() {
        let h = acme();
        let groups = devices();
        let mut expanded = ExpandedSet::new();
        expanded.expand("c1");
        expanded.expand("r1");
        let selection = Selection::Empty;
        let view = TreeView::new(&h, &groups, &expanded, &selection);
        let first: Vec<_> = view.rows().collect();
        let second: Vec<_> = view.rows().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn toggle_does_not_change_selection_and_select_does_not_expand() {
        let h = acme();
        let groups = devices();
        let mut expanded = ExpandedSet::new();
        let mut store = SelectionStore::new();

        apply_action(&TreeAction::SelectNode("r1".into()), &h, &groups, &mut expanded, &mut store);
        assert!(expanded.is_empty());
        let revision = store.revision();

        assert!(apply_action(&TreeAction::Toggle("c1".into()), &h, &groups, &mut expanded, &mut store));
        assert!(expanded.contains("c1"));
        assert_eq!(store.revision(), revision);
        assert!(store.current().is_node_selected("r1"));

        apply_action(&TreeAction::Toggle("c1".into()), &h, &groups, &mut expanded, &mut store);
        assert!(!expanded.contains("c1"));
        assert!(!apply_action(&TreeAction::Toggle("nope".into()), &h, &groups, &mut expanded, &mut store));
    }

    #[test]
    fn selecting_a_device_row_selects_the_device() {
        let h = acme();
        let groups = devices();
        let mut expanded = ExpandedSet::new();
        let mut store = SelectionStore::new();
        store.select_hierarchy(SelectedNode::from(&h[h.find("w1").unwrap()]));

        assert!(apply_action(&TreeAction::SelectDevice("2".into()), &h, &groups, &mut expanded, &mut store));
        assert!(store.current().is_device_selected("2"));
        assert!(store.current().hierarchy().is_none());
    }

    #[test]
    fn only_applied_selections_restart_paging() {
        let h = acme();
        let groups = devices();
        let mut expanded = ExpandedSet::new();
        let mut store = SelectionStore::new();

        let select = TreeAction::SelectDevice("1".into());
        assert!(apply_action(&select, &h, &groups, &mut expanded, &mut store));
        assert!(select.changes_selection());
        // Picking the same device again, from the table or the sidebar, is a no-op.
        assert!(!apply_action(&select, &h, &groups, &mut expanded, &mut store));

        let toggle = TreeAction::Toggle("c1".into());
        assert!(apply_action(&toggle, &h, &groups, &mut expanded, &mut store));
        assert!(!toggle.changes_selection());
    }

    #[test]
    fn reveal_expands_ancestors_only() {
        let h = acme();
        let mut expanded = ExpandedSet::new();
        expanded.reveal(&h, h.find("w2").unwrap());
        assert!(expanded.contains("c1"));
        assert!(expanded.contains("r1"));
        assert!(!expanded.contains("w2"));
    }
}

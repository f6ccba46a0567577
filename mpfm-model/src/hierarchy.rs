//! Company → Region → Area → Field → Well hierarchy.
//!
//! The API sends the tree as nested JSON ([`HierarchyNode`]). It is flattened
//! once into a [`Hierarchy`] arena whose nodes refer to each other by
//! [`NodeIndex`], so every traversal afterwards is an explicit-stack loop and
//! a deep tree can never exhaust the call stack.

use crate::error::{HierarchyError, ParseEnumError};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

/// Level of a node in the hierarchy, ordered from the top of the tree down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[serde(alias = "Company", alias = "COMPANY")]
    Company,
    #[serde(alias = "Region", alias = "REGION")]
    Region,
    #[serde(alias = "Area", alias = "AREA")]
    Area,
    #[serde(alias = "Field", alias = "FIELD")]
    Field,
    #[serde(alias = "Well", alias = "WELL")]
    Well,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Company,
        Level::Region,
        Level::Area,
        Level::Field,
        Level::Well,
    ];

    /// Canonical depth of the level (Company = 0).
    pub fn rank(self) -> i32 {
        match self {
            Level::Company => 0,
            Level::Region => 1,
            Level::Area => 2,
            Level::Field => 3,
            Level::Well => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Company => "company",
            Level::Region => "region",
            Level::Area => "area",
            Level::Field => "field",
            Level::Well => "well",
        }
    }

    /// Icon key used by the sidebar for rows of this level.
    pub fn icon(self) -> &'static str {
        match self {
            Level::Company => "building",
            Level::Region => "globe",
            Level::Area => "map",
            Level::Field => "layers",
            Level::Well => "droplet",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("hierarchy level", s))
    }
}

/// One node of the hierarchy as sent by `GET /hierarchy/tree`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    #[serde(deserialize_with = "crate::de::id")]
    pub id: String,
    pub name: String,
    pub level: Level,
    #[serde(default)]
    pub level_order: i32,
    #[serde(default)]
    pub can_attach_device: bool,
    /// Display order is the order of this vector.
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
    #[serde(default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl HierarchyNode {
    /// Build a childless node whose `level_order` follows its level.
    pub fn new(id: impl Into<String>, name: impl Into<String>, level: Level) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level,
            level_order: level.rank(),
            can_attach_device: level == Level::Well,
            children: Vec::new(),
            company_id: None,
            parent_id: None,
        }
    }

    pub fn with_child(mut self, child: HierarchyNode) -> Self {
        self.children.push(child);
        self
    }
}

/// Position of a node inside a [`Hierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A hierarchy node stored in the arena, linked by index.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaNode {
    pub id: String,
    pub name: String,
    pub level: Level,
    pub level_order: i32,
    pub can_attach_device: bool,
    pub company_id: Option<String>,
    pub parent_id: Option<String>,
    /// Distance from the root (roots are 0).
    pub depth: usize,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
}

impl ArenaNode {
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_well(&self) -> bool {
        self.level == Level::Well
    }
}

/// Flat, immutable arena holding a whole hierarchy tree.
///
/// Nodes are stored in pre-order, so iterating the arena front to back
/// visits every node in display order with all children expanded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hierarchy {
    nodes: Vec<ArenaNode>,
    roots: Vec<NodeIndex>,
    by_id: HashMap<String, NodeIndex>,
}

impl Hierarchy {
    /// Flatten the nested API tree into an arena.
    ///
    /// Node ids must be unique across the whole tree. A child whose
    /// `level_order` is lower than its parent's is accepted but logged.
    pub fn from_roots(roots: Vec<HierarchyNode>) -> Result<Self, HierarchyError> {
        let mut hierarchy = Hierarchy::default();
        let mut stack: Vec<(HierarchyNode, Option<NodeIndex>, usize)> =
            roots.into_iter().rev().map(|node| (node, None, 0)).collect();

        while let Some((mut node, parent, depth)) = stack.pop() {
            let index = NodeIndex(hierarchy.nodes.len());
            if hierarchy.by_id.contains_key(&node.id) {
                return Err(HierarchyError::DuplicateId(node.id));
            }
            hierarchy.by_id.insert(node.id.clone(), index);

            let children = std::mem::take(&mut node.children);
            match parent {
                Some(parent) => {
                    let parent_node = &mut hierarchy.nodes[parent.0];
                    if node.level_order < parent_node.level_order {
                        warn!(
                            "Hierarchy node {} has level order {} below its parent {} ({})",
                            node.id, node.level_order, parent_node.id, parent_node.level_order
                        );
                    }
                    parent_node.children.push(index);
                }
                None => hierarchy.roots.push(index),
            }

            hierarchy.nodes.push(ArenaNode {
                id: node.id,
                name: node.name,
                level: node.level,
                level_order: node.level_order,
                can_attach_device: node.can_attach_device,
                company_id: node.company_id,
                parent_id: node.parent_id,
                depth,
                parent,
                children: Vec::with_capacity(children.len()),
            });

            for child in children.into_iter().rev() {
                stack.push((child, Some(index), depth + 1));
            }
        }

        Ok(hierarchy)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn node(&self, index: NodeIndex) -> Option<&ArenaNode> {
        self.nodes.get(index.0)
    }

    /// Look up a node by its API id.
    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.by_id.get(id).copied()
    }

    pub fn find_node(&self, id: &str) -> Option<&ArenaNode> {
        self.find(id).map(|index| &self[index])
    }

    /// All nodes in pre-order (display order).
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &ArenaNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i), node))
    }

    /// Path from the root down to `index`, both ends included.
    pub fn ancestors(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut path = Vec::new();
        let mut current = self.node(index).map(|_| index);
        while let Some(i) = current {
            path.push(i);
            current = self.nodes[i.0].parent;
        }
        path.reverse();
        path
    }

    /// Names along the path from the root to `index`, joined for display.
    pub fn breadcrumb(&self, index: NodeIndex) -> String {
        self.ancestors(index)
            .into_iter()
            .map(|i| self.nodes[i.0].name.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Pre-order walk of the subtree rooted at `index` (including it).
    pub fn subtree(&self, index: NodeIndex) -> Subtree<'_> {
        let stack = if self.node(index).is_some() {
            vec![index]
        } else {
            Vec::new()
        };
        Subtree {
            hierarchy: self,
            stack,
        }
    }

    /// Well nodes in the subtree rooted at `index`.
    pub fn wells_under(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.subtree(index).filter(|i| self.nodes[i.0].is_well())
    }

    /// All well nodes in display order.
    pub fn wells(&self) -> impl Iterator<Item = (NodeIndex, &ArenaNode)> {
        self.iter().filter(|(_, node)| node.is_well())
    }

    /// Node selected by default once the tree has loaded: the first child of
    /// the first root, or the first root itself when it has no children.
    pub fn default_selection(&self) -> Option<NodeIndex> {
        let root = *self.roots.first()?;
        Some(self.nodes[root.0].children.first().copied().unwrap_or(root))
    }
}

impl Index<NodeIndex> for Hierarchy {
    type Output = ArenaNode;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

/// Iterator returned by [`Hierarchy::subtree`].
pub struct Subtree<'a> {
    hierarchy: &'a Hierarchy,
    stack: Vec<NodeIndex>,
}

impl Iterator for Subtree<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        self.stack
            .extend(self.hierarchy.nodes[index.0].children.iter().rev().copied());
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Vec<HierarchyNode> {
        vec![HierarchyNode::new("c1", "Acme", Level::Company)
            .with_child(
                HierarchyNode::new("r1", "East", Level::Region).with_child(
                    HierarchyNode::new("a1", "North Area", Level::Area).with_child(
                        HierarchyNode::new("f1", "Field A", Level::Field)
                            .with_child(HierarchyNode::new("w1", "W1", Level::Well))
                            .with_child(HierarchyNode::new("w2", "W2", Level::Well)),
                    ),
                ),
            )
            .with_child(HierarchyNode::new("r2", "West", Level::Region))]
    }

    #[test]
    fn from_roots_keeps_display_order() {
        let h = Hierarchy::from_roots(acme()).unwrap();
        let ids: Vec<&str> = h.iter().map(|(_, n)| n.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "r1", "a1", "f1", "w1", "w2", "r2"]);
        assert_eq!(h.roots().len(), 1);

        let company = &h[h.roots()[0]];
        let child_ids: Vec<&str> = company
            .children()
            .iter()
            .map(|&i| h[i].id.as_str())
            .collect();
        assert_eq!(child_ids, vec!["r1", "r2"]);
    }

    #[test]
    fn depth_and_parent_links() {
        let h = Hierarchy::from_roots(acme()).unwrap();
        let w2 = h.find("w2").unwrap();
        assert_eq!(h[w2].depth, 4);
        let field = h[w2].parent().unwrap();
        assert_eq!(h[field].id, "f1");
        assert!(h[h.find("c1").unwrap()].parent().is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let roots = vec![HierarchyNode::new("c1", "Acme", Level::Company)
            .with_child(HierarchyNode::new("x", "East", Level::Region))
            .with_child(HierarchyNode::new("x", "West", Level::Region))];
        assert_eq!(
            Hierarchy::from_roots(roots),
            Err(HierarchyError::DuplicateId("x".to_string()))
        );
    }

    #[test]
    fn ancestors_and_breadcrumb() {
        let h = Hierarchy::from_roots(acme()).unwrap();
        let w1 = h.find("w1").unwrap();
        let path: Vec<&str> = h.ancestors(w1).iter().map(|&i| h[i].id.as_str()).collect();
        assert_eq!(path, vec!["c1", "r1", "a1", "f1", "w1"]);
        assert_eq!(h.breadcrumb(w1), "Acme / East / North Area / Field A / W1");
    }

    #[test]
    fn subtree_and_wells_under() {
        let h = Hierarchy::from_roots(acme()).unwrap();
        let r1 = h.find("r1").unwrap();
        let sub: Vec<&str> = h.subtree(r1).map(|i| h[i].id.as_str()).collect();
        assert_eq!(sub, vec!["r1", "a1", "f1", "w1", "w2"]);

        let wells: Vec<&str> = h.wells_under(r1).map(|i| h[i].name.as_str()).collect();
        assert_eq!(wells, vec!["W1", "W2"]);

        let r2 = h.find("r2").unwrap();
        assert_eq!(h.wells_under(r2).count(), 0);
    }

    #[test]
    fn default_selection_is_first_child_of_first_root() {
        let h = Hierarchy::from_roots(acme()).unwrap();
        assert_eq!(h[h.default_selection().unwrap()].id, "r1");

        let lone = Hierarchy::from_roots(vec![HierarchyNode::new("c9", "Solo", Level::Company)]).unwrap();
        assert_eq!(lone[lone.default_selection().unwrap()].id, "c9");

        assert!(Hierarchy::default().default_selection().is_none());
    }

    #[test]
    fn deep_tree_does_not_recurse() {
        let mut node = HierarchyNode::new("n0", "n0", Level::Well);
        for i in 1..5_000 {
            node = HierarchyNode::new(format!("n{i}"), format!("n{i}"), Level::Field).with_child(node);
        }
        let h = Hierarchy::from_roots(vec![node]).unwrap();
        assert_eq!(h.len(), 5_000);
        assert_eq!(h.subtree(h.roots()[0]).count(), 5_000);
        assert_eq!(h[h.find("n0").unwrap()].depth, 4_999);
    }

    #[test]
    fn deserializes_camel_case_tree() {
        let json = r#"[{
            "id": 1, "name": "Acme", "level": "Company", "levelOrder": 0,
            "canAttachDevice": false,
            "children": [{
                "id": "w1", "name": "W1", "level": "well", "levelOrder": 4,
                "canAttachDevice": true, "companyId": 1, "parentId": "1"
            }]
        }]"#;
        let roots: Vec<HierarchyNode> = serde_json::from_str(json).unwrap();
        assert_eq!(roots[0].id, "1");
        assert_eq!(roots[0].children[0].level, Level::Well);
        assert_eq!(roots[0].children[0].company_id.as_deref(), Some("1"));
        assert!(roots[0].children[0].can_attach_device);
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("WELL".parse::<Level>().unwrap(), Level::Well);
        assert_eq!(" field ".parse::<Level>().unwrap(), Level::Field);
        assert!("basin".parse::<Level>().is_err());
    }
}

//! Layout tree model.
//!
//! The tree is stored as a flat arena keyed by [`NodeId`]: area leaves are
//! pure references (content lives in the screen's `areas` map) and rows hold
//! ordered `(child, size)` pairs. Parent relationships are never stored; they
//! are derived on demand from row children, so the two can never disagree.
//!
//! Invariants maintained by every mutating operation in [`crate::ops`]:
//!
//! - every child id referenced by a row exists in the arena;
//! - no reachable row has fewer than two children;
//! - `root_id` is `None` iff the arena is empty;
//! - every node has at most one parent and the tree is acyclic;
//! - sibling sizes sum to 1.0.
//!
//! [`LayoutTree::invariant_report`] checks all of them and reports findings
//! as structured [`InvariantIssue`]s.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Deref;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Tolerance used when checking that sibling sizes sum to 1.0.
pub const SIZE_SUM_TOLERANCE: f64 = 1e-6;

/// Stable identifier for layout nodes and areas.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap a raw id.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for NodeId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for NodeId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Semantic grouping that gates stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AreaRole {
    #[serde(rename = "LEAD")]
    Lead,
    #[serde(rename = "FOLLOW")]
    Follow,
    #[default]
    #[serde(rename = "SELF")]
    Standalone,
}

impl fmt::Display for AreaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lead => "LEAD",
            Self::Follow => "FOLLOW",
            Self::Standalone => "SELF",
        })
    }
}

/// Content record for one area leaf.
///
/// `kind` and `state` belong to the rendering host; the engine copies them
/// around but never interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub role: AreaRole,
    #[serde(default)]
    pub state: serde_json::Value,
}

impl Area {
    /// Build an area with the default role and a null state payload.
    #[must_use]
    pub fn new(id: impl Into<NodeId>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            role: AreaRole::default(),
            state: serde_json::Value::Null,
        }
    }

    /// Builder-style role override.
    #[must_use]
    pub fn with_role(mut self, role: AreaRole) -> Self {
        self.role = role;
        self
    }

    /// Builder-style state override.
    #[must_use]
    pub fn with_state(mut self, state: serde_json::Value) -> Self {
        self.state = state;
        self
    }
}

/// Layout direction of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Children laid out left to right.
    Horizontal,
    /// Children laid out top to bottom.
    Vertical,
    /// Children overlap; only the active tab is visible.
    Stack,
}

impl Orientation {
    #[must_use]
    pub const fn is_stack(self) -> bool {
        matches!(self, Self::Stack)
    }
}

/// One weighted child reference inside a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowChild {
    pub id: NodeId,
    pub size: f64,
}

impl RowChild {
    #[must_use]
    pub fn new(id: impl Into<NodeId>, size: f64) -> Self {
        Self {
            id: id.into(),
            size,
        }
    }
}

/// Container node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: NodeId,
    pub orientation: Orientation,
    pub children: Vec<RowChild>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_tab_id: Option<NodeId>,
}

impl Row {
    /// Position of `child` among this row's children.
    #[must_use]
    pub fn child_index(&self, child: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|entry| entry.id.as_str() == child)
    }

    /// Child ids in order.
    pub fn child_ids(&self) -> impl DoubleEndedIterator<Item = &NodeId> {
        self.children.iter().map(|entry| &entry.id)
    }

    /// Sum of child sizes.
    #[must_use]
    pub fn size_sum(&self) -> f64 {
        self.children.iter().map(|entry| entry.size).sum()
    }

    /// Rescale sizes so they sum to 1.0; degenerate sums fall back to equal
    /// shares.
    pub fn normalize_sizes(&mut self) {
        let total = self.size_sum();
        if !total.is_finite() || total <= 0.0 {
            self.equalize_sizes();
            return;
        }
        for entry in &mut self.children {
            entry.size /= total;
        }
    }

    /// Give every child the same share.
    pub fn equalize_sizes(&mut self) {
        if self.children.is_empty() {
            return;
        }
        let share = 1.0 / self.children.len() as f64;
        for entry in &mut self.children {
            entry.size = share;
        }
    }
}

/// Node payload variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutNode {
    Area { id: NodeId },
    Row(Row),
}

impl LayoutNode {
    #[must_use]
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Area { id } => id,
            Self::Row(row) => &row.id,
        }
    }

    #[must_use]
    pub const fn is_area(&self) -> bool {
        matches!(self, Self::Area { .. })
    }

    #[must_use]
    pub fn as_row(&self) -> Option<&Row> {
        match self {
            Self::Row(row) => Some(row),
            Self::Area { .. } => None,
        }
    }

    pub fn as_row_mut(&mut self) -> Option<&mut Row> {
        match self {
            Self::Row(row) => Some(row),
            Self::Area { .. } => None,
        }
    }

    /// Whether this node is a row with [`Orientation::Stack`].
    #[must_use]
    pub fn is_stack(&self) -> bool {
        self.as_row().is_some_and(|row| row.orientation.is_stack())
    }
}

/// Arena-backed layout tree for one screen.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutTree {
    root_id: Option<NodeId>,
    nodes: BTreeMap<NodeId, LayoutNode>,
    next_id: u64,
    #[serde(default)]
    namespace: String,
}

impl LayoutTree {
    /// Empty tree with no id namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty tree whose allocated ids are prefixed with `namespace`.
    #[must_use]
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Tree holding a single area leaf as root.
    #[must_use]
    pub fn singleton(area_id: impl Into<NodeId>) -> Self {
        let mut tree = Self::new();
        let id = area_id.into();
        let _ = tree.nodes.insert(id.clone(), LayoutNode::Area { id: id.clone() });
        tree.root_id = Some(id);
        tree
    }

    #[must_use]
    pub fn root_id(&self) -> Option<&NodeId> {
        self.root_id.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes (areas and rows).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Lookup a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Lookup a row by id.
    #[must_use]
    pub fn row(&self, id: &str) -> Option<&Row> {
        self.nodes.get(id).and_then(LayoutNode::as_row)
    }

    /// Iterate nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.values()
    }

    /// Iterate rows in id order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.nodes.values().filter_map(LayoutNode::as_row)
    }

    /// Build the child -> parent-row map in one pass over all rows.
    #[must_use]
    pub fn parent_map(&self) -> FxHashMap<NodeId, NodeId> {
        let mut parents = FxHashMap::default();
        for row in self.rows() {
            for child in row.child_ids() {
                let _ = parents.insert(child.clone(), row.id.clone());
            }
        }
        parents
    }

    /// Id of the row that directly contains `id`, if any.
    #[must_use]
    pub fn parent_row_id(&self, id: &str) -> Option<NodeId> {
        self.rows()
            .find(|row| row.child_index(id).is_some())
            .map(|row| row.id.clone())
    }

    /// Row that directly contains `id`, if any.
    #[must_use]
    pub fn parent_row_of(&self, id: &str) -> Option<&Row> {
        self.rows().find(|row| row.child_index(id).is_some())
    }

    /// Depth-first descent to a renderable leaf.
    ///
    /// Stack rows descend into their active tab; other rows into their first
    /// child.
    #[must_use]
    pub fn first_leaf_under(&self, id: &str) -> Option<NodeId> {
        let mut current = self.nodes.get(id)?;
        let mut guard = 0usize;
        loop {
            match current {
                LayoutNode::Area { id } => return Some(id.clone()),
                LayoutNode::Row(row) => {
                    let next = row
                        .active_tab_id
                        .as_ref()
                        .filter(|_| row.orientation.is_stack())
                        .or_else(|| row.children.first().map(|entry| &entry.id))?;
                    current = self.nodes.get(next.as_str())?;
                }
            }
            guard += 1;
            if guard > self.nodes.len() {
                return None;
            }
        }
    }

    /// Area leaf ids reachable from the root, depth-first in child order.
    #[must_use]
    pub fn area_ids(&self) -> Vec<NodeId> {
        let Some(root) = &self.root_id else {
            return Vec::new();
        };
        self.subtree_ids(root)
            .into_iter()
            .filter(|id| self.nodes.get(id.as_str()).is_some_and(LayoutNode::is_area))
            .collect()
    }

    /// All node ids in the subtree rooted at `id` (pre-order, including `id`).
    #[must_use]
    pub fn subtree_ids(&self, id: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(start) = self.nodes.get(id) else {
            return out;
        };
        let mut seen = BTreeSet::new();
        let mut stack = vec![start.id().clone()];
        while let Some(node_id) = stack.pop() {
            if !seen.insert(node_id.clone()) {
                continue;
            }
            if let Some(LayoutNode::Row(row)) = self.nodes.get(node_id.as_str()) {
                stack.extend(row.child_ids().rev().cloned());
            }
            out.push(node_id);
        }
        out
    }

    /// Allocate a fresh id in this tree's namespace.
    ///
    /// Ids already present in the arena (including caller-supplied ones) are
    /// skipped.
    pub fn allocate_id(&mut self) -> NodeId {
        let (counter, id) = self.next_free_id();
        self.next_id = counter;
        id
    }

    /// The id [`Self::allocate_id`] would return next, without reserving it.
    #[must_use]
    pub fn peek_next_id(&self) -> NodeId {
        self.next_free_id().1
    }

    fn next_free_id(&self) -> (u64, NodeId) {
        let mut counter = self.next_id;
        loop {
            counter = counter.saturating_add(1);
            let candidate = NodeId::new(format!("{}n{counter}", self.namespace));
            if !self.nodes.contains_key(candidate.as_str()) {
                return (counter, candidate);
            }
        }
    }

    /// Seed an empty tree with a single area root.
    pub fn insert_root_area(&mut self, id: NodeId) -> Result<()> {
        if !self.nodes.is_empty() {
            return Err(LayoutError::TreeNotEmpty { node_id: id });
        }
        let _ = self.nodes.insert(id.clone(), LayoutNode::Area { id: id.clone() });
        self.root_id = Some(id);
        Ok(())
    }

    /// Copy this tree into `namespace`, allocating fresh ids for every node.
    ///
    /// Returns the new tree and the old -> new id mapping.
    #[must_use]
    pub fn rekeyed(&self, namespace: impl Into<String>) -> (LayoutTree, BTreeMap<NodeId, NodeId>) {
        let mut fresh = LayoutTree::with_namespace(namespace);
        let mut mapping = BTreeMap::new();
        for old in self.nodes.keys() {
            let new = fresh.allocate_id();
            // Reserve the id so later allocations skip it.
            let _ = fresh
                .nodes
                .insert(new.clone(), LayoutNode::Area { id: new.clone() });
            let _ = mapping.insert(old.clone(), new);
        }
        let remap = |id: &NodeId| mapping.get(id).cloned().unwrap_or_else(|| id.clone());
        for node in self.nodes.values() {
            let new_node = match node {
                LayoutNode::Area { id } => LayoutNode::Area { id: remap(id) },
                LayoutNode::Row(row) => LayoutNode::Row(Row {
                    id: remap(&row.id),
                    orientation: row.orientation,
                    children: row
                        .children
                        .iter()
                        .map(|entry| RowChild::new(remap(&entry.id), entry.size))
                        .collect(),
                    active_tab_id: row.active_tab_id.as_ref().map(remap),
                }),
            };
            let _ = fresh.nodes.insert(new_node.id().clone(), new_node);
        }
        fresh.root_id = self.root_id.as_ref().map(remap);
        (fresh, mapping)
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut BTreeMap<NodeId, LayoutNode> {
        &mut self.nodes
    }

    pub(crate) fn set_root(&mut self, root: Option<NodeId>) {
        self.root_id = root;
    }

    pub(crate) fn row_mut(&mut self, id: &str) -> Result<&mut Row> {
        match self.nodes.get_mut(id) {
            Some(LayoutNode::Row(row)) => Ok(row),
            Some(LayoutNode::Area { .. }) => Err(LayoutError::NotARow {
                node_id: NodeId::new(id),
            }),
            None => Err(LayoutError::NodeNotFound {
                node_id: NodeId::new(id),
            }),
        }
    }

    /// Replace `old` with `new` in whatever slot references it (parent row or
    /// root), keeping the slot's size.
    pub(crate) fn replace_in_parent(&mut self, old: &str, new: &NodeId) -> Result<()> {
        match self.parent_row_id(old) {
            Some(parent_id) => {
                let parent = self.row_mut(&parent_id)?;
                let index = parent
                    .child_index(old)
                    .ok_or_else(|| LayoutError::NotAChild {
                        row_id: parent_id.clone(),
                        node_id: NodeId::new(old),
                    })?;
                parent.children[index].id = new.clone();
                if parent.active_tab_id.as_deref() == Some(old) {
                    parent.active_tab_id = Some(new.clone());
                }
                Ok(())
            }
            None if self.root_id.as_deref() == Some(old) => {
                self.root_id = Some(new.clone());
                Ok(())
            }
            None => Err(LayoutError::NodeNotFound {
                node_id: NodeId::new(old),
            }),
        }
    }

    /// Give the area leaf `old` the id `new`, keeping its slot.
    pub(crate) fn rename_area(&mut self, old: &str, new: NodeId) -> Result<()> {
        if !matches!(self.nodes.get(old), Some(LayoutNode::Area { .. })) {
            return Err(LayoutError::NotAnArea {
                node_id: NodeId::new(old),
            });
        }
        if self.nodes.contains_key(new.as_str()) {
            return Err(LayoutError::DuplicateNode { node_id: new });
        }
        self.replace_in_parent(old, &new)?;
        let _ = self.nodes.remove(old);
        let _ = self
            .nodes
            .insert(new.clone(), LayoutNode::Area { id: new });
        Ok(())
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> std::result::Result<(), InvariantReport> {
        let report = self.invariant_report();
        if report.has_errors() {
            Err(report)
        } else {
            Ok(())
        }
    }

    /// Inspect invariants and emit a structured diagnostics report.
    #[must_use]
    pub fn invariant_report(&self) -> InvariantReport {
        let mut issues = Vec::new();

        match &self.root_id {
            None if !self.nodes.is_empty() => issues.push(InvariantIssue::new(
                InvariantCode::RootMismatch,
                None,
                format!("root is empty but {} nodes exist", self.nodes.len()),
            )),
            Some(root) if !self.nodes.contains_key(root.as_str()) => {
                issues.push(InvariantIssue::new(
                    InvariantCode::MissingRoot,
                    Some(root.clone()),
                    format!("root node {root} is missing"),
                ));
            }
            _ => {}
        }

        let mut parents: BTreeMap<NodeId, NodeId> = BTreeMap::new();
        for (key, node) in &self.nodes {
            if key != node.id() {
                issues.push(InvariantIssue::new(
                    InvariantCode::KeyMismatch,
                    Some(key.clone()),
                    format!("arena key {key} holds node {}", node.id()),
                ));
            }
            let LayoutNode::Row(row) = node else {
                continue;
            };
            if row.children.len() < 2 {
                let code = if row.children.is_empty() {
                    InvariantCode::EmptyRow
                } else {
                    InvariantCode::SingletonRow
                };
                issues.push(InvariantIssue::new(
                    code,
                    Some(row.id.clone()),
                    format!("row {} has {} children", row.id, row.children.len()),
                ));
            }
            if !row.children.is_empty() {
                let sum = row.size_sum();
                if (sum - 1.0).abs() > SIZE_SUM_TOLERANCE {
                    issues.push(InvariantIssue::new(
                        InvariantCode::SizeSum,
                        Some(row.id.clone()),
                        format!("row {} sizes sum to {sum}", row.id),
                    ));
                }
            }
            match &row.active_tab_id {
                Some(active) if row.child_index(active).is_none() => {
                    issues.push(InvariantIssue::new(
                        InvariantCode::ActiveTabNotChild,
                        Some(row.id.clone()),
                        format!("row {} active tab {active} is not a child", row.id),
                    ));
                }
                None if row.orientation.is_stack() && !row.children.is_empty() => {
                    issues.push(InvariantIssue::new(
                        InvariantCode::ActiveTabNotChild,
                        Some(row.id.clone()),
                        format!("stack row {} has no active tab", row.id),
                    ));
                }
                _ => {}
            }
            for child in row.child_ids() {
                if !self.nodes.contains_key(child.as_str()) {
                    issues.push(InvariantIssue::new(
                        InvariantCode::MissingChild,
                        Some(row.id.clone()),
                        format!("row {} references missing child {child}", row.id),
                    ));
                }
                if let Some(first) = parents.insert(child.clone(), row.id.clone()) {
                    issues.push(InvariantIssue::new(
                        InvariantCode::MultipleParents,
                        Some(child.clone()),
                        format!("node {child} is referenced by {first} and {}", row.id),
                    ));
                }
            }
        }

        if let Some(root) = &self.root_id {
            if let Some(parent) = parents.get(root) {
                issues.push(InvariantIssue::new(
                    InvariantCode::RootHasParent,
                    Some(root.clone()),
                    format!("root {root} is referenced by row {parent}"),
                ));
            }
        }

        if let Some(root) = self
            .root_id
            .as_ref()
            .filter(|root| self.nodes.contains_key(root.as_str()))
        {
            let mut visiting = BTreeSet::new();
            let mut visited = BTreeSet::new();
            let mut cycles = BTreeSet::new();
            self.collect_reachable(root, &mut visiting, &mut visited, &mut cycles);
            for node_id in cycles {
                issues.push(InvariantIssue::new(
                    InvariantCode::Cycle,
                    Some(node_id.clone()),
                    format!("cycle detected at {node_id}"),
                ));
            }
            for node_id in self.nodes.keys() {
                if !visited.contains(node_id) {
                    issues.push(InvariantIssue::new(
                        InvariantCode::Unreachable,
                        Some(node_id.clone()),
                        format!("node {node_id} is unreachable from root"),
                    ));
                }
            }
        }

        InvariantReport { issues }
    }

    fn collect_reachable(
        &self,
        node_id: &NodeId,
        visiting: &mut BTreeSet<NodeId>,
        visited: &mut BTreeSet<NodeId>,
        cycles: &mut BTreeSet<NodeId>,
    ) {
        if visiting.contains(node_id) {
            let _ = cycles.insert(node_id.clone());
            return;
        }
        if !visited.insert(node_id.clone()) {
            return;
        }
        let _ = visiting.insert(node_id.clone());
        if let Some(LayoutNode::Row(row)) = self.nodes.get(node_id.as_str()) {
            for child in row.child_ids() {
                if self.nodes.contains_key(child.as_str()) {
                    self.collect_reachable(child, visiting, visited, cycles);
                }
            }
        }
        let _ = visiting.remove(node_id);
    }

    /// Deterministic structural hash of the current tree state.
    ///
    /// Sizes are hashed by bit pattern, so trees that differ only by rounding
    /// hash differently.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix(hash: &mut u64, byte: u8) {
            *hash ^= u64::from(byte);
            *hash = hash.wrapping_mul(PRIME);
        }

        fn mix_bytes(hash: &mut u64, bytes: &[u8]) {
            for byte in bytes {
                mix(hash, *byte);
            }
        }

        fn mix_u64(hash: &mut u64, value: u64) {
            mix_bytes(hash, &value.to_le_bytes());
        }

        fn mix_str(hash: &mut u64, value: &str) {
            mix_u64(hash, value.len() as u64);
            mix_bytes(hash, value.as_bytes());
        }

        fn mix_opt_str(hash: &mut u64, value: Option<&str>) {
            match value {
                Some(value) => {
                    mix(hash, 1);
                    mix_str(hash, value);
                }
                None => mix(hash, 0),
            }
        }

        let mut hash = OFFSET_BASIS;
        mix_opt_str(&mut hash, self.root_id.as_deref());
        mix_u64(&mut hash, self.nodes.len() as u64);
        for node in self.nodes.values() {
            match node {
                LayoutNode::Area { id } => {
                    mix(&mut hash, 1);
                    mix_str(&mut hash, id);
                }
                LayoutNode::Row(row) => {
                    mix(&mut hash, 2);
                    mix_str(&mut hash, &row.id);
                    mix(
                        &mut hash,
                        match row.orientation {
                            Orientation::Horizontal => 1,
                            Orientation::Vertical => 2,
                            Orientation::Stack => 3,
                        },
                    );
                    mix_u64(&mut hash, row.children.len() as u64);
                    for entry in &row.children {
                        mix_str(&mut hash, &entry.id);
                        mix_u64(&mut hash, entry.size.to_bits());
                    }
                    mix_opt_str(&mut hash, row.active_tab_id.as_deref());
                }
            }
        }
        hash
    }
}

/// Machine-readable invariant violation class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvariantCode {
    RootMismatch,
    MissingRoot,
    RootHasParent,
    KeyMismatch,
    MissingChild,
    EmptyRow,
    SingletonRow,
    MultipleParents,
    SizeSum,
    ActiveTabNotChild,
    Cycle,
    Unreachable,
    AreaWithoutData,
    DataWithoutArea,
}

/// One invariant finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantIssue {
    pub code: InvariantCode,
    pub node_id: Option<NodeId>,
    pub message: String,
}

impl InvariantIssue {
    pub(crate) fn new(code: InvariantCode, node_id: Option<NodeId>, message: String) -> Self {
        Self {
            code,
            node_id,
            message,
        }
    }
}

/// Structured invariant report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvariantReport {
    pub issues: Vec<InvariantIssue>,
}

impl InvariantReport {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Whether any issue carries `code`.
    #[must_use]
    pub fn contains(&self, code: InvariantCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }
}

impl fmt::Display for InvariantReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "no invariant issues");
        }
        for (index, issue) in self.issues.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{:?}: {}", issue.code, issue.message)?;
        }
        Ok(())
    }
}

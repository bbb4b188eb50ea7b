//! Structural tree mutation: split, stack, join, simplify, resize, remove.
//!
//! Every public operation runs on a cloned working tree; the clone replaces
//! `self` only when the whole operation succeeds, so a failed call leaves the
//! tree untouched.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::placement::PlacementRegion;
use crate::tree::{LayoutNode, LayoutTree, NodeId, Orientation, Row, RowChild};

/// Which sibling absorbs a joined child's weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeDirection {
    Previous,
    Next,
}

/// How a same-orientation split redistributes sibling weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitSizing {
    /// The one or two children adjacent to the insertion point and the new
    /// child share their combined weight evenly.
    #[default]
    AdjacentNeighbors,
    /// The target gives up half of its own weight; other siblings keep theirs.
    TargetShare,
}

/// Where a split landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResult {
    /// Row now containing both the target and the new area.
    pub row_id: NodeId,
    /// Boundary between child `separator_index` and `separator_index + 1`
    /// that separates the target from the new area.
    pub separator_index: usize,
    pub new_area_id: NodeId,
}

impl LayoutTree {
    fn transact<T>(&mut self, f: impl FnOnce(&mut LayoutTree) -> Result<T>) -> Result<T> {
        let mut working = self.clone();
        let out = f(&mut working)?;
        *self = working;
        Ok(out)
    }

    /// Split `target` with the default sizing policy.
    pub fn split(
        &mut self,
        target: &str,
        placement: PlacementRegion,
        new_area_id: NodeId,
    ) -> Result<SplitResult> {
        self.split_with(target, placement, new_area_id, SplitSizing::default())
    }

    /// Insert a new area leaf next to `target` on the side named by
    /// `placement`.
    ///
    /// When the target's parent row already runs along the placement axis the
    /// new leaf becomes a sibling; otherwise a fresh 0.5/0.5 row replaces the
    /// target.
    pub fn split_with(
        &mut self,
        target: &str,
        placement: PlacementRegion,
        new_area_id: NodeId,
        sizing: SplitSizing,
    ) -> Result<SplitResult> {
        let result = self.transact(|tree| tree.split_inner(target, placement, new_area_id, sizing))?;
        tracing::debug!(
            target: "tessel.ops",
            target_id = target,
            region = ?placement,
            row_id = %result.row_id,
            new_area_id = %result.new_area_id,
            "split"
        );
        Ok(result)
    }

    fn split_inner(
        &mut self,
        target: &str,
        placement: PlacementRegion,
        new_area_id: NodeId,
        sizing: SplitSizing,
    ) -> Result<SplitResult> {
        let (orientation, incoming_first) = placement
            .split_axis()
            .ok_or(LayoutError::InvalidPlacement { region: placement })?;
        if !self.contains(target) {
            return Err(LayoutError::NodeNotFound {
                node_id: NodeId::new(target),
            });
        }
        if self.contains(&new_area_id) {
            return Err(LayoutError::DuplicateNode {
                node_id: new_area_id,
            });
        }

        let parent_id = self
            .parent_row_of(target)
            .filter(|row| row.orientation == orientation)
            .map(|row| row.id.clone());

        let result = match parent_id {
            Some(row_id) => {
                let row = self.row_mut(&row_id)?;
                let index = row
                    .child_index(target)
                    .ok_or_else(|| LayoutError::NotAChild {
                        row_id: row_id.clone(),
                        node_id: NodeId::new(target),
                    })?;
                let insert_at = if incoming_first { index } else { index + 1 };
                match sizing {
                    SplitSizing::AdjacentNeighbors => {
                        let mut neighbors = Vec::with_capacity(2);
                        if insert_at > 0 {
                            neighbors.push(insert_at - 1);
                        }
                        if insert_at < row.children.len() {
                            neighbors.push(insert_at);
                        }
                        let combined: f64 =
                            neighbors.iter().map(|&i| row.children[i].size).sum();
                        let share = combined / (neighbors.len() + 1) as f64;
                        for &i in &neighbors {
                            row.children[i].size = share;
                        }
                        row.children
                            .insert(insert_at, RowChild::new(new_area_id.clone(), share));
                    }
                    SplitSizing::TargetShare => {
                        let half = row.children[index].size / 2.0;
                        row.children[index].size = half;
                        row.children
                            .insert(insert_at, RowChild::new(new_area_id.clone(), half));
                    }
                }
                row.normalize_sizes();
                let separator_index = if incoming_first {
                    insert_at
                } else {
                    insert_at - 1
                };
                SplitResult {
                    row_id,
                    separator_index,
                    new_area_id: new_area_id.clone(),
                }
            }
            None => {
                let row_id = self.allocate_id();
                self.replace_in_parent(target, &row_id)?;
                let target_child = RowChild::new(target, 0.5);
                let new_child = RowChild::new(new_area_id.clone(), 0.5);
                let children = if incoming_first {
                    vec![new_child, target_child]
                } else {
                    vec![target_child, new_child]
                };
                let _ = self.nodes_mut().insert(
                    row_id.clone(),
                    LayoutNode::Row(Row {
                        id: row_id.clone(),
                        orientation,
                        children,
                        active_tab_id: None,
                    }),
                );
                SplitResult {
                    row_id,
                    separator_index: 0,
                    new_area_id: new_area_id.clone(),
                }
            }
        };

        let _ = self.nodes_mut().insert(
            new_area_id.clone(),
            LayoutNode::Area { id: new_area_id },
        );
        Ok(result)
    }

    /// Add a new area leaf as a tab next to `target`.
    ///
    /// A target that is (or sits in) a stack row gets the new tab appended
    /// there with equalized sizes; any other target is wrapped in a fresh
    /// two-tab stack. The new tab becomes active. Returns the stack row id.
    pub fn stack(&mut self, target: &str, new_area_id: NodeId) -> Result<NodeId> {
        let stack_id = self.transact(|tree| tree.stack_inner(target, new_area_id.clone()))?;
        tracing::debug!(
            target: "tessel.ops",
            target_id = target,
            stack_id = %stack_id,
            new_area_id = %new_area_id,
            "stack"
        );
        Ok(stack_id)
    }

    fn stack_inner(&mut self, target: &str, new_area_id: NodeId) -> Result<NodeId> {
        let Some(target_node) = self.node(target) else {
            return Err(LayoutError::NodeNotFound {
                node_id: NodeId::new(target),
            });
        };
        if self.contains(&new_area_id) {
            return Err(LayoutError::DuplicateNode {
                node_id: new_area_id,
            });
        }

        let existing_stack = if target_node.is_stack() {
            Some(target_node.id().clone())
        } else {
            self.parent_row_of(target)
                .filter(|row| row.orientation.is_stack())
                .map(|row| row.id.clone())
        };

        let stack_id = match existing_stack {
            Some(stack_id) => {
                let row = self.row_mut(&stack_id)?;
                row.children.push(RowChild::new(new_area_id.clone(), 0.0));
                row.equalize_sizes();
                row.active_tab_id = Some(new_area_id.clone());
                stack_id
            }
            None => {
                let stack_id = self.allocate_id();
                self.replace_in_parent(target, &stack_id)?;
                let _ = self.nodes_mut().insert(
                    stack_id.clone(),
                    LayoutNode::Row(Row {
                        id: stack_id.clone(),
                        orientation: Orientation::Stack,
                        children: vec![
                            RowChild::new(target, 0.5),
                            RowChild::new(new_area_id.clone(), 0.5),
                        ],
                        active_tab_id: Some(new_area_id.clone()),
                    }),
                );
                stack_id
            }
        };

        let _ = self.nodes_mut().insert(
            new_area_id.clone(),
            LayoutNode::Area { id: new_area_id },
        );
        Ok(stack_id)
    }

    /// Remove the child at `index` from `row_id`, folding its weight into the
    /// neighbor on `direction`'s side.
    ///
    /// The removed child's whole subtree leaves the arena. Returns the id that
    /// now occupies the row's slot: the row itself while it keeps two or more
    /// children, otherwise whatever simplification promoted.
    pub fn join(&mut self, row_id: &str, index: usize, direction: MergeDirection) -> Result<NodeId> {
        let occupant = self.transact(|tree| tree.join_inner(row_id, index, direction))?;
        tracing::debug!(
            target: "tessel.ops",
            row_id,
            index,
            direction = ?direction,
            occupant = %occupant,
            "join"
        );
        Ok(occupant)
    }

    fn join_inner(&mut self, row_id: &str, index: usize, direction: MergeDirection) -> Result<NodeId> {
        let row = self.row_mut(row_id)?;
        let len = row.children.len();
        if index >= len {
            return Err(LayoutError::ChildIndexOutOfRange {
                row_id: row.id.clone(),
                index,
                len,
            });
        }
        let neighbor = match direction {
            MergeDirection::Previous if index > 0 => index - 1,
            MergeDirection::Next if index + 1 < len => index,
            _ => {
                return Err(LayoutError::NoMergeNeighbor {
                    row_id: row.id.clone(),
                    index,
                    direction,
                });
            }
        };

        let removed = row.children.remove(index);
        row.children[neighbor].size += removed.size;
        if row.active_tab_id.as_ref() == Some(&removed.id) {
            row.active_tab_id = Some(row.children[neighbor].id.clone());
        }
        row.normalize_sizes();
        let remaining = row.children.len();
        let row_id = row.id.clone();

        for id in self.subtree_ids(&removed.id) {
            let _ = self.nodes_mut().remove(&id);
        }

        if remaining >= 2 {
            return Ok(row_id);
        }
        self.simplify_inner(&row_id)?.ok_or(LayoutError::EmptyTree)
    }

    /// Collapse `row_id` if it has fewer than two children.
    ///
    /// A childless row is deleted and its parent simplified in turn; a
    /// single-child row is replaced by that child in its parent slot (or as
    /// root). A promoted non-stack row whose orientation matches the parent is
    /// spliced into the parent. Returns the id now occupying the slot, or
    /// `None` when nothing is left there. Missing ids are a no-op.
    pub fn simplify(&mut self, row_id: &str) -> Result<Option<NodeId>> {
        self.transact(|tree| tree.simplify_inner(row_id))
    }

    pub(crate) fn simplify_inner(&mut self, row_id: &str) -> Result<Option<NodeId>> {
        let row = match self.node(row_id) {
            None => return Ok(None),
            Some(LayoutNode::Area { id }) => return Ok(Some(id.clone())),
            Some(LayoutNode::Row(row)) => row.clone(),
        };

        match row.children.len() {
            0 => {
                let parent_id = self.parent_row_id(&row.id);
                let _ = self.nodes_mut().remove(&row.id);
                let Some(parent_id) = parent_id else {
                    self.set_root(None);
                    return Ok(None);
                };
                let parent = self.row_mut(&parent_id)?;
                parent.children.retain(|entry| entry.id != row.id);
                if parent.active_tab_id.as_ref() == Some(&row.id) {
                    parent.active_tab_id = parent.children.first().map(|entry| entry.id.clone());
                }
                parent.normalize_sizes();
                tracing::debug!(target: "tessel.ops", row_id = %row.id, "removed empty row");
                self.simplify_inner(&parent_id)
            }
            1 => {
                let child = row.children[0].id.clone();
                let parent_id = self.parent_row_id(&row.id);
                self.replace_in_parent(&row.id, &child)?;
                let _ = self.nodes_mut().remove(&row.id);
                tracing::debug!(
                    target: "tessel.ops",
                    row_id = %row.id,
                    promoted = %child,
                    "collapsed single-child row"
                );
                match parent_id {
                    Some(parent_id) => {
                        if self.flatten_into_parent(&parent_id, &child)? {
                            Ok(Some(parent_id))
                        } else {
                            Ok(Some(child))
                        }
                    }
                    None => Ok(Some(child)),
                }
            }
            _ => Ok(Some(row.id)),
        }
    }

    /// Splice `child`'s children into `parent_id` when both are non-stack
    /// rows with the same orientation.
    fn flatten_into_parent(&mut self, parent_id: &str, child: &str) -> Result<bool> {
        let (Some(parent), Some(inner)) = (self.row(parent_id), self.row(child)) else {
            return Ok(false);
        };
        if parent.orientation.is_stack() || parent.orientation != inner.orientation {
            return Ok(false);
        }
        let inner = inner.clone();
        let parent = self.row_mut(parent_id)?;
        let Some(index) = parent.child_index(child) else {
            return Ok(false);
        };
        let slot = parent.children[index].size;
        let spliced = inner
            .children
            .into_iter()
            .map(|entry| RowChild::new(entry.id, entry.size * slot));
        let _ = parent.children.splice(index..=index, spliced);
        parent.normalize_sizes();
        let _ = self.nodes_mut().remove(child);
        Ok(true)
    }

    /// Assign new weights to a row's children, normalized to sum to 1.0.
    pub fn set_child_sizes(&mut self, row_id: &str, sizes: &[f64]) -> Result<()> {
        self.transact(|tree| {
            let row = tree.row_mut(row_id)?;
            let invalid = |reason: String| LayoutError::InvalidSizes {
                row_id: NodeId::new(row_id),
                reason,
            };
            if sizes.len() != row.children.len() {
                return Err(invalid(format!(
                    "expected {} sizes, got {}",
                    row.children.len(),
                    sizes.len()
                )));
            }
            if let Some(bad) = sizes.iter().find(|size| !size.is_finite() || **size < 0.0) {
                return Err(invalid(format!("size {bad} is not a finite non-negative number")));
            }
            let total: f64 = sizes.iter().sum();
            if total <= 0.0 {
                return Err(invalid("sizes sum to zero".to_owned()));
            }
            for (entry, size) in row.children.iter_mut().zip(sizes) {
                entry.size = size / total;
            }
            Ok(())
        })?;
        tracing::debug!(target: "tessel.ops", row_id, sizes = ?sizes, "resized row");
        Ok(())
    }

    /// Detach `id` and its subtree from the tree.
    ///
    /// Weight merges toward the previous sibling when there is one, else the
    /// next. Returns the id occupying the parent's slot afterwards, or `None`
    /// if the tree is now empty.
    pub fn remove_node(&mut self, id: &str) -> Result<Option<NodeId>> {
        let occupant = self.transact(|tree| {
            if !tree.contains(id) {
                return Err(LayoutError::NodeNotFound {
                    node_id: NodeId::new(id),
                });
            }
            let Some(parent) = tree.parent_row_of(id) else {
                for node_id in tree.subtree_ids(id) {
                    let _ = tree.nodes_mut().remove(&node_id);
                }
                tree.set_root(None);
                return Ok(None);
            };
            let parent_id = parent.id.clone();
            let index = parent
                .child_index(id)
                .ok_or_else(|| LayoutError::NotAChild {
                    row_id: parent_id.clone(),
                    node_id: NodeId::new(id),
                })?;
            let direction = if index > 0 {
                MergeDirection::Previous
            } else {
                MergeDirection::Next
            };
            tree.join_inner(&parent_id, index, direction).map(Some)
        })?;
        tracing::debug!(
            target: "tessel.ops",
            node_id = id,
            occupant = ?occupant.as_deref(),
            "removed node"
        );
        Ok(occupant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(tree: &LayoutTree, row_id: &str) -> Vec<f64> {
        tree.row(row_id)
            .expect("row exists")
            .children
            .iter()
            .map(|entry| entry.size)
            .collect()
    }

    fn ids(tree: &LayoutTree, row_id: &str) -> Vec<String> {
        tree.row(row_id)
            .expect("row exists")
            .child_ids()
            .map(ToString::to_string)
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn three_wide() -> (LayoutTree, NodeId) {
        let mut tree = LayoutTree::singleton("a");
        let row = tree
            .split("a", PlacementRegion::Right, NodeId::new("b"))
            .expect("split a")
            .row_id;
        let _ = tree
            .split("b", PlacementRegion::Right, NodeId::new("c"))
            .expect("split b");
        (tree, row)
    }

    #[test]
    fn split_root_creates_row() {
        let mut tree = LayoutTree::singleton("a");
        let result = tree
            .split("a", PlacementRegion::Bottom, NodeId::new("b"))
            .expect("split");
        assert_eq!(tree.root_id(), Some(&result.row_id));
        assert_eq!(result.separator_index, 0);
        let row = tree.row(&result.row_id).expect("row");
        assert_eq!(row.orientation, Orientation::Vertical);
        assert_eq!(ids(&tree, &result.row_id), vec!["a", "b"]);
        assert_eq!(sizes(&tree, &result.row_id), vec![0.5, 0.5]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn split_before_orders_new_first() {
        let mut tree = LayoutTree::singleton("a");
        let result = tree
            .split("a", PlacementRegion::Left, NodeId::new("b"))
            .expect("split");
        assert_eq!(ids(&tree, &result.row_id), vec!["b", "a"]);
        assert_eq!(result.separator_index, 0);
    }

    #[test]
    fn same_orientation_split_inserts_sibling() {
        let (tree, row) = three_wide();
        assert_eq!(ids(&tree, &row), vec!["a", "b", "c"]);
        let s = sizes(&tree, &row);
        assert!(approx(s[0], 0.5));
        assert!(approx(s[1], 0.25));
        assert!(approx(s[2], 0.25));
        assert!(tree.validate().is_ok(), "{}", tree.invariant_report());
    }

    #[test]
    fn adjacent_split_shares_both_neighbors() {
        let (mut tree, row) = three_wide();
        let result = tree
            .split("b", PlacementRegion::Left, NodeId::new("d"))
            .expect("split");
        assert_eq!(ids(&tree, &row), vec!["a", "d", "b", "c"]);
        assert_eq!(result.separator_index, 1);
        let s = sizes(&tree, &row);
        // a (0.5) and b (0.25) share 0.75 with d.
        assert!(approx(s[0], 0.25) && approx(s[1], 0.25) && approx(s[2], 0.25));
        assert!(approx(s[3], 0.25));
    }

    #[test]
    fn target_share_split_halves_target() {
        let (mut tree, row) = three_wide();
        let result = tree
            .split_with(
                "a",
                PlacementRegion::Right,
                NodeId::new("d"),
                SplitSizing::TargetShare,
            )
            .expect("split");
        assert_eq!(result.separator_index, 0);
        assert_eq!(ids(&tree, &row), vec!["a", "d", "b", "c"]);
        let s = sizes(&tree, &row);
        assert!(approx(s[0], 0.25) && approx(s[1], 0.25));
    }

    #[test]
    fn cross_orientation_split_nests_row() {
        let (mut tree, row) = three_wide();
        let result = tree
            .split("b", PlacementRegion::Top, NodeId::new("d"))
            .expect("split");
        assert_ne!(result.row_id, row);
        assert_eq!(ids(&tree, &result.row_id), vec!["d", "b"]);
        assert_eq!(ids(&tree, &row)[1], result.row_id.to_string());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn split_rejects_stack_region_and_duplicates() {
        let mut tree = LayoutTree::singleton("a");
        let before = tree.clone();
        assert!(matches!(
            tree.split("a", PlacementRegion::Stack, NodeId::new("b")),
            Err(LayoutError::InvalidPlacement { .. })
        ));
        assert!(matches!(
            tree.split("a", PlacementRegion::Left, NodeId::new("a")),
            Err(LayoutError::DuplicateNode { .. })
        ));
        assert!(matches!(
            tree.split("zz", PlacementRegion::Left, NodeId::new("b")),
            Err(LayoutError::NodeNotFound { .. })
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn stack_wraps_then_appends() {
        let mut tree = LayoutTree::singleton("a");
        let stack = tree.stack("a", NodeId::new("b")).expect("stack");
        let row = tree.row(&stack).expect("stack row");
        assert_eq!(row.orientation, Orientation::Stack);
        assert_eq!(row.active_tab_id.as_deref(), Some("b"));

        let again = tree.stack("a", NodeId::new("c")).expect("stack into parent");
        assert_eq!(again, stack);
        assert_eq!(ids(&tree, &stack), vec!["a", "b", "c"]);
        for size in sizes(&tree, &stack) {
            assert!(approx(size, 1.0 / 3.0));
        }
        assert_eq!(tree.row(&stack).expect("row").active_tab_id.as_deref(), Some("c"));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn join_merges_weight_into_neighbor() {
        let (mut tree, row) = three_wide();
        let occupant = tree.join(&row, 1, MergeDirection::Previous).expect("join");
        assert_eq!(occupant, row);
        assert_eq!(ids(&tree, &row), vec!["a", "c"]);
        let s = sizes(&tree, &row);
        assert!(approx(s[0] + s[1], 1.0));
        assert!(approx(s[0], 0.75));
        assert!(!tree.contains("b"));
    }

    #[test]
    fn join_down_to_one_child_simplifies() {
        let mut tree = LayoutTree::singleton("a");
        let split = tree
            .split("a", PlacementRegion::Right, NodeId::new("b"))
            .expect("split");
        let occupant = tree.join(&split.row_id, 1, MergeDirection::Previous).expect("join");
        assert_eq!(occupant.as_str(), "a");
        assert_eq!(tree, {
            let mut expected = LayoutTree::singleton("a");
            // Keep the id counter in step with the split.
            let _ = expected.allocate_id();
            expected
        });
    }

    #[test]
    fn join_errors_leave_tree_untouched() {
        let (mut tree, row) = three_wide();
        let before = tree.clone();
        assert!(matches!(
            tree.join(&row, 0, MergeDirection::Previous),
            Err(LayoutError::NoMergeNeighbor { .. })
        ));
        assert!(matches!(
            tree.join(&row, 9, MergeDirection::Next),
            Err(LayoutError::ChildIndexOutOfRange { index: 9, len: 3, .. })
        ));
        assert!(matches!(
            tree.join("a", 0, MergeDirection::Next),
            Err(LayoutError::NotARow { .. })
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn join_active_tab_activates_neighbor() {
        let mut tree = LayoutTree::singleton("a");
        let stack = tree.stack("a", NodeId::new("b")).expect("stack");
        let _ = tree.stack("a", NodeId::new("c")).expect("stack");
        let _ = tree.join(&stack, 2, MergeDirection::Previous).expect("join");
        assert_eq!(tree.row(&stack).expect("row").active_tab_id.as_deref(), Some("b"));
    }

    #[test]
    fn simplify_flattens_same_orientation_rows() {
        let (mut tree, row) = three_wide();
        let nested = tree
            .split("b", PlacementRegion::Bottom, NodeId::new("d"))
            .expect("nest")
            .row_id;
        let _ = tree
            .split("d", PlacementRegion::Right, NodeId::new("e"))
            .expect("nest again");
        // Removing b leaves the vertical row with one horizontal child.
        let occupant = tree.remove_node("b").expect("remove").expect("occupant");
        assert_eq!(occupant, row);
        assert!(!tree.contains(&nested));
        assert_eq!(ids(&tree, &row), vec!["a", "d", "e", "c"]);
        assert!(tree.validate().is_ok(), "{}", tree.invariant_report());
    }

    #[test]
    fn simplify_is_idempotent() {
        let (mut tree, row) = three_wide();
        let before = tree.clone();
        assert_eq!(tree.simplify(&row).expect("simplify"), Some(row.clone()));
        assert_eq!(tree.simplify("missing").expect("no-op"), None);
        assert_eq!(tree, before);
    }

    #[test]
    fn set_child_sizes_validates_and_normalizes() {
        let (mut tree, row) = three_wide();
        tree.set_child_sizes(&row, &[1.0, 1.0, 2.0]).expect("resize");
        assert_eq!(sizes(&tree, &row), vec![0.25, 0.25, 0.5]);

        let before = tree.clone();
        let bad_inputs: [&[f64]; 4] = [
            &[0.5, 0.5],
            &[f64::NAN, 1.0, 1.0],
            &[-1.0, 1.0, 1.0],
            &[0.0, 0.0, 0.0],
        ];
        for bad in bad_inputs {
            assert!(matches!(
                tree.set_child_sizes(&row, bad),
                Err(LayoutError::InvalidSizes { .. })
            ));
        }
        assert_eq!(tree, before);
    }

    #[test]
    fn remove_last_node_empties_tree() {
        let mut tree = LayoutTree::singleton("a");
        assert_eq!(tree.remove_node("a").expect("remove"), None);
        assert!(tree.is_empty());
        assert_eq!(tree.root_id(), None);
    }
}

//! Viewport computation: subdivide a container rectangle over the tree.
//!
//! Each row child receives a floored share of the row's extent along the row
//! axis; the last child takes whatever remains so siblings tile their parent
//! exactly. Stack children all receive the stack row's rectangle.

use std::collections::{BTreeMap, BTreeSet};

use tessel_core::geometry::Rect;

use crate::tree::{LayoutNode, LayoutTree, NodeId, Orientation};

/// Rectangle per node id, for every node reachable from the root.
pub type ViewportMap = BTreeMap<NodeId, Rect>;

/// Compute rectangles for every reachable node.
///
/// Pure function of `(tree, container)`; an empty tree yields an empty map.
#[must_use]
pub fn compute_viewports(tree: &LayoutTree, container: Rect) -> ViewportMap {
    let mut out = ViewportMap::new();
    if let Some(root) = tree.root_id() {
        let mut visited = BTreeSet::new();
        assign(tree, root, container, &mut out, &mut visited);
    }
    out
}

fn assign(
    tree: &LayoutTree,
    id: &NodeId,
    rect: Rect,
    out: &mut ViewportMap,
    visited: &mut BTreeSet<NodeId>,
) {
    if !visited.insert(id.clone()) {
        return;
    }
    let Some(node) = tree.node(id) else {
        return;
    };
    let _ = out.insert(id.clone(), rect);
    let LayoutNode::Row(row) = node else {
        return;
    };

    let last = row.children.len().saturating_sub(1);
    match row.orientation {
        Orientation::Stack => {
            for child in row.child_ids() {
                assign(tree, child, rect, out, visited);
            }
        }
        Orientation::Horizontal => {
            let mut offset = 0.0;
            for (index, child) in row.children.iter().enumerate() {
                let width = if index == last {
                    (rect.width - offset).max(0.0)
                } else {
                    (rect.width * child.size).floor()
                };
                let child_rect = Rect::new(rect.left + offset, rect.top, width, rect.height);
                assign(tree, &child.id, child_rect, out, visited);
                offset += width;
            }
        }
        Orientation::Vertical => {
            let mut offset = 0.0;
            for (index, child) in row.children.iter().enumerate() {
                let height = if index == last {
                    (rect.height - offset).max(0.0)
                } else {
                    (rect.height * child.size).floor()
                };
                let child_rect = Rect::new(rect.left, rect.top + offset, rect.width, height);
                assign(tree, &child.id, child_rect, out, visited);
                offset += height;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::PlacementRegion;

    #[test]
    fn empty_tree_has_no_viewports() {
        assert!(compute_viewports(&LayoutTree::new(), Rect::from_size(100.0, 100.0)).is_empty());
    }

    #[test]
    fn single_area_fills_container() {
        let tree = LayoutTree::singleton("a");
        let container = Rect::new(10.0, 20.0, 300.0, 200.0);
        let map = compute_viewports(&tree, container);
        assert_eq!(map.get("a"), Some(&container));
    }

    #[test]
    fn horizontal_children_tile_exactly() {
        let mut tree = LayoutTree::singleton("a");
        let row = tree
            .split("a", PlacementRegion::Right, NodeId::new("b"))
            .expect("split")
            .row_id;
        let _ = tree
            .split("b", PlacementRegion::Right, NodeId::new("c"))
            .expect("split");
        tree.set_child_sizes(&row, &[1.0, 1.0, 1.0]).expect("resize");

        let map = compute_viewports(&tree, Rect::from_size(100.0, 50.0));
        let a = map["a"];
        let b = map["b"];
        let c = map["c"];
        assert_eq!(a.width, 33.0);
        assert_eq!(b.left, 33.0);
        assert_eq!(b.width, 33.0);
        assert_eq!(c.left, 66.0);
        assert_eq!(c.width, 34.0);
        assert_eq!(c.right(), 100.0);
    }

    #[test]
    fn vertical_children_stack_downward() {
        let mut tree = LayoutTree::singleton("a");
        let _ = tree
            .split("a", PlacementRegion::Bottom, NodeId::new("b"))
            .expect("split");
        let map = compute_viewports(&tree, Rect::from_size(300.0, 201.0));
        assert_eq!(map["a"], Rect::new(0.0, 0.0, 300.0, 100.0));
        assert_eq!(map["b"], Rect::new(0.0, 100.0, 300.0, 101.0));
    }

    #[test]
    fn stack_children_share_rect() {
        let mut tree = LayoutTree::singleton("a");
        let stack = tree.stack("a", NodeId::new("b")).expect("stack");
        let container = Rect::from_size(80.0, 60.0);
        let map = compute_viewports(&tree, container);
        assert_eq!(map[&stack], container);
        assert_eq!(map["a"], container);
        assert_eq!(map["b"], container);
    }

    #[test]
    fn computation_is_deterministic() {
        let mut tree = LayoutTree::singleton("a");
        let _ = tree
            .split("a", PlacementRegion::Right, NodeId::new("b"))
            .expect("split");
        let _ = tree
            .split("b", PlacementRegion::Top, NodeId::new("c"))
            .expect("split");
        let container = Rect::from_size(1023.0, 767.0);
        assert_eq!(
            compute_viewports(&tree, container),
            compute_viewports(&tree, container)
        );
    }
}

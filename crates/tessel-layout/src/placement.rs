//! Drag placement queries.
//!
//! Two read-only questions asked on every pointer update during a drag:
//! which node is the pointer over ([`resolve_hovered_target`]), and where
//! inside that node's rectangle would a drop land
//! ([`resolve_placement_region`]).

use serde::{Deserialize, Serialize};
use tessel_core::geometry::{Rect, Vec2};

use crate::tree::{LayoutNode, LayoutTree, NodeId, Orientation};
use crate::viewport::ViewportMap;

/// Central zone half-extent, as a fraction of width/height, that means
/// "stack onto the target".
pub const DEFAULT_STACK_ZONE_FRACTION: f64 = 0.3;

/// Drop zone inside a target rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementRegion {
    Top,
    Bottom,
    Left,
    Right,
    Stack,
}

impl PlacementRegion {
    /// Row orientation a split in this region produces, and whether the
    /// incoming node is ordered before the target. `None` for [`Self::Stack`].
    #[must_use]
    pub const fn split_axis(self) -> Option<(Orientation, bool)> {
        match self {
            Self::Left => Some((Orientation::Horizontal, true)),
            Self::Right => Some((Orientation::Horizontal, false)),
            Self::Top => Some((Orientation::Vertical, true)),
            Self::Bottom => Some((Orientation::Vertical, false)),
            Self::Stack => None,
        }
    }
}

/// How a hovered target was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverKind {
    /// The pointer is inside the target's rectangle.
    Inside,
    /// The pointer is outside every candidate; this is the closest one.
    Nearest,
}

/// Result of [`resolve_hovered_target`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoveredTarget {
    pub id: NodeId,
    pub kind: HoverKind,
    /// Distance to the nearest edge segment; `0.0` for direct hits.
    pub distance: f64,
}

/// Find the drop target under (or nearest to) `pointer`.
///
/// Candidates are area leaves and stack rows that have a viewport. A stack
/// row wins over any leaf that also contains the pointer. Outside every
/// candidate, the closest one by edge-segment distance is returned, limited
/// to `detection_size` when set. Ties go to the first candidate in id order.
/// Leaves inside a stack are only reachable through their stack row.
#[must_use]
pub fn resolve_hovered_target(
    pointer: Vec2,
    viewports: &ViewportMap,
    tree: &LayoutTree,
    detection_size: Option<f64>,
) -> Option<HoveredTarget> {
    let parents = tree.parent_map();
    let in_stack = |id: &NodeId| {
        parents
            .get(id)
            .and_then(|parent| tree.node(parent))
            .is_some_and(LayoutNode::is_stack)
    };

    let mut leaf_hit: Option<&NodeId> = None;
    let mut nearest: Option<(&NodeId, f64)> = None;
    for (id, rect) in viewports {
        let Some(node) = tree.node(id) else {
            continue;
        };
        let is_stack = node.is_stack();
        if !is_stack && !node.is_area() {
            continue;
        }
        if rect.contains(pointer) {
            if is_stack {
                return Some(HoveredTarget {
                    id: id.clone(),
                    kind: HoverKind::Inside,
                    distance: 0.0,
                });
            }
            if leaf_hit.is_none() {
                leaf_hit = Some(id);
            }
            continue;
        }
        if in_stack(id) {
            continue;
        }
        let distance = rect.distance_to_edges(pointer);
        if nearest.is_none_or(|(_, best)| distance < best) {
            nearest = Some((id, distance));
        }
    }

    if let Some(id) = leaf_hit {
        return Some(HoveredTarget {
            id: id.clone(),
            kind: HoverKind::Inside,
            distance: 0.0,
        });
    }

    let (id, distance) = nearest?;
    if detection_size.is_some_and(|limit| distance > limit) {
        tracing::trace!(
            target: "tessel.placement",
            nearest = %id,
            distance,
            "nearest target beyond detection size"
        );
        return None;
    }
    Some(HoveredTarget {
        id: id.clone(),
        kind: HoverKind::Nearest,
        distance,
    })
}

/// [`resolve_placement_region_with`] using [`DEFAULT_STACK_ZONE_FRACTION`].
#[must_use]
pub fn resolve_placement_region(target: Rect, pointer: Vec2) -> PlacementRegion {
    resolve_placement_region_with(target, pointer, DEFAULT_STACK_ZONE_FRACTION)
}

/// Classify `pointer` into a drop region of `target`.
///
/// Inside the central zone (`|dx| <= fraction * width` and
/// `|dy| <= fraction * height` from the center) the result is
/// [`PlacementRegion::Stack`]; otherwise it is the edge with the smallest
/// signed distance, ties resolved left, right, top, bottom.
#[must_use]
pub fn resolve_placement_region_with(
    target: Rect,
    pointer: Vec2,
    stack_zone_fraction: f64,
) -> PlacementRegion {
    let offset = pointer.sub(target.center());
    if offset.x.abs() <= stack_zone_fraction * target.width
        && offset.y.abs() <= stack_zone_fraction * target.height
    {
        return PlacementRegion::Stack;
    }

    let edges = target.edge_distances(pointer);
    let mut best = (PlacementRegion::Left, edges.left);
    for candidate in [
        (PlacementRegion::Right, edges.right),
        (PlacementRegion::Top, edges.top),
        (PlacementRegion::Bottom, edges.bottom),
    ] {
        if candidate.1 < best.1 {
            best = candidate;
        }
    }
    best.0
}

//! Per-screen engine state.
//!
//! [`AreaState`] owns one screen's layout tree together with the area content
//! records, computed viewports, focus tracking, the pending drag placement,
//! and a bounded error log. Every mutating method is one atomic transition:
//! it runs against a clone and publishes the clone only on success. Failures
//! are appended to the error log and also returned, so embedders driving the
//! state directly still see them.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tessel_core::geometry::Rect;

use crate::config::EngineConfig;
use crate::error::{LayoutError, Result};
use crate::finalize::AreaToOpen;
use crate::ops::{MergeDirection, SplitResult};
use crate::placement::PlacementRegion;
use crate::registry::AreaTypeRegistry;
use crate::tree::{
    Area, AreaRole, InvariantCode, InvariantIssue, InvariantReport, LayoutNode, LayoutTree,
    NodeId, Orientation,
};
use crate::viewport::{ViewportMap, compute_viewports};

/// Corner a split gesture started from; picks which side gets the new area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Region of the target the new area occupies for a split along
    /// `orientation`; `None` for stacks.
    #[must_use]
    pub const fn region(self, orientation: Orientation) -> Option<PlacementRegion> {
        match (orientation, self) {
            (Orientation::Horizontal, Self::TopLeft | Self::BottomLeft) => {
                Some(PlacementRegion::Left)
            }
            (Orientation::Horizontal, Self::TopRight | Self::BottomRight) => {
                Some(PlacementRegion::Right)
            }
            (Orientation::Vertical, Self::TopLeft | Self::TopRight) => Some(PlacementRegion::Top),
            (Orientation::Vertical, Self::BottomLeft | Self::BottomRight) => {
                Some(PlacementRegion::Bottom)
            }
            (Orientation::Stack, _) => None,
        }
    }
}

/// Drag direction of a join/move gesture, from source toward target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Row orientation along which this direction runs.
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Left | Self::Right => Orientation::Horizontal,
            Self::Up | Self::Down => Orientation::Vertical,
        }
    }

    /// Side of the target that faces a source moving in this direction.
    #[must_use]
    pub const fn facing_region(self) -> PlacementRegion {
        match self {
            Self::Left => PlacementRegion::Right,
            Self::Right => PlacementRegion::Left,
            Self::Up => PlacementRegion::Bottom,
            Self::Down => PlacementRegion::Top,
        }
    }

    const fn step(self) -> isize {
        match self {
            Self::Left | Self::Up => -1,
            Self::Right | Self::Down => 1,
        }
    }
}

/// Transient highlight shown while a join/move gesture is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinPreview {
    pub source: NodeId,
    pub target: NodeId,
    pub direction: Direction,
}

/// What [`AreaState::join_or_move_area`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JoinOrMove {
    /// Source absorbed its adjacent target.
    Joined { survivor: NodeId, removed: NodeId },
    /// Source was detached and re-inserted beside the target.
    Moved {
        area_id: NodeId,
        target: NodeId,
        region: PlacementRegion,
    },
}

/// One screen's layout, content, and interaction state.
#[derive(Debug, Clone)]
pub struct AreaState {
    pub(crate) tree: LayoutTree,
    pub(crate) areas: BTreeMap<NodeId, Area>,
    pub(crate) viewports: ViewportMap,
    pub(crate) container: Rect,
    pub(crate) active_area_id: Option<NodeId>,
    pub(crate) last_lead_area_id: Option<NodeId>,
    pub(crate) area_to_open: Option<AreaToOpen>,
    pub(crate) errors: Vec<String>,
    pub(crate) join_preview: Option<JoinPreview>,
    pub(crate) last_split_result: Option<SplitResult>,
    pub(crate) config: EngineConfig,
    pub(crate) registry: Option<Arc<dyn AreaTypeRegistry>>,
    defer_viewports: bool,
    viewports_stale: bool,
}

impl Default for AreaState {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl AreaState {
    /// Empty state.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_namespace("", config)
    }

    /// Empty state whose allocated node ids carry `namespace` as a prefix.
    #[must_use]
    pub fn with_namespace(namespace: impl Into<String>, config: EngineConfig) -> Self {
        Self {
            tree: LayoutTree::with_namespace(namespace),
            areas: BTreeMap::new(),
            viewports: ViewportMap::new(),
            container: Rect::default(),
            active_area_id: None,
            last_lead_area_id: None,
            area_to_open: None,
            errors: Vec::new(),
            join_preview: None,
            last_split_result: None,
            config,
            registry: None,
            defer_viewports: false,
            viewports_stale: false,
        }
    }

    /// Install an area-type registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<dyn AreaTypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub(crate) fn set_registry(&mut self, registry: Option<Arc<dyn AreaTypeRegistry>>) {
        self.registry = registry;
    }

    // ----- queries -----

    #[must_use]
    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn area_by_id(&self, id: &str) -> Option<&Area> {
        self.areas.get(id)
    }

    /// Areas in layout order (depth-first, child order).
    #[must_use]
    pub fn all_areas(&self) -> Vec<&Area> {
        self.tree
            .area_ids()
            .iter()
            .filter_map(|id| self.areas.get(id))
            .collect()
    }

    #[must_use]
    pub fn active_area_id(&self) -> Option<&NodeId> {
        self.active_area_id.as_ref()
    }

    #[must_use]
    pub fn active_area(&self) -> Option<&Area> {
        self.active_area_id
            .as_ref()
            .and_then(|id| self.areas.get(id))
    }

    #[must_use]
    pub fn last_lead_area_id(&self) -> Option<&NodeId> {
        self.last_lead_area_id.as_ref()
    }

    /// Recorded error messages, oldest first.
    #[must_use]
    pub fn area_errors(&self) -> &[String] {
        &self.errors
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    #[must_use]
    pub fn last_split_result(&self) -> Option<&SplitResult> {
        self.last_split_result.as_ref()
    }

    #[must_use]
    pub fn viewports(&self) -> &ViewportMap {
        &self.viewports
    }

    #[must_use]
    pub fn viewport(&self, id: &str) -> Option<Rect> {
        self.viewports.get(id).copied()
    }

    #[must_use]
    pub fn container_rect(&self) -> Rect {
        self.container
    }

    #[must_use]
    pub fn join_preview(&self) -> Option<&JoinPreview> {
        self.join_preview.as_ref()
    }

    #[must_use]
    pub fn area_to_open(&self) -> Option<&AreaToOpen> {
        self.area_to_open.as_ref()
    }

    /// Tree invariants plus area-record consistency.
    #[must_use]
    pub fn invariant_report(&self) -> InvariantReport {
        let mut report = self.tree.invariant_report();
        for node in self.tree.nodes() {
            if let LayoutNode::Area { id } = node {
                if !self.areas.contains_key(id) {
                    report.issues.push(InvariantIssue::new(
                        InvariantCode::AreaWithoutData,
                        Some(id.clone()),
                        format!("area node {id} has no area record"),
                    ));
                }
            }
        }
        for id in self.areas.keys() {
            if !self.tree.node(id).is_some_and(LayoutNode::is_area) {
                report.issues.push(InvariantIssue::new(
                    InvariantCode::DataWithoutArea,
                    Some(id.clone()),
                    format!("area record {id} has no area node"),
                ));
            }
        }
        report
    }

    // ----- transaction plumbing -----

    /// Run `f` against a working copy; publish it on success, log on failure.
    pub(crate) fn transact<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut AreaState) -> Result<T>,
    ) -> Result<T> {
        let mut working = self.clone();
        match f(&mut working) {
            Ok(out) => {
                working.settle();
                *self = working;
                Ok(out)
            }
            Err(err) => {
                self.record_error(op, &err);
                Err(err)
            }
        }
    }

    /// Warn and append to the error log.
    pub(crate) fn record_error(&mut self, op: &str, err: &LayoutError) {
        tracing::warn!(
            target: "tessel.tree",
            op,
            category = ?err.category(),
            error = %err,
            "operation rejected"
        );
        self.push_error(op, err);
    }

    /// Append to the bounded error log, dropping the oldest entries.
    pub(crate) fn push_error(&mut self, op: &str, err: &LayoutError) {
        self.errors.push(format!("{op}: {err}"));
        let capacity = self.config.error_log_capacity.max(1);
        if self.errors.len() > capacity {
            let excess = self.errors.len() - capacity;
            let _ = self.errors.drain(..excess);
        }
    }

    /// Repair focus pointers after a structural change and refresh viewports.
    pub(crate) fn settle(&mut self) {
        let known = |id: &Option<NodeId>, areas: &BTreeMap<NodeId, Area>| {
            id.as_ref().is_some_and(|id| areas.contains_key(id))
        };
        if !known(&self.active_area_id, &self.areas) {
            self.active_area_id = self.tree.root_id().and_then(|root| self.tree.first_leaf_under(root));
        }
        if !known(&self.last_lead_area_id, &self.areas) {
            self.last_lead_area_id = None;
        }
        if let Some(preview) = &self.join_preview {
            if !self.areas.contains_key(&preview.source) || !self.areas.contains_key(&preview.target) {
                self.join_preview = None;
            }
        }
        self.refresh_viewports();
    }

    fn refresh_viewports(&mut self) {
        if self.defer_viewports {
            self.viewports_stale = true;
        } else {
            self.viewports = compute_viewports(&self.tree, self.container);
            self.viewports_stale = false;
        }
    }

    /// Hold viewport recomputation until [`Self::end_deferred`].
    pub(crate) fn begin_deferred(&mut self) {
        self.defer_viewports = true;
    }

    pub(crate) fn end_deferred(&mut self) {
        self.defer_viewports = false;
        if self.viewports_stale {
            self.refresh_viewports();
        }
    }

    /// Bring viewports up to date even inside a deferred batch.
    pub(crate) fn ensure_viewports(&mut self) {
        if self.viewports_stale {
            self.viewports = compute_viewports(&self.tree, self.container);
            self.viewports_stale = false;
        }
    }

    // ----- helpers shared with the finalizer -----

    pub(crate) fn require_area(&self, id: &str) -> Result<&Area> {
        match self.tree.node(id) {
            Some(LayoutNode::Area { .. }) => self.areas.get(id).ok_or_else(|| {
                LayoutError::NodeNotFound {
                    node_id: NodeId::new(id),
                }
            }),
            Some(LayoutNode::Row(_)) => Err(LayoutError::NotAnArea {
                node_id: NodeId::new(id),
            }),
            None => Err(LayoutError::NodeNotFound {
                node_id: NodeId::new(id),
            }),
        }
    }

    /// Node a split or drop next to `id` should wrap: the enclosing stack row
    /// for a tab, `id` itself otherwise.
    pub(crate) fn split_anchor(&self, id: &str) -> NodeId {
        self.tree
            .parent_row_of(id)
            .filter(|row| row.orientation.is_stack())
            .map_or_else(|| NodeId::new(id), |row| row.id.clone())
    }

    /// Role of the area that represents `node` (a stack's active tab).
    pub(crate) fn role_of(&self, node: &str) -> Option<AreaRole> {
        let leaf = self.tree.first_leaf_under(node)?;
        self.areas.get(&leaf).map(|area| area.role)
    }

    pub(crate) fn check_stack_roles(
        &self,
        target: &str,
        incoming: &NodeId,
        incoming_role: AreaRole,
        allow_mixed_roles: bool,
    ) -> Result<()> {
        if allow_mixed_roles {
            return Ok(());
        }
        match self.role_of(target) {
            Some(target_role) if target_role != incoming_role => Err(LayoutError::RoleMismatch {
                target: NodeId::new(target),
                target_role,
                incoming: incoming.clone(),
                incoming_role,
            }),
            _ => Ok(()),
        }
    }

    /// Fresh id from this screen's allocator.
    pub fn allocate_area_id(&mut self) -> NodeId {
        self.tree.allocate_id()
    }

    // ----- operations -----

    /// Resize the container; viewports follow.
    pub fn set_container_rect(&mut self, rect: Rect) {
        self.container = rect;
        self.refresh_viewports();
        tracing::debug!(
            target: "tessel.tree",
            width = rect.width,
            height = rect.height,
            "container resized"
        );
    }

    /// Seed an empty screen with its first area.
    pub fn insert_root_area(&mut self, area: Area) -> Result<()> {
        self.transact("insert_root_area", |state| {
            state.tree.insert_root_area(area.id.clone())?;
            state.active_area_id = Some(area.id.clone());
            if area.role == AreaRole::Lead {
                state.last_lead_area_id = Some(area.id.clone());
            }
            let _ = state.areas.insert(area.id.clone(), area);
            Ok(())
        })
    }

    /// Duplicate `target` into a new area beside it.
    ///
    /// The side is picked from `corner`; [`Orientation::Stack`] adds the
    /// duplicate as a tab instead. Splitting a tab splits its whole stack.
    pub fn split_area(
        &mut self,
        target: &str,
        orientation: Orientation,
        corner: Corner,
    ) -> Result<SplitResult> {
        let result = self.transact("split_area", |state| {
            let source = state.require_area(target)?.clone();
            let new_id = state.tree.allocate_id();
            let duplicate = Area {
                id: new_id.clone(),
                ..source
            };
            let result = match corner.region(orientation) {
                Some(region) => {
                    let anchor = state.split_anchor(target);
                    state
                        .tree
                        .split_with(&anchor, region, new_id.clone(), state.config.split_sizing)?
                }
                None => {
                    let row_id = state.tree.stack(target, new_id.clone())?;
                    let index = state
                        .tree
                        .row(&row_id)
                        .and_then(|row| row.child_index(&new_id))
                        .unwrap_or(1);
                    SplitResult {
                        row_id,
                        separator_index: index.saturating_sub(1),
                        new_area_id: new_id.clone(),
                    }
                }
            };
            let _ = state.areas.insert(new_id.clone(), duplicate);
            state.active_area_id = Some(new_id);
            state.last_split_result = Some(result.clone());
            Ok(result)
        })?;
        tracing::debug!(
            target: "tessel.tree",
            target_id = target,
            orientation = ?orientation,
            corner = ?corner,
            new_area_id = %result.new_area_id,
            "split area"
        );
        Ok(result)
    }

    /// Add `area` as a tab on `target` (an area or a stack row).
    ///
    /// Returns the stack row id.
    pub fn stack(&mut self, target: &str, area: Area, allow_mixed_roles: bool) -> Result<NodeId> {
        let area_id = area.id.clone();
        let stack_id = self.transact("stack", |state| {
            if !state.tree.contains(target) {
                return Err(LayoutError::NodeNotFound {
                    node_id: NodeId::new(target),
                });
            }
            if state.areas.contains_key(&area.id) {
                return Err(LayoutError::DuplicateNode {
                    node_id: area.id.clone(),
                });
            }
            state.check_stack_roles(target, &area.id, area.role, allow_mixed_roles)?;
            let stack_id = state.tree.stack(target, area.id.clone())?;
            state.active_area_id = Some(area.id.clone());
            if area.role == AreaRole::Lead {
                state.last_lead_area_id = Some(area.id.clone());
            }
            let _ = state.areas.insert(area.id.clone(), area);
            Ok(stack_id)
        })?;
        tracing::debug!(
            target: "tessel.tree",
            target_id = target,
            area_id = %area_id,
            stack_id = %stack_id,
            "stacked area"
        );
        Ok(stack_id)
    }

    /// Join `source` over `target` if they are adjacent along `direction`,
    /// otherwise move `source` next to `target` on the side facing it.
    pub fn join_or_move_area(
        &mut self,
        source: &str,
        target: &str,
        direction: Direction,
    ) -> Result<JoinOrMove> {
        let outcome = self.transact("join_or_move_area", |state| {
            if source == target {
                return Err(LayoutError::SelfPlacement {
                    node_id: NodeId::new(source),
                });
            }
            let _ = state.require_area(source)?;
            let _ = state.require_area(target)?;

            if let Some((row_id, target_index)) = state.adjacent_join(source, target, direction) {
                let toward_source = if direction.step() > 0 {
                    MergeDirection::Previous
                } else {
                    MergeDirection::Next
                };
                let _ = state.tree.join(&row_id, target_index, toward_source)?;
                let _ = state.areas.remove(target);
                state.active_area_id = Some(NodeId::new(source));
                return Ok(JoinOrMove::Joined {
                    survivor: NodeId::new(source),
                    removed: NodeId::new(target),
                });
            }

            let source_id = NodeId::new(source);
            let _ = state.tree.remove_node(source)?;
            let anchor = state.split_anchor(target);
            let region = direction.facing_region();
            let result = state
                .tree
                .split_with(&anchor, region, source_id.clone(), state.config.split_sizing)?;
            state.last_split_result = Some(result);
            state.active_area_id = Some(source_id.clone());
            Ok(JoinOrMove::Moved {
                area_id: source_id,
                target: anchor,
                region,
            })
        })?;
        tracing::debug!(target: "tessel.tree", source, target_id = target, outcome = ?outcome, "join or move");
        Ok(outcome)
    }

    /// Row id and target index when `target` sits right next to `source` in
    /// the direction of travel, inside a non-stack row along that axis.
    fn adjacent_join(&self, source: &str, target: &str, direction: Direction) -> Option<(NodeId, usize)> {
        let row = self.tree.parent_row_of(source)?;
        if row.orientation != direction.orientation() {
            return None;
        }
        let source_index = row.child_index(source)?;
        let target_index = row.child_index(target)?;
        let expected = source_index.checked_add_signed(direction.step())?;
        (expected == target_index).then(|| (row.id.clone(), target_index))
    }

    /// Assign child weights of `row_id`.
    pub fn set_row_sizes(&mut self, row_id: &str, sizes: &[f64]) -> Result<()> {
        let epsilon = self.config.size_epsilon;
        self.transact("set_row_sizes", |state| {
            let total: f64 = sizes.iter().sum();
            if total.is_finite() && total <= epsilon {
                return Err(LayoutError::InvalidSizes {
                    row_id: NodeId::new(row_id),
                    reason: format!("sizes sum to {total}"),
                });
            }
            state.tree.set_child_sizes(row_id, sizes)
        })
    }

    /// Show or clear the join/move highlight.
    pub fn set_join_preview(&mut self, preview: Option<JoinPreview>) -> Result<()> {
        self.transact("set_join_preview", |state| {
            if let Some(preview) = &preview {
                let _ = state.require_area(&preview.source)?;
                let _ = state.require_area(&preview.target)?;
            }
            state.join_preview = preview;
            Ok(())
        })
    }

    /// Focus an area; a tab inside a stack is brought to the front.
    pub fn set_active_area(&mut self, id: &str) -> Result<()> {
        self.transact("set_active_area", |state| {
            let role = state.require_area(id)?.role;
            if let Some(stack_id) = state
                .tree
                .parent_row_of(id)
                .filter(|row| row.orientation.is_stack())
                .map(|row| row.id.clone())
            {
                state.tree.row_mut(&stack_id)?.active_tab_id = Some(NodeId::new(id));
            }
            state.active_area_id = Some(NodeId::new(id));
            if role == AreaRole::Lead {
                state.last_lead_area_id = Some(NodeId::new(id));
            }
            Ok(())
        })
    }

    /// Bring `tab_id` to the front of `stack_id`.
    pub fn set_active_tab(&mut self, stack_id: &str, tab_id: &str) -> Result<()> {
        self.transact("set_active_tab", |state| {
            let row = state.tree.row_mut(stack_id)?;
            if !row.orientation.is_stack() || row.child_index(tab_id).is_none() {
                return Err(LayoutError::NotAChild {
                    row_id: NodeId::new(stack_id),
                    node_id: NodeId::new(tab_id),
                });
            }
            row.active_tab_id = Some(NodeId::new(tab_id));
            state.active_area_id = state.tree.first_leaf_under(tab_id);
            Ok(())
        })
    }

    /// Remove an area, returning its record.
    pub fn remove_area(&mut self, id: &str) -> Result<Area> {
        let area = self.transact("remove_area", |state| {
            let _ = state.require_area(id)?;
            let _ = state.tree.remove_node(id)?;
            state.areas.remove(id).ok_or_else(|| LayoutError::NodeNotFound {
                node_id: NodeId::new(id),
            })
        })?;
        tracing::debug!(target: "tessel.tree", area_id = id, "removed area");
        Ok(area)
    }

    /// Close an area. Returns the id now occupying its slot, if any.
    pub fn close_area(&mut self, id: &str) -> Result<Option<NodeId>> {
        self.transact("close_area", |state| {
            let _ = state.require_area(id)?;
            let occupant = state.tree.remove_node(id)?;
            let _ = state.areas.remove(id);
            Ok(occupant)
        })
    }

    /// Replace an area's opaque state payload.
    pub fn update_area_state(&mut self, id: &str, value: serde_json::Value) -> Result<()> {
        self.transact("update_area_state", |state| {
            let _ = state.require_area(id)?;
            if let Some(area) = state.areas.get_mut(id) {
                area.state = value;
            }
            Ok(())
        })
    }

    /// Change an area's role.
    pub fn set_area_role(&mut self, id: &str, role: AreaRole) -> Result<()> {
        self.transact("set_area_role", |state| {
            let _ = state.require_area(id)?;
            if let Some(area) = state.areas.get_mut(id) {
                area.role = role;
            }
            if role == AreaRole::Lead && state.active_area_id.as_deref() == Some(id) {
                state.last_lead_area_id = Some(NodeId::new(id));
            }
            Ok(())
        })
    }

    /// Drop the pending placement and join preview.
    pub fn cleanup_temporary_states(&mut self) {
        self.area_to_open = None;
        self.join_preview = None;
        tracing::trace!(target: "tessel.tree", "cleared temporary states");
    }

    /// Deep copy under `namespace` with every node id reallocated.
    ///
    /// Temporary state and the error log are not carried over.
    #[must_use]
    pub fn rekeyed(&self, namespace: impl Into<String>) -> AreaState {
        let (tree, mapping) = self.tree.rekeyed(namespace);
        let remap = |id: &NodeId| mapping.get(id).cloned().unwrap_or_else(|| id.clone());
        let areas = self
            .areas
            .values()
            .map(|area| {
                let id = remap(&area.id);
                (
                    id.clone(),
                    Area {
                        id,
                        ..area.clone()
                    },
                )
            })
            .collect();
        let mut copy = AreaState {
            tree,
            areas,
            viewports: ViewportMap::new(),
            container: self.container,
            active_area_id: self.active_area_id.as_ref().map(remap),
            last_lead_area_id: self.last_lead_area_id.as_ref().map(remap),
            area_to_open: None,
            errors: Vec::new(),
            join_preview: None,
            last_split_result: None,
            config: self.config.clone(),
            registry: self.registry.clone(),
            defer_viewports: false,
            viewports_stale: false,
        };
        copy.refresh_viewports();
        copy
    }
}

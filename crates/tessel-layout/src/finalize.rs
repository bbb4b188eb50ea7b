//! Drag-and-drop placement transaction.
//!
//! A drag moves through `Idle -> Pending -> {Committed | Aborted} -> Idle`.
//! [`AreaState::set_area_to_open`] records what is being dragged; pointer
//! updates move it; [`AreaState::finalize_area_placement`] commits the drop.
//!
//! Finalizing runs in two phases. Resolution (target, viewport, region, role
//! and registry checks) is read-only; problems found there abort the drop and
//! are logged as-is. The commit then runs on a working copy of the state, and
//! any failure there is wrapped in [`LayoutError::CommitFailed`] and discards
//! the copy. The pending record is cleared on every path.

use serde::{Deserialize, Serialize};
use tessel_core::geometry::Vec2;

use crate::error::{LayoutError, Result};
use crate::ops::SplitResult;
use crate::placement::{PlacementRegion, resolve_hovered_target, resolve_placement_region_with};
use crate::state::AreaState;
use crate::tree::{Area, AreaRole, NodeId};

/// What is being dragged: an existing area (`source_id`) or a new one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<AreaRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<NodeId>,
}

impl AreaDescriptor {
    /// Drag of a brand new area of `kind`.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Drag of an area that already exists.
    #[must_use]
    pub fn existing(source_id: impl Into<NodeId>) -> Self {
        Self {
            source_id: Some(source_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: AreaRole) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: serde_json::Value) -> Self {
        self.state = Some(state);
        self
    }
}

/// Pending placement, alive between drag start and drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaToOpen {
    pub position: Vec2,
    pub area: AreaDescriptor,
}

/// Details of a committed drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementCommit {
    pub area_id: NodeId,
    /// Node the area was placed against; `None` when it became the root of
    /// an empty screen.
    pub target: Option<NodeId>,
    pub region: Option<PlacementRegion>,
    /// Whether a new area record was created (as opposed to a move).
    pub created: bool,
}

/// Result of [`AreaState::finalize_area_placement`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    Committed(PlacementCommit),
    Aborted { reason: LayoutError },
    /// No placement was pending.
    Idle,
}

impl PlacementOutcome {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

#[derive(Debug)]
struct PlacementPlan {
    area_id: NodeId,
    /// `None` for a new area, which `area` then describes.
    source: Option<NodeId>,
    area: Option<Area>,
    role: AreaRole,
    target: Option<NodeId>,
    region: Option<PlacementRegion>,
}

impl AreaState {
    /// Start (`Some`) or cancel (`None`) a drag placement.
    pub fn set_area_to_open(&mut self, position: Vec2, area: Option<AreaDescriptor>) {
        self.area_to_open = area.map(|area| AreaToOpen { position, area });
        tracing::trace!(
            target: "tessel.finalize",
            pending = self.area_to_open.is_some(),
            x = position.x,
            y = position.y,
            "area to open"
        );
    }

    /// Move the pending placement's pointer. Returns `false` when nothing is
    /// pending.
    pub fn update_area_to_open_position(&mut self, position: Vec2) -> bool {
        match &mut self.area_to_open {
            Some(pending) => {
                pending.position = position;
                true
            }
            None => false,
        }
    }

    /// Commit the pending drop.
    ///
    /// `target` and `placement` override hover resolution when given.
    pub fn finalize_area_placement(
        &mut self,
        target: Option<&str>,
        placement: Option<PlacementRegion>,
    ) -> PlacementOutcome {
        let Some(pending) = self.area_to_open.take() else {
            return PlacementOutcome::Idle;
        };
        let _span = tracing::debug_span!(
            target: "tessel.finalize",
            "finalize_area_placement",
            x = pending.position.x,
            y = pending.position.y,
            kind = %pending.area.kind,
        )
        .entered();

        self.ensure_viewports();
        let plan = match self.resolve_plan(&pending, target, placement) {
            Ok(plan) => plan,
            Err(reason) => {
                if matches!(reason, LayoutError::SelfPlacement { .. }) {
                    tracing::debug!(target: "tessel.finalize", error = %reason, "placement dropped onto itself");
                } else {
                    tracing::warn!(target: "tessel.finalize", error = %reason, "placement aborted");
                    self.push_error("finalize_area_placement", &reason);
                }
                return PlacementOutcome::Aborted { reason };
            }
        };

        let mut working = self.clone();
        match working.commit_plan(plan) {
            Ok(commit) => {
                working.settle();
                *self = working;
                tracing::debug!(
                    target: "tessel.finalize",
                    area_id = %commit.area_id,
                    target_id = ?commit.target.as_deref(),
                    region = ?commit.region,
                    created = commit.created,
                    "placement committed"
                );
                PlacementOutcome::Committed(commit)
            }
            Err(cause) => {
                let reason = LayoutError::commit_failed(cause);
                tracing::warn!(target: "tessel.finalize", error = %reason, "placement rolled back");
                self.push_error("finalize_area_placement", &reason);
                PlacementOutcome::Aborted { reason }
            }
        }
    }

    fn resolve_plan(
        &self,
        pending: &AreaToOpen,
        target: Option<&str>,
        placement: Option<PlacementRegion>,
    ) -> Result<PlacementPlan> {
        let descriptor = &pending.area;
        let (area_id, source, area, role) = match &descriptor.source_id {
            Some(source) => {
                let existing = self.require_area(source)?;
                (source.clone(), Some(source.clone()), None, existing.role)
            }
            None => {
                let registered = match &self.registry {
                    Some(registry) => Some(registry.lookup(&descriptor.kind).ok_or_else(|| {
                        LayoutError::UnknownAreaKind {
                            kind: descriptor.kind.clone(),
                        }
                    })?),
                    None => None,
                };
                let role = descriptor
                    .role
                    .or_else(|| registered.as_ref().map(|d| d.default_role))
                    .unwrap_or_default();
                let state = descriptor
                    .state
                    .clone()
                    .or_else(|| registered.map(|d| d.default_state))
                    .unwrap_or(serde_json::Value::Null);
                let id = self.tree.peek_next_id();
                let area = Area {
                    id: id.clone(),
                    kind: descriptor.kind.clone(),
                    role,
                    state,
                };
                (id, None, Some(area), role)
            }
        };

        if self.tree.is_empty() {
            return Ok(PlacementPlan {
                area_id,
                source,
                area,
                role,
                target: None,
                region: None,
            });
        }

        let target_id = match target {
            Some(explicit) if self.tree.contains(explicit) => NodeId::new(explicit),
            Some(explicit) => {
                return Err(LayoutError::NodeNotFound {
                    node_id: NodeId::new(explicit),
                });
            }
            None => {
                resolve_hovered_target(
                    pending.position,
                    &self.viewports,
                    &self.tree,
                    self.config.detection_size,
                )
                .ok_or(LayoutError::NoTarget {
                    x: pending.position.x,
                    y: pending.position.y,
                })?
                .id
            }
        };

        if source.as_ref() == Some(&target_id) {
            return Err(LayoutError::SelfPlacement { node_id: target_id });
        }

        let rect = self
            .viewports
            .get(&target_id)
            .copied()
            .ok_or_else(|| LayoutError::NoViewport {
                node_id: target_id.clone(),
            })?;
        let region = placement.unwrap_or_else(|| {
            resolve_placement_region_with(rect, pending.position, self.config.stack_zone_fraction)
        });

        if region == PlacementRegion::Stack {
            self.check_stack_roles(&target_id, &area_id, role, self.config.allow_mixed_roles)?;
        }

        Ok(PlacementPlan {
            area_id,
            source,
            area,
            role,
            target: Some(target_id),
            region: Some(region),
        })
    }

    fn commit_plan(&mut self, plan: PlacementPlan) -> Result<PlacementCommit> {
        let PlacementPlan {
            area_id,
            source,
            area,
            role,
            mut target,
            region,
        } = plan;

        // A moved area lands under a placeholder id next to the intact
        // target. The source leaf goes only after that.
        let landing_id = if source.is_some() {
            self.tree.allocate_id()
        } else {
            area_id.clone()
        };
        if area.is_some() {
            // Reserve the id picked during resolution before any row allocation.
            let reserved = self.tree.allocate_id();
            if reserved != area_id {
                return Err(LayoutError::DuplicateNode { node_id: area_id });
            }
        }

        match (&target, region) {
            (None, _) => self.tree.insert_root_area(landing_id.clone())?,
            (Some(target_id), Some(PlacementRegion::Stack)) => {
                let _ = self.tree.stack(target_id, landing_id.clone())?;
            }
            (Some(target_id), Some(region)) => {
                let anchor = self.split_anchor(target_id);
                let result = self.tree.split_with(
                    &anchor,
                    region,
                    landing_id.clone(),
                    self.config.split_sizing,
                )?;
                self.last_split_result = Some(result);
            }
            (Some(_), None) => return Err(LayoutError::NoPendingPlacement),
        }

        if let Some(source) = &source {
            let _ = self.tree.remove_node(source)?;
            self.tree.rename_area(&landing_id, area_id.clone())?;
            if let Some(region) = region {
                self.relocate_split_result(&area_id, region);
            }
            let vanished = target
                .as_ref()
                .filter(|t| !self.tree.contains(t.as_str()))
                .cloned();
            if let Some(vanished) = vanished {
                target = self.landing_neighbor(&area_id, region);
                tracing::debug!(
                    target: "tessel.finalize",
                    vanished = %vanished,
                    reported = ?target.as_deref(),
                    "drop target collapsed after source removal"
                );
            }
        }

        let created = area.is_some();
        if let Some(area) = area {
            if self.areas.contains_key(&area.id) {
                return Err(LayoutError::DuplicateNode { node_id: area.id });
            }
            let _ = self.areas.insert(area.id.clone(), area);
        }
        self.active_area_id = Some(area_id.clone());
        if role == AreaRole::Lead {
            self.last_lead_area_id = Some(area_id.clone());
        }

        let region = target.as_ref().and(region);
        Ok(PlacementCommit {
            area_id,
            target,
            region,
            created,
        })
    }

    /// Node now sitting across the separator from `area_id`, or the stack
    /// holding it.
    fn landing_neighbor(
        &self,
        area_id: &NodeId,
        region: Option<PlacementRegion>,
    ) -> Option<NodeId> {
        let row = self.tree.parent_row_of(area_id)?;
        let Some((_, incoming_first)) = region.and_then(PlacementRegion::split_axis) else {
            return Some(row.id.clone());
        };
        let index = row.child_index(area_id)?;
        let neighbor = if incoming_first {
            index + 1
        } else {
            index.checked_sub(1)?
        };
        row.children.get(neighbor).map(|child| child.id.clone())
    }

    /// Point `last_split_result` at `area_id`'s separator after the tree
    /// reshaped around a moved area.
    fn relocate_split_result(&mut self, area_id: &NodeId, region: PlacementRegion) {
        let Some((_, incoming_first)) = region.split_axis() else {
            return;
        };
        let Some(row_id) = self.tree.parent_row_id(area_id) else {
            self.last_split_result = None;
            return;
        };
        let Some(index) = self.tree.row(&row_id).and_then(|row| row.child_index(area_id)) else {
            self.last_split_result = None;
            return;
        };
        let separator_index = if incoming_first {
            index
        } else {
            index.saturating_sub(1)
        };
        self.last_split_result = Some(SplitResult {
            row_id,
            separator_index,
            new_area_id: area_id.clone(),
        });
    }
}

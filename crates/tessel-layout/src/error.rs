//! Engine error taxonomy.
//!
//! Every failure the engine can detect maps to one [`LayoutError`] variant,
//! and every variant belongs to one [`ErrorCategory`]. Screen-level entry
//! points never surface these to callers directly: they are rendered into the
//! owning screen's error log (see [`crate::AreaState::area_errors`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ops::MergeDirection;
use crate::placement::PlacementRegion;
use crate::screen::ScreenId;
use crate::tree::{AreaRole, NodeId};

/// Broad classification used for routing and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A referenced id is missing or has the wrong node kind.
    Structural,
    /// No rectangle is available for a resolved target.
    Geometric,
    /// The operation is well-formed but disallowed.
    Policy,
    /// A commit failed part-way and was rolled back.
    Transactional,
}

/// Errors produced by tree mutation, placement, and screen management.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("node {node_id} not found")]
    NodeNotFound { node_id: NodeId },

    #[error("node {node_id} already exists")]
    DuplicateNode { node_id: NodeId },

    #[error("node {node_id} is not a row")]
    NotARow { node_id: NodeId },

    #[error("node {node_id} is not an area")]
    NotAnArea { node_id: NodeId },

    #[error("row {row_id} has no child at index {index} (len {len})")]
    ChildIndexOutOfRange {
        row_id: NodeId,
        index: usize,
        len: usize,
    },

    #[error("row {row_id} has no {direction:?} neighbor for child {index}")]
    NoMergeNeighbor {
        row_id: NodeId,
        index: usize,
        direction: MergeDirection,
    },

    #[error("node {node_id} is not a child of row {row_id}")]
    NotAChild { row_id: NodeId, node_id: NodeId },

    #[error("layout tree is not empty; cannot seed root {node_id}")]
    TreeNotEmpty { node_id: NodeId },

    #[error("layout tree is empty")]
    EmptyTree,

    #[error("no viewport computed for node {node_id}")]
    NoViewport { node_id: NodeId },

    #[error("no drop target near ({x}, {y})")]
    NoTarget { x: f64, y: f64 },

    #[error(
        "cannot stack {incoming_role} area {incoming} onto {target_role} area {target}: roles differ"
    )]
    RoleMismatch {
        target: NodeId,
        target_role: AreaRole,
        incoming: NodeId,
        incoming_role: AreaRole,
    },

    #[error("cannot remove screen {screen_id}: at least one classic screen must remain")]
    LastClassicScreen { screen_id: ScreenId },

    #[error("screen {screen_id} does not exist")]
    UnknownScreen { screen_id: ScreenId },

    #[error("area kind {kind:?} is not registered")]
    UnknownAreaKind { kind: String },

    #[error("invalid sizes for row {row_id}: {reason}")]
    InvalidSizes { row_id: NodeId, reason: String },

    #[error("placement {region:?} cannot be used to split")]
    InvalidPlacement { region: PlacementRegion },

    #[error("cannot place node {node_id} relative to itself")]
    SelfPlacement { node_id: NodeId },

    #[error("no area placement is in progress")]
    NoPendingPlacement,

    #[error("placement commit failed: {source}")]
    CommitFailed { source: Box<LayoutError> },
}

impl LayoutError {
    /// Classify this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::NodeNotFound { .. }
            | Self::DuplicateNode { .. }
            | Self::NotARow { .. }
            | Self::NotAnArea { .. }
            | Self::ChildIndexOutOfRange { .. }
            | Self::NoMergeNeighbor { .. }
            | Self::NotAChild { .. }
            | Self::TreeNotEmpty { .. }
            | Self::EmptyTree => ErrorCategory::Structural,
            Self::NoViewport { .. } | Self::NoTarget { .. } => ErrorCategory::Geometric,
            Self::RoleMismatch { .. }
            | Self::LastClassicScreen { .. }
            | Self::UnknownScreen { .. }
            | Self::UnknownAreaKind { .. }
            | Self::InvalidSizes { .. }
            | Self::InvalidPlacement { .. }
            | Self::SelfPlacement { .. }
            | Self::NoPendingPlacement => ErrorCategory::Policy,
            Self::CommitFailed { .. } => ErrorCategory::Transactional,
        }
    }

    pub(crate) fn commit_failed(source: LayoutError) -> Self {
        Self::CommitFailed {
            source: Box::new(source),
        }
    }
}

/// Standard result type for engine operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

#![forbid(unsafe_code)]

//! Tiling layout engine.
//!
//! # Role in Tessel
//! `tessel-layout` decides *where* areas are and how they relate: it keeps a
//! tree of rows and area leaves per screen, turns it into rectangles, and
//! resolves drag-and-drop placement into tree edits. It never renders and
//! never decides what an area shows.
//!
//! # Layers
//!
//! - [`tree`]: the arena-backed [`LayoutTree`] with invariant checks.
//! - [`ops`]: split, stack, join, simplify, resize, remove.
//! - [`viewport`]: rectangle per node for a container.
//! - [`placement`]: hovered target and drop-region queries.
//! - [`state`]: one screen's [`AreaState`] with atomic operations and an
//!   error log.
//! - [`finalize`]: the drag placement transaction.
//! - [`screen`]: the [`ScreenManager`] over many screens.
//!
//! # Example
//!
//! ```
//! use tessel_core::geometry::{Rect, Vec2};
//! use tessel_layout::{AreaDescriptor, ScreenManager};
//!
//! let mut screens = ScreenManager::default();
//! screens.set_container_rect(Rect::from_size(300.0, 200.0));
//!
//! // Drag a new console area to the bottom edge and drop it.
//! screens.set_area_to_open(Vec2::new(150.0, 190.0), Some(AreaDescriptor::new("console")));
//! assert!(screens.finalize_area_placement(None, None).is_committed());
//! assert_eq!(screens.all_areas().len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod finalize;
pub mod ops;
pub mod placement;
pub mod registry;
pub mod screen;
pub mod state;
pub mod tree;
pub mod viewport;

pub use config::{ConfigError, EngineConfig};
pub use error::{ErrorCategory, LayoutError, Result};
pub use finalize::{AreaDescriptor, AreaToOpen, PlacementCommit, PlacementOutcome};
pub use ops::{MergeDirection, SplitResult, SplitSizing};
pub use placement::{
    HoverKind, HoveredTarget, PlacementRegion, resolve_hovered_target, resolve_placement_region,
    resolve_placement_region_with,
};
pub use registry::{AreaTypeDescriptor, AreaTypeRegistry, StaticAreaTypeRegistry};
pub use screen::{Screen, ScreenId, ScreenManager};
pub use state::{AreaState, Corner, Direction, JoinOrMove, JoinPreview};
pub use tree::{
    Area, AreaRole, InvariantCode, InvariantIssue, InvariantReport, LayoutNode, LayoutTree,
    NodeId, Orientation, Row, RowChild,
};
pub use viewport::{ViewportMap, compute_viewports};

//! Screen management.
//!
//! A [`ScreenManager`] owns any number of independent screens, each with its
//! own [`AreaState`]. Classic screens share the host's main container;
//! detached screens live in their own window. At least one classic screen
//! always exists.
//!
//! Manager operations never return errors: a rejected operation is logged to
//! the current screen's error log and reported as `None`/`false`. Every
//! successful change bumps [`ScreenManager::revision`], once per operation or
//! once per [`ScreenManager::batch`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tessel_core::geometry::{Rect, Vec2};

use crate::config::EngineConfig;
use crate::error::{LayoutError, Result};
use crate::finalize::{AreaDescriptor, PlacementOutcome};
use crate::ops::SplitResult;
use crate::placement::PlacementRegion;
use crate::registry::AreaTypeRegistry;
use crate::state::{AreaState, Corner, Direction, JoinOrMove, JoinPreview};
use crate::tree::{Area, AreaRole, NodeId, Orientation};
use crate::viewport::ViewportMap;

/// Stable screen identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(u32);

impl ScreenId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One screen: an area state plus detachment bookkeeping.
#[derive(Debug, Clone)]
pub struct Screen {
    areas: AreaState,
    is_detached: bool,
    detached_from_area_id: Option<NodeId>,
}

impl Screen {
    #[must_use]
    pub fn areas(&self) -> &AreaState {
        &self.areas
    }

    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.is_detached
    }

    /// Area this screen was detached from, for detached screens.
    #[must_use]
    pub fn detached_from_area_id(&self) -> Option<&NodeId> {
        self.detached_from_area_id.as_ref()
    }
}

/// Collection of independent screens with one current screen.
#[derive(Debug, Clone)]
pub struct ScreenManager {
    screens: BTreeMap<ScreenId, Screen>,
    current: ScreenId,
    next_screen_id: u32,
    config: EngineConfig,
    registry: Option<Arc<dyn AreaTypeRegistry>>,
    container: Rect,
    revision: u64,
    batch_depth: u32,
    dirty: bool,
}

impl Default for ScreenManager {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ScreenManager {
    /// Manager with a single classic screen holding one default area.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::build(config, None)
    }

    /// Like [`Self::new`], with an area-type registry shared by all screens.
    #[must_use]
    pub fn with_registry(config: EngineConfig, registry: Arc<dyn AreaTypeRegistry>) -> Self {
        Self::build(config, Some(registry))
    }

    fn build(config: EngineConfig, registry: Option<Arc<dyn AreaTypeRegistry>>) -> Self {
        let first = ScreenId::new(1);
        let mut manager = Self {
            screens: BTreeMap::new(),
            current: first,
            next_screen_id: first.get(),
            config,
            registry,
            container: Rect::default(),
            revision: 0,
            batch_depth: 0,
            dirty: false,
        };
        let id = manager.allocate_screen_id();
        let areas = manager.seeded_state(id);
        let _ = manager.screens.insert(
            id,
            Screen {
                areas,
                is_detached: false,
                detached_from_area_id: None,
            },
        );
        manager
    }

    fn allocate_screen_id(&mut self) -> ScreenId {
        let id = ScreenId::new(self.next_screen_id);
        self.next_screen_id = self.next_screen_id.saturating_add(1);
        id
    }

    fn empty_state(&self, id: ScreenId) -> AreaState {
        let mut state = AreaState::with_namespace(format!("s{id}-"), self.config.clone());
        state.set_registry(self.registry.clone());
        state.set_container_rect(self.container);
        state
    }

    /// Fresh screen state with one area of the configured default kind.
    fn seeded_state(&self, id: ScreenId) -> AreaState {
        let mut state = self.empty_state(id);
        let kind = self.config.default_area_kind.clone();
        let defaults = self.registry.as_ref().and_then(|registry| registry.lookup(&kind));
        let area_id = state.allocate_area_id();
        let area = Area {
            id: area_id,
            kind,
            role: defaults.as_ref().map_or(AreaRole::default(), |d| d.default_role),
            state: defaults.map_or(serde_json::Value::Null, |d| d.default_state),
        };
        if let Err(err) = state.insert_root_area(area) {
            state.record_error("add_screen", &err);
        }
        state
    }

    fn touch(&mut self) {
        if self.batch_depth > 0 {
            self.dirty = true;
        } else {
            self.revision = self.revision.wrapping_add(1);
        }
    }

    /// Log a rejected manager-level operation on the current screen.
    fn reject(&mut self, op: &'static str, err: LayoutError) {
        tracing::warn!(
            target: "tessel.screen",
            op,
            screen_id = %self.current,
            error = %err,
            "screen operation rejected"
        );
        if let Some(screen) = self.screens.get_mut(&self.current) {
            screen.areas.push_error(op, &err);
        }
    }

    /// Run an area-state operation on the current screen.
    fn apply<T>(&mut self, f: impl FnOnce(&mut AreaState) -> Result<T>) -> Option<T> {
        let screen = self.screens.get_mut(&self.current)?;
        let out = f(&mut screen.areas).ok()?;
        self.touch();
        Some(out)
    }

    /// Group several operations: viewports are recomputed and the revision
    /// advances once, when the outermost batch ends.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut ScreenManager) -> R) -> R {
        if self.batch_depth == 0 {
            for screen in self.screens.values_mut() {
                screen.areas.begin_deferred();
            }
        }
        self.batch_depth += 1;
        let out = f(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            for screen in self.screens.values_mut() {
                screen.areas.end_deferred();
            }
            if self.dirty {
                self.dirty = false;
                self.revision = self.revision.wrapping_add(1);
            }
        }
        out
    }

    // ----- queries -----

    /// Monotonic change counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn current_screen_id(&self) -> ScreenId {
        self.current
    }

    #[must_use]
    pub fn current(&self) -> Option<&Screen> {
        self.screens.get(&self.current)
    }

    #[must_use]
    pub fn screen(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.get(&id)
    }

    /// Screen ids in ascending order.
    #[must_use]
    pub fn screen_ids(&self) -> Vec<ScreenId> {
        self.screens.keys().copied().collect()
    }

    #[must_use]
    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    #[must_use]
    pub fn classic_screen_count(&self) -> usize {
        self.screens.values().filter(|s| !s.is_detached).count()
    }

    fn current_areas(&self) -> Option<&AreaState> {
        self.current().map(Screen::areas)
    }

    #[must_use]
    pub fn area_by_id(&self, id: &str) -> Option<&Area> {
        self.current_areas()?.area_by_id(id)
    }

    #[must_use]
    pub fn all_areas(&self) -> Vec<&Area> {
        self.current_areas().map(AreaState::all_areas).unwrap_or_default()
    }

    #[must_use]
    pub fn active_area(&self) -> Option<&Area> {
        self.current_areas()?.active_area()
    }

    #[must_use]
    pub fn area_errors(&self) -> &[String] {
        self.current_areas().map_or(&[][..], AreaState::area_errors)
    }

    #[must_use]
    pub fn last_split_result(&self) -> Option<&SplitResult> {
        self.current_areas()?.last_split_result()
    }

    #[must_use]
    pub fn viewports(&self) -> Option<&ViewportMap> {
        self.current_areas().map(AreaState::viewports)
    }

    // ----- screen lifecycle -----

    /// Resize the main container; every classic screen follows.
    pub fn set_container_rect(&mut self, rect: Rect) {
        self.container = rect;
        for screen in self.screens.values_mut().filter(|s| !s.is_detached) {
            screen.areas.set_container_rect(rect);
        }
        self.touch();
    }

    /// Resize one screen's container (detached windows).
    pub fn set_screen_container_rect(&mut self, id: ScreenId, rect: Rect) -> bool {
        match self.screens.get_mut(&id) {
            Some(screen) => {
                screen.areas.set_container_rect(rect);
                self.touch();
                true
            }
            None => {
                self.reject("set_screen_container_rect", LayoutError::UnknownScreen { screen_id: id });
                false
            }
        }
    }

    /// Add a classic screen with one default area and make it current.
    pub fn add_screen(&mut self) -> ScreenId {
        let id = self.allocate_screen_id();
        let areas = self.seeded_state(id);
        let _ = self.screens.insert(
            id,
            Screen {
                areas,
                is_detached: false,
                detached_from_area_id: None,
            },
        );
        self.current = id;
        self.touch();
        tracing::debug!(target: "tessel.screen", screen_id = %id, "added screen");
        id
    }

    /// Make `id` the current screen, dropping the old screen's temporary
    /// drag state.
    pub fn switch_screen(&mut self, id: ScreenId) -> bool {
        if !self.screens.contains_key(&id) {
            self.reject("switch_screen", LayoutError::UnknownScreen { screen_id: id });
            return false;
        }
        if id != self.current {
            if let Some(screen) = self.screens.get_mut(&self.current) {
                screen.areas.cleanup_temporary_states();
            }
            self.current = id;
            self.touch();
            tracing::debug!(target: "tessel.screen", screen_id = %id, "switched screen");
        }
        true
    }

    /// Remove a screen and all of its areas.
    ///
    /// The last classic screen cannot be removed. Removing the current screen
    /// switches to the lowest remaining classic screen.
    pub fn remove_screen(&mut self, id: ScreenId) -> bool {
        let Some(screen) = self.screens.get(&id) else {
            self.reject("remove_screen", LayoutError::UnknownScreen { screen_id: id });
            return false;
        };
        if !screen.is_detached && self.classic_screen_count() <= 1 {
            self.reject("remove_screen", LayoutError::LastClassicScreen { screen_id: id });
            return false;
        }
        let _ = self.screens.remove(&id);
        if id == self.current {
            if let Some(fallback) = self
                .screens
                .iter()
                .find(|(_, s)| !s.is_detached)
                .map(|(id, _)| *id)
            {
                self.current = fallback;
            }
        }
        self.touch();
        tracing::debug!(
            target: "tessel.screen",
            screen_id = %id,
            current = %self.current,
            "removed screen"
        );
        true
    }

    /// Deep-copy a screen under a new id and make the copy current.
    ///
    /// The copy gets fresh node ids so the two screens share nothing.
    /// Detachment is preserved; temporary state and errors are not.
    pub fn duplicate_screen(&mut self, id: ScreenId) -> Option<ScreenId> {
        let Some(source) = self.screens.get(&id) else {
            self.reject("duplicate_screen", LayoutError::UnknownScreen { screen_id: id });
            return None;
        };
        let copy_id = ScreenId::new(self.next_screen_id);
        let copy = Screen {
            areas: source.areas.rekeyed(format!("s{copy_id}-")),
            is_detached: source.is_detached,
            detached_from_area_id: source.detached_from_area_id.clone(),
        };
        let _ = self.allocate_screen_id();
        let _ = self.screens.insert(copy_id, copy);
        self.current = copy_id;
        self.touch();
        tracing::debug!(
            target: "tessel.screen",
            source = %id,
            screen_id = %copy_id,
            "duplicated screen"
        );
        Some(copy_id)
    }

    /// Move an area from the current screen into a new detached screen.
    ///
    /// The area keeps its id and content. The current screen stays current.
    pub fn detach_area(&mut self, area_id: &str) -> Option<ScreenId> {
        let screen = self.screens.get_mut(&self.current)?;
        let area = screen.areas.remove_area(area_id).ok()?;
        let id = self.allocate_screen_id();
        let mut areas = self.empty_state(id);
        if let Err(err) = areas.insert_root_area(area) {
            self.reject("detach_area", err);
            return None;
        }
        let _ = self.screens.insert(
            id,
            Screen {
                areas,
                is_detached: true,
                detached_from_area_id: Some(NodeId::new(area_id)),
            },
        );
        self.touch();
        tracing::debug!(
            target: "tessel.screen",
            area_id,
            screen_id = %id,
            from = %self.current,
            "detached area"
        );
        Some(id)
    }

    // ----- current-screen operations -----

    pub fn split_area(
        &mut self,
        target: &str,
        orientation: Orientation,
        corner: Corner,
    ) -> Option<SplitResult> {
        self.apply(|state| state.split_area(target, orientation, corner))
    }

    pub fn join_or_move_area(
        &mut self,
        source: &str,
        target: &str,
        direction: Direction,
    ) -> Option<JoinOrMove> {
        self.apply(|state| state.join_or_move_area(source, target, direction))
    }

    pub fn set_row_sizes(&mut self, row_id: &str, sizes: &[f64]) -> bool {
        self.apply(|state| state.set_row_sizes(row_id, sizes)).is_some()
    }

    pub fn set_area_to_open(&mut self, position: Vec2, area: Option<AreaDescriptor>) {
        let _ = self.apply(|state| {
            state.set_area_to_open(position, area);
            Ok(())
        });
    }

    pub fn update_area_to_open_position(&mut self, position: Vec2) -> bool {
        self.apply(|state| {
            if state.update_area_to_open_position(position) {
                Ok(())
            } else {
                Err(LayoutError::NoPendingPlacement)
            }
        })
        .is_some()
    }

    pub fn finalize_area_placement(
        &mut self,
        target: Option<&str>,
        placement: Option<PlacementRegion>,
    ) -> PlacementOutcome {
        let Some(screen) = self.screens.get_mut(&self.current) else {
            return PlacementOutcome::Idle;
        };
        let outcome = screen.areas.finalize_area_placement(target, placement);
        if outcome != PlacementOutcome::Idle {
            self.touch();
        }
        outcome
    }

    pub fn cleanup_temporary_states(&mut self) {
        let _ = self.apply(|state| {
            state.cleanup_temporary_states();
            Ok(())
        });
    }

    pub fn set_active_area(&mut self, id: &str) -> bool {
        self.apply(|state| state.set_active_area(id)).is_some()
    }

    pub fn set_active_tab(&mut self, stack_id: &str, tab_id: &str) -> bool {
        self.apply(|state| state.set_active_tab(stack_id, tab_id)).is_some()
    }

    /// Close an area on the current screen.
    pub fn close_area(&mut self, id: &str) -> bool {
        self.apply(|state| state.close_area(id)).is_some()
    }

    pub fn set_join_preview(&mut self, preview: Option<JoinPreview>) -> bool {
        self.apply(|state| state.set_join_preview(preview)).is_some()
    }

    pub fn update_area_state(&mut self, id: &str, value: serde_json::Value) -> bool {
        self.apply(|state| state.update_area_state(id, value)).is_some()
    }

    pub fn set_area_role(&mut self, id: &str, role: AreaRole) -> bool {
        self.apply(|state| state.set_area_role(id, role)).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ScreenManager {
        let mut manager = ScreenManager::default();
        manager.set_container_rect(Rect::from_size(300.0, 200.0));
        manager
    }

    fn first_area(manager: &ScreenManager) -> NodeId {
        manager.all_areas()[0].id.clone()
    }

    #[test]
    fn starts_with_one_seeded_screen() {
        let manager = manager();
        assert_eq!(manager.screen_ids(), vec![ScreenId::new(1)]);
        assert_eq!(manager.classic_screen_count(), 1);
        let areas = manager.all_areas();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].kind, "empty");
        assert!(areas[0].id.starts_with("s1-"));
        assert_eq!(manager.active_area().map(|a| &a.id), Some(&areas[0].id));
    }

    #[test]
    fn add_and_switch_screens() {
        let mut manager = manager();
        let second = manager.add_screen();
        assert_eq!(second, ScreenId::new(2));
        assert_eq!(manager.current_screen_id(), second);
        assert!(first_area(&manager).starts_with("s2-"));
        assert!(manager.switch_screen(ScreenId::new(1)));
        assert_eq!(manager.current_screen_id(), ScreenId::new(1));
        assert!(!manager.switch_screen(ScreenId::new(9)));
        assert_eq!(manager.area_errors().len(), 1);
    }

    #[test]
    fn last_classic_screen_cannot_be_removed() {
        let mut manager = manager();
        let revision = manager.revision();
        assert!(!manager.remove_screen(ScreenId::new(1)));
        assert_eq!(manager.screen_count(), 1);
        assert_eq!(manager.revision(), revision);
        assert!(manager.area_errors()[0].contains("at least one classic screen"));
    }

    #[test]
    fn removing_current_switches_to_lowest_classic() {
        let mut manager = manager();
        let _ = manager.add_screen();
        let third = manager.add_screen();
        assert!(manager.remove_screen(third));
        assert_eq!(manager.current_screen_id(), ScreenId::new(1));
        assert_eq!(manager.screen_ids(), vec![ScreenId::new(1), ScreenId::new(2)]);
    }

    #[test]
    fn duplicate_screen_shares_no_ids() {
        let mut manager = manager();
        let original = first_area(&manager);
        let _ = manager
            .split_area(&original, Orientation::Horizontal, Corner::TopRight)
            .expect("split");
        let copy = manager.duplicate_screen(ScreenId::new(1)).expect("duplicate");
        assert_eq!(manager.current_screen_id(), copy);
        let copied: Vec<_> = manager.all_areas().iter().map(|a| a.id.clone()).collect();
        assert_eq!(copied.len(), 2);
        let source = manager.screen(ScreenId::new(1)).expect("source");
        for id in &copied {
            assert!(source.areas().area_by_id(id).is_none());
            assert!(id.starts_with("s2-"));
        }
    }

    #[test]
    fn detach_area_creates_detached_screen() {
        let mut manager = manager();
        let original = first_area(&manager);
        let split = manager
            .split_area(&original, Orientation::Vertical, Corner::BottomLeft)
            .expect("split");
        let detached = manager.detach_area(&split.new_area_id).expect("detach");
        assert_eq!(manager.current_screen_id(), ScreenId::new(1));
        assert_eq!(manager.all_areas().len(), 1);

        let screen = manager.screen(detached).expect("detached screen");
        assert!(screen.is_detached());
        assert_eq!(screen.detached_from_area_id(), Some(&split.new_area_id));
        assert!(screen.areas().area_by_id(&split.new_area_id).is_some());
        assert_eq!(manager.classic_screen_count(), 1);

        // Detached screens do not count toward the classic minimum.
        assert!(manager.remove_screen(detached));
        assert!(!manager.remove_screen(ScreenId::new(1)));
    }

    #[test]
    fn rejected_operations_do_not_bump_revision() {
        let mut manager = manager();
        let revision = manager.revision();
        assert!(manager
            .split_area("missing", Orientation::Horizontal, Corner::TopLeft)
            .is_none());
        assert_eq!(manager.revision(), revision);
        assert_eq!(manager.area_errors().len(), 1);
    }

    #[test]
    fn batch_bumps_revision_once() {
        let mut manager = manager();
        let start = manager.revision();
        let area = first_area(&manager);
        manager.batch(|m| {
            let split = m
                .split_area(&area, Orientation::Horizontal, Corner::TopRight)
                .expect("split");
            let _ = m.split_area(&split.new_area_id, Orientation::Vertical, Corner::BottomLeft);
            let _ = m.add_screen();
        });
        assert_eq!(manager.revision(), start + 1);
        assert!(manager.switch_screen(ScreenId::new(1)));
        let viewports = manager.viewports().expect("viewports");
        assert_eq!(viewports.len(), manager.current().expect("screen").areas().tree().len());
    }

    #[test]
    fn placement_through_manager() {
        let mut manager = manager();
        manager.set_area_to_open(Vec2::new(5.0, 100.0), Some(AreaDescriptor::new("console")));
        let outcome = manager.finalize_area_placement(None, None);
        assert!(outcome.is_committed());
        let order: Vec<_> = manager.all_areas().iter().map(|a| a.kind.clone()).collect();
        assert_eq!(order, vec!["console", "empty"]);
    }
}

//! Structured logging emitted by the engine.

use std::sync::{Arc, Mutex};

use tessel_core::geometry::{Rect, Vec2};
use tessel_layout::{
    Area, AreaDescriptor, AreaState, LayoutTree, NodeId, PlacementRegion, ScreenManager,
};
use tracing::{Level, Subscriber};
use tracing_subscriber::Registry;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone, PartialEq)]
struct Captured {
    target: String,
    level: Level,
    message: String,
}

#[derive(Debug, Default)]
struct CaptureState {
    events: Vec<Captured>,
    spans: Vec<String>,
}

struct Capture {
    state: Arc<Mutex<CaptureState>>,
}

impl<S> Layer<S> for Capture
where
    S: Subscriber + for<'l> LookupSpan<'l>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: Context<'_, S>,
    ) {
        self.state
            .lock()
            .expect("capture lock")
            .spans
            .push(attrs.metadata().name().to_owned());
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct Msg {
            message: Option<String>,
        }
        impl tracing::field::Visit for Msg {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = Some(value.to_string());
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                }
            }
        }
        let mut msg = Msg { message: None };
        event.record(&mut msg);
        let metadata = event.metadata();
        self.state.lock().expect("capture lock").events.push(Captured {
            target: metadata.target().to_owned(),
            level: *metadata.level(),
            message: msg.message.unwrap_or_default(),
        });
    }
}

fn capture<R>(f: impl FnOnce() -> R) -> (R, Arc<Mutex<CaptureState>>) {
    let state = Arc::new(Mutex::new(CaptureState::default()));
    let subscriber = Registry::default().with(Capture {
        state: Arc::clone(&state),
    });
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, state)
}

fn saw(state: &Arc<Mutex<CaptureState>>, target: &str, level: Level, message: &str) -> bool {
    state
        .lock()
        .expect("capture lock")
        .events
        .iter()
        .any(|e| e.target == target && e.level == level && e.message == message)
}

#[test]
fn removing_last_classic_screen_warns() {
    let mut screens = ScreenManager::default();
    let only = screens.current_screen_id();
    let (removed, state) = capture(|| screens.remove_screen(only));
    assert!(!removed);
    assert!(saw(&state, "tessel.screen", Level::WARN, "screen operation rejected"));
}

#[test]
fn rejected_area_operation_warns_on_tree_target() {
    let mut areas = AreaState::default();
    let (result, state) = capture(|| areas.close_area("missing"));
    assert!(result.is_err());
    assert!(saw(&state, "tessel.tree", Level::WARN, "operation rejected"));
    assert_eq!(areas.area_errors().len(), 1);
}

#[test]
fn committed_placement_runs_inside_finalize_span() {
    let mut areas = AreaState::default();
    areas.set_container_rect(Rect::from_size(300.0, 200.0));
    areas.insert_root_area(Area::new("a", "editor")).expect("seed");
    areas.set_area_to_open(Vec2::new(10.0, 100.0), Some(AreaDescriptor::new("console")));

    let (outcome, state) = capture(|| areas.finalize_area_placement(None, None));
    assert!(outcome.is_committed());
    assert!(
        state
            .lock()
            .expect("capture lock")
            .spans
            .iter()
            .any(|name| name == "finalize_area_placement"),
        "expected finalize span"
    );
    assert!(saw(&state, "tessel.finalize", Level::DEBUG, "placement committed"));
}

#[test]
fn aborted_placement_warns() {
    let mut areas = AreaState::default();
    areas.set_container_rect(Rect::from_size(300.0, 200.0));
    areas.insert_root_area(Area::new("a", "editor")).expect("seed");
    areas.set_area_to_open(Vec2::new(10.0, 100.0), Some(AreaDescriptor::new("console")));

    let (outcome, state) = capture(|| areas.finalize_area_placement(Some("ghost"), None));
    assert!(!outcome.is_committed());
    assert!(saw(&state, "tessel.finalize", Level::WARN, "placement aborted"));
    assert_eq!(areas.area_errors().len(), 1);
}

#[test]
fn tree_ops_log_under_ops_target() {
    let mut tree = LayoutTree::singleton("a");
    let (result, state) =
        capture(|| tree.split("a", PlacementRegion::Right, NodeId::new("b")));
    assert!(result.is_ok());
    assert!(saw(&state, "tessel.ops", Level::DEBUG, "split"));
}

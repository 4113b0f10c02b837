//! Structured log output of a session.

mod common;

use common::{down, pointer_move, sorter, up};
use reorder::reorder_core::target::ElementId;
use reorder::{TransitionProperty, TransitionTarget};
use tracing_test::traced_test;
use web_time::Instant;

#[test]
#[traced_test]
fn session_lifecycle_is_logged() {
    let mut sorter = sorter(5);
    let now = Instant::now();
    sorter.handle_event(&down(10.0, 40.0, 1), now).unwrap();
    sorter.handle_event(&pointer_move(10.0, 85.0), now).unwrap();
    sorter.handle_event(&up(10.0, 85.0), now).unwrap();
    sorter
        .transition_end(TransitionTarget::Proxy, TransitionProperty::Transform, now)
        .unwrap();

    assert!(logs_contain("sort.lift"));
    assert!(logs_contain("backend=\"pointer\""));
    assert!(logs_contain("sort.over"));
    assert!(logs_contain("sort.drop"));
    assert!(logs_contain("sort.end"));
}

#[test]
#[traced_test]
fn missing_geometry_warns() {
    let mut sorter = sorter(3);
    sorter.host_mut().rects.remove(&ElementId(2));
    sorter
        .handle_event(&down(10.0, 5.0, 0), Instant::now())
        .unwrap();
    assert!(logs_contain("sort.geometry_missing"));
    assert!(logs_contain("WARN"));
}

#[test]
#[traced_test]
fn pending_press_abort_is_logged() {
    use reorder::testing::{MockHost, RecordingListener};
    use reorder::{PressDelay, SortConfig};
    use std::time::Duration;

    let config = SortConfig::default().with_press_delay(PressDelay::new(Duration::from_millis(200), 5.0));
    let mut sorter = common::sorter_with(
        config,
        MockHost::vertical_list(3, 100.0, 40.0),
        RecordingListener::default(),
    );
    let now = Instant::now();
    sorter.handle_event(&down(10.0, 5.0, 0), now).unwrap();
    sorter.handle_event(&pointer_move(10.0, 30.0), now).unwrap();
    assert!(logs_contain("sort.backend.press"));
    assert!(logs_contain("sort.backend.abort"));
}

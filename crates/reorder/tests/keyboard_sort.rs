//! Keyboard (snap) sessions.

mod common;

use common::{ITEM_HEIGHT, down, key, key_repeat, pointer_move, sorter, sorter_with, wheel};
use reorder::reorder_core::event::{InputEvent, KeyCode, KeyEvent, Modifiers};
use reorder::reorder_core::geometry::{Point, Size, Vec2};
use reorder::reorder_core::target::{ElementId, EventTarget};
use reorder::testing::{MockHost, Recorded, RecordingListener};
use reorder::{Effect, KeyBindings, Motion, Phase, SortConfig, SortEvent};
use web_time::Instant;

fn snap(from: usize, to: usize) -> SortEvent {
    SortEvent::new(from, to, Motion::Snap)
}

#[test]
fn keyboard_moves_item_down_one_slot() {
    let mut sorter = sorter(5);
    let now = Instant::now();

    let outcome = sorter.handle_event(&key(KeyCode::Space, 2), now).unwrap();
    assert!(outcome.consumed && outcome.prevent_default);
    assert_eq!(sorter.phase(), Phase::Dragging);

    sorter.handle_event(&key(KeyCode::Down, 2), now).unwrap();
    sorter.handle_event(&key(KeyCode::Space, 2), now).unwrap();
    assert_eq!(sorter.phase(), Phase::Idle);

    assert_eq!(
        sorter.listener().lifecycle(),
        vec![
            Recorded::Start(snap(2, 2)),
            Recorded::Over(snap(2, 3)),
            Recorded::End(snap(2, 3)),
        ]
    );
}

#[test]
fn snap_places_proxy_in_target_slot() {
    let mut sorter = sorter(5);
    let now = Instant::now();
    sorter.handle_event(&key(KeyCode::Space, 2), now).unwrap();
    let mounted = sorter.host_mut().take_effects();
    assert!(matches!(
        mounted[0],
        Effect::MountProxy {
            source: ElementId(2),
            focus: true,
            ..
        }
    ));

    sorter.handle_event(&key(KeyCode::Down, 2), now).unwrap();
    let keyboard = sorter.config().keyboard_transition;
    let effects = sorter.host_mut().take_effects();
    assert!(effects.contains(&Effect::TranslateItem {
        element: ElementId(3),
        translate: Vec2::new(0.0, -ITEM_HEIGHT),
        transition: Some(sorter.config().out_of_the_way_animation),
    }));
    assert_eq!(
        effects.last(),
        Some(&Effect::MoveProxy {
            position: Point::new(0.0, 120.0),
            transition: Some(keyboard),
        })
    );

    sorter.handle_event(&key(KeyCode::Up, 2), now).unwrap();
    sorter.handle_event(&key(KeyCode::Up, 2), now).unwrap();
    assert_eq!(sorter.engine().session_indices(), Some((2, 1)));
    assert_eq!(sorter.engine().proxy_position(), Some(Point::new(0.0, 40.0)));
}

#[test]
fn drop_restores_focus_to_source() {
    let mut sorter = sorter(3);
    let now = Instant::now();
    sorter.handle_event(&key(KeyCode::Space, 1), now).unwrap();
    sorter.handle_event(&key(KeyCode::Space, 1), now).unwrap();
    let effects = sorter.host_mut().take_effects();
    assert_eq!(
        effects.last(),
        Some(&Effect::Focus {
            element: ElementId(1)
        })
    );
}

#[test]
fn snapping_past_the_ends_is_ignored() {
    let mut sorter = sorter(3);
    let now = Instant::now();
    sorter.handle_event(&key(KeyCode::Space, 2), now).unwrap();
    sorter.handle_event(&key(KeyCode::Down, 2), now).unwrap();
    sorter.handle_event(&key(KeyCode::Right, 2), now).unwrap();
    assert_eq!(sorter.engine().session_indices(), Some((2, 2)));

    sorter.handle_event(&key(KeyCode::Up, 2), now).unwrap();
    sorter.handle_event(&key(KeyCode::Left, 2), now).unwrap();
    sorter.handle_event(&key(KeyCode::Up, 2), now).unwrap();
    assert_eq!(sorter.engine().session_indices(), Some((2, 0)));
    assert_eq!(
        sorter.listener().lifecycle(),
        vec![
            Recorded::Start(snap(2, 2)),
            Recorded::Over(snap(2, 1)),
            Recorded::Over(snap(2, 0)),
        ]
    );
}

#[test]
fn escape_steps_back_then_drops() {
    let mut sorter = sorter(5);
    let now = Instant::now();
    sorter.handle_event(&key(KeyCode::Space, 1), now).unwrap();
    sorter.handle_event(&key(KeyCode::Down, 1), now).unwrap();
    sorter.handle_event(&key(KeyCode::Down, 1), now).unwrap();
    sorter.handle_event(&key(KeyCode::Escape, 1), now).unwrap();

    assert_eq!(sorter.phase(), Phase::Idle);
    assert_eq!(
        sorter.listener().lifecycle(),
        vec![
            Recorded::Start(snap(1, 1)),
            Recorded::Over(snap(1, 2)),
            Recorded::Over(snap(1, 3)),
            Recorded::Over(snap(1, 1)),
            Recorded::End(snap(1, 1)),
        ]
    );
}

#[test]
fn escape_without_moving_just_ends() {
    let mut sorter = sorter(3);
    let now = Instant::now();
    sorter.handle_event(&key(KeyCode::Space, 0), now).unwrap();
    sorter.handle_event(&key(KeyCode::Escape, 0), now).unwrap();
    assert_eq!(
        sorter.listener().lifecycle(),
        vec![Recorded::Start(snap(0, 0)), Recorded::End(snap(0, 0))]
    );
}

#[test]
fn held_lift_key_does_not_drop() {
    let mut sorter = sorter(3);
    let now = Instant::now();
    sorter.handle_event(&key(KeyCode::Space, 0), now).unwrap();
    sorter.handle_event(&key_repeat(KeyCode::Space, 0), now).unwrap();
    assert_eq!(sorter.phase(), Phase::Dragging);

    // Arrow auto-repeat keeps stepping.
    sorter.handle_event(&key_repeat(KeyCode::Down, 0), now).unwrap();
    assert_eq!(sorter.engine().session_indices(), Some((0, 1)));
}

#[test]
fn idle_keys_other_than_lift_pass_through() {
    let mut sorter = sorter(3);
    let outcome = sorter
        .handle_event(&key(KeyCode::Down, 0), Instant::now())
        .unwrap();
    assert!(!outcome.consumed);
    assert_eq!(sorter.phase(), Phase::Idle);
}

#[test]
fn modified_lift_key_is_left_to_the_host() {
    let mut sorter = sorter(3);
    let now = Instant::now();
    let ctrl_space = InputEvent::Key(
        KeyEvent::new(KeyCode::Space)
            .with_modifiers(Modifiers::CTRL)
            .with_target(EventTarget::element(ElementId(0))),
    );
    let outcome = sorter.handle_event(&ctrl_space, now).unwrap();
    assert!(!outcome.consumed);
    assert_eq!(sorter.phase(), Phase::Idle);

    let shift_space = InputEvent::Key(
        KeyEvent::new(KeyCode::Space)
            .with_modifiers(Modifiers::SHIFT)
            .with_target(EventTarget::element(ElementId(0))),
    );
    sorter.handle_event(&shift_space, now).unwrap();
    assert_eq!(sorter.phase(), Phase::Dragging);
}

#[test]
fn custom_bindings() {
    let bindings = KeyBindings {
        lift: vec![KeyCode::Enter],
        drop: vec![KeyCode::Enter],
        ..KeyBindings::default()
    };
    let mut sorter = sorter_with(
        SortConfig::default().with_key_bindings(bindings),
        MockHost::vertical_list(3, 100.0, ITEM_HEIGHT),
        RecordingListener::default(),
    );
    let now = Instant::now();
    sorter.handle_event(&key(KeyCode::Space, 0), now).unwrap();
    assert_eq!(sorter.phase(), Phase::Idle);
    sorter.handle_event(&key(KeyCode::Enter, 0), now).unwrap();
    assert_eq!(sorter.phase(), Phase::Dragging);
    sorter.handle_event(&key(KeyCode::Space, 0), now).unwrap();
    assert_eq!(sorter.phase(), Phase::Dragging);
    sorter.handle_event(&key(KeyCode::Enter, 0), now).unwrap();
    assert_eq!(sorter.phase(), Phase::Idle);
}

#[test]
fn handles_are_not_required_for_keyboard() {
    let mut sorter = sorter_with(
        SortConfig::default().with_handle(true),
        MockHost::vertical_list(3, 100.0, ITEM_HEIGHT),
        RecordingListener::default(),
    );
    let now = Instant::now();
    sorter.handle_event(&down(10.0, 5.0, 0), now).unwrap();
    assert_eq!(sorter.phase(), Phase::Idle);
    sorter.handle_event(&key(KeyCode::Space, 0), now).unwrap();
    assert_eq!(sorter.phase(), Phase::Dragging);
}

#[test]
fn pointer_press_drops_keyboard_session() {
    let mut sorter = sorter(5);
    let now = Instant::now();
    sorter.handle_event(&key(KeyCode::Space, 2), now).unwrap();
    sorter.handle_event(&key(KeyCode::Down, 2), now).unwrap();
    sorter.handle_event(&down(10.0, 5.0, 0), now).unwrap();

    assert_eq!(sorter.phase(), Phase::Idle);
    assert_eq!(sorter.listener().ends(), vec![snap(2, 3)]);
    assert_eq!(sorter.listener().lifecycle().len(), 3);
}

#[test]
fn wheel_drops_keyboard_session() {
    let mut sorter = sorter(5);
    let now = Instant::now();
    sorter.handle_event(&key(KeyCode::Space, 2), now).unwrap();
    sorter.handle_event(&key(KeyCode::Up, 2), now).unwrap();
    let outcome = sorter.handle_event(&wheel(30.0), now).unwrap();
    assert!(!outcome.prevent_default);
    assert_eq!(sorter.listener().ends(), vec![snap(2, 1)]);
}

#[test]
fn escape_cancels_pointer_session() {
    let mut sorter = sorter(5);
    let now = Instant::now();
    sorter.handle_event(&down(10.0, 40.0, 1), now).unwrap();
    sorter.handle_event(&pointer_move(10.0, 85.0), now).unwrap();
    sorter.handle_event(&key(KeyCode::Escape, 1), now).unwrap();

    assert_eq!(sorter.phase(), Phase::Idle);
    assert_eq!(
        sorter.listener().ends(),
        vec![SortEvent::new(1, 1, Motion::Fluid)]
    );
}

#[test]
fn arrows_do_not_steer_pointer_sessions() {
    let mut sorter = sorter(5);
    let now = Instant::now();
    sorter.handle_event(&down(10.0, 40.0, 1), now).unwrap();
    let outcome = sorter.handle_event(&key(KeyCode::Down, 1), now).unwrap();
    assert!(!outcome.consumed);
    assert_eq!(sorter.engine().session_indices(), Some((1, 1)));
}

#[test]
fn snapping_out_of_view_scrolls_container() {
    let host = MockHost::vertical_list(10, 100.0, ITEM_HEIGHT).with_viewport(Size::new(100.0, 200.0));
    let mut sorter = sorter_with(SortConfig::default(), host, RecordingListener::default());
    let now = Instant::now();

    sorter.handle_event(&key(KeyCode::Space, 4), now).unwrap();
    sorter.handle_event(&key(KeyCode::Down, 4), now).unwrap();
    assert_eq!(sorter.host().scroll.offset, Vec2::new(0.0, ITEM_HEIGHT));
    assert_eq!(sorter.engine().proxy_position(), Some(Point::new(0.0, 160.0)));

    sorter.handle_event(&key(KeyCode::Down, 4), now).unwrap();
    assert_eq!(sorter.host().scroll.offset, Vec2::new(0.0, 2.0 * ITEM_HEIGHT));
    assert_eq!(sorter.engine().session_indices(), Some((4, 6)));
}

#![forbid(unsafe_code)]

//! Sorter configuration.
//!
//! [`SortConfig`] is plain data: every tunable of a drag surface in one
//! struct that can be built in code or, with the `serde` feature, loaded from
//! JSON. Behaviour hooks (the can-sort predicate and the before-start hook)
//! are not data and are installed on the [`Sorter`](crate::sorter::Sorter)
//! instead.
//!
//! ```rust,ignore
//! let config = SortConfig::default()
//!     .with_axis(Axis::X)
//!     .with_press_delay(PressDelay::new(Duration::from_millis(150), 5.0));
//! let config = SortConfig::from_json_str(r#"{ "axis": "xy" }"#)?;
//! ```
//!
//! # Defaults
//!
//! | Field | Default |
//! |-------|---------|
//! | `axis` | `y` |
//! | `press_delay` | 0 ms, 5 px threshold |
//! | `move_delay` | 0 px |
//! | `drop_animation` | 200 ms `cubic-bezier(.2,1,.1,1)` |
//! | `out_of_the_way_animation` | 200 ms `cubic-bezier(0.2,0,0,1)` |
//! | `keyboard_transition` | 250 ms `ease` |
//! | `drop_timeout_grace` | 100 ms |
//! | `hide_ghost` | `true` |
//!
//! # Failure Modes
//!
//! [`SortConfig::validate`] rejects a press delay combined with a move delay,
//! negative or non-finite distances, and cubic-bezier curves whose x control
//! points leave `[0, 1]`.

use std::time::Duration;

use reorder_core::easing::{Easing, Transition};
use reorder_core::event::KeyCode;
use reorder_core::geometry::Axis;
use reorder_core::target::ElementId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// PressDelay
// ---------------------------------------------------------------------------

/// Hold-before-lift settings for pointer and touch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PressDelay {
    /// How long the press must be held before the item lifts.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "time_ms", with = "reorder_core::easing::duration_ms")
    )]
    pub time: Duration,
    /// Movement (px) during the hold that aborts the press.
    pub distance_threshold: f32,
}

impl PressDelay {
    #[must_use]
    pub const fn new(time: Duration, distance_threshold: f32) -> Self {
        Self {
            time,
            distance_threshold,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.time.is_zero()
    }
}

impl Default for PressDelay {
    fn default() -> Self {
        Self {
            time: Duration::ZERO,
            distance_threshold: 5.0,
        }
    }
}

// ---------------------------------------------------------------------------
// HelperContainer / KeyBindings
// ---------------------------------------------------------------------------

/// Where the host mounts the drag proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HelperContainer {
    /// The document body (or the host's top-level layer).
    #[default]
    Body,
    /// A specific host element.
    Element(ElementId),
}

/// Keys understood by the keyboard backend.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeyBindings {
    pub lift: Vec<KeyCode>,
    pub drop: Vec<KeyCode>,
    pub cancel: Vec<KeyCode>,
    pub up: Vec<KeyCode>,
    pub down: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            lift: vec![KeyCode::Space],
            drop: vec![KeyCode::Space],
            cancel: vec![KeyCode::Escape],
            up: vec![KeyCode::Up, KeyCode::Left],
            down: vec![KeyCode::Down, KeyCode::Right],
        }
    }
}

/// What a key means to the keyboard backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Lift,
    Drop,
    Cancel,
    Up,
    Down,
}

impl KeyBindings {
    /// Resolve `code` while idle (`sorting == false`) or mid-sort.
    ///
    /// Lift keys only lift while idle; mid-sort a lift key drops, so the
    /// default `Space`/`Space` binding toggles.
    #[must_use]
    pub fn action(&self, code: KeyCode, sorting: bool) -> Option<KeyAction> {
        if !sorting {
            return self.lift.contains(&code).then_some(KeyAction::Lift);
        }
        if self.drop.contains(&code) || self.lift.contains(&code) {
            Some(KeyAction::Drop)
        } else if self.cancel.contains(&code) {
            Some(KeyAction::Cancel)
        } else if self.up.contains(&code) {
            Some(KeyAction::Up)
        } else if self.down.contains(&code) {
            Some(KeyAction::Down)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// SortConfig
// ---------------------------------------------------------------------------

/// Configuration of one drag surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SortConfig {
    /// Directions items can be sorted in.
    pub axis: Axis,

    /// Hold-before-lift for pointer and touch.
    pub press_delay: PressDelay,

    /// Distance (px) the pointer must travel before the item lifts.
    pub move_delay: f32,

    /// Clamp the proxy inside the container's content box.
    pub lock_to_container_edges: bool,

    /// Pin the proxy on axes the list does not sort along.
    pub lock_axis: bool,

    /// Never auto-scroll the container.
    pub disable_auto_scroll: bool,

    /// Hide the source element while its proxy is shown.
    pub hide_ghost: bool,

    /// Proxy animation into its resting slot on pointer/touch drops.
    pub drop_animation: Transition,

    /// Animation for items moving out of the proxy's way.
    pub out_of_the_way_animation: Transition,

    /// Proxy animation between keyboard steps.
    pub keyboard_transition: Transition,

    /// Extra wait after the drop animation before finishing without a
    /// transition-end notification.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "drop_timeout_grace_ms", with = "reorder_core::easing::duration_ms")
    )]
    pub drop_timeout_grace: Duration,

    /// Only lift when the press lands on a drag handle.
    pub with_handle: bool,

    /// Where the host mounts the proxy.
    pub helper_container: HelperContainer,

    pub key_bindings: KeyBindings,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Y,
            press_delay: PressDelay::default(),
            move_delay: 0.0,
            lock_to_container_edges: false,
            lock_axis: false,
            disable_auto_scroll: false,
            hide_ghost: true,
            drop_animation: Transition::millis(
                200,
                Easing::CubicBezier {
                    x1: 0.2,
                    y1: 1.0,
                    x2: 0.1,
                    y2: 1.0,
                },
            ),
            out_of_the_way_animation: Transition::millis(
                200,
                Easing::CubicBezier {
                    x1: 0.2,
                    y1: 0.0,
                    x2: 0.0,
                    y2: 1.0,
                },
            ),
            keyboard_transition: Transition::millis(250, Easing::Ease),
            drop_timeout_grace: Duration::from_millis(100),
            with_handle: false,
            helper_container: HelperContainer::Body,
            key_bindings: KeyBindings::default(),
        }
    }
}

impl SortConfig {
    /// Load from a JSON string. Missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values can drive a sorter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("press delay distance threshold", self.press_delay.distance_threshold),
            ("move delay", self.move_delay),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        if self.press_delay.is_set() && self.move_delay > 0.0 {
            return Err(ConfigError::ConflictingDelays {
                press_delay_ms: self.press_delay.time.as_millis(),
                move_delay: self.move_delay,
            });
        }

        for (name, transition) in [
            ("drop animation", &self.drop_animation),
            ("out-of-the-way animation", &self.out_of_the_way_animation),
            ("keyboard transition", &self.keyboard_transition),
        ] {
            if let Easing::CubicBezier { x1, y1, x2, y2 } = transition.easing {
                Easing::cubic_bezier(x1, y1, x2, y2)
                    .map_err(|source| ConfigError::InvalidEasing { name, source })?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn with_press_delay(mut self, press_delay: PressDelay) -> Self {
        self.press_delay = press_delay;
        self
    }

    #[must_use]
    pub fn with_move_delay(mut self, distance: f32) -> Self {
        self.move_delay = distance;
        self
    }

    #[must_use]
    pub fn with_lock_to_container_edges(mut self, lock: bool) -> Self {
        self.lock_to_container_edges = lock;
        self
    }

    #[must_use]
    pub fn with_lock_axis(mut self, lock: bool) -> Self {
        self.lock_axis = lock;
        self
    }

    #[must_use]
    pub fn with_auto_scroll(mut self, enabled: bool) -> Self {
        self.disable_auto_scroll = !enabled;
        self
    }

    #[must_use]
    pub fn with_hide_ghost(mut self, hide: bool) -> Self {
        self.hide_ghost = hide;
        self
    }

    #[must_use]
    pub fn with_drop_animation(mut self, transition: Transition) -> Self {
        self.drop_animation = transition;
        self
    }

    #[must_use]
    pub fn with_out_of_the_way_animation(mut self, transition: Transition) -> Self {
        self.out_of_the_way_animation = transition;
        self
    }

    #[must_use]
    pub fn with_keyboard_transition(mut self, transition: Transition) -> Self {
        self.keyboard_transition = transition;
        self
    }

    #[must_use]
    pub fn with_drop_timeout_grace(mut self, grace: Duration) -> Self {
        self.drop_timeout_grace = grace;
        self
    }

    #[must_use]
    pub fn with_handle(mut self, required: bool) -> Self {
        self.with_handle = required;
        self
    }

    #[must_use]
    pub fn with_helper_container(mut self, container: HelperContainer) -> Self {
        self.helper_container = container;
        self
    }

    #[must_use]
    pub fn with_key_bindings(mut self, bindings: KeyBindings) -> Self {
        self.key_bindings = bindings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SortConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.axis, Axis::Y);
        assert_eq!(config.press_delay.distance_threshold, 5.0);
        assert!(!config.press_delay.is_set());
        assert_eq!(config.drop_animation.duration, Duration::from_millis(200));
        assert_eq!(
            config.drop_animation.easing.css(),
            "cubic-bezier(0.2,1,0.1,1)"
        );
        assert!(config.hide_ghost);
    }

    #[test]
    fn press_and_move_delay_conflict() {
        let config = SortConfig::default()
            .with_press_delay(PressDelay::new(Duration::from_millis(200), 5.0))
            .with_move_delay(10.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ConflictingDelays { press_delay_ms: 200, .. })
        ));
    }

    #[test]
    fn negative_thresholds_rejected() {
        let config = SortConfig::default().with_move_delay(-1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold { name: "move delay", .. })
        ));
        let config = SortConfig::default()
            .with_press_delay(PressDelay::new(Duration::from_millis(10), f32::NAN));
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_bezier_rejected() {
        let config = SortConfig::default().with_drop_animation(Transition::millis(
            100,
            Easing::CubicBezier {
                x1: 1.5,
                y1: 0.0,
                x2: 0.5,
                y2: 1.0,
            },
        ));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEasing { name: "drop animation", .. })
        ));
    }

    #[test]
    fn key_actions_depend_on_sorting_state() {
        let keys = KeyBindings::default();
        assert_eq!(keys.action(KeyCode::Space, false), Some(KeyAction::Lift));
        assert_eq!(keys.action(KeyCode::Down, false), None);
        assert_eq!(keys.action(KeyCode::Space, true), Some(KeyAction::Drop));
        assert_eq!(keys.action(KeyCode::Escape, true), Some(KeyAction::Cancel));
        assert_eq!(keys.action(KeyCode::Left, true), Some(KeyAction::Up));
        assert_eq!(keys.action(KeyCode::Right, true), Some(KeyAction::Down));
        assert_eq!(keys.action(KeyCode::Tab, true), None);
    }

    #[test]
    fn custom_lift_key_still_drops_mid_sort() {
        let keys = KeyBindings {
            lift: vec![KeyCode::Enter],
            ..KeyBindings::default()
        };
        assert_eq!(keys.action(KeyCode::Enter, true), Some(KeyAction::Drop));
        assert_eq!(keys.action(KeyCode::Space, false), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_overrides_and_defaults() {
        let config = SortConfig::from_json_str(
            r#"{
                "axis": "xy",
                "press_delay": { "time_ms": 150 },
                "drop_animation": { "duration_ms": 0, "easing": "linear" },
                "helper_container": { "element": 12 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.axis, Axis::XY);
        assert_eq!(config.press_delay.time, Duration::from_millis(150));
        assert_eq!(config.press_delay.distance_threshold, 5.0);
        assert!(config.drop_animation.is_instant());
        assert_eq!(config.helper_container, HelperContainer::Element(ElementId(12)));
        assert_eq!(config.key_bindings, KeyBindings::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_validation_runs_after_parse() {
        let err = SortConfig::from_json_str(
            r#"{ "press_delay": { "time_ms": 100 }, "move_delay": 4.0 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingDelays { .. }));
        assert!(matches!(
            SortConfig::from_json_str("{ not json").unwrap_err(),
            ConfigError::Json(_)
        ));
    }
}

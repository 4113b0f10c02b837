#![forbid(unsafe_code)]

//! Timing curves and transitions.
//!
//! [`Easing`] mirrors the CSS timing-function vocabulary so a web host can
//! hand [`Transition::css`] straight to `style.transition`, while a native
//! host samples the same curve with [`Easing::apply`].
//!
//! # Invariants
//!
//! 1. `apply(0.0) == 0.0` and `apply(1.0) == 1.0` for every curve.
//! 2. Cubic-bezier control points have `x1, x2` in `[0, 1]`, which keeps the
//!    curve a function of time. [`Easing::cubic_bezier`] rejects anything
//!    else.
//! 3. A zero-duration transition is "no transition": hosts apply the value
//!    immediately and no transition-end is expected.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A CSS-compatible timing function.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Easing {
    /// Linear interpolation: `t`.
    Linear,
    /// CSS `ease`, the browser default.
    #[default]
    Ease,
    /// CSS `ease-in`.
    EaseIn,
    /// CSS `ease-out`.
    EaseOut,
    /// CSS `ease-in-out`.
    EaseInOut,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

/// Error returned for malformed or out-of-range timing functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EasingError(String);

impl fmt::Display for EasingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid timing function: {}", self.0)
    }
}

impl std::error::Error for EasingError {}

impl Easing {
    /// Build a cubic-bezier curve, rejecting x control points outside `[0, 1]`.
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self, EasingError> {
        let valid_x = |x: f32| (0.0..=1.0).contains(&x);
        if !valid_x(x1) || !valid_x(x2) || !y1.is_finite() || !y2.is_finite() {
            return Err(EasingError(format!(
                "cubic-bezier({x1},{y1},{x2},{y2})"
            )));
        }
        Ok(Self::CubicBezier { x1, y1, x2, y2 })
    }

    /// Control points of the equivalent cubic-bezier, `None` for linear.
    fn control_points(self) -> Option<(f32, f32, f32, f32)> {
        match self {
            Self::Linear => None,
            Self::Ease => Some((0.25, 0.1, 0.25, 1.0)),
            Self::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            Self::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            Self::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
            Self::CubicBezier { x1, y1, x2, y2 } => Some((x1, y1, x2, y2)),
        }
    }

    /// Eased progress for linear progress `t` (clamped to `[0, 1]`).
    ///
    /// Overshooting curves (`y` control points outside `[0, 1]`) may return
    /// values outside `[0, 1]` between the endpoints.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let Some((x1, y1, x2, y2)) = self.control_points() else {
            return t;
        };
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let s = solve_bezier_x(t, x1, x2);
        bezier(s, y1, y2)
    }

    /// CSS representation.
    #[must_use]
    pub fn css(self) -> String {
        match self {
            Self::Linear => "linear".to_owned(),
            Self::Ease => "ease".to_owned(),
            Self::EaseIn => "ease-in".to_owned(),
            Self::EaseOut => "ease-out".to_owned(),
            Self::EaseInOut => "ease-in-out".to_owned(),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                format!("cubic-bezier({x1},{y1},{x2},{y2})")
            }
        }
    }
}

/// One coordinate of a unit cubic bezier with endpoints 0 and 1.
#[inline]
fn bezier(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

#[inline]
fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Curve parameter `s` whose x equals `x`: Newton first, bisection fallback.
fn solve_bezier_x(x: f32, x1: f32, x2: f32) -> f32 {
    const EPSILON: f32 = 1e-6;

    let mut s = x;
    for _ in 0..8 {
        let err = bezier(s, x1, x2) - x;
        if err.abs() < EPSILON {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < EPSILON {
            break;
        }
        s = (s - err / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = x;
    for _ in 0..32 {
        let value = bezier(s, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

impl FromStr for Easing {
    type Err = EasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "linear" => return Ok(Self::Linear),
            "ease" => return Ok(Self::Ease),
            "ease-in" => return Ok(Self::EaseIn),
            "ease-out" => return Ok(Self::EaseOut),
            "ease-in-out" => return Ok(Self::EaseInOut),
            _ => {}
        }

        let args = trimmed
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| EasingError(trimmed.to_owned()))?;
        let values = args
            .split(',')
            .map(|part| part.trim().parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| EasingError(trimmed.to_owned()))?;
        match values[..] {
            [x1, y1, x2, y2] => Self::cubic_bezier(x1, y1, x2, y2),
            _ => Err(EasingError(trimmed.to_owned())),
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = EasingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(value: Easing) -> Self {
        value.css()
    }
}

/// A duration plus a timing function.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transition {
    #[cfg_attr(feature = "serde", serde(rename = "duration_ms", with = "duration_ms"))]
    pub duration: Duration,
    pub easing: Easing,
}

impl Transition {
    #[must_use]
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    /// Convenience constructor from milliseconds.
    #[must_use]
    pub const fn millis(ms: u64, easing: Easing) -> Self {
        Self::new(Duration::from_millis(ms), easing)
    }

    /// Whether this transition animates at all.
    #[inline]
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }

    /// CSS `transition` shorthand for `property`.
    #[must_use]
    pub fn css(&self, property: &str) -> String {
        format!(
            "{property} {}ms {}",
            self.duration.as_millis(),
            self.easing.css()
        )
    }

    /// Eased progress `elapsed` into the transition.
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.easing.apply(t)
    }
}

/// Serde adapter storing a [`Duration`] as whole milliseconds.
#[cfg(feature = "serde")]
pub mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Easing; 6] = [
        Easing::Linear,
        Easing::Ease,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::CubicBezier {
            x1: 0.2,
            y1: 0.0,
            x2: 0.0,
            y2: 1.0,
        },
    ];

    #[test]
    fn endpoints_are_fixed() {
        for curve in CURVES {
            assert_eq!(curve.apply(0.0), 0.0, "{curve}");
            assert_eq!(curve.apply(1.0), 1.0, "{curve}");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for curve in CURVES {
            let mut prev = 0.0f32;
            for i in 0..=100 {
                let t = i as f32 / 100.0;
                let v = curve.apply(t);
                assert!(v >= prev - 0.001, "{curve} not monotonic at t={t}");
                prev = v;
            }
        }
    }

    #[test]
    fn ease_in_out_is_symmetric_at_midpoint() {
        let mid = Easing::EaseInOut.apply(0.5);
        assert!((mid - 0.5).abs() < 0.01, "mid={mid}");
    }

    #[test]
    fn parses_keywords_and_bezier() {
        assert_eq!("ease-out".parse::<Easing>(), Ok(Easing::EaseOut));
        assert_eq!(
            "cubic-bezier(.2, 1, .1, 1)".parse::<Easing>(),
            Ok(Easing::CubicBezier {
                x1: 0.2,
                y1: 1.0,
                x2: 0.1,
                y2: 1.0
            })
        );
        assert!("cubic-bezier(1.5,0,0,1)".parse::<Easing>().is_err());
        assert!("bouncy".parse::<Easing>().is_err());
        assert!("cubic-bezier(0,0,1)".parse::<Easing>().is_err());
    }

    #[test]
    fn css_round_trips_through_parse() {
        for curve in CURVES {
            assert_eq!(curve.css().parse::<Easing>(), Ok(curve));
        }
    }

    #[test]
    fn transition_css_and_progress() {
        let transition = Transition::millis(200, Easing::Linear);
        assert_eq!(transition.css("transform"), "transform 200ms linear");
        assert!((transition.progress(Duration::from_millis(50)) - 0.25).abs() < 1e-4);
        assert_eq!(transition.progress(Duration::from_secs(1)), 1.0);
        assert_eq!(
            Transition::millis(0, Easing::Ease).progress(Duration::ZERO),
            1.0
        );
    }
}

#![forbid(unsafe_code)]

//! Test doubles: an in-memory [`Host`] and a recording [`SortListener`].
//!
//! Available in this crate's tests and, with the `test-helpers` feature, to
//! downstream crates.

use ahash::AHashMap;
use reorder_core::geometry::{Rect, Sides, Size, Vec2};
use reorder_core::target::ElementId;

use crate::error::ListenerError;
use crate::events::{ListenerResult, MoveEvent, SortEvent, SortListener};
use crate::host::{Effect, FieldInfo, Host, ScrollMetrics};

/// In-memory host.
///
/// `rects` holds layout rects in content coordinates; [`Host::item_rect`]
/// subtracts the current scroll offset, the way a scrolled container moves
/// its children in the viewport.
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    pub rects: AHashMap<ElementId, Rect>,
    pub margins: AHashMap<ElementId, Sides>,
    pub fields: AHashMap<ElementId, Vec<FieldInfo>>,
    pub container: Rect,
    pub gap: Vec2,
    pub scroll: ScrollMetrics,
    /// Every effect applied, in order.
    pub effects: Vec<Effect>,
    /// Every applied (clamped) scroll delta.
    pub scrolls: Vec<Vec2>,
}

impl MockHost {
    /// `count` items `ElementId(0..count)` stacked top to bottom from the
    /// origin, each `width` by `height`. The container fits them exactly and
    /// does not scroll.
    #[must_use]
    pub fn vertical_list(count: u64, width: f32, height: f32) -> Self {
        let rects = (0..count)
            .map(|i| (ElementId(i), Rect::new(0.0, i as f32 * height, width, height)))
            .collect();
        let content = Size::new(width, count as f32 * height);
        Self {
            rects,
            container: Rect::from_origin_size(Default::default(), content),
            scroll: ScrollMetrics::new(Vec2::ZERO, content, content),
            ..Self::default()
        }
    }

    /// `count` items laid out left to right.
    #[must_use]
    pub fn horizontal_list(count: u64, width: f32, height: f32) -> Self {
        let rects = (0..count)
            .map(|i| (ElementId(i), Rect::new(i as f32 * width, 0.0, width, height)))
            .collect();
        let content = Size::new(count as f32 * width, height);
        Self {
            rects,
            container: Rect::from_origin_size(Default::default(), content),
            scroll: ScrollMetrics::new(Vec2::ZERO, content, content),
            ..Self::default()
        }
    }

    /// Shrink the visible container to `viewport` so the list scrolls.
    #[must_use]
    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.container = Rect::from_origin_size(self.container.origin(), viewport);
        self.scroll.viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_margins(mut self, element: ElementId, margins: Sides) -> Self {
        self.margins.insert(element, margins);
        self
    }

    #[must_use]
    pub fn with_fields(mut self, element: ElementId, fields: Vec<FieldInfo>) -> Self {
        self.fields.insert(element, fields);
        self
    }

    /// Drain the recorded effects.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}

impl Host for MockHost {
    fn item_rect(&self, element: ElementId) -> Option<Rect> {
        self.rects
            .get(&element)
            .map(|rect| rect.translate(-self.scroll.offset))
    }

    fn item_margins(&self, element: ElementId) -> Sides {
        self.margins.get(&element).copied().unwrap_or_default()
    }

    fn container_rect(&self) -> Rect {
        self.container
    }

    fn container_gap(&self) -> Vec2 {
        self.gap
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.scroll
    }

    fn proxy_fields(&self, element: ElementId) -> Vec<FieldInfo> {
        self.fields.get(&element).cloned().unwrap_or_default()
    }

    fn scroll_by(&mut self, delta: Vec2) -> Vec2 {
        let max = self.scroll.max_offset();
        let before = self.scroll.offset;
        let after = (before + delta).clamp(Vec2::ZERO, max);
        self.scroll.offset = after;
        let applied = after - before;
        if !applied.is_zero() {
            self.scrolls.push(applied);
        }
        applied
    }

    fn apply(&mut self, effect: Effect) {
        self.effects.push(effect);
    }
}

/// One recorded listener call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recorded {
    Start(SortEvent),
    Move(MoveEvent),
    Over(SortEvent),
    End(SortEvent),
}

/// Which callback [`RecordingListener`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Start,
    Over,
    End,
}

/// Records every callback; optionally fails one kind of callback.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    pub events: Vec<Recorded>,
    pub fail_on: Option<FailOn>,
}

impl RecordingListener {
    #[must_use]
    pub fn failing_on(fail_on: FailOn) -> Self {
        Self {
            events: Vec::new(),
            fail_on: Some(fail_on),
        }
    }

    /// Recorded calls without the pass-through moves.
    #[must_use]
    pub fn lifecycle(&self) -> Vec<Recorded> {
        self.events
            .iter()
            .copied()
            .filter(|event| !matches!(event, Recorded::Move(_)))
            .collect()
    }

    /// Events of every `on_end` call.
    #[must_use]
    pub fn ends(&self) -> Vec<SortEvent> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Recorded::End(end) => Some(*end),
                _ => None,
            })
            .collect()
    }

    fn check(&self, call: FailOn) -> ListenerResult {
        if self.fail_on == Some(call) {
            let error: ListenerError = format!("listener refused {call:?}").into();
            return Err(error);
        }
        Ok(())
    }
}

impl SortListener for RecordingListener {
    fn on_start(&mut self, event: &SortEvent) -> ListenerResult {
        self.events.push(Recorded::Start(*event));
        self.check(FailOn::Start)
    }

    fn on_move(&mut self, event: &MoveEvent) -> ListenerResult {
        self.events.push(Recorded::Move(*event));
        Ok(())
    }

    fn on_over(&mut self, event: &SortEvent) -> ListenerResult {
        self.events.push(Recorded::Over(*event));
        self.check(FailOn::Over)
    }

    fn on_end(&mut self, event: &SortEvent) -> ListenerResult {
        self.events.push(Recorded::End(*event));
        self.check(FailOn::End)
    }
}

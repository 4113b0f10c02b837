#![forbid(unsafe_code)]

//! The host-facing entry point.
//!
//! A [`Sorter`] bundles an [`Engine`] with its input backends. The host feeds
//! it input events, calls [`Sorter::tick`] from its frame or timer loop, and
//! reports transition ends; everything else flows back through the
//! [`Host`] and [`SortListener`] it was built with.
//!
//! ```ignore
//! let mut sorter = Sorter::new(SortConfig::default(), host, listener)?;
//! let handle = sorter.register(SortableItem::new(ElementId(1), 0));
//! let outcome = sorter.handle_event(&event, Instant::now())?;
//! if outcome.prevent_default { /* suppress the native action */ }
//! ```

use std::fmt;

use reorder_core::event::InputEvent;
use reorder_core::target::EventTarget;
use web_time::Instant;

use crate::backend::{Backend, EventOutcome, KeyboardBackend, PointerBackend, TouchBackend};
use crate::config::SortConfig;
use crate::engine::{Engine, LiftOutcome, Phase};
use crate::error::Result;
use crate::events::{BeforeStart, SortListener};
use crate::host::{Host, TransitionProperty, TransitionTarget};
use crate::registry::{ItemHandle, Registry, SortableItem};

/// One drag surface: engine plus input backends.
pub struct Sorter<H, L> {
    engine: Engine<H, L>,
    backends: Vec<Box<dyn Backend>>,
}

impl<H, L> fmt::Debug for Sorter<H, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sorter")
            .field("engine", &self.engine)
            .field("backends", &self.backends)
            .finish()
    }
}

/// Pointer, touch, and keyboard, in that dispatch order.
#[must_use]
pub fn default_backends() -> Vec<Box<dyn Backend>> {
    vec![
        Box::new(PointerBackend::new()),
        Box::new(TouchBackend::new()),
        Box::new(KeyboardBackend::new()),
    ]
}

impl<H: Host, L: SortListener> Sorter<H, L> {
    /// Build a sorter with the default backends. Fails if `config` is invalid.
    pub fn new(config: SortConfig, host: H, listener: L) -> Result<Self> {
        Ok(Self {
            engine: Engine::new(config, host, listener)?,
            backends: default_backends(),
        })
    }

    /// Replace the input backends. Events reach them in order.
    #[must_use]
    pub fn with_backends(mut self, backends: Vec<Box<dyn Backend>>) -> Self {
        self.backends = backends;
        self
    }

    #[must_use]
    pub fn with_can_sort(mut self, can_sort: impl Fn(&EventTarget) -> bool + 'static) -> Self {
        self.engine = self.engine.with_can_sort(can_sort);
        self
    }

    #[must_use]
    pub fn with_before_start(mut self, hook: impl BeforeStart + 'static) -> Self {
        self.engine = self.engine.with_before_start(hook);
        self
    }

    // -- registration -------------------------------------------------------

    pub fn register(&mut self, item: SortableItem) -> ItemHandle {
        self.engine.register(item)
    }

    pub fn unregister(&mut self, handle: ItemHandle) -> Result<()> {
        self.engine.unregister(handle)
    }

    pub fn update_index(&mut self, handle: ItemHandle, index: usize) -> Result<()> {
        self.engine.update_index(handle, index)
    }

    pub fn update_disabled(&mut self, handle: ItemHandle, disabled: bool) -> Result<()> {
        self.engine.update_disabled(handle, disabled)
    }

    // -- driving ------------------------------------------------------------

    /// Route one input event through every backend.
    pub fn handle_event(&mut self, event: &InputEvent, now: Instant) -> Result<EventOutcome> {
        let mut outcome = EventOutcome::IGNORED;
        for backend in &mut self.backends {
            outcome = outcome.merge(backend.handle(event, now, &mut self.engine)?);
        }
        Ok(outcome)
    }

    /// Advance press delays, auto-scroll, and the drop timeout.
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        for backend in &mut self.backends {
            backend.tick(now, &mut self.engine)?;
        }
        self.engine.tick(now)
    }

    pub fn transition_end(
        &mut self,
        target: TransitionTarget,
        property: TransitionProperty,
        now: Instant,
    ) -> Result<()> {
        self.engine.transition_end(target, property, now)
    }

    /// Answer a before-start hook that returned `Deferred`.
    pub fn resolve_before_start(&mut self, proceed: bool, now: Instant) -> Result<LiftOutcome> {
        self.engine.resolve_before_start(proceed, now)
    }

    /// Cancel whatever is in progress, including pending presses.
    pub fn cancel(&mut self, now: Instant) -> Result<()> {
        for backend in &mut self.backends {
            backend.reset();
        }
        self.engine.cancel(now)
    }

    // -- inspection ---------------------------------------------------------

    pub fn phase(&self) -> Phase {
        let phase = self.engine.phase();
        if phase == Phase::Idle && self.backends.iter().any(|backend| backend.has_pending()) {
            Phase::PendingLift
        } else {
            phase
        }
    }

    /// True from lift until the session ends, including while a deferred
    /// before-start hook is pending.
    pub fn is_sorting(&self) -> bool {
        matches!(
            self.engine.phase(),
            Phase::AwaitingStart | Phase::Dragging | Phase::Dropping
        )
    }

    pub fn engine(&self) -> &Engine<H, L> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<H, L> {
        &mut self.engine
    }

    pub fn registry(&self) -> &Registry {
        self.engine.registry()
    }

    pub fn config(&self) -> &SortConfig {
        self.engine.config()
    }

    pub fn host(&self) -> &H {
        self.engine.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.engine.host_mut()
    }

    pub fn listener(&self) -> &L {
        self.engine.listener()
    }

    pub fn listener_mut(&mut self) -> &mut L {
        self.engine.listener_mut()
    }
}

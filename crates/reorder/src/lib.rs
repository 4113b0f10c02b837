#![forbid(unsafe_code)]

//! Drag-to-reorder for lists and grids.
//!
//! # Role in reorder
//! This crate is the engine and its host-facing surface. It turns pointer,
//! touch, and keyboard input into a single drag session per surface, moves a
//! floating proxy of the lifted item, slides siblings out of its way, scrolls
//! the container at its edges, and reports `from`/`to` indices when the item
//! lands.
//!
//! # Primary responsibilities
//! - **Sorter**: the entry point a host drives with events, ticks, and
//!   transition ends.
//! - **Engine**: the session state machine (lift, move, snap, drop, cancel).
//! - **Backends**: pointer, touch, and keyboard input families.
//! - **Registry**: registered items, their indices, and the active item.
//! - **Host / Effect**: the geometry queries and visual effects exchanged
//!   with the UI toolkit.
//! - **SortConfig**: behaviour knobs, loadable from JSON with the `serde`
//!   feature.
//!
//! # How it fits in the system
//! A host adapter implements [`Host`] over its toolkit and [`SortListener`]
//! over its data. It calls [`Sorter::handle_event`] for input, [`Sorter::tick`]
//! on a timer or frame loop, and [`Sorter::transition_end`] when the proxy's
//! drop animation finishes. On `on_end` it reorders its data, typically with
//! [`order::array_move`].

pub mod auto_scroll;
pub mod backend;
pub mod config;
pub mod draggable;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod order;
pub mod registry;
pub mod sorter;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use reorder_core;

pub use backend::{Backend, BackendKind, EventOutcome, SortDelegate};
pub use config::{HelperContainer, KeyAction, KeyBindings, PressDelay, SortConfig};
pub use engine::{Engine, LiftOutcome, Phase};
pub use error::{ConfigError, Result, SortError};
pub use events::{BeforeStart, BeforeStartOutcome, Motion, MoveEvent, SortEvent, SortListener};
pub use host::{Effect, Host, ScrollMetrics, TransitionProperty, TransitionTarget};
pub use order::array_move;
pub use registry::{ItemHandle, Registry, SortableItem};
pub use sorter::Sorter;

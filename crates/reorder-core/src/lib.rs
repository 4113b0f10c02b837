#![forbid(unsafe_code)]

//! Core: geometry, canonical input events, event targets, and easing.
//!
//! # Role in reorder
//! `reorder-core` is the leaf layer. It has no state and no knowledge of
//! sessions or registries; it only defines the vocabulary the engine and the
//! host adapters speak.
//!
//! # Primary responsibilities
//! - **Geometry**: viewport-space points, vectors, rects, and margins.
//! - **InputEvent**: pointer, touch, key, and wheel events as delivered by a
//!   host adapter.
//! - **EventTarget**: the innermost-first node path of an event, used for
//!   handle, editable-region, and form-control checks.
//! - **Easing / Transition**: timing curves with CSS rendering for web hosts
//!   and numeric sampling for hosts that animate themselves.
//!
//! # How it fits in the system
//! The `reorder` crate consumes these types: backends read `InputEvent`s,
//! the engine does all collision math in `geometry` types, and visual effects
//! carry `Transition`s.

pub mod easing;
pub mod event;
pub mod geometry;
pub mod target;

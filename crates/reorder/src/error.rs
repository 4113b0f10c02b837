#![forbid(unsafe_code)]

//! Error types.

use reorder_core::easing::EasingError;
use reorder_core::target::ElementId;
use thiserror::Error;

use crate::registry::ItemHandle;

/// Error type returned by listener callbacks.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, SortError>;

/// Invalid [`SortConfig`](crate::config::SortConfig) values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "press delay ({press_delay_ms}ms) and move delay ({move_delay}px) cannot both be set"
    )]
    ConflictingDelays { press_delay_ms: u128, move_delay: f32 },

    #[error("invalid {name}: {value} (must be finite and non-negative)")]
    InvalidThreshold { name: &'static str, value: f32 },

    #[error("invalid {name}: {source}")]
    InvalidEasing {
        name: &'static str,
        #[source]
        source: EasingError,
    },

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SortError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("a sort session is already active for {active}")]
    AlreadyActive { active: ItemHandle },

    #[error("item is not registered: {0}")]
    NotRegistered(ItemHandle),

    #[error("host returned no geometry for element {element}")]
    MissingGeometry { element: ElementId },

    #[error("listener failed: {0}")]
    Listener(#[source] ListenerError),
}

impl SortError {
    /// Whether this error came from a host callback rather than the engine.
    #[must_use]
    pub fn is_listener(&self) -> bool {
        matches!(self, Self::Listener(_))
    }
}

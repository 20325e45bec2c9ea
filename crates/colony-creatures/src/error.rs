use colony_core::Vec3;
use thiserror::Error;

/// Why an entity factory could not produce a creature.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnError {
    #[error("unknown creature kind '{0}'")]
    UnknownKind(String),

    #[error("no free entity slot (limit {limit})")]
    NoFreeSlot { limit: usize },

    #[error("cannot spawn at {position:?}: {reason}")]
    InvalidPosition { position: Vec3, reason: &'static str },
}

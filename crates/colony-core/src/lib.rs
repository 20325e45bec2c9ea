//! Deterministic, engine-agnostic kernel primitives shared by the colony AI crates.
//!
//! Nothing in here knows about acts or tasks. It only fixes the vocabulary the rest of the
//! workspace speaks: who an agent is, what a world must answer, how time advances.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod blackboard;
pub mod geom;
pub mod rng;
pub mod tick;
pub mod timer;
pub mod world;

pub use agent::{AgentId, BodyId, EntityId, FactionId};
pub use blackboard::{BbKey, Blackboard};
pub use geom::{Vec3, VoxelCoord};
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::TickContext;
pub use timer::Timer;
pub use world::{SpatialMut, SpatialView, Target, WorldMut, WorldView};

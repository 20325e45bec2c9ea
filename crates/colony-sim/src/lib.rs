//! A concrete colony world and the loop that runs it.
//!
//! [`SimWorld`] implements every collaborator trait the creature crate asks for. A
//! [`Simulation`] owns the world plus one [`colony_creatures::Creature`] controller per live
//! entity and alternates strictly between the step phase (each creature advances one step) and
//! the batch phase (orders on the task board are handed out by the greedy scheduler).

#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod sim;
pub mod world;

pub use config::{ConfigError, ScenarioConfig};
pub use registry::{KindRegistry, KindSpec, MindKind};
pub use sim::{RunSummary, Simulation, TickReport};
pub use world::{Entity, SimWorld};

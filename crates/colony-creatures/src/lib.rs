//! Creatures: the per-agent controller that drives a task queue, the collaborator traits a host
//! world implements, the acts and tasks creatures share, and the necromancer decision loop.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod acts;
pub mod creature;
pub mod error;
pub mod necromancer;
pub mod tasks;
pub mod world;

pub use acts::{Dig, GoTo, KillEntity, Wander};
pub use creature::{Creature, CreatureStep, Mind, Wanderer};
pub use error::SpawnError;
pub use necromancer::{NecromancerConfig, NecromancerMind, NecromancerState};
pub use tasks::{ActTask, GoToEntityTask, KillEntityTask, KillVoxelTask, WanderTask};
pub use world::{
    CombatWorld, CreatureWorld, EntityFactory, EnvoyId, FactionMut, FactionView, PartyId,
    Relationship, Stats, StatsView, VoxelWorld,
};

//! Narrow collaborator interfaces a host world provides to creatures.

use core::fmt;

use colony_core::{BodyId, FactionId, SpatialMut, SpatialView, Vec3, VoxelCoord, WorldMut};
use colony_task::TaskBoardWorld;

use crate::error::SpawnError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    Hateful,
    Neutral,
    Friendly,
}

/// A group of creatures acting together (a war party).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartyId(pub u32);

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// A trade envoy travelling on behalf of a faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnvoyId(pub u32);

impl fmt::Display for EnvoyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

pub trait FactionView: SpatialView {
    fn faction_of(&self, agent: Self::Agent) -> Option<FactionId>;

    /// All factions, in a stable order.
    fn factions(&self) -> Vec<FactionId>;

    fn relationship(&self, a: FactionId, b: FactionId) -> Relationship;

    fn minions(&self, faction: FactionId) -> Vec<Self::Agent>;

    /// Grave bodies inside the faction's zones.
    fn graves(&self, faction: FactionId) -> Vec<BodyId>;

    fn party_of(&self, agent: Self::Agent) -> Option<PartyId>;

    fn envoy_of(&self, agent: Self::Agent) -> Option<EnvoyId>;

    /// Factions `faction` is hateful toward, in stable order.
    fn hateful_factions(&self, faction: FactionId) -> Vec<FactionId> {
        self.factions()
            .into_iter()
            .filter(|&other| {
                other != faction && self.relationship(faction, other) == Relationship::Hateful
            })
            .collect()
    }
}

pub trait FactionMut: WorldMut + FactionView {
    /// Move `agent` into `faction`'s minion list, leaving whatever faction it belonged to.
    fn set_faction(&mut self, agent: Self::Agent, faction: FactionId);

    fn join_party(&mut self, party: PartyId, agent: Self::Agent);

    fn join_envoy(&mut self, envoy: EnvoyId, agent: Self::Agent);
}

pub trait EntityFactory: WorldMut {
    fn spawn(&mut self, kind: &str, position: Vec3) -> Result<Self::Agent, SpawnError>;

    /// Remove a body; `false` when it was already gone.
    fn destroy_body(&mut self, body: BodyId) -> bool;
}

pub trait VoxelWorld: SpatialMut {
    fn is_dig_designated(&self, voxel: VoxelCoord) -> bool;

    /// Apply `amount` of digging; returns `true` once the voxel is destroyed.
    fn dig(&mut self, voxel: VoxelCoord, amount: f32) -> bool;
}

pub trait CombatWorld: SpatialMut {
    /// Hit `victim`; returns `true` when the blow killed it.
    fn strike(&mut self, attacker: Self::Agent, victim: Self::Agent, damage: f32) -> bool;
}

/// Derived movement and work rates of a creature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub speed: f32,
    pub dig_rate: f32,
    pub damage: f32,
    pub attack_range: f32,
    pub attack_period: f32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            speed: 5.0,
            dig_rate: 10.0,
            damage: 10.0,
            attack_range: 1.5,
            attack_period: 1.0,
        }
    }
}

pub trait StatsView: SpatialView {
    fn stats(&self, agent: Self::Agent) -> Option<Stats>;
}

/// Everything the bundled acts, tasks and minds need from a world.
pub trait CreatureWorld:
    FactionMut + EntityFactory + VoxelWorld + CombatWorld + StatsView + TaskBoardWorld
{
}

impl<W> CreatureWorld for W where
    W: FactionMut + EntityFactory + VoxelWorld + CombatWorld + StatsView + TaskBoardWorld
{
}

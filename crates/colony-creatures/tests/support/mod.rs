#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use colony_core::{
    BodyId, FactionId, SpatialMut, SpatialView, TickContext, Vec3, VoxelCoord, WorldMut,
    WorldView,
};
use colony_creatures::{
    CombatWorld, EntityFactory, EnvoyId, FactionMut, FactionView, PartyId, Relationship, SpawnError,
    Stats, StatsView, VoxelWorld,
};
use colony_task::{TaskBoard, TaskBoardWorld};

#[derive(Debug, Clone)]
pub struct Critter {
    pub kind: String,
    pub pos: Vec3,
    pub health: f32,
    pub alive: bool,
    pub faction: Option<FactionId>,
    pub speed: f32,
}

/// Small world implementing every creature collaborator.
#[derive(Default)]
pub struct Arena {
    pub critters: BTreeMap<u64, Critter>,
    pub props: BTreeMap<u64, Vec3>,
    pub graves: BTreeMap<FactionId, Vec<BodyId>>,
    pub factions: BTreeSet<FactionId>,
    pub hate: Vec<(FactionId, FactionId)>,
    pub parties: BTreeMap<u64, PartyId>,
    pub envoys: BTreeMap<u64, EnvoyId>,
    pub voxels: BTreeMap<VoxelCoord, f32>,
    pub designated: BTreeSet<VoxelCoord>,
    pub board: TaskBoard<Arena>,
    pub spawn_limit: Option<usize>,
    pub spawned: Vec<(u64, Vec3)>,
    pub strikes: Vec<(u64, u64)>,
    next_id: u64,
}

pub const UNDEAD: FactionId = FactionId(1);
pub const DWARVES: FactionId = FactionId(2);

impl Arena {
    pub fn new() -> Self {
        let mut arena = Self {
            next_id: 1,
            ..Self::default()
        };
        arena.factions.insert(UNDEAD);
        arena.factions.insert(DWARVES);
        arena.hate.push((UNDEAD, DWARVES));
        arena
    }

    pub fn add(&mut self, kind: &str, pos: Vec3, faction: Option<FactionId>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.critters.insert(
            id,
            Critter {
                kind: kind.to_owned(),
                pos,
                health: 30.0,
                alive: true,
                faction,
                speed: 2.0,
            },
        );
        id
    }

    pub fn kill(&mut self, id: u64) {
        if let Some(c) = self.critters.get_mut(&id) {
            c.alive = false;
        }
    }

    pub fn add_grave(&mut self, faction: FactionId, pos: Vec3) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;
        self.props.insert(id, pos);
        let body = BodyId(id);
        self.graves.entry(faction).or_default().push(body);
        body
    }

    pub fn add_voxel(&mut self, voxel: VoxelCoord, hp: f32, designated: bool) {
        self.voxels.insert(voxel, hp);
        if designated {
            self.designated.insert(voxel);
        }
    }

    pub fn pos(&self, id: u64) -> Vec3 {
        self.critters[&id].pos
    }

    pub fn living(&self, kind: &str) -> usize {
        self.critters
            .values()
            .filter(|c| c.alive && c.kind == kind)
            .count()
    }
}

impl WorldView for Arena {
    type Agent = u64;
}

impl WorldMut for Arena {}

impl SpatialView for Arena {
    fn position(&self, agent: u64) -> Option<Vec3> {
        self.critters.get(&agent).filter(|c| c.alive).map(|c| c.pos)
    }

    fn is_alive(&self, agent: u64) -> bool {
        self.critters.get(&agent).is_some_and(|c| c.alive)
    }

    fn body_position(&self, body: BodyId) -> Option<Vec3> {
        self.props.get(&body.0).copied()
    }

    fn is_voxel_solid(&self, voxel: VoxelCoord) -> bool {
        self.voxels.contains_key(&voxel)
    }
}

impl SpatialMut for Arena {
    fn set_position(&mut self, agent: u64, position: Vec3) {
        if let Some(c) = self.critters.get_mut(&agent) {
            c.pos = position;
        }
    }
}

impl FactionView for Arena {
    fn faction_of(&self, agent: u64) -> Option<FactionId> {
        self.critters.get(&agent).and_then(|c| c.faction)
    }

    fn factions(&self) -> Vec<FactionId> {
        self.factions.iter().copied().collect()
    }

    fn relationship(&self, a: FactionId, b: FactionId) -> Relationship {
        if a == b {
            Relationship::Friendly
        } else if self.hate.contains(&(a, b)) || self.hate.contains(&(b, a)) {
            Relationship::Hateful
        } else {
            Relationship::Neutral
        }
    }

    fn minions(&self, faction: FactionId) -> Vec<u64> {
        self.critters
            .iter()
            .filter(|(_, c)| c.alive && c.faction == Some(faction))
            .map(|(id, _)| *id)
            .collect()
    }

    fn graves(&self, faction: FactionId) -> Vec<BodyId> {
        self.graves.get(&faction).cloned().unwrap_or_default()
    }

    fn party_of(&self, agent: u64) -> Option<PartyId> {
        self.parties.get(&agent).copied()
    }

    fn envoy_of(&self, agent: u64) -> Option<EnvoyId> {
        self.envoys.get(&agent).copied()
    }
}

impl FactionMut for Arena {
    fn set_faction(&mut self, agent: u64, faction: FactionId) {
        if let Some(c) = self.critters.get_mut(&agent) {
            c.faction = Some(faction);
        }
    }

    fn join_party(&mut self, party: PartyId, agent: u64) {
        self.parties.insert(agent, party);
    }

    fn join_envoy(&mut self, envoy: EnvoyId, agent: u64) {
        self.envoys.insert(agent, envoy);
    }
}

impl EntityFactory for Arena {
    fn spawn(&mut self, kind: &str, position: Vec3) -> Result<u64, SpawnError> {
        if let Some(limit) = self.spawn_limit {
            if self.spawned.len() >= limit {
                return Err(SpawnError::NoFreeSlot { limit });
            }
        }
        if kind.is_empty() {
            return Err(SpawnError::UnknownKind(kind.to_owned()));
        }
        let id = self.add(kind, position, None);
        self.spawned.push((id, position));
        Ok(id)
    }

    fn destroy_body(&mut self, body: BodyId) -> bool {
        self.props.remove(&body.0).is_some()
    }
}

impl VoxelWorld for Arena {
    fn is_dig_designated(&self, voxel: VoxelCoord) -> bool {
        self.designated.contains(&voxel)
    }

    fn dig(&mut self, voxel: VoxelCoord, amount: f32) -> bool {
        let Some(hp) = self.voxels.get_mut(&voxel) else {
            return true;
        };
        *hp -= amount;
        if *hp > 0.0 {
            return false;
        }
        self.voxels.remove(&voxel);
        self.designated.remove(&voxel);
        true
    }
}

impl CombatWorld for Arena {
    fn strike(&mut self, attacker: u64, victim: u64, damage: f32) -> bool {
        self.strikes.push((attacker, victim));
        let Some(c) = self.critters.get_mut(&victim) else {
            return false;
        };
        c.health -= damage;
        if c.health <= 0.0 {
            c.alive = false;
        }
        !c.alive
    }
}

impl StatsView for Arena {
    fn stats(&self, agent: u64) -> Option<Stats> {
        self.critters.get(&agent).map(|c| Stats {
            speed: c.speed,
            ..Stats::default()
        })
    }
}

impl TaskBoardWorld for Arena {
    fn task_board(&mut self) -> &mut TaskBoard<Arena> {
        &mut self.board
    }
}

/// Fixed half-second steps.
pub fn ctx(tick: u64) -> TickContext {
    TickContext::new(tick, 0.5, 3)
}

use std::collections::{BTreeMap, BTreeSet};

use colony_core::{
    BodyId, EntityId, FactionId, SpatialMut, SpatialView, Vec3, VoxelCoord, WorldMut, WorldView,
};
use colony_creatures::{
    CombatWorld, EntityFactory, EnvoyId, FactionMut, FactionView, PartyId, Relationship,
    SpawnError, Stats, StatsView, VoxelWorld,
};
use colony_task::{TaskBoard, TaskBoardWorld};

use crate::registry::KindRegistry;

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: String,
    pub position: Vec3,
    pub health: f32,
    pub faction: Option<FactionId>,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct Grave {
    position: Vec3,
    owner: FactionId,
}

/// In-memory world: entities, graves, voxels, factions and the task board.
pub struct SimWorld {
    registry: KindRegistry,
    entities: BTreeMap<EntityId, Entity>,
    graves: BTreeMap<BodyId, Grave>,
    factions: Vec<String>,
    relations: BTreeMap<(FactionId, FactionId), Relationship>,
    parties: BTreeMap<EntityId, PartyId>,
    envoys: BTreeMap<EntityId, EnvoyId>,
    voxels: BTreeMap<VoxelCoord, f32>,
    designations: BTreeSet<VoxelCoord>,
    new_designations: Vec<VoxelCoord>,
    board: TaskBoard<SimWorld>,
    spawned: Vec<EntityId>,
    spawn_counts: BTreeMap<String, u64>,
    max_entities: usize,
    next_id: u64,
}

impl SimWorld {
    pub fn new(registry: KindRegistry, max_entities: usize) -> Self {
        Self {
            registry,
            entities: BTreeMap::new(),
            graves: BTreeMap::new(),
            factions: Vec::new(),
            relations: BTreeMap::new(),
            parties: BTreeMap::new(),
            envoys: BTreeMap::new(),
            voxels: BTreeMap::new(),
            designations: BTreeSet::new(),
            new_designations: Vec::new(),
            board: TaskBoard::new(),
            spawned: Vec::new(),
            spawn_counts: BTreeMap::new(),
            max_entities,
            next_id: 1,
        }
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    pub fn add_faction(&mut self, name: impl Into<String>) -> FactionId {
        let name = name.into();
        if let Some(id) = self.faction_id(&name) {
            return id;
        }
        self.factions.push(name);
        FactionId(self.factions.len() as u32 - 1)
    }

    pub fn faction_id(&self, name: &str) -> Option<FactionId> {
        self.factions
            .iter()
            .position(|f| f == name)
            .map(|i| FactionId(i as u32))
    }

    pub fn faction_name(&self, faction: FactionId) -> Option<&str> {
        self.factions.get(faction.0 as usize).map(String::as_str)
    }

    /// Relationships are symmetric.
    pub fn set_relationship(&mut self, a: FactionId, b: FactionId, relationship: Relationship) {
        self.relations.insert((a.min(b), a.max(b)), relationship);
    }

    /// Place a creature of a registered kind.
    pub fn add_creature(
        &mut self,
        kind: &str,
        faction: FactionId,
        position: Vec3,
    ) -> Result<EntityId, SpawnError> {
        let id = self.spawn(kind, position)?;
        self.set_faction(id, faction);
        Ok(id)
    }

    pub fn add_grave(&mut self, owner: FactionId, position: Vec3) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.graves.insert(id, Grave { position, owner });
        id
    }

    pub fn add_voxel(&mut self, voxel: VoxelCoord, hp: f32) {
        self.voxels.insert(voxel, hp.max(0.0));
    }

    /// Mark a solid voxel for digging. Returns `false` for air or an existing designation.
    pub fn designate_dig(&mut self, voxel: VoxelCoord) -> bool {
        if !self.voxels.contains_key(&voxel) || !self.designations.insert(voxel) {
            return false;
        }
        self.new_designations.push(voxel);
        true
    }

    pub fn designations(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        self.designations.iter().copied()
    }

    pub fn take_new_designations(&mut self) -> Vec<VoxelCoord> {
        std::mem::take(&mut self.new_designations)
    }

    /// Entities created since the last call, in creation order.
    pub fn take_spawned(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.spawned)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities.iter().map(|(id, e)| (*id, e))
    }

    pub fn living(&self, kind: &str) -> usize {
        self.entities
            .values()
            .filter(|e| e.alive && e.kind == kind)
            .count()
    }

    pub fn living_total(&self) -> usize {
        self.entities.values().filter(|e| e.alive).count()
    }

    /// Total ever spawned of `kind`, including the initial population.
    pub fn spawned_count(&self, kind: &str) -> u64 {
        self.spawn_counts.get(kind).copied().unwrap_or(0)
    }

    pub fn kill(&mut self, id: EntityId) {
        if let Some(e) = self.entities.get_mut(&id) {
            e.alive = false;
            e.health = 0.0;
        }
    }

    /// Drop dead entities from the world, returning their ids.
    pub fn remove_dead(&mut self) -> Vec<EntityId> {
        let dead: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| !e.alive)
            .map(|(id, _)| *id)
            .collect();
        for id in &dead {
            self.entities.remove(id);
            self.parties.remove(id);
            self.envoys.remove(id);
        }
        dead
    }

    pub fn voxel_hp(&self, voxel: VoxelCoord) -> Option<f32> {
        self.voxels.get(&voxel).copied()
    }

    pub fn grave_count(&self) -> usize {
        self.graves.len()
    }

    pub fn board_len(&self) -> usize {
        self.board.len()
    }
}

impl WorldView for SimWorld {
    type Agent = EntityId;
}

impl WorldMut for SimWorld {}

impl SpatialView for SimWorld {
    fn position(&self, agent: EntityId) -> Option<Vec3> {
        self.entities
            .get(&agent)
            .filter(|e| e.alive)
            .map(|e| e.position)
    }

    fn is_alive(&self, agent: EntityId) -> bool {
        self.entities.get(&agent).is_some_and(|e| e.alive)
    }

    fn body_position(&self, body: BodyId) -> Option<Vec3> {
        self.graves.get(&body).map(|g| g.position)
    }

    fn is_voxel_solid(&self, voxel: VoxelCoord) -> bool {
        self.voxels.contains_key(&voxel)
    }
}

impl SpatialMut for SimWorld {
    fn set_position(&mut self, agent: EntityId, position: Vec3) {
        if let Some(e) = self.entities.get_mut(&agent) {
            e.position = position;
        }
    }
}

impl FactionView for SimWorld {
    fn faction_of(&self, agent: EntityId) -> Option<FactionId> {
        self.entities.get(&agent).and_then(|e| e.faction)
    }

    fn factions(&self) -> Vec<FactionId> {
        (0..self.factions.len() as u32).map(FactionId).collect()
    }

    fn relationship(&self, a: FactionId, b: FactionId) -> Relationship {
        if a == b {
            return Relationship::Friendly;
        }
        self.relations
            .get(&(a.min(b), a.max(b)))
            .copied()
            .unwrap_or(Relationship::Neutral)
    }

    fn minions(&self, faction: FactionId) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| e.alive && e.faction == Some(faction))
            .map(|(id, _)| *id)
            .collect()
    }

    fn graves(&self, faction: FactionId) -> Vec<BodyId> {
        self.graves
            .iter()
            .filter(|(_, g)| g.owner == faction)
            .map(|(id, _)| *id)
            .collect()
    }

    fn party_of(&self, agent: EntityId) -> Option<PartyId> {
        self.parties.get(&agent).copied()
    }

    fn envoy_of(&self, agent: EntityId) -> Option<EnvoyId> {
        self.envoys.get(&agent).copied()
    }
}

impl FactionMut for SimWorld {
    fn set_faction(&mut self, agent: EntityId, faction: FactionId) {
        if let Some(e) = self.entities.get_mut(&agent) {
            e.faction = Some(faction);
        }
    }

    fn join_party(&mut self, party: PartyId, agent: EntityId) {
        if self.entities.contains_key(&agent) {
            self.parties.insert(agent, party);
        }
    }

    fn join_envoy(&mut self, envoy: EnvoyId, agent: EntityId) {
        if self.entities.contains_key(&agent) {
            self.envoys.insert(agent, envoy);
        }
    }
}

impl EntityFactory for SimWorld {
    fn spawn(&mut self, kind: &str, position: Vec3) -> Result<EntityId, SpawnError> {
        let Some(spec) = self.registry.get(kind) else {
            return Err(SpawnError::UnknownKind(kind.to_owned()));
        };
        if self.living_total() >= self.max_entities {
            return Err(SpawnError::NoFreeSlot {
                limit: self.max_entities,
            });
        }
        if !(position.x.is_finite() && position.y.is_finite() && position.z.is_finite()) {
            return Err(SpawnError::InvalidPosition {
                position,
                reason: "not finite",
            });
        }

        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(
            id,
            Entity {
                kind: kind.to_owned(),
                position,
                health: spec.health,
                faction: None,
                alive: true,
            },
        );
        *self.spawn_counts.entry(kind.to_owned()).or_default() += 1;
        self.spawned.push(id);
        tracing::debug!(entity = %id, kind, "entity spawned");
        Ok(id)
    }

    fn destroy_body(&mut self, body: BodyId) -> bool {
        self.graves.remove(&body).is_some()
    }
}

impl VoxelWorld for SimWorld {
    fn is_dig_designated(&self, voxel: VoxelCoord) -> bool {
        self.designations.contains(&voxel)
    }

    fn dig(&mut self, voxel: VoxelCoord, amount: f32) -> bool {
        let Some(hp) = self.voxels.get_mut(&voxel) else {
            return true;
        };
        *hp -= amount.max(0.0);
        if *hp > 0.0 {
            return false;
        }
        self.voxels.remove(&voxel);
        self.designations.remove(&voxel);
        tracing::debug!(?voxel, "voxel dug out");
        true
    }
}

impl CombatWorld for SimWorld {
    fn strike(&mut self, attacker: EntityId, victim: EntityId, damage: f32) -> bool {
        let Some(target) = self.entities.get_mut(&victim).filter(|e| e.alive) else {
            return false;
        };
        target.health -= damage.max(0.0);
        if target.health > 0.0 {
            return false;
        }
        target.alive = false;
        tracing::debug!(%attacker, %victim, "creature slain");
        true
    }
}

impl StatsView for SimWorld {
    fn stats(&self, agent: EntityId) -> Option<Stats> {
        let entity = self.entities.get(&agent)?;
        self.registry.get(&entity.kind).map(|k| k.stats)
    }
}

impl TaskBoardWorld for SimWorld {
    fn task_board(&mut self) -> &mut TaskBoard<SimWorld> {
        &mut self.board
    }
}

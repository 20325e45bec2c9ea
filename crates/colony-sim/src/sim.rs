//! The tick loop: step phase, lifecycle, batch phase.

use colony_core::{EntityId, SpatialView, TickContext, Vec3, VoxelCoord};
use colony_creatures::{
    Creature, CreatureStep, EnvoyId, FactionMut, KillVoxelTask, NecromancerConfig,
    NecromancerMind, PartyId, Wanderer,
};
use colony_task::{
    dispatch_orders_in, AssignConfig, AssignLedger, BoxTask, Order, Task, TaskBoardWorld,
    TaskState, Worker,
};
use colony_trace::TraceEvent;
use serde::Serialize;

use crate::config::{ConfigError, ScenarioConfig};
use crate::registry::{KindRegistry, MindKind};
use crate::world::SimWorld;

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    /// Creatures that stepped a task.
    pub stepped: usize,
    pub completed: usize,
    pub failed: usize,
    pub canceled: usize,
    pub spawned: usize,
    pub deaths: usize,
    pub assigned: usize,
    /// Tasks nobody could take, kept for the next batch phase.
    pub deferred: usize,
    /// Tasks nobody will ever be able to take.
    pub dropped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub tasks_completed: usize,
    pub tasks_failed: usize,
    pub tasks_canceled: usize,
    pub tasks_dropped: usize,
    pub skeletons_summoned: usize,
    pub creatures_alive: usize,
    pub deaths: usize,
}

pub struct Simulation {
    world: SimWorld,
    /// Sorted by agent id; ids only grow, so new controllers are appended.
    creatures: Vec<Creature<SimWorld>>,
    ctx: TickContext,
    assign: AssignConfig,
    retry_unassigned: bool,
    wander_seconds: f32,
    necromancer: NecromancerConfig,
    /// Tasks carried over to the next batch phase, with the agents allowed to take them.
    backlog: Vec<(BoxTask<SimWorld>, Option<Vec<EntityId>>)>,
    trace_enabled: bool,
    /// Events drained from controllers that were removed.
    retired_trace: Vec<TraceEvent>,
    summary: RunSummary,
}

impl Simulation {
    /// Build the world and one controller per initial creature.
    pub fn from_config(config: &ScenarioConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = KindRegistry::from_config(&config.kinds)?;
        let mut world = SimWorld::new(registry, config.max_entities);

        for name in &config.factions {
            world.add_faction(name.clone());
        }
        for rel in &config.relationships {
            let (Some(a), Some(b)) = (world.faction_id(&rel.a), world.faction_id(&rel.b)) else {
                return Err(ConfigError::UnknownFaction(format!("{}/{}", rel.a, rel.b)));
            };
            world.set_relationship(a, b, rel.relationship.into());
        }
        for creature in &config.creatures {
            let faction = world
                .faction_id(&creature.faction)
                .ok_or_else(|| ConfigError::UnknownFaction(creature.faction.clone()))?;
            let id = world.add_creature(&creature.kind, faction, Vec3::from(creature.position))?;
            if let Some(party) = creature.party {
                world.join_party(PartyId(party), id);
            }
            if let Some(envoy) = creature.envoy {
                world.join_envoy(EnvoyId(envoy), id);
            }
        }
        for grave in &config.graves {
            let faction = world
                .faction_id(&grave.faction)
                .ok_or_else(|| ConfigError::UnknownFaction(grave.faction.clone()))?;
            world.add_grave(faction, Vec3::from(grave.position));
        }
        for voxel in &config.voxels {
            let at = VoxelCoord::from(voxel.at);
            world.add_voxel(at, voxel.hp);
            if voxel.designated {
                world.designate_dig(at);
            }
        }

        let mut sim = Self {
            world,
            creatures: Vec::new(),
            ctx: TickContext::new(0, config.dt_seconds, config.seed),
            assign: config.assignment.to_assign_config(),
            retry_unassigned: config.assignment.retry_unassigned,
            wander_seconds: config.wander_seconds,
            necromancer: config.necromancer.to_necromancer_config(),
            backlog: Vec::new(),
            trace_enabled: false,
            retired_trace: Vec::new(),
            summary: RunSummary::default(),
        };
        let initial = sim.world.take_spawned();
        sim.adopt(initial);

        tracing::info!(
            creatures = sim.creatures.len(),
            graves = sim.world.grave_count(),
            seed = config.seed,
            "simulation ready"
        );
        Ok(sim)
    }

    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut SimWorld {
        &mut self.world
    }

    pub fn creatures(&self) -> &[Creature<SimWorld>] {
        &self.creatures
    }

    pub fn creature(&self, agent: EntityId) -> Option<&Creature<SimWorld>> {
        self.index_of(agent).map(|i| &self.creatures[i])
    }

    /// Tick that the next call to [`Simulation::tick`] will run.
    pub fn current_tick(&self) -> u64 {
        self.ctx.tick
    }

    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Start recording trace events on every controller, current and future.
    pub fn enable_trace(&mut self) {
        self.trace_enabled = true;
        for creature in &mut self.creatures {
            colony_trace::enable_log(creature.blackboard_mut());
        }
    }

    /// Drain recorded events, ordered by tick then agent.
    pub fn take_trace(&mut self) -> Vec<TraceEvent> {
        let mut events = std::mem::take(&mut self.retired_trace);
        for creature in &mut self.creatures {
            events.extend(colony_trace::take_log(creature.blackboard_mut()).events);
        }
        events.sort_by_key(|e| (e.tick, e.agent));
        events
    }

    /// Queue `task` on the next batch phase, for the scheduler to place.
    pub fn submit(&mut self, task: BoxTask<SimWorld>) {
        self.backlog.push((task, None));
    }

    /// Run one tick.
    pub fn tick(&mut self) -> TickReport {
        let ctx = self.ctx;
        let mut report = TickReport {
            tick: ctx.tick,
            ..TickReport::default()
        };

        self.step_phase(&ctx, &mut report);
        self.lifecycle_phase(&ctx, &mut report);
        self.batch_phase(&ctx, &mut report);

        self.summary.ticks += 1;
        self.summary.tasks_completed += report.completed;
        self.summary.tasks_failed += report.failed;
        self.summary.tasks_canceled += report.canceled;
        self.summary.tasks_dropped += report.dropped;
        self.summary.deaths += report.deaths;
        self.summary.creatures_alive = self.world.living_total();

        tracing::debug!(
            tick = ctx.tick,
            stepped = report.stepped,
            completed = report.completed,
            failed = report.failed,
            assigned = report.assigned,
            "tick done"
        );
        self.ctx = ctx.next();
        report
    }

    pub fn run(&mut self, ticks: u64) -> RunSummary {
        for _ in 0..ticks {
            self.tick();
        }
        tracing::info!(
            ticks = self.summary.ticks,
            completed = self.summary.tasks_completed,
            summoned = self.summary.skeletons_summoned,
            alive = self.summary.creatures_alive,
            "run finished"
        );
        self.summary.clone()
    }

    fn step_phase(&mut self, ctx: &TickContext, report: &mut TickReport) {
        for creature in &mut self.creatures {
            match creature.step(ctx, &mut self.world) {
                CreatureStep::Dead(reports) => report.canceled += reports.len(),
                CreatureStep::Idle => {}
                CreatureStep::Stepped(step) => {
                    report.stepped += 1;
                    match step.report.map(|r| r.state) {
                        Some(TaskState::Completed) => report.completed += 1,
                        Some(TaskState::Failed) => report.failed += 1,
                        _ => {}
                    }
                }
            }
        }
    }

    fn lifecycle_phase(&mut self, ctx: &TickContext, report: &mut TickReport) {
        let mut kept = Vec::with_capacity(self.creatures.len());
        for mut creature in std::mem::take(&mut self.creatures) {
            if self.world.is_alive(creature.agent()) {
                kept.push(creature);
                continue;
            }
            report.canceled += creature.cancel_all(ctx.tick).len();
            report.deaths += 1;
            self.retired_trace
                .extend(colony_trace::take_log(creature.blackboard_mut()).events);
            tracing::info!(agent = %creature.agent(), kind = creature.kind(), "creature died");
        }
        self.creatures = kept;
        self.world.remove_dead();

        let spawned = self.world.take_spawned();
        report.spawned = spawned.len();
        self.summary.skeletons_summoned += spawned
            .iter()
            .filter_map(|id| self.world.entity(*id))
            .filter(|e| e.kind == self.necromancer.skeleton_kind)
            .count();
        self.adopt(spawned);
    }

    /// Hand out retried, submitted and posted work.
    ///
    /// Batches that share a candidate set are merged so the scheduler sees them in one priority
    /// order, and a single ledger enforces `max_per_agent` across the whole phase. Unrestricted
    /// work goes first, then candidate-restricted batches, then direct orders.
    fn batch_phase(&mut self, ctx: &TickContext, report: &mut TickReport) {
        let mut open: Vec<BoxTask<SimWorld>> = Vec::new();
        let mut restricted: Vec<(Vec<EntityId>, Vec<BoxTask<SimWorld>>)> = Vec::new();
        let mut direct: Vec<Order<SimWorld>> = Vec::new();

        let mut file = |task: BoxTask<SimWorld>, candidates: Option<Vec<EntityId>>| {
            match candidates {
                None => open.push(task),
                Some(candidates) => {
                    match restricted.iter_mut().find(|(set, _)| *set == candidates) {
                        Some((_, tasks)) => tasks.push(task),
                        None => restricted.push((candidates, vec![task])),
                    }
                }
            }
        };
        for (task, candidates) in std::mem::take(&mut self.backlog) {
            file(task, candidates);
        }
        for order in self.world.task_board().drain() {
            match order {
                Order::Batch { tasks, candidates } => {
                    for task in tasks {
                        file(task, candidates.clone());
                    }
                }
                direct_order @ Order::Direct { .. } => direct.push(direct_order),
            }
        }
        for voxel in self.world.take_new_designations() {
            file(Box::new(KillVoxelTask::new(voxel)), None);
        }

        let mut orders: Vec<Order<SimWorld>> = Vec::new();
        if !open.is_empty() {
            orders.push(Order::Batch {
                tasks: open,
                candidates: None,
            });
        }
        orders.extend(
            restricted
                .into_iter()
                .map(|(candidates, tasks)| Order::Batch {
                    tasks,
                    candidates: Some(candidates),
                }),
        );
        orders.extend(direct);

        let mut ledger = AssignLedger::new();
        for order in orders {
            let candidates = match &order {
                Order::Direct { agent, .. } => Some(vec![*agent]),
                Order::Batch { candidates, .. } => candidates.clone(),
            };
            let dispatched = dispatch_orders_in(
                vec![order],
                &mut self.creatures,
                &self.world,
                &self.assign,
                &mut ledger,
            );
            report.assigned += dispatched.assignments.assigned.len();
            for assignment in &dispatched.assignments.assigned {
                if let Some(i) = self.index_of(assignment.agent) {
                    self.creatures[i].note_assigned(ctx.tick, assignment.task);
                }
            }

            for task in dispatched.assignments.unassigned {
                if self.retry_unassigned
                    && self.anyone_could_take(task.as_ref(), candidates.as_deref())
                {
                    report.deferred += 1;
                    self.backlog.push((task, candidates.clone()));
                } else {
                    report.dropped += 1;
                    tracing::warn!(
                        task = task.name(),
                        tick = ctx.tick,
                        "dropping unassignable task"
                    );
                }
            }
        }
    }

    /// Create controllers for freshly spawned entities.
    fn adopt(&mut self, spawned: Vec<EntityId>) {
        for id in spawned {
            let Some(entity) = self.world.entity(id) else {
                continue;
            };
            let Some(spec) = self.world.registry().get(&entity.kind) else {
                continue;
            };
            let creature = Creature::new(id, spec.name.clone(), spec.categories);
            let mut creature = match spec.mind {
                MindKind::None => creature,
                MindKind::Wanderer => creature.with_mind(Wanderer::new(self.wander_seconds)),
                MindKind::Necromancer => {
                    creature.with_mind(NecromancerMind::new(self.necromancer.clone()))
                }
            };
            if self.trace_enabled {
                colony_trace::enable_log(creature.blackboard_mut());
            }
            tracing::debug!(agent = %id, kind = creature.kind(), "controller created");
            self.creatures.push(creature);
        }
    }

    fn index_of(&self, agent: EntityId) -> Option<usize> {
        self.creatures
            .binary_search_by_key(&agent, |c| c.agent())
            .ok()
    }

    /// Whether some living creature, among `candidates` when given, could ever run `task`.
    fn anyone_could_take(
        &self,
        task: &dyn Task<SimWorld>,
        candidates: Option<&[EntityId]>,
    ) -> bool {
        self.creatures.iter().any(|c| {
            candidates.map_or(true, |only| only.contains(&c.agent()))
                && self.world.is_alive(c.agent())
                && c.categories().contains(task.category())
                && task.cost(c.agent(), &self.world).is_some()
        })
    }
}

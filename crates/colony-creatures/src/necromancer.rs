//! The necromancer: an enemy that raises skeletons, keeps them close and sends them to fight.
//!
//! Its mind hands out one long-running task at a time. When a hated faction owns an intact
//! grave, the task walks to the grave and raises a skeleton from it. Otherwise it runs the
//! summoning loop: refill the skeleton band when the summon cooldown allows, wander about on a
//! separate timer while calling stray skeletons back, and periodically order the band to attack
//! hated creatures in range. Timers and the skeleton list live on the necromancer's blackboard
//! so they survive from one task to the next.

use colony_act::{Act, ActStatus, BoxAct, Routine, Sequence, Wrap};
use colony_core::{
    AgentId, BbKey, Blackboard, BodyId, DeterministicRng, Target, TickContext, Timer, Vec3,
};
use colony_task::{BoxTask, Category, Priority};
use colony_trace::TraceEvent;

use crate::acts::{GoTo, Wander};
use crate::creature::Mind;
use crate::tasks::{ActTask, GoToEntityTask, KillEntityTask};
use crate::world::CreatureWorld;

const STATE_KEY_ID: u64 = 0xC010_4EC5_0000_0001;
const SUMMON_STREAM: u64 = 0x5EC0_0001;

#[derive(Debug, Clone, PartialEq)]
pub struct NecromancerConfig {
    pub max_skeletons: usize,
    /// Seconds between summons.
    pub summon_cooldown: f32,
    pub wander_period: f32,
    pub attack_period: f32,
    pub attack_range: f32,
    pub skeleton_kind: String,
    /// Skeletons farther away than this are called back while wandering.
    pub gather_distance: f32,
    /// Skeletons holding more tasks than this are left alone when gathering.
    pub gather_max_tasks: usize,
    pub grave_reach: f32,
}

impl Default for NecromancerConfig {
    fn default() -> Self {
        Self {
            max_skeletons: 3,
            summon_cooldown: 5.0,
            wander_period: 1.0,
            attack_period: 3.0,
            attack_range: 10.0,
            skeleton_kind: "skeleton".to_owned(),
            gather_distance: 4.0,
            gather_max_tasks: 1,
            grave_reach: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NecromancerState<A> {
    /// Live skeletons raised by this necromancer, oldest first.
    pub skeletons: Vec<A>,
    pub summon: Timer,
    pub wander: Timer,
    pub attack: Timer,
    /// Skeletons raised over the necromancer's lifetime.
    pub summoned: u64,
}

impl<A> NecromancerState<A> {
    pub fn new(config: &NecromancerConfig) -> Self {
        Self {
            skeletons: Vec::new(),
            summon: Timer::new(config.summon_cooldown, false).pre_triggered(),
            wander: Timer::new(config.wander_period, false),
            attack: Timer::new(config.attack_period, false),
            summoned: 0,
        }
    }
}

pub fn state_key<A: AgentId>() -> BbKey<NecromancerState<A>> {
    BbKey::new(STATE_KEY_ID)
}

#[derive(Debug, Clone, Default)]
pub struct NecromancerMind {
    config: NecromancerConfig,
}

impl NecromancerMind {
    pub fn new(config: NecromancerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NecromancerConfig {
        &self.config
    }

    pub fn state<A: AgentId>(blackboard: &Blackboard) -> Option<&NecromancerState<A>> {
        blackboard.get(state_key::<A>())
    }
}

/// First intact grave owned by a faction `agent`'s faction hates.
fn find_grave<W: CreatureWorld>(world: &W, agent: W::Agent) -> Option<BodyId> {
    let faction = world.faction_of(agent)?;
    world
        .hateful_factions(faction)
        .into_iter()
        .flat_map(|enemy| world.graves(enemy))
        .find(|&grave| world.body_position(grave).is_some())
}

impl<W> Mind<W> for NecromancerMind
where
    W: CreatureWorld,
{
    fn name(&self) -> &str {
        "necromancer"
    }

    fn on_idle(
        &mut self,
        _ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &mut Blackboard,
    ) -> Option<BoxTask<W>> {
        blackboard.get_or_insert_with(state_key::<W::Agent>(), || {
            NecromancerState::new(&self.config)
        });

        let config = self.config.clone();
        if let Some(grave) = find_grave(world, agent) {
            let task = ActTask::new(
                format!("summon from grave {grave}"),
                Priority::High,
                move |_: &TickContext, _: W::Agent, _: &W, _: &Blackboard| {
                    summon_from_grave::<W>(grave, &config)
                },
            )
            .with_category(Category::SUMMON)
            .with_target(Target::Body(grave));
            return Some(Box::new(task));
        }

        let task = ActTask::new(
            "summon skeletons",
            Priority::High,
            move |_: &TickContext, _: W::Agent, _: &W, _: &Blackboard| -> BoxAct<W> {
                Box::new(Wrap::new("summon skeletons", SummonLoop::new(config.clone())))
            },
        )
        .with_category(Category::SUMMON);
        Some(Box::new(task))
    }
}

/// Walk to `grave`, then raise one skeleton from it and destroy it.
///
/// Fails without side effects when the grave is gone by the time the necromancer gets there.
fn summon_from_grave<W: CreatureWorld>(grave: BodyId, config: &NecromancerConfig) -> BoxAct<W> {
    let kind = config.skeleton_kind.clone();
    let raise = Wrap::once(
        "raise skeleton",
        move |ctx: &TickContext, agent: W::Agent, world: &mut W, blackboard: &mut Blackboard| {
            let Some(at) = world.body_position(grave) else {
                tracing::debug!(agent = ?agent, %grave, "grave vanished before summoning");
                return ActStatus::Failure;
            };
            let Some(skeleton) = raise_skeleton(ctx, agent, world, blackboard, &kind, at) else {
                return ActStatus::Failure;
            };
            world.destroy_body(grave);
            if let Some(state) = blackboard.get_mut(state_key::<W::Agent>()) {
                state.skeletons.push(skeleton);
                state.summoned += 1;
            }
            ActStatus::Success
        },
    );

    let children: Vec<BoxAct<W>> = vec![
        Box::new(GoTo::<W::Agent>::new(
            Target::Body(grave),
            config.grave_reach,
        )),
        Box::new(raise),
    ];
    Box::new(Sequence::new(format!("summon from grave {grave}"), children))
}

/// Spawn one skeleton at `at` and enlist it with the necromancer's faction, war party and
/// trade envoy.
fn raise_skeleton<W: CreatureWorld>(
    ctx: &TickContext,
    necromancer: W::Agent,
    world: &mut W,
    blackboard: &mut Blackboard,
    kind: &str,
    at: Vec3,
) -> Option<W::Agent> {
    let skeleton = match world.spawn(kind, at) {
        Ok(skeleton) => skeleton,
        Err(err) => {
            tracing::warn!(agent = ?necromancer, %err, "summon failed");
            return None;
        }
    };

    if let Some(faction) = world.faction_of(necromancer) {
        world.set_faction(skeleton, faction);
    }
    if let Some(party) = world.party_of(necromancer) {
        world.join_party(party, skeleton);
    }
    if let Some(envoy) = world.envoy_of(necromancer) {
        world.join_envoy(envoy, skeleton);
    }

    tracing::debug!(agent = ?necromancer, skeleton = ?skeleton, "skeleton raised");
    colony_trace::emit(
        blackboard,
        TraceEvent::new(ctx.tick, "necro.summon")
            .for_agent(necromancer.stable_id())
            .with_a(skeleton.stable_id()),
    );
    Some(skeleton)
}

/// The summoning loop, one resume per tick.
///
/// Each pass prunes dead skeletons, then:
/// - summon cooldown ready and the band below the cap: refill the band and finish with
///   `Success` so the mind picks the next task, or `Failure` when no skeleton could be raised
///   (the cooldown stays ready for the next attempt); a full band leaves the loop running;
/// - wander timer ready: wander for `wander_period` seconds, calling stray skeletons back on
///   every step;
/// - attack timer ready: post attack tasks for hated creatures within range, to be shared out
///   among the skeletons by the scheduler.
pub struct SummonLoop {
    config: NecromancerConfig,
    wander: Option<Wander>,
}

impl SummonLoop {
    pub fn new(config: NecromancerConfig) -> Self {
        Self {
            config,
            wander: None,
        }
    }

    pub fn is_wandering(&self) -> bool {
        self.wander.is_some()
    }

    fn advance<W: CreatureWorld>(
        &mut self,
        state: &mut NecromancerState<W::Agent>,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActStatus {
        let dt = ctx.dt_seconds;

        if self.wander.is_none() {
            state.skeletons.retain(|&s| world.is_alive(s));

            if state.summon.has_triggered() && state.skeletons.len() < self.config.max_skeletons {
                if self.summon_to_cap(state, ctx, agent, world, blackboard) == 0 {
                    return ActStatus::Failure;
                }
                state.summon.reset(self.config.summon_cooldown);
                return ActStatus::Success;
            }
            state.summon.update(dt);

            if !state.wander.has_triggered() {
                self.check_attack(state, ctx, agent, world, blackboard);
                return ActStatus::Running;
            }
            self.wander = Some(Wander::new(self.config.wander_period));
        }

        let Some(wander) = self.wander.as_mut() else {
            return ActStatus::Running;
        };
        let status = Act::<W>::step(wander, ctx, agent, world, blackboard);
        self.gather(state, agent, world);
        if status.is_terminal() {
            self.wander = None;
            self.check_attack(state, ctx, agent, world, blackboard);
        }
        ActStatus::Running
    }

    /// Raise skeletons until the band is full or a spawn fails; returns how many were raised.
    fn summon_to_cap<W: CreatureWorld>(
        &self,
        state: &mut NecromancerState<W::Agent>,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> usize {
        let Some(home) = world.position(agent) else {
            return 0;
        };
        let mut rng = ctx.rng_for_agent(agent, SUMMON_STREAM);

        let before = state.skeletons.len();
        while state.skeletons.len() < self.config.max_skeletons {
            let jitter = Vec3::new(rng.range_f32(-1.0, 1.0), 0.0, rng.range_f32(-1.0, 1.0));
            let kind = &self.config.skeleton_kind;
            let Some(skeleton) = raise_skeleton(ctx, agent, world, blackboard, kind, home + jitter)
            else {
                break;
            };
            state.skeletons.push(skeleton);
            state.summoned += 1;
        }
        let raised = state.skeletons.len() - before;
        if raised > 0 {
            tracing::info!(
                agent = ?agent,
                raised,
                band = state.skeletons.len(),
                "necromancer summoned skeletons"
            );
        }
        raised
    }

    /// Call skeletons that strayed too far back to the necromancer.
    fn gather<W: CreatureWorld>(
        &self,
        state: &NecromancerState<W::Agent>,
        agent: W::Agent,
        world: &mut W,
    ) {
        let Some(home) = world.position(agent) else {
            return;
        };
        for &skeleton in &state.skeletons {
            let Some(pos) = world.position(skeleton) else {
                continue;
            };
            if pos.distance(home) <= self.config.gather_distance {
                continue;
            }
            let task = GoToEntityTask::new(agent, Priority::High);
            world
                .task_board()
                .post_direct_if_idle(skeleton, Box::new(task), self.config.gather_max_tasks);
        }
    }

    /// Advance the wander and attack timers, ordering an attack when the latter is ready.
    fn check_attack<W: CreatureWorld>(
        &self,
        state: &mut NecromancerState<W::Agent>,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        state.wander.update(ctx.dt_seconds);
        if state.attack.has_triggered() {
            self.order_attack(state, ctx, agent, world, blackboard);
        }
        state.attack.update(ctx.dt_seconds);
    }

    fn order_attack<W: CreatureWorld>(
        &self,
        state: &NecromancerState<W::Agent>,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        let (Some(faction), Some(home)) = (world.faction_of(agent), world.position(agent)) else {
            return;
        };

        let mut tasks: Vec<BoxTask<W>> = Vec::new();
        for enemy in world.hateful_factions(faction) {
            for minion in world.minions(enemy) {
                let in_range = world.is_alive(minion)
                    && world
                        .position(minion)
                        .is_some_and(|p| p.distance(home) < self.config.attack_range);
                if in_range {
                    tasks.push(Box::new(KillEntityTask::new(minion)));
                }
            }
        }
        if tasks.is_empty() {
            return;
        }

        let band: Vec<W::Agent> = state
            .skeletons
            .iter()
            .copied()
            .filter(|&s| world.is_alive(s))
            .collect();
        tracing::debug!(agent = ?agent, targets = tasks.len(), band = band.len(), "attack ordered");
        colony_trace::emit(
            blackboard,
            TraceEvent::new(ctx.tick, "necro.attack_order")
                .for_agent(agent.stable_id())
                .with_a(tasks.len() as u64)
                .with_b(band.len() as u64),
        );
        world.task_board().post_batch(tasks, Some(band));
    }
}

impl<W> Routine<W> for SummonLoop
where
    W: CreatureWorld,
{
    fn resume(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Option<ActStatus> {
        let key = state_key::<W::Agent>();
        let mut state = blackboard
            .remove(key)
            .unwrap_or_else(|| NecromancerState::new(&self.config));
        let status = self.advance(&mut state, ctx, agent, world, blackboard);
        blackboard.set(key, state);
        Some(status)
    }
}

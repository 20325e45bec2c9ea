//! Leaf acts shared by creature tasks.

use colony_act::{Act, ActStatus};
use colony_core::{
    Blackboard, DeterministicRng, SpatialMut, Target, TickContext, Timer, Vec3, VoxelCoord,
};

use crate::world::{CombatWorld, Stats, StatsView, VoxelWorld};

const WANDER_STREAM: u64 = 0x57A4_DE00;

fn stats_of<W: StatsView>(world: &W, agent: W::Agent) -> Stats {
    world.stats(agent).unwrap_or_default()
}

/// Move `agent` toward `goal` for one tick. Returns `true` once within `radius`.
fn approach<W>(ctx: &TickContext, agent: W::Agent, world: &mut W, goal: Vec3, radius: f32) -> bool
where
    W: SpatialMut + StatsView,
{
    let Some(pos) = world.position(agent) else {
        return false;
    };
    if pos.distance(goal) <= radius {
        return true;
    }
    let step = stats_of(&*world, agent).speed.max(0.0) * ctx.dt_seconds.max(0.0);
    let next = pos.step_towards(goal, step);
    world.set_position(agent, next);
    next.distance(goal) <= radius
}

/// Walk in a straight line until within `radius` of a target.
///
/// Fails as soon as the target stops being valid (dead agent, destroyed body or voxel), or the
/// walker itself has no position.
#[derive(Debug, Clone)]
pub struct GoTo<A> {
    target: Target<A>,
    radius: f32,
    name: String,
}

impl<A: core::fmt::Debug> GoTo<A> {
    pub fn new(target: Target<A>, radius: f32) -> Self {
        Self {
            name: format!("go to {target:?}"),
            target,
            radius: radius.max(0.0),
        }
    }

    pub fn target(&self) -> &Target<A> {
        &self.target
    }
}

impl<W> Act<W> for GoTo<W::Agent>
where
    W: SpatialMut + StatsView + 'static,
{
    fn step(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> ActStatus {
        if !world.is_target_valid(self.target) || world.position(agent).is_none() {
            return ActStatus::Failure;
        }
        let Some(goal) = world.target_position(self.target) else {
            return ActStatus::Failure;
        };
        if approach(ctx, agent, world, goal, self.radius) {
            ActStatus::Success
        } else {
            ActStatus::Running
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Amble along a random horizontal heading for a fixed time.
#[derive(Debug, Clone)]
pub struct Wander {
    clock: Timer,
    heading: Option<Vec3>,
    speed_scale: f32,
}

impl Wander {
    pub fn new(seconds: f32) -> Self {
        Self {
            clock: Timer::new(seconds, true),
            heading: None,
            speed_scale: 0.5,
        }
    }

    pub fn with_speed_scale(mut self, scale: f32) -> Self {
        self.speed_scale = scale.max(0.0);
        self
    }
}

impl<W> Act<W> for Wander
where
    W: SpatialMut + StatsView + 'static,
{
    fn step(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> ActStatus {
        let Some(pos) = world.position(agent) else {
            return ActStatus::Failure;
        };

        let heading = *self.heading.get_or_insert_with(|| {
            let mut rng = ctx.rng_for_agent(agent, WANDER_STREAM);
            let angle = rng.range_f32(0.0, core::f32::consts::TAU);
            Vec3::new(angle.cos(), 0.0, angle.sin())
        });

        let dt = ctx.dt_seconds.max(0.0);
        let step = stats_of(&*world, agent).speed * self.speed_scale * dt;
        world.set_position(agent, pos + heading * step);

        if self.clock.update(dt) {
            ActStatus::Success
        } else {
            ActStatus::Running
        }
    }

    fn name(&self) -> &str {
        "wander"
    }
}

/// Chase another agent and hit it until it dies.
#[derive(Debug, Clone)]
pub struct KillEntity<A> {
    victim: A,
    swing: Option<Timer>,
    name: String,
}

impl<A: core::fmt::Debug> KillEntity<A> {
    pub fn new(victim: A) -> Self {
        Self {
            name: format!("kill {victim:?}"),
            victim,
            swing: None,
        }
    }
}

impl<W> Act<W> for KillEntity<W::Agent>
where
    W: CombatWorld + StatsView + 'static,
{
    fn step(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> ActStatus {
        if !world.is_alive(self.victim) {
            return ActStatus::Success;
        }
        let Some(goal) = world.position(self.victim) else {
            return ActStatus::Failure;
        };

        let stats = stats_of(&*world, agent);
        if !approach(ctx, agent, world, goal, stats.attack_range) {
            return if world.position(agent).is_some() {
                ActStatus::Running
            } else {
                ActStatus::Failure
            };
        }

        let swing = self
            .swing
            .get_or_insert_with(|| Timer::new(stats.attack_period, false).pre_triggered());
        let ready = swing.has_triggered();
        swing.update(ctx.dt_seconds);
        if ready && world.strike(agent, self.victim, stats.damage) {
            return ActStatus::Success;
        }
        ActStatus::Running
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Hack at a voxel until it is gone.
#[derive(Debug, Clone)]
pub struct Dig {
    voxel: VoxelCoord,
}

impl Dig {
    pub fn new(voxel: VoxelCoord) -> Self {
        Self { voxel }
    }
}

impl<W> Act<W> for Dig
where
    W: VoxelWorld + StatsView + 'static,
{
    fn step(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> ActStatus {
        if !world.is_voxel_solid(self.voxel) {
            return ActStatus::Success;
        }
        let amount = stats_of(&*world, agent).dig_rate * ctx.dt_seconds.max(0.0);
        if world.dig(self.voxel, amount) {
            ActStatus::Success
        } else {
            ActStatus::Running
        }
    }

    fn name(&self) -> &str {
        "dig"
    }
}

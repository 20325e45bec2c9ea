//! Task kinds creatures take on.

use std::borrow::Cow;

use colony_act::{BoxAct, Domain, Sequence};
use colony_core::{Blackboard, SpatialMut, Target, TickContext, VoxelCoord, WorldMut, WorldView};
use colony_task::{Category, Priority, Task};

use crate::acts::{Dig, GoTo, KillEntity, Wander};
use crate::world::{CombatWorld, StatsView, VoxelWorld};

type ActFactory<W> =
    Box<dyn Fn(&TickContext, <W as WorldView>::Agent, &W, &Blackboard) -> BoxAct<W>>;

/// A task whose act tree comes from a closure.
pub struct ActTask<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    priority: Priority,
    category: Category,
    target: Option<Target<W::Agent>>,
    factory: ActFactory<W>,
}

impl<W> ActTask<W>
where
    W: WorldMut + 'static,
{
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        priority: Priority,
        factory: impl Fn(&TickContext, W::Agent, &W, &Blackboard) -> BoxAct<W> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            priority,
            category: Category::MOVE,
            target: None,
            factory: Box::new(factory),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Cost candidates by their distance to `target`.
    pub fn with_target(mut self, target: Target<W::Agent>) -> Self {
        self.target = Some(target);
        self
    }
}

impl<W> Task<W> for ActTask<W>
where
    W: SpatialMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn category(&self) -> Category {
        self.category
    }

    fn cost(&self, agent: W::Agent, world: &W) -> Option<f32> {
        match self.target {
            Some(target) => world.distance_to(agent, target),
            None => Some(0.0),
        }
    }

    fn create_act(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &Blackboard,
    ) -> BoxAct<W> {
        (self.factory)(ctx, agent, world, blackboard)
    }
}

/// Walk up to another creature.
#[derive(Debug, Clone)]
pub struct GoToEntityTask<A> {
    target: A,
    radius: f32,
    priority: Priority,
    name: String,
}

impl<A: core::fmt::Debug> GoToEntityTask<A> {
    pub fn new(target: A, priority: Priority) -> Self {
        Self {
            name: format!("go to {target:?}"),
            target,
            radius: 2.0,
            priority,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }
}

impl<W> Task<W> for GoToEntityTask<W::Agent>
where
    W: SpatialMut + StatsView + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn category(&self) -> Category {
        Category::MOVE
    }

    fn cost(&self, agent: W::Agent, world: &W) -> Option<f32> {
        world.distance_to(agent, Target::Agent(self.target))
    }

    fn create_act(
        &self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &W,
        _blackboard: &Blackboard,
    ) -> BoxAct<W> {
        Box::new(GoTo::new(Target::Agent(self.target), self.radius))
    }
}

/// Hunt down another creature.
#[derive(Debug, Clone)]
pub struct KillEntityTask<A> {
    victim: A,
    priority: Priority,
    name: String,
}

impl<A: core::fmt::Debug> KillEntityTask<A> {
    pub fn new(victim: A) -> Self {
        Self {
            name: format!("kill {victim:?}"),
            victim,
            priority: Priority::High,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn victim(&self) -> &A {
        &self.victim
    }
}

impl<W> Task<W> for KillEntityTask<W::Agent>
where
    W: CombatWorld + StatsView + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn category(&self) -> Category {
        Category::ATTACK
    }

    fn cost(&self, agent: W::Agent, world: &W) -> Option<f32> {
        if agent == self.victim {
            return None;
        }
        world.distance_to(agent, Target::Agent(self.victim))
    }

    fn create_act(
        &self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &W,
        _blackboard: &Blackboard,
    ) -> BoxAct<W> {
        Box::new(KillEntity::new(self.victim))
    }
}

/// Dig out a designated voxel: walk within reach, then hack at it.
///
/// The designation is checked once when the task starts; a voxel that is undesignated by then
/// fails the task without moving.
#[derive(Debug, Clone)]
pub struct KillVoxelTask {
    voxel: VoxelCoord,
    priority: Priority,
    name: String,
}

impl KillVoxelTask {
    pub const REACH: f32 = 2.0;

    pub fn new(voxel: VoxelCoord) -> Self {
        Self {
            name: format!("dig {},{},{}", voxel.x, voxel.y, voxel.z),
            voxel,
            priority: Priority::Medium,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn voxel(&self) -> VoxelCoord {
        self.voxel
    }
}

impl<W> Task<W> for KillVoxelTask
where
    W: VoxelWorld + StatsView + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn category(&self) -> Category {
        Category::DIG
    }

    fn cost(&self, agent: W::Agent, world: &W) -> Option<f32> {
        if !world.is_dig_designated(self.voxel) || !world.is_voxel_solid(self.voxel) {
            return None;
        }
        world.distance_to(agent, Target::Voxel(self.voxel))
    }

    fn create_act(
        &self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &W,
        _blackboard: &Blackboard,
    ) -> BoxAct<W> {
        let voxel = self.voxel;
        Box::new(Domain::new(
            self.name.clone(),
            move |_: &TickContext, _: W::Agent, world: &W, _: &Blackboard| {
                world.is_dig_designated(voxel)
            },
            move |_: &TickContext, _: W::Agent, _: &W, _: &Blackboard| -> BoxAct<W> {
                let children: Vec<BoxAct<W>> = vec![
                    Box::new(GoTo::<W::Agent>::new(
                        Target::Voxel(voxel),
                        KillVoxelTask::REACH,
                    )),
                    Box::new(Dig::new(voxel)),
                ];
                Box::new(Sequence::new("reach and dig", children))
            },
        ))
    }
}

/// Idle filler: wander for a while.
#[derive(Debug, Clone)]
pub struct WanderTask {
    seconds: f32,
}

impl WanderTask {
    pub fn new(seconds: f32) -> Self {
        Self { seconds }
    }
}

impl<W> Task<W> for WanderTask
where
    W: SpatialMut + StatsView + 'static,
{
    fn name(&self) -> &str {
        "wander"
    }

    fn priority(&self) -> Priority {
        Priority::Idle
    }

    fn category(&self) -> Category {
        Category::MOVE
    }

    fn create_act(
        &self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &W,
        _blackboard: &Blackboard,
    ) -> BoxAct<W> {
        Box::new(Wander::new(self.seconds))
    }
}

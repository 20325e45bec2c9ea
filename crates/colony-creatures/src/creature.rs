use colony_core::{AgentId, Blackboard, SpatialMut, TickContext, WorldMut};
use colony_task::{BoxTask, Category, QueueStep, TaskId, TaskQueue, TaskReport, Worker};
use colony_trace::TraceEvent;

use crate::tasks::WanderTask;
use crate::world::StatsView;

/// Per-creature decision logic consulted whenever the creature runs out of work.
pub trait Mind<W>: 'static
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str;

    /// Produce a task for an idle creature, or `None` to stay idle this tick.
    fn on_idle(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &mut Blackboard,
    ) -> Option<BoxTask<W>>;
}

/// Default mind: wander about when there is nothing else to do.
#[derive(Debug, Clone)]
pub struct Wanderer {
    seconds: f32,
}

impl Wanderer {
    pub fn new(seconds: f32) -> Self {
        Self { seconds }
    }
}

impl<W> Mind<W> for Wanderer
where
    W: SpatialMut + StatsView + 'static,
{
    fn name(&self) -> &str {
        "wanderer"
    }

    fn on_idle(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &W,
        _blackboard: &mut Blackboard,
    ) -> Option<BoxTask<W>> {
        Some(Box::new(WanderTask::new(self.seconds)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatureStep {
    /// The creature is dead; everything it held was canceled.
    Dead(Vec<TaskReport>),
    /// Nothing to do this tick.
    Idle,
    Stepped(QueueStep),
}

/// Controller of one creature: its blackboard, task queue and optional mind.
pub struct Creature<W>
where
    W: WorldMut + 'static,
{
    agent: W::Agent,
    kind: String,
    categories: Category,
    blackboard: Blackboard,
    tasks: TaskQueue<W>,
    mind: Option<Box<dyn Mind<W>>>,
}

impl<W> Creature<W>
where
    W: SpatialMut + 'static,
{
    pub fn new(agent: W::Agent, kind: impl Into<String>, categories: Category) -> Self {
        Self {
            agent,
            kind: kind.into(),
            categories,
            blackboard: Blackboard::new(),
            tasks: TaskQueue::new(),
            mind: None,
        }
    }

    pub fn with_mind(mut self, mind: impl Mind<W>) -> Self {
        self.mind = Some(Box::new(mind));
        self
    }

    pub fn agent(&self) -> W::Agent {
        self.agent
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn mind_name(&self) -> Option<&str> {
        self.mind.as_ref().map(|m| m.name())
    }

    /// Tasks held, the active one included.
    pub fn tasks_len(&self) -> usize {
        self.tasks.len()
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    /// Queue `task` unless an equivalent one is already held.
    pub fn assign(&mut self, tick: u64, task: BoxTask<W>) -> Option<TaskId> {
        if self.tasks.contains(task.as_ref()) {
            return None;
        }
        let priority = task.priority();
        let id = self.tasks.enqueue(task);
        self.trace_enqueued(tick, id, priority.rank());
        Some(id)
    }

    /// Record that the scheduler placed task `id` into this creature's queue.
    pub fn note_assigned(&mut self, tick: u64, id: TaskId) {
        let rank = self
            .tasks
            .iter()
            .find(|(held, _, _)| *held == id)
            .map(|(_, task, _)| task.priority().rank());
        if let Some(rank) = rank {
            self.trace_enqueued(tick, id, rank);
        }
    }

    fn trace_enqueued(&mut self, tick: u64, id: TaskId, rank: u8) {
        colony_trace::emit(
            &mut self.blackboard,
            TraceEvent::new(tick, "task.enqueue")
                .for_agent(self.agent.stable_id())
                .with_a(id.0)
                .with_b(rank as u64),
        );
    }

    pub fn cancel(&mut self, tick: u64, id: TaskId) -> Option<TaskReport> {
        let report = self.tasks.cancel(id)?;
        colony_trace::emit(&mut self.blackboard, report.trace_event(tick, self.agent));
        Some(report)
    }

    pub fn cancel_all(&mut self, tick: u64) -> Vec<TaskReport> {
        let reports = self.tasks.cancel_all();
        for report in &reports {
            colony_trace::emit(&mut self.blackboard, report.trace_event(tick, self.agent));
        }
        reports
    }

    /// Advance the creature by one tick.
    ///
    /// A dead creature has its whole queue canceled. An idle one asks its mind for work first;
    /// whatever task is then at the head of the queue is stepped once.
    pub fn step(&mut self, ctx: &TickContext, world: &mut W) -> CreatureStep {
        if !world.is_alive(self.agent) {
            return CreatureStep::Dead(self.cancel_all(ctx.tick));
        }

        if self.tasks.is_empty() {
            if let Some(mind) = self.mind.as_mut() {
                if let Some(task) = mind.on_idle(ctx, self.agent, world, &mut self.blackboard) {
                    self.assign(ctx.tick, task);
                }
            }
        }

        match self
            .tasks
            .step(ctx, self.agent, world, &mut self.blackboard)
        {
            Some(step) => CreatureStep::Stepped(step),
            None => CreatureStep::Idle,
        }
    }
}

impl<W> Worker<W> for Creature<W>
where
    W: SpatialMut + 'static,
{
    fn agent(&self) -> W::Agent {
        self.agent
    }

    fn categories(&self) -> Category {
        self.categories
    }

    fn tasks(&self) -> &TaskQueue<W> {
        &self.tasks
    }

    fn tasks_mut(&mut self) -> &mut TaskQueue<W> {
        &mut self.tasks
    }

    fn is_available(&self, world: &W) -> bool {
        world.is_alive(self.agent)
    }
}

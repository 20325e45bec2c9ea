use core::fmt;

use colony_act::BoxAct;
use colony_core::{AgentId, Blackboard, TickContext, WorldMut};
use colony_trace::TraceEvent;

use crate::priority::{Category, Priority};

/// Identity of a task inside the queue that accepted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Lifecycle of a task. `Unassigned` tasks sit on a board or in a scheduler batch; a queue only
/// ever holds `Queued` and `Active` ones. `Completed`, `Failed` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    Unassigned,
    Queued,
    Active,
    Completed,
    Failed,
    Canceled,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled
        )
    }

    pub(crate) fn trace_tag(self) -> &'static str {
        match self {
            TaskState::Unassigned => "task.unassigned",
            TaskState::Queued => "task.enqueue",
            TaskState::Active => "task.activate",
            TaskState::Completed => "task.success",
            TaskState::Failed => "task.failure",
            TaskState::Canceled => "task.cancel",
        }
    }
}

/// A unit of assignable work.
///
/// Tasks carry no execution state of their own: `create_act` is a factory, called once when the
/// task becomes active in some agent's queue. The returned tree belongs to that agent alone.
pub trait Task<W>: 'static
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str;

    fn priority(&self) -> Priority;

    fn category(&self) -> Category;

    /// Cost of `agent` carrying this task out. `None` means the agent cannot do it at all.
    fn cost(&self, agent: W::Agent, world: &W) -> Option<f32> {
        let _ = (agent, world);
        Some(0.0)
    }

    fn create_act(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &Blackboard,
    ) -> BoxAct<W>;

    /// Two tasks are equivalent when an agent holding one should not be handed the other.
    fn is_equivalent(&self, other: &dyn Task<W>) -> bool {
        self.name() == other.name()
    }
}

pub type BoxTask<W> = Box<dyn Task<W>>;

/// What happened to a task, reported when it leaves a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub id: TaskId,
    pub name: String,
    pub priority: Priority,
    pub state: TaskState,
    /// Act steps taken while active.
    pub steps: u64,
}

impl TaskReport {
    pub fn trace_event<A: AgentId>(&self, tick: u64, agent: A) -> TraceEvent {
        TraceEvent::new(tick, self.state.trace_tag())
            .for_agent(agent.stable_id())
            .with_a(self.id.0)
            .with_b(self.priority.rank() as u64)
    }
}

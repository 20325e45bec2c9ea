//! Per-agent task queue: priority-ordered pending tasks plus one active act tree.

use colony_act::{ActStatus, ActTree, Outcome};
use colony_core::{Blackboard, TickContext, WorldMut};

use crate::task::{BoxTask, Task, TaskId, TaskReport, TaskState};

struct Entry<W>
where
    W: WorldMut + 'static,
{
    id: TaskId,
    task: BoxTask<W>,
}

struct Active<W>
where
    W: WorldMut + 'static,
{
    entry: Entry<W>,
    tree: ActTree<W>,
}

/// Result of stepping a queue once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStep {
    pub task: TaskId,
    /// Set when the task was activated by this step.
    pub activated: bool,
    pub status: ActStatus,
    /// Set when the task terminated on this step.
    pub report: Option<TaskReport>,
}

/// Tasks held by one agent.
///
/// Pending tasks are kept ordered by priority, highest first; equal priorities keep insertion
/// order. At most one task is active. An active task is never preempted by a newly enqueued
/// one, even of higher priority; it runs until it finishes or is canceled.
pub struct TaskQueue<W>
where
    W: WorldMut + 'static,
{
    pending: Vec<Entry<W>>,
    active: Option<Active<W>>,
    next_id: u64,
}

impl<W> Default for TaskQueue<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<W> TaskQueue<W>
where
    W: WorldMut + 'static,
{
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            active: None,
            next_id: 1,
        }
    }

    /// Active plus pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len() + usize::from(self.active.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn active_id(&self) -> Option<TaskId> {
        self.active.as_ref().map(|a| a.entry.id)
    }

    pub fn active_task(&self) -> Option<&dyn Task<W>> {
        self.active.as_ref().map(|a| a.entry.task.as_ref())
    }

    pub fn state_of(&self, id: TaskId) -> Option<TaskState> {
        if self.active_id() == Some(id) {
            return Some(TaskState::Active);
        }
        self.pending
            .iter()
            .any(|e| e.id == id)
            .then_some(TaskState::Queued)
    }

    /// All held tasks, the active one first, then pending tasks in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &dyn Task<W>, TaskState)> + '_ {
        let active = self
            .active
            .iter()
            .map(|a| (a.entry.id, a.entry.task.as_ref(), TaskState::Active));
        let pending = self
            .pending
            .iter()
            .map(|e| (e.id, e.task.as_ref(), TaskState::Queued));
        active.chain(pending)
    }

    pub fn ids(&self) -> Vec<TaskId> {
        self.iter().map(|(id, _, _)| id).collect()
    }

    /// `true` when an equivalent task is already held, active or pending.
    pub fn contains(&self, task: &dyn Task<W>) -> bool {
        self.iter().any(|(_, held, _)| held.is_equivalent(task))
    }

    pub fn enqueue(&mut self, task: BoxTask<W>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        let priority = task.priority();
        let at = self
            .pending
            .partition_point(|e| e.task.priority() >= priority);
        tracing::debug!(task = task.name(), %id, %priority, "task queued");
        self.pending.insert(at, Entry { id, task });
        id
    }

    /// The running act tree, activating the head of the pending list when nothing is active.
    pub fn active_or_next(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &mut Blackboard,
    ) -> Option<&mut ActTree<W>> {
        self.activate_next(ctx, agent, world, blackboard);
        self.active.as_mut().map(|a| &mut a.tree)
    }

    fn activate_next(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &mut Blackboard,
    ) -> bool {
        if self.active.is_some() || self.pending.is_empty() {
            return false;
        }

        let entry = self.pending.remove(0);
        let tree = ActTree::new(entry.task.create_act(ctx, agent, world, blackboard));
        tracing::debug!(task = entry.task.name(), id = %entry.id, "task activated");
        colony_trace::emit(
            blackboard,
            self.report(&entry, TaskState::Active, 0)
                .trace_event(ctx.tick, agent),
        );
        self.active = Some(Active { entry, tree });
        true
    }

    /// Step the active task once, activating the next pending task first if needed.
    ///
    /// Returns `None` when the queue holds nothing. A task whose tree terminates is removed
    /// and reported; the next pending task is not activated until the following step.
    pub fn step(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Option<QueueStep> {
        let activated = self.activate_next(ctx, agent, world, blackboard);
        let active = self.active.as_mut()?;

        let status = active.tree.step(ctx, agent, world, blackboard);
        let task = active.entry.id;

        let report = match status.outcome() {
            None => None,
            Some(outcome) => {
                let done = self.active.take()?;
                let state = match outcome {
                    Outcome::Success => TaskState::Completed,
                    Outcome::Failure => TaskState::Failed,
                };
                let report = self.report(&done.entry, state, done.tree.steps());
                tracing::debug!(
                    task = %report.name,
                    id = %report.id,
                    state = ?report.state,
                    steps = report.steps,
                    "task finished"
                );
                colony_trace::emit(blackboard, report.trace_event(ctx.tick, agent));
                Some(report)
            }
        };

        Some(QueueStep {
            task,
            activated,
            status,
            report,
        })
    }

    /// Remove a task without running it further. An active task's tree is dropped unstepped.
    pub fn cancel(&mut self, id: TaskId) -> Option<TaskReport> {
        self.release(id).map(|(entry, steps)| {
            tracing::debug!(task = entry.task.name(), %id, "task canceled");
            self.report(&entry, TaskState::Canceled, steps)
        })
    }

    /// Cancel everything, the active task first.
    pub fn cancel_all(&mut self) -> Vec<TaskReport> {
        self.ids()
            .into_iter()
            .filter_map(|id| self.cancel(id))
            .collect()
    }

    /// Give a task back without recording an outcome so it can be handed to another agent.
    pub fn take(&mut self, id: TaskId) -> Option<BoxTask<W>> {
        self.release(id).map(|(entry, _)| entry.task)
    }

    fn release(&mut self, id: TaskId) -> Option<(Entry<W>, u64)> {
        if self.active_id() == Some(id) {
            return self.active.take().map(|a| (a.entry, a.tree.steps()));
        }
        let at = self.pending.iter().position(|e| e.id == id)?;
        Some((self.pending.remove(at), 0))
    }

    fn report(&self, entry: &Entry<W>, state: TaskState, steps: u64) -> TaskReport {
        TaskReport {
            id: entry.id,
            name: entry.task.name().to_owned(),
            priority: entry.task.priority(),
            state,
            steps,
        }
    }
}

//! Greedy multi-agent task assignment.

use core::cmp::Reverse;
use std::collections::BTreeMap;

use colony_core::{AgentId, WorldMut};

use crate::priority::Category;
use crate::queue::TaskQueue;
use crate::task::{BoxTask, TaskId};

/// An agent the scheduler may hand tasks to.
pub trait Worker<W>
where
    W: WorldMut + 'static,
{
    fn agent(&self) -> W::Agent;

    /// Categories this worker is permitted to take.
    fn categories(&self) -> Category;

    fn tasks(&self) -> &TaskQueue<W>;

    fn tasks_mut(&mut self) -> &mut TaskQueue<W>;

    fn is_available(&self, world: &W) -> bool {
        let _ = world;
        true
    }
}

impl<W, K> Worker<W> for &mut K
where
    W: WorldMut + 'static,
    K: Worker<W> + ?Sized,
{
    fn agent(&self) -> W::Agent {
        (**self).agent()
    }

    fn categories(&self) -> Category {
        (**self).categories()
    }

    fn tasks(&self) -> &TaskQueue<W> {
        (**self).tasks()
    }

    fn tasks_mut(&mut self) -> &mut TaskQueue<W> {
        (**self).tasks_mut()
    }

    fn is_available(&self, world: &W) -> bool {
        (**self).is_available(world)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignConfig {
    /// Most tasks a single agent may receive from one scheduling call.
    pub max_per_agent: usize,
    /// Added to a task's cost per task already held by the candidate.
    pub load_weight: f32,
    /// Agents already holding this many tasks are skipped. `None` disables the limit.
    pub max_queue_len: Option<usize>,
}

impl Default for AssignConfig {
    fn default() -> Self {
        Self {
            max_per_agent: 1,
            load_weight: 1.0,
            max_queue_len: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment<A> {
    pub agent: A,
    pub task: TaskId,
    pub name: String,
    pub cost: f32,
}

/// Outcome of one scheduling call. Tasks nobody could take are handed back to the caller.
pub struct AssignReport<W>
where
    W: WorldMut + 'static,
{
    pub assigned: Vec<Assignment<W::Agent>>,
    pub unassigned: Vec<BoxTask<W>>,
}

impl<W> Default for AssignReport<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self {
            assigned: Vec::new(),
            unassigned: Vec::new(),
        }
    }
}

impl<W> AssignReport<W>
where
    W: WorldMut + 'static,
{
    pub fn unassigned_names(&self) -> Vec<&str> {
        self.unassigned.iter().map(|t| t.name()).collect()
    }

    pub fn merge(&mut self, other: AssignReport<W>) {
        self.assigned.extend(other.assigned);
        self.unassigned.extend(other.unassigned);
    }
}

/// Tasks handed to each agent so far within one batch phase.
///
/// Share one ledger across several scheduling calls to enforce `max_per_agent` over all of
/// them rather than per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignLedger<A> {
    given: BTreeMap<A, usize>,
}

impl<A> Default for AssignLedger<A> {
    fn default() -> Self {
        Self {
            given: BTreeMap::new(),
        }
    }
}

impl<A: AgentId> AssignLedger<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn given(&self, agent: A) -> usize {
        self.given.get(&agent).copied().unwrap_or(0)
    }

    pub fn record(&mut self, agent: A) {
        *self.given.entry(agent).or_default() += 1;
    }

    pub fn total(&self) -> usize {
        self.given.values().sum()
    }
}

/// Hand each task to the cheapest eligible worker, highest priority first.
///
/// Tasks are visited by descending priority; equal priorities keep their input order. A worker
/// is eligible for a task when its categories cover the task's category, it is available, it
/// has received fewer than `max_per_agent` tasks from this call, its queue is below
/// `max_queue_len`, it holds no equivalent task, and the task reports a finite cost for it.
/// The effective cost is the task cost plus `load_weight` times the worker's queue length.
/// Equal costs go to the worker with the lower agent id, then the earlier slice position.
///
/// The result depends only on the inputs: same tasks, workers and world give the same
/// assignment.
pub fn assign_greedy<W, K>(
    tasks: Vec<BoxTask<W>>,
    workers: &mut [K],
    world: &W,
    config: &AssignConfig,
) -> AssignReport<W>
where
    W: WorldMut + 'static,
    K: Worker<W>,
{
    assign_greedy_in(tasks, workers, world, config, &mut AssignLedger::new())
}

/// [`assign_greedy`] counting `max_per_agent` against `ledger`, which is updated with every
/// placement.
pub fn assign_greedy_in<W, K>(
    tasks: Vec<BoxTask<W>>,
    workers: &mut [K],
    world: &W,
    config: &AssignConfig,
    ledger: &mut AssignLedger<W::Agent>,
) -> AssignReport<W>
where
    W: WorldMut + 'static,
    K: Worker<W>,
{
    let mut report = AssignReport::default();

    let mut order: Vec<BoxTask<W>> = tasks;
    order.sort_by_key(|t| Reverse(t.priority()));

    for task in order {
        let mut best: Option<(usize, f32, u64)> = None;

        for (slot, worker) in workers.iter().enumerate() {
            if ledger.given(worker.agent()) >= config.max_per_agent {
                continue;
            }
            if !worker.categories().contains(task.category()) || !worker.is_available(world) {
                continue;
            }
            let held = worker.tasks().len();
            if config.max_queue_len.is_some_and(|max| held >= max) {
                continue;
            }
            if worker.tasks().contains(task.as_ref()) {
                continue;
            }
            let Some(base) = task.cost(worker.agent(), world) else {
                continue;
            };
            let cost = base + config.load_weight * held as f32;
            if !cost.is_finite() {
                continue;
            }

            let key = worker.agent().stable_id();
            let better = match best {
                None => true,
                Some((_, best_cost, best_key)) => {
                    cost < best_cost || (cost == best_cost && key < best_key)
                }
            };
            if better {
                best = Some((slot, cost, key));
            }
        }

        match best {
            Some((slot, cost, _)) => {
                let worker = &mut workers[slot];
                let agent = worker.agent();
                let name = task.name().to_owned();
                let id = worker.tasks_mut().enqueue(task);
                ledger.record(agent);
                tracing::debug!(task = %name, agent = ?agent, cost, "task assigned");
                report.assigned.push(Assignment {
                    agent,
                    task: id,
                    name,
                    cost,
                });
            }
            None => {
                tracing::debug!(task = task.name(), "no eligible agent");
                report.unassigned.push(task);
            }
        }
    }

    report
}

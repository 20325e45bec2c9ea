//! Orders posted by agents during the step phase, applied in the batch phase.

use colony_core::WorldMut;

use crate::assign::{
    assign_greedy_in, AssignConfig, AssignLedger, AssignReport, Assignment, Worker,
};
use crate::task::BoxTask;

/// A request to hand out work.
pub enum Order<W>
where
    W: WorldMut + 'static,
{
    /// Enqueue on one specific agent. Skipped when it already holds an equivalent task, or
    /// more than `max_held` tasks when that limit is set.
    Direct {
        agent: W::Agent,
        task: BoxTask<W>,
        max_held: Option<usize>,
    },
    /// Run the greedy scheduler over `tasks`, restricted to `candidates` when given.
    Batch {
        tasks: Vec<BoxTask<W>>,
        candidates: Option<Vec<W::Agent>>,
    },
}

/// Inbox of orders. Agents never touch each other's queues mid-tick; they post here instead.
pub struct TaskBoard<W>
where
    W: WorldMut + 'static,
{
    orders: Vec<Order<W>>,
}

impl<W> Default for TaskBoard<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self { orders: Vec::new() }
    }
}

impl<W> TaskBoard<W>
where
    W: WorldMut + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, order: Order<W>) {
        self.orders.push(order);
    }

    pub fn post_direct(&mut self, agent: W::Agent, task: BoxTask<W>) {
        self.post(Order::Direct {
            agent,
            task,
            max_held: None,
        });
    }

    /// Like [`TaskBoard::post_direct`], but only for an agent holding at most `max_held` tasks.
    pub fn post_direct_if_idle(&mut self, agent: W::Agent, task: BoxTask<W>, max_held: usize) {
        self.post(Order::Direct {
            agent,
            task,
            max_held: Some(max_held),
        });
    }

    pub fn post_batch(&mut self, tasks: Vec<BoxTask<W>>, candidates: Option<Vec<W::Agent>>) {
        if tasks.is_empty() {
            return;
        }
        self.post(Order::Batch { tasks, candidates });
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Take all orders in posting order.
    pub fn drain(&mut self) -> Vec<Order<W>> {
        std::mem::take(&mut self.orders)
    }
}

/// Worlds that carry a task board.
pub trait TaskBoardWorld: WorldMut + Sized + 'static {
    fn task_board(&mut self) -> &mut TaskBoard<Self>;
}

pub struct DispatchReport<W>
where
    W: WorldMut + 'static,
{
    pub assignments: AssignReport<W>,
    /// Direct orders dropped because the agent already held an equivalent task.
    pub duplicates: usize,
    /// Direct orders dropped because the agent was too busy.
    pub busy: usize,
}

impl<W> Default for DispatchReport<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self {
            assignments: AssignReport::default(),
            duplicates: 0,
            busy: 0,
        }
    }
}

/// Apply `orders` to `workers` in order.
///
/// A direct order whose agent is missing or unavailable is returned as unassigned. Batch
/// orders share one `max_per_agent` budget across the whole call; direct orders are not
/// counted against it.
pub fn dispatch_orders<W, K>(
    orders: Vec<Order<W>>,
    workers: &mut [K],
    world: &W,
    config: &AssignConfig,
) -> DispatchReport<W>
where
    W: WorldMut + 'static,
    K: Worker<W>,
{
    dispatch_orders_in(orders, workers, world, config, &mut AssignLedger::new())
}

/// [`dispatch_orders`] charging batch placements to `ledger`, so several calls within one
/// batch phase share a budget.
pub fn dispatch_orders_in<W, K>(
    orders: Vec<Order<W>>,
    workers: &mut [K],
    world: &W,
    config: &AssignConfig,
    ledger: &mut AssignLedger<W::Agent>,
) -> DispatchReport<W>
where
    W: WorldMut + 'static,
    K: Worker<W>,
{
    let mut report = DispatchReport::default();

    for order in orders {
        match order {
            Order::Direct {
                agent,
                task,
                max_held,
            } => {
                let Some(worker) = workers
                    .iter_mut()
                    .find(|w| w.agent() == agent && w.is_available(world))
                else {
                    report.assignments.unassigned.push(task);
                    continue;
                };
                if worker.tasks().contains(task.as_ref()) {
                    report.duplicates += 1;
                    continue;
                }
                if max_held.is_some_and(|max| worker.tasks().len() > max) {
                    report.busy += 1;
                    continue;
                }
                let name = task.name().to_owned();
                let id = worker.tasks_mut().enqueue(task);
                report.assignments.assigned.push(Assignment {
                    agent,
                    task: id,
                    name,
                    cost: 0.0,
                });
            }
            Order::Batch { tasks, candidates } => {
                let batch = match candidates {
                    None => assign_greedy_in(tasks, workers, world, config, ledger),
                    Some(candidates) => {
                        let mut pool: Vec<&mut K> = workers
                            .iter_mut()
                            .filter(|w| candidates.contains(&w.agent()))
                            .collect();
                        assign_greedy_in(tasks, &mut pool, world, config, ledger)
                    }
                };
                report.assignments.merge(batch);
            }
        }
    }

    report
}

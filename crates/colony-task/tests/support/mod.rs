#![allow(dead_code)]

use colony_act::{ActStatus, BoxAct, Leaf};
use colony_core::{Blackboard, TickContext, WorldMut, WorldView};
use colony_task::{Category, Priority, Task, TaskQueue, Worker};

#[derive(Debug, Default)]
pub struct Yard {
    /// Names of tasks whose acts were stepped, in order.
    pub log: Vec<&'static str>,
    pub busy: Vec<u64>,
}

impl WorldView for Yard {
    type Agent = u64;
}

impl WorldMut for Yard {}

/// Test task: runs `running` steps, then succeeds or fails.
#[derive(Debug, Clone)]
pub struct Job {
    pub name: &'static str,
    pub priority: Priority,
    pub category: Category,
    pub running: u32,
    pub fails: bool,
    /// Per-agent costs; agents not listed cost `default_cost`.
    pub costs: Vec<(u64, Option<f32>)>,
    pub default_cost: Option<f32>,
}

impl Job {
    pub fn new(name: &'static str, priority: Priority) -> Self {
        Self {
            name,
            priority,
            category: Category::MOVE,
            running: 0,
            fails: false,
            costs: Vec::new(),
            default_cost: Some(0.0),
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn running(mut self, steps: u32) -> Self {
        self.running = steps;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fails = true;
        self
    }

    pub fn cost_for(mut self, agent: u64, cost: Option<f32>) -> Self {
        self.costs.push((agent, cost));
        self
    }

    pub fn boxed(self) -> Box<dyn Task<Yard>> {
        Box::new(self)
    }
}

impl Task<Yard> for Job {
    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn category(&self) -> Category {
        self.category
    }

    fn cost(&self, agent: u64, _world: &Yard) -> Option<f32> {
        self.costs
            .iter()
            .find(|(a, _)| *a == agent)
            .map(|(_, c)| *c)
            .unwrap_or(self.default_cost)
    }

    fn create_act(
        &self,
        _ctx: &TickContext,
        _agent: u64,
        _world: &Yard,
        _blackboard: &Blackboard,
    ) -> BoxAct<Yard> {
        let name = self.name;
        let fails = self.fails;
        let mut left = self.running;
        Box::new(Leaf::new(
            name,
            move |_: &TickContext, _: u64, world: &mut Yard, _: &mut Blackboard| {
                world.log.push(name);
                if left > 0 {
                    left -= 1;
                    ActStatus::Running
                } else {
                    ActStatus::from(!fails)
                }
            },
        ))
    }
}

pub struct Hand {
    pub agent: u64,
    pub categories: Category,
    pub queue: TaskQueue<Yard>,
}

impl Hand {
    pub fn new(agent: u64) -> Self {
        Self {
            agent,
            categories: Category::ALL,
            queue: TaskQueue::new(),
        }
    }

    pub fn with_categories(mut self, categories: Category) -> Self {
        self.categories = categories;
        self
    }

    pub fn queued_names(&self) -> Vec<String> {
        self.queue
            .iter()
            .map(|(_, task, _)| task.name().to_owned())
            .collect()
    }
}

impl Worker<Yard> for Hand {
    fn agent(&self) -> u64 {
        self.agent
    }

    fn categories(&self) -> Category {
        self.categories
    }

    fn tasks(&self) -> &TaskQueue<Yard> {
        &self.queue
    }

    fn tasks_mut(&mut self) -> &mut TaskQueue<Yard> {
        &mut self.queue
    }

    fn is_available(&self, world: &Yard) -> bool {
        !world.busy.contains(&self.agent)
    }
}

pub fn ctx(tick: u64) -> TickContext {
    TickContext::new(tick, 0.5, 11)
}

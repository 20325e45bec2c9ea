#![allow(dead_code)]

use std::collections::VecDeque;

use colony_act::{Act, ActStatus};
use colony_core::{Blackboard, TickContext, WorldMut, WorldView};

#[derive(Debug, Default)]
pub struct RecordingWorld {
    pub stepped: Vec<&'static str>,
    pub flag: bool,
}

impl WorldView for RecordingWorld {
    type Agent = u64;
}

impl WorldMut for RecordingWorld {}

/// Leaf that replays a fixed script of statuses and records each step.
pub struct Scripted {
    name: &'static str,
    script: VecDeque<ActStatus>,
}

impl Scripted {
    pub fn new(name: &'static str, script: &[ActStatus]) -> Self {
        Self {
            name,
            script: script.iter().copied().collect(),
        }
    }

    pub fn boxed(name: &'static str, script: &[ActStatus]) -> Box<dyn Act<RecordingWorld>> {
        Box::new(Self::new(name, script))
    }
}

impl Act<RecordingWorld> for Scripted {
    fn step(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut RecordingWorld,
        _blackboard: &mut Blackboard,
    ) -> ActStatus {
        world.stepped.push(self.name);
        self.script.pop_front().unwrap_or(ActStatus::Success)
    }

    fn name(&self) -> &str {
        self.name
    }
}

pub fn ctx(tick: u64) -> TickContext {
    TickContext::new(tick, 0.5, 7)
}

/// Step `act` until it terminates, returning every status observed.
pub fn drive(
    act: &mut dyn Act<RecordingWorld>,
    world: &mut RecordingWorld,
    bb: &mut Blackboard,
    max_steps: u64,
) -> Vec<ActStatus> {
    let mut seen = Vec::new();
    for tick in 0..max_steps {
        let status = act.step(&ctx(tick), 1, world, bb);
        seen.push(status);
        if status.is_terminal() {
            break;
        }
    }
    seen
}

use colony_core::{Blackboard, TickContext, WorldMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActStatus {
    Running,
    Success,
    Failure,
}

/// Terminal result of an act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl From<Outcome> for ActStatus {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Success => ActStatus::Success,
            Outcome::Failure => ActStatus::Failure,
        }
    }
}

impl From<bool> for ActStatus {
    fn from(ok: bool) -> Self {
        if ok {
            ActStatus::Success
        } else {
            ActStatus::Failure
        }
    }
}

impl ActStatus {
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            ActStatus::Running => None,
            ActStatus::Success => Some(Outcome::Success),
            ActStatus::Failure => Some(Outcome::Failure),
        }
    }

    pub fn is_terminal(self) -> bool {
        self != ActStatus::Running
    }
}

/// One resumable computation, exclusively owned by a single agent's execution slot.
///
/// `step` is called at most once per tick. Implementations keep their own resumption cursor
/// and must not be stepped again after returning a terminal status.
pub trait Act<W>: 'static
where
    W: WorldMut + 'static,
{
    fn step(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActStatus;

    /// Diagnostic name.
    fn name(&self) -> &str;
}

pub type BoxAct<W> = Box<dyn Act<W>>;

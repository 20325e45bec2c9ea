use colony_core::{Blackboard, TickContext, WorldMut};

use crate::act::{Act, ActStatus, BoxAct, Outcome};

/// Root of a live act tree, held in an agent's execution slot.
///
/// Latches the first terminal outcome. Stepping a finished tree is a caller bug and panics:
/// the owner must discard the tree once it reports `Success` or `Failure`.
pub struct ActTree<W>
where
    W: WorldMut + 'static,
{
    root: BoxAct<W>,
    outcome: Option<Outcome>,
    steps: u64,
}

impl<W> ActTree<W>
where
    W: WorldMut + 'static,
{
    pub fn new(root: BoxAct<W>) -> Self {
        Self {
            root,
            outcome: None,
            steps: 0,
        }
    }

    pub fn name(&self) -> &str {
        self.root.name()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Number of steps taken so far, including the terminal one.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn step(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActStatus {
        if let Some(outcome) = self.outcome {
            panic!(
                "act tree '{}' stepped after it terminated with {:?}",
                self.root.name(),
                outcome
            );
        }

        self.steps += 1;
        let status = self.root.step(ctx, agent, world, blackboard);
        self.outcome = status.outcome();
        status
    }
}

use std::borrow::Cow;

use colony_core::{AgentId, Blackboard, TickContext, WorldMut, WorldView};
use colony_trace::{emit as trace_emit, TraceEvent};

use crate::act::{Act, ActStatus, BoxAct};

type Guard<W> = Box<dyn FnOnce(&TickContext, <W as WorldView>::Agent, &W, &Blackboard) -> bool>;
type MakeChild<W> =
    Box<dyn FnOnce(&TickContext, <W as WorldView>::Agent, &W, &Blackboard) -> BoxAct<W>>;

enum DomainState<W>
where
    W: WorldMut + 'static,
{
    Unchecked { guard: Guard<W>, make: MakeChild<W> },
    Entered(BoxAct<W>),
    Rejected,
}

/// Guarded branch.
///
/// The guard runs exactly once, on the first step. When it rejects, the domain fails for good
/// and the child is never built. When it accepts, the child is built and stepped in that same
/// call, and every later step is forwarded to it unchanged. World changes after entry are the
/// child's business; the guard is never consulted again.
pub struct Domain<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    state: DomainState<W>,
}

impl<W> Domain<W>
where
    W: WorldMut + 'static,
{
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        guard: impl FnOnce(&TickContext, W::Agent, &W, &Blackboard) -> bool + 'static,
        make: impl FnOnce(&TickContext, W::Agent, &W, &Blackboard) -> BoxAct<W> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            state: DomainState::Unchecked {
                guard: Box::new(guard),
                make: Box::new(make),
            },
        }
    }

    /// Guard an already-built child.
    pub fn with_child(
        name: impl Into<Cow<'static, str>>,
        guard: impl FnOnce(&TickContext, W::Agent, &W, &Blackboard) -> bool + 'static,
        child: BoxAct<W>,
    ) -> Self {
        Self::new(name, guard, move |_, _, _, _| child)
    }

    pub fn is_entered(&self) -> bool {
        matches!(self.state, DomainState::Entered(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.state, DomainState::Rejected)
    }
}

impl<W> Act<W> for Domain<W>
where
    W: WorldMut + 'static,
{
    fn step(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActStatus {
        if let DomainState::Entered(child) = &mut self.state {
            return child.step(ctx, agent, world, blackboard);
        }

        match std::mem::replace(&mut self.state, DomainState::Rejected) {
            DomainState::Unchecked { guard, make } => {
                if !guard(ctx, agent, &*world, &*blackboard) {
                    trace_emit(
                        blackboard,
                        TraceEvent::new(ctx.tick, "act.domain.reject").for_agent(agent.stable_id()),
                    );
                    return ActStatus::Failure;
                }
                let mut child = make(ctx, agent, &*world, &*blackboard);
                let status = child.step(ctx, agent, world, blackboard);
                self.state = DomainState::Entered(child);
                status
            }
            DomainState::Rejected => ActStatus::Failure,
            DomainState::Entered(_) => unreachable!("entered domain handled above"),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

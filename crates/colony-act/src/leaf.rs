use std::borrow::Cow;

use colony_core::{Blackboard, TickContext, WorldMut};

use crate::act::{Act, ActStatus};

/// Predicate leaf, re-evaluated on every step.
pub struct Condition<F> {
    name: Cow<'static, str>,
    cond: F,
}

impl<F> Condition<F> {
    pub fn new(name: impl Into<Cow<'static, str>>, cond: F) -> Self {
        Self {
            name: name.into(),
            cond,
        }
    }
}

impl<F, W> Act<W> for Condition<F>
where
    F: FnMut(&TickContext, W::Agent, &W, &Blackboard) -> bool + 'static,
    W: WorldMut + 'static,
{
    fn step(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActStatus {
        (self.cond)(ctx, agent, &*world, &*blackboard).into()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Closure leaf with full mutable access; may stay `Running` across many steps.
pub struct Leaf<F> {
    name: Cow<'static, str>,
    run: F,
}

impl<F> Leaf<F> {
    pub fn new(name: impl Into<Cow<'static, str>>, run: F) -> Self {
        Self {
            name: name.into(),
            run,
        }
    }
}

impl<F, W> Act<W> for Leaf<F>
where
    F: FnMut(&TickContext, W::Agent, &mut W, &mut Blackboard) -> ActStatus + 'static,
    W: WorldMut + 'static,
{
    fn step(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActStatus {
        (self.run)(ctx, agent, world, blackboard)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

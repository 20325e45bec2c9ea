use std::borrow::Cow;

use colony_core::{Blackboard, TickContext, WorldMut};

use crate::act::{Act, ActStatus};

/// An explicit-state coroutine that yields act statuses.
///
/// `resume` runs the routine up to its next yield point and returns the yielded status, or
/// `None` once the routine has nothing left to yield. Implementations hold their own program
/// counter and locals; there is no hidden stack.
pub trait Routine<W>: 'static
where
    W: WorldMut + 'static,
{
    fn resume(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Option<ActStatus>;
}

/// Closure-backed routine.
pub struct FnRoutine<F>(pub F);

impl<W, F> Routine<W> for FnRoutine<F>
where
    W: WorldMut + 'static,
    F: FnMut(&TickContext, W::Agent, &mut W, &mut Blackboard) -> Option<ActStatus> + 'static,
{
    fn resume(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Option<ActStatus> {
        (self.0)(ctx, agent, world, blackboard)
    }
}

/// Routine that yields exactly one value.
pub struct Once<F>(Option<F>);

impl<W, F> Routine<W> for Once<F>
where
    W: WorldMut + 'static,
    F: FnOnce(&TickContext, W::Agent, &mut W, &mut Blackboard) -> ActStatus + 'static,
{
    fn resume(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Option<ActStatus> {
        let f = self.0.take()?;
        Some(f(ctx, agent, world, blackboard))
    }
}

/// Adapts a [`Routine`] into an act: one `resume` per step, statuses forwarded unchanged.
/// A routine that runs dry without yielding a terminal status counts as `Success`.
pub struct Wrap<R> {
    name: Cow<'static, str>,
    routine: R,
    resumes: u64,
}

impl<R> Wrap<R> {
    pub fn new(name: impl Into<Cow<'static, str>>, routine: R) -> Self {
        Self {
            name: name.into(),
            routine,
            resumes: 0,
        }
    }

    pub fn routine(&self) -> &R {
        &self.routine
    }

    pub fn resumes(&self) -> u64 {
        self.resumes
    }
}

impl<F> Wrap<FnRoutine<F>> {
    pub fn from_fn(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self::new(name, FnRoutine(f))
    }
}

impl<F> Wrap<Once<F>> {
    pub fn once(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self::new(name, Once(Some(f)))
    }
}

impl<W, R> Act<W> for Wrap<R>
where
    W: WorldMut + 'static,
    R: Routine<W>,
{
    fn step(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActStatus {
        self.resumes += 1;
        self.routine
            .resume(ctx, agent, world, blackboard)
            .unwrap_or(ActStatus::Success)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

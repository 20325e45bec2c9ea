use std::borrow::Cow;

use colony_core::{Blackboard, TickContext, WorldMut};

use crate::act::{Act, ActStatus, BoxAct};

/// Runs children in order; fails as soon as one fails.
///
/// A child that succeeds hands over to its successor on the *next* step, so one step of a
/// sequence never does more than one child's worth of work. The last child's success is reported
/// on the same step. An empty sequence succeeds immediately.
pub struct Sequence<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    children: Vec<BoxAct<W>>,
    index: usize,
    finished: Option<ActStatus>,
}

impl<W> Sequence<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<Cow<'static, str>>, children: Vec<BoxAct<W>>) -> Self {
        Self {
            name: name.into(),
            children,
            index: 0,
            finished: None,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Index of the child that the next step will drive.
    pub fn current_index(&self) -> usize {
        self.index
    }

    fn finish(&mut self, status: ActStatus) -> ActStatus {
        // Remaining children are discarded without ever being stepped.
        self.children.truncate(self.index);
        self.finished = Some(status);
        status
    }
}

impl<W> Act<W> for Sequence<W>
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
        debug_assert!(
            self.finished.is_none(),
            "sequence '{}' stepped after it terminated",
            self.name
        );
        if let Some(done) = self.finished {
            return done;
        }

        let Some(child) = self.children.get_mut(self.index) else {
            return self.finish(ActStatus::Success);
        };

        match child.step(ctx, agent, world, blackboard) {
            ActStatus::Running => ActStatus::Running,
            ActStatus::Failure => self.finish(ActStatus::Failure),
            ActStatus::Success => {
                self.index += 1;
                if self.index == self.children.len() {
                    self.finish(ActStatus::Success)
                } else {
                    ActStatus::Running
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Runs children in order until one succeeds; fails when every child failed.
///
/// Same pacing as [`Sequence`]: a failed child hands over on the next step. An empty select
/// fails immediately.
pub struct Select<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    children: Vec<BoxAct<W>>,
    index: usize,
    finished: Option<ActStatus>,
}

impl<W> Select<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<Cow<'static, str>>, children: Vec<BoxAct<W>>) -> Self {
        Self {
            name: name.into(),
            children,
            index: 0,
            finished: None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    fn finish(&mut self, status: ActStatus) -> ActStatus {
        self.children.truncate(self.index);
        self.finished = Some(status);
        status
    }
}

impl<W> Act<W> for Select<W>
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
        debug_assert!(
            self.finished.is_none(),
            "select '{}' stepped after it terminated",
            self.name
        );
        if let Some(done) = self.finished {
            return done;
        }

        let Some(child) = self.children.get_mut(self.index) else {
            return self.finish(ActStatus::Failure);
        };

        match child.step(ctx, agent, world, blackboard) {
            ActStatus::Running => ActStatus::Running,
            ActStatus::Success => self.finish(ActStatus::Success),
            ActStatus::Failure => {
                self.index += 1;
                if self.index == self.children.len() {
                    self.finish(ActStatus::Failure)
                } else {
                    ActStatus::Running
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

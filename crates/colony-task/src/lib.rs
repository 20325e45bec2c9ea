//! Tasks: named, prioritized, categorized units of assignable work.
//!
//! A [`Task`] builds the act tree that carries it out once it is bound to an agent. Each agent
//! owns a [`TaskQueue`] ordered by [`Priority`] (FIFO among equals) with at most one active act
//! tree at a time. [`assign_greedy`] matches a batch of new tasks to a pool of [`Worker`]s, and
//! the [`TaskBoard`] collects orders posted during the step phase so they can be dispatched in
//! the batch phase between ticks.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod assign;
pub mod board;
pub mod priority;
pub mod queue;
pub mod task;

pub use assign::{
    assign_greedy, assign_greedy_in, AssignConfig, AssignLedger, AssignReport, Assignment, Worker,
};
pub use board::{
    dispatch_orders, dispatch_orders_in, DispatchReport, Order, TaskBoard, TaskBoardWorld,
};
pub use priority::{Category, Priority};
pub use queue::{QueueStep, TaskQueue};
pub use task::{BoxTask, Task, TaskId, TaskReport, TaskState};

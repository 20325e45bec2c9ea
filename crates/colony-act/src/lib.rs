//! Cooperative act engine.
//!
//! An [`Act`] is a resumable unit of behavior: each call to [`Act::step`] advances it by one
//! bounded slice of work and reports [`ActStatus::Running`] until it reaches `Success` or
//! `Failure`. Nothing here blocks; waiting is always expressed as `Running`.
//!
//! Composites:
//! - [`Sequence`]: children in order, short-circuits on the first failure.
//! - [`Select`]: children in order, stops at the first success.
//! - [`Domain`]: a guard evaluated once at entry in front of a lazily built child.
//! - [`Wrap`]: adapts an explicit-state [`Routine`] into an act.
//!
//! [`ActTree`] is the root holder an agent keeps in its execution slot. It latches the terminal
//! outcome and treats any further step as a programming error.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod act;
pub mod domain;
pub mod leaf;
pub mod sequence;
pub mod tree;
pub mod wrap;

pub use act::{Act, ActStatus, BoxAct, Outcome};
pub use domain::Domain;
pub use leaf::{Condition, Leaf};
pub use sequence::{Select, Sequence};
pub use tree::ActTree;
pub use wrap::{FnRoutine, Once, Routine, Wrap};

//! Deterministic trace recording for creature AI.
//!
//! Trace events are plain data recorded into an agent's blackboard while the simulation steps,
//! so tests and tools can assert on exactly what happened and in which tick. Human-oriented
//! logging goes through `tracing` instead.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{
    emit, enable_log, take_log, NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink,
    TRACE_LOG, TRACE_SINK,
};

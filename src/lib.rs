//! Tracepoint subsystem of a source-level debugger for remote targets.
//!
//! A tracepoint is a passive breakpoint: when the target reaches it, the
//! stub snapshots a chosen set of registers and memory ranges into the
//! in-target trace buffer and keeps running. This crate owns the debugger
//! side of that machinery: the tracepoint catalogue, the `collect` action
//! language and its compilation into collection lists, the trace protocol
//! packets, and the replay cursor used to inspect captured frames.
//!
//! The symbol table, the expression parser, the packet transport and the
//! line editor are services of the surrounding debugger; they plug in
//! through the [`debugger::symbol::DebugInfo`],
//! [`debugger::transport::Transport`], [`debugger::SessionHook`] and
//! [`debugger::ActionLineReader`] seams.

pub mod debugger;
pub mod log;
pub mod ui;

pub use debugger::{FrameSelector, SessionHook, TraceSession};

//! An interface to the trace session.
//! This is the preferred way to drive the tracepoint subsystem from a UI
//! layer.
//!
//! Contains commands and corresponding command handlers. A command is a
//! request to the session that defines an action and its input arguments.

pub mod actions;
pub mod control;
pub mod dump;
pub mod find;
pub mod parser;
pub mod save;
pub mod scope;
pub mod trace;
pub mod tracepoint;

use crate::debugger::Error;
use crate::debugger::FrameSelector;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error("malformed command")]
    Parsing(String),
    #[error(transparent)]
    Handle(#[from] Error),
}

pub type CommandResult<T> = Result<T, CommandError>;

/// External commands that can be processed by the trace session.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Define a tracepoint at each location a specifier resolves to.
    Trace(String),
    /// Catalogue maintenance: info, enable, disable, delete, passcount.
    Tracepoint(tracepoint::Command),
    /// Enter the multi-line action editor for a tracepoint.
    Actions(String),
    /// Session control: tstart, tstop, tstatus.
    Control(control::Command),
    /// Move the replay cursor.
    Find(FrameSelector),
    /// Replay the current frame's collected data.
    Dump,
    /// Serialise the store as a command script.
    Save(PathBuf),
    /// Storage-class listing for a location.
    Scope(String),
}

use crate::debugger::symbol::DebugInfo;
use crate::debugger::transport::Transport;
use crate::debugger::TraceSession;
use crate::ui::command::CommandResult;
use std::path::Path;

pub struct Handler<'a, T: Transport, D: DebugInfo> {
    session: &'a TraceSession<T, D>,
}

impl<'a, T: Transport, D: DebugInfo> Handler<'a, T, D> {
    pub fn new(session: &'a TraceSession<T, D>) -> Self {
        Self { session }
    }

    pub fn handle(self, path: &Path) -> CommandResult<()> {
        Ok(self.session.save_tracepoints(path)?)
    }
}

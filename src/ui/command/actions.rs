use crate::debugger::symbol::DebugInfo;
use crate::debugger::transport::Transport;
use crate::debugger::{ActionLineReader, TraceSession};
use crate::ui::command::CommandResult;

pub struct Handler<'a, T: Transport, D: DebugInfo> {
    session: &'a mut TraceSession<T, D>,
}

impl<'a, T: Transport, D: DebugInfo> Handler<'a, T, D> {
    pub fn new(session: &'a mut TraceSession<T, D>) -> Self {
        Self { session }
    }

    pub fn handle(self, spec: &str, reader: &mut dyn ActionLineReader) -> CommandResult<()> {
        Ok(self.session.read_actions(spec, reader)?)
    }
}

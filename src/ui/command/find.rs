use crate::debugger::symbol::DebugInfo;
use crate::debugger::transport::Transport;
use crate::debugger::{FrameSelector, TraceSession};
use crate::ui::command::CommandResult;

pub struct Handler<'a, T: Transport, D: DebugInfo> {
    session: &'a mut TraceSession<T, D>,
}

impl<'a, T: Transport, D: DebugInfo> Handler<'a, T, D> {
    pub fn new(session: &'a mut TraceSession<T, D>) -> Self {
        Self { session }
    }

    pub fn handle(self, selector: FrameSelector) -> CommandResult<()> {
        Ok(self.session.tfind(selector)?)
    }
}

use crate::debugger::symbol::DebugInfo;
use crate::debugger::transport::Transport;
use crate::debugger::TraceSession;
use crate::ui::command::CommandResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Status,
}

pub struct Handler<'a, T: Transport, D: DebugInfo> {
    session: &'a mut TraceSession<T, D>,
}

impl<'a, T: Transport, D: DebugInfo> Handler<'a, T, D> {
    pub fn new(session: &'a mut TraceSession<T, D>) -> Self {
        Self { session }
    }

    pub fn handle(self, cmd: Command) -> CommandResult<()> {
        match cmd {
            Command::Start => self.session.tstart()?,
            Command::Stop => self.session.tstop()?,
            Command::Status => self.session.tstatus()?,
        }
        Ok(())
    }
}

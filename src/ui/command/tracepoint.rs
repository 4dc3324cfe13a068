use crate::debugger::symbol::DebugInfo;
use crate::debugger::tracepoint::PassTarget;
use crate::debugger::transport::Transport;
use crate::debugger::TraceSession;
use crate::ui::command::CommandResult;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List all tracepoints, or one.
    Info(Option<String>),
    Enable(Vec<String>),
    Disable(Vec<String>),
    Delete(Vec<String>),
    Pass { count: u64, target: PassTarget },
}

pub struct Handler<'a, T: Transport, D: DebugInfo> {
    session: &'a mut TraceSession<T, D>,
}

impl<'a, T: Transport, D: DebugInfo> Handler<'a, T, D> {
    pub fn new(session: &'a mut TraceSession<T, D>) -> Self {
        Self { session }
    }

    pub fn handle(self, cmd: &Command) -> CommandResult<()> {
        match cmd {
            Command::Info(spec) => self.session.info_tracepoints(spec.as_deref())?,
            Command::Enable(specs) => self.session.enable_tracepoints(specs)?,
            Command::Disable(specs) => self.session.disable_tracepoints(specs)?,
            Command::Delete(specs) => self.session.delete_tracepoints(specs)?,
            Command::Pass { count, target } => {
                self.session.set_pass_count(target.clone(), *count)?
            }
        }
        Ok(())
    }
}

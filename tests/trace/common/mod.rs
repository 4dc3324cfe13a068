//! In-memory doubles for the session's external collaborators and a small
//! script driver used by the round-trip tests.

use retrace::debugger::error::Error;
use retrace::debugger::symbol::{
    Block, CollectExpression, DebugInfo, Language, SourcePlace,
};
use retrace::debugger::transport::Transport;
use retrace::debugger::{ActionLineReader, SessionHook, TraceSession};
use retrace::ui::command::{control, tracepoint, Command};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Transport whose wire state stays observable after the session takes
/// ownership of one of its clones.
#[derive(Default, Clone)]
pub struct SharedWire(pub Rc<RefCell<WireState>>);

#[derive(Default)]
pub struct WireState {
    pub sent: Vec<String>,
    pub replies: VecDeque<String>,
}

impl SharedWire {
    pub fn with_replies(replies: &[&str]) -> Self {
        let wire = Self::default();
        wire.0.borrow_mut().replies = replies.iter().map(|s| s.to_string()).collect();
        wire
    }

    pub fn sent(&self) -> Vec<String> {
        self.0.borrow().sent.clone()
    }
}

impl Transport for SharedWire {
    fn send(&mut self, packet: &str) -> Result<(), Error> {
        self.0.borrow_mut().sent.push(packet.to_string());
        Ok(())
    }

    fn recv(&mut self) -> Result<String, Error> {
        self.0
            .borrow_mut()
            .replies
            .pop_front()
            .ok_or_else(|| Error::Protocol("wire script exhausted".to_string()))
    }
}

/// Debug information with fixed content.
#[derive(Default, Clone)]
pub struct MockDebugInfo {
    pub locations: HashMap<String, Vec<SourcePlace>>,
    pub places: Vec<SourcePlace>,
    pub functions: HashMap<u64, String>,
    pub line_ranges: HashMap<u64, (u64, u64)>,
    pub blocks: Vec<Block>,
    pub expressions: HashMap<String, CollectExpression>,
}

impl MockDebugInfo {
    pub fn with_function(name: &str, pc: u64) -> Self {
        let mut di = Self::default();
        di.add_function(name, pc);
        di
    }

    pub fn add_function(&mut self, name: &str, pc: u64) {
        self.locations.insert(
            name.to_string(),
            vec![SourcePlace {
                pc,
                line: 10,
                file: Some(format!("{name}.c").into()),
                directory: Some("/src".into()),
                addr_string: Some(name.to_string()),
            }],
        );
        self.functions.insert(pc, name.to_string());
        self.places.push(SourcePlace {
            pc,
            line: 10,
            file: Some(format!("{name}.c").into()),
            directory: Some("/src".into()),
            addr_string: None,
        });
    }
}

impl DebugInfo for MockDebugInfo {
    fn resolve_location(&self, location: &str) -> Result<Vec<SourcePlace>, Error> {
        self.locations
            .get(location)
            .cloned()
            .ok_or_else(|| Error::LocationNotFound(location.to_string()))
    }

    fn find_place(&self, pc: u64) -> Option<SourcePlace> {
        self.places.iter().find(|p| p.pc == pc).cloned()
    }

    fn function_name(&self, pc: u64) -> Option<String> {
        self.functions.get(&pc).cloned()
    }

    fn line_range(&self, place: &SourcePlace) -> Option<(u64, u64)> {
        self.line_ranges.get(&place.pc).copied()
    }

    fn blocks_for_pc(&self, _pc: u64) -> Vec<Block> {
        self.blocks.clone()
    }

    fn classify_collect_expression(
        &self,
        expression: &str,
        _scope_pc: u64,
    ) -> Result<CollectExpression, Error> {
        Ok(self
            .expressions
            .get(expression)
            .cloned()
            .unwrap_or(CollectExpression::Unsupported))
    }

    fn current_language(&self) -> Language {
        Language::C
    }

    fn input_radix(&self) -> u32 {
        10
    }
}

/// Hook recording console output and convenience variables.
pub struct TestHook {
    pub prints: RefCell<Vec<String>>,
    pub remote_out: RefCell<Vec<String>>,
    pub int_vars: RefCell<HashMap<&'static str, i64>>,
    pub str_vars: RefCell<HashMap<&'static str, String>>,
    pub registers: RefCell<Vec<(u16, Vec<u8>)>>,
    pub pc: Cell<Option<u64>>,
}

impl Default for TestHook {
    fn default() -> Self {
        Self {
            prints: RefCell::default(),
            remote_out: RefCell::default(),
            int_vars: RefCell::default(),
            str_vars: RefCell::default(),
            registers: RefCell::default(),
            pc: Cell::new(None),
        }
    }
}

impl SessionHook for TestHook {
    fn print(&self, text: &str) {
        self.prints.borrow_mut().push(text.to_string());
    }

    fn remote_console(&self, text: &str) {
        self.remote_out.borrow_mut().push(text.to_string());
    }

    fn set_int_var(&self, name: &'static str, value: i64) {
        self.int_vars.borrow_mut().insert(name, value);
    }

    fn set_str_var(&self, name: &'static str, value: &str) {
        self.str_vars.borrow_mut().insert(name, value.to_string());
    }

    fn supply_register(&self, regno: u16, bytes: &[u8]) {
        self.registers.borrow_mut().push((regno, bytes.to_vec()));
    }

    fn current_pc(&self) -> Option<u64> {
        self.pc.get()
    }
}

/// Feed a fixed line list into the action editor.
pub struct LineFeed(pub VecDeque<String>);

impl LineFeed {
    pub fn new(lines: &[&str]) -> Self {
        Self(lines.iter().map(|s| s.to_string()).collect())
    }
}

impl ActionLineReader for LineFeed {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, Error> {
        Ok(self.0.pop_front())
    }
}

pub type MockSession = TraceSession<SharedWire, MockDebugInfo>;

pub fn session_with(
    wire: &SharedWire,
    debug_info: MockDebugInfo,
    hook: &Rc<TestHook>,
) -> MockSession {
    TraceSession::new(
        Some(wire.clone()),
        debug_info,
        &retrace::debugger::arch::X86_64,
        Box::new(Rc::clone(hook)),
    )
}

/// Replay a command script through the parser and the command handlers,
/// the way `source` replays a saved tracepoint file.
pub fn source_script(session: &mut MockSession, script: &str) {
    let mut lines = script.lines();
    while let Some(line) = lines.next() {
        if line.trim().is_empty() {
            continue;
        }
        let command =
            Command::parse(line).unwrap_or_else(|_| panic!("unparsed script line: {line}"));
        match command {
            Command::Trace(location) => {
                retrace::ui::command::trace::Handler::new(session)
                    .handle(&location)
                    .expect("trace");
            }
            Command::Tracepoint(cmd @ tracepoint::Command::Pass { .. }) => {
                retrace::ui::command::tracepoint::Handler::new(session)
                    .handle(&cmd)
                    .expect("passcount");
            }
            Command::Actions(spec) => {
                let mut reader = ScriptLines(&mut lines);
                retrace::ui::command::actions::Handler::new(session)
                    .handle(&spec, &mut reader)
                    .expect("actions");
            }
            Command::Control(control::Command::Start) => {
                retrace::ui::command::control::Handler::new(session)
                    .handle(control::Command::Start)
                    .expect("tstart");
            }
            other => panic!("unexpected script command: {other:?}"),
        }
    }
}

struct ScriptLines<'a, 'b>(&'a mut std::str::Lines<'b>);

impl ActionLineReader for ScriptLines<'_, '_> {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, Error> {
        Ok(self.0.next().map(|s| s.to_string()))
    }
}

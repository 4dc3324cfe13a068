//! Tracepoint subsystem of the debugger: catalogue of trace locations,
//! compilation of action programs into collection lists, the trace protocol
//! exchanges and the replay cursor.

pub mod actions;
pub mod arch;
pub mod collect;
pub mod collection;
pub mod error;
pub mod packet;
pub mod reply;
pub mod symbol;
pub mod tracepoint;
pub mod transport;

pub use error::Error;

use crate::debugger::actions::{parse_action_line, ActionKind, ActionLine};
use crate::debugger::arch::Arch;
use crate::debugger::collect::ActionCompiler;
use crate::debugger::symbol::{describe_storage, DebugInfo};
use crate::debugger::tracepoint::{PassTarget, Tracepoint, TracepointOp, TracepointStore};
use crate::debugger::transport::Transport;
use std::io::Write as _;
use std::path::Path;
use std::rc::Rc;
use std::{fs, mem};

/// Services the surrounding debugger provides to the trace subsystem: UI
/// notifications, console output, the convenience-variable bridge to the
/// expression evaluator and the frame machinery.
///
/// Every method has a no-op default so implementations only pick up what
/// their front end cares about.
pub trait SessionHook {
    fn on_tracepoint_created(&self, _tp: &Tracepoint) {}
    fn on_tracepoint_deleted(&self, _tp: &Tracepoint) {}

    /// User-visible debugger output.
    fn print(&self, _text: &str) {}
    /// Console output originating on the target.
    fn remote_console(&self, _text: &str) {}
    /// Interactive yes/no query.
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }

    fn set_int_var(&self, _name: &'static str, _value: i64) {}
    fn set_str_var(&self, _name: &'static str, _value: &str) {}
    fn get_int_var(&self, _name: &str) -> Option<i64> {
        None
    }

    /// A replayed register value arrived from the target.
    fn supply_register(&self, _regno: u16, _bytes: &[u8]) {}
    fn flush_cached_frames(&self) {}
    fn registers_changed(&self) {}
    /// Rebuild the selected-frame state after a register refresh.
    fn reselect_frame(&self) -> anyhow::Result<()> {
        Ok(())
    }
    /// PC of the currently selected frame.
    fn current_pc(&self) -> Option<u64> {
        None
    }

    /// `tdump` renderers.
    fn dump_registers(&self) {}
    fn dump_locals(&self) {}
    fn dump_args(&self) {}
    fn print_expression(&self, _expr: &str) {}
}

/// Hooks are routinely shared with the front end that owns them.
impl<H: SessionHook> SessionHook for Rc<H> {
    fn on_tracepoint_created(&self, tp: &Tracepoint) {
        (**self).on_tracepoint_created(tp)
    }
    fn on_tracepoint_deleted(&self, tp: &Tracepoint) {
        (**self).on_tracepoint_deleted(tp)
    }
    fn print(&self, text: &str) {
        (**self).print(text)
    }
    fn remote_console(&self, text: &str) {
        (**self).remote_console(text)
    }
    fn confirm(&self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
    fn set_int_var(&self, name: &'static str, value: i64) {
        (**self).set_int_var(name, value)
    }
    fn set_str_var(&self, name: &'static str, value: &str) {
        (**self).set_str_var(name, value)
    }
    fn get_int_var(&self, name: &str) -> Option<i64> {
        (**self).get_int_var(name)
    }
    fn supply_register(&self, regno: u16, bytes: &[u8]) {
        (**self).supply_register(regno, bytes)
    }
    fn flush_cached_frames(&self) {
        (**self).flush_cached_frames()
    }
    fn registers_changed(&self) {
        (**self).registers_changed()
    }
    fn reselect_frame(&self) -> anyhow::Result<()> {
        (**self).reselect_frame()
    }
    fn current_pc(&self) -> Option<u64> {
        (**self).current_pc()
    }
    fn dump_registers(&self) {
        (**self).dump_registers()
    }
    fn dump_locals(&self) {
        (**self).dump_locals()
    }
    fn dump_args(&self) {
        (**self).dump_args()
    }
    fn print_expression(&self, expr: &str) {
        (**self).print_expression(expr)
    }
}

/// Line source for the multi-line `actions` editor. `Ok(None)` is end of
/// input; [`Error::Quit`] aborts the read immediately.
pub trait ActionLineReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, Error>;
}

/// A replay frame selection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSelector {
    /// No argument: the frame after the current one.
    Next,
    Prev,
    Start,
    /// `end`/`none`: leave replay mode.
    End,
    Number(i64),
    /// Frame with this PC; `None` means the current PC.
    Pc(Option<u64>),
    /// Frame collected by this tracepoint; `None` means the current one.
    Tracepoint(Option<u32>),
    /// Frame in (or, without an argument, outside of) a source line range.
    Line(Option<String>),
    Range(u64, u64),
    Outside(u64, u64),
}

/// The trace session: tracepoint catalogue, compiled-program scratch space
/// and the replay cursor. All trace protocol traffic goes through here.
pub struct TraceSession<T: Transport, D: DebugInfo> {
    transport: Option<T>,
    debug_info: D,
    arch: &'static Arch,
    hook: Box<dyn SessionHook>,
    store: TracepointStore,
    compiler: ActionCompiler,
    /// Replay cursor; −1 means not replaying.
    traceframe_number: i64,
    /// Tracepoint that collected the replayed frame; −1 means none.
    tracepoint_number: i64,
}

impl<T: Transport, D: DebugInfo> TraceSession<T, D> {
    pub fn new(
        transport: Option<T>,
        debug_info: D,
        arch: &'static Arch,
        hook: Box<dyn SessionHook>,
    ) -> Self {
        hook.set_int_var("tpnum", 0);
        hook.set_int_var("trace_frame", 0);
        Self {
            transport,
            debug_info,
            arch,
            hook,
            store: TracepointStore::new(),
            compiler: ActionCompiler::new(),
            traceframe_number: -1,
            tracepoint_number: -1,
        }
    }

    pub fn tracepoints(&self) -> &TracepointStore {
        &self.store
    }

    /// Current replay frame number, −1 when not replaying.
    pub fn replay_frame(&self) -> i64 {
        self.traceframe_number
    }

    /// Tracepoint number of the replayed frame, −1 when none.
    pub fn replay_tracepoint(&self) -> i64 {
        self.tracepoint_number
    }

    // ------------------------------ definition and editing ---------------------------------------

    /// Define a tracepoint at every location the specifier resolves to.
    pub fn trace(&mut self, location: &str) -> Result<Vec<u32>, Error> {
        let location = location.trim();
        if location.is_empty() {
            return Err(Error::InvalidArgument(
                "trace command requires an argument".to_string(),
            ));
        }

        // Resolution and validation happen before any allocation so that a
        // failure cannot leave a half-constructed entry in the store.
        let places = self.debug_info.resolve_location(location)?;
        let language = self.debug_info.current_language();
        let input_radix = self.debug_info.input_radix();

        let mut created = Vec::with_capacity(places.len());
        for place in &places {
            let addr_string = place
                .addr_string
                .clone()
                .or_else(|| Some(location.to_string()));
            let tp = self
                .store
                .create(place, addr_string, language, input_radix, self.hook.as_ref());
            created.push(tp.number);
        }

        if created.len() > 1 {
            self.hook.print("Multiple tracepoints were set.\n");
            self.hook
                .print("Use the \"delete\" command to delete unwanted tracepoints.\n");
        }
        Ok(created)
    }

    /// List all tracepoints, or one.
    pub fn info_tracepoints(&self, spec: Option<&str>) -> Result<(), Error> {
        let filter = match spec {
            Some(spec) => Some(self.store.parse_number_spec(spec, self.hook.as_ref())?),
            None => None,
        };

        let mut found = false;
        for tp in self
            .store
            .iter()
            .filter(|t| filter.map_or(true, |n| t.number as i64 == n))
        {
            if !mem::replace(&mut found, true) {
                self.hook
                    .print("Num Enb Address            PassC StepC What\n");
            }

            let mut row = format!(
                "{:<3} {:<3} {:#018x} {:<5} {:<5} ",
                tp.number,
                if tp.enabled { "y" } else { "n" },
                tp.address,
                tp.pass_count,
                tp.step_count,
            );
            match &tp.source_file {
                Some(file) => {
                    if let Some(func) = self.debug_info.function_name(tp.address) {
                        row.push_str(&format!("in {func} at "));
                    }
                    row.push_str(&format!("{}:{}", file.display(), tp.line_number));
                }
                None => {
                    if let Some(func) = self.debug_info.function_name(tp.address) {
                        row.push_str(&format!("<{func}>"));
                    }
                }
            }
            row.push('\n');
            self.hook.print(&row);

            if !tp.actions.is_empty() {
                self.hook
                    .print(&format!("  Actions for tracepoint {}:\n", tp.number));
                for action in &tp.actions {
                    self.hook.print(&format!("\t{}\n", action.source));
                }
            }
        }

        if !found {
            match filter {
                None => self.hook.print("No tracepoints.\n"),
                Some(n) => self.hook.print(&format!("No tracepoint number {n}.\n")),
            }
        }
        Ok(())
    }

    pub fn enable_tracepoints(&mut self, specs: &[String]) -> Result<(), Error> {
        self.store
            .apply(TracepointOp::Enable, specs, self.hook.as_ref())
    }

    pub fn disable_tracepoints(&mut self, specs: &[String]) -> Result<(), Error> {
        self.store
            .apply(TracepointOp::Disable, specs, self.hook.as_ref())
    }

    pub fn delete_tracepoints(&mut self, specs: &[String]) -> Result<(), Error> {
        if specs.is_empty() && !self.hook.confirm("Delete all tracepoints? ") {
            return Ok(());
        }
        self.store
            .apply(TracepointOp::Delete, specs, self.hook.as_ref())
    }

    pub fn set_pass_count(&mut self, target: PassTarget, count: u64) -> Result<(), Error> {
        self.store
            .set_pass_count(target, count, self.hook.as_ref())
    }

    /// Run the multi-line action editor for one tracepoint.
    ///
    /// The previous action list is discarded up front; a quit while reading
    /// drops whatever was entered so far, the way an aborted interactive
    /// read must not leave a partial list behind.
    pub fn read_actions(
        &mut self,
        spec: &str,
        reader: &mut dyn ActionLineReader,
    ) -> Result<(), Error> {
        let Some(number) = self.store.resolve_spec(spec, self.hook.as_ref())? else {
            return Ok(());
        };
        self.hook.print(&format!(
            "Enter actions for tracepoint {number}, one per line.\n"
        ));

        let address = {
            let tp = self.store.get_mut(number).expect("infallible");
            tp.actions.clear();
            tp.address
        };

        let mut lines: Vec<ActionLine> = Vec::new();
        let mut step_count = None;
        let mut stepping = false;
        loop {
            let prompt = if stepping { "  > " } else { "> " };
            let Some(line) = reader.read_line(prompt)? else {
                break;
            };

            let parsed =
                match parse_action_line(&line, address, &self.debug_info, self.arch) {
                    Ok(Some(action)) => action,
                    Ok(None) => continue,
                    Err(err @ Error::BadAction(_)) => {
                        log::warn!(target: "tracer", "{err:#}");
                        continue;
                    }
                    Err(err) => return Err(err),
                };

            match parsed.kind {
                ActionKind::WhileStepping(count) => {
                    if stepping {
                        log::warn!(target: "tracer", "already processing 'while-stepping'");
                        continue;
                    }
                    stepping = true;
                    step_count = Some(count);
                    lines.push(parsed);
                }
                ActionKind::End => {
                    lines.push(parsed);
                    if stepping {
                        stepping = false;
                    } else {
                        break;
                    }
                }
                ActionKind::Collect(_) => lines.push(parsed),
            }
        }

        let tp = self.store.get_mut(number).expect("infallible");
        if let Some(count) = step_count {
            tp.step_count = count;
        }
        tp.actions = lines;
        Ok(())
    }

    // ------------------------------ session control ----------------------------------------------

    fn exchange(&mut self, packet: &str) -> Result<String, Error> {
        let transport = self.transport.as_mut().ok_or(Error::NotRemote)?;
        transport.send(packet)?;
        reply::read_noisy_reply(transport, self.hook.as_ref(), self.arch)
    }

    /// Download every tracepoint to the target and start collecting. The
    /// store and the cursor stay untouched when anything fails; the target
    /// cannot be half-configured because `QTStart` only goes out after all
    /// definitions are acknowledged.
    pub fn tstart(&mut self) -> Result<(), Error> {
        if self.transport.is_none() {
            return Err(Error::NotRemote);
        }

        let reply = self.exchange(packet::QTINIT)?;
        if reply != "OK" {
            return Err(Error::Unsupported);
        }

        let numbers: Vec<u32> = self.store.iter().map(|t| t.number).collect();
        for number in numbers {
            let packet = {
                let tp = self.store.get(number).expect("infallible");
                if tp.actions.is_empty() {
                    packet::qtdp(tp, None)?
                } else {
                    let program = self.compiler.compile(
                        tp,
                        &self.debug_info,
                        self.arch,
                        self.hook.as_ref(),
                    )?;
                    packet::qtdp(tp, Some(&program))?
                }
            };
            let reply = self.exchange(&packet)?;
            if reply != "OK" {
                return Err(Error::Protocol(reply));
            }
        }

        let reply = self.exchange(packet::QTSTART)?;
        if reply != "OK" {
            return Err(Error::Protocol(reply));
        }

        // every previously captured frame is invalid now
        self.set_traceframe_num(-1);
        self.set_tracepoint_num(-1);
        self.set_traceframe_context(None);
        Ok(())
    }

    pub fn tstop(&mut self) -> Result<(), Error> {
        let reply = self.exchange(packet::QTSTOP)?;
        if reply != "OK" {
            return Err(Error::Protocol(reply));
        }
        Ok(())
    }

    pub fn tstatus(&mut self) -> Result<(), Error> {
        let reply = self.exchange(packet::QTSTATUS)?;
        if reply != "OK" {
            return Err(Error::Protocol(reply));
        }
        Ok(())
    }

    // ------------------------------ replay -------------------------------------------------------

    /// Move the replay cursor. The cursor only changes on success.
    pub fn tfind(&mut self, selector: FrameSelector) -> Result<(), Error> {
        if self.transport.is_none() {
            return Err(Error::NotRemote);
        }

        match selector {
            FrameSelector::Next
            | FrameSelector::Prev
            | FrameSelector::Start
            | FrameSelector::End
            | FrameSelector::Number(_) => {
                let frame = match selector {
                    FrameSelector::Next => {
                        if self.traceframe_number == -1 {
                            0
                        } else {
                            self.traceframe_number + 1
                        }
                    }
                    FrameSelector::Prev => {
                        if self.traceframe_number == -1 {
                            return Err(Error::NotReplaying);
                        }
                        if self.traceframe_number == 0 {
                            return Err(Error::AtTraceStart);
                        }
                        self.traceframe_number - 1
                    }
                    FrameSelector::Start => 0,
                    FrameSelector::End => -1,
                    FrameSelector::Number(n) => n,
                    _ => unreachable!(),
                };
                let reply = self.exchange(&packet::qtframe_number(frame))?;

                if frame == -1 {
                    // leaving replay mode: the stub must acknowledge with
                    // exactly F-1
                    if reply != "F-1" {
                        return Err(Error::Protocol(reply));
                    }
                    self.hook.flush_cached_frames();
                    self.hook.registers_changed();
                    self.hook.reselect_frame().map_err(Error::Hook)?;
                    self.set_traceframe_num(-1);
                    self.set_tracepoint_num(-1);
                    self.set_traceframe_context(None);
                    Ok(())
                } else {
                    self.finish_tfind(&reply)
                }
            }
            FrameSelector::Pc(pc) => {
                let pc = match pc.or_else(|| self.hook.current_pc()) {
                    Some(pc) => pc,
                    None => {
                        return Err(Error::InvalidArgument(
                            "current pc is unknown".to_string(),
                        ))
                    }
                };
                let reply = self.exchange(&packet::qtframe_pc(pc))?;
                self.finish_tfind(&reply)
            }
            FrameSelector::Tracepoint(number) => {
                let number = match number {
                    Some(n) => n,
                    None if self.tracepoint_number >= 0 => self.tracepoint_number as u32,
                    None => {
                        return Err(Error::InvalidArgument(
                            "no current tracepoint -- please supply an argument".to_string(),
                        ))
                    }
                };
                let reply = self.exchange(&packet::qtframe_tdp(number))?;
                self.finish_tfind(&reply)
            }
            FrameSelector::Line(spec) => self.tfind_line(spec),
            FrameSelector::Range(start, end) => {
                let reply = self.exchange(&packet::qtframe_range(start, end))?;
                self.finish_tfind(&reply)
            }
            FrameSelector::Outside(start, end) => {
                let reply = self.exchange(&packet::qtframe_outside(start, end))?;
                self.finish_tfind(&reply)
            }
        }
    }

    fn tfind_line(&mut self, spec: Option<String>) -> Result<(), Error> {
        let place = match &spec {
            Some(location) => self
                .debug_info
                .resolve_location(location)?
                .into_iter()
                .next()
                .ok_or_else(|| Error::LocationNotFound(location.clone()))?,
            None => {
                let pc = self.hook.current_pc().ok_or_else(|| {
                    Error::InvalidArgument("current pc is unknown".to_string())
                })?;
                self.debug_info
                    .find_place(pc)
                    .ok_or(Error::NoSuitableLine)?
            }
        };

        let (start, end) = match self.debug_info.line_range(&place) {
            Some(range) => range,
            None if place.file.is_none() && place.pc != 0 => {
                // no line table around the PC: fall back to a plain PC find
                self.hook.print(&format!(
                    "No line number information available for address {:#x}; will attempt to find by PC.\n",
                    place.pc
                ));
                let reply = self.exchange(&packet::qtframe_pc(place.pc))?;
                return self.finish_tfind(&reply);
            }
            None => {
                return Err(Error::LineOutOfRange(
                    place.line,
                    place
                        .file
                        .as_ref()
                        .map(|f| f.display().to_string())
                        .unwrap_or_default(),
                ))
            }
        };

        let (start, end) = if start == end {
            // the line exists but generated no code: try the next line that did
            let file = place
                .file
                .as_ref()
                .map(|f| f.display().to_string())
                .unwrap_or_default();
            self.hook.print(&format!(
                "Line {} of \"{file}\" is at address {start:#x} but contains no code.\n",
                place.line
            ));
            let next = self
                .debug_info
                .find_place(start)
                .ok_or(Error::NoSuitableLine)?;
            let range = self
                .debug_info
                .line_range(&next)
                .filter(|(s, e)| s != e)
                .ok_or(Error::NoSuitableLine)?;
            self.hook
                .print(&format!("Attempting to find line {} instead.\n", next.line));
            range
        } else {
            (start, end)
        };

        let packet = if spec.is_some() {
            packet::qtframe_range(start, end - 1)
        } else {
            // no argument: a frame somewhere other than the current line
            packet::qtframe_outside(start, end - 1)
        };
        let reply = self.exchange(&packet)?;
        self.finish_tfind(&reply)
    }

    /// Interpret a frame-selection reply: any interleaving of `F<hex>`,
    /// `T<hex>` and a terminating `OK`. On success resynchronise the frame
    /// machinery and the replay cursor.
    fn finish_tfind(&mut self, reply: &str) -> Result<(), Error> {
        let mut frame: i64 = -1;
        let mut tracepoint: i64 = -1;

        let mut rest = reply;
        while !rest.is_empty() {
            match rest.as_bytes()[0] {
                b'F' => {
                    let (value, tail) = parse_hex_signed(&rest[1..])
                        .ok_or_else(|| Error::Protocol(reply.to_string()))?;
                    if value == -1 {
                        return Err(Error::NotFound);
                    }
                    frame = value;
                    rest = tail;
                }
                b'T' => {
                    let (value, tail) = parse_hex_signed(&rest[1..])
                        .ok_or_else(|| Error::Protocol(reply.to_string()))?;
                    if value == -1 {
                        return Err(Error::NotFound);
                    }
                    tracepoint = value;
                    rest = tail;
                }
                b'O' if rest == "OK" => break,
                _ => return Err(Error::Protocol(reply.to_string())),
            }
        }

        self.hook.flush_cached_frames();
        self.hook.registers_changed();
        self.hook.reselect_frame().map_err(Error::Hook)?;
        self.set_traceframe_num(frame);
        self.set_tracepoint_num(tracepoint);
        let pc = self.hook.current_pc();
        self.set_traceframe_context(pc);
        Ok(())
    }

    /// Replay the data collected at the current frame, in place.
    pub fn tdump(&self) -> Result<(), Error> {
        if self.tracepoint_number == -1 {
            log::warn!(target: "tracer", "no current trace frame");
            return Ok(());
        }
        let number = self.tracepoint_number as u32;
        let tp = self.store.get(number).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "no known tracepoint matches 'current' tracepoint #{number}"
            ))
        })?;

        self.hook.print(&format!(
            "Data collected at tracepoint {}, trace frame {}:\n",
            self.tracepoint_number, self.traceframe_number
        ));

        // A frame whose PC is not the tracepoint address was collected
        // while single-stepping; display only the matching sub-program.
        let stepping_frame = self
            .hook
            .current_pc()
            .map(|pc| pc != tp.address)
            .unwrap_or(false);

        let mut stepping_actions = false;
        for action in &tp.actions {
            match &action.kind {
                ActionKind::WhileStepping(_) => stepping_actions = true,
                ActionKind::End => stepping_actions = false,
                ActionKind::Collect(_) if stepping_frame == stepping_actions => {
                    for operand in actions::split_operands(&action.source["collect".len()..]) {
                        let lower = operand.to_ascii_lowercase();
                        if lower.starts_with("$reg") {
                            self.hook.dump_registers();
                        } else if lower.starts_with("$loc") {
                            self.hook.dump_locals();
                        } else if lower.starts_with("$arg") {
                            self.hook.dump_args();
                        } else {
                            self.hook.print(&format!("{operand} = "));
                            self.hook.print_expression(operand);
                        }
                    }
                }
                ActionKind::Collect(_) => {}
            }
        }
        Ok(())
    }

    /// Serialise the store as a script of `trace`/`passcount`/`actions`
    /// commands; sourcing the file reconstructs an equivalent store.
    pub fn save_tracepoints(&self, path: &Path) -> Result<(), Error> {
        if self.store.is_empty() {
            log::warn!(target: "tracer", "save-tracepoints: no tracepoints to save");
            return Ok(());
        }

        let mut file =
            fs::File::create(path).map_err(|_| Error::FileOpen(path.to_path_buf()))?;
        for tp in self.store.iter() {
            match &tp.addr_string {
                Some(spec) => writeln!(file, "trace {spec}")?,
                None => writeln!(file, "trace *0x{:x}", tp.address)?,
            }
            if tp.pass_count > 0 {
                writeln!(file, "  passcount {}", tp.pass_count)?;
            }
            if !tp.actions.is_empty() {
                writeln!(file, "  actions")?;
                let (i1, i2) = ("    ", "      ");
                let mut indent = i1;
                for action in &tp.actions {
                    writeln!(file, "{indent}{}", action.source)?;
                    match action.kind {
                        ActionKind::WhileStepping(_) => indent = i2,
                        ActionKind::End => indent = i1,
                        ActionKind::Collect(_) => {}
                    }
                }
            }
        }

        self.hook.print(&format!(
            "Tracepoints saved to file '{}'.\n",
            path.display()
        ));
        Ok(())
    }

    /// Diagnostic listing of every symbol visible at a location, with its
    /// storage class.
    pub fn scope(&self, location: &str) -> Result<(), Error> {
        let location = location.trim();
        if location.is_empty() {
            return Err(Error::InvalidArgument(
                "requires an argument (function, line or *addr) to define a scope".to_string(),
            ));
        }
        let place = self
            .debug_info
            .resolve_location(location)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::LocationNotFound(location.to_string()))?;

        let mut count = 0usize;
        for block in self.debug_info.blocks_for_pc(place.pc) {
            for sym in &block.symbols {
                if sym.name.is_empty() {
                    continue;
                }
                if count == 0 {
                    self.hook.print(&format!("Scope for {location}:\n"));
                }
                count += 1;

                let what = describe_storage(sym, |n| self.arch.register_name(n));
                if sym.byte_len > 0 {
                    self.hook.print(&format!(
                        "Symbol {} is {what}, length {}.\n",
                        sym.name, sym.byte_len
                    ));
                } else {
                    self.hook
                        .print(&format!("Symbol {} is {what}.\n", sym.name));
                }
            }
            if block.function_boundary {
                break;
            }
        }

        if count == 0 {
            self.hook.print(&format!(
                "Scope for {location} contains no locals or arguments.\n"
            ));
        }
        Ok(())
    }

    // ------------------------------ replay cursor --------------------------------------------

    fn set_traceframe_num(&mut self, num: i64) {
        self.traceframe_number = num;
        self.hook.set_int_var("trace_frame", num);
    }

    fn set_tracepoint_num(&mut self, num: i64) {
        self.tracepoint_number = num;
        self.hook.set_int_var("tracepoint", num);
    }

    /// Reflect the replayed frame's source context into the user-visible
    /// convenience values. `None` ceases replay debugging.
    fn set_traceframe_context(&mut self, pc: Option<u64>) {
        let Some(pc) = pc else {
            self.hook.set_int_var("trace_line", -1);
            self.hook.set_str_var("trace_func", "");
            self.hook.set_str_var("trace_file", "");
            return;
        };

        let place = self.debug_info.find_place(pc);
        self.hook.set_int_var(
            "trace_line",
            place.as_ref().map(|p| p.line as i64).unwrap_or(0),
        );
        self.hook.set_str_var(
            "trace_func",
            &self.debug_info.function_name(pc).unwrap_or_default(),
        );
        self.hook.set_str_var(
            "trace_file",
            &place
                .as_ref()
                .and_then(|p| p.file.as_ref())
                .map(|f| f.display().to_string())
                .unwrap_or_default(),
        );
    }
}

fn parse_hex_signed(s: &str) -> Option<(i64, &str)> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let len = digits
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(digits.len());
    if len == 0 {
        return None;
    }
    let value = i64::from_str_radix(&digits[..len], 16).ok()?;
    Some((if negative { -value } else { value }, &digits[len..]))
}

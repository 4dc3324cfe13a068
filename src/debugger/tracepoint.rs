//! The tracepoint catalogue: definitions, numbering and lifecycle.

use crate::debugger::actions::ActionLine;
use crate::debugger::error::Error;
use crate::debugger::symbol::{Language, SourcePlace};
use crate::debugger::SessionHook;
use std::path::PathBuf;
use std::slice;

/// One user-defined trace location.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracepoint {
    /// Stable number, assigned monotonically, never reused in a session.
    pub number: u32,
    /// Target PC.
    pub address: u64,
    pub enabled: bool,
    /// Hits before tracing stops; 0 means unlimited.
    pub pass_count: u64,
    /// Instructions to single-step after a hit; 0 none, −1 target decides.
    pub step_count: i64,
    /// Canonical locator for re-resolution in a later session.
    pub addr_string: Option<String>,
    pub condition: Option<String>,
    pub source_file: Option<PathBuf>,
    pub line_number: u64,
    /// Lexical context captured at definition time; action expressions are
    /// re-parsed with it.
    pub language: Language,
    pub input_radix: u32,
    pub actions: Vec<ActionLine>,
}

impl Tracepoint {
    fn new(
        number: u32,
        place: &SourcePlace,
        addr_string: Option<String>,
        language: Language,
        input_radix: u32,
    ) -> Self {
        Self {
            number,
            address: place.pc,
            enabled: true,
            pass_count: 0,
            step_count: 0,
            addr_string,
            condition: None,
            source_file: place.source_path(),
            line_number: place.line,
            language,
            input_radix,
            actions: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn test_stub(number: u32, address: u64) -> Self {
        Self {
            number,
            address,
            enabled: true,
            pass_count: 0,
            step_count: 0,
            addr_string: None,
            condition: None,
            source_file: None,
            line_number: 0,
            language: Language::Unknown,
            input_radix: 10,
            actions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracepointOp {
    Enable,
    Disable,
    Delete,
}

/// Target of a `passcount` update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassTarget {
    All,
    /// No operand: the last tracepoint defined.
    Last,
    Spec(String),
}

/// Owns every tracepoint. The list is kept in insertion order; deletion
/// compacts it but survivors keep their numbers.
#[derive(Default)]
pub struct TracepointStore {
    list: Vec<Tracepoint>,
    count: u32,
}

impl TracepointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a tracepoint for an already resolved place.
    ///
    /// Every failing validation must happen before this call; once the
    /// entry is appended there is no error path.
    pub fn create(
        &mut self,
        place: &SourcePlace,
        addr_string: Option<String>,
        language: Language,
        input_radix: u32,
        hook: &dyn SessionHook,
    ) -> &Tracepoint {
        self.count += 1;
        self.list.push(Tracepoint::new(
            self.count,
            place,
            addr_string,
            language,
            input_radix,
        ));
        hook.set_int_var("tpnum", self.count as i64);

        let tp = self.list.last().expect("infallible");
        hook.on_tracepoint_created(tp);
        tp
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Number of the last tracepoint created, deleted or not.
    pub fn last_number(&self) -> u32 {
        self.count
    }

    pub fn get(&self, number: u32) -> Option<&Tracepoint> {
        self.list.iter().find(|t| t.number == number)
    }

    pub fn get_mut(&mut self, number: u32) -> Option<&mut Tracepoint> {
        self.list.iter_mut().find(|t| t.number == number)
    }

    pub fn iter(&self) -> slice::Iter<'_, Tracepoint> {
        self.list.iter()
    }

    /// Parse a tracepoint number specifier: a decimal number, an empty
    /// string (the last tracepoint created) or a convenience variable
    /// reference.
    pub fn parse_number_spec(&self, spec: &str, hook: &dyn SessionHook) -> Result<i64, Error> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Ok(self.count as i64);
        }
        if let Some(var) = spec.strip_prefix('$') {
            let name: String = var
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect();
            return hook.get_int_var(&name).ok_or_else(|| {
                Error::InvalidArgument("convenience variable must have integral type".to_string())
            });
        }
        spec.parse::<i64>()
            .map_err(|_| Error::InvalidArgument(format!("bad tracepoint number: {spec}")))
    }

    /// Resolve a specifier to an existing tracepoint number. Unknown
    /// numbers warn and yield `None`.
    pub fn resolve_spec(&self, spec: &str, hook: &dyn SessionHook) -> Result<Option<u32>, Error> {
        let number = self.parse_number_spec(spec, hook)?;
        match self.list.iter().find(|t| t.number as i64 == number) {
            Some(tp) => Ok(Some(tp.number)),
            None => {
                log::warn!(target: "tracer", "no tracepoint number {number}");
                Ok(None)
            }
        }
    }

    /// Convenience form of [`Self::resolve_spec`] yielding the tracepoint.
    pub fn lookup_spec(
        &self,
        spec: &str,
        hook: &dyn SessionHook,
    ) -> Result<Option<&Tracepoint>, Error> {
        Ok(self
            .resolve_spec(spec, hook)?
            .and_then(|number| self.get(number)))
    }

    /// Apply an enable, disable or delete over a specifier list; an empty
    /// list spans every tracepoint. Interactive confirmation for
    /// delete-all is the caller's business.
    pub fn apply(
        &mut self,
        op: TracepointOp,
        specs: &[String],
        hook: &dyn SessionHook,
    ) -> Result<(), Error> {
        if specs.is_empty() {
            let numbers: Vec<u32> = self.list.iter().map(|t| t.number).collect();
            for number in numbers {
                self.operate(op, number, hook);
            }
            return Ok(());
        }

        for spec in specs {
            if let Some(number) = self.resolve_spec(spec, hook)? {
                self.operate(op, number, hook);
            }
        }
        Ok(())
    }

    fn operate(&mut self, op: TracepointOp, number: u32, hook: &dyn SessionHook) {
        match op {
            TracepointOp::Enable => {
                if let Some(tp) = self.get_mut(number) {
                    tp.enabled = true;
                }
            }
            TracepointOp::Disable => {
                if let Some(tp) = self.get_mut(number) {
                    tp.enabled = false;
                }
            }
            TracepointOp::Delete => {
                if let Some(idx) = self.list.iter().position(|t| t.number == number) {
                    let tp = self.list.remove(idx);
                    hook.on_tracepoint_deleted(&tp);
                }
            }
        }
    }

    pub fn set_pass_count(
        &mut self,
        target: PassTarget,
        count: u64,
        hook: &dyn SessionHook,
    ) -> Result<(), Error> {
        let numbers: Vec<u32> = match target {
            PassTarget::All => self.list.iter().map(|t| t.number).collect(),
            PassTarget::Last => match self.resolve_spec("", hook)? {
                Some(number) => vec![number],
                None => return Ok(()),
            },
            PassTarget::Spec(spec) => match self.resolve_spec(&spec, hook)? {
                Some(number) => vec![number],
                None => return Ok(()),
            },
        };

        for number in numbers {
            if let Some(tp) = self.get_mut(number) {
                tp.pass_count = count;
                hook.print(&format!(
                    "Setting tracepoint {number}'s passcount to {count}\n"
                ));
            }
        }
        Ok(())
    }
}

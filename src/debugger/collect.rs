//! Compilation of action programs into collection lists: storage-class
//! dispatch for single symbols, scope walks for `$locals`/`$args`, and the
//! trap/stepping split.

use crate::debugger::actions::{ActionKind, CollectItem};
use crate::debugger::arch::Arch;
use crate::debugger::collection::CollectionList;
use crate::debugger::error::Error;
use crate::debugger::symbol::{CollectExpression, DebugInfo, StorageClass, Symbol};
use crate::debugger::tracepoint::Tracepoint;
use crate::debugger::SessionHook;

/// What a scope walk is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Locals,
    Arguments,
}

/// Emit collection entries for one symbol according to its storage class.
pub fn collect_symbol(
    list: &mut CollectionList,
    sym: &Symbol,
    arch: &Arch,
    hook: &dyn SessionHook,
) -> Result<(), Error> {
    let len = sym.byte_len;
    match sym.class {
        StorageClass::Static { address } => list.add_memrange(0, address as i64, len)?,
        StorageClass::Register { number } | StorageClass::RegParm { number } => {
            list.add_register(number)?
        }
        StorageClass::RegParmAddr { number } => list.add_memrange(number, 0, len)?,
        StorageClass::Local { offset } | StorageClass::LocalArg { offset } => {
            list.add_memrange(arch.fp_regnum, offset, len)?
        }
        StorageClass::BaseReg { basereg, offset } | StorageClass::BaseRegArg { basereg, offset } => {
            list.add_memrange(basereg, offset, len)?
        }
        StorageClass::Const { value } => hook.print(&format!(
            "{} is constant, value is {value}: will not be collected.\n",
            sym.name
        )),
        StorageClass::OptimizedOut => hook.print(&format!(
            "{} has been optimized out of existence.\n",
            sym.name
        )),
        StorageClass::Unresolved => hook.print(&format!(
            "don't know how to collect unresolved symbol {}\n",
            sym.name
        )),
        StorageClass::Arg { .. } | StorageClass::RefArg { .. } => hook.print(&format!(
            "sorry, don't know how to collect stack arguments yet\n       (will not collect {})\n",
            sym.name
        )),
    }
    Ok(())
}

/// Walk the lexical blocks enclosing `pc` outward, collecting every symbol
/// of the wanted kind, and stop after the function body block.
fn add_scope_symbols(
    list: &mut CollectionList,
    pc: u64,
    kind: ScopeKind,
    debug_info: &dyn DebugInfo,
    arch: &Arch,
    hook: &dyn SessionHook,
) -> Result<(), Error> {
    let mut count = 0usize;
    for block in debug_info.blocks_for_pc(pc) {
        for sym in &block.symbols {
            let wanted = match kind {
                ScopeKind::Locals => matches!(
                    sym.class,
                    StorageClass::Local { .. }
                        | StorageClass::Static { .. }
                        | StorageClass::Register { .. }
                        | StorageClass::BaseReg { .. }
                ),
                ScopeKind::Arguments => matches!(
                    sym.class,
                    StorageClass::Arg { .. }
                        | StorageClass::LocalArg { .. }
                        | StorageClass::RefArg { .. }
                        | StorageClass::RegParm { .. }
                        | StorageClass::RegParmAddr { .. }
                        | StorageClass::BaseRegArg { .. }
                ),
            };
            if wanted {
                count += 1;
                collect_symbol(list, sym, arch, hook)?;
            }
        }
        if block.function_boundary {
            break;
        }
    }
    if count == 0 {
        let what = match kind {
            ScopeKind::Locals => "locals",
            ScopeKind::Arguments => "args",
        };
        log::warn!(target: "tracer", "no {what} found in scope");
    }
    Ok(())
}

/// Compiled form of one tracepoint's action program.
pub struct CompiledProgram<'a> {
    /// Collected when the tracepoint is hit.
    pub trap: &'a CollectionList,
    /// Collected on every single-step after the hit.
    pub stepping: &'a CollectionList,
}

/// Compiles action programs. The two scratch lists are reused across
/// compilations; their storage only grows.
#[derive(Default)]
pub struct ActionCompiler {
    trap: CollectionList,
    stepping: CollectionList,
}

impl ActionCompiler {
    pub fn new() -> Self {
        Self {
            trap: CollectionList::new(),
            stepping: CollectionList::new(),
        }
    }

    pub fn compile(
        &mut self,
        tp: &Tracepoint,
        debug_info: &dyn DebugInfo,
        arch: &Arch,
        hook: &dyn SessionHook,
    ) -> Result<CompiledProgram<'_>, Error> {
        self.trap.clear();
        self.stepping.clear();

        let mut stepping_active = false;
        'program: for action in &tp.actions {
            match &action.kind {
                ActionKind::Collect(items) => {
                    let list = if stepping_active {
                        &mut self.stepping
                    } else {
                        &mut self.trap
                    };
                    for item in items {
                        compile_item(list, item, tp.address, debug_info, arch, hook)?;
                    }
                }
                ActionKind::WhileStepping(_) => stepping_active = true,
                ActionKind::End => {
                    if stepping_active {
                        stepping_active = false;
                    } else {
                        break 'program;
                    }
                }
            }
        }

        self.trap.finalize(arch.max_register_virtual_size);
        self.stepping.finalize(arch.max_register_virtual_size);

        Ok(CompiledProgram {
            trap: &self.trap,
            stepping: &self.stepping,
        })
    }
}

fn compile_item(
    list: &mut CollectionList,
    item: &CollectItem,
    scope_pc: u64,
    debug_info: &dyn DebugInfo,
    arch: &Arch,
    hook: &dyn SessionHook,
) -> Result<(), Error> {
    match item {
        CollectItem::AllRegisters => {
            for regno in 0..arch.num_regs {
                list.add_register(regno)?;
            }
            Ok(())
        }
        CollectItem::AllArguments => add_scope_symbols(
            list,
            scope_pc,
            ScopeKind::Arguments,
            debug_info,
            arch,
            hook,
        ),
        CollectItem::AllLocals => {
            add_scope_symbols(list, scope_pc, ScopeKind::Locals, debug_info, arch, hook)
        }
        CollectItem::Memrange {
            basereg,
            offset,
            len,
        } => list.add_memrange(*basereg, *offset, *len),
        CollectItem::Expression(expr) => {
            // The operand was validated at entry time, but the program may
            // be recompiled long after: classify it again.
            match debug_info.classify_collect_expression(expr, scope_pc)? {
                CollectExpression::Register(number) => list.add_register(number),
                CollectExpression::Variable(sym) => collect_symbol(list, &sym, arch, hook),
                CollectExpression::Unsupported => {
                    log::warn!(target: "tracer", "cannot collect '{expr}', skipped");
                    Ok(())
                }
            }
        }
    }
}

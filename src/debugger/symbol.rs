//! Symbol model and the seam to the symbol table, line table and expression
//! parser. The debugger proper provides an implementation of [`DebugInfo`];
//! the trace subsystem only consumes it.

use crate::debugger::error::Error;
use std::path::{Path, PathBuf};
use strum_macros::{Display, EnumString};

/// Source language active when a tracepoint was defined. Action expressions
/// are re-parsed in this lexical context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    C,
    #[strum(serialize = "c++")]
    Cpp,
    Rust,
    Asm,
    #[default]
    Unknown,
}

/// A resolved source location: the result of decoding a line specifier or of
/// looking a PC up in the line table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePlace {
    pub pc: u64,
    pub line: u64,
    pub file: Option<PathBuf>,
    pub directory: Option<PathBuf>,
    /// Canonical form of the specifier that produced this place, suitable
    /// for re-resolution in a later session.
    pub addr_string: Option<String>,
}

impl SourcePlace {
    /// Full path of the source file, directory and file name joined with the
    /// platform separator.
    pub fn source_path(&self) -> Option<PathBuf> {
        let file = self.file.as_ref()?;
        match &self.directory {
            Some(dir) => Some(dir.join(file)),
            None => Some(file.clone()),
        }
    }
}

/// Where a symbol lives at a given PC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    /// Fixed address in target memory.
    Static { address: u64 },
    /// Value lives in a register.
    Register { number: u16 },
    /// Argument passed in a register.
    RegParm { number: u16 },
    /// Argument whose address is passed in a register.
    RegParmAddr { number: u16 },
    /// Frame-pointer-relative local.
    Local { offset: i64 },
    /// Argument addressed like a local.
    LocalArg { offset: i64 },
    /// Offset from an arbitrary base register.
    BaseReg { basereg: u16, offset: i64 },
    /// Argument addressed off a base register.
    BaseRegArg { basereg: u16, offset: i64 },
    /// Argument at a stack offset the collector cannot express.
    Arg { offset: i64 },
    /// Argument passed by reference.
    RefArg { offset: i64 },
    /// Compile-time constant, nothing to collect.
    Const { value: i64 },
    OptimizedOut,
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub class: StorageClass,
    /// Length of the symbol's type in bytes, typedefs already resolved.
    pub byte_len: u64,
}

/// One lexical block, innermost first in [`DebugInfo::blocks_for_pc`] order.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub symbols: Vec<Symbol>,
    /// True when this block is a function body; the outward walk of the
    /// collector does not continue past it.
    pub function_boundary: bool,
}

/// Classification of a `collect` operand by the expression parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectExpression {
    Register(u16),
    Variable(Symbol),
    /// Constants, casts, computed addresses: nothing the target can collect.
    Unsupported,
}

/// Services of the symbol table, line table and expression parser.
pub trait DebugInfo {
    /// Decode a line specifier (function, file:line, `*addr`) into places
    /// with fully resolved PCs.
    fn resolve_location(&self, location: &str) -> Result<Vec<SourcePlace>, Error>;

    /// Line table entry covering `pc`.
    fn find_place(&self, pc: u64) -> Option<SourcePlace>;

    /// Name of the function containing `pc`.
    fn function_name(&self, pc: u64) -> Option<String>;

    /// PC range `[start, end)` generated for the line of `place`. `None`
    /// when the place has no line information.
    fn line_range(&self, place: &SourcePlace) -> Option<(u64, u64)>;

    /// Lexical blocks enclosing `pc`, innermost first, up to and including
    /// the function body block.
    fn blocks_for_pc(&self, pc: u64) -> Vec<Block>;

    /// Parse a `collect` operand in the scope of `scope_pc` and classify it.
    fn classify_collect_expression(
        &self,
        expression: &str,
        scope_pc: u64,
    ) -> Result<CollectExpression, Error>;

    fn current_language(&self) -> Language;

    fn input_radix(&self) -> u32;
}

/// Human description of a storage class, used by the `scope` listing.
pub fn describe_storage(sym: &Symbol, register_name: impl Fn(u16) -> Option<&'static str>) -> String {
    let reg = |n: u16| register_name(n).unwrap_or("?");
    match sym.class {
        StorageClass::Static { address } => {
            format!("in static storage at address {address:#x}")
        }
        StorageClass::Register { number } => {
            format!("a local variable in register ${}", reg(number))
        }
        StorageClass::RegParm { number } => format!("an argument in register ${}", reg(number)),
        StorageClass::RegParmAddr { number } => {
            format!("the address of an argument, in register ${}", reg(number))
        }
        StorageClass::Local { offset } => format!("a local variable at frame offset {offset}"),
        StorageClass::LocalArg { offset } | StorageClass::Arg { offset } => {
            format!("an argument at stack/frame offset {offset}")
        }
        StorageClass::RefArg { offset } => format!("a reference argument at offset {offset}"),
        StorageClass::BaseReg { basereg, offset } => {
            format!("a variable at offset {offset} from register ${}", reg(basereg))
        }
        StorageClass::BaseRegArg { basereg, offset } => {
            format!("an argument at offset {offset} from register ${}", reg(basereg))
        }
        StorageClass::Const { value } => format!("a constant with value {value} ({value:#x})"),
        StorageClass::OptimizedOut => "optimized out".to_string(),
        StorageClass::Unresolved => "unresolved static storage".to_string(),
    }
}

//! Tracepoint action lists: the `collect` / `while-stepping` / `end` mini
//! language. Lines are validated and classified at entry time; compilation
//! into collection lists happens later, against the same classification.

use crate::debugger::arch::Arch;
use crate::debugger::error::Error;
use crate::debugger::symbol::{CollectExpression, DebugInfo, StorageClass};

/// One accepted action line: the raw text plus its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLine {
    pub source: String,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Collect(Vec<CollectItem>),
    /// Instruction count to single-step after a hit; −1 lets the target
    /// decide.
    WhileStepping(i64),
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectItem {
    /// `$reg…`: the whole register file.
    AllRegisters,
    /// `$arg…`: every argument visible at the tracepoint.
    AllArguments,
    /// `$loc…`: every local visible at the tracepoint.
    AllLocals,
    /// `$( [$reg,] offset, size )` literal.
    Memrange { basereg: u16, offset: i64, len: u64 },
    /// A variable or register reference, re-resolved at compile time.
    Expression(String),
}

/// Validate one action line in the scope of `scope_pc`.
///
/// `Ok(None)` is an empty line (silently skipped). A rejected line comes
/// back as [`Error::BadAction`] carrying the warning text; callers drop the
/// line and keep going.
pub fn parse_action_line(
    line: &str,
    scope_pc: u64,
    debug_info: &dyn DebugInfo,
    arch: &Arch,
) -> Result<Option<ActionLine>, Error> {
    let text = line.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let kind = if let Some(rest) = keyword(text, "collect") {
        ActionKind::Collect(parse_collect_items(rest, scope_pc, debug_info, arch)?)
    } else if let Some(rest) = keyword(text, "while-stepping") {
        ActionKind::WhileStepping(parse_step_count(rest)?)
    } else if keyword(text, "end").is_some() {
        ActionKind::End
    } else {
        return Err(Error::BadAction(format!(
            "'{text}' is not a supported tracepoint action"
        )));
    };

    Ok(Some(ActionLine {
        source: text.to_string(),
        kind,
    }))
}

/// Case-insensitive keyword prefix match, the rest of the line returned on
/// success.
fn keyword<'a>(text: &'a str, kw: &str) -> Option<&'a str> {
    let head = text.get(..kw.len())?;
    head.eq_ignore_ascii_case(kw).then(|| &text[kw.len()..])
}

fn parse_step_count(rest: &str) -> Result<i64, Error> {
    let rest = rest.trim();
    if rest.is_empty() {
        // no operand: unbounded, target decides
        return Ok(-1);
    }
    let (count, _) = parse_int(rest)
        .ok_or_else(|| Error::BadAction(format!("bad step count '{rest}' -- command ignored")))?;
    if count == 0 {
        return Err(Error::BadAction(format!(
            "'{rest}' evaluates to zero -- command ignored"
        )));
    }
    Ok(count)
}

fn parse_collect_items(
    mut rest: &str,
    scope_pc: u64,
    debug_info: &dyn DebugInfo,
    arch: &Arch,
) -> Result<Vec<CollectItem>, Error> {
    let mut items = Vec::new();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(after_dollar) = rest.strip_prefix('$') {
            if prefix3(after_dollar, "reg") {
                items.push(CollectItem::AllRegisters);
                rest = skip_to_comma(rest);
                continue;
            }
            if prefix3(after_dollar, "arg") {
                items.push(CollectItem::AllArguments);
                rest = skip_to_comma(rest);
                continue;
            }
            if prefix3(after_dollar, "loc") {
                items.push(CollectItem::AllLocals);
                rest = skip_to_comma(rest);
                continue;
            }
            if let Some(body) = after_dollar.strip_prefix('(') {
                let (item, after) = parse_memrange_literal(rest, body, arch)?;
                items.push(item);
                rest = expect_separator(after)?;
                continue;
            }
        }

        // Everything else must be an expression naming a variable or a
        // register.
        let (expr, after) = split_expression(rest);
        items.push(classify_expression(expr, scope_pc, debug_info)?);
        rest = expect_separator(after)?;
    }

    Ok(items)
}

fn prefix3(s: &str, kw: &str) -> bool {
    s.get(..3).is_some_and(|head| head.eq_ignore_ascii_case(kw))
}

/// `$reg`-style items swallow everything up to the next comma.
fn skip_to_comma(s: &str) -> &str {
    match s.find(',') {
        Some(idx) => &s[idx + 1..],
        None => "",
    }
}

/// Consume an optional `,` separator after an item.
fn expect_separator(s: &str) -> Result<&str, Error> {
    let s = s.trim_start();
    match s.strip_prefix(',') {
        Some(rest) => Ok(rest),
        None if s.is_empty() => Ok(""),
        None => Err(Error::BadAction(
            "collect: enter variable name or register".to_string(),
        )),
    }
}

/// Textual split of a `collect` operand list, commas outside parens and
/// brackets separating. Used when a stored line is re-walked for display.
pub(crate) fn split_operands(mut rest: &str) -> Vec<&str> {
    let mut out = Vec::new();
    loop {
        let (item, after) = split_expression(rest);
        if !item.is_empty() {
            out.push(item);
        }
        match after.strip_prefix(',') {
            Some(tail) => rest = tail,
            None => break,
        }
    }
    out
}

/// Slice one expression operand: up to the next comma outside parens and
/// brackets.
fn split_expression(s: &str) -> (&str, &str) {
    let mut depth = 0i32;
    for (idx, ch) in s.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => return (s[..idx].trim(), &s[idx..]),
            _ => {}
        }
    }
    (s.trim(), "")
}

fn classify_expression(
    expr: &str,
    scope_pc: u64,
    debug_info: &dyn DebugInfo,
) -> Result<CollectItem, Error> {
    match debug_info.classify_collect_expression(expr, scope_pc)? {
        CollectExpression::Register(_) => Ok(CollectItem::Expression(expr.to_string())),
        CollectExpression::Variable(sym) => match sym.class {
            StorageClass::Const { value } => Err(Error::BadAction(format!(
                "{} is constant (value {value}): will not be collected",
                sym.name
            ))),
            StorageClass::OptimizedOut => Err(Error::BadAction(format!(
                "{} is optimized away and cannot be collected",
                sym.name
            ))),
            _ => Ok(CollectItem::Expression(expr.to_string())),
        },
        CollectExpression::Unsupported => Err(Error::BadAction(
            "collect: enter variable name or register".to_string(),
        )),
    }
}

/// Parse `$( [$regname,] offset, size )`. `whole` is the item from its `$`
/// on, used in diagnostics; `body` starts right after the opening paren.
fn parse_memrange_literal<'a>(
    whole: &str,
    body: &'a str,
    arch: &Arch,
) -> Result<(CollectItem, &'a str), Error> {
    let mut rest = body.trim_start();

    let basereg = if let Some(after_dollar) = rest.strip_prefix('$') {
        let name_len = after_dollar
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(after_dollar.len());
        let name = &after_dollar[..name_len];
        let reg = arch
            .register_by_name(name)
            .ok_or_else(|| Error::BadAction(format!("bad register operand for memrange: {whole}")))?;
        rest = after_dollar[name_len..].trim_start();
        rest = rest.strip_prefix(',').ok_or_else(|| {
            Error::BadAction(format!("missing comma for memrange: {whole}"))
        })?;
        reg.number
    } else {
        0
    };

    let (offset, after) = parse_int(rest)
        .ok_or_else(|| Error::BadAction(format!("bad offset operand for memrange: {whole}")))?;
    let after = after.trim_start();
    let after = after
        .strip_prefix(',')
        .ok_or_else(|| Error::BadAction(format!("missing comma for memrange: {whole}")))?;

    let (size, after) = parse_int(after)
        .ok_or_else(|| Error::BadAction(format!("bad size operand for memrange: {whole}")))?;
    if size <= 0 {
        return Err(Error::BadAction(format!("invalid size in memrange: {whole}")));
    }
    let after = after.trim_start();
    let after = after.strip_prefix(')').ok_or_else(|| {
        Error::BadAction(format!("missing close-parenthesis for memrange: {whole}"))
    })?;

    log::debug!(target: "tracer", "collecting memrange: ({basereg:#x},{offset:#x},{size:#x})");
    Ok((
        CollectItem::Memrange {
            basereg,
            offset,
            len: size as u64,
        },
        after,
    ))
}

/// Integer scan: optional sign, `0x` hex or decimal. Returns the value and
/// the unconsumed tail. Offsets and sizes are integers only; expressions
/// here would make the `$` of a register name ambiguous.
fn parse_int(s: &str) -> Option<(i64, &str)> {
    let s = s.trim_start();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let (digits_len, radix, s) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (
            hex.find(|c: char| !c.is_ascii_hexdigit()).unwrap_or(hex.len()),
            16,
            hex,
        )
    } else {
        (
            s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len()),
            10,
            s,
        )
    };
    if digits_len == 0 {
        return None;
    }

    let value = i64::from_str_radix(&s[..digits_len], radix).ok()?;
    Some((if negative { -value } else { value }, &s[digits_len..]))
}

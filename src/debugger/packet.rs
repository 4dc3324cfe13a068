//! Wire form of trace protocol requests. All integers are lowercase hex
//! without a `0x` prefix; negative offsets travel as 64-bit two's
//! complement.

use crate::debugger::collect::CompiledProgram;
use crate::debugger::collection::CollectionList;
use crate::debugger::error::Error;
use crate::debugger::tracepoint::Tracepoint;
use std::fmt::Write as _;

/// Transport packet size limit.
pub const PACKET_LIMIT: usize = 2048;

pub const QTINIT: &str = "QTinit";
pub const QTSTART: &str = "QTStart";
pub const QTSTOP: &str = "QTStop";
pub const QTSTATUS: &str = "qTStatus";

/// Render a tracepoint definition packet:
/// `QTDP:<n>:<addr>:<E|D>:<step>:<pass>[R<mask>][M<type>,<start>,<len>]*[S…]`.
pub fn qtdp(tp: &Tracepoint, program: Option<&CompiledProgram>) -> Result<String, Error> {
    let mut buf = format!(
        "QTDP:{:x}:{:x}:{}:{:x}:{:x}",
        tp.number,
        tp.address,
        if tp.enabled { 'E' } else { 'D' },
        tp.step_count as u64,
        tp.pass_count,
    );

    if let Some(program) = program {
        if let Some(trap) = render_collection(program.trap) {
            buf.push_str(&trap);
        }
        if let Some(stepping) = render_collection(program.stepping) {
            buf.push('S');
            buf.push_str(&stepping);
        }
    }

    if buf.len() >= PACKET_LIMIT {
        return Err(Error::TooComplex(tp.number));
    }
    Ok(buf)
}

fn render_collection(list: &CollectionList) -> Option<String> {
    let mut out = String::new();
    if let Some(mask) = list.registers().to_wire_hex() {
        out.push('R');
        out.push_str(&mask);
    }
    for range in list.memranges() {
        write!(
            out,
            "M{:x},{:x},{:x}",
            range.basereg,
            range.start as u64,
            range.len()
        )
        .expect("infallible");
    }
    (!out.is_empty()).then_some(out)
}

pub fn qtframe_number(frame: i64) -> String {
    format!("QTFrame:{:x}", frame as i32 as u32)
}

pub fn qtframe_pc(pc: u64) -> String {
    format!("QTFrame:pc:{pc:x}")
}

pub fn qtframe_tdp(number: u32) -> String {
    format!("QTFrame:tdp:{number:x}")
}

pub fn qtframe_range(start: u64, end: u64) -> String {
    format!("QTFrame:range:{start:x}:{end:x}")
}

pub fn qtframe_outside(start: u64, end: u64) -> String {
    format!("QTFrame:outside:{start:x}:{end:x}")
}

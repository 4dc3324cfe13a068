//! The noisy-reply loop. A reply stream may interleave console output and
//! register dumps ahead of the terminal reply; callers of
//! [`read_noisy_reply`] never see `O`, `R` or `E` payloads.

use crate::debugger::arch::Arch;
use crate::debugger::error::Error;
use crate::debugger::transport::Transport;
use crate::debugger::SessionHook;
use crate::weak_error;

/// Read packets until an actual reply arrives.
///
/// Empty payloads mean the target does not implement the request. `E…` is
/// decoded into the matching error. `R…` register dumps refresh the cached
/// frame state through the hook. `O…` payloads (other than the literal
/// `OK`) are remote console output and are forwarded in arrival order.
pub fn read_noisy_reply<T: Transport + ?Sized>(
    transport: &mut T,
    hook: &dyn SessionHook,
    arch: &Arch,
) -> Result<String, Error> {
    loop {
        let reply = transport.recv()?;
        let bytes = reply.as_bytes();
        match bytes.first() {
            None => return Err(Error::Unsupported),
            Some(b'E') => return Err(decode_remote_error(&reply)),
            Some(b'R') => {
                hook.flush_cached_frames();
                hook.registers_changed();
                hook.reselect_frame().map_err(Error::Hook)?;
                supply_registers(&reply[1..], hook, arch)?;
            }
            Some(b'O') if bytes.get(1) != Some(&b'K') => {
                // garbled console chatter is not worth failing the exchange
                if let Some(text) = weak_error!(decode_console_payload(&reply)) {
                    hook.remote_console(&text);
                }
            }
            Some(_) => return Ok(reply),
        }
    }
}

/// Decode an `E` packet.
///
/// `E10` is a malformed outgoing packet, `E1n` a malformed outgoing packet
/// at field *n*, `E2xx` a target-side trace API error, anything else an
/// opaque target error string.
pub fn decode_remote_error(reply: &str) -> Error {
    let code = reply.strip_prefix('E').unwrap_or(reply);
    if let Some(rest) = code.strip_prefix('1') {
        if rest.starts_with('0') {
            return Error::RemoteOutgoing;
        }
        return Error::RemoteOutgoingField(u32::from_str_radix(rest, 16).unwrap_or(0));
    }
    if let Some(rest) = code.strip_prefix('2') {
        return Error::RemoteTraceApi(rest.to_string());
    }
    Error::RemoteOpaque(code.to_string())
}

/// Parse a register dump: whitespace-free `regno:hexbytes;` entries.
fn supply_registers(mut entries: &str, hook: &dyn SessionHook, arch: &Arch) -> Result<(), Error> {
    while !entries.is_empty() {
        let colon = entries.find(':').ok_or_else(malformed_dump)?;
        let regno =
            u16::from_str_radix(&entries[..colon], 16).map_err(|_| malformed_dump())?;

        let rest = &entries[colon + 1..];
        let semi = rest.find(';').ok_or_else(malformed_dump)?;
        let bytes = decode_hex(&rest[..semi]).ok_or_else(malformed_dump)?;
        if (bytes.len() as u64) < arch.reg_raw_size(regno) {
            log::warn!(target: "tracer", "remote register dump is too short: {}", &rest[..semi]);
        }
        hook.supply_register(regno, &bytes);

        entries = &rest[semi + 1..];
    }
    Ok(())
}

fn malformed_dump() -> Error {
    Error::Protocol("malformed 'R' packet".to_string())
}

/// Hex-decode the payload of a console-output packet.
fn decode_console_payload(reply: &str) -> Result<String, Error> {
    let bytes =
        decode_hex(&reply[1..]).ok_or_else(|| Error::Protocol(reply.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

//! Seam to the remote protocol transport. Framing, acknowledgement and
//! retransmission live on the other side of this trait.

use crate::debugger::error::Error;

pub trait Transport {
    /// Send one packet payload.
    fn send(&mut self, packet: &str) -> Result<(), Error>;

    /// Receive one packet payload. An empty payload means the target does
    /// not recognise the request.
    fn recv(&mut self) -> Result<String, Error>;
}

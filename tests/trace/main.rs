mod common;
mod roundtrip;
mod session;

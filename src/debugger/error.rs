use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // --------------------------------- generic errors --------------------------------------------
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("unable to open file '{0}'")]
    FileOpen(PathBuf),

    // --------------------------------- action list errors ----------------------------------------
    /// An action line rejected by the validator. Always recovered locally:
    /// the caller warns and drops the line.
    #[error("{0}")]
    BadAction(String),
    #[error("register number {0} too large for tracepoint")]
    RegisterTooLarge(u16),
    #[error("actions for tracepoint {0} too complex; please simplify")]
    TooComplex(u32),

    // --------------------------------- remote protocol errors ------------------------------------
    #[error("target does not support this command")]
    Unsupported,
    #[error("trace can only be run on remote targets")]
    NotRemote,
    #[error("bogus reply from target: {0}")]
    Protocol(String),
    #[error("error in outgoing packet")]
    RemoteOutgoing,
    #[error("error in outgoing packet at field #{0}")]
    RemoteOutgoingField(u32),
    #[error("trace API error 0x{0}")]
    RemoteTraceApi(String),
    #[error("target returned error code '{0}'")]
    RemoteOpaque(String),

    // --------------------------------- trace replay errors ---------------------------------------
    #[error("target failed to find the requested trace frame")]
    NotFound,
    #[error("not debugging trace buffer")]
    NotReplaying,
    #[error("already at start of trace buffer")]
    AtTraceStart,

    // --------------------------------- debug information errors ----------------------------------
    #[error("location `{0}` not found")]
    LocationNotFound(String),
    #[error("line {0} of \"{1}\" is out of range")]
    LineOutOfRange(u64, String),
    #[error("cannot find a good line")]
    NoSuitableLine,

    // --------------------------------- interactive errors ----------------------------------------
    #[error("quit")]
    Quit,

    // --------------------------------- third party errors ----------------------------------------
    #[error("hook: {0}")]
    Hook(anyhow::Error),
}

#[macro_export]
macro_rules! _error {
    ($log_fn: path, $res: expr) => {
        match $res {
            Ok(value) => Some(value),
            Err(e) => {
                $log_fn!(target: "tracer", "{:#}", e);
                None
            }
        }
    };
    ($log_fn: path, $res: expr, $msg: tt) => {
        match $res {
            Ok(value) => Some(value),
            Err(e) => {
                $log_fn!(target: "tracer", concat!($msg, " {:#}"), e);
                None
            }
        }
    };
}

/// Transforms `Result` into `Option` and logs an error if it occurs.
#[macro_export]
macro_rules! weak_error {
    ($res: expr) => {
        $crate::_error!(log::warn, $res)
    };
    ($res: expr, $msg: tt) => {
        $crate::_error!(log::warn, $res, $msg)
    };
}

/// Transforms `Result` into `Option` and put error into debug logs if it occurs.
#[macro_export]
macro_rules! muted_error {
    ($res: expr) => {
        $crate::_error!(log::debug, $res)
    };
    ($res: expr, $msg: tt) => {
        $crate::_error!(log::debug, $res, $msg)
    };
}

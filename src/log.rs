//! Crate logging: a process-global facade whose sink can be swapped or
//! silenced at runtime. Interactive front ends own the terminal, so the
//! default sink drops everything until one is installed.

use log::{LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Installs itself as the `log` crate logger on first use.
pub static LOGGER_SWITCHER: Lazy<SwitchableLogger> = Lazy::new(|| {
    let proxy = SwitchableLogger {
        sink: Arc::new(RwLock::new(None)),
        muted: Arc::new(AtomicBool::new(false)),
    };

    log::set_boxed_logger(Box::new(proxy.clone())).expect("infallible");
    log::set_max_level(LevelFilter::Warn);

    proxy
});

/// Silence logging while a front end draws the screen.
pub fn disable() {
    LOGGER_SWITCHER.muted.store(true, Ordering::Relaxed);
}

pub fn enable() {
    LOGGER_SWITCHER.muted.store(false, Ordering::Relaxed);
}

#[derive(Clone)]
pub struct SwitchableLogger {
    sink: Arc<RwLock<Option<Box<dyn Log>>>>,
    muted: Arc<AtomicBool>,
}

impl SwitchableLogger {
    /// Replace the active sink and raise the global level ceiling.
    pub fn switch<L: Log + 'static>(&self, sink: L, level: LevelFilter) {
        *self.sink.write().expect("poisoned") = Some(Box::new(sink));
        log::set_max_level(level);
    }
}

impl Log for SwitchableLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if self.muted.load(Ordering::Relaxed) {
            return false;
        }
        self.sink
            .read()
            .expect("poisoned")
            .as_ref()
            .is_some_and(|sink| sink.enabled(metadata))
    }

    fn log(&self, record: &Record) {
        if self.muted.load(Ordering::Relaxed) {
            return;
        }
        if let Some(sink) = self.sink.read().expect("poisoned").as_ref() {
            sink.log(record)
        }
    }

    fn flush(&self) {
        if let Some(sink) = self.sink.read().expect("poisoned").as_ref() {
            sink.flush()
        }
    }
}

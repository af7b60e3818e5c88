//! Log capture for unit tests.
//!
//! Records are tagged with the emitting thread so tests running in parallel
//! only see their own lines.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, Once};
use std::thread::{self, ThreadId};

struct CaptureLogger;

static LOGGER: CaptureLogger = CaptureLogger;
static RECORDS: Mutex<Vec<(ThreadId, Level, String)>> = Mutex::new(Vec::new());
static INIT: Once = Once::new();

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = RECORDS.lock() {
            records.push((thread::current().id(), record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

/// Installs the capturing logger once per test binary.
pub fn init() {
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
}

/// Lines logged so far by the current thread.
pub fn records() -> Vec<(Level, String)> {
    let current = thread::current().id();
    RECORDS
        .lock()
        .map(|records| {
            records
                .iter()
                .filter(|(thread, _, _)| *thread == current)
                .map(|(_, level, message)| (*level, message.clone()))
                .collect()
        })
        .unwrap_or_default()
}

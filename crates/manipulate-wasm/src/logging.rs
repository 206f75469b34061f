//! Browser console sink for the `log` facade.
//!
//! The core crate logs pipeline progress through `log`. Nothing is printed
//! until [`enable_logging`] installs this sink.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format_record(record));
        match record.level() {
            Level::Error => web_sys::console::error_1(&message),
            Level::Warn => web_sys::console::warn_1(&message),
            Level::Info => web_sys::console::info_1(&message),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

fn format_record(record: &Record) -> String {
    format!("[{}] {}", record.target(), record.args())
}

/// Forward log records to the browser console.
///
/// `verbose` enables per-stage debug and trace output. Calling this again
/// only changes the level.
#[wasm_bindgen]
pub fn enable_logging(verbose: bool) {
    // A second call finds the logger already installed
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level_filter(verbose));
}

fn level_filter(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    }
}

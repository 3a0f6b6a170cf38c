use std::cell::RefCell;

use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::{Lazy, OnceCell};

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
}

/// Prints through `env_logger` and keeps the records of this crate per test
/// thread.
struct CapturingLogger {
    inner: env_logger::Logger,
}

static LOGGER: Lazy<CapturingLogger> = Lazy::new(|| CapturingLogger {
    inner: env_logger::builder().is_test(true).build(),
});

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if record.target().starts_with(env!("CARGO_CRATE_NAME")) {
            CAPTURED.with(|captured| {
                captured
                    .borrow_mut()
                    .push((record.level(), record.args().to_string()))
            });
        }

        if self.inner.matches(record) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

pub fn init() {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_init(|| {
        if log::set_logger(&*LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
}

/// Runs `f` and returns the records it logged on this thread.
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<(Level, String)>) {
    init();
    CAPTURED.with(|captured| captured.borrow_mut().clear());
    let result = f();
    let records = CAPTURED.with(|captured| captured.borrow_mut().drain(..).collect());
    (result, records)
}

pub fn errors(records: &[(Level, String)]) -> Vec<&str> {
    records
        .iter()
        .filter(|(level, _)| *level == Level::Error)
        .map(|(_, message)| message.as_str())
        .collect()
}

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

pub const LOG_FILE: &str = "quiz_debug.log";
pub const LOG_LEVEL_ENV: &str = "PERSONALITY_QUIZ_LOG";

lazy_static::lazy_static! {
    static ref LOG_SINK: Mutex<Option<File>> = Mutex::new(None);
}

/// Appends records to the debug log file. The terminal belongs to the UI, so nothing goes to stderr.
struct FileLogger;

static LOGGER: FileLogger = FileLogger;

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut sink) = LOG_SINK.lock()
            && let Some(file) = sink.as_mut()
        {
            let _ = writeln!(
                file,
                "[{}] {:<5} {}: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = LOG_SINK.lock()
            && let Some(file) = sink.as_mut()
        {
            let _ = file.flush();
        }
    }
}

pub fn init() {
    let level = parse_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref());
    init_with(LOG_FILE, level);
}

/// Opens `path` for appending and installs the logger. Later calls keep the first file.
pub fn init_with(path: impl AsRef<Path>, level: LevelFilter) {
    if let Ok(mut sink) = LOG_SINK.lock()
        && sink.is_none()
        && let Ok(file) = OpenOptions::new().create(true).append(true).open(path)
    {
        *sink = Some(file);
    }

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

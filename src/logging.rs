use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::OnceCell;
use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::PathBuf;

pub const APP_DIR: &str = "cp2020-sheets";

#[derive(Debug)]
struct FileLogger {
    log_path: PathBuf,
    level: Level,
}

static LOGGER: OnceCell<FileLogger> = OnceCell::new();

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let log_entry = format!(
                "{} {} - {}\n",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            );

            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_path)
            {
                let _ = file.write_all(log_entry.as_bytes());
            }
        }
    }

    fn flush(&self) {}
}

pub fn log_dir() -> io::Result<PathBuf> {
    let home = dir::home_dir()
        .into_iter()
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No home directory"))?;
    Ok(home.join(APP_DIR).join("data"))
}

// Install the file logger. Debug mode lowers the threshold from Info to Debug.
pub fn init(debug: bool) -> io::Result<()> {
    let log_dir = log_dir()?;
    create_dir_all(&log_dir)?;

    let level = if debug { Level::Debug } else { Level::Info };
    install(log_dir.join("log.txt"), level)
}

// Only the first logger sticks; later calls fail with `AlreadyExists`.
fn install(log_path: PathBuf, level: Level) -> io::Result<()> {
    let logger = LOGGER.get_or_init(|| FileLogger { log_path, level });

    log::set_logger(logger)
        .map(|()| log::set_max_level(LevelFilter::Debug))
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))
}

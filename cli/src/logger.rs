use crate::config::LoggingConfig;
use fern::colors::{Color, ColoredLevelConfig};
use log::{Level, LevelFilter};
use std::path::PathBuf;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" | "warning" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info, // Default to Info for any other value
    }
}

/// Level name as written to the log, `WARNING` rather than `WARN`.
pub fn level_label(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// `[2025-01-31 14:05:09] [INFO] message`
pub fn format_line(timestamp: &str, level: Level, message: &std::fmt::Arguments) -> String {
    format!("[{timestamp}] [{}] {message}", level_label(level))
}

pub fn default_log_file() -> PathBuf {
    PathBuf::from(format!(
        "sitebrand_{}.log",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Sends log records to the console (coloured by level) and to a log file.
///
/// When the log file cannot be opened the run continues with console output
/// only. Returns the file actually written to, if any.
pub fn setup_logger(logging: &LoggingConfig) -> Result<Option<PathBuf>, log::SetLoggerError> {
    let log_level = parse_level(logging.level());

    let colors = ColoredLevelConfig::new()
        .trace(Color::BrightBlack)
        .debug(Color::BrightBlue)
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red);

    let console = fern::Dispatch::new()
        .format(move |out, message, record| {
            let level = record.level();
            out.finish(format_args!(
                "[{}] [\x1B[{}m{}\x1B[0m] {}",
                chrono::Local::now().format(TIMESTAMP_FORMAT),
                colors.get_color(&level).to_fg_str(),
                level_label(level),
                message
            ))
        })
        .chain(std::io::stdout());

    let mut dispatch = fern::Dispatch::new()
        .level(log_level)
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper_util", LevelFilter::Warn)
        .chain(console);

    let file_path = logging
        .file()
        .map(PathBuf::from)
        .unwrap_or_else(default_log_file);

    let log_file = match fern::log_file(&file_path) {
        Ok(file) => {
            let file_output = fern::Dispatch::new()
                .format(|out, message, record| {
                    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
                    out.finish(format_args!(
                        "{}",
                        format_line(&timestamp, record.level(), message)
                    ))
                })
                .chain(file);
            dispatch = dispatch.chain(file_output);
            Some(file_path)
        }
        Err(e) => {
            eprintln!(
                "Warning: Failed to open log file '{}': {e}",
                file_path.display()
            );
            eprintln!("Continuing with console logging only.");
            None
        }
    };

    dispatch.apply()?;

    if let Some(path) = &log_file {
        log::info!("Logging to file: {}", path.display());
    }
    log::info!("Logger initialized with level: {}", logging.level());
    Ok(log_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("warning"), LevelFilter::Warn);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }

    #[test]
    fn test_line_layout() {
        let line = format_line(
            "2025-01-31 14:05:09",
            Level::Warn,
            &format_args!("Throttled on {}", "upload_file"),
        );
        assert_eq!(line, "[2025-01-31 14:05:09] [WARNING] Throttled on upload_file");
    }

    #[test]
    fn test_default_log_file_name() {
        let name = default_log_file().to_string_lossy().into_owned();
        assert!(name.starts_with("sitebrand_"));
        assert!(name.ends_with(".log"));
        // sitebrand_YYYYMMDD_HHMMSS.log
        assert_eq!(name.len(), "sitebrand_".len() + 15 + ".log".len());
    }
}

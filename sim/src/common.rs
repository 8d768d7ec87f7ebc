//! Common utility functions for the command line driver.
//!
//! - Logger initialization
//! - Output path preparation

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Initialize the logger with the specified configuration.
///
/// # Arguments
/// * `log_level` - Log level string (off, error, warn, info, debug, trace)
/// * `log_file` - Optional path to log file (logs to stderr if None)
///
/// # Errors
/// Returns an error if the log file cannot be opened or logger initialization fails.
pub fn init_logger(log_level: &str, log_file: Option<&PathBuf>) -> Result<()> {
    let level = parse_level(log_level);

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] - {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.args()
        )
    });

    if let Some(log_path) = log_file {
        prepare_output_file(log_path)?;
        let target = Box::new(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .with_context(|| format!("opening log file {}", log_path.display()))?,
        );
        builder.target(env_logger::Target::Pipe(target));
    }

    builder.try_init().context("initializing logger")?;
    Ok(())
}

/// Parse a log level, falling back to `info` for unknown strings.
pub fn parse_level(log_level: &str) -> log::LevelFilter {
    log_level.parse::<log::LevelFilter>().unwrap_or_else(|_| {
        eprintln!("Invalid log level '{}', defaulting to 'info'", log_level);
        log::LevelFilter::Info
    })
}

/// Create the parent directories of an output file if needed.
///
/// # Errors
/// Returns an error if the path is a directory or directory creation fails.
pub fn prepare_output_file(output: &Path) -> Result<()> {
    if output.is_dir() {
        anyhow::bail!("Output path '{}' is a directory.", output.display());
    }
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), log::LevelFilter::Debug);
        assert_eq!(parse_level("OFF"), log::LevelFilter::Off);
        assert_eq!(parse_level("loud"), log::LevelFilter::Info);
    }

    #[test]
    fn test_prepare_output_file_creates_parents() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("nested").join("deeper").join("out.csv");

        assert!(!output.parent().unwrap().exists());
        prepare_output_file(&output).unwrap();
        assert!(output.parent().unwrap().exists());
    }

    #[test]
    fn test_prepare_output_file_rejects_directory() {
        let dir = tempdir().unwrap();
        assert!(prepare_output_file(dir.path()).is_err());
    }

    #[test]
    fn test_prepare_output_file_bare_name() {
        assert!(prepare_output_file(Path::new("out.csv")).is_ok());
    }
}

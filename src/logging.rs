// src/logging.rs
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Append-only run log with two channels: a general log and an error log.
/// Lines are `[RFC3339 timestamp] message`, matching what downstream
/// tooling already parses. Console output goes through tracing separately.
#[derive(Debug, Clone)]
pub struct FileLogger {
    log_path: String,
    error_log_path: String,
}

impl FileLogger {
    pub fn new(log_path: &str, error_log_path: &str) -> Self {
        Self {
            log_path: log_path.to_string(),
            error_log_path: error_log_path.to_string(),
        }
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}", message);
        self.append(&self.log_path, message);
    }

    pub fn error(&self, message: &str) {
        tracing::error!("{}", message);
        self.append(&self.error_log_path, message);
    }

    fn append(&self, path: &str, message: &str) {
        if let Some(parent) = Path::new(path).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let line = format!("[{}] {}\n", Utc::now().to_rfc3339(), message);
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(e) = result {
            warn!("failed to append to {}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_timestamped_lines_to_both_channels() {
        let dir = std::env::temp_dir().join(format!("harvester-log-{}", std::process::id()));
        let log = dir.join("run.log");
        let errors = dir.join("errors.log");
        let logger = FileLogger::new(log.to_str().unwrap(), errors.to_str().unwrap());

        logger.info("general message");
        logger.info("second message");
        logger.error("something failed");

        let general = std::fs::read_to_string(&log).unwrap();
        let lines: Vec<&str> = general.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("general message"));

        let errors = std::fs::read_to_string(&errors).unwrap();
        assert_eq!(errors.lines().count(), 1);
        assert!(errors.contains("something failed"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}

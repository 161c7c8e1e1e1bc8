//! Append-only run log capped to its most recent lines.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const MAX_LOG_LINES: usize = 1000;
const TIMESTAMP_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";

pub struct RunLog {
    path: PathBuf,
    file: File,
    max_lines: usize,
}

impl RunLog {
    /// Trims an existing log at `path` to the last [`MAX_LOG_LINES`] lines and
    /// opens it for appending, creating parent directories as needed.
    pub fn open(path: &Path) -> Result<Self> {
        Self::with_max_lines(path, MAX_LOG_LINES)
    }

    pub fn with_max_lines(path: &Path, max_lines: usize) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
        if let Err(e) = trim_to_last_lines(path, max_lines) {
            tracing::warn!("Could not trim run log: {:#}", e);
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            max_lines,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `[MM/DD/YYYY, HH:MM:SS] message`.
    pub fn log(&mut self, message: &str) -> Result<()> {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        for line in message.lines() {
            writeln!(self.file, "[{}] {}", timestamp, line)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }
        Ok(())
    }

    /// Flushes and applies the line cap to everything written by this run.
    pub fn finish(mut self) -> Result<()> {
        self.file
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;
        drop(self.file);
        trim_to_last_lines(&self.path, self.max_lines)
    }
}

/// Rewrites `path` keeping only its last `max_lines` lines. A missing file is
/// left alone. Lines are handled as raw bytes, whatever their encoding.
pub fn trim_to_last_lines(path: &Path, max_lines: usize) -> Result<()> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read log file {}", path.display()))
        }
    };

    let body = content.strip_suffix(b"\n").unwrap_or(&content);
    if body.is_empty() {
        return Ok(());
    }
    let lines: Vec<&[u8]> = body.split(|b| *b == b'\n').collect();
    let total = lines.len();
    if total <= max_lines {
        return Ok(());
    }

    let mut trimmed = Vec::with_capacity(content.len());
    for line in &lines[total - max_lines..] {
        trimmed.extend_from_slice(line);
        trimmed.push(b'\n');
    }
    fs::write(path, trimmed)
        .with_context(|| format!("Failed to rewrite log file {}", path.display()))?;
    tracing::debug!(
        "Trimmed {} to its last {} of {} lines",
        path.display(),
        max_lines,
        total
    );
    Ok(())
}

/// `~/logs/<stem>-<command>.log`.
pub fn default_log_path(stem: &str, command: &str) -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("logs").join(format!("{}-{}.log", stem, command)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn line_count(path: &Path) -> usize {
        fs::read_to_string(path).unwrap().lines().count()
    }

    #[test]
    fn test_trim_keeps_last_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        let content: String = (1..=1200).map(|i| format!("line {}\n", i)).collect();
        fs::write(&path, content).unwrap();

        trim_to_last_lines(&path, MAX_LOG_LINES).unwrap();

        let lines: Vec<String> = fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(String::from)
            .collect();
        assert_eq!(lines.len(), 1000);
        assert_eq!(lines.first().unwrap(), "line 201");
        assert_eq!(lines.last().unwrap(), "line 1200");
    }

    #[test]
    fn test_trim_missing_file_is_ok() {
        let dir = TempDir::new().unwrap();
        assert!(trim_to_last_lines(&dir.path().join("absent.log"), 10).is_ok());
    }

    #[test]
    fn test_log_never_exceeds_cap_across_runs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("occctl-instances.log");

        for run in 0..5 {
            let mut log = RunLog::with_max_lines(&path, 25).unwrap();
            for i in 0..12 {
                log.log(&format!("run {} entry {}", run, i)).unwrap();
            }
            log.finish().unwrap();
            assert!(line_count(&path) <= 25);
        }

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.lines().last().unwrap().ends_with("run 4 entry 11"));
    }

    #[test]
    fn test_trim_handles_non_utf8_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("instances.log");
        let mut content = b"\xff\xfe garbage\n".to_vec();
        for i in 1..=20 {
            content.extend_from_slice(format!("line {}\n", i).as_bytes());
        }
        fs::write(&path, content).unwrap();

        let mut log = RunLog::with_max_lines(&path, 5).unwrap();
        log.log("Program started ...").unwrap();
        log.finish().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "line 17");
        assert!(lines[4].ends_with("] Program started ..."));
    }

    #[test]
    fn test_open_keeps_short_non_utf8_log() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("instances.log");
        fs::write(&path, b"\xff\xfe garbage\n").unwrap();

        let mut log = RunLog::open(&path).unwrap();
        log.log("next run").unwrap();
        log.finish().unwrap();

        let content = fs::read(&path).unwrap();
        assert!(content.starts_with(b"\xff\xfe garbage\n["));
        assert_eq!(content.split(|b| *b == b'\n').filter(|l| !l.is_empty()).count(), 2);
    }

    #[test]
    fn test_log_lines_are_timestamped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        let mut log = RunLog::open(&path).unwrap();
        log.log("Program started ...\nsecond line").unwrap();
        log.finish().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] Program started ..."));
        // [MM/DD/YYYY, HH:MM:SS]
        assert_eq!(lines[0].find(']'), Some(21));
    }
}

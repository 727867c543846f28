//! Append-only feedback log.
//!
//! Each call records one line:
//!
//! ```text
//! 2024-05-01 18:42:07 - Predicción Correcta
//! ```
//!
//! Entries do not reference the prediction they judge; the log is a tally of
//! user verdicts, nothing more. Existing lines are never rewritten.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ArchError, Result};

/// Timestamp layout used in the log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ENTRY_SEPARATOR: &str = " - ";

/// The user's judgement of the last prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    /// Label written to the log.
    pub fn label(self) -> &'static str {
        match self {
            Self::Correct => "Predicción Correcta",
            Self::Incorrect => "Predicción Incorrecta",
        }
    }

    /// Confirmation shown to the user once the verdict is stored.
    pub fn confirmation(self) -> &'static str {
        match self {
            Self::Correct => "Gracias por tu retroalimentación. Hemos registrado que la predicción fue correcta.",
            Self::Incorrect => "Gracias por tu retroalimentación. Hemos registrado que la predicción fue incorrecta.",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Verdict {
    type Err = ArchError;

    /// Accepts the log labels and the short forms `correct` / `incorrect`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Predicción Correcta" => Ok(Self::Correct),
            "Predicción Incorrecta" => Ok(Self::Incorrect),
            other => match other.to_lowercase().as_str() {
                "correct" | "correcta" => Ok(Self::Correct),
                "incorrect" | "incorrecta" => Ok(Self::Incorrect),
                _ => Err(ArchError::Persistence(format!("unknown verdict: '{other}'"))),
            },
        }
    }
}

/// One line of the feedback log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackEntry {
    /// Local time formatted with [`TIMESTAMP_FORMAT`]
    pub timestamp: String,
    pub verdict: Verdict,
}

impl FeedbackEntry {
    /// An entry stamped with the current local time.
    pub fn now(verdict: Verdict) -> Self {
        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            verdict,
        }
    }

    /// Serialized form, including the trailing newline.
    pub fn to_line(&self) -> String {
        format!("{}{}{}\n", self.timestamp, ENTRY_SEPARATOR, self.verdict.label())
    }

    /// Parse one log line (with or without its newline).
    pub fn parse_line(line: &str) -> Option<Self> {
        let (timestamp, label) = line.trim_end().split_once(ENTRY_SEPARATOR)?;
        NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
        let verdict = label.parse().ok()?;
        Some(Self {
            timestamp: timestamp.to_string(),
            verdict,
        })
    }
}

/// Appends verdicts to the feedback log.
///
/// Writes are serialized through a mutex and each line goes out in a single
/// `write_all` on a file opened in append mode, so concurrent callers never
/// interleave partial lines.
#[derive(Debug)]
pub struct FeedbackRecorder {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FeedbackRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry for `verdict`.
    pub fn record(&self, verdict: Verdict) -> Result<FeedbackEntry> {
        let entry = FeedbackEntry::now(verdict);
        self.append(&entry)?;
        info!(verdict = ?verdict, path = %self.path.display(), "Recorded feedback");
        Ok(entry)
    }

    /// Append an already built entry.
    pub fn append(&self, entry: &FeedbackEntry) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ArchError::Persistence("feedback writer lock poisoned".into()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                ArchError::Persistence(format!("cannot open {}: {}", self.path.display(), e))
            })?;

        file.write_all(entry.to_line().as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| {
                ArchError::Persistence(format!("cannot write {}: {}", self.path.display(), e))
            })
    }

    /// Record a verdict and return the text to show the user.
    ///
    /// Never fails: storage errors become an apology message.
    pub fn record_verdict(&self, verdict: Verdict) -> String {
        match self.record(verdict) {
            Ok(_) => verdict.confirmation().to_string(),
            Err(e) => {
                warn!(error = %e, verdict = ?verdict, "Failed to record feedback");
                persistence_message(&e)
            }
        }
    }
}

/// User-facing text for a failed feedback write.
pub fn persistence_message(error: &ArchError) -> String {
    match error {
        ArchError::Persistence(reason) => {
            format!("Error al registrar la retroalimentación: {reason}")
        }
        other => format!("Error al registrar la retroalimentación: {other}"),
    }
}

/// Verdict counts over an existing log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackSummary {
    pub correct: usize,
    pub incorrect: usize,
    /// Lines that could not be parsed
    pub unreadable: usize,
}

impl FeedbackSummary {
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut summary = Self::default();
        for line in lines.into_iter().filter(|l| !l.trim().is_empty()) {
            match FeedbackEntry::parse_line(line).map(|e| e.verdict) {
                Some(Verdict::Correct) => summary.correct += 1,
                Some(Verdict::Incorrect) => summary.incorrect += 1,
                None => summary.unreadable += 1,
            }
        }
        summary
    }

    /// Read and tally a log file. A missing file is an empty log.
    pub fn from_log(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Self::from_lines(text.lines())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ArchError::Persistence(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    pub fn total(&self) -> usize {
        self.correct + self.incorrect
    }

    /// Share of verdicts marked correct, if any were recorded.
    pub fn accuracy(&self) -> Option<f64> {
        (self.total() > 0).then(|| self.correct as f64 / self.total() as f64)
    }
}

//! Curation progress reporting.
//!
//! Reports each inbox document's terminal state as the batch runs so the
//! operator can follow along. Progress is emitted on **stderr**; stdout
//! carries only the final summary and stays parseable for scripts.

use kb_curate_core::Outcome;
use std::io::Write;

/// A single progress event for a curation batch.
#[derive(Clone, Debug)]
pub enum CurateProgressEvent {
    /// The inbox snapshot was taken.
    Started { pending: usize },
    /// Document `n` of `total` reached its terminal state.
    Decided {
        n: usize,
        total: usize,
        file: String,
        outcome: Outcome,
        dest: String,
    },
}

/// Reports curation progress. Implementations write to stderr (human or JSON).
pub trait CurateProgressReporter {
    fn report(&self, event: CurateProgressEvent);
}

/// Human-friendly progress on stderr.
pub struct StderrProgress;

impl CurateProgressReporter for StderrProgress {
    fn report(&self, event: CurateProgressEvent) {
        let mut out = String::new();
        match &event {
            CurateProgressEvent::Started { pending } => {
                out.push_str(&format!("curate  {} pending\n", pending));
            }
            CurateProgressEvent::Decided {
                n,
                total,
                file,
                outcome,
                dest,
            } => {
                out.push_str(&format!(
                    "[{}/{}] {}  {} -> {}\n",
                    n,
                    total,
                    file,
                    outcome.label().to_uppercase(),
                    dest
                ));
                for reason in outcome.review_reasons().unwrap_or_default() {
                    out.push_str(&format!("        - {}\n", reason));
                }
            }
        }
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(out.as_bytes());
        let _ = stderr.flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl CurateProgressReporter for JsonProgress {
    fn report(&self, event: CurateProgressEvent) {
        let obj = match &event {
            CurateProgressEvent::Started { pending } => serde_json::json!({
                "event": "started",
                "pending": pending
            }),
            CurateProgressEvent::Decided {
                n,
                total,
                file,
                outcome,
                dest,
            } => serde_json::json!({
                "event": "decided",
                "n": n,
                "total": total,
                "file": file,
                "outcome": outcome.label(),
                "dest": dest,
                "reasons": outcome.review_reasons().unwrap_or_default()
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl CurateProgressReporter for NoProgress {
    fn report(&self, _event: CurateProgressEvent) {}
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "off" => Some(ProgressMode::Off),
            "human" => Some(ProgressMode::Human),
            "json" => Some(ProgressMode::Json),
            _ => None,
        }
    }

    pub fn reporter(&self) -> Box<dyn CurateProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modes() {
        assert_eq!(ProgressMode::parse("json"), Some(ProgressMode::Json));
        assert_eq!(ProgressMode::parse("off"), Some(ProgressMode::Off));
        assert_eq!(ProgressMode::parse("loud"), None);
    }
}

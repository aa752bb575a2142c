//! Sync notifications and progress reporting.
//!
//! Everything a sync run has to tell the user flows through a
//! [`SyncProgressReporter`]: short status notices (start, completion counts,
//! errors), per-page fetch progress, and per-file writes. Output goes to
//! **stderr** so stdout stays parseable for scripts.

use std::io::Write;

use serde_json::json;

use crate::models::SyncResult;

/// A single event emitted during sync.
#[derive(Clone, Debug, PartialEq)]
pub enum SyncProgressEvent {
    /// Short user-facing status line.
    Notice(String),
    /// One page of contacts arrived.
    Page {
        page: u64,
        url: String,
        count: u64,
        total: u64,
    },
    /// Pagination finished.
    Loaded { total: u64 },
    /// A note was written; `created` is false when an existing file was overwritten.
    Wrote { path: String, created: bool },
    /// Something the user should know about that does not stop the run.
    Warning(String),
    /// Final counts.
    Finished(SyncResult),
}

impl SyncProgressEvent {
    /// Notices, warnings and the final summary are shown even with progress off.
    pub fn is_notification(&self) -> bool {
        matches!(
            self,
            SyncProgressEvent::Notice(_)
                | SyncProgressEvent::Warning(_)
                | SyncProgressEvent::Finished(_)
        )
    }
}

/// Receives sync events. Fire-and-forget: implementations must not fail.
pub trait SyncProgressReporter: Send + Sync {
    fn report(&self, event: SyncProgressEvent);
}

/// Human-friendly lines on stderr: "people sync  page 2  50 contacts (total 100)".
pub struct StderrProgress;

impl SyncProgressReporter for StderrProgress {
    fn report(&self, event: SyncProgressEvent) {
        let line = human_line(&event);
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{}", line);
        let _ = err.flush();
    }
}

fn human_line(event: &SyncProgressEvent) -> String {
    match event {
        SyncProgressEvent::Notice(msg) => format!("People Sync: {}", msg),
        SyncProgressEvent::Page {
            page,
            url,
            count,
            total,
        } => format!(
            "people sync  page {}  {} contacts (total {})  {}",
            page,
            format_number(*count),
            format_number(*total),
            url
        ),
        SyncProgressEvent::Loaded { total } => {
            format!("people sync  loaded {} contacts", format_number(*total))
        }
        SyncProgressEvent::Wrote { path, created } => format!(
            "people sync  {}  {}",
            if *created { "created" } else { "updated" },
            path
        ),
        SyncProgressEvent::Warning(msg) => format!("People Sync warning: {}", msg),
        SyncProgressEvent::Finished(result) => format!(
            "People Sync: Created/updated {} file(s) (skipped {})",
            result.written, result.skipped
        ),
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl SyncProgressReporter for JsonProgress {
    fn report(&self, event: SyncProgressEvent) {
        let obj = match &event {
            SyncProgressEvent::Notice(msg) => json!({ "event": "notice", "message": msg }),
            SyncProgressEvent::Page {
                page,
                url,
                count,
                total,
            } => json!({
                "event": "page",
                "page": page,
                "url": url,
                "count": count,
                "total": total
            }),
            SyncProgressEvent::Loaded { total } => json!({ "event": "loaded", "total": total }),
            SyncProgressEvent::Wrote { path, created } => {
                json!({ "event": "wrote", "path": path, "created": created })
            }
            SyncProgressEvent::Warning(msg) => json!({ "event": "warning", "message": msg }),
            SyncProgressEvent::Finished(result) => json!({
                "event": "finished",
                "written": result.written,
                "skipped": result.skipped
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
        }
    }
}

/// Shows notices, warnings and the final summary; drops per-page and
/// per-file events.
pub struct NoticesOnly;

impl SyncProgressReporter for NoticesOnly {
    fn report(&self, event: SyncProgressEvent) {
        if event.is_notification() {
            StderrProgress.report(event);
        }
    }
}

/// Discards everything.
pub struct NoProgress;

impl SyncProgressReporter for NoProgress {
    fn report(&self, _event: SyncProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI.
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    /// Notices only; no per-page or per-file lines.
    Off,
    Human,
    Json,
    /// Nothing at all, not even notices.
    Quiet,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise notices only.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn SyncProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoticesOnly),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
            ProgressMode::Quiet => Box::new(NoProgress),
        }
    }
}


/// Collects events in memory for assertions.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct CollectProgress {
    pub events: std::sync::Mutex<Vec<SyncProgressEvent>>,
}

#[cfg(test)]
impl CollectProgress {
    pub fn take(&self) -> Vec<SyncProgressEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

#[cfg(test)]
impl SyncProgressReporter for CollectProgress {
    fn report(&self, event: SyncProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

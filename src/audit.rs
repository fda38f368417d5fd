use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use tracing::warn;

/// Append-only audit trail: one line per mutating ledger operation.
/// Write-only from the system's perspective, and best-effort: a failed
/// append is reported on the diagnostic stream and never surfaced to
/// the operation that triggered it.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AuditLog { path: path.into() }
    }

    pub fn record(&self, operation: &str, summary: &str) {
        let timestamp = chrono::Local::now()
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S%.f");
        let line = format!("{timestamp} | {operation} | {summary}\n");

        let appended = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(err) = appended {
            warn!(error = %err, path = %self.path.display(), "failed to append audit line");
        }
    }
}

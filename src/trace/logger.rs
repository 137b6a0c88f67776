use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;

/// JSON-lines sink for per-block trace events.
///
/// A trace file that cannot be opened or written never fails a fill run;
/// the problem is reported through `tracing` and the event is dropped.
pub struct TraceLogger {
    sink: Option<Mutex<File>>,
}

impl TraceLogger {
    /// Append to `path`, creating it if needed.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let sink = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                tracing::warn!(path = %path.display(), error = %e, "trace file unavailable, tracing disabled");
            })
            .ok()
            .map(Mutex::new);
        Self { sink }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Write `event` as one JSON line.
    pub fn log<T: Serialize>(&self, event: &T) {
        let Some(sink) = &self.sink else {
            return;
        };

        let mut line = match serde_json::to_vec(event) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "trace event not serializable");
                return;
            }
        };
        line.push(b'\n');

        let Ok(mut file) = sink.lock() else {
            tracing::warn!("trace sink poisoned, dropping event");
            return;
        };
        if let Err(e) = file.write_all(&line) {
            tracing::warn!(error = %e, "trace write failed");
        }
    }
}

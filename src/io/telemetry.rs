use std::cell::RefCell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, warn};

/// Header token written once, before the first record.
pub const HEADER: &str = "write";

/// One autopilot diagnostic sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryRecord {
    pub time: f64,            // s
    pub altitude: f64,        // m
    pub radial_velocity: f64, // m/s, positive = climbing
}

/// Destination for autopilot telemetry. Recording is best-effort and never
/// fails the caller.
pub trait TelemetrySink {
    fn record(&mut self, rec: &TelemetryRecord);

    fn flush(&mut self) {}
}

// ---------------------------------------------------------------------------
// File sink
// ---------------------------------------------------------------------------

enum LogTarget {
    Unopened(PathBuf),
    Open(BufWriter<File>),
    Disabled,
}

/// Space-separated `time altitude radial_velocity` lines in a text file.
///
/// The file is created on the first record, not on construction. If it
/// cannot be created the log turns into a no-op for the rest of the run.
/// Buffered output is flushed when the log is dropped.
pub struct TrajectoryLog {
    target: LogTarget,
}

impl TrajectoryLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { target: LogTarget::Unopened(path.as_ref().to_path_buf()) }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.target, LogTarget::Disabled)
    }

    fn writer(&mut self) -> Option<&mut BufWriter<File>> {
        if let LogTarget::Unopened(path) = &self.target {
            let path = path.clone();
            self.target = match File::create(&path).and_then(|f| {
                let mut w = BufWriter::new(f);
                writeln!(w, "{HEADER}")?;
                Ok(w)
            }) {
                Ok(w) => {
                    debug!(path = %path.display(), "telemetry log opened");
                    LogTarget::Open(w)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "telemetry log unavailable, disabling");
                    LogTarget::Disabled
                }
            };
        }
        match &mut self.target {
            LogTarget::Open(w) => Some(w),
            _ => None,
        }
    }
}

impl TelemetrySink for TrajectoryLog {
    fn record(&mut self, rec: &TelemetryRecord) {
        let Some(w) = self.writer() else {
            return;
        };
        if let Err(e) = writeln!(w, "{} {} {}", rec.time, rec.altitude, rec.radial_velocity) {
            warn!(error = %e, "telemetry write failed, disabling");
            self.target = LogTarget::Disabled;
        }
    }

    fn flush(&mut self) {
        if let LogTarget::Open(w) = &mut self.target {
            if let Err(e) = w.flush() {
                debug!(error = %e, "telemetry flush failed");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory sink
// ---------------------------------------------------------------------------

/// Collects records in a shared buffer; clone the handle from
/// [`MemorySink::records`] before handing the sink to an autopilot.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Rc<RefCell<Vec<TelemetryRecord>>>,
}

impl MemorySink {
    pub fn records(&self) -> Rc<RefCell<Vec<TelemetryRecord>>> {
        Rc::clone(&self.records)
    }
}

impl TelemetrySink for MemorySink {
    fn record(&mut self, rec: &TelemetryRecord) {
        self.records.borrow_mut().push(*rec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(time: f64) -> TelemetryRecord {
        TelemetryRecord { time, altitude: 1000.0, radial_velocity: -2.5 }
    }

    #[test]
    fn file_not_created_until_first_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectories.txt");
        let log = TrajectoryLog::new(&path);
        assert!(!path.exists());
        drop(log);
        assert!(!path.exists());
    }

    #[test]
    fn header_then_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectories.txt");
        {
            let mut log = TrajectoryLog::new(&path);
            log.record(&rec(0.0));
            log.record(&rec(0.1));
        }
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["write", "0 1000 -2.5", "0.1 1000 -2.5"]);
    }

    #[test]
    fn unopenable_path_degrades_to_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("trajectories.txt");
        let mut log = TrajectoryLog::new(&path);
        log.record(&rec(0.0));
        log.record(&rec(0.1));
        log.flush();
        assert!(log.is_disabled());
        assert!(!path.exists());
    }

    #[test]
    fn memory_sink_shares_records() {
        let mut sink = MemorySink::default();
        let handle = sink.records();
        sink.record(&rec(2.0));
        assert_eq!(handle.borrow().len(), 1);
    }
}

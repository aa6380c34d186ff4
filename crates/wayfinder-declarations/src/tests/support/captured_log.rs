//! In-memory log writer for asserting emitted telemetry.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

/// Shared buffer that collects formatted log records.
#[derive(Debug, Clone, Default)]
pub struct CapturedLog {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLog {
    /// Writer factory handing out clones that append to this buffer.
    #[must_use]
    pub fn writer(&self) -> impl Fn() -> Self + Send + Sync + 'static {
        let log = self.clone();
        move || log.clone()
    }

    /// Everything written so far, as text.
    #[must_use]
    pub fn text(&self) -> String {
        let bytes = self
            .bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        String::from_utf8(bytes).unwrap_or_else(|error| panic!("log is not UTF-8: {error}"))
    }

    /// Parses every line as a JSON record.
    #[must_use]
    pub fn json_records(&self) -> Vec<Value> {
        self.text()
            .lines()
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|error| panic!("log line {line:?} is not JSON: {error}"))
            })
            .collect()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

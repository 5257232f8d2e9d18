//! Per-frame CSV trace of what the state machine decided.

use crate::action::Action;
use crate::error::VmResult;
use crate::gesture::InteractionMode;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRow {
    pub frame: u64,
    /// Frame timestamp in seconds.
    pub t: f64,
    pub mode: String,
    /// Empty when the frame emitted nothing.
    pub action: String,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub delta: Option<f32>,
}

impl TraceRow {
    pub fn new(frame: u64, timestamp: Duration, mode: InteractionMode, action: Option<&Action>) -> Self {
        let (x, y, delta) = match action {
            Some(Action::MoveTo { x, y }) => (Some(*x), Some(*y), None),
            Some(Action::ScrollBy { delta }) => (None, None, Some(*delta)),
            _ => (None, None, None),
        };
        Self {
            frame,
            t: timestamp.as_secs_f64(),
            mode: mode.to_string(),
            action: action.map(|a| a.kind().to_string()).unwrap_or_default(),
            x,
            y,
            delta,
        }
    }
}

pub struct TraceWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: u64,
}

impl TraceWriter<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> VmResult<Self> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
            rows: 0,
        })
    }
}

impl<W: Write> TraceWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
            rows: 0,
        }
    }

    pub fn write(&mut self, row: &TraceRow) -> VmResult<()> {
        self.writer.serialize(row)?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn flush(&mut self) -> VmResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and hands back the underlying writer.
    pub fn into_inner(self) -> VmResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::VirtualMouseError::Io(e.into_error()))
    }
}

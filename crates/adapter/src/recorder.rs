//! JSON-lines event recorder

use std::io::Write;

use tracing::warn;

use crate::core::{BoardEvent, BoardSnapshot, PresentationSink};
use crate::protocol::{create_event, create_snapshot, encode_line};

/// Sink that writes each event as one JSON line.
///
/// Sinks cannot fail back into the engine, so the first write error is kept
/// and later events are dropped. Check [`take_error`](Self::take_error) after
/// the move.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    seq: u64,
    error: Option<anyhow::Error>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            seq: 0,
            error: None,
        }
    }

    /// Sequence number of the last line written
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write a full board snapshot line.
    pub fn write_snapshot(&mut self, snapshot: &BoardSnapshot) -> anyhow::Result<()> {
        let line = encode_line(&create_snapshot(self.seq + 1, snapshot))?;
        self.write_line(&line)
    }

    fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "{line}")?;
        self.seq += 1;
        Ok(())
    }

    fn record(&mut self, event: &BoardEvent) -> anyhow::Result<()> {
        let line = encode_line(&create_event(self.seq + 1, event))?;
        self.write_line(&line)?;
        if matches!(event, BoardEvent::CascadeSettled) {
            self.writer.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> PresentationSink for JsonLinesSink<W> {
    fn on_event(&mut self, event: &BoardEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.record(event) {
            warn!(error = %err, event = event.name(), "event recording failed");
            self.error = Some(err);
        }
    }
}

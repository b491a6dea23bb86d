// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording with JSON-lines export.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event as a
//! [`RecordedEvent`]. [`RecorderSink::to_json_lines`] writes them out one JSON
//! object per line, and [`parse_json_lines`] reads such a dump back.
//!
//! Errors are stored as their display string.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use unveil_core::element::ElementId;
use unveil_core::error::RevealError;
use unveil_core::trace::{
    BatchSummary, MotionChangeEvent, RegisterEvent, ResetEvent, RevealEvent, TraceSink,
    UnregisterEvent,
};

/// One recorded event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecordedEvent {
    /// See [`TraceSink::on_register`].
    Register(RegisterEvent),
    /// See [`TraceSink::on_reveal`].
    Reveal(RevealEvent),
    /// See [`TraceSink::on_reset`].
    Reset(ResetEvent),
    /// See [`TraceSink::on_unregister`].
    Unregister(UnregisterEvent),
    /// See [`TraceSink::on_motion_change`].
    MotionChange(MotionChangeEvent),
    /// See [`TraceSink::on_batch`].
    Batch(BatchSummary),
    /// See [`TraceSink::on_error`].
    Error {
        /// The error's display string.
        message: String,
    },
}

impl RecordedEvent {
    /// The element the event is about, if any.
    #[must_use]
    pub fn element(&self) -> Option<ElementId> {
        match self {
            Self::Register(e) => Some(e.id),
            Self::Reveal(e) => Some(e.id),
            Self::Reset(e) => Some(e.id),
            Self::Unregister(e) => Some(e.id),
            Self::MotionChange(_) | Self::Batch(_) | Self::Error { .. } => None,
        }
    }
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Drops everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Ids passed to `on_reveal`, in order.
    #[must_use]
    pub fn revealed_ids(&self) -> Vec<ElementId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Reveal(r) => Some(r.id),
                _ => None,
            })
            .collect()
    }

    /// Writes one JSON object per line.
    ///
    /// # Errors
    ///
    /// Returns any I/O or serialization error from the writer.
    pub fn to_json_lines(&self, mut writer: impl Write) -> serde_json::Result<()> {
        for event in &self.events {
            serde_json::to_writer(&mut writer, event)?;
            writer.write_all(b"\n").map_err(serde_json::Error::io)?;
        }
        Ok(())
    }
}

/// Reads events written by [`RecorderSink::to_json_lines`]. Blank lines are
/// skipped.
///
/// # Errors
///
/// Returns the first I/O or parse error.
pub fn parse_json_lines(reader: impl BufRead) -> serde_json::Result<Vec<RecordedEvent>> {
    let mut events = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(serde_json::Error::io)?;
        if line.trim().is_empty() {
            continue;
        }
        events.push(serde_json::from_str(&line)?);
    }
    Ok(events)
}

impl TraceSink for RecorderSink {
    fn on_register(&mut self, e: &RegisterEvent) {
        self.events.push(RecordedEvent::Register(*e));
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        self.events.push(RecordedEvent::Reveal(*e));
    }

    fn on_reset(&mut self, e: &ResetEvent) {
        self.events.push(RecordedEvent::Reset(*e));
    }

    fn on_unregister(&mut self, e: &UnregisterEvent) {
        self.events.push(RecordedEvent::Unregister(*e));
    }

    fn on_motion_change(&mut self, e: &MotionChangeEvent) {
        self.events.push(RecordedEvent::MotionChange(*e));
    }

    fn on_batch(&mut self, s: &BatchSummary) {
        self.events.push(RecordedEvent::Batch(*s));
    }

    fn on_error(&mut self, err: &RevealError) {
        self.events.push(RecordedEvent::Error {
            message: err.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::motion::MotionMode;
    use unveil_core::session::RevealCause;
    use unveil_core::trace::UnregisterReason;

    fn sample() -> RecorderSink {
        let id = ElementId::from_raw(1, 0);
        let mut sink = RecorderSink::new();
        sink.on_reveal(&RevealEvent {
            id,
            cause: RevealCause::Intersection,
            motion: MotionMode::Full,
        });
        sink.on_unregister(&UnregisterEvent {
            id,
            reason: UnregisterReason::Completed,
        });
        sink.on_error(&RevealError::callback(id, "boom"));
        sink
    }

    #[test]
    fn records_in_order() {
        let sink = sample();
        assert_eq!(sink.events().len(), 3);
        assert_eq!(sink.revealed_ids(), vec![ElementId::from_raw(1, 0)]);
        assert_eq!(sink.events()[2].element(), None);
    }

    #[test]
    fn json_lines_are_tagged() {
        let mut out = Vec::new();
        sample().to_json_lines(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["event"], "reveal");
        assert_eq!(first["cause"], "intersection");
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn json_lines_read_back() {
        let sink = sample();
        let mut out = Vec::new();
        sink.to_json_lines(&mut out).unwrap();
        out.extend_from_slice(b"\n");
        let parsed = parse_json_lines(out.as_slice()).unwrap();
        assert_eq!(parsed, sink.events());
    }
}

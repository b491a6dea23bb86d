// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use unveil_core::error::RevealError;
use unveil_core::motion::MotionMode;
use unveil_core::session::RevealCause;
use unveil_core::trace::{
    BatchSummary, MotionChangeEvent, RegisterEvent, ResetEvent, RevealEvent, TraceSink,
    UnregisterEvent, UnregisterReason,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn mode_name(mode: MotionMode) -> &'static str {
    match mode {
        MotionMode::Full => "full",
        MotionMode::Reduced => "reduced",
    }
}

fn cause_name(cause: RevealCause) -> &'static str {
    match cause {
        RevealCause::Intersection => "intersection",
        RevealCause::ReducedMotion => "reduced-motion",
    }
}

fn reason_name(reason: UnregisterReason) -> &'static str {
    match reason {
        UnregisterReason::Caller => "caller",
        UnregisterReason::Completed => "completed",
        UnregisterReason::Disposed => "disposed",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_register(&mut self, e: &RegisterEvent) {
        let kind = if e.rearmed { "rearm" } else { "register" };
        let _ = writeln!(
            self.writer,
            "[{kind}] {} threshold={:.2} one_shot={}",
            e.id, e.threshold, e.one_shot,
        );
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        let _ = writeln!(
            self.writer,
            "[reveal] {} cause={} motion={}",
            e.id,
            cause_name(e.cause),
            mode_name(e.motion),
        );
    }

    fn on_reset(&mut self, e: &ResetEvent) {
        let _ = writeln!(self.writer, "[reset] {}", e.id);
    }

    fn on_unregister(&mut self, e: &UnregisterEvent) {
        let _ = writeln!(
            self.writer,
            "[unregister] {} reason={}",
            e.id,
            reason_name(e.reason),
        );
    }

    fn on_motion_change(&mut self, e: &MotionChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[motion] {} -> {} forced={}",
            mode_name(e.from),
            mode_name(e.to),
            e.forced,
        );
    }

    fn on_batch(&mut self, s: &BatchSummary) {
        let _ = writeln!(
            self.writer,
            "[batch] #{} entries={} revealed={} reset={} skipped={} failed={}",
            s.batch_index, s.entries, s.revealed, s.reset, s.skipped, s.failed,
        );
    }

    fn on_error(&mut self, err: &RevealError) {
        let _ = writeln!(self.writer, "[error] {err}");
    }
}

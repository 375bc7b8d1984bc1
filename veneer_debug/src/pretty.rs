// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] writes one line per event:
//!
//! ```text
//! [render 0] begin root=#0 dirty=true
//! [render 0] shadow #1 z=20 dy=4.29 sigma=(4.00, 5.71) alpha=247
//! [render 0] draw #2 surface=11 opacity=0.800 at (102.0, 53.0)
//! [render 0] skip #3 (hidden)
//! [render 0] end visited=3 skipped=1 drawn=1 shadows=1 clips=0
//! ```
//!
//! Write errors are ignored; tracing must never disturb rendering.

use std::io::{self, Write};

use veneer_core::trace::{
    DrawEvent, RenderBeginEvent, RenderEndEvent, ShadowLayerEvent, SkipReason, TraceSink,
    VisualChange, VisualField, VisualSkipEvent,
};

/// A [`TraceSink`] that prints each event as a line of text.
#[derive(Debug)]
pub struct PrettyPrintSink<W: Write> {
    writer: W,
}

impl PrettyPrintSink<io::Stderr> {
    /// Creates a sink that prints to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that prints to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

const fn skip_reason(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::Hidden => "hidden",
        SkipReason::Transparent => "transparent",
    }
}

const fn field_name(field: VisualField) -> &'static str {
    match field {
        VisualField::Transform => "transform",
        VisualField::Opacity => "opacity",
        VisualField::Clip => "clip",
        VisualField::Content => "content",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_render_begin(&mut self, e: &RenderBeginEvent) {
        let _ = match e.root {
            Some(root) => writeln!(
                self.writer,
                "[render {}] begin root={root} dirty={}",
                e.frame_index, e.was_dirty
            ),
            None => writeln!(
                self.writer,
                "[render {}] begin root=none dirty={}",
                e.frame_index, e.was_dirty
            ),
        };
    }

    fn on_render_end(&mut self, e: &RenderEndEvent) {
        let s = &e.stats;
        let _ = writeln!(
            self.writer,
            "[render {}] {} visited={} skipped={} drawn={} shadows={} clips={}",
            e.frame_index,
            if e.failed { "FAILED" } else { "end" },
            s.visited,
            s.skipped,
            s.drawn,
            s.shadows,
            s.clips,
        );
    }

    fn on_visual_skip(&mut self, e: &VisualSkipEvent) {
        let _ = writeln!(
            self.writer,
            "[render {}] skip {} ({})",
            e.frame_index,
            e.visual,
            skip_reason(e.reason),
        );
    }

    fn on_shadow_layer(&mut self, e: &ShadowLayerEvent) {
        let shadow = &e.shadow;
        let _ = writeln!(
            self.writer,
            "[render {}] shadow {} z={} dy={:.2} sigma=({:.2}, {:.2}) alpha={}",
            e.frame_index,
            e.visual,
            e.elevation,
            shadow.dy,
            shadow.sigma_x,
            shadow.sigma_y,
            shadow.alpha(),
        );
    }

    fn on_visual_changes(&mut self, frame_index: u64, changes: &[VisualChange]) {
        let _ = write!(
            self.writer,
            "[changes {frame_index}] {} visual changes:",
            changes.len()
        );
        for change in changes {
            let _ = write!(
                self.writer,
                " {}#{}",
                field_name(change.field),
                change.visual_index
            );
        }
        let _ = writeln!(self.writer);
    }

    fn on_draw(&mut self, e: &DrawEvent) {
        let t = e.transform.translation();
        let _ = writeln!(
            self.writer,
            "[render {}] draw {} surface={} opacity={:.3} at ({:.1}, {:.1})",
            e.frame_index, e.visual, e.surface.0, e.opacity, t.x, t.y,
        );
    }
}

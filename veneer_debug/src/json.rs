// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Machine-readable trace output.
//!
//! [`JsonLinesSink`] writes one JSON object per event, one per line, for
//! loading into scripts or log pipelines. Every object has an `"event"` key
//! naming the event and a `"frame"` key with the render counter.

use std::io::{self, Write};

use serde_json::{Value, json};

use veneer_core::trace::{
    DrawEvent, RenderBeginEvent, RenderEndEvent, ShadowLayerEvent, SkipReason, TraceSink,
    VisualChange, VisualField, VisualSkipEvent,
};

/// A [`TraceSink`] that writes JSON Lines.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// Returns the underlying writer, or the first write error that occurred.
    ///
    /// # Errors
    ///
    /// Returns the first [`io::Error`] raised while writing an event. Events
    /// after a failed write are dropped.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn emit(&mut self, value: &Value) {
        if self.error.is_some() {
            return;
        }
        let result = serde_json::to_writer(&mut self.writer, value)
            .map_err(io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(err) = result {
            self.error = Some(err);
        }
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

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_render_begin(&mut self, e: &RenderBeginEvent) {
        self.emit(&json!({
            "event": "render_begin",
            "frame": e.frame_index,
            "root": e.root.map(|root| root.index()),
            "dirty": e.was_dirty,
        }));
    }

    fn on_render_end(&mut self, e: &RenderEndEvent) {
        self.emit(&json!({
            "event": "render_end",
            "frame": e.frame_index,
            "failed": e.failed,
            "visited": e.stats.visited,
            "skipped": e.stats.skipped,
            "drawn": e.stats.drawn,
            "shadows": e.stats.shadows,
            "clips": e.stats.clips,
        }));
    }

    fn on_visual_skip(&mut self, e: &VisualSkipEvent) {
        self.emit(&json!({
            "event": "skip",
            "frame": e.frame_index,
            "visual": e.visual.index(),
            "reason": skip_reason(e.reason),
        }));
    }

    fn on_shadow_layer(&mut self, e: &ShadowLayerEvent) {
        self.emit(&json!({
            "event": "shadow",
            "frame": e.frame_index,
            "visual": e.visual.index(),
            "elevation": e.elevation,
            "dx": e.shadow.dx,
            "dy": e.shadow.dy,
            "sigma_x": e.shadow.sigma_x,
            "sigma_y": e.shadow.sigma_y,
            "alpha": e.shadow.alpha(),
        }));
    }

    fn on_visual_changes(&mut self, frame_index: u64, changes: &[VisualChange]) {
        let changes: Vec<Value> = changes
            .iter()
            .map(|c| json!({ "visual": c.visual_index, "field": field_name(c.field) }))
            .collect();
        self.emit(&json!({
            "event": "changes",
            "frame": frame_index,
            "changes": changes,
        }));
    }

    fn on_draw(&mut self, e: &DrawEvent) {
        self.emit(&json!({
            "event": "draw",
            "frame": e.frame_index,
            "visual": e.visual.index(),
            "surface": e.surface.0,
            "opacity": e.opacity,
            "transform": e.transform.as_coeffs(),
        }));
    }
}

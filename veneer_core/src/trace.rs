// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for render passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! the compositor calls while it walks the visual tree. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates [`VisualChange`] and [`DrawEvent`]
//!   events plus the corresponding `TraceSink` methods.

#[cfg(feature = "trace-rich")]
use alloc::vec::Vec;

#[cfg(feature = "trace-rich")]
use kurbo::Affine;

use crate::compositor::RenderStats;
use crate::shadow::ShadowParameters;
#[cfg(feature = "trace-rich")]
use crate::visual::{SurfaceId, VisualChanges};
use crate::visual::VisualId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why a visual and its subtree were left out of a render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The visual's `visible` flag is off.
    Hidden,
    /// The visual's opacity is exactly zero.
    Transparent,
}

/// Which property of a visual changed.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualField {
    /// Offset, anchor, center point, rotation, or matrix (own or inherited).
    Transform,
    /// Opacity or visibility (own or inherited).
    Opacity,
    /// Clip shape.
    Clip,
    /// Leaf content.
    Content,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a render pass starts.
#[derive(Clone, Copy, Debug)]
pub struct RenderBeginEvent {
    /// Monotonic render counter.
    pub frame_index: u64,
    /// The root visual, if one is set.
    pub root: Option<VisualId>,
    /// Whether the frame-dirty flag was set when the pass started.
    pub was_dirty: bool,
}

/// Emitted when a render pass finishes, successfully or not.
#[derive(Clone, Copy, Debug)]
pub struct RenderEndEvent {
    /// Render counter.
    pub frame_index: u64,
    /// Counters accumulated up to the point the pass ended.
    pub stats: RenderStats,
    /// Whether the pass was aborted by an error.
    pub failed: bool,
}

/// Emitted when a visual's subtree is skipped.
#[derive(Clone, Copy, Debug)]
pub struct VisualSkipEvent {
    /// Render counter.
    pub frame_index: u64,
    /// The skipped visual.
    pub visual: VisualId,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Emitted when a drop-shadow layer is opened for an elevated visual.
#[derive(Clone, Copy, Debug)]
pub struct ShadowLayerEvent {
    /// Render counter.
    pub frame_index: u64,
    /// The elevated visual.
    pub visual: VisualId,
    /// The visual's `offset.z`.
    pub elevation: f64,
    /// The derived shadow.
    pub shadow: ShadowParameters,
}

/// A per-visual change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisualChange {
    /// Slot index of the visual that changed.
    pub visual_index: u32,
    /// Which field changed.
    pub field: VisualField,
}

/// Emitted for each leaf content draw.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct DrawEvent {
    /// Render counter.
    pub frame_index: u64,
    /// The drawable visual.
    pub visual: VisualId,
    /// Its content.
    pub surface: SurfaceId,
    /// Accumulated opacity.
    pub opacity: f32,
    /// Accumulated transform.
    pub transform: Affine,
}

#[cfg(feature = "trace-rich")]
impl VisualChanges {
    /// Flattens the channel lists into per-visual change records, ordered
    /// by field and then by slot index within each field.
    #[must_use]
    pub fn to_trace_records(&self) -> Vec<VisualChange> {
        let fields = [
            (VisualField::Transform, &self.transforms),
            (VisualField::Opacity, &self.opacities),
            (VisualField::Clip, &self.clips),
            (VisualField::Content, &self.content),
        ];
        fields
            .into_iter()
            .flat_map(|(field, indices)| {
                indices.iter().map(move |&visual_index| VisualChange {
                    visual_index,
                    field,
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the compositor.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a render pass starts.
    fn on_render_begin(&mut self, e: &RenderBeginEvent) {
        _ = e;
    }

    /// Called when a render pass ends.
    fn on_render_end(&mut self, e: &RenderEndEvent) {
        _ = e;
    }

    /// Called when a visual's subtree is skipped.
    fn on_visual_skip(&mut self, e: &VisualSkipEvent) {
        _ = e;
    }

    /// Called when a drop-shadow layer is opened.
    fn on_shadow_layer(&mut self, e: &ShadowLayerEvent) {
        _ = e;
    }

    /// Called with drained visual changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_visual_changes(&mut self, frame_index: u64, changes: &[VisualChange]) {
        _ = (frame_index, changes);
    }

    /// Called for each content draw (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_draw(&mut self, e: &DrawEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`RenderBeginEvent`].
    #[inline]
    pub fn render_begin(&mut self, e: &RenderBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_render_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RenderEndEvent`].
    #[inline]
    pub fn render_end(&mut self, e: &RenderEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_render_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`VisualSkipEvent`].
    #[inline]
    pub fn visual_skip(&mut self, e: &VisualSkipEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_visual_skip(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ShadowLayerEvent`].
    #[inline]
    pub fn shadow_layer(&mut self, e: &ShadowLayerEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_shadow_layer(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits visual changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn visual_changes(&mut self, frame_index: u64, changes: &[VisualChange]) {
        if let Some(s) = &mut self.sink {
            s.on_visual_changes(frame_index, changes);
        }
    }

    /// Emits a [`DrawEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn draw(&mut self, e: &DrawEvent) {
        if let Some(s) = &mut self.sink {
            s.on_draw(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::VisualStore;

    fn sample_visual() -> VisualId {
        let mut store = VisualStore::new();
        store.create_visual()
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_render_begin(&RenderBeginEvent {
            frame_index: 0,
            root: None,
            was_dirty: false,
        });
        sink.on_render_end(&RenderEndEvent {
            frame_index: 0,
            stats: RenderStats::default(),
            failed: false,
        });
        sink.on_shadow_layer(&ShadowLayerEvent {
            frame_index: 0,
            visual: sample_visual(),
            elevation: 10.0,
            shadow: ShadowParameters::from_elevation(10.0),
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.visual_skip(&VisualSkipEvent {
            frame_index: 1,
            visual: sample_visual(),
            reason: SkipReason::Hidden,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            skips: Vec<(u64, SkipReason)>,
        }
        impl TraceSink for RecordingSink {
            fn on_visual_skip(&mut self, e: &VisualSkipEvent) {
                self.skips.push((e.frame_index, e.reason));
            }
        }

        let mut sink = RecordingSink { skips: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.visual_skip(&VisualSkipEvent {
            frame_index: 3,
            visual: sample_visual(),
            reason: SkipReason::Transparent,
        });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.skips, &[(3, SkipReason::Transparent)]);
    }

    #[cfg(feature = "trace-rich")]
    #[test]
    fn change_records_are_grouped_by_field() {
        let changes = VisualChanges {
            transforms: alloc::vec![2, 5],
            clips: alloc::vec![5],
            ..VisualChanges::default()
        };
        assert_eq!(
            changes.to_trace_records(),
            [
                VisualChange {
                    visual_index: 2,
                    field: VisualField::Transform
                },
                VisualChange {
                    visual_index: 5,
                    field: VisualField::Transform
                },
                VisualChange {
                    visual_index: 5,
                    field: VisualField::Clip
                },
            ]
        );
    }
}

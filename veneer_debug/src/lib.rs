// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON Lines output for veneer diagnostics.
//!
//! This crate provides [`TraceSink`](veneer_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`json::JsonLinesSink`] — one JSON object per event, for scripts and
//!   log pipelines.

pub mod json;
pub mod pretty;

#[cfg(test)]
mod tests {
    use kurbo::{Affine, BezPath, Rect};
    use veneer_core::backend::RenderTarget;
    use veneer_core::shadow::ShadowParameters;
    use veneer_core::visual::SurfaceId;

    /// A render target that discards everything.
    pub(crate) struct NullTarget;

    impl RenderTarget for NullTarget {
        fn save(&mut self) {}
        fn save_layer_with_shadow(&mut self, _: &ShadowParameters) {}
        fn restore(&mut self) {}
        fn transform(&self) -> Affine {
            Affine::IDENTITY
        }
        fn set_transform(&mut self, _: Affine) {}
        fn clip_rect(&mut self, _: Rect, _: bool) {}
        fn clip_path(&mut self, _: &BezPath, _: bool) {}
        fn draw_surface(&mut self, _: SurfaceId, _: f32) {}
    }
}

// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display list: a recorded, back-to-front sequence of draw operations.

use alloc::vec::Vec;

use kurbo::{Affine, BezPath, Rect, Shape};
use veneer_core::backend::RenderTarget;
use veneer_core::shadow::ShadowParameters;
use veneer_core::visual::SurfaceId;

/// The shape of a recorded clip.
#[derive(Clone, Debug, PartialEq)]
pub enum ClipGeometry {
    /// A rectangle in the clip's local space.
    Rect(Rect),
    /// A path in the clip's local space.
    Path(BezPath),
}

/// One clip intersected into the clip region, with the transform that was
/// active when it was applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipItem {
    /// Local-to-device transform of the clip geometry.
    pub transform: Affine,
    /// The clip geometry.
    pub geometry: ClipGeometry,
    /// Whether edges are antialiased.
    pub antialias: bool,
}

impl ClipItem {
    /// Returns the device-space bounding box of the clip.
    #[must_use]
    pub fn device_bounds(&self) -> Rect {
        match &self.geometry {
            ClipGeometry::Rect(rect) => self.transform.transform_rect_bbox(*rect),
            ClipGeometry::Path(path) => {
                let mut path = path.clone();
                path.apply_affine(self.transform);
                path.bounding_box()
            }
        }
    }
}

/// A single content draw.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    /// The surface to draw.
    pub surface: SurfaceId,
    /// Local-to-device transform.
    pub transform: Affine,
    /// Accumulated opacity.
    pub opacity: f32,
    /// Every clip in effect, outermost first.
    pub clips: Vec<ClipItem>,
}

impl DrawItem {
    /// Returns the intersection of all clips' device bounds, or `None` if
    /// the draw is unclipped.
    #[must_use]
    pub fn clip_bounds(&self) -> Option<Rect> {
        self.clips
            .iter()
            .map(ClipItem::device_bounds)
            .reduce(|acc, bounds| acc.intersect(bounds))
    }
}

/// A recorded operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayOp {
    /// Start an offscreen layer that gets a drop shadow when popped.
    PushShadowLayer(ShadowParameters),
    /// Composite the most recent shadow layer.
    PopLayer,
    /// Draw content.
    Draw(DrawItem),
}

#[derive(Clone, Copy, Debug)]
struct SavedState {
    transform: Affine,
    clip_len: usize,
    layer: bool,
}

/// A [`RenderTarget`] that records operations instead of rasterizing.
///
/// Plain save/restore pairs leave no trace in the output; they only scope
/// the transform and clip chain attached to each [`DrawItem`]. Shadow
/// layers are recorded as [`DisplayOp::PushShadowLayer`] /
/// [`DisplayOp::PopLayer`] pairs.
///
/// Backends replay [`ops`](Self::ops) in order.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    ops: Vec<DisplayOp>,
    base_transform: Affine,
    transform: Affine,
    clips: Vec<ClipItem>,
    saved: Vec<SavedState>,
    unmatched_restores: u32,
}

impl DisplayList {
    /// Creates an empty display list with an identity base transform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty display list whose initial transform is `base`,
    /// for example a device scale factor.
    #[must_use]
    pub fn with_base_transform(base: Affine) -> Self {
        Self {
            base_transform: base,
            transform: base,
            ..Self::default()
        }
    }

    /// Returns the recorded operations in paint order.
    #[must_use]
    pub fn ops(&self) -> &[DisplayOp] {
        &self.ops
    }

    /// Returns the recorded draws in paint order.
    pub fn draws(&self) -> impl Iterator<Item = &DrawItem> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DisplayOp::Draw(item) => Some(item),
            _ => None,
        })
    }

    /// Returns the number of shadow layers recorded.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DisplayOp::PushShadowLayer(_)))
            .count()
    }

    /// Returns the number of open saves.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }

    /// Returns `true` if every save has been restored and no restore ran
    /// without a matching save.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.saved.is_empty() && self.unmatched_restores == 0
    }

    /// Discards all recorded operations and state, keeping the base
    /// transform and allocations.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.transform = self.base_transform;
        self.clips.clear();
        self.saved.clear();
        self.unmatched_restores = 0;
    }

    fn push_state(&mut self, layer: bool) {
        self.saved.push(SavedState {
            transform: self.transform,
            clip_len: self.clips.len(),
            layer,
        });
    }
}

impl RenderTarget for DisplayList {
    fn save(&mut self) {
        self.push_state(false);
    }

    fn save_layer_with_shadow(&mut self, shadow: &ShadowParameters) {
        self.push_state(true);
        self.ops.push(DisplayOp::PushShadowLayer(*shadow));
    }

    fn restore(&mut self) {
        let Some(state) = self.saved.pop() else {
            // Canvases ignore unmatched restores; remember it for is_balanced.
            self.unmatched_restores += 1;
            return;
        };
        self.transform = state.transform;
        self.clips.truncate(state.clip_len);
        if state.layer {
            self.ops.push(DisplayOp::PopLayer);
        }
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn clip_rect(&mut self, rect: Rect, antialias: bool) {
        self.clips.push(ClipItem {
            transform: self.transform,
            geometry: ClipGeometry::Rect(rect),
            antialias,
        });
    }

    fn clip_path(&mut self, path: &BezPath, antialias: bool) {
        self.clips.push(ClipItem {
            transform: self.transform,
            geometry: ClipGeometry::Path(path.clone()),
            antialias,
        });
    }

    fn draw_surface(&mut self, surface: SurfaceId, opacity: f32) {
        self.ops.push(DisplayOp::Draw(DrawItem {
            surface,
            transform: self.transform,
            opacity,
            clips: self.clips.clone(),
        }));
    }
}

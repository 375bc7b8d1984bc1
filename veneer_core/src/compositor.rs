// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame compositor traversal.
//!
//! [`Compositor::render`] walks the visual tree once per frame and issues
//! draw calls on a [`RenderTarget`]. For each visual, in pre-order:
//!
//! 1. Skip the visual and its whole subtree if it is hidden or its opacity
//!    is exactly zero. Nothing is pushed, so nothing needs popping.
//! 2. Save the target state, opening a drop-shadow layer instead of a plain
//!    save if the visual is elevated (`offset.z > 0`).
//! 3. Compose the visual's transform onto the target's current one and set
//!    the result as the active transform.
//! 4. Intersect the visual's clip into the clip region.
//! 5. Multiply the visual's opacity into the accumulated opacity.
//! 6. Draw the visual's content, if it has any.
//! 7. Recurse into the children in paint order.
//! 8. Pop the opacity and restore the target state.
//!
//! Steps 2 and 5 are scope guards ([`TargetScope`] and
//! [`OpacityScope`](crate::opacity::OpacityScope)), so step 8 also runs when
//! a clip error unwinds the traversal. A failed frame leaves both the target
//! and the compositor balanced, ready for the next render.
//!
//! The root visual itself is a bare container: only its children are
//! traversed, so its own transform, opacity, and clip have no effect.

use core::fmt;

use kurbo::Affine;

use crate::backend::{FrameRequester, RenderTarget, TargetScope};
use crate::invalidate::Invalidator;
use crate::opacity::OpacityStack;
use crate::shadow::ShadowParameters;
use crate::trace::{
    RenderBeginEvent, RenderEndEvent, ShadowLayerEvent, SkipReason, Tracer, VisualSkipEvent,
};
use crate::transform::compose;
use crate::visual::{INVALID, UnsupportedClipSource, VisualId, VisualStore};

/// Counters collected during a render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Visuals reached by the traversal, including skipped ones.
    pub visited: u32,
    /// Visuals skipped as hidden or fully transparent (their descendants
    /// are not visited).
    pub skipped: u32,
    /// Content draws issued.
    pub drawn: u32,
    /// Drop-shadow layers opened.
    pub shadows: u32,
    /// Clips intersected into the clip region.
    pub clips: u32,
}

/// Errors that abort a render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// A visual's geometric clip has no renderable path.
    UnsupportedClipSource {
        /// The visual carrying the clip.
        visual: VisualId,
        /// The underlying clip error.
        source: UnsupportedClipSource,
    },
}

impl RenderError {
    /// Returns the visual the error was raised for.
    #[must_use]
    pub const fn visual(&self) -> VisualId {
        match self {
            Self::UnsupportedClipSource { visual, .. } => *visual,
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedClipSource { visual, source } => {
                write!(f, "cannot apply clip of visual {visual}: {source}")
            }
        }
    }
}

impl core::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::UnsupportedClipSource { source, .. } => Some(source),
        }
    }
}

/// Owns the root visual, the opacity stack, and the frame-dirty flag.
///
/// The compositor never creates, destroys, or mutates visuals; it only
/// reads a [`VisualStore`] during [`render`](Self::render).
#[derive(Debug)]
pub struct Compositor {
    root: Option<VisualId>,
    opacity: OpacityStack,
    invalidator: Invalidator,
    frame_index: u64,
}

impl Compositor {
    /// Creates a compositor with no root that asks `requester` for frames.
    pub fn new(requester: impl FrameRequester + 'static) -> Self {
        Self::with_invalidator(Invalidator::new(requester))
    }

    /// Creates a compositor around an existing frame-dirty flag.
    #[must_use]
    pub fn with_invalidator(invalidator: Invalidator) -> Self {
        Self {
            root: None,
            opacity: OpacityStack::new(),
            invalidator,
            frame_index: 0,
        }
    }

    /// Sets (or clears) the root visual and invalidates the frame.
    pub fn set_root(&mut self, root: Option<VisualId>) {
        self.root = root;
        self.invalidator.invalidate();
    }

    /// Returns the root visual.
    #[must_use]
    pub fn root(&self) -> Option<VisualId> {
        self.root
    }

    /// Returns the frame-dirty flag.
    ///
    /// Clone it into producers (for example
    /// [`VisualStore::set_invalidator`]) so their changes request frames.
    #[must_use]
    pub fn invalidator(&self) -> &Invalidator {
        &self.invalidator
    }

    /// Marks the frame dirty, requesting a frame from the host on the
    /// clean-to-dirty transition. Returns whether a frame was requested.
    ///
    /// Safe to call from any thread through a cloned [`Invalidator`].
    pub fn invalidate_render(&self) -> bool {
        self.invalidator.invalidate()
    }

    /// Returns whether a frame has been requested but not yet rendered.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.invalidator.is_dirty()
    }

    /// Returns the number of render passes started so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Returns the accumulated opacity. Always `1.0` outside a render pass.
    #[must_use]
    pub fn current_opacity(&self) -> f32 {
        self.opacity.current()
    }

    /// Returns the opacity stack depth. Always `0` outside a render pass.
    #[must_use]
    pub fn opacity_depth(&self) -> usize {
        self.opacity.depth()
    }

    /// Renders one frame of `store` into `target`.
    ///
    /// Clears the frame-dirty flag first, so invalidations made while
    /// rendering request a new frame. Rendering without a root is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedClipSource`] if a visual's clip
    /// cannot be applied. The rest of the frame is abandoned; the target's
    /// save/restore stack and the opacity stack are left balanced.
    ///
    /// # Panics
    ///
    /// Panics if the root handle is stale.
    pub fn render<T: RenderTarget + ?Sized>(
        &mut self,
        store: &VisualStore,
        target: &mut T,
    ) -> Result<RenderStats, RenderError> {
        self.render_traced(store, target, &mut Tracer::none())
    }

    /// Like [`render`](Self::render), but emits trace events.
    ///
    /// # Errors
    ///
    /// See [`render`](Self::render).
    ///
    /// # Panics
    ///
    /// Panics if the root handle is stale.
    pub fn render_traced<T: RenderTarget + ?Sized>(
        &mut self,
        store: &VisualStore,
        target: &mut T,
        tracer: &mut Tracer<'_>,
    ) -> Result<RenderStats, RenderError> {
        let was_dirty = self.invalidator.clear();
        let frame_index = self.frame_index;
        self.frame_index += 1;

        tracer.render_begin(&RenderBeginEvent {
            frame_index,
            root: self.root,
            was_dirty,
        });

        let mut pass = Pass {
            store,
            tracer,
            frame_index,
            stats: RenderStats::default(),
        };

        let result = match self.root {
            Some(root) => {
                store.validate(root);
                pass.render_children(target, &mut self.opacity, root.idx)
            }
            None => Ok(()),
        };
        debug_assert!(self.opacity.is_empty(), "opacity stack not unwound");

        let stats = pass.stats;
        pass.tracer.render_end(&RenderEndEvent {
            frame_index,
            stats,
            failed: result.is_err(),
        });
        result.map(|()| stats)
    }
}

/// State threaded through one traversal.
struct Pass<'s, 't, 'a> {
    store: &'s VisualStore,
    tracer: &'t mut Tracer<'a>,
    frame_index: u64,
    stats: RenderStats,
}

impl Pass<'_, '_, '_> {
    fn render_children<T: RenderTarget + ?Sized>(
        &mut self,
        target: &mut T,
        opacity: &mut OpacityStack,
        parent: u32,
    ) -> Result<(), RenderError> {
        let mut child = self.store.first_child[parent as usize];
        while child != INVALID {
            self.render_visual(target, opacity, child)?;
            child = self.store.next_sibling[child as usize];
        }
        Ok(())
    }

    fn render_visual<T: RenderTarget + ?Sized>(
        &mut self,
        target: &mut T,
        opacity: &mut OpacityStack,
        idx: u32,
    ) -> Result<(), RenderError> {
        let store = self.store;
        let i = idx as usize;
        let visual = VisualId {
            idx,
            generation: store.generation[i],
        };
        self.stats.visited += 1;

        let visual_opacity = store.opacity[i];
        let skip = if !store.visible[i] {
            Some(SkipReason::Hidden)
        } else if visual_opacity == 0.0 {
            Some(SkipReason::Transparent)
        } else {
            None
        };
        if let Some(reason) = skip {
            self.stats.skipped += 1;
            self.tracer.visual_skip(&VisualSkipEvent {
                frame_index: self.frame_index,
                visual,
                reason,
            });
            return Ok(());
        }

        let props = store.transform_props_at(idx);
        let mut target = if props.offset.z > 0.0 {
            let shadow = ShadowParameters::from_elevation(elevation(props.offset.z));
            self.stats.shadows += 1;
            self.tracer.shadow_layer(&ShadowLayerEvent {
                frame_index: self.frame_index,
                visual,
                elevation: props.offset.z,
                shadow,
            });
            TargetScope::save_layer_with_shadow(target, &shadow)
        } else {
            TargetScope::save(target)
        };

        let transform: Affine = compose(target.transform(), &props);
        target.set_transform(transform);

        if let Some(clip) = &store.clip[i] {
            clip.apply(&mut *target)
                .map_err(|source| RenderError::UnsupportedClipSource { visual, source })?;
            self.stats.clips += 1;
        }

        let mut opacity = opacity.push(visual_opacity);

        if let Some(surface) = store.content[i] {
            target.draw_surface(surface, opacity.current());
            self.stats.drawn += 1;
            #[cfg(feature = "trace-rich")]
            self.tracer.draw(&crate::trace::DrawEvent {
                frame_index: self.frame_index,
                visual,
                surface,
                opacity: opacity.current(),
                transform,
            });
        }

        self.render_children(&mut *target, &mut opacity, idx)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "shadow math runs in f32; elevations are small"
)]
fn elevation(z: f64) -> f32 {
    z as f32
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use kurbo::{BezPath, Point, Rect, Vec2};

    use super::*;
    use crate::transform::{Vector3, VisualTransform};
    use crate::visual::{ClipShape, GeometricClip, Geometry, InsetClip, SurfaceId};

    #[derive(Clone, Debug, PartialEq)]
    enum Op {
        Save,
        SaveLayer(ShadowParameters),
        Restore,
        SetTransform(Affine),
        ClipRect(Rect),
        ClipPath,
        Draw {
            surface: SurfaceId,
            opacity: f32,
            transform: Affine,
        },
    }

    /// Records every call and tracks the state stack like a canvas would.
    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
        transform: Affine,
        saved: Vec<Affine>,
        max_depth: usize,
    }

    impl Recorder {
        fn draws(&self) -> Vec<(SurfaceId, f32, Affine)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Draw {
                        surface,
                        opacity,
                        transform,
                    } => Some((*surface, *opacity, *transform)),
                    _ => None,
                })
                .collect()
        }

        fn count(&self, wanted: &Op) -> usize {
            self.ops.iter().filter(|op| *op == wanted).count()
        }
    }

    impl RenderTarget for Recorder {
        fn save(&mut self) {
            self.ops.push(Op::Save);
            self.saved.push(self.transform);
            self.max_depth = self.max_depth.max(self.saved.len());
        }
        fn save_layer_with_shadow(&mut self, shadow: &ShadowParameters) {
            self.ops.push(Op::SaveLayer(*shadow));
            self.saved.push(self.transform);
            self.max_depth = self.max_depth.max(self.saved.len());
        }
        fn restore(&mut self) {
            self.ops.push(Op::Restore);
            self.transform = self.saved.pop().expect("restore without save");
        }
        fn transform(&self) -> Affine {
            self.transform
        }
        fn set_transform(&mut self, transform: Affine) {
            self.ops.push(Op::SetTransform(transform));
            self.transform = transform;
        }
        fn clip_rect(&mut self, rect: Rect, _antialias: bool) {
            self.ops.push(Op::ClipRect(rect));
        }
        fn clip_path(&mut self, _path: &BezPath, _antialias: bool) {
            self.ops.push(Op::ClipPath);
        }
        fn draw_surface(&mut self, surface: SurfaceId, opacity: f32) {
            self.ops.push(Op::Draw {
                surface,
                opacity,
                transform: self.transform,
            });
        }
    }

    fn compositor() -> (Compositor, Arc<AtomicUsize>) {
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);
        let compositor = Compositor::new(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        (compositor, requests)
    }

    fn assert_affine_eq(actual: Affine, expected: Affine) {
        let (a, e) = (actual.as_coeffs(), expected.as_coeffs());
        for (x, y) in a.iter().zip(e.iter()) {
            assert!((x - y).abs() < 1e-9, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn null_root_is_a_no_op() {
        let (mut compositor, _) = compositor();
        let store = VisualStore::new();
        let mut target = Recorder::default();

        let stats = compositor.render(&store, &mut target).unwrap();
        assert_eq!(stats, RenderStats::default());
        assert!(target.ops.is_empty());
    }

    #[test]
    fn nested_opacity_accumulates() {
        let (mut compositor, _) = compositor();
        let mut store = VisualStore::new();
        let root = store.create_visual();
        let a = store.create_visual();
        let b = store.create_visual();
        store.add_child(root, a);
        store.add_child(a, b);
        store.set_opacity(a, 0.5);
        store.set_offset(a, Vector3::new(10.0, 0.0, 0.0));
        store.set_opacity(b, 0.5);
        store.set_offset(b, Vector3::new(0.0, 5.0, 0.0));
        store.set_content(b, Some(SurfaceId(1)));
        compositor.set_root(Some(root));

        let mut target = Recorder::default();
        compositor.render(&store, &mut target).unwrap();

        let draws = target.draws();
        assert_eq!(draws.len(), 1);
        let (surface, opacity, transform) = draws[0];
        assert_eq!(surface, SurfaceId(1));
        assert!((opacity - 0.25).abs() < 1e-6, "opacity was {opacity}");
        let expected = compose(
            compose(Affine::IDENTITY, &store.transform_props(a)),
            &store.transform_props(b),
        );
        assert_affine_eq(transform, expected);
        assert_eq!(transform.translation(), Vec2::new(10.0, 5.0));

        assert_eq!(compositor.opacity_depth(), 0);
        assert_eq!(compositor.current_opacity(), 1.0);
        assert!(target.saved.is_empty(), "target state must be balanced");
    }

    #[test]
    fn invisible_subtree_draws_nothing() {
        let (mut compositor, _) = compositor();
        let mut store = VisualStore::new();
        let root = store.create_visual();
        let container = store.create_visual();
        let leaf = store.create_visual();
        store.add_child(root, container);
        store.add_child(container, leaf);
        store.set_visible(container, false);
        store.set_content(leaf, Some(SurfaceId(9)));
        compositor.set_root(Some(root));

        let mut target = Recorder::default();
        let stats = compositor.render(&store, &mut target).unwrap();
        assert!(target.ops.is_empty(), "hidden subtree must not touch the target");
        assert_eq!(stats.visited, 1, "descendants of a hidden visual are not visited");
        assert_eq!(stats.skipped, 1);
        assert_eq!(compositor.opacity_depth(), 0);
    }

    #[test]
    fn zero_opacity_skips_subtree() {
        let (mut compositor, _) = compositor();
        let mut store = VisualStore::new();
        let root = store.create_visual();
        let container = store.create_visual();
        let leaf = store.create_visual();
        store.add_child(root, container);
        store.add_child(container, leaf);
        store.set_opacity(container, 0.0);
        store.set_content(leaf, Some(SurfaceId(9)));
        compositor.set_root(Some(root));

        let mut target = Recorder::default();
        compositor.render(&store, &mut target).unwrap();
        assert!(target.draws().is_empty());
    }

    #[test]
    fn siblings_draw_in_paint_order_with_fresh_state() {
        let (mut compositor, _) = compositor();
        let mut store = VisualStore::new();
        let root = store.create_visual();
        let first = store.create_visual();
        let second = store.create_visual();
        store.add_child(root, first);
        store.add_child(root, second);
        store.set_content(first, Some(SurfaceId(1)));
        store.set_opacity(first, 0.5);
        store.set_offset(first, Vector3::new(100.0, 0.0, 0.0));
        store.set_content(second, Some(SurfaceId(2)));
        compositor.set_root(Some(root));

        let mut target = Recorder::default();
        compositor.render(&store, &mut target).unwrap();

        let draws = target.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].0, SurfaceId(1));
        assert_eq!(draws[1].0, SurfaceId(2));
        // Nothing from the first sibling leaks into the second.
        assert_eq!(draws[1].1, 1.0);
        assert_affine_eq(draws[1].2, Affine::IDENTITY);
    }

    #[test]
    fn root_fields_are_ignored() {
        let (mut compositor, _) = compositor();
        let mut store = VisualStore::new();
        let root = store.create_visual();
        let leaf = store.create_visual();
        store.add_child(root, leaf);
        store.set_opacity(root, 0.5);
        store.set_offset(root, Vector3::new(7.0, 7.0, 0.0));
        store.set_content(root, Some(SurfaceId(0)));
        store.set_content(leaf, Some(SurfaceId(1)));
        compositor.set_root(Some(root));

        let mut target = Recorder::default();
        compositor.render(&store, &mut target).unwrap();
        assert_eq!(target.draws(), [(SurfaceId(1), 1.0, Affine::IDENTITY)]);
    }

    #[test]
    fn elevated_visual_opens_shadow_layer() {
        let (mut compositor, _) = compositor();
        let mut store = VisualStore::new();
        let root = store.create_visual();
        let card = store.create_visual();
        store.add_child(root, card);
        store.set_offset(card, Vector3::new(0.0, 0.0, 20.0));
        store.set_content(card, Some(SurfaceId(3)));
        compositor.set_root(Some(root));

        let mut target = Recorder::default();
        let stats = compositor.render(&store, &mut target).unwrap();
        assert_eq!(stats.shadows, 1);
        assert_eq!(
            target.ops.first(),
            Some(&Op::SaveLayer(ShadowParameters::from_elevation(20.0)))
        );
        assert_eq!(target.ops.last(), Some(&Op::Restore));
        assert_eq!(target.count(&Op::Save), 0);
    }

    #[test]
    fn clip_is_applied_after_transform() {
        let (mut compositor, _) = compositor();
        let mut store = VisualStore::new();
        let root = store.create_visual();
        let clipped = store.create_visual();
        store.add_child(root, clipped);
        store.set_offset(clipped, Vector3::new(3.0, 4.0, 0.0));
        store.set_clip(
            clipped,
            Some(ClipShape::Inset(InsetClip::new(10.0, 10.0, 5.0, 5.0))),
        );
        compositor.set_root(Some(root));

        let mut target = Recorder::default();
        let stats = compositor.render(&store, &mut target).unwrap();
        assert_eq!(stats.clips, 1);
        assert_eq!(
            target.ops,
            [
                Op::Save,
                Op::SetTransform(Affine::translate((3.0, 4.0))),
                Op::ClipRect(Rect::new(4.0, 9.0, 6.0, 11.0)),
                Op::Restore,
            ]
        );
    }

    #[test]
    fn clip_failure_aborts_frame_and_unwinds() {
        let (mut compositor, _) = compositor();
        let mut store = VisualStore::new();
        let root = store.create_visual();
        let outer = store.create_visual();
        let bad = store.create_visual();
        let inner = store.create_visual();
        let later = store.create_visual();
        store.add_child(root, outer);
        store.add_child(outer, bad);
        store.add_child(bad, inner);
        store.add_child(root, later);
        store.set_opacity(outer, 0.5);
        store.set_offset(outer, Vector3::new(0.0, 0.0, 4.0));
        store.set_clip(
            bad,
            Some(ClipShape::Geometric(GeometricClip {
                geometry: Some(Geometry::Rectangle(Rect::new(0.0, 0.0, 1.0, 1.0))),
            })),
        );
        store.set_content(inner, Some(SurfaceId(1)));
        store.set_content(later, Some(SurfaceId(2)));
        compositor.set_root(Some(root));

        let mut target = Recorder::default();
        let err = compositor.render(&store, &mut target).unwrap_err();
        assert_eq!(err.visual(), bad);
        assert!(
            core::error::Error::source(&err).is_some(),
            "clip error should be chained"
        );

        assert!(target.draws().is_empty(), "frame must abort at the bad clip");
        assert!(target.saved.is_empty(), "every save must be restored");
        assert_eq!(target.max_depth, 2);
        assert_eq!(compositor.opacity_depth(), 0);
        assert_eq!(compositor.current_opacity(), 1.0);

        // Fixing the clip lets the next frame render normally.
        store.set_clip(bad, None);
        let mut target = Recorder::default();
        let stats = compositor.render(&store, &mut target).unwrap();
        assert_eq!(stats.drawn, 2);
    }

    #[test]
    fn path_clip_is_used() {
        let (mut compositor, _) = compositor();
        let mut store = VisualStore::new();
        let root = store.create_visual();
        let clipped = store.create_visual();
        store.add_child(root, clipped);
        let mut path = BezPath::new();
        path.move_to(Point::ORIGIN);
        path.line_to((4.0, 0.0));
        path.line_to((0.0, 4.0));
        path.close_path();
        store.set_clip(
            clipped,
            Some(ClipShape::Geometric(GeometricClip {
                geometry: Some(Geometry::Path(crate::visual::PathGeometry::new(path))),
            })),
        );
        compositor.set_root(Some(root));

        let mut target = Recorder::default();
        compositor.render(&store, &mut target).unwrap();
        assert_eq!(target.count(&Op::ClipPath), 1);
    }

    #[test]
    fn render_clears_dirty_flag() {
        let (mut compositor, requests) = compositor();
        let mut store = VisualStore::new();
        store.set_invalidator(Some(compositor.invalidator().clone()));
        let root = store.create_visual();
        compositor.set_root(Some(root));
        assert!(compositor.is_dirty());
        assert_eq!(requests.load(Ordering::Relaxed), 1);

        compositor.render(&store, &mut Recorder::default()).unwrap();
        assert!(!compositor.is_dirty());
        assert_eq!(compositor.frame_index(), 1);

        store.set_opacity(root, 0.5);
        assert!(!compositor.invalidate_render(), "already dirty");
        assert_eq!(requests.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn transform_order_matches_hand_computed_points() {
        let props = VisualTransform {
            offset: Vector3::new(10.0, 20.0, 0.0),
            anchor_point: Vec2::new(5.0, 5.0),
            rotation_degrees: 90.0,
            ..VisualTransform::default()
        };
        let transform = compose(Affine::IDENTITY, &props);
        let p = transform * Point::new(1.0, 0.0);
        // (1, 0) rotates to (0, 1), then shifts by anchor and offset.
        assert!((p - Point::new(15.0, 26.0)).hypot() < 1e-9, "{p:?}");
    }

    #[cfg(feature = "trace")]
    #[test]
    fn traced_render_reports_skips_and_shadows() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct RecordingSink {
            begins: Vec<bool>,
            skips: Vec<(VisualId, SkipReason)>,
            shadows: Vec<VisualId>,
            ends: Vec<(RenderStats, bool)>,
        }
        impl TraceSink for RecordingSink {
            fn on_render_begin(&mut self, e: &RenderBeginEvent) {
                self.begins.push(e.was_dirty);
            }
            fn on_render_end(&mut self, e: &RenderEndEvent) {
                self.ends.push((e.stats, e.failed));
            }
            fn on_visual_skip(&mut self, e: &VisualSkipEvent) {
                self.skips.push((e.visual, e.reason));
            }
            fn on_shadow_layer(&mut self, e: &ShadowLayerEvent) {
                self.shadows.push(e.visual);
            }
        }

        let (mut compositor, _) = compositor();
        let mut store = VisualStore::new();
        let root = store.create_visual();
        let hidden = store.create_visual();
        let clear = store.create_visual();
        let raised = store.create_visual();
        store.add_child(root, hidden);
        store.add_child(root, clear);
        store.add_child(root, raised);
        store.set_visible(hidden, false);
        store.set_opacity(clear, 0.0);
        store.set_offset(raised, Vector3::new(0.0, 0.0, 8.0));
        compositor.set_root(Some(root));

        let mut sink = RecordingSink::default();
        let mut tracer = Tracer::new(&mut sink);
        compositor
            .render_traced(&store, &mut Recorder::default(), &mut tracer)
            .unwrap();
        drop(tracer);

        assert_eq!(sink.begins, [true]);
        assert_eq!(
            sink.skips,
            [(hidden, SkipReason::Hidden), (clear, SkipReason::Transparent)]
        );
        assert_eq!(sink.shadows, [raised]);
        let (stats, failed) = sink.ends[0];
        assert!(!failed);
        assert_eq!(stats.visited, 3);
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.shadows, 1);
    }
}

// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for render targets and frame scheduling.
//!
//! The compositor never draws pixels or runs a frame loop itself. Hosts
//! provide two pieces:
//!
//! - **Render target** — Implements [`RenderTarget`], a canvas-like surface
//!   with a save/restore state stack, an active transform, clip
//!   intersection, drop-shadow layers, and leaf content drawing.
//!
//! - **Frame requests** — Implements [`FrameRequester`] so that
//!   [`Invalidator`](crate::invalidate::Invalidator) can ask the host render
//!   loop for a future frame. The host eventually calls
//!   [`Compositor::render`](crate::compositor::Compositor::render).
//!
//! [`TargetScope`] wraps a render target in a guard that restores the saved
//! state when dropped, so transform, clip, and shadow layers opened for a
//! visual are undone on every exit path.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(canvas: &mut Canvas) {
//!     // Producers have already mutated the store; the invalidator
//!     // requested this frame on the first mutation.
//!     if let Err(err) = compositor.render(&store, canvas) {
//!         report(err);
//!     }
//!     present(canvas);
//! }
//! ```

use core::ops::{Deref, DerefMut};

use kurbo::{Affine, BezPath, Rect};

use crate::shadow::ShadowParameters;
use crate::visual::SurfaceId;

/// A 2D drawing surface with canvas-style state management.
///
/// The state covered by [`save`](Self::save)/[`restore`](Self::restore) is
/// the active transform and the clip region. Clips always intersect with the
/// current region; there is no way to widen it except by restoring.
pub trait RenderTarget {
    /// Pushes the current transform and clip onto the state stack.
    fn save(&mut self);

    /// Like [`save`](Self::save), but also opens an offscreen layer that is
    /// composited with a drop shadow when the matching
    /// [`restore`](Self::restore) runs.
    fn save_layer_with_shadow(&mut self, shadow: &ShadowParameters);

    /// Pops the state pushed by the most recent `save` or
    /// `save_layer_with_shadow`, compositing the layer if there is one.
    fn restore(&mut self);

    /// Returns the active transform.
    fn transform(&self) -> Affine;

    /// Replaces the active transform.
    fn set_transform(&mut self, transform: Affine);

    /// Intersects the clip region with `rect` in the active transform's
    /// local space.
    fn clip_rect(&mut self, rect: Rect, antialias: bool);

    /// Intersects the clip region with `path` in the active transform's
    /// local space.
    fn clip_path(&mut self, path: &BezPath, antialias: bool);

    /// Draws the content of `surface` with the given accumulated opacity,
    /// under the active transform and clip.
    fn draw_surface(&mut self, surface: SurfaceId, opacity: f32);
}

/// Asks the host render loop for a future frame.
///
/// Called from whichever thread invalidated the compositor, so
/// implementations must be thread-safe. Closures implement this trait
/// directly.
pub trait FrameRequester: Send + Sync {
    /// Schedules one call to the compositor's render entry point.
    fn request_frame(&self);
}

impl<F> FrameRequester for F
where
    F: Fn() + Send + Sync,
{
    fn request_frame(&self) {
        self();
    }
}

/// A saved render-target state that is restored on drop.
///
/// Dereferences to the wrapped target, so drawing and nested scopes go
/// through the guard.
pub struct TargetScope<'a, T: RenderTarget + ?Sized> {
    target: &'a mut T,
}

impl<'a, T: RenderTarget + ?Sized> TargetScope<'a, T> {
    /// Saves the target state.
    pub fn save(target: &'a mut T) -> Self {
        target.save();
        Self { target }
    }

    /// Saves the target state and opens a drop-shadow layer.
    pub fn save_layer_with_shadow(target: &'a mut T, shadow: &ShadowParameters) -> Self {
        target.save_layer_with_shadow(shadow);
        Self { target }
    }
}

impl<T: RenderTarget + ?Sized> core::fmt::Debug for TargetScope<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TargetScope").finish_non_exhaustive()
    }
}

impl<T: RenderTarget + ?Sized> Deref for TargetScope<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: RenderTarget + ?Sized> DerefMut for TargetScope<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: RenderTarget + ?Sized> Drop for TargetScope<'_, T> {
    fn drop(&mut self) {
        self.target.restore();
    }
}

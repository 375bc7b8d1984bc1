// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual and surface identity types.

use core::fmt;

/// Sentinel value indicating "no visual" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a visual in a [`VisualStore`](super::VisualStore).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a visual is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl VisualId {
    /// Returns the raw slot index (for diagnostics and `*_at` accessors).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for VisualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VisualId({}@gen{})", self.idx, self.generation)
    }
}

impl fmt::Display for VisualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.idx)
    }
}

/// An opaque reference to drawable leaf content.
///
/// Surfaces (brush fills, images, text runs) are created and managed by the
/// host. A visual with `Some(SurfaceId)` content is a drawable visual that
/// draws that surface before its children; `None` marks a container.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({})", self.0)
    }
}

// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draining per-visual change channels.
//!
//! Rendering never consults these: the compositor walks the whole tree each
//! frame. Tracking is opt-in through
//! [`set_change_tracking`](super::VisualStore::set_change_tracking).
//! [`VisualChanges`] exists for diagnostics and for backends that
//! keep their own retained state (e.g. a GPU layer cache) and want to patch
//! only what moved.
//!
//! Indices are raw slot indices (`u32`) rather than [`VisualId`] handles so
//! that consumers can read the store through the `*_at()` accessors (e.g.
//! [`opacity_at`](super::VisualStore::opacity_at)) without generation checks.
//!
//! [`VisualId`]: super::VisualId

use alloc::vec::Vec;

use super::store::VisualStore;
use crate::dirty;

/// Visuals that changed since the previous [`VisualStore::take_changes`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisualChanges {
    /// Visuals whose accumulated transform may differ, including
    /// descendants of a changed visual.
    pub transforms: Vec<u32>,
    /// Visuals whose accumulated opacity or visibility may differ, including
    /// descendants of a changed visual.
    pub opacities: Vec<u32>,
    /// Visuals whose clip changed.
    pub clips: Vec<u32>,
    /// Visuals whose leaf content changed.
    pub content: Vec<u32>,
    /// Visuals created since the last drain.
    pub added: Vec<u32>,
    /// Visuals destroyed since the last drain.
    pub removed: Vec<u32>,
    /// Whether any child list changed.
    pub topology_changed: bool,
}

impl VisualChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.transforms.clear();
        self.opacities.clear();
        self.clips.clear();
        self.content.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
            && self.opacities.is_empty()
            && self.clips.is_empty()
            && self.content.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl VisualStore {
    /// Drains every change channel and returns what changed.
    pub fn take_changes(&mut self) -> VisualChanges {
        let mut changes = VisualChanges::default();
        self.take_changes_into(&mut changes);
        changes
    }

    /// Like [`take_changes`](Self::take_changes), but reuses a
    /// caller-provided buffer.
    pub fn take_changes_into(&mut self, changes: &mut VisualChanges) {
        changes.clear();

        // Destroyed slots may still be reachable through propagation that
        // happened before they were freed; report live visuals only.
        let alive = &self.alive;

        changes.transforms.extend(
            self.dirty
                .drain(dirty::TRANSFORM)
                .affected()
                .deterministic()
                .run()
                .filter(|&idx| alive[idx as usize]),
        );
        changes.opacities.extend(
            self.dirty
                .drain(dirty::OPACITY)
                .affected()
                .deterministic()
                .run()
                .filter(|&idx| alive[idx as usize]),
        );
        changes.clips.extend(
            self.dirty
                .drain(dirty::CLIP)
                .deterministic()
                .run()
                .filter(|&idx| alive[idx as usize]),
        );
        changes.content.extend(
            self.dirty
                .drain(dirty::CONTENT)
                .deterministic()
                .run()
                .filter(|&idx| alive[idx as usize]),
        );

        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology_changed = !topology.is_empty();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }
}

// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays visual storage with allocation, topology, and property management.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};
use understory_dirty::{Channel, CycleHandling, DirtyTracker, EagerPolicy};

use super::changes::VisualChanges;
use super::clip::ClipShape;
use super::id::{INVALID, SurfaceId, VisualId};
use super::traverse::Children;
use crate::dirty;
use crate::invalidate::Invalidator;
use crate::transform::{Transform3d, Vector3, VisualTransform};

/// Struct-of-arrays storage for all visuals.
///
/// Visuals are addressed by [`VisualId`] handles. Internally, each visual
/// occupies a slot in parallel arrays. Destroyed visuals are recycled via a
/// free list, and generation counters prevent stale handle access.
///
/// Only local properties are stored. Accumulated transform and opacity are
/// recomputed by the compositor on every frame and never cached here.
///
/// Change tracking is off by default. Hosts that consume
/// [`take_changes`](Self::take_changes) turn it on with
/// [`set_change_tracking`](Self::set_change_tracking) and must drain
/// regularly, since pending changes accumulate until drained.
#[derive(Debug)]
pub struct VisualStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties --
    pub(crate) offset: Vec<Vector3>,
    pub(crate) anchor_point: Vec<Vec2>,
    pub(crate) center_point: Vec<Point>,
    pub(crate) rotation_degrees: Vec<f64>,
    pub(crate) transform_matrix: Vec<Transform3d>,
    pub(crate) opacity: Vec<f32>,
    pub(crate) visible: Vec<bool>,
    pub(crate) clip: Vec<Option<ClipShape>>,
    pub(crate) content: Vec<Option<SurfaceId>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Change tracking --
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
    track_changes: bool,
    invalidator: Option<Invalidator>,
}

impl Default for VisualStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualStore {
    /// Creates an empty visual store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            offset: Vec::new(),
            anchor_point: Vec::new(),
            center_point: Vec::new(),
            rotation_degrees: Vec::new(),
            transform_matrix: Vec::new(),
            opacity: Vec::new(),
            visible: Vec::new(),
            clip: Vec::new(),
            content: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            track_changes: false,
            invalidator: None,
        }
    }

    /// Connects the store to a compositor's frame-dirty flag.
    ///
    /// Every subsequent mutation (property change, topology change, create,
    /// destroy) calls [`Invalidator::invalidate`], so producers never have
    /// to request frames by hand. Pass `None` to disconnect.
    pub fn set_invalidator(&mut self, invalidator: Option<Invalidator>) {
        self.invalidator = invalidator;
    }

    /// Returns the connected frame-dirty flag, if any.
    #[must_use]
    pub fn invalidator(&self) -> Option<&Invalidator> {
        self.invalidator.as_ref()
    }

    /// Turns per-visual change tracking on or off.
    ///
    /// While off, mutations record nothing for
    /// [`take_changes`](Self::take_changes). Turning tracking off discards
    /// any changes still pending.
    pub fn set_change_tracking(&mut self, enabled: bool) {
        if self.track_changes && !enabled {
            let mut discarded = VisualChanges::default();
            self.take_changes_into(&mut discarded);
        }
        self.track_changes = enabled;
    }

    /// Returns whether per-visual change tracking is on.
    #[must_use]
    pub fn is_tracking_changes(&self) -> bool {
        self.track_changes
    }

    /// Returns the number of live visuals.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Allocation API --

    /// Creates a new visual and returns its handle.
    ///
    /// The visual starts with zero offset, anchor, and center point, no
    /// rotation, an identity matrix, full opacity, visible, no clip, no
    /// content, and no parent.
    pub fn create_visual(&mut self) -> VisualId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.offset[i] = Vector3::ZERO;
            self.anchor_point[i] = Vec2::ZERO;
            self.center_point[i] = Point::ORIGIN;
            self.rotation_degrees[i] = 0.0;
            self.transform_matrix[i] = Transform3d::IDENTITY;
            self.opacity[i] = 1.0;
            self.visible[i] = true;
            self.clip[i] = None;
            self.content[i] = None;
            self.alive[i] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.offset.push(Vector3::ZERO);
            self.anchor_point.push(Vec2::ZERO);
            self.center_point.push(Point::ORIGIN);
            self.rotation_degrees.push(0.0);
            self.transform_matrix.push(Transform3d::IDENTITY);
            self.opacity.push(1.0);
            self.visible.push(true);
            self.clip.push(None);
            self.content.push(None);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };

        if self.track_changes {
            self.pending_added.push(idx);
        }
        self.mark(idx, dirty::TOPOLOGY);
        self.notify();

        VisualId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a visual, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the visual has children (remove them first) or if the
    /// handle is stale.
    pub fn destroy_visual(&mut self, id: VisualId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy visual with children"
        );

        if self.parent[idx as usize] != INVALID {
            let p = self.parent[idx as usize];
            self.unlink_from_parent(idx);
            self.mark(p, dirty::TOPOLOGY);
        }

        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        // Drop the clip's path storage now rather than on slot reuse.
        self.clip[idx as usize] = None;
        self.alive[idx as usize] = false;

        self.free_list.push(idx);
        if self.track_changes {
            self.pending_removed.push(idx);
        }
        self.mark(idx, dirty::TOPOLOGY);
        self.notify();
    }

    /// Returns whether the given handle refers to a live visual.
    #[must_use]
    pub fn is_alive(&self, id: VisualId) -> bool {
        let i = id.idx as usize;
        id.idx < self.len && self.alive[i] && self.generation[i] == id.generation
    }

    // -- Topology API --

    /// Adds `child` as the last (topmost) child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` already has a parent, or
    /// if `parent` is `child` itself or one of its descendants.
    pub fn add_child(&mut self, parent: VisualId, child: VisualId) {
        self.validate(parent);
        self.validate(child);
        assert!(
            self.parent[child.idx as usize] == INVALID,
            "child already has a parent"
        );
        assert!(
            !self.is_ancestor_or_self(child.idx, parent.idx),
            "cannot add a visual under itself or its descendant"
        );
        self.link_last(parent.idx, child.idx);
        self.notify();
    }

    /// Removes `child` from its current parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the visual has no parent.
    pub fn remove_from_parent(&mut self, child: VisualId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "visual has no parent");

        self.detach(c);
        self.notify();
    }

    /// Moves `child` to be the last child of `new_parent`.
    ///
    /// If `child` already has a parent, it is removed first.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `new_parent` is `child`
    /// itself or one of its descendants.
    pub fn reparent(&mut self, child: VisualId, new_parent: VisualId) {
        self.validate(child);
        self.validate(new_parent);
        assert!(
            !self.is_ancestor_or_self(child.idx, new_parent.idx),
            "cannot reparent a visual under itself or its descendant"
        );

        if self.parent[child.idx as usize] != INVALID {
            self.detach(child.idx);
        }
        self.link_last(new_parent.idx, child.idx);
        self.notify();
    }

    /// Inserts `child` before `sibling` in the sibling list, so it paints
    /// underneath `sibling`.
    ///
    /// `child` must not already have a parent. `sibling` must have a parent.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, `sibling`
    /// has no parent, or `sibling` is a descendant of `child`.
    pub fn insert_before(&mut self, child: VisualId, sibling: VisualId) {
        self.validate(child);
        self.validate(sibling);
        let c = child.idx;
        let s = sibling.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");
        assert!(
            !self.is_ancestor_or_self(c, p),
            "cannot insert a visual under itself or its descendant"
        );

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `sibling` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        self.attach_dependencies(c, p);
        self.notify();
    }

    /// Returns the parent of a visual, if any.
    #[must_use]
    pub fn parent(&self, id: VisualId) -> Option<VisualId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| VisualId {
            idx: p,
            generation: self.generation[p as usize],
        })
    }

    /// Returns an iterator over the direct children of a visual, back to
    /// front.
    #[must_use]
    pub fn children(&self, id: VisualId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the live visuals that have no parent.
    #[must_use]
    pub fn roots(&self) -> Vec<VisualId> {
        (0..self.len)
            .filter(|&idx| self.alive[idx as usize] && self.parent[idx as usize] == INVALID)
            .map(|idx| VisualId {
                idx,
                generation: self.generation[idx as usize],
            })
            .collect()
    }

    // -- Property getters (read-only) --

    /// Returns the offset of a visual from its parent.
    #[must_use]
    pub fn offset(&self, id: VisualId) -> Vector3 {
        self.validate(id);
        self.offset[id.idx as usize]
    }

    /// Returns the anchor point translation.
    #[must_use]
    pub fn anchor_point(&self, id: VisualId) -> Vec2 {
        self.validate(id);
        self.anchor_point[id.idx as usize]
    }

    /// Returns the rotation pivot.
    #[must_use]
    pub fn center_point(&self, id: VisualId) -> Point {
        self.validate(id);
        self.center_point[id.idx as usize]
    }

    /// Returns the rotation angle in degrees.
    #[must_use]
    pub fn rotation_degrees(&self, id: VisualId) -> f64 {
        self.validate(id);
        self.rotation_degrees[id.idx as usize]
    }

    /// Returns the explicit transform matrix.
    #[must_use]
    pub fn transform_matrix(&self, id: VisualId) -> Transform3d {
        self.validate(id);
        self.transform_matrix[id.idx as usize]
    }

    /// Returns the local opacity.
    #[must_use]
    pub fn opacity(&self, id: VisualId) -> f32 {
        self.validate(id);
        self.opacity[id.idx as usize]
    }

    /// Returns whether the visual is visible.
    #[must_use]
    pub fn is_visible(&self, id: VisualId) -> bool {
        self.validate(id);
        self.visible[id.idx as usize]
    }

    /// Returns the clip shape, if any.
    #[must_use]
    pub fn clip(&self, id: VisualId) -> Option<&ClipShape> {
        self.validate(id);
        self.clip[id.idx as usize].as_ref()
    }

    /// Returns the leaf content, if any.
    #[must_use]
    pub fn content(&self, id: VisualId) -> Option<SurfaceId> {
        self.validate(id);
        self.content[id.idx as usize]
    }

    /// Returns all transform-related fields of a visual at once.
    #[must_use]
    pub fn transform_props(&self, id: VisualId) -> VisualTransform {
        self.validate(id);
        self.transform_props_at(id.idx)
    }

    // -- Mutation API (marks dirty, invalidates) --

    /// Sets the offset from the parent.
    ///
    /// The `z` component is elevation: any positive value gives the visual a
    /// drop shadow.
    pub fn set_offset(&mut self, id: VisualId, offset: Vector3) {
        self.validate(id);
        self.offset[id.idx as usize] = offset;
        self.mark_transform(id.idx);
    }

    /// Sets the anchor point translation.
    pub fn set_anchor_point(&mut self, id: VisualId, anchor_point: Vec2) {
        self.validate(id);
        self.anchor_point[id.idx as usize] = anchor_point;
        self.mark_transform(id.idx);
    }

    /// Sets the rotation pivot.
    pub fn set_center_point(&mut self, id: VisualId, center_point: Point) {
        self.validate(id);
        self.center_point[id.idx as usize] = center_point;
        self.mark_transform(id.idx);
    }

    /// Sets the rotation angle in degrees.
    pub fn set_rotation_degrees(&mut self, id: VisualId, degrees: f64) {
        self.validate(id);
        self.rotation_degrees[id.idx as usize] = degrees;
        self.mark_transform(id.idx);
    }

    /// Sets the explicit transform matrix.
    pub fn set_transform_matrix(&mut self, id: VisualId, matrix: Transform3d) {
        self.validate(id);
        self.transform_matrix[id.idx as usize] = matrix;
        self.mark_transform(id.idx);
    }

    /// Sets the local opacity.
    ///
    /// Values are expected in `[0, 1]`; they are not clamped. Exactly `0.0`
    /// removes the visual and its subtree from the output.
    pub fn set_opacity(&mut self, id: VisualId, opacity: f32) {
        self.validate(id);
        self.opacity[id.idx as usize] = opacity;
        self.mark_opacity(id.idx);
    }

    /// Shows or hides the visual and its subtree.
    pub fn set_visible(&mut self, id: VisualId, visible: bool) {
        self.validate(id);
        self.visible[id.idx as usize] = visible;
        self.mark_opacity(id.idx);
    }

    /// Sets the clip shape.
    pub fn set_clip(&mut self, id: VisualId, clip: Option<ClipShape>) {
        self.validate(id);
        self.clip[id.idx as usize] = clip;
        self.mark(id.idx, dirty::CLIP);
        self.notify();
    }

    /// Sets the leaf content. `None` makes the visual a pure container.
    pub fn set_content(&mut self, id: VisualId, content: Option<SurfaceId>) {
        self.validate(id);
        self.content[id.idx as usize] = content;
        self.mark(id.idx, dirty::CONTENT);
        self.notify();
    }

    // -- Raw-index accessors --
    //
    // These accept raw slot indices (as found in `VisualChanges`) rather than
    // `VisualId` handles, skipping generation validation.

    /// Returns the transform-related fields at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn transform_props_at(&self, idx: u32) -> VisualTransform {
        self.check_slot(idx);
        let i = idx as usize;
        VisualTransform {
            offset: self.offset[i],
            anchor_point: self.anchor_point[i],
            center_point: self.center_point[i],
            rotation_degrees: self.rotation_degrees[i],
            matrix: self.transform_matrix[i],
        }
    }

    /// Returns the local opacity at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn opacity_at(&self, idx: u32) -> f32 {
        self.check_slot(idx);
        self.opacity[idx as usize]
    }

    /// Returns the visibility at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn is_visible_at(&self, idx: u32) -> bool {
        self.check_slot(idx);
        self.visible[idx as usize]
    }

    /// Returns the clip shape at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn clip_at(&self, idx: u32) -> Option<&ClipShape> {
        self.check_slot(idx);
        self.clip[idx as usize].as_ref()
    }

    /// Returns the leaf content at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn content_at(&self, idx: u32) -> Option<SurfaceId> {
        self.check_slot(idx);
        self.content[idx as usize]
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: VisualId) {
        // Destroy bumps the generation, so freed slots fail this check too.
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale VisualId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn check_slot(&self, idx: u32) {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
    }

    fn notify(&self) {
        if let Some(invalidator) = &self.invalidator {
            invalidator.invalidate();
        }
    }

    fn mark(&mut self, idx: u32, channel: Channel) {
        if self.track_changes {
            self.dirty.mark(idx, channel);
        }
    }

    fn mark_eager(&mut self, idx: u32, channel: Channel) {
        if self.track_changes {
            self.dirty.mark_with(idx, channel, &EagerPolicy);
        }
    }

    fn mark_transform(&mut self, idx: u32) {
        self.mark_eager(idx, dirty::TRANSFORM);
        self.notify();
    }

    fn mark_opacity(&mut self, idx: u32) {
        self.mark_eager(idx, dirty::OPACITY);
        self.notify();
    }

    /// Appends `c` to `p`'s child list.
    fn link_last(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        self.attach_dependencies(c, p);
    }

    /// Child depends on parent for the inherited channels.
    fn attach_dependencies(&mut self, c: u32, p: u32) {
        let _ = self.dirty.add_dependency(c, p, dirty::TRANSFORM);
        let _ = self.dirty.add_dependency(c, p, dirty::OPACITY);
        self.mark_subtree_inherited_dirty(c);
        self.mark(p, dirty::TOPOLOGY);
    }

    /// Unlinks `c` from its parent and drops the inherited dependencies.
    fn detach(&mut self, c: u32) {
        let p = self.parent[c as usize];
        self.unlink_from_parent(c);
        self.dirty.remove_dependency(c, p, dirty::TRANSFORM);
        self.dirty.remove_dependency(c, p, dirty::OPACITY);
        self.mark_subtree_inherited_dirty(c);
        self.mark(p, dirty::TOPOLOGY);
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    fn mark_subtree_inherited_dirty(&mut self, idx: u32) {
        self.mark_eager(idx, dirty::TRANSFORM);
        self.mark_eager(idx, dirty::OPACITY);
    }

    fn is_ancestor_or_self(&self, ancestor: u32, mut idx: u32) -> bool {
        while idx != INVALID {
            if idx == ancestor {
                return true;
            }
            idx = self.parent[idx as usize];
        }
        false
    }
}

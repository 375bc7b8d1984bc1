// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child iteration.

use super::id::{INVALID, VisualId};
use super::store::VisualStore;

/// Iterator over the direct children of a visual, in paint order
/// (back to front).
///
/// Returned by [`VisualStore::children`].
#[derive(Clone, Debug)]
pub struct Children<'a> {
    store: &'a VisualStore,
    next: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a VisualStore, first: u32) -> Self {
        Self { store, next: first }
    }
}

impl Iterator for Children<'_> {
    type Item = VisualId;

    fn next(&mut self) -> Option<VisualId> {
        if self.next == INVALID {
            return None;
        }
        let idx = self.next;
        self.next = self.store.next_sibling[idx as usize];
        Some(VisualId {
            idx,
            generation: self.store.generation[idx as usize],
        })
    }
}

impl core::iter::FusedIterator for Children<'_> {}

// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame-dirty flag.
//!
//! An [`Invalidator`] holds a single atomic "a frame has been requested but
//! not yet rendered" bit plus the host's [`FrameRequester`]. Any thread may
//! call [`invalidate`](Invalidator::invalidate); only the call that flips
//! the bit from clean to dirty requests a frame, so at most one request is
//! outstanding per dirty period. The compositor clears the bit at the start
//! of each render.
//!
//! Handles are cheap to clone and share the same flag.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::backend::FrameRequester;

struct Shared {
    dirty: AtomicBool,
    requester: Box<dyn FrameRequester>,
}

/// Shared handle to a compositor's frame-dirty flag.
#[derive(Clone)]
pub struct Invalidator {
    shared: Arc<Shared>,
}

impl fmt::Debug for Invalidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invalidator")
            .field("dirty", &self.is_dirty())
            .finish_non_exhaustive()
    }
}

impl Invalidator {
    /// Creates a clean flag that reports to `requester`.
    pub fn new(requester: impl FrameRequester + 'static) -> Self {
        Self {
            shared: Arc::new(Shared {
                dirty: AtomicBool::new(false),
                requester: Box::new(requester),
            }),
        }
    }

    /// Marks the frame dirty.
    ///
    /// Requests a frame from the host and returns `true` only on the
    /// clean-to-dirty transition; otherwise does nothing and returns `false`.
    pub fn invalidate(&self) -> bool {
        let transitioned = self
            .shared
            .dirty
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if transitioned {
            self.shared.requester.request_frame();
        }
        transitioned
    }

    /// Returns whether a frame has been requested but not yet rendered.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.shared.dirty.load(Ordering::Acquire)
    }

    /// Clears the flag, returning whether it was set.
    pub(crate) fn clear(&self) -> bool {
        self.shared.dirty.swap(false, Ordering::AcqRel)
    }

    /// Returns `true` if both handles share the same flag.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped multiplicative opacity.
//!
//! [`OpacityStack`] tracks the accumulated opacity along the current
//! traversal path. [`push`](OpacityStack::push) multiplies the accumulated
//! value and returns an [`OpacityScope`] guard; dropping the guard restores
//! the previous value, so the stack stays balanced on every exit path,
//! including early returns and `?` propagation.

use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

/// Accumulated opacity with scoped push/pop.
#[derive(Clone, Debug)]
pub struct OpacityStack {
    saved: Vec<f32>,
    current: f32,
}

impl Default for OpacityStack {
    fn default() -> Self {
        Self::new()
    }
}

impl OpacityStack {
    /// Creates an empty stack with an accumulated opacity of `1.0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            saved: Vec::new(),
            current: 1.0,
        }
    }

    /// Returns the accumulated opacity.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Returns the number of open scopes.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Returns `true` if no scope is open.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    /// Multiplies the accumulated opacity by `opacity` until the returned
    /// scope is dropped.
    #[must_use = "the opacity is restored as soon as the scope is dropped"]
    pub fn push(&mut self, opacity: f32) -> OpacityScope<'_> {
        self.saved.push(self.current);
        self.current *= opacity;
        OpacityScope { stack: self }
    }

    fn pop(&mut self) {
        let previous = self.saved.pop();
        debug_assert!(previous.is_some(), "opacity stack underflow");
        self.current = previous.unwrap_or(1.0);
    }
}

/// Guard returned by [`OpacityStack::push`].
///
/// Dereferences to the stack so nested scopes can be opened through it.
#[derive(Debug)]
pub struct OpacityScope<'a> {
    stack: &'a mut OpacityStack,
}

impl Deref for OpacityScope<'_> {
    type Target = OpacityStack;

    fn deref(&self) -> &OpacityStack {
        self.stack
    }
}

impl DerefMut for OpacityScope<'_> {
    fn deref_mut(&mut self) -> &mut OpacityStack {
        self.stack
    }
}

impl Drop for OpacityScope<'_> {
    fn drop(&mut self) {
        self.stack.pop();
    }
}

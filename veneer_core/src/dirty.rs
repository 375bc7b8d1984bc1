// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-visual change channels.
//!
//! Besides the single frame-dirty bit (see [`invalidate`](crate::invalidate)),
//! the visual store records *which* visuals changed since the last drain,
//! using multi-channel dirty tracking from [`understory_dirty`]. The
//! compositor does not need this to render (it re-traverses the whole tree
//! every frame), but diagnostics and incremental backends do.
//!
//! # Propagation semantics
//!
//! - **Propagating** — [`TRANSFORM`] and [`OPACITY`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and have dependency
//!   edges from child to parent, because a visual's accumulated transform
//!   and opacity depend on its ancestors. Visibility changes are routed
//!   through [`OPACITY`]: hiding a visual removes its whole subtree from the
//!   output just as zero opacity does.
//!
//! - **Local-only** — [`CLIP`] and [`CONTENT`] are marked with the default
//!   policy.
//!
//! - **Structural** — [`TOPOLOGY`] is marked on create/destroy and on child
//!   list changes. It does not propagate.
//!
//! # Consumption
//!
//! [`VisualStore::take_changes`](crate::visual::VisualStore::take_changes)
//! drains all channels into a [`VisualChanges`](crate::visual::VisualChanges).
//! Nothing is marked until tracking is turned on with
//! [`set_change_tracking`](crate::visual::VisualStore::set_change_tracking).

use understory_dirty::Channel;

/// Offset, anchor point, center point, rotation, or matrix changed.
pub const TRANSFORM: Channel = Channel::new(0);

/// Opacity or visibility changed.
pub const OPACITY: Channel = Channel::new(1);

/// Clip changed.
pub const CLIP: Channel = Channel::new(2);

/// Leaf content changed.
pub const CONTENT: Channel = Channel::new(3);

/// Tree topology changed.
pub const TOPOLOGY: Channel = Channel::new(4);

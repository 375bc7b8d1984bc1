// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual tree data model.
//!
//! A *visual* is a node in the retained scene graph. Each visual has:
//!
//! - An identity ([`VisualId`]) — a generational handle that becomes stale
//!   when the visual is destroyed.
//! - Topology — parent, first-child, and sibling links forming an ordered
//!   tree. Sibling order is paint order: earlier children are drawn first
//!   and end up underneath later ones.
//! - **Local properties** set by the producer:
//!   [`offset`](VisualStore::set_offset) (whose `z` is elevation),
//!   [`anchor_point`](VisualStore::set_anchor_point),
//!   [`center_point`](VisualStore::set_center_point),
//!   [`rotation_degrees`](VisualStore::set_rotation_degrees),
//!   [`transform_matrix`](VisualStore::set_transform_matrix),
//!   [`opacity`](VisualStore::set_opacity),
//!   [`visible`](VisualStore::set_visible), [`clip`](VisualStore::set_clip),
//!   and [`content`](VisualStore::set_content).
//!
//! A visual with content is a *drawable*; one without is a *container*.
//!
//! # Change tracking
//!
//! With change tracking on, mutations mark the matching
//! [`dirty`](crate::dirty) channel. If a frame-dirty flag is connected via
//! [`set_invalidator`](VisualStore::set_invalidator), they also invalidate it.
//! [`VisualStore::take_changes`] drains the channels.

mod changes;
mod clip;
mod id;
mod store;
mod traverse;

pub use changes::VisualChanges;
pub use clip::{
    ClipShape, GeometricClip, Geometry, GeometryKind, InsetClip, PathGeometry,
    UnsupportedClipSource,
};
pub use id::{INVALID, SurfaceId, VisualId};
pub use store::VisualStore;
pub use traverse::Children;

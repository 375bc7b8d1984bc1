// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display-list render target for veneer.
//!
//! This crate provides a [`RenderTarget`](veneer_core::backend::RenderTarget)
//! that records what [`veneer_core`]'s compositor draws instead of
//! rasterizing it. A backend replays the list; tests and tools inspect it.
//! It defines:
//!
//! - [`DisplayList`] — the recording target
//! - [`DisplayOp`] — shadow-layer push/pop and content draws, back to front
//! - [`DrawItem`] — one draw with its device transform, opacity, and clips
//! - [`ClipItem`] — one clip with the transform it was applied under

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod plan;

pub use plan::{ClipGeometry, ClipItem, DisplayList, DisplayOp, DrawItem};

// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained visual tree and per-frame compositor traversal.
//!
//! `veneer_core` owns the scene graph data model and the algorithm that turns
//! it into draw calls on a 2D render target once per frame. It is `no_std`
//! compatible (with `alloc`) and stores visuals in struct-of-arrays layout
//! addressed by generational index handles.
//!
//! # Architecture
//!
//! ```text
//!   Producer (control framework)
//!       │  set_offset / set_opacity / add_child ...
//!       ▼
//!   VisualStore ──► Invalidator::invalidate() ──► FrameRequester::request_frame()
//!       │                                               │
//!       │                 ┌─────────────────────────────┘
//!       ▼                 ▼
//!   Compositor::render(&store, &mut target)
//!       │  save / save_layer ─ set_transform ─ clip ─ draw_surface ─ restore
//!       ▼
//!   RenderTarget (canvas)
//! ```
//!
//! **[`visual`]** — Struct-of-arrays visual tree with generational handles.
//! Local properties (offset, anchor point, rotation, matrix, opacity,
//! visibility, clip, content) are set by the producer; nothing global is
//! cached, accumulated values exist only during a render pass.
//!
//! **[`compositor`]** — The pre-order traversal that composes transform,
//! clip, and opacity per visual and draws leaf content in paint order.
//!
//! **[`transform`]** — The 4×4 matrix type carried by visuals and the
//! transform composer that folds a visual's fields into its parent's
//! accumulated 2D transform.
//!
//! **[`shadow`]** — Drop-shadow parameters derived from elevation.
//!
//! **[`opacity`]** — Scoped multiplicative opacity stack.
//!
//! **[`invalidate`]** — The one-bit frame-dirty flag and frame requests.
//!
//! **[`dirty`]** — Per-visual change channels via `understory_dirty`.
//!
//! **[`backend`]** — The [`RenderTarget`](backend::RenderTarget) and
//! [`FrameRequester`](backend::FrameRequester) contracts hosts implement.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! render instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-visual
//!   change and per-draw events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod compositor;
pub mod dirty;
pub mod invalidate;
pub mod opacity;
pub mod shadow;
pub mod trace;
pub mod transform;
pub mod visual;

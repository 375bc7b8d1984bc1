// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated host loop that exercises the compositor and the tracing pipeline.
//!
//! Builds a small visual tree, animates it for a few frames, and renders each
//! requested frame into a [`DisplayList`], sending trace events to both a
//! [`PrettyPrintSink`] on stdout and a [`JsonLinesSink`] writing
//! `trace.jsonl`. One frame deliberately uses an unsupported clip to show
//! error reporting and recovery.

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kurbo::{BezPath, Ellipse, Point, Vec2};
use veneer_core::compositor::Compositor;
use veneer_core::trace::{
    DrawEvent, RenderBeginEvent, RenderEndEvent, ShadowLayerEvent, TraceSink, Tracer,
    VisualChange, VisualSkipEvent,
};
use veneer_core::transform::{Transform3d, Vector3};
use veneer_core::visual::{
    ClipShape, GeometricClip, Geometry, InsetClip, PathGeometry, SurfaceId, VisualId, VisualStore,
};
use veneer_debug::json::JsonLinesSink;
use veneer_debug::pretty::PrettyPrintSink;
use veneer_render::DisplayList;

const FRAME_COUNT: u32 = 8;
/// Frame on which the card gets a clip the compositor cannot apply.
const BROKEN_CLIP_FRAME: u32 = 4;

struct Scene {
    root: VisualId,
    card: VisualId,
    badge: VisualId,
    overlay: VisualId,
}

fn main() {
    // -- host ---------------------------------------------------------------
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&requests);
    let mut compositor = Compositor::new(move || {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    let mut store = VisualStore::new();
    store.set_invalidator(Some(compositor.invalidator().clone()));
    store.set_change_tracking(true);
    assert!(
        store
            .invalidator()
            .is_some_and(|flag| flag.ptr_eq(compositor.invalidator())),
        "store must share the compositor's frame-dirty flag"
    );
    let scene = build_scene(&mut store);
    compositor.set_root(Some(scene.root));

    // -- sinks --------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(std::io::stdout());
    let file = File::create("trace.jsonl").expect("failed to create trace.jsonl");
    let mut json = JsonLinesSink::new(BufWriter::new(file));

    // -- simulated loop -----------------------------------------------------
    let mut list = DisplayList::new();
    let mut rendered = 0;
    for frame in 0..FRAME_COUNT {
        animate(&mut store, &scene, frame);
        if !compositor.is_dirty() {
            println!("-- frame {frame}: clean, nothing to render");
            continue;
        }

        let changes = store.take_changes();
        list.clear();

        let mut tee = Tee(&mut pretty, &mut json);
        let mut tracer = Tracer::new(&mut tee);
        tracer.visual_changes(compositor.frame_index(), &changes.to_trace_records());
        match compositor.render_traced(&store, &mut list, &mut tracer) {
            Ok(_) => {
                rendered += 1;
                let draws = list.draws().count();
                println!(
                    "-- frame {frame}: {draws} draws, {} shadow layers, balanced={}",
                    list.layer_count(),
                    list.is_balanced(),
                );
            }
            Err(err) => {
                println!("-- frame {frame}: render failed: {err}");
                assert!(list.is_balanced(), "failed frame left target unbalanced");
            }
        }
    }

    // A producer on another thread can request a frame too.
    let handle = compositor.invalidator().clone();
    let requested = std::thread::spawn(move || handle.invalidate())
        .join()
        .expect("producer thread panicked");
    println!("-- cross-thread invalidate requested a frame: {requested}");

    json.finish().expect("failed to write trace.jsonl");
    println!(
        "Wrote trace.jsonl ({rendered} frames rendered, {} frame requests)",
        requests.load(Ordering::Relaxed)
    );
}

/// root
/// ├── background (surface 1)
/// ├── card (surface 2, inset clip, elevated)
/// │   └── badge (surface 3, rotated about its center)
/// └── overlay (surface 4, placed by an explicit matrix, hidden on odd
///     animation steps)
fn build_scene(store: &mut VisualStore) -> Scene {
    let root = store.create_visual();
    let background = store.create_visual();
    let card = store.create_visual();
    let badge = store.create_visual();
    let overlay = store.create_visual();

    store.add_child(root, background);
    store.add_child(root, card);
    store.add_child(card, badge);
    store.add_child(root, overlay);

    store.set_content(background, Some(SurfaceId(1)));

    store.set_offset(card, Vector3::new(40.0, 30.0, 8.0));
    store.set_clip(
        card,
        Some(ClipShape::Inset(InsetClip::new(0.0, 120.0, 0.0, 200.0))),
    );
    store.set_content(card, Some(SurfaceId(2)));

    store.set_offset(badge, Vector3::new(170.0, 10.0, 0.0));
    store.set_center_point(badge, Point::new(8.0, 8.0));
    store.set_opacity(badge, 0.75);
    store.set_clip(
        badge,
        Some(ClipShape::Geometric(GeometricClip {
            geometry: Some(Geometry::Path(PathGeometry::new(badge_path()))),
        })),
    );
    store.set_content(badge, Some(SurfaceId(3)));

    store.set_opacity(overlay, 0.5);
    store.set_transform_matrix(overlay, overlay_matrix(0));
    store.set_content(overlay, Some(SurfaceId(4)));

    Scene {
        root,
        card,
        badge,
        overlay,
    }
}

/// Scales the overlay up around a slowly turning axis, shifted into place.
fn overlay_matrix(step: u32) -> Transform3d {
    let angle = (5.0 * f64::from(step)).to_radians();
    Transform3d::from_translation(20.0, 180.0, 0.0)
        * Transform3d::from_rotation_z(angle)
        * Transform3d::from_scale(1.25, 0.8, 1.0)
}

fn badge_path() -> BezPath {
    let mut path = BezPath::new();
    path.move_to((8.0, 0.0));
    path.line_to((16.0, 8.0));
    path.line_to((8.0, 16.0));
    path.line_to((0.0, 8.0));
    path.close_path();
    path
}

/// Mutates the scene on even frames only, so odd frames stay clean.
fn animate(store: &mut VisualStore, scene: &Scene, frame: u32) {
    if frame % 2 == 1 {
        return;
    }
    let step = frame / 2;

    let elevation = 8.0 + 60.0 * f64::from(step);
    let offset = store.offset(scene.card);
    store.set_offset(scene.card, Vector3::new(offset.x, offset.y, elevation));
    store.set_anchor_point(scene.card, Vec2::new(0.0, -2.0 * elevation / 60.0));

    let rotation = store.rotation_degrees(scene.badge);
    store.set_rotation_degrees(scene.badge, rotation + 15.0);

    store.set_visible(scene.overlay, step % 2 == 0);
    store.set_transform_matrix(scene.overlay, overlay_matrix(step));

    if frame == BROKEN_CLIP_FRAME {
        store.set_clip(
            scene.card,
            Some(ClipShape::Geometric(GeometricClip {
                geometry: Some(Geometry::Ellipse(Ellipse::new(
                    Point::new(100.0, 60.0),
                    (100.0, 60.0),
                    0.0,
                ))),
            })),
        );
    } else {
        store.set_clip(
            scene.card,
            Some(ClipShape::Inset(InsetClip::new(0.0, 120.0, 0.0, 200.0))),
        );
    }
}

/// Forwards every event to two sinks.
struct Tee<'a, A: TraceSink, B: TraceSink>(&'a mut A, &'a mut B);

impl<A: TraceSink, B: TraceSink> TraceSink for Tee<'_, A, B> {
    fn on_render_begin(&mut self, e: &RenderBeginEvent) {
        self.0.on_render_begin(e);
        self.1.on_render_begin(e);
    }

    fn on_render_end(&mut self, e: &RenderEndEvent) {
        self.0.on_render_end(e);
        self.1.on_render_end(e);
    }

    fn on_visual_skip(&mut self, e: &VisualSkipEvent) {
        self.0.on_visual_skip(e);
        self.1.on_visual_skip(e);
    }

    fn on_shadow_layer(&mut self, e: &ShadowLayerEvent) {
        self.0.on_shadow_layer(e);
        self.1.on_shadow_layer(e);
    }

    fn on_visual_changes(&mut self, frame_index: u64, changes: &[VisualChange]) {
        self.0.on_visual_changes(frame_index, changes);
        self.1.on_visual_changes(frame_index, changes);
    }

    fn on_draw(&mut self, e: &DrawEvent) {
        self.0.on_draw(e);
        self.1.on_draw(e);
    }
}

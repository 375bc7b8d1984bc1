// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip shapes and the clip applicator.

use core::fmt;

use kurbo::{BezPath, Ellipse, Rect};

use crate::backend::RenderTarget;

/// A shape that restricts a visual's content and descendants.
#[derive(Clone, Debug, PartialEq)]
pub enum ClipShape {
    /// An axis-aligned rectangle given by its edges.
    Inset(InsetClip),
    /// An arbitrary geometry.
    Geometric(GeometricClip),
}

/// Rectangle clip given by the positions of its four edges in the visual's
/// local space.
///
/// The rectangle actually applied is one unit larger on every side (see
/// [`effective_rect`](Self::effective_rect)), which keeps adjacent visuals
/// that share an edge from showing a hairline seam.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InsetClip {
    /// Top edge.
    pub top: f64,
    /// Bottom edge.
    pub bottom: f64,
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
}

impl InsetClip {
    /// Creates an inset clip from its edges.
    #[must_use]
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Returns the rectangle intersected into the clip region.
    #[must_use]
    pub fn effective_rect(&self) -> Rect {
        Rect::new(
            self.left - 1.0,
            self.top - 1.0,
            self.right + 1.0,
            self.bottom + 1.0,
        )
    }
}

/// Clip by a composition geometry.
///
/// A missing geometry means "no effective clip".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometricClip {
    /// The clipping geometry.
    pub geometry: Option<Geometry>,
}

/// A composition geometry.
///
/// Only [`Geometry::Path`] with a path source can be used as a clip; the
/// other kinds exist in the composition model but have no renderable path
/// and are rejected with [`UnsupportedClipSource`].
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// A path geometry.
    Path(PathGeometry),
    /// A rectangle geometry.
    Rectangle(Rect),
    /// An ellipse geometry.
    Ellipse(Ellipse),
}

impl Geometry {
    /// Returns which kind of geometry this is.
    #[must_use]
    pub const fn kind(&self) -> GeometryKind {
        match self {
            Self::Path(_) => GeometryKind::Path,
            Self::Rectangle(_) => GeometryKind::Rectangle,
            Self::Ellipse(_) => GeometryKind::Ellipse,
        }
    }
}

/// A path geometry whose source may not have been set yet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathGeometry {
    /// The renderable path.
    pub source: Option<BezPath>,
}

impl PathGeometry {
    /// Creates a path geometry from a path.
    #[must_use]
    pub fn new(path: BezPath) -> Self {
        Self { source: Some(path) }
    }
}

/// Discriminant of [`Geometry`], used in errors and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// [`Geometry::Path`].
    Path,
    /// [`Geometry::Rectangle`].
    Rectangle,
    /// [`Geometry::Ellipse`].
    Ellipse,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Path => "path",
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
        })
    }
}

/// A geometric clip references geometry without a renderable path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnsupportedClipSource {
    /// The offending geometry kind.
    pub kind: GeometryKind,
}

impl fmt::Display for UnsupportedClipSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            GeometryKind::Path => {
                f.write_str("clipping with a path geometry that has no source is not supported")
            }
            kind => write!(f, "clipping with {kind} geometry is not supported"),
        }
    }
}

impl core::error::Error for UnsupportedClipSource {}

impl ClipShape {
    /// Intersects this clip into the target's clip region.
    ///
    /// The target must already carry the visual's transform. Nothing is
    /// undone here; callers apply clips inside a
    /// [`TargetScope`](crate::backend::TargetScope).
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedClipSource`] for a geometric clip whose geometry
    /// has no renderable path. The target is left untouched in that case.
    pub fn apply<T: RenderTarget + ?Sized>(
        &self,
        target: &mut T,
    ) -> Result<(), UnsupportedClipSource> {
        match self {
            Self::Inset(inset) => target.clip_rect(inset.effective_rect(), true),
            Self::Geometric(GeometricClip { geometry: None }) => {}
            Self::Geometric(GeometricClip {
                geometry: Some(geometry),
            }) => match geometry {
                Geometry::Path(PathGeometry { source: Some(path) }) => {
                    target.clip_path(path, true);
                }
                other => {
                    return Err(UnsupportedClipSource { kind: other.kind() });
                }
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use kurbo::{Affine, Point};

    use super::*;
    use crate::shadow::ShadowParameters;
    use crate::visual::SurfaceId;

    #[derive(Debug, PartialEq)]
    enum Op {
        Rect(Rect, bool),
        Path(BezPath, bool),
    }

    #[derive(Default)]
    struct ClipLog {
        ops: Vec<Op>,
    }

    impl RenderTarget for ClipLog {
        fn save(&mut self) {}
        fn save_layer_with_shadow(&mut self, _: &ShadowParameters) {}
        fn restore(&mut self) {}
        fn transform(&self) -> Affine {
            Affine::IDENTITY
        }
        fn set_transform(&mut self, _: Affine) {}
        fn clip_rect(&mut self, rect: Rect, antialias: bool) {
            self.ops.push(Op::Rect(rect, antialias));
        }
        fn clip_path(&mut self, path: &BezPath, antialias: bool) {
            self.ops.push(Op::Path(path.clone(), antialias));
        }
        fn draw_surface(&mut self, _: SurfaceId, _: f32) {}
    }

    fn triangle() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((0.0, 10.0));
        path.close_path();
        path
    }

    #[test]
    fn inset_clip_is_expanded_by_one_unit() {
        let mut target = ClipLog::default();
        let clip = ClipShape::Inset(InsetClip::new(10.0, 10.0, 5.0, 5.0));
        clip.apply(&mut target).unwrap();
        assert_eq!(
            target.ops,
            [Op::Rect(Rect::new(4.0, 9.0, 6.0, 11.0), true)],
            "inset clip should grow by one unit on each side, antialiased"
        );
    }

    #[test]
    fn path_clip_is_antialiased() {
        let mut target = ClipLog::default();
        let clip = ClipShape::Geometric(GeometricClip {
            geometry: Some(Geometry::Path(PathGeometry::new(triangle()))),
        });
        clip.apply(&mut target).unwrap();
        assert_eq!(target.ops, [Op::Path(triangle(), true)]);
    }

    #[test]
    fn null_geometry_is_a_no_op() {
        let mut target = ClipLog::default();
        let clip = ClipShape::Geometric(GeometricClip::default());
        assert_eq!(clip.apply(&mut target), Ok(()));
        assert!(target.ops.is_empty(), "null geometry must not clip");
    }

    #[test]
    fn path_without_source_is_unsupported() {
        let mut target = ClipLog::default();
        let clip = ClipShape::Geometric(GeometricClip {
            geometry: Some(Geometry::Path(PathGeometry::default())),
        });
        assert_eq!(
            clip.apply(&mut target),
            Err(UnsupportedClipSource {
                kind: GeometryKind::Path
            })
        );
        assert!(target.ops.is_empty(), "failed clip must not touch the target");
    }

    #[test]
    fn non_path_geometry_is_unsupported() {
        let mut target = ClipLog::default();
        let clip = ClipShape::Geometric(GeometricClip {
            geometry: Some(Geometry::Ellipse(Ellipse::new(Point::ORIGIN, (4.0, 2.0), 0.0))),
        });
        let err = clip.apply(&mut target).unwrap_err();
        assert_eq!(err.kind, GeometryKind::Ellipse);
        assert_eq!(
            err.to_string(),
            "clipping with ellipse geometry is not supported"
        );
    }
}

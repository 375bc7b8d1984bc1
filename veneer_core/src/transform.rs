// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual transforms and the transform composer.
//!
//! Visuals carry an explicit [`Transform3d`] alongside their offset, anchor
//! point, and rotation. The render target works in 2D, so [`compose`] folds
//! all of them into a single [`kurbo::Affine`] on top of the parent's
//! accumulated transform.
//!
//! # Composition order
//!
//! Each step is pre-concatenated onto the running matrix:
//!
//! 1. the parent's accumulated transform,
//! 2. translate by `offset.xy`,
//! 3. translate by the anchor point,
//! 4. rotate about the center point (skipped when the angle is zero),
//! 5. the explicit matrix (skipped when it is the identity).
//!
//! Rotation therefore pivots in anchor-adjusted space, and the explicit
//! matrix operates in the visual's already anchored and rotated local space.

use core::ops::Mul;

use kurbo::{Affine, Point, Vec2};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A three-component vector.
///
/// Used for visual offsets, where `z` is the elevation that drives the drop
/// shadow rather than a real depth.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
    /// Depth component (elevation).
    pub z: f64,
}

impl Vector3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a vector from its components.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the `(x, y)` part as a 2D vector.
    #[inline]
    #[must_use]
    pub const fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A column-major 4×4 affine transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix. Only the 2D part
/// (columns 0, 1 and the translation column, rows x and y) survives
/// [`to_affine`](Self::to_affine); depth and perspective terms are dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a transform from four column arrays.
    #[inline]
    #[must_use]
    pub const fn from_cols(col0: [f64; 4], col1: [f64; 4], col2: [f64; 4], col3: [f64; 4]) -> Self {
        Self {
            cols: [col0, col1, col2, col3],
        }
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a non-uniform scale transform.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Z axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_z(radians: f64) -> Self {
        #[cfg(feature = "std")]
        let (s, c) = radians.sin_cos();
        #[cfg(not(feature = "std"))]
        let (s, c) = (radians.sin(), radians.cos());
        Self {
            cols: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Returns `true` if this is exactly the identity matrix.
    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Projects the matrix onto the 2D plane.
    #[inline]
    #[must_use]
    pub const fn to_affine(self) -> Affine {
        let c = &self.cols;
        Affine::new([c[0][0], c[0][1], c[1][0], c[1][1], c[3][0], c[3][1]])
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        let mut j = 0;
        while j < 4 {
            let mut i = 0;
            while i < 4 {
                out[j][i] =
                    a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
                i += 1;
            }
            j += 1;
        }
        Self { cols: out }
    }
}

/// The transform-related fields of a single visual.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VisualTransform {
    /// Offset from the parent; `z` is ignored here.
    pub offset: Vector3,
    /// Translation applied after the offset and before rotation.
    pub anchor_point: Vec2,
    /// Pivot for the rotation, in anchor-adjusted local space.
    pub center_point: Point,
    /// Clockwise rotation in degrees (y-down coordinates).
    pub rotation_degrees: f64,
    /// Explicit matrix applied last.
    pub matrix: Transform3d,
}

/// Composes a visual's local transform onto its parent's accumulated one.
///
/// See the [module documentation](self) for the order of operations.
#[must_use]
pub fn compose(parent: Affine, local: &VisualTransform) -> Affine {
    let mut transform = parent
        * Affine::translate(local.offset.xy())
        * Affine::translate(local.anchor_point);

    if local.rotation_degrees != 0.0 {
        transform *= Affine::rotate_about(local.rotation_degrees.to_radians(), local.center_point);
    }

    if !local.matrix.is_identity() {
        transform *= local.matrix.to_affine();
    }

    transform
}

// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop-shadow parameters derived from elevation.
//!
//! A visual whose `offset.z` is positive is drawn into a layer with a drop
//! shadow filter. The filter parameters come from a deliberately simple
//! heuristic tuned to resemble elevation shadows of the reference model:
//! higher visuals cast softer, lower, slightly fainter shadows.
//!
//! The output must match the reference numbers exactly, including the
//! discontinuity just above [`SHADOW_OFFSET_MAX`]: at or below the maximum
//! the alpha is interpolated from the elevation, above it the alpha snaps to
//! [`SHADOW_ALPHA_FALLBACK`] and the elevation is clamped for the remaining
//! terms.

/// Elevation at which the shadow stops growing.
pub const SHADOW_OFFSET_MAX: f32 = 150.0;

/// Alpha used for elevations above [`SHADOW_OFFSET_MAX`].
pub const SHADOW_ALPHA_FALLBACK: u8 = 150;

/// Alpha decrease per unit of elevation (as a fraction of full opacity).
pub const ALPHA_MODIFIER: f32 = 1.0 / 650.0;

/// Horizontal blur per unit of elevation.
pub const SIGMA_X_MODIFIER: f32 = 1.0 / 5.0;

/// Vertical blur per unit of elevation.
pub const SIGMA_Y_MODIFIER: f32 = 1.0 / 3.5;

/// Shadow color before the computed alpha is applied (`#ACACAC`).
pub const SHADOW_BASE_COLOR: Rgba8 = Rgba8::new(0xAC, 0xAC, 0xAC, 0xFF);

/// An 8-bit-per-channel, non-premultiplied RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Creates a color from its channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the same color with a different alpha.
    #[inline]
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Filter parameters for a drop shadow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowParameters {
    /// Horizontal shadow offset (always zero).
    pub dx: f32,
    /// Vertical shadow offset.
    pub dy: f32,
    /// Horizontal Gaussian blur standard deviation.
    pub sigma_x: f32,
    /// Vertical Gaussian blur standard deviation.
    pub sigma_y: f32,
    /// Shadow color including the computed alpha.
    pub color: Rgba8,
}

impl ShadowParameters {
    /// Computes shadow parameters for a visual at elevation `offset_z`.
    ///
    /// Only meaningful for `offset_z > 0`; the compositor does not open a
    /// shadow layer otherwise.
    #[must_use]
    pub fn from_elevation(offset_z: f32) -> Self {
        let (alpha, z) = if offset_z <= SHADOW_OFFSET_MAX {
            (round_alpha((1.0 - offset_z * ALPHA_MODIFIER) * 255.0), offset_z)
        } else {
            (SHADOW_ALPHA_FALLBACK, SHADOW_OFFSET_MAX)
        };

        Self {
            dx: 0.0,
            dy: z / 2.0 - z * SIGMA_Y_MODIFIER,
            sigma_x: z * SIGMA_X_MODIFIER,
            sigma_y: z * SIGMA_Y_MODIFIER,
            color: SHADOW_BASE_COLOR.with_alpha(alpha),
        }
    }

    /// Returns the shadow alpha.
    #[inline]
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.color.a
    }
}

/// Rounds a non-negative value in `0.0..=255.0` to the nearest byte.
#[expect(
    clippy::cast_possible_truncation,
    reason = "callers pass values in 0..=255; half-up rounding of a positive value"
)]
fn round_alpha(value: f32) -> u8 {
    (value + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn alpha_at_max_offset_is_interpolated() {
        let params = ShadowParameters::from_elevation(150.0);
        // round((1 - 150/650) * 255) = round(196.15...) = 196
        assert_eq!(params.alpha(), 196);
    }

    #[test]
    fn alpha_above_max_offset_falls_back() {
        let params = ShadowParameters::from_elevation(151.0);
        assert_eq!(params.alpha(), SHADOW_ALPHA_FALLBACK);
    }

    #[test]
    fn alpha_rounds_to_nearest() {
        // (1 - 1/650) * 255 = 254.607... rounds up.
        assert_eq!(ShadowParameters::from_elevation(1.0).alpha(), 255);
        // (1 - 13/650) * 255 = 249.9 rounds up.
        assert_eq!(ShadowParameters::from_elevation(13.0).alpha(), 250);
        // (1 - 100/650) * 255 = 215.769... rounds up.
        assert_eq!(ShadowParameters::from_elevation(100.0).alpha(), 216);
    }

    #[test]
    fn geometry_is_clamped_above_max_offset() {
        let at_max = ShadowParameters::from_elevation(150.0);
        let far_above = ShadowParameters::from_elevation(10_000.0);
        let just_above = ShadowParameters::from_elevation(151.0);

        assert_eq!(at_max.dy, far_above.dy);
        assert_eq!(at_max.sigma_x, far_above.sigma_x);
        assert_eq!(at_max.sigma_y, far_above.sigma_y);
        assert_eq!(just_above.dy, at_max.dy);
    }

    #[test]
    fn geometry_matches_reference_formulas() {
        let params = ShadowParameters::from_elevation(35.0);
        assert_eq!(params.dx, 0.0);
        // 35/2 - 35/3.5 = 17.5 - 10 = 7.5
        assert!(close(params.dy, 7.5), "dy = {}", params.dy);
        assert!(close(params.sigma_x, 7.0), "sigma_x = {}", params.sigma_x);
        assert!(close(params.sigma_y, 10.0), "sigma_y = {}", params.sigma_y);
    }

    #[test]
    fn max_offset_geometry() {
        let params = ShadowParameters::from_elevation(150.0);
        assert!(close(params.sigma_x, 30.0), "sigma_x = {}", params.sigma_x);
        assert!(
            close(params.sigma_y, 150.0 / 3.5),
            "sigma_y = {}",
            params.sigma_y
        );
        assert!(
            close(params.dy, 75.0 - 150.0 / 3.5),
            "dy = {}",
            params.dy
        );
    }

    #[test]
    fn color_keeps_base_channels() {
        let params = ShadowParameters::from_elevation(10.0);
        assert_eq!(params.color.r, 0xAC);
        assert_eq!(params.color.g, 0xAC);
        assert_eq!(params.color.b, 0xAC);
    }

    #[test]
    fn alpha_is_monotonic_up_to_max() {
        let mut previous = u8::MAX;
        for z in 1..=150_u8 {
            let alpha = ShadowParameters::from_elevation(f32::from(z)).alpha();
            assert!(alpha <= previous, "alpha increased at z = {z}");
            previous = alpha;
        }
    }
}

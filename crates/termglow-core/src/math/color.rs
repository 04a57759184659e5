// Copyright 2025 the termglow developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A linear-space RGBA color type.
//!
//! The scene palette is authored as sRGB hex strings (the colors the original
//! web page used) and converted to linear space here, so lighting math happens
//! in the correct color space and the surface's sRGB format converts back on
//! present.

/// Converts a single normalized sRGB channel to linear space.
#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// A color in linear RGB space with an alpha channel.
#[derive(Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct LinearRgba {
    /// The red channel, linear, typically in `[0, 1]`.
    pub r: f32,
    /// The green channel, linear, typically in `[0, 1]`.
    pub g: f32,
    /// The blue channel, linear, typically in `[0, 1]`.
    pub b: f32,
    /// The alpha channel. `1.0` is fully opaque.
    pub a: f32,
}

impl LinearRgba {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Creates a new color from linear components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque color from linear components.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a `LinearRgba` from an sRGB hex string (`#RRGGBB` or `#RRGGBBAA`).
    ///
    /// The RGB channels are gamma corrected to linear space. Alpha is
    /// normalized but not gamma corrected. Malformed digits decode as zero.
    #[inline]
    pub fn from_hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .unwrap_or(0) as f32
                / 255.0
        };
        let a = if hex.len() > 6 { channel(6..8) } else { 1.0 };
        Self {
            r: srgb_to_linear(channel(0..2)),
            g: srgb_to_linear(channel(2..4)),
            b: srgb_to_linear(channel(4..6)),
            a,
        }
    }

    /// Returns a new color with every channel scaled by `factor`, alpha kept.
    ///
    /// Used for light/emissive intensity scaling.
    #[inline]
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }

    /// Converts to an array, handy for passing to GPU-facing structs.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_from_hex_primaries() {
        let white = LinearRgba::from_hex("#ffffff");
        assert!(approx_eq(white.r, 1.0));
        assert!(approx_eq(white.g, 1.0));
        assert!(approx_eq(white.b, 1.0));
        assert!(approx_eq(white.a, 1.0));

        let black = LinearRgba::from_hex("#000000");
        assert!(approx_eq(black.r, 0.0));
    }

    #[test]
    fn test_from_hex_is_gamma_corrected() {
        // Mid-gray in sRGB is darker than 0.5 in linear space.
        let gray = LinearRgba::from_hex("#808080");
        assert!(gray.r < 0.5);
        assert!(gray.r > 0.1);
    }

    #[test]
    fn test_from_hex_malformed_decodes_as_zero() {
        let c = LinearRgba::from_hex("#zz0000");
        assert!(approx_eq(c.r, 0.0));
    }

    #[test]
    fn test_scaled_keeps_alpha() {
        let c = LinearRgba::new(0.2, 0.4, 0.6, 0.8).scaled(0.5);
        assert!(approx_eq(c.r, 0.1));
        assert!(approx_eq(c.a, 0.8));
    }
}

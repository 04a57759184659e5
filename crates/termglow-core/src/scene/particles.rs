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

//! The particle state bank: a fixed-size registry of decorative particles.
//!
//! Particles carry no state beyond their index. Position, scale, and color
//! are recomputed from `(index, elapsed_seconds)` every frame and never
//! accumulated, so the swarm is trivially restartable and reproducible for a
//! given elapsed time.

use crate::math::{LinearRgba, Vec3};

/// Number of particles the scene ships with.
pub const DEFAULT_PARTICLE_COUNT: usize = 20;

/// Per-axis spread radii of the swarm, in scene units.
pub const SPREAD_RADII: Vec3 = Vec3::new(3.0, 2.0, 1.0);

/// Baseline uniform scale of a particle.
pub const BASE_SCALE: f32 = 0.03;

/// Amplitude of the scale pulse. Chosen below [`BASE_SCALE`] so the scale
/// floor (`0.01`) stays strictly positive.
pub const SCALE_AMPLITUDE: f32 = 0.02;

/// Edge length of the particle cube mesh before scaling.
pub const PARTICLE_EXTENT: f32 = 0.05;

/// Self-illumination strength applied to every particle so the swarm stays
/// visible against the dark panel regardless of scene lighting.
pub const EMISSIVE_INTENSITY: f32 = 0.5;

/// The three fixed particle hues, selected by `index mod 3`.
const PALETTE_HEX: [&str; 3] = ["#00d4ff", "#a855f7", "#00ff88"];

/// The derived render state of one particle for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleInstance {
    /// World-space center of the particle.
    pub position: Vec3,
    /// Uniform scale factor, always strictly positive.
    pub scale: f32,
    /// Display color, also used as the emissive color.
    pub color: LinearRgba,
}

/// A fixed-count bank of particles, indexed `0..count`.
///
/// The count is fixed for the bank's lifetime; no particle is created or
/// destroyed after initialization.
#[derive(Debug, Clone)]
pub struct ParticleBank {
    count: usize,
    palette: [LinearRgba; 3],
}

impl ParticleBank {
    /// Creates a bank of `count` particles.
    pub fn new(count: usize) -> Self {
        let palette = [
            LinearRgba::from_hex(PALETTE_HEX[0]),
            LinearRgba::from_hex(PALETTE_HEX[1]),
            LinearRgba::from_hex(PALETTE_HEX[2]),
        ];
        Self { count, palette }
    }

    /// The number of particles in the bank.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// The color class (`0..3`) of the particle at `index`.
    #[inline]
    pub fn color_class(index: usize) -> usize {
        index % 3
    }

    /// The display color of the particle at `index`.
    #[inline]
    pub fn color_of(&self, index: usize) -> LinearRgba {
        self.palette[Self::color_class(index)]
    }

    /// Derives the render state of one particle at the given elapsed time.
    ///
    /// Pure in `(index, elapsed_seconds)`: the output is finite for any
    /// `t >= 0`, position components stay within [`SPREAD_RADII`], and scale
    /// stays within `[BASE_SCALE - SCALE_AMPLITUDE, BASE_SCALE + SCALE_AMPLITUDE]`.
    pub fn instance(&self, index: usize, elapsed_seconds: f32) -> ParticleInstance {
        let t = elapsed_seconds;
        let phase = index as f32;
        let position = Vec3::new(
            (0.5 * t + phase).sin() * SPREAD_RADII.x,
            (0.3 * t + phase).cos() * SPREAD_RADII.y,
            (0.7 * t + phase).sin() * SPREAD_RADII.z,
        );
        let scale = BASE_SCALE + SCALE_AMPLITUDE * (2.0 * t + phase).sin();

        ParticleInstance {
            position,
            scale,
            color: self.color_of(index),
        }
    }
}

impl Default for ParticleBank {
    fn default() -> Self {
        Self::new(DEFAULT_PARTICLE_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_default_count() {
        assert_eq!(ParticleBank::default().count(), 20);
    }

    #[test]
    fn test_particle_zero_at_time_zero() {
        let bank = ParticleBank::default();
        let p = bank.instance(0, 0.0);
        // sin(0)·Rx = 0, cos(0)·Ry = Ry, sin(0)·Rz = 0.
        assert!(approx_eq(p.position.x, 0.0));
        assert!(approx_eq(p.position.y, SPREAD_RADII.y));
        assert!(approx_eq(p.position.z, 0.0));
        assert!(approx_eq(p.scale, BASE_SCALE));
    }

    #[test]
    fn test_positions_stay_within_spread_radii() {
        let bank = ParticleBank::default();
        let mut t = 0.0;
        while t <= 100.0 {
            for index in 0..bank.count() {
                let p = bank.instance(index, t);
                assert!(p.position.is_finite());
                assert!(p.position.x.abs() <= SPREAD_RADII.x + f32::EPSILON);
                assert!(p.position.y.abs() <= SPREAD_RADII.y + f32::EPSILON);
                assert!(p.position.z.abs() <= SPREAD_RADII.z + f32::EPSILON);
            }
            t += 0.25;
        }
    }

    #[test]
    fn test_scale_bounded_and_strictly_positive() {
        let bank = ParticleBank::default();
        let mut t = 0.0;
        while t <= 100.0 {
            for index in 0..bank.count() {
                let scale = bank.instance(index, t).scale;
                assert!(scale > 0.0);
                assert!(scale >= BASE_SCALE - SCALE_AMPLITUDE - f32::EPSILON);
                assert!(scale <= BASE_SCALE + SCALE_AMPLITUDE + f32::EPSILON);
            }
            t += 0.25;
        }
    }

    #[test]
    fn test_instance_is_deterministic() {
        let bank = ParticleBank::default();
        for index in [0, 7, 19] {
            for t in [0.0, 1.5, 42.0] {
                assert_eq!(bank.instance(index, t), bank.instance(index, t));
            }
        }
    }

    #[test]
    fn test_color_classes_cycle_through_palette() {
        let bank = ParticleBank::default();
        assert_eq!(ParticleBank::color_class(0), 0);
        assert_eq!(ParticleBank::color_class(4), 1);
        assert_eq!(ParticleBank::color_class(5), 2);
        // Same class, same color.
        assert_eq!(bank.color_of(0), bank.color_of(3));
        assert_ne!(bank.color_of(0), bank.color_of(1));
    }
}

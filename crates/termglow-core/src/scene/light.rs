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

//! The scene's fixed lighting rig.
//!
//! Lighting never changes at runtime: one ambient term plus two point lights,
//! a white key light and a purple-tinted fill light on the opposite side.

use crate::math::{LinearRgba, Vec3};

/// A uniform ambient light applied to every surface regardless of position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// The color of the light in linear RGB space.
    pub color: LinearRgba,
    /// The intensity multiplier for the light.
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: LinearRgba::WHITE,
            intensity: 0.3,
        }
    }
}

/// A point light source that emits light in all directions from a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World-space position of the light.
    pub position: Vec3,
    /// The color of the light in linear RGB space.
    pub color: LinearRgba,
    /// The intensity multiplier for the light.
    pub intensity: f32,
}

/// The complete, fixed lighting setup of the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    /// The uniform ambient term.
    pub ambient: AmbientLight,
    /// The white key light above and in front of the scene.
    pub key: PointLight,
    /// The tinted fill light below and behind the scene.
    pub fill: PointLight,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: AmbientLight::default(),
            key: PointLight {
                position: Vec3::new(10.0, 10.0, 10.0),
                color: LinearRgba::WHITE,
                intensity: 1.0,
            },
            fill: PointLight {
                position: Vec3::new(-10.0, -10.0, -10.0),
                color: LinearRgba::from_hex("#a855f7"),
                intensity: 0.5,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_default_rig_matches_fixed_setup() {
        let rig = LightRig::default();
        assert!(approx_eq(rig.ambient.intensity, 0.3));
        assert_eq!(rig.key.position, Vec3::new(10.0, 10.0, 10.0));
        assert!(approx_eq(rig.key.intensity, 1.0));
        assert_eq!(rig.fill.position, Vec3::new(-10.0, -10.0, -10.0));
        assert!(approx_eq(rig.fill.intensity, 0.5));
    }

    #[test]
    fn test_fill_light_is_tinted() {
        let rig = LightRig::default();
        // The purple fill should carry more blue than green.
        assert!(rig.fill.color.b > rig.fill.color.g);
        assert_ne!(rig.fill.color, LinearRgba::WHITE);
    }
}

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

//! A rigid transform: translation, Euler rotation, and non-uniform scale.

use crate::math::{Mat4, Vec3};

/// The position, rotation, and scale applied to a renderable object for a
/// given frame.
///
/// Rotation is stored as Euler angles in radians and applied in X, then Y,
/// then Z order. The scene only ever yaws its objects, so this simple
/// representation is sufficient and keeps the per-frame math cheap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space translation.
    pub translation: Vec3,
    /// Euler rotation in radians, applied X → Y → Z.
    pub rotation: Vec3,
    /// Per-axis scale factors.
    pub scale: Vec3,
}

impl Transform {
    /// The identity transform: no translation, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Creates a transform with the given translation and no rotation or scaling.
    #[inline]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Composes the transform into a model matrix (scale, then rotate, then translate).
    pub fn to_matrix(&self) -> Mat4 {
        let mut m = Mat4::from_scale(self.scale);
        if self.rotation.x != 0.0 {
            m = Mat4::from_rotation_x(self.rotation.x) * m;
        }
        if self.rotation.y != 0.0 {
            m = Mat4::from_rotation_y(self.rotation.y) * m;
        }
        if self.rotation.z != 0.0 {
            m = Mat4::from_rotation_z(self.rotation.z) * m;
        }
        Mat4::from_translation(self.translation) * m
    }

    /// Returns `true` if every component of the transform is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, Vec4, FRAC_PI_2};

    #[test]
    fn test_identity_matrix() {
        assert_eq!(Transform::IDENTITY.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_scale_applies_before_translation() {
        let t = Transform {
            translation: Vec3::new(1.0, 0.0, 0.0),
            rotation: Vec3::ZERO,
            scale: Vec3::splat(2.0),
        };
        let p = t.to_matrix() * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(approx_eq(p.x, 3.0));
    }

    #[test]
    fn test_yaw_rotates_about_y() {
        let t = Transform {
            rotation: Vec3::new(0.0, FRAC_PI_2, 0.0),
            ..Transform::IDENTITY
        };
        let p = t.to_matrix() * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(approx_eq(p.x, 0.0));
        assert!(approx_eq(p.z, -1.0));
    }
}

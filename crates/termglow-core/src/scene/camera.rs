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

//! The scene's fixed camera.

use crate::math::{degrees_to_radians, Mat4, Vec3};

/// A fixed-pose perspective camera.
///
/// The visualization never moves its camera at runtime; the pose and field of
/// view are construction-time constants. Only the aspect ratio varies, driven
/// by the hosting surface's dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World-space position of the camera.
    pub position: Vec3,
    /// The point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Distance to the near clipping plane.
    pub z_near: f32,
    /// Distance to the far clipping plane.
    pub z_far: f32,
}

impl Camera {
    /// Builds the view matrix for the camera's pose.
    ///
    /// Falls back to the identity matrix if the pose is degenerate (eye on
    /// target or looking straight along the up axis), which cannot happen for
    /// the default pose but keeps the function total.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y).unwrap_or(Mat4::IDENTITY)
    }

    /// Builds the perspective projection matrix for the given aspect ratio.
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        // Guard against a zero-sized surface mid-resize.
        let aspect = if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            aspect_ratio
        } else {
            1.0
        };
        Mat4::perspective_rh_zo(
            degrees_to_radians(self.fov_y_degrees),
            aspect,
            self.z_near,
            self.z_far,
        )
    }

    /// Combined view-projection matrix, ready for a GPU uniform.
    pub fn view_projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        self.projection_matrix(aspect_ratio) * self.view_matrix()
    }
}

impl Default for Camera {
    /// The pose the visualization ships with: eight units back on +Z, looking
    /// at the origin, with a 50° vertical field of view.
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 8.0),
            target: Vec3::ZERO,
            fov_y_degrees: 50.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, Vec4};

    #[test]
    fn test_default_pose() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 8.0));
        assert!(approx_eq(camera.fov_y_degrees, 50.0));
    }

    #[test]
    fn test_view_matrix_moves_origin_in_front_of_camera() {
        let camera = Camera::default();
        let origin_in_view = camera.view_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        // Right-handed view space looks down -Z.
        approx::assert_relative_eq!(origin_in_view.z, -8.0, epsilon = 1e-5);
        approx::assert_relative_eq!(origin_in_view.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_projection_handles_degenerate_aspect() {
        let camera = Camera::default();
        assert!(camera.projection_matrix(0.0).is_finite());
        assert!(camera.projection_matrix(f32::NAN).is_finite());
        assert!(camera.projection_matrix(16.0 / 9.0).is_finite());
    }

    #[test]
    fn test_view_projection_is_finite() {
        let camera = Camera::default();
        assert!(camera.view_projection_matrix(1.5).is_finite());
    }
}

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

//! Static mesh data: the unit cube every box in the scene is scaled from.

use std::mem;

/// A lit mesh vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal, unit length.
    pub normal: [f32; 3],
}

impl Vertex {
    /// The vertex buffer layout matching the mesh pipeline's `@location(0)`
    /// and `@location(1)` inputs.
    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

const fn v(position: [f32; 3], normal: [f32; 3]) -> Vertex {
    Vertex { position, normal }
}

/// A unit cube centered at the origin (half extent 0.5), four vertices per
/// face so every face gets a flat normal.
pub const CUBE_VERTICES: [Vertex; 24] = [
    // +Z face
    v([-0.5, -0.5, 0.5], [0.0, 0.0, 1.0]),
    v([0.5, -0.5, 0.5], [0.0, 0.0, 1.0]),
    v([0.5, 0.5, 0.5], [0.0, 0.0, 1.0]),
    v([-0.5, 0.5, 0.5], [0.0, 0.0, 1.0]),
    // -Z face
    v([0.5, -0.5, -0.5], [0.0, 0.0, -1.0]),
    v([-0.5, -0.5, -0.5], [0.0, 0.0, -1.0]),
    v([-0.5, 0.5, -0.5], [0.0, 0.0, -1.0]),
    v([0.5, 0.5, -0.5], [0.0, 0.0, -1.0]),
    // +X face
    v([0.5, -0.5, 0.5], [1.0, 0.0, 0.0]),
    v([0.5, -0.5, -0.5], [1.0, 0.0, 0.0]),
    v([0.5, 0.5, -0.5], [1.0, 0.0, 0.0]),
    v([0.5, 0.5, 0.5], [1.0, 0.0, 0.0]),
    // -X face
    v([-0.5, -0.5, -0.5], [-1.0, 0.0, 0.0]),
    v([-0.5, -0.5, 0.5], [-1.0, 0.0, 0.0]),
    v([-0.5, 0.5, 0.5], [-1.0, 0.0, 0.0]),
    v([-0.5, 0.5, -0.5], [-1.0, 0.0, 0.0]),
    // +Y face
    v([-0.5, 0.5, 0.5], [0.0, 1.0, 0.0]),
    v([0.5, 0.5, 0.5], [0.0, 1.0, 0.0]),
    v([0.5, 0.5, -0.5], [0.0, 1.0, 0.0]),
    v([-0.5, 0.5, -0.5], [0.0, 1.0, 0.0]),
    // -Y face
    v([-0.5, -0.5, -0.5], [0.0, -1.0, 0.0]),
    v([0.5, -0.5, -0.5], [0.0, -1.0, 0.0]),
    v([0.5, -0.5, 0.5], [0.0, -1.0, 0.0]),
    v([-0.5, -0.5, 0.5], [0.0, -1.0, 0.0]),
];

/// Index list for [`CUBE_VERTICES`]: two counter-clockwise triangles per face.
pub const CUBE_INDICES: [u16; 36] = [
    0, 1, 2, 0, 2, 3, // +Z
    4, 5, 6, 4, 6, 7, // -Z
    8, 9, 10, 8, 10, 11, // +X
    12, 13, 14, 12, 14, 15, // -X
    16, 17, 18, 16, 18, 19, // +Y
    20, 21, 22, 20, 22, 23, // -Y
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        assert_eq!(CUBE_VERTICES.len(), 24);
        assert_eq!(CUBE_INDICES.len(), 36);
    }

    #[test]
    fn test_indices_in_range() {
        assert!(CUBE_INDICES.iter().all(|&i| (i as usize) < CUBE_VERTICES.len()));
    }

    #[test]
    fn test_positions_within_half_extent() {
        for vert in &CUBE_VERTICES {
            for c in vert.position {
                assert!(c.abs() <= 0.5);
            }
        }
    }

    #[test]
    fn test_normals_are_unit_axis_vectors() {
        for vert in &CUBE_VERTICES {
            let [x, y, z] = vert.normal;
            let len_sq = x * x + y * y + z * z;
            assert!((len_sq - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_normals_point_away_from_center() {
        // A face's normal must agree with the direction of its vertices.
        for vert in &CUBE_VERTICES {
            let dot = vert.position[0] * vert.normal[0]
                + vert.position[1] * vert.normal[1]
                + vert.position[2] * vert.normal[2];
            assert!(dot > 0.0);
        }
    }
}

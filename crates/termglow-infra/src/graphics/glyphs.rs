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

//! Glyph atlas construction and text layout for the terminal screen.
//!
//! The text block is laid out exactly once, at mount: the font is rasterized
//! into a single-channel coverage atlas and the content becomes a list of
//! textured quads in panel-local units. Per frame only the text layer's rigid
//! transform changes. If the font asset is missing the caller skips the text
//! layer entirely; the panel boxes render regardless.

use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::mem;
use std::path::Path;

/// Rasterization size of one glyph in atlas pixels. Generous enough that the
/// glyphs stay crisp at the panel's on-screen size.
const GLYPH_PX: f32 = 48.0;

/// Fixed atlas width; rows of glyphs are shelf-packed into it.
const ATLAS_WIDTH: u32 = 512;

/// One pixel of padding between packed glyphs to avoid sampling bleed.
const PADDING: u32 = 1;

/// Default on-disk location of the font asset.
const FONT_ASSET_PATH: &str = "assets/JetBrainsMono-Regular.ttf";

/// Environment variable overriding the font asset location.
const FONT_ENV_VAR: &str = "TERMGLOW_FONT";

/// A textured text vertex in panel-local units.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TextVertex {
    /// Panel-local position (z is 0; the text transform places the layer).
    pub position: [f32; 3],
    /// Atlas texture coordinates.
    pub uv: [f32; 2],
}

impl TextVertex {
    /// The vertex buffer layout matching the text pipeline's `@location(0)`
    /// and `@location(1)` inputs.
    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<TextVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Placement of one rasterized glyph inside the atlas, in atlas pixels.
#[derive(Debug, Clone, Copy)]
struct GlyphEntry {
    /// Atlas pixel rectangle.
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    /// Horizontal bearing from the pen position.
    xmin: f32,
    /// Vertical bearing of the bitmap's bottom edge from the baseline.
    ymin: f32,
    /// Pen advance after this glyph.
    advance: f32,
}

/// A single-channel coverage atlas plus the metrics needed to lay text out.
pub struct GlyphAtlas {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    glyphs: HashMap<char, GlyphEntry>,
    line_height: f32,
}

impl GlyphAtlas {
    /// Rasterizes every distinct glyph of `content` into a fresh atlas.
    pub fn build(font_bytes: &[u8], content: &str) -> Result<Self> {
        let font = fontdue::Font::from_bytes(font_bytes, fontdue::FontSettings::default())
            .map_err(|e| anyhow!("failed to parse font: {e}"))?;

        let line_height = font
            .horizontal_line_metrics(GLYPH_PX)
            .map(|m| m.new_line_size)
            .unwrap_or(GLYPH_PX * 1.2);

        let mut distinct: Vec<char> = content
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        distinct.sort_unstable();
        distinct.dedup();

        // Shelf-pack the rasterized bitmaps row by row.
        let mut rasterized = Vec::with_capacity(distinct.len());
        let (mut pen_x, mut pen_y, mut row_height) = (0u32, 0u32, 0u32);
        let mut glyphs = HashMap::with_capacity(distinct.len());

        for c in distinct {
            let (metrics, bitmap) = font.rasterize(c, GLYPH_PX);
            let (w, h) = (metrics.width as u32, metrics.height as u32);
            if pen_x + w + PADDING > ATLAS_WIDTH {
                pen_x = 0;
                pen_y += row_height + PADDING;
                row_height = 0;
            }
            glyphs.insert(
                c,
                GlyphEntry {
                    x: pen_x,
                    y: pen_y,
                    width: w,
                    height: h,
                    xmin: metrics.xmin as f32,
                    ymin: metrics.ymin as f32,
                    advance: metrics.advance_width,
                },
            );
            rasterized.push((pen_x, pen_y, w, h, bitmap));
            pen_x += w + PADDING;
            row_height = row_height.max(h);
        }
        let height = (pen_y + row_height + PADDING).max(1);

        let mut pixels = vec![0u8; (ATLAS_WIDTH * height) as usize];
        for (x, y, w, _h, bitmap) in rasterized {
            for (row_idx, row) in bitmap.chunks_exact(w.max(1) as usize).enumerate() {
                let dst_start = ((y + row_idx as u32) * ATLAS_WIDTH + x) as usize;
                pixels[dst_start..dst_start + row.len()].copy_from_slice(row);
            }
        }

        log::debug!(
            "Glyph atlas built: {}x{} pixels, {} glyphs",
            ATLAS_WIDTH,
            height,
            glyphs.len()
        );

        Ok(Self {
            pixels,
            width: ATLAS_WIDTH,
            height,
            glyphs,
            line_height,
        })
    }

    /// The raw single-channel coverage pixels, row-major, top row first.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Atlas dimensions in pixels.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Lays `content` out as textured quads in panel-local units.
    ///
    /// The first line's baseline sits at the local origin and text flows
    /// rightward and downward, matching a left/middle-anchored text block.
    /// `glyph_size` is the scene-unit height of one glyph cell.
    pub fn layout(&self, content: &str, glyph_size: f32) -> (Vec<TextVertex>, Vec<u16>) {
        let scale = glyph_size / GLYPH_PX;
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for (line_idx, line) in content.lines().enumerate() {
            let mut pen_x = 0.0f32;
            let pen_y = -(line_idx as f32) * self.line_height * scale;
            for c in line.chars() {
                let Some(entry) = self.glyphs.get(&c) else {
                    // Unknown or whitespace glyph: advance by the space width.
                    pen_x += GLYPH_PX * 0.6 * scale;
                    continue;
                };
                if entry.width > 0 && entry.height > 0 {
                    let x0 = pen_x + entry.xmin * scale;
                    let y0 = pen_y + entry.ymin * scale;
                    let x1 = x0 + entry.width as f32 * scale;
                    let y1 = y0 + entry.height as f32 * scale;

                    let u0 = entry.x as f32 / self.width as f32;
                    let v0 = entry.y as f32 / self.height as f32;
                    let u1 = (entry.x + entry.width) as f32 / self.width as f32;
                    let v1 = (entry.y + entry.height) as f32 / self.height as f32;

                    let base = vertices.len() as u16;
                    // Bitmap row 0 is the glyph's top, so the top edge (y1)
                    // samples v0.
                    vertices.extend_from_slice(&[
                        TextVertex {
                            position: [x0, y0, 0.0],
                            uv: [u0, v1],
                        },
                        TextVertex {
                            position: [x1, y0, 0.0],
                            uv: [u1, v1],
                        },
                        TextVertex {
                            position: [x1, y1, 0.0],
                            uv: [u1, v0],
                        },
                        TextVertex {
                            position: [x0, y1, 0.0],
                            uv: [u0, v0],
                        },
                    ]);
                    indices.extend_from_slice(&[
                        base,
                        base + 1,
                        base + 2,
                        base,
                        base + 2,
                        base + 3,
                    ]);
                }
                pen_x += entry.advance * scale;
            }
        }

        (vertices, indices)
    }
}

/// Loads the font asset from the override path or the default location.
///
/// Returns `None` when no font can be found or read; the caller then renders
/// the panel without its text layer.
pub fn load_font_bytes() -> Option<Vec<u8>> {
    let candidate = std::env::var(FONT_ENV_VAR).unwrap_or_else(|_| FONT_ASSET_PATH.to_string());
    match std::fs::read(Path::new(&candidate))
        .with_context(|| format!("reading font asset '{candidate}'"))
    {
        Ok(bytes) => {
            log::info!("Loaded font asset from '{candidate}' ({} bytes)", bytes.len());
            Some(bytes)
        }
        Err(e) => {
            log::warn!("Font asset unavailable ({e:#}); terminal text will not render");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a tiny hand-crafted atlas so layout can be tested without a
    /// real font file.
    fn fake_atlas() -> GlyphAtlas {
        let mut glyphs = HashMap::new();
        glyphs.insert(
            'A',
            GlyphEntry {
                x: 0,
                y: 0,
                width: 24,
                height: 32,
                xmin: 2.0,
                ymin: 0.0,
                advance: 28.0,
            },
        );
        GlyphAtlas {
            pixels: vec![0; (ATLAS_WIDTH * 40) as usize],
            width: ATLAS_WIDTH,
            height: 40,
            glyphs,
            line_height: 56.0,
        }
    }

    #[test]
    fn test_build_rejects_malformed_font() {
        assert!(GlyphAtlas::build(b"not a font", "hello").is_err());
    }

    #[test]
    fn test_layout_one_quad_per_known_glyph() {
        let atlas = fake_atlas();
        let (vertices, indices) = atlas.layout("AA", 0.15);
        assert_eq!(vertices.len(), 8);
        assert_eq!(indices.len(), 12);
    }

    #[test]
    fn test_layout_unknown_glyphs_advance_without_quads() {
        let atlas = fake_atlas();
        let (vertices, _) = atlas.layout("zAz", 0.15);
        assert_eq!(vertices.len(), 4);
        // The 'A' quad starts after one unknown-glyph advance.
        assert!(vertices[0].position[0] > 0.0);
    }

    #[test]
    fn test_layout_lines_stack_downward() {
        let atlas = fake_atlas();
        let (vertices, _) = atlas.layout("A\nA", 0.15);
        assert_eq!(vertices.len(), 8);
        let first_line_y = vertices[0].position[1];
        let second_line_y = vertices[4].position[1];
        assert!(second_line_y < first_line_y);
    }

    #[test]
    fn test_layout_uvs_within_atlas() {
        let atlas = fake_atlas();
        let (vertices, _) = atlas.layout("A", 0.15);
        for vert in vertices {
            assert!(vert.uv[0] >= 0.0 && vert.uv[0] <= 1.0);
            assert!(vert.uv[1] >= 0.0 && vert.uv[1] <= 1.0);
        }
    }

    #[test]
    fn test_missing_font_loads_as_none() {
        // No assets/ directory exists relative to the test cwd and the env
        // override points at a nonexistent file.
        std::env::set_var(FONT_ENV_VAR, "/nonexistent/font.ttf");
        assert!(load_font_bytes().is_none());
        std::env::remove_var(FONT_ENV_VAR);
    }
}

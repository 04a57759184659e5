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

//! The terminal panel: a floating box with a mock monitoring session on it.
//!
//! The panel is three layers: the outer frame box (which bobs and yaws
//! gently), the slightly inset screen box (static), and the text block (its
//! own slower sway). The text is laid out once at mount; only rigid
//! transforms change per frame.

use super::transform::Transform;
use crate::math::Vec3;

/// Outer frame box dimensions (width, height, depth) in scene units.
pub const FRAME_EXTENTS: Vec3 = Vec3::new(4.0, 2.5, 0.1);

/// Inset screen box dimensions in scene units.
pub const SCREEN_EXTENTS: Vec3 = Vec3::new(3.8, 2.3, 0.05);

/// Z offset of the screen layer in front of the frame.
pub const SCREEN_OFFSET_Z: f32 = 0.06;

/// Panel-local anchor of the text block (left edge, vertically centered line).
pub const TEXT_ANCHOR: Vec3 = Vec3::new(-1.5, 0.5, 0.1);

/// Glyph size of the terminal text in scene units.
pub const TEXT_GLYPH_SIZE: f32 = 0.15;

/// sRGB hex color of the outer frame box.
pub const FRAME_COLOR_HEX: &str = "#1a1a1a";

/// sRGB hex color of the inset screen box.
pub const SCREEN_COLOR_HEX: &str = "#0a0a0a";

/// sRGB hex color of the terminal text.
pub const TEXT_COLOR_HEX: &str = "#00ff88";

// Idle motion: small, bounded, never user-interactive.
const FRAME_YAW_AMPLITUDE: f32 = 0.1;
const FRAME_YAW_RATE: f32 = 0.5;
const FRAME_BOB_AMPLITUDE: f32 = 0.2;
const FRAME_BOB_RATE: f32 = 0.8;
const TEXT_SWAY_AMPLITUDE: f32 = 0.05;
const TEXT_SWAY_RATE: f32 = 0.3;

/// The sample monitoring session shown on the screen.
pub const SAMPLE_SESSION: &str = "$ pingify monitor \\\n  --url api.example.com \\\n  --interval 10s \\\n  --threshold 500ms\n\n[OK] HTTP 200 - 234ms\n[OK] HTTP 200 - 189ms\n[!!] HTTP 200 - 678ms\n[OK] HTTP 200 - 156ms";

/// The transforms of the panel's three layers for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPose {
    /// The outer frame box (animated: bob + yaw).
    pub frame: Transform,
    /// The inset screen box (static).
    pub screen: Transform,
    /// The text block (its own slow sway).
    pub text: Transform,
}

/// The terminal panel model: base pose plus immutable text content.
///
/// Base values never change; the displayed pose is the base with small
/// offset functions of elapsed time layered on top.
#[derive(Debug, Clone)]
pub struct TerminalPanel {
    base_position: Vec3,
    base_rotation: Vec3,
    content: String,
}

impl TerminalPanel {
    /// Creates the panel at the origin with the default sample session.
    pub fn new() -> Self {
        Self {
            base_position: Vec3::ZERO,
            base_rotation: Vec3::ZERO,
            content: SAMPLE_SESSION.to_string(),
        }
    }

    /// The immutable text block shown on the screen.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The panel's base position. Never changes after construction.
    #[inline]
    pub fn base_position(&self) -> Vec3 {
        self.base_position
    }

    /// The panel's base rotation. Never changes after construction.
    #[inline]
    pub fn base_rotation(&self) -> Vec3 {
        self.base_rotation
    }

    /// Derives the layer transforms for the given elapsed time.
    ///
    /// Pure in `elapsed_seconds`; at `t = 0` every offset is zero and the
    /// layers sit at their base pose.
    pub fn pose_at(&self, elapsed_seconds: f32) -> PanelPose {
        let t = elapsed_seconds;

        let frame = Transform {
            translation: self.base_position
                + Vec3::new(0.0, FRAME_BOB_AMPLITUDE * (FRAME_BOB_RATE * t).sin(), 0.0),
            rotation: self.base_rotation
                + Vec3::new(0.0, FRAME_YAW_AMPLITUDE * (FRAME_YAW_RATE * t).sin(), 0.0),
            scale: Vec3::ONE,
        };

        let screen = Transform::from_translation(
            self.base_position + Vec3::new(0.0, 0.0, SCREEN_OFFSET_Z),
        );

        let text = Transform {
            translation: self.base_position + TEXT_ANCHOR,
            rotation: Vec3::new(0.0, TEXT_SWAY_AMPLITUDE * (TEXT_SWAY_RATE * t).sin(), 0.0),
            scale: Vec3::ONE,
        };

        PanelPose {
            frame,
            screen,
            text,
        }
    }
}

impl Default for TerminalPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_pose_at_zero_has_no_offsets() {
        let panel = TerminalPanel::new();
        let pose = panel.pose_at(0.0);
        assert_eq!(pose.frame.translation, panel.base_position());
        assert_eq!(pose.frame.rotation, panel.base_rotation());
        assert!(approx_eq(pose.text.rotation.y, 0.0));
    }

    #[test]
    fn test_offsets_are_bounded() {
        let panel = TerminalPanel::new();
        let mut t = 0.0;
        while t <= 100.0 {
            let pose = panel.pose_at(t);
            assert!(pose.frame.translation.y.abs() <= FRAME_BOB_AMPLITUDE + f32::EPSILON);
            assert!(pose.frame.rotation.y.abs() <= FRAME_YAW_AMPLITUDE + f32::EPSILON);
            assert!(pose.text.rotation.y.abs() <= TEXT_SWAY_AMPLITUDE + f32::EPSILON);
            assert!(pose.frame.is_finite() && pose.screen.is_finite() && pose.text.is_finite());
            t += 0.25;
        }
    }

    #[test]
    fn test_base_pose_never_changes() {
        let panel = TerminalPanel::new();
        let _ = panel.pose_at(12.5);
        assert_eq!(panel.base_position(), Vec3::ZERO);
        assert_eq!(panel.base_rotation(), Vec3::ZERO);
    }

    #[test]
    fn test_screen_layer_is_static() {
        let panel = TerminalPanel::new();
        assert_eq!(panel.pose_at(1.0).screen, panel.pose_at(77.0).screen);
    }

    #[test]
    fn test_pose_is_deterministic() {
        let panel = TerminalPanel::new();
        assert_eq!(panel.pose_at(3.25), panel.pose_at(3.25));
    }

    #[test]
    fn test_content_is_the_sample_session() {
        let panel = TerminalPanel::new();
        assert!(panel.content().starts_with("$ pingify monitor"));
        assert!(panel.content().contains("HTTP 200"));
    }
}

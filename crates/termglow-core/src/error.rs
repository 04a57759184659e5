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

//! Defines the hierarchy of error types for the visualization.
//!
//! Two boundaries exist: mounting (where a missing graphics backend must fail
//! fast with a single clear error) and the per-frame path (where transient
//! surface problems are recovered in place and only resource exhaustion is
//! fatal). Nothing in this module may escape the mount boundary as a panic.

use std::fmt;

/// An error raised while attaching the visualization to a surface.
///
/// Mount errors are reported once to the host; the render loop never starts
/// if mounting fails, so the host is never spammed with per-frame failures.
#[derive(Debug)]
pub enum MountError {
    /// The hosting environment has no compatible graphics backend or adapter.
    Unsupported {
        /// A human-readable description of what was missing.
        reason: String,
    },
    /// The window surface could not be created or configured.
    SurfaceCreation {
        /// Detailed error messages from the graphics backend.
        details: String,
    },
    /// The logical graphics device could not be acquired from the adapter.
    DeviceRequest {
        /// Detailed error messages from the graphics backend.
        details: String,
    },
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountError::Unsupported { reason } => {
                write!(f, "Rendering is unsupported in this environment: {reason}")
            }
            MountError::SurfaceCreation { details } => {
                write!(f, "Failed to create the render surface: {details}")
            }
            MountError::DeviceRequest { details } => {
                write!(f, "Failed to acquire a graphics device: {details}")
            }
        }
    }
}

impl std::error::Error for MountError {}

/// An error raised while rendering a single frame.
#[derive(Debug)]
pub enum FrameError {
    /// The swapchain surface was lost or is outdated; the caller should
    /// reconfigure and continue with the next frame.
    SurfaceUnavailable {
        /// Detailed error messages from the graphics backend.
        details: String,
    },
    /// The graphics device ran out of memory. Not recoverable per frame.
    OutOfMemory,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::SurfaceUnavailable { details } => {
                write!(f, "Render surface unavailable this frame: {details}")
            }
            FrameError::OutOfMemory => {
                write!(f, "Graphics device is out of memory")
            }
        }
    }
}

impl std::error::Error for FrameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_error_display() {
        let err = MountError::Unsupported {
            reason: "no adapter found".to_string(),
        };
        assert!(err.to_string().contains("unsupported"));
        assert!(err.to_string().contains("no adapter found"));
    }

    #[test]
    fn test_frame_error_display() {
        let err = FrameError::SurfaceUnavailable {
            details: "outdated".to_string(),
        };
        assert!(err.to_string().contains("outdated"));
    }
}

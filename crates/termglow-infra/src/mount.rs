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

//! The mount boundary: the one embeddable surface a host attaches.
//!
//! [`Visualization::mount`] is the only operation that can fail towards the
//! host, and it fails exactly once with a clear [`MountError`]. After a
//! successful mount, per-frame problems are handled internally: transient
//! surface loss is recovered, resource exhaustion stops the loop with a
//! single logged error. Unmounting (explicitly or by dropping) stops the
//! loop synchronously and releases every GPU resource.

use termglow_core::error::{FrameError, MountError};
use termglow_core::{RenderLoopDriver, Scene, SceneClock};

use crate::graphics::{GraphicsContext, SceneRenderer};
use crate::platform::window::VizWindow;

/// The embeddable visualization surface.
///
/// Owns the scene, the clock, and all GPU resources for one mounted
/// instance. No parameters beyond the hosting window are required for the
/// default behavior.
pub struct Visualization {
    driver: Option<RenderLoopDriver<SceneRenderer>>,
}

impl Visualization {
    /// Mounts the visualization onto the given window.
    ///
    /// Allocates the full GPU state, starts the clock at zero, and starts
    /// the render loop. Fails fast with [`MountError::Unsupported`] when the
    /// hosting environment has no usable graphics backend.
    pub fn mount(window: &dyn VizWindow) -> Result<Self, MountError> {
        let context = GraphicsContext::new(window.clone_handle_arc(), window.inner_size())?;
        let scene = Scene::new();
        let renderer = SceneRenderer::new(context, &scene);
        let mut driver = RenderLoopDriver::new(scene, SceneClock::system(), renderer);
        driver.start();
        log::info!("Visualization mounted");
        Ok(Self {
            driver: Some(driver),
        })
    }

    /// Whether the visualization is currently mounted and animating.
    pub fn is_mounted(&self) -> bool {
        self.driver.as_ref().is_some_and(|d| d.is_running())
    }

    /// Renders one frame. Call once per display refresh.
    ///
    /// Never propagates an error to the host: transient surface problems are
    /// logged and skipped (the next frame retries), and an out-of-memory
    /// device stops the loop with a single logged error.
    pub fn render_frame(&mut self) {
        let Some(driver) = self.driver.as_mut() else {
            return;
        };
        match driver.render_frame() {
            Ok(()) => {}
            Err(FrameError::SurfaceUnavailable { details }) => {
                log::warn!("Skipping frame: {details}");
            }
            Err(e @ FrameError::OutOfMemory) => {
                log::error!("Stopping render loop: {e}");
                driver.stop();
            }
        }
    }

    /// Propagates a host window resize to the swapchain and camera aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(driver) = self.driver.as_mut() {
            driver.rasterizer_mut().resize(width, height);
        }
    }

    /// Unmounts the visualization: stops the loop and releases all GPU
    /// resources. Idempotent; rendering after unmount is a no-op.
    pub fn unmount(&mut self) {
        if let Some(driver) = self.driver.take() {
            let (_scene, renderer) = driver.into_parts();
            drop(renderer);
            log::info!("Visualization unmounted");
        }
    }
}

impl Drop for Visualization {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmounted_visualization_is_inert() {
        // Construct in the unmounted state; no GPU is touched.
        let mut viz = Visualization { driver: None };
        assert!(!viz.is_mounted());
        viz.render_frame();
        viz.resize(640, 480);
        viz.unmount();
        viz.unmount();
    }
}

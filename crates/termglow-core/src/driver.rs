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

//! The render loop driver: reads the clock, advances the scene, submits it.
//!
//! The driver is an explicit object with `start`/`stop` and an injectable
//! time source (via [`SceneClock`]) instead of an implicit global animation
//! loop, so tests can step time deterministically without a real display.
//! The host invokes [`render_frame`](RenderLoopDriver::render_frame) once per
//! display refresh; frames never overlap and never block on I/O.

use crate::clock::SceneClock;
use crate::error::FrameError;
use crate::scene::Scene;

/// The seam between the pure scene model and a concrete graphics backend.
///
/// A rasterizer receives the fully advanced scene once per frame and turns
/// the current [`FrameSnapshot`](crate::scene::FrameSnapshot) into draw
/// calls. Implementations must not retain references into the scene across
/// frames.
pub trait Rasterizer {
    /// Rasterizes the scene's current snapshot.
    fn submit(&mut self, scene: &Scene) -> Result<(), FrameError>;
}

/// Drives the per-frame update: clock read → scene advance → rasterizer submit.
///
/// Single-threaded and display-paced: the host calls `render_frame` once per
/// refresh. After [`stop`](Self::stop), `render_frame` becomes a no-op and
/// the clock is never read again.
pub struct RenderLoopDriver<R: Rasterizer> {
    scene: Scene,
    clock: SceneClock,
    rasterizer: R,
    running: bool,
}

impl<R: Rasterizer> RenderLoopDriver<R> {
    /// Creates a stopped driver over the given scene, clock, and rasterizer.
    pub fn new(scene: Scene, clock: SceneClock, rasterizer: R) -> Self {
        Self {
            scene,
            clock,
            rasterizer,
            running: false,
        }
    }

    /// Starts the loop, resetting the clock to `0` (scene mount semantics).
    ///
    /// Starting an already running driver restarts its clock.
    pub fn start(&mut self) {
        self.clock.reset();
        self.running = true;
        log::info!(
            "Render loop started ({} particles)",
            self.scene.particle_count()
        );
    }

    /// Stops the loop. Idempotent; no clock read or submit happens afterwards.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::info!("Render loop stopped");
        }
    }

    /// Whether the loop is currently running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The scene owned by this driver.
    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The rasterizer owned by this driver.
    #[inline]
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Mutable access to the rasterizer, for host-driven events like resizes.
    #[inline]
    pub fn rasterizer_mut(&mut self) -> &mut R {
        &mut self.rasterizer
    }

    /// Renders one frame: reads the clock, recomputes all time-dependent
    /// transforms, and submits the scene.
    ///
    /// A no-op when the driver is stopped. Idempotent per clock reading: the
    /// transforms submitted for a given elapsed time are always the same.
    pub fn render_frame(&mut self) -> Result<(), FrameError> {
        if !self.running {
            return Ok(());
        }
        let elapsed = self.clock.elapsed_seconds();
        self.scene.advance(elapsed);
        self.rasterizer.submit(&self.scene)
    }

    /// Tears the driver apart, returning the scene and rasterizer.
    ///
    /// Stops the loop first so no frame can be rendered through the driver
    /// afterwards.
    pub fn into_parts(mut self) -> (Scene, R) {
        self.stop();
        (self.scene, self.rasterizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualTimeSource;

    /// Records every submitted elapsed-time reading instead of drawing.
    struct RecordingRasterizer {
        submitted: Vec<f32>,
    }

    impl RecordingRasterizer {
        fn new() -> Self {
            Self {
                submitted: Vec::new(),
            }
        }
    }

    impl Rasterizer for RecordingRasterizer {
        fn submit(&mut self, scene: &Scene) -> Result<(), FrameError> {
            self.submitted.push(scene.snapshot().elapsed_seconds);
            Ok(())
        }
    }

    fn test_driver() -> (ManualTimeSource, RenderLoopDriver<RecordingRasterizer>) {
        let source = ManualTimeSource::new();
        let clock = SceneClock::new(Box::new(source.clone()));
        let driver = RenderLoopDriver::new(Scene::new(), clock, RecordingRasterizer::new());
        (source, driver)
    }

    #[test]
    fn test_stopped_driver_renders_nothing() {
        let (_source, mut driver) = test_driver();
        assert!(driver.render_frame().is_ok());
        assert!(driver.rasterizer().submitted.is_empty());
    }

    #[test]
    fn test_frames_carry_monotonic_clock_readings() {
        let (source, mut driver) = test_driver();
        driver.start();
        for secs in [0.0, 0.3, 0.2, 1.0, 0.9, 2.5] {
            source.set_secs(secs);
            driver.render_frame().unwrap();
        }
        let submitted = &driver.rasterizer().submitted;
        assert_eq!(submitted.len(), 6);
        assert!(submitted.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_stop_prevents_further_frames() {
        let (source, mut driver) = test_driver();
        driver.start();
        source.set_secs(1.0);
        driver.render_frame().unwrap();
        driver.stop();
        source.set_secs(2.0);
        driver.render_frame().unwrap();
        assert_eq!(driver.rasterizer().submitted, vec![1.0]);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (_source, mut driver) = test_driver();
        driver.start();
        driver.stop();
        driver.stop();
        assert!(!driver.is_running());
    }

    #[test]
    fn test_start_resets_the_clock() {
        let (source, mut driver) = test_driver();
        driver.start();
        source.set_secs(5.0);
        driver.render_frame().unwrap();

        // Remount: elapsed time measures from zero again.
        driver.start();
        driver.render_frame().unwrap();
        assert_eq!(driver.rasterizer().submitted, vec![5.0, 0.0]);
    }

    #[test]
    fn test_mount_then_immediate_unmount_is_clean() {
        let (_source, mut driver) = test_driver();
        driver.start();
        driver.stop();
        driver.stop();
        let (_scene, rasterizer) = driver.into_parts();
        assert!(rasterizer.submitted.is_empty());
    }

    #[test]
    fn test_same_reading_submits_same_transforms() {
        let (source, mut driver) = test_driver();
        driver.start();
        source.set_secs(3.0);
        driver.render_frame().unwrap();
        let first = driver.scene().snapshot().clone();
        driver.render_frame().unwrap();
        let second = driver.scene().snapshot();
        assert_eq!(first.panel, second.panel);
        assert_eq!(first.particles, second.particles);
    }
}

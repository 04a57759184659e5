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

//! The scene clock and its pluggable time sources.
//!
//! Every animated transform in the scene is a pure function of one scalar:
//! the elapsed seconds since the scene was mounted. The clock guarantees that
//! this scalar is non-negative and never decreases across reads, and that a
//! failing time source degrades to a frozen reading instead of a crash.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A source of elapsed time, measured from the source's creation or last reset.
///
/// Implementations may be backed by a real monotonic timer or stepped manually
/// by tests. Returning `None` signals that the underlying timer is
/// unavailable; the [`SceneClock`] then holds its last good reading rather
/// than failing the frame.
pub trait TimeSource {
    /// Returns the elapsed time since the source started, or `None` if the
    /// underlying timer is unavailable.
    fn elapsed(&self) -> Option<Duration>;

    /// Restarts the source so subsequent readings measure from now.
    fn restart(&mut self);
}

/// A [`TimeSource`] backed by the OS monotonic clock.
#[derive(Debug)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    /// Creates a source whose origin is the moment of this call.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn elapsed(&self) -> Option<Duration> {
        Some(self.origin.elapsed())
    }

    fn restart(&mut self) {
        self.origin = Instant::now();
    }
}

/// A manually stepped [`TimeSource`] for deterministic tests.
///
/// Cloning yields a handle to the same underlying reading, so a test can keep
/// one handle and hand the other to the clock or driver under test.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    reading: Arc<Mutex<Option<Duration>>>,
}

impl ManualTimeSource {
    /// Creates a source reading `0` seconds.
    pub fn new() -> Self {
        Self {
            reading: Arc::new(Mutex::new(Some(Duration::ZERO))),
        }
    }

    /// Sets the current reading in seconds.
    pub fn set_secs(&self, secs: f64) {
        *self.reading.lock().unwrap() = Some(Duration::from_secs_f64(secs));
    }

    /// Makes the source report an unavailable timer until the next `set_secs`.
    pub fn make_unavailable(&self) {
        *self.reading.lock().unwrap() = None;
    }
}

impl TimeSource for ManualTimeSource {
    fn elapsed(&self) -> Option<Duration> {
        *self.reading.lock().unwrap()
    }

    fn restart(&mut self) {
        *self.reading.lock().unwrap() = Some(Duration::ZERO);
    }
}

/// The per-scene clock: wraps a [`TimeSource`] and enforces the contract the
/// animation code relies on.
///
/// Readings are non-negative, start at `0` on (re)mount, and never decrease.
/// If the source reports an unavailable timer, the clock returns its last
/// good reading (initially `0`) so animation freezes instead of crashing.
pub struct SceneClock {
    source: Box<dyn TimeSource>,
    last_reading: f32,
    degraded: bool,
}

impl SceneClock {
    /// Creates a clock over the given source, starting at `0` seconds.
    pub fn new(source: Box<dyn TimeSource>) -> Self {
        Self {
            source,
            last_reading: 0.0,
            degraded: false,
        }
    }

    /// Creates a clock over the OS monotonic timer.
    pub fn system() -> Self {
        Self::new(Box::new(SystemTimeSource::new()))
    }

    /// Returns the elapsed seconds since mount.
    ///
    /// Non-decreasing across calls. A failing source yields the last good
    /// reading and logs the degradation once.
    pub fn elapsed_seconds(&mut self) -> f32 {
        match self.source.elapsed() {
            Some(elapsed) => {
                let secs = elapsed.as_secs_f32();
                if secs > self.last_reading {
                    self.last_reading = secs;
                }
                self.degraded = false;
            }
            None => {
                if !self.degraded {
                    log::warn!(
                        "Time source unavailable; animation frozen at {:.3}s",
                        self.last_reading
                    );
                    self.degraded = true;
                }
            }
        }
        self.last_reading
    }

    /// Resets the clock to `0`, as happens when the scene is remounted.
    pub fn reset(&mut self) {
        self.source.restart();
        self.last_reading = 0.0;
        self.degraded = false;
    }
}

impl std::fmt::Debug for SceneClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneClock")
            .field("last_reading", &self.last_reading)
            .field("degraded", &self.degraded)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_at_zero() {
        let mut clock = SceneClock::new(Box::new(ManualTimeSource::new()));
        assert_eq!(clock.elapsed_seconds(), 0.0);
    }

    #[test]
    fn test_clock_is_monotonic_across_reads() {
        let source = ManualTimeSource::new();
        let mut clock = SceneClock::new(Box::new(source.clone()));

        let mut previous = 0.0;
        for secs in [0.0, 0.5, 0.5, 2.0, 1.0, 3.0] {
            // A source reporting 1.0 after 2.0 must not move the clock back.
            source.set_secs(secs);
            let reading = clock.elapsed_seconds();
            assert!(reading >= previous);
            previous = reading;
        }
        assert_eq!(previous, 3.0);
    }

    #[test]
    fn test_unavailable_source_freezes_reading() {
        let source = ManualTimeSource::new();
        let mut clock = SceneClock::new(Box::new(source.clone()));

        source.set_secs(1.5);
        assert_eq!(clock.elapsed_seconds(), 1.5);

        source.make_unavailable();
        assert_eq!(clock.elapsed_seconds(), 1.5);
        assert_eq!(clock.elapsed_seconds(), 1.5);

        source.set_secs(2.0);
        assert_eq!(clock.elapsed_seconds(), 2.0);
    }

    #[test]
    fn test_unavailable_from_the_start_reads_zero() {
        let source = ManualTimeSource::new();
        source.make_unavailable();
        let mut clock = SceneClock::new(Box::new(source));
        assert_eq!(clock.elapsed_seconds(), 0.0);
    }

    #[test]
    fn test_reset_returns_to_zero() {
        let source = ManualTimeSource::new();
        let mut clock = SceneClock::new(Box::new(source.clone()));
        source.set_secs(10.0);
        assert_eq!(clock.elapsed_seconds(), 10.0);

        clock.reset();
        assert_eq!(clock.elapsed_seconds(), 0.0);
    }

    #[test]
    fn test_system_source_is_non_decreasing() {
        let mut clock = SceneClock::system();
        let a = clock.elapsed_seconds();
        let b = clock.elapsed_seconds();
        assert!(b >= a);
        assert!(a >= 0.0);
    }
}

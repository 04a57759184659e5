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

//! # Termglow Core
//!
//! Backend-free model of the floating-terminal visualization: math
//! primitives, the scene clock, the scene graph (terminal panel, particle
//! bank, camera, lights), and the render loop driver.
//!
//! Every animated transform is a pure, deterministic function of the elapsed
//! seconds since mount. The concrete graphics backend lives in
//! `termglow-infra` behind the [`Rasterizer`] seam.

#![warn(missing_docs)]

pub mod clock;
pub mod driver;
pub mod error;
pub mod math;
pub mod scene;

pub use clock::{ManualTimeSource, SceneClock, SystemTimeSource, TimeSource};
pub use driver::{Rasterizer, RenderLoopDriver};
pub use error::{FrameError, MountError};
pub use scene::{FrameSnapshot, Scene};

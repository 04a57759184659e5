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

//! # Termglow Infra
//!
//! Concrete implementations of the visualization's external dependencies:
//! the `wgpu` graphics backend, the `winit` windowing layer, and the mount
//! surface hosts embed.

#![warn(missing_docs)]

pub mod graphics;
pub mod mount;
pub mod platform;

pub use mount::Visualization;
pub use platform::{VizWindow, WinitWindow, WinitWindowBuilder};

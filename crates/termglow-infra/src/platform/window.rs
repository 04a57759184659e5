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

//! The windowing seam and its `winit`-backed implementation.

use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
};
use std::sync::Arc;
use winit::{dpi::LogicalSize, error::OsError, event_loop::ActiveEventLoop, window::Window};

/// Combines the windowing handle traits required by graphics backends, so a
/// single trait object can be passed around.
pub trait SurfaceHandle: HasWindowHandle + HasDisplayHandle {}

// Blanket impl: anything with both handle traits qualifies.
impl<T: HasWindowHandle + HasDisplayHandle> SurfaceHandle for T {}

/// A thread-safe, reference-counted handle to the hosting surface.
pub type VizSurfaceHandle = Arc<dyn SurfaceHandle + Send + Sync>;

/// Abstracts the behavior of the window hosting the visualization.
///
/// Any windowing backend can implement this trait; the shipped implementation
/// wraps `winit`.
pub trait VizWindow: HasWindowHandle + HasDisplayHandle + Send + Sync {
    /// Returns the physical dimensions (width, height) of the window's inner area.
    fn inner_size(&self) -> (u32, u32);

    /// Requests that the window be redrawn, scheduling the next frame.
    fn request_redraw(&self);

    /// Clones an Arc'd, thread-safe handle to the window for surface creation.
    fn clone_handle_arc(&self) -> VizSurfaceHandle;
}

/// A wrapper around a `winit::window::Window` that implements [`VizWindow`].
#[derive(Debug, Clone)]
pub struct WinitWindow {
    inner: Arc<Window>,
}

/// A builder for creating [`WinitWindow`] instances.
pub struct WinitWindowBuilder {
    title: String,
    width: u32,
    height: u32,
}

impl WinitWindowBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "termglow".to_string(),
            width: 960,
            height: 540,
        }
    }

    /// Sets the title of the window to be built.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the initial inner dimensions of the window to be built.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builds the [`WinitWindow`] using the provided `winit` event loop.
    ///
    /// # Errors
    /// Returns an `OsError` if the underlying `winit` window creation fails.
    pub fn build(self, event_loop: &ActiveEventLoop) -> Result<WinitWindow, OsError> {
        log::info!(
            "Building window '{}' at {}x{}",
            self.title,
            self.width,
            self.height
        );

        let attributes = Window::default_attributes()
            .with_title(self.title)
            .with_inner_size(LogicalSize::new(self.width, self.height))
            .with_visible(true);

        let window = event_loop.create_window(attributes)?;
        log::debug!("Winit window created (id: {:?})", window.id());

        Ok(WinitWindow {
            inner: Arc::new(window),
        })
    }
}

impl Default for WinitWindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HasWindowHandle for WinitWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        self.inner.window_handle()
    }
}

impl HasDisplayHandle for WinitWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        self.inner.display_handle()
    }
}

impl VizWindow for WinitWindow {
    fn inner_size(&self) -> (u32, u32) {
        let size = self.inner.inner_size();
        (size.width, size.height)
    }

    fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    fn clone_handle_arc(&self) -> VizSurfaceHandle {
        self.inner.clone()
    }
}

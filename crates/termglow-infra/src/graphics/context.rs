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

//! Holds the core WGPU state objects required for rendering.
//!
//! Initialization is where the "unsupported environment" contract is
//! enforced: if no compatible adapter or device exists, mounting fails once
//! with a clear [`MountError`] and the render loop never starts.

use crate::platform::window::VizSurfaceHandle;
use termglow_core::error::{FrameError, MountError};
use wgpu::SurfaceTargetUnsafe;

/// Manages the connection to the graphics API for a specific surface.
pub struct GraphicsContext {
    /// The swapchain surface tied to the hosting window.
    pub surface: wgpu::Surface<'static>,
    /// The logical device all resources are created from.
    pub device: wgpu::Device,
    /// The queue used for buffer writes and command submission.
    pub queue: wgpu::Queue,
    /// Current swapchain configuration.
    pub surface_config: wgpu::SurfaceConfiguration,
    /// Human-readable adapter name, for logs.
    pub adapter_name: String,
}

impl GraphicsContext {
    /// Initializes the graphics context for a given window surface.
    ///
    /// Blocks on adapter and device acquisition. Fails fast with a
    /// [`MountError`] when the environment has no usable graphics backend.
    pub fn new(window_handle: VizSurfaceHandle, size: (u32, u32)) -> Result<Self, MountError> {
        log::info!("Initializing WGPU graphics context...");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let surface_target = unsafe {
            SurfaceTargetUnsafe::from_window(&window_handle).map_err(|e| {
                MountError::SurfaceCreation {
                    details: format!("failed to create surface target: {e}"),
                }
            })?
        };
        let surface = unsafe {
            instance
                .create_surface_unsafe(surface_target)
                .map_err(|e| MountError::SurfaceCreation {
                    details: e.to_string(),
                })?
        };
        log::debug!("WGPU surface created for the window.");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| MountError::Unsupported {
            reason: format!("no compatible graphics adapter: {e}"),
        })?;

        let adapter_info = adapter.get_info();
        log::info!(
            "Using graphics adapter: \"{}\" (backend: {:?})",
            adapter_info.name,
            adapter_info.backend
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Termglow Logical Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::default(),
        }))
        .map_err(|e| MountError::DeviceRequest {
            details: e.to_string(),
        })?;
        log::info!("Logical device and command queue created.");

        device.on_uncaptured_error(Box::new(|e| {
            log::error!("WGPU uncaptured error: {e:?}");
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.0.max(1),
            height: size.1.max(1),
            present_mode: wgpu::PresentMode::Fifo, // guaranteed to be supported
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        log::debug!(
            "Surface configured: {}x{} ({:?})",
            surface_config.width,
            surface_config.height,
            surface_format
        );

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            adapter_name: adapter_info.name,
        })
    }

    /// Reconfigures the swapchain for a new surface size. Zero dimensions are
    /// clamped to one so mid-resize events never produce an invalid config.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Width divided by height of the current surface.
    pub fn aspect_ratio(&self) -> f32 {
        self.surface_config.width as f32 / self.surface_config.height as f32
    }

    /// Acquires the next swapchain texture.
    ///
    /// A lost or outdated surface is reconfigured in place and retried; out
    /// of memory is fatal for the frame.
    pub fn acquire_frame(&mut self) -> Result<wgpu::SurfaceTexture, FrameError> {
        loop {
            match self.surface.get_current_texture() {
                Ok(texture) => return Ok(texture),
                Err(e @ wgpu::SurfaceError::Lost) | Err(e @ wgpu::SurfaceError::Outdated) => {
                    log::warn!("Swapchain surface lost or outdated ({e:?}); reconfiguring");
                    self.surface.configure(&self.device, &self.surface_config);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    return Err(FrameError::OutOfMemory);
                }
                Err(e) => {
                    return Err(FrameError::SurfaceUnavailable {
                        details: format!("{e:?}"),
                    });
                }
            }
        }
    }
}

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

// Termglow viewer
// Windowed host for the floating-terminal visualization.

use anyhow::Result;
use termglow_infra::{Visualization, VizWindow, WinitWindow, WinitWindowBuilder};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

#[derive(Default)]
struct ViewerApp {
    window: Option<WinitWindow>,
    viz: Option<Visualization>,
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viz.is_some() {
            return;
        }

        let window = match WinitWindowBuilder::new()
            .with_title("termglow")
            .with_dimensions(960, 540)
            .build(event_loop)
        {
            Ok(window) => window,
            Err(e) => {
                log::error!("Window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        match Visualization::mount(&window) {
            Ok(viz) => {
                window.request_redraw();
                self.window = Some(window);
                self.viz = Some(viz);
            }
            Err(e) => {
                // One clear report; no render loop ever starts.
                log::error!("Cannot mount visualization: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                // Unmount before the window goes away so no frame callback
                // outlives the surface.
                self.viz.take();
                self.window.take();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(viz) = self.viz.as_mut() {
                    viz.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(viz) = self.viz.as_mut() {
                    viz.render_frame();
                }
                // Display-paced animation: immediately request the next frame.
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::default();
    event_loop.run_app(&mut app)?;
    Ok(())
}

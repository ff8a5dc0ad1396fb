use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::camera::Projection;
use crate::fan::TraversalStats;
use crate::gpu::{GpuContext, InitError};
use crate::input::Input;
use crate::mesh_pass::MeshPass;
use crate::render_queue::RenderQueue;
use crate::transform_stack::StackError;
use crate::viewer::Viewer;

/// Configuration for the app window.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Pedestal Fan".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Why the windowed viewer stopped.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("event loop failed")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("initialization failed")]
    Init(#[from] InitError),
    #[error("frame aborted")]
    Frame(#[from] StackError),
}

/// Opens a window and renders `viewer` until the window closes.
///
/// Returns an error if the window or GPU cannot be created, or if a frame's
/// traversal breaks the transform stack discipline.
pub fn run(config: AppConfig, viewer: Viewer) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = FanApp::Pending {
        config,
        viewer: Some(viewer),
    };
    let mut failure = None;
    {
        let mut handler = Handler {
            app: &mut app,
            failure: &mut failure,
        };
        event_loop.run_app(&mut handler)?;
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

enum FanApp {
    Pending {
        config: AppConfig,
        viewer: Option<Viewer>,
    },
    Running(Box<Running>),
}

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    mesh_pass: MeshPass,
    render_queue: RenderQueue,
    viewer: Viewer,
    projection: Projection,
    input: Input,
    last_frame: Instant,
    frames: u64,
}

impl Running {
    fn start(
        event_loop: &ActiveEventLoop,
        config: &AppConfig,
        viewer: Viewer,
    ) -> Result<Self, InitError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(window.clone())?;
        let mesh_pass = MeshPass::new(&gpu);
        let render_queue = RenderQueue::new(&gpu, &viewer.model.registry);
        log::info!(
            "viewer ready at {}x{}; O/B toggle motions, R resets",
            gpu.width(),
            gpu.height()
        );

        Ok(Self {
            window,
            gpu,
            mesh_pass,
            render_queue,
            viewer,
            projection: Projection::default(),
            input: Input::new(),
            last_frame: Instant::now(),
            frames: 0,
        })
    }

    fn redraw(&mut self) -> Result<(), StackError> {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(self.last_frame).as_secs_f64() * 1000.0;
        self.last_frame = now;

        self.viewer.handle_input(&self.input);
        self.input.begin_frame();
        self.viewer.advance(elapsed_ms);

        self.render_queue.clear_queue();
        self.viewer.submit(&mut self.render_queue)?;

        if log::log_enabled!(log::Level::Trace) {
            let mut stats = TraversalStats::default();
            self.viewer.submit(&mut stats)?;
            log::trace!(
                "frame {}: {} nodes, {} draws, oscillation {:.1}°, blades {:.1}°",
                self.frames,
                stats.nodes,
                stats.draws,
                self.viewer.state.oscillation_deg,
                self.viewer.state.blade_deg
            );
        }

        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(err) => {
                log::warn!("skipping frame: {err}");
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Fan Frame Encoder"),
            });

        let proj = self.projection.matrix(self.gpu.aspect());
        let draw_calls = self.render_queue.draw_calls();
        self.mesh_pass
            .render(&self.gpu, &mut encoder, &view, proj, &draw_calls);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.frames += 1;
        Ok(())
    }
}

struct Handler<'a> {
    app: &'a mut FanApp,
    failure: &'a mut Option<RunError>,
}

impl ApplicationHandler for Handler<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let FanApp::Pending { config, viewer } = &mut *self.app else {
            return;
        };
        let Some(viewer) = viewer.take() else {
            return;
        };

        match Running::start(event_loop, config, viewer) {
            Ok(running) => {
                running.window.request_redraw();
                *self.app = FanApp::Running(Box::new(running));
            }
            Err(err) => {
                log::error!("failed to start viewer: {err}");
                *self.failure = Some(err.into());
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let FanApp::Running(running) = &mut *self.app else {
            return;
        };

        running.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("closing after {} frames", running.frames);
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                running.gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = running.redraw() {
                    log::error!("aborting frame {}: {err}", running.frames);
                    *self.failure = Some(err.into());
                    event_loop.exit();
                    return;
                }
                running.window.request_redraw();
            }
            _ => {}
        }
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Window, renderer and frame loop.

use crate::config::{ConfigError, SiteConfig};
use crate::contact::DraftStore;
use crate::images::ImageLoader;
use crate::mailer::EmailJsMailer;
use crate::pages;
use crate::state::SiteState;
use egui_wgpu::wgpu;
use folio_carousel::Scheduler;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

/// Application errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Window creation failed
    #[error("Failed to create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    /// Renderer initialization failed
    #[error("Failed to initialize renderer: {0}")]
    RendererInit(String),

    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for application operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Events sent to the loop from other threads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteEvent {
    /// egui asked for a repaint
    Repaint,
}

/// Graphics state for wgpu rendering
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| AppError::RendererInit(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| AppError::RendererInit("no suitable GPU adapter".to_string()))?;

        tracing::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Folio Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .map_err(|e| AppError::RendererInit(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| AppError::RendererInit("surface has no formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
        clear: egui::Color32,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Folio Encoder"),
        });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        let [r, g, b, a] = egui::Rgba::from(clear).to_array();
        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Folio Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: f64::from(r),
                                g: f64::from(g),
                                b: f64::from(b),
                                a: f64::from(a),
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }
}

/// Running state of the site
struct SiteRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    site: SiteState,
    images: ImageLoader,
    /// Origin of the scheduler clock
    started: Instant,
    /// When the next frame is due, if anything is pending
    next_frame: Option<Instant>,
}

impl SiteRunning {
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.site.scheduler().advance_to(self.started.elapsed());
        self.images.update();

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            pages::show(ctx, &mut self.site, &mut self.images);
        });

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output.clone());

        let repaint_delay = full_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .map_or(Duration::MAX, |viewport| viewport.repaint_delay);
        self.schedule_next_frame(repaint_delay);

        let clear = self.site.theme.background;
        match self.graphics.render(&self.egui_ctx, full_output, &self.window, clear) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.window.inner_size();
                self.graphics.resize(size);
                self.window.request_redraw();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("Out of GPU memory!");
                event_loop.exit();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("Surface timeout");
            }
        }
    }

    /// Wake for whichever comes first: egui's repaint request or the next timer tick
    fn schedule_next_frame(&mut self, repaint_delay: Duration) {
        let now = Instant::now();
        let repaint_at = now.checked_add(repaint_delay);
        let tick_at = self
            .site
            .scheduler()
            .next_deadline()
            .and_then(|deadline| self.started.checked_add(deadline));

        self.next_frame = match (repaint_at, tick_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }
}

/// Main site application
pub struct FolioApp {
    config: SiteConfig,
    proxy: EventLoopProxy<SiteEvent>,
    running: Option<SiteRunning>,
}

impl FolioApp {
    /// Create the application for `config`
    pub fn new(config: SiteConfig, proxy: EventLoopProxy<SiteEvent>) -> Self {
        Self {
            config,
            proxy,
            running: None,
        }
    }

    /// Run the site until the window closes
    pub fn run(config: SiteConfig) -> Result<()> {
        config.validate()?;

        let event_loop = EventLoop::<SiteEvent>::with_user_event().build()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = FolioApp::new(config, event_loop.create_proxy());
        event_loop.run_app(&mut app)?;

        Ok(())
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<SiteRunning> {
        tracing::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(format!("{} - Folio", self.config.profile.name))
            .with_inner_size(winit::dpi::LogicalSize::new(960, 1000))
            .with_min_inner_size(winit::dpi::LogicalSize::new(400, 500));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        tracing::info!("Initializing graphics...");
        let graphics = GraphicsState::new(Arc::clone(&window))?;

        let egui_ctx = egui::Context::default();
        let proxy = Mutex::new(self.proxy.clone());
        egui_ctx.set_request_repaint_callback(move |info| {
            if info.delay.is_zero() {
                // The loop is gone once this fails; nothing left to wake.
                let _ = proxy.lock().send_event(SiteEvent::Repaint);
            }
        });

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024),
        );

        let scheduler = Scheduler::new();
        let mailer = Arc::new(EmailJsMailer::new(self.config.email.clone()));
        let draft_store = DraftStore::new(self.config.draft_store_path());
        tracing::debug!("Contact drafts stored at {}", draft_store.path().display());

        let site = SiteState::new(
            self.config.clone(),
            scheduler,
            mailer,
            Some(draft_store),
            egui_ctx.clone(),
        )?;
        site.theme.apply(&egui_ctx);

        let images = ImageLoader::new(egui_ctx.clone());
        images.preload(site.inline.view().images().iter());

        tracing::info!("Site initialized, window size: {:?}", window.inner_size());

        Ok(SiteRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
            site,
            images,
            started: Instant::now(),
            next_frame: Some(Instant::now()),
        })
    }
}

impl ApplicationHandler<SiteEvent> for FolioApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => {
                running.window.request_redraw();
                self.running = Some(running);
            }
            Err(e) => {
                tracing::error!("Failed to start: {e}");
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: SiteEvent) {
        match event {
            SiteEvent::Repaint => {
                if let Some(running) = &self.running {
                    running.window.request_redraw();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);
        if response.repaint {
            running.window.request_redraw();
        }
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => running.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = &self.running else {
            return;
        };

        match running.next_frame {
            Some(at) if at <= Instant::now() => {
                running.window.request_redraw();
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            Some(at) => event_loop.set_control_flow(ControlFlow::WaitUntil(at)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

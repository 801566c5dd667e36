use std::sync::Arc;

use clap::Parser;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use volcano_showcase::capability::supports_accelerated_rendering;
use volcano_showcase::cli::Cli;
use volcano_showcase::core::clock::FrameClock;
use volcano_showcase::core::input_adapter::{InputEvent, WinitInput};
use volcano_showcase::core::timer::FixedHz;
use volcano_showcase::renderer::Renderer;
use volcano_showcase::showcase::{Showcase, ShowcaseOptions};
use volcano_showcase::ui::{load_fallback_image, Ui};

const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 720;
/// Frame-rate log cadence, in Hz
const STATS_HZ: f32 = 0.2;

struct App {
    cli: Cli,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    showcase: Option<Showcase>,
    ui: Option<Ui>,
    input: WinitInput,
    clock: FrameClock,
    stats: FixedHz,
    stats_frame: u64,
}

impl App {
    fn new(cli: Cli) -> Self {
        Self {
            cli,
            window: None,
            renderer: None,
            showcase: None,
            ui: None,
            input: WinitInput::new(),
            clock: FrameClock::new(),
            stats: FixedHz::new(STATS_HZ),
            stats_frame: 0,
        }
    }

    fn mount(&mut self, window: &Window) {
        let accelerated = !self.cli.force_fallback && supports_accelerated_rendering();
        let size = window.inner_size();

        let fallback_image = if accelerated {
            None
        } else {
            match load_fallback_image(&self.cli.fallback_image) {
                Ok(image) => Some(image),
                Err(e) => {
                    log::error!("{:#}", e);
                    None
                }
            }
        };

        let options = ShowcaseOptions {
            model_path: self.cli.model.clone(),
            playlist: self.cli.playlist_config(),
            layout: self.cli.layout(),
            accelerated,
        };

        self.showcase = Some(Showcase::mount(options, size.width, size.height));
        self.ui = Some(Ui::new(!self.cli.no_ui, fallback_image));
        self.clock = FrameClock::new();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let delta = self.clock.tick();
        if self.stats.tick(delta) {
            let frames = self.clock.frame() - self.stats_frame;
            log::debug!("{:.1} fps", frames as f32 * STATS_HZ);
            self.stats_frame = self.clock.frame();
        }

        let (Some(window), Some(renderer), Some(showcase), Some(ui)) =
            (&self.window, &mut self.renderer, &mut self.showcase, &mut self.ui)
        else {
            return;
        };

        showcase.tick(delta);
        renderer.prepare(&showcase.camera, &showcase.scene);

        match renderer.render(window, |ctx| ui.draw(ctx, showcase)) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Render error: out of GPU memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Volcano")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    INITIAL_WINDOW_WIDTH,
                    INITIAL_WINDOW_HEIGHT,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match pollster::block_on(Renderer::new(window.clone())) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to initialize renderer: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        self.mount(&window);
        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // egui sees every event; the showcase decides on its own whether a
        // click landed on the overlay
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            renderer.handle_event(window, &event);
        }

        match event {
            WindowEvent::CloseRequested => {
                self.showcase = None;
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            event => {
                let Some(input) = self.input.translate(&event) else {
                    return;
                };

                if let (InputEvent::Resized { width, height }, Some(renderer)) = (input, &mut self.renderer) {
                    renderer.resize(winit::dpi::PhysicalSize::new(width, height));
                }

                let over_panel = match (input, &self.ui) {
                    (InputEvent::Click { x, y }, Some(ui)) => ui.overlay_contains(x, y),
                    _ => false,
                };

                if let Some(showcase) = &mut self.showcase {
                    showcase.handle_input(input, over_panel);
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Volcano showcase - scroll to spin, click the volcano, Escape to close the overlay");

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli);
    event_loop.run_app(&mut app)?;

    Ok(())
}

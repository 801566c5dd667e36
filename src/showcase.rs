use std::path::PathBuf;

use crate::camera::OrbitCamera;
use crate::core::input_adapter::InputEvent;
use crate::loaders::ModelLoader;
use crate::overlay::{ClickTarget, InstructionPanels, Overlay};
use crate::picking::{CursorStyle, PointerInteraction};
use crate::playlist::{PlaylistBrowser, PlaylistConfig, PlaylistFetch, TilePager};
use crate::scene::{Node, Scene};

/// How the playlist tiles are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistLayout {
    /// One horizontally scrolling strip
    Scroll,
    /// A fixed window of tiles with Next / Previous controls
    Paged { window: usize },
}

#[derive(Debug, Clone)]
pub struct ShowcaseOptions {
    pub model_path: PathBuf,
    pub playlist: Option<PlaylistConfig>,
    pub layout: PlaylistLayout,
    pub accelerated: bool,
}

/// Everything the showcase mutates, owned by the event loop thread.
///
/// Background work reports back through channels drained in [`Showcase::tick`].
/// Dropping the showcase cancels the playlist fetch; a model load still in
/// flight finishes on its own thread and is discarded.
pub struct Showcase {
    pub camera: OrbitCamera,
    pub scene: Scene,
    pub overlay: Overlay,
    pub pointer: PointerInteraction,
    pub playlist: Option<PlaylistBrowser>,
    pub pager: Option<TilePager>,
    accelerated: bool,
    loader: Option<ModelLoader>,
    fetch: Option<PlaylistFetch>,
}

impl Showcase {
    /// State with no background work started
    pub fn new(accelerated: bool, width: u32, height: u32) -> Self {
        Self {
            camera: OrbitCamera::new(width.max(1) as f32 / height.max(1) as f32),
            scene: Scene::showcase(),
            overlay: Overlay::new(InstructionPanels::for_capability(accelerated)),
            pointer: PointerInteraction::new(width, height),
            playlist: None,
            pager: None,
            accelerated,
            loader: None,
            fetch: None,
        }
    }

    /// Builds the state and starts the model load and playlist fetch
    pub fn mount(options: ShowcaseOptions, width: u32, height: u32) -> Self {
        let mut showcase = Self::new(options.accelerated, width, height);

        if options.accelerated {
            log::info!("Loading model {:?}", options.model_path);
            showcase.loader = Some(ModelLoader::spawn(options.model_path));
        } else {
            log::warn!("Accelerated rendering unavailable, showing the static fallback");
        }

        if let Some(config) = options.playlist {
            showcase.attach_playlist(config.playlist_id.clone(), options.layout);
            match PlaylistFetch::spawn(config) {
                Ok(fetch) => showcase.fetch = Some(fetch),
                Err(e) => log::error!("Error fetching playlist items: {:#}", e),
            }
        }

        showcase
    }

    /// Adds an empty playlist browser; tiles arrive later through events
    pub fn attach_playlist(&mut self, playlist_id: impl Into<String>, layout: PlaylistLayout) {
        self.playlist = Some(PlaylistBrowser::new(playlist_id));
        self.pager = match layout {
            PlaylistLayout::Scroll => None,
            PlaylistLayout::Paged { window } => Some(TilePager::new(window)),
        };
    }

    pub fn is_accelerated(&self) -> bool {
        self.accelerated
    }

    pub fn cursor(&self) -> CursorStyle {
        self.pointer.cursor()
    }

    pub fn add_model(&mut self, model: Node) {
        log::info!("Model {:?} added to the scene", model.name);
        self.scene.add(model);
    }

    /// Routes one input event. `over_panel` is true when a click landed on
    /// the overlay panel itself; such clicks stop there.
    pub fn handle_input(&mut self, event: InputEvent, over_panel: bool) {
        match event {
            InputEvent::Wheel { delta_y } => {
                if self.accelerated {
                    self.camera.apply_scroll(delta_y);
                }
            }
            InputEvent::PointerMoved { x, y } => {
                if self.accelerated {
                    self.pointer.on_pointer_move(x, y, &self.camera, &self.scene);
                }
            }
            InputEvent::Click { x, y } => {
                let target = if over_panel {
                    ClickTarget::Panel
                } else {
                    ClickTarget::Outside
                };
                if self.overlay.on_document_click(target) {
                    log::debug!("Outside click dismissed the overlay");
                }
                if target == ClickTarget::Outside && self.accelerated {
                    self.pointer
                        .on_click(x, y, &self.camera, &self.scene, &mut self.overlay);
                }
            }
            InputEvent::Escape => self.overlay.on_escape(),
            InputEvent::Resized { width, height } => {
                if width == 0 || height == 0 {
                    return;
                }
                self.camera.set_viewport(width, height);
                self.pointer.resize(width, height);
            }
        }
    }

    /// Fallback image stands in for the model
    pub fn on_fallback_click(&mut self) {
        self.overlay.show();
    }

    /// Per-frame update: drains background results, then advances timers
    /// and the camera
    pub fn tick(&mut self, delta: f32) {
        self.poll_model();
        self.drain_playlist();

        self.overlay.tick(delta);
        if let Some(pager) = &mut self.pager {
            pager.tick(delta);
        }
        if self.accelerated {
            self.camera.update();
        }
    }

    fn poll_model(&mut self) {
        let Some(loader) = &mut self.loader else {
            return;
        };
        match loader.poll() {
            Some(Ok(model)) => {
                self.loader = None;
                self.add_model(model);
            }
            Some(Err(e)) => {
                log::error!("An error happened: {:#}", e);
                self.loader = None;
            }
            None => {}
        }
    }

    fn drain_playlist(&mut self) {
        let (Some(fetch), Some(browser)) = (&self.fetch, &mut self.playlist) else {
            return;
        };
        for event in fetch.drain() {
            browser.apply(event);
        }
    }
}

impl Drop for Showcase {
    fn drop(&mut self) {
        if let Some(fetch) = &mut self.fetch {
            fetch.cancel();
        }
        log::debug!("Showcase torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayState;

    #[test]
    fn fallback_ignores_wheel() {
        let mut showcase = Showcase::new(false, 800, 600);
        showcase.handle_input(InputEvent::Wheel { delta_y: 100.0 }, false);
        assert_eq!(showcase.camera.state.scroll_velocity, 0.0);
    }

    #[test]
    fn wheel_spins_camera_when_accelerated() {
        let mut showcase = Showcase::new(true, 800, 600);
        showcase.handle_input(InputEvent::Wheel { delta_y: 10.0 }, false);
        assert!(showcase.camera.state.scroll_velocity > 0.0);
    }

    #[test]
    fn escape_hides_overlay() {
        let mut showcase = Showcase::new(true, 800, 600);
        showcase.on_fallback_click();
        showcase.tick(0.02);
        assert_eq!(showcase.overlay.state(), OverlayState::Visible);

        showcase.handle_input(InputEvent::Escape, false);
        assert_eq!(showcase.overlay.state(), OverlayState::Hiding);
    }

    #[test]
    fn zero_resize_is_ignored() {
        let mut showcase = Showcase::new(true, 800, 600);
        let before = showcase.camera.aspect;
        showcase.handle_input(InputEvent::Resized { width: 0, height: 0 }, false);
        assert_eq!(showcase.camera.aspect, before);
    }

    #[test]
    fn paged_layout_creates_pager() {
        let mut showcase = Showcase::new(true, 800, 600);
        showcase.attach_playlist("PL", PlaylistLayout::Paged { window: 3 });
        assert_eq!(showcase.pager.as_ref().map(TilePager::window), Some(3));
        showcase.attach_playlist("PL", PlaylistLayout::Scroll);
        assert!(showcase.pager.is_none());
    }
}

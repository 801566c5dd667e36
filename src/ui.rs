use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::overlay::{Display, Overlay};
use crate::picking::CursorStyle;
use crate::playlist::{playlist_url, FetchStatus, PagerAction, PlaylistBrowser, Thumbnail, Tile, TilePager};
use crate::showcase::Showcase;

pub const TILE_WIDTH: f32 = 160.0;
pub const TILE_HEIGHT: f32 = 90.0;

/// Default overlay width in points
const OVERLAY_WIDTH: f32 = 720.0;
const ACCENT: egui::Color32 = egui::Color32::from_rgb(74, 158, 255);

/// Reads the static image shown when the model can't be rendered
pub fn load_fallback_image(path: &Path) -> Result<egui::ColorImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to load fallback image: {:?}", path))?
        .to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

fn color_image(thumbnail: &Thumbnail) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied(
        [thumbnail.width as usize, thumbnail.height as usize],
        &thumbnail.rgba,
    )
}

/// egui-side state: uploaded textures and where the overlay was drawn
pub struct Ui {
    enabled: bool,
    thumbnails: HashMap<usize, egui::TextureHandle>,
    fallback_image: Option<egui::ColorImage>,
    fallback_texture: Option<egui::TextureHandle>,
    overlay_rect: Option<egui::Rect>,
    pixels_per_point: f32,
}

impl Ui {
    pub fn new(enabled: bool, fallback_image: Option<egui::ColorImage>) -> Self {
        Self {
            enabled,
            thumbnails: HashMap::new(),
            fallback_image,
            fallback_texture: None,
            overlay_rect: None,
            pixels_per_point: 1.0,
        }
    }

    /// Whether a point in physical window pixels falls on the overlay panel
    pub fn overlay_contains(&self, x: f32, y: f32) -> bool {
        let ppp = self.pixels_per_point.max(f32::EPSILON);
        self.overlay_rect
            .is_some_and(|rect| rect.contains(egui::pos2(x / ppp, y / ppp)))
    }

    pub fn draw(&mut self, ctx: &egui::Context, showcase: &mut Showcase) {
        self.pixels_per_point = ctx.pixels_per_point();

        if !showcase.is_accelerated() {
            self.draw_fallback(ctx, showcase);
        }

        if showcase.cursor() == CursorStyle::Pointer && !ctx.is_pointer_over_area() {
            ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        if !self.enabled {
            self.overlay_rect = None;
            return;
        }

        self.draw_instructions(ctx, showcase);

        let Showcase {
            overlay,
            playlist,
            pager,
            ..
        } = showcase;
        self.overlay_rect = self.draw_overlay(ctx, overlay, playlist.as_mut(), pager.as_mut());
    }

    fn draw_fallback(&mut self, ctx: &egui::Context, showcase: &mut Showcase) {
        if self.fallback_texture.is_none() {
            if let Some(image) = self.fallback_image.take() {
                self.fallback_texture =
                    Some(ctx.load_texture("fallback-image", image, egui::TextureOptions::LINEAR));
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                ui.centered_and_justified(|ui| match &self.fallback_texture {
                    Some(texture) => {
                        let image = egui::Image::new(egui::load::SizedTexture::from_handle(texture))
                            .max_size(ui.available_size() * 0.8)
                            .sense(egui::Sense::click());
                        if ui.add(image).clicked() {
                            showcase.on_fallback_click();
                        }
                    }
                    None => {
                        let label = egui::Label::new(egui::RichText::new("Volcano").size(48.0))
                            .sense(egui::Sense::click());
                        if ui.add(label).clicked() {
                            showcase.on_fallback_click();
                        }
                    }
                });
            });
    }

    fn draw_instructions(&self, ctx: &egui::Context, showcase: &Showcase) {
        let panels = showcase.overlay.panels();
        if !panels.instructions && !panels.hardware_hint {
            return;
        }

        egui::Area::new(egui::Id::new("instructions"))
            .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
            .interactable(false)
            .show(ctx, |ui| {
                if panels.instructions {
                    let text = if showcase.is_accelerated() {
                        "Scroll to spin the volcano. Click it to see the videos."
                    } else {
                        "Click the volcano to see the videos."
                    };
                    ui.label(egui::RichText::new(text).size(18.0).color(egui::Color32::WHITE));
                }
                if panels.hardware_hint {
                    ui.label(
                        egui::RichText::new("Enable hardware acceleration to see the volcano in 3D.")
                            .size(14.0)
                            .color(egui::Color32::LIGHT_GRAY),
                    );
                }
            });
    }

    fn draw_overlay(
        &mut self,
        ctx: &egui::Context,
        overlay: &mut Overlay,
        playlist: Option<&mut PlaylistBrowser>,
        pager: Option<&mut TilePager>,
    ) -> Option<egui::Rect> {
        if overlay.display() == Display::None {
            return None;
        }

        let opacity = overlay.opacity();
        let response = egui::Window::new("Videos")
            .id(egui::Id::new("overlay"))
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .default_width(OVERLAY_WIDTH)
            .show(ctx, |ui| {
                ui.set_opacity(opacity);
                ui.horizontal(|ui| {
                    ui.heading("Videos");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("✕").clicked() {
                            overlay.hide();
                        }
                    });
                });
                ui.separator();

                match playlist {
                    Some(browser) => {
                        self.upload_thumbnails(ctx, browser);
                        match pager {
                            Some(pager) => self.draw_paged(ui, browser, pager),
                            None => self.draw_strip(ui, browser),
                        }
                        draw_status(ui, browser);
                    }
                    None => {
                        ui.label("Playlist unavailable.");
                    }
                }
            });

        response.map(|r| r.response.rect)
    }

    /// Moves decoded thumbnails into egui textures, once per tile
    fn upload_thumbnails(&mut self, ctx: &egui::Context, browser: &mut PlaylistBrowser) {
        for tile in browser.tiles_mut() {
            if let Some(thumbnail) = tile.thumbnail.take() {
                let texture = ctx.load_texture(
                    format!("thumbnail-{}", tile.item.index),
                    color_image(&thumbnail),
                    egui::TextureOptions::LINEAR,
                );
                self.thumbnails.insert(tile.item.index, texture);
            }
        }
    }

    fn draw_strip(&self, ui: &mut egui::Ui, browser: &mut PlaylistBrowser) {
        let output = egui::ScrollArea::horizontal()
            .id_salt("playlist-strip")
            .horizontal_scroll_offset(browser.scroll_left())
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for (i, tile) in browser.tiles().iter().enumerate() {
                        if self.draw_tile(ui, tile).clicked() {
                            open_tile(ui.ctx(), browser, i);
                        }
                    }
                });
            });

        let strip = output.inner_rect;
        let wheel = ui.input(|i| i.raw_scroll_delta.y);
        if wheel != 0.0 && ui.rect_contains_pointer(strip) {
            // egui reports wheel-up as positive
            browser.on_wheel(-wheel, strip.width());
        }
        browser.clamp_scroll(output.content_size.x - strip.width());
    }

    fn draw_paged(&self, ui: &mut egui::Ui, browser: &mut PlaylistBrowser, pager: &mut TilePager) {
        let len = browser.tiles().len();

        ui.horizontal(|ui| {
            for (i, tile) in browser.tiles().iter().enumerate() {
                if pager.is_visible(i) && self.draw_tile(ui, tile).clicked() {
                    open_tile(ui.ctx(), browser, i);
                }
            }
        });

        ui.horizontal(|ui| {
            if ui
                .add_enabled(pager.start() > 0, egui::Button::new("Previous"))
                .clicked()
            {
                pager.retreat();
            }

            let label = pager.label(len).text();
            if ui
                .add_enabled(!pager.is_locked() && len > 0, egui::Button::new(label))
                .clicked()
                && pager.advance(len) == PagerAction::OpenPlaylist
            {
                ui.ctx()
                    .open_url(egui::OpenUrl::new_tab(playlist_url(browser.playlist_id())));
            }
        });
    }

    fn draw_tile(&self, ui: &mut egui::Ui, tile: &Tile) -> egui::Response {
        let inner = ui.vertical(|ui| {
            ui.set_width(TILE_WIDTH);
            let size = egui::vec2(TILE_WIDTH, TILE_HEIGHT);
            match self.thumbnails.get(&tile.item.index) {
                Some(texture) => {
                    ui.add(egui::Image::new(egui::load::SizedTexture::new(texture.id(), size)));
                }
                None => {
                    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                    ui.painter().rect_filled(rect, 4.0, egui::Color32::from_gray(40));
                }
            }
            ui.add(egui::Label::new(egui::RichText::new(&tile.item.title).color(ACCENT)).truncate());
        });

        inner
            .response
            .interact(egui::Sense::click())
            .on_hover_cursor(egui::CursorIcon::PointingHand)
    }
}

fn open_tile(ctx: &egui::Context, browser: &PlaylistBrowser, tile: usize) {
    if let Some(url) = browser.watch_url(tile) {
        log::info!("Opening {}", url);
        ctx.open_url(egui::OpenUrl::new_tab(url));
    }
}

fn draw_status(ui: &mut egui::Ui, browser: &PlaylistBrowser) {
    match browser.status() {
        FetchStatus::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading videos…");
            });
        }
        FetchStatus::Done if browser.tiles().is_empty() => {
            ui.label("This playlist is empty.");
        }
        FetchStatus::Done => {}
        FetchStatus::Failed(message) => {
            ui.colored_label(egui::Color32::LIGHT_RED, format!("Couldn't load every video: {}", message));
        }
    }
}

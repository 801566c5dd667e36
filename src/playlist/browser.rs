use super::api::{PageRequest, PlaylistError, PlaylistSource};
use super::item::PlaylistItem;

/// Fraction of the strip width one wheel event scrolls
pub const WHEEL_SCROLL_FRACTION: f32 = 0.5;

/// Fetches every page of a playlist, following continuation tokens until
/// the service stops returning one.
///
/// Items are handed to `on_item` in page-arrival order, numbered from 0.
/// On error, items already delivered stay delivered.
pub async fn fetch_all<S: PlaylistSource>(
    source: &S,
    playlist_id: &str,
    mut on_item: impl FnMut(PlaylistItem),
) -> Result<usize, PlaylistError> {
    let mut page_token = None;
    let mut index = 0;

    loop {
        let request = PageRequest::new(playlist_id, page_token.take());
        let page = source.fetch_page(&request).await?;

        for entry in page.items {
            on_item(PlaylistItem {
                video_id: entry.video_id,
                title: entry.title,
                index,
            });
            index += 1;
        }

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(index)
}

/// Decoded RGBA thumbnail
#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Thumbnail({}x{})", self.width, self.height)
    }
}

impl Thumbnail {
    pub fn decode(bytes: &[u8]) -> Result<Self, PlaylistError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Tile {
    pub item: PlaylistItem,
    /// Taken by the UI once uploaded as a texture
    pub thumbnail: Option<Thumbnail>,
}

/// Progress reported by a background fetch
#[derive(Debug, Clone)]
pub enum PlaylistEvent {
    Item(PlaylistItem),
    Thumbnail { index: usize, image: Thumbnail },
    Finished { count: usize },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Loading,
    Done,
    Failed(String),
}

/// Tiles of one playlist in arrival order plus the strip's scroll offset
#[derive(Debug, Clone)]
pub struct PlaylistBrowser {
    playlist_id: String,
    tiles: Vec<Tile>,
    status: FetchStatus,
    scroll_left: f32,
}

impl PlaylistBrowser {
    pub fn new(playlist_id: impl Into<String>) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            tiles: Vec::new(),
            status: FetchStatus::Loading,
            scroll_left: 0.0,
        }
    }

    pub fn playlist_id(&self) -> &str {
        &self.playlist_id
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn push(&mut self, item: PlaylistItem) {
        self.tiles.push(Tile { item, thumbnail: None });
    }

    pub fn apply(&mut self, event: PlaylistEvent) {
        match event {
            PlaylistEvent::Item(item) => self.push(item),
            PlaylistEvent::Thumbnail { index, image } => {
                match self.tiles.iter_mut().find(|t| t.item.index == index) {
                    Some(tile) => tile.thumbnail = Some(image),
                    None => log::debug!("Thumbnail for unknown tile {}", index),
                }
            }
            PlaylistEvent::Finished { count } => {
                log::info!("Playlist {} loaded: {} items", self.playlist_id, count);
                self.status = FetchStatus::Done;
            }
            PlaylistEvent::Failed(message) => {
                log::error!("Error fetching playlist items: {}", message);
                self.status = FetchStatus::Failed(message);
            }
        }
    }

    /// Link opened when a tile is clicked
    pub fn watch_url(&self, tile: usize) -> Option<String> {
        self.tiles.get(tile).map(|t| t.item.watch_url(&self.playlist_id))
    }

    pub fn scroll_left(&self) -> f32 {
        self.scroll_left
    }

    /// Wheel over the strip pages it sideways by half its width
    pub fn on_wheel(&mut self, delta_y: f32, strip_width: f32) {
        let step = strip_width * WHEEL_SCROLL_FRACTION;
        if delta_y > 0.0 {
            self.scroll_left += step;
        } else if delta_y < 0.0 {
            self.scroll_left -= step;
        }
        self.scroll_left = self.scroll_left.max(0.0);
    }

    /// Keeps the offset inside the laid-out content
    pub fn clamp_scroll(&mut self, max_scroll: f32) {
        self.scroll_left = self.scroll_left.clamp(0.0, max_scroll.max(0.0));
    }
}

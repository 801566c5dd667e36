pub mod api;
pub mod browser;
pub mod item;
pub mod pager;
pub mod worker;

pub use api::{ApiCredentials, PageEntry, PageRequest, PlaylistError, PlaylistPage, PlaylistSource, YouTubeClient};
pub use browser::{fetch_all, FetchStatus, PlaylistBrowser, PlaylistEvent, Thumbnail, Tile};
pub use item::{playlist_url, thumbnail_url, watch_url, PlaylistItem};
pub use pager::{AdvanceLabel, PagerAction, TilePager};
pub use worker::{PlaylistConfig, PlaylistFetch};

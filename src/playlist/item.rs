/// One playlist entry, numbered in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistItem {
    pub video_id: String,
    pub title: String,
    /// Position in the playlist, counted from 0 across all pages
    pub index: usize,
}

impl PlaylistItem {
    pub fn thumbnail_url(&self) -> String {
        thumbnail_url(&self.video_id)
    }

    pub fn watch_url(&self, playlist_id: &str) -> String {
        watch_url(&self.video_id, playlist_id, self.index)
    }
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/mqdefault.jpg", video_id)
}

pub fn watch_url(video_id: &str, playlist_id: &str, index: usize) -> String {
    format!(
        "https://www.youtube.com/watch?v={}&list={}&index={}",
        video_id, playlist_id, index
    )
}

pub fn playlist_url(playlist_id: &str) -> String {
    format!("https://www.youtube.com/playlist?list={}", playlist_id)
}

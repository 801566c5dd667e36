// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::playlist::{ApiCredentials, PlaylistConfig};
use crate::showcase::PlaylistLayout;

#[derive(Parser, Debug, Clone)]
#[command(name = "volcano-showcase")]
#[command(about = "Rotating volcano model with a YouTube playlist overlay", long_about = None)]
pub struct Cli {
    /// glTF/GLB model to display
    #[arg(long, default_value = "assets/models/volc.glb")]
    pub model: PathBuf,

    /// Image shown instead of the model when 3D acceleration is unavailable
    #[arg(long = "fallback-image", default_value = "assets/imgs/volcano.png")]
    pub fallback_image: PathBuf,

    /// Playlist to list in the overlay
    #[arg(long = "playlist-id", env = "YOUTUBE_PLAYLIST_ID")]
    pub playlist_id: Option<String>,

    /// YouTube Data API key
    #[arg(long = "api-key", env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OAuth client id, only reported in logs
    #[arg(long = "client-id", env = "YOUTUBE_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Show the playlist a few tiles at a time with Next/Previous buttons
    #[arg(long, default_value = "false")]
    pub paged: bool,

    /// Tiles visible at once in paged mode
    #[arg(long = "window-tiles", default_value = "4")]
    pub window_tiles: usize,

    /// Disable the instruction and overlay UI
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Skip the capability probe and use the static fallback
    #[arg(long = "force-fallback", default_value = "false")]
    pub force_fallback: bool,
}

impl Cli {
    pub fn layout(&self) -> PlaylistLayout {
        if self.paged {
            PlaylistLayout::Paged {
                window: self.window_tiles,
            }
        } else {
            PlaylistLayout::Scroll
        }
    }

    /// Playlist settings, or `None` with a warning when the key or the
    /// playlist id is missing
    pub fn playlist_config(&self) -> Option<PlaylistConfig> {
        let Some(playlist_id) = self.playlist_id.clone().filter(|id| !id.is_empty()) else {
            log::warn!("No playlist id configured, playlist browser disabled");
            return None;
        };
        let Some(api_key) = self.api_key.clone().filter(|key| !key.is_empty()) else {
            log::warn!("No YouTube API key configured, playlist browser disabled");
            return None;
        };

        Some(PlaylistConfig {
            credentials: ApiCredentials {
                api_key,
                client_id: self.client_id.clone(),
            },
            playlist_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("volcano-showcase").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_point_at_bundled_assets() {
        let cli = parse(&[]);
        assert_eq!(cli.model, PathBuf::from("assets/models/volc.glb"));
        assert_eq!(cli.fallback_image, PathBuf::from("assets/imgs/volcano.png"));
        assert!(!cli.no_ui);
    }

    #[test]
    fn paged_flag_selects_layout() {
        assert_eq!(parse(&["--paged", "--window-tiles", "3"]).layout(), PlaylistLayout::Paged { window: 3 });
        assert_eq!(parse(&["--window-tiles", "3"]).layout(), PlaylistLayout::Scroll);
    }

    #[test]
    fn playlist_needs_key_and_id() {
        let cli = parse(&["--playlist-id", "PL1", "--api-key", "k"]);
        let config = cli.playlist_config().map(|c| (c.playlist_id, c.credentials.api_key));
        assert_eq!(config, Some(("PL1".to_string(), "k".to_string())));

        let cli = parse(&["--playlist-id", "PL1", "--api-key", ""]);
        assert!(cli.playlist_config().is_none());
    }
}

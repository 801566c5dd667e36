use std::future::Future;
use std::sync::mpsc;
use std::thread::JoinHandle;

use futures::StreamExt;
use tokio::sync::oneshot;

use super::api::{ApiCredentials, PlaylistError, PlaylistSource, YouTubeClient};
use super::browser::{fetch_all, PlaylistEvent, Thumbnail};

/// Parallel thumbnail downloads
const THUMBNAIL_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct PlaylistConfig {
    pub credentials: ApiCredentials,
    pub playlist_id: String,
}

/// Handle to a playlist fetch running on its own thread.
///
/// Events are drained by the frame loop. Dropping the handle cancels
/// whatever is still in flight.
pub struct PlaylistFetch {
    events: mpsc::Receiver<PlaylistEvent>,
    cancel: Option<oneshot::Sender<()>>,
    _thread: JoinHandle<()>,
}

impl PlaylistFetch {
    pub fn spawn(config: PlaylistConfig) -> anyhow::Result<Self> {
        let client = YouTubeClient::new(config.credentials)?;
        Self::spawn_with(client, config.playlist_id)
    }

    /// Runs the fetch against an already configured client
    pub fn spawn_with(client: YouTubeClient, playlist_id: String) -> anyhow::Result<Self> {
        let (event_tx, events) = mpsc::channel();
        let (cancel, cancelled) = oneshot::channel();

        let thread = std::thread::Builder::new()
            .name("playlist-fetch".into())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        let _ = event_tx.send(PlaylistEvent::Failed(format!("runtime: {}", e)));
                        return;
                    }
                };

                runtime.block_on(async move {
                    let client = &client;
                    let download = move |url| download_thumbnail(client, url);

                    // Cancellation wins when a response lands in the same poll
                    tokio::select! {
                        biased;
                        _ = cancelled => {
                            log::info!("Playlist fetch cancelled");
                        }
                        _ = run(client, &playlist_id, &event_tx, download) => {}
                    }
                });
            })?;

        Ok(Self {
            events,
            cancel: Some(cancel),
            _thread: thread,
        })
    }

    /// Events received since the last call, in order
    pub fn drain(&self) -> impl Iterator<Item = PlaylistEvent> + '_ {
        self.events.try_iter()
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }
}

impl Drop for PlaylistFetch {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Pages through the playlist while thumbnails of items already seen
/// download alongside
async fn run<S, F, Fut>(
    source: &S,
    playlist_id: &str,
    events: &mpsc::Sender<PlaylistEvent>,
    fetch_thumbnail: F,
) where
    S: PlaylistSource,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Thumbnail, PlaylistError>>,
{
    let (thumbnail_tx, thumbnail_rx) = futures::channel::mpsc::unbounded::<(usize, String)>();

    let paging = async move {
        let result = fetch_all(source, playlist_id, |item| {
            let _ = thumbnail_tx.unbounded_send((item.index, item.thumbnail_url()));
            // Receiver gone means the showcase is shutting down
            let _ = events.send(PlaylistEvent::Item(item));
        })
        .await;

        match result {
            Ok(count) => {
                let _ = events.send(PlaylistEvent::Finished { count });
            }
            Err(e) => {
                let _ = events.send(PlaylistEvent::Failed(e.to_string()));
            }
        }
        // Ends the download stream once queued thumbnails are done
        drop(thumbnail_tx);
    };

    let fetch_thumbnail = &fetch_thumbnail;
    let thumbnails = thumbnail_rx.for_each_concurrent(THUMBNAIL_CONCURRENCY, |(index, url)| async move {
        match fetch_thumbnail(url.clone()).await {
            Ok(image) => {
                let _ = events.send(PlaylistEvent::Thumbnail { index, image });
            }
            Err(e) => log::warn!("Thumbnail {} failed: {}", url, e),
        }
    });

    futures::join!(paging, thumbnails);
}

async fn download_thumbnail(client: &YouTubeClient, url: String) -> Result<Thumbnail, PlaylistError> {
    let bytes = client.fetch_bytes(&url).await?;
    Thumbnail::decode(&bytes)
}

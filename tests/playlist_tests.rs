use std::collections::VecDeque;
use std::sync::Mutex;

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use volcano_showcase::playlist::{
    fetch_all, AdvanceLabel, ApiCredentials, PageEntry, PageRequest, PagerAction, PlaylistBrowser,
    PlaylistError, PlaylistEvent, PlaylistFetch, PlaylistItem, PlaylistPage, PlaylistSource, TilePager,
    YouTubeClient,
};
use volcano_showcase::playlist::pager::{ADVANCE_DELAY, NEAR_END_DELAY_FACTOR};

/// Serves canned pages in order and records every request
struct MockSource {
    pages: Mutex<VecDeque<Result<PlaylistPage, PlaylistError>>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl MockSource {
    fn new(pages: Vec<Result<PlaylistPage, PlaylistError>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl PlaylistSource for MockSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PlaylistPage, PlaylistError> {
        self.requests.lock().unwrap().push(request.clone());
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(PlaylistError::Cancelled))
    }
}

fn page(ids: &[&str], next: Option<&str>) -> Result<PlaylistPage, PlaylistError> {
    Ok(PlaylistPage {
        items: ids
            .iter()
            .map(|id| PageEntry {
                video_id: id.to_string(),
                title: format!("Title {}", id),
            })
            .collect(),
        next_page_token: next.map(str::to_string),
    })
}

fn collect(source: &MockSource) -> (Vec<PlaylistItem>, Result<usize, PlaylistError>) {
    let mut items = Vec::new();
    let result = pollster::block_on(fetch_all(source, "PL123", |item| items.push(item)));
    (items, result)
}

#[cfg(test)]
mod fetch_tests {
    use super::*;

    #[test]
    fn test_two_pages_arrive_in_order_with_two_calls() {
        let source = MockSource::new(vec![page(&["a", "b"], Some("T2")), page(&["c"], None)]);

        let (items, result) = collect(&source);

        assert_eq!(result.unwrap(), 3);
        let ids: Vec<_> = items.iter().map(|i| i.video_id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        let indices: Vec<_> = items.iter().map(|i| i.index).collect();
        assert_eq!(indices, [0, 1, 2]);

        let requests = source.requests();
        assert_eq!(requests.len(), 2, "exactly one call per page");
        assert_eq!(requests[0].page_token, None);
        assert_eq!(requests[1].page_token.as_deref(), Some("T2"));
        assert!(requests.iter().all(|r| r.playlist_id == "PL123"));
    }

    #[test]
    fn test_requested_page_size_is_clamped() {
        let source = MockSource::new(vec![page(&["a"], None)]);
        collect(&source);
        assert_eq!(source.requests()[0].max_results, 50);
    }

    #[test]
    fn test_failure_keeps_items_already_delivered() {
        let source = MockSource::new(vec![
            page(&["a", "b"], Some("T2")),
            Err(PlaylistError::Status {
                status: 403,
                body: "quotaExceeded".into(),
            }),
        ]);

        let (items, result) = collect(&source);

        assert_eq!(items.len(), 2);
        assert!(matches!(result, Err(PlaylistError::Status { status: 403, .. })));
        assert_eq!(source.requests().len(), 2, "no retry after failure");
    }

    #[test]
    fn test_browser_keeps_tiles_after_failure() {
        let mut browser = PlaylistBrowser::new("PL123");
        let source = MockSource::new(vec![page(&["a"], Some("T2")), Err(PlaylistError::Cancelled)]);

        let mut events = Vec::new();
        let result = pollster::block_on(fetch_all(&source, "PL123", |item| {
            events.push(PlaylistEvent::Item(item))
        }));
        if let Err(e) = result {
            events.push(PlaylistEvent::Failed(e.to_string()));
        }
        for event in events {
            browser.apply(event);
        }

        assert_eq!(browser.tiles().len(), 1);
        assert_eq!(
            browser.watch_url(0).as_deref(),
            Some("https://www.youtube.com/watch?v=a&list=PL123&index=0")
        );
    }
}

#[cfg(test)]
mod pager_tests {
    use super::*;

    #[test]
    fn test_label_switches_at_end() {
        let mut pager = TilePager::new(3);
        let len = 5;
        assert_eq!(pager.label(len), AdvanceLabel::Next);

        assert_eq!(pager.advance(len), PagerAction::Moved);
        pager.tick(1.0);
        assert_eq!(pager.label(len), AdvanceLabel::Next);

        assert_eq!(pager.advance(len), PagerAction::Moved);
        pager.tick(1.0);
        assert_eq!(pager.label(len), AdvanceLabel::OpenFullPlaylist);
        assert_eq!(pager.label(len).text(), "Open full playlist");

        assert_eq!(pager.advance(len), PagerAction::OpenPlaylist);
        assert_eq!(pager.start(), 2);
    }

    #[test]
    fn test_debounce_blocks_repeated_advance() {
        let mut pager = TilePager::new(2);
        assert_eq!(pager.advance(20), PagerAction::Moved);
        assert!(pager.is_locked());
        assert_eq!(pager.advance(20), PagerAction::Ignored);
        assert_eq!(pager.start(), 1);

        pager.tick(ADVANCE_DELAY / 2.0);
        assert_eq!(pager.advance(20), PagerAction::Ignored);

        pager.tick(ADVANCE_DELAY);
        assert!(!pager.is_locked());
        assert_eq!(pager.advance(20), PagerAction::Moved);
        assert_eq!(pager.start(), 2);
    }

    #[test]
    fn test_delay_triples_near_end() {
        let mut pager = TilePager::new(2);
        pager.advance(10);
        assert_eq!(pager.lock_duration(), ADVANCE_DELAY);

        // window 2 over 4 tiles: after one move only one more remains
        let mut pager = TilePager::new(2);
        pager.advance(4);
        assert_eq!(pager.lock_duration(), ADVANCE_DELAY * NEAR_END_DELAY_FACTOR);

        pager.tick(ADVANCE_DELAY + 0.01);
        assert!(pager.is_locked(), "near-end lock outlasts the normal delay");
        pager.tick(ADVANCE_DELAY * NEAR_END_DELAY_FACTOR);
        assert!(!pager.is_locked());
    }

    #[test]
    fn test_retreat_is_not_debounced() {
        let mut pager = TilePager::new(1);
        pager.advance(10);
        pager.tick(1.0);
        pager.advance(10);
        assert!(pager.is_locked());

        assert_eq!(pager.retreat(), PagerAction::Moved);
        assert_eq!(pager.retreat(), PagerAction::Moved);
        assert_eq!(pager.retreat(), PagerAction::Ignored);
    }
}

#[cfg(test)]
mod scroll_tests {
    use super::*;

    #[test]
    fn test_wheel_scrolls_half_strip_per_event() {
        let mut browser = PlaylistBrowser::new("PL");
        browser.on_wheel(3.0, 800.0);
        assert_eq!(browser.scroll_left(), 400.0);
        browser.on_wheel(120.0, 800.0);
        assert_eq!(browser.scroll_left(), 800.0);
        browser.on_wheel(-1.0, 800.0);
        assert_eq!(browser.scroll_left(), 400.0);
    }

    #[test]
    fn test_scroll_never_goes_negative_or_past_content() {
        let mut browser = PlaylistBrowser::new("PL");
        browser.on_wheel(-10.0, 800.0);
        assert_eq!(browser.scroll_left(), 0.0);

        browser.on_wheel(10.0, 800.0);
        browser.on_wheel(10.0, 800.0);
        browser.clamp_scroll(500.0);
        assert_eq!(browser.scroll_left(), 500.0);
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Local listener plus a client whose endpoint points at it
async fn local_api() -> (TcpListener, YouTubeClient) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/youtube/v3/playlistItems", listener.local_addr().unwrap());
    let client = YouTubeClient::new(ApiCredentials {
        api_key: "test-key".into(),
        client_id: None,
    })
    .unwrap()
    .with_endpoint(endpoint);
    (listener, client)
}

/// Reads one request head, answers it and returns the request line
async fn respond(stream: &mut TcpStream, status: &str, body: &str) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    // The client may already be gone after a cancel
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;

    String::from_utf8_lossy(&head)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

fn page_json(ids: &[&str], next: Option<&str>) -> String {
    let items: Vec<_> = ids
        .iter()
        .map(|id| serde_json::json!({"snippet": {"title": format!("Title {}", id), "resourceId": {"videoId": id}}}))
        .collect();
    serde_json::json!({"items": items, "nextPageToken": next}).to_string()
}

fn count_items(events: impl Iterator<Item = PlaylistEvent>) -> usize {
    events.filter(|e| matches!(e, PlaylistEvent::Item(_))).count()
}

#[cfg(test)]
mod http_tests {
    use super::*;

    #[test]
    fn test_non_success_status_is_status_error() {
        runtime().block_on(async {
            let (listener, client) = local_api().await;
            let server = tokio::spawn(async move {
                let (mut stream, _) = listener.accept().await.unwrap();
                respond(&mut stream, "403 Forbidden", r#"{"error": {"code": 403, "message": "quotaExceeded"}}"#).await
            });

            let result = client.fetch_page(&PageRequest::new("PL1", None)).await;
            let request_line = server.await.unwrap();

            match result {
                Err(PlaylistError::Status { status, body }) => {
                    assert_eq!(status, 403);
                    assert!(body.contains("quotaExceeded"));
                }
                other => panic!("expected a status error, got {:?}", other),
            }
            assert!(request_line.starts_with("GET /youtube/v3/playlistItems?"));
            assert!(request_line.contains("key=test-key"));
            assert!(request_line.contains("playlistId=PL1"));
            assert!(request_line.contains("maxResults=50"));
        });
    }

    #[test]
    fn test_success_body_is_parsed_with_token() {
        runtime().block_on(async {
            let (listener, client) = local_api().await;
            let server = tokio::spawn(async move {
                let (mut stream, _) = listener.accept().await.unwrap();
                respond(&mut stream, "200 OK", &page_json(&["v1", "v2"], None)).await
            });

            let request = PageRequest::new("PL1", Some("T2".into()));
            let page = client.fetch_page(&request).await.unwrap();
            let request_line = server.await.unwrap();

            let ids: Vec<_> = page.items.iter().map(|e| e.video_id.as_str()).collect();
            assert_eq!(ids, ["v1", "v2"]);
            assert!(page.next_page_token.is_none());
            assert!(request_line.contains("pageToken=T2"));
        });
    }
}

#[cfg(test)]
mod cancel_tests {
    use super::*;

    #[test]
    fn test_cancelled_fetch_delivers_no_further_items() {
        runtime().block_on(async {
            let (listener, client) = local_api().await;
            let (second_requested, second_seen) = tokio::sync::oneshot::channel();
            let (release, released) = tokio::sync::oneshot::channel::<()>();

            let server = tokio::spawn(async move {
                let (mut first, _) = listener.accept().await.unwrap();
                respond(&mut first, "200 OK", &page_json(&["a", "b"], Some("T2"))).await;

                // Second page is held back until the fetch has been cancelled
                let (mut second, _) = listener.accept().await.unwrap();
                let _ = second_requested.send(());
                let _ = released.await;
                respond(&mut second, "200 OK", &page_json(&["c"], None)).await;
            });

            let mut fetch = PlaylistFetch::spawn_with(client, "PL1".into()).unwrap();
            second_seen.await.unwrap();
            assert_eq!(count_items(fetch.drain()), 2, "first page arrives before the second is requested");

            fetch.cancel();
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = release.send(());
            let _ = server.await;
            tokio::time::sleep(Duration::from_millis(100)).await;

            let late: Vec<_> = fetch.drain().collect();
            assert_eq!(count_items(late.iter().cloned()), 0);
            assert!(!late.iter().any(|e| matches!(e, PlaylistEvent::Finished { .. })));
        });
    }

    #[test]
    fn test_dropping_fetch_stops_paging() {
        runtime().block_on(async {
            let (listener, client) = local_api().await;

            let fetch = PlaylistFetch::spawn_with(client, "PL1".into()).unwrap();
            let (mut first, _) = listener.accept().await.unwrap();

            drop(fetch);
            tokio::time::sleep(Duration::from_millis(100)).await;
            respond(&mut first, "200 OK", &page_json(&["a"], Some("T2"))).await;

            let next = tokio::time::timeout(Duration::from_millis(300), listener.accept()).await;
            assert!(next.is_err(), "no page request after the handle is dropped");
        });
    }
}

use crate::domain::model::VideoHit;
use crate::domain::ports::VideoSearch;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const SERVICE: &str = "youtube";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchListResponse {
    items: Vec<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResult {
    id: ResourceId,
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Snippet {
    title: String,
}

/// YouTube Data API v3 `search.list`, one video result.
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search(&self, query: &str) -> Result<Option<VideoHit>> {
        let url = format!("{}/youtube/v3/search", self.base_url.trim_end_matches('/'));

        tracing::debug!(%query, "Searching videos");
        let response = self
            .client
            .get(url)
            .query(&[
                ("part", "snippet"),
                ("maxResults", "1"),
                ("type", "video"),
                ("q", query),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                service: SERVICE.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SearchListResponse = response.json().await?;
        Ok(parsed.items.into_iter().find_map(|item| {
            item.id.video_id.map(|video_id| VideoHit {
                title: item.snippet.title,
                video_id,
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_first_video_is_returned() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/youtube/v3/search")
                .query_param("part", "snippet")
                .query_param("maxResults", "1")
                .query_param("type", "video")
                .query_param("q", "Photosynthesis Hindi for students")
                .query_param("key", "yt-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "kind": "youtube#searchListResponse",
                    "items": [{
                        "id": {"kind": "youtube#video", "videoId": "abc123XYZ"},
                        "snippet": {"title": "Photosynthesis explained"}
                    }]
                }));
        });

        let client = YouTubeClient::new(server.base_url(), "yt-key");
        let hit = client
            .search("Photosynthesis Hindi for students")
            .await
            .unwrap()
            .unwrap();

        api_mock.assert();
        assert_eq!(hit.title, "Photosynthesis explained");
        assert_eq!(hit.watch_url(), "https://www.youtube.com/watch?v=abc123XYZ");
    }

    #[tokio::test]
    async fn test_no_items_is_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/youtube/v3/search");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"items": []}));
        });

        let client = YouTubeClient::new(server.base_url(), "yt-key");
        assert!(client.search("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_forbidden_is_upstream_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/youtube/v3/search");
            then.status(403).body("quotaExceeded");
        });

        let client = YouTubeClient::new(server.base_url(), "yt-key");
        let err = client.search("anything").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: 403, .. }));
    }
}

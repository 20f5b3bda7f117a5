//! SteamGridDB API client.
//!
//! Async HTTP client using `reqwest` with Bearer token authentication.

use std::time::Duration;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::types::{ApiResponse, GridImage, SearchResult};

const DEFAULT_BASE_URL: &str = "https://www.steamgriddb.com/api/v2";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Vertical box art, the shape Sunshine's app grid renders.
const GRID_DIMENSIONS: &str = "600x900";

/// Errors from the SteamGridDB client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid API key")]
    InvalidKey,
}

/// SteamGridDB API client.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a new client with the given API key.
    pub fn new(api_key: &str) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| Error::InvalidKey)?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Sets a custom base URL (for testing).
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Performs an authenticated GET request.
    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Vec<u8>, Error> {
        let url = format!("{}{}", self.base_url, endpoint);
        let resp = self.http.get(&url).query(params).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.bytes().await?.to_vec())
    }

    /// Searches for games by name.
    pub async fn search(&self, term: &str) -> Result<Vec<SearchResult>, Error> {
        let encoded = utf8_percent_encode(term, NON_ALPHANUMERIC).to_string();
        let body = self
            .get(&format!("/search/autocomplete/{encoded}"), &[])
            .await?;
        let resp: ApiResponse<Vec<SearchResult>> = serde_json::from_slice(&body)?;
        Ok(resp.data)
    }

    /// Returns static 600x900 grid images for a game, best scored first.
    pub async fn grids(&self, game_id: i64) -> Result<Vec<GridImage>, Error> {
        let params = [("dimensions", GRID_DIMENSIONS), ("types", "static")];
        let body = self.get(&format!("/grids/game/{game_id}"), &params).await?;
        let resp: ApiResponse<Vec<GridImage>> = serde_json::from_slice(&body)?;
        Ok(resp.data)
    }

    /// Downloads an image, returning its bytes and content type.
    pub async fn download(&self, url: &str) -> Result<(Vec<u8>, String), Error> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: "download failed".into(),
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();

        Ok((resp.bytes().await?.to_vec(), content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Starts a mock HTTP server that responds once with the given status,
    /// content type, and body.
    async fn mock_server(
        status: u16,
        content_type: &str,
        body: &str,
    ) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let content_type = content_type.to_string();
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let mut request = Vec::new();
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                if let Ok(n) = stream.read(&mut buf).await {
                    request.extend_from_slice(&buf[..n]);
                }

                let resp = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
            request
        });

        (url, handle)
    }

    #[tokio::test]
    async fn search_returns_results() {
        let json = r#"{"success":true,"data":[
            {"id":1,"name":"Celeste","types":["steam"],"verified":true},
            {"id":2,"name":"Celeste Classic"}
        ]}"#;
        let (url, handle) = mock_server(200, "application/json", json).await;

        let client = Client::new("test-key").unwrap().with_base_url(url);
        let results = client.search("Celeste").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Celeste");
        assert!(results[0].verified);

        let request = String::from_utf8(handle.await.unwrap()).unwrap();
        assert!(request.to_lowercase().contains("authorization: bearer test-key"));
    }

    #[tokio::test]
    async fn search_percent_encodes_term() {
        let json = r#"{"success":true,"data":[]}"#;
        let (url, handle) = mock_server(200, "application/json", json).await;

        let client = Client::new("test-key").unwrap().with_base_url(url);
        client.search("The Witcher 3: Wild Hunt").await.unwrap();

        let request = String::from_utf8(handle.await.unwrap()).unwrap();
        assert!(request.contains("/search/autocomplete/The%20Witcher%203%3A%20Wild%20Hunt"));
    }

    #[tokio::test]
    async fn grids_requests_static_box_art() {
        let json = r#"{"success":true,"data":[
            {"id":100,"url":"https://example.com/grid.png","width":600,"height":900}
        ]}"#;
        let (url, handle) = mock_server(200, "application/json", json).await;

        let client = Client::new("test-key").unwrap().with_base_url(url);
        let grids = client.grids(42).await.unwrap();

        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].width, 600);

        let request = String::from_utf8(handle.await.unwrap()).unwrap();
        assert!(request.contains("/grids/game/42"));
        assert!(request.contains("dimensions=600x900"));
        assert!(request.contains("types=static"));
    }

    #[tokio::test]
    async fn download_returns_bytes_and_content_type() {
        let (url, handle) = mock_server(200, "image/png", "fake-png-bytes").await;

        let client = Client::new("test-key").unwrap().with_base_url(url.clone());
        let (data, content_type) = client.download(&url).await.unwrap();

        assert_eq!(data, b"fake-png-bytes");
        assert_eq!(content_type, "image/png");
        handle.abort();
    }

    #[tokio::test]
    async fn search_api_error() {
        let (url, handle) = mock_server(
            401,
            "application/json",
            r#"{"success":false,"errors":["Unauthorized"]}"#,
        )
        .await;

        let client = Client::new("bad-key").unwrap().with_base_url(url);
        let err = client.search("test").await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 401, .. }), "{err}");
        handle.abort();
    }

    #[tokio::test]
    async fn download_error_status() {
        let (url, handle) = mock_server(404, "text/plain", "gone").await;

        let client = Client::new("test-key").unwrap().with_base_url(url.clone());
        let err = client.download(&url).await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 404, .. }));
        handle.abort();
    }

    #[test]
    fn client_new_succeeds() {
        assert!(Client::new("valid-key").is_ok());
    }

    #[test]
    fn client_rejects_unprintable_key() {
        assert!(matches!(Client::new("bad\nkey"), Err(Error::InvalidKey)));
    }
}

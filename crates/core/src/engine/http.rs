//! HTTP client for the remote engine's REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;

use super::{
    DownloadEngine, DownloadFiles, DownloadsResponse, EngineError, RemoteDownload, RemoteFile,
    RunState,
};

/// Header carrying the engine API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Engine client speaking the `/downloads` REST API.
pub struct HttpEngineClient {
    client: Client,
    base_url: Url,
    api_key: String,
    destination: String,
    anon_hops: u8,
    safe_seeding: bool,
}

/// Body of `PUT /downloads`.
#[derive(Debug, Serialize)]
struct AddDownloadBody<'a> {
    anon_hops: u8,
    safe_seeding: bool,
    uri: &'a str,
    destination: &'a str,
}

/// Response of `PUT /downloads`.
#[derive(Debug, Deserialize)]
struct AddDownloadResponse {
    infohash: String,
}

#[derive(Debug, Serialize)]
struct DeleteDownloadBody {
    remove_data: bool,
}

#[derive(Debug, Serialize)]
struct UpdateDownloadBody {
    state: RunState,
}

impl HttpEngineClient {
    /// Create a new engine client.
    ///
    /// Fails with [`EngineError::Configuration`] when the URL or API key is
    /// missing, so a misconfigured client can never reach the network.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        if config.url.trim().is_empty() {
            return Err(EngineError::Configuration(
                "engine url is not set".to_string(),
            ));
        }
        if config.api_key.is_empty() {
            return Err(EngineError::Configuration(
                "engine api key is not set".to_string(),
            ));
        }

        let base_url = Url::parse(config.url.trim()).map_err(|e| {
            EngineError::Configuration(format!("invalid engine url {:?}: {}", config.url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .danger_accept_invalid_certs(config.tls_skip_verify)
            .build()
            .map_err(|e| EngineError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            destination: config.download_dir.clone(),
            anon_hops: config.anon_hops,
            safe_seeding: config.safe_seeding,
        })
    }

    /// Build a request for an absolute API path (replaces any base path).
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, EngineError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| EngineError::Configuration(format!("invalid path {}: {}", path, e)))?;
        debug!(%method, %url, "engine request");
        Ok(self
            .client
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key))
    }

    /// Send a request and return the body of a 2xx response.
    async fn execute(&self, request: RequestBuilder) -> Result<String, EngineError> {
        self.execute_for(request, None).await
    }

    /// Like [`execute`](Self::execute), for a request addressing one
    /// download: a 404 means the engine does not know `hash`.
    async fn execute_for(
        &self,
        request: RequestBuilder,
        hash: Option<&str>,
    ) -> Result<String, EngineError> {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        if let (StatusCode::NOT_FOUND, Some(hash)) = (status, hash) {
            return Err(EngineError::NotFound(hash.to_string()));
        }
        if !status.is_success() {
            return Err(EngineError::Remote {
                status: status.as_u16(),
                status_line: status.to_string(),
            });
        }

        response.text().await.map_err(transport_error)
    }

    async fn list_downloads_filtered(
        &self,
        hash: Option<&str>,
    ) -> Result<Vec<RemoteDownload>, EngineError> {
        let mut request = self.request(Method::GET, "/downloads")?;
        if let Some(hash) = hash {
            request = request.query(&[("infohash", hash)]);
        }
        let body = self.execute(request).await?;
        let response: DownloadsResponse = decode(&body)?;
        Ok(response.downloads)
    }
}

fn transport_error(e: reqwest::Error) -> EngineError {
    if e.is_timeout() {
        EngineError::Transport(format!("request timed out: {}", e))
    } else {
        EngineError::Transport(e.to_string())
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, EngineError> {
    serde_json::from_str(body).map_err(|e| EngineError::Decode(e.to_string()))
}

#[async_trait]
impl DownloadEngine for HttpEngineClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_downloads(&self) -> Result<Vec<RemoteDownload>, EngineError> {
        self.list_downloads_filtered(None).await
    }

    async fn get_download(&self, hash: &str) -> Result<RemoteDownload, EngineError> {
        let downloads = self.list_downloads_filtered(Some(hash)).await?;

        // The filter is advisory on some engine versions; match explicitly.
        downloads
            .into_iter()
            .find(|d| d.infohash.eq_ignore_ascii_case(hash))
            .ok_or_else(|| EngineError::NotFound(hash.to_string()))
    }

    async fn add_download(&self, uri: &str) -> Result<String, EngineError> {
        let body = AddDownloadBody {
            anon_hops: self.anon_hops,
            safe_seeding: self.safe_seeding,
            uri,
            destination: &self.destination,
        };
        let request = self.request(Method::PUT, "/downloads")?.json(&body);
        let response: AddDownloadResponse = decode(&self.execute(request).await?)?;
        Ok(response.infohash.to_lowercase())
    }

    async fn delete_download(&self, hash: &str, remove_data: bool) -> Result<(), EngineError> {
        let request = self
            .request(Method::DELETE, &format!("/downloads/{}", hash))?
            .json(&DeleteDownloadBody { remove_data });
        self.execute_for(request, Some(hash)).await?;
        Ok(())
    }

    async fn set_state(&self, hash: &str, state: RunState) -> Result<(), EngineError> {
        let request = self
            .request(Method::PATCH, &format!("/downloads/{}", hash))?
            .json(&UpdateDownloadBody { state });
        self.execute_for(request, Some(hash)).await?;
        Ok(())
    }

    async fn list_files(&self, hash: &str) -> Result<Vec<RemoteFile>, EngineError> {
        let request = self.request(Method::GET, &format!("/downloads/{}/files", hash))?;
        let files: DownloadFiles = decode(&self.execute_for(request, Some(hash)).await?)?;
        Ok(files.files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_config(url: &str, api_key: &str) -> EngineConfig {
        EngineConfig {
            url: url.to_string(),
            api_key: api_key.to_string(),
            download_dir: "/downloads".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_rejects_missing_url() {
        let result = HttpEngineClient::new(&engine_config("", "key"));
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_new_rejects_missing_api_key() {
        let result = HttpEngineClient::new(&engine_config("http://localhost:20100", ""));
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_new_rejects_unparseable_url() {
        let result = HttpEngineClient::new(&engine_config("localhost without scheme", "key"));
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_request_path_replaces_base_path() {
        let client =
            HttpEngineClient::new(&engine_config("http://localhost:20100/api/", "key")).unwrap();
        let request = client
            .request(Method::GET, "/downloads/abc/files")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:20100/downloads/abc/files");
        assert_eq!(request.headers()[API_KEY_HEADER], "key");
    }

    #[test]
    fn test_add_body_serialization() {
        let body = AddDownloadBody {
            anon_hops: 2,
            safe_seeding: true,
            uri: "magnet:?xt=urn:btih:abc",
            destination: "/downloads",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["anon_hops"], 2);
        assert_eq!(json["safe_seeding"], true);
        assert_eq!(json["uri"], "magnet:?xt=urn:btih:abc");
        assert_eq!(json["destination"], "/downloads");
    }

    #[test]
    fn test_update_body_serialization() {
        let json = serde_json::to_value(UpdateDownloadBody {
            state: RunState::Resume,
        })
        .unwrap();
        assert_eq!(json["state"], "resume");
    }

    #[test]
    fn test_decode_error_on_malformed_body() {
        let result: Result<DownloadsResponse, _> = decode("{not json");
        assert!(matches!(result, Err(EngineError::Decode(_))));
    }
}

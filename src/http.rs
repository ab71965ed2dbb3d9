use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{MediaResponse, SignedUrlResponse, UploadResult};
use crate::poll::ResultFetcher;
use crate::utils::determine_content_type;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client as ReqwestClient, ClientBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Constants for API paths
pub mod api_paths {
    /// Path for requesting a presigned upload URL
    pub const SIGNED_URL: &str = "/api/files/aws-presigned";
    /// Path for submitting social media links
    pub const SOCIAL_MEDIA: &str = "/api/files/social";
    /// Path for retrieving media results
    pub const MEDIA_RESULT: &str = "/api/media/users";
    /// Path for retrieving pages of media results
    pub const ALL_MEDIA_RESULTS: &str = "/api/v2/media/users/pages";
}

/// HTTP client for making API requests
pub struct HttpClient {
    client: ReqwestClient,
    config: Config,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = ClientBuilder::new()
            .user_agent(concat!("realitydefender-rust-sdk/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.get_timeout_seconds()))
            .build()?;

        Ok(Self { client, config })
    }

    /// Make a GET request to the specified endpoint
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.get_with_params(endpoint, &[]).await
    }

    /// Make a GET request with query parameters
    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.config.get_base_url(), endpoint);
        debug!("GET {}", url);

        let request = self
            .client
            .get(&url)
            .query(params)
            .header("X-API-KEY", &self.config.api_key)
            .header("Accept", "application/json")
            .build()?;

        let response = self.client.execute(request).await?;
        self.handle_response(response).await
    }

    /// Make a POST request with JSON data to the specified endpoint
    pub async fn post<T: DeserializeOwned, D: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        data: &D,
    ) -> Result<T> {
        let url = format!("{}{}", self.config.get_base_url(), endpoint);
        debug!("POST {}", url);

        let request = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.config.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(data)
            .build()?;

        let response = self.client.execute(request).await?;
        self.handle_response(response).await
    }

    /// Make a PUT request to upload data to a URL (used for presigned URLs)
    pub async fn put(&self, url: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        debug!("PUT {} ({} bytes)", url, data.len());

        let request = self
            .client
            .put(url)
            .header("Content-Type", content_type)
            // Presigned URLs must not receive the API key
            .body(data)
            .build()?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| Error::UploadFailed(format!("Failed to upload to presigned URL: {e}")))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UploadFailed(format!(
                "Failed to upload to presigned URL. Status: {status} Body: {body}"
            )));
        }

        Ok(())
    }

    /// Upload a file using the presigned URL flow
    pub async fn upload_file(&self, path: &Path) -> Result<UploadResult> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidFile("Invalid file name".to_string()))?;

        let file_content = tokio::fs::read(path).await?;
        if file_content.is_empty() {
            return Err(Error::InvalidFile(format!(
                "File is empty: {}",
                path.display()
            )));
        }

        let payload = serde_json::json!({ "fileName": file_name });
        let signed_url_response = self
            .post::<SignedUrlResponse, _>(api_paths::SIGNED_URL, &payload)
            .await?;

        self.put(
            &signed_url_response.response.signed_url,
            file_content,
            determine_content_type(path),
        )
        .await?;

        Ok(UploadResult {
            request_id: signed_url_response.request_id,
            media_id: Some(signed_url_response.media_id),
        })
    }

    /// Handle API responses and parse JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        // The API reports details in an `error` field when it has them
        let detail = serde_json::from_slice::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value.get("error")?.as_str().map(str::to_string))
            .filter(|msg| !msg.is_empty());
        debug!("request failed with HTTP {}", status);

        let error = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized(
                detail.unwrap_or_else(|| "Unauthorized: Invalid API key".to_string()),
            ),
            StatusCode::NOT_FOUND => {
                Error::NotFound(detail.unwrap_or_else(|| "Resource not found".to_string()))
            }
            StatusCode::INTERNAL_SERVER_ERROR => {
                Error::ServerError(detail.unwrap_or_else(|| "Server error".to_string()))
            }
            _ => Error::UnknownError(
                detail.unwrap_or_else(|| format!("Unknown error (HTTP {status})")),
            ),
        };
        Err(error)
    }
}

#[async_trait]
impl ResultFetcher for HttpClient {
    async fn fetch_status(&self, request_id: &str) -> Result<MediaResponse> {
        let endpoint = format!("{}/{}", api_paths::MEDIA_RESULT, request_id);
        self.get::<MediaResponse>(&endpoint).await
    }
}

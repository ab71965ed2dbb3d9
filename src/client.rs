use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{EventRegistry, PollEvent};
use crate::file::{normalized_extension, size_limit_for};
use crate::formatter::ResultFormatter;
use crate::http::{api_paths, HttpClient};
use crate::models::{
    AllMediaResponse, BaseResponse, BatchOptions, DetectionResult, DetectionResultList,
    GetResultOptions, GetResultsOptions, MediaResponse, PollOptions, UploadOptions, UploadResult,
    UploadSocialMediaOptions,
};
use crate::poll::{AttemptPolicy, CancelSignal, PollEngine, WatchPolicy};
use crate::utils::{file_exists, is_valid_url, validate_date};
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::path::Path;

/// Default page size for `get_results`
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Default number of files processed at once by `detect_batch`
const DEFAULT_BATCH_CONCURRENCY: usize = 5;

/// Client for interacting with the Reality Defender API
pub struct Client {
    http_client: HttpClient,
    formatter: ResultFormatter,
    events: EventRegistry,
}

impl Client {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let formatter = ResultFormatter::new(config.get_manipulated_label());
        let http_client = HttpClient::new(config)?;
        Ok(Self {
            http_client,
            formatter,
            events: EventRegistry::new(),
        })
    }

    /// Register a handler for `"result"` or `"error"` events emitted by
    /// [`Client::poll_for_results`]
    pub fn on<F>(&self, event: &str, handler: F)
    where
        F: Fn(&PollEvent<'_>) + Send + Sync + 'static,
    {
        self.events.on(event, handler);
    }

    /// The event registry shared by every poll on this client
    pub fn events(&self) -> &EventRegistry {
        &self.events
    }

    /// Normalize a raw media payload with this client's verdict label
    pub fn format_result(&self, response: &MediaResponse) -> DetectionResult {
        self.formatter.format(response)
    }

    /// Upload a file for analysis
    pub async fn upload(&self, options: UploadOptions) -> Result<UploadResult> {
        if options.file_path.is_empty() {
            return Err(Error::InvalidFile("file path is required".to_string()));
        }
        if !file_exists(&options.file_path) {
            return Err(Error::InvalidFile(format!(
                "File not found: {}",
                options.file_path
            )));
        }

        let path = Path::new(&options.file_path);
        let size_limit = size_limit_for(path).ok_or_else(|| {
            let extension = normalized_extension(path).unwrap_or_default();
            Error::InvalidFile(format!("Unsupported file type: .{extension}"))
        })?;

        let size = tokio::fs::metadata(path).await?.len();
        if size > size_limit {
            return Err(Error::FileTooLarge(format!(
                "File too large to upload: {}",
                options.file_path
            )));
        }

        self.http_client.upload_file(path).await
    }

    /// Submit a social media link for analysis
    pub async fn upload_social_media(&self, social_link: &str) -> Result<UploadResult> {
        if social_link.trim().is_empty() {
            return Err(Error::InvalidRequest(
                "Social media link is required".to_string(),
            ));
        }
        is_valid_url(social_link)?;

        let payload = UploadSocialMediaOptions {
            social_link: social_link.to_string(),
        };
        let response = self
            .http_client
            .post::<BaseResponse, _>(api_paths::SOCIAL_MEDIA, &payload)
            .await
            .map_err(|e| Error::UploadFailed(format!("Social media link upload failed: {e}")))?;

        let request_id = response
            .request_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::ServerError("Invalid response from API".to_string()))?;

        Ok(UploadResult {
            request_id,
            media_id: None,
        })
    }

    /// Get the analysis result for a specific request ID.
    ///
    /// Fetches until the result is final or `max_attempts` (default 30) fetches
    /// were made, waiting `polling_interval` ms (default 2000) in between. If the
    /// job is still pending after the last attempt, that pending result is
    /// returned rather than an error.
    pub async fn get_result(
        &self,
        request_id: &str,
        options: Option<GetResultOptions>,
    ) -> Result<DetectionResult> {
        let opts = options.unwrap_or_default();
        let policy = AttemptPolicy::from_options(opts.max_attempts, opts.polling_interval);
        let signal = CancelSignal::new(opts.cancellation, opts.deadline);

        self.engine(signal)
            .fetch_until_final(request_id, policy)
            .await
    }

    /// Poll for a result and report it through the registered event handlers.
    ///
    /// Exactly one `"result"` or `"error"` event is emitted, and the same outcome
    /// is returned. Cancellation returns [`Error::Cancelled`] without an event.
    pub async fn poll_for_results(
        &self,
        request_id: &str,
        options: Option<PollOptions>,
    ) -> Result<()> {
        let opts = options.unwrap_or_default();
        let policy = WatchPolicy::from_options(opts.polling_interval, opts.timeout);
        let signal = CancelSignal::new(opts.cancellation, opts.deadline);

        self.engine(signal)
            .watch(request_id, policy, &self.events)
            .await
    }

    /// Get a paginated list of detection results with optional filters
    pub async fn get_results(
        &self,
        options: Option<GetResultsOptions>,
    ) -> Result<DetectionResultList> {
        let opts = options.unwrap_or_default();
        let page_number = opts.page_number.unwrap_or(0);
        let endpoint = format!("{}/{}", api_paths::ALL_MEDIA_RESULTS, page_number);

        let mut params = vec![(
            "size",
            opts.size.unwrap_or(DEFAULT_PAGE_SIZE).to_string(),
        )];
        if let Some(ref name) = opts.name {
            params.push(("name", name.to_string()));
        }
        if let Some(ref start_date) = opts.start_date {
            validate_date("startDate", start_date)?;
            params.push(("startDate", start_date.to_string()));
        }
        if let Some(ref end_date) = opts.end_date {
            validate_date("endDate", end_date)?;
            params.push(("endDate", end_date.to_string()));
        }
        let param_refs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let policy = AttemptPolicy::from_options(opts.max_attempts, opts.polling_interval);
        let signal = CancelSignal::new(opts.cancellation, opts.deadline);
        let mut attempt = 0;

        loop {
            if signal.is_cancelled() {
                return Err(Error::Cancelled);
            }
            attempt += 1;

            match self
                .http_client
                .get_with_params::<AllMediaResponse>(&endpoint, &param_refs)
                .await
            {
                Ok(page) => return Ok(self.formatter.format_page(&page)),
                Err(err) if err.is_not_found() && attempt < policy.max_attempts => {
                    warn!(
                        "results page {} not found (attempt {}/{}), retrying",
                        page_number, attempt, policy.max_attempts
                    );
                    signal.sleep(policy.polling_interval).await?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Upload a file and wait for its result with default polling settings
    pub async fn detect_file(&self, file_path: &str) -> Result<DetectionResult> {
        let upload_result = self
            .upload(UploadOptions {
                file_path: file_path.to_string(),
            })
            .await?;

        self.get_result(&upload_result.request_id, None).await
    }

    /// Upload several files and fetch their results concurrently.
    ///
    /// Returns one outcome per input path, in input order.
    pub async fn detect_batch(
        &self,
        file_paths: &[&str],
        options: BatchOptions,
    ) -> Vec<Result<DetectionResult>> {
        let max_concurrency = options
            .max_concurrency
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_BATCH_CONCURRENCY);
        debug!(
            "detecting {} file(s), {} at a time",
            file_paths.len(),
            max_concurrency
        );

        stream::iter(file_paths.iter().map(|path| {
            let result_options = options.result_options.clone();
            async move {
                let upload = self
                    .upload(UploadOptions {
                        file_path: path.to_string(),
                    })
                    .await?;
                self.get_result(&upload.request_id, Some(result_options))
                    .await
            }
        }))
        .buffered(max_concurrency)
        .collect()
        .await
    }

    fn engine(&self, signal: CancelSignal) -> PollEngine<'_> {
        PollEngine::new(&self.http_client, &self.formatter, signal)
    }
}

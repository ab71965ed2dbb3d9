use serde::{Deserialize, Serialize};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Status values used by the API and by formatted results.
///
/// Status fields are plain strings: vendors add values over time and the SDK
/// passes unknown ones through untouched.
pub mod status {
    /// Analysis still running
    pub const ANALYZING: &str = "ANALYZING";
    /// Media judged authentic
    pub const AUTHENTIC: &str = "AUTHENTIC";
    /// Default label for manipulated media
    pub const MANIPULATED: &str = "MANIPULATED";
    /// Detector does not apply to this media
    pub const NOT_APPLICABLE: &str = "NOT_APPLICABLE";
    /// Analysis failed upstream
    pub const ERROR: &str = "ERROR";
    /// Upstream spelling of the manipulated verdict
    pub const FAKE: &str = "FAKE";
}

/// Base API response
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BaseResponse {
    /// Status code from the API
    #[serde(default)]
    pub code: String,

    /// Error number (0 if successful)
    #[serde(default)]
    pub errno: i32,

    /// Response message
    #[serde(default)]
    pub response: String,

    /// Request id assigned to the submitted job
    #[serde(rename = "requestId", default)]
    pub request_id: Option<String>,
}

/// Options for uploading a file
#[derive(Debug, Clone, Serialize)]
pub struct UploadOptions {
    /// Path to the file to upload
    pub file_path: String,
}

/// Options for submitting a social media link
#[derive(Debug, Clone, Serialize)]
pub struct UploadSocialMediaOptions {
    /// Link to the social media post
    #[serde(rename = "socialLink")]
    pub social_link: String,
}

/// Response containing a presigned URL for file upload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignedUrlResponse {
    /// Status code from the API
    #[serde(default)]
    pub code: String,

    /// Error number (0 if successful)
    #[serde(default)]
    pub errno: i32,

    /// Unique identifier for the upload request
    #[serde(rename = "requestId")]
    pub request_id: String,

    /// Unique identifier for the media
    #[serde(rename = "mediaId")]
    pub media_id: String,

    /// Response details containing the signed URL
    pub response: SignedUrlDetails,
}

/// Details of the signed URL response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignedUrlDetails {
    /// The presigned URL for uploading
    #[serde(rename = "signedUrl")]
    pub signed_url: String,
}

/// Result of an upload operation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploadResult {
    /// Unique identifier for the upload request
    pub request_id: String,

    /// Unique identifier for the media (absent for social media links)
    #[serde(default)]
    pub media_id: Option<String>,
}

/// Options for `Client::get_result`
#[derive(Debug, Clone, Default)]
pub struct GetResultOptions {
    /// Maximum number of fetch attempts (default 30)
    pub max_attempts: Option<u32>,

    /// Milliseconds to wait between attempts (default 2000)
    pub polling_interval: Option<u64>,

    /// Cancels the fetch loop, including an in-progress wait
    pub cancellation: Option<CancellationToken>,

    /// Treated like a cancellation once it passes
    pub deadline: Option<Instant>,
}

/// Options for `Client::poll_for_results`
#[derive(Debug, Clone, Default)]
pub struct PollOptions {
    /// Milliseconds to wait between attempts (default 2000)
    pub polling_interval: Option<u64>,

    /// Polling budget in milliseconds (default 60000). `Some(0)` is already expired.
    pub timeout: Option<u64>,

    /// Cancels polling silently, without an error event
    pub cancellation: Option<CancellationToken>,

    /// Treated like a cancellation once it passes
    pub deadline: Option<Instant>,
}

/// Options for getting results with pagination and filtering
#[derive(Debug, Clone, Default)]
pub struct GetResultsOptions {
    /// Page number (0-based)
    pub page_number: Option<u32>,

    /// Number of items per page (default 10)
    pub size: Option<u32>,

    /// Filter by name
    pub name: Option<String>,

    /// Start date filter (YYYY-MM-DD format)
    pub start_date: Option<String>,

    /// End date filter (YYYY-MM-DD format)
    pub end_date: Option<String>,

    /// Maximum number of attempts while the listing is not found
    pub max_attempts: Option<u32>,

    /// How long to wait between attempts
    pub polling_interval: Option<u64>,

    /// Cancels the retry loop
    pub cancellation: Option<CancellationToken>,

    /// Treated like a cancellation once it passes
    pub deadline: Option<Instant>,
}

/// Options for batch detection
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Maximum number of files processed at once (default 5)
    pub max_concurrency: Option<usize>,

    /// Per-file options for fetching results
    pub result_options: GetResultOptions,
}

/// Raw per-model entry of a media status payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaModel {
    /// Name of the model
    #[serde(default)]
    pub name: String,

    /// Status reported by the model
    #[serde(default)]
    pub status: String,

    /// Final score, on either a 0-1 or a 0-100 scale
    #[serde(rename = "finalScore", default)]
    pub final_score: Option<f64>,

    /// Model-specific payload
    #[serde(default)]
    pub data: Option<serde_json::Value>,

    /// Model error code, when the model failed
    #[serde(default)]
    pub code: Option<String>,
}

/// Metadata attached to the results summary
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultsMetadata {
    /// Overall score, on either a 0-1 or a 0-100 scale
    #[serde(rename = "finalScore", default)]
    pub final_score: Option<f64>,
}

/// Summary of analysis results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultsSummary {
    /// Overall verdict
    #[serde(default)]
    pub status: String,

    /// Metadata containing the overall score
    #[serde(default)]
    pub metadata: Option<ResultsMetadata>,
}

/// Raw media status payload returned by the API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaResponse {
    /// Display name of the media
    #[serde(default)]
    pub name: Option<String>,

    /// Stored file name
    #[serde(default)]
    pub filename: Option<String>,

    /// Name of the file as uploaded
    #[serde(rename = "originalFileName", default)]
    pub original_file_name: Option<String>,

    /// Unique identifier for the analysis request
    #[serde(rename = "requestId", default)]
    pub request_id: String,

    /// Upload timestamp
    #[serde(rename = "uploadedDate", default)]
    pub uploaded_date: Option<String>,

    /// Kind of media (image, video, audio, ...)
    #[serde(rename = "mediaType", default)]
    pub media_type: Option<String>,

    /// Processing status of the job as a whole
    #[serde(rename = "overallStatus", default)]
    pub overall_status: Option<String>,

    /// Verdict summary
    #[serde(rename = "resultsSummary", default)]
    pub results_summary: Option<ResultsSummary>,

    /// Per-model results, in API order
    #[serde(default)]
    pub models: Vec<MediaModel>,
}

/// Raw page of media status payloads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllMediaResponse {
    /// Total number of items across all pages
    #[serde(rename = "totalItems", default)]
    pub total_items: u32,

    /// Total number of pages
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,

    /// Current page number (0-based)
    #[serde(rename = "currentPage", default)]
    pub current_page: u32,

    /// Number of items on current page
    #[serde(rename = "currentPageItemsCount", default)]
    pub current_page_items_count: u32,

    /// Media payloads on this page
    #[serde(rename = "mediaList", default)]
    pub media_list: Vec<MediaResponse>,
}

/// Verdict of one detection model
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelResult {
    /// Name of the model
    pub name: String,

    /// Status of the detection (AUTHENTIC, MANIPULATED, NOT_APPLICABLE, ...)
    pub status: String,

    /// Detection score (0-1 range, higher is more likely to be MANIPULATED)
    pub score: Option<f64>,
}

/// Normalized outcome of one analysis job
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DetectionResult {
    /// Unique identifier for the upload request
    #[serde(rename = "requestId")]
    pub request_id: String,

    /// Overall verdict (ANALYZING, AUTHENTIC, MANIPULATED, ...)
    pub status: String,

    /// Confidence score (0-1 range, None while analyzing)
    pub score: Option<f64>,

    /// Results from individual detection models, in API order
    pub models: Vec<ModelResult>,
}

impl DetectionResult {
    /// Whether the overall status is still `ANALYZING`
    pub fn is_analyzing(&self) -> bool {
        self.status == status::ANALYZING
    }

    /// Whether this result should trigger another fetch.
    ///
    /// True when the overall status is `ANALYZING`, or when every model is
    /// `ANALYZING` or `NOT_APPLICABLE` and at least one is `ANALYZING`.
    pub fn is_still_pending(&self) -> bool {
        if self.is_analyzing() {
            return true;
        }

        let mut any_analyzing = false;
        for model in &self.models {
            match model.status.as_str() {
                status::ANALYZING => any_analyzing = true,
                status::NOT_APPLICABLE => {}
                _ => return false,
            }
        }
        any_analyzing
    }
}

/// Paginated list of detection results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResultList {
    /// Total number of items across all pages
    pub total_items: u32,

    /// Total number of pages
    pub total_pages: u32,

    /// Current page number (0-based)
    pub current_page: u32,

    /// Number of items on current page
    pub current_page_items_count: u32,

    /// Formatted detection results for this page
    pub items: Vec<DetectionResult>,
}

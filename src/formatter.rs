//! Normalization of raw media status payloads into [`DetectionResult`]s.
//!
//! The formatter is pure: it performs no I/O, never fails, and returns a fresh
//! result for every call.

use crate::config::DEFAULT_MANIPULATED_LABEL;
use crate::models::{
    status, AllMediaResponse, DetectionResult, DetectionResultList, MediaResponse, ModelResult,
};

/// Rescale a score into the unit interval.
///
/// Values above 1 are taken to be on a 0-100 scale and divided by 100.
pub fn normalize_score(score: Option<f64>) -> Option<f64> {
    score.map(|value| if value > 1.0 { value / 100.0 } else { value })
}

/// Format a raw payload using the default manipulated label
pub fn format_result(response: &MediaResponse) -> DetectionResult {
    ResultFormatter::default().format(response)
}

/// Maps raw API payloads to normalized results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFormatter {
    manipulated_label: String,
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_MANIPULATED_LABEL)
    }
}

impl ResultFormatter {
    /// Create a formatter that rewrites `FAKE` to `manipulated_label`
    pub fn new(manipulated_label: impl Into<String>) -> Self {
        Self {
            manipulated_label: manipulated_label.into(),
        }
    }

    /// The label `FAKE` is rewritten to
    pub fn manipulated_label(&self) -> &str {
        &self.manipulated_label
    }

    /// Rewrite `FAKE` to the manipulated label; every other status passes through
    pub fn rewrite_status(&self, raw: &str) -> String {
        if raw == status::FAKE {
            self.manipulated_label.clone()
        } else {
            raw.to_string()
        }
    }

    /// Format one media status payload
    pub fn format(&self, response: &MediaResponse) -> DetectionResult {
        // The verdict lives in the results summary; jobs that have not produced
        // one yet only carry the overall processing status.
        let summary_status = response
            .results_summary
            .as_ref()
            .map(|summary| summary.status.as_str())
            .filter(|status| !status.is_empty());
        let raw_status = summary_status
            .or(response.overall_status.as_deref())
            .unwrap_or_default();

        let raw_score = response
            .results_summary
            .as_ref()
            .and_then(|summary| summary.metadata.as_ref())
            .and_then(|metadata| metadata.final_score);

        let models = response
            .models
            .iter()
            .map(|model| ModelResult {
                name: model.name.clone(),
                status: self.rewrite_status(&model.status),
                score: normalize_score(model.final_score),
            })
            .collect();

        DetectionResult {
            request_id: response.request_id.clone(),
            status: self.rewrite_status(raw_status),
            score: normalize_score(raw_score),
            models,
        }
    }

    /// Format a page of media payloads, preserving page counters and item order
    pub fn format_page(&self, response: &AllMediaResponse) -> DetectionResultList {
        DetectionResultList {
            total_items: response.total_items,
            total_pages: response.total_pages,
            current_page: response.current_page,
            current_page_items_count: response.current_page_items_count,
            items: response
                .media_list
                .iter()
                .map(|media| self.format(media))
                .collect(),
        }
    }
}

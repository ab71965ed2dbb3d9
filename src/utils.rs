use crate::error::{Error, Result};
use crate::file::normalized_extension;
use addr::parse_domain_name;
use chrono::NaiveDate;
use std::path::Path;
use url::{Host, Url};

/// Whether a file or directory exists at `path`
pub fn file_exists(path: &str) -> bool {
    !path.is_empty() && Path::new(path).exists()
}

// Determine the content type of a file based on its extension, ignoring case
pub fn determine_content_type(path: &Path) -> &'static str {
    match normalized_extension(path).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        Some("m4a") | Some("alac") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Validate a social media link: http(s) scheme and a domain name host
pub fn is_valid_url(url: &str) -> Result<()> {
    let parsed_url =
        Url::parse(url).map_err(|_| Error::InvalidRequest(format!("Invalid URL: {url}")))?;

    match parsed_url.scheme() {
        "http" | "https" => {}
        _ => {
            return Err(Error::InvalidRequest(
                "URL must use http or https scheme".to_string(),
            ))
        }
    }

    let host = match parsed_url.host() {
        Some(Host::Domain(host)) if !host.is_empty() => host,
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {
            return Err(Error::InvalidRequest(
                "URL must use a domain, not an IP address".to_string(),
            ))
        }
        _ => {
            return Err(Error::InvalidRequest(
                "URL must have a valid domain".to_string(),
            ))
        }
    };

    if parse_domain_name(host).is_err() {
        return Err(Error::InvalidRequest(
            "URL must have a valid domain".to_string(),
        ));
    }

    Ok(())
}

/// Check that `date` is a calendar date in `YYYY-MM-DD` form
pub fn validate_date(field: &str, date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| Error::InvalidRequest(format!("{field} must be formatted as YYYY-MM-DD: {date}")))
}

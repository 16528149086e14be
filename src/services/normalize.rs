//! Normalization of raw Drive records into display-ready metadata.
//! Every function here is pure and total: missing or malformed input
//! falls back to a default, never an error.

use chrono::DateTime;
use regex::Regex;
use std::sync::OnceLock;

use crate::models::{FileCategory, FileOrigin, NormalizedFile, RemoteFile};

/// Base-1024 unit ladder. The index is clamped to the last entry, so
/// anything at or above 1024 TB renders as a TB count.
const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Ordered category rules evaluated first-match-wins over the raw MIME
/// string. The order is the tie-break: a type matching several rules
/// takes the earliest one.
const CATEGORY_RULES: &[(&[&str], FileCategory)] = &[
    (&["pdf"], FileCategory::Pdf),
    (&["spreadsheet"], FileCategory::Spreadsheet),
    (&["document"], FileCategory::Document),
    (&["presentation"], FileCategory::Presentation),
    (&["image"], FileCategory::Image),
    (&["video"], FileCategory::Video),
    (&["audio"], FileCategory::Audio),
    (&["zip", "rar", "tar"], FileCategory::Archive),
];

fn grade_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)grade\s*:?\s*(\d+)").expect("valid grade pattern"))
}

/// Map a remote record to its internal shape, substituting defaults for
/// every missing field
pub fn normalize(remote: RemoteFile, origin: FileOrigin) -> NormalizedFile {
    let mime_type = remote
        .mime_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let size_bytes = remote.size.as_deref().and_then(|s| s.parse::<u64>().ok());

    NormalizedFile {
        id: remote.id,
        name: remote.name.unwrap_or_else(|| "Unnamed File".to_string()),
        size_label: format_size(size_bytes),
        created_label: created_label(remote.created_time.as_deref()),
        category: categorize(&mime_type),
        class_tag: class_tag(remote.description.as_deref()),
        uploaded_by: origin.label().to_string(),
        mime_type,
        web_view_link: remote.web_view_link,
        web_content_link: remote.web_content_link,
        icon_link: remote.icon_link,
        thumbnail_link: remote.thumbnail_link,
    }
}

/// Human-readable size label from a byte count
pub fn format_size(bytes: Option<u64>) -> String {
    match bytes {
        None => "Unknown size".to_string(),
        Some(0) => "0 Byte".to_string(),
        Some(n) => {
            let index = (((n as f64).ln() / 1024f64.ln()).floor() as usize)
                .min(SIZE_UNITS.len() - 1);
            let value = (n as f64 / 1024f64.powi(index as i32)).round();
            format!("{} {}", value, SIZE_UNITS[index])
        }
    }
}

/// Coarse category from substring matches on the MIME type. Matching is
/// case-sensitive; the provider returns lowercase types.
pub fn categorize(mime_type: &str) -> FileCategory {
    for (needles, category) in CATEGORY_RULES {
        if needles.iter().any(|needle| mime_type.contains(needle)) {
            return *category;
        }
    }
    FileCategory::Other
}

/// Class tag parsed from the free-text description: "Grade {N}" when a
/// grade pattern is present, "All Classes" otherwise
pub fn class_tag(description: Option<&str>) -> String {
    description
        .and_then(|desc| grade_pattern().captures(desc))
        .map(|caps| format!("Grade {}", &caps[1]))
        .unwrap_or_else(|| "All Classes".to_string())
}

/// Date label from the RFC 3339 creation timestamp
pub fn created_label(created_time: Option<&str>) -> String {
    created_time
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|dt| dt.format("%m/%d/%Y").to_string())
        .unwrap_or_else(|| "Unknown date".to_string())
}

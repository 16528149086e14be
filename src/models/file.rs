use serde::{Deserialize, Serialize};

/// File record as returned by the Drive v3 API.
/// Every field except `id` can be missing; `size` arrives as a string
/// because the API encodes int64 values as JSON strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    #[serde(default)]
    pub id: String,
    pub name: Option<String>,
    pub mime_type: Option<String>,
    pub size: Option<String>,
    pub created_time: Option<String>,
    pub description: Option<String>,
    pub web_view_link: Option<String>,
    pub web_content_link: Option<String>,
    pub icon_link: Option<String>,
    pub thumbnail_link: Option<String>,
}

/// Coarse file category derived from the MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileCategory {
    #[serde(rename = "PDF")]
    Pdf,
    Spreadsheet,
    Document,
    Presentation,
    Image,
    Video,
    Audio,
    Archive,
    Other,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Pdf => "PDF",
            FileCategory::Spreadsheet => "Spreadsheet",
            FileCategory::Document => "Document",
            FileCategory::Presentation => "Presentation",
            FileCategory::Image => "Image",
            FileCategory::Video => "Video",
            FileCategory::Audio => "Audio",
            FileCategory::Archive => "Archive",
            FileCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a record came from a listing/fetch or from an upload in
/// the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOrigin {
    Listed,
    Uploaded,
}

impl FileOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            FileOrigin::Listed => "Google Drive",
            FileOrigin::Uploaded => "You",
        }
    }
}

/// Display-ready file record produced by normalization
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size_label: String,
    pub created_label: String,
    pub category: FileCategory,
    pub class_tag: String,
    pub uploaded_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_view_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_content_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_link: Option<String>,
}

/// Successful upload result: the normalized file plus whether the
/// public-read grant went through
#[derive(Debug, Clone, Serialize)]
pub struct UploadedFile {
    pub file: NormalizedFile,
    pub shared_publicly: bool,
}

/// File list response
#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<NormalizedFile>,
    pub authenticated: bool,
}

/// Single file response
#[derive(Debug, Serialize)]
pub struct FileGetResponse {
    pub file: Option<NormalizedFile>,
    pub authenticated: bool,
}

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file: Option<NormalizedFile>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_publicly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Authorization URL response
#[derive(Debug, Serialize)]
pub struct AuthUrlResponse {
    pub url: String,
}

/// File query parameters
#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub search: Option<String>,
}

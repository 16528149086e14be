use bytes::Bytes;

/// In-memory upload payload: name, MIME type and raw bytes of one file
/// read out of a multipart request
#[derive(Debug, Clone)]
pub struct FileBlob {
    pub name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl FileBlob {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

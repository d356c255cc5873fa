use serde::Deserialize;

/// Envelope wrapping the uploaded-file descriptors in an upload response.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub files: Vec<RemoteFile>,
}

/// A file stored remotely, as described by the upload response.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteFile {
    /// Content hash computed server-side.
    pub hash: String,
    /// Name the file was uploaded under, when one was sent.
    pub name: Option<String>,
    /// Trailing segment of the public URL, e.g. `abc123.png`.
    #[serde(rename = "url")]
    pub url_key: String,
    /// Size in bytes.
    pub size: u64,
    /// Full public link. Derived from the configured upload URL and
    /// `url_key` when the response is decoded; never transmitted.
    #[serde(skip)]
    pub full_url: String,
}

impl RemoteFile {
    /// Stamp `full_url` from the configured upload base URL, normalizing a
    /// trailing slash so both `https://host` and `https://host/` produce the
    /// same link.
    pub(crate) fn with_full_url(mut self, upload_url: &str) -> Self {
        let base = upload_url.strip_suffix('/').unwrap_or(upload_url);
        self.full_url = format!("{}/{}", base, self.url_key);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RemoteFile {
        serde_json::from_str(
            r#"{"hash": "1f6bce", "name": "cat.png", "url": "abc.png", "size": 1234}"#,
        )
        .unwrap()
    }

    #[test]
    fn full_url_is_stable_under_trailing_slash() {
        let with_slash = sample().with_full_url("https://owo.whats-th.is/");
        let without_slash = sample().with_full_url("https://owo.whats-th.is");

        assert_eq!(with_slash.full_url, "https://owo.whats-th.is/abc.png");
        assert_eq!(without_slash.full_url, with_slash.full_url);
    }

    #[test]
    fn envelope_deserializes_wire_names() {
        let envelope: UploadResponse = serde_json::from_str(
            r#"{"success": true, "files": [{"hash": "h", "name": null, "url": "x.txt", "size": 0}]}"#,
        )
        .unwrap();

        let file = &envelope.files[0];
        assert_eq!(file.hash, "h");
        assert_eq!(file.name, None);
        assert_eq!(file.url_key, "x.txt");
        assert_eq!(file.size, 0);
        assert!(file.full_url.is_empty());
    }

    #[test]
    fn missing_files_field_decodes_as_empty() {
        let envelope: UploadResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();

        assert!(envelope.files.is_empty());
    }
}

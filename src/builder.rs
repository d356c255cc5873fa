use std::path::Path;

use crate::error::ResolutionError;
use crate::source::{self, FETCH_USER_AGENT, ResolvedUpload};

/// Accumulates an upload step by step before handing it to
/// [`Client::upload_from`].
///
/// Steps that perform I/O ([`file`] and [`url`]) run it immediately; the
/// first failure is captured and every later step leaves it untouched, so
/// [`build`] always reports the error closest to its cause.
///
/// [`Client::upload_from`]: crate::Client::upload_from
/// [`file`]: UploadBuilder::file
/// [`url`]: UploadBuilder::url
/// [`build`]: UploadBuilder::build
#[derive(Debug, Default)]
pub struct UploadBuilder {
    data: Option<Vec<u8>>,
    file_name: Option<String>,
    content_type: Option<String>,
    error: Option<ResolutionError>,
}

impl UploadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bytes to upload.
    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the name the file is uploaded under.
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Set the content type, disabling guessing.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a local file into the builder. The file name is taken from the
    /// path and, unless one was set already, the content type is guessed
    /// from the extension.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        match source::resolve_file(path.as_ref(), self.content_type.take()) {
            Ok(resolved) => self.adopt(resolved),
            Err(error) => self.record_error(error),
        }
        self
    }

    /// Fetch a remote URL into the builder, with a browser-like default
    /// user agent.
    pub async fn url(self, url: &str) -> Self {
        self.url_with_user_agent(url, FETCH_USER_AGENT).await
    }

    /// Fetch a remote URL into the builder using a specific user agent. The
    /// file name is derived from the URL's last path segment and, unless one
    /// was set already, the content type is sniffed from the downloaded
    /// bytes.
    pub async fn url_with_user_agent(mut self, url: &str, user_agent: &str) -> Self {
        match source::resolve_remote(url, Some(user_agent), self.content_type.take()).await {
            Ok(resolved) => self.adopt(resolved),
            Err(error) => self.record_error(error),
        }
        self
    }

    /// Consume the builder. Returns the first captured error if any step
    /// failed, otherwise a normalized upload; when no content type was set
    /// or guessed along the way, it is sniffed from the data here so the
    /// result never leaves without one.
    pub fn build(self) -> Result<ResolvedUpload, ResolutionError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let data = self.data.ok_or(ResolutionError::MissingData)?;
        let content_type = self
            .content_type
            .unwrap_or_else(|| source::sniff_content_type(&data));

        Ok(ResolvedUpload {
            data,
            file_name: self.file_name,
            content_type,
        })
    }

    fn adopt(&mut self, resolved: ResolvedUpload) {
        self.data = Some(resolved.data);
        if self.file_name.is_none() {
            self.file_name = resolved.file_name;
        }
        self.content_type = Some(resolved.content_type);
    }

    fn record_error(&mut self, error: ResolutionError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

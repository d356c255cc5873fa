use std::fs;
use std::path::{Path, PathBuf};

use reqwest::header;
use url::Url;

use crate::error::ResolutionError;

/// Content type used when neither the caller nor sniffing produces one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type used for text uploads without an explicit override.
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// User agent used when fetching a remote URL's bytes prior to upload. This
/// fetch happens out of band and mimics a regular browser; it is independent
/// of the client identification header sent to the API itself.
pub const FETCH_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Where the bytes of a pending upload come from.
#[derive(Debug, Clone)]
pub enum UploadSource {
    /// An in-memory buffer, optionally carrying the name the file should be
    /// uploaded under.
    Bytes {
        data: Vec<u8>,
        file_name: Option<String>,
    },
    /// A file on the local filesystem.
    File { path: PathBuf },
    /// A file fetched from a remote URL and re-uploaded.
    RemoteUrl {
        url: String,
        user_agent: Option<String>,
    },
    /// A string of text, encoded as UTF-8.
    Text { text: String },
}

impl UploadSource {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            data: data.into(),
            file_name: None,
        }
    }

    pub fn named_bytes(data: impl Into<Vec<u8>>, file_name: impl Into<String>) -> Self {
        Self::Bytes {
            data: data.into(),
            file_name: Some(file_name.into()),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    pub fn remote_url(url: impl Into<String>) -> Self {
        Self::RemoteUrl {
            url: url.into(),
            user_agent: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// An upload source normalized into the shape the API accepts. The content
/// type is always non-empty once resolution succeeds.
#[derive(Debug, Clone)]
pub struct ResolvedUpload {
    pub data: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: String,
}

/// Normalize `source` into bytes, a file name, and a content type.
///
/// `content_type` overrides any guessing. Empty content is valid for every
/// source kind; resolution never fails on data length alone. All I/O
/// failures come back as [`ResolutionError`] values.
pub async fn resolve(
    source: UploadSource,
    content_type: Option<String>,
) -> Result<ResolvedUpload, ResolutionError> {
    match source {
        UploadSource::Bytes { data, file_name } => {
            let content_type = content_type.unwrap_or_else(|| sniff_content_type(&data));
            Ok(ResolvedUpload {
                data,
                file_name,
                content_type,
            })
        }
        UploadSource::File { path } => resolve_file(&path, content_type),
        UploadSource::RemoteUrl { url, user_agent } => {
            resolve_remote(&url, user_agent.as_deref(), content_type).await
        }
        UploadSource::Text { text } => Ok(ResolvedUpload {
            data: text.into_bytes(),
            file_name: None,
            content_type: content_type.unwrap_or_else(|| TEXT_CONTENT_TYPE.to_string()),
        }),
    }
}

/// Guess a content type from magic numbers, falling back to the generic
/// binary type when the content is unrecognizable.
pub(crate) fn sniff_content_type(data: &[u8]) -> String {
    infer::get(data)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

pub(crate) fn guess_from_file_name(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

pub(crate) fn resolve_file(
    path: &Path,
    content_type: Option<String>,
) -> Result<ResolvedUpload, ResolutionError> {
    let data = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    let content_type = content_type.unwrap_or_else(|| guess_from_file_name(path));

    Ok(ResolvedUpload {
        data,
        file_name,
        content_type,
    })
}

pub(crate) async fn resolve_remote(
    url: &str,
    user_agent: Option<&str>,
    content_type: Option<String>,
) -> Result<ResolvedUpload, ResolutionError> {
    let url = Url::parse(url)?;
    let file_name = file_name_from_url(&url);

    tracing::debug!(url = %url, "fetching remote upload source");
    let response = reqwest::Client::new()
        .get(url)
        .header(header::USER_AGENT, user_agent.unwrap_or(FETCH_USER_AGENT))
        .send()
        .await?
        .error_for_status()?;
    let data = response.bytes().await?.to_vec();

    let content_type = content_type.unwrap_or_else(|| sniff_content_type(&data));

    Ok(ResolvedUpload {
        data,
        file_name,
        content_type,
    })
}

/// Last non-empty path segment of the URL, if any.
fn file_name_from_url(url: &Url) -> Option<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

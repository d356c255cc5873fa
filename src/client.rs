use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, header};
use url::Url;

use crate::action::Action;
use crate::builder::UploadBuilder;
use crate::error::{Error, Result};
use crate::rest_types::{RemoteFile, UploadResponse};
use crate::source::{self, ResolvedUpload, UploadSource};

/// Client identification sent as `User-Agent` on every call to the API.
/// Distinct from [`source::FETCH_USER_AGENT`], which is only used for the
/// out-of-band fetch of a remote upload source.
pub(crate) const CLIENT_USER_AGENT: &str = concat!(
    "WhatsThisClient (https://whats-th.is, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

pub const DEFAULT_ENDPOINT: &str = "https://api.awau.moe/";
pub const DEFAULT_UPLOAD_URL: &str = "https://owo.whats-th.is";
pub const DEFAULT_SHORTEN_URL: &str = "https://awau.moe";

const UPLOAD_ROUTE: &str = "upload/pomf";
const SHORTEN_ROUTE: &str = "shorten/polr";

/// Client for the whats-th.is API.
///
/// Holds the api key and the three service URLs; cloning is cheap and
/// clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    endpoint: Url,
    upload_url: String,
    shorten_url: String,
}

/// Configures and validates a [`Client`].
///
/// Only the api key is required; the endpoint and the two display URLs fall
/// back to the service defaults.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    endpoint: Option<String>,
    upload_url: Option<String>,
    shorten_url: Option<String>,
}

impl ClientBuilder {
    /// Set the api key. Required.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the API endpoint, default [`DEFAULT_ENDPOINT`].
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Override the public base URL uploaded files are served under,
    /// default [`DEFAULT_UPLOAD_URL`].
    pub fn upload_url(mut self, upload_url: impl Into<String>) -> Self {
        self.upload_url = Some(upload_url.into());
        self
    }

    /// Override the base URL shortened links point at, default
    /// [`DEFAULT_SHORTEN_URL`].
    pub fn shorten_url(mut self, shorten_url: impl Into<String>) -> Self {
        self.shorten_url = Some(shorten_url.into());
        self
    }

    /// Validate the settings and build the client. A missing or empty api
    /// key and a malformed endpoint are fatal here, not deferred into the
    /// first call.
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Configuration("an api key is required".to_string()))?;

        let endpoint = Url::parse(self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))
            .map_err(|error| Error::Configuration(format!("invalid endpoint url: {error}")))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Client {
            http,
            api_key,
            endpoint,
            upload_url: self
                .upload_url
                .unwrap_or_else(|| DEFAULT_UPLOAD_URL.to_string()),
            shorten_url: self
                .shorten_url
                .unwrap_or_else(|| DEFAULT_SHORTEN_URL.to_string()),
        })
    }
}

/// A fully formed upload, ready for the transport. The api key travels in
/// the already-decorated request, not here.
struct UploadRequest {
    resolved: ResolvedUpload,
    upload_url: String,
}

impl Client {
    /// Build a client with default URLs from just an api key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    pub fn shorten_url(&self) -> &str {
        &self.shorten_url
    }

    /// Upload a source with a guessed content type.
    ///
    /// Resolution happens eagerly: an unreadable file or unreachable URL
    /// produces an already-failed action, and no request is made when it is
    /// executed.
    pub async fn upload(&self, upload_source: UploadSource) -> Action<RemoteFile> {
        self.upload_as(upload_source, None).await
    }

    /// Upload a source with an explicit content type instead of the guessed
    /// one.
    pub async fn upload_as(
        &self,
        upload_source: UploadSource,
        content_type: Option<String>,
    ) -> Action<RemoteFile> {
        match source::resolve(upload_source, content_type).await {
            Ok(resolved) => self.upload_resolved(resolved),
            Err(error) => Action::failed(error.into()),
        }
    }

    /// Upload whatever an [`UploadBuilder`] accumulated, surfacing its first
    /// captured error as an already-failed action.
    pub fn upload_from(&self, upload_builder: UploadBuilder) -> Action<RemoteFile> {
        match upload_builder.build() {
            Ok(resolved) => self.upload_resolved(resolved),
            Err(error) => Action::failed(error.into()),
        }
    }

    fn upload_resolved(&self, resolved: ResolvedUpload) -> Action<RemoteFile> {
        let request = match self.request(Method::POST, UPLOAD_ROUTE) {
            Ok(request) => request,
            Err(error) => return Action::failed(error),
        };

        Action::pending(send_upload(
            request,
            UploadRequest {
                resolved,
                upload_url: self.upload_url.clone(),
            },
        ))
    }

    /// Shorten a URL.
    pub fn shorten(&self, long_url: impl Into<String>) -> Action<String> {
        let request = match self.request(Method::GET, SHORTEN_ROUTE) {
            Ok(request) => request,
            Err(error) => return Action::failed(error),
        };

        let long_url = long_url.into();
        let request = request.query(&[
            ("action", "shorten"),
            ("url", long_url.as_str()),
            ("resultUrl", self.shorten_url.as_str()),
        ]);

        Action::pending(send_shorten(request))
    }

    /// Start a request against the API. Applied uniformly to every
    /// endpoint: the api key as a query parameter and the fixed client
    /// identification header.
    fn request(&self, method: Method, route: &str) -> Result<RequestBuilder> {
        let url = self
            .endpoint
            .join(route)
            .map_err(|error| Error::Configuration(format!("invalid route url: {error}")))?;

        Ok(self
            .http
            .request(method, url)
            .query(&[("key", self.api_key.as_str())])
            .header(header::USER_AGENT, CLIENT_USER_AGENT))
    }
}

async fn send_upload(request: RequestBuilder, upload: UploadRequest) -> Result<RemoteFile> {
    let UploadRequest {
        resolved,
        upload_url,
    } = upload;

    let mut part = Part::bytes(resolved.data).mime_str(&resolved.content_type)?;
    if let Some(file_name) = resolved.file_name {
        part = part.file_name(file_name);
    }
    let form = Form::new().part("files[]", part);

    let response = request.multipart(form).send().await?;
    let status = response.status();
    let body = response.text().await?;
    tracing::debug!(%status, "upload response received");

    if !status.is_success() {
        return Err(Error::Transport {
            status: status.as_u16(),
            body,
        });
    }

    let envelope: UploadResponse =
        serde_json::from_str(&body).map_err(|error| Error::Deserialization(error.to_string()))?;
    let file = envelope
        .files
        .into_iter()
        .next()
        .ok_or_else(|| Error::Deserialization("upload response contained no files".to_string()))?;

    Ok(file.with_full_url(&upload_url))
}

async fn send_shorten(request: RequestBuilder) -> Result<String> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    tracing::debug!(%status, "shorten response received");

    if !status.is_success() {
        return Err(Error::Transport {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_is_required() {
        let error = Client::builder().build().unwrap_err();
        assert!(matches!(error, Error::Configuration(_)));

        let error = Client::builder().api_key("").build().unwrap_err();
        assert!(matches!(error, Error::Configuration(_)));
    }

    #[test]
    fn urls_fall_back_to_the_service_defaults() {
        let client = Client::new("secret").unwrap();

        assert_eq!(client.endpoint().as_str(), DEFAULT_ENDPOINT);
        assert_eq!(client.upload_url(), DEFAULT_UPLOAD_URL);
        assert_eq!(client.shorten_url(), DEFAULT_SHORTEN_URL);
    }

    #[test]
    fn malformed_endpoint_is_a_configuration_error() {
        let error = Client::builder()
            .api_key("secret")
            .endpoint("not a url")
            .build()
            .unwrap_err();

        assert!(matches!(error, Error::Configuration(_)));
    }
}

//! Client for the [whats-th.is](https://whats-th.is) file hosting and URL
//! shortening service.
//!
//! Uploads accept raw bytes, a local file, a remote URL, or a string of
//! text; each is normalized into bytes plus a file name and content type
//! before being sent as a single multipart request. Both operations return
//! an [`Action`], a single-shot wrapper around the pending call that can be
//! awaited, executed with callbacks, or run blocking.
//!
//! ```no_run
//! use whats_this::{Client, UploadSource};
//!
//! #[tokio::main]
//! async fn main() -> whats_this::Result<()> {
//!     let client = Client::new("my-api-key")?;
//!
//!     let action = client.upload(UploadSource::file("cat.png")).await;
//!     let file = action.await?;
//!     println!("{}", file.full_url);
//!
//!     let short = client.shorten("https://example.com/a/b").await?;
//!     println!("{short}");
//!
//!     Ok(())
//! }
//! ```

pub mod action;
pub mod builder;
pub mod client;
pub mod error;
pub mod rest_types;
pub mod source;

pub use action::Action;
pub use builder::UploadBuilder;
pub use client::{
    Client, ClientBuilder, DEFAULT_ENDPOINT, DEFAULT_SHORTEN_URL, DEFAULT_UPLOAD_URL,
};
pub use error::{Error, ResolutionError, Result};
pub use rest_types::RemoteFile;
pub use source::{ResolvedUpload, UploadSource};

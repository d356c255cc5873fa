use std::future::IntoFuture;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueHint};
use iocraft::prelude::*;

use whats_this::{Client, UploadSource};

use crate::ui::{PendingCall, ShortenSummary, UploadSummary};

mod config;
mod ui;

#[derive(Parser)]
#[command(name = "owo")]
#[command(version)]
#[command(about = "Upload files and shorten URLs via the whats-th.is API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file, a remote URL's contents, or a string of text
    Upload {
        /// Path of the file to upload
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Fetch this URL and re-upload its contents
        #[arg(short, long, conflicts_with = "file")]
        url: Option<String>,
        /// Upload a literal string of text
        #[arg(short, long, conflicts_with_all = ["file", "url"])]
        text: Option<String>,
        /// Override the guessed content type
        #[arg(short, long)]
        content_type: Option<String>,
        /// User agent used when fetching --url
        #[arg(long, requires = "url")]
        user_agent: Option<String>,
    },
    /// Shorten a URL
    Shorten { url: String },
    /// Store your API key in the OS keyring
    SetApiKey { api_key: String },
}

fn main() -> Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();
    let _rt_guard = rt.enter();
    let cli = Cli::parse();

    rt.block_on(async {
        match cli.command {
            Commands::SetApiKey { api_key } => config::set_api_key_keyring(api_key),
            requires_api_key => {
                let config = config::read_config()?;

                let mut builder = Client::builder().api_key(config.api_key);
                if let Some(endpoint) = config.endpoint {
                    builder = builder.endpoint(endpoint);
                }
                if let Some(upload_url) = config.upload_url {
                    builder = builder.upload_url(upload_url);
                }
                if let Some(shorten_url) = config.shorten_url {
                    builder = builder.shorten_url(shorten_url);
                }
                let client = builder.build()?;

                match requires_api_key {
                    Commands::Upload {
                        file,
                        url,
                        text,
                        content_type,
                        user_agent,
                    } => upload(&client, file, url, text, content_type, user_agent).await,
                    Commands::Shorten { url } => shorten(&client, url).await,
                    Commands::SetApiKey { api_key: _ } => {
                        panic!("This state should be unreachable")
                    }
                }
            }
        }
    })
}

async fn upload(
    client: &Client,
    file: Option<PathBuf>,
    url: Option<String>,
    text: Option<String>,
    content_type: Option<String>,
    user_agent: Option<String>,
) -> Result<()> {
    let source = if let Some(path) = file {
        UploadSource::file(path)
    } else if let Some(url) = url {
        UploadSource::RemoteUrl { url, user_agent }
    } else if let Some(text) = text {
        UploadSource::text(text)
    } else {
        bail!("nothing to upload: pass a file path, --url, or --text");
    };

    let action = client.upload_as(source, content_type).await;

    let mut pending = element!(PendingCall(title: "Uploading".to_string()));
    let uploaded = tokio::select! {
        result = action.into_future() => result?,
        _ = pending.render_loop() => {
            unreachable!("render_loop should not terminate")
        }
    };

    element!(UploadSummary(
        name: uploaded
            .name
            .clone()
            .unwrap_or_else(|| uploaded.url_key.clone()),
        hash: uploaded.hash.clone(),
        size: uploaded.size,
        full_url: uploaded.full_url.clone(),
    ))
    .print();

    Ok(())
}

async fn shorten(client: &Client, url: String) -> Result<()> {
    let action = client.shorten(url.clone());

    let mut pending = element!(PendingCall(title: "Shortening".to_string()));
    let shortened = tokio::select! {
        result = action.into_future() => result?,
        _ = pending.render_loop() => {
            unreachable!("render_loop should not terminate")
        }
    };

    element!(ShortenSummary(original: url, shortened: shortened)).print();

    Ok(())
}

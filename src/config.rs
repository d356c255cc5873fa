use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;
use keyring::Entry;
use serde::Deserialize;
use std::fs;

pub const KEYRING_SERVICE: &str = "owo-api-key";
pub const KEYRING_USER: &str = "whats-th.is";

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    endpoint: Option<String>,
    upload_url: Option<String>,
    shorten_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigEnv {
    owo_endpoint: Option<String>,
    owo_upload_url: Option<String>,
    owo_shorten_url: Option<String>,
    owo_api_key: Option<String>,
}

pub struct Config {
    pub api_key: String,
    pub endpoint: Option<String>,
    pub upload_url: Option<String>,
    pub shorten_url: Option<String>,
}

fn merge_config(base: ConfigFile, override_config: ConfigEnv) -> Result<Config> {
    let endpoint = override_config.owo_endpoint.or(base.endpoint);
    let upload_url = override_config.owo_upload_url.or(base.upload_url);
    let shorten_url = override_config.owo_shorten_url.or(base.shorten_url);

    let api_key = if let Some(api_key) = override_config.owo_api_key {
        api_key
    } else {
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
        let api_key = entry
            .get_secret()
            .context("API key not specified via environment variable nor present in OS keyring")?;
        String::from_utf8(api_key)?
    };

    Ok(Config {
        api_key,
        endpoint,
        upload_url,
        shorten_url,
    })
}

pub fn read_config() -> Result<Config> {
    let _ = dotenv();
    let env_config = envy::from_env::<ConfigEnv>().unwrap_or_default();

    let project_dirs = directories::ProjectDirs::from("is", "whats-th", "owo")
        .ok_or(anyhow!("Unable to determine home directory"))?;
    let config_file = project_dirs.config_dir().join("config.toml");
    let file_config = if let Ok(config) = fs::read_to_string(config_file) {
        toml::from_str(&config)?
    } else {
        ConfigFile::default()
    };

    merge_config(file_config, env_config)
}

pub fn set_api_key_keyring(api_key: String) -> Result<()> {
    let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
    entry.set_secret(api_key.as_bytes())?;
    println!("API key set for use with owo");
    Ok(())
}

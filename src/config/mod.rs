// src/config/mod.rs - Bot configuration: TOML file with environment overrides

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Runtime configuration for the moderation engine.
///
/// Loaded from an optional TOML file, then overridden by environment
/// variables (`WARDEN_*`). Everything has a working default so the bot can
/// start from a bare checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    /// File backing the free-text deny-list.
    pub text_phrases_file: PathBuf,

    /// File backing the image keyword deny-list.
    pub image_words_file: PathBuf,

    /// Usernames allowed to manage the deny-lists via the admin dialogue.
    pub admins: Vec<String>,

    /// Language hints handed to the OCR collaborator, most likely first.
    pub ocr_languages: Vec<String>,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            text_phrases_file: PathBuf::from("data/banned_phrases.txt"),
            image_words_file: PathBuf::from("data/banned_image_words.txt"),
            admins: Vec::new(),
            ocr_languages: vec!["rus".to_string(), "eng".to_string()],
        }
    }
}

impl WardenConfig {
    /// Load configuration from `path` if it exists, then apply environment
    /// overrides. A missing file is not an error; a malformed one is.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if fs::try_exists(path).await.unwrap_or(false) {
            let raw = fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            let parsed: WardenConfig = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file {}", path.display()))?;
            info!("Loaded configuration from {}", path.display());
            parsed
        } else {
            warn!("Config file {} not found, using defaults", path.display());
            WardenConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables win over file values so deployments can keep
    /// secrets and paths out of the checked-in config.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = env::var("WARDEN_TEXT_PHRASES_FILE") {
            self.text_phrases_file = PathBuf::from(path);
        }
        if let Ok(path) = env::var("WARDEN_IMAGE_WORDS_FILE") {
            self.image_words_file = PathBuf::from(path);
        }
        if let Ok(admins) = env::var("WARDEN_ADMINS") {
            self.admins = split_csv(&admins);
        }
        if let Ok(langs) = env::var("WARDEN_OCR_LANGUAGES") {
            let parsed = split_csv(&langs);
            if !parsed.is_empty() {
                self.ocr_languages = parsed;
            }
        }
    }

    /// Whether a username is on the configured admin list. Comparison is
    /// case-insensitive; platforms treat usernames that way.
    pub fn is_admin(&self, username: Option<&str>) -> bool {
        let Some(username) = username else {
            return false;
        };
        let username = username.trim_start_matches('@');
        self.admins
            .iter()
            .any(|admin| admin.trim_start_matches('@').eq_ignore_ascii_case(username))
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

// src/main.rs - Operator console: manage the deny-lists without a chat transport

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{info, warn};
use std::env;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use chatwarden::prelude::*;
use chatwarden::types::{ChatRef, FileRef, MessageRef, UserRef};

/// Stand-ins for the platform collaborators while no transport is attached.
/// The console only exercises the admin surface, so these are never reached
/// in normal use; if they are, they fail open.
struct DetachedPlatform;

#[async_trait]
impl ChatModeration for DetachedPlatform {
    async fn is_administrator(&self, _chat: ChatRef, _user: &UserRef) -> Result<bool> {
        Err(anyhow!("no chat transport attached"))
    }

    async fn delete_message(&self, _message: MessageRef) -> bool {
        false
    }

    async fn ban_user(&self, _chat: ChatRef, _user: &UserRef) -> bool {
        false
    }
}

struct DetachedFiles;

#[async_trait]
impl FileFetcher for DetachedFiles {
    async fn download_file(&self, _file: &FileRef) -> Result<Vec<u8>> {
        Err(anyhow!("no file transport attached"))
    }
}

struct DetachedOcr;

#[async_trait]
impl TextExtractor for DetachedOcr {
    async fn extract_text(&self, _image: &[u8], _language_hints: &[String]) -> Result<String> {
        Err(anyhow!("no OCR backend attached"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables and initialize logging
    dotenv::dotenv().ok();
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting ChatWarden v{}", chatwarden::VERSION);

    let config_path = env::var("WARDEN_CONFIG").unwrap_or_else(|_| "warden.toml".to_string());
    let mut config = WardenConfig::load(&config_path).await?;

    // The console operator edits the lists locally and is implicitly trusted.
    let operator_name = match config.admins.first() {
        Some(name) => name.clone(),
        None => {
            warn!("No admins configured; granting the console operator admin rights");
            config.admins.push("operator".to_string());
            "operator".to_string()
        }
    };
    let operator = UserRef {
        id: 0,
        username: Some(operator_name),
        first_name: "Console".to_string(),
    };

    let bot = ModerationBot::new(
        config,
        Arc::new(DetachedPlatform),
        Arc::new(DetachedFiles),
        Arc::new(DetachedOcr),
    )
    .await?;

    println!("ChatWarden v{} admin console", chatwarden::VERSION);
    println!("Commands start with '/', e.g. /help. Ctrl+D exits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let replies = if line.starts_with('/') {
            match AdminCommand::parse(line) {
                Some(command) => bot.handle_admin_command(command, &operator).await,
                None => vec![format!("Unknown command: {}. Try /help.", line)],
            }
        } else {
            bot.handle_admin_free_text(&operator, line).await
        };

        for reply in replies {
            println!("{}", reply);
        }
    }

    info!("Console session ended");
    Ok(())
}

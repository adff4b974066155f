use anyhow::Result;
use log::info;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::WardenConfig;
use crate::platforms::{ChatModeration, FileFetcher, TextExtractor};
use crate::types::{AdminCommand, InboundMessage, ModerationOutcome, PhraseCategory, UserRef};

pub mod admin_commands;
pub mod matching;
pub mod moderation;
pub mod phrases;

use admin_commands::AdminCommands;
use moderation::ModerationSystem;
use phrases::PhraseStore;

/// Core bot engine: owns both deny-list stores and wires the moderation and
/// admin subsystems together. The surrounding transport feeds it updates and
/// ships its replies.
pub struct ModerationBot {
    config: Arc<WardenConfig>,
    text_store: Arc<RwLock<PhraseStore>>,
    image_store: Arc<RwLock<PhraseStore>>,
    moderation_system: ModerationSystem,
    admin_commands: AdminCommands,
}

impl ModerationBot {
    /// Open both deny-list stores (creating their files if missing) and wire
    /// the subsystems against the given platform collaborators.
    pub async fn new(
        config: WardenConfig,
        platform: Arc<dyn ChatModeration>,
        files: Arc<dyn FileFetcher>,
        ocr: Arc<dyn TextExtractor>,
    ) -> Result<Self> {
        let config = Arc::new(config);
        let text_store = Arc::new(RwLock::new(
            PhraseStore::open(PhraseCategory::Text, &config.text_phrases_file).await?,
        ));
        let image_store = Arc::new(RwLock::new(
            PhraseStore::open(PhraseCategory::Image, &config.image_words_file).await?,
        ));

        let moderation_system = ModerationSystem::new(
            text_store.clone(),
            image_store.clone(),
            platform,
            files,
            ocr,
            config.ocr_languages.clone(),
        );
        let admin_commands =
            AdminCommands::new(config.clone(), text_store.clone(), image_store.clone());

        info!(
            "Moderation engine ready ({} admin(s) configured)",
            config.admins.len()
        );

        Ok(Self {
            config,
            text_store,
            image_store,
            moderation_system,
            admin_commands,
        })
    }

    /// Run one inbound group message through classification, deny-list checks
    /// and enforcement.
    pub async fn handle_incoming_message(&self, message: &InboundMessage) -> ModerationOutcome {
        self.moderation_system.handle_incoming_message(message).await
    }

    /// Handle an admin command from a private session.
    pub async fn handle_admin_command(&self, command: AdminCommand, user: &UserRef) -> Vec<String> {
        self.admin_commands.handle_command(command, user).await
    }

    /// Handle free text from a private admin session (dialogue payloads).
    pub async fn handle_admin_free_text(&self, user: &UserRef, text: &str) -> Vec<String> {
        self.admin_commands.handle_free_text(user, text).await
    }

    /// Re-read both deny-list files, picking up out-of-band edits.
    pub async fn refresh_deny_lists(&self) -> Result<()> {
        self.text_store.write().await.refresh().await?;
        self.image_store.write().await.refresh().await?;
        Ok(())
    }

    /// Current entries of one deny-list, insertion order.
    pub async fn deny_list(&self, category: PhraseCategory) -> Vec<String> {
        match category {
            PhraseCategory::Text => self.text_store.read().await.phrases(),
            PhraseCategory::Image => self.image_store.read().await.phrases(),
        }
    }

    pub fn config(&self) -> &WardenConfig {
        &self.config
    }
}

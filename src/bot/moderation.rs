// src/bot/moderation.rs - Message classification, deny-list checks, enforcement

use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::bot::matching::{find_all_words_match, find_substring_match};
use crate::bot::phrases::PhraseStore;
use crate::platforms::{ChatModeration, FileFetcher, TextExtractor};
use crate::types::{
    EnforcementReport, InboundMessage, MessageKind, ModerationOutcome, PhraseCategory,
};

/// Runs every inbound group message through the deny-lists and enforces on
/// match. Chat administrators are exempt; every collaborator failure on the
/// detection side fails open to "leave the message alone".
pub struct ModerationSystem {
    text_store: Arc<RwLock<PhraseStore>>,
    image_store: Arc<RwLock<PhraseStore>>,
    platform: Arc<dyn ChatModeration>,
    files: Arc<dyn FileFetcher>,
    ocr: Arc<dyn TextExtractor>,
    ocr_languages: Vec<String>,
}

impl ModerationSystem {
    pub fn new(
        text_store: Arc<RwLock<PhraseStore>>,
        image_store: Arc<RwLock<PhraseStore>>,
        platform: Arc<dyn ChatModeration>,
        files: Arc<dyn FileFetcher>,
        ocr: Arc<dyn TextExtractor>,
        ocr_languages: Vec<String>,
    ) -> Self {
        Self {
            text_store,
            image_store,
            platform,
            files,
            ocr,
            ocr_languages,
        }
    }

    /// Process one inbound group message end to end: classify, check the
    /// sender's admin status, run the applicable deny-list checks (image
    /// first, then text/caption), and enforce on the first match.
    pub async fn handle_incoming_message(&self, message: &InboundMessage) -> ModerationOutcome {
        let kind = MessageKind::of(message);
        if kind == MessageKind::Other {
            return ModerationOutcome::Ignored;
        }

        // Admin exemption short-circuits everything. A failed lookup must
        // never flag a message, so errors count as exempt.
        match self
            .platform
            .is_administrator(message.message.chat, &message.sender)
            .await
        {
            Ok(true) => {
                debug!("Skipping message from chat admin {}", message.sender.handle());
                return ModerationOutcome::Exempt;
            }
            Ok(false) => {}
            Err(e) => {
                error!(
                    "Admin lookup failed for {} in chat {}: {}",
                    message.sender.handle(),
                    message.message.chat.0,
                    e
                );
                return ModerationOutcome::Exempt;
            }
        }

        if kind.is_image() {
            if let Some(phrase) = self.check_image(message).await {
                let report = self.enforce(message, PhraseCategory::Image, &phrase).await;
                return ModerationOutcome::Enforced {
                    category: PhraseCategory::Image,
                    phrase,
                    report,
                };
            }
        }

        if let Some(text) = message.text_body() {
            let store = self.text_store.read().await;
            if let Some(phrase) = find_substring_match(text, store.entries()) {
                let phrase = phrase.to_string();
                drop(store);
                let report = self.enforce(message, PhraseCategory::Text, &phrase).await;
                return ModerationOutcome::Enforced {
                    category: PhraseCategory::Text,
                    phrase,
                    report,
                };
            }
        }

        ModerationOutcome::Clean
    }

    /// Download the image, run OCR, and match the extracted text against the
    /// image deny-list. Any failure along the way is logged and treated as
    /// "no match"; a broken download or OCR pass must not take the whole
    /// update down with it.
    async fn check_image(&self, message: &InboundMessage) -> Option<String> {
        let Some(file) = message.image_file() else {
            debug!(
                "Image-shaped message {} has no downloadable file, skipping OCR check",
                message.message.id
            );
            return None;
        };

        let bytes = match self.files.download_file(file).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Image download failed for message {}: {}", message.message.id, e);
                return None;
            }
        };

        let extracted = match self.ocr.extract_text(&bytes, &self.ocr_languages).await {
            Ok(text) => text,
            Err(e) => {
                warn!("OCR failed for message {}: {}", message.message.id, e);
                return None;
            }
        };

        if extracted.trim().is_empty() {
            return None;
        }

        let store = self.image_store.read().await;
        find_all_words_match(&extracted, store.entries()).map(str::to_string)
    }

    /// Ban the sender and delete the message. Both run even if one fails;
    /// neither is retried. The group sees only the side effects.
    async fn enforce(
        &self,
        message: &InboundMessage,
        category: PhraseCategory,
        phrase: &str,
    ) -> EnforcementReport {
        let sender = message.sender.handle();
        info!(
            "Deny-list hit ({}) from {} in chat {}: {:?}",
            category, sender, message.message.chat.0, phrase
        );

        let ban_ok = self
            .platform
            .ban_user(message.message.chat, &message.sender)
            .await;
        if !ban_ok {
            error!("Failed to ban {} in chat {}", sender, message.message.chat.0);
        }

        let delete_ok = self.platform.delete_message(message.message).await;
        if !delete_ok {
            error!(
                "Failed to delete message {} in chat {}",
                message.message.id, message.message.chat.0
            );
        }

        let report = EnforcementReport { ban_ok, delete_ok };
        if report.fully_handled() {
            info!("Banned {} and deleted message {}", sender, message.message.id);
        } else {
            warn!(
                "Partial enforcement for message {}: ban={}, delete={}",
                message.message.id, ban_ok, delete_ok
            );
        }
        report
    }
}

//! # ChatWarden
//!
//! A deny-list moderation engine for group chats, written in Rust. Incoming
//! text and image messages are checked against administrator-maintained
//! deny-lists; offenders are banned and their messages deleted.
//!
//! ## Features
//!
//! - **Two deny-list categories**: free-text phrases (contiguous substring
//!   match) and image word combinations (all-words-present match over OCR
//!   output, tolerant of scrambled word order)
//! - **Persisted lists**: one plain-text file per category, rewritten in full
//!   on every mutation so disk never diverges from memory
//! - **Conversational admin interface**: add/remove/list via a small
//!   per-admin dialogue state machine
//! - **Fail-open detection**: admin-lookup, download and OCR failures never
//!   punish a user or crash message processing
//! - **Transport-agnostic**: the chat platform, file download and OCR engine
//!   sit behind async traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatwarden::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run(platform: Arc<dyn chatwarden::platforms::ChatModeration>,
//! #              files: Arc<dyn chatwarden::platforms::FileFetcher>,
//! #              ocr: Arc<dyn chatwarden::platforms::TextExtractor>) -> anyhow::Result<()> {
//! let config = WardenConfig::load("warden.toml").await?;
//! let bot = ModerationBot::new(config, platform, files, ocr).await?;
//!
//! // Transport layer feeds updates in:
//! // let outcome = bot.handle_incoming_message(&message).await;
//! # Ok(())
//! # }
//! ```

pub mod bot;
pub mod config;
pub mod platforms;
pub mod types;

// Re-export commonly used items
pub mod prelude {
    pub use crate::bot::phrases::PhraseStore;
    pub use crate::bot::ModerationBot;
    pub use crate::config::WardenConfig;
    pub use crate::platforms::{ChatModeration, FileFetcher, TextExtractor};
    pub use crate::types::{
        AdminCommand, AdminDialogueState, InboundMessage, MessageKind, ModerationOutcome,
        PhraseCategory,
    };
    pub use anyhow::Result;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{ChatRef, FileRef, MessageRef, UserRef};

/// Chat-platform actions the moderation core depends on. Implementations live
/// with the transport; tests use mocks.
#[async_trait]
pub trait ChatModeration: Send + Sync {
    /// Whether the user is an administrator or creator of the chat.
    /// Errors here mean the caller must fail open and take no action.
    async fn is_administrator(&self, chat: ChatRef, user: &UserRef) -> Result<bool>;

    /// Delete a message. Returns success/failure, never an error: a delete
    /// that cannot happen is terminal for that message.
    async fn delete_message(&self, message: MessageRef) -> bool;

    /// Ban a user from a chat. Same success/failure contract as delete.
    async fn ban_user(&self, chat: ChatRef, user: &UserRef) -> bool;
}

/// Fetches raw file bytes for an attachment reference.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    async fn download_file(&self, file: &FileRef) -> Result<Vec<u8>>;
}

/// Black-box OCR boundary: image bytes in, recognized text out.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, image: &[u8], language_hints: &[String]) -> Result<String>;
}

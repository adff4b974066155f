// src/types/mod.rs - Core message and deny-list types

use serde::{Deserialize, Serialize};

/// Opaque handle the transport layer uses to reference a downloadable file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef(pub String);

/// Chat identifier as assigned by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatRef(pub i64);

/// A message within a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat: ChatRef,
    pub id: i64,
}

/// Message sender as seen by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: String,
}

impl UserRef {
    /// Display handle for log lines: "@username" when set, first name otherwise.
    pub fn handle(&self) -> String {
        match &self.username {
            Some(name) => format!("@{}", name),
            None => self.first_name.clone(),
        }
    }
}

/// Attached document metadata, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub file: FileRef,
    pub mime_type: Option<String>,
    pub file_name: Option<String>,
}

/// One inbound chat update, flattened out of the platform's message shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub message: MessageRef,
    pub sender: UserRef,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub photo: Option<FileRef>,
    pub document: Option<DocumentInfo>,
    pub media_group_id: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl InboundMessage {
    /// The text body a substring check should run against, if any.
    /// Captions count the same as plain text.
    pub fn text_body(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }

    /// File reference for the image payload, if the message carries one.
    pub fn image_file(&self) -> Option<&FileRef> {
        if let Some(photo) = &self.photo {
            return Some(photo);
        }
        match &self.document {
            Some(doc) if document_is_image(doc) => Some(&doc.file),
            _ => None,
        }
    }
}

/// File extensions treated as images when a document has no usable MIME type.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff"];

fn document_is_image(doc: &DocumentInfo) -> bool {
    if let Some(mime) = &doc.mime_type {
        if mime.starts_with("image/") {
            return true;
        }
    }
    if let Some(name) = &doc.file_name {
        if let Some((_, ext)) = name.rsplit_once('.') {
            return IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str());
        }
    }
    false
}

/// Closed classification of an inbound message, computed once per update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    PlainText,
    Caption,
    ImagePhoto,
    ImageDocument,
    Other,
}

impl MessageKind {
    /// Classify a message into exactly one kind. Image shapes win over the
    /// caption they may carry; a bare media-group member counts as a photo.
    pub fn of(message: &InboundMessage) -> Self {
        if message.photo.is_some() {
            return MessageKind::ImagePhoto;
        }
        if let Some(doc) = &message.document {
            if document_is_image(doc) {
                return MessageKind::ImageDocument;
            }
        }
        if message.media_group_id.is_some() {
            return MessageKind::ImagePhoto;
        }
        if message.caption.is_some() {
            return MessageKind::Caption;
        }
        if message.text.is_some() {
            return MessageKind::PlainText;
        }
        MessageKind::Other
    }

    pub fn is_image(&self) -> bool {
        matches!(self, MessageKind::ImagePhoto | MessageKind::ImageDocument)
    }
}

/// Which deny-list a phrase or check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhraseCategory {
    /// Free-text phrases, matched by substring containment.
    Text,
    /// Image keyword lines, matched against OCR output word by word.
    Image,
}

impl PhraseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhraseCategory::Text => "text",
            PhraseCategory::Image => "image",
        }
    }
}

impl std::fmt::Display for PhraseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin-facing commands, already parsed by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    Start,
    Help,
    AddTextPhrase,
    RemoveTextPhrase,
    ListTextPhrases,
    AddImageWord,
    RemoveImageWord,
    ListImageWords,
    Cancel,
}

impl AdminCommand {
    /// Parse a slash-command name ("add_phrase", "/add_phrase").
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().trim_start_matches('/') {
            "start" => Some(AdminCommand::Start),
            "help" => Some(AdminCommand::Help),
            "add_phrase" => Some(AdminCommand::AddTextPhrase),
            "remove_phrase" => Some(AdminCommand::RemoveTextPhrase),
            "list_phrases" => Some(AdminCommand::ListTextPhrases),
            "add_image_word" => Some(AdminCommand::AddImageWord),
            "remove_image_word" => Some(AdminCommand::RemoveImageWord),
            "list_image_words" => Some(AdminCommand::ListImageWords),
            "cancel" => Some(AdminCommand::Cancel),
            _ => None,
        }
    }
}

/// Per-admin dialogue position. Lives only in memory; an admin repeats the
/// command after a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminDialogueState {
    #[default]
    Idle,
    AwaitingAddTextPhrase,
    AwaitingRemoveTextPhrase,
    AwaitingAddImageWord,
    AwaitingRemoveImageWord,
}

/// Result of both enforcement sub-actions for one offending message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnforcementReport {
    pub ban_ok: bool,
    pub delete_ok: bool,
}

impl EnforcementReport {
    pub fn fully_handled(&self) -> bool {
        self.ban_ok && self.delete_ok
    }
}

/// What the moderation pass decided for one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// Sender is a chat administrator, or the membership lookup failed.
    Exempt,
    /// Nothing in the message tripped a deny-list.
    Clean,
    /// Message shape carries nothing checkable.
    Ignored,
    /// A deny-list entry matched and enforcement ran.
    Enforced {
        category: PhraseCategory,
        phrase: String,
        report: EnforcementReport,
    },
}

// src/bot/admin_commands.rs - Conversational deny-list management for admins

use log::{error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::bot::phrases::PhraseStore;
use crate::config::WardenConfig;
use crate::types::{AdminCommand, AdminDialogueState, PhraseCategory, UserRef};

/// Platform ceiling for a single outgoing message; list replies are chunked
/// to stay under it.
const MESSAGE_CEILING: usize = 4096;

const PERMISSION_DENIED: &str = "❌ You are not allowed to manage this bot.";

const GREETING: &str = "\
Hi! I moderate group chats by removing messages that contain banned phrases, \
words and letter combinations, including text found inside images.";

const COMMAND_OVERVIEW: &str = "\
Available commands:
/add_phrase - Add a banned text phrase
/remove_phrase - Remove a banned text phrase
/list_phrases - Show all banned text phrases
/add_image_word - Add a banned image word combination
/remove_image_word - Remove a banned image word combination
/list_image_words - Show all banned image word combinations
/help - Show this help
/cancel - Cancel the current operation";

/// Handles the private admin dialogue: commands arm a per-user awaiting
/// state, the next free-text message is consumed as the phrase payload, and
/// the state always resets to idle afterwards.
pub struct AdminCommands {
    config: Arc<WardenConfig>,
    text_store: Arc<RwLock<PhraseStore>>,
    image_store: Arc<RwLock<PhraseStore>>,
    sessions: RwLock<HashMap<i64, AdminDialogueState>>,
}

impl AdminCommands {
    pub fn new(
        config: Arc<WardenConfig>,
        text_store: Arc<RwLock<PhraseStore>>,
        image_store: Arc<RwLock<PhraseStore>>,
    ) -> Self {
        Self {
            config,
            text_store,
            image_store,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Handle an already-parsed admin command. Returns the reply chunks to
    /// send back to the admin's private session.
    pub async fn handle_command(&self, command: AdminCommand, user: &UserRef) -> Vec<String> {
        if !self.config.is_admin(user.username.as_deref()) {
            warn!("Rejected admin command {:?} from {}", command, user.handle());
            return vec![PERMISSION_DENIED.to_string()];
        }

        match command {
            AdminCommand::Start => {
                vec![format!("{}\n\n{}", GREETING, COMMAND_OVERVIEW)]
            }
            AdminCommand::Help => vec![COMMAND_OVERVIEW.to_string()],
            AdminCommand::AddTextPhrase => {
                self.arm(user, AdminDialogueState::AwaitingAddTextPhrase).await;
                vec!["📝 Send the phrase to add to the banned text list:".to_string()]
            }
            AdminCommand::RemoveTextPhrase => {
                self.arm(user, AdminDialogueState::AwaitingRemoveTextPhrase).await;
                vec!["🗑 Send the phrase to remove from the banned text list:".to_string()]
            }
            AdminCommand::AddImageWord => {
                self.arm(user, AdminDialogueState::AwaitingAddImageWord).await;
                vec!["📝 Send the word combination to add to the banned image list:".to_string()]
            }
            AdminCommand::RemoveImageWord => {
                self.arm(user, AdminDialogueState::AwaitingRemoveImageWord).await;
                vec!["🗑 Send the word combination to remove from the banned image list:".to_string()]
            }
            AdminCommand::ListTextPhrases => {
                let phrases = self.text_store.read().await.phrases();
                list_reply("📝 Banned text phrases:", &phrases)
            }
            AdminCommand::ListImageWords => {
                let phrases = self.image_store.read().await.phrases();
                list_reply("📝 Banned image word combinations:", &phrases)
            }
            AdminCommand::Cancel => {
                let had_state = self
                    .sessions
                    .write()
                    .await
                    .remove(&user.id)
                    .map(|state| state != AdminDialogueState::Idle)
                    .unwrap_or(false);
                if had_state {
                    vec!["❌ Operation cancelled.".to_string()]
                } else {
                    // Cancel while idle is a harmless no-op.
                    Vec::new()
                }
            }
        }
    }

    /// Handle a free-text message in the admin's private session. Consumes
    /// the pending awaiting state, if any; text arriving while idle does
    /// nothing.
    pub async fn handle_free_text(&self, user: &UserRef, text: &str) -> Vec<String> {
        if !self.config.is_admin(user.username.as_deref()) {
            warn!("Rejected admin free text from {}", user.handle());
            return vec![PERMISSION_DENIED.to_string()];
        }

        // One payload per command: the state resets no matter how the store
        // call turns out.
        let state = self
            .sessions
            .write()
            .await
            .remove(&user.id)
            .unwrap_or(AdminDialogueState::Idle);

        match state {
            AdminDialogueState::Idle => Vec::new(),
            AdminDialogueState::AwaitingAddTextPhrase => {
                self.apply_add(&self.text_store, PhraseCategory::Text, user, text).await
            }
            AdminDialogueState::AwaitingRemoveTextPhrase => {
                self.apply_remove(&self.text_store, PhraseCategory::Text, user, text).await
            }
            AdminDialogueState::AwaitingAddImageWord => {
                self.apply_add(&self.image_store, PhraseCategory::Image, user, text).await
            }
            AdminDialogueState::AwaitingRemoveImageWord => {
                self.apply_remove(&self.image_store, PhraseCategory::Image, user, text).await
            }
        }
    }

    /// Current dialogue state for a user; Idle when no session exists.
    pub async fn dialogue_state(&self, user_id: i64) -> AdminDialogueState {
        self.sessions
            .read()
            .await
            .get(&user_id)
            .copied()
            .unwrap_or(AdminDialogueState::Idle)
    }

    async fn arm(&self, user: &UserRef, state: AdminDialogueState) {
        self.sessions.write().await.insert(user.id, state);
    }

    async fn apply_add(
        &self,
        store: &Arc<RwLock<PhraseStore>>,
        category: PhraseCategory,
        user: &UserRef,
        phrase: &str,
    ) -> Vec<String> {
        let phrase = phrase.trim();
        match store.write().await.add(phrase).await {
            Ok(true) => {
                info!("Admin {} added {} deny-list entry: {}", user.handle(), category, phrase);
                vec![format!("✅ \"{}\" added to the banned {} list.", phrase, category)]
            }
            Ok(false) => vec![format!("❌ \"{}\" is already on the banned {} list.", phrase, category)],
            Err(e) => {
                error!("Add to {} deny-list failed: {}", category, e);
                vec![format!("⚠️ Could not save \"{}\": {}. Nothing was changed.", phrase, e)]
            }
        }
    }

    async fn apply_remove(
        &self,
        store: &Arc<RwLock<PhraseStore>>,
        category: PhraseCategory,
        user: &UserRef,
        phrase: &str,
    ) -> Vec<String> {
        let phrase = phrase.trim();
        match store.write().await.remove(phrase).await {
            Ok(true) => {
                info!("Admin {} removed {} deny-list entry: {}", user.handle(), category, phrase);
                vec![format!("✅ \"{}\" removed from the banned {} list.", phrase, category)]
            }
            Ok(false) => vec![format!("❌ \"{}\" is not on the banned {} list.", phrase, category)],
            Err(e) => {
                error!("Remove from {} deny-list failed: {}", category, e);
                vec![format!("⚠️ Could not remove \"{}\": {}. Nothing was changed.", phrase, e)]
            }
        }
    }
}

/// Render a deny-list as bulleted reply chunks, each under the message
/// ceiling. The header rides on the first chunk only.
fn list_reply(header: &str, phrases: &[String]) -> Vec<String> {
    if phrases.is_empty() {
        return vec!["📝 The list is empty.".to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = header.to_string();
    for phrase in phrases {
        let line = format!("\n• {}", phrase);
        if current.len() + line.len() > MESSAGE_CEILING {
            chunks.push(current);
            current = line.trim_start_matches('\n').to_string();
        } else {
            current.push_str(&line);
        }
    }
    chunks.push(current);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct Fixture {
        admin: AdminCommands,
        text_store: Arc<RwLock<PhraseStore>>,
        image_store: Arc<RwLock<PhraseStore>>,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let text_store = Arc::new(RwLock::new(
            PhraseStore::open(PhraseCategory::Text, dir.path().join("text.txt"))
                .await
                .unwrap(),
        ));
        let image_store = Arc::new(RwLock::new(
            PhraseStore::open(PhraseCategory::Image, dir.path().join("image.txt"))
                .await
                .unwrap(),
        ));
        let config = Arc::new(WardenConfig {
            admins: vec!["boss".to_string()],
            ..WardenConfig::default()
        });
        Fixture {
            admin: AdminCommands::new(config, text_store.clone(), image_store.clone()),
            text_store,
            image_store,
            _dir: dir,
        }
    }

    fn admin_user() -> UserRef {
        UserRef { id: 1, username: Some("boss".into()), first_name: "Boss".into() }
    }

    fn stranger() -> UserRef {
        UserRef { id: 2, username: Some("mallory".into()), first_name: "Mallory".into() }
    }

    #[tokio::test]
    async fn non_admin_commands_are_denied_without_state_change() {
        let fx = fixture().await;
        let replies = fx.admin.handle_command(AdminCommand::AddTextPhrase, &stranger()).await;
        assert_eq!(replies, vec![PERMISSION_DENIED.to_string()]);
        assert_eq!(fx.admin.dialogue_state(stranger().id).await, AdminDialogueState::Idle);
    }

    #[tokio::test]
    async fn non_admin_free_text_is_denied_and_mutates_nothing() {
        let fx = fixture().await;
        let replies = fx.admin.handle_free_text(&stranger(), "spam offer").await;
        assert_eq!(replies, vec![PERMISSION_DENIED.to_string()]);
        assert!(fx.text_store.read().await.is_empty());
    }

    #[tokio::test]
    async fn add_dialogue_adds_exactly_once_and_resets() {
        let fx = fixture().await;
        let user = admin_user();

        fx.admin.handle_command(AdminCommand::AddTextPhrase, &user).await;
        assert_eq!(
            fx.admin.dialogue_state(user.id).await,
            AdminDialogueState::AwaitingAddTextPhrase
        );

        let replies = fx.admin.handle_free_text(&user, "spam offer").await;
        assert!(replies[0].contains("added"));
        assert_eq!(fx.text_store.read().await.phrases(), vec!["spam offer".to_string()]);
        assert_eq!(fx.admin.dialogue_state(user.id).await, AdminDialogueState::Idle);

        // Follow-up text while idle mutates nothing and stays silent.
        let replies = fx.admin.handle_free_text(&user, "another phrase").await;
        assert!(replies.is_empty());
        assert_eq!(fx.text_store.read().await.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_add_reports_and_resets() {
        let fx = fixture().await;
        let user = admin_user();
        fx.text_store.write().await.add("spam offer").await.unwrap();

        fx.admin.handle_command(AdminCommand::AddTextPhrase, &user).await;
        let replies = fx.admin.handle_free_text(&user, "SPAM OFFER").await;
        assert!(replies[0].contains("already"));
        assert_eq!(fx.text_store.read().await.len(), 1);
        assert_eq!(fx.admin.dialogue_state(user.id).await, AdminDialogueState::Idle);
    }

    #[tokio::test]
    async fn remove_dialogue_handles_missing_phrase() {
        let fx = fixture().await;
        let user = admin_user();

        fx.admin.handle_command(AdminCommand::RemoveTextPhrase, &user).await;
        let replies = fx.admin.handle_free_text(&user, "never added").await;
        assert!(replies[0].contains("not on"));
        assert_eq!(fx.admin.dialogue_state(user.id).await, AdminDialogueState::Idle);
    }

    #[tokio::test]
    async fn image_dialogue_routes_to_image_store() {
        let fx = fixture().await;
        let user = admin_user();

        fx.admin.handle_command(AdminCommand::AddImageWord, &user).await;
        fx.admin.handle_free_text(&user, "cheap watches").await;

        assert!(fx.text_store.read().await.is_empty());
        assert_eq!(fx.image_store.read().await.phrases(), vec!["cheap watches".to_string()]);
    }

    #[tokio::test]
    async fn cancel_clears_awaiting_state() {
        let fx = fixture().await;
        let user = admin_user();

        fx.admin.handle_command(AdminCommand::RemoveImageWord, &user).await;
        let replies = fx.admin.handle_command(AdminCommand::Cancel, &user).await;
        assert_eq!(replies, vec!["❌ Operation cancelled.".to_string()]);
        assert_eq!(fx.admin.dialogue_state(user.id).await, AdminDialogueState::Idle);

        // Text after cancel must not mutate anything.
        let replies = fx.admin.handle_free_text(&user, "cheap watches").await;
        assert!(replies.is_empty());
        assert!(fx.image_store.read().await.is_empty());
    }

    #[tokio::test]
    async fn cancel_while_idle_is_a_silent_no_op() {
        let fx = fixture().await;
        let replies = fx.admin.handle_command(AdminCommand::Cancel, &admin_user()).await;
        assert!(replies.is_empty());
    }

    #[tokio::test]
    async fn list_reports_empty_list() {
        let fx = fixture().await;
        let replies = fx.admin.handle_command(AdminCommand::ListTextPhrases, &admin_user()).await;
        assert_eq!(replies, vec!["📝 The list is empty.".to_string()]);
    }

    #[tokio::test]
    async fn list_shows_entries_in_insertion_order() {
        let fx = fixture().await;
        {
            let mut store = fx.text_store.write().await;
            store.add("first").await.unwrap();
            store.add("second").await.unwrap();
        }
        let replies = fx.admin.handle_command(AdminCommand::ListTextPhrases, &admin_user()).await;
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("• first\n• second"));
    }

    #[test]
    fn long_lists_are_chunked_under_the_ceiling() {
        let phrases: Vec<String> = (0..200)
            .map(|i| format!("a rather long banned phrase number {:03} with padding text", i))
            .collect();
        let chunks = list_reply("📝 Banned text phrases:", &phrases);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= MESSAGE_CEILING);
        }
        let merged = chunks.join("\n");
        for phrase in &phrases {
            assert!(merged.contains(phrase.as_str()));
        }
    }

    #[tokio::test]
    async fn help_lists_all_commands() {
        let fx = fixture().await;
        let replies = fx.admin.handle_command(AdminCommand::Help, &admin_user()).await;
        assert!(replies[0].contains("/add_phrase"));
        assert!(replies[0].contains("/list_image_words"));
        assert!(replies[0].contains("/cancel"));
    }
}

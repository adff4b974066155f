// src/bot/phrases.rs - Persisted deny-list storage, one store per category

use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::types::PhraseCategory;

/// Errors a deny-list mutation can surface to the admin layer.
/// Duplicate adds and missing removes are not errors; they come back as
/// `Ok(false)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to persist deny-list to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load deny-list from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One category's deny-list: an ordered, case-insensitively-unique sequence of
/// phrases mirrored 1:1 to a line-delimited UTF-8 file.
///
/// Mutations rewrite the whole file and only then update memory, so a failed
/// write never leaves memory ahead of disk. The lists stay small (tens to low
/// hundreds of entries); the O(n) rewrite is a non-issue at admin cadence.
pub struct PhraseStore {
    category: PhraseCategory,
    path: PathBuf,
    phrases: Vec<String>,
}

impl PhraseStore {
    /// Open the store for `category`, creating an empty file if none exists.
    pub async fn open(category: PhraseCategory, path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let phrases = Self::load_lines(&path).await?;
        info!("Loaded {} {} deny-list entr(ies) from {}", phrases.len(), category, path.display());
        Ok(Self { category, path, phrases })
    }

    async fn load_lines(path: &Path) -> Result<Vec<String>, StoreError> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).await.map_err(|source| StoreError::Load {
                        path: path.to_path_buf(),
                        source,
                    })?;
                }
            }
            fs::write(path, "").await.map_err(|source| StoreError::Load {
                path: path.to_path_buf(),
                source,
            })?;
            debug!("Created empty deny-list file at {}", path.display());
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(path).await.map_err(|source| StoreError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Append a phrase. Returns `Ok(false)` without touching anything when an
    /// entry already equals it case-insensitively.
    pub async fn add(&mut self, phrase: &str) -> Result<bool, StoreError> {
        let normalized = phrase.trim();
        if normalized.is_empty() {
            return Ok(false);
        }
        let lowered = normalized.to_lowercase();
        if self.phrases.iter().any(|existing| existing.to_lowercase() == lowered) {
            debug!("Duplicate {} deny-list entry rejected: {}", self.category, normalized);
            return Ok(false);
        }

        let mut next = self.phrases.clone();
        next.push(normalized.to_string());
        self.persist(&next).await?;
        self.phrases = next;
        Ok(true)
    }

    /// Remove the first entry case-insensitively equal to `phrase`.
    /// Returns `Ok(false)` when no entry matches.
    pub async fn remove(&mut self, phrase: &str) -> Result<bool, StoreError> {
        let lowered = phrase.trim().to_lowercase();
        let Some(index) = self.phrases.iter().position(|existing| existing.to_lowercase() == lowered) else {
            return Ok(false);
        };

        let mut next = self.phrases.clone();
        next.remove(index);
        self.persist(&next).await?;
        self.phrases = next;
        Ok(true)
    }

    /// Current entries in insertion order, as a defensive copy.
    pub fn phrases(&self) -> Vec<String> {
        self.phrases.clone()
    }

    /// Borrow the entries for matching without copying.
    pub fn entries(&self) -> &[String] {
        &self.phrases
    }

    /// Re-read the persisted file, replacing the in-memory view. Used after
    /// out-of-band edits instead of reloading on every incoming message.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        self.phrases = Self::load_lines(&self.path).await?;
        debug!("Refreshed {} deny-list: {} entr(ies)", self.category, self.phrases.len());
        Ok(())
    }

    pub fn category(&self) -> PhraseCategory {
        self.category
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Full-file rewrite. Memory is only updated by callers after this
    /// succeeds, keeping disk and memory byte-for-byte consistent.
    async fn persist(&self, phrases: &[String]) -> Result<(), StoreError> {
        let mut contents = String::new();
        for phrase in phrases {
            contents.push_str(phrase);
            contents.push('\n');
        }
        fs::write(&self.path, contents).await.map_err(|source| {
            warn!("Deny-list write to {} failed: {}", self.path.display(), source);
            StoreError::Persist {
                path: self.path.clone(),
                source,
            }
        })
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// A pending task. Created on submission, destroyed on completion or
/// deletion, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a task from raw user input.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyText`] if the text is blank.
    pub fn new(text: &str, created_at: DateTime<Utc>) -> Result<Self, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            created_at,
        })
    }
}

/// Snapshot of a completed task's text, kept after the task is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub text: String,
    pub completed_at: DateTime<Utc>,
}

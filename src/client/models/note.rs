//! Issue note models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Note (comment or system event) on an issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,

    #[serde(default)]
    pub body: String,

    /// True for notes generated by GitLab itself
    #[serde(default)]
    pub system: bool,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub system_note_metadata: Option<SystemNoteMetadata>,
}

/// Structured description of a system note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemNoteMetadata {
    #[serde(default)]
    pub action: Option<String>,
}

impl Note {
    /// Action tag from the system note metadata, if any.
    pub fn action(&self) -> Option<&str> {
        self.system_note_metadata
            .as_ref()
            .and_then(|m| m.action.as_deref())
    }
}

use serde::{Deserialize, Serialize};

/// One entry of the sidebar chat list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChatListItem {
    pub id: String,
    pub title: String,
    pub updated_at: i64,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

/// A saved prompt, invoked in the composer by its `/command`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Prompt {
    pub command: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub timestamp: i64,
}

/// A knowledge document available for retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Document {
    pub collection_name: String,
    pub filename: String,
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Banner {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissible: Option<bool>,
    pub timestamp: i64,
}

impl Banner {
    pub fn is_dismissible(&self) -> bool {
        self.dismissible.unwrap_or(false)
    }
}

impl Prompt {
    /// Matches `/summarize` as well as `summarize`.
    pub fn matches_command(&self, input: &str) -> bool {
        let command = self.command.trim_start_matches('/');
        input.trim_start_matches('/') == command
    }
}

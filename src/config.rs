use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Backend configuration as returned by the bootstrap request. Read-only on
/// the front end.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub status: bool,
    pub name: String,
    pub version: String,
    pub default_locale: String,
    /// Comma separated model ids.
    pub default_models: String,
    pub default_prompt_suggestions: Vec<PromptSuggestion>,
    pub features: Features,
    pub oauth: OAuth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiOverrides>,
}

impl Config {
    pub fn default_model_ids(&self) -> Vec<&str> {
        self.default_models
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect()
    }

    pub fn oauth_provider(&self, key: &str) -> Option<&str> {
        self.oauth.providers.get(key).map(String::as_str)
    }

    pub fn pending_user_overlay_title(&self) -> Option<&str> {
        self.ui.as_ref()?.pending_user_overlay_title.as_deref()
    }

    pub fn pending_user_overlay_description(&self) -> Option<&str> {
        self.ui.as_ref()?.pending_user_overlay_description.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PromptSuggestion {
    pub content: String,
    /// Heading and sub-heading.
    pub title: (String, String),
}

/// Flags the backend reports. A flag the backend leaves out reads as off.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub auth: bool,
    pub auth_trusted_header: bool,
    pub enable_api_key: bool,
    pub enable_signup: bool,
    pub enable_login_form: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_web_search: Option<bool>,
    pub enable_google_drive_integration: bool,
    pub enable_onedrive_integration: bool,
    pub enable_image_generation: bool,
    pub enable_admin_export: bool,
    pub enable_admin_chat_access: bool,
    pub enable_community_sharing: bool,
    pub enable_autocomplete_generation: bool,
    pub enable_direct_connections: bool,
}

impl Features {
    pub fn web_search_enabled(&self) -> bool {
        self.enable_web_search.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuth {
    /// Provider key to display name.
    pub providers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_user_overlay_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_user_overlay_description: Option<String>,
}

use std::collections::BTreeMap;

use leptos::logging::log;
use leptos::prelude::*;
use serde_json::Value;

use crate::chat::types::{Banner, Channel, ChatListItem, Document, Prompt, Tag};
use crate::config::Config;
use crate::constants::{APP_NAME, DEFAULT_THEME};
use crate::emoji::{self, EmojiLookup};
use crate::model::Model;
use crate::persistence;
use crate::session::SessionUser;
use crate::settings::Settings;
use crate::store::Store;

/// Every piece of shared front-end state, one [`Store`] per cell. Cloning the
/// container clones the handles, so all clones share the same cells.
#[derive(Clone, Debug)]
pub struct GlobalState {
    // Backend
    pub webui_name: Store<String>,
    pub config: Store<Option<Config>>,
    pub user: Store<Option<SessionUser>>,

    // Desktop shell
    pub is_app: Store<bool>,
    pub app_info: Store<Option<Value>>,
    pub app_data: Store<Option<Value>>,

    // Frontend
    pub model_download_pool: Store<BTreeMap<String, Value>>,
    pub mobile: Store<bool>,
    pub active_user_ids: Store<Option<Vec<String>>>,
    pub usage_pool: Store<Option<Vec<String>>>,
    pub theme: Store<String>,
    pub shortcodes_to_emojis: Store<EmojiLookup>,

    // Current chat
    pub chat_id: Store<String>,
    pub chat_title: Store<String>,

    pub channels: Store<Vec<Channel>>,
    pub chats: Store<Option<Vec<ChatListItem>>>,
    pub pinned_chats: Store<Vec<ChatListItem>>,
    pub tags: Store<Vec<Tag>>,

    pub models: Store<Vec<Model>>,

    pub prompts: Store<Option<Vec<Prompt>>>,
    pub knowledge: Store<Option<Vec<Document>>>,
    pub tools: Store<Option<Vec<Value>>>,
    pub functions: Store<Option<Vec<Value>>>,
    pub tool_servers: Store<Vec<Value>>,

    pub banners: Store<Vec<Banner>>,

    pub settings: Store<Settings>,

    // Panels and overlays
    pub show_sidebar: Store<bool>,
    pub show_search: Store<bool>,
    pub show_settings: Store<bool>,
    pub show_archived_chats: Store<bool>,
    pub show_changelog: Store<bool>,
    pub show_controls: Store<bool>,
    pub show_overview: Store<bool>,
    pub show_artifacts: Store<bool>,
    pub show_call_overlay: Store<bool>,

    pub artifact_code: Store<Option<Vec<String>>>,

    pub temporary_chat_enabled: Store<bool>,
    pub scroll_pagination_enabled: Store<bool>,
    pub current_chat_page: Store<u32>,

    pub is_last_active_tab: Store<bool>,
    pub playing_notification_sound: Store<bool>,
}

impl GlobalState {
    pub fn new() -> Self {
        let state = Self {
            webui_name: Store::new(APP_NAME.to_string()),
            config: Store::new(None),
            user: Store::new(None),

            is_app: Store::new(false),
            app_info: Store::new(None),
            app_data: Store::new(None),

            model_download_pool: Store::new(BTreeMap::new()),
            mobile: Store::new(false),
            active_user_ids: Store::new(None),
            usage_pool: Store::new(None),
            theme: Store::new(DEFAULT_THEME.to_string()),
            shortcodes_to_emojis: Store::new(emoji::default_lookup()),

            chat_id: Store::new(String::new()),
            chat_title: Store::new(String::new()),

            channels: Store::new(Vec::new()),
            chats: Store::new(None),
            pinned_chats: Store::new(Vec::new()),
            tags: Store::new(Vec::new()),

            models: Store::new(Vec::new()),

            prompts: Store::new(None),
            knowledge: Store::new(None),
            tools: Store::new(None),
            functions: Store::new(None),
            tool_servers: Store::new(Vec::new()),

            banners: Store::new(Vec::new()),

            settings: Store::new(Settings::default()),

            show_sidebar: Store::new(false),
            show_search: Store::new(false),
            show_settings: Store::new(false),
            show_archived_chats: Store::new(false),
            show_changelog: Store::new(false),
            show_controls: Store::new(false),
            show_overview: Store::new(false),
            show_artifacts: Store::new(false),
            show_call_overlay: Store::new(false),

            artifact_code: Store::new(None),

            temporary_chat_enabled: Store::new(false),
            scroll_pagination_enabled: Store::new(false),
            current_chat_page: Store::new(1),

            is_last_active_tab: Store::new(true),
            playing_notification_sound: Store::new(false),
        };
        log!("[DEBUG] [GlobalState] Initialized state cells.");
        state
    }

    /// Replaces the settings cell with a stored document read over the
    /// defaults. See [`persistence::load_settings`].
    pub fn restore_settings(&self, stored: Option<&str>) {
        self.settings.set(persistence::load_settings(stored));
    }

    pub fn shortcode_for(&self, emoji: &str) -> Option<String> {
        self.shortcodes_to_emojis
            .with(|lookup| emoji::shortcode_for(lookup, emoji).map(str::to_owned))
    }

    pub fn find_model(&self, id: &str) -> Option<Model> {
        self.models
            .with(|models| models.iter().find(|m| m.id() == id).cloned())
    }
}

impl Default for GlobalState {
    fn default() -> Self {
        Self::new()
    }
}

/// Makes `state` available to every component below the current owner.
pub fn provide_global_state(state: GlobalState) {
    provide_context(state);
}

pub fn use_global_state() -> Option<GlobalState> {
    use_context::<GlobalState>()
}

/// Panics when no ancestor provided a [`GlobalState`].
pub fn expect_global_state() -> GlobalState {
    expect_context::<GlobalState>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_flags_start_hidden() {
        let state = GlobalState::new();
        for flag in [
            &state.show_sidebar,
            &state.show_search,
            &state.show_settings,
            &state.show_archived_chats,
            &state.show_changelog,
            &state.show_controls,
            &state.show_overview,
            &state.show_artifacts,
            &state.show_call_overlay,
        ] {
            assert!(!flag.get());
        }
    }

    #[test]
    fn containers_are_isolated() {
        let first = GlobalState::new();
        let second = GlobalState::new();
        first.chat_id.set("abc".to_string());
        assert_eq!(second.chat_id.get(), "");

        let shared = first.clone();
        assert_eq!(shared.chat_id.get(), "abc");
    }

    #[test]
    fn restore_settings_notifies_subscribers() {
        let state = GlobalState::new();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = state
            .settings
            .subscribe(move |s: &Settings| sink.lock().unwrap().push(s.widescreen_mode));

        state.restore_settings(Some(r#"{"widescreenMode":true}"#));
        assert_eq!(*seen.lock().unwrap(), vec![false, true]);
        assert!(state.settings.get().high_contrast_mode);
    }

    #[test]
    fn emoji_lookup_is_derived_at_construction() {
        let state = GlobalState::new();
        assert_eq!(state.shortcode_for("🍅").as_deref(), Some("tomato"));
        assert_eq!(state.shortcode_for("nope"), None);
    }

    #[test]
    fn context_round_trip_shares_cells() {
        let owner = Owner::new();
        owner.with(|| {
            assert!(use_global_state().is_none());

            let state = GlobalState::new();
            provide_global_state(state.clone());
            expect_global_state().show_sidebar.set(true);
            assert!(state.show_sidebar.get());
        });
    }
}

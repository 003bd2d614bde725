pub mod params;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BACKGROUND_IMAGE_URL, DEFAULT_LANDING_PAGE_MODE};
pub use params::Params;

/// Per-user preferences. Every field has a value in [`Settings::default`],
/// and `#[serde(default)]` fills keys a stored document lacks from that same
/// literal, so a partially stored record always loads as a complete one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    // Interface
    pub high_contrast_mode: bool,
    pub landing_page_mode: String,
    pub chat_bubble: bool,
    pub chat_direction: ChatDirection,
    pub widescreen_mode: bool,
    pub split_large_chunks: bool,
    pub scroll_on_branch_change: bool,
    pub show_username: bool,
    pub notification_sound: bool,
    pub notification_sound_always: bool,
    pub show_update_toast: bool,
    pub show_changelog: bool,
    pub show_emoji_in_call: bool,
    pub voice_interruption: bool,
    pub haptic_feedback: bool,
    pub rich_text_input: bool,
    pub prompt_autocomplete: bool,
    pub large_text_as_file: bool,
    pub copy_formatted: bool,
    pub collapse_code_blocks: bool,
    pub expand_details: bool,
    pub image_compression: bool,
    pub image_compression_size: ImageCompressionSize,
    pub stylized_pdf_export: bool,
    pub ctrl_enter_to_send: bool,
    pub iframe_sandbox_allow_same_origin: bool,
    pub iframe_sandbox_allow_forms: bool,
    pub background_image_url: Option<String>,

    // Add-ons
    pub title_auto_generate: bool,
    pub auto_follow_ups: bool,
    pub auto_tags: bool,
    pub response_auto_copy: bool,
    pub user_location: bool,
    pub detect_artifacts: bool,

    pub web_search: Option<String>,

    /// Default model ids for new chats.
    pub models: Vec<String>,

    pub params: Params,

    // Optional, absent from the default literal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_auto_send: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_auto_playback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_large_deltas: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ModelOptions>,

    // Older records kept generation parameters at the top level, as strings.
    #[serde(rename = "seed", skip_serializing_if = "Option::is_none")]
    pub legacy_seed: Option<i64>,
    #[serde(rename = "temperature", skip_serializing_if = "Option::is_none")]
    pub legacy_temperature: Option<String>,
    #[serde(rename = "repeat_penalty", skip_serializing_if = "Option::is_none")]
    pub legacy_repeat_penalty: Option<String>,
    #[serde(rename = "top_k", skip_serializing_if = "Option::is_none")]
    pub legacy_top_k: Option<String>,
    #[serde(rename = "top_p", skip_serializing_if = "Option::is_none")]
    pub legacy_top_p: Option<String>,
    #[serde(rename = "num_ctx", skip_serializing_if = "Option::is_none")]
    pub legacy_num_ctx: Option<String>,
    #[serde(rename = "num_batch", skip_serializing_if = "Option::is_none")]
    pub legacy_num_batch: Option<String>,
    #[serde(rename = "num_keep", skip_serializing_if = "Option::is_none")]
    pub legacy_num_keep: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            high_contrast_mode: true,
            landing_page_mode: DEFAULT_LANDING_PAGE_MODE.to_string(),
            chat_bubble: true,
            chat_direction: ChatDirection::Auto,
            widescreen_mode: false,
            split_large_chunks: false,
            scroll_on_branch_change: true,
            show_username: false,
            notification_sound: true,
            notification_sound_always: false,
            show_update_toast: false,
            show_changelog: false,
            show_emoji_in_call: false,
            voice_interruption: false,
            haptic_feedback: true,
            rich_text_input: true,
            prompt_autocomplete: true,
            large_text_as_file: true,
            copy_formatted: false,
            collapse_code_blocks: false,
            expand_details: false,
            image_compression: false,
            image_compression_size: ImageCompressionSize::default(),
            stylized_pdf_export: true,
            ctrl_enter_to_send: false,
            iframe_sandbox_allow_same_origin: false,
            iframe_sandbox_allow_forms: false,
            background_image_url: Some(DEFAULT_BACKGROUND_IMAGE_URL.to_string()),

            title_auto_generate: true,
            auto_follow_ups: true,
            auto_tags: true,
            response_auto_copy: false,
            user_location: false,
            detect_artifacts: true,

            web_search: None,
            models: Vec::new(),
            params: Params::default(),

            conversation_mode: None,
            speech_auto_send: None,
            response_auto_playback: None,
            audio: None,
            notification_enabled: None,
            title: None,
            split_large_deltas: None,
            system: None,
            options: None,

            legacy_seed: None,
            legacy_temperature: None,
            legacy_repeat_penalty: None,
            legacy_top_k: None,
            legacy_top_p: None,
            legacy_num_ctx: None,
            legacy_num_batch: None,
            legacy_num_keep: None,
        }
    }
}

impl Settings {
    /// Title generation is on unless the newer `title.auto` flag says otherwise.
    pub fn title_generation_enabled(&self) -> bool {
        self.title
            .as_ref()
            .and_then(|title| title.auto)
            .unwrap_or(self.title_auto_generate)
    }

    pub fn title_model(&self, external: bool) -> Option<&str> {
        let title = self.title.as_ref()?;
        if external {
            title.model_external.as_deref()
        } else {
            title.model.as_deref()
        }
    }

    pub fn tts_speaker(&self) -> Option<&str> {
        self.audio.as_ref()?.speaker.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChatDirection {
    #[serde(rename = "LTR")]
    Ltr,
    #[serde(rename = "RTL")]
    Rtl,
    #[default]
    #[serde(rename = "auto")]
    Auto,
}

/// Upload pre-processing hint. Empty strings mean "not set".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageCompressionSize {
    pub width: String,
    pub height: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    #[serde(rename = "STTEngine", skip_serializing_if = "Option::is_none")]
    pub stt_engine: Option<String>,
    #[serde(rename = "TTSEngine", skip_serializing_if = "Option::is_none")]
    pub tts_engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "nonLocalVoices", skip_serializing_if = "Option::is_none")]
    pub non_local_voices: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_external: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<bool>,
}

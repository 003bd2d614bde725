use anyhow::{Context, Result};
use codee::string::JsonSerdeCodec;
use codee::{Decoder, Encoder};
use leptos::logging::{log, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::settings::Settings;

// --- Settings documents ---

/// Decodes a stored settings document over the defaults, key by key: keys
/// the document lacks keep their default values, keys whose value does not
/// fit are dropped (nested records such as `params` are merged per field),
/// unknown keys are ignored. Fails only when the document is not a JSON
/// object.
pub fn decode_settings(stored: &str) -> Result<Settings> {
    let stored = <JsonSerdeCodec as Decoder<Map<String, Value>>>::decode(stored)
        .context("[Settings] Decode: stored document is not a JSON object")?;
    let mut merged = serde_json::to_value(Settings::default())
        .context("[Settings] Decode: failed to serialize defaults")?;
    merge_keys(&mut merged, &[], stored);
    Settings::deserialize(&merged).context("[Settings] Decode: merged document is not a valid settings record")
}

pub fn encode_settings(settings: &Settings) -> Result<String> {
    <JsonSerdeCodec as Encoder<Settings>>::encode(settings)
        .context("[Settings] Encode: failed to serialize settings")
}

/// Like [`decode_settings`] but never fails: nothing stored, or a document
/// that is not a JSON object, yields the defaults.
pub fn load_settings(stored: Option<&str>) -> Settings {
    let Some(stored) = stored.filter(|s| !s.trim().is_empty()) else {
        log!("[DEBUG] [Settings] Nothing stored, using defaults.");
        return Settings::default();
    };
    match decode_settings(stored) {
        Ok(settings) => {
            log!("[DEBUG] [Settings] Loaded stored settings.");
            settings
        }
        Err(e) => {
            warn!("[WARN] [Settings] Falling back to defaults: {:#}", e);
            Settings::default()
        }
    }
}

// Applies each stored key to `merged` only if the result still decodes.
// A rejected object value is retried field by field.
fn merge_keys(merged: &mut Value, path: &[String], stored: Map<String, Value>) {
    for (key, value) in stored {
        let mut key_path = path.to_vec();
        key_path.push(key);

        if try_apply(merged, &key_path, value.clone()) {
            continue;
        }
        match value {
            Value::Object(fields) => {
                let has_record = matches!(value_at(merged, &key_path), Some(Value::Object(_)));
                if has_record || try_apply(merged, &key_path, Value::Object(Map::new())) {
                    merge_keys(merged, &key_path, fields);
                } else {
                    warn!("[WARN] [Settings] Dropping stored key `{}`.", key_path.join("."));
                }
            }
            _ => warn!("[WARN] [Settings] Dropping stored key `{}`.", key_path.join(".")),
        }
    }
}

fn try_apply(merged: &mut Value, path: &[String], value: Value) -> bool {
    let mut candidate = merged.clone();
    let Some(slot) = slot_at(&mut candidate, path) else {
        return false;
    };
    *slot = value;
    if Settings::deserialize(&candidate).is_ok() {
        *merged = candidate;
        true
    } else {
        false
    }
}

fn value_at<'a>(root: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.get(key.as_str()))
}

fn slot_at<'a>(root: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let (last, parents) = path.split_last()?;
    let mut node = root;
    for key in parents {
        node = node.as_object_mut()?.get_mut(key)?;
    }
    Some(
        node.as_object_mut()?
            .entry(last.clone())
            .or_insert(Value::Null),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ChatDirection;

    #[test]
    fn partial_document_keeps_defaults() {
        let settings = decode_settings(
            r#"{"chatDirection":"RTL","models":["llama3:8b"],"params":{"top_k":40},"someRemovedOption":1}"#,
        )
        .unwrap();
        assert_eq!(settings.chat_direction, ChatDirection::Rtl);
        assert_eq!(settings.models, vec!["llama3:8b"]);
        assert_eq!(settings.params.top_k, Some(40));
        assert_eq!(settings.params.stream_response, Some(true));
        assert!(settings.high_contrast_mode);
        assert_eq!(settings.landing_page_mode, "chat");
    }

    #[test]
    fn bad_keys_do_not_discard_the_rest() {
        let settings = load_settings(Some(
            r#"{
                "widescreenMode": true,
                "chatBubble": false,
                "highContrastMode": null,
                "chatDirection": "sideways",
                "params": { "top_k": 40.0, "temperature": "hot", "seed": 7 }
            }"#,
        ));
        assert!(settings.widescreen_mode);
        assert!(!settings.chat_bubble);
        assert!(settings.high_contrast_mode);
        assert_eq!(settings.chat_direction, ChatDirection::Auto);
        assert_eq!(settings.params.top_k, Some(40));
        assert_eq!(settings.params.temperature, None);
        assert_eq!(settings.params.seed, Some(7));
        assert_eq!(settings.params.stream_response, Some(true));
    }

    #[test]
    fn optional_record_keeps_its_valid_fields() {
        let settings = load_settings(Some(
            r#"{"audio":{"speaker":"af_heart","nonLocalVoices":"yes"},"imageCompressionSize":{"width":800,"height":"600"}}"#,
        ));
        let audio = settings.audio.as_ref().unwrap();
        assert_eq!(audio.speaker.as_deref(), Some("af_heart"));
        assert_eq!(audio.non_local_voices, None);
        assert_eq!(settings.image_compression_size.width, "");
        assert_eq!(settings.image_compression_size.height, "600");
    }

    #[test]
    fn encode_then_decode_is_lossless() {
        let mut settings = Settings::default();
        settings.web_search = Some("always".to_string());
        settings.params.stop = Some(vec!["\n\n".to_string()]);
        let encoded = encode_settings(&settings).unwrap();
        assert_eq!(decode_settings(&encoded).unwrap(), settings);
    }

    #[test]
    fn non_object_document_falls_back_to_defaults() {
        assert!(decode_settings("{not json").is_err());
        assert!(decode_settings("[1, 2]").is_err());
        assert_eq!(load_settings(Some("{not json")), Settings::default());
        assert_eq!(load_settings(Some("\"chat\"")), Settings::default());
        assert_eq!(load_settings(Some("  ")), Settings::default());
        assert_eq!(load_settings(None), Settings::default());
    }
}

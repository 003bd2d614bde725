use std::collections::HashMap;

use anyhow::{Context, Result};
use leptos::logging::{error, log};
use serde::Deserialize;
use serde_json::{Map, Value};

const SHORTCODES_JSON: &str = include_str!("../data/emoji_shortcodes.json");

const VARIATION_SELECTOR: char = '\u{fe0f}';

/// Emoji character to shortcode name.
pub type EmojiLookup = HashMap<String, String>;

/// What a shortcode stands for: one emoji, or several (skin tone variants).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Emojis {
    One(String),
    Many(Vec<String>),
}

/// Parses a shortcode table, keeping declaration order.
pub fn parse_shortcodes(json: &str) -> Result<Vec<(String, Emojis)>> {
    let table: Map<String, Value> =
        serde_json::from_str(json).context("emoji shortcode table is not a JSON object")?;
    table
        .into_iter()
        .map(|(shortcode, value)| {
            let emojis = serde_json::from_value(value).with_context(|| {
                format!("shortcode `{shortcode}` must map to a string or a list of strings")
            })?;
            Ok((shortcode, emojis))
        })
        .collect()
}

/// Turns shortcode -> emoji(s) into emoji -> shortcode. When two shortcodes
/// share an emoji the later one wins.
pub fn invert_shortcodes<I>(table: I) -> EmojiLookup
where
    I: IntoIterator<Item = (String, Emojis)>,
{
    let mut lookup = EmojiLookup::new();
    for (shortcode, emojis) in table {
        match emojis {
            Emojis::One(emoji) => {
                lookup.insert(emoji, shortcode);
            }
            Emojis::Many(emojis) => {
                for emoji in emojis {
                    lookup.insert(emoji, shortcode.clone());
                }
            }
        }
    }
    lookup
}

/// Lookup built from the bundled table. A broken table yields an empty lookup.
pub fn default_lookup() -> EmojiLookup {
    match parse_shortcodes(SHORTCODES_JSON) {
        Ok(table) => {
            let lookup = invert_shortcodes(table);
            log!("[DEBUG] [Emoji] Built shortcode lookup with {} entries.", lookup.len());
            lookup
        }
        Err(e) => {
            error!("[ERROR] [Emoji] Failed to load shortcode table: {:#}", e);
            EmojiLookup::new()
        }
    }
}

/// Finds the shortcode for `emoji`, also trying the variant with a trailing
/// U+FE0F since text input often drops it.
pub fn shortcode_for<'a>(lookup: &'a EmojiLookup, emoji: &str) -> Option<&'a str> {
    if let Some(shortcode) = lookup.get(emoji) {
        return Some(shortcode.as_str());
    }
    if emoji.ends_with(VARIATION_SELECTOR) {
        return None;
    }
    lookup
        .get(&format!("{emoji}{VARIATION_SELECTOR}"))
        .map(String::as_str)
}

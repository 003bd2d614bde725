use anyhow::{anyhow, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Generation parameters forwarded to the model server. `None` means the
/// server's own default applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub stream_response: Option<bool>,
    pub function_calling: Option<bool>,
    #[serde(deserialize_with = "whole_number")]
    pub seed: Option<i64>,
    pub temperature: Option<f64>,
    pub reasoning_effort: Option<f64>,
    pub logit_bias: Option<String>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub repeat_penalty: Option<f64>,
    #[serde(deserialize_with = "whole_number")]
    pub repeat_last_n: Option<i64>,
    #[serde(deserialize_with = "whole_number")]
    pub mirostat: Option<i64>,
    pub mirostat_eta: Option<f64>,
    pub mirostat_tau: Option<f64>,
    #[serde(deserialize_with = "whole_number")]
    pub top_k: Option<i64>,
    pub top_p: Option<f64>,
    pub min_p: Option<f64>,
    pub stop: Option<Vec<String>>,
    pub tfs_z: Option<f64>,
    #[serde(deserialize_with = "whole_number")]
    pub num_ctx: Option<i64>,
    #[serde(deserialize_with = "whole_number")]
    pub num_batch: Option<i64>,
    #[serde(deserialize_with = "whole_number")]
    pub num_keep: Option<i64>,
    #[serde(deserialize_with = "whole_number")]
    pub max_tokens: Option<i64>,
    #[serde(deserialize_with = "whole_number")]
    pub num_gpu: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_mmap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_mlock: Option<bool>,
    #[serde(
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub num_thread: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub think: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Free-form parameters passed through untouched.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub custom_params: Map<String, Value>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            stream_response: Some(true),
            function_calling: None,
            seed: None,
            temperature: None,
            reasoning_effort: None,
            logit_bias: None,
            frequency_penalty: None,
            presence_penalty: None,
            repeat_penalty: None,
            repeat_last_n: None,
            mirostat: None,
            mirostat_eta: None,
            mirostat_tau: None,
            top_k: None,
            top_p: None,
            min_p: None,
            stop: None,
            tfs_z: None,
            num_ctx: None,
            num_batch: None,
            num_keep: None,
            max_tokens: None,
            num_gpu: None,
            use_mmap: None,
            use_mlock: None,
            num_thread: None,
            think: None,
            keep_alive: None,
            format: None,
            custom_params: Map::new(),
        }
    }
}

impl Params {
    /// The parameters that are actually set, flattened for a request body.
    /// Custom params are merged in last and win on a name clash.
    pub fn to_request_fields(&self) -> Result<Map<String, Value>> {
        let mut fields = match serde_json::to_value(self)? {
            Value::Object(fields) => fields,
            other => return Err(anyhow!("params serialized to a non-object: {other}")),
        };
        fields.remove("custom_params");
        fields.retain(|_, value| !value.is_null());
        fields.extend(
            self.custom_params
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        Ok(fields)
    }
}

// Browsers hand back integral numbers such as `40.0`; accept those as integers.
fn whole_number<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(n) = number.as_i64() {
        return Ok(Some(n));
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        _ => Err(D::Error::custom(format!("expected a whole number, got {number}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_params_only_stream() {
        let fields = Params::default().to_request_fields().unwrap();
        assert_eq!(Value::Object(fields), json!({ "stream_response": true }));
    }

    #[test]
    fn request_fields_skip_unset_and_merge_custom() {
        let mut params = Params {
            temperature: Some(0.7),
            stop: Some(vec!["</s>".to_string()]),
            stream_response: None,
            ..Default::default()
        };
        params
            .custom_params
            .insert("temperature".to_string(), json!(0.1));
        params.custom_params.insert("dry_run".to_string(), json!(true));

        let fields = params.to_request_fields().unwrap();
        assert_eq!(
            Value::Object(fields),
            json!({ "temperature": 0.1, "stop": ["</s>"], "dry_run": true })
        );
    }

    #[test]
    fn integral_floats_read_as_integers() {
        let params: Params =
            serde_json::from_value(json!({ "top_k": 40.0, "num_ctx": 2048, "seed": null })).unwrap();
        assert_eq!(params.top_k, Some(40));
        assert_eq!(params.num_ctx, Some(2048));
        assert_eq!(params.seed, None);
        assert_eq!(params.stream_response, Some(true));

        assert!(serde_json::from_value::<Params>(json!({ "top_k": 40.5 })).is_err());
        assert!(serde_json::from_value::<Params>(json!({ "top_k": "40" })).is_err());
    }

    #[test]
    fn default_literal_serializes_nulls() {
        let value = serde_json::to_value(Params::default()).unwrap();
        assert_eq!(value["temperature"], Value::Null);
        assert_eq!(value["num_gpu"], Value::Null);
        assert!(value.get("keep_alive").is_none());
        assert!(value.get("custom_params").is_none());
    }
}

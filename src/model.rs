use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A model as listed by the backend, discriminated by who serves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "owned_by", rename_all = "lowercase")]
pub enum Model {
    #[serde(rename = "openai")]
    OpenAi(OpenAiModel),
    Ollama(OllamaModel),
    Arena(ArenaModel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedBy {
    Ollama,
    OpenAi,
    Arena,
}

impl OwnedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnedBy::Ollama => "ollama",
            OwnedBy::OpenAi => "openai",
            OwnedBy::Arena => "arena",
        }
    }
}

impl Model {
    pub fn id(&self) -> &str {
        match self {
            Model::OpenAi(m) => &m.id,
            Model::Ollama(m) => &m.id,
            Model::Arena(m) => &m.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Model::OpenAi(m) => &m.name,
            Model::Ollama(m) => &m.name,
            Model::Arena(m) => &m.name,
        }
    }

    /// Admin-side model configuration, opaque here.
    pub fn info(&self) -> Option<&Value> {
        match self {
            Model::OpenAi(m) => m.info.as_ref(),
            Model::Ollama(m) => m.info.as_ref(),
            Model::Arena(m) => m.info.as_ref(),
        }
    }

    pub fn owned_by(&self) -> OwnedBy {
        match self {
            Model::OpenAi(_) => OwnedBy::OpenAi,
            Model::Ollama(_) => OwnedBy::Ollama,
            Model::Arena(_) => OwnedBy::Arena,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Model::OpenAi(m) if m.external)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiModel {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
    pub external: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaModel {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
    pub details: OllamaModelDetails,
    pub size: u64,
    pub description: String,
    pub model: String,
    pub modified_at: String,
    pub digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ollama: Option<OllamaProviderInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaModel {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OllamaModelDetails {
    pub parent_model: String,
    pub format: String,
    pub family: String,
    pub families: Option<Vec<String>>,
    pub parameter_size: String,
    pub quantization_level: String,
}

/// The raw record reported by the Ollama server itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OllamaProviderInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub modified_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<OllamaProviderDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OllamaProviderDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub families: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantization_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn owned_by_selects_variant() {
        let models: Vec<Model> = serde_json::from_value(json!([
            { "owned_by": "openai", "id": "gpt-4o", "name": "GPT-4o", "external": true, "source": "openai" },
            {
                "owned_by": "ollama", "id": "llama3:8b", "name": "llama3:8b",
                "details": {
                    "parent_model": "", "format": "gguf", "family": "llama", "families": null,
                    "parameter_size": "8B", "quantization_level": "Q4_0"
                },
                "size": 4661224676u64, "description": "", "model": "llama3:8b",
                "modified_at": "2024-05-01T10:00:00Z", "digest": "365c0bd3c000",
                "ollama": { "modified_at": "2024-05-01T10:00:00Z", "urls": [0] }
            },
            { "owned_by": "arena", "id": "arena-model", "name": "Arena Model" }
        ]))
        .unwrap();

        assert_eq!(models[0].owned_by(), OwnedBy::OpenAi);
        assert!(models[0].is_external());
        assert_eq!(models[1].owned_by().as_str(), "ollama");
        assert_eq!(models[2].name(), "Arena Model");

        let Model::Ollama(ollama) = &models[1] else {
            panic!("expected an ollama model");
        };
        assert_eq!(ollama.details.quantization_level, "Q4_0");
        assert_eq!(ollama.details.families, None);
        assert_eq!(ollama.ollama.as_ref().unwrap().urls, Some(vec![0]));
    }

    #[test]
    fn ollama_record_without_details_is_rejected() {
        let result = serde_json::from_value::<Model>(json!({
            "owned_by": "ollama", "id": "a", "name": "A"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_owner_is_rejected() {
        let result = serde_json::from_value::<Model>(json!({
            "owned_by": "anthropic", "id": "a", "name": "A"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn serializes_discriminant() {
        let model = Model::Arena(ArenaModel {
            id: "arena-model".to_string(),
            name: "Arena Model".to_string(),
            info: None,
        });
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(
            value,
            json!({ "owned_by": "arena", "id": "arena-model", "name": "Arena Model" })
        );
    }
}

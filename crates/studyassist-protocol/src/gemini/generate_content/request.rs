use serde::{Deserialize, Serialize};

use crate::gemini::generate_content::types::SafetySetting;
use crate::gemini::types::Content;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentPath {
    /// Bare model id or `models/{model}`.
    pub model: String,
}

impl GenerateContentPath {
    pub fn normalized_model(&self) -> String {
        let model = self.model.trim().trim_start_matches('/');
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequestBody {
    /// Required. The content of the current conversation with the model.
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,
}

impl GenerateContentRequestBody {
    pub fn single_prompt(prompt: impl Into<String>, safety_settings: Vec<SafetySetting>) -> Self {
        Self {
            contents: vec![Content::from_text(prompt)],
            safety_settings: Some(safety_settings),
        }
    }
}

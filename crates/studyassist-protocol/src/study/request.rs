use serde::{Deserialize, Serialize};

use crate::study::types::{LanguageStyle, Mode};

/// Body of `POST /api/ai`.
///
/// `mode` and `lang` stay as raw labels so the server can decide how to treat values
/// outside the known sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRequestBody {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl StudyRequestBody {
    pub fn new(text: impl Into<String>, mode: Mode, lang: LanguageStyle) -> Self {
        Self {
            text: text.into(),
            mode: Some(mode.label().to_string()),
            lang: Some(lang.label().to_string()),
        }
    }

    pub fn mode_label(&self) -> &str {
        self.mode.as_deref().unwrap_or(Mode::default().label())
    }

    pub fn lang_label(&self) -> &str {
        self.lang
            .as_deref()
            .unwrap_or(LanguageStyle::default().label())
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Output transformation requested for the lesson text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Breakdown,
    Summary,
    Flashcards,
    #[serde(rename = "MCQs")]
    Mcqs,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Breakdown, Mode::Summary, Mode::Flashcards, Mode::Mcqs];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Breakdown => "Breakdown",
            Mode::Summary => "Summary",
            Mode::Flashcards => "Flashcards",
            Mode::Mcqs => "MCQs",
        }
    }

    /// Exact, case-sensitive match on the wire label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.label() == label)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Register and script of the generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LanguageStyle {
    /// Romanized Telugu-English code mixing.
    #[default]
    #[serde(rename = "Semi-Telugu")]
    SemiTelugu,
    Telugu,
    English,
}

impl LanguageStyle {
    pub const ALL: [LanguageStyle; 3] = [
        LanguageStyle::SemiTelugu,
        LanguageStyle::Telugu,
        LanguageStyle::English,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LanguageStyle::SemiTelugu => "Semi-Telugu",
            LanguageStyle::Telugu => "Telugu",
            LanguageStyle::English => "English",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.label() == label)
    }

    /// Unrecognized labels fall back to plain English.
    pub fn from_label_or_english(label: &str) -> Self {
        Self::from_label(label).unwrap_or(LanguageStyle::English)
    }
}

impl fmt::Display for LanguageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_serde_names() {
        for mode in Mode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.label()));
            assert_eq!(Mode::from_label(mode.label()), Some(mode));
        }
        for style in LanguageStyle::ALL {
            let json = serde_json::to_string(&style).unwrap();
            assert_eq!(json, format!("\"{}\"", style.label()));
            assert_eq!(LanguageStyle::from_label(style.label()), Some(style));
        }
    }

    #[test]
    fn mode_labels_are_case_sensitive() {
        assert_eq!(Mode::from_label("mcqs"), None);
        assert_eq!(Mode::from_label("Quiz"), None);
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        assert_eq!(
            LanguageStyle::from_label_or_english("Hindi"),
            LanguageStyle::English
        );
        assert_eq!(
            LanguageStyle::from_label_or_english("Telugu"),
            LanguageStyle::Telugu
        );
    }
}

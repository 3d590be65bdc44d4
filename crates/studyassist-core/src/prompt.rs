//! Prompt templates for the four study modes.
//!
//! Every prompt has the same skeleton:
//!
//! ```text
//! <no-markdown directive>
//! <language directive>
//! TASK: ...
//! RULES:
//! 1. ...
//!
//! <delimiter line>
//! <lesson text, verbatim>
//! ```

use studyassist_protocol::study::{LanguageStyle, Mode, StudyRequestBody};

use crate::error::ValidationError;

pub const NO_MARKDOWN_DIRECTIVE: &str = "STRICT: Do not use any markdown formatting such as \
asterisks, hash symbols or bold text. Return only plain text.";

pub const FLASHCARD_COUNT: usize = 6;
pub const MCQ_COUNT: usize = 8;

/// A validated request for one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub text: String,
    pub mode: Mode,
    pub language_style: LanguageStyle,
}

impl GenerationRequest {
    pub fn new(text: impl Into<String>, mode: Mode, language_style: LanguageStyle) -> Self {
        Self {
            text: text.into(),
            mode,
            language_style,
        }
    }

    /// Empty text is checked before the mode so a blank submission always reads as such.
    pub fn from_body(body: StudyRequestBody) -> Result<Self, ValidationError> {
        if body.text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        let mode_label = body.mode_label();
        let mode = Mode::from_label(mode_label)
            .ok_or_else(|| ValidationError::UnsupportedMode(mode_label.to_string()))?;
        let language_style = LanguageStyle::from_label_or_english(body.lang_label());
        Ok(Self {
            text: body.text,
            mode,
            language_style,
        })
    }
}

pub fn language_directive(style: LanguageStyle) -> &'static str {
    match style {
        LanguageStyle::SemiTelugu => {
            "Use Tanglish: everyday spoken Telugu written in English letters, mixed with \
English the way people talk (for example 'em avtundi', 'ante', 'inka'). Do NOT use Telugu \
script (తెలుగు). Use the Telugu a normal Telugu-speaking person uses."
        }
        LanguageStyle::Telugu => {
            "Use full Telugu script (తెలుగు), but avoid complex or literary Telugu words. Use \
the Telugu a normal Telugu-speaking person uses."
        }
        LanguageStyle::English => {
            "Use clear, simple English that a complete English beginner can understand. Do NOT \
use any Telugu words."
        }
    }
}

fn task_instructions(mode: Mode, style: LanguageStyle) -> String {
    match mode {
        Mode::Breakdown => "TASK: Break down the following lesson into clear bullet points.
RULES:
1. Cover only the important topics from the text and avoid duplicated points. Size the bullet points to match the length of the text.
2. Each bullet point MUST be exactly 2 to 3 lines long to give a clear explanation.
3. Use '-' as the bullet character.
4. Keep the language simple so a student can understand it easily.
5. If the text has side headings, keep each side heading followed by its own bullet points. Do not leave a blank line between a side heading and its bullet points. Leave one blank line only between one side-heading group and the next.

TEXT TO BREAKDOWN:"
            .to_string(),
        Mode::Summary => "TASK: Provide a complete and simple summary of the entire text provided.
RULES:
1. Do NOT use bullet points. Write it as one cohesive, easy-to-read narrative.
2. Summarize all main ideas from the start to the end of the text.
3. Keep the tone helpful and encouraging for a student.

TEXT TO SUMMARIZE:"
            .to_string(),
        Mode::Flashcards => format!(
            "TASK: Create exactly {FLASHCARD_COUNT} flashcards in {style} from the text.
RULES:
1. Write each flashcard as a line starting with 'Q:' followed by a line starting with 'A:'.
2. Leave one blank line between flashcards.

TEXT FOR FLASHCARDS:"
        ),
        Mode::Mcqs => format!(
            "TASK: Create exactly {MCQ_COUNT} multiple-choice questions (MCQs) in {style} from the text.
RULES:
1. Write the question, then four options on separate lines labeled A), B), C) and D).
2. Finish every question with a line starting with 'Answer:' that names the correct option.

TEXT FOR MCQS:"
        ),
    }
}

/// Builds the full prompt. The lesson text is appended last, untouched.
pub fn build_prompt(request: &GenerationRequest) -> Result<String, ValidationError> {
    if request.text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    let mut prompt = String::with_capacity(request.text.len() + 1024);
    prompt.push_str(NO_MARKDOWN_DIRECTIVE);
    prompt.push('\n');
    prompt.push_str(language_directive(request.language_style));
    prompt.push('\n');
    prompt.push_str(&task_instructions(request.mode, request.language_style));
    prompt.push('\n');
    prompt.push_str(&request.text);
    Ok(prompt)
}

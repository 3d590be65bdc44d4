use std::sync::Arc;

use tracing::{debug, warn};

use studyassist_protocol::study::{LanguageStyle, Mode, StudyRequestBody};

use crate::capabilities::{Capabilities, CapabilityError, SpeechSettings};
use crate::theme::Theme;
use crate::transport::StudyTransport;

pub const EMPTY_INPUT_MESSAGE: &str = "Paste some text first! ✨";
pub const NO_OUTPUT_MESSAGE: &str = "No output.";
pub const DOWNLOAD_FILE_NAME: &str = "study-notes.txt";

/// Removes every `*` the model may still emit despite the plain-text directive.
pub fn strip_emphasis(text: &str) -> String {
    text.replace('*', "")
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Form state plus the actions a study page offers.
///
/// One request is in flight at most; speech is cancelled on resubmit, on clear
/// and when the controller is dropped.
pub struct StudyController {
    transport: Arc<dyn StudyTransport>,
    capabilities: Arc<dyn Capabilities>,
    text: String,
    word_count: usize,
    mode: Mode,
    language_style: LanguageStyle,
    theme: Theme,
    loading: bool,
    result: String,
    error: String,
    speaking: bool,
    language_menu_open: bool,
    mode_menu_open: bool,
}

impl StudyController {
    pub fn new(transport: Arc<dyn StudyTransport>, capabilities: Arc<dyn Capabilities>) -> Self {
        Self {
            transport,
            capabilities,
            text: String::new(),
            word_count: 0,
            mode: Mode::default(),
            language_style: LanguageStyle::default(),
            theme: Theme::default(),
            loading: false,
            result: String::new(),
            error: String::new(),
            speaking: false,
            language_menu_open: false,
            mode_menu_open: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn language_style(&self) -> LanguageStyle {
        self.language_style
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn is_language_menu_open(&self) -> bool {
        self.language_menu_open
    }

    pub fn is_mode_menu_open(&self) -> bool {
        self.mode_menu_open
    }

    pub fn submit_label(&self) -> String {
        if self.loading {
            "✨ Processing...".to_string()
        } else {
            format!("✨ Run {} ✨", self.mode)
        }
    }

    pub fn output_label(&self) -> String {
        format!("{} • {}", self.language_style, self.mode)
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.word_count = count_words(&self.text);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn toggle_language_menu(&mut self) {
        self.language_menu_open = !self.language_menu_open;
        self.mode_menu_open = false;
    }

    pub fn toggle_mode_menu(&mut self) {
        self.mode_menu_open = !self.mode_menu_open;
        self.language_menu_open = false;
    }

    pub fn select_language(&mut self, style: LanguageStyle) {
        self.language_style = style;
        self.language_menu_open = false;
    }

    pub fn select_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.mode_menu_open = false;
    }

    pub async fn submit(&mut self) {
        if self.loading {
            return;
        }
        if self.text.trim().is_empty() {
            self.error = EMPTY_INPUT_MESSAGE.to_string();
            return;
        }

        self.loading = true;
        self.result.clear();
        self.error.clear();
        self.stop_speech();

        let body = StudyRequestBody::new(self.text.clone(), self.mode, self.language_style);
        match self.transport.post_study(&body).await {
            Ok(reply) => {
                let raw = if reply.result.is_empty() {
                    NO_OUTPUT_MESSAGE
                } else {
                    reply.result.as_str()
                };
                self.result = strip_emphasis(raw);
                debug!(mode = %self.mode, chars = self.result.len(), "study result received");
            }
            Err(err) => {
                warn!(mode = %self.mode, error = %err, "study request failed");
                self.error = err.to_string();
            }
        }
        self.loading = false;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.word_count = 0;
        self.result.clear();
        self.error.clear();
        self.stop_speech();
    }

    /// Starts reading the result aloud, or stops playback when already speaking.
    pub fn toggle_speech(&mut self) -> Result<(), CapabilityError> {
        if self.speaking {
            self.stop_speech();
            return Ok(());
        }
        if self.result.is_empty() {
            return Ok(());
        }
        let settings = SpeechSettings::for_style(self.language_style);
        self.capabilities.speak(&self.result, &settings)?;
        self.speaking = true;
        Ok(())
    }

    /// Called by the host when playback ends or errors out.
    pub fn speech_finished(&mut self) {
        self.speaking = false;
    }

    pub fn copy_result(&self) -> Result<(), CapabilityError> {
        if self.result.is_empty() {
            return Ok(());
        }
        self.capabilities.copy(&self.result)
    }

    pub fn download_result(&self) -> Result<(), CapabilityError> {
        if self.result.is_empty() {
            return Ok(());
        }
        self.capabilities
            .download_as_file(DOWNLOAD_FILE_NAME, &self.result)
    }

    fn stop_speech(&mut self) {
        self.capabilities.cancel();
        self.speaking = false;
    }
}

impl Drop for StudyController {
    fn drop(&mut self) {
        self.capabilities.cancel();
    }
}

use studyassist_protocol::study::LanguageStyle;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error("{0} is not available on this host")]
    Unavailable(&'static str),
    #[error("{0}")]
    Failed(String),
}

/// Voice family used for playback; hosts pick a concrete voice whose locale
/// starts with [`VoiceLocale::prefix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceLocale {
    Telugu,
    English,
}

impl VoiceLocale {
    pub fn for_style(style: LanguageStyle) -> Self {
        match style {
            LanguageStyle::Telugu => VoiceLocale::Telugu,
            LanguageStyle::SemiTelugu | LanguageStyle::English => VoiceLocale::English,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            VoiceLocale::Telugu => "te",
            VoiceLocale::English => "en",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechSettings {
    pub locale: VoiceLocale,
    pub rate: f32,
    pub pitch: f32,
}

impl SpeechSettings {
    pub fn for_style(style: LanguageStyle) -> Self {
        Self {
            locale: VoiceLocale::for_style(style),
            rate: 0.9,
            pitch: 1.0,
        }
    }
}

/// Host services the controller needs: speech synthesis, clipboard and file export.
pub trait Capabilities: Send + Sync {
    fn speak(&self, text: &str, settings: &SpeechSettings) -> Result<(), CapabilityError>;

    /// Stops any playback. Must be safe to call when nothing is playing.
    fn cancel(&self);

    fn copy(&self, text: &str) -> Result<(), CapabilityError>;

    fn download_as_file(&self, name: &str, text: &str) -> Result<(), CapabilityError>;
}

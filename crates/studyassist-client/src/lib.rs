//! Client-side controller for the study assistant.
//!
//! [`StudyController`] owns the form state and talks to the server through a
//! [`StudyTransport`]; speech, clipboard and file export go through an injected
//! [`Capabilities`] so hosts and tests can supply their own.

pub mod capabilities;
pub mod controller;
pub mod theme;
pub mod transport;

pub use capabilities::{Capabilities, CapabilityError, SpeechSettings, VoiceLocale};
pub use controller::{DOWNLOAD_FILE_NAME, EMPTY_INPUT_MESSAGE, StudyController, strip_emphasis};
pub use theme::Theme;
pub use transport::{StudyTransport, TransportError, WreqTransport};

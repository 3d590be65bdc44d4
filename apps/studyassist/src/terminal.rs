use std::path::PathBuf;

use tracing::info;

use studyassist_client::{Capabilities, CapabilityError, SpeechSettings};

/// Host capabilities for a terminal session: no audio, so speech and copy print to stdout.
pub(crate) struct TerminalCapabilities {
    out_dir: PathBuf,
}

impl TerminalCapabilities {
    pub(crate) fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Capabilities for TerminalCapabilities {
    fn speak(&self, text: &str, settings: &SpeechSettings) -> Result<(), CapabilityError> {
        info!(
            locale = settings.locale.prefix(),
            rate = settings.rate,
            pitch = settings.pitch,
            "speech requested"
        );
        println!("🔊 {text}");
        Ok(())
    }

    fn cancel(&self) {}

    fn copy(&self, text: &str) -> Result<(), CapabilityError> {
        println!("{text}");
        Ok(())
    }

    fn download_as_file(&self, name: &str, text: &str) -> Result<(), CapabilityError> {
        let path = self.out_dir.join(name);
        std::fs::write(&path, text)
            .map_err(|err| CapabilityError::Failed(format!("write {}: {err}", path.display())))?;
        info!(path = %path.display(), "result saved");
        Ok(())
    }
}

pub mod bootstrap;
pub mod error;
pub mod gateway;
pub mod prompt;
pub mod state;
pub mod upstream_client;

pub use bootstrap::{Bootstrap, CliArgs};
pub use error::{ConfigError, ValidationError};
pub use gateway::{ContentGenerator, GeminiGateway, GenerationResult, SAFETY_BLOCKED_MESSAGE};
pub use prompt::{GenerationRequest, build_prompt};
pub use state::AppState;

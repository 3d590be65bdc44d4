pub mod request;
pub mod response;
pub mod types;

pub use request::StudyRequestBody;
pub use response::{StudyErrorBody, StudyResponseBody};
pub use types::{LanguageStyle, Mode};

/// Route the client posts lesson text to.
pub const STUDY_PATH: &str = "/api/ai";

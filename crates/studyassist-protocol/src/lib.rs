//! Wire types shared by the study-assist server, its Gemini upstream and the client.
//!
//! `gemini` mirrors the subset of the generateContent API the service speaks;
//! `study` is the downstream `/api/ai` contract.

pub mod gemini;
pub mod study;

//! Concrete LLM provider implementations
//!
//! Each provider is gated behind a cargo feature so downstream crates only
//! pull in the HTTP stack they actually use.

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::GeminiProvider;

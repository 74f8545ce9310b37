//! Empty-slot detection for numbered phone storage cabinets
//!
//! A cabinet photo is compressed, paired with a fixed instruction prompt and
//! sent to a multimodal Gemini model, which answers with the empty slot
//! numbers. This crate owns that client contract: encoding, prompt selection,
//! transport, outcome classification and user-facing diagnostics.

pub mod ai;
pub mod config;
pub mod error;
pub mod image;
pub mod interpret;
pub mod prompts;
pub mod scanner;
pub mod slots;

pub use config::Config;
pub use error::{Error, Result};
pub use scanner::{CabinetScanner, ScanReport};

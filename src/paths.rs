//! Project path functions - single source of truth for default file paths.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//! - `FLASHCARDS_DIR`: Override the flashcards directory (see config.rs)
//! - `PORT`: Override the server port (see config.rs)

use std::env;
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
    DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// Default directory holding flashcard sets and text decks
pub fn flashcards_dir() -> String {
    format!("{}/flashcards", data_dir())
}

/// File extension of structured (JSON) sets
pub const SET_EXTENSION: &str = "json";

/// File extension of text decks
pub const TEXT_DECK_EXTENSION: &str = "txt";

//! Application configuration constants.
//!
//! This module centralizes configurable values and the lookup of the
//! flashcards directory.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== Flashcards Directory ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    flashcards: Option<FlashcardsConfig>,
}

#[derive(Debug, Deserialize)]
struct FlashcardsConfig {
    dir: Option<String>,
}

/// Read `[flashcards] dir` from a config.toml body
fn flashcards_dir_from_toml(contents: &str) -> Option<PathBuf> {
    let config = toml::from_str::<AppConfig>(contents).ok()?;
    config.flashcards?.dir.map(PathBuf::from)
}

/// Load flashcards directory with priority: config.toml > .env > default
pub fn load_flashcards_dir() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Priority 1: config.toml
    if let Ok(contents) = std::fs::read_to_string("config.toml") {
        if let Some(dir) = flashcards_dir_from_toml(&contents) {
            tracing::info!("Using flashcards from config.toml: {}", dir.display());
            return dir;
        }
    }

    // Priority 2: .env FLASHCARDS_DIR
    if let Ok(dir) = std::env::var("FLASHCARDS_DIR") {
        tracing::info!("Using flashcards from FLASHCARDS_DIR env: {}", dir);
        return PathBuf::from(dir);
    }

    // Default
    let default = PathBuf::from(crate::paths::flashcards_dir());
    tracing::info!("Using default flashcards path: {}", default.display());
    default
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Server port, overridable with the PORT env var
pub fn server_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(SERVER_PORT)
}

/// Get the full server bind address
pub fn server_bind_addr() -> String {
    format!("{}:{}", SERVER_ADDR, server_port())
}

// ==================== Session Configuration ====================

/// Session expiration time in hours
pub const SESSION_EXPIRY_HOURS: i64 = 1;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

// ==================== Study Configuration ====================

/// Failed attempts after which the full answer is shown (the first failure gets a hint)
pub const REVEAL_AFTER: u32 = 2;

/// Failed attempts after which the card is re-queued and the session moves on
pub const FORCE_ADVANCE_AFTER: u32 = 3;

/// Number of past scores kept in a set's `last_scores`
pub const LAST_SCORES_KEPT: usize = 5;

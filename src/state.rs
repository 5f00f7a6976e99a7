//! Application state shared by all handlers.

use std::path::PathBuf;

use crate::session::SessionStore;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Directory holding `.json` sets and `.txt` decks
    pub flashcards_dir: PathBuf,

    /// Active study sessions
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(flashcards_dir: PathBuf) -> Self {
        Self {
            flashcards_dir,
            sessions: SessionStore::new(),
        }
    }
}

//! Flashcard set files - reads and writes sets in the flashcards directory.
//!
//! Two kinds of file live side by side:
//! - `*.json` structured sets (`FlashcardSet`)
//! - `*.txt` text decks (`question : answer` lines)

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::text_deck::{self, TextDeck};
use crate::domain::{AuthoringError, FlashcardSet};
use crate::paths::{SET_EXTENSION, TEXT_DECK_EXTENSION};

/// Document format of a set file, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SetFormat {
    Structured,
    Text,
}

/// A set file found in the flashcards directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetSummary {
    pub name: String,
    pub format: SetFormat,
}

/// A loaded set of either format
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum LoadedDeck {
    Structured { set: FlashcardSet },
    Text { deck: TextDeck, raw: String },
}

/// Resolve a user-supplied set name to a file name and format.
///
/// A name without extension is a structured set (`.json` is appended).
/// Names that could escape the flashcards directory are rejected.
pub fn resolve_name(name: &str) -> Result<(String, SetFormat), StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::Authoring(AuthoringError::MissingSetName));
    }
    if name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(StoreError::InvalidName(name.to_string()));
    }

    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(SET_EXTENSION) => Ok((name.to_string(), SetFormat::Structured)),
        Some(TEXT_DECK_EXTENSION) => Ok((name.to_string(), SetFormat::Text)),
        Some(_) => Err(StoreError::InvalidName(name.to_string())),
        None => Ok((format!("{}.{}", name, SET_EXTENSION), SetFormat::Structured)),
    }
}

/// List set files, sorted by name. A missing directory lists as empty.
pub fn list_sets(dir: &Path) -> Result<Vec<SetSummary>, StoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::IoError(dir.display().to_string(), e.to_string())),
    };

    let mut sets: Vec<SetSummary> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            let (name, format) = resolve_name(&name).ok()?;
            Some(SetSummary { name, format })
        })
        .collect();

    sets.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(sets)
}

fn read_file(path: &Path) -> Result<String, StoreError> {
    if !path.exists() {
        return Err(StoreError::FileNotFound(path.display().to_string()));
    }
    fs::read_to_string(path).map_err(|e| StoreError::IoError(path.display().to_string(), e.to_string()))
}

fn write_file(path: &Path, contents: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| StoreError::IoError(parent.display().to_string(), e.to_string()))?;
    }
    fs::write(path, contents).map_err(|e| StoreError::IoError(path.display().to_string(), e.to_string()))
}

/// Load a structured set
pub fn load_set(dir: &Path, name: &str) -> Result<FlashcardSet, StoreError> {
    let (file_name, format) = resolve_name(name)?;
    if format != SetFormat::Structured {
        return Err(StoreError::WrongFormat(file_name));
    }

    let path = dir.join(&file_name);
    let content = read_file(&path)?;
    let set: FlashcardSet = serde_json::from_str(&content)
        .map_err(|e| StoreError::ParseError(path.display().to_string(), e.to_string()))?;

    tracing::debug!("Loaded {} cards from {}", set.cards.len(), file_name);
    Ok(set)
}

/// Load a set of either format
pub fn load_deck(dir: &Path, name: &str) -> Result<LoadedDeck, StoreError> {
    let (file_name, format) = resolve_name(name)?;
    match format {
        SetFormat::Structured => Ok(LoadedDeck::Structured {
            set: load_set(dir, &file_name)?,
        }),
        SetFormat::Text => {
            let raw = read_file(&dir.join(&file_name))?;
            let deck = text_deck::parse(&raw);
            for issue in &deck.skipped {
                tracing::warn!("{}: skipped {}", file_name, issue);
            }
            Ok(LoadedDeck::Text { deck, raw })
        }
    }
}

/// Save a structured set as pretty JSON. Returns the written path.
pub fn save_set(dir: &Path, name: &str, set: &FlashcardSet) -> Result<PathBuf, StoreError> {
    let (file_name, format) = resolve_name(name)?;
    if format != SetFormat::Structured {
        return Err(StoreError::WrongFormat(file_name));
    }
    set.check_saveable(&file_name).map_err(StoreError::Authoring)?;

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    set.serialize(&mut ser)
        .map_err(|e| StoreError::ParseError(file_name.clone(), e.to_string()))?;
    let json = String::from_utf8(buf).map_err(|e| StoreError::ParseError(file_name.clone(), e.to_string()))?;

    let path = dir.join(&file_name);
    write_file(&path, &json)?;
    tracing::info!("Saved {} cards to {}", set.cards.len(), path.display());
    Ok(path)
}

/// Save raw text deck contents. The text is stored as-is; bad lines are
/// reported by the returned parse but do not block the save.
pub fn save_text_deck(dir: &Path, name: &str, raw: &str) -> Result<TextDeck, StoreError> {
    let (file_name, format) = resolve_name(name)?;
    if format != SetFormat::Text {
        return Err(StoreError::WrongFormat(file_name));
    }

    let path = dir.join(&file_name);
    write_file(&path, raw)?;
    let deck = text_deck::parse(raw);
    tracing::info!("Saved text deck {} ({} cards)", path.display(), deck.len());
    Ok(deck)
}

/// Set store errors.
#[derive(Debug)]
pub enum StoreError {
    InvalidName(String),
    WrongFormat(String),
    FileNotFound(String),
    IoError(String, String),
    ParseError(String, String),
    Authoring(AuthoringError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::InvalidName(name) => write!(f, "Invalid set name: {}", name),
            StoreError::WrongFormat(name) => write!(f, "Operation not supported for {}", name),
            StoreError::FileNotFound(path) => write!(f, "Set file not found: {}", path),
            StoreError::IoError(path, err) => write!(f, "IO error on {}: {}", path, err),
            StoreError::ParseError(path, err) => write!(f, "Parse error in {}: {}", path, err),
            StoreError::Authoring(err) => write!(f, "{}", err),
        }
    }
}

impl StoreError {
    /// Returns a user-facing error message without exposing filesystem paths.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::InvalidName(_) => "Invalid set name".to_string(),
            StoreError::WrongFormat(_) => "Operation not supported for this set format".to_string(),
            StoreError::FileNotFound(_) => "Set not found".to_string(),
            StoreError::IoError(_, _) => "Failed to access set file".to_string(),
            StoreError::ParseError(_, _) => "Failed to parse set file".to_string(),
            StoreError::Authoring(err) => err.to_string(),
        }
    }
}

impl std::error::Error for StoreError {}

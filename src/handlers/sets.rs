//! Set authoring handlers: list, load, save, and card add/edit/delete.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::content::text_deck::{ParseIssue, TextDeck};
use crate::domain::{CardDraft, FlashcardSet, MalformedCard};
use crate::state::AppState;
use crate::store::{self, LoadedDeck, LogOnError, SetSummary, StoreError};

use super::ApiError;

#[derive(Debug, Serialize)]
pub struct SavedSet {
    pub name: String,
    pub cards: usize,
}

#[derive(Debug, Serialize)]
pub struct CardChange {
    pub index: usize,
    pub cards: usize,
}

#[derive(Debug, Serialize)]
pub struct ValidationReport {
    /// Structured cards that cannot be studied
    pub malformed: Vec<MalformedCard>,
    /// Text deck lines that were skipped
    pub skipped_lines: Vec<ParseIssue>,
}

/// GET /sets
pub async fn list_sets(State(state): State<AppState>) -> Json<Vec<SetSummary>> {
    Json(store::list_sets(&state.flashcards_dir).log_warn_default("Failed to list flashcard sets"))
}

/// GET /sets/{name}
pub async fn get_set(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<LoadedDeck>, ApiError> {
    Ok(Json(store::load_deck(&state.flashcards_dir, &name)?))
}

/// PUT /sets/{name}
pub async fn save_set(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(set): Json<FlashcardSet>,
) -> Result<Json<SavedSet>, ApiError> {
    let (file_name, _) = store::resolve_name(&name)?;
    store::save_set(&state.flashcards_dir, &file_name, &set)?;
    Ok(Json(SavedSet {
        name: file_name,
        cards: set.cards.len(),
    }))
}

/// PUT /sets/{name}/raw - save a text deck from its raw contents
pub async fn save_text_deck(
    State(state): State<AppState>,
    Path(name): Path<String>,
    raw: String,
) -> Result<Json<TextDeck>, ApiError> {
    Ok(Json(store::save_text_deck(&state.flashcards_dir, &name, &raw)?))
}

/// GET /sets/{name}/validate
pub async fn validate_set(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ValidationReport>, ApiError> {
    let report = match store::load_deck(&state.flashcards_dir, &name)? {
        LoadedDeck::Structured { set } => ValidationReport {
            malformed: set.validate(),
            skipped_lines: Vec::new(),
        },
        LoadedDeck::Text { deck, .. } => ValidationReport {
            malformed: Vec::new(),
            skipped_lines: deck.skipped,
        },
    };
    Ok(Json(report))
}

/// Load a set for editing; a set that does not exist yet starts empty
fn load_for_edit(state: &AppState, name: &str) -> Result<(String, FlashcardSet), ApiError> {
    let (file_name, _) = store::resolve_name(name)?;
    match store::load_set(&state.flashcards_dir, &file_name) {
        Ok(set) => Ok((file_name, set)),
        Err(StoreError::FileNotFound(_)) => {
            tracing::info!("Creating new flashcard set {}", file_name);
            Ok((file_name, FlashcardSet::new()))
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /sets/{name}/cards
pub async fn add_card(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(draft): Json<CardDraft>,
) -> Result<Json<CardChange>, ApiError> {
    let card = draft.into_card()?;
    let (file_name, mut set) = load_for_edit(&state, &name)?;
    let index = set.add_card(card);
    store::save_set(&state.flashcards_dir, &file_name, &set)?;
    Ok(Json(CardChange {
        index,
        cards: set.len(),
    }))
}

/// PUT /sets/{name}/cards/{index}
pub async fn edit_card(
    State(state): State<AppState>,
    Path((name, index)): Path<(String, usize)>,
    Json(draft): Json<CardDraft>,
) -> Result<Json<CardChange>, ApiError> {
    let card = draft.into_card()?;
    let mut set = store::load_set(&state.flashcards_dir, &name)?;
    set.edit_card(index, card)?;
    store::save_set(&state.flashcards_dir, &name, &set)?;
    Ok(Json(CardChange {
        index,
        cards: set.len(),
    }))
}

/// DELETE /sets/{name}/cards/{index}
pub async fn delete_card(
    State(state): State<AppState>,
    Path((name, index)): Path<(String, usize)>,
) -> Result<Json<CardChange>, ApiError> {
    let mut set = store::load_set(&state.flashcards_dir, &name)?;
    set.delete_card(index)?;
    store::save_set(&state.flashcards_dir, &name, &set)?;
    Ok(Json(CardChange {
        index,
        cards: set.len(),
    }))
}

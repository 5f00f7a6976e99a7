//! Study session handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::session::SessionEntry;
use crate::state::AppState;
use crate::store::{self, LoadedDeck, LogOnError};
use crate::study::{CardView, SessionProgress, SessionStatus, StudySession, SubmitOutcome};

use super::ApiError;

#[derive(Debug, Deserialize)]
pub struct StartStudyRequest {
    /// Set file name, e.g. `spanish.json` or `verbs.txt`
    pub set: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub answer: String,
}

/// Current state of a session as shown to the learner
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub set: String,
    pub status: SessionStatus,
    pub card: Option<CardView>,
    /// "Note: ..." line for the current card, if it has a note
    pub note_line: Option<String>,
    pub attempts: u32,
    pub progress: SessionProgress,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub outcome: SubmitOutcome,
    pub feedback: String,
    pub session: SessionView,
}

fn session_view(id: &str, entry: &SessionEntry) -> SessionView {
    let card = entry.session.current_card().map(|c| c.view());
    let note_line = card
        .as_ref()
        .and_then(|c| c.note.as_ref())
        .map(|note| format!("Note: {}", note));
    SessionView {
        session_id: id.to_string(),
        set: entry.set_name.clone(),
        status: entry.session.status(),
        card,
        note_line,
        attempts: entry.session.attempts(),
        progress: entry.session.progress(),
    }
}

/// Feedback line for an outcome
pub fn feedback(outcome: &SubmitOutcome, complete: bool) -> String {
    const COMPLETE: &str = "You have completed the session!";
    match outcome {
        SubmitOutcome::Correct if complete => format!("Correct! {}", COMPLETE),
        SubmitOutcome::Correct => "Correct!".to_string(),
        SubmitOutcome::Hint(hint) => format!("Incorrect. Hint: {}", hint),
        SubmitOutcome::Reveal(answer) => format!("Incorrect. Correct Answer: {}", answer),
        SubmitOutcome::ForcedAdvance(answer) => {
            format!("Incorrect. Correct Answer: {}. This card will come back later.", answer)
        }
        SubmitOutcome::AlreadyComplete => COMPLETE.to_string(),
    }
}

/// POST /study
pub async fn start_study(
    State(state): State<AppState>,
    Json(request): Json<StartStudyRequest>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let (set_name, _) = store::resolve_name(&request.set)?;
    let session = match store::load_deck(&state.flashcards_dir, &set_name)? {
        LoadedDeck::Structured { set } => {
            let malformed = set.validate();
            if !malformed.is_empty() {
                tracing::warn!("{}: skipping {} malformed cards", set_name, malformed.len());
            }
            StudySession::from_set(&set)?
        }
        LoadedDeck::Text { deck, .. } => StudySession::from_text_deck(&deck)?,
    };

    tracing::info!("Starting study session on {} ({} cards)", set_name, session.deck().len());
    let id = state.sessions.insert(&set_name, session);
    let view = state
        .sessions
        .with_session(&id, |entry| session_view(&id, entry))
        .ok_or_else(|| ApiError::not_found("Session expired"))?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /study/{id}
pub async fn get_study(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    state
        .sessions
        .with_session(&id, |entry| Json(session_view(&id, entry)))
        .ok_or_else(|| ApiError::not_found("Unknown study session"))
}

/// POST /study/{id}/answer
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let (outcome, view, finished) = state
        .sessions
        .with_session(&id, |entry| {
            let outcome = entry.session.submit(&request.answer);
            // Score is written back once, when the session first completes
            let finished = if entry.session.is_complete() && !entry.score_recorded {
                entry.score_recorded = true;
                Some((entry.set_name.clone(), entry.session.score()))
            } else {
                None
            };
            (outcome, session_view(&id, entry), finished)
        })
        .ok_or_else(|| ApiError::not_found("Unknown study session"))?;

    if let Some((set_name, score)) = finished {
        tracing::info!("Study session {} on {} complete, score {}", id, set_name, score);
        record_score(&state, &set_name, score);
    }

    Ok(Json(SubmitResponse {
        feedback: feedback(&outcome, view.status == SessionStatus::Complete),
        outcome,
        session: view,
    }))
}

/// Append a finished session's score to a structured set. Text decks have
/// no score field and are left alone.
fn record_score(state: &AppState, set_name: &str, score: usize) {
    let Ok((_, store::SetFormat::Structured)) = store::resolve_name(set_name) else {
        return;
    };
    let Some(mut set) = store::load_set(&state.flashcards_dir, set_name).log_warn("Failed to load set for score")
    else {
        return;
    };
    set.record_score(score as i64);
    store::save_set(&state.flashcards_dir, set_name, &set).log_warn("Failed to save score");
}

/// DELETE /study/{id} - quit without saving anything
pub async fn abandon_study(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.sessions.remove(&id) {
        tracing::info!("Study session {} abandoned", id);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

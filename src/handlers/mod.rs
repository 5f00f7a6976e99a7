//! JSON endpoints over the set store and the study engine.

pub mod grade;
pub mod sets;
pub mod study;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::domain::AuthoringError;
use crate::state::AppState;
use crate::store::StoreError;
use crate::study::EmptyDeckError;

pub use grade::{grade_answer, GradeRequest, GradeResponse};
pub use sets::{
    add_card, delete_card, edit_card, get_set, list_sets, save_set, save_text_deck, validate_set,
};
pub use study::{abandon_study, get_study, start_study, submit_answer, StartStudyRequest, SubmitRequest};

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sets", get(list_sets))
        .route("/sets/{name}", get(get_set).put(save_set))
        .route("/sets/{name}/raw", put(save_text_deck))
        .route("/sets/{name}/validate", get(validate_set))
        .route("/sets/{name}/cards", post(add_card))
        .route("/sets/{name}/cards/{index}", put(edit_card).delete(delete_card))
        .route("/grade", post(grade_answer))
        .route("/study", post(start_study))
        .route("/study/{id}", get(get_study).delete(abandon_study))
        .route("/study/{id}/answer", post(submit_answer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Error response with a JSON `{"error": ...}` body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

impl From<AuthoringError> for ApiError {
    fn from(err: AuthoringError) -> Self {
        match err {
            AuthoringError::CardIndexOutOfRange(_) => Self::not_found(err.to_string()),
            _ => Self::bad_request(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Authoring(inner) => inner.into(),
            StoreError::FileNotFound(_) => Self::not_found(err.user_message()),
            StoreError::InvalidName(_) | StoreError::WrongFormat(_) => {
                Self::bad_request(err.user_message())
            }
            StoreError::IoError(_, _) | StoreError::ParseError(_, _) => {
                tracing::error!("{}", err);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.user_message())
            }
        }
    }
}

impl From<EmptyDeckError> for ApiError {
    fn from(err: EmptyDeckError) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
    }
}

//! Stateless grading endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::validation::{grade, AnswerSpec, Behavior};

use super::ApiError;

/// Either `answers` (+ optional `behavior`) or `expression` must be given
#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub input: String,
    #[serde(default)]
    pub answers: Option<Vec<String>>,
    #[serde(default)]
    pub behavior: Behavior,
    #[serde(default)]
    pub expression: Option<String>,
}

impl GradeRequest {
    fn answer_spec(&self) -> Option<AnswerSpec> {
        match (&self.expression, &self.answers) {
            (Some(expr), _) => Some(AnswerSpec::expression(expr)),
            (None, Some(answers)) => Some(AnswerSpec::structured(answers.clone(), self.behavior)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GradeResponse {
    pub correct: bool,
}

/// POST /grade
pub async fn grade_answer(Json(request): Json<GradeRequest>) -> Result<Json<GradeResponse>, ApiError> {
    let spec = request
        .answer_spec()
        .ok_or_else(|| ApiError::bad_request("Provide either answers or expression"))?;
    let correct = grade(&spec, &request.input);
    tracing::debug!("Graded {:?} against {:?}: {}", request.input, spec, correct);
    Ok(Json(GradeResponse { correct }))
}

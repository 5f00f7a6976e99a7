//! Answer grading for flashcards.
//!
//! Two answer grammars are supported, one per document format:
//! - Structured cards (JSON sets): a list of answer tokens with `and` / `or`
//!   behavior. `or` accepts an exact match of any token, `and` requires every
//!   token to appear somewhere in the response.
//! - Text decks: an expression like `gato|minino` or `sol&luz`, where `|`
//!   separates alternatives and `&` separates terms that must all be present.
//!
//! All comparisons are case-insensitive and run on NFC-normalized text.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// Answer specifications
// ============================================================================

/// Grading mode for a structured card.
///
/// Stored sets are read leniently: the value is matched case-insensitively
/// and anything other than `or` grades as `and`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
  /// Every answer token must appear in the response
  #[default]
  And,
  /// The response must equal one of the answer tokens
  Or,
}

/// Behavior name that is neither `and` nor `or`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBehavior(pub String);

impl std::fmt::Display for UnknownBehavior {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Unknown behavior: {}", self.0)
  }
}

impl std::error::Error for UnknownBehavior {}

impl FromStr for Behavior {
  type Err = UnknownBehavior;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "and" => Ok(Self::And),
      "or" => Ok(Self::Or),
      _ => Err(UnknownBehavior(s.to_string())),
    }
  }
}

impl<'de> Deserialize<'de> for Behavior {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
  }
}

/// Parsed `|` / `&` expression from a text deck.
///
/// Outer list is OR-groups, inner list the AND-terms of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerExpr {
  source: String,
  groups: Vec<Vec<String>>,
}

impl AnswerExpr {
  /// Parse an answer expression. Blank terms and empty groups are dropped.
  pub fn parse(source: &str) -> Self {
    let groups = source
      .split('|')
      .map(|group| {
        group
          .split('&')
          .map(str::trim)
          .filter(|term| !term.is_empty())
          .map(str::to_string)
          .collect::<Vec<_>>()
      })
      .filter(|terms| !terms.is_empty())
      .collect();

    Self {
      source: source.trim().to_string(),
      groups,
    }
  }

  /// The expression as written, trimmed
  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn groups(&self) -> &[Vec<String>] {
    &self.groups
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }
}

/// What a response is graded against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerSpec {
  /// Answer list from a structured card
  Structured { answers: Vec<String>, behavior: Behavior },
  /// `|` / `&` expression from a text deck
  Expression(AnswerExpr),
}

impl AnswerSpec {
  pub fn structured(answers: Vec<String>, behavior: Behavior) -> Self {
    Self::Structured { answers, behavior }
  }

  pub fn expression(source: &str) -> Self {
    Self::Expression(AnswerExpr::parse(source))
  }

  /// Text shown when the correct answer is revealed
  pub fn display(&self) -> String {
    match self {
      Self::Structured { answers, .. } => answers.join(", "),
      Self::Expression(expr) => expr.source().to_string(),
    }
  }

  /// Whether the spec has at least one usable token
  pub fn is_gradable(&self) -> bool {
    match self {
      Self::Structured { answers, .. } => answers.iter().any(|a| !a.trim().is_empty()),
      Self::Expression(expr) => !expr.is_empty(),
    }
  }
}

// ============================================================================
// Grading
// ============================================================================

/// Normalize text for comparison: trim, NFC, lowercase
pub fn normalize(input: &str) -> String {
  input.trim().nfc().collect::<String>().to_lowercase()
}

/// Normalized tokens with blank entries skipped
fn normalized_tokens<'a, I>(tokens: I) -> Vec<String>
where
  I: IntoIterator<Item = &'a String>,
{
  tokens
    .into_iter()
    .map(|t| normalize(t))
    .filter(|t| !t.is_empty())
    .collect()
}

/// Grade a response against an answer specification.
///
/// Pure and deterministic. A spec with no usable tokens never passes, and
/// blank input never passes.
pub fn grade(spec: &AnswerSpec, input: &str) -> bool {
  let response = normalize(input);
  if response.is_empty() {
    return false;
  }

  match spec {
    AnswerSpec::Structured { answers, behavior } => {
      grade_structured(answers, *behavior, &response)
    }
    AnswerSpec::Expression(expr) => grade_expression(expr, &response),
  }
}

fn grade_structured(answers: &[String], behavior: Behavior, response: &str) -> bool {
  let tokens = normalized_tokens(answers);
  if tokens.is_empty() {
    return false;
  }

  match behavior {
    Behavior::Or => tokens.iter().any(|t| t == response),
    Behavior::And => tokens.iter().all(|t| response.contains(t.as_str())),
  }
}

fn grade_expression(expr: &AnswerExpr, response: &str) -> bool {
  expr.groups().iter().any(|terms| {
    let terms = normalized_tokens(terms);
    !terms.is_empty() && terms.iter().all(|t| response.contains(t.as_str()))
  })
}

// ============================================================================
// Hints
// ============================================================================

/// Shown instead of a letter hint when the answer is a boolean expression
pub const OPERATOR_HINT: &str =
  "This answer combines terms: '|' separates alternatives, '&' joins terms that are all required";

/// Progressive hints for a card's answer
pub struct HintGenerator {
  /// First correct answer, used for the letter hint
  primary: String,
  /// Full correct answer text for the reveal
  full_answer: String,
  has_operator: bool,
}

impl HintGenerator {
  pub fn new(spec: &AnswerSpec) -> Self {
    let (primary, has_operator) = match spec {
      AnswerSpec::Structured { answers, .. } => {
        let primary = answers
          .iter()
          .map(|a| a.trim())
          .find(|a| !a.is_empty())
          .unwrap_or_default()
          .to_string();
        let has_operator = answers.iter().any(|a| a.contains(['|', '&']));
        (primary, has_operator)
      }
      AnswerSpec::Expression(expr) => {
        let primary = expr
          .groups()
          .first()
          .and_then(|terms| terms.first())
          .cloned()
          .unwrap_or_default();
        (primary, expr.source().contains(['|', '&']))
      }
    };

    Self {
      primary,
      full_answer: spec.display(),
      has_operator,
    }
  }

  /// First hint: operator explanation, or first letter and length
  pub fn first_hint(&self) -> String {
    if self.has_operator {
      return OPERATOR_HINT.to_string();
    }
    let chars: Vec<char> = self.primary.chars().collect();
    let first_char = chars.first().copied().unwrap_or('?');
    let underscores = "_".repeat(chars.len().saturating_sub(1));
    format!("{}{}", first_char, underscores)
  }

  /// The full correct answer
  pub fn reveal(&self) -> String {
    self.full_answer.clone()
  }
}

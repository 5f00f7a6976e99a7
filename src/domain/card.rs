use serde::{Deserialize, Serialize};

use crate::config;
use crate::validation::{AnswerSpec, Behavior};

/// One question/answer unit of a structured flashcard set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashCard {
  /// Acceptable prompts, shown joined by ", "
  #[serde(rename = "question", default)]
  pub questions: Vec<String>,
  /// Acceptable answer tokens
  #[serde(rename = "answer", default)]
  pub answers: Vec<String>,
  #[serde(default)]
  pub behavior: Behavior,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note: Option<String>,
}

impl FlashCard {
  pub fn new(questions: Vec<String>, answers: Vec<String>, behavior: Behavior) -> Self {
    Self {
      questions,
      answers,
      behavior,
      note: None,
    }
  }

  pub fn with_note(mut self, note: impl Into<String>) -> Self {
    self.note = Some(note.into());
    self
  }

  /// Prompt text shown to the learner
  pub fn prompt(&self) -> String {
    self.questions.join(", ")
  }

  pub fn answer_spec(&self) -> AnswerSpec {
    AnswerSpec::structured(self.answers.clone(), self.behavior)
  }

  /// The first problem that makes this card unusable for study, if any
  pub fn problem(&self) -> Option<CardProblem> {
    fn blank(items: &[String]) -> bool {
      items.iter().all(|s| s.trim().is_empty())
    }

    match (blank(&self.questions), blank(&self.answers)) {
      (true, true) => Some(CardProblem::Blank),
      (true, false) => Some(CardProblem::MissingQuestion),
      (false, true) => Some(CardProblem::MissingAnswer),
      (false, false) => None,
    }
  }

  pub fn is_valid(&self) -> bool {
    self.problem().is_none()
  }
}

/// Why a card cannot be studied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardProblem {
  MissingQuestion,
  MissingAnswer,
  Blank,
}

impl std::fmt::Display for CardProblem {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      CardProblem::MissingQuestion => write!(f, "question is empty"),
      CardProblem::MissingAnswer => write!(f, "answer is empty"),
      CardProblem::Blank => write!(f, "card is blank"),
    }
  }
}

/// A card that failed validation, reported by position so callers can
/// offer to fix or delete it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedCard {
  pub index: usize,
  pub problem: CardProblem,
}

impl std::fmt::Display for MalformedCard {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "card {}: {}", self.index, self.problem)
  }
}

impl std::error::Error for MalformedCard {}

// ==================== Authoring ====================

/// Card fields as typed into an authoring form.
///
/// Questions and answers are comma-separated lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardDraft {
  pub question: String,
  pub answer: String,
  #[serde(default)]
  pub behavior: Behavior,
  #[serde(default)]
  pub note: Option<String>,
}

fn split_list(input: &str) -> Vec<String> {
  input
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect()
}

impl CardDraft {
  /// Build a card, rejecting blank question or answer fields
  pub fn into_card(self) -> Result<FlashCard, AuthoringError> {
    let questions = split_list(&self.question);
    if questions.is_empty() {
      return Err(AuthoringError::BlankQuestion);
    }
    let answers = split_list(&self.answer);
    if answers.is_empty() {
      return Err(AuthoringError::BlankAnswer);
    }

    let note = self
      .note
      .map(|n| n.trim().to_string())
      .filter(|n| !n.is_empty());

    Ok(FlashCard {
      questions,
      answers,
      behavior: self.behavior,
      note,
    })
  }
}

/// Authoring failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthoringError {
  BlankQuestion,
  BlankAnswer,
  MissingSetName,
  EmptySet,
  CardIndexOutOfRange(usize),
}

impl std::fmt::Display for AuthoringError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      AuthoringError::BlankQuestion | AuthoringError::BlankAnswer => {
        write!(f, "Please fill in both question and answer fields")
      }
      AuthoringError::MissingSetName => write!(f, "Please provide a name for the set"),
      AuthoringError::EmptySet => write!(f, "Cannot save an empty set"),
      AuthoringError::CardIndexOutOfRange(index) => write!(f, "No card at index {}", index),
    }
  }
}

impl std::error::Error for AuthoringError {}

// ==================== Flashcard Set ====================

/// A persisted collection of flashcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardSet {
  /// Latest recorded score
  #[serde(default)]
  pub score: i64,
  #[serde(default)]
  pub last_scores: Vec<i64>,
  #[serde(default)]
  pub cards: Vec<FlashCard>,
}

impl FlashcardSet {
  /// New empty set for authoring
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.cards.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cards.is_empty()
  }

  pub fn add_card(&mut self, card: FlashCard) -> usize {
    self.cards.push(card);
    self.cards.len() - 1
  }

  pub fn edit_card(&mut self, index: usize, card: FlashCard) -> Result<(), AuthoringError> {
    let slot = self
      .cards
      .get_mut(index)
      .ok_or(AuthoringError::CardIndexOutOfRange(index))?;
    *slot = card;
    Ok(())
  }

  pub fn delete_card(&mut self, index: usize) -> Result<FlashCard, AuthoringError> {
    if index >= self.cards.len() {
      return Err(AuthoringError::CardIndexOutOfRange(index));
    }
    Ok(self.cards.remove(index))
  }

  /// Every card that cannot be studied, in set order
  pub fn validate(&self) -> Vec<MalformedCard> {
    self
      .cards
      .iter()
      .enumerate()
      .filter_map(|(index, card)| card.problem().map(|problem| MalformedCard { index, problem }))
      .collect()
  }

  /// Cards usable for study
  pub fn valid_cards(&self) -> impl Iterator<Item = &FlashCard> {
    self.cards.iter().filter(|c| c.is_valid())
  }

  /// Record a finished session's score, keeping only the most recent ones
  pub fn record_score(&mut self, score: i64) {
    self.score = score;
    self.last_scores.push(score);
    let excess = self.last_scores.len().saturating_sub(config::LAST_SCORES_KEPT);
    self.last_scores.drain(..excess);
  }

  /// Check the set can be saved under `name`
  pub fn check_saveable(&self, name: &str) -> Result<(), AuthoringError> {
    if name.trim().is_empty() {
      return Err(AuthoringError::MissingSetName);
    }
    if self.cards.is_empty() {
      return Err(AuthoringError::EmptySet);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn card(q: &[&str], a: &[&str]) -> FlashCard {
    FlashCard::new(
      q.iter().map(|s| s.to_string()).collect(),
      a.iter().map(|s| s.to_string()).collect(),
      Behavior::And,
    )
  }

  #[test]
  fn test_deserialize_set() {
    let json = r#"{
      "score": 3,
      "last_scores": [1, 2, 3],
      "cards": [
        {"question": ["cat", "kitty"], "answer": ["gato"], "behavior": "or", "note": "noun"},
        {"question": ["sun"], "answer": ["sol", "luz"]}
      ]
    }"#;
    let set: FlashcardSet = serde_json::from_str(json).unwrap();
    assert_eq!(set.score, 3);
    assert_eq!(set.last_scores, vec![1, 2, 3]);
    assert_eq!(set.cards.len(), 2);
    assert_eq!(set.cards[0].behavior, Behavior::Or);
    assert_eq!(set.cards[0].note.as_deref(), Some("noun"));
    assert_eq!(set.cards[0].prompt(), "cat, kitty");
    // Missing behavior defaults to "and"
    assert_eq!(set.cards[1].behavior, Behavior::And);
    assert!(set.cards[1].note.is_none());
  }

  #[test]
  fn test_serialize_uses_wire_names() {
    let value = serde_json::to_value(card(&["q"], &["a"])).unwrap();
    assert_eq!(
      value,
      serde_json::json!({"question": ["q"], "answer": ["a"], "behavior": "and"})
    );
  }

  #[test]
  fn test_missing_fields_load_as_malformed() {
    let json = r#"{"cards": [
      {"question": ["ok"], "answer": ["fine"]},
      {"answer": ["x"]},
      {"question": ["q"], "behavior": "OR"},
      {"question": ["sun"], "answer": ["sol"], "behavior": "maybe"}
    ]}"#;
    let set: FlashcardSet = serde_json::from_str(json).unwrap();
    assert_eq!(set.len(), 4);
    assert_eq!(set.cards[2].behavior, Behavior::Or);
    assert_eq!(set.cards[3].behavior, Behavior::And);
    assert_eq!(
      set.validate(),
      vec![
        MalformedCard { index: 1, problem: CardProblem::MissingQuestion },
        MalformedCard { index: 2, problem: CardProblem::MissingAnswer },
      ]
    );
    assert_eq!(set.valid_cards().count(), 2);
  }

  #[test]
  fn test_validate_reports_indices() {
    let mut set = FlashcardSet::new();
    set.add_card(card(&["ok"], &["fine"]));
    set.add_card(card(&["  "], &["x"]));
    set.add_card(card(&["q"], &[]));
    set.add_card(card(&[], &[" "]));

    let report = set.validate();
    assert_eq!(
      report,
      vec![
        MalformedCard { index: 1, problem: CardProblem::MissingQuestion },
        MalformedCard { index: 2, problem: CardProblem::MissingAnswer },
        MalformedCard { index: 3, problem: CardProblem::Blank },
      ]
    );
    assert_eq!(set.valid_cards().count(), 1);
  }

  #[test]
  fn test_draft_splits_commas() {
    let draft = CardDraft {
      question: "cat, kitty ,".to_string(),
      answer: " gato , minino".to_string(),
      behavior: Behavior::Or,
      note: Some("   ".to_string()),
    };
    let card = draft.into_card().unwrap();
    assert_eq!(card.questions, vec!["cat", "kitty"]);
    assert_eq!(card.answers, vec!["gato", "minino"]);
    assert_eq!(card.behavior, Behavior::Or);
    assert!(card.note.is_none());
  }

  #[test]
  fn test_draft_rejects_blank_fields() {
    let draft = CardDraft {
      question: " , ".to_string(),
      answer: "a".to_string(),
      ..Default::default()
    };
    assert_eq!(draft.into_card(), Err(AuthoringError::BlankQuestion));

    let draft = CardDraft {
      question: "q".to_string(),
      answer: "".to_string(),
      ..Default::default()
    };
    assert_eq!(draft.into_card(), Err(AuthoringError::BlankAnswer));
  }

  #[test]
  fn test_edit_and_delete() {
    let mut set = FlashcardSet::new();
    set.add_card(card(&["a"], &["1"]));
    set.add_card(card(&["b"], &["2"]));

    set.edit_card(1, card(&["b"], &["two"])).unwrap();
    assert_eq!(set.cards[1].answers, vec!["two"]);
    assert_eq!(
      set.edit_card(5, card(&["x"], &["y"])),
      Err(AuthoringError::CardIndexOutOfRange(5))
    );

    let removed = set.delete_card(0).unwrap();
    assert_eq!(removed.questions, vec!["a"]);
    assert_eq!(set.len(), 1);
    assert!(set.delete_card(1).is_err());
  }

  #[test]
  fn test_record_score_keeps_recent() {
    let mut set = FlashcardSet::new();
    for score in 1..=7 {
      set.record_score(score);
    }
    assert_eq!(set.score, 7);
    assert_eq!(set.last_scores, vec![3, 4, 5, 6, 7]);
  }

  #[test]
  fn test_check_saveable() {
    let mut set = FlashcardSet::new();
    assert_eq!(set.check_saveable("deck"), Err(AuthoringError::EmptySet));
    set.add_card(card(&["q"], &["a"]));
    assert_eq!(set.check_saveable("  "), Err(AuthoringError::MissingSetName));
    assert!(set.check_saveable("deck").is_ok());
  }
}

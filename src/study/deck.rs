use serde::Serialize;

use crate::content::text_deck::{TextDeck, TextEntry};
use crate::domain::FlashCard;
use crate::validation::AnswerSpec;

/// A card as presented in a study session, independent of the document
/// format it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyCard {
  pub prompt: String,
  pub note: Option<String>,
  pub answer: AnswerSpec,
}

impl StudyCard {
  pub fn new(prompt: impl Into<String>, answer: AnswerSpec) -> Self {
    Self {
      prompt: prompt.into(),
      note: None,
      answer,
    }
  }

  pub fn view(&self) -> CardView {
    CardView {
      prompt: self.prompt.clone(),
      note: self.note.clone(),
    }
  }
}

impl From<&FlashCard> for StudyCard {
  fn from(card: &FlashCard) -> Self {
    Self {
      prompt: card.prompt(),
      note: card.note.clone(),
      answer: card.answer_spec(),
    }
  }
}

impl From<&TextEntry> for StudyCard {
  fn from(entry: &TextEntry) -> Self {
    Self::new(entry.question.clone(), entry.answer_spec())
  }
}

/// What the learner sees for the current card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
  pub prompt: String,
  pub note: Option<String>,
}

/// Study deck from structured cards, in order
pub fn deck_from_cards<'a, I>(cards: I) -> Vec<StudyCard>
where
  I: IntoIterator<Item = &'a FlashCard>,
{
  cards.into_iter().map(StudyCard::from).collect()
}

/// Study deck from a parsed text deck
pub fn deck_from_text(deck: &TextDeck) -> Vec<StudyCard> {
  deck.entries.iter().map(StudyCard::from).collect()
}

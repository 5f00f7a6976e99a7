//! Study session state machine.
//!
//! Cards are shown in deck order. A wrong answer escalates through a hint
//! ladder (hint, then reveal, then forced advance) and puts the card on a
//! FIFO re-queue. After the first pass the re-queue is drained until every
//! card has been answered correctly once.

use std::collections::VecDeque;

use serde::Serialize;

use crate::config;
use crate::content::text_deck::TextDeck;
use crate::domain::FlashcardSet;
use crate::validation::{grade, HintGenerator};

use super::deck::{deck_from_cards, deck_from_text, StudyCard};

/// Starting a session without any gradable card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyDeckError;

impl std::fmt::Display for EmptyDeckError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Deck has no gradable cards")
  }
}

impl std::error::Error for EmptyDeckError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
  Active,
  Complete,
}

/// Failed-attempt thresholds for the hint ladder.
///
/// Failures below `reveal_after` get a hint, failures from `reveal_after`
/// reveal the answer, and reaching `force_advance_after` moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escalation {
  pub reveal_after: u32,
  pub force_advance_after: u32,
}

impl Default for Escalation {
  fn default() -> Self {
    Self {
      reveal_after: config::REVEAL_AFTER,
      force_advance_after: config::FORCE_ADVANCE_AFTER,
    }
  }
}

/// Result of one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "text", rename_all = "snake_case")]
pub enum SubmitOutcome {
  /// Passed; the session moved to the next card (or completed)
  Correct,
  /// Failed; first hint for the same card
  Hint(String),
  /// Failed again; the full correct answer, same card stays up
  Reveal(String),
  /// Failed too often; the card was re-queued and the session moved on
  ForcedAdvance(String),
  /// Session is already complete, nothing was graded
  AlreadyComplete,
}

impl SubmitOutcome {
  pub fn is_correct(&self) -> bool {
    matches!(self, Self::Correct)
  }

  /// Whether the session moved past the card that was answered
  pub fn advanced(&self) -> bool {
    matches!(self, Self::Correct | Self::ForcedAdvance(_))
  }
}

/// Counters for a progress display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
  pub deck_size: usize,
  /// Cards answered correctly so far
  pub learned: usize,
  /// Cards waiting in the re-queue
  pub pending: usize,
  /// Cards right on the very first try
  pub first_try_correct: usize,
}

/// One study run over a fixed deck.
#[derive(Debug, Clone)]
pub struct StudySession {
  deck: Vec<StudyCard>,
  /// First-pass position; equals the deck length once the pass is done
  cursor: usize,
  current: Option<usize>,
  missed: VecDeque<usize>,
  attempts: u32,
  status: SessionStatus,
  escalation: Escalation,
  presentations: Vec<usize>,
  ever_missed: Vec<bool>,
  learned: usize,
  first_try_correct: usize,
}

impl StudySession {
  /// Start a session with the default hint ladder
  pub fn start(deck: Vec<StudyCard>) -> Result<Self, EmptyDeckError> {
    Self::start_with(deck, Escalation::default())
  }

  /// Start a session. Cards without a usable answer are dropped first.
  pub fn start_with(deck: Vec<StudyCard>, escalation: Escalation) -> Result<Self, EmptyDeckError> {
    let deck: Vec<StudyCard> = deck.into_iter().filter(|c| c.answer.is_gradable()).collect();
    if deck.is_empty() {
      return Err(EmptyDeckError);
    }

    let size = deck.len();
    Ok(Self {
      deck,
      cursor: 0,
      current: Some(0),
      missed: VecDeque::new(),
      attempts: 0,
      status: SessionStatus::Active,
      escalation,
      presentations: vec![0],
      ever_missed: vec![false; size],
      learned: 0,
      first_try_correct: 0,
    })
  }

  /// Session over the valid cards of a structured set
  pub fn from_set(set: &FlashcardSet) -> Result<Self, EmptyDeckError> {
    Self::start(deck_from_cards(set.valid_cards()))
  }

  pub fn from_text_deck(deck: &TextDeck) -> Result<Self, EmptyDeckError> {
    Self::start(deck_from_text(deck))
  }

  pub fn status(&self) -> SessionStatus {
    self.status
  }

  pub fn is_complete(&self) -> bool {
    self.status == SessionStatus::Complete
  }

  /// Index of the card being shown
  pub fn current_index(&self) -> Option<usize> {
    self.current
  }

  pub fn current_card(&self) -> Option<&StudyCard> {
    self.current.and_then(|i| self.deck.get(i))
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  /// Failed attempts on the current presentation
  pub fn attempts(&self) -> u32 {
    self.attempts
  }

  /// Re-queued card indices, earliest miss first
  pub fn missed(&self) -> impl Iterator<Item = usize> + '_ {
    self.missed.iter().copied()
  }

  /// Every card index shown so far, in order
  pub fn presentations(&self) -> &[usize] {
    &self.presentations
  }

  pub fn deck(&self) -> &[StudyCard] {
    &self.deck
  }

  /// Cards answered right on the first try
  pub fn score(&self) -> usize {
    self.first_try_correct
  }

  pub fn progress(&self) -> SessionProgress {
    SessionProgress {
      deck_size: self.deck.len(),
      learned: self.learned,
      pending: self.missed.len(),
      first_try_correct: self.first_try_correct,
    }
  }

  /// Grade an answer for the current card and move the session along
  pub fn submit(&mut self, input: &str) -> SubmitOutcome {
    let Some(index) = self.current else {
      return SubmitOutcome::AlreadyComplete;
    };

    if grade(&self.deck[index].answer, input) {
      if self.attempts == 0 && !self.ever_missed[index] {
        self.first_try_correct += 1;
      }
      self.missed.retain(|&i| i != index);
      self.learned += 1;
      self.advance();
      return SubmitOutcome::Correct;
    }

    self.attempts += 1;
    self.ever_missed[index] = true;
    if !self.missed.contains(&index) {
      self.missed.push_back(index);
    }

    let hints = HintGenerator::new(&self.deck[index].answer);
    if self.attempts >= self.escalation.force_advance_after {
      tracing::debug!("Card {} force-advanced after {} attempts", index, self.attempts);
      let answer = hints.reveal();
      self.advance();
      SubmitOutcome::ForcedAdvance(answer)
    } else if self.attempts >= self.escalation.reveal_after {
      SubmitOutcome::Reveal(hints.reveal())
    } else {
      SubmitOutcome::Hint(hints.first_hint())
    }
  }

  /// Move to the next deck card, then to the re-queue, then complete
  fn advance(&mut self) {
    self.attempts = 0;

    if self.cursor < self.deck.len() {
      self.cursor += 1;
    }
    if self.cursor < self.deck.len() {
      self.present(self.cursor);
      return;
    }

    match self.missed.pop_front() {
      Some(index) => self.present(index),
      None => {
        self.current = None;
        self.status = SessionStatus::Complete;
        tracing::debug!(
          "Session complete: {}/{} right on first try",
          self.first_try_correct,
          self.deck.len()
        );
      }
    }
  }

  fn present(&mut self, index: usize) {
    self.current = Some(index);
    self.presentations.push(index);
  }
}

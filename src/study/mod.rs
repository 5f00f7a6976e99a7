pub mod deck;
pub mod session;

pub use deck::{deck_from_cards, deck_from_text, CardView, StudyCard};
pub use session::{
  EmptyDeckError, Escalation, SessionProgress, SessionStatus, StudySession, SubmitOutcome,
};

//! Document formats for flashcard content.
//!
//! Structured sets are plain serde types in `domain`; this module holds the
//! line-oriented text deck format.

pub mod text_deck;

pub use text_deck::{parse, ParseIssue, ParseIssueKind, TextDeck, TextEntry};

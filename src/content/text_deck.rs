//! Line-oriented text decks.
//!
//! Each card is one line of the form `question : answer-expression`, split at
//! the first `:`. Lines starting with `#` are comments. The answer expression
//! uses `|` for alternatives and `&` for required terms, e.g.
//!
//! ```text
//! # Spanish basics
//! cat : gato|minino
//! sun : sol&luz
//! ```

use serde::Serialize;

use crate::validation::AnswerSpec;

/// One card from a text deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEntry {
    pub question: String,
    /// Raw answer expression, trimmed
    pub answer: String,
}

impl TextEntry {
    pub fn answer_spec(&self) -> AnswerSpec {
        AnswerSpec::expression(&self.answer)
    }
}

/// Why a line was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseIssueKind {
    EmptyQuestion,
    EmptyAnswer,
}

/// A card line that could not be used. Parsing continues past it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseIssue {
    /// 1-based line number
    pub line: usize,
    pub kind: ParseIssueKind,
}

impl std::fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ParseIssueKind::EmptyQuestion => write!(f, "line {}: empty question", self.line),
            ParseIssueKind::EmptyAnswer => write!(f, "line {}: empty answer", self.line),
        }
    }
}

impl std::error::Error for ParseIssue {}

/// Parsed text deck: an ordered mapping from question to answer expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextDeck {
    pub entries: Vec<TextEntry>,
    pub skipped: Vec<ParseIssue>,
}

impl TextDeck {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Answer expression for a question
    pub fn get(&self, question: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.question == question)
            .map(|e| e.answer.as_str())
    }

    /// Insert or replace a card; a repeated question keeps its first position
    fn upsert(&mut self, question: String, answer: String) {
        match self.entries.iter_mut().find(|e| e.question == question) {
            Some(existing) => existing.answer = answer,
            None => self.entries.push(TextEntry { question, answer }),
        }
    }
}

/// Parse a text deck. Malformed card lines are skipped and reported.
pub fn parse(text: &str) -> TextDeck {
    let mut deck = TextDeck::default();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Lines without a separator are free text, not cards
        let Some((question, answer)) = line.split_once(':') else {
            continue;
        };

        let question = question.trim();
        let answer = answer.trim();
        let kind = if question.is_empty() {
            Some(ParseIssueKind::EmptyQuestion)
        } else if answer.is_empty() || !AnswerSpec::expression(answer).is_gradable() {
            Some(ParseIssueKind::EmptyAnswer)
        } else {
            None
        };

        if let Some(kind) = kind {
            tracing::debug!("Skipping text deck line {}: {:?}", i + 1, kind);
            deck.skipped.push(ParseIssue { line: i + 1, kind });
            continue;
        }

        deck.upsert(question.to_string(), answer.to_string());
    }

    deck
}

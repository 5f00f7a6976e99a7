pub mod card;

pub use card::{AuthoringError, CardDraft, CardProblem, FlashCard, FlashcardSet, MalformedCard};

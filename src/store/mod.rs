//! File-backed storage for flashcard sets.

pub mod sets;

pub use sets::{
    list_sets, load_deck, load_set, resolve_name, save_set, save_text_deck, LoadedDeck, SetFormat,
    SetSummary, StoreError,
};

/// Extension trait for logging errors on Result types.
///
/// Use for non-critical operations where failure should be logged but not
/// propagated.
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
    /// Log the error at warn level and return the default
    fn log_warn_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }

    fn log_warn_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                T::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_warn() {
        let ok: Result<u32, String> = Ok(3);
        assert_eq!(ok.log_warn("ctx"), Some(3));
        let err: Result<u32, String> = Err("boom".to_string());
        assert_eq!(err.log_warn("ctx"), None);
    }

    #[test]
    fn test_log_warn_default() {
        let err: Result<Vec<u32>, String> = Err("boom".to_string());
        assert!(err.log_warn_default("ctx").is_empty());
    }
}

//! Simple in-memory storage for study sessions.
//!
//! Stores StudySession state keyed by a random session ID.
//! Sessions auto-expire after a configurable duration of inactivity.

use crate::config;
use crate::study::StudySession;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Session entry with last access time for expiration
#[derive(Debug)]
pub struct SessionEntry {
  pub session: StudySession,
  /// File name of the set the deck was loaded from
  pub set_name: String,
  /// Whether the finished session's score was written back to the set
  pub score_recorded: bool,
  last_access: DateTime<Utc>,
}

/// Shared store of active study sessions
#[derive(Clone, Default)]
pub struct SessionStore {
  sessions: Arc<Mutex<HashMap<String, SessionEntry>>>,
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
    // Entries are independent of each other; recover from poisoning
    self.sessions.lock().unwrap_or_else(|e| e.into_inner())
  }

  /// Store a new session and return its ID
  pub fn insert(&self, set_name: &str, session: StudySession) -> String {
    let id = generate_session_id();
    let mut sessions = self.lock();

    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      cleanup_expired(&mut sessions, Utc::now());
    }

    sessions.insert(
      id.clone(),
      SessionEntry {
        session,
        set_name: set_name.to_string(),
        score_recorded: false,
        last_access: Utc::now(),
      },
    );
    id
  }

  /// Run `f` on a session, refreshing its last access time.
  ///
  /// The store stays locked for the duration of `f`, so each call is one
  /// atomic transition.
  pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut SessionEntry) -> R) -> Option<R> {
    let mut sessions = self.lock();
    let entry = sessions.get_mut(id)?;
    entry.last_access = Utc::now();
    Some(f(entry))
  }

  /// Drop a session. Returns false if it did not exist.
  pub fn remove(&self, id: &str) -> bool {
    self.lock().remove(id).is_some()
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Remove sessions idle since before `now - SESSION_EXPIRY_HOURS`
  pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
    let mut sessions = self.lock();
    let before = sessions.len();
    cleanup_expired(&mut sessions, now);
    before - sessions.len()
  }
}

/// Clean up expired sessions
fn cleanup_expired(sessions: &mut HashMap<String, SessionEntry>, now: DateTime<Utc>) {
  let expiry = now - Duration::hours(config::SESSION_EXPIRY_HOURS);
  sessions.retain(|_, entry| entry.last_access > expiry);
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

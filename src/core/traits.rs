//! Core trait definitions for the board's external collaborators
//!
//! These traits are the seams between the board logic and the outside
//! world: where state is kept between runs, and where spoken search text
//! comes from.

use crate::dictation::{Language, Transcript};
use crate::utils::error::AppResult;

/// Durable string key-value storage
///
/// Each `set` is expected to be written through before it returns. The
/// board performs one write per key and relies on nothing stronger.
pub trait KvStore {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// Speech-to-text capture capability
pub trait Dictation {
    /// Start listening in the given language.
    ///
    /// Returns `AppError::Unsupported` when no recognizer is available.
    fn start_dictation(&self, language: Language) -> AppResult<Transcript>;
}

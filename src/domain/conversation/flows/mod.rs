//! Sub-flow engines.
//!
//! Each sub-flow drives one multi-turn task while the session intent stays
//! put, and only touches its own context struct. The state machine maps
//! their outcomes to session transitions.

pub mod address;
pub mod delivery_mode;
pub mod payment;
pub mod support;

/// Normalized words that mean "skip this optional field".
pub(crate) const SKIP_WORDS: &[&str] = &["no", "ninguno", "ninguna", "omitir", "skip", "-"];

/// True for empty input or a skip word.
pub(crate) fn is_skip(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || SKIP_WORDS.contains(&trimmed.to_lowercase().as_str())
}

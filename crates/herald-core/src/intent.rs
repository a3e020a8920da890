//! Keyword and intent matching.
//!
//! The default classifier compiles the configured word lists into
//! case-insensitive, word-boundary regexes.

use crate::{config::IntentConfig, error::HeraldError, traits::IntentClassifier};
use regex::Regex;

/// Regex-backed [`IntentClassifier`].
#[derive(Debug, Clone)]
pub struct RegexClassifier {
    trigger: Regex,
    affirmative: Regex,
}

impl RegexClassifier {
    /// Build from configured word lists. Multi-word phrases are allowed.
    pub fn from_config(cfg: &IntentConfig) -> Result<Self, HeraldError> {
        Ok(Self {
            trigger: word_set(&cfg.trigger_keywords, "trigger_keywords")?,
            affirmative: word_set(&cfg.affirmative_words, "affirmative_words")?,
        })
    }
}

impl IntentClassifier for RegexClassifier {
    fn matches_trigger(&self, text: &str) -> bool {
        self.trigger.is_match(text)
    }

    fn matches_affirmative(&self, text: &str) -> bool {
        self.affirmative.is_match(text)
    }
}

/// Compile `words` into `(?i)\b(w1|w2|...)\b`.
fn word_set(words: &[String], field: &str) -> Result<Regex, HeraldError> {
    let alternatives: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();

    if alternatives.is_empty() {
        return Err(HeraldError::Config(format!("intent.{field} is empty")));
    }

    Regex::new(&format!(r"(?i)\b({})\b", alternatives.join("|")))
        .map_err(|e| HeraldError::Config(format!("invalid intent.{field}: {e}")))
}

/// Event filter: trigger keyword present and the trimmed body is long enough.
///
/// The length floor guards against one-word false positives.
pub fn is_trigger_candidate(
    classifier: &dyn IntentClassifier,
    body: &str,
    min_body_len: usize,
) -> bool {
    let trimmed = body.trim();
    if trimmed.is_empty() || !classifier.matches_trigger(trimmed) {
        return false;
    }
    trimmed.chars().count() >= min_body_len
}

//! Keyword matching against page text
//!
//! Matching is case-insensitive. By default a keyword matches anywhere as a
//! substring; in whole-word mode it must sit on word boundaries.

use crate::ConfigError;
use regex::Regex;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
struct Keyword {
    /// Spelling as configured, used when reporting
    text: String,
    /// Lowercased form for substring search
    folded: String,
    /// Word-boundary pattern, present in whole-word mode
    pattern: Option<Regex>,
}

/// The fixed set of keywords searched for during a run
///
/// Keywords are trimmed, blank entries are dropped, and entries that differ
/// only by case collapse into the first spelling seen.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    /// Builds a substring-matching keyword set
    ///
    /// # Errors
    ///
    /// `ConfigError::Validation` if no non-blank keyword is given.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyword_crawler::KeywordSet;
    ///
    /// let keywords = KeywordSet::new(["widget"]).unwrap();
    /// assert!(keywords.find_in("WIDGET special").contains("widget"));
    /// ```
    pub fn new<I, S>(keywords: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(keywords, false)
    }

    /// Builds a keyword set that only matches whole words
    pub fn whole_words<I, S>(keywords: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(keywords, true)
    }

    fn build<I, S>(keywords: I, whole_words: bool) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut entries = Vec::new();

        for keyword in keywords {
            let text = keyword.as_ref().trim();
            if text.is_empty() {
                continue;
            }

            let folded = text.to_lowercase();
            if !seen.insert(folded.clone()) {
                continue;
            }

            let pattern = if whole_words {
                let regex = Regex::new(&whole_word_pattern(text)).map_err(|e| {
                    ConfigError::Validation(format!("Invalid keyword '{}': {}", text, e))
                })?;
                Some(regex)
            } else {
                None
            };

            entries.push(Keyword {
                text: text.to_string(),
                folded,
                pattern,
            });
        }

        if entries.is_empty() {
            return Err(ConfigError::Validation(
                "at least one non-empty keyword is required".to_string(),
            ));
        }

        Ok(Self { keywords: entries })
    }

    /// Returns the keywords present in `text`, in configured spelling
    ///
    /// An empty set means nothing matched; that is not an error.
    pub fn find_in(&self, text: &str) -> BTreeSet<String> {
        let folded_text = text.to_lowercase();

        self.keywords
            .iter()
            .filter(|keyword| match &keyword.pattern {
                Some(pattern) => pattern.is_match(text),
                None => folded_text.contains(&keyword.folded),
            })
            .map(|keyword| keyword.text.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keywords in configured spelling
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(|k| k.text.as_str())
    }
}

/// Returns the subset of `keywords` found in `content`
pub fn match_keywords(content: &str, keywords: &KeywordSet) -> BTreeSet<String> {
    keywords.find_in(content)
}

/// Anchors `keyword` so it cannot run into neighbouring word characters
///
/// `\b` only holds next to a word character, so an edge such as the `+` in
/// `C++` or the `.` in `.NET` is guarded by a non-word character or the end
/// of the text instead.
fn whole_word_pattern(keyword: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let head = if keyword.starts_with(is_word) { r"\b" } else { r"(?:^|\W)" };
    let tail = if keyword.ends_with(is_word) { r"\b" } else { r"(?:\W|$)" };
    format!(r"(?i){}{}{}", head, regex::escape(keyword), tail)
}

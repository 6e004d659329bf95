// pattern detection module - defines rules, matchers and match results

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CatalogError;

/// placeholder in guidance templates that is replaced with the matched text
pub const MATCH_PLACEHOLDER: &str = "{match}";

/// byte range of a match inside the scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// finds the first occurrence of a pattern in a piece of text
///
/// implementations must be case-insensitive and return spans that lie on
/// char boundaries of the text they were given.
pub trait Matcher: fmt::Debug + Send + Sync {
    fn find(&self, text: &str) -> Option<MatchSpan>;
}

/// regex backed matcher, always case-insensitive
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    /// compile a user supplied pattern
    pub fn new(pattern: &str) -> Result<Self, CatalogError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| CatalogError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self { regex })
    }

    /// wrap an already compiled regex; the caller is responsible for `(?i)`
    pub fn from_regex(regex: Regex) -> Self {
        Self { regex }
    }

    /// whole-word alternation over literal words or phrases
    pub fn words(words: &[&str]) -> Result<Self, CatalogError> {
        let alternation = words
            .iter()
            .map(|w| regex::escape(w.trim()))
            .collect::<Vec<_>>()
            .join("|");
        Self::new(&format!(r"\b(?:{alternation})\b"))
    }
}

impl Matcher for RegexMatcher {
    fn find(&self, text: &str) -> Option<MatchSpan> {
        self.regex.find(text).map(|m| MatchSpan {
            start: m.start(),
            end: m.end(),
        })
    }
}

/// literal phrase matcher without regex, matching on word boundaries
///
/// the leftmost occurrence wins; at the same position the earlier phrase wins.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    phrases: Vec<Vec<char>>,
}

impl PhraseMatcher {
    pub fn new<I, S>(phrases: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases: Vec<Vec<char>> = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().chars().flat_map(char::to_lowercase).collect())
            .collect();

        if phrases.is_empty() || phrases.iter().any(Vec::is_empty) {
            return Err(CatalogError::EmptyPhrase);
        }

        Ok(Self { phrases })
    }
}

impl Matcher for PhraseMatcher {
    fn find(&self, text: &str) -> Option<MatchSpan> {
        let mut previous: Option<char> = None;

        for (start, c) in text.char_indices() {
            if !previous.is_some_and(is_word_char) {
                for phrase in &self.phrases {
                    let Some(len) = match_phrase(&text[start..], phrase) else {
                        continue;
                    };
                    let end = start + len;
                    if !text[end..].chars().next().is_some_and(is_word_char) {
                        return Some(MatchSpan { start, end });
                    }
                }
            }
            previous = Some(c);
        }

        None
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// byte length of the prefix of `haystack` equal to `phrase` ignoring case
fn match_phrase(haystack: &str, phrase: &[char]) -> Option<usize> {
    let mut pending = phrase;

    for (i, c) in haystack.char_indices() {
        for lower in c.to_lowercase() {
            let (first, rest) = pending.split_first()?;
            if *first != lower {
                return None;
            }
            pending = rest;
        }
        if pending.is_empty() {
            return Some(i + c.len_utf8());
        }
    }

    None
}

/// one named linguistic pattern: a matcher plus guidance for the writer
#[derive(Debug)]
pub struct PatternRule {
    name: String,
    matcher: Box<dyn Matcher>,
    guidance: String,
}

impl PatternRule {
    pub fn new(
        name: impl Into<String>,
        matcher: impl Matcher + 'static,
        guidance: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            matcher: Box::new(matcher),
            guidance: guidance.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn guidance(&self) -> &str {
        &self.guidance
    }

    /// apply the rule to `text`, reporting the first occurrence only
    pub fn apply(&self, text: &str) -> Option<PatternMatch> {
        let span = self.matcher.find(text)?;
        // a misbehaving matcher must not take the scan down with it
        let example = text.get(span.start..span.end)?;

        Some(PatternMatch {
            pattern_name: self.name.clone(),
            example_match: example.to_string(),
            explanation: self.guidance.replace(MATCH_PLACEHOLDER, example),
        })
    }
}

/// a rule that fired, with the text that triggered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    #[serde(rename = "type")]
    pub pattern_name: String,
    #[serde(rename = "example")]
    pub example_match: String,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_matcher_is_case_insensitive() {
        let matcher = RegexMatcher::new(r"\bmaybe\b").unwrap();
        let span = matcher.find("MAYBE later").unwrap();
        assert_eq!((span.start, span.end), (0, 5));
    }

    #[test]
    fn words_matcher_respects_word_boundaries() {
        let matcher = RegexMatcher::words(&["some", "often"]).unwrap();
        assert!(matcher.find("a handsome dog").is_none());
        assert!(matcher.find("oftentimes").is_none());
        let span = matcher.find("it happens often").unwrap();
        assert_eq!(&"it happens often"[span.start..span.end], "often");
    }

    #[test]
    fn words_matcher_escapes_metacharacters() {
        let matcher = RegexMatcher::words(&["a.b"]).unwrap();
        assert!(matcher.find("axb").is_none());
        assert!(matcher.find("see a.b here").is_some());
    }

    #[test]
    fn invalid_regex_is_reported() {
        let err = RegexMatcher::new("(unclosed").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPattern { .. }));
    }

    #[test]
    fn phrase_matcher_finds_leftmost_phrase() {
        let matcher = PhraseMatcher::new(["try to", "you should"]).unwrap();
        let text = "You should probably try to rest";
        let span = matcher.find(text).unwrap();
        assert_eq!(&text[span.start..span.end], "You should");
    }

    #[test]
    fn phrase_matcher_requires_whole_words() {
        let matcher = PhraseMatcher::new(["all"]).unwrap();
        assert!(matcher.find("a small ball").is_none());
        assert!(matcher.find("installer").is_none());
        let span = matcher.find("after all, it worked").unwrap();
        assert_eq!((span.start, span.end), (6, 9));
    }

    #[test]
    fn phrase_matcher_handles_non_ascii_text() {
        let matcher = PhraseMatcher::new(["naïve"]).unwrap();
        let text = "I felt NAÏVE — again";
        let span = matcher.find(text).unwrap();
        assert_eq!(&text[span.start..span.end], "NAÏVE");
    }

    #[test]
    fn phrase_matcher_rejects_empty_phrases() {
        assert!(matches!(
            PhraseMatcher::new(Vec::<String>::new()),
            Err(CatalogError::EmptyPhrase)
        ));
        assert!(matches!(
            PhraseMatcher::new(["ok", "  "]),
            Err(CatalogError::EmptyPhrase)
        ));
    }

    #[test]
    fn apply_interpolates_the_match_into_guidance() {
        let rule = PatternRule::new(
            "Vague Language",
            RegexMatcher::words(&["maybe"]).unwrap(),
            "what does \"{match}\" hide?",
        );
        let found = rule.apply("Maybe I will").unwrap();
        assert_eq!(found.pattern_name, "Vague Language");
        assert_eq!(found.example_match, "Maybe");
        assert_eq!(found.explanation, "what does \"Maybe\" hide?");
    }

    #[derive(Debug)]
    struct OutOfBounds;

    impl Matcher for OutOfBounds {
        fn find(&self, _text: &str) -> Option<MatchSpan> {
            Some(MatchSpan { start: 2, end: 400 })
        }
    }

    #[test]
    fn apply_ignores_spans_outside_the_text() {
        let rule = PatternRule::new("Broken", OutOfBounds, "never shown");
        assert!(rule.apply("short").is_none());
    }

    #[test]
    fn pattern_match_serializes_with_stable_field_names() {
        let found = PatternMatch {
            pattern_name: "Deletion".into(),
            example_match: "they say".into(),
            explanation: "who says?".into(),
        };
        let value = serde_json::to_value(&found).unwrap();
        assert_eq!(value["type"], "Deletion");
        assert_eq!(value["example"], "they say");
        assert_eq!(value["explanation"], "who says?");
    }
}

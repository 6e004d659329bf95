// pattern catalog module - the ordered set of milton model rules

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use super::patterns::{PatternMatch, PatternRule, PhraseMatcher, RegexMatcher};
use crate::config::{CatalogConfig, CustomRule};
use crate::error::CatalogError;

pub const VAGUE_LANGUAGE: &str = "Vague Language";
pub const PRESUPPOSITION: &str = "Presupposition";
pub const EMBEDDED_COMMAND: &str = "Embedded Command";
pub const CAUSE_EFFECT: &str = "Cause-Effect";
pub const GENERALISATION: &str = "Generalisation";
pub const DELETION: &str = "Deletion";
pub const COMPLEX_EQUIVALENCE: &str = "Complex Equivalence";

lazy_static! {
    static ref VAGUE_LANGUAGE_RE: Regex =
        Regex::new(r"(?i)\b(?:some|maybe|possibly|often|usually)\b").unwrap();

    // both halves must sit inside one sentence
    static ref PRESUPPOSITION_RE: Regex = Regex::new(
        r"(?i)\b(?:when you\b[^.!?\n]*?\byou will|since you\b[^.!?\n]*?\byou should)\b"
    ).unwrap();

    static ref EMBEDDED_COMMAND_RE: Regex = Regex::new(
        r"(?i)\b(?:you need to|you should|try to|need to|have to|must)\b"
    ).unwrap();

    static ref CAUSE_EFFECT_RE: Regex = Regex::new(
        r"(?i)\b(?:makes? me|made me|because of|causes?|caused|forces? me|forced me|due to|so i have to)\b"
    ).unwrap();

    static ref GENERALISATION_RE: Regex = Regex::new(
        r"(?i)\b(?:all|every|everyone|everybody|everything|always|never|nobody|no one|nothing)\b"
    ).unwrap();

    static ref DELETION_RE: Regex = Regex::new(
        r"(?i)\b(?:they say|people (?:say|think)|it(?:'|’)s (?:obvious|clear)|it is (?:obvious|clear)|obviously|clearly)\b"
    ).unwrap();

    static ref COMPLEX_EQUIVALENCE_RE: Regex = Regex::new(
        r"(?i)\b(?:means that|(?:which|that|this|it) means|is the same as|equals)\b"
    ).unwrap();

    static ref DEFAULT_CATALOG: Arc<PatternCatalog> = Arc::new(PatternCatalog::milton_model());
}

/// ordered, immutable collection of pattern rules
#[derive(Debug)]
pub struct PatternCatalog {
    rules: Vec<PatternRule>,
}

impl PatternCatalog {
    /// build a catalog from arbitrary rules, rejecting empty or duplicate names
    ///
    /// names are compared ignoring ascii case, the same way `contains` and
    /// `without` look them up.
    pub fn new(rules: Vec<PatternRule>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if rule.name().trim().is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if !seen.insert(rule.name().to_ascii_lowercase()) {
                return Err(CatalogError::DuplicateName(rule.name().to_string()));
            }
        }
        Ok(Self { rules })
    }

    /// the built-in milton model rule set, in its fixed order
    pub fn milton_model() -> Self {
        fn rule(name: &str, re: &Regex, guidance: &str) -> PatternRule {
            PatternRule::new(name, RegexMatcher::from_regex(re.clone()), guidance)
        }

        Self {
            rules: vec![
                rule(
                    VAGUE_LANGUAGE,
                    &VAGUE_LANGUAGE_RE,
                    "\"{match}\" is vague. Can you make this more specific to sharpen insight?",
                ),
                rule(
                    PRESUPPOSITION,
                    &PRESUPPOSITION_RE,
                    "What if that assumption isn't true? How would you reframe it?",
                ),
                rule(
                    EMBEDDED_COMMAND,
                    &EMBEDDED_COMMAND_RE,
                    "Is \"{match}\" self-imposed pressure? Could you phrase it as a choice?",
                ),
                rule(
                    CAUSE_EFFECT,
                    &CAUSE_EFFECT_RE,
                    "\"{match}\" presents causality instead of context. What else was present when this happened?",
                ),
                rule(
                    GENERALISATION,
                    &GENERALISATION_RE,
                    "\"{match}\" applies a sweeping rule. Can you recall a single exception?",
                ),
                rule(
                    DELETION,
                    &DELETION_RE,
                    "\"{match}\" leaves something out. Who says so, and based on what?",
                ),
                rule(
                    COMPLEX_EQUIVALENCE,
                    &COMPLEX_EQUIVALENCE_RE,
                    "\"{match}\" equates two separate things. Does one really have to mean the other?",
                ),
            ],
        }
    }

    /// shared handle to the built-in catalog
    pub fn shared() -> Arc<PatternCatalog> {
        Arc::clone(&DEFAULT_CATALOG)
    }

    /// built-in rules with config overrides applied: disabled rules removed,
    /// custom rules appended in the order they were declared
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut catalog = Self::milton_model();

        // checked up front so listing a rule twice is not an error
        if let Some(unknown) = config.disabled.iter().find(|name| !catalog.contains(name)) {
            return Err(CatalogError::UnknownRule(unknown.clone()));
        }
        for name in &config.disabled {
            catalog = catalog.without(name);
        }

        let mut rules = catalog.rules;
        for custom in &config.custom {
            rules.push(custom_rule(custom)?);
        }

        Self::new(rules)
    }

    /// a copy of this catalog minus the named rule
    pub fn without(self, name: &str) -> Self {
        Self {
            rules: self
                .rules
                .into_iter()
                .filter(|rule| !rule.name().eq_ignore_ascii_case(name))
                .collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.name().eq_ignore_ascii_case(name))
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(PatternRule::name).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// run every rule over `text`, at most one match per rule, in catalog order
    pub fn scan(&self, text: &str) -> Vec<PatternMatch> {
        let matches: Vec<PatternMatch> = self
            .rules
            .iter()
            .filter_map(|rule| rule.apply(text))
            .collect();

        debug!(
            rules = self.rules.len(),
            matched = matches.len(),
            text_len = text.len(),
            "scanned entry"
        );

        matches
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::milton_model()
    }
}

fn custom_rule(custom: &CustomRule) -> Result<PatternRule, CatalogError> {
    let guidance = custom.guidance.clone();

    match (&custom.pattern, custom.phrases.is_empty()) {
        (Some(pattern), _) => Ok(PatternRule::new(
            custom.name.clone(),
            RegexMatcher::new(pattern)?,
            guidance,
        )),
        (None, false) => Ok(PatternRule::new(
            custom.name.clone(),
            PhraseMatcher::new(&custom.phrases)?,
            guidance,
        )),
        (None, true) => Err(CatalogError::MissingMatcher(custom.name.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(matches: &[PatternMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.pattern_name.as_str()).collect()
    }

    #[test]
    fn default_catalog_has_expected_order() {
        let catalog = PatternCatalog::milton_model();
        assert_eq!(
            catalog.names(),
            vec![
                VAGUE_LANGUAGE,
                PRESUPPOSITION,
                EMBEDDED_COMMAND,
                CAUSE_EFFECT,
                GENERALISATION,
                DELETION,
                COMPLEX_EQUIVALENCE,
            ]
        );
    }

    #[test]
    fn vague_language_scenario() {
        let matches = PatternCatalog::milton_model().scan("I will possibly go tomorrow");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].pattern_name, VAGUE_LANGUAGE);
        assert_eq!(matches[0].example_match, "possibly");
    }

    #[test]
    fn embedded_command_scenario() {
        let matches = PatternCatalog::milton_model().scan("You need to calm down");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].pattern_name, EMBEDDED_COMMAND);
        assert_eq!(matches[0].example_match.to_lowercase(), "you need to");
    }

    #[test]
    fn neutral_text_has_no_matches() {
        assert!(PatternCatalog::milton_model().scan("The sky is blue today").is_empty());
        assert!(PatternCatalog::milton_model().scan("").is_empty());
    }

    #[test]
    fn presupposition_and_command_are_both_found() {
        let matches = PatternCatalog::milton_model()
            .scan("When you feel anxious you will need to calm down");
        assert_eq!(names(&matches), vec![PRESUPPOSITION, EMBEDDED_COMMAND]);
        assert_eq!(matches[0].example_match, "When you feel anxious you will");
        assert_eq!(matches[1].example_match, "need to");
    }

    #[test]
    fn presupposition_does_not_cross_sentences() {
        let matches = PatternCatalog::milton_model()
            .scan("When you left it was quiet. Later you will see.");
        assert!(!names(&matches).contains(&PRESUPPOSITION));
    }

    #[test]
    fn one_match_per_rule_in_catalog_order() {
        let text = "Nobody listens, it's obvious. Maybe some day. Stress makes me eat, which means I'm weak.";
        let matches = PatternCatalog::milton_model().scan(text);
        assert_eq!(
            names(&matches),
            vec![VAGUE_LANGUAGE, CAUSE_EFFECT, GENERALISATION, DELETION, COMPLEX_EQUIVALENCE]
        );
        // first occurrence wins
        assert_eq!(matches[0].example_match, "Maybe");
    }

    #[test]
    fn case_is_ignored_but_preserved_in_the_example() {
        let catalog = PatternCatalog::milton_model();
        let upper = catalog.scan("MAYBE this is true");
        let lower = catalog.scan("maybe this is true");
        assert_eq!(upper.len(), lower.len());
        assert_eq!(upper[0].example_match, "MAYBE");
        assert_eq!(
            upper[0].example_match.to_lowercase(),
            lower[0].example_match
        );
    }

    #[test]
    fn words_inside_other_words_do_not_match() {
        let catalog = PatternCatalog::milton_model();
        assert!(catalog.scan("handsome tallest causeway").is_empty());
    }

    #[test]
    fn removing_a_rule_leaves_others_untouched() {
        let text = "Maybe you should rest because of work";
        let full = PatternCatalog::milton_model().scan(text);
        let reduced = PatternCatalog::milton_model()
            .without(EMBEDDED_COMMAND)
            .scan(text);

        let expected: Vec<_> = full
            .iter()
            .filter(|m| m.pattern_name != EMBEDDED_COMMAND)
            .cloned()
            .collect();
        assert_eq!(reduced, expected);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let rules = vec![
            PatternRule::new("A", RegexMatcher::words(&["x"]).unwrap(), ""),
            PatternRule::new("A", RegexMatcher::words(&["y"]).unwrap(), ""),
        ];
        assert!(matches!(
            PatternCatalog::new(rules),
            Err(CatalogError::DuplicateName(name)) if name == "A"
        ));
    }

    #[test]
    fn names_differing_only_in_case_are_duplicates() {
        let config = CatalogConfig {
            disabled: Vec::new(),
            custom: vec![CustomRule {
                name: "vague language".into(),
                pattern: None,
                phrases: vec!["kind of".into()],
                guidance: String::new(),
            }],
        };
        assert!(matches!(
            PatternCatalog::from_config(&config),
            Err(CatalogError::DuplicateName(name)) if name == "vague language"
        ));
    }

    #[test]
    fn disabling_a_rule_twice_is_allowed() {
        let config = CatalogConfig {
            disabled: vec![DELETION.into(), "deletion".into()],
            custom: Vec::new(),
        };
        let catalog = PatternCatalog::from_config(&config).unwrap();
        assert!(!catalog.contains(DELETION));
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn empty_names_are_rejected() {
        let rules = vec![PatternRule::new(" ", RegexMatcher::words(&["x"]).unwrap(), "")];
        assert!(matches!(PatternCatalog::new(rules), Err(CatalogError::EmptyName)));
    }

    #[test]
    fn config_disables_and_appends_rules() {
        let config = CatalogConfig {
            disabled: vec!["deletion".into()],
            custom: vec![CustomRule {
                name: "Modal Operator".into(),
                pattern: None,
                phrases: vec!["can't".into(), "cannot".into()],
                guidance: "What stops you?".into(),
            }],
        };
        let catalog = PatternCatalog::from_config(&config).unwrap();
        assert!(!catalog.contains(DELETION));
        assert_eq!(catalog.names().last(), Some(&"Modal Operator"));

        let matches = catalog.scan("I just cannot, they say");
        assert_eq!(names(&matches), vec!["Modal Operator"]);
    }

    #[test]
    fn config_errors_surface_at_construction() {
        let unknown = CatalogConfig {
            disabled: vec!["Mind Reading".into()],
            custom: Vec::new(),
        };
        assert!(matches!(
            PatternCatalog::from_config(&unknown),
            Err(CatalogError::UnknownRule(_))
        ));

        let clash = CatalogConfig {
            disabled: Vec::new(),
            custom: vec![CustomRule {
                name: VAGUE_LANGUAGE.into(),
                pattern: Some(r"\bkind of\b".into()),
                phrases: Vec::new(),
                guidance: String::new(),
            }],
        };
        assert!(matches!(
            PatternCatalog::from_config(&clash),
            Err(CatalogError::DuplicateName(_))
        ));

        let no_matcher = CatalogConfig {
            disabled: Vec::new(),
            custom: vec![CustomRule {
                name: "Empty".into(),
                pattern: None,
                phrases: Vec::new(),
                guidance: String::new(),
            }],
        };
        assert!(matches!(
            PatternCatalog::from_config(&no_matcher),
            Err(CatalogError::MissingMatcher(_))
        ));
    }

    #[test]
    fn shared_catalog_is_reused() {
        let a = PatternCatalog::shared();
        let b = PatternCatalog::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }
}

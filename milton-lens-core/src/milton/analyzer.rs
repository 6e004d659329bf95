// entry analysis module - scans an entry and assembles the full analysis

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::catalog::PatternCatalog;
use super::patterns::PatternMatch;
use super::synthesis::{NarrativeFields, synthesize};
use crate::utils::{normalize_whitespace, truncate_with_ellipsis};

/// default cap on the length of the surface structure, in characters
pub const DEFAULT_SURFACE_MAX_CHARS: usize = 280;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeliefType {
    Old,
    Shift,
}

impl fmt::Display for BeliefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeliefType::Old => write!(f, "Old"),
            BeliefType::Shift => write!(f, "Shift"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpliedBelief {
    #[serde(rename = "type")]
    pub belief_type: BeliefType,
    pub text: String,
}

/// structured result of analysing one journal entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub identity_sentence: String,
    pub surface_structure: String,
    pub deep_structure: String,
    pub implied_beliefs: Vec<ImpliedBelief>,
    pub patterns: Vec<PatternMatch>,
    pub reframe: String,
    pub final_thought: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// 0 keeps the whole entry
    pub surface_max_chars: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            surface_max_chars: DEFAULT_SURFACE_MAX_CHARS,
        }
    }
}

/// stateless analyser over an injected catalog; cheap to clone and share
#[derive(Debug, Clone)]
pub struct EntryAnalyzer {
    catalog: Arc<PatternCatalog>,
    options: AnalyzerOptions,
}

impl EntryAnalyzer {
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self::with_options(catalog, AnalyzerOptions::default())
    }

    pub fn with_options(catalog: Arc<PatternCatalog>, options: AnalyzerOptions) -> Self {
        Self { catalog, options }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn options(&self) -> AnalyzerOptions {
        self.options
    }

    /// analyse raw entry text; never fails, empty text gives a placeholder analysis
    pub fn analyze(&self, text: &str) -> Analysis {
        let patterns = self.catalog.scan(text);
        let surface_structure = self.surface_structure(text);

        let NarrativeFields {
            identity_sentence,
            deep_structure,
            implied_beliefs,
            reframe,
            final_thought,
        } = synthesize(text, &patterns);

        debug!(
            patterns = patterns.len(),
            beliefs = implied_beliefs.len(),
            "analysed entry"
        );

        Analysis {
            identity_sentence,
            surface_structure,
            deep_structure,
            implied_beliefs,
            patterns,
            reframe,
            final_thought,
        }
    }

    fn surface_structure(&self, text: &str) -> String {
        let cleaned = normalize_whitespace(text);
        if self.options.surface_max_chars == 0 {
            cleaned
        } else {
            truncate_with_ellipsis(&cleaned, self.options.surface_max_chars)
        }
    }
}

impl Default for EntryAnalyzer {
    fn default() -> Self {
        Self::new(PatternCatalog::shared())
    }
}

/// analyse `text` with the built-in catalog and default options
pub fn analyze(text: &str) -> Analysis {
    EntryAnalyzer::default().analyze(text)
}

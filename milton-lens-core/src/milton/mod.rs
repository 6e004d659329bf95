// milton module - organises pattern detection and analysis into submodules

pub mod analyzer;
pub mod catalog;
pub mod patterns;
pub mod render;
pub mod synthesis;
pub mod validation;

// re-export key public items for convenient access
pub use analyzer::{Analysis, AnalyzerOptions, BeliefType, EntryAnalyzer, ImpliedBelief, analyze};
pub use catalog::PatternCatalog;
pub use patterns::{MatchSpan, Matcher, PatternMatch, PatternRule, PhraseMatcher, RegexMatcher};
pub use render::{render_json, render_markdown, render_text};
pub use synthesis::{NarrativeFields, synthesize};
pub use validation::{EMPTY_ENTRY_MESSAGE, validate_entry};

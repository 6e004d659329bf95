// narrative synthesis module - turns detected patterns into the written insight
//
// rule based and deterministic: the same text and matches always give the
// same narrative.

use super::analyzer::{BeliefType, ImpliedBelief};
use super::catalog::{
    CAUSE_EFFECT, COMPLEX_EQUIVALENCE, DELETION, EMBEDDED_COMMAND, GENERALISATION,
    PRESUPPOSITION, VAGUE_LANGUAGE,
};
use super::patterns::{MATCH_PLACEHOLDER, PatternMatch};

/// identity sentence used when nothing more specific applies
pub const DEFAULT_IDENTITY: &str =
    "I step away from passive repetition and choose my own direction.";

/// everything in an analysis that is written rather than detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeFields {
    pub identity_sentence: String,
    pub deep_structure: String,
    pub implied_beliefs: Vec<ImpliedBelief>,
    pub reframe: String,
    pub final_thought: String,
}

struct Theme {
    need: &'static str,
    identity: &'static str,
    old: &'static str,
    shift: &'static str,
    reframe: &'static str,
}

fn theme_for(pattern_name: &str) -> Option<Theme> {
    let theme = match pattern_name {
        VAGUE_LANGUAGE => Theme {
            need: "a wish to stay safe by keeping things undefined",
            identity: "I name what I actually experience instead of hiding in maybes.",
            old: "Staying vague keeps me safe",
            shift: "Being specific gives me something I can act on",
            reframe: "Instead of \"{match}\", I can say exactly what happened and what I want.",
        },
        PRESUPPOSITION => Theme {
            need: "an assumption treated as a certainty",
            identity: "I question the stories I assume are already true.",
            old: "What I expect is what will happen",
            shift: "My expectations are guesses I can test",
            reframe: "\"{match}\" is one possibility, not a prediction I have to live out.",
        },
        EMBEDDED_COMMAND => Theme {
            need: "pressure to meet demands I have absorbed",
            identity: DEFAULT_IDENTITY,
            old: "I have to obey the voice that pushes me",
            shift: "I can choose what I do and why",
            reframe: "Where I wrote \"{match}\", I can say \"I choose to\" or \"I choose not to\".",
        },
        CAUSE_EFFECT => Theme {
            need: "a desire for control paired with a sense that events decide how I feel",
            identity: "I respond to what happens instead of being run by it.",
            old: "Things outside me decide how I feel",
            shift: "I notice what happens and choose my response",
            reframe: "\"{match}\" describes context, not a law; my response is still mine.",
        },
        GENERALISATION => Theme {
            need: "a sweeping rule built from a few painful moments",
            identity: "I see each moment on its own terms, not through one rule.",
            old: "It always goes this way",
            shift: "Exceptions exist and I can find them",
            reframe: "\"{match}\" is not the whole story; there have been times it was different.",
        },
        DELETION => Theme {
            need: "borrowed authority standing in for my own view",
            identity: "I speak from my own experience rather than borrowed voices.",
            old: "Others already know what is true for me",
            shift: "My own experience counts as evidence",
            reframe: "Instead of \"{match}\", I can say what I have seen for myself.",
        },
        COMPLEX_EQUIVALENCE => Theme {
            need: "two separate things fused into one meaning",
            identity: "I separate what happens from what it says about me.",
            old: "This event defines who I am",
            shift: "An event is information, not identity",
            reframe: "\"{match}\" links two things that can stand apart; discomfort is information, not failure.",
        },
        _ => return None,
    };
    Some(theme)
}

/// write the narrative fields for `text` given the matches found in it
pub fn synthesize(text: &str, patterns: &[PatternMatch]) -> NarrativeFields {
    let Some(lead) = patterns.first() else {
        return if text.trim().is_empty() {
            placeholder_fields()
        } else {
            plain_entry_fields()
        };
    };

    let mut needs = Vec::with_capacity(patterns.len());
    let mut implied_beliefs = Vec::with_capacity(patterns.len() * 2);

    for found in patterns {
        match theme_for(&found.pattern_name) {
            Some(theme) => {
                needs.push(theme.need.to_string());
                implied_beliefs.push(belief(BeliefType::Old, theme.old.to_string()));
                implied_beliefs.push(belief(BeliefType::Shift, theme.shift.to_string()));
            }
            None => {
                needs.push(format!(
                    "the pattern of {}",
                    found.pattern_name.to_lowercase()
                ));
                implied_beliefs.push(belief(
                    BeliefType::Old,
                    format!("\"{}\" is simply how things are", found.example_match),
                ));
                implied_beliefs.push(belief(
                    BeliefType::Shift,
                    format!("\"{}\" is a way of speaking I can change", found.example_match),
                ));
            }
        }
    }

    let deep_structure = format!(
        "Beneath the language is {}. The phrase \"{}\" carries most of that weight.",
        join_readable(&needs),
        lead.example_match
    );

    let (identity_sentence, reframe) = match theme_for(&lead.pattern_name) {
        Some(theme) => (
            theme.identity.to_string(),
            theme.reframe.replace(MATCH_PLACEHOLDER, &lead.example_match),
        ),
        None => (
            DEFAULT_IDENTITY.to_string(),
            format!(
                "\"{}\" is how I used to put it; I can choose words that leave me room to move.",
                lead.example_match
            ),
        ),
    };

    let final_thought = if patterns.len() == 1 {
        "Naming one pattern is already the shift; clarity grows each time you notice it."
            .to_string()
    } else {
        format!(
            "You named {} patterns today; each one you notice loosens its hold.",
            patterns.len()
        )
    };

    NarrativeFields {
        identity_sentence,
        deep_structure,
        implied_beliefs,
        reframe,
        final_thought,
    }
}

fn belief(belief_type: BeliefType, text: String) -> ImpliedBelief {
    ImpliedBelief { belief_type, text }
}

fn placeholder_fields() -> NarrativeFields {
    NarrativeFields {
        identity_sentence: "I am ready to put my experience into words.".to_string(),
        deep_structure: "No entry text was provided, so nothing can be inferred yet.".to_string(),
        implied_beliefs: Vec::new(),
        reframe: "Whatever I write next is a starting point, not a verdict.".to_string(),
        final_thought: "Start with one honest sentence.".to_string(),
    }
}

fn plain_entry_fields() -> NarrativeFields {
    NarrativeFields {
        identity_sentence: "I describe my experience in my own clear words.".to_string(),
        deep_structure:
            "The entry is written in direct language; no limiting pattern stands out beneath it."
                .to_string(),
        implied_beliefs: Vec::new(),
        reframe: "What I wrote already stands on its own; I can build on it.".to_string(),
        final_thought: "Keep writing from this grounded place.".to_string(),
    }
}

/// "a", "a and b", "a, b and c"
fn join_readable(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

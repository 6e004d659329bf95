// rendering module - markdown, terminal and json views of an analysis

use anyhow::{Context, Result};
use console::style;
use std::fmt::Write;

use super::analyzer::{Analysis, BeliefType};

/// markdown breakdown stored alongside an entry
pub fn render_markdown(analysis: &Analysis) -> String {
    let mut out = String::new();

    // writing to a String cannot fail
    let _ = writeln!(out, "# {}\n", analysis.identity_sentence);

    let _ = writeln!(out, "## 1. Surface Structure\n");
    let _ = writeln!(out, "{}\n", quote(&analysis.surface_structure));

    let _ = writeln!(out, "## 2. Milton Model Breakdown\n");
    if analysis.patterns.is_empty() {
        let _ = writeln!(out, "_No Milton Model patterns detected._\n");
    } else {
        for found in &analysis.patterns {
            let _ = writeln!(
                out,
                "- **{}:** \"{}\" - {}",
                found.pattern_name, found.example_match, found.explanation
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## 3. Deep Structure\n");
    let _ = writeln!(out, "{}\n", analysis.deep_structure);

    let _ = writeln!(out, "## 4. Implied Beliefs & Inner Shifts\n");
    if analysis.implied_beliefs.is_empty() {
        let _ = writeln!(out, "_No implied beliefs surfaced._\n");
    } else {
        for belief in &analysis.implied_beliefs {
            let _ = writeln!(out, "- {}: {}", belief.belief_type, belief.text);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## 5. Reframe\n");
    let _ = writeln!(out, "{}\n", quote(&analysis.reframe));

    let _ = writeln!(out, "## 6. What They're Really Saying\n");
    let _ = writeln!(out, "{}", analysis.final_thought);

    out
}

fn quote(text: &str) -> String {
    if text.is_empty() {
        ">".to_string()
    } else {
        format!("> {text}")
    }
}

/// coloured terminal view
pub fn render_text(analysis: &Analysis) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", style(&analysis.identity_sentence).cyan().bold());
    out.push('\n');

    section(&mut out, "surface structure", &analysis.surface_structure);

    let _ = writeln!(out, "{}", style("milton model breakdown").magenta().bold());
    if analysis.patterns.is_empty() {
        let _ = writeln!(out, "  {}", style("no patterns detected").dim());
    }
    for found in &analysis.patterns {
        let _ = writeln!(
            out,
            "  {} {}",
            style(format!("{}:", found.pattern_name)).yellow().bold(),
            style(format!("\"{}\"", found.example_match)).yellow()
        );
        let _ = writeln!(out, "    {}", found.explanation);
    }
    out.push('\n');

    section(&mut out, "deep structure", &analysis.deep_structure);

    let _ = writeln!(out, "{}", style("implied beliefs").magenta().bold());
    if analysis.implied_beliefs.is_empty() {
        let _ = writeln!(out, "  {}", style("none surfaced").dim());
    }
    for belief in &analysis.implied_beliefs {
        let label = match belief.belief_type {
            BeliefType::Old => style(format!("{}:", belief.belief_type)).red(),
            BeliefType::Shift => style(format!("{}:", belief.belief_type)).green(),
        };
        let _ = writeln!(out, "  {} {}", label, belief.text);
    }
    out.push('\n');

    section(&mut out, "reframe", &analysis.reframe);

    let _ = writeln!(out, "{}", style(&analysis.final_thought).green().italic());

    out
}

fn section(out: &mut String, title: &str, body: &str) {
    let _ = writeln!(out, "{}", style(title).magenta().bold());
    let _ = writeln!(out, "  {body}");
    out.push('\n');
}

/// pretty json using the stable field names
pub fn render_json(analysis: &Analysis) -> Result<String> {
    serde_json::to_string_pretty(analysis).context("failed to serialize analysis")
}

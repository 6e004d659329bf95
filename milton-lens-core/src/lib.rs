// milton-lens-core/src/lib.rs

// declare modules
pub mod config;
pub mod error;
pub mod milton;
pub mod utils;

// re-export key structs/functions for external use by other crates
pub use anyhow::{Context, Result}; // re-export for convenience
pub use clap::Parser; // re-export Parser for CLI crate
pub use console::style; // re-export for CLI/NAPI crates if they do printing
pub use dotenv::dotenv;

pub use crate::config::Config;
pub use crate::error::CatalogError;
pub use crate::milton::{
    Analysis, AnalyzerOptions, BeliefType, EntryAnalyzer, ImpliedBelief, PatternCatalog,
    PatternMatch, PatternRule, analyze, render_json, render_markdown, render_text,
    validate_entry,
};

use anyhow::bail;
use clap::ValueEnum;
use dialoguer::{Confirm, theme::ColorfulTheme};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use tracing::{debug, info};

/// how the analysis is printed
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

// argument parsing struct - shared by the CLI and NAPI crates
#[derive(Parser, Debug, Clone)]
#[command(name = "milton-lens")]
#[command(about = "milton model analysis for journal entries", long_about = None)]
pub struct CoreCliArgs {
    /// entry text to analyse (otherwise read from --file, piped stdin or an editor)
    pub text: Option<String>,

    /// read the entry from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// config file (defaults to ~/.milton-lens.toml merged with ./.milton-lens.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// list the active patterns and exit
    #[arg(short, long)]
    pub list_patterns: bool,

    /// open the entry in an editor before analysing
    #[arg(short, long)]
    pub edit: bool,

    /// show debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// build the analyser described by the config, failing on a bad catalog
pub fn build_analyzer(config: &Config) -> Result<EntryAnalyzer> {
    let catalog = config
        .build_catalog()
        .context("invalid pattern catalog configuration")?;
    Ok(EntryAnalyzer::with_options(
        Arc::new(catalog),
        config.analyzer_options(),
    ))
}

/// one line per active rule: name and guidance
pub fn describe_catalog(catalog: &PatternCatalog) -> String {
    catalog
        .rules()
        .iter()
        .map(|rule| format!("{}: {}", rule.name(), rule.guidance()))
        .collect::<Vec<_>>()
        .join("\n")
}

// the analysis flow shared by the CLI and NAPI entry points.
// returns the rendered output, which is also printed to stdout.
pub fn execute_analysis_flow(args: CoreCliArgs) -> Result<String> {
    dotenv().ok();

    let cwd = std::env::current_dir().ok();
    let config = Config::load(args.config.as_deref(), cwd.as_deref())?;
    let analyzer = build_analyzer(&config)?;
    debug!(rules = analyzer.catalog().len(), "analyser ready");

    if args.list_patterns {
        let listing = describe_catalog(analyzer.catalog());
        println!("{}", style("active patterns:").cyan().bold());
        println!("{listing}");
        return Ok(listing);
    }

    let text = read_entry(&args)?;
    validate_entry(&text)?;

    let analysis = analyzer.analyze(&text);
    info!(patterns = analysis.patterns.len(), "entry analysed");

    let rendered = match args.format {
        OutputFormat::Text => {
            println!("{}\n", style("milton-lens").cyan().bold());
            render_text(&analysis)
        }
        OutputFormat::Json => render_json(&analysis)?,
        OutputFormat::Markdown => render_markdown(&analysis),
    };
    println!("{rendered}");

    Ok(rendered)
}

/// gather the entry from the argument, a file, stdin or an editor session
fn read_entry(args: &CoreCliArgs) -> Result<String> {
    let initial = if let Some(text) = &args.text {
        Some(text.clone())
    } else if let Some(path) = &args.file {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read entry {}", path.display()))?;
        Some(utils::decode_entry_bytes(&bytes))
    } else if !atty::is(atty::Stream::Stdin) {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("failed to read entry from stdin")?;
        Some(utils::decode_entry_bytes(&bytes))
    } else {
        None
    };

    let mut draft = match initial {
        Some(text) if !args.edit => return Ok(text),
        other => other.unwrap_or_default(),
    };

    loop {
        println!("{}", style("opening editor for your entry...").cyan());
        draft = write_in_editor(&draft)?;

        if !draft.trim().is_empty() {
            return Ok(draft);
        }

        let again = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("the entry is empty, open the editor again?")
            .default(true)
            .interact()?;
        if !again {
            // validation reports the empty entry
            return Ok(draft);
        }
    }
}

/// editor command from $VISUAL, then $EDITOR, then the first one installed
fn editor_command(visual: Option<String>, editor: Option<String>) -> Vec<String> {
    let command = visual
        .into_iter()
        .chain(editor)
        .find(|e| !e.trim().is_empty())
        .unwrap_or_else(|| {
            ["nvim", "vim", "vi", "nano"]
                .into_iter()
                .find(|candidate| which::which(candidate).is_ok())
                .unwrap_or("nano")
                .to_string()
        });

    command.split_whitespace().map(str::to_string).collect()
}

/// open `draft` in the writer's editor and return what they saved
fn write_in_editor(draft: &str) -> Result<String> {
    let mut file = tempfile::Builder::new()
        .prefix("milton-lens-")
        .suffix(".md")
        .tempfile()
        .context("failed to create entry draft")?;
    file.write_all(draft.as_bytes())
        .context("failed to write entry draft")?;

    let command = editor_command(std::env::var("VISUAL").ok(), std::env::var("EDITOR").ok());
    let (program, editor_args) = command.split_first().context("no editor configured")?;

    let status = Command::new(program)
        .args(editor_args)
        .arg(file.path())
        .status()
        .with_context(|| format!("failed to execute editor '{program}'"))?;
    if !status.success() {
        bail!("editor '{program}' exited with {status}");
    }

    let bytes = std::fs::read(file.path()).context("failed to read entry draft")?;
    Ok(utils::decode_entry_bytes(&bytes).trim_end().to_string())
}

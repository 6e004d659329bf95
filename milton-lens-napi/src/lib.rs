#![warn(clippy::all)]

#[macro_use]
extern crate napi_derive;

use napi::Result as NapiResult;
use napi::Status;

use milton_lens_core::{
  Analysis, CoreCliArgs, EntryAnalyzer, Parser, PatternCatalog, analyze, execute_analysis_flow,
  render_markdown, style, validate_entry,
};

/// one detected pattern, as seen from javascript
#[napi(object)]
pub struct JsPatternMatch {
  #[napi(js_name = "type")]
  pub pattern_name: String,
  pub example: String,
  pub explanation: String,
}

#[napi(object)]
pub struct JsImpliedBelief {
  /// "Old" or "Shift"
  #[napi(js_name = "type")]
  pub belief_type: String,
  pub text: String,
}

#[napi(object)]
pub struct JsAnalysis {
  pub identity_sentence: String,
  pub surface_structure: String,
  pub deep_structure: String,
  pub implied_beliefs: Vec<JsImpliedBelief>,
  pub patterns: Vec<JsPatternMatch>,
  pub reframe: String,
  pub final_thought: String,
}

impl From<Analysis> for JsAnalysis {
  fn from(analysis: Analysis) -> Self {
    Self {
      identity_sentence: analysis.identity_sentence,
      surface_structure: analysis.surface_structure,
      deep_structure: analysis.deep_structure,
      implied_beliefs: analysis
        .implied_beliefs
        .into_iter()
        .map(|b| JsImpliedBelief {
          belief_type: b.belief_type.to_string(),
          text: b.text,
        })
        .collect(),
      patterns: analysis
        .patterns
        .into_iter()
        .map(|p| JsPatternMatch {
          pattern_name: p.pattern_name,
          example: p.example_match,
          explanation: p.explanation,
        })
        .collect(),
      reframe: analysis.reframe,
      final_thought: analysis.final_thought,
    }
  }
}

/// the journal screen's "analyze" button; empty text yields a placeholder analysis
#[napi]
pub fn analyze_entry(text: String) -> JsAnalysis {
  analyze(&text).into()
}

/// same analysis as json with the stable snake_case field names
#[napi]
pub fn analyze_entry_json(text: String) -> NapiResult<String> {
  serde_json::to_string(&analyze(&text))
    .map_err(|e| napi::Error::new(Status::GenericFailure, format!("NAPI: {e}")))
}

/// markdown breakdown stored as the entry's analysis_markdown
#[napi]
pub fn analyze_entry_markdown(text: String) -> String {
  render_markdown(&analyze(&text))
}

/// names of the built-in patterns, in detection order
#[napi]
pub fn list_patterns() -> Vec<String> {
  PatternCatalog::shared()
    .names()
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// throws InvalidArg with the user-facing message for empty entries
#[napi]
pub fn validate_entry_text(text: String) -> NapiResult<()> {
  validate_entry(&text).map_err(|e| napi::Error::new(Status::InvalidArg, e.to_string()))
}

/// analyse with the default catalog but a custom surface structure cap
#[napi]
pub fn analyze_entry_with_limit(text: String, surface_max_chars: u32) -> JsAnalysis {
  let analyzer = EntryAnalyzer::with_options(
    PatternCatalog::shared(),
    milton_lens_core::AnalyzerOptions {
      surface_max_chars: surface_max_chars as usize,
    },
  );
  analyzer.analyze(&text).into()
}

#[napi(ts_args_type = "argv: string[]")]
pub fn run_milton_lens_cli(argv: Vec<String>) -> NapiResult<String> {
  // clap expects the first arg to be the program name.
  let mut full_argv = vec!["milton-lens-napi".to_string()];
  full_argv.extend(argv);

  let core_args = match CoreCliArgs::try_parse_from(&full_argv) {
    Ok(args) => args,
    Err(e) => {
      let err_msg = format!("argument parsing error: {e}\nfor example: milton-lens --format json \"maybe tomorrow\"");
      eprintln!("{}", style(&err_msg).red().bold());
      return Err(napi::Error::new(Status::InvalidArg, err_msg));
    }
  };

  execute_analysis_flow(core_args).map_err(|e| {
    let error_str = e.to_string();
    let (status, napi_err_msg) = if error_str.contains("please write something") {
      (Status::InvalidArg, format!("NAPI: {e}"))
    } else if error_str.contains("pattern catalog") {
      (Status::InvalidArg, format!("NAPI: check your .milton-lens.toml - {e:#}"))
    } else {
      (Status::GenericFailure, format!("NAPI: error during analysis - {e:#}"))
    };
    eprintln!("{}", style(&napi_err_msg).red().bold());
    napi::Error::new(status, napi_err_msg)
  })
}

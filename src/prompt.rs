use crate::session::{SourceLanguage, TargetLanguage};
use crate::upload::UploadedImage;

use itertools::Itertools;

/// Rules appended to every conversion request, in order.
pub const CONVERT_RULES: [&str; 4] = [
    "Make the new code Pythonic/Modern.",
    "Do not add any comments.",
    "If there are bugs in the original, fix them in the new version.",
    "Output raw code only. Do not wrap in markdown code blocks.",
];

const DEBUG_PROMPT: &str = "Analyze this image. If it's code, transcribe and refactor it. \
If it's an error message, explain the solution step-by-step.";

/// What gets sent to the model for one request.
#[derive(Debug, Clone, Copy)]
pub enum Prompt<'a> {
    Text(&'a str),
    WithImage {
        instruction: &'a str,
        image: &'a UploadedImage,
    },
}

impl Prompt<'_> {
    pub fn instruction(&self) -> &str {
        match self {
            Prompt::Text(text) => text,
            Prompt::WithImage { instruction, .. } => instruction,
        }
    }
}

/// Code is interpolated as is, the model is its only consumer.
pub fn build_convert_prompt(
    source: SourceLanguage,
    target: TargetLanguage,
    code: &str,
) -> String {
    let rules = CONVERT_RULES
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{}. {}", i + 1, rule))
        .join("\n");
    format!(
        r#"
Act as a Senior Developer. Convert the following {} code to {}.
Rules:
{}

Code:
{}
"#,
        source, target, rules, code
    )
    .trim()
    .to_owned()
}

pub fn build_debug_prompt() -> &'static str {
    DEBUG_PROMPT
}

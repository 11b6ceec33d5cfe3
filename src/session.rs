//! Per-window session state.
//!
//! Everything the user types or picks lives in [`SessionState`], which the UI owns and hands to
//! the action handlers by reference. Nothing here is persisted.

use crate::upload::UploadedImage;
use std::fmt::Display;
use std::sync::Arc;

/// Cheap to clone: a request works on a snapshot taken when its button was pressed.
#[derive(Debug, Default, Clone)]
pub struct SessionState {
    pub api_key: String,
    pub selected_model: Model,
    pub convert: ConvertInput,
    pub debug: DebugInput,
}

impl SessionState {
    /// Key as it should be sent, `None` if blank.
    pub fn api_key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (!key.is_empty()).then_some(key)
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConvertInput {
    pub source_language: SourceLanguage,
    pub target_language: TargetLanguage,
    pub source_code: String,
}

#[derive(Debug, Default, Clone)]
pub struct DebugInput {
    pub image: Option<Arc<UploadedImage>>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    #[default]
    Gemini15Flash,
    Gemini15Pro,
    Gemini20FlashExp,
    Gemini25Flash,
}

impl Model {
    pub const ALL: [Model; 4] = [
        Model::Gemini15Flash,
        Model::Gemini15Pro,
        Model::Gemini20FlashExp,
        Model::Gemini25Flash,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Model::Gemini15Flash => "gemini-1.5-flash",
            Model::Gemini15Pro => "gemini-1.5-pro",
            Model::Gemini20FlashExp => "gemini-2.0-flash-exp",
            Model::Gemini25Flash => "gemini-2.5-flash",
        }
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    #[default]
    Java,
    Cpp,
    C,
    JavaScript,
}

impl SourceLanguage {
    pub const ALL: [SourceLanguage; 4] = [
        SourceLanguage::Java,
        SourceLanguage::Cpp,
        SourceLanguage::C,
        SourceLanguage::JavaScript,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SourceLanguage::Java => "Java",
            SourceLanguage::Cpp => "C++",
            SourceLanguage::C => "C",
            SourceLanguage::JavaScript => "JavaScript",
        }
    }
}

impl Display for SourceLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TargetLanguage {
    #[default]
    Python,
    Go,
    Rust,
    ModernJs,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 4] = [
        TargetLanguage::Python,
        TargetLanguage::Go,
        TargetLanguage::Rust,
        TargetLanguage::ModernJs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TargetLanguage::Python => "Python",
            TargetLanguage::Go => "Go",
            TargetLanguage::Rust => "Rust",
            TargetLanguage::ModernJs => "Modern JS",
        }
    }

    /// Language label for the rendered code block.
    pub fn code_tag(self) -> String {
        match self {
            TargetLanguage::ModernJs => "javascript".to_owned(),
            other => other.name().to_lowercase(),
        }
    }
}

impl Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_tag_for_modern_js_is_javascript() {
        assert_eq!(TargetLanguage::ModernJs.code_tag(), "javascript");
    }

    #[test]
    fn code_tag_is_lowercased_name() {
        assert_eq!(TargetLanguage::Python.code_tag(), "python");
        assert_eq!(TargetLanguage::Go.code_tag(), "go");
        assert_eq!(TargetLanguage::Rust.code_tag(), "rust");
    }

    #[test]
    fn defaults_match_first_entries() {
        let session = SessionState::default();
        assert_eq!(session.selected_model, Model::ALL[0]);
        assert_eq!(session.convert.source_language, SourceLanguage::ALL[0]);
        assert_eq!(session.convert.target_language, TargetLanguage::ALL[0]);
        assert!(session.debug.image.is_none());
    }

    #[test]
    fn blank_api_key_is_absent() {
        let mut session = SessionState::default();
        assert_eq!(session.api_key(), None);

        session.api_key = "   ".to_owned();
        assert_eq!(session.api_key(), None);

        session.api_key = " abc ".to_owned();
        assert_eq!(session.api_key(), Some("abc"));
    }

    #[test]
    fn model_ids() {
        let ids: Vec<_> = Model::ALL.iter().map(|m| m.id()).collect();
        assert_eq!(
            ids,
            [
                "gemini-1.5-flash",
                "gemini-1.5-pro",
                "gemini-2.0-flash-exp",
                "gemini-2.5-flash"
            ]
        );
    }
}

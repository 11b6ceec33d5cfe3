pub mod dummy;
pub mod gemini;

use super::LLMError;
use super::prompt::Prompt;
use serde::Deserialize;

pub const GENERATE_CONTENT: &str = "generateContent";

pub trait LLMBuilder {
    type Built: LLM;

    /// Fails with [`LLMError::MissingCredential`] on a blank key, before anything touches the network.
    fn build(&self, api_key: &str, model_id: &str) -> Result<Self::Built, LLMError>;
}

pub trait LLM {
    async fn generate(&self, prompt: Prompt<'_>) -> Result<String, LLMError>;
}

pub trait ModelLister {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, LLMError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelDescriptor {
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT)
    }
}

fn require_key(api_key: &str) -> Result<&str, LLMError> {
    let key = api_key.trim();
    if key.is_empty() {
        return Err(LLMError::MissingCredential);
    }
    Ok(key)
}

use super::{LLM, LLMBuilder, ModelDescriptor, ModelLister};
use crate::LLMError;
use crate::prompt::Prompt;
use std::sync::{Arc, Mutex};

/// In-process stand-in for a remote model. Replies with a fixed result and remembers what it
/// was asked, so handlers can be exercised without a network.
#[derive(Debug, Clone, Default)]
pub struct DummyLLMBuilder {
    reply: Reply,
    models: Vec<ModelDescriptor>,
    log: Arc<Mutex<Vec<DummyCall>>>,
}

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    ApiError { code: u16, message: String },
}

impl Default for Reply {
    fn default() -> Self {
        Reply::Text("Dummy output".to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyCall {
    pub model_id: String,
    pub instruction: String,
    pub image_mime_type: Option<String>,
}

impl DummyLLMBuilder {
    pub fn replying(text: &str) -> Self {
        DummyLLMBuilder {
            reply: Reply::Text(text.to_owned()),
            ..Default::default()
        }
    }

    pub fn failing(code: u16, message: &str) -> Self {
        DummyLLMBuilder {
            reply: Reply::ApiError {
                code,
                message: message.to_owned(),
            },
            ..Default::default()
        }
    }

    pub fn with_models(mut self, models: Vec<ModelDescriptor>) -> Self {
        self.models = models;
        self
    }

    pub fn catalog(&self) -> DummyLLM {
        DummyLLM {
            builder: self.clone(),
            model_id: String::new(),
        }
    }

    /// Every `generate` call made through LLMs built by this builder.
    pub fn calls(&self) -> Vec<DummyCall> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl LLMBuilder for DummyLLMBuilder {
    type Built = DummyLLM;

    fn build(&self, api_key: &str, model_id: &str) -> Result<Self::Built, LLMError> {
        super::require_key(api_key)?;
        Ok(DummyLLM {
            builder: self.clone(),
            model_id: model_id.to_owned(),
        })
    }
}

pub struct DummyLLM {
    builder: DummyLLMBuilder,
    model_id: String,
}

impl LLM for DummyLLM {
    async fn generate(&self, prompt: Prompt<'_>) -> Result<String, LLMError> {
        let image_mime_type = match prompt {
            Prompt::Text(_) => None,
            Prompt::WithImage { image, .. } => Some(image.mime_type.to_owned()),
        };
        if let Ok(mut log) = self.builder.log.lock() {
            log.push(DummyCall {
                model_id: self.model_id.clone(),
                instruction: prompt.instruction().to_owned(),
                image_mime_type,
            });
        }

        match &self.builder.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::ApiError { code, message } => Err(LLMError::ApiError {
                code: *code,
                status: "DUMMY".to_owned(),
                message: message.clone(),
            }),
        }
    }
}

impl ModelLister for DummyLLM {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, LLMError> {
        match &self.builder.reply {
            Reply::Text(_) => Ok(self.builder.models.clone()),
            Reply::ApiError { code, message } => Err(LLMError::ApiError {
                code: *code,
                status: "DUMMY".to_owned(),
                message: message.clone(),
            }),
        }
    }
}

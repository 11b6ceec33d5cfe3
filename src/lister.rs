//! Diagnostic: which models can this key call `generateContent` on?

use crate::LLMError;
use crate::llm::{ModelDescriptor, ModelLister};
use std::io::{self, Write};

pub async fn generation_models<ML: ModelLister>(lister: &ML) -> Result<Vec<String>, LLMError> {
    let models = lister.list_models().await?;
    Ok(filter_generation_models(models))
}

pub fn filter_generation_models(models: Vec<ModelDescriptor>) -> Vec<String> {
    models
        .into_iter()
        .filter(ModelDescriptor::supports_generate_content)
        .map(|m| m.name)
        .collect()
}

/// Prints the report; listing failures become an `Error:` line rather than an `Err`.
pub async fn run<ML: ModelLister>(lister: &ML, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Checking available models...")?;
    match generation_models(lister).await {
        Ok(names) => {
            for name in names {
                writeln!(out, "- {}", name)?;
            }
        }
        Err(e) => {
            log::warn!("Model listing failed: {}", e);
            writeln!(out, "Error: {}", e)?;
        }
    }
    Ok(())
}

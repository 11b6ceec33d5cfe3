//! One handler per button. Each builds a fresh prompt, makes exactly one model call and turns
//! the outcome into something the UI can render.

use crate::classify::{Alert, Feature};
use crate::llm::{LLM, LLMBuilder};
use crate::normalize::normalize;
use crate::prompt::{Prompt, build_convert_prompt, build_debug_prompt};
use crate::session::SessionState;
use crate::LLMError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOutput {
    pub code: String,
    pub language_tag: String,
}

pub async fn convert_code<LB: LLMBuilder>(
    llm_builder: &LB,
    session: &SessionState,
) -> Result<ConvertOutput, Alert> {
    let model = session.selected_model;
    let to_alert = |err: LLMError| Alert::for_error(&err, model, Feature::Convert);

    let api_key = session
        .api_key()
        .ok_or_else(|| to_alert(LLMError::MissingCredential))?;
    let llm = llm_builder.build(api_key, model.id()).map_err(to_alert)?;

    let input = &session.convert;
    log::info!(
        "Converting {} chars of {} to {} with {}",
        input.source_code.len(),
        input.source_language,
        input.target_language,
        model
    );
    let prompt = build_convert_prompt(
        input.source_language,
        input.target_language,
        &input.source_code,
    );
    let raw = llm.generate(Prompt::Text(&prompt)).await.map_err(to_alert)?;

    Ok(ConvertOutput {
        code: normalize(&raw),
        language_tag: input.target_language.code_tag(),
    })
}

/// Returns the model's answer as markdown, untouched.
pub async fn debug_screenshot<LB: LLMBuilder>(
    llm_builder: &LB,
    session: &SessionState,
) -> Result<String, Alert> {
    let model = session.selected_model;
    let to_alert = |err: LLMError| Alert::for_error(&err, model, Feature::Debug);

    let Some(image) = session.debug.image.as_deref() else {
        return Err(Alert {
            message: "Please upload an image first.".to_owned(),
            link: None,
        });
    };

    let api_key = session
        .api_key()
        .ok_or_else(|| to_alert(LLMError::MissingCredential))?;
    let llm = llm_builder.build(api_key, model.id()).map_err(to_alert)?;

    llm.generate(Prompt::WithImage {
        instruction: build_debug_prompt(),
        image,
    })
    .await
    .map_err(to_alert)
}

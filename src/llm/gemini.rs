use super::{LLM, LLMBuilder, ModelDescriptor, ModelLister};
use crate::LLMError;
use crate::config::AppConfig;
use crate::prompt::Prompt;
use crate::utils::log_preview;
use itertools::Itertools;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";
const LIST_PAGE_SIZE: u32 = 1000;

/// Builder for the Gemini `generativelanguage` REST API.
#[derive(Debug, Clone, Default)]
pub struct GeminiBuilder {
    config: AppConfig,
}

impl GeminiBuilder {
    pub fn new(config: AppConfig) -> Self {
        GeminiBuilder { config }
    }

    /// Client for the model listing endpoint, not tied to any model.
    pub fn catalog(&self, api_key: &str) -> Result<GeminiCatalog, LLMError> {
        Ok(GeminiCatalog {
            conn: self.connect(api_key)?,
        })
    }

    fn connect(&self, api_key: &str) -> Result<Connection, LLMError> {
        let api_key = super::require_key(api_key)?;

        let mut builder = Client::builder();
        if let Some(timeout) = self.config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LLMError::OtherError(e.into()))?;

        Ok(Connection {
            client,
            base: format!(
                "{}/{}",
                self.config.api_base_url.trim_end_matches('/'),
                self.config.api_version
            ),
            api_key: api_key.to_owned(),
        })
    }
}

impl LLMBuilder for GeminiBuilder {
    type Built = Gemini;

    fn build(&self, api_key: &str, model_id: &str) -> Result<Self::Built, LLMError> {
        let conn = self.connect(api_key)?;
        Ok(Gemini {
            conn,
            model_id: model_id.trim_start_matches("models/").to_owned(),
        })
    }
}

struct Connection {
    client: Client,
    base: String,
    api_key: String,
}

impl Connection {
    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}/{}", self.base, path))
            .header(API_KEY_HEADER, &self.api_key)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}/{}", self.base, path))
            .header(API_KEY_HEADER, &self.api_key)
    }
}

pub struct Gemini {
    conn: Connection,
    model_id: String,
}

impl Gemini {
    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

impl LLM for Gemini {
    async fn generate(&self, prompt: Prompt<'_>) -> Result<String, LLMError> {
        let mut parts = vec![Part::Text {
            text: prompt.instruction(),
        }];
        if let Prompt::WithImage { image, .. } = prompt {
            log::info!(
                r#"Sending image "{}" ({}) with prompt "{}..." to {}"#,
                image.file_name,
                image.mime_type,
                log_preview(prompt.instruction()),
                self.model_id
            );
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type,
                    data: image.base64_data(),
                },
            });
        } else {
            log::info!(
                r#"Sending prompt "{}..." to {}"#,
                log_preview(prompt.instruction()),
                self.model_id
            );
        }

        let req = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
        };

        let resp = self
            .conn
            .post(&format!("models/{}:generateContent", self.model_id))
            .json(&req)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let parsed: GenerateContentResponse = resp.json().await?;

        let text = parsed.into_text()?;
        log::info!("Received {} chars from {}", text.len(), self.model_id);
        Ok(text)
    }
}

pub struct GeminiCatalog {
    conn: Connection,
}

impl ModelLister for GeminiCatalog {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, LLMError> {
        let mut models = vec![];
        let mut page_token: Option<String> = None;
        loop {
            let mut req = self
                .conn
                .get("models")
                .query(&[("pageSize", LIST_PAGE_SIZE.to_string())]);
            if let Some(token) = page_token.as_deref() {
                req = req.query(&[("pageToken", token)]);
            }

            let resp = check_status(req.send().await?).await?;
            let page: ListModelsResponse = resp.json().await?;
            log::debug!("Fetched {} model descriptors", page.models.len());
            models.extend(page.models);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(models)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, LLMError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let err = api_error(status, &body);
    log::warn!("Request failed: {}", err);
    Err(err)
}

fn api_error(status: StatusCode, body: &str) -> LLMError {
    let reason = status.canonical_reason().unwrap_or("").to_owned();
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) => LLMError::ApiError {
            code: status.as_u16(),
            status: error.status.unwrap_or(reason),
            message: error.message,
        },
        Err(_) => LLMError::ApiError {
            code: status.as_u16(),
            status: reason,
            message: body.trim().to_owned(),
        },
    }
}

impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LLMError::InvalidResponse(err.to_string())
        } else {
            LLMError::ConnectionError(err.into())
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, LLMError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!("prompt blocked ({})", r))
                .unwrap_or_else(|| "no candidates returned".to_owned());
            return Err(LLMError::InvalidResponse(reason));
        };

        let text = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).join(""))
            .unwrap_or_default();
        if text.is_empty() {
            return Err(LLMError::InvalidResponse(format!(
                "candidate has no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelDescriptor>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::UploadedImage;

    #[test]
    fn blank_key_is_rejected_before_connecting() {
        let builder = GeminiBuilder::default();
        assert!(matches!(
            builder.build("", "gemini-1.5-flash"),
            Err(LLMError::MissingCredential)
        ));
        assert!(matches!(
            builder.build("  \t", "gemini-1.5-flash"),
            Err(LLMError::MissingCredential)
        ));
        assert!(matches!(
            builder.catalog(""),
            Err(LLMError::MissingCredential)
        ));
    }

    #[test]
    fn model_prefix_is_stripped() {
        let gemini = GeminiBuilder::default()
            .build("key", "models/gemini-1.5-pro")
            .unwrap();
        assert_eq!(gemini.model_id(), "gemini-1.5-pro");
    }

    #[test]
    fn text_request_shape() {
        let req = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part::Text { text: "hello" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }]
            })
        );
    }

    #[test]
    fn image_part_shape() {
        let png = {
            let mut buf = std::io::Cursor::new(vec![]);
            image::RgbaImage::new(1, 1)
                .write_to(&mut buf, image::ImageFormat::Png)
                .unwrap();
            buf.into_inner()
        };
        let image = UploadedImage::from_bytes("a.png".to_owned(), png).unwrap();
        let part = Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type,
                data: image.base64_data(),
            },
        };
        let value = serde_json::to_value(&part).unwrap();
        assert_eq!(value["inlineData"]["mimeType"], "image/png");
        assert_eq!(value["inlineData"]["data"], image.base64_data());
    }

    #[test]
    fn response_text_parts_are_concatenated() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "foo" }, { "text": "bar" }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(resp.into_text().unwrap(), "foobar");
    }

    #[test]
    fn blocked_prompt_is_invalid_response() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        let err = resp.into_text().unwrap_err();
        assert_eq!(err.to_string(), "Invalid response: prompt blocked (SAFETY)");
    }

    #[test]
    fn empty_candidate_is_invalid_response() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "finishReason": "MAX_TOKENS" }]
        }))
        .unwrap();
        assert!(matches!(
            resp.into_text(),
            Err(LLMError::InvalidResponse(msg)) if msg.contains("MAX_TOKENS")
        ));
    }

    #[test]
    fn api_error_uses_envelope() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = api_error(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(
            err.to_string(),
            "429 RESOURCE_EXHAUSTED: Resource has been exhausted"
        );
    }

    #[test]
    fn api_error_falls_back_to_raw_body() {
        let err = api_error(StatusCode::NOT_FOUND, "  nope  ");
        assert_eq!(err.to_string(), "404 Not Found: nope");
    }
}

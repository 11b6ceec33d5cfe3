use crate::LLMError;
use crate::session::Model;

pub const QUOTA_URL: &str =
    "https://console.cloud.google.com/apis/api/generativelanguage.googleapis.com/quotas";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Quota,
    NotFound,
    Other,
}

/// Looks only at the error text. "429" is checked before "404".
pub fn classify(err: &LLMError) -> FailureClass {
    classify_message(&err.to_string())
}

pub fn classify_message(message: &str) -> FailureClass {
    if message.contains("429") {
        FailureClass::Quota
    } else if message.contains("404") {
        FailureClass::NotFound
    } else {
        FailureClass::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Convert,
    Debug,
}

/// Error banner shown to the user, with an optional link rendered under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl Alert {
    pub fn for_error(err: &LLMError, model: Model, feature: Feature) -> Self {
        if let LLMError::MissingCredential = err {
            let message = match feature {
                Feature::Convert => "Please enter API Key in sidebar.",
                Feature::Debug => "Please enter API Key.",
            };
            return Alert {
                message: message.to_owned(),
                link: None,
            };
        }

        match classify(err) {
            FailureClass::Quota => Alert {
                message: format!(
                    "Quota exceeded for '{}'. Please switch to another model in the sidebar or wait a minute.",
                    model
                ),
                link: Some(Link {
                    label: "Check Usage & Quotas".to_owned(),
                    url: QUOTA_URL.to_owned(),
                }),
            },
            FailureClass::NotFound => Alert {
                message: format!(
                    "Model not found: '{}'. It may not be available for your API key. Please select another model.",
                    model
                ),
                link: None,
            },
            FailureClass::Other => Alert {
                message: format!("An error occurred with '{}': {}", model, err),
                link: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: u16, message: &str) -> LLMError {
        LLMError::ApiError {
            code,
            status: "STATUS".to_owned(),
            message: message.to_owned(),
        }
    }

    #[test]
    fn quota_detected_anywhere_in_text() {
        assert_eq!(classify_message("429"), FailureClass::Quota);
        assert_eq!(
            classify_message("upstream said 429 Resource exhausted"),
            FailureClass::Quota
        );
        assert_eq!(classify_message("code=4290"), FailureClass::Quota);
    }

    #[test]
    fn not_found_detected() {
        assert_eq!(
            classify_message("404 models/foo is not found"),
            FailureClass::NotFound
        );
    }

    #[test]
    fn quota_wins_over_not_found() {
        assert_eq!(classify_message("404 then 429"), FailureClass::Quota);
        assert_eq!(classify(&api_error(404, "retry after 429")), FailureClass::Quota);
    }

    #[test]
    fn anything_else_is_other() {
        assert_eq!(classify_message("500 INTERNAL"), FailureClass::Other);
        assert_eq!(classify_message(""), FailureClass::Other);
    }

    #[test]
    fn api_error_display_carries_status_code() {
        assert_eq!(classify(&api_error(429, "slow down")), FailureClass::Quota);
        assert_eq!(classify(&api_error(404, "no such model")), FailureClass::NotFound);
        assert_eq!(classify(&api_error(400, "bad key")), FailureClass::Other);
    }

    #[test]
    fn quota_alert_has_link() {
        let alert = Alert::for_error(&api_error(429, "x"), Model::Gemini15Pro, Feature::Convert);
        assert_eq!(
            alert.message,
            "Quota exceeded for 'gemini-1.5-pro'. Please switch to another model in the sidebar or wait a minute."
        );
        assert_eq!(alert.link.map(|l| l.url).as_deref(), Some(QUOTA_URL));
    }

    #[test]
    fn not_found_alert_names_model() {
        let alert = Alert::for_error(&api_error(404, "x"), Model::Gemini25Flash, Feature::Debug);
        assert!(alert.message.starts_with("Model not found: 'gemini-2.5-flash'."));
        assert!(alert.link.is_none());
    }

    #[test]
    fn other_alert_shows_raw_error_and_model() {
        let err = LLMError::InvalidResponse("empty".to_owned());
        let alert = Alert::for_error(&err, Model::Gemini15Flash, Feature::Convert);
        assert_eq!(
            alert.message,
            "An error occurred with 'gemini-1.5-flash': Invalid response: empty"
        );
    }

    #[test]
    fn missing_key_alert_depends_on_feature() {
        let convert = Alert::for_error(&LLMError::MissingCredential, Model::default(), Feature::Convert);
        let debug = Alert::for_error(&LLMError::MissingCredential, Model::default(), Feature::Debug);
        assert_eq!(convert.message, "Please enter API Key in sidebar.");
        assert_eq!(debug.message, "Please enter API Key.");
    }
}

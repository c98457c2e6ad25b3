//! Conversational tutor backed by the Gemini generateContent API.
//!
//! One outbound call per learner utterance, never retried. Every failure is
//! classified into a fixed user-facing message and returned as a normal
//! turn with `is_error` set, so the conversation renders it inline.

use serde_json::{json, Value};

use lingua_core::{classify, ChatTurn, Speaker, TutorFailure, TutorTurn};

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Client for the external tutor service.
pub struct TutorClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl TutorClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.filter(|key| !key.is_empty()),
            model: model.into(),
        }
    }

    /// Configure from `GEMINI_API_KEY` / `GEMINI_MODEL`.
    ///
    /// A missing key is not fatal: conversation turns then resolve to a
    /// configuration-error message.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        if api_key.as_deref().map_or(true, str::is_empty) {
            tracing::warn!("GEMINI_API_KEY not set; conversation practice is disabled");
        }
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    /// One tutor exchange: prior turns, the new learner utterance, and the
    /// lesson-title context string.
    pub async fn converse(
        &self,
        history: &[ChatTurn],
        utterance: &str,
        lesson_context: &str,
    ) -> TutorTurn {
        let Some(api_key) = self.api_key.as_deref() else {
            return TutorTurn::failure(TutorFailure::Misconfigured);
        };

        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        let body = request_body(history, utterance, lesson_context);

        let response = match self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("tutor call failed: {}", err);
                let class = if err.is_connect() || err.is_timeout() {
                    TutorFailure::Network
                } else {
                    classify(None, &err.to_string())
                };
                return TutorTurn::failure(class);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "tutor call rejected: {}", detail);
            return TutorTurn::failure(classify(Some(status.as_u16()), &detail));
        }

        let payload: Value = match response.json().await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!("unreadable tutor response: {}", err);
                return TutorTurn::failure(classify(None, &err.to_string()));
            }
        };

        // A safety block surfaces as a candidate without text; the block
        // reason lives in the payload and drives classification.
        let Some(text) = payload["candidates"][0]["content"]["parts"][0]["text"].as_str() else {
            let detail = payload.to_string();
            tracing::warn!("tutor response without text: {}", detail);
            return TutorTurn::failure(classify(None, &detail));
        };

        parse_reply(text)
    }
}

fn request_body(history: &[ChatTurn], utterance: &str, lesson_context: &str) -> Value {
    let mut contents: Vec<Value> = history
        .iter()
        .filter(|turn| !turn.is_error)
        .map(|turn| {
            let role = match turn.speaker {
                Speaker::Learner => "user",
                Speaker::Tutor => "model",
            };
            json!({ "role": role, "parts": [{ "text": turn.text }] })
        })
        .collect();
    contents.push(json!({ "role": "user", "parts": [{ "text": utterance }] }));

    json!({
        "system_instruction": { "parts": [{ "text": system_instruction(lesson_context) }] },
        "contents": contents,
    })
}

fn system_instruction(lesson_context: &str) -> String {
    format!(
        "You are a helpful and patient language tutor.\n\
         Context of the current lesson: {lesson_context}.\n\n\
         Your task:\n\
         1. Analyze the learner's input for grammatical or vocabulary errors suitable for a beginner.\n\
         2. If there is a mistake, provide a short, polite correction.\n\
         3. Continue the conversation naturally in simple language.\n\n\
         Output format JSON:\n\
         {{\n\
           \"correction\": \"Optional correction or null if perfect\",\n\
           \"reply\": \"Your reply to the learner\"\n\
         }}"
    )
}

/// Parse the model's JSON reply, falling back to the raw text when the
/// model skipped the requested format.
fn parse_reply(text: &str) -> TutorTurn {
    let cleaned = text.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();
    match serde_json::from_str::<Value>(cleaned) {
        Ok(value) => {
            let reply = value["reply"].as_str().unwrap_or(cleaned).to_string();
            let correction = value["correction"]
                .as_str()
                .filter(|correction| !correction.is_empty())
                .map(String::from);
            TutorTurn::reply(reply, correction)
        }
        Err(_) => TutorTurn::reply(text.trim(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_resolves_to_configuration_failure() {
        let client = TutorClient::new(None, DEFAULT_MODEL);
        let turn = tokio_test::block_on(client.converse(&[], "Hello", "Greetings"));
        assert!(turn.is_error);
        assert_eq!(turn.text, TutorFailure::Misconfigured.user_message());
    }

    #[test]
    fn parse_reply_reads_the_requested_format() {
        let turn = parse_reply(
            "```json\n{\"correction\": \"Say 'I have'\", \"reply\": \"Nice! Tell me more.\"}\n```",
        );
        assert!(!turn.is_error);
        assert_eq!(turn.text, "Nice! Tell me more.");
        assert_eq!(turn.correction.as_deref(), Some("Say 'I have'"));
    }

    #[test]
    fn parse_reply_falls_back_to_raw_text() {
        let turn = parse_reply("Just a plain sentence.");
        assert_eq!(turn.text, "Just a plain sentence.");
        assert_eq!(turn.correction, None);
    }

    #[test]
    fn null_correction_is_dropped() {
        let turn = parse_reply("{\"correction\": null, \"reply\": \"Great!\"}");
        assert_eq!(turn.text, "Great!");
        assert_eq!(turn.correction, None);
    }

    #[test]
    fn request_body_skips_error_turns() {
        let history = vec![
            ChatTurn {
                speaker: Speaker::Learner,
                text: "Hello".to_string(),
                is_error: false,
            },
            ChatTurn {
                speaker: Speaker::Tutor,
                text: "Service unavailable".to_string(),
                is_error: true,
            },
        ];
        let body = request_body(&history, "Hello again", "Greetings");
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["parts"][0]["text"], "Hello again");
    }
}

// Question/answer board types shared between the api and its clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An answer as rendered on the wire, standalone or nested in a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerResponse {
    pub id: i64,
    /// Id of the owning question
    pub question: i64,
    pub user_id: String,
    pub text: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// A question with its answers in creation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionResponse {
    pub id: i64,
    pub text: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub answers: Vec<AnswerResponse>,
}

/// Body of `POST /questions/`
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateQuestionRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Body of `POST /questions/{id}/answers/`; the owning question comes from the path
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateQuestionAnswerRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Body of `POST /answers/`
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateAnswerRequest {
    #[serde(default)]
    pub question: Option<i64>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VersionResponse {
    pub version: String,
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_answer_request_ignores_question_field() {
        let request: CreateQuestionAnswerRequest = serde_json::from_str(
            r#"{"question": 42, "user_id": "11111111-1111-1111-1111-111111111111", "text": "hi"}"#,
        )
        .unwrap();
        assert_eq!(
            request.user_id.as_deref(),
            Some("11111111-1111-1111-1111-111111111111")
        );
        assert_eq!(request.text.as_deref(), Some("hi"));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let request: CreateAnswerRequest = serde_json::from_str("{}").unwrap();
        assert!(request.question.is_none());
        assert!(request.user_id.is_none());
        assert!(request.text.is_none());
    }

    #[test]
    fn question_serializes_nested_answers() {
        let created_at = Utc::now();
        let question = QuestionResponse {
            id: 7,
            text: "Sample question?".to_string(),
            created_at,
            answers: vec![AnswerResponse {
                id: 1,
                question: 7,
                user_id: "11111111-1111-1111-1111-111111111111".to_string(),
                text: "An answer".to_string(),
                created_at,
            }],
        };

        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["answers"][0]["question"], 7);
        assert!(value["created_at"].is_string());
    }
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod board;
pub mod typescript_gen;

pub use typescript_gen::generate_typescript_definitions;

pub use board::{
    AnswerResponse, CreateAnswerRequest, CreateQuestionAnswerRequest, CreateQuestionRequest,
    HealthResponse, QuestionResponse, VersionResponse,
};

/// Body of every non-validation error response
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

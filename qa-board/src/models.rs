use chrono::{DateTime, Utc};
use shared_types::{AnswerResponse, QuestionResponse};
use sqlx::FromRow;

/// A `questions` row.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// An `answers` row.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A question together with its answers in creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionWithAnswers {
    pub question: Question,
    pub answers: Vec<Answer>,
}

impl From<Answer> for AnswerResponse {
    fn from(answer: Answer) -> Self {
        AnswerResponse {
            id: answer.id,
            question: answer.question_id,
            user_id: answer.user_id,
            text: answer.text,
            created_at: answer.created_at,
        }
    }
}

impl From<QuestionWithAnswers> for QuestionResponse {
    fn from(value: QuestionWithAnswers) -> Self {
        let QuestionWithAnswers { question, answers } = value;
        QuestionResponse {
            id: question.id,
            text: question.text,
            created_at: question.created_at,
            answers: answers.into_iter().map(AnswerResponse::from).collect(),
        }
    }
}

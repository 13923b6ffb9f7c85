use super::AppState;
use crate::error::AppError;
use crate::models::QuestionWithAnswers;
use crate::validation::{question_answer_from_body, question_from_body};
use actix_web::{web, HttpResponse, Result};
use shared_types::{AnswerResponse, QuestionResponse};
use tracing::{debug, info, warn};

pub async fn list_questions(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let questions = data.database.list_questions().await?;
    debug!(count = questions.len(), "Listing questions");

    let response: Vec<QuestionResponse> =
        questions.into_iter().map(QuestionResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

pub async fn create_question(
    data: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let new_question = question_from_body(&body).map_err(|errors| {
        warn!(%errors, "Rejected question");
        errors
    })?;

    let question = data.database.create_question(&new_question).await?;
    info!(question_id = question.id, "Question created");

    let response = QuestionResponse::from(QuestionWithAnswers {
        question,
        answers: Vec::new(),
    });
    Ok(HttpResponse::Created().json(response))
}

pub async fn get_question(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let question_id = path.into_inner();
    debug!(question_id, "Retrieving question");

    let question = data
        .database
        .get_question(question_id)
        .await?
        .ok_or_else(|| {
            warn!(question_id, "Question not found");
            AppError::question_not_found(question_id)
        })?;

    Ok(HttpResponse::Ok().json(QuestionResponse::from(question)))
}

pub async fn delete_question(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let question_id = path.into_inner();

    if !data.database.delete_question(question_id).await? {
        warn!(question_id, "Question not found for deletion");
        return Err(AppError::question_not_found(question_id));
    }

    info!(question_id, "Question deleted with its answers");
    Ok(HttpResponse::NoContent().finish())
}

/// `POST /questions/{id}/answers/`. The question must exist before the payload is even parsed,
/// and any `question` field in the body is ignored in favour of the path.
pub async fn create_question_answer(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let question_id = path.into_inner();
    debug!(question_id, "Adding answer to question");

    if !data.database.question_exists(question_id).await? {
        warn!(question_id, "Cannot answer missing question");
        return Err(AppError::question_not_found(question_id));
    }

    let validated = question_answer_from_body(&body, &data.validation).map_err(|errors| {
        warn!(question_id, %errors, "Rejected answer");
        errors
    })?;

    // The question may have been deleted since the check above
    let answer = data
        .database
        .create_answer(&validated.for_question(question_id))
        .await?
        .ok_or_else(|| AppError::question_not_found(question_id))?;

    info!(question_id, answer_id = answer.id, "Answer added to question");
    Ok(HttpResponse::Created().json(AnswerResponse::from(answer)))
}

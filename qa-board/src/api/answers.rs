use super::AppState;
use crate::error::AppError;
use crate::validation::{
    missing_question_message, validate_answer_request, FieldErrors, JsonFields,
};
use actix_web::{web, HttpResponse, Result};
use shared_types::{AnswerResponse, CreateAnswerRequest};
use tracing::{debug, info, warn};

pub async fn list_answers(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let answers = data.database.list_answers().await?;
    debug!(count = answers.len(), "Listing answers");

    let response: Vec<AnswerResponse> = answers.into_iter().map(AnswerResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// `POST /answers/`. A missing or unknown `question` is a validation error on that field,
/// reported alongside any other invalid fields.
pub async fn create_answer(
    data: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let mut fields = JsonFields::parse(&body)?;
    let request = CreateAnswerRequest {
        question: fields.primary_key("question"),
        user_id: fields.string("user_id"),
        text: fields.string("text"),
    };
    let claimed_question = request.question;

    let mut errors = FieldErrors::default();
    let validated = match fields.check(validate_answer_request(request, &data.validation)) {
        Ok(validated) => Some(validated),
        Err(field_errors) => {
            errors.merge(field_errors);
            None
        }
    };

    if let Some(question_id) = claimed_question {
        if !data.database.question_exists(question_id).await? {
            errors.add("question", missing_question_message(question_id));
        }
    }

    let (question_id, answer) = match validated {
        Some(validated) if errors.is_empty() => validated,
        _ => {
            warn!(%errors, "Rejected answer");
            return Err(errors.into());
        }
    };

    let answer = match data
        .database
        .create_answer(&answer.for_question(question_id))
        .await?
    {
        Some(answer) => answer,
        None => {
            warn!(question_id, "Question removed before answer was stored");
            let mut errors = FieldErrors::default();
            errors.add("question", missing_question_message(question_id));
            return Err(errors.into());
        }
    };

    info!(question_id, answer_id = answer.id, "Answer created");
    Ok(HttpResponse::Created().json(AnswerResponse::from(answer)))
}

pub async fn get_answer(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let answer_id = path.into_inner();
    debug!(answer_id, "Retrieving answer");

    let answer = data
        .database
        .get_answer(answer_id)
        .await?
        .ok_or_else(|| {
            warn!(answer_id, "Answer not found");
            AppError::answer_not_found(answer_id)
        })?;

    Ok(HttpResponse::Ok().json(AnswerResponse::from(answer)))
}

pub async fn delete_answer(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let answer_id = path.into_inner();

    if !data.database.delete_answer(answer_id).await? {
        warn!(answer_id, "Answer not found for deletion");
        return Err(AppError::answer_not_found(answer_id));
    }

    info!(answer_id, "Answer deleted");
    Ok(HttpResponse::NoContent().finish())
}

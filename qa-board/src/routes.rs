//! Route table for the board API.
//!
//! Shared by the server binary and the integration tests. Paths are registered without a
//! trailing slash; wrap the app in `NormalizePath::trim()` so `/questions/` resolves too.

use crate::api::{answers, health, questions};
use crate::error::AppError;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(path_config())
        .route("/health", web::get().to(health::health_check))
        .route("/version", web::get().to(health::version_info))
        .service(
            web::scope("/questions")
                .route("", web::get().to(questions::list_questions))
                .route("", web::post().to(questions::create_question))
                .route("/{id}", web::get().to(questions::get_question))
                .route("/{id}", web::delete().to(questions::delete_question))
                .route(
                    "/{id}/answers",
                    web::post().to(questions::create_question_answer),
                ),
        )
        .service(
            web::scope("/answers")
                .route("", web::get().to(answers::list_answers))
                .route("", web::post().to(answers::create_answer))
                .route("/{id}", web::get().to(answers::get_answer))
                .route("/{id}", web::delete().to(answers::delete_answer)),
        );
}

/// An `{id}` that is not an integer cannot name any resource.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err, req| {
        AppError::NotFound(format!("No resource at {}", req.path())).into()
    })
}

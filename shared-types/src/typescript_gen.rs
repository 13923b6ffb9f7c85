use crate::{
    AnswerResponse, CreateAnswerRequest, CreateQuestionAnswerRequest, CreateQuestionRequest,
    ErrorResponse, HealthResponse, QuestionResponse, VersionResponse,
};
use ts_rs::TS;

/// Every type the api exposes, in the order clients usually want them declared.
pub const API_TYPE_NAMES: &[&str] = &[
    "AnswerResponse",
    "QuestionResponse",
    "CreateQuestionRequest",
    "CreateQuestionAnswerRequest",
    "CreateAnswerRequest",
    "ErrorResponse",
    "HealthResponse",
    "VersionResponse",
];

pub fn generate_typescript_definitions(
    type_names: &[&str],
) -> Result<String, Box<dyn std::error::Error>> {
    if type_names.is_empty() {
        return Err("No type names provided".into());
    }

    let mut definitions = Vec::new();

    for name in type_names {
        let type_def = export_type(name)?;
        let cleaned = clean_type(type_def);

        if !cleaned.trim().is_empty() {
            definitions.push(cleaned);
        }
    }

    Ok(definitions.join("\n\n"))
}

fn export_type(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    let result = match name {
        "AnswerResponse" => AnswerResponse::export_to_string()?,
        "QuestionResponse" => QuestionResponse::export_to_string()?,
        "CreateQuestionRequest" => CreateQuestionRequest::export_to_string()?,
        "CreateQuestionAnswerRequest" => CreateQuestionAnswerRequest::export_to_string()?,
        "CreateAnswerRequest" => CreateAnswerRequest::export_to_string()?,

        "ErrorResponse" => ErrorResponse::export_to_string()?,
        "HealthResponse" => HealthResponse::export_to_string()?,
        "VersionResponse" => VersionResponse::export_to_string()?,

        _ => {
            return Err(format!(
                "Unknown type: '{}'. Available types can be found in shared-types/src/",
                name
            )
            .into());
        }
    };

    Ok(result)
}

/// Strips the import lines and generated-file banner ts-rs prepends.
pub fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
        })
        .collect();

    filtered.join("\n").trim().to_string()
}

pub mod answers;
pub mod health;
pub mod questions;

use crate::database::Database;
use crate::validation::ValidationRules;

/// Shared state handed to every handler.
pub struct AppState {
    pub database: Database,
    pub validation: ValidationRules,
}

impl AppState {
    pub fn new(database: Database, validation: ValidationRules) -> Self {
        Self {
            database,
            validation,
        }
    }
}

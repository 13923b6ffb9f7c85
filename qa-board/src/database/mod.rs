use crate::config::DatabaseConfig;
use crate::error::AppResult;
use crate::models::{Answer, Question, QuestionWithAnswers};
use crate::validation::{NewAnswer, NewQuestion};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            // SQLite ships with foreign keys disabled; cascades depend on them
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);

        // For file databases, make sure the directory exists
        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;
        Ok(Database { pool })
    }

    /// A private in-memory database. The pool holds a single connection that never expires,
    /// since the data lives only as long as that connection.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Database { pool })
    }

    pub async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS questions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL CHECK (length(trim(text, ' ' || char(9, 10, 13))) > 0),
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_questions_created_at ON questions(created_at)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS answers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question_id INTEGER NOT NULL,
                user_id TEXT NOT NULL CHECK (length(user_id) > 0),
                text TEXT NOT NULL CHECK (length(trim(text, ' ' || char(9, 10, 13))) > 0),
                created_at TEXT NOT NULL,
                FOREIGN KEY (question_id) REFERENCES questions (id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_answers_question_id ON answers(question_id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// All questions, newest first, each with its answers in creation order.
    pub async fn list_questions(&self) -> AppResult<Vec<QuestionWithAnswers>> {
        // One transaction so a concurrent cascade delete is seen entirely or not at all
        let mut tx = self.pool.begin().await?;

        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, text, created_at
            FROM questions
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, question_id, user_id, text, created_at
            FROM answers
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut answers_by_question: HashMap<i64, Vec<Answer>> = HashMap::new();
        for answer in answers {
            answers_by_question
                .entry(answer.question_id)
                .or_default()
                .push(answer);
        }

        Ok(questions
            .into_iter()
            .map(|question| {
                let answers = answers_by_question.remove(&question.id).unwrap_or_default();
                QuestionWithAnswers { question, answers }
            })
            .collect())
    }

    pub async fn get_question(&self, id: i64) -> AppResult<Option<QuestionWithAnswers>> {
        let mut tx = self.pool.begin().await?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, text, created_at
            FROM questions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(question) = question else {
            return Ok(None);
        };

        let answers = fetch_answers_for_question(&mut tx, id).await?;
        tx.commit().await?;

        Ok(Some(QuestionWithAnswers { question, answers }))
    }

    pub async fn question_exists(&self, id: i64) -> AppResult<bool> {
        let mut conn = self.pool.acquire().await?;
        Ok(question_exists(&mut conn, id).await?)
    }

    /// Each insert is a single statement, so it takes the write lock before it reads the
    /// newest stored timestamp.
    pub async fn create_question(&self, new_question: &NewQuestion) -> AppResult<Question> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (text, created_at)
            SELECT ?, max(?, COALESCE(MAX(created_at), ''))
            FROM questions
            RETURNING id, text, created_at
            "#,
        )
        .bind(&new_question.text)
        .bind(now_timestamp())
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    /// Inserts an answer. Returns `None` without writing anything when the owning question
    /// does not exist; the existence check is part of the insert.
    pub async fn create_answer(&self, new_answer: &NewAnswer) -> AppResult<Option<Answer>> {
        let answer = sqlx::query_as::<_, Answer>(
            r#"
            INSERT INTO answers (question_id, user_id, text, created_at)
            SELECT q.id, ?, ?, max(?, COALESCE((SELECT MAX(created_at) FROM answers), ''))
            FROM questions q
            WHERE q.id = ?
            RETURNING id, question_id, user_id, text, created_at
            "#,
        )
        .bind(&new_answer.user_id)
        .bind(&new_answer.text)
        .bind(now_timestamp())
        .bind(new_answer.question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(answer)
    }

    /// Deletes a question and all of its answers in one transaction. Returns `false` when no
    /// such question exists.
    pub async fn delete_question(&self, id: i64) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        // Writing first takes the write lock at once instead of upgrading a read lock
        let removed_answers = sqlx::query("DELETE FROM answers WHERE question_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let removed_questions = sqlx::query("DELETE FROM questions WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed_questions == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;

        tracing::debug!(question_id = id, removed_answers, "Question deleted");
        Ok(true)
    }

    pub async fn list_answers(&self) -> AppResult<Vec<Answer>> {
        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, question_id, user_id, text, created_at
            FROM answers
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }

    pub async fn get_answer(&self, id: i64) -> AppResult<Option<Answer>> {
        let answer = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, question_id, user_id, text, created_at
            FROM answers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(answer)
    }

    /// Returns `false` when no such answer exists.
    pub async fn delete_answer(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM answers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn question_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 FROM questions WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

async fn fetch_answers_for_question(
    conn: &mut SqliteConnection,
    question_id: i64,
) -> Result<Vec<Answer>, sqlx::Error> {
    sqlx::query_as::<_, Answer>(
        r#"
        SELECT id, question_id, user_id, text, created_at
        FROM answers
        WHERE question_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(question_id)
    .fetch_all(&mut *conn)
    .await
}

/// The current time in stored form. Inserts clamp it to the newest stored row, so timestamps
/// follow insertion order even if the wall clock steps back.
fn now_timestamp() -> String {
    format_timestamp(&Utc::now().trunc_subsecs(6))
}

/// Fixed-width UTC form, so comparing the stored text orders rows chronologically.
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

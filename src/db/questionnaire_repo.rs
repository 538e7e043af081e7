// src/db/questionnaire_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::questionnaire::Questionnaire};

#[derive(Clone)]
pub struct QuestionnaireRepository {
    pool: PgPool,
}

impl QuestionnaireRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        user_id: Option<Uuid>,
        responses: serde_json::Value,
        ip_address: Option<&str>,
    ) -> Result<Questionnaire, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let questionnaire = sqlx::query_as::<_, Questionnaire>(
            r#"
            INSERT INTO questionnaires (user_id, responses, ip_address, completed_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(responses)
        .bind(ip_address)
        .fetch_one(executor)
        .await?;
        Ok(questionnaire)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Questionnaire>, AppError> {
        let questionnaire =
            sqlx::query_as::<_, Questionnaire>("SELECT * FROM questionnaires WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(questionnaire)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Questionnaire>, AppError> {
        let questionnaires = sqlx::query_as::<_, Questionnaire>(
            "SELECT * FROM questionnaires WHERE user_id = $1 ORDER BY completed_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questionnaires)
    }

    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questionnaires WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn list_all(&self) -> Result<Vec<Questionnaire>, AppError> {
        let questionnaires = sqlx::query_as::<_, Questionnaire>(
            "SELECT * FROM questionnaires ORDER BY completed_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(questionnaires)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM questionnaires WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

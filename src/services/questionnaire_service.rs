// src/services/questionnaire_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::QuestionnaireRepository,
    models::questionnaire::{Questionnaire, QuestionnaireCount, QuestionnaireReceipt},
};

#[derive(Clone)]
pub struct QuestionnaireService {
    questionnaire_repo: QuestionnaireRepository,
    pool: PgPool,
}

impl QuestionnaireService {
    pub fn new(questionnaire_repo: QuestionnaireRepository, pool: PgPool) -> Self {
        Self {
            questionnaire_repo,
            pool,
        }
    }

    /// Guarda o blob de respostas. user_id nulo é permitido (anônimo);
    /// o blob precisa ser um objeto JSON, qualquer outra coisa é recusada.
    pub async fn submit(
        &self,
        responses: serde_json::Value,
        user_id: Option<Uuid>,
        ip_address: Option<String>,
    ) -> Result<QuestionnaireReceipt, AppError> {
        if !responses.is_object() {
            return Err(AppError::BadRequest(
                "Las respuestas son requeridas y deben ser un objeto válido".into(),
            ));
        }

        let questionnaire = self
            .questionnaire_repo
            .insert(&self.pool, user_id, responses, ip_address.as_deref())
            .await?;

        Ok(QuestionnaireReceipt {
            id: questionnaire.id,
            user_id: questionnaire.user_id,
            completed_at: questionnaire.completed_at,
        })
    }

    pub async fn get_user_questionnaires(&self, user_id: Uuid) -> Result<Vec<Questionnaire>, AppError> {
        self.questionnaire_repo.list_for_user(user_id).await
    }

    pub async fn count_for_user(&self, user_id: Uuid) -> Result<QuestionnaireCount, AppError> {
        let count = self.questionnaire_repo.count_for_user(user_id).await?;
        Ok(QuestionnaireCount {
            user_id,
            questionnaire_count: count,
        })
    }

    // ---
    // Operações de admin
    // ---

    pub async fn get_all(&self) -> Result<Vec<Questionnaire>, AppError> {
        self.questionnaire_repo.list_all().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Questionnaire, AppError> {
        self.questionnaire_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cuestionario no encontrado".into()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = self.questionnaire_repo.delete(&self.pool, id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Cuestionario no encontrado".into()));
        }
        Ok(())
    }
}

// src/models/questionnaire.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Respostas do cuestionario: blob JSON opaco, opcionalmente atribuído
// a um usuário (user_id nulo => anônimo).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub responses: serde_json::Value,
    pub completed_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Confirmação devolvida pelo submit (sem ecoar o blob inteiro).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireReceipt {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireCount {
    pub user_id: Uuid,
    pub questionnaire_count: i64,
}

// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada variante carrega o seu status HTTP; nenhuma camada acima
// precisa inspecionar strings para decidir o código.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    // Estoque, campos únicos duplicados, transição de estado inválida.
    #[error("{0}")]
    Conflict(String),

    #[error("Erro de banco de dados")]
    Database(#[from] sqlx::Error),

    #[error("Erro de Bcrypt: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    // Variante genérica para qualquer outro erro inesperado.
    #[error("Erro interno do servidor")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Bcrypt(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Validação devolve o detalhe por campo.
        if let AppError::Validation(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "success": false,
                "message": "Uno o más campos son inválidos",
                "details": details,
            }));
            return (status, body).into_response();
        }

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` loga o detalhe; o cliente recebe mensagem genérica.
            tracing::error!("Erro interno do servidor: {:?}", self);
            "Error interno del servidor".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({ "success": false, "message": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_error_kind_maps_to_its_status() {
        assert_eq!(
            AppError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn conflict_keeps_its_message() {
        let err = AppError::Conflict("Stock insuficiente. Disponible: 2".into());
        assert_eq!(err.to_string(), "Stock insuficiente. Disponible: 2");
    }

    #[test]
    fn sqlx_errors_become_internal() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

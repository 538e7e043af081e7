// src/models/user.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Cliente,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Activo,
    Inactivo,
    Suspendido,
}

impl FromStr for UserStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activo" => Ok(UserStatus::Activo),
            "inactivo" => Ok(UserStatus::Inactivo),
            "suspendido" => Ok(UserStatus::Suspendido),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub nombres: String,
    pub apellidos: String,
    pub correo: String,
    // Hash bcrypt. Nunca sai no JSON.
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub contrasena: String,
    pub nro_documento: Option<String>,
    pub telefono: Option<String>,
    pub tipo: UserType,
    pub estado: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Versão enxuta embutida nas respostas de pedido.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub nombres: String,
    pub apellidos: String,
    pub correo: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_json_never_exposes_password() {
        let user = User {
            id: Uuid::new_v4(),
            nombres: "Ana".into(),
            apellidos: "Pérez".into(),
            correo: "ana@example.com".into(),
            contrasena: "$2b$12$hash".into(),
            nro_documento: None,
            telefono: None,
            tipo: UserType::Cliente,
            estado: UserStatus::Activo,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("contrasena").is_none());
        assert_eq!(json["correo"], "ana@example.com");
        assert_eq!(json["estado"], "activo");
    }

    #[test]
    fn user_status_parses_only_known_values() {
        assert_eq!("activo".parse::<UserStatus>(), Ok(UserStatus::Activo));
        assert_eq!("suspendido".parse::<UserStatus>(), Ok(UserStatus::Suspendido));
        assert!("bloqueado".parse::<UserStatus>().is_err());
    }
}

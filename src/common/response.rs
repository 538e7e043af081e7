// src/common/response.rs

use serde::Serialize;
use utoipa::ToSchema;

// Envelope padrão de todas as respostas da API:
//   { "success": bool, "message"?: string, "data"?: object }
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_skips_absent_fields() {
        let json = serde_json::to_value(ApiResponse::message("listo")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "listo");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn envelope_carries_data() {
        let json = serde_json::to_value(ApiResponse::new("ok", vec![1, 2, 3])).unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }
}

use crate::domain::operation::Operation;
use serde::Serialize;

/// `/operation` のレスポンスボディ
///
/// エラー時も現在のオペレーションを必ず含める。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResponse {
    pub operation: Operation,
    pub error: Option<String>,
}

impl OperationResponse {
    pub fn ok(operation: Operation) -> Self {
        Self {
            operation,
            error: None,
        }
    }

    pub fn error(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub message: String,
}

use super::dispatcher::{GatewayRequest, RouteHandler};
use super::error_response::GatewayError;
use super::models::OperationResponse;
use super::reply::Reply;
use crate::application::use_cases::ChangeOperationUseCase;
use crate::domain::operation::Operation;
use async_trait::async_trait;
use axum::http::{Method, StatusCode, header};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};

/// PUT ボディの上限（バイト）
pub const MAX_OPERATION_BODY: usize = 1024;

/// `/operation` のハンドラ
pub struct OperationHandler {
    use_case: Arc<ChangeOperationUseCase>,
}

impl OperationHandler {
    pub fn new(use_case: Arc<ChangeOperationUseCase>) -> Self {
        Self { use_case }
    }

    async fn put(&self, request: &mut GatewayRequest) -> Result<Operation, GatewayError> {
        // 受信した値をそのまま比較する（パラメータ付きも不可）
        if request.header(header::CONTENT_TYPE) != Some("application/json") {
            return Err(GatewayError::IncorrectContentType);
        }

        let len = request
            .header(header::CONTENT_LENGTH)
            .and_then(|value| value.trim().parse::<usize>().ok())
            .ok_or(GatewayError::MissingBody)?;
        if len > MAX_OPERATION_BODY {
            return Err(GatewayError::BodyTooLarge);
        }

        let body = request.read_exact(len).await?;
        let requested = parse_operation(&body)?;

        Ok(self.use_case.execute(requested).await?)
    }
}

#[async_trait]
impl RouteHandler for OperationHandler {
    async fn handle(&self, mut request: GatewayRequest) -> Reply {
        let method = request.method().clone();
        let result = match method {
            Method::GET => Ok(self.use_case.current()),
            Method::PUT => self.put(&mut request).await,
            _ => Err(GatewayError::MethodNotAllowed),
        };

        match result {
            Ok(operation) => Reply::json(StatusCode::OK, &OperationResponse::ok(operation)),
            Err(e) => {
                if e.is_client_error() {
                    warn!(%method, error = ?e, "Rejected operation request");
                } else {
                    error!("Failed to apply operation: {}", e);
                }
                e.into_reply(self.use_case.current())
            }
        }
    }
}

fn parse_operation(body: &[u8]) -> Result<Operation, GatewayError> {
    let text =
        std::str::from_utf8(body).map_err(|e| GatewayError::MalformedJson(e.to_string()))?;
    let value: Value =
        serde_json::from_str(text).map_err(|e| GatewayError::MalformedJson(e.to_string()))?;

    match value.get("operation") {
        Some(Value::String(operation)) => Ok(Operation::new(operation.as_str())),
        Some(_) => Err(GatewayError::InvalidOperationValue),
        None => Err(GatewayError::MissingOperationKey),
    }
}

use super::models::OperationResponse;
use super::reply::Reply;
use crate::domain::device::DeviceError;
use crate::domain::operation::{Operation, OperationError};
use axum::http::StatusCode;
use thiserror::Error;

/// `/operation` で発生するエラー
///
/// Display の文字列がそのままレスポンスの `error` になる。
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("bad request, incorrect content type")]
    IncorrectContentType,

    #[error("bad request, has no request body")]
    MissingBody,

    #[error("bad request, request body too large")]
    BodyTooLarge,

    #[error("bad request, incomplete request body")]
    IncompleteBody,

    #[error("bad request, malformed json body")]
    MalformedJson(String),

    #[error("bad request, lacks operation key")]
    MissingOperationKey,

    #[error("bad request, operation must be a string")]
    InvalidOperationValue,

    #[error("bad request, unknown operation: {0}")]
    UnknownOperation(String),

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("failed to write the operation to the device: {0}")]
    Device(#[from] DeviceError),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::Device(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// 現在のオペレーションを添えたレスポンスに変換
    pub fn into_reply(self, current: Operation) -> Reply {
        Reply::json(
            self.status_code(),
            &OperationResponse::error(current, self.to_string()),
        )
    }
}

impl From<OperationError> for GatewayError {
    fn from(error: OperationError) -> Self {
        match error {
            OperationError::Unknown(operation) => GatewayError::UnknownOperation(operation),
            OperationError::Device(e) => GatewayError::Device(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            GatewayError::IncorrectContentType.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            GatewayError::Device(DeviceError::Closed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(GatewayError::MissingOperationKey.is_client_error());
        assert!(!GatewayError::Device(DeviceError::Closed).is_client_error());
    }

    #[test]
    fn test_operation_error_conversion() {
        let err: GatewayError = OperationError::Unknown("x".to_string()).into();
        assert_eq!(err.to_string(), "bad request, unknown operation: x");

        let err: GatewayError = OperationError::Device(DeviceError::Closed).into();
        assert!(matches!(err, GatewayError::Device(DeviceError::Closed)));
    }

    #[test]
    fn test_into_reply_echoes_current_operation() {
        let reply = GatewayError::MissingBody.into_reply(Operation::from("f"));
        assert_eq!(reply.status(), StatusCode::BAD_REQUEST);
    }
}

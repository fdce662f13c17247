use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Serial device not found: {0}")]
    NotFound(String),

    #[error("Permission denied. Check that the user can access {0}")]
    PermissionDenied(String),

    #[error("Failed to open serial device: {0}")]
    OpenFailed(String),

    #[error("Failed to write to serial device: {0}")]
    WriteFailed(String),

    #[error("Failed to close serial device: {0}")]
    CloseFailed(String),

    #[error("Serial device already closed")]
    Closed,
}

//! オペレーションドメイン
//!
//! デバイスに送信する「現在のオペレーション」を表す値オブジェクトと、
//! 受け付け可能なオペレーションの集合を定義します。

use crate::domain::device::DeviceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// デバイス起動直後のオペレーション（停止）
pub const DEFAULT_OPERATION: &str = "s";

/// デバイスに送信されるオペレーション
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Operation(String);

impl Operation {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// シリアルリンクへ書き込むバイト列
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl Default for Operation {
    fn default() -> Self {
        Self::new(DEFAULT_OPERATION)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Operation {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// 受け付け可能な一文字オペレーションの集合
///
/// 例えば `"fbrls"` は前進・後退・右・左・停止の5種類のみを許可します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSet {
    allowed: Vec<char>,
}

impl OperationSet {
    pub fn new(allowed: &str) -> Self {
        let mut allowed: Vec<char> = allowed.chars().collect();
        allowed.sort_unstable();
        allowed.dedup();
        Self { allowed }
    }

    /// オペレーションがちょうど一文字で、かつ集合に含まれているか
    pub fn permits(&self, operation: &Operation) -> bool {
        let mut chars = operation.as_str().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.allowed.binary_search(&c).is_ok(),
            _ => false,
        }
    }

    pub fn check(&self, operation: &Operation) -> Result<(), OperationError> {
        if self.permits(operation) {
            Ok(())
        } else {
            Err(OperationError::Unknown(operation.as_str().to_string()))
        }
    }
}

#[derive(Error, Debug)]
pub enum OperationError {
    #[error("unknown operation: {0}")]
    Unknown(String),

    #[error(transparent)]
    Device(#[from] DeviceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_operation_is_stop() {
        assert_eq!(Operation::default().as_str(), "s");
        assert_eq!(Operation::default().as_bytes(), b"s");
    }

    #[test]
    fn test_operation_serializes_as_plain_string() {
        let json = serde_json::to_string(&Operation::new("f")).unwrap();
        assert_eq!(json, "\"f\"");
    }

    #[test]
    fn test_operation_set() {
        let set = OperationSet::new("fbrls");
        assert!(set.permits(&Operation::from("f")));
        assert!(set.permits(&Operation::from("s")));
        assert!(!set.permits(&Operation::from("x")));
        assert!(!set.permits(&Operation::from("fb")));
        assert!(!set.permits(&Operation::from("")));

        let err = set.check(&Operation::from("zz")).unwrap_err();
        assert_eq!(err.to_string(), "unknown operation: zz");
    }
}

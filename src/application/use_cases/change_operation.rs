use crate::domain::device::SerialLink;
use crate::domain::operation::{Operation, OperationError, OperationSet};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::info;

/// 現在のオペレーションを保持し、変更をシリアルデバイスへ転送するユースケース
///
/// シリアル書き込みと状態の更新は `write_lock` の中で行われるため、
/// 最終的な状態は常に最後に成功した書き込みの値と一致します。
/// 読み取り側は `write_lock` を取らないので、書き込みが止まっても待たされません。
pub struct ChangeOperationUseCase {
    current: watch::Sender<Operation>,
    write_lock: Mutex<()>,
    link: Arc<dyn SerialLink>,
    allowed: Option<OperationSet>,
}

impl ChangeOperationUseCase {
    pub fn new(link: Arc<dyn SerialLink>) -> Self {
        Self {
            current: watch::Sender::new(Operation::default()),
            write_lock: Mutex::new(()),
            link,
            allowed: None,
        }
    }

    pub fn with_allowed(mut self, allowed: Option<OperationSet>) -> Self {
        self.allowed = allowed;
        self
    }

    pub fn current(&self) -> Operation {
        self.current.borrow().clone()
    }

    pub async fn execute(&self, requested: Operation) -> Result<Operation, OperationError> {
        if let Some(allowed) = &self.allowed {
            allowed.check(&requested)?;
        }

        let _guard = self.write_lock.lock().await;
        crate::measure_time!("serial_write", {
            self.link.write(requested.as_bytes()).await
        })?;
        self.current.send_replace(requested.clone());

        info!(
            operation = %requested,
            device = self.link.device(),
            "Operation changed"
        );
        Ok(requested)
    }
}

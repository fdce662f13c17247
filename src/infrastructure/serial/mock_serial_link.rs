use crate::domain::device::{DeviceError, SerialLink};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// 実機なしで動かすためのシリアルリンク
///
/// 書き込まれたバイト列を記録するだけで、どこにも送信しません。
/// `--no-serial` モードとテストで使用します。
#[derive(Default)]
pub struct MockSerialLink {
    writes: Mutex<Vec<Vec<u8>>>,
    closes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MockSerialLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての書き込みが失敗するリンク
    pub fn failing() -> Self {
        let link = Self::default();
        link.fail_writes.store(true, Ordering::SeqCst);
        link
    }

    /// これまでに書き込まれたバイト列
    pub async fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().await.clone()
    }

    /// `close` が実際にリンクを閉じた回数
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SerialLink for MockSerialLink {
    fn device(&self) -> &str {
        "mock"
    }

    async fn write(&self, bytes: &[u8]) -> Result<(), DeviceError> {
        if self.close_count() > 0 {
            return Err(DeviceError::Closed);
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DeviceError::WriteFailed("mock: simulated failure".to_string()));
        }

        debug!("Mock serial write: {:?}", String::from_utf8_lossy(bytes));
        self.writes.lock().await.push(bytes.to_vec());
        Ok(())
    }

    async fn close(&self) -> Result<(), DeviceError> {
        if self
            .closes
            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Closing mock serial link");
        }
        Ok(())
    }
}

use super::ChangeOperationUseCase;
use crate::GatewayConfig;
use crate::domain::device::SerialLink;
use crate::infrastructure::serial::{MockSerialLink, SerialPortLink};
use crate::interfaces::web::server::{create_server, shutdown_signal};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct RunApplicationUseCase {
    config: GatewayConfig,
}

impl RunApplicationUseCase {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// シリアルデバイスを開き、シグナルを受け取るまでサーバーを動かす
    pub async fn execute(&self) -> anyhow::Result<()> {
        let link = self.open_link()?;
        self.run(link, shutdown_signal()).await
    }

    /// サーバーを動かし、終了後にリンクをちょうど一度だけ閉じる
    ///
    /// サーバーがエラーで終了した場合もリンクは閉じられる。
    pub async fn run<F>(&self, link: Arc<dyn SerialLink>, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let operations = Arc::new(
            ChangeOperationUseCase::new(Arc::clone(&link))
                .with_allowed(self.config.operation_set()),
        );

        let served = create_server(&self.config, operations, shutdown).await;
        if let Err(e) = &served {
            error!("Web server failed: {}", e);
        }

        info!("Closing the serial device {}", link.device());
        let closed = link.close().await;

        served?;
        closed?;
        Ok(())
    }

    fn open_link(&self) -> anyhow::Result<Arc<dyn SerialLink>> {
        if !self.config.serial_enabled {
            warn!("Serial bridging disabled. Operations will only be logged");
            return Ok(Arc::new(MockSerialLink::new()));
        }

        let link = SerialPortLink::open(self.config.device_path.as_str(), self.config.baud_rate)?;
        Ok(Arc::new(link))
    }
}

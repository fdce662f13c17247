use crate::domain::device::{DeviceError, SerialLink};
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio_serial::{
    DataBits, ErrorKind, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits,
};
use tracing::{debug, info};

pub const DEFAULT_DEVICE_PATH: &str = "/dev/ttyACM0";
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// tokio-serial で開いたシリアルポートへのリンク
///
/// ポートは Mutex の中に一つだけ保持されるため、書き込みは常に単一ライターです。
/// テストでは任意の `AsyncWrite` を差し込めます。
pub struct SerialPortLink<W = SerialStream> {
    device: String,
    port: Mutex<Option<W>>,
}

impl SerialPortLink<SerialStream> {
    /// デバイスを 8-N-1、フロー制御なしで開く
    pub fn open(device: impl Into<String>, baud_rate: u32) -> Result<Self, DeviceError> {
        let device = device.into();
        info!("Opening serial device {} at {} baud", device, baud_rate);

        let port = tokio_serial::new(device.as_str(), baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .open_native_async()
            .map_err(|e| match e.kind {
                ErrorKind::NoDevice => DeviceError::NotFound(device.clone()),
                ErrorKind::Io(std::io::ErrorKind::NotFound) => {
                    DeviceError::NotFound(device.clone())
                }
                ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
                    DeviceError::PermissionDenied(device.clone())
                }
                _ => DeviceError::OpenFailed(format!("{device}: {e}")),
            })?;

        Ok(Self::from_writer(device, port))
    }
}

impl<W> SerialPortLink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn from_writer(device: impl Into<String>, writer: W) -> Self {
        Self {
            device: device.into(),
            port: Mutex::new(Some(writer)),
        }
    }
}

#[async_trait]
impl<W> SerialLink for SerialPortLink<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn device(&self) -> &str {
        &self.device
    }

    async fn write(&self, bytes: &[u8]) -> Result<(), DeviceError> {
        let mut guard = self.port.lock().await;
        let port = guard.as_mut().ok_or(DeviceError::Closed)?;

        port.write_all(bytes)
            .await
            .map_err(|e| DeviceError::WriteFailed(format!("{}: {e}", self.device)))?;

        // 確実にフラッシュする
        port.flush()
            .await
            .map_err(|e| DeviceError::WriteFailed(format!("{}: flush: {e}", self.device)))?;

        debug!("Wrote {} bytes to {}", bytes.len(), self.device);
        Ok(())
    }

    async fn close(&self) -> Result<(), DeviceError> {
        let Some(mut port) = self.port.lock().await.take() else {
            debug!("Serial device {} already closed", self.device);
            return Ok(());
        };

        port.shutdown()
            .await
            .map_err(|e| DeviceError::CloseFailed(format!("{}: {e}", self.device)))?;

        info!("Closed serial device {}", self.device);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_writes_reach_the_port_in_order() {
        let port = Builder::new().write(b"f").write(b"s").build();
        let link = SerialPortLink::from_writer("/dev/ttyTEST", port);

        link.write(b"f").await.unwrap();
        link.write(b"s").await.unwrap();
        link.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_blocks_later_writes() {
        let link = SerialPortLink::from_writer("/dev/ttyTEST", Builder::new().build());

        link.close().await.unwrap();
        link.close().await.unwrap();

        let err = link.write(b"f").await.unwrap_err();
        assert!(matches!(err, DeviceError::Closed));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let port = Builder::new()
            .write_error(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "unplugged",
            ))
            .build();
        let link = SerialPortLink::from_writer("/dev/ttyTEST", port);

        let err = link.write(b"f").await.unwrap_err();
        assert!(matches!(err, DeviceError::WriteFailed(_)));
        assert!(err.to_string().contains("/dev/ttyTEST"));
    }

    #[test]
    fn test_open_missing_device_fails() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let _guard = runtime.enter();

        let result = SerialPortLink::open("/dev/this-serial-device-does-not-exist", DEFAULT_BAUD_RATE);
        assert!(result.is_err());
    }
}

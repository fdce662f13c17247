use super::DeviceError;
use async_trait::async_trait;

/// シリアル接続されたデバイスへのリンク
///
/// 書き込みはベストエフォートで、リトライやバッファリングは行いません。
#[async_trait]
pub trait SerialLink: Send + Sync {
    /// ログ出力用のデバイス名（例: `/dev/ttyACM0`）
    fn device(&self) -> &str;

    /// バイト列をデバイスへ書き込む
    async fn write(&self, bytes: &[u8]) -> Result<(), DeviceError>;

    /// リンクを閉じる。二回目以降の呼び出しは何もしない
    async fn close(&self) -> Result<(), DeviceError>;
}

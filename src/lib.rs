//! # Serial Operation Gateway
//!
//! シリアル接続されたデバイス（例: `/dev/ttyACM0` のマイコン）の現在の
//! 「オペレーション」を小さな REST API として公開する組み込み向け HTTP ゲートウェイ
//!
//! 以下の層に分かれています：
//!
//! - **Domain Layer**: オペレーションとシリアルリンクのモデル
//! - **Application Layer**: オペレーション変更とサーバー起動のユースケース
//! - **Infrastructure Layer**: tokio-serial によるシリアルリンク
//! - **Interface Layer**: ルーティング、ハンドラ、レスポンスエンコーダ

pub mod application;
pub mod debug;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

use domain::operation::OperationSet;
use infrastructure::serial::{DEFAULT_BAUD_RATE, DEFAULT_DEVICE_PATH};
use interfaces::web::DEFAULT_CHUNK_SIZE;
use std::path::PathBuf;

/// ゲートウェイ全体の設定
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub device_path: String,
    pub baud_rate: u32,
    /// 静的ファイルのルートディレクトリ
    pub static_root: PathBuf,
    /// false の場合、オペレーションはログに出力されるだけでデバイスには送信されない
    pub serial_enabled: bool,
    /// 許可する一文字オペレーション（例: `"fbrls"`）。None なら任意の文字列を許可
    pub allowed_operations: Option<String>,
    /// 静的ファイルを送信するときのチャンクサイズ（バイト）
    pub chunk_size: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            device_path: DEFAULT_DEVICE_PATH.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            static_root: PathBuf::from("static"),
            serial_enabled: true,
            allowed_operations: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl GatewayConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn operation_set(&self) -> Option<OperationSet> {
        self.allowed_operations.as_deref().map(OperationSet::new)
    }
}

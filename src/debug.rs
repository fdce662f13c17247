//! デバッグとログ機能
//!
//! プロジェクト全体のデバッグとログ機能を提供

use std::fs;
use tracing::{Level, debug, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// デバッグ設定
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// ログレベル
    pub log_level: Level,
    /// ファイルログを有効にするか
    pub enable_file_logging: bool,
    /// ログファイルのディレクトリ
    pub log_directory: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl DebugConfig {
    /// 開発環境用の設定
    pub fn development() -> Self {
        Self {
            log_level: Level::DEBUG,
            enable_file_logging: false,
            log_directory: "logs".to_string(),
        }
    }

    /// 本番環境用の設定
    pub fn production() -> Self {
        Self {
            log_level: Level::INFO,
            enable_file_logging: true,
            log_directory: "/var/log/serial-operation-gateway".to_string(),
        }
    }

    /// テスト環境用の設定
    pub fn test() -> Self {
        Self {
            log_level: Level::WARN,
            enable_file_logging: false,
            log_directory: "test_logs".to_string(),
        }
    }

    /// 環境名から設定を選ぶ。不明な名前は開発環境として扱う
    pub fn for_environment(environment: &str) -> Self {
        match environment {
            "production" => Self::production(),
            "test" => Self::test(),
            _ => Self::development(),
        }
    }
}

/// ログシステムを初期化
pub fn init_logging(
    config: &DebugConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // 環境変数からのフィルター設定
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!(
            "serial_operation_gateway={},tower_http={}",
            config.log_level, config.log_level
        ))
    })?;

    if config.enable_file_logging {
        fs::create_dir_all(&config.log_directory)?;
        let file_appender = RollingFileAppender::new(
            Rotation::DAILY,
            &config.log_directory,
            "serial-operation-gateway.log",
        );

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(file_appender)
            .json()
            .try_init()?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .pretty()
            .with_target(true)
            .with_thread_ids(true)
            .try_init()?;
    }

    info!("ログシステムが初期化されました");
    debug!("デバッグ設定: {:?}", config);

    Ok(())
}

/// パフォーマンス測定用のマクロ
#[macro_export]
macro_rules! measure_time {
    ($name:expr, $block:block) => {{
        let start = std::time::Instant::now();
        let result = $block;
        let duration = start.elapsed();
        tracing::debug!(
            operation = $name,
            duration_ms = duration.as_millis() as u64,
            "操作完了"
        );
        result
    }};
}

/// デバッグ用のヘルパー関数
pub mod debug_helpers {
    use tracing::{error, info};

    /// 起動時の情報をログに出力
    pub fn log_system_info() {
        info!("=== システム情報 ===");
        info!("OS: {}", std::env::consts::OS);
        info!("アーキテクチャ: {}", std::env::consts::ARCH);
        info!("プロジェクトバージョン: {}", env!("CARGO_PKG_VERSION"));
    }

    /// エラーの詳細情報をログに出力
    pub fn log_error_details(error: &dyn std::error::Error, context: &str) {
        error!(
            context = context,
            error = %error,
            "エラーが発生しました"
        );

        // エラーチェーンをログに出力
        let mut source = error.source();
        let mut level = 1;
        while let Some(err) = source {
            error!(
                context = context,
                level = level,
                source_error = %err,
                "エラーの原因"
            );
            source = err.source();
            level += 1;
        }
    }
}

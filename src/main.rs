mod cli;

use crate::cli::{Cli, Commands};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use serial_operation_gateway::GatewayConfig;
use serial_operation_gateway::application::use_cases::{
    ChangeOperationUseCase, RunApplicationUseCase,
};
use serial_operation_gateway::debug::debug_helpers::{log_error_details, log_system_info};
use serial_operation_gateway::debug::{DebugConfig, init_logging};
use serial_operation_gateway::domain::device::SerialLink;
use serial_operation_gateway::domain::operation::{Operation, OperationSet};
use serial_operation_gateway::infrastructure::serial::SerialPortLink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let debug_config = DebugConfig::for_environment(&cli.environment);
    if let Err(e) = init_logging(&debug_config) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    log_system_info();

    match cli.command {
        Commands::Run(args) => {
            let config = GatewayConfig::from(args);
            info!("Starting application...");
            let use_case = RunApplicationUseCase::new(config);

            match use_case.execute().await {
                Ok(_) => {
                    info!("Application terminated normally");
                }
                Err(e) => {
                    log_error_details(&*e, "run");
                    eprintln!("❌ Application failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Send {
            operation,
            serial,
            allowed_operations,
        } => {
            let link = Arc::new(SerialPortLink::open(serial.device, serial.baud)?);
            let use_case = ChangeOperationUseCase::new(link.clone())
                .with_allowed(allowed_operations.as_deref().map(OperationSet::new));

            match send_and_close(&use_case, link.as_ref(), Operation::new(operation)).await {
                Ok(operation) => {
                    println!("✅ Sent operation '{}' to {}", operation, link.device());
                }
                Err(e) => {
                    error!("Send failed: {:#}", e);
                    eprintln!("❌ Send failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// 一度だけ送信してデバイスを閉じる
///
/// 書き込みのエラーが閉じる処理のエラーより優先される。
async fn send_and_close(
    use_case: &ChangeOperationUseCase,
    link: &dyn SerialLink,
    operation: Operation,
) -> anyhow::Result<Operation> {
    let sent = use_case.execute(operation).await;
    let closed = link.close().await;

    let operation = match sent {
        Ok(operation) => operation,
        Err(e) => {
            if let Err(close_error) = closed {
                error!("Failed to close serial device: {}", close_error);
            }
            return Err(e.into());
        }
    };
    closed?;
    Ok(operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serial_operation_gateway::domain::device::DeviceError;
    use serial_operation_gateway::domain::operation::OperationError;
    use serial_operation_gateway::infrastructure::serial::MockSerialLink;

    /// 書き込みも閉じる処理も失敗するデバイス
    struct BrokenLink;

    #[async_trait]
    impl SerialLink for BrokenLink {
        fn device(&self) -> &str {
            "broken"
        }

        async fn write(&self, _bytes: &[u8]) -> Result<(), DeviceError> {
            Err(DeviceError::WriteFailed("broken: unplugged".to_string()))
        }

        async fn close(&self) -> Result<(), DeviceError> {
            Err(DeviceError::CloseFailed("broken: unplugged".to_string()))
        }
    }

    #[tokio::test]
    async fn test_send_and_close_closes_after_success() {
        let link = Arc::new(MockSerialLink::new());
        let use_case = ChangeOperationUseCase::new(link.clone());

        let sent = send_and_close(&use_case, link.as_ref(), Operation::from("f"))
            .await
            .unwrap();

        assert_eq!(sent.as_str(), "f");
        assert_eq!(link.close_count(), 1);
    }

    #[tokio::test]
    async fn test_write_error_wins_over_close_error() {
        let link = Arc::new(BrokenLink);
        let use_case = ChangeOperationUseCase::new(link.clone());

        let err = send_and_close(&use_case, link.as_ref(), Operation::from("f"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<OperationError>(),
            Some(OperationError::Device(DeviceError::WriteFailed(_)))
        ));
    }

    #[tokio::test]
    async fn test_failed_write_still_closes() {
        let link = Arc::new(MockSerialLink::failing());
        let use_case = ChangeOperationUseCase::new(link.clone());

        assert!(
            send_and_close(&use_case, link.as_ref(), Operation::from("f"))
                .await
                .is_err()
        );
        assert_eq!(link.close_count(), 1);
    }
}

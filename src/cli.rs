use clap::{Args, Parser, Subcommand};
use serial_operation_gateway::GatewayConfig;
use serial_operation_gateway::infrastructure::serial::{DEFAULT_BAUD_RATE, DEFAULT_DEVICE_PATH};
use serial_operation_gateway::interfaces::web::DEFAULT_CHUNK_SIZE;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "serial-operation-gateway",
    version,
    about = "HTTP gateway for a serial-connected device",
    long_about = "Exposes the current operation of a serial-connected device as a small REST API and serves its web UI"
)]
pub struct Cli {
    /// Logging preset: development, production or test
    #[arg(short, long, global = true, default_value = "development")]
    pub environment: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the web server and forward operations to the serial device
    Run(RunArgs),
    /// Write a single operation to the serial device and exit
    Send {
        /// Operation to send, e.g. "f"
        operation: String,
        #[command(flatten)]
        serial: SerialArgs,
        /// Only accept these single-character operations, e.g. "fbrls"
        #[arg(long)]
        allowed_operations: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct SerialArgs {
    /// Serial device path
    #[arg(short, long, default_value = DEFAULT_DEVICE_PATH)]
    pub device: String,
    /// Serial baud rate
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Port to bind the web server to
    #[arg(short, long, default_value = "8080")]
    pub port: u16,
    /// Host to bind the web server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    pub host: String,
    #[command(flatten)]
    pub serial: SerialArgs,
    /// Directory holding index.html, simple.html and assets/
    #[arg(short, long, default_value = "static")]
    pub static_root: PathBuf,
    /// Do not open the serial device; operations are only logged
    #[arg(long)]
    pub no_serial: bool,
    /// Only accept these single-character operations, e.g. "fbrls"
    #[arg(long)]
    pub allowed_operations: Option<String>,
    /// Chunk size in bytes used when streaming static files
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
}

impl From<RunArgs> for GatewayConfig {
    fn from(args: RunArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            device_path: args.serial.device,
            baud_rate: args.serial.baud,
            static_root: args.static_root,
            serial_enabled: !args.no_serial,
            allowed_operations: args.allowed_operations,
            chunk_size: args.chunk_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["serial-operation-gateway", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };

        let config = GatewayConfig::from(args);
        assert_eq!(config.port, 8080);
        assert_eq!(config.device_path, "/dev/ttyACM0");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.chunk_size, 16 * 1024);
        assert!(config.serial_enabled);
        assert_eq!(cli.environment, "development");
    }

    #[test]
    fn test_run_static_only() {
        let cli = Cli::try_parse_from([
            "serial-operation-gateway",
            "--environment",
            "production",
            "run",
            "--no-serial",
            "--allowed-operations",
            "fbrls",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };

        let config = GatewayConfig::from(args);
        assert!(!config.serial_enabled);
        assert!(config.operation_set().is_some());
    }

    #[test]
    fn test_send() {
        let cli =
            Cli::try_parse_from(["serial-operation-gateway", "send", "f", "-d", "/dev/ttyUSB0"])
                .unwrap();
        match cli.command {
            Commands::Send {
                operation, serial, ..
            } => {
                assert_eq!(operation, "f");
                assert_eq!(serial.device, "/dev/ttyUSB0");
                assert_eq!(serial.baud, DEFAULT_BAUD_RATE);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

//! シリアルリンクの実装
//!
//! ドメイン層で定義された `SerialLink` の具体的な実装を提供します。

mod mock_serial_link;
mod serial_port_link;

pub use mock_serial_link::MockSerialLink;
pub use serial_port_link::{DEFAULT_BAUD_RATE, DEFAULT_DEVICE_PATH, SerialPortLink};

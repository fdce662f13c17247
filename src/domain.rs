//! ドメイン層
//!
//! オペレーションとシリアルデバイスのドメインモデルを含む層

pub mod device;
pub mod operation;

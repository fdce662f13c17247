//! アプリケーション層
//!
//! ドメインモデルとインフラストラクチャを組み合わせたユースケースを提供

pub mod use_cases;

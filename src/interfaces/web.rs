//! Web インターフェース
//!
//! `/operation`、`/healthz`、`/ping` と静的ファイルを提供します。
//! すべてのリクエストはディスパッチャを通り、ルートテーブルで選ばれたハンドラの
//! `Reply` がレスポンスエンコーダで HTTP レスポンスに変換されます。

mod dispatcher;
mod error_response;
mod handlers;
mod models;
mod operation_handlers;
mod reply;
mod routes;
mod static_assets;

pub mod server;

pub use dispatcher::{GatewayRequest, RouteHandler, dispatch};
pub use error_response::GatewayError;
pub use handlers::{HealthHandler, PingHandler, READINESS_MESSAGE};
pub use models::{HealthResponse, OperationResponse};
pub use operation_handlers::OperationHandler;
pub use reply::{DEFAULT_CHUNK_SIZE, FileStream, Reply, ReplyBody};
pub use routes::{Route, RoutePattern, RouteTable, RouteTableBuilder};
pub use static_assets::{INDEX_PAGE, SIMPLE_PAGE, StaticAssetHandler, content_type_for};

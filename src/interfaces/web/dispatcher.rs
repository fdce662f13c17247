//! リクエストディスパッチャ
//!
//! axum のフォールバックとしてすべてのリクエストを受け取り、
//! ルートテーブルで一致したハンドラを一度だけ呼び出します。

use super::error_response::GatewayError;
use super::reply::Reply;
use super::routes::RouteTable;
use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{HeaderMap, Method, header::AsHeaderName},
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// ハンドラに渡されるリクエスト
///
/// クエリ文字列は無視され、パスのみが保持される。
pub struct GatewayRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Body,
}

impl GatewayRequest {
    pub fn new(method: Method, path: impl Into<String>, headers: HeaderMap, body: Body) -> Self {
        Self {
            method,
            path: path.into(),
            headers,
            body,
        }
    }

    pub fn from_request(request: Request) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts.method, parts.uri.path(), parts.headers, body)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// ヘッダーの値（名前は大文字小文字を区別しない）
    pub fn header<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// ボディをちょうど `len` バイト読み込む
    pub async fn read_exact(&mut self, len: usize) -> Result<Bytes, GatewayError> {
        let body = std::mem::take(&mut self.body);
        let bytes = axum::body::to_bytes(body, len)
            .await
            .map_err(|_| GatewayError::IncompleteBody)?;

        if bytes.len() != len {
            return Err(GatewayError::IncompleteBody);
        }
        Ok(bytes)
    }
}

/// リクエストから (ステータス, ボディ) を生成するハンドラ
#[async_trait]
pub trait RouteHandler: Send + Sync {
    async fn handle(&self, request: GatewayRequest) -> Reply;
}

/// すべてのリクエストの入口
pub async fn dispatch(State(routes): State<Arc<RouteTable>>, request: Request) -> Reply {
    let request_id = Uuid::new_v4();
    let request = GatewayRequest::from_request(request);
    let method = request.method().clone();
    let path = request.path().to_string();

    let reply = match routes.lookup(&method, &path) {
        Some(route) => route.handler().handle(request).await,
        None => {
            warn!(%request_id, %method, %path, "No route matched");
            Reply::not_found()
        }
    };

    info!(
        %request_id,
        %method,
        %path,
        status = reply.status().as_u16(),
        "Request handled"
    );
    reply
}

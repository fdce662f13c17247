use super::dispatcher::{GatewayRequest, RouteHandler};
use super::models::HealthResponse;
use super::reply::Reply;
use async_trait::async_trait;
use axum::http::StatusCode;

pub const READINESS_MESSAGE: &str = "I'm as ready as I'll ever be!";

/// Liveness probe. Answers any method, never touches the operation state.
pub struct HealthHandler;

#[async_trait]
impl RouteHandler for HealthHandler {
    async fn handle(&self, _request: GatewayRequest) -> Reply {
        Reply::json(
            StatusCode::OK,
            &HealthResponse {
                message: READINESS_MESSAGE.to_string(),
            },
        )
    }
}

pub struct PingHandler;

#[async_trait]
impl RouteHandler for PingHandler {
    async fn handle(&self, _request: GatewayRequest) -> Reply {
        Reply::text(StatusCode::OK, "pong")
    }
}

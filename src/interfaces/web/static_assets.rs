use super::dispatcher::{GatewayRequest, RouteHandler};
use super::reply::{FileStream, Reply};
use async_trait::async_trait;
use axum::http::StatusCode;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{error, warn};

pub const INDEX_PAGE: &str = "index.html";
pub const SIMPLE_PAGE: &str = "simple.html";

/// 静的ファイルをチャンク単位でストリーミングするハンドラ
pub struct StaticAssetHandler {
    root: PathBuf,
    /// 固定のページ（`/` → `index.html` など）。None ならURLのパスをそのまま使う
    page: Option<&'static str>,
    chunk_size: usize,
}

impl StaticAssetHandler {
    /// 常に同じ HTML ページを返すハンドラ
    pub fn page(root: impl Into<PathBuf>, page: &'static str, chunk_size: usize) -> Self {
        Self {
            root: root.into(),
            page: Some(page),
            chunk_size,
        }
    }

    /// URL のパスを静的ルート以下にそのまま対応させるハンドラ
    pub fn directory(root: impl Into<PathBuf>, chunk_size: usize) -> Self {
        Self {
            root: root.into(),
            page: None,
            chunk_size,
        }
    }

    /// ファイルパスと Content-Type を決定する。ルート外を指すパスは None
    pub fn resolve(&self, url_path: &str) -> Option<(PathBuf, &'static str)> {
        if let Some(page) = self.page {
            return Some((self.root.join(page), "text/html"));
        }

        let relative = Path::new(url_path.trim_start_matches('/'));
        let inside_root = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !inside_root {
            return None;
        }

        Some((self.root.join(relative), content_type_for(url_path)))
    }
}

pub fn content_type_for(path: &str) -> &'static str {
    if path.ends_with(".css") {
        "text/css"
    } else if path.ends_with(".js") {
        "application/javascript"
    } else {
        "application/octet-stream"
    }
}

#[async_trait]
impl RouteHandler for StaticAssetHandler {
    async fn handle(&self, request: GatewayRequest) -> Reply {
        let Some((path, content_type)) = self.resolve(request.path()) else {
            warn!("Refusing to serve {} outside the static root", request.path());
            return Reply::not_found();
        };

        match FileStream::open(&path, content_type, self.chunk_size).await {
            Ok(stream) => Reply::file(stream),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Static file not found: {}", path.display());
                Reply::not_found()
            }
            Err(e) => {
                error!("Failed to open {}: {}", path.display(), e);
                Reply::text(StatusCode::INTERNAL_SERVER_ERROR, "failed to read the file")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::web::reply::{DEFAULT_CHUNK_SIZE, ReplyBody};
    use axum::body::Body;
    use axum::http::{HeaderMap, Method};

    fn get(path: &str) -> GatewayRequest {
        GatewayRequest::new(Method::GET, path, HeaderMap::new(), Body::empty())
    }

    #[test]
    fn test_content_type_by_suffix() {
        assert_eq!(content_type_for("/assets/app.css"), "text/css");
        assert_eq!(content_type_for("/assets/app.js"), "application/javascript");
        assert_eq!(content_type_for("/assets/logo.png"), "application/octet-stream");
        assert_eq!(content_type_for("/assets/page.html"), "application/octet-stream");
    }

    #[test]
    fn test_resolve_page_alias() {
        let handler = StaticAssetHandler::page("static", INDEX_PAGE, DEFAULT_CHUNK_SIZE);
        assert_eq!(
            handler.resolve("/"),
            Some((PathBuf::from("static/index.html"), "text/html"))
        );
    }

    #[test]
    fn test_resolve_directory() {
        let handler = StaticAssetHandler::directory("static", DEFAULT_CHUNK_SIZE);
        assert_eq!(
            handler.resolve("/assets/js/app.js"),
            Some((
                PathBuf::from("static/assets/js/app.js"),
                "application/javascript"
            ))
        );
        assert_eq!(handler.resolve("/assets/../../etc/passwd"), None);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let handler = StaticAssetHandler::directory(dir.path(), DEFAULT_CHUNK_SIZE);

        let reply = handler.handle(get("/assets/missing.css")).await;
        assert_eq!(reply.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_existing_file_is_streamed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/app.css"), "body { color: red; }").unwrap();
        let handler = StaticAssetHandler::directory(dir.path(), DEFAULT_CHUNK_SIZE);

        let reply = handler.handle(get("/assets/app.css")).await;
        assert_eq!(reply.status(), StatusCode::OK);
        match reply.body() {
            ReplyBody::File(stream) => {
                assert_eq!(stream.content_type(), "text/css");
                assert_eq!(stream.len(), 20);
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }
}

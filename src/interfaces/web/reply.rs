//! レスポンスエンコーダ
//!
//! ハンドラは接続へ直接書き込まず、`Reply`（ステータスとボディの組）を返します。
//! すべての `Reply` はここで一つの `Content-Type` を持つ HTTP レスポンスに変換されます。

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use futures_util::stream::{self, Stream};
use serde::Serialize;
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::error;

/// 静的ファイルを送信するときのデフォルトのチャンクサイズ
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

#[derive(Debug)]
pub enum ReplyBody {
    /// JSON としてシリアライズされる構造化データ
    Json(serde_json::Value),
    /// そのまま送信されるプレーンテキスト
    Text(String),
    /// チャンク単位でストリーミングされるファイル
    File(FileStream),
}

/// ストリーミング送信されるファイル
#[derive(Debug)]
pub struct FileStream {
    file: File,
    len: u64,
    content_type: &'static str,
    chunk_size: usize,
}

impl FileStream {
    /// 通常のファイルを開く。ディレクトリなどは NotFound として扱う
    pub async fn open(
        path: &Path,
        content_type: &'static str,
        chunk_size: usize,
    ) -> io::Result<Self> {
        let file = File::open(path).await?;
        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a regular file", path.display()),
            ));
        }

        Ok(Self {
            file,
            len: metadata.len(),
            content_type,
            chunk_size: chunk_size.max(1),
        })
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    fn into_chunks(self) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
        let chunk_size = self.chunk_size;
        stream::unfold(Some(self.file), move |state| async move {
            let mut file = state?;
            let mut buffer = vec![0u8; chunk_size];
            match file.read(&mut buffer).await {
                Ok(0) => None,
                Ok(n) => {
                    buffer.truncate(n);
                    Some((Ok(Bytes::from(buffer)), Some(file)))
                }
                Err(e) => Some((Err(e), None)),
            }
        })
    }
}

/// ハンドラの結果
#[derive(Debug)]
pub struct Reply {
    status: StatusCode,
    body: ReplyBody,
}

impl Reply {
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Self {
                status,
                body: ReplyBody::Json(value),
            },
            Err(e) => {
                error!("Failed to serialize the response: {}", e);
                Self::text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to serialize the response",
                )
            }
        }
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: ReplyBody::Text(body.into()),
        }
    }

    pub fn file(stream: FileStream) -> Self {
        Self {
            status: StatusCode::OK,
            body: ReplyBody::File(stream),
        }
    }

    pub fn not_found() -> Self {
        Self::text(StatusCode::NOT_FOUND, "404 Not Found")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ReplyBody {
        &self.body
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.body {
            ReplyBody::Json(value) => {
                let body = value.to_string();
                (
                    self.status,
                    [
                        (
                            header::CONTENT_TYPE,
                            HeaderValue::from_static("application/json"),
                        ),
                        (header::CONTENT_LENGTH, HeaderValue::from(body.len())),
                    ],
                    body,
                )
                    .into_response()
            }
            ReplyBody::Text(text) => (
                self.status,
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static("text/plain")),
                    (header::CONTENT_LENGTH, HeaderValue::from(text.len())),
                ],
                text,
            )
                .into_response(),
            ReplyBody::File(stream) => (
                self.status,
                [
                    (
                        header::CONTENT_TYPE,
                        HeaderValue::from_static(stream.content_type()),
                    ),
                    (header::CONTENT_LENGTH, HeaderValue::from(stream.len())),
                ],
                Body::from_stream(stream.into_chunks()),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    async fn body_bytes(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_reply() {
        let response =
            Reply::json(StatusCode::OK, &json!({"operation": "s", "error": null})).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers().get_all(header::CONTENT_TYPE).iter().count(), 1);

        let body = body_bytes(response).await;
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({"operation": "s", "error": null}));
    }

    #[tokio::test]
    async fn test_text_reply_is_verbatim() {
        let response = Reply::text(StatusCode::OK, "pong").into_response();

        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "4");
        assert_eq!(body_bytes(response).await, Bytes::from_static(b"pong"));
    }

    #[tokio::test]
    async fn test_not_found_reply() {
        let reply = Reply::not_found();
        assert_eq!(reply.status(), StatusCode::NOT_FOUND);
        assert!(matches!(reply.body(), ReplyBody::Text(_)));
    }

    #[tokio::test]
    async fn test_file_reply_streams_every_byte() {
        let contents: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&contents).unwrap();

        // 小さいチャンクでも全体が欠けずに届くこと
        let stream = FileStream::open(file.path(), "application/octet-stream", 7)
            .await
            .unwrap();
        assert_eq!(stream.len(), contents.len() as u64);

        let response = Reply::file(stream).into_response();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "10000");
        assert_eq!(body_bytes(response).await.as_ref(), contents.as_slice());
    }

    #[tokio::test]
    async fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileStream::open(dir.path(), "text/html", DEFAULT_CHUNK_SIZE)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}

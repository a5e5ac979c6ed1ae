//! BoundedJsonFetcher - タイムアウト付きの JSON GET を 1 回だけ行う
//!
//! # 結果
//! - 2xx: ボディを最後まで読んで JSON として解釈（空ボディは `NoContent`）
//! - 非 2xx: `Http { status, body }`（JSON に見えても解釈しない）
//! - 接続・プロトコルの失敗: `Network`
//! - ヘッダーがタイムアウト内に届かない: リクエストを中断して `Timeout`
//! - JSON として壊れている: `Parse`
//!
//! 1 回の呼び出しで結果は必ず 1 つ。共有状態は持たない。

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// 2xx レスポンスの中身
#[derive(Debug, Clone, PartialEq)]
pub enum FetchBody {
    Json(Value),
    /// ボディが空だった
    NoContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {status}: {}", body_or_placeholder(.body))]
    Http { status: u16, body: String },

    #[error("Failed to parse JSON: {0}")]
    Parse(String),
}

fn body_or_placeholder(body: &str) -> &str {
    if body.is_empty() { "No body" } else { body }
}

pub type FetchResult = Result<FetchBody, FetchError>;

pub struct BoundedJsonFetcher {
    client: Client,
    timeout: Duration,
}

impl BoundedJsonFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self::with_client(client, timeout))
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub async fn get_json(&self, url: &str) -> FetchResult {
        let url = Url::parse(url).map_err(|e| FetchError::Network(format!("Invalid URL: {e}")))?;
        debug!(%url, timeout_ms = self.timeout.as_millis() as u64, "bounded GET");

        let send = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send();
        // タイムアウトしたら future ごと drop してリクエストを中断する
        let response = match tokio::time::timeout(self.timeout, send).await {
            Err(_) => return Err(FetchError::Timeout),
            Ok(result) => result.map_err(network)?,
        };

        let status = response.status();
        let body = tokio::time::timeout(self.timeout, response.text())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(network)?;

        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }
        if body.is_empty() {
            return Ok(FetchBody::NoContent);
        }
        serde_json::from_str(&body)
            .map(FetchBody::Json)
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

fn network(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(FetchError::Timeout.to_string(), "Request timed out");
        assert_eq!(
            FetchError::Http {
                status: 404,
                body: "{\"x\":1}".into()
            }
            .to_string(),
            "HTTP 404: {\"x\":1}"
        );
        assert_eq!(
            FetchError::Http {
                status: 502,
                body: String::new()
            }
            .to_string(),
            "HTTP 502: No body"
        );
        assert_eq!(
            FetchError::Parse("expected value".into()).to_string(),
            "Failed to parse JSON: expected value"
        );
    }

    #[tokio::test]
    async fn relative_url_is_a_network_error() {
        let fetcher = BoundedJsonFetcher::new(Duration::from_millis(500)).unwrap();
        let err = fetcher.get_json("/api/todos").await.unwrap_err();
        assert!(matches!(err, FetchError::Network(ref m) if m.starts_with("Invalid URL")));
    }
}

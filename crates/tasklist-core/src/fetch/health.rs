//! Health check - バックエンドに GET を 1 回投げて生存確認する
//!
//! `{base_url}/api/todos` を BoundedJsonFetcher で取得し、件数か失敗理由を
//! Notifier 経由でユーザーに見せます。

use std::fmt;

use serde_json::Value;
use tracing::info;

use super::bounded::{BoundedJsonFetcher, FetchBody, FetchError};
use crate::config::ClientConfig;
use crate::ports::Notifier;

pub const PROGRESS_TITLE: &str = "Pinging backend...";
pub const GREETING: &str = "Tasklist: Hello!";

/// 末尾の `/` をすべて落としてから `/api/todos` を付ける
pub fn todos_endpoint(base_url: &str) -> String {
    format!("{}/api/todos", base_url.trim_end_matches('/'))
}

/// 配列なら要素数、それ以外は truthy なら 1、falsy なら 0
pub fn item_count(body: &FetchBody) -> usize {
    match body {
        FetchBody::Json(Value::Array(items)) => items.len(),
        FetchBody::Json(value) if is_truthy(value) => 1,
        FetchBody::Json(_) | FetchBody::NoContent => 0,
    }
}

/// JavaScript の truthiness
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HealthReport {
    Healthy { url: String, items: usize },
    Unhealthy { url: String, error: FetchError },
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy { url, items } => write!(f, "Backend OK: {url} (items: {items})"),
            Self::Unhealthy { url, error } => write!(f, "Backend ping failed: {url} -> {error}"),
        }
    }
}

pub struct HealthCheck {
    fetcher: BoundedJsonFetcher,
    url: String,
}

impl HealthCheck {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let fetcher = BoundedJsonFetcher::new(config.timeout())?;
        Ok(Self::with_fetcher(fetcher, config.base_url()))
    }

    pub fn with_fetcher(fetcher: BoundedJsonFetcher, base_url: &str) -> Self {
        Self {
            fetcher,
            url: todos_endpoint(base_url),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn run(&self) -> HealthReport {
        let url = self.url.clone();
        match self.fetcher.get_json(&self.url).await {
            Ok(body) => HealthReport::Healthy {
                url,
                items: item_count(&body),
            },
            Err(error) => HealthReport::Unhealthy { url, error },
        }
    }

    pub async fn run_and_notify(&self, notifier: &dyn Notifier) -> HealthReport {
        notifier.progress(PROGRESS_TITLE);
        let report = self.run().await;
        info!(healthy = report.is_healthy(), url = %self.url, "health check finished");
        let message = report.to_string();
        if report.is_healthy() {
            notifier.info(&message);
        } else {
            notifier.error(&message);
        }
        report
    }
}

pub fn greet(notifier: &dyn Notifier) {
    notifier.info(GREETING);
}

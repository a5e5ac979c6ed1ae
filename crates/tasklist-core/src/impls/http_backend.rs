//! HttpTodoBackend - `/api/todos` REST バックエンドの実装
//!
//! | 操作   | メソッド | パス              | 成功              |
//! |--------|----------|-------------------|-------------------|
//! | List   | GET      | /api/todos        | 200 + 配列        |
//! | Create | POST     | /api/todos        | 2xx + アイテム    |
//! | Toggle | PATCH    | /api/todos/{id}   | 2xx（ボディ無視） |
//! | Delete | DELETE   | /api/todos/{id}   | 2xx               |

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::domain::{ClientError, DoneUpdate, ErrorBody, NewTodo, TodoId, TodoItem, TodoText};
use crate::ports::TodoBackend;

const TODOS_PATH: &str = "/api/todos";

pub struct HttpTodoBackend {
    client: Client,
    collection: Url,
}

impl HttpTodoBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Self::with_client(client, config.base_url())
    }

    /// 既存の reqwest Client を使う
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ClientError> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), TODOS_PATH);
        let collection = Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))?;
        if collection.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(raw));
        }
        Ok(Self { client, collection })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    /// `/api/todos/{id}`（id はパスセグメントとしてエンコードされる）
    pub fn item_url(&self, id: &TodoId) -> Result<Url, ClientError> {
        let mut url = self.collection.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.collection.to_string()))?
            .push(&id.as_path_segment());
        Ok(url)
    }
}

fn transport(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Transport(err.to_string())
    }
}

/// 非 2xx なら `Rejected` に変換。ボディの `error` があれば拾う。
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Rejected {
        status: status.as_u16(),
        message: ErrorBody::message_from(&body),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.text().await.map_err(transport)?;
    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

#[async_trait]
impl TodoBackend for HttpTodoBackend {
    async fn list(&self) -> Result<Vec<TodoItem>, ClientError> {
        debug!(url = %self.collection, "GET todos");
        let response = self
            .client
            .get(self.collection.clone())
            .send()
            .await
            .map_err(transport)?;
        decode(ensure_success(response).await?).await
    }

    async fn create(&self, text: &TodoText) -> Result<TodoItem, ClientError> {
        debug!(url = %self.collection, "POST todo");
        let response = self
            .client
            .post(self.collection.clone())
            .json(&NewTodo { text })
            .send()
            .await
            .map_err(transport)?;
        decode(ensure_success(response).await?).await
    }

    async fn set_done(&self, id: &TodoId, done: bool) -> Result<(), ClientError> {
        let url = self.item_url(id)?;
        debug!(%url, done, "PATCH todo");
        let response = self
            .client
            .patch(url)
            .json(&DoneUpdate { done })
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response).await.map(|_| ())
    }

    async fn delete(&self, id: &TodoId) -> Result<(), ClientError> {
        let url = self.item_url(id)?;
        debug!(%url, "DELETE todo");
        let response = self.client.delete(url).send().await.map_err(transport)?;
        ensure_success(response).await.map(|_| ())
    }
}

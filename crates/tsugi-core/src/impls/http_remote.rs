//! HttpRemoteApi - reqwest ベースの RemoteApi 実装
//!
//! # エラー正規化
//! - transport 失敗（接続不能・DNS など） → `SyncError::Network`
//! - 非 2xx 応答 → `SyncError::Remote`。メッセージは JSON body の `detail`
//!   フィールド優先、無ければ HTTP status line
//!
//! リトライ無し、タイムアウトはプラットフォーム既定のまま。

use async_trait::async_trait;

use crate::domain::{Filter, SyncError, TodoDraft, TodoId, TodoRecord};
use crate::ports::RemoteApi;

/// ローカル開発エンドポイント（環境変数未設定時の既定値）。
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// ベース URL を選ぶ唯一の環境設定。
pub const BASE_URL_ENV: &str = "TSUGI_API_URL";

pub struct HttpRemoteApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemoteApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// `TSUGI_API_URL` から構築。未設定ならローカル開発エンドポイント。
    pub fn from_env() -> Self {
        let base = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport(error: reqwest::Error) -> SyncError {
        SyncError::Network(error.to_string())
    }

    fn decode(error: reqwest::Error) -> SyncError {
        SyncError::Remote(format!("invalid response body: {error}"))
    }

    /// 非 2xx を `SyncError::Remote` へ。
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let fallback = format!("HTTP {status}");
        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::to_string)
                .unwrap_or(fallback),
            Err(_) => fallback,
        };
        Err(SyncError::Remote(message))
    }
}

#[async_trait]
impl RemoteApi for HttpRemoteApi {
    async fn list(&self, filter: Option<Filter>) -> Result<Vec<TodoRecord>, SyncError> {
        let mut request = self.client.get(self.url("/todos"));
        if let Some(completed) = filter.and_then(|f| f.as_query()) {
            request = request.query(&[("completed", completed)]);
        }
        let response = request.send().await.map_err(Self::transport)?;
        Self::check(response).await?.json().await.map_err(Self::decode)
    }

    async fn create(&self, draft: &TodoDraft) -> Result<TodoRecord, SyncError> {
        let response = self
            .client
            .post(self.url("/todos/"))
            .json(draft)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check(response).await?.json().await.map_err(Self::decode)
    }

    async fn update(&self, id: TodoId, draft: &TodoDraft) -> Result<TodoRecord, SyncError> {
        let response = self
            .client
            .put(self.url(&format!("/todos/{}", id.as_i64())))
            .json(draft)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check(response).await?.json().await.map_err(Self::decode)
    }

    async fn delete(&self, id: TodoId) -> Result<(), SyncError> {
        let response = self
            .client
            .delete(self.url(&format!("/todos/{}", id.as_i64())))
            .send()
            .await
            .map_err(Self::transport)?;
        // 応答 body（削除済みレコード）は読み捨てる
        Self::check(response).await?;
        Ok(())
    }

    async fn probe(&self) -> Result<(), SyncError> {
        let response = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check(response).await?;
        Ok(())
    }
}

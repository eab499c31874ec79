use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::json;
use tracing::debug;

use super::{HistoryApi, build_http_client, endpoint, send_json};
use crate::error::Result;

const SERVICE: &str = "points-history";

#[derive(Debug, Deserialize)]
struct ExistsBody {
    exists: bool,
}

#[derive(Debug, Deserialize)]
struct TotalBody {
    total: i64,
}

/// 历史记录 REST 客户端
#[derive(Clone)]
pub struct HistoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HistoryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_http_client(SERVICE, timeout)?,
            base_url: base_url.into(),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<reqwest::Url> {
        endpoint(SERVICE, &self.base_url, segments)
    }
}

#[async_trait]
impl HistoryApi for HistoryClient {
    async fn point_exists(&self, hash: &str) -> Result<bool> {
        let request = self.http.get(self.url(&["hist", "pontos", hash])?);
        let body: ExistsBody = send_json(SERVICE, request).await?;
        Ok(body.exists)
    }

    async fn record_point(&self, hash: &str, user_id: &str, points: i64) -> Result<()> {
        debug!(hash, user_id, points, "POST hist/pontos");
        let request = self
            .http
            .post(self.url(&["hist", "pontos"])?)
            .json(&json!({ "id": hash, "idUser": user_id, "points": points }));
        let _: IgnoredAny = send_json(SERVICE, request).await?;
        Ok(())
    }

    async fn record_transaction(
        &self,
        user_id: &str,
        description: &str,
        points: i64,
    ) -> Result<()> {
        debug!(user_id, description, points, "POST hist/transacoes");
        let request = self.http.post(self.url(&["hist", "transacoes"])?).json(&json!({
            "idUser": user_id,
            "description": description,
            "points": points,
        }));
        let _: IgnoredAny = send_json(SERVICE, request).await?;
        Ok(())
    }

    async fn history_total(&self, user_id: &str) -> Result<i64> {
        let request = self.http.get(self.url(&["hist", user_id, "saldo"])?);
        let body: TotalBody = send_json(SERVICE, request).await?;
        Ok(body.total)
    }
}

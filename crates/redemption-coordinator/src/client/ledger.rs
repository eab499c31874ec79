use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{Balance, BenefitSnapshot, LedgerApi, build_http_client, endpoint, send_json};
use crate::error::{CoordinatorError, Result};

const SERVICE: &str = "points-ledger";

/// 账本统一响应外壳，只关心 data
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct PointsBody {
    #[serde(rename = "_id")]
    id: String,
    pontos: i64,
}

#[derive(Debug, Deserialize)]
struct BenefitBody {
    #[serde(rename = "_id")]
    id: String,
    nome: String,
    pontos: i64,
    quantidade: i64,
}

impl From<PointsBody> for Balance {
    fn from(body: PointsBody) -> Self {
        Self {
            user_id: body.id,
            points: body.pontos,
        }
    }
}

impl From<BenefitBody> for BenefitSnapshot {
    fn from(body: BenefitBody) -> Self {
        Self {
            id: body.id,
            name: body.nome,
            cost: body.pontos,
            quantity: body.quantidade,
        }
    }
}

fn unwrap_data<T>(envelope: Envelope<T>) -> Result<T> {
    envelope.data.ok_or_else(|| CoordinatorError::Upstream {
        service: SERVICE,
        status: 200,
        code: None,
        message: "响应缺少 data 字段".to_string(),
    })
}

/// 积分账本 REST 客户端
///
/// `base_url` 指向 `/api` 前缀，例如 `http://localhost:3000/api`
#[derive(Clone)]
pub struct LedgerClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl LedgerClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            http: build_http_client(SERVICE, timeout)?,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    fn get(&self, segments: &[&str]) -> Result<reqwest::RequestBuilder> {
        let url = endpoint(SERVICE, &self.base_url, segments)?;
        Ok(self.http.get(url).bearer_auth(&self.token))
    }

    fn put(&self, segments: &[&str]) -> Result<reqwest::RequestBuilder> {
        let url = endpoint(SERVICE, &self.base_url, segments)?;
        Ok(self.http.put(url).bearer_auth(&self.token))
    }
}

#[async_trait]
impl LedgerApi for LedgerClient {
    async fn get_balance(&self) -> Result<Balance> {
        let request = self.get(&["usuario", "pontos"])?;
        let envelope: Envelope<PointsBody> = send_json(SERVICE, request).await?;
        unwrap_data(envelope).map(Into::into)
    }

    async fn set_balance(&self, points: i64) -> Result<Balance> {
        debug!(points, "PUT usuario/pontos");
        let request = self
            .put(&["usuario", "pontos"])?
            .json(&json!({ "pontos": points }));
        let envelope: Envelope<PointsBody> = send_json(SERVICE, request).await?;
        unwrap_data(envelope).map(Into::into)
    }

    async fn get_benefit(&self, benefit_id: &str) -> Result<BenefitSnapshot> {
        let request = self.get(&["beneficio", "id", benefit_id])?;
        let envelope: Envelope<BenefitBody> = send_json(SERVICE, request).await?;
        unwrap_data(envelope).map(Into::into)
    }

    async fn set_benefit_quantity(
        &self,
        benefit_id: &str,
        quantity: i64,
    ) -> Result<BenefitSnapshot> {
        debug!(benefit_id, quantity, "PUT beneficio/resgate");
        let request = self
            .put(&["beneficio", "resgate"])?
            .json(&json!({ "_id": benefit_id, "quantidade": quantity }));
        let envelope: Envelope<BenefitBody> = send_json(SERVICE, request).await?;
        unwrap_data(envelope).map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benefit_body_maps_wire_names() {
        let envelope: Envelope<BenefitBody> = serde_json::from_str(
            r#"{"success":true,"code":"SUCCESS","message":"ok","data":{
                "_id":"b-1","nome":"Ingresso cinema","endereco":"Rua A, 10",
                "pontos":150,"data":"2030-01-01","quantidade":3}}"#,
        )
        .unwrap();
        let snapshot: BenefitSnapshot = unwrap_data(envelope).unwrap().into();
        assert_eq!(snapshot.name, "Ingresso cinema");
        assert_eq!(snapshot.cost, 150);
        assert_eq!(snapshot.quantity, 3);
    }

    #[test]
    fn test_missing_data_is_upstream_error() {
        let envelope: Envelope<PointsBody> =
            serde_json::from_str(r#"{"success":true,"code":"SUCCESS","message":"ok"}"#).unwrap();
        assert!(matches!(
            unwrap_data(envelope),
            Err(CoordinatorError::Upstream { .. })
        ));
    }
}

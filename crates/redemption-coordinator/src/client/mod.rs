//! 上游服务客户端
//!
//! 协调器只通过 HTTP 访问积分账本与历史记录服务，两者之间没有跨库事务。
//! trait 抽象便于在单元测试中替换为 mock。

mod history;
mod ledger;

pub use history::HistoryClient;
pub use ledger::LedgerClient;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{CoordinatorError, Result};

/// 当前用户余额
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub user_id: String,
    pub points: i64,
}

/// 兑换时需要的权益信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenefitSnapshot {
    pub id: String,
    pub name: String,
    pub cost: i64,
    pub quantity: i64,
}

/// 积分账本服务接口（以令牌持有者身份调用）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerApi: Send + Sync {
    async fn get_balance(&self) -> Result<Balance>;

    async fn set_balance(&self, points: i64) -> Result<Balance>;

    async fn get_benefit(&self, benefit_id: &str) -> Result<BenefitSnapshot>;

    async fn set_benefit_quantity(&self, benefit_id: &str, quantity: i64)
    -> Result<BenefitSnapshot>;
}

/// 历史记录服务接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryApi: Send + Sync {
    /// 该二维码哈希是否已记录
    async fn point_exists(&self, hash: &str) -> Result<bool>;

    async fn record_point(&self, hash: &str, user_id: &str, points: i64) -> Result<()>;

    async fn record_transaction(&self, user_id: &str, description: &str, points: i64)
    -> Result<()>;

    /// 用户全部历史的带符号合计
    async fn history_total(&self, user_id: &str) -> Result<i64>;
}

/// 两个服务共用的失败响应体
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

fn transport_error(service: &'static str, err: reqwest::Error) -> CoordinatorError {
    let message = if err.is_timeout() {
        format!("请求超时: {err}")
    } else if err.is_connect() {
        format!("无法连接: {err}")
    } else {
        err.to_string()
    };
    CoordinatorError::Transport { service, message }
}

/// 发送请求并把非 2xx 响应转换为 `Upstream` 错误
async fn send_json<T: DeserializeOwned>(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(service, e))?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => (parsed.code, parsed.message.unwrap_or_else(|| body.clone())),
            Err(_) => (None, body),
        };
        return Err(CoordinatorError::Upstream {
            service,
            status: status.as_u16(),
            code,
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| transport_error(service, e))
}

/// 在基础地址后追加路径段，每段单独做百分号编码
fn endpoint(service: &'static str, base: &str, segments: &[&str]) -> Result<reqwest::Url> {
    let invalid = || CoordinatorError::Transport {
        service,
        message: format!("无效的服务地址: {base}"),
    };
    let mut url = reqwest::Url::parse(base).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn build_http_client(
    service: &'static str,
    timeout: std::time::Duration,
) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CoordinatorError::Transport {
            service,
            message: format!("创建 HTTP 客户端失败: {e}"),
        })
}

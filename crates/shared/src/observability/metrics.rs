//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::ObservabilityConfig;

/// Metrics 资源守卫
pub struct MetricsHandle {
    _server_handle: tokio::task::JoinHandle<()>,
}

/// 初始化 Prometheus 指标导出
///
/// 启动一个独立的 HTTP 服务器在指定端口暴露 `/metrics` 端点。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    register_common_metrics(&config.service_name);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle {
        _server_handle: server_handle,
    })
}

/// 注册通用指标描述
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!("http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );

    metrics::describe_counter!(
        "points_credited_total",
        "Total points credited to user balances"
    );
    metrics::describe_counter!(
        "benefit_redemptions_total",
        "Total number of benefit redemptions"
    );
    metrics::describe_counter!(
        "history_events_total",
        "Total number of history records appended"
    );
    metrics::describe_counter!(
        "coordinator_partial_failures_total",
        "Redemption flows that failed after a write had already been applied"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

/// 启动指标 HTTP 服务器
async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }));

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(server_handle)
}

/// 记录 HTTP 请求
#[inline]
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str
    )
    .record(duration_secs);
}

/// 记录积分入账
#[inline]
pub fn record_points_credited(source: &str, points: i64) {
    if points > 0 {
        metrics::counter!("points_credited_total", "source" => source.to_string())
            .increment(points as u64);
    }
}

/// 记录权益兑换
#[inline]
pub fn record_benefit_redemption(status: &str) {
    metrics::counter!("benefit_redemptions_total", "status" => status.to_string()).increment(1);
}

/// 记录历史流水写入
#[inline]
pub fn record_history_event(kind: &str) {
    metrics::counter!("history_events_total", "kind" => kind.to_string()).increment(1);
}

/// 记录协调器部分失败
#[inline]
pub fn record_partial_failure(flow: &str, step: &str, compensated: bool) {
    metrics::counter!(
        "coordinator_partial_failures_total",
        "flow" => flow.to_string(),
        "step" => step.to_string(),
        "compensated" => compensated.to_string()
    )
    .increment(1);
}

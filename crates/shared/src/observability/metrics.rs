//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::ObservabilityConfig;

/// 全局 Prometheus handle，用于渲染指标
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics 资源守卫
pub struct MetricsHandle {
    _server_handle: tokio::task::JoinHandle<()>,
}

/// 初始化 Prometheus 指标导出
///
/// 启动一个独立的 HTTP 服务器在指定端口暴露 `/metrics` 端点。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    let _ = PROMETHEUS_HANDLE.set(handle.clone());

    register_common_metrics(&config.service_name);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle {
        _server_handle: server_handle,
    })
}

/// 注册指标描述（出现在 /metrics 的 HELP 注释中）
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!("http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );

    metrics::describe_counter!("toys_listed_total", "Total number of toys listed");
    metrics::describe_counter!(
        "toy_requests_total",
        "Total number of toy request creation attempts"
    );
    metrics::describe_counter!(
        "request_decisions_total",
        "Total number of owner decisions on toy requests"
    );
    metrics::describe_histogram!(
        "request_decision_duration_seconds",
        "Toy request decision transaction duration in seconds"
    );
    metrics::describe_counter!(
        "badge_promotions_total",
        "Total number of sustainability badge promotions"
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

/// 获取全局 Prometheus handle（用于自定义渲染）
pub fn get_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

// ============================================================================
// 指标记录函数
// ============================================================================

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

/// 记录玩具上架
#[inline]
pub fn record_toy_listed(category: &str) {
    metrics::counter!("toys_listed_total", "category" => category.to_string()).increment(1);
}

/// 记录请求创建结果（created / 具体错误码）
#[inline]
pub fn record_toy_request(outcome: &str) {
    metrics::counter!("toy_requests_total", "outcome" => outcome.to_string()).increment(1);
}

/// 记录物主审批结果
#[inline]
pub fn record_request_decision(decision: &str, outcome: &str, duration_secs: f64) {
    metrics::counter!(
        "request_decisions_total",
        "decision" => decision.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "request_decision_duration_seconds",
        "decision" => decision.to_string()
    )
    .record(duration_secs);
}

/// 记录徽章升级
#[inline]
pub fn record_badge_promotion(badge: &str) {
    metrics::counter!("badge_promotions_total", "badge" => badge.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    // 未安装 recorder 时记录指标应为空操作，不能 panic
    #[test]
    fn test_record_without_recorder() {
        record_http_request("GET", "/api/toys", 200, 0.01);
        record_toy_listed("puzzles");
        record_toy_request("created");
        record_request_decision("approve", "success", 0.02);
        record_badge_promotion("EcoFriend");
        assert!(get_handle().is_none());
    }
}

use crate::middleware::metrics::PerformanceMonitor;
use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use std::sync::Arc;

/// 获取性能指标
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Metrics",
    responses(
        (status = 200, description = "当前性能指标快照", body = crate::middleware::metrics::PerformanceMetrics)
    )
)]
pub async fn get_metrics(monitor: web::Data<Arc<PerformanceMonitor>>) -> Result<HttpResponse> {
    let metrics = monitor.get_metrics();

    Ok(HttpResponse::Ok().json(json!({
        "code": 0,
        "message": "success",
        "data": metrics
    })))
}

/// 获取性能报告
#[utoipa::path(
    get,
    path = "/metrics/report",
    tag = "Metrics",
    responses(
        (status = 200, description = "人类可读的性能报告", body = crate::api::swagger::MetricsReport)
    )
)]
pub async fn get_performance_report(
    monitor: web::Data<Arc<PerformanceMonitor>>,
) -> Result<HttpResponse> {
    let report = monitor.generate_report();

    Ok(HttpResponse::Ok().json(json!({
        "code": 0,
        "message": "success",
        "data": {
            "report": report
        }
    })))
}

/// 重置性能指标
#[utoipa::path(
    post,
    path = "/metrics/reset",
    tag = "Metrics",
    responses(
        (status = 200, description = "重置确认", body = crate::api::swagger::ResetAck)
    )
)]
pub async fn reset_metrics(monitor: web::Data<Arc<PerformanceMonitor>>) -> Result<HttpResponse> {
    monitor.reset_metrics();

    Ok(HttpResponse::Ok().json(json!({
        "code": 0,
        "message": "性能指标已重置",
        "data": null
    })))
}

/// 健康检查端点（包含基本性能信息）
#[utoipa::path(
    get,
    path = "/health",
    tag = "Metrics",
    responses(
        (status = 200, description = "服务健康", body = crate::api::swagger::HealthResponse),
        (status = 503, description = "服务不健康", body = crate::api::swagger::HealthResponse)
    )
)]
pub async fn health_check_with_metrics(
    monitor: web::Data<Arc<PerformanceMonitor>>,
) -> Result<HttpResponse> {
    let metrics = monitor.get_metrics();

    // 判断系统健康状态
    let is_healthy = metrics.avg_response_time_ms < 1000.0
        && metrics.cpu_usage_percent < 80.0
        && (metrics.total_requests == 0
            || (metrics.successful_requests as f64 / metrics.total_requests as f64) > 0.95);

    let status = if is_healthy { "healthy" } else { "unhealthy" };
    let status_code = if is_healthy { 200 } else { 503 };

    Ok(
        HttpResponse::build(actix_web::http::StatusCode::from_u16(status_code).unwrap()).json(
            json!({
                "status": status,
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "metrics": {
                    "total_requests": metrics.total_requests,
                    "success_rate": if metrics.total_requests > 0 {
                        (metrics.successful_requests as f64 / metrics.total_requests as f64) * 100.0
                    } else { 100.0 },
                    "avg_response_time_ms": metrics.avg_response_time_ms,
                    "requests_per_second": metrics.requests_per_second,
                    "memory_usage_mb": metrics.memory_usage_bytes as f64 / 1024.0 / 1024.0,
                    "cpu_usage_percent": metrics.cpu_usage_percent
                }
            }),
        ),
    )
}

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    rc::Rc,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, RwLock,
    },
    time::{Duration, Instant},
};
use utoipa::ToSchema;

/// 性能指标数据结构
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PerformanceMetrics {
    /// 请求总数
    pub total_requests: u64,
    /// 成功请求数
    pub successful_requests: u64,
    /// 失败请求数
    pub failed_requests: u64,
    /// 平均响应时间（毫秒）
    pub avg_response_time_ms: f64,
    /// 最大响应时间（毫秒）
    pub max_response_time_ms: u64,
    /// 最小响应时间（毫秒）
    pub min_response_time_ms: u64,
    /// 每秒请求数（QPS）
    pub requests_per_second: f64,
    /// 按状态码分组的请求数
    pub status_code_counts: HashMap<u16, u64>,
    /// 按路径分组的请求数
    pub path_counts: HashMap<String, u64>,
    /// 内存使用情况（字节）
    pub memory_usage_bytes: u64,
    /// CPU 使用率（百分比）
    pub cpu_usage_percent: f64,
}

/// 请求记录
#[derive(Debug)]
pub struct RequestRecord {
    start_time: Instant,
    path: String,
}

/// 原子计数器结构，用于高频更新的指标
#[derive(Debug)]
struct AtomicCounters {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    max_response_time_ms: AtomicU64,
    min_response_time_ms: AtomicU64,
    total_response_time_ms: AtomicU64,
}

impl AtomicCounters {
    fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            successful_requests: AtomicU64::new(0),
            failed_requests: AtomicU64::new(0),
            max_response_time_ms: AtomicU64::new(0),
            min_response_time_ms: AtomicU64::new(u64::MAX),
            total_response_time_ms: AtomicU64::new(0),
        }
    }

    fn reset(&self) {
        self.total_requests.store(0, Ordering::Relaxed);
        self.successful_requests.store(0, Ordering::Relaxed);
        self.failed_requests.store(0, Ordering::Relaxed);
        self.max_response_time_ms.store(0, Ordering::Relaxed);
        self.min_response_time_ms.store(u64::MAX, Ordering::Relaxed);
        self.total_response_time_ms.store(0, Ordering::Relaxed);
    }
}

/// 系统指标缓存，减少系统调用频率
#[derive(Debug, Clone)]
struct SystemMetricsCache {
    memory_usage_bytes: u64,
    cpu_usage_percent: f64,
    last_update: Instant,
    update_interval: Duration,
}

impl SystemMetricsCache {
    fn new() -> Self {
        Self {
            memory_usage_bytes: 0,
            cpu_usage_percent: 0.0,
            last_update: Instant::now() - Duration::from_secs(60), // 强制首次更新
            update_interval: Duration::from_secs(5), // 每5秒更新一次系统指标
        }
    }

    fn should_update(&self) -> bool {
        self.last_update.elapsed() >= self.update_interval
    }

    fn update(&mut self) {
        if let Ok(mem_info) = sys_info::mem_info() {
            self.memory_usage_bytes = (mem_info.total - mem_info.avail) * 1024;
        }

        if let Ok(load_avg) = sys_info::loadavg() {
            // 使用1分钟平均负载作为CPU使用率的近似值
            self.cpu_usage_percent = (load_avg.one * 100.0).min(100.0);
        }

        self.last_update = Instant::now();
    }
}

/// 性能监控器
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    atomic_counters: Arc<AtomicCounters>,
    start_time: Instant,
    status_code_counts: Arc<RwLock<HashMap<u16, u64>>>,
    path_counts: Arc<RwLock<HashMap<String, u64>>>,
    system_metrics_cache: Arc<Mutex<SystemMetricsCache>>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self {
            atomic_counters: Arc::new(AtomicCounters::new()),
            start_time: Instant::now(),
            status_code_counts: Arc::new(RwLock::new(HashMap::new())),
            path_counts: Arc::new(RwLock::new(HashMap::new())),
            system_metrics_cache: Arc::new(Mutex::new(SystemMetricsCache::new())),
        }
    }

    /// 记录请求开始
    pub fn record_request_start(&self, path: &str, _method: &str) -> RequestRecord {
        RequestRecord {
            start_time: Instant::now(),
            path: path.to_string(),
        }
    }

    /// 记录请求完成
    pub fn record_request_end(&self, record: RequestRecord, status_code: u16) {
        let response_time_ms = record.start_time.elapsed().as_millis() as u64;

        // 基本计数器用原子操作更新，无需加锁
        self.atomic_counters
            .total_requests
            .fetch_add(1, Ordering::Relaxed);
        self.atomic_counters
            .total_response_time_ms
            .fetch_add(response_time_ms, Ordering::Relaxed);

        if (200..400).contains(&status_code) {
            self.atomic_counters
                .successful_requests
                .fetch_add(1, Ordering::Relaxed);
        } else {
            self.atomic_counters
                .failed_requests
                .fetch_add(1, Ordering::Relaxed);
        }

        self.atomic_counters
            .max_response_time_ms
            .fetch_max(response_time_ms, Ordering::Relaxed);
        self.atomic_counters
            .min_response_time_ms
            .fetch_min(response_time_ms, Ordering::Relaxed);

        if let Ok(mut counts) = self.status_code_counts.write() {
            *counts.entry(status_code).or_insert(0) += 1;
        }
        if let Ok(mut counts) = self.path_counts.write() {
            *counts.entry(record.path).or_insert(0) += 1;
        }
    }

    /// 获取当前指标快照
    pub fn get_metrics(&self) -> PerformanceMetrics {
        // 按需刷新系统指标
        let (memory_usage_bytes, cpu_usage_percent) = {
            let mut cache = self
                .system_metrics_cache
                .lock()
                .expect("system metrics cache poisoned");
            if cache.should_update() {
                cache.update();
            }
            (cache.memory_usage_bytes, cache.cpu_usage_percent)
        };

        let total = self.atomic_counters.total_requests.load(Ordering::Relaxed);
        let total_time = self
            .atomic_counters
            .total_response_time_ms
            .load(Ordering::Relaxed);
        let min = self
            .atomic_counters
            .min_response_time_ms
            .load(Ordering::Relaxed);

        let elapsed = self.start_time.elapsed().as_secs_f64();

        PerformanceMetrics {
            total_requests: total,
            successful_requests: self
                .atomic_counters
                .successful_requests
                .load(Ordering::Relaxed),
            failed_requests: self.atomic_counters.failed_requests.load(Ordering::Relaxed),
            avg_response_time_ms: if total > 0 {
                total_time as f64 / total as f64
            } else {
                0.0
            },
            max_response_time_ms: self
                .atomic_counters
                .max_response_time_ms
                .load(Ordering::Relaxed),
            min_response_time_ms: if min == u64::MAX { 0 } else { min },
            requests_per_second: if elapsed > 0.0 { total as f64 / elapsed } else { 0.0 },
            status_code_counts: self
                .status_code_counts
                .read()
                .map(|c| c.clone())
                .unwrap_or_default(),
            path_counts: self.path_counts.read().map(|c| c.clone()).unwrap_or_default(),
            memory_usage_bytes,
            cpu_usage_percent,
        }
    }

    /// 生成人类可读的性能报告
    pub fn generate_report(&self) -> String {
        let metrics = self.get_metrics();
        let success_rate = if metrics.total_requests > 0 {
            metrics.successful_requests as f64 / metrics.total_requests as f64 * 100.0
        } else {
            100.0
        };

        format!(
            "=== 性能报告 / Performance Report ===\n\
             请求总数: {}\n\
             成功率: {:.2}%\n\
             平均响应时间: {:.2} ms\n\
             最大/最小响应时间: {} ms / {} ms\n\
             QPS: {:.2}\n\
             内存使用: {:.2} MB\n\
             CPU使用率: {:.2}%",
            metrics.total_requests,
            success_rate,
            metrics.avg_response_time_ms,
            metrics.max_response_time_ms,
            metrics.min_response_time_ms,
            metrics.requests_per_second,
            metrics.memory_usage_bytes as f64 / 1024.0 / 1024.0,
            metrics.cpu_usage_percent,
        )
    }

    /// 重置所有指标
    pub fn reset_metrics(&self) {
        self.atomic_counters.reset();
        if let Ok(mut counts) = self.status_code_counts.write() {
            counts.clear();
        }
        if let Ok(mut counts) = self.path_counts.write() {
            counts.clear();
        }
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// 性能监控中间件
pub struct MetricsMiddleware {
    monitor: Arc<PerformanceMonitor>,
}

impl MetricsMiddleware {
    pub fn new(monitor: Arc<PerformanceMonitor>) -> Self {
        Self { monitor }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = MetricsMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
            monitor: self.monitor.clone(),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
    monitor: Arc<PerformanceMonitor>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let monitor = self.monitor.clone();
        let service = self.service.clone();

        Box::pin(async move {
            let record = monitor.record_request_start(req.path(), req.method().as_str());
            let res = service.call(req).await?;
            monitor.record_request_end(record, res.status().as_u16());
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_track_success_and_failure() {
        let monitor = PerformanceMonitor::new();

        let record = monitor.record_request_start("/user/create", "POST");
        monitor.record_request_end(record, 201);
        let record = monitor.record_request_start("/user/token", "POST");
        monitor.record_request_end(record, 400);

        let metrics = monitor.get_metrics();
        assert_eq!(metrics.total_requests, 2);
        assert_eq!(metrics.successful_requests, 1);
        assert_eq!(metrics.failed_requests, 1);
        assert_eq!(metrics.status_code_counts.get(&201), Some(&1));
        assert_eq!(metrics.path_counts.get("/user/create"), Some(&1));
    }

    #[test]
    fn test_reset_clears_everything() {
        let monitor = PerformanceMonitor::new();
        let record = monitor.record_request_start("/user/me", "GET");
        monitor.record_request_end(record, 200);

        monitor.reset_metrics();

        let metrics = monitor.get_metrics();
        assert_eq!(metrics.total_requests, 0);
        assert_eq!(metrics.min_response_time_ms, 0);
        assert!(metrics.path_counts.is_empty());
    }

    #[actix_web::test]
    async fn test_middleware_records_requests() {
        use actix_web::{test, web, App, HttpResponse};

        let monitor = Arc::new(PerformanceMonitor::new());
        let app = test::init_service(
            App::new()
                .wrap(MetricsMiddleware::new(monitor.clone()))
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().body("pong") })),
        )
        .await;

        let req = test::TestRequest::get().uri("/ping").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let metrics = monitor.get_metrics();
        assert_eq!(metrics.total_requests, 1);
        assert_eq!(metrics.path_counts.get("/ping"), Some(&1));
    }
}

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use super::Middleware;
use crate::server::{Request, Response};

/// Middleware for collecting request metrics
///
/// All counters use atomic operations for thread-safe updates without locks.
///
/// Metrics collected:
/// - Total request count
/// - Average latency (action processing time)
/// - Responses by status class (2xx, 3xx, 4xx, 5xx)
/// - Requests answered by another middleware's `before` hook
#[derive(Debug, Default)]
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    status_classes: [AtomicUsize; 4],
    short_circuited: AtomicUsize,
}

impl MetricsMiddleware {
    /// Create a new metrics middleware with all counters initialized to zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of requests processed
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Calculate the average request latency
    ///
    /// Returns zero duration if no request has completed yet.
    pub fn average_latency(&self) -> Duration {
        let completed: usize = self
            .status_classes
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .sum();
        if completed == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / completed as u64)
        }
    }

    /// Number of responses whose status falls in `class` (2 for 2xx ... 5 for 5xx).
    pub fn status_count(&self, class: u16) -> usize {
        match class {
            2..=5 => self.status_classes[usize::from(class - 2)].load(Ordering::Relaxed),
            _ => 0,
        }
    }

    /// Requests answered by a `before` hook without running the action.
    pub fn short_circuited(&self) -> usize {
        self.short_circuited.load(Ordering::Relaxed)
    }

    /// Render the counters in Prometheus text format.
    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();
        out.push_str("# HELP waypoint_requests_total Requests handled\n");
        out.push_str("# TYPE waypoint_requests_total counter\n");
        out.push_str(&format!("waypoint_requests_total {}\n", self.request_count()));
        out.push_str("# HELP waypoint_responses_total Responses by status class\n");
        out.push_str("# TYPE waypoint_responses_total counter\n");
        for class in 2..=5u16 {
            out.push_str(&format!(
                "waypoint_responses_total{{class=\"{class}xx\"}} {}\n",
                self.status_count(class)
            ));
        }
        out.push_str("# HELP waypoint_request_latency_seconds Average action latency\n");
        out.push_str("# TYPE waypoint_request_latency_seconds gauge\n");
        out.push_str(&format!(
            "waypoint_request_latency_seconds {:.6}\n",
            self.average_latency().as_secs_f64()
        ));
        out
    }
}

impl Middleware for MetricsMiddleware {
    fn before(&self, _req: &Request) -> Option<Response> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn on_short_circuit(&self, _req: &Request, _res: &Response) {
        self.short_circuited.fetch_add(1, Ordering::Relaxed);
    }

    fn after(&self, _req: &Request, res: &mut Response, latency: Duration) {
        self.total_latency_ns
            .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
        if let 200..=599 = res.status {
            self.status_classes[usize::from(res.status / 100 - 2)].fetch_add(1, Ordering::Relaxed);
        }
    }
}

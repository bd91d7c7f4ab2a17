use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Histogram, register_counter, register_counter_vec, register_histogram,
};

lazy_static! {
    pub static ref CHAT_REQUESTS: Counter =
        register_counter!("chat_gateway_requests_total", "Total number of chat requests").unwrap();
    pub static ref CHAT_FAILURES: Counter =
        register_counter!("chat_gateway_failures_total", "Chat requests that ended in an error")
            .unwrap();
    pub static ref BACKEND_CALLS: CounterVec = register_counter_vec!(
        "chat_gateway_backend_calls_total",
        "Upstream calls per backend",
        &["backend"]
    )
    .unwrap();
    pub static ref CHAT_LATENCY: Histogram = register_histogram!(
        "chat_gateway_request_latency_seconds",
        "Chat request latency in seconds"
    )
    .unwrap();
}

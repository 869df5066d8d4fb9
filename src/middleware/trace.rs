//! Per-request tracing.

use std::future::Future;
use std::time::Instant;

use tracing::{Instrument, Span, field, info, info_span};

use crate::response::Response;

/// Runs `fut` inside an `http_request` span and logs the outcome.
///
/// The span carries `method` and `uri` from the start; `status` and
/// `latency_ms` are recorded once the response exists.
pub(crate) async fn trace<F>(method: &str, uri: &str, fut: F) -> Response
where
    F: Future<Output = Response>,
{
    let span = info_span!(
        "http_request",
        method = %method,
        uri = %uri,
        status = field::Empty,
        latency_ms = field::Empty,
    );

    let start = Instant::now();
    let response = fut.instrument(span.clone()).await;
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    let status = u16::from(response.status());
    record(&span, status, latency_ms);
    span.in_scope(|| info!(status, latency_ms, "finished processing request"));
    response
}

fn record(span: &Span, status: u16, latency_ms: u64) {
    span.record("status", status);
    span.record("latency_ms", latency_ms);
}
